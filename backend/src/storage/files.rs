//! On-disk store for generated PDF binaries.

use chrono::{DateTime, SecondsFormat, Utc};
use std::fs;
use std::io::{self, ErrorKind};
use std::path::PathBuf;

/// Public URL prefix under which stored PDFs are served.
pub const PDF_URL_PREFIX: &str = "/api/pdfs/";

#[derive(Debug, Clone)]
pub struct PdfFiles {
    dir: PathBuf,
}

impl PdfFiles {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// `{template name}-{timestamp}.pdf`, with the timestamp's `:` and `.`
    /// replaced so the name is safe on every filesystem.
    pub fn file_name(template_name: &str, now: DateTime<Utc>) -> String {
        let stamp = now
            .to_rfc3339_opts(SecondsFormat::Millis, true)
            .replace([':', '.'], "-");
        let name = template_name.replace(['/', '\\'], "_");
        format!("{}-{}.pdf", name, stamp)
    }

    pub fn url_for(file_name: &str) -> String {
        format!("{}{}", PDF_URL_PREFIX, file_name)
    }

    /// Last path segment of a stored `pdfUrl`.
    pub fn file_name_from_url(url: &str) -> &str {
        url.rsplit('/').next().unwrap_or(url)
    }

    /// Location of `file_name` inside the store. Names that are empty or that
    /// contain a separator or `..` are reported as not found.
    pub fn path(&self, file_name: &str) -> io::Result<PathBuf> {
        let unsafe_name = file_name.is_empty()
            || file_name.contains(['/', '\\'])
            || file_name.contains("..");
        if unsafe_name {
            return Err(io::Error::new(
                ErrorKind::NotFound,
                format!("invalid PDF file name {:?}", file_name),
            ));
        }
        Ok(self.dir.join(file_name))
    }

    pub fn write(&self, file_name: &str, bytes: &[u8]) -> io::Result<()> {
        let path = self.path(file_name)?;
        fs::create_dir_all(&self.dir)?;
        fs::write(path, bytes)
    }

    /// Removes a stored PDF. A file that is already gone is not an error.
    pub fn delete(&self, file_name: &str) -> io::Result<bool> {
        let path = match self.path(file_name) {
            Ok(path) => path,
            Err(_) => return Ok(false),
        };
        match fs::remove_file(path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn file_name_replaces_colons_and_dots() {
        let now = Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap()
            + chrono::Duration::milliseconds(678);
        let name = PdfFiles::file_name("Invoice", now);
        assert_eq!(name, "Invoice-2025-01-02T03-04-05-678Z.pdf");

        let stem = name.trim_end_matches(".pdf");
        assert!(!stem.contains(':') && !stem.contains('.'));
    }

    #[test]
    fn url_and_file_name_are_inverse() {
        let url = PdfFiles::url_for("Invoice-x.pdf");
        assert_eq!(url, "/api/pdfs/Invoice-x.pdf");
        assert_eq!(PdfFiles::file_name_from_url(&url), "Invoice-x.pdf");
    }

    #[test]
    fn writes_and_deletes() {
        let dir = tempfile::tempdir().unwrap();
        let files = PdfFiles::new(dir.path().join("out"));

        files.write("a.pdf", b"%PDF-1.5").unwrap();
        let path = files.path("a.pdf").unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"%PDF-1.5");
        assert!(files.delete("a.pdf").unwrap());
        assert!(!files.delete("a.pdf").unwrap());
        assert!(!path.exists());
    }

    #[test]
    fn rejects_names_that_leave_the_directory() {
        let dir = tempfile::tempdir().unwrap();
        let files = PdfFiles::new(dir.path());
        assert_eq!(
            files.path("../secret.pdf").unwrap_err().kind(),
            ErrorKind::NotFound
        );
        assert!(files.write("sub/dir.pdf", b"x").is_err());
        assert!(!files.delete("..").unwrap());
    }
}
