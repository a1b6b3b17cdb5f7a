//! Plain-text extraction from `.docx` uploads.
//!
//! Only `word/document.xml` is read. Every `w:p` paragraph, including the ones
//! inside tables, contributes its text followed by a blank line, so paragraph
//! structure survives as `\n\n` gaps. Styling is dropped.

use std::io::{self, Cursor, Read};
use thiserror::Error;

const WML_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const DOCUMENT_PART: &str = "word/document.xml";

/// Largest uncompressed `word/document.xml` accepted. The upload limit only
/// bounds the compressed archive.
pub const MAX_DOCUMENT_XML_BYTES: u64 = 32 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum DocxError {
    #[error("not a .docx archive: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("missing word/document.xml in archive")]
    MissingDocument,

    #[error("failed to read word/document.xml: {0}")]
    Io(#[from] io::Error),

    #[error("malformed word/document.xml: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("word/document.xml is larger than {limit} bytes when uncompressed")]
    TooLarge { limit: u64 },
}

/// Extracts the raw text of a `.docx` file held in memory.
pub fn extract_text(bytes: &[u8]) -> Result<String, DocxError> {
    extract_text_with_limit(bytes, MAX_DOCUMENT_XML_BYTES)
}

fn extract_text_with_limit(bytes: &[u8], limit: u64) -> Result<String, DocxError> {
    let xml = read_document_xml(bytes, limit)?;

    let doc = roxmltree::Document::parse(&xml)?;
    let mut text = String::new();
    for paragraph in doc
        .descendants()
        .filter(|n| is_wml(*n, "p") && !has_paragraph_ancestor(*n))
    {
        push_paragraph_text(paragraph, &mut text);
        text.push_str("\n\n");
    }

    Ok(text)
}

// The declared size in the zip header can lie, so the read itself is capped too.
fn read_document_xml(bytes: &[u8], limit: u64) -> Result<String, DocxError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))?;
    let entry = match archive.by_name(DOCUMENT_PART) {
        Ok(entry) => entry,
        Err(zip::result::ZipError::FileNotFound) => return Err(DocxError::MissingDocument),
        Err(e) => return Err(e.into()),
    };
    if entry.size() > limit {
        return Err(DocxError::TooLarge { limit });
    }

    let mut xml = Vec::new();
    entry.take(limit + 1).read_to_end(&mut xml)?;
    if xml.len() as u64 > limit {
        return Err(DocxError::TooLarge { limit });
    }
    String::from_utf8(xml).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e).into())
}

fn is_wml(node: roxmltree::Node, name: &str) -> bool {
    node.is_element()
        && node.tag_name().name() == name
        && node.tag_name().namespace() == Some(WML_NS)
}

// Text boxes nest whole paragraphs inside a run; those are read as part of the outer one.
fn has_paragraph_ancestor(node: roxmltree::Node) -> bool {
    node.ancestors().skip(1).any(|a| is_wml(a, "p"))
}

fn push_paragraph_text(paragraph: roxmltree::Node, out: &mut String) {
    for node in paragraph.descendants() {
        if !node.is_element() || node.tag_name().namespace() != Some(WML_NS) {
            continue;
        }
        match node.tag_name().name() {
            "t" => out.push_str(node.text().unwrap_or_default()),
            "tab" if is_inside_run(node) => out.push('\t'),
            "br" | "cr" => out.push('\n'),
            _ => {}
        }
    }
}

// `w:tab` also appears in paragraph properties as a tab-stop definition.
fn is_inside_run(node: roxmltree::Node) -> bool {
    node.parent().is_some_and(|p| is_wml(p, "r"))
}
