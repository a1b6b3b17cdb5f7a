//! # Stored PDF Serving
//!
//! Streams files from the PDF output directory. The same lookup backs both
//! routes; only the `Content-Disposition` differs.

use crate::error::ServiceError;
use crate::storage::PdfFiles;
use actix_files::NamedFile;
use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{web, HttpRequest, HttpResponse, Responder, ResponseError};
use std::io::ErrorKind;

/// Actix web handler for `GET /api/pdfs/{filename}`.
///
/// # Returns
/// - `200 OK` with the PDF, `Content-Disposition: inline`.
/// - `404 Not Found` when the file does not exist or the name is not a plain file name.
/// - `500 Internal Server Error` when the file cannot be read.
pub async fn inline(
    req: HttpRequest,
    files: web::Data<PdfFiles>,
    filename: web::Path<String>,
) -> impl Responder {
    respond(&req, &files, &filename, DispositionType::Inline).await
}

/// Actix web handler for `GET /api/pdfs/{filename}/download`.
///
/// # Returns
/// Same as [`inline`], with `Content-Disposition: attachment`.
pub async fn download(
    req: HttpRequest,
    files: web::Data<PdfFiles>,
    filename: web::Path<String>,
) -> impl Responder {
    respond(&req, &files, &filename, DispositionType::Attachment).await
}

async fn respond(
    req: &HttpRequest,
    files: &PdfFiles,
    filename: &str,
    disposition: DispositionType,
) -> HttpResponse {
    match open_pdf(files, filename).await {
        Ok(file) => file
            .set_content_disposition(ContentDisposition {
                disposition,
                parameters: vec![DispositionParam::Filename(filename.to_string())],
            })
            .into_response(req),
        Err(e) => e.error_response(),
    }
}

pub async fn open_pdf(files: &PdfFiles, filename: &str) -> Result<NamedFile, ServiceError> {
    let opened = match files.path(filename) {
        Ok(path) => NamedFile::open_async(path).await,
        Err(e) => Err(e),
    };
    match opened {
        Ok(file) => Ok(file),
        Err(e) if e.kind() == ErrorKind::NotFound => Err(ServiceError::NotFound("PDF not found")),
        Err(e) => Err(ServiceError::internal("Failed to read PDF", e)),
    }
}
