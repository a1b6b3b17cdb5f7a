//! # Stored PDF Service Module
//!
//! Serves the files written by `POST /api/generate-pdf` from the PDF
//! directory. Only plain file names are accepted; anything that could leave
//! the directory answers `404 PDF not found`.

mod serve;

use actix_web::web::{get, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/pdfs";

/// # Registered Routes:
///
/// *   **`GET /{filename}`**: the PDF with `Content-Disposition: inline`.
/// *   **`GET /{filename}/download`**: the PDF as an attachment.
pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("/{filename}", get().to(serve::inline))
        .route("/{filename}/download", get().to(serve::download))
}
