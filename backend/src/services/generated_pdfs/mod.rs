//! # Generated PDF Service Module
//!
//! Records of past generations under `/api/generated-pdfs`.
//!
//! ## Sub-modules:
//! - `list`: all records, or those of one template.
//! - `get`: one record.
//! - `delete`: removes the stored file, then the record.

mod delete;
mod get;
mod list;

use actix_web::web::{delete, get, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/generated-pdfs";

/// # Registered Routes:
///
/// *   **`GET /`**: every record, newest first. `?templateId=` restricts the list to
///     one template.
/// *   **`GET /{pdf_id}`**: one record, or `404 Generated PDF not found`.
/// *   **`DELETE /{pdf_id}`**: deletes the file (a file that is already gone is
///     fine) and then the record.
pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("", get().to(list::process))
        .route("/", get().to(list::process))
        .route("/{pdf_id}", get().to(get::process))
        .route("/{pdf_id}", delete().to(delete::process))
}
