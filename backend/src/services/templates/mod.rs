//! # Template Service Module
//!
//! This module aggregates all API endpoints related to the management of templates.
//! It acts as a router, directing incoming HTTP requests under the `/api/templates`
//! path to the appropriate handler logic defined in its sub-modules.
//!
//! ## Sub-modules:
//! - `list`: Lists all templates, or those matching a search term.
//! - `get`: Retrieves a single template with its detected placeholders.
//! - `upload`: Accepts a Word document, extracts its text and placeholders and stores
//!   the result as a new template.
//! - `delete`: Removes a template. PDFs generated from it are kept.

mod delete;
mod get;
mod list;
mod upload;

use actix_web::web::{delete, get, post, scope};
use actix_web::Scope;

/// The base path for all template-related API endpoints.
const API_PATH: &str = "/api/templates";

/// Configures and returns the Actix `Scope` for all template-related routes.
///
/// # Registered Routes:
///
/// *   **`GET /`**:
///     - **Handler**: `list::process`
///     - **Description**: Returns every template, newest upload first. With a
///       non-empty `?search=` query only templates whose name or filename contains
///       the term (case-insensitively) are returned.
///
/// *   **`POST /upload`**:
///     - **Handler**: `upload::process`
///     - **Description**: Multipart upload with a single `document` field holding a
///       `.docx` file. Responds with the stored template and the number of
///       placeholders detected.
///
/// *   **`GET /{template_id}`**:
///     - **Handler**: `get::process`
///     - **Description**: Returns one template, or `404 Template not found`.
///
/// *   **`DELETE /{template_id}`**:
///     - **Handler**: `delete::process`
///     - **Description**: Deletes one template, or answers `404 Template not found`.
pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("", get().to(list::process))
        .route("/", get().to(list::process))
        .route("/upload", post().to(upload::process))
        .route("/{template_id}", get().to(get::process))
        .route("/{template_id}", delete().to(delete::process))
}
