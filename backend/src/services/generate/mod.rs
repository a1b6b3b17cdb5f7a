//! # Generation Service Module
//!
//! Turns a template plus submitted form values into output:
//!
//! - `preview`: substituted plain text, nothing rendered.
//! - `pdf`: renders the PDF, stores the file and records the generation.
//! - `download`: renders the PDF and streams it back without storing anything.
//!
//! All three validate `formData` with `form::parse_form_data` against the
//! template's placeholders before substituting.

pub mod form;
mod download;
mod pdf;
mod preview;

use crate::document::render::{render, RenderedPdf};
use crate::error::{Context, InternalError, ServiceError};
use crate::services::RenderOptions;
use crate::storage::Storage;
use actix_web::web::{post, scope};
use actix_web::Scope;
use common::model::form_value::FormData;
use common::model::template::Template;

const API_PATH: &str = "/api";

/// Configures the generation routes.
///
/// # Registered Routes:
///
/// *   **`POST /preview`**: `{templateId, formData}` to `{content, placeholders}`.
/// *   **`POST /generate-pdf`**: `{templateId, formData, name?}`. Renders, stores the
///     file and returns the new `GeneratedPdf` record.
/// *   **`POST /generate-pdf-download`**: `{templateId, formData}`. Returns the PDF as
///     an attachment.
pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("/preview", post().to(preview::process))
        .route("/generate-pdf", post().to(pdf::process))
        .route("/generate-pdf-download", post().to(download::process))
}

/// Looks up the template and validates `raw` against its placeholders.
fn load_inputs(
    storage: &dyn Storage,
    template_id: i64,
    raw: &serde_json::Value,
    failure: &'static str,
) -> Result<(Template, FormData), ServiceError> {
    let template = storage
        .get_template(template_id)
        .context(failure)?
        .ok_or(ServiceError::NotFound("Template not found"))?;
    let values = form::parse_form_data(raw, &template.placeholders)
        .map_err(ServiceError::InvalidFormData)?;
    Ok((template, values))
}

/// Renders on the blocking pool, giving up after `options.timeout`.
async fn render_in_background(
    options: &RenderOptions,
    text: String,
    values: FormData,
) -> Result<RenderedPdf, InternalError> {
    let page = options.page.clone();
    let task = tokio::task::spawn_blocking(move || render(&text, &values, &page));

    match tokio::time::timeout(options.timeout, task).await {
        Err(_) => Err(InternalError::Timeout),
        Ok(Err(join_error)) => Err(InternalError::Join(join_error.to_string())),
        Ok(Ok(result)) => Ok(result?),
    }
}
