//! `POST /api/preview`: the template text with form values substituted.

use super::load_inputs;
use crate::document::substitute::substitute;
use crate::error::{Context, ServiceError};
use crate::storage::Storage;
use actix_web::{web, HttpResponse, Responder, ResponseError};
use common::requests::{PreviewRequest, PreviewResponse};

const FAILURE: &str = "Failed to generate preview";

/// Actix web handler for the `POST /api/preview` endpoint.
///
/// # Returns
/// - `200 OK` with a `PreviewResponse`.
/// - `400 Bad Request` when `formData` fails validation.
/// - `404 Not Found` when the template does not exist.
/// - `500 Internal Server Error` when storage or substitution fails.
pub async fn process(
    storage: web::Data<dyn Storage>,
    body: web::Json<PreviewRequest>,
) -> impl Responder {
    match preview(storage.get_ref(), &body) {
        Ok(preview) => HttpResponse::Ok().json(preview),
        Err(e) => e.error_response(),
    }
}

pub fn preview(
    storage: &dyn Storage,
    request: &PreviewRequest,
) -> Result<PreviewResponse, ServiceError> {
    let (template, values) =
        load_inputs(storage, request.template_id, &request.form_data, FAILURE)?;

    Ok(PreviewResponse {
        content: substitute(&template.original_content, &values).context(FAILURE)?,
        placeholders: template.placeholders,
    })
}
