//! `POST /api/generate-pdf-download`: renders the PDF and sends it back as an
//! attachment. Nothing is stored.

use super::{load_inputs, render_in_background};
use crate::document::substitute::substitute;
use crate::error::{Context, ServiceError};
use crate::services::RenderOptions;
use crate::storage::Storage;
use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{web, HttpResponse, Responder, ResponseError};
use common::requests::PreviewRequest;
use regex::Regex;
use std::sync::LazyLock;

const FAILURE: &str = "Failed to generate PDF for download";

static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

/// Actix web handler for the `POST /api/generate-pdf-download` endpoint.
///
/// # Returns
/// - `200 OK` with the PDF bytes as an attachment. Nothing is stored.
/// - `400 Bad Request` when `formData` fails validation.
/// - `404 Not Found` when the template does not exist.
/// - `500 Internal Server Error` when rendering fails.
pub async fn process(
    storage: web::Data<dyn Storage>,
    options: web::Data<RenderOptions>,
    body: web::Json<PreviewRequest>,
) -> impl Responder {
    match render_download(storage.get_ref(), &options, &body).await {
        Ok((file_name, bytes)) => HttpResponse::Ok()
            .content_type("application/pdf")
            .insert_header(ContentDisposition {
                disposition: DispositionType::Attachment,
                parameters: vec![DispositionParam::Filename(file_name)],
            })
            .body(bytes),
        Err(e) => e.error_response(),
    }
}

pub async fn render_download(
    storage: &dyn Storage,
    options: &RenderOptions,
    request: &PreviewRequest,
) -> Result<(String, Vec<u8>), ServiceError> {
    let (template, values) =
        load_inputs(storage, request.template_id, &request.form_data, FAILURE)?;
    let content = substitute(&template.original_content, &values).context(FAILURE)?;
    let rendered = render_in_background(options, content, values)
        .await
        .context(FAILURE)?;

    Ok((attachment_name(&template.name), rendered.bytes))
}

fn attachment_name(template_name: &str) -> String {
    format!("{}.pdf", WHITESPACE_RE.replace_all(template_name, "_"))
}
