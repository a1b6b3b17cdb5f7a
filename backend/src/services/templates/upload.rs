//! # Template Upload Service
//!
//! Backs `POST /api/templates/upload`.
//!
//! ## Workflow
//!
//! 1.  **Multipart parsing**: the `document` field is read fully into memory. The
//!     upload is refused as soon as it grows past `UploadLimits::max_bytes`, and
//!     other fields are drained and ignored.
//! 2.  **Type check**: the part must be declared as a Word document and its bytes
//!     must be a zip archive, which rules out legacy binary `.doc` files.
//! 3.  **Extraction**: the document's paragraphs are flattened to plain text and
//!     scanned for `{placeholder}` tokens.
//! 4.  **Storage**: the text, placeholders and section count are stored as a new
//!     template named after the file without its extension.

use crate::document::{docx, extract};
use crate::error::{Context, ServiceError};
use crate::services::{owner_id, UploadLimits};
use crate::storage::Storage;
use actix_multipart::{Field, Multipart};
use actix_web::{web, HttpRequest, HttpResponse, Responder, ResponseError};
use common::model::template::NewTemplate;
use common::requests::UploadResponse;
use futures_util::StreamExt;
use log::info;

const FIELD_NAME: &str = "document";
const DOCX_MIME: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
const DOC_MIME: &str = "application/msword";
const ZIP_MAGIC: &[u8] = b"PK\x03\x04";

/// A Word document received from the client.
pub struct UploadedDocument {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Actix web handler for the `POST /api/templates/upload` endpoint.
///
/// # Returns
/// - `200 OK` with an `UploadResponse` holding the stored template.
/// - `400 Bad Request` when the file is missing, too large, or not a readable `.docx`.
/// - `500 Internal Server Error` when storage fails.
pub async fn process(
    req: HttpRequest,
    storage: web::Data<dyn Storage>,
    limits: web::Data<UploadLimits>,
    payload: Multipart,
) -> impl Responder {
    let owner = owner_id(&req);
    let result = match read_document(payload, limits.max_bytes).await {
        Ok(document) => create_template(storage.get_ref(), owner, document),
        Err(e) => Err(e),
    };
    match result {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(e) => e.error_response(),
    }
}

/// Pulls the `document` part out of the multipart stream.
pub async fn read_document(
    mut payload: Multipart,
    max_bytes: usize,
) -> Result<UploadedDocument, ServiceError> {
    let mut document = None;

    while let Some(item) = payload.next().await {
        let mut field = item.map_err(|e| ServiceError::InvalidUpload(e.to_string()))?;
        let name = field
            .content_disposition()
            .and_then(|cd| cd.get_name().map(|n| n.to_string()));

        if name.as_deref() != Some(FIELD_NAME) || document.is_some() {
            drain(&mut field).await?;
            continue;
        }

        let is_word = field
            .content_type()
            .map(|mime| mime.essence_str() == DOCX_MIME || mime.essence_str() == DOC_MIME)
            .unwrap_or(false);
        if !is_word {
            return Err(ServiceError::InvalidUpload(
                "Only .docx and .doc files are allowed".to_string(),
            ));
        }

        let filename = field
            .content_disposition()
            .and_then(|cd| cd.get_filename().map(|f| f.to_string()))
            .unwrap_or_else(|| "document.docx".to_string());

        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk.map_err(|e| ServiceError::InvalidUpload(e.to_string()))?;
            if bytes.len() + chunk.len() > max_bytes {
                return Err(ServiceError::InvalidUpload(format!(
                    "File too large (limit is {} bytes)",
                    max_bytes
                )));
            }
            bytes.extend_from_slice(&chunk);
        }

        document = Some(UploadedDocument { filename, bytes });
    }

    document.ok_or_else(|| ServiceError::InvalidUpload("No file uploaded".to_string()))
}

async fn drain(field: &mut Field) -> Result<(), ServiceError> {
    while let Some(chunk) = field.next().await {
        chunk.map_err(|e| ServiceError::InvalidUpload(e.to_string()))?;
    }
    Ok(())
}

/// Extracts text and placeholders from `document` and stores the template.
pub fn create_template(
    storage: &dyn Storage,
    owner: String,
    document: UploadedDocument,
) -> Result<UploadResponse, ServiceError> {
    if !document.bytes.starts_with(ZIP_MAGIC) {
        return Err(ServiceError::InvalidUpload(
            "Only .docx documents are supported".to_string(),
        ));
    }
    let text = docx::extract_text(&document.bytes)
        .map_err(|e| ServiceError::InvalidUpload(format!("Could not read document: {}", e)))?;

    let placeholders = extract::extract_placeholders(&text);
    let placeholders_detected = placeholders.len();
    let template = storage
        .create_template(NewTemplate {
            owner_id: Some(owner),
            name: extract::template_name_from_filename(&document.filename),
            filename: document.filename,
            sections: extract::count_sections(&text),
            original_content: text,
            placeholders,
        })
        .context("Failed to upload template")?;

    info!(
        "Stored template {} '{}' with {} placeholders",
        template.id, template.name, placeholders_detected
    );
    Ok(UploadResponse {
        template,
        placeholders_detected,
    })
}
