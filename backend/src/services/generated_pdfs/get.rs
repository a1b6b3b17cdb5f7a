//! # Generated PDF Retrieval Service
//!
//! Backs `GET /api/generated-pdfs/{pdf_id}`: one generation record with its
//! typed form values, substituted text and file URL.

use crate::error::{Context, ServiceError};
use crate::storage::Storage;
use actix_web::{web, HttpResponse, Responder, ResponseError};
use common::model::generated_pdf::GeneratedPdf;

/// Actix web handler for the `GET /api/generated-pdfs/{pdf_id}` endpoint.
///
/// # Returns
/// - `200 OK` with the `GeneratedPdf` as JSON.
/// - `404 Not Found` when no record has that id.
/// - `500 Internal Server Error` when storage fails.
pub async fn process(storage: web::Data<dyn Storage>, pdf_id: web::Path<i64>) -> impl Responder {
    match get_generated_pdf(storage.get_ref(), pdf_id.into_inner()) {
        Ok(pdf) => HttpResponse::Ok().json(pdf),
        Err(e) => e.error_response(),
    }
}

pub fn get_generated_pdf(storage: &dyn Storage, pdf_id: i64) -> Result<GeneratedPdf, ServiceError> {
    storage
        .get_generated_pdf(pdf_id)
        .context("Failed to fetch generated PDF")?
        .ok_or(ServiceError::NotFound("Generated PDF not found"))
}
