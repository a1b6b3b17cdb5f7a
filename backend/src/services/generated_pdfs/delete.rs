//! `DELETE /api/generated-pdfs/{pdf_id}`.
//!
//! The stored file goes first, so a record is never left pointing at nothing
//! after a successful delete. A record without a file, or whose file is already
//! gone, is still deleted.

use crate::error::{Context, ServiceError};
use crate::storage::{PdfFiles, Storage};
use actix_web::{web, HttpResponse, Responder, ResponseError};
use common::requests::MessageResponse;
use log::info;

const FAILURE: &str = "Failed to delete generated PDF";

/// Actix web handler for the `DELETE /api/generated-pdfs/{pdf_id}` endpoint.
///
/// # Returns
/// - `200 OK` with a `MessageResponse`.
/// - `404 Not Found` when no record has that id.
/// - `500 Internal Server Error` when the file or the record cannot be removed.
pub async fn process(
    storage: web::Data<dyn Storage>,
    files: web::Data<PdfFiles>,
    pdf_id: web::Path<i64>,
) -> impl Responder {
    match delete_generated_pdf(storage.get_ref(), &files, pdf_id.into_inner()) {
        Ok(()) => HttpResponse::Ok().json(MessageResponse {
            message: "Generated PDF deleted successfully".to_string(),
        }),
        Err(e) => e.error_response(),
    }
}

pub fn delete_generated_pdf(
    storage: &dyn Storage,
    files: &PdfFiles,
    pdf_id: i64,
) -> Result<(), ServiceError> {
    let record = storage.get_generated_pdf(pdf_id).context(FAILURE)?;
    if let Some(url) = record.as_ref().and_then(|pdf| pdf.pdf_url.as_deref()) {
        let file_name = PdfFiles::file_name_from_url(url);
        if files.delete(file_name).context(FAILURE)? {
            info!("Removed file '{}'", file_name);
        }
    }

    if !storage.delete_generated_pdf(pdf_id).context(FAILURE)? {
        return Err(ServiceError::NotFound("Generated PDF not found"));
    }
    info!("Deleted generated PDF {}", pdf_id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::services::test_support::TestEnv;
    use crate::storage::PdfFiles;
    use actix_web::http::StatusCode;
    use actix_web::{test, App};
    use common::model::generated_pdf::GeneratedPdf;
    use serde_json::json;

    #[actix_web::test]
    async fn removes_file_and_record_then_404s() {
        let env = TestEnv::new();
        let template = env.add_template("Invoice", "Hello {name}");
        let app = test::init_service(App::new().configure(|cfg| env.configure(cfg))).await;

        let req = test::TestRequest::post()
            .uri("/api/generate-pdf")
            .set_json(json!({ "templateId": template.id, "formData": { "name": "Ann" } }))
            .to_request();
        let pdf: GeneratedPdf = test::call_and_read_body_json(&app, req).await;
        let url = pdf.pdf_url.clone().unwrap();
        let file_name = PdfFiles::file_name_from_url(&url);
        let path = env.files.path(file_name).unwrap();
        assert!(path.exists());

        let uri = format!("/api/generated-pdfs/{}", pdf.id);
        let resp = test::call_service(&app, test::TestRequest::delete().uri(&uri).to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(!path.exists());

        let resp = test::call_service(&app, test::TestRequest::get().uri(&uri).to_request()).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let resp = test::call_service(&app, test::TestRequest::delete().uri(&uri).to_request()).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn missing_file_does_not_block_record_deletion() {
        let env = TestEnv::new();
        let template = env.add_template("Invoice", "Hello");
        let app = test::init_service(App::new().configure(|cfg| env.configure(cfg))).await;

        let req = test::TestRequest::post()
            .uri("/api/generate-pdf")
            .set_json(json!({ "templateId": template.id, "formData": {} }))
            .to_request();
        let pdf: GeneratedPdf = test::call_and_read_body_json(&app, req).await;
        let url = pdf.pdf_url.clone().unwrap();
        env.files.delete(PdfFiles::file_name_from_url(&url)).unwrap();

        let uri = format!("/api/generated-pdfs/{}", pdf.id);
        let resp = test::call_service(&app, test::TestRequest::delete().uri(&uri).to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(env.storage.get_generated_pdf(pdf.id).unwrap().is_none());
    }
}
