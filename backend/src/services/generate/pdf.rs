//! # PDF Generation Service
//!
//! Backs `POST /api/generate-pdf`.
//!
//! ## Workflow
//!
//! 1.  Load the template and validate `formData` against its placeholders.
//! 2.  Substitute the values into the template text.
//! 3.  Render the PDF on the blocking pool (see `render_in_background`).
//! 4.  Write the file to the PDF directory under a timestamped name.
//! 5.  Store a `GeneratedPdf` record pointing at `/api/pdfs/{file}`. If that
//!     fails the file is removed again, so no orphan is left on disk.

use super::{load_inputs, render_in_background};
use crate::document::substitute::substitute;
use crate::error::{Context, ServiceError};
use crate::services::{owner_id, RenderOptions};
use crate::storage::{PdfFiles, Storage};
use actix_web::{web, HttpRequest, HttpResponse, Responder, ResponseError};
use chrono::{Datelike, Local, NaiveDate, Utc};
use common::model::generated_pdf::{GeneratedPdf, NewGeneratedPdf};
use common::requests::GeneratePdfRequest;
use log::{info, warn};

const FAILURE: &str = "Failed to generate PDF";

/// Actix web handler for the `POST /api/generate-pdf` endpoint.
///
/// # Returns
/// - `200 OK` with the stored `GeneratedPdf`.
/// - `400 Bad Request` when `formData` fails validation.
/// - `404 Not Found` when the template does not exist.
/// - `500 Internal Server Error` when rendering, writing or storage fails.
pub async fn process(
    req: HttpRequest,
    storage: web::Data<dyn Storage>,
    files: web::Data<PdfFiles>,
    options: web::Data<RenderOptions>,
    body: web::Json<GeneratePdfRequest>,
) -> impl Responder {
    let owner = owner_id(&req);
    match generate_pdf(storage.get_ref(), &files, &options, owner, body.into_inner()).await {
        Ok(pdf) => HttpResponse::Ok().json(pdf),
        Err(e) => e.error_response(),
    }
}

pub async fn generate_pdf(
    storage: &dyn Storage,
    files: &PdfFiles,
    options: &RenderOptions,
    owner: String,
    request: GeneratePdfRequest,
) -> Result<GeneratedPdf, ServiceError> {
    let (template, values) =
        load_inputs(storage, request.template_id, &request.form_data, FAILURE)?;

    let content = substitute(&template.original_content, &values).context(FAILURE)?;
    let rendered = render_in_background(options, content.clone(), values.clone())
        .await
        .context(FAILURE)?;

    let file_name = PdfFiles::file_name(&template.name, Utc::now());
    files.write(&file_name, &rendered.bytes).context(FAILURE)?;

    let name = request
        .name
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| default_name(&template.name, Local::now().date_naive()));

    let record = NewGeneratedPdf {
        owner_id: Some(owner),
        template_id: template.id,
        name,
        form_data: values,
        pdf_content: Some(content),
        pdf_url: Some(PdfFiles::url_for(&file_name)),
    };

    match storage.create_generated_pdf(record) {
        Ok(pdf) => {
            info!(
                "Generated '{}' from template {}: {} pages, {} paragraphs, {} images, {} image fallbacks",
                file_name,
                template.id,
                rendered.pages,
                rendered.paragraphs,
                rendered.images_embedded,
                rendered.image_fallbacks
            );
            Ok(pdf)
        }
        Err(e) => {
            if let Err(cleanup) = files.delete(&file_name) {
                warn!("Could not remove orphaned '{}': {}", file_name, cleanup);
            }
            Err(ServiceError::internal(FAILURE, e))
        }
    }
}

/// `"{template} - M/D/YYYY"`.
fn default_name(template_name: &str, today: NaiveDate) -> String {
    format!(
        "{} - {}/{}/{}",
        template_name,
        today.month(),
        today.day(),
        today.year()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::TestEnv;
    use actix_web::http::StatusCode;
    use actix_web::{test, App};
    use common::model::form_value::FormValue;
    use serde_json::json;

    #[actix_web::test]
    async fn default_name_uses_month_day_year() {
        let day = NaiveDate::from_ymd_opt(2025, 3, 7).unwrap();
        assert_eq!(default_name("Invoice", day), "Invoice - 3/7/2025");
    }

    #[actix_web::test]
    async fn stores_file_and_record() {
        let env = TestEnv::new();
        let template = env.add_template("Invoice", "Bill to {customer_name}\n\nDue {due_date}");
        let app = test::init_service(App::new().configure(|cfg| env.configure(cfg))).await;

        let req = test::TestRequest::post()
            .uri("/api/generate-pdf")
            .insert_header(("X-User-Id", "user-7"))
            .set_json(json!({
                "templateId": template.id,
                "formData": { "customer_name": "Acme", "due_date": "2025-04-01" },
                "name": "April invoice",
            }))
            .to_request();
        let pdf: GeneratedPdf = test::call_and_read_body_json(&app, req).await;

        assert_eq!(pdf.name, "April invoice");
        assert_eq!(pdf.owner_id.as_deref(), Some("user-7"));
        assert_eq!(pdf.template_id, template.id);
        assert_eq!(pdf.pdf_content.as_deref(), Some("Bill to Acme\n\nDue 2025-04-01"));
        assert_eq!(pdf.form_data["due_date"], FormValue::Date("2025-04-01".into()));

        let url = pdf.pdf_url.unwrap();
        assert!(url.starts_with("/api/pdfs/Invoice-"));
        let path = env.files.path(PdfFiles::file_name_from_url(&url)).unwrap();
        let bytes = std::fs::read(path).unwrap();
        assert!(bytes.starts_with(b"%PDF"));

        let stored = env.storage.get_generated_pdf(pdf.id).unwrap().unwrap();
        assert_eq!(stored.pdf_url.as_deref(), Some(url.as_str()));
    }

    #[actix_web::test]
    async fn blank_name_falls_back_to_default() {
        let env = TestEnv::new();
        let template = env.add_template("Letter", "Hello");
        let app = test::init_service(App::new().configure(|cfg| env.configure(cfg))).await;

        let req = test::TestRequest::post()
            .uri("/api/generate-pdf")
            .set_json(json!({ "templateId": template.id, "formData": {}, "name": "" }))
            .to_request();
        let pdf: GeneratedPdf = test::call_and_read_body_json(&app, req).await;
        assert!(pdf.name.starts_with("Letter - "));
        assert_eq!(pdf.owner_id.as_deref(), Some("demo-user"));
    }

    #[actix_web::test]
    async fn nothing_is_written_for_a_missing_template() {
        let env = TestEnv::new();
        let app = test::init_service(App::new().configure(|cfg| env.configure(cfg))).await;

        let req = test::TestRequest::post()
            .uri("/api/generate-pdf")
            .set_json(json!({ "templateId": 5, "formData": {} }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert!(env.storage.list_generated_pdfs().unwrap().is_empty());
    }

    #[actix_web::test]
    async fn render_timeout_is_an_internal_error() {
        let env = TestEnv::new();
        let template = env.add_template("Slow", &"paragraph\n".repeat(5000));
        let options = RenderOptions {
            timeout: std::time::Duration::ZERO,
            ..RenderOptions::default()
        };

        let err = generate_pdf(
            env.storage.as_ref(),
            &env.files,
            &options,
            "demo-user".to_string(),
            GeneratePdfRequest {
                template_id: template.id,
                form_data: json!({}),
                name: None,
            },
        )
        .await
        .unwrap_err();

        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(env.storage.list_generated_pdfs().unwrap().is_empty());
    }
}
