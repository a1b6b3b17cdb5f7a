//! # Generated PDF Listing Service
//!
//! Backs `GET /api/generated-pdfs`. Records come back newest first, optionally
//! narrowed to one template with `?templateId=`.

use crate::error::{Context, ServiceError};
use crate::storage::Storage;
use actix_web::{web, HttpResponse, Responder, ResponseError};
use common::model::generated_pdf::GeneratedPdf;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub template_id: Option<i64>,
}

/// Actix web handler for the `GET /api/generated-pdfs` endpoint.
///
/// # Returns
/// - `200 OK` with a JSON array of `GeneratedPdf`, possibly empty.
/// - `400 Bad Request` when `templateId` is not an integer.
/// - `500 Internal Server Error` when storage fails.
pub async fn process(
    storage: web::Data<dyn Storage>,
    query: web::Query<ListQuery>,
) -> impl Responder {
    match list_generated_pdfs(storage.get_ref(), query.template_id) {
        Ok(pdfs) => HttpResponse::Ok().json(pdfs),
        Err(e) => e.error_response(),
    }
}

pub fn list_generated_pdfs(
    storage: &dyn Storage,
    template_id: Option<i64>,
) -> Result<Vec<GeneratedPdf>, ServiceError> {
    let pdfs = match template_id {
        Some(id) => storage.list_generated_pdfs_by_template(id),
        None => storage.list_generated_pdfs(),
    };
    pdfs.context("Failed to fetch generated PDFs")
}

#[cfg(test)]
mod tests {
    use crate::services::test_support::TestEnv;
    use actix_web::{test, App};
    use common::model::form_value::FormData;
    use common::model::generated_pdf::{GeneratedPdf, NewGeneratedPdf};

    fn record(template_id: i64) -> NewGeneratedPdf {
        NewGeneratedPdf {
            owner_id: None,
            template_id,
            name: format!("from {}", template_id),
            form_data: FormData::new(),
            pdf_content: None,
            pdf_url: None,
        }
    }

    #[actix_web::test]
    async fn filters_by_template() {
        let env = TestEnv::new();
        env.storage.create_generated_pdf(record(1)).unwrap();
        env.storage.create_generated_pdf(record(2)).unwrap();
        env.storage.create_generated_pdf(record(2)).unwrap();
        let app = test::init_service(App::new().configure(|cfg| env.configure(cfg))).await;

        let req = test::TestRequest::get().uri("/api/generated-pdfs").to_request();
        let all: Vec<GeneratedPdf> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(all.len(), 3);

        let req = test::TestRequest::get()
            .uri("/api/generated-pdfs?templateId=2")
            .to_request();
        let some: Vec<GeneratedPdf> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(some.len(), 2);
        assert!(some.iter().all(|p| p.template_id == 2));
    }
}
