//! # Template Retrieval Service
//!
//! Backs `GET /api/templates/{template_id}`. The template is returned as stored,
//! including its original extracted text and the detected placeholders.

use crate::error::{Context, ServiceError};
use crate::storage::Storage;
use actix_web::{web, HttpResponse, Responder, ResponseError};
use common::model::template::Template;

/// Actix web handler for the `GET /api/templates/{template_id}` endpoint.
///
/// # Returns
/// - `200 OK` with the `Template` as JSON.
/// - `404 Not Found` when no template has that id.
/// - `500 Internal Server Error` when storage fails.
pub async fn process(
    storage: web::Data<dyn Storage>,
    template_id: web::Path<i64>,
) -> impl Responder {
    match get_template(storage.get_ref(), template_id.into_inner()) {
        Ok(template) => HttpResponse::Ok().json(template),
        Err(e) => e.error_response(),
    }
}

pub fn get_template(storage: &dyn Storage, template_id: i64) -> Result<Template, ServiceError> {
    storage
        .get_template(template_id)
        .context("Failed to fetch template")?
        .ok_or(ServiceError::NotFound("Template not found"))
}

#[cfg(test)]
mod tests {
    use crate::services::test_support::TestEnv;
    use actix_web::http::StatusCode;
    use actix_web::{test, App};
    use common::model::template::Template;

    #[actix_web::test]
    async fn returns_template_or_404() {
        let env = TestEnv::new();
        let stored = env.add_template("Invoice", "Total {total_amount}");
        let app = test::init_service(App::new().configure(|cfg| env.configure(cfg))).await;

        let req = test::TestRequest::get()
            .uri(&format!("/api/templates/{}", stored.id))
            .to_request();
        let template: Template = test::call_and_read_body_json(&app, req).await;
        assert_eq!(template.name, "Invoice");
        assert_eq!(template.placeholders.len(), 1);

        let req = test::TestRequest::get().uri("/api/templates/999").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
