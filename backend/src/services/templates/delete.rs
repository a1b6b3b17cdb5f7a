//! `DELETE /api/templates/{template_id}`.

use crate::error::{Context, ServiceError};
use crate::storage::Storage;
use actix_web::{web, HttpResponse, Responder, ResponseError};
use common::requests::MessageResponse;
use log::info;

/// Actix web handler for the `DELETE /api/templates/{template_id}` endpoint.
///
/// # Returns
/// - `200 OK` with a `MessageResponse`.
/// - `404 Not Found` when no template has that id.
/// - `500 Internal Server Error` when storage fails.
pub async fn process(
    storage: web::Data<dyn Storage>,
    template_id: web::Path<i64>,
) -> impl Responder {
    match delete_template(storage.get_ref(), template_id.into_inner()) {
        Ok(()) => HttpResponse::Ok().json(MessageResponse {
            message: "Template deleted successfully".to_string(),
        }),
        Err(e) => e.error_response(),
    }
}

pub fn delete_template(storage: &dyn Storage, template_id: i64) -> Result<(), ServiceError> {
    if !storage
        .delete_template(template_id)
        .context("Failed to delete template")?
    {
        return Err(ServiceError::NotFound("Template not found"));
    }
    info!("Deleted template {}", template_id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::services::test_support::TestEnv;
    use actix_web::http::StatusCode;
    use actix_web::{test, App};

    #[actix_web::test]
    async fn deletes_once_then_404() {
        let env = TestEnv::new();
        let template = env.add_template("Invoice", "x");
        let app = test::init_service(App::new().configure(|cfg| env.configure(cfg))).await;
        let uri = format!("/api/templates/{}", template.id);

        let resp = test::call_service(&app, test::TestRequest::delete().uri(&uri).to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(env.storage.get_template(template.id).unwrap().is_none());

        let resp = test::call_service(&app, test::TestRequest::delete().uri(&uri).to_request()).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
