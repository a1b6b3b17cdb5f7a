//! `GET /api/templates`: all templates, or a case-insensitive search over
//! names and filenames.

use crate::error::{Context, ServiceError};
use crate::storage::Storage;
use actix_web::{web, HttpResponse, Responder, ResponseError};
use common::model::template::Template;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub search: Option<String>,
}

/// Actix web handler for the `GET /api/templates` endpoint.
///
/// # Returns
/// - `200 OK` with a JSON array of `Template`, newest first.
/// - `500 Internal Server Error` when storage fails.
pub async fn process(
    storage: web::Data<dyn Storage>,
    query: web::Query<ListQuery>,
) -> impl Responder {
    match list_templates(storage.get_ref(), query.search.as_deref()) {
        Ok(templates) => HttpResponse::Ok().json(templates),
        Err(e) => e.error_response(),
    }
}

pub fn list_templates(
    storage: &dyn Storage,
    search: Option<&str>,
) -> Result<Vec<Template>, ServiceError> {
    let templates = match search.filter(|s| !s.is_empty()) {
        Some(term) => storage.search_templates(term),
        None => storage.list_templates(),
    };
    templates.context("Failed to fetch templates")
}
