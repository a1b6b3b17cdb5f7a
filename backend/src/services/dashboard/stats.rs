//! # Dashboard Statistics Service
//!
//! Backs `GET /api/dashboard/stats`. The counts are computed from storage on
//! every request against the current time.

use crate::error::{Context, ServiceError};
use crate::storage::Storage;
use actix_web::{web, HttpResponse, Responder, ResponseError};
use chrono::Utc;
use common::model::stats::DashboardStats;

/// Actix web handler for the `GET /api/dashboard/stats` endpoint.
///
/// # Returns
/// - `200 OK` with `DashboardStats` as JSON.
/// - `500 Internal Server Error` when storage fails.
pub async fn process(storage: web::Data<dyn Storage>) -> impl Responder {
    match dashboard_stats(storage.get_ref()) {
        Ok(stats) => HttpResponse::Ok().json(stats),
        Err(e) => e.error_response(),
    }
}

pub fn dashboard_stats(storage: &dyn Storage) -> Result<DashboardStats, ServiceError> {
    storage
        .dashboard_stats(Utc::now())
        .context("Failed to fetch dashboard stats")
}
