//! # Dashboard Service Module
//!
//! `GET /api/dashboard/stats`: totals, the most used template and how long ago
//! the latest template was uploaded.

mod stats;

use actix_web::web::{get, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/dashboard";

pub fn configure_routes() -> Scope {
    scope(API_PATH).route("/stats", get().to(stats::process))
}
