//! # Auth Service Module
//!
//! There is no login. `GET /api/auth/user` always answers with the demo user
//! so clients have a profile to show.

use super::DEMO_USER_ID;
use actix_web::web::{get, scope, Json};
use actix_web::Scope;
use common::model::user::User;

const API_PATH: &str = "/api/auth";

pub fn configure_routes() -> Scope {
    scope(API_PATH).route("/user", get().to(current_user))
}

/// Handler for `GET /api/auth/user`.
///
/// # Returns
/// `200 OK` with the demo `User`.
async fn current_user() -> Json<User> {
    Json(User {
        id: DEMO_USER_ID.to_string(),
        email: "demo@example.com".to_string(),
        first_name: "Demo".to_string(),
        last_name: "User".to_string(),
    })
}
