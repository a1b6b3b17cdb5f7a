//! # HTTP Services
//!
//! One sub-module per API area. Each area exposes `configure_routes`, which
//! returns the actix `Scope` for its path prefix, and keeps one file per
//! endpoint with a thin `process` handler in front of a `Result`-returning
//! function.
//!
//! Handlers share four pieces of application data:
//! - `web::Data<dyn Storage>`: templates and generation records.
//! - `web::Data<PdfFiles>`: the directory generated PDFs are written to.
//! - `web::Data<RenderOptions>`: page geometry and the render time budget.
//! - `web::Data<UploadLimits>`: the largest accepted document upload.

pub mod auth;
pub mod dashboard;
pub mod generate;
pub mod generated_pdfs;
pub mod pdfs;
pub mod templates;

use crate::document::render::PageConfig;
use actix_web::{web, HttpRequest};
use std::time::Duration;

/// Owner recorded on templates and generated PDFs when the client does not
/// identify itself.
pub const DEMO_USER_ID: &str = "demo-user";

const OWNER_HEADER: &str = "X-User-Id";

#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub page: PageConfig,
    /// Wall-clock budget for one render on the blocking pool.
    pub timeout: Duration,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            page: PageConfig::a4(),
            timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct UploadLimits {
    pub max_bytes: usize,
}

impl Default for UploadLimits {
    fn default() -> Self {
        Self {
            max_bytes: 10 * 1024 * 1024,
        }
    }
}

/// Opaque owner id taken from the `X-User-Id` header.
pub fn owner_id(req: &HttpRequest) -> String {
    req.headers()
        .get(OWNER_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(DEMO_USER_ID)
        .to_string()
}

/// Registers every API scope.
///
/// `generate` owns the bare `/api` prefix and must come last: a matching scope
/// does not fall through to later ones.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(auth::configure_routes())
        .service(dashboard::configure_routes())
        .service(templates::configure_routes())
        .service(generated_pdfs::configure_routes())
        .service(pdfs::configure_routes())
        .service(generate::configure_routes());
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::error::ServiceError;
    use crate::storage::{PdfFiles, SqliteStorage, Storage};
    use common::model::template::{NewTemplate, Template};
    use std::sync::Arc;
    use tempfile::TempDir;

    /// In-memory storage plus a scratch PDF directory for one test.
    pub(crate) struct TestEnv {
        pub storage: Arc<dyn Storage>,
        pub files: PdfFiles,
        _dir: TempDir,
    }

    impl TestEnv {
        pub(crate) fn new() -> Self {
            let dir = tempfile::tempdir().unwrap();
            let storage: Arc<dyn Storage> = Arc::new(SqliteStorage::open_in_memory().unwrap());
            Self {
                storage,
                files: PdfFiles::new(dir.path().join("generated-pdfs")),
                _dir: dir,
            }
        }

        pub(crate) fn add_template(&self, name: &str, content: &str) -> Template {
            self.storage
                .create_template(NewTemplate {
                    owner_id: Some(DEMO_USER_ID.to_string()),
                    name: name.to_string(),
                    filename: format!("{}.docx", name),
                    original_content: content.to_string(),
                    placeholders: crate::document::extract::extract_placeholders(content),
                    sections: crate::document::extract::count_sections(content),
                })
                .unwrap()
        }

        /// Application data and routes as `main` wires them, for use with
        /// `App::new().configure(|cfg| env.configure(cfg))`.
        pub(crate) fn configure(&self, cfg: &mut web::ServiceConfig) {
            cfg.app_data(web::Data::from(self.storage.clone()))
                .app_data(web::Data::new(self.files.clone()))
                .app_data(web::Data::new(RenderOptions::default()))
                .app_data(web::Data::new(UploadLimits::default()))
                .app_data(web::JsonConfig::default().error_handler(|err, _| {
                    ServiceError::BadRequest(err.to_string()).into()
                }));
            configure(cfg);
        }
    }
}
