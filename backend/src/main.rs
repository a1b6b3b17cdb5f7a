mod config;
mod document;
mod error;
mod services;
mod storage;

use crate::config::Config;
use crate::error::ServiceError;
use crate::services::{RenderOptions, UploadLimits};
use crate::storage::{PdfFiles, SqliteStorage, Storage};
use actix_web::{middleware, web, App, HttpServer};
use env_logger::Env;
use log::info;
use std::io;
use std::sync::Arc;

#[actix_web::main]
async fn main() -> io::Result<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config = Config::from_env().map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

    let storage: Arc<dyn Storage> = Arc::new(
        SqliteStorage::open(&config.database).map_err(|e| io::Error::other(e.to_string()))?,
    );
    let storage = web::Data::from(storage);
    let files = web::Data::new(PdfFiles::new(&config.output_dir));
    let render_options = web::Data::new(RenderOptions {
        timeout: config.render_timeout,
        ..RenderOptions::default()
    });
    let upload_limits = web::Data::new(UploadLimits {
        max_bytes: config.max_upload_bytes,
    });
    let json_limit = config.max_upload_bytes;

    info!(
        "Database at {}, PDFs written to {}",
        config.database.display(),
        config.output_dir.display()
    );
    info!("Server running at http://{}:{}", config.host, config.port);

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .app_data(
                web::JsonConfig::default()
                    .limit(json_limit)
                    .error_handler(|err, _| ServiceError::BadRequest(err.to_string()).into()),
            )
            .app_data(storage.clone())
            .app_data(files.clone())
            .app_data(render_options.clone())
            .app_data(upload_limits.clone())
            .configure(services::configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
