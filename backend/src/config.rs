//! Server settings read from `DOCFILL_*` environment variables.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("invalid value {value:?} for {key}: {reason}")]
pub struct ConfigError {
    pub key: &'static str,
    pub value: String,
    pub reason: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database: PathBuf,
    pub output_dir: PathBuf,
    /// Upper bound for uploaded documents and JSON bodies, in bytes.
    pub max_upload_bytes: usize,
    pub render_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            database: PathBuf::from("docfill.sqlite"),
            output_dir: PathBuf::from("generated-pdfs"),
            max_upload_bytes: 10 * 1024 * 1024,
            render_timeout: Duration::from_secs(30),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from an arbitrary variable source. Unset or empty
    /// variables keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Ok(Config {
            host: get("DOCFILL_HOST").unwrap_or(defaults.host),
            port: parse(&get, "DOCFILL_PORT")?.unwrap_or(defaults.port),
            database: get("DOCFILL_DATABASE")
                .map(PathBuf::from)
                .unwrap_or(defaults.database),
            output_dir: get("DOCFILL_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_dir),
            max_upload_bytes: parse(&get, "DOCFILL_MAX_UPLOAD_BYTES")?
                .unwrap_or(defaults.max_upload_bytes),
            render_timeout: parse(&get, "DOCFILL_RENDER_TIMEOUT_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.render_timeout),
        })
    }
}

fn parse<T, G>(get: &G, key: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| ConfigError {
                key,
                value: raw.clone(),
                reason: e.to_string(),
            }),
    }
}
