use std::env;
use std::path::PathBuf;

use crate::MetaLcaError;

const DEFAULT_UPLOAD_DIR: &str = "uploads/datasets";
const DEFAULT_UPLOAD_MAX_BYTES: usize = 100 * 1024 * 1024;
const DEFAULT_LOGIN_PATH: &str = "/first%20page";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // OpenLCA IPC server
    pub openlca_url: String,

    // Uploads
    pub upload_dir: PathBuf,
    pub upload_max_bytes: usize,

    // Web server
    pub web_host: String,
    pub web_port: u16,

    // Sessions
    pub session_secret: String,
    pub login_path: String,
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, MetaLcaError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, MetaLcaError> {
        let session_secret = match lookup("SESSION_SECRET").filter(|s| !s.is_empty()) {
            Some(secret) => secret,
            None => {
                tracing::warn!("SESSION_SECRET not set; sessions will not survive a restart");
                uuid::Uuid::new_v4().simple().to_string()
            }
        };

        Ok(Self {
            openlca_url: lookup("OPENLCA_API_URL")
                .unwrap_or_else(|| openlca_client::DEFAULT_BASE_URL.to_string()),
            upload_dir: lookup("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_UPLOAD_DIR)),
            upload_max_bytes: parse_or(&lookup, "UPLOAD_MAX_BYTES", DEFAULT_UPLOAD_MAX_BYTES)?,
            web_host: lookup("WEB_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            web_port: parse_or(&lookup, "WEB_PORT", 3000)?,
            session_secret,
            login_path: lookup("LOGIN_PATH").unwrap_or_else(|| DEFAULT_LOGIN_PATH.to_string()),
        })
    }

    /// Minimal config for the prober: only the engine address matters.
    pub fn openlca_url_from_env() -> String {
        env::var("OPENLCA_API_URL").unwrap_or_else(|_| openlca_client::DEFAULT_BASE_URL.to_string())
    }
}

fn parse_or<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, MetaLcaError> {
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| MetaLcaError::Config(format!("{key} must be a number, got {raw:?}"))),
        None => Ok(default),
    }
}
