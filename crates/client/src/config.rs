use std::path::PathBuf;
use std::time::Duration;

use atelier_core::images::AddOrder;

use crate::error::{ClientError, ClientResult};

const DEFAULT_API_URL: &str = "http://127.0.0.1:8000/api";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
const TOKEN_DIR: &str = "atelier-admin";
const TOKEN_FILE: &str = "token";

/// Client configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the REST backend, without trailing slash.
    pub api_url: String,
    /// Where the bearer token is persisted between runs.
    pub token_path: PathBuf,
    pub request_timeout: Duration,
    /// Apply the "at least one category" rule when updating, not only when
    /// creating.
    pub edit_requires_category: bool,
    /// Order in which concurrently read images are appended to a draft.
    pub image_order: AddOrder,
}

impl ClientConfig {
    /// Build a config for `api_url` with every other setting at its default.
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: normalize_base_url(api_url.into()),
            token_path: default_token_path(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            edit_requires_category: false,
            image_order: AddOrder::default(),
        }
    }

    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                          | Default                              |
    /// |----------------------------------|--------------------------------------|
    /// | `ATELIER_API_URL`                | `http://127.0.0.1:8000/api`          |
    /// | `ATELIER_TOKEN_PATH`             | `<config dir>/atelier-admin/token`   |
    /// | `ATELIER_REQUEST_TIMEOUT_SECS`   | `30`                                 |
    /// | `ATELIER_EDIT_REQUIRES_CATEGORY` | `false`                              |
    /// | `ATELIER_IMAGE_ORDER`            | `completion`                         |
    pub fn from_env() -> ClientResult<Self> {
        let mut config =
            Self::new(std::env::var("ATELIER_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.into()));

        if let Ok(path) = std::env::var("ATELIER_TOKEN_PATH") {
            config.token_path = PathBuf::from(path);
        }

        if let Ok(raw) = std::env::var("ATELIER_REQUEST_TIMEOUT_SECS") {
            let secs: u64 = raw.trim().parse().map_err(|_| {
                ClientError::Config(format!(
                    "ATELIER_REQUEST_TIMEOUT_SECS must be a whole number of seconds, got '{raw}'"
                ))
            })?;
            config.request_timeout = Duration::from_secs(secs);
        }

        if let Ok(raw) = std::env::var("ATELIER_EDIT_REQUIRES_CATEGORY") {
            config.edit_requires_category = parse_flag(&raw).ok_or_else(|| {
                ClientError::Config(format!(
                    "ATELIER_EDIT_REQUIRES_CATEGORY must be true or false, got '{raw}'"
                ))
            })?;
        }

        if let Ok(raw) = std::env::var("ATELIER_IMAGE_ORDER") {
            config.image_order = raw
                .parse()
                .map_err(|e: atelier_core::error::CoreError| ClientError::Config(e.to_string()))?;
        }

        Ok(config)
    }

    /// Join a relative endpoint path onto the base URL.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_url, path.trim_start_matches('/'))
    }
}

fn normalize_base_url(url: String) -> String {
    url.trim().trim_end_matches('/').to_string()
}

fn default_token_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(TOKEN_DIR)
        .join(TOKEN_FILE)
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
