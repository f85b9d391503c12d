// src/config.rs
use log::{info, warn};
use std::env;
use std::path::PathBuf;

pub const DEFAULT_BASE_URL: &str = "https://srwto-backend.onrender.com";
pub const DEFAULT_DOWNLOAD_DIR: &str = ".";

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base URL of the calculation service, without the endpoint path.
    pub base_url: String,
    /// Where the generated document is saved.
    pub download_dir: PathBuf,
}

impl AppConfig {
    pub fn new(base_url: impl Into<String>, download_dir: impl Into<PathBuf>) -> Self {
        AppConfig {
            base_url: base_url.into(),
            download_dir: download_dir.into(),
        }
    }

    /// Reads `SRWTO_BASE_URL` and `SRWTO_DOWNLOAD_DIR`, falling back to defaults.
    /// Call `dotenv().ok()` beforehand to pick up a `.env` file.
    pub fn from_env() -> Self {
        let base_url = env::var("SRWTO_BASE_URL").unwrap_or_else(|_| {
            warn!("$SRWTO_BASE_URL not set, defaulting to {}", DEFAULT_BASE_URL);
            DEFAULT_BASE_URL.to_string()
        });

        let download_dir = env::var("SRWTO_DOWNLOAD_DIR").unwrap_or_else(|_| {
            warn!("$SRWTO_DOWNLOAD_DIR not set, defaulting to {}", DEFAULT_DOWNLOAD_DIR);
            DEFAULT_DOWNLOAD_DIR.to_string()
        });

        info!("Using calculation service at {}", base_url);
        AppConfig::new(base_url, download_dir)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig::new(DEFAULT_BASE_URL, DEFAULT_DOWNLOAD_DIR)
    }
}
