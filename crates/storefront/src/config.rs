//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `REGENESSA_BACKEND_URL` - Backend API base path
//!   (default: `http://localhost:5000/api`)
//! - `REGENESSA_STORAGE_DIR` - Durable client storage directory
//!   (default: `.regenessa`)

use std::path::PathBuf;

use thiserror::Error;

/// Default backend API base path for local development.
const DEFAULT_BACKEND_URL: &str = "http://localhost:5000/api";

/// Default durable storage directory.
const DEFAULT_STORAGE_DIR: &str = ".regenessa";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront client configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Backend API base path, without a trailing slash.
    pub backend_url: String,
    /// Directory backing the durable client store.
    pub storage_dir: PathBuf,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from a `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let backend_url = normalize_base_url(&get_env_or_default(
            "REGENESSA_BACKEND_URL",
            DEFAULT_BACKEND_URL,
        ));
        let storage_dir =
            PathBuf::from(get_env_or_default("REGENESSA_STORAGE_DIR", DEFAULT_STORAGE_DIR));

        Ok(Self {
            backend_url,
            storage_dir,
        })
    }

    /// Build a configuration pointing at an explicit backend, for tests
    /// and embedded use.
    #[must_use]
    pub fn with_backend(backend_url: &str, storage_dir: impl Into<PathBuf>) -> Self {
        Self {
            backend_url: normalize_base_url(backend_url),
            storage_dir: storage_dir.into(),
        }
    }
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Strip trailing slashes so endpoint paths can be joined with `/`.
fn normalize_base_url(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}
