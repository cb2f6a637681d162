//! Application configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `STOREKEEPER_API_URL` - Backend base URL (defaults to the production
//!   deployment)
//! - `STOREKEEPER_SESSION_FILE` - Path of the persisted session record
//!   (defaults to `<config dir>/storekeeper/session.json`)
//! - `STOREKEEPER_PLATFORM` - `device` to enforce the permission gate,
//!   `unenforced` (default) for hosts without a runtime permission model
//! - `IMGBB_API_KEY` - Image host API key; uploads fall back to the local
//!   image reference when unset
//! - `IMGBB_UPLOAD_URL` - Image host upload endpoint override

use std::path::PathBuf;

use secrecy::SecretString;
use thiserror::Error;

/// Default backend deployment. Overridable with `STOREKEEPER_API_URL`.
const DEFAULT_API_URL: &str = "https://products-api-production-124f.up.railway.app";

/// Default image host upload endpoint.
const DEFAULT_IMAGE_UPLOAD_URL: &str = "https://api.imgbb.com/1/upload";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("No platform config directory available for the session file")]
    NoConfigDir,
}

/// Whether the host enforces a runtime permission model.
///
/// Mobile targets gate app entry on camera/media-library/location grants;
/// browser-like and desktop targets have no such model and skip the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Platform {
    /// Capability grants are enforced; the permission gate runs.
    Device,
    /// No enforced permission model; the gate is bypassed.
    #[default]
    Unenforced,
}

impl std::str::FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "device" => Ok(Self::Device),
            "unenforced" | "web" => Ok(Self::Unenforced),
            other => Err(format!("unknown platform: {other}")),
        }
    }
}

/// Storekeeper application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Backend REST API base URL.
    pub api_base_url: String,
    /// Path of the single persisted session record.
    pub session_file: PathBuf,
    /// Host permission model.
    pub platform: Platform,
    /// Image host configuration.
    pub image_host: ImageHostConfig,
}

/// Image hosting service configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct ImageHostConfig {
    /// Upload endpoint.
    pub upload_url: String,
    /// API key; `None` means uploads degrade to the local image reference.
    pub api_key: Option<SecretString>,
}

impl std::fmt::Debug for ImageHostConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageHostConfig")
            .field("upload_url", &self.upload_url)
            .field(
                "api_key",
                &self.api_key.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from a `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but malformed, or if
    /// no config directory exists for the default session file path.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_base_url = get_env_or_default("STOREKEEPER_API_URL", DEFAULT_API_URL);
        url::Url::parse(&api_base_url).map_err(|e| {
            ConfigError::InvalidEnvVar("STOREKEEPER_API_URL".to_string(), e.to_string())
        })?;

        let session_file = match get_optional_env("STOREKEEPER_SESSION_FILE") {
            Some(path) => PathBuf::from(path),
            None => default_session_file()?,
        };

        let platform = get_env_or_default("STOREKEEPER_PLATFORM", "unenforced")
            .parse::<Platform>()
            .map_err(|e| ConfigError::InvalidEnvVar("STOREKEEPER_PLATFORM".to_string(), e))?;

        let image_host = ImageHostConfig {
            upload_url: get_env_or_default("IMGBB_UPLOAD_URL", DEFAULT_IMAGE_UPLOAD_URL),
            api_key: get_optional_env("IMGBB_API_KEY").map(SecretString::from),
        };

        Ok(Self {
            api_base_url,
            session_file,
            platform,
            image_host,
        })
    }
}

/// Default location of the persisted session record.
fn default_session_file() -> Result<PathBuf, ConfigError> {
    dirs::config_dir()
        .map(|dir| dir.join("storekeeper").join("session.json"))
        .ok_or(ConfigError::NoConfigDir)
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_parse() {
        assert_eq!("device".parse::<Platform>(), Ok(Platform::Device));
        assert_eq!("unenforced".parse::<Platform>(), Ok(Platform::Unenforced));
        assert_eq!("web".parse::<Platform>(), Ok(Platform::Unenforced));
        assert!("android".parse::<Platform>().is_err());
    }

    #[test]
    fn test_image_host_debug_redacts_key() {
        let config = ImageHostConfig {
            upload_url: DEFAULT_IMAGE_UPLOAD_URL.to_string(),
            api_key: Some(SecretString::from("super_secret_key".to_string())),
        };

        let debug_output = format!("{config:?}");
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super_secret_key"));
    }

    #[test]
    fn test_default_api_url_is_well_formed() {
        assert!(url::Url::parse(DEFAULT_API_URL).is_ok());
        assert!(url::Url::parse(DEFAULT_IMAGE_UPLOAD_URL).is_ok());
    }
}
