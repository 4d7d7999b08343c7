//! Runtime configuration for Postboard clients.
//!
//! Values come from the process environment (a `.env` file is loaded by the
//! binary before this runs) with build-dependent defaults, mirroring the
//! per-flavor build config of the mobile app this layer backs.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::util::{is_http_url, normalize_text_option, parse_flag};

/// Public demo endpoint serving `/posts`
pub const DEFAULT_API_BASE_URL: &str = "https://jsonplaceholder.typicode.com";

const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;
const DATABASE_FILE_NAME: &str = "app_database.db";

const ENV_ENVIRONMENT: &str = "POSTBOARD_ENV";
const ENV_API_BASE_URL: &str = "POSTBOARD_API_BASE_URL";
const ENV_HTTP_TIMEOUT_SECS: &str = "POSTBOARD_HTTP_TIMEOUT_SECS";
const ENV_DB_PATH: &str = "POSTBOARD_DB_PATH";
const ENV_ENABLE_LOGGING: &str = "POSTBOARD_ENABLE_LOGGING";

/// Deployment flavor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    /// Flavor implied by the build profile
    pub const fn from_build() -> Self {
        if cfg!(debug_assertions) {
            Self::Development
        } else {
            Self::Production
        }
    }

    fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Some(Self::Development),
            "production" | "prod" => Some(Self::Production),
            _ => None,
        }
    }

    pub const fn is_development(self) -> bool {
        matches!(self, Self::Development)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => f.write_str("development"),
            Self::Production => f.write_str("production"),
        }
    }
}

/// Resolved client configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub environment: Environment,
    /// Base URL of the posts API, without a trailing slash
    pub api_base_url: String,
    /// Per-request HTTP timeout
    pub http_timeout: Duration,
    /// Location of the SQLite file backing the user store
    pub database_path: PathBuf,
    /// Gate for all log output
    pub enable_logging: bool,
}

impl AppConfig {
    /// Resolve configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve configuration through an arbitrary key lookup.
    ///
    /// Unset or blank keys fall back to defaults; malformed values are
    /// rejected with the offending key in the message.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let read = |key: &str| normalize_text_option(lookup(key));

        let environment = match read(ENV_ENVIRONMENT) {
            Some(raw) => Environment::parse(&raw).ok_or_else(|| {
                Error::Config(format!(
                    "{ENV_ENVIRONMENT} must be `development` or `production`, got `{raw}`"
                ))
            })?,
            None => Environment::from_build(),
        };

        let api_base_url = match read(ENV_API_BASE_URL) {
            Some(raw) => normalize_base_url(&raw)
                .map_err(|reason| Error::Config(format!("{ENV_API_BASE_URL} {reason}")))?,
            None => DEFAULT_API_BASE_URL.to_string(),
        };

        let http_timeout = match read(ENV_HTTP_TIMEOUT_SECS) {
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    return Err(Error::Config(format!(
                        "{ENV_HTTP_TIMEOUT_SECS} must be a positive number of seconds, got `{raw}`"
                    )))
                }
            },
            None => Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        };

        let database_path = read(ENV_DB_PATH).map_or_else(default_database_path, PathBuf::from);

        let enable_logging = match read(ENV_ENABLE_LOGGING) {
            Some(raw) => parse_flag(&raw).ok_or_else(|| {
                Error::Config(format!("{ENV_ENABLE_LOGGING} must be a boolean, got `{raw}`"))
            })?,
            None => environment.is_development(),
        };

        Ok(Self {
            environment,
            api_base_url,
            http_timeout,
            database_path,
            enable_logging,
        })
    }

    /// Override the API base URL (e.g. from a CLI flag)
    pub fn with_api_base_url(mut self, raw: &str) -> Result<Self> {
        self.api_base_url = normalize_base_url(raw).map_err(Error::Config)?;
        Ok(self)
    }

    /// Override the database location
    #[must_use]
    pub fn with_database_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.database_path = path.into();
        self
    }
}

/// Trim and validate an http(s) base URL, dropping any trailing slash.
pub fn normalize_base_url(raw: &str) -> std::result::Result<String, String> {
    let value = normalize_text_option(Some(raw.to_string()))
        .ok_or_else(|| "base URL must not be empty".to_string())?;
    if is_http_url(&value) {
        Ok(value.trim_end_matches('/').to_string())
    } else {
        Err(format!("base URL must include http:// or https://, got `{value}`"))
    }
}

/// Default database path under the platform data directory
pub fn default_database_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("postboard")
        .join(DATABASE_FILE_NAME)
}
