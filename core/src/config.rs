//! Runtime configuration: the API base URL and the public site URL.
//!
//! Values are read once at startup from the environment and never change
//! afterwards. In development a missing value falls back to a local default
//! and logs a warning; in production a missing value is an error.

use thiserror::Error;
use url::Url;

pub const API_BASE_VAR: &str = "SITE_API_BASE";
pub const SITE_URL_VAR: &str = "SITE_URL";
pub const ENV_VAR: &str = "SITE_ENV";

/// Local FastAPI backend used during development.
pub const DEV_API_BASE: &str = "http://127.0.0.1:8000";
/// Placeholder production domain used during development.
pub const DEV_SITE_URL: &str = "https://injustify.tera-in.top";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} is required in production")]
    Missing(&'static str),

    #[error("{var} is not an absolute http(s) URL: {value}")]
    InvalidUrl { var: &'static str, value: String },

    #[error("unknown SITE_ENV value: {0} (expected development or production)")]
    UnknownMode(String),
}

/// Deployment mode, selected by `SITE_ENV`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Development,
    Production,
}

impl Mode {
    fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "dev" | "development" => Ok(Mode::Development),
            "prod" | "production" => Ok(Mode::Production),
            _ => Err(ConfigError::UnknownMode(value.to_string())),
        }
    }
}

/// Immutable settings shared by the gateway and the metadata resolver.
///
/// Both URLs are absolute and stored without a trailing `/`, so endpoints
/// and route paths are appended by plain concatenation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    api_base: String,
    site_url: String,
}

impl RuntimeConfig {
    /// Build from explicit values. Both must be absolute http(s) URLs.
    pub fn new(api_base: &str, site_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            api_base: normalize(API_BASE_VAR, api_base)?,
            site_url: normalize(SITE_URL_VAR, site_url)?,
        })
    }

    /// Resolve from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve through an arbitrary key lookup.
    ///
    /// Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mode = match get(ENV_VAR) {
            Some(value) => Mode::parse(&value)?,
            None => Mode::default(),
        };

        let api_base = resolve(mode, API_BASE_VAR, get(API_BASE_VAR), DEV_API_BASE)?;
        let site_url = resolve(mode, SITE_URL_VAR, get(SITE_URL_VAR), DEV_SITE_URL)?;
        Self::new(&api_base, &site_url)
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    pub fn site_url(&self) -> &str {
        &self.site_url
    }
}

fn resolve(
    mode: Mode,
    var: &'static str,
    value: Option<String>,
    fallback: &str,
) -> Result<String, ConfigError> {
    match (value, mode) {
        (Some(value), _) => Ok(value),
        (None, Mode::Production) => Err(ConfigError::Missing(var)),
        (None, Mode::Development) => {
            tracing::warn!(
                var,
                fallback,
                "{var} not set, using development default; do not rely on this in production"
            );
            Ok(fallback.to_string())
        }
    }
}

fn normalize(var: &'static str, value: &str) -> Result<String, ConfigError> {
    let trimmed = value.trim().trim_end_matches('/');
    let invalid = || ConfigError::InvalidUrl {
        var,
        value: value.to_string(),
    };
    let parsed = Url::parse(trimmed).map_err(|_| invalid())?;
    if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
        return Err(invalid());
    }
    Ok(trimmed.to_string())
}
