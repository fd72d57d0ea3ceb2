//! Configuration module for environment variable parsing.
//!
//! All settings are read once at startup into an immutable [`Config`]. The
//! channel credentials are required; everything else has a default.

use std::env;
use std::fmt;
use std::time::Duration;

use thiserror::Error;
use tracing::level_filters::LevelFilter;
use url::Url;

/// Default database location, relative to the working directory.
pub const DEFAULT_DATABASE_URL: &str = "sqlite:///./game_bot.db";

/// Default LINE Messaging API origin.
pub const DEFAULT_LINE_API_BASE_URL: &str = "https://api.line.me";

/// Errors raised while loading configuration. All of them are fatal.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("required environment variable {0} is missing or empty")]
    Missing(&'static str),

    #[error("environment variable {name} has invalid value {value:?}: {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Application configuration loaded from environment variables.
#[derive(Clone)]
pub struct Config {
    /// LINE channel access token, used as the bearer token for replies
    pub channel_access_token: String,

    /// LINE channel secret, the HMAC key for webhook signatures
    pub channel_secret: String,

    /// Storage location handed to the ledger collaborator
    pub database_url: String,

    /// Enables human-readable logs and debug-level output
    pub debug_mode: bool,

    /// Log verbosity when `RUST_LOG` is not set
    pub log_level: LevelFilter,

    /// Deployment environment name (development, production, ...)
    pub environment: String,

    /// Port for the web server to listen on
    pub port: u16,

    /// Base URL of the LINE Messaging API
    pub line_api_base_url: Url,

    /// Timeout applied to outbound API calls
    pub api_timeout: Duration,
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let channel_access_token = required(&lookup, "CHANNEL_ACCESS_TOKEN")?;
        let channel_secret = required(&lookup, "CHANNEL_SECRET")?;

        let database_url = optional(&lookup, "DATABASE_URL")
            .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

        let debug_mode = match optional(&lookup, "DEBUG_MODE") {
            Some(raw) => parse_bool("DEBUG_MODE", &raw)?,
            None => false,
        };

        let log_level = match optional(&lookup, "LOG_LEVEL") {
            Some(raw) => parse_log_level(&raw)?,
            None => LevelFilter::INFO,
        };

        let environment =
            optional(&lookup, "ENVIRONMENT").unwrap_or_else(|| "development".to_string());

        let port = match optional(&lookup, "PORT") {
            Some(raw) => parse_number("PORT", &raw)?,
            None => 5000,
        };

        let line_api_base_url = {
            let raw = optional(&lookup, "LINE_API_BASE_URL")
                .unwrap_or_else(|| DEFAULT_LINE_API_BASE_URL.to_string());
            Url::parse(&raw).map_err(|e| ConfigError::Invalid {
                name: "LINE_API_BASE_URL",
                value: raw.clone(),
                reason: e.to_string(),
            })?
        };

        let api_timeout = match optional(&lookup, "API_TIMEOUT") {
            Some(raw) => Duration::from_secs(parse_number("API_TIMEOUT", &raw)?),
            None => Duration::from_secs(30),
        };

        Ok(Config {
            channel_access_token,
            channel_secret,
            database_url,
            debug_mode,
            log_level,
            environment,
            port,
            line_api_base_url,
            api_timeout,
        })
    }

    /// Whether both channel credentials are non-empty.
    pub fn line_credentials_present(&self) -> bool {
        !self.channel_access_token.trim().is_empty() && !self.channel_secret.trim().is_empty()
    }
}

// Secrets are reported by length only.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field(
                "channel_access_token",
                &format_args!("<{} bytes>", self.channel_access_token.len()),
            )
            .field(
                "channel_secret",
                &format_args!("<{} bytes>", self.channel_secret.len()),
            )
            .field("database_url", &self.database_url)
            .field("debug_mode", &self.debug_mode)
            .field("log_level", &self.log_level)
            .field("environment", &self.environment)
            .field("port", &self.port)
            .field("line_api_base_url", &self.line_api_base_url.as_str())
            .field("api_timeout", &self.api_timeout)
            .finish()
    }
}

/// Read a variable, treating blank values as absent.
fn optional<F>(lookup: &F, name: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn required<F>(lookup: &F, name: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    optional(lookup, name).ok_or(ConfigError::Missing(name))
}

fn parse_bool(name: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            name,
            value: raw.to_string(),
            reason: "expected a boolean".to_string(),
        }),
    }
}

fn parse_number<T>(name: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: fmt::Display,
{
    raw.parse().map_err(|e: T::Err| ConfigError::Invalid {
        name,
        value: raw.to_string(),
        reason: e.to_string(),
    })
}

/// Parse a log level, accepting the Python logging names used by existing
/// deployments (`WARNING`, `CRITICAL`).
fn parse_log_level(raw: &str) -> Result<LevelFilter, ConfigError> {
    match raw.to_ascii_lowercase().as_str() {
        "trace" => Ok(LevelFilter::TRACE),
        "debug" => Ok(LevelFilter::DEBUG),
        "info" => Ok(LevelFilter::INFO),
        "warn" | "warning" => Ok(LevelFilter::WARN),
        "error" | "critical" => Ok(LevelFilter::ERROR),
        "off" => Ok(LevelFilter::OFF),
        _ => Err(ConfigError::Invalid {
            name: "LOG_LEVEL",
            value: raw.to_string(),
            reason: "expected one of TRACE, DEBUG, INFO, WARNING, ERROR, CRITICAL, OFF"
                .to_string(),
        }),
    }
}
