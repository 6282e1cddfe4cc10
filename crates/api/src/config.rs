//! Process configuration, read from the environment.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use coffeeshop_auth::{Algorithm, AuthConfig};
use coffeeshop_observability::LogFormat;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value for {var}: {message}")]
    Invalid { var: &'static str, message: String },
}

impl ConfigError {
    fn invalid(var: &'static str, message: impl Into<String>) -> Self {
        Self::Invalid {
            var,
            message: message.into(),
        }
    }
}

/// Where the trusted signing keys come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JwksSource {
    /// Fetched once at startup.
    Url(String),
    /// Read from a local JWKS document.
    File(PathBuf),
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    /// `None` selects the in-memory store.
    pub database_url: Option<String>,
    pub reset_database: bool,
    pub auth: AuthConfig,
    pub jwks: JwksSource,
    pub request_timeout: Duration,
    pub log_format: LogFormat,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let bind_addr = var("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::invalid("BIND_ADDR", e.to_string()))?;

        let reset_database = match var("RESET_DATABASE") {
            Some(v) => parse_bool(&v).ok_or_else(|| {
                ConfigError::invalid("RESET_DATABASE", format!("expected a boolean, got `{v}`"))
            })?,
            None => false,
        };

        let domain = var("AUTH0_DOMAIN").map(|d| {
            d.trim_start_matches("https://")
                .trim_end_matches('/')
                .to_string()
        });

        let audience = var("API_AUDIENCE").ok_or(ConfigError::Missing("API_AUDIENCE"))?;

        let issuer = match (var("JWT_ISSUER"), &domain) {
            (Some(issuer), _) => issuer,
            (None, Some(domain)) => format!("https://{domain}/"),
            (None, None) => return Err(ConfigError::Missing("AUTH0_DOMAIN")),
        };

        let jwks = match (var("JWKS_PATH"), var("JWKS_URL"), &domain) {
            (Some(path), _, _) => JwksSource::File(PathBuf::from(path)),
            (None, Some(url), _) => JwksSource::Url(url),
            (None, None, Some(domain)) => {
                JwksSource::Url(format!("https://{domain}/.well-known/jwks.json"))
            }
            (None, None, None) => return Err(ConfigError::Missing("AUTH0_DOMAIN")),
        };

        let algorithms = match var("JWT_ALGORITHMS") {
            Some(list) => parse_algorithms(&list)?,
            None => vec![Algorithm::RS256],
        };

        let request_timeout = match var("REQUEST_TIMEOUT_SECS") {
            Some(v) => {
                let secs = v.parse::<u64>().map_err(|e| {
                    ConfigError::invalid("REQUEST_TIMEOUT_SECS", e.to_string())
                })?;
                if secs == 0 {
                    return Err(ConfigError::invalid(
                        "REQUEST_TIMEOUT_SECS",
                        "must be greater than zero",
                    ));
                }
                Duration::from_secs(secs)
            }
            None => Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        };

        let log_format = match var("LOG_FORMAT") {
            Some(v) => v
                .parse::<LogFormat>()
                .map_err(|e| ConfigError::invalid("LOG_FORMAT", e.to_string()))?,
            None => LogFormat::default(),
        };

        Ok(Self {
            bind_addr,
            database_url: var("DATABASE_URL"),
            reset_database,
            auth: AuthConfig::new(audience, issuer).with_algorithms(algorithms),
            jwks,
            request_timeout,
            log_format,
        })
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn parse_algorithms(list: &str) -> Result<Vec<Algorithm>, ConfigError> {
    let algorithms = list
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<Algorithm>()
                .map_err(|_| ConfigError::invalid("JWT_ALGORITHMS", format!("unknown algorithm `{s}`")))
        })
        .collect::<Result<Vec<_>, _>>()?;

    if algorithms.is_empty() {
        return Err(ConfigError::invalid("JWT_ALGORITHMS", "no algorithms listed"));
    }
    Ok(algorithms)
}
