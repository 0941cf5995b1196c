//! Configuration module for the PawPost backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} has an invalid value {value:?}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Where saved templates are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateBackend {
    Sqlite,
    Memory,
}

impl FromStr for TemplateBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sqlite" => Ok(TemplateBackend::Sqlite),
            "memory" => Ok(TemplateBackend::Memory),
            _ => Err("expected `sqlite` or `memory`".to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            _ => Err("expected `pretty` or `json`".to_string()),
        }
    }
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Pre-shared key for API authentication (required in production)
    pub api_psk: Option<String>,
    /// Path to SQLite database file
    pub db_path: PathBuf,
    /// Directory that receives uploaded evidence files
    pub upload_dir: PathBuf,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    pub log_format: LogFormat,
    /// Largest accepted evidence upload, in bytes
    pub max_upload_bytes: usize,
    pub template_backend: TemplateBackend,
}

impl Config {
    /// Load configuration from environment variables, reading `.env` first.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let api_psk = lookup("PAWPOST_API_PSK").filter(|psk| !psk.is_empty());
        let db_path = var("PAWPOST_DB_PATH", "./data/pawpost.sqlite").into();
        let upload_dir = var("PAWPOST_UPLOAD_DIR", "./data/uploads").into();
        let bind_addr = parse("PAWPOST_BIND_ADDR", var("PAWPOST_BIND_ADDR", "127.0.0.1:8080"))?;
        let log_level = var("PAWPOST_LOG_LEVEL", "info");
        let log_format = parse("PAWPOST_LOG_FORMAT", var("PAWPOST_LOG_FORMAT", "pretty"))?;
        let max_upload_bytes = parse(
            "PAWPOST_MAX_UPLOAD_BYTES",
            var("PAWPOST_MAX_UPLOAD_BYTES", &DEFAULT_MAX_UPLOAD_BYTES.to_string()),
        )?;
        let template_backend =
            parse("PAWPOST_TEMPLATE_STORE", var("PAWPOST_TEMPLATE_STORE", "sqlite"))?;

        Ok(Self {
            api_psk,
            db_path,
            upload_dir,
            bind_addr,
            log_level,
            log_format,
            max_upload_bytes,
            template_backend,
        })
    }
}

fn parse<T>(var: &'static str, value: String) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        var,
        reason: e.to_string(),
        value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_default_config() {
        let config = config_from(&[]).unwrap();

        assert!(config.api_psk.is_none());
        assert_eq!(config.db_path, PathBuf::from("./data/pawpost.sqlite"));
        assert_eq!(config.upload_dir, PathBuf::from("./data/uploads"));
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:8080");
        assert_eq!(config.log_level, "info");
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert_eq!(config.max_upload_bytes, 10_485_760);
        assert_eq!(config.template_backend, TemplateBackend::Sqlite);
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("PAWPOST_API_PSK", "secret"),
            ("PAWPOST_LOG_FORMAT", "JSON"),
            ("PAWPOST_MAX_UPLOAD_BYTES", "2048"),
            ("PAWPOST_TEMPLATE_STORE", "memory"),
        ])
        .unwrap();

        assert_eq!(config.api_psk.as_deref(), Some("secret"));
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.max_upload_bytes, 2048);
        assert_eq!(config.template_backend, TemplateBackend::Memory);
    }

    #[test]
    fn test_invalid_values_are_errors() {
        let err = config_from(&[("PAWPOST_BIND_ADDR", "not-an-address")]).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                var: "PAWPOST_BIND_ADDR",
                ..
            }
        ));

        let err = config_from(&[("PAWPOST_MAX_UPLOAD_BYTES", "ten")]).unwrap_err();
        assert!(err.to_string().starts_with("PAWPOST_MAX_UPLOAD_BYTES"));

        assert!(config_from(&[("PAWPOST_TEMPLATE_STORE", "redis")]).is_err());
    }

    #[test]
    fn test_empty_psk_means_open() {
        let config = config_from(&[("PAWPOST_API_PSK", "")]).unwrap();
        assert!(config.api_psk.is_none());
    }
}
