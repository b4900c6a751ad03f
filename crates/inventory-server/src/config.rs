//! Server configuration from environment variables.

use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use rand::{Rng, distributions::Alphanumeric};

/// Low-stock threshold used when none is configured.
pub const DEFAULT_MIN_QUANTITY: i64 = 10;

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines.
    Text,
    /// One JSON object per event.
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" | "pretty" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("expected 'text' or 'json', got '{}'", other)),
        }
    }
}

/// Server configuration.
#[derive(Clone)]
pub struct ServerConfig {
    /// Server port to listen on.
    pub port: u16,
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
    /// Log output format.
    pub log_format: LogFormat,
    /// CORS allowed origins (comma-separated or "*" for all).
    pub cors_allowed_origins: String,
    /// HMAC secret for session tokens.
    pub jwt_secret: String,
    /// Set when `jwt_secret` was generated because none was configured.
    pub jwt_secret_generated: bool,
    /// Session lifetime in hours.
    pub session_expiry_hours: u64,
    /// Mark the session cookie `Secure`.
    pub cookie_secure: bool,
    /// Require a session for the item and dashboard endpoints.
    pub auth_required: bool,
    /// Threshold for the low-stock count.
    pub min_quantity: i64,
    /// Directory holding the HTML pages.
    pub static_dir: PathBuf,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// All optional:
    /// - `PORT`: Server port (default: 3000)
    /// - `LOG_LEVEL`: Logging level (default: "info")
    /// - `LOG_FORMAT`: "text" or "json" (default: "text")
    /// - `CORS_ALLOWED_ORIGINS`: Allowed CORS origins (default: "*")
    /// - `JWT_SECRET`: Session signing key (default: random per process)
    /// - `SESSION_EXPIRY_HOURS`: Session lifetime (default: 24)
    /// - `COOKIE_SECURE`: Secure cookie flag (default: false)
    /// - `AUTH_REQUIRED`: Gate item endpoints behind login (default: true)
    /// - `MIN_QUANTITY`: Low-stock threshold (default: 10)
    /// - `STATIC_DIR`: HTML page directory (default: "public")
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`ServerConfig::from_env`] with a custom variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port = parse_or(&lookup, "PORT", 3000)?;
        let log_level = lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string());
        let log_format = parse_or(&lookup, "LOG_FORMAT", LogFormat::Text)?;
        let cors_allowed_origins =
            lookup("CORS_ALLOWED_ORIGINS").unwrap_or_else(|| "*".to_string());

        let (jwt_secret, jwt_secret_generated) = match lookup("JWT_SECRET") {
            Some(secret) if !secret.is_empty() => (secret, false),
            _ => (generate_secret(), true),
        };

        let session_expiry_hours = parse_or(&lookup, "SESSION_EXPIRY_HOURS", 24)?;
        let cookie_secure = parse_flag(&lookup, "COOKIE_SECURE", false)?;
        let auth_required = parse_flag(&lookup, "AUTH_REQUIRED", true)?;
        let min_quantity = parse_or(&lookup, "MIN_QUANTITY", DEFAULT_MIN_QUANTITY)?;
        let static_dir = lookup("STATIC_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("public"));

        Ok(Self {
            port,
            log_level,
            log_format,
            cors_allowed_origins,
            jwt_secret,
            jwt_secret_generated,
            session_expiry_hours,
            cookie_secure,
            auth_required,
            min_quantity,
            static_dir,
        })
    }

    /// Get the socket address for the server.
    pub fn socket_addr(&self) -> std::net::SocketAddr {
        std::net::SocketAddr::from(([0, 0, 0, 0], self.port))
    }
}

impl fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerConfig")
            .field("port", &self.port)
            .field("log_level", &self.log_level)
            .field("log_format", &self.log_format)
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .field("jwt_secret", &"<redacted>")
            .field("session_expiry_hours", &self.session_expiry_hours)
            .field("cookie_secure", &self.cookie_secure)
            .field("auth_required", &self.auth_required)
            .field("min_quantity", &self.min_quantity)
            .field("static_dir", &self.static_dir)
            .finish()
    }
}

fn parse_or<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match lookup(name) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
            name: name.to_string(),
            reason: e.to_string(),
        }),
        None => Ok(default),
    }
}

fn parse_flag(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    default: bool,
) -> Result<bool, ConfigError> {
    match lookup(name).map(|raw| raw.trim().to_lowercase()) {
        None => Ok(default),
        Some(raw) => match raw.as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::InvalidValue {
                name: name.to_string(),
                reason: format!("expected a boolean, got '{}'", raw),
            }),
        },
    }
}

fn generate_secret() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(48)
        .map(char::from)
        .collect()
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Invalid environment variable value.
    #[error("invalid value for environment variable {name}: {reason}")]
    InvalidValue { name: String, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_values() {
        let config = ServerConfig::from_lookup(lookup(&[])).unwrap();

        assert_eq!(config.port, 3000);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.log_format, LogFormat::Text);
        assert_eq!(config.cors_allowed_origins, "*");
        assert_eq!(config.session_expiry_hours, 24);
        assert!(!config.cookie_secure);
        assert!(config.auth_required);
        assert_eq!(config.min_quantity, DEFAULT_MIN_QUANTITY);
        assert_eq!(config.static_dir, PathBuf::from("public"));
        assert!(config.jwt_secret_generated);
        assert_eq!(config.jwt_secret.len(), 48);
    }

    #[test]
    fn test_overrides() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("PORT", "8080"),
            ("LOG_FORMAT", "json"),
            ("JWT_SECRET", "s3cret"),
            ("AUTH_REQUIRED", "false"),
            ("COOKIE_SECURE", "yes"),
            ("MIN_QUANTITY", "25"),
            ("STATIC_DIR", "/srv/pages"),
        ]))
        .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.jwt_secret, "s3cret");
        assert!(!config.jwt_secret_generated);
        assert!(!config.auth_required);
        assert!(config.cookie_secure);
        assert_eq!(config.min_quantity, 25);
        assert_eq!(config.static_dir, PathBuf::from("/srv/pages"));
    }

    #[test]
    fn test_invalid_port_is_an_error() {
        let err = ServerConfig::from_lookup(lookup(&[("PORT", "eighty")])).unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }

    #[test]
    fn test_invalid_flag_is_an_error() {
        let err = ServerConfig::from_lookup(lookup(&[("AUTH_REQUIRED", "maybe")])).unwrap_err();
        assert!(err.to_string().contains("AUTH_REQUIRED"));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config = ServerConfig::from_lookup(lookup(&[("JWT_SECRET", "hunter2")])).unwrap();
        let debug = format!("{:?}", config);
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("<redacted>"));
    }
}
