use std::net::IpAddr;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

/// Prefix under which every JSON endpoint is mounted.
pub const API_PREFIX: &str = "/api";

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_FRONTEND_DIST: &str = "frontend/dist";
const DEFAULT_BODY_LIMIT: usize = 1024 * 1024;
const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

impl ConfigError {
    fn invalid(key: &'static str, value: &str, reason: impl ToString) -> Self {
        Self::Invalid {
            key,
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Deployment mode selected by `APP_ENV`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeploymentMode {
    #[default]
    Development,
    Production,
}

impl FromStr for DeploymentMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" | "test" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            other => Err(format!("unknown deployment mode `{other}`")),
        }
    }
}

/// # Process Configuration
///
/// Read once at startup and shared read-only with every worker through
/// `web::Data`. Handlers never consult the environment themselves.
///
/// ## Environment
/// - `APP_ENV`: `development` (default) or `production`
/// - `HOST` / `PORT`: bind address, `0.0.0.0:3000` by default
/// - `FRONTEND_DIST`: built SPA bundle, `frontend/dist` by default
/// - `JSON_PRETTY`: pretty-print JSON responses, `true` by default
/// - `BODY_LIMIT`: largest JSON request body in bytes, 1 MiB by default
/// - `LOG_LEVEL`: log filter used when `RUST_LOG` is unset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub mode: DeploymentMode,
    pub host: IpAddr,
    pub port: u16,
    pub frontend_dist: PathBuf,
    pub json_pretty: bool,
    pub body_limit: usize,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mode: DeploymentMode::default(),
            host: IpAddr::from([0, 0, 0, 0]),
            port: DEFAULT_PORT,
            frontend_dist: PathBuf::from(DEFAULT_FRONTEND_DIST),
            json_pretty: true,
            body_limit: DEFAULT_BODY_LIMIT,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup. Unset or blank
    /// keys fall back to their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let mode = match get("APP_ENV") {
            Some(v) => v
                .parse()
                .map_err(|e: String| ConfigError::invalid("APP_ENV", &v, e))?,
            None => DeploymentMode::default(),
        };

        let host = get("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let host = host
            .trim()
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::invalid("HOST", &host, e))?;

        let port = match get("PORT") {
            Some(v) => v
                .trim()
                .parse::<u16>()
                .map_err(|e| ConfigError::invalid("PORT", &v, e))?,
            None => DEFAULT_PORT,
        };

        let json_pretty = match get("JSON_PRETTY") {
            Some(v) => parse_bool(&v).ok_or_else(|| {
                ConfigError::invalid("JSON_PRETTY", &v, "expected true or false")
            })?,
            None => true,
        };

        let body_limit = match get("BODY_LIMIT") {
            Some(v) => match v.trim().parse::<usize>() {
                Ok(0) => return Err(ConfigError::invalid("BODY_LIMIT", &v, "must be positive")),
                Ok(limit) => limit,
                Err(e) => return Err(ConfigError::invalid("BODY_LIMIT", &v, e)),
            },
            None => DEFAULT_BODY_LIMIT,
        };

        Ok(Self {
            mode,
            host,
            port,
            frontend_dist: get("FRONTEND_DIST")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_FRONTEND_DIST)),
            json_pretty,
            body_limit,
            log_level: get("LOG_LEVEL").unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
        })
    }

    pub fn is_production(&self) -> bool {
        self.mode == DeploymentMode::Production
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
