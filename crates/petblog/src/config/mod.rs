use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use crate::workflows::diagnosis::{
    EngineConfig, EngineConfigError, RequiredSymptomPolicy, DEFAULT_MIN_QUESTIONS,
    DEFAULT_RESULT_LIMIT, DEFAULT_STOP_THRESHOLD,
};

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub diagnosis: DiagnosisConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            diagnosis: DiagnosisConfig::from_env()?,
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Interview dials and catalog location for the diagnosis workflow.
#[derive(Debug, Clone, Default)]
pub struct DiagnosisConfig {
    pub engine: EngineConfig,
    /// Directory holding the catalog CSV files; the bundled sample is used when unset.
    pub catalog_dir: Option<PathBuf>,
}

impl DiagnosisConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let min_questions = parse_var("DIAGNOSIS_MIN_QUESTIONS", DEFAULT_MIN_QUESTIONS)?;
        let stop_threshold = parse_var("DIAGNOSIS_STOP_THRESHOLD", DEFAULT_STOP_THRESHOLD)?;
        let result_limit = parse_var("DIAGNOSIS_RESULT_LIMIT", DEFAULT_RESULT_LIMIT)?;
        let required_symptoms = if parse_flag("DIAGNOSIS_ENFORCE_REQUIRED")? {
            RequiredSymptomPolicy::Enforce
        } else {
            RequiredSymptomPolicy::Informational
        };
        let catalog_dir = env::var("DIAGNOSIS_CATALOG_DIR")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);

        let engine = EngineConfig {
            min_questions,
            stop_threshold,
            result_limit,
            required_symptoms,
        };
        engine.validate()?;

        Ok(Self {
            engine,
            catalog_dir,
        })
    }
}

fn parse_var<T: std::str::FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::InvalidNumber { key, value: raw }),
        _ => Ok(default),
    }
}

fn parse_flag(key: &'static str) -> Result<bool, ConfigError> {
    let raw = env::var(key).unwrap_or_default();
    match raw.trim().to_ascii_lowercase().as_str() {
        "" | "0" | "false" | "no" | "off" => Ok(false),
        "1" | "true" | "yes" | "on" => Ok(true),
        _ => Err(ConfigError::InvalidFlag { key, value: raw }),
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidNumber { key: &'static str, value: String },
    InvalidFlag { key: &'static str, value: String },
    Diagnosis(EngineConfigError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidNumber { key, value } => {
                write!(f, "{} must be numeric (found '{}')", key, value)
            }
            ConfigError::InvalidFlag { key, value } => {
                write!(f, "{} must be a boolean flag (found '{}')", key, value)
            }
            ConfigError::Diagnosis(err) => write!(f, "invalid diagnosis settings: {}", err),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort
            | ConfigError::InvalidNumber { .. }
            | ConfigError::InvalidFlag { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::Diagnosis(err) => Some(err),
        }
    }
}

impl From<EngineConfigError> for ConfigError {
    fn from(value: EngineConfigError) -> Self {
        Self::Diagnosis(value)
    }
}
