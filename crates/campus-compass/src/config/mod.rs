use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use crate::applications::DEFAULT_SUBMISSION_DELAY;
use crate::catalog::{CatalogLoadError, CatalogStore};
use crate::discovery::DEFAULT_SESSION_IDLE_TTL;

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

    pub fn label(self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Test => "test",
            Self::Production => "production",
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub catalog: CatalogConfig,
    pub submission: SubmissionConfig,
    pub sessions: SessionConfig,
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

        let catalog = CatalogConfig {
            dir: optional_path("APP_CATALOG_DIR"),
            universities_csv: optional_path("APP_UNIVERSITIES_CSV"),
            scholarships_csv: optional_path("APP_SCHOLARSHIPS_CSV"),
        };

        let delay = match env::var("APP_SUBMISSION_DELAY_MS") {
            Ok(raw) => raw
                .trim()
                .parse::<u64>()
                .map(Duration::from_millis)
                .map_err(|_| ConfigError::InvalidSubmissionDelay { value: raw })?,
            Err(_) => DEFAULT_SUBMISSION_DELAY,
        };

        let idle_ttl = match env::var("APP_SESSION_IDLE_SECS") {
            Ok(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .ok_or(ConfigError::InvalidSessionIdle { value: raw })?,
            Err(_) => DEFAULT_SESSION_IDLE_TTL,
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            catalog,
            submission: SubmissionConfig { delay },
            sessions: SessionConfig { idle_ttl },
        })
    }
}

fn optional_path(name: &str) -> Option<PathBuf> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
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

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Where the catalogs come from. Without a directory the fixtures compiled
/// into the crate are used; CSV exports replace their catalog on top of that.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogConfig {
    pub dir: Option<PathBuf>,
    pub universities_csv: Option<PathBuf>,
    pub scholarships_csv: Option<PathBuf>,
}

impl CatalogConfig {
    pub fn load_store(&self) -> Result<CatalogStore, CatalogLoadError> {
        let mut store = match &self.dir {
            Some(dir) => CatalogStore::from_dir(dir)?,
            None => CatalogStore::bundled()?,
        };

        if let Some(path) = &self.universities_csv {
            store = store.with_university_csv(path)?;
        }
        if let Some(path) = &self.scholarships_csv {
            store = store.with_scholarship_csv(path)?;
        }

        Ok(store)
    }
}

/// Behavior of the simulated submission executor.
#[derive(Debug, Clone, Copy)]
pub struct SubmissionConfig {
    pub delay: Duration,
}

impl Default for SubmissionConfig {
    fn default() -> Self {
        Self {
            delay: DEFAULT_SUBMISSION_DELAY,
        }
    }
}

/// Lifetime of browsing sessions that clients never close.
#[derive(Debug, Clone, Copy)]
pub struct SessionConfig {
    pub idle_ttl: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            idle_ttl: DEFAULT_SESSION_IDLE_TTL,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidSubmissionDelay { value: String },
    InvalidSessionIdle { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidSubmissionDelay { value } => write!(
                f,
                "APP_SUBMISSION_DELAY_MS must be a whole number of milliseconds, got '{value}'"
            ),
            ConfigError::InvalidSessionIdle { value } => write!(
                f,
                "APP_SESSION_IDLE_SECS must be a positive number of seconds, got '{value}'"
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort
            | ConfigError::InvalidSubmissionDelay { .. }
            | ConfigError::InvalidSessionIdle { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}
