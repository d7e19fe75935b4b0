use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use crate::session::{StorageBackendKind, DEFAULT_SESSION_KEY};

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

/// Execution environment the host runs in; decides the default session backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Native,
    Web,
}

impl Platform {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "native" | "ios" | "android" | "desktop" => Some(Self::Native),
            "web" | "browser" => Some(Self::Web),
            _ => None,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub platform: Platform,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub session: SessionConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let platform = match env::var("APP_PLATFORM") {
            Ok(raw) => Platform::parse(&raw).ok_or(ConfigError::InvalidPlatform(raw))?,
            Err(_) => Platform::Native,
        };

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let backend = match env::var("APP_SESSION_BACKEND") {
            Ok(raw) => StorageBackendKind::parse(&raw).ok_or(ConfigError::InvalidBackend(raw))?,
            Err(_) => StorageBackendKind::for_platform(platform),
        };
        let directory = env::var("APP_SESSION_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(".route-gate"));
        let key = env::var("APP_SESSION_KEY").unwrap_or_else(|_| DEFAULT_SESSION_KEY.to_string());
        if key.trim().is_empty() {
            return Err(ConfigError::EmptySessionKey);
        }

        Ok(Self {
            environment,
            platform,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            session: SessionConfig {
                backend,
                directory,
                key,
            },
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

/// Where and how the session token is persisted.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub backend: StorageBackendKind,
    pub directory: PathBuf,
    pub key: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackendKind::for_platform(Platform::Native),
            directory: PathBuf::from(".route-gate"),
            key: DEFAULT_SESSION_KEY.to_string(),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidPlatform(String),
    InvalidBackend(String),
    EmptySessionKey,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidPlatform(value) => {
                write!(f, "APP_PLATFORM must be 'native' or 'web' (got '{value}')")
            }
            ConfigError::InvalidBackend(value) => write!(
                f,
                "APP_SESSION_BACKEND must be 'secure', 'fallback' or 'memory' (got '{value}')"
            ),
            ConfigError::EmptySessionKey => write!(f, "APP_SESSION_KEY must not be empty"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidPlatform(_)
            | ConfigError::InvalidBackend(_)
            | ConfigError::EmptySessionKey => None,
        }
    }
}
