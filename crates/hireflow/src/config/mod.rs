use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use crate::workflows::recruiting::applications::config::{
    LifecycleConfig, DEFAULT_BACKGROUND_WORKERS, DEFAULT_GATEWAY_TIMEOUT, DEFAULT_JOIN_BASE_URL,
    DEFAULT_WRITE_RETRIES,
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
    pub lifecycle: LifecycleConfig,
    pub integrations: IntegrationConfig,
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
            lifecycle: load_lifecycle()?,
            integrations: IntegrationConfig {
                cv_service_url: optional("CV_SERVICE_URL"),
                room_service_url: optional("ROOM_SERVICE_URL"),
                messaging_webhook_url: optional("MESSAGING_WEBHOOK_URL"),
                api_key: optional("INTEGRATION_API_KEY"),
            },
        })
    }
}

fn optional(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn positive<T>(key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr + PartialOrd + Default,
{
    match optional(key) {
        None => Ok(default),
        Some(raw) => match raw.parse::<T>() {
            Ok(value) if value > T::default() => Ok(value),
            _ => Err(ConfigError::InvalidNumber { key, value: raw }),
        },
    }
}

fn load_lifecycle() -> Result<LifecycleConfig, ConfigError> {
    let timeout_ms = positive::<u64>(
        "APP_GATEWAY_TIMEOUT_MS",
        DEFAULT_GATEWAY_TIMEOUT.as_millis() as u64,
    )?;
    let background_workers =
        positive::<usize>("APP_BACKGROUND_WORKERS", DEFAULT_BACKGROUND_WORKERS)?;
    let write_retries = match optional("APP_WRITE_RETRIES") {
        None => DEFAULT_WRITE_RETRIES,
        Some(raw) => raw.parse::<u32>().map_err(|_| ConfigError::InvalidNumber {
            key: "APP_WRITE_RETRIES",
            value: raw,
        })?,
    };
    let join_base_url =
        optional("APP_JOIN_BASE_URL").unwrap_or_else(|| DEFAULT_JOIN_BASE_URL.to_string());
    if !join_base_url.starts_with("http://") && !join_base_url.starts_with("https://") {
        return Err(ConfigError::InvalidUrl {
            key: "APP_JOIN_BASE_URL",
            value: join_base_url,
        });
    }

    Ok(LifecycleConfig {
        gateway_timeout: Duration::from_millis(timeout_ms),
        background_workers,
        write_retries,
        join_base_url,
    })
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

/// Endpoints of the external systems. Unset ones fall back to in-process collaborators.
#[derive(Clone, Default)]
pub struct IntegrationConfig {
    pub cv_service_url: Option<String>,
    pub room_service_url: Option<String>,
    pub messaging_webhook_url: Option<String>,
    pub api_key: Option<String>,
}

impl fmt::Debug for IntegrationConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntegrationConfig")
            .field("cv_service_url", &self.cv_service_url)
            .field("room_service_url", &self.room_service_url)
            .field("messaging_webhook_url", &self.messaging_webhook_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidNumber { key: &'static str, value: String },
    InvalidUrl { key: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidNumber { key, value } => {
                write!(f, "{key} must be a positive integer, got '{value}'")
            }
            ConfigError::InvalidUrl { key, value } => {
                write!(f, "{key} must be an absolute http(s) URL, got '{value}'")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidNumber { .. }
            | ConfigError::InvalidUrl { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        for key in [
            "APP_ENV",
            "APP_HOST",
            "APP_PORT",
            "APP_LOG_LEVEL",
            "APP_GATEWAY_TIMEOUT_MS",
            "APP_BACKGROUND_WORKERS",
            "APP_WRITE_RETRIES",
            "APP_JOIN_BASE_URL",
            "CV_SERVICE_URL",
            "ROOM_SERVICE_URL",
            "MESSAGING_WEBHOOK_URL",
            "INTEGRATION_API_KEY",
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.lifecycle, LifecycleConfig::default());
        assert!(config.integrations.cv_service_url.is_none());
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
    }

    #[test]
    fn lifecycle_settings_come_from_env() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_GATEWAY_TIMEOUT_MS", "250");
        env::set_var("APP_BACKGROUND_WORKERS", "4");
        env::set_var("APP_WRITE_RETRIES", "0");
        env::set_var("APP_JOIN_BASE_URL", "https://jobs.example.com/join");
        env::set_var("INTEGRATION_API_KEY", "top-secret");

        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.lifecycle.gateway_timeout, Duration::from_millis(250));
        assert_eq!(config.lifecycle.background_workers, 4);
        assert_eq!(config.lifecycle.write_retries, 0);
        assert_eq!(config.lifecycle.join_base_url, "https://jobs.example.com/join");
        assert!(!format!("{:?}", config.integrations).contains("top-secret"));
        reset_env();
    }

    #[test]
    fn rejects_zero_timeout() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_GATEWAY_TIMEOUT_MS", "0");
        let err = AppConfig::load().expect_err("zero timeout rejected");
        assert!(matches!(
            err,
            ConfigError::InvalidNumber {
                key: "APP_GATEWAY_TIMEOUT_MS",
                ..
            }
        ));
        reset_env();
    }
}
