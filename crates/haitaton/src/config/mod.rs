use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

use crate::disruption::{ClassificationConfig, StreetClass, VolumeRadius};
use crate::hanke::DEFAULT_TUNNUS_PREFIX;

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
    pub hanke: HankeConfig,
    pub classification: ClassificationConfig,
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

        let tunnus_prefix = env::var("HAITATON_TUNNUS_PREFIX")
            .map(|prefix| prefix.trim().to_string())
            .unwrap_or_else(|_| DEFAULT_TUNNUS_PREFIX.to_string());
        if tunnus_prefix.is_empty() {
            return Err(ConfigError::EmptyTunnusPrefix);
        }

        let classification = classification_from_env()?;

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            hanke: HankeConfig { tunnus_prefix },
            classification,
        })
    }
}

fn classification_from_env() -> Result<ClassificationConfig, ConfigError> {
    let mut config = ClassificationConfig::default();

    if let Ok(raw) = env::var("HAITATON_VOLUME_RADII") {
        config = config.with_radii(parse_radii(&raw)?);
    }

    if let Ok(raw) = env::var("HAITATON_WIDE_RADIUS_FROM_CLASS") {
        config.wide_radius_from = raw
            .trim()
            .parse::<u8>()
            .ok()
            .and_then(StreetClass::from_value)
            .ok_or(ConfigError::InvalidStreetClass { value: raw })?;
    }

    Ok(config)
}

fn parse_radii(raw: &str) -> Result<Vec<VolumeRadius>, ConfigError> {
    let radii = raw
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| match part.parse::<u32>() {
            Ok(radius) if radius > 0 => Ok(VolumeRadius(radius)),
            _ => Err(ConfigError::InvalidVolumeRadii {
                value: raw.to_string(),
            }),
        })
        .collect::<Result<Vec<_>, _>>()?;

    if radii.is_empty() {
        return Err(ConfigError::InvalidVolumeRadii {
            value: raw.to_string(),
        });
    }
    Ok(radii)
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

/// Hanke record settings.
#[derive(Debug, Clone)]
pub struct HankeConfig {
    pub tunnus_prefix: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    EmptyTunnusPrefix,
    InvalidVolumeRadii { value: String },
    InvalidStreetClass { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::EmptyTunnusPrefix => {
                write!(f, "HAITATON_TUNNUS_PREFIX must not be empty")
            }
            ConfigError::InvalidVolumeRadii { value } => write!(
                f,
                "HAITATON_VOLUME_RADII must be a comma separated list of positive metres, got '{value}'"
            ),
            ConfigError::InvalidStreetClass { value } => write!(
                f,
                "HAITATON_WIDE_RADIUS_FROM_CLASS must be a street class 1-5, got '{value}'"
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::EmptyTunnusPrefix
            | ConfigError::InvalidVolumeRadii { .. }
            | ConfigError::InvalidStreetClass { .. } => None,
        }
    }
}
