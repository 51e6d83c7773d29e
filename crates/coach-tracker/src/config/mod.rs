use std::env;
use std::fmt;
use std::path::PathBuf;

use crate::coaching::TrendPolicyConfig;

/// Distinguishes runtime behavior for different stages of the tool.
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
    pub storage: StorageConfig,
    pub telemetry: TelemetryConfig,
    pub trend: TrendPolicyConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("COACH_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let data_dir = env::var("COACH_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("coach-data"));

        let log_level = env::var("COACH_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let defaults = TrendPolicyConfig::default();
        let window = parse_var("COACH_TREND_WINDOW", defaults.window)?;
        if window == 0 {
            return Err(ConfigError::Invalid {
                key: "COACH_TREND_WINDOW",
                value: "0".to_string(),
            });
        }
        let delta = parse_var("COACH_TREND_DELTA", defaults.improvement_delta)?;
        if !delta.is_finite() || delta < 0.0 {
            return Err(ConfigError::Invalid {
                key: "COACH_TREND_DELTA",
                value: delta.to_string(),
            });
        }
        let breakthrough_margin =
            parse_var("COACH_BREAKTHROUGH_MARGIN", defaults.breakthrough_margin)?;

        Ok(Self {
            environment,
            storage: StorageConfig { data_dir },
            telemetry: TelemetryConfig {
                log_level,
                ansi: environment == AppEnvironment::Development,
            },
            trend: TrendPolicyConfig {
                window,
                improvement_delta: delta,
                decline_delta: delta,
                breakthrough_margin,
                ..defaults
            },
        })
    }
}

fn parse_var<T: std::str::FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(raw) => raw.trim().parse::<T>().map_err(|_| ConfigError::Invalid {
            key,
            value: raw.clone(),
        }),
        Err(_) => Ok(default),
    }
}

/// Where the file-backed store keeps its JSON collections.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub ansi: bool,
}

#[derive(Debug)]
pub enum ConfigError {
    Invalid { key: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Invalid { key, value } => {
                write!(f, "{key} has an invalid value '{value}'")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
