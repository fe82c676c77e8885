use std::env;
use std::fmt;

use crate::evaluation::{EvaluationConfig, DEFAULT_EARLIEST_PUBLICATION_YEAR};

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

/// Top-level configuration for the evaluator.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub telemetry: TelemetryConfig,
    pub evaluation: EvaluationConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let earliest_publication_year = match env::var("NVI_EARLIEST_PUBLICATION_YEAR") {
            Ok(raw) => raw
                .trim()
                .parse::<i32>()
                .map_err(|_| ConfigError::InvalidYear { value: raw })?,
            Err(_) => DEFAULT_EARLIEST_PUBLICATION_YEAR,
        };

        Ok(Self {
            environment,
            telemetry: TelemetryConfig { log_level },
            evaluation: EvaluationConfig {
                earliest_publication_year,
                count_unverified_creator_shares: flag("NVI_COUNT_UNVERIFIED_CREATOR_SHARES")?,
                accept_academic_commentary: flag("NVI_ACCEPT_ACADEMIC_COMMENTARY")?,
            },
        })
    }
}

fn flag(name: &'static str) -> Result<bool, ConfigError> {
    let Ok(raw) = env::var(name) else {
        return Ok(false);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "" | "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidFlag { name, value: raw }),
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidYear { value: String },
    InvalidFlag { name: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidYear { value } => write!(
                f,
                "NVI_EARLIEST_PUBLICATION_YEAR must be a year, got '{}'",
                value
            ),
            ConfigError::InvalidFlag { name, value } => {
                write!(f, "{} must be true or false, got '{}'", name, value)
            }
        }
    }
}

impl std::error::Error for ConfigError {}
