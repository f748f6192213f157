use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

pub mod clearing;
pub use clearing::ClearingConfig;

/// Output format for the tracing subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Pretty,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "pretty" | "text" => Ok(LogFormat::Pretty),
            other => Err(format!("unknown log format: {}", other)),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => write!(f, "json"),
            Self::Pretty => write!(f, "pretty"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub environment: String,
    pub log_level: String,
    pub log_format: LogFormat,
    pub clearing: ClearingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            clearing: ClearingConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from the environment (and `.env` if present).
    ///
    /// `init_logging` receives the log level and format before any other
    /// section is read, so warnings about bad values reach the subscriber.
    pub fn from_env<I>(init_logging: I) -> Result<Self>
    where
        I: FnOnce(&str, LogFormat),
    {
        dotenvy::dotenv().ok(); // Load .env file if it exists

        Self::load_with(|key| std::env::var(key).ok(), init_logging)
    }

    pub fn load_with<F, I>(lookup: F, init_logging: I) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
        I: FnOnce(&str, LogFormat),
    {
        let (log_level, log_format) = Self::logging_from_lookup(&lookup);
        init_logging(&log_level, log_format);

        Self::from_lookup(lookup)
    }

    /// Log level and format only; invalid values fall back silently here and
    /// are reported by [`Config::from_lookup`]
    pub fn logging_from_lookup<F>(lookup: F) -> (String, LogFormat)
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let log_format = lookup("LOG_FORMAT")
            .and_then(|val| val.parse().ok())
            .unwrap_or(defaults.log_format);

        (lookup("LOG_LEVEL").unwrap_or(defaults.log_level), log_format)
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let log_format = match lookup("LOG_FORMAT") {
            Some(val) => val.parse().unwrap_or_else(|e| {
                warn!("{}, using {}", e, defaults.log_format);
                defaults.log_format
            }),
            None => defaults.log_format,
        };

        Ok(Config {
            environment: lookup("ENVIRONMENT").unwrap_or(defaults.environment),
            log_level: lookup("LOG_LEVEL").unwrap_or(defaults.log_level),
            log_format,
            clearing: ClearingConfig::from_lookup(&lookup)?,
        })
    }
}
