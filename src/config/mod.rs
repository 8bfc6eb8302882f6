//! Configuration layer: typed settings with layered precedence (file → env).

use std::str::FromStr;
use std::time::Duration;

use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;
use tracing::level_filters::LevelFilter;

const LOCAL_CONFIG_BASENAME: &str = "rinfresco";
const ENV_PREFIX: &str = "RINFRESCO";

const DEFAULT_FRESHNESS_WINDOW_SECS: u64 = 300;
const DEFAULT_POLL_INTERVAL_SECS: u64 = 15;
const DEFAULT_DEBOUNCE_DELAY_MS: u64 = 400;
const DEFAULT_BACKGROUND_REFRESH_DELAY_MS: u64 = 250;
const DEFAULT_LISTING_LIMIT: usize = 64;

/// Fully validated application settings.
#[derive(Debug, Clone)]
pub struct Settings {
    pub logging: LoggingSettings,
    pub freshness: FreshnessSettings,
}

#[derive(Debug, Clone)]
pub struct LoggingSettings {
    pub level: LevelFilter,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy)]
pub enum LogFormat {
    Json,
    Compact,
}

/// Validated freshness settings consumed by the cache subsystem.
#[derive(Debug, Clone)]
pub struct FreshnessSettings {
    pub freshness_window: Duration,
    pub poll_interval: Duration,
    pub debounce_delay: Duration,
    pub background_refresh_delay: Duration,
    pub listing_limit: usize,
}

/// Errors raised while loading or validating settings.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read configuration: {0}")]
    Source(#[from] config::ConfigError),
    #[error("invalid configuration for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl LoadError {
    fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// Load settings using the configured precedence (file → environment).
pub fn load() -> Result<Settings, LoadError> {
    let raw: RawSettings = Config::builder()
        .add_source(File::with_name(LOCAL_CONFIG_BASENAME).required(false))
        .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"))
        .build()?
        .try_deserialize()?;

    Settings::from_raw(raw)
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSettings {
    logging: RawLoggingSettings,
    freshness: RawFreshnessSettings,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawLoggingSettings {
    level: Option<String>,
    json: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawFreshnessSettings {
    freshness_window_secs: Option<u64>,
    poll_interval_secs: Option<u64>,
    debounce_delay_ms: Option<u64>,
    background_refresh_delay_ms: Option<u64>,
    listing_limit: Option<usize>,
}

impl Settings {
    fn from_raw(raw: RawSettings) -> Result<Self, LoadError> {
        Ok(Self {
            logging: build_logging_settings(raw.logging)?,
            freshness: build_freshness_settings(raw.freshness)?,
        })
    }
}

fn build_logging_settings(logging: RawLoggingSettings) -> Result<LoggingSettings, LoadError> {
    let level = match logging.level {
        Some(level) => LevelFilter::from_str(level.as_str()).map_err(|err| {
            LoadError::invalid("logging.level", format!("failed to parse: {err}"))
        })?,
        None => LevelFilter::INFO,
    };

    let format = if logging.json.unwrap_or(false) {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };

    Ok(LoggingSettings { level, format })
}

fn build_freshness_settings(
    freshness: RawFreshnessSettings,
) -> Result<FreshnessSettings, LoadError> {
    let window_secs = freshness
        .freshness_window_secs
        .unwrap_or(DEFAULT_FRESHNESS_WINDOW_SECS);
    if window_secs == 0 {
        return Err(LoadError::invalid(
            "freshness.freshness_window_secs",
            "must be greater than zero",
        ));
    }

    let poll_secs = freshness
        .poll_interval_secs
        .unwrap_or(DEFAULT_POLL_INTERVAL_SECS);
    if poll_secs == 0 {
        return Err(LoadError::invalid(
            "freshness.poll_interval_secs",
            "must be greater than zero",
        ));
    }

    Ok(FreshnessSettings {
        freshness_window: Duration::from_secs(window_secs),
        poll_interval: Duration::from_secs(poll_secs),
        debounce_delay: Duration::from_millis(
            freshness.debounce_delay_ms.unwrap_or(DEFAULT_DEBOUNCE_DELAY_MS),
        ),
        background_refresh_delay: Duration::from_millis(
            freshness
                .background_refresh_delay_ms
                .unwrap_or(DEFAULT_BACKGROUND_REFRESH_DELAY_MS),
        ),
        listing_limit: freshness.listing_limit.unwrap_or(DEFAULT_LISTING_LIMIT),
    })
}
