//! Tracing and metrics bootstrap.

use std::sync::Once;

use metrics::{Unit, describe_counter};
use thiserror::Error;
use tracing_error::ErrorLayer;
use tracing_subscriber::{
    EnvFilter, fmt,
    layer::{Layer, SubscriberExt},
    util::SubscriberInitExt,
};

use crate::config::{LogFormat, LoggingSettings};

static METRIC_DESCRIPTIONS: Once = Once::new();

/// Failure to install the global tracing subscriber.
#[derive(Debug, Error)]
#[error("failed to install tracing subscriber: {0}")]
pub struct TelemetryError(String);

/// Install a global tracing subscriber using the provided logging settings.
pub fn init(logging: &LoggingSettings) -> Result<(), TelemetryError> {
    describe_metrics();

    let env_filter = EnvFilter::builder()
        .with_default_directive(logging.level.into())
        .from_env_lossy();

    let fmt_layer = match logging.format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .with_target(true)
            .boxed(),
        LogFormat::Compact => fmt::layer().compact().with_target(true).boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(ErrorLayer::default())
        .with(fmt_layer)
        .try_init()
        .map_err(|err| TelemetryError(err.to_string()))
}

fn describe_metrics() {
    METRIC_DESCRIPTIONS.call_once(|| {
        describe_counter!(
            "rinfresco_listing_hit_total",
            Unit::Count,
            "Total number of fresh listing-cache hits."
        );
        describe_counter!(
            "rinfresco_listing_miss_total",
            Unit::Count,
            "Total number of listing-cache misses."
        );
        describe_counter!(
            "rinfresco_listing_expired_total",
            Unit::Count,
            "Total number of listings discarded on read after the freshness window."
        );
        describe_counter!(
            "rinfresco_listing_invalidated_total",
            Unit::Count,
            "Total number of listings removed by explicit invalidation."
        );
        describe_counter!(
            "rinfresco_fetch_failure_total",
            Unit::Count,
            "Total number of failed listing fetches, foreground and background."
        );
        describe_counter!(
            "rinfresco_fetch_discarded_total",
            Unit::Count,
            "Total number of listing responses discarded because a newer request superseded them."
        );
    });
}
