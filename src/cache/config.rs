//! Cache configuration.
//!
//! Controls the listing store, the empty-gallery poller, and the refresh
//! debouncer via `rinfresco.toml`.

use std::num::NonZeroUsize;
use std::time::Duration;

use serde::Deserialize;

// Default values for cache configuration
const DEFAULT_FRESHNESS_WINDOW_SECS: u64 = 300;
const DEFAULT_POLL_INTERVAL_SECS: u64 = 15;
const DEFAULT_DEBOUNCE_DELAY_MS: u64 = 400;
const DEFAULT_BACKGROUND_REFRESH_DELAY_MS: u64 = 250;
const DEFAULT_LISTING_LIMIT: usize = 64;

/// Cache configuration from `rinfresco.toml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Maximum age of a cached listing before it is treated as absent.
    pub freshness_window_secs: u64,
    /// Interval between re-checks of a still-empty gallery.
    pub poll_interval_secs: u64,
    /// Trailing delay for coalescing refresh triggers.
    pub debounce_delay_ms: u64,
    /// Delay before the silent revalidation that follows a cached read.
    pub background_refresh_delay_ms: u64,
    /// Maximum events held in the listing store before LRU eviction.
    pub listing_limit: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            freshness_window_secs: DEFAULT_FRESHNESS_WINDOW_SECS,
            poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
            debounce_delay_ms: DEFAULT_DEBOUNCE_DELAY_MS,
            background_refresh_delay_ms: DEFAULT_BACKGROUND_REFRESH_DELAY_MS,
            listing_limit: DEFAULT_LISTING_LIMIT,
        }
    }
}

impl From<&crate::config::FreshnessSettings> for CacheConfig {
    fn from(settings: &crate::config::FreshnessSettings) -> Self {
        Self {
            freshness_window_secs: settings.freshness_window.as_secs(),
            poll_interval_secs: settings.poll_interval.as_secs(),
            debounce_delay_ms: settings.debounce_delay.as_millis() as u64,
            background_refresh_delay_ms: settings.background_refresh_delay.as_millis() as u64,
            listing_limit: settings.listing_limit,
        }
    }
}

impl CacheConfig {
    pub fn freshness_window(&self) -> Duration {
        Duration::from_secs(self.freshness_window_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn debounce_delay(&self) -> Duration {
        Duration::from_millis(self.debounce_delay_ms)
    }

    pub fn background_refresh_delay(&self) -> Duration {
        Duration::from_millis(self.background_refresh_delay_ms)
    }

    /// Returns the listing limit as NonZeroUsize, clamping to 1 if zero.
    pub fn listing_limit_non_zero(&self) -> NonZeroUsize {
        NonZeroUsize::new(self.listing_limit).unwrap_or(NonZeroUsize::MIN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_values() {
        let config = CacheConfig::default();
        assert_eq!(config.freshness_window_secs, 300);
        assert_eq!(config.poll_interval_secs, 15);
        assert_eq!(config.debounce_delay_ms, 400);
        assert_eq!(config.background_refresh_delay_ms, 250);
        assert_eq!(config.listing_limit, 64);
    }

    #[test]
    fn duration_accessors_convert_units() {
        let config = CacheConfig::default();
        assert_eq!(config.freshness_window(), Duration::from_secs(300));
        assert_eq!(config.debounce_delay(), Duration::from_millis(400));
    }

    #[test]
    fn non_zero_clamps_to_min() {
        let config = CacheConfig {
            listing_limit: 0,
            ..Default::default()
        };
        assert_eq!(config.listing_limit_non_zero().get(), 1);
    }
}
