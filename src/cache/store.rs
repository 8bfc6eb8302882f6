//! TTL listing store.
//!
//! In-memory cache of per-event file listings. Entries older than the
//! freshness window are treated as absent and discarded lazily on read;
//! capacity pressure is handled with LRU eviction.

use std::sync::RwLock;
use std::time::Duration;

use lru::LruCache;
use metrics::counter;
use tokio::time::Instant;
use tracing::debug;

use crate::domain::{EventCode, Listing};

use super::config::CacheConfig;
use super::lock::write_guard;

const SOURCE: &str = "cache::store";

pub(crate) const METRIC_LISTING_HIT: &str = "rinfresco_listing_hit_total";
pub(crate) const METRIC_LISTING_MISS: &str = "rinfresco_listing_miss_total";
pub(crate) const METRIC_LISTING_EXPIRED: &str = "rinfresco_listing_expired_total";
pub(crate) const METRIC_LISTING_INVALIDATED: &str = "rinfresco_listing_invalidated_total";

struct CachedListing {
    listing: Listing,
    fetched_at: Instant,
}

/// TTL-bounded listing cache keyed by event code.
///
/// All operations are infallible in-memory map operations. Time is read
/// through `tokio::time::Instant` so the freshness window participates in
/// tokio's paused test clock.
pub struct ListingStore {
    freshness_window: Duration,
    entries: RwLock<LruCache<EventCode, CachedListing>>,
}

impl ListingStore {
    /// Create a new listing store with the given configuration.
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            freshness_window: config.freshness_window(),
            entries: RwLock::new(LruCache::new(config.listing_limit_non_zero())),
        }
    }

    /// Return the cached listing when it was fetched within the freshness
    /// window. A stale entry is evicted and reported as absent; there are no
    /// other side effects.
    pub fn get(&self, event: &EventCode) -> Option<Listing> {
        let mut entries = write_guard(&self.entries, SOURCE, "get");

        let expired = match entries.get(event) {
            None => {
                counter!(METRIC_LISTING_MISS).increment(1);
                return None;
            }
            Some(entry) => entry.fetched_at.elapsed() > self.freshness_window,
        };

        if expired {
            entries.pop(event);
            counter!(METRIC_LISTING_EXPIRED).increment(1);
            debug!(event = %event, "cached listing expired");
            return None;
        }

        counter!(METRIC_LISTING_HIT).increment(1);
        entries.get(event).map(|entry| entry.listing.clone())
    }

    /// Store the listing stamped with the current time, unconditionally
    /// overwriting any prior entry for the event.
    pub fn set(&self, event: &EventCode, listing: Listing) {
        let entry = CachedListing {
            listing,
            fetched_at: Instant::now(),
        };
        write_guard(&self.entries, SOURCE, "set").put(event.clone(), entry);
    }

    /// Remove the entry immediately so the next read goes to the backend.
    pub fn invalidate(&self, event: &EventCode) {
        if write_guard(&self.entries, SOURCE, "invalidate")
            .pop(event)
            .is_some()
        {
            counter!(METRIC_LISTING_INVALIDATED).increment(1);
            debug!(event = %event, "cached listing invalidated");
        }
    }

    /// Remove all entries (session reset).
    pub fn clear(&self) {
        write_guard(&self.entries, SOURCE, "clear").clear();
    }

    /// Number of cached events, stale entries included.
    pub fn len(&self) -> usize {
        write_guard(&self.entries, SOURCE, "len").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use std::panic::{AssertUnwindSafe, catch_unwind};

    use time::macros::datetime;
    use tokio::time::advance;

    use crate::domain::FileDescriptor;

    use super::*;

    fn code(input: &str) -> EventCode {
        EventCode::parse(input).expect("event code")
    }

    fn sample_listing(names: &[&str]) -> Listing {
        Listing::new(
            names
                .iter()
                .map(|name| FileDescriptor {
                    name: name.to_string(),
                    id: format!("obj-{name}"),
                    created_at: datetime!(2026-08-01 12:00 UTC),
                    size_bytes: 100,
                })
                .collect(),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn get_after_set_returns_the_listing() {
        let store = ListingStore::new(&CacheConfig::default());
        let event = code("evt1");
        let listing = sample_listing(&["a.jpg"]);

        store.set(&event, listing.clone());
        advance(Duration::from_secs(1)).await;

        assert_eq!(store.get(&event), Some(listing));
    }

    #[tokio::test(start_paused = true)]
    async fn entry_expires_after_the_freshness_window() {
        let store = ListingStore::new(&CacheConfig::default());
        let event = code("evt1");

        store.set(&event, sample_listing(&["a.jpg"]));
        advance(Duration::from_secs(301)).await;

        assert_eq!(store.get(&event), None);
        // Lazy eviction removed the internal entry as well.
        assert!(store.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn entry_at_exactly_the_window_is_still_fresh() {
        let store = ListingStore::new(&CacheConfig::default());
        let event = code("evt1");

        store.set(&event, sample_listing(&["a.jpg"]));
        advance(Duration::from_secs(300)).await;

        assert!(store.get(&event).is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn invalidate_forces_a_miss_regardless_of_freshness() {
        let store = ListingStore::new(&CacheConfig::default());
        let event = code("evt1");

        store.set(&event, sample_listing(&["a.jpg"]));
        store.invalidate(&event);

        assert_eq!(store.get(&event), None);
    }

    #[tokio::test(start_paused = true)]
    async fn set_overwrites_the_previous_listing() {
        let store = ListingStore::new(&CacheConfig::default());
        let event = code("evt1");

        store.set(&event, sample_listing(&["a.jpg"]));
        store.set(&event, sample_listing(&["b.jpg", "c.jpg"]));

        let cached = store.get(&event).expect("cached listing");
        assert_eq!(cached.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn clear_removes_all_entries() {
        let store = ListingStore::new(&CacheConfig::default());

        store.set(&code("evt1"), sample_listing(&["a.jpg"]));
        store.set(&code("evt2"), sample_listing(&["b.jpg"]));
        store.clear();

        assert!(store.is_empty());
        assert_eq!(store.get(&code("evt1")), None);
    }

    #[tokio::test(start_paused = true)]
    async fn capacity_pressure_evicts_least_recently_used() {
        let config = CacheConfig {
            listing_limit: 2,
            ..Default::default()
        };
        let store = ListingStore::new(&config);

        store.set(&code("evt1"), sample_listing(&["a.jpg"]));
        store.set(&code("evt2"), sample_listing(&["b.jpg"]));
        store.set(&code("evt3"), sample_listing(&["c.jpg"]));

        assert_eq!(store.get(&code("evt1")), None);
        assert!(store.get(&code("evt2")).is_some());
        assert!(store.get(&code("evt3")).is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn store_recovers_from_poisoned_lock() {
        let store = ListingStore::new(&CacheConfig::default());
        let event = code("evt1");

        let _ = catch_unwind(AssertUnwindSafe(|| {
            let _guard = store.entries.write().expect("entries lock");
            panic!("poison entries lock");
        }));

        store.set(&event, sample_listing(&["a.jpg"]));
        assert!(store.get(&event).is_some());
    }
}
