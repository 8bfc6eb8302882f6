//! Rinfresco cache system.
//!
//! Three cooperating pieces:
//!
//! - **Listing store**: TTL-bounded in-memory cache of per-event listings
//! - **Poll scheduler**: per-event repeating timers for empty galleries
//! - **Debouncer**: trailing-edge coalescing of refresh triggers
//!
//! ## Configuration
//!
//! Behavior is controlled via `rinfresco.toml`:
//!
//! ```toml
//! [freshness]
//! freshness_window_secs = 300
//! poll_interval_secs = 15
//! # ... see config.rs for all options
//! ```

mod config;
mod debounce;
mod lock;
mod poller;
mod store;

pub use config::CacheConfig;
pub use debounce::Debouncer;
pub use poller::PollScheduler;
pub use store::ListingStore;
