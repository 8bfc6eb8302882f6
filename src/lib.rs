//! Rinfresco — a freshness layer for shared event media galleries.
//!
//! Attendees of an event share one gallery namespace identified by a
//! normalized hashtag code. The backend that actually stores the media is
//! external and reached only through the [`ListingFetcher`] boundary; this
//! crate owns the client-side reading discipline:
//!
//! - a TTL listing cache ([`ListingStore`]) that lazily discards entries
//!   older than the freshness window,
//! - a bounded poller ([`PollScheduler`]) that re-checks still-empty
//!   galleries until the first upload appears,
//! - a trailing-edge [`Debouncer`] that coalesces bursts of refresh triggers,
//! - a stale-while-revalidate [`GalleryController`] that publishes a view
//!   state over a watch channel.
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use async_trait::async_trait;
//! use rinfresco::{
//!     CacheConfig, EventCode, FetchError, GalleryController, Listing, ListingFetcher,
//!     ListingStore,
//! };
//!
//! struct BackendFetcher;
//!
//! #[async_trait]
//! impl ListingFetcher for BackendFetcher {
//!     async fn fetch(&self, _event: &EventCode) -> Result<Listing, FetchError> {
//!         Ok(Listing::empty())
//!     }
//! }
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = CacheConfig::default();
//!     let store = Arc::new(ListingStore::new(&config));
//!     let controller = GalleryController::new(Arc::new(BackendFetcher), store, config);
//!
//!     let event = EventCode::parse("#Launch Party 2026")?;
//!     let mut view = controller.subscribe(&event);
//!     controller.open(&event).await?;
//!     println!("{:?}", view.borrow_and_update().phase);
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod config;
pub mod domain;
pub mod gallery;
pub mod telemetry;
pub mod util;

pub use cache::{CacheConfig, Debouncer, ListingStore, PollScheduler};
pub use domain::{EventCode, EventCodeError, FileDescriptor, Listing};
pub use gallery::{FetchError, GalleryController, GalleryPhase, GalleryView, ListingFetcher};
