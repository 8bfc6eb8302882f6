//! Stale-while-revalidate read path for event galleries.
//!
//! The controller consumes the cache subsystem to drive one view state per
//! opened event: cached listings render immediately and are silently
//! revalidated; cache misses block on a foreground fetch; empty galleries
//! are polled until the first upload appears.

mod controller;
mod fetch;
mod view;

pub use controller::GalleryController;
pub use fetch::{FetchError, ListingFetcher};
pub use view::{GalleryPhase, GalleryView};
