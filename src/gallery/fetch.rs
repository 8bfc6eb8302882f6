//! Boundary between the gallery controller and the backing store.
//!
//! The controller never speaks HTTP or object-store APIs itself; the
//! surrounding application supplies a [`ListingFetcher`] and keeps transport
//! concerns on its side of this trait.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{EventCode, Listing};

/// Errors a listing fetch can surface.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("network error while listing `{event}`: {message}")]
    Network { event: String, message: String },
    #[error("backend rejected the listing request for `{event}`: {message}")]
    Backend { event: String, message: String },
    #[error("not authorized to list `{event}`")]
    Unauthorized { event: String },
}

impl FetchError {
    /// The event code the failed request was issued for.
    pub fn event(&self) -> &str {
        match self {
            Self::Network { event, .. }
            | Self::Backend { event, .. }
            | Self::Unauthorized { event } => event,
        }
    }
}

/// Asynchronously resolve the ordered file listing for an event.
///
/// Implementations must return the full listing on every call; the
/// controller overwrites its cached copy wholesale rather than merging.
#[async_trait]
pub trait ListingFetcher: Send + Sync {
    async fn fetch(&self, event: &EventCode) -> Result<Listing, FetchError>;
}
