//! View state published to the consuming UI.

use crate::domain::Listing;

/// Read-path phase of one event's gallery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GalleryPhase {
    /// Foreground fetch in flight, nothing to show yet.
    Loading,
    /// Listing on screen.
    Ready,
    /// Listing on screen while a foreground refetch runs.
    Refreshing,
    /// Foreground fetch failed with nothing to show.
    Error,
}

/// Snapshot of what the consuming view should render.
///
/// `notice` carries a transient message (latest fetch failure); it is
/// cleared by the next successful fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryView {
    pub phase: GalleryPhase,
    pub listing: Listing,
    pub notice: Option<String>,
}

impl GalleryView {
    pub fn loading() -> Self {
        Self {
            phase: GalleryPhase::Loading,
            listing: Listing::empty(),
            notice: None,
        }
    }

    pub fn ready(listing: Listing) -> Self {
        Self {
            phase: GalleryPhase::Ready,
            listing,
            notice: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            phase: GalleryPhase::Error,
            listing: Listing::empty(),
            notice: Some(message.into()),
        }
    }
}
