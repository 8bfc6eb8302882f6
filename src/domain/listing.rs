//! File listings: the ordered media inventory of one gallery.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// One uploaded media object as reported by the backend listing call.
///
/// `name` is the storage key, unique within the event's namespace; `id` is
/// the backend's opaque object identifier. The backend remains authoritative
/// for both; cached copies are overwritten wholesale on every refetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDescriptor {
    pub name: String,
    pub id: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub size_bytes: u64,
}

/// Ordered collection of [`FileDescriptor`]s for one event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    files: Vec<FileDescriptor>,
}

impl Listing {
    pub fn new(files: Vec<FileDescriptor>) -> Self {
        Self { files }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn files(&self) -> &[FileDescriptor] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Sum of `size_bytes` across the listing.
    pub fn total_bytes(&self) -> u64 {
        self.files.iter().map(|file| file.size_bytes).sum()
    }

    /// Shallow content comparison used to suppress no-op view updates:
    /// same length, same descriptors, same order.
    pub fn same_content(&self, other: &Listing) -> bool {
        self.files == other.files
    }
}

impl From<Vec<FileDescriptor>> for Listing {
    fn from(files: Vec<FileDescriptor>) -> Self {
        Self::new(files)
    }
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::*;

    fn descriptor(name: &str, size_bytes: u64) -> FileDescriptor {
        FileDescriptor {
            name: name.to_string(),
            id: format!("obj-{name}"),
            created_at: datetime!(2026-08-01 12:00 UTC),
            size_bytes,
        }
    }

    #[test]
    fn total_bytes_sums_descriptors() {
        let listing = Listing::new(vec![descriptor("a.jpg", 100), descriptor("b.mp4", 250)]);
        assert_eq!(listing.total_bytes(), 350);
        assert_eq!(listing.len(), 2);
    }

    #[test]
    fn same_content_matches_equal_listings() {
        let left = Listing::new(vec![descriptor("a.jpg", 100)]);
        let right = Listing::new(vec![descriptor("a.jpg", 100)]);
        assert!(left.same_content(&right));
    }

    #[test]
    fn same_content_detects_reordering() {
        let left = Listing::new(vec![descriptor("a.jpg", 100), descriptor("b.jpg", 100)]);
        let right = Listing::new(vec![descriptor("b.jpg", 100), descriptor("a.jpg", 100)]);
        assert!(!left.same_content(&right));
    }

    #[test]
    fn descriptor_serde_round_trip() {
        let original = descriptor("a.jpg", 100);
        let json = serde_json::to_string(&original).expect("serialize");
        let back: FileDescriptor = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, original);
    }
}
