//! Domain layer types and invariants.

pub mod event_code;
pub mod listing;

pub use event_code::{EventCode, EventCodeError};
pub use listing::{FileDescriptor, Listing};
