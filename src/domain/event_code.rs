//! Normalized hashtag codes identifying one gallery's namespace.
//!
//! Attendees type free-form hashtags (`#Summer Party 2026`); everything the
//! crate keys on is the normalized form (`summer-party-2026`). Normalization
//! goes through ASCII slugification (`slug` crate) so two attendees typing
//! the same tag with different casing or punctuation land in the same
//! gallery.

use std::fmt;

use serde::{Deserialize, Serialize};
use slug::slugify;
use thiserror::Error;

/// Upper bound on normalized code length, matching the backend column width.
const MAX_CODE_LENGTH: usize = 64;

/// Errors that can occur while normalizing a hashtag code.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EventCodeError {
    #[error("hashtag code is empty")]
    EmptyInput,
    #[error("failed to derive an event code from `{input}`")]
    Unrepresentable { input: String },
    #[error("event code `{code}` exceeds {MAX_CODE_LENGTH} characters")]
    TooLong { code: String },
}

/// Normalized string key identifying one gallery's namespace.
///
/// Construction always goes through [`EventCode::parse`]; a value of this
/// type is guaranteed non-empty, lowercase, and within the length bound.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EventCode(String);

impl EventCode {
    /// Normalize free-form hashtag input into an event code.
    ///
    /// Leading `#` characters and surrounding whitespace are stripped before
    /// slugification.
    pub fn parse(input: &str) -> Result<Self, EventCodeError> {
        let stripped = input.trim().trim_start_matches('#').trim();
        if stripped.is_empty() {
            return Err(EventCodeError::EmptyInput);
        }

        let code = slugify(stripped);
        if code.is_empty() {
            return Err(EventCodeError::Unrepresentable {
                input: input.to_string(),
            });
        }
        if code.len() > MAX_CODE_LENGTH {
            return Err(EventCodeError::TooLong { code });
        }

        Ok(Self(code))
    }

    /// The normalized code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EventCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for EventCode {
    type Error = EventCodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<EventCode> for String {
    fn from(code: EventCode) -> Self {
        code.0
    }
}
