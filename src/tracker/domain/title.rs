//! Validated title value object shared by tasks and projects.

use super::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Non-empty, length-bounded title for a task or project.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Title(String);

impl Title {
    /// Maximum permitted title length in characters.
    pub const MAX_LENGTH: usize = 200;

    /// Creates a validated title, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::EmptyTitle`] when the trimmed value is empty,
    /// or [`DomainError::TitleTooLong`] when it exceeds
    /// [`Title::MAX_LENGTH`] characters.
    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let raw = value.into();
        let normalized = raw.trim();
        if normalized.is_empty() {
            return Err(DomainError::EmptyTitle);
        }
        let length = normalized.chars().count();
        if length > Self::MAX_LENGTH {
            return Err(DomainError::TitleTooLong {
                length,
                max: Self::MAX_LENGTH,
            });
        }
        Ok(Self(normalized.to_owned()))
    }

    /// Returns the title as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Title {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for Title {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
