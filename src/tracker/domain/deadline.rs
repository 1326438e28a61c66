//! Deadline value object with comparison logic.

use super::DomainError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Point-in-time deadline, stored normalized to UTC.
///
/// The value object enforces well-formedness only; cross-entity constraints
/// (a task deadline never exceeding its project's deadline) are enforced by
/// the entities. Past instants are valid deadlines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Deadline(DateTime<Utc>);

impl Deadline {
    /// Parses a deadline from an RFC 3339 timestamp, normalizing the offset
    /// to UTC.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidDeadline`] when the input cannot be
    /// interpreted as an RFC 3339 timestamp.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        DateTime::parse_from_rfc3339(raw.trim())
            .map(|instant| Self(instant.with_timezone(&Utc)))
            .map_err(|_| DomainError::InvalidDeadline(raw.to_owned()))
    }

    /// Creates a deadline from a UTC instant.
    #[must_use]
    pub const fn from_datetime(instant: DateTime<Utc>) -> Self {
        Self(instant)
    }

    /// Returns the wrapped UTC instant.
    #[must_use]
    pub const fn into_inner(self) -> DateTime<Utc> {
        self.0
    }

    /// Returns true when this deadline is strictly after `other`.
    #[must_use]
    pub fn is_after(self, other: Self) -> bool {
        self.0 > other.0
    }

    /// Returns true when this deadline is strictly before `other`.
    #[must_use]
    pub fn is_before(self, other: Self) -> bool {
        self.0 < other.0
    }

    /// Returns true when the deadline has passed at the supplied instant.
    #[must_use]
    pub fn is_overdue(self, now: DateTime<Utc>) -> bool {
        self.0 < now
    }
}

impl fmt::Display for Deadline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}
