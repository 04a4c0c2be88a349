//! Shared value types for the board sweep domain.
//!
//! Unlike the newtype identifiers in [`crate::identifiers`], these types carry
//! meaningful values with invariants (e.g. card limits are non-negative
//! integers, deploy times are valid instants) and participate in domain
//! decisions.

use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::{BoardError, CardId, ColumnId, ProjectId, SweepError};

// ---------------------------------------------------------------------------
// Board entities
// ---------------------------------------------------------------------------

/// A project board: the root container of columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// Identifier assigned by the board API.
    pub id: ProjectId,
    /// Display name, matched exactly by the locator.
    pub name: String,
}

/// A named partition of a project board holding cards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// Identifier assigned by the board API.
    pub id: ColumnId,
    /// Display name, matched exactly by the locator.
    pub name: String,
}

/// One work item within a column.
///
/// Cards are kept in the order the API returned them; that order is treated as
/// column position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    /// Identifier assigned by the board API.
    pub id: CardId,
    /// Whether the card is already archived.
    #[serde(default)]
    pub archived: bool,
}

// ---------------------------------------------------------------------------
// Deploy health
// ---------------------------------------------------------------------------

/// Body of the deploy health endpoint.
///
/// Only `latest_deploy_time` is read; any other fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DeployHealth {
    /// ISO-8601 timestamp of the latest production deploy.
    #[serde(default)]
    pub latest_deploy_time: Option<String>,
}

impl DeployHealth {
    /// Extracts and parses the latest deploy time.
    ///
    /// Fails with [`BoardError::Data`] when the field is absent or is not a
    /// valid date.
    pub fn deploy_time(&self) -> Result<Timestamp, BoardError> {
        let raw = self
            .latest_deploy_time
            .as_deref()
            .ok_or_else(|| BoardError::Data {
                message: "missing 'latest_deploy_time' field".to_string(),
            })?;
        Timestamp::parse_iso8601(raw).ok_or_else(|| BoardError::Data {
            message: format!("invalid 'latest_deploy_time' value '{raw}'"),
        })
    }
}

// ---------------------------------------------------------------------------
// Limits and statuses
// ---------------------------------------------------------------------------

/// The number of cards the Done column may retain after a sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CardLimit(usize);

impl CardLimit {
    /// Creates a [`CardLimit`] from a raw count.
    pub fn new(limit: usize) -> Self {
        Self(limit)
    }

    /// Returns the underlying count.
    pub fn as_usize(self) -> usize {
        self.0
    }

    /// Number of cards beyond the limit in a column holding `total` cards.
    pub fn overflow(self, total: usize) -> usize {
        total.saturating_sub(self.0)
    }
}

impl FromStr for CardLimit {
    type Err = SweepError;

    /// Parses a non-negative integer; signs, fractions and blanks are rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(SweepError::Validation {
                message: format!("card limit must be a non-negative integer, got '{s}'"),
            });
        }
        trimmed
            .parse::<usize>()
            .map(Self)
            .map_err(|_| SweepError::Validation {
                message: format!("card limit '{s}' is out of range"),
            })
    }
}

impl std::fmt::Display for CardLimit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------

/// The HTTP status returned by a mutating board call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HttpStatus(u16);

impl HttpStatus {
    /// `304 Not Modified`: the entity is already in the requested state.
    pub const NOT_MODIFIED: HttpStatus = HttpStatus(304);

    /// Wraps a raw status code.
    pub fn new(code: u16) -> Self {
        Self(code)
    }

    /// Returns the raw status code.
    pub fn as_u16(self) -> u16 {
        self.0
    }

    /// `true` for any `2xx` status.
    pub fn is_success(self) -> bool {
        (200..300).contains(&self.0)
    }

    /// `true` for any `3xx` status.
    pub fn is_redirection(self) -> bool {
        (300..400).contains(&self.0)
    }

    /// `true` for `304 Not Modified`.
    pub fn is_not_modified(self) -> bool {
        self == Self::NOT_MODIFIED
    }
}

impl std::fmt::Display for HttpStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Time
// ---------------------------------------------------------------------------

/// A UTC wall-clock timestamp.
///
/// Wraps [`chrono::DateTime<Utc>`] so callers never depend on `chrono` types
/// directly; the underlying representation can change without affecting the
/// domain API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Returns the current UTC time as a [`Timestamp`].
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Returns the underlying [`DateTime<Utc>`].
    pub fn as_datetime(self) -> DateTime<Utc> {
        self.0
    }

    /// Parses an ISO-8601 timestamp.
    ///
    /// Accepts RFC 3339 with an offset, a local date-time without offset
    /// (read as UTC), or a bare date (midnight UTC).
    pub fn parse_iso8601(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(Self(dt.with_timezone(&Utc)));
        }
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
            return Some(Self(naive.and_utc()));
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|naive| Self(naive.and_utc()))
    }

    /// Returns the instant `by` before this one, or `None` on overflow.
    pub fn checked_sub(self, by: Duration) -> Option<Self> {
        let delta = TimeDelta::from_std(by).ok()?;
        self.0.checked_sub_signed(delta).map(Self)
    }

    /// Time elapsed from this instant until `now`.
    ///
    /// Returns `None` when this instant lies after `now`.
    pub fn age_at(self, now: Timestamp) -> Option<Duration> {
        (now.0 - self.0).to_std().ok()
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

#[cfg(test)]
#[path = "types_tests.rs"]
mod tests;
