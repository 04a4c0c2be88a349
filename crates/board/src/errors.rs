//! Error types for the board sweep domain.
//!
//! [`BoardError`] is the port-level error: every adapter behind
//! [`crate::ProjectBoard`] or [`crate::DeployHealthSource`] reports failures
//! using it, so the orchestration layer never sees transport types.
//!
//! [`SweepError`] covers conditions that abort a sweep run. Single-entity
//! board failures are wrapped into [`SweepError::Board`] together with a
//! human-readable description of the step that failed. Per-card failures inside
//! a batch mutation never become a [`SweepError`]; they are counted instead.

use thiserror::Error;

// ---------------------------------------------------------------------------
// Port-level errors
// ---------------------------------------------------------------------------

/// A failed call against the board API or the deploy health endpoint.
///
/// None of these conditions is retried anywhere in the system.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    /// The remote answered with a status outside the accepted success range.
    #[error("remote returned HTTP {status}")]
    Remote {
        /// The HTTP status code received.
        status: u16,
    },

    /// The request never produced a response (connection, TLS, timeout).
    #[error("network failure: {message}")]
    Network {
        /// Description of the transport failure.
        message: String,
    },

    /// The response body was not valid JSON or lacked an expected field.
    #[error("malformed response: {message}")]
    Data {
        /// Description of what could not be decoded.
        message: String,
    },
}

// ---------------------------------------------------------------------------
// Run-level errors
// ---------------------------------------------------------------------------

/// The kind of board entity that a name lookup failed to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    /// A project board within a repository.
    Project,
    /// A column within a project board.
    Column,
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityKind::Project => write!(f, "project"),
            EntityKind::Column => write!(f, "column"),
        }
    }
}

/// Errors that abort a sweep run.
///
/// Every variant surfaces as a non-zero process exit.
#[derive(Debug, Error)]
pub enum SweepError {
    /// A caller-supplied parameter is invalid.
    ///
    /// Always raised before any network request is issued.
    #[error("validation error: {message}")]
    Validation {
        /// Description of the invalid parameter.
        message: String,
    },

    /// A project or column name did not match any entity returned by the API.
    #[error("{entity} '{name}' not found")]
    NotFound {
        /// Which kind of entity was looked up.
        entity: EntityKind,
        /// The name that was searched for.
        name: String,
    },

    /// A single-entity board call failed.
    #[error("{context}: {source}")]
    Board {
        /// Description of the step that was running.
        context: String,
        /// The underlying port failure.
        #[source]
        source: BoardError,
    },

    /// The run configuration could not be assembled.
    ///
    /// Produced at startup; a sweep never starts with an invalid configuration.
    #[error("configuration error: {message}")]
    Configuration {
        /// Description of the configuration problem.
        message: String,
    },
}

impl SweepError {
    /// Wraps a [`BoardError`] with the description of the failing step.
    pub fn board(context: impl Into<String>, source: BoardError) -> Self {
        SweepError::Board {
            context: context.into(),
            source,
        }
    }
}

/// Extension for attaching step context to port results.
pub trait BoardResultExt<T> {
    /// Converts a [`BoardError`] into [`SweepError::Board`] with a lazily
    /// built context message.
    fn with_step<F, S>(self, context: F) -> Result<T, SweepError>
    where
        F: FnOnce() -> S,
        S: Into<String>;
}

impl<T> BoardResultExt<T> for Result<T, BoardError> {
    fn with_step<F, S>(self, context: F) -> Result<T, SweepError>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(|source| SweepError::board(context(), source))
    }
}
