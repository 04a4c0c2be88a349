//! Core domain for BoardSweeper.
//!
//! This crate contains every board concept, newtype identifier, shared value
//! type, configuration struct, and error type used by the sweep. Infrastructure
//! crates implement the port traits defined here; they never add domain rules.
//!
//! ## Architectural Layer
//!
//! **Business logic + port definitions.** This crate has no I/O dependencies.
//! It defines *what* is needed; infrastructure crates define *how* to supply it.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identifiers`] | Newtype identifiers (`ProjectId`, `ColumnId`, `CardId`, names) |
//! | [`types`] | Board entities and value types (`Card`, `CardLimit`, `Timestamp`, etc.) |
//! | [`config`] | Validated run configuration |
//! | [`ports`] | `ProjectBoard` and `DeployHealthSource` traits |
//! | [`errors`] | Port-level and run-level error types |

pub mod config;
pub mod errors;
pub mod identifiers;
pub mod ports;
pub mod types;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use config::{SweepConfig, SweepInputs};
pub use errors::{BoardError, BoardResultExt, EntityKind, SweepError};
pub use identifiers::{
    CardId, ColumnId, ColumnName, ProjectId, ProjectName, RepositoryId, SweepRunId,
};
pub use ports::{DeployHealthSource, ProjectBoard};
pub use types::{Card, CardLimit, Column, DeployHealth, HttpStatus, Project, Timestamp};
