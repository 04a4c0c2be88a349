//! BoardSweeper orchestration.
//!
//! This crate provides the building blocks of one sweep run and the
//! [`Sweeper`] that sequences them:
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`gate`] | 24-hour deploy freshness check |
//! | [`locator`] | Project and column name resolution |
//! | [`lister`] | Paginated card listing |
//! | [`batch`] | Throttled per-card move and archive batches |
//! | [`orchestrator`] | The run sequence and its report |
//!
//! ## Architectural Layer
//!
//! **Orchestration layer.** Components sequence calls against the
//! [`board::ProjectBoard`] and [`board::DeployHealthSource`] ports. They hold
//! no state beyond one run.

pub mod batch;
pub mod gate;
pub mod lister;
pub mod locator;
pub mod orchestrator;

#[cfg(test)]
mod testing;

pub use batch::{BatchMutator, BatchPolicy, BatchReport, CardOutcome, Mutation};
pub use gate::{DeployGate, GateDecision, DEPLOY_FRESHNESS_WINDOW};
pub use lister::{CardLister, CARD_PAGE_SIZE};
pub use locator::BoardLocator;
pub use orchestrator::{SweepOutcome, SweepReport, Sweeper};
