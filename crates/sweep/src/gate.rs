//! Deploy-time gate.
//!
//! A sweep only acts when production was deployed recently. The gate reads the
//! latest deploy time from a [`DeployHealthSource`] and compares it against
//! the caller's notion of "now".

use std::sync::Arc;
use std::time::Duration;

use board::{BoardResultExt, DeployHealthSource, SweepError, Timestamp};

/// Maximum age of the latest deploy for a sweep to proceed (24 hours).
pub const DEPLOY_FRESHNESS_WINDOW: Duration = Duration::from_millis(86_400_000);

/// Outcome of evaluating the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    /// The latest deploy is within [`DEPLOY_FRESHNESS_WINDOW`].
    Proceed {
        /// When the latest deploy happened.
        deployed_at: Timestamp,
    },
    /// The latest deploy is older than [`DEPLOY_FRESHNESS_WINDOW`].
    Stale {
        /// When the latest deploy happened.
        deployed_at: Timestamp,
        /// How long ago that was.
        age: Duration,
    },
}

/// Returns `true` when a deploy at `deployed_at` is recent enough at `now`.
///
/// A deploy time in the future counts as recent.
pub fn is_recent(deployed_at: Timestamp, now: Timestamp) -> bool {
    match deployed_at.age_at(now) {
        Some(age) => age <= DEPLOY_FRESHNESS_WINDOW,
        None => true,
    }
}

/// Reads the deploy time and decides whether a sweep should run.
#[derive(Clone)]
pub struct DeployGate {
    source: Arc<dyn DeployHealthSource>,
}

impl DeployGate {
    /// Creates a gate backed by `source`.
    pub fn new(source: Arc<dyn DeployHealthSource>) -> Self {
        Self { source }
    }

    /// Fetches and parses the latest deploy time.
    ///
    /// Fails with [`SweepError::Board`] wrapping a network, remote, or data
    /// error.
    pub async fn fetch_deploy_time(&self) -> Result<Timestamp, SweepError> {
        let health = self
            .source
            .fetch_health()
            .await
            .with_step(|| "failed to fetch deploy health")?;
        health
            .deploy_time()
            .with_step(|| "failed to read latest deploy time")
    }

    /// Fetches the deploy time and evaluates it against `now`.
    #[tracing::instrument(skip_all, fields(now = %now))]
    pub async fn evaluate(&self, now: Timestamp) -> Result<GateDecision, SweepError> {
        let deployed_at = self.fetch_deploy_time().await?;
        if is_recent(deployed_at, now) {
            tracing::info!(deployed_at = %deployed_at, "recent deploy found");
            Ok(GateDecision::Proceed { deployed_at })
        } else {
            let age = deployed_at.age_at(now).unwrap_or_default();
            tracing::info!(
                deployed_at = %deployed_at,
                age_hours = age.as_secs() / 3600,
                "no recent deploy"
            );
            Ok(GateDecision::Stale { deployed_at, age })
        }
    }
}

#[cfg(test)]
#[path = "gate_tests.rs"]
mod tests;
