//! The sweep orchestrator.
//!
//! Sequences one run: gate → locate → list QA → move → list Done → archive.
//! Any failure outside the per-card batch work aborts the run with a
//! context-specific error; nothing is persisted between runs.

use std::sync::Arc;

use board::{
    Column, ColumnName, DeployHealthSource, EntityKind, ProjectBoard, ProjectId, SweepConfig,
    SweepError, SweepRunId, Timestamp,
};
use serde::Serialize;

use crate::batch::{BatchMutator, BatchPolicy, BatchReport};
use crate::gate::{DeployGate, GateDecision};
use crate::lister::CardLister;
use crate::locator::BoardLocator;

/// Result of a run that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SweepOutcome {
    /// The latest deploy was too old; nothing was touched.
    SkippedStaleDeploy {
        /// When the latest deploy happened.
        deployed_at: Timestamp,
    },
    /// All steps ran.
    Completed(SweepReport),
}

/// Counts gathered by a completed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SweepReport {
    /// Cards found in the QA column.
    pub qa_cards: usize,
    /// Cards found in the Done column when the archive step listed it
    /// (projected to include the QA cards on a dry run).
    pub done_cards: usize,
    /// Cards beyond the Done column limit: `max(0, done_cards - limit)`.
    pub expected_overflow: usize,
    /// Move batch counts; `None` on a dry run.
    pub moved: Option<BatchReport>,
    /// Archive batch counts; `None` on a dry run.
    pub archived: Option<BatchReport>,
}

/// Drives one sweep run against a board.
pub struct Sweeper {
    config: SweepConfig,
    gate: DeployGate,
    locator: BoardLocator,
    lister: CardLister,
    mutator: BatchMutator,
    dry_run: bool,
}

impl Sweeper {
    /// Creates a sweeper with the default batch policy.
    pub fn new(
        board: Arc<dyn ProjectBoard>,
        health: Arc<dyn DeployHealthSource>,
        config: SweepConfig,
    ) -> Self {
        Self {
            config,
            gate: DeployGate::new(health),
            locator: BoardLocator::new(board.clone()),
            lister: CardLister::new(board.clone()),
            mutator: BatchMutator::new(board),
            dry_run: false,
        }
    }

    /// Replaces the batch throttling policy.
    pub fn with_batch_policy(mut self, policy: BatchPolicy) -> Self {
        self.mutator.set_policy(policy);
        self
    }

    /// When `true`, every read step runs but no card is mutated.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Runs a sweep using the wall clock for the deploy gate.
    pub async fn run(&self) -> Result<SweepOutcome, SweepError> {
        self.run_at(Timestamp::now()).await
    }

    /// Runs a sweep, evaluating the deploy gate at `now`.
    #[tracing::instrument(
        name = "sweep",
        skip(self, now),
        fields(
            run_id = %SweepRunId::new_random(),
            repository = %self.config.repository,
            project = %self.config.project_name,
            dry_run = self.dry_run,
        )
    )]
    pub async fn run_at(&self, now: Timestamp) -> Result<SweepOutcome, SweepError> {
        let deployed_at = match self.gate.evaluate(now).await? {
            GateDecision::Proceed { deployed_at } => deployed_at,
            GateDecision::Stale { deployed_at, .. } => {
                tracing::info!("no recent deploy, nothing to do");
                return Ok(SweepOutcome::SkippedStaleDeploy { deployed_at });
            }
        };
        tracing::debug!(deployed_at = %deployed_at, "deploy gate passed");

        let project = self
            .locator
            .find_project(&self.config.repository, &self.config.project_name)
            .await?
            .ok_or_else(|| SweepError::NotFound {
                entity: EntityKind::Project,
                name: self.config.project_name.to_string(),
            })?;
        let done = self.resolve_column(&self.config.done_column, project.id).await?;
        let qa = self.resolve_column(&self.config.qa_column, project.id).await?;

        let mut qa_cards = self.lister.list_column_cards(qa.id).await?;
        // Moved cards land on top of Done, so issuing them in reverse fetch
        // order leaves the first-fetched QA card on top.
        qa_cards.reverse();
        let qa_total = qa_cards.len();

        let limit = self.config.done_column_card_limit;
        if self.dry_run {
            let done_cards = self.lister.list_column_cards(done.id).await?;
            let projected = done_cards.len() + qa_total;
            let expected_overflow = limit.overflow(projected);
            tracing::info!(
                would_move = qa_total,
                would_archive = expected_overflow,
                "dry run, no cards changed"
            );
            return Ok(SweepOutcome::Completed(SweepReport {
                qa_cards: qa_total,
                done_cards: projected,
                expected_overflow,
                moved: None,
                archived: None,
            }));
        }

        let moved = self.mutator.move_cards(&qa_cards, done.id).await;
        tracing::info!(
            moved = moved.succeeded,
            total = qa_total,
            "moved {} of {} cards from '{}' to '{}'",
            moved.succeeded,
            qa_total,
            qa.name,
            done.name
        );

        let done_cards = self.lister.list_column_cards(done.id).await?;
        let expected_overflow = limit.overflow(done_cards.len());
        let archived = self.mutator.archive_overflow(&done_cards, limit).await;
        tracing::info!(
            archived = archived.succeeded,
            expected = expected_overflow,
            "archived {} of {} cards over the limit of {} in '{}'",
            archived.succeeded,
            expected_overflow,
            limit,
            done.name
        );

        Ok(SweepOutcome::Completed(SweepReport {
            qa_cards: qa_total,
            done_cards: done_cards.len(),
            expected_overflow,
            moved: Some(moved),
            archived: Some(archived),
        }))
    }

    async fn resolve_column(
        &self,
        name: &ColumnName,
        project: ProjectId,
    ) -> Result<Column, SweepError> {
        self.locator
            .find_column(name, project)
            .await?
            .ok_or_else(|| SweepError::NotFound {
                entity: EntityKind::Column,
                name: name.to_string(),
            })
    }
}

#[cfg(test)]
#[path = "orchestrator_tests.rs"]
mod tests;
