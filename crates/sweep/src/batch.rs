//! Rate-limited batch mutation of cards.
//!
//! One mutating request is issued per card. Dispatches are spaced by a fixed
//! delay once the batch is large enough, and a bounded number of requests may
//! be in flight at the same time. A failing card never stops its siblings: the
//! batch completes only after every card has been attempted exactly once.

use std::sync::Arc;
use std::time::Duration;

use board::{BoardError, Card, CardId, CardLimit, ColumnId, HttpStatus, ProjectBoard};
use futures_util::stream::{self, StreamExt};
use serde::Serialize;

// ---------------------------------------------------------------------------
// Policy
// ---------------------------------------------------------------------------

/// Throttling policy applied to one batch.
///
/// Batches of at least `throttle_threshold` cards wait `throttle_delay`
/// between successive dispatches; smaller batches are dispatched back-to-back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchPolicy {
    /// Batch size from which dispatches are spaced out.
    pub throttle_threshold: usize,
    /// Delay between dispatches of a throttled batch.
    pub throttle_delay: Duration,
    /// Maximum number of requests awaiting a response at once.
    pub max_in_flight: usize,
}

impl Default for BatchPolicy {
    fn default() -> Self {
        Self {
            throttle_threshold: 100,
            throttle_delay: Duration::from_millis(1000),
            max_in_flight: 8,
        }
    }
}

impl BatchPolicy {
    /// Delay between dispatches for a batch of `len` cards, if any.
    pub fn delay_for(&self, len: usize) -> Option<Duration> {
        (len >= self.throttle_threshold && !self.throttle_delay.is_zero())
            .then_some(self.throttle_delay)
    }
}

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// The change requested for each card of a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    /// Move the card to the top of a column.
    MoveToTop {
        /// Destination column.
        column: ColumnId,
    },
    /// Mark the card archived.
    Archive,
}

impl Mutation {
    fn label(self) -> &'static str {
        match self {
            Mutation::MoveToTop { .. } => "move",
            Mutation::Archive => "archive",
        }
    }
}

/// Terminal state of one card's mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardOutcome {
    /// The board answered `2xx`.
    Succeeded,
    /// The board answered `304`: the card was already in the requested state.
    AlreadyInState,
    /// The board answered with any other status.
    FailedStatus(HttpStatus),
    /// The request produced no usable response.
    FailedError(BoardError),
}

/// Per-batch counts.
///
/// `succeeded + already_in_state + failed == total` always holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    /// Cards attempted.
    pub total: usize,
    /// Cards whose mutation returned `2xx`.
    pub succeeded: usize,
    /// Cards answered with `304`.
    pub already_in_state: usize,
    /// Cards that failed with another status or a transport error.
    pub failed: usize,
}

impl BatchReport {
    /// Counts a set of outcomes.
    pub fn tally<'a>(outcomes: impl IntoIterator<Item = &'a CardOutcome>) -> Self {
        outcomes
            .into_iter()
            .fold(Self::default(), |mut report, outcome| {
                report.total += 1;
                match outcome {
                    CardOutcome::Succeeded => report.succeeded += 1,
                    CardOutcome::AlreadyInState => report.already_in_state += 1,
                    CardOutcome::FailedStatus(_) | CardOutcome::FailedError(_) => {
                        report.failed += 1
                    }
                }
                report
            })
    }
}

/// The cards an archive pass touches: everything after the first `limit`.
pub fn select_overflow(cards: &[Card], limit: CardLimit) -> &[Card] {
    cards.get(limit.as_usize()..).unwrap_or(&[])
}

// ---------------------------------------------------------------------------
// Mutator
// ---------------------------------------------------------------------------

/// Applies one [`Mutation`] to every card of a batch.
#[derive(Clone)]
pub struct BatchMutator {
    board: Arc<dyn ProjectBoard>,
    policy: BatchPolicy,
}

impl BatchMutator {
    /// Creates a mutator with the default [`BatchPolicy`].
    pub fn new(board: Arc<dyn ProjectBoard>) -> Self {
        Self::with_policy(board, BatchPolicy::default())
    }

    /// Creates a mutator with an explicit policy.
    pub fn with_policy(board: Arc<dyn ProjectBoard>, policy: BatchPolicy) -> Self {
        Self { board, policy }
    }

    /// Replaces the throttling policy for subsequent batches.
    pub fn set_policy(&mut self, policy: BatchPolicy) {
        self.policy = policy;
    }

    /// Moves every card, in order, to the top of `target`.
    #[tracing::instrument(skip_all, fields(target = %target, count = cards.len()))]
    pub async fn move_cards(&self, cards: &[Card], target: ColumnId) -> BatchReport {
        self.apply(cards, Mutation::MoveToTop { column: target })
            .await
    }

    /// Archives every card after the first `limit`, leaving the head intact.
    #[tracing::instrument(skip_all, fields(limit = %limit, count = cards.len()))]
    pub async fn archive_overflow(&self, cards: &[Card], limit: CardLimit) -> BatchReport {
        self.apply(select_overflow(cards, limit), Mutation::Archive)
            .await
    }

    /// Dispatches `mutation` for each card and waits for every attempt.
    ///
    /// Requests are dispatched in input order; their completions may arrive
    /// in any order.
    pub async fn apply(&self, cards: &[Card], mutation: Mutation) -> BatchReport {
        if cards.is_empty() {
            return BatchReport::default();
        }
        let delay = self.policy.delay_for(cards.len());
        if let Some(delay) = delay {
            tracing::info!(
                count = cards.len(),
                delay_ms = delay.as_millis() as u64,
                "throttling large batch"
            );
        }

        let outcomes: Vec<CardOutcome> = stream::iter(cards.iter().copied().enumerate())
            .then(|(index, card)| async move {
                if let (true, Some(delay)) = (index > 0, delay) {
                    tokio::time::sleep(delay).await;
                }
                card
            })
            .map(|card| self.attempt(card.id, mutation))
            .buffer_unordered(self.policy.max_in_flight.max(1))
            .collect()
            .await;

        let report = BatchReport::tally(&outcomes);
        tracing::info!(
            mutation = mutation.label(),
            total = report.total,
            succeeded = report.succeeded,
            already_in_state = report.already_in_state,
            failed = report.failed,
            "batch complete"
        );
        report
    }

    async fn attempt(&self, card: CardId, mutation: Mutation) -> CardOutcome {
        let result = match mutation {
            Mutation::MoveToTop { column } => self.board.move_card_to_top(card, column).await,
            Mutation::Archive => self.board.archive_card(card).await,
        };
        let outcome = match result {
            Ok(status) if status.is_success() => CardOutcome::Succeeded,
            Ok(status) if status.is_not_modified() => CardOutcome::AlreadyInState,
            Ok(status) => CardOutcome::FailedStatus(status),
            Err(err) => CardOutcome::FailedError(err),
        };

        let action = mutation.label();
        match &outcome {
            CardOutcome::Succeeded => tracing::debug!(card = %card, action, "card updated"),
            CardOutcome::AlreadyInState => {
                tracing::info!(card = %card, action, "card already in requested state")
            }
            CardOutcome::FailedStatus(status) => {
                tracing::warn!(card = %card, action, status = status.as_u16(), "card request rejected")
            }
            CardOutcome::FailedError(err) => {
                tracing::warn!(card = %card, action, error = %err, "card request failed")
            }
        }
        outcome
    }
}

#[cfg(test)]
#[path = "batch_tests.rs"]
mod tests;
