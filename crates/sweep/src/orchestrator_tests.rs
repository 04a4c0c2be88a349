use std::sync::Arc;
use std::time::Duration;

use board::{BoardError, EntityKind, SweepConfig, SweepError, SweepInputs, Timestamp};
use tokio::time::Instant;

use super::*;
use crate::testing::{id, Call, FakeBoard, FakeHealth, Scripted};

const QA: u64 = 30;
const DONE: u64 = 31;

fn config(limit: &str) -> SweepConfig {
    SweepConfig::from_inputs(&SweepInputs {
        repository: "acme/widgets".to_string(),
        project_name: "Release Board".to_string(),
        done_column_name: "Done".to_string(),
        qa_column_name: "QA".to_string(),
        done_column_card_limit: limit.to_string(),
    })
    .unwrap()
}

fn now() -> Timestamp {
    Timestamp::parse_iso8601("2026-10-19T12:00:00Z").unwrap()
}

fn fresh_deploy() -> Arc<FakeHealth> {
    Arc::new(FakeHealth::deployed_at("2026-10-19T10:00:00Z"))
}

fn board(qa: &[u64], done: &[u64]) -> FakeBoard {
    FakeBoard::new()
        .with_project(3, "Release Board")
        .with_column(3, QA, "QA", qa)
        .with_column(3, DONE, "Done", done)
}

#[tokio::test]
async fn test_stale_deploy_skips_without_touching_the_board() {
    let board = Arc::new(board(&[1, 2, 3], &[]));
    let health = Arc::new(FakeHealth::deployed_at("2026-10-18T06:00:00Z"));
    let sweeper = Sweeper::new(board.clone(), health, config("5"));

    let outcome = sweeper.run_at(now()).await.unwrap();

    assert!(matches!(outcome, SweepOutcome::SkippedStaleDeploy { .. }));
    assert!(board.calls().is_empty());
}

#[tokio::test]
async fn test_full_run_moves_reversed_qa_cards_then_trims_done() {
    let board = Arc::new(board(&[1, 2, 3], &[10, 11, 12, 13, 14]));
    let sweeper = Sweeper::new(board.clone(), fresh_deploy(), config("5"));

    let outcome = sweeper.run_at(now()).await.unwrap();

    let moves: Vec<Call> = board
        .mutation_calls()
        .into_iter()
        .filter(|c| matches!(c, Call::Move { .. }))
        .collect();
    // QA fetch order [1, 2, 3] is issued reversed.
    assert_eq!(
        moves,
        vec![
            Call::Move { card: id(3), column: id(DONE) },
            Call::Move { card: id(2), column: id(DONE) },
            Call::Move { card: id(1), column: id(DONE) },
        ]
    );
    // Move-to-top of the reversed list restores fetch order at the top of Done.
    assert_eq!(board.column_cards(DONE), vec![1, 2, 3, 10, 11]);
    assert!(board.column_cards(QA).is_empty());

    let SweepOutcome::Completed(report) = outcome else {
        panic!("expected a completed run, got {outcome:?}");
    };
    assert_eq!(report.qa_cards, 3);
    assert_eq!(report.done_cards, 8);
    assert_eq!(report.expected_overflow, 3);
    assert_eq!(report.moved.map(|m| m.succeeded), Some(3));
    assert_eq!(report.archived.map(|a| a.succeeded), Some(3));
}

#[tokio::test]
async fn test_done_column_under_limit_archives_nothing() {
    let board = Arc::new(board(&[1], &[10]));
    let sweeper = Sweeper::new(board.clone(), fresh_deploy(), config("10"));

    let outcome = sweeper.run_at(now()).await.unwrap();

    let SweepOutcome::Completed(report) = outcome else {
        panic!("expected a completed run, got {outcome:?}");
    };
    assert_eq!(report.expected_overflow, 0);
    assert_eq!(report.archived.map(|a| a.total), Some(0));
    assert!(!board
        .mutation_calls()
        .iter()
        .any(|c| matches!(c, Call::Archive(_))));
}

#[tokio::test]
async fn test_missing_project_is_fatal_and_named() {
    let board = Arc::new(FakeBoard::new().with_project(3, "Roadmap"));
    let sweeper = Sweeper::new(board.clone(), fresh_deploy(), config("5"));

    let err = sweeper.run_at(now()).await.unwrap_err();

    assert!(matches!(
        err,
        SweepError::NotFound {
            entity: EntityKind::Project,
            ..
        }
    ));
    assert_eq!(err.to_string(), "project 'Release Board' not found");
    assert!(board.mutation_calls().is_empty());
}

#[tokio::test]
async fn test_missing_qa_column_is_fatal_and_named() {
    let board = Arc::new(
        FakeBoard::new()
            .with_project(3, "Release Board")
            .with_column(3, DONE, "Done", &[]),
    );
    let sweeper = Sweeper::new(board.clone(), fresh_deploy(), config("5"));

    let err = sweeper.run_at(now()).await.unwrap_err();

    assert_eq!(err.to_string(), "column 'QA' not found");
    assert!(board.mutation_calls().is_empty());
}

#[tokio::test]
async fn test_health_failure_aborts_before_any_board_call() {
    let board = Arc::new(board(&[1], &[]));
    let health = Arc::new(FakeHealth::failing(BoardError::Network {
        message: "dns lookup failed".to_string(),
    }));
    let sweeper = Sweeper::new(board.clone(), health, config("5"));

    let err = sweeper.run_at(now()).await.unwrap_err();

    assert!(matches!(err, SweepError::Board { .. }));
    assert!(board.calls().is_empty());
}

#[tokio::test]
async fn test_qa_listing_failure_aborts_before_moving() {
    let board = Arc::new(
        board(&[1, 2], &[]).with_failing_page(QA, 1, BoardError::Remote { status: 500 }),
    );
    let sweeper = Sweeper::new(board.clone(), fresh_deploy(), config("5"));

    let err = sweeper.run_at(now()).await.unwrap_err();

    assert!(err.to_string().contains("failed to fetch page 1"));
    assert!(board.mutation_calls().is_empty());
}

#[tokio::test]
async fn test_failed_moves_do_not_abort_the_run() {
    let board = Arc::new(
        board(&[1, 2, 3], &[])
            .with_response(2, Scripted::Status(403)),
    );
    let sweeper = Sweeper::new(board.clone(), fresh_deploy(), config("0"));

    let outcome = sweeper.run_at(now()).await.unwrap();

    let SweepOutcome::Completed(report) = outcome else {
        panic!("expected a completed run, got {outcome:?}");
    };
    let moved = report.moved.unwrap();
    assert_eq!((moved.succeeded, moved.failed), (2, 1));
    // Card 2 stayed in QA; the two moved cards are archived with a zero limit.
    assert_eq!(board.column_cards(QA), vec![2]);
    assert_eq!(report.archived.map(|a| a.total), Some(2));
}

#[tokio::test]
async fn test_dry_run_reads_but_never_mutates() {
    let board = Arc::new(board(&[1, 2, 3], &[10, 11, 12]));
    let sweeper = Sweeper::new(board.clone(), fresh_deploy(), config("4")).with_dry_run(true);

    let outcome = sweeper.run_at(now()).await.unwrap();

    assert!(board.mutation_calls().is_empty());
    assert_eq!(
        outcome,
        SweepOutcome::Completed(SweepReport {
            qa_cards: 3,
            done_cards: 6,
            expected_overflow: 2,
            moved: None,
            archived: None,
        })
    );
}

#[tokio::test(start_paused = true)]
async fn test_custom_batch_policy_paces_large_moves() {
    let qa: Vec<u64> = (1..=100).collect();
    let board = Arc::new(board(&qa, &[]));
    let policy = crate::BatchPolicy {
        throttle_delay: Duration::from_millis(10),
        ..crate::BatchPolicy::default()
    };
    let sweeper =
        Sweeper::new(board.clone(), fresh_deploy(), config("200")).with_batch_policy(policy);
    let start = Instant::now();

    let outcome = sweeper.run_at(now()).await.unwrap();

    let elapsed = start.elapsed();
    assert!(elapsed >= Duration::from_millis(990), "elapsed {elapsed:?}");
    assert!(elapsed < Duration::from_secs(2), "elapsed {elapsed:?}");
    let SweepOutcome::Completed(report) = outcome else {
        panic!("expected a completed run, got {outcome:?}");
    };
    assert_eq!(report.moved.map(|m| m.succeeded), Some(100));
    assert_eq!(board.column_cards(DONE).len(), 100);
}
