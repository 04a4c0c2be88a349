use std::sync::Arc;

use board::{BoardError, SweepError};

use super::*;
use crate::testing::{id, Call, FakeBoard};

fn page_calls(board: &FakeBoard) -> Vec<u32> {
    board
        .calls()
        .into_iter()
        .filter_map(|c| match c {
            Call::ListCards { page, .. } => Some(page),
            _ => None,
        })
        .collect()
}

#[tokio::test]
async fn test_lists_250_cards_across_three_pages() {
    let ids: Vec<u64> = (1..=250).collect();
    let board = Arc::new(FakeBoard::new().with_column(1, 7, "Done", &ids));
    let lister = CardLister::new(board.clone());

    let cards = lister.list_column_cards(id(7)).await.unwrap();

    assert_eq!(cards.len(), 250);
    assert_eq!(
        cards.iter().map(|c| c.id.as_u64()).collect::<Vec<_>>(),
        ids
    );
    assert_eq!(page_calls(&board), vec![1, 2, 3]);
}

#[tokio::test]
async fn test_exact_multiple_of_page_size_requests_trailing_empty_page() {
    let ids: Vec<u64> = (1..=200).collect();
    let board = Arc::new(FakeBoard::new().with_column(1, 7, "Done", &ids));
    let lister = CardLister::new(board.clone());

    let cards = lister.list_column_cards(id(7)).await.unwrap();

    assert_eq!(cards.len(), 200);
    assert_eq!(page_calls(&board), vec![1, 2, 3]);
}

#[tokio::test]
async fn test_empty_column_costs_one_request() {
    let board = Arc::new(FakeBoard::new().with_column(1, 7, "QA", &[]));
    let lister = CardLister::new(board.clone());

    let cards = lister.list_column_cards(id(7)).await.unwrap();

    assert!(cards.is_empty());
    assert_eq!(page_calls(&board), vec![1]);
}

#[tokio::test]
async fn test_failure_mid_pagination_discards_partial_results() {
    let ids: Vec<u64> = (1..=250).collect();
    let board = Arc::new(
        FakeBoard::new()
            .with_column(1, 7, "Done", &ids)
            .with_failing_page(7, 2, BoardError::Remote { status: 502 }),
    );
    let lister = CardLister::new(board.clone());

    let err = lister.list_column_cards(id(7)).await.unwrap_err();

    assert!(matches!(
        err,
        SweepError::Board {
            source: BoardError::Remote { status: 502 },
            ..
        }
    ));
    assert_eq!(page_calls(&board), vec![1, 2]);
}
