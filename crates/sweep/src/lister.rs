//! Paginated listing of a column's cards.

use std::sync::Arc;

use board::{BoardResultExt, Card, ColumnId, ProjectBoard, SweepError};

/// Number of cards requested per page; the board API's maximum.
pub const CARD_PAGE_SIZE: u32 = 100;

/// Lists every not-archived card of a column.
#[derive(Clone)]
pub struct CardLister {
    board: Arc<dyn ProjectBoard>,
}

impl CardLister {
    /// Creates a lister backed by `board`.
    pub fn new(board: Arc<dyn ProjectBoard>) -> Self {
        Self { board }
    }

    /// Fetches pages 1, 2, 3, … until a page holds fewer than
    /// [`CARD_PAGE_SIZE`] cards, and returns all cards in API order.
    ///
    /// A full page always means "maybe more", so a column holding an exact
    /// multiple of the page size costs one extra, empty request. A failure on
    /// any page discards the pages already fetched.
    #[tracing::instrument(skip_all, fields(column = %column))]
    pub async fn list_column_cards(&self, column: ColumnId) -> Result<Vec<Card>, SweepError> {
        let mut cards = Vec::new();
        let mut page = 1;
        loop {
            let batch = self
                .board
                .list_cards_page(column, page, CARD_PAGE_SIZE)
                .await
                .with_step(|| format!("failed to fetch page {page} of cards in column {column}"))?;
            let fetched = batch.len();
            tracing::debug!(page, fetched, "card page fetched");
            cards.extend(batch);

            if fetched < CARD_PAGE_SIZE as usize {
                break;
            }
            page += 1;
        }
        tracing::debug!(total = cards.len(), pages = page, "column cards listed");
        Ok(cards)
    }
}

#[cfg(test)]
#[path = "lister_tests.rs"]
mod tests;
