//! Port traits implemented by infrastructure adapters.
//!
//! The orchestration layer depends only on these traits. The `github` crate
//! supplies the production implementations; tests supply in-memory fakes.

use async_trait::async_trait;

use crate::{
    BoardError, Card, CardId, Column, ColumnId, DeployHealth, HttpStatus, Project, ProjectId,
    RepositoryId,
};

/// Read and write access to a project board.
///
/// List calls fail with [`BoardError::Remote`] on a non-success status.
/// Mutating calls return the raw [`HttpStatus`] so the caller decides how to
/// classify it; only a transport or decoding failure is an `Err`.
#[async_trait]
pub trait ProjectBoard: Send + Sync {
    /// Lists the project boards of a repository.
    ///
    /// Single page only: repositories are assumed to hold few enough projects
    /// to fit in one page.
    async fn list_projects(&self, repository: &RepositoryId) -> Result<Vec<Project>, BoardError>;

    /// Lists the columns of a project.
    ///
    /// Single page only, with the same assumption as [`Self::list_projects`].
    async fn list_columns(&self, project: ProjectId) -> Result<Vec<Column>, BoardError>;

    /// Fetches one page of not-archived cards of a column.
    ///
    /// `page` is 1-based; `per_page` is the requested page size.
    async fn list_cards_page(
        &self,
        column: ColumnId,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<Card>, BoardError>;

    /// Moves a card to the top of `column`.
    async fn move_card_to_top(
        &self,
        card: CardId,
        column: ColumnId,
    ) -> Result<HttpStatus, BoardError>;

    /// Marks a card as archived.
    async fn archive_card(&self, card: CardId) -> Result<HttpStatus, BoardError>;
}

/// Source of the latest production deploy time.
#[async_trait]
pub trait DeployHealthSource: Send + Sync {
    /// Fetches the health document.
    ///
    /// Fails with [`BoardError::Remote`]/[`BoardError::Network`] when the
    /// endpoint cannot be read and [`BoardError::Data`] when the body is not
    /// JSON.
    async fn fetch_health(&self) -> Result<DeployHealth, BoardError>;
}
