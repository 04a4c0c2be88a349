//! GitHub Projects (classic) adapter.
//!
//! | Port method | Endpoint |
//! |-------------|----------|
//! | `list_projects` | `GET /repos/{owner}/{repo}/projects` |
//! | `list_columns` | `GET /projects/{project_id}/columns` |
//! | `list_cards_page` | `GET /projects/columns/{column_id}/cards?archived_state=not_archived` |
//! | `move_card_to_top` | `POST /projects/columns/cards/{card_id}/moves` |
//! | `archive_card` | `PATCH /projects/columns/cards/{card_id}` |

use async_trait::async_trait;
use board::{
    BoardError, Card, CardId, Column, ColumnId, HttpStatus, Project, ProjectBoard, ProjectId,
    RepositoryId, SweepError,
};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::Client;
use serde::Serialize;

use crate::{GithubConfig, JsonFetcher};

/// Media type that enables the classic Projects API.
const PROJECTS_MEDIA_TYPE: &str = "application/vnd.github.inertia-preview+json";

#[derive(Serialize)]
struct MoveCardRequest {
    position: &'static str,
    column_id: u64,
}

#[derive(Serialize)]
struct ArchiveCardRequest {
    archived: bool,
}

/// [`ProjectBoard`] over the GitHub REST API.
#[derive(Debug, Clone)]
pub struct GithubProjectBoard {
    fetcher: JsonFetcher,
    base_url: String,
}

impl GithubProjectBoard {
    /// Builds an authenticated client from `config`.
    pub fn new(config: &GithubConfig) -> Result<Self, SweepError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(PROJECTS_MEDIA_TYPE));
        let mut auth = HeaderValue::from_str(&format!("token {}", config.token())).map_err(|_| {
            SweepError::Configuration {
                message: "board API token contains characters not allowed in a header".to_string(),
            }
        })?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let client = Client::builder()
            .user_agent(config.user_agent())
            .default_headers(headers)
            .build()
            .map_err(|err| SweepError::Configuration {
                message: format!("failed to build board API client: {err}"),
            })?;

        Ok(Self {
            fetcher: JsonFetcher::new(client),
            base_url: config.api_base_url().to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

#[async_trait]
impl ProjectBoard for GithubProjectBoard {
    async fn list_projects(&self, repository: &RepositoryId) -> Result<Vec<Project>, BoardError> {
        let url = self.url(&format!(
            "/repos/{}/{}/projects",
            repository.owner(),
            repository.name()
        ));
        self.fetcher.get_json(url).await
    }

    async fn list_columns(&self, project: ProjectId) -> Result<Vec<Column>, BoardError> {
        self.fetcher
            .get_json(self.url(&format!("/projects/{project}/columns")))
            .await
    }

    async fn list_cards_page(
        &self,
        column: ColumnId,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<Card>, BoardError> {
        let request = self
            .fetcher
            .client()
            .get(self.url(&format!("/projects/columns/{column}/cards")))
            .query(&[
                ("archived_state", "not_archived".to_string()),
                ("per_page", per_page.to_string()),
                ("page", page.to_string()),
            ]);
        self.fetcher.fetch_json(request).await
    }

    async fn move_card_to_top(
        &self,
        card: CardId,
        column: ColumnId,
    ) -> Result<HttpStatus, BoardError> {
        let request = self
            .fetcher
            .client()
            .post(self.url(&format!("/projects/columns/cards/{card}/moves")))
            .json(&MoveCardRequest {
                position: "top",
                column_id: column.as_u64(),
            });
        self.fetcher.send_mutation(request).await
    }

    async fn archive_card(&self, card: CardId) -> Result<HttpStatus, BoardError> {
        let request = self
            .fetcher
            .client()
            .patch(self.url(&format!("/projects/columns/cards/{card}")))
            .json(&ArchiveCardRequest { archived: true });
        self.fetcher.send_mutation(request).await
    }
}

#[cfg(test)]
#[path = "projects_tests.rs"]
mod tests;
