//! In-memory port fakes shared by the unit tests of this crate.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use board::{
    BoardError, Card, CardId, Column, ColumnId, DeployHealth, DeployHealthSource, HttpStatus,
    Project, ProjectBoard, ProjectId, RepositoryId,
};

/// One call observed by [`FakeBoard`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ListProjects,
    ListColumns(ProjectId),
    ListCards { column: ColumnId, page: u32 },
    Move { card: CardId, column: ColumnId },
    Archive(CardId),
}

/// Scripted response for one card's mutation.
#[derive(Debug, Clone)]
pub enum Scripted {
    Status(u16),
    Error(BoardError),
}

#[derive(Default)]
struct State {
    projects: Vec<Project>,
    columns: HashMap<ProjectId, Vec<Column>>,
    cards: HashMap<ColumnId, Vec<Card>>,
    scripted: HashMap<CardId, Scripted>,
    failing_pages: HashMap<(ColumnId, u32), BoardError>,
    projects_failure: Option<BoardError>,
    latency: HashMap<CardId, Duration>,
    calls: Vec<Call>,
    completed: Vec<CardId>,
}

/// A project board held entirely in memory.
///
/// Moves and archives mutate the stored columns so later listings observe
/// them. Every call is recorded in order. A mutation with scripted latency
/// records its call, then waits before answering.
#[derive(Default)]
pub struct FakeBoard {
    state: Mutex<State>,
}

pub fn id<T: TryFrom<u64>>(raw: u64) -> T
where
    T::Error: std::fmt::Debug,
{
    T::try_from(raw).unwrap()
}

pub fn cards(ids: impl IntoIterator<Item = u64>) -> Vec<Card> {
    ids.into_iter()
        .map(|raw| Card {
            id: id(raw),
            archived: false,
        })
        .collect()
}

impl FakeBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_project(self, raw_id: u64, name: &str) -> Self {
        self.lock().projects.push(Project {
            id: id(raw_id),
            name: name.to_string(),
        });
        self
    }

    pub fn with_column(self, project: u64, raw_id: u64, name: &str, card_ids: &[u64]) -> Self {
        {
            let mut state = self.lock();
            state.columns.entry(id(project)).or_default().push(Column {
                id: id(raw_id),
                name: name.to_string(),
            });
            state
                .cards
                .insert(id(raw_id), cards(card_ids.iter().copied()));
        }
        self
    }

    pub fn with_response(self, card: u64, response: Scripted) -> Self {
        self.lock().scripted.insert(id(card), response);
        self
    }

    pub fn with_latency(self, card: u64, latency: Duration) -> Self {
        self.lock().latency.insert(id(card), latency);
        self
    }

    pub fn with_failing_page(self, column: u64, page: u32, error: BoardError) -> Self {
        self.lock().failing_pages.insert((id(column), page), error);
        self
    }

    pub fn with_failing_projects(self, error: BoardError) -> Self {
        self.lock().projects_failure = Some(error);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.lock().calls.clone()
    }

    pub fn mutation_calls(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| matches!(c, Call::Move { .. } | Call::Archive(_)))
            .collect()
    }

    /// Cards whose mutation has answered, in answer order.
    pub fn completed(&self) -> Vec<u64> {
        self.lock().completed.iter().map(|c| c.as_u64()).collect()
    }

    pub fn column_cards(&self, column: u64) -> Vec<u64> {
        self.lock()
            .cards
            .get(&id(column))
            .map(|cards| cards.iter().map(|c| c.id.as_u64()).collect())
            .unwrap_or_default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    async fn enter(&self, call: Call, card: CardId) {
        let latency = {
            let mut state = self.lock();
            state.calls.push(call);
            state.latency.get(&card).copied()
        };
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
    }

    fn scripted(state: &State, card: CardId) -> Option<Result<HttpStatus, BoardError>> {
        state.scripted.get(&card).map(|s| match s {
            Scripted::Status(code) => Ok(HttpStatus::new(*code)),
            Scripted::Error(err) => Err(err.clone()),
        })
    }
}

#[async_trait]
impl ProjectBoard for FakeBoard {
    async fn list_projects(&self, _repository: &RepositoryId) -> Result<Vec<Project>, BoardError> {
        let mut state = self.lock();
        state.calls.push(Call::ListProjects);
        match &state.projects_failure {
            Some(err) => Err(err.clone()),
            None => Ok(state.projects.clone()),
        }
    }

    async fn list_columns(&self, project: ProjectId) -> Result<Vec<Column>, BoardError> {
        let mut state = self.lock();
        state.calls.push(Call::ListColumns(project));
        Ok(state.columns.get(&project).cloned().unwrap_or_default())
    }

    async fn list_cards_page(
        &self,
        column: ColumnId,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<Card>, BoardError> {
        let mut state = self.lock();
        state.calls.push(Call::ListCards { column, page });
        if let Some(err) = state.failing_pages.get(&(column, page)) {
            return Err(err.clone());
        }
        let all = state.cards.get(&column).cloned().unwrap_or_default();
        let start = (page.saturating_sub(1) * per_page) as usize;
        let end = (start + per_page as usize).min(all.len());
        Ok(all.get(start..end).map(<[Card]>::to_vec).unwrap_or_default())
    }

    async fn move_card_to_top(
        &self,
        card: CardId,
        column: ColumnId,
    ) -> Result<HttpStatus, BoardError> {
        self.enter(Call::Move { card, column }, card).await;
        let mut state = self.lock();
        state.completed.push(card);
        if let Some(response) = Self::scripted(&state, card) {
            return response;
        }
        let already_on_top = state
            .cards
            .get(&column)
            .and_then(|cards| cards.first())
            .is_some_and(|c| c.id == card);
        if already_on_top {
            return Ok(HttpStatus::NOT_MODIFIED);
        }
        for cards in state.cards.values_mut() {
            cards.retain(|c| c.id != card);
        }
        state.cards.entry(column).or_default().insert(
            0,
            Card {
                id: card,
                archived: false,
            },
        );
        Ok(HttpStatus::new(201))
    }

    async fn archive_card(&self, card: CardId) -> Result<HttpStatus, BoardError> {
        self.enter(Call::Archive(card), card).await;
        let mut state = self.lock();
        state.completed.push(card);
        if let Some(response) = Self::scripted(&state, card) {
            return response;
        }
        let mut found = false;
        for cards in state.cards.values_mut() {
            let before = cards.len();
            cards.retain(|c| c.id != card);
            found |= cards.len() != before;
        }
        if found {
            Ok(HttpStatus::new(200))
        } else {
            Ok(HttpStatus::NOT_MODIFIED)
        }
    }
}

/// A health endpoint returning a fixed response.
pub struct FakeHealth {
    response: Result<DeployHealth, BoardError>,
}

impl FakeHealth {
    pub fn deployed_at(raw: &str) -> Self {
        Self {
            response: Ok(DeployHealth {
                latest_deploy_time: Some(raw.to_string()),
            }),
        }
    }

    pub fn failing(error: BoardError) -> Self {
        Self {
            response: Err(error),
        }
    }

    pub fn with_body(health: DeployHealth) -> Self {
        Self {
            response: Ok(health),
        }
    }
}

#[async_trait]
impl DeployHealthSource for FakeHealth {
    async fn fetch_health(&self) -> Result<DeployHealth, BoardError> {
        self.response.clone()
    }
}
