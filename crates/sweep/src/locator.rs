//! Board locator: resolves configured names to board identifiers.
//!
//! Both lookups issue a single list call and scan it for an exact name match.
//! Neither follows pagination; a repository is assumed to have few enough
//! projects, and a project few enough columns, to fit in the first page.

use std::sync::Arc;

use board::{
    BoardResultExt, Column, ColumnName, Project, ProjectBoard, ProjectId, ProjectName,
    RepositoryId, SweepError,
};

/// Resolves project and column names.
#[derive(Clone)]
pub struct BoardLocator {
    board: Arc<dyn ProjectBoard>,
}

impl BoardLocator {
    /// Creates a locator backed by `board`.
    pub fn new(board: Arc<dyn ProjectBoard>) -> Self {
        Self { board }
    }

    /// Returns the first project of `repository` whose name equals `name`.
    ///
    /// `Ok(None)` means the list succeeded but nothing matched; callers treat
    /// it as fatal.
    #[tracing::instrument(skip_all, fields(repository = %repository, project = %name))]
    pub async fn find_project(
        &self,
        repository: &RepositoryId,
        name: &ProjectName,
    ) -> Result<Option<Project>, SweepError> {
        let projects = self
            .board
            .list_projects(repository)
            .await
            .with_step(|| format!("failed to list projects of {repository}"))?;
        tracing::debug!(count = projects.len(), "projects listed");

        Ok(projects.into_iter().find(|p| p.name == name.as_str()))
    }

    /// Returns the first column of `project` whose name equals `name`.
    ///
    /// `Ok(None)` means the list succeeded but nothing matched.
    #[tracing::instrument(skip_all, fields(column = %name, project = %project))]
    pub async fn find_column(
        &self,
        name: &ColumnName,
        project: ProjectId,
    ) -> Result<Option<Column>, SweepError> {
        let columns = self
            .board
            .list_columns(project)
            .await
            .with_step(|| format!("failed to list columns of project {project}"))?;
        tracing::debug!(count = columns.len(), "columns listed");

        Ok(columns.into_iter().find(|c| c.name == name.as_str()))
    }
}

#[cfg(test)]
#[path = "locator_tests.rs"]
mod tests;
