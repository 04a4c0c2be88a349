//! Validated run configuration.
//!
//! Raw inputs arrive as strings from the input provider and are validated
//! exactly once into a [`SweepConfig`], before any network request is made.
//! Credentials are not part of this struct; they belong to the adapter that
//! uses them.

use crate::{CardLimit, ColumnName, ProjectName, RepositoryId, SweepError};

/// Unvalidated inputs, exactly as supplied by the input provider.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepInputs {
    /// `"owner/repo"` of the repository owning the project board.
    pub repository: String,
    /// Name of the project board.
    pub project_name: String,
    /// Name of the column cards are moved into and trimmed.
    pub done_column_name: String,
    /// Name of the column cards are moved out of.
    pub qa_column_name: String,
    /// Maximum number of cards kept in the Done column, as an integer string.
    pub done_column_card_limit: String,
}

/// Validated configuration for one sweep run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweepConfig {
    /// Repository owning the project board.
    pub repository: RepositoryId,
    /// Project board to operate on.
    pub project_name: ProjectName,
    /// Destination column.
    pub done_column: ColumnName,
    /// Source column.
    pub qa_column: ColumnName,
    /// Retention limit for the destination column.
    pub done_column_card_limit: CardLimit,
}

impl SweepConfig {
    /// Validates raw inputs.
    ///
    /// Fails with [`SweepError::Validation`] naming the first invalid field.
    pub fn from_inputs(inputs: &SweepInputs) -> Result<Self, SweepError> {
        Ok(Self {
            repository: inputs.repository.parse()?,
            project_name: ProjectName::parse(inputs.project_name.as_str())?,
            done_column: ColumnName::parse(inputs.done_column_name.as_str())?,
            qa_column: ColumnName::parse(inputs.qa_column_name.as_str())?,
            done_column_card_limit: inputs.done_column_card_limit.parse()?,
        })
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
