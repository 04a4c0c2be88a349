//! BoardSweeper GitHub infrastructure adapter.
//!
//! Implements the [`board::ProjectBoard`] trait against the GitHub Projects
//! (classic) REST API and the [`board::DeployHealthSource`] trait against a
//! plain JSON health endpoint.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** This crate must not contain domain rules.
//! HTTP transport, authentication headers, URL layout, and status/JSON
//! decoding are handled here; the orchestration layer never sees them.
//!
//! No request is retried and no per-request timeout is set; the `reqwest`
//! client defaults apply.

pub mod config;
pub mod fetcher;
pub mod health;
pub mod projects;

pub use config::{GithubConfig, DEFAULT_API_BASE_URL};
pub use fetcher::JsonFetcher;
pub use health::HttpDeployHealth;
pub use projects::GithubProjectBoard;
