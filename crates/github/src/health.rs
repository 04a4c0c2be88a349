//! Deploy health endpoint adapter.

use async_trait::async_trait;
use board::{BoardError, DeployHealth, DeployHealthSource, SweepError};
use reqwest::{Client, Url};

use crate::{GithubConfig, JsonFetcher};

/// [`DeployHealthSource`] reading a JSON document over HTTP(S).
///
/// The board API token is never sent to this endpoint.
#[derive(Debug, Clone)]
pub struct HttpDeployHealth {
    fetcher: JsonFetcher,
    url: Url,
}

impl HttpDeployHealth {
    /// Builds an unauthenticated client for `config.health_url()`.
    pub fn new(config: &GithubConfig) -> Result<Self, SweepError> {
        let client = Client::builder()
            .user_agent(config.user_agent())
            .build()
            .map_err(|err| SweepError::Configuration {
                message: format!("failed to build health client: {err}"),
            })?;
        Ok(Self {
            fetcher: JsonFetcher::new(client),
            url: config.health_url().clone(),
        })
    }
}

#[async_trait]
impl DeployHealthSource for HttpDeployHealth {
    async fn fetch_health(&self) -> Result<DeployHealth, BoardError> {
        tracing::debug!(url = %self.url, "fetching deploy health");
        self.fetcher.get_json(self.url.clone()).await
    }
}

#[cfg(test)]
#[path = "health_tests.rs"]
mod tests;
