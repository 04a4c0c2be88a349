//! Connection settings for the GitHub and health adapters.

use board::SweepError;
use reqwest::Url;

/// Base URL of the public GitHub REST API.
pub const DEFAULT_API_BASE_URL: &str = "https://api.github.com";

/// Validated connection settings.
///
/// The token is redacted from the `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct GithubConfig {
    token: String,
    api_base_url: Url,
    health_url: Url,
    user_agent: String,
}

impl GithubConfig {
    /// Validates raw settings.
    ///
    /// Fails with [`SweepError::Configuration`] when the token is blank or
    /// either URL is not an absolute `http`/`https` URL.
    pub fn new(
        token: impl Into<String>,
        api_base_url: &str,
        health_url: &str,
    ) -> Result<Self, SweepError> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(SweepError::Configuration {
                message: "board API token must not be empty".to_string(),
            });
        }
        Ok(Self {
            token,
            api_base_url: parse_http_url("API base URL", api_base_url.trim_end_matches('/'))?,
            health_url: parse_http_url("health URL", health_url)?,
            user_agent: concat!("board-sweeper/", env!("CARGO_PKG_VERSION")).to_string(),
        })
    }

    /// The board API credential.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Base URL of the board API, without a trailing slash.
    pub fn api_base_url(&self) -> &str {
        self.api_base_url.as_str().trim_end_matches('/')
    }

    /// URL of the deploy health endpoint.
    pub fn health_url(&self) -> &Url {
        &self.health_url
    }

    /// Value of the `User-Agent` header.
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }
}

impl std::fmt::Debug for GithubConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GithubConfig")
            .field("token", &"<redacted>")
            .field("api_base_url", &self.api_base_url.as_str())
            .field("health_url", &self.health_url.as_str())
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

fn parse_http_url(label: &str, raw: &str) -> Result<Url, SweepError> {
    let url = Url::parse(raw).map_err(|err| SweepError::Configuration {
        message: format!("{label} '{raw}' is invalid: {err}"),
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(SweepError::Configuration {
            message: format!("{label} '{raw}' must use http or https, not '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
