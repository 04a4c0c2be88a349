//! Generic HTTP/JSON fetcher shared by both adapters.

use board::{BoardError, HttpStatus};
use reqwest::{Client, IntoUrl, RequestBuilder};
use serde::de::DeserializeOwned;

/// Issues requests on a preconfigured [`Client`] and maps every failure onto
/// [`BoardError`].
#[derive(Debug, Clone)]
pub struct JsonFetcher {
    client: Client,
}

impl JsonFetcher {
    /// Wraps an existing client (with its default headers).
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// The underlying client, for building non-GET requests.
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// GETs `url` and decodes the JSON body.
    ///
    /// Any `2xx` or `3xx` status is accepted; anything else fails with
    /// [`BoardError::Remote`]. A body that does not decode into `T` fails with
    /// [`BoardError::Data`].
    pub async fn get_json<T, U>(&self, url: U) -> Result<T, BoardError>
    where
        T: DeserializeOwned,
        U: IntoUrl,
    {
        self.fetch_json(self.client.get(url)).await
    }

    /// Sends a prepared read request and decodes the JSON body, with the same
    /// status rules as [`Self::get_json`].
    pub async fn fetch_json<T>(&self, request: RequestBuilder) -> Result<T, BoardError>
    where
        T: DeserializeOwned,
    {
        let response = request.send().await.map_err(transport_error)?;
        let status = HttpStatus::new(response.status().as_u16());
        if !(status.is_success() || status.is_redirection()) {
            tracing::debug!(url = %response.url(), status = status.as_u16(), "read request rejected");
            return Err(BoardError::Remote {
                status: status.as_u16(),
            });
        }
        let body = response.bytes().await.map_err(transport_error)?;
        serde_json::from_slice(&body).map_err(|err| BoardError::Data {
            message: err.to_string(),
        })
    }

    /// Sends a mutating request and returns its status without judging it.
    pub async fn send_mutation(&self, request: RequestBuilder) -> Result<HttpStatus, BoardError> {
        let response = request.send().await.map_err(transport_error)?;
        Ok(HttpStatus::new(response.status().as_u16()))
    }
}

/// Maps a `reqwest` failure onto the port error taxonomy.
pub(crate) fn transport_error(err: reqwest::Error) -> BoardError {
    if err.is_decode() {
        BoardError::Data {
            message: err.to_string(),
        }
    } else {
        BoardError::Network {
            message: err.to_string(),
        }
    }
}
