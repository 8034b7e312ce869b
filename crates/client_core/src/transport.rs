//! Shared HTTP plumbing for the computation and history clients.

use std::time::Duration;

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use shared::error::RequestError;

use crate::config::Settings;

/// A configured HTTP client bound to the service base url.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: Client,
    base_url: String,
}

impl HttpTransport {
    /// Every request made through this transport is bounded by `timeout`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(base_url, http))
    }

    pub fn with_client(base_url: impl Into<String>, http: Client) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        Self::new(settings.base_url.clone(), settings.request_timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn http(&self) -> &Client {
        &self.http
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

/// Checks the status and decodes the JSON body.
pub(crate) async fn read_json<T: DeserializeOwned>(
    endpoint: &str,
    response: Response,
) -> Result<T, RequestError> {
    let response = response
        .error_for_status()
        .map_err(|err| map_request_error(endpoint, err))?;
    response
        .json::<T>()
        .await
        .map_err(|err| map_request_error(endpoint, err))
}

pub(crate) fn map_request_error(endpoint: &str, err: reqwest::Error) -> RequestError {
    let endpoint = endpoint.to_string();
    if err.is_timeout() {
        RequestError::Timeout { endpoint }
    } else if let Some(status) = err.status() {
        RequestError::Status {
            endpoint,
            status: status.as_u16(),
        }
    } else if err.is_decode() {
        RequestError::Decode {
            endpoint,
            message: err.to_string(),
        }
    } else {
        RequestError::Transport {
            endpoint,
            message: err.to_string(),
        }
    }
}
