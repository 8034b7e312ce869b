use async_trait::async_trait;
use shared::{
    domain::HistoryEntry,
    error::RequestError,
    protocol::{HistoryResponse, HISTORY_PATH},
};
use tracing::debug;

use crate::transport::{map_request_error, read_json, HttpTransport};

const ENDPOINT: &str = "GET /history";

#[async_trait]
pub trait HistoryService: Send + Sync {
    /// Full list in storage order. No paging and no caching between calls.
    async fn fetch(&self) -> Result<Vec<HistoryEntry>, RequestError>;
}

#[derive(Debug, Clone)]
pub struct HistoryClient {
    transport: HttpTransport,
}

impl HistoryClient {
    pub fn new(transport: HttpTransport) -> Self {
        Self { transport }
    }
}

#[async_trait]
impl HistoryService for HistoryClient {
    async fn fetch(&self) -> Result<Vec<HistoryEntry>, RequestError> {
        let response = self
            .transport
            .http()
            .get(self.transport.url(HISTORY_PATH))
            .send()
            .await
            .map_err(|err| map_request_error(ENDPOINT, err))?;
        let entries: HistoryResponse = read_json(ENDPOINT, response).await?;
        debug!(entries = entries.len(), "history fetched");
        Ok(entries)
    }
}
