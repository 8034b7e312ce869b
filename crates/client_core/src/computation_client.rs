use async_trait::async_trait;
use shared::{
    domain::{ComputationResult, ParameterSet},
    error::RequestError,
    protocol::{RunResponse, RUN_PATH},
};
use tracing::debug;

use crate::transport::{map_request_error, read_json, HttpTransport};

const ENDPOINT: &str = "POST /run";

#[async_trait]
pub trait ComputeService: Send + Sync {
    /// One round trip, no retries. The service stores the history entry as
    /// a side effect; this call never touches local history.
    async fn run(&self, params: &ParameterSet) -> Result<ComputationResult, RequestError>;
}

#[derive(Debug, Clone)]
pub struct ComputationClient {
    transport: HttpTransport,
}

impl ComputationClient {
    pub fn new(transport: HttpTransport) -> Self {
        Self { transport }
    }
}

#[async_trait]
impl ComputeService for ComputationClient {
    async fn run(&self, params: &ParameterSet) -> Result<ComputationResult, RequestError> {
        debug!(a1 = params.a1, b1 = params.b1, "sending run request");
        let response = self
            .transport
            .http()
            .post(self.transport.url(RUN_PATH))
            .json(params)
            .send()
            .await
            .map_err(|err| map_request_error(ENDPOINT, err))?;
        let body: RunResponse = read_json(ENDPOINT, response).await?;
        Ok(body.result)
    }
}
