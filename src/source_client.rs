// Source client: one outbound fetch per flight source.
// Every failure is absorbed here and turned into ProviderResult::Failed.

use crate::flight::FlightBatch;
use crate::{log_error, log_trace};
use crate::logger::Logger;
use async_trait::async_trait;
use bytes::Bytes;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransportError {
    #[error("HTTP status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Body read error: {0}")]
    Body(String),

    #[error("Client error: {0}")]
    Client(String),
}

// Why a single source produced no data
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SourceFailure {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("Invalid flight payload: {0}")]
    Decode(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProviderResult {
    Fetched(FlightBatch),
    Failed(SourceFailure),
}

impl ProviderResult {
    pub fn is_failed(&self) -> bool {
        matches!(self, ProviderResult::Failed(_))
    }
}

// Raw "GET url -> body bytes" primitive
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    async fn get(&self, url: &str) -> Result<Bytes, TransportError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("flight_aggregator/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| TransportError::Client(e.to_string()))?;

        Ok(Self { client })
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn get(&self, url: &str) -> Result<Bytes, TransportError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| TransportError::Connection(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            // Keep whatever the source said about the failure for the log
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response
            .bytes()
            .await
            .map_err(|e| TransportError::Body(e.to_string()))
    }
}

pub struct SourceClient {
    transport: Arc<dyn Transport>,
    logger: Arc<dyn Logger>,
}

impl SourceClient {
    pub fn new(transport: Arc<dyn Transport>, logger: Arc<dyn Logger>) -> Self {
        Self { transport, logger }
    }

    // Never returns an error: failures come back as ProviderResult::Failed
    pub async fn fetch(&self, url: &str) -> ProviderResult {
        match self.try_fetch(url).await {
            Ok(batch) => {
                log_trace!(
                    self.logger,
                    "Flight source {} returned {} flights",
                    url,
                    batch.flights.len()
                );
                ProviderResult::Fetched(batch)
            }
            Err(failure) => {
                log_error!(self.logger, "Flight source {} failed: {}", url, failure);
                ProviderResult::Failed(failure)
            }
        }
    }

    async fn try_fetch(&self, url: &str) -> Result<FlightBatch, SourceFailure> {
        let body = self.transport.get(url).await?;
        serde_json::from_slice(&body).map_err(|e| SourceFailure::Decode(e.to_string()))
    }
}
