// Aggregation facade: the one entry point the HTTP layer talks to
// fetch (raced against the time limit) -> normalize -> attach ids -> dedupe

use crate::config::{AggregatorConfig, ConfigError};
use crate::dedup::dedupe;
use crate::fan_out::{FanOutCoordinator, TimeoutExceeded};
use crate::flight::AggregateResult;
use crate::identifier::{attach_ids, SynthesisError};
use crate::logger::Logger;
use crate::normalizer::{NormalizeError, ResponseNormalizer};
use crate::source_client::{SourceClient, Transport};
use crate::{log_error, log_info};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

pub const SOURCES_UNAVAILABLE_MESSAGE: &str = "No flight sources available at the moment";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AggregateError {
    // Every source failed, or they didn't all answer in time
    #[error("{}", SOURCES_UNAVAILABLE_MESSAGE)]
    SourcesUnavailable,

    #[error("Invalid flight data: {0}")]
    InvalidFlightData(#[from] SynthesisError),
}

impl From<TimeoutExceeded> for AggregateError {
    fn from(_: TimeoutExceeded) -> Self {
        AggregateError::SourcesUnavailable
    }
}

impl From<NormalizeError> for AggregateError {
    fn from(_: NormalizeError) -> Self {
        AggregateError::SourcesUnavailable
    }
}

#[async_trait]
pub trait FlightSearch: Send + Sync + 'static {
    // Independent per call: nothing is cached or carried over between calls
    async fn get_flights(&self) -> Result<AggregateResult, AggregateError>;
}

pub struct FlightAggregator {
    config: AggregatorConfig,
    coordinator: FanOutCoordinator,
    normalizer: ResponseNormalizer,
    logger: Arc<dyn Logger>,
}

impl FlightAggregator {
    pub fn new(
        config: AggregatorConfig,
        transport: Arc<dyn Transport>,
        logger: Arc<dyn Logger>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let client = Arc::new(SourceClient::new(transport, logger.clone()));
        Ok(Self {
            config,
            coordinator: FanOutCoordinator::new(client, logger.clone()),
            normalizer: ResponseNormalizer::new(logger.clone()),
            logger,
        })
    }

    pub fn config(&self) -> &AggregatorConfig {
        &self.config
    }

    async fn aggregate(&self) -> Result<AggregateResult, AggregateError> {
        let results = self
            .coordinator
            .fetch_all(&self.config.sources, self.config.time_limit)
            .await?;
        let flights = self.normalizer.normalize(results)?;
        let flights = attach_ids(flights)?;

        Ok(AggregateResult {
            flights: dedupe(flights),
        })
    }
}

#[async_trait]
impl FlightSearch for FlightAggregator {
    async fn get_flights(&self) -> Result<AggregateResult, AggregateError> {
        log_info!(
            self.logger,
            "Fetching flights from {} sources",
            self.config.sources.len()
        );

        let outcome = self.aggregate().await;
        match &outcome {
            Ok(result) => log_info!(self.logger, "Aggregated {} flights", result.flights.len()),
            Err(e) => log_error!(self.logger, "Flight aggregation failed: {}", e),
        }

        outcome
    }
}
