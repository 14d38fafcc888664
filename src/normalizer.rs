// Response normalizer: drop failed sources and flatten the rest into one list

use crate::flight::{FlightRecord, EXPECTED_SLICES};
use crate::log_warn;
use crate::logger::Logger;
use crate::source_client::ProviderResult;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum NormalizeError {
    #[error("No flight sources available")]
    NoSourcesAvailable,
}

pub struct ResponseNormalizer {
    logger: Arc<dyn Logger>,
}

impl ResponseNormalizer {
    pub fn new(logger: Arc<dyn Logger>) -> Self {
        Self { logger }
    }

    /// Keeps provider order, then record order within each batch.
    ///
    /// Fails only when no source produced a batch at all; sources that answered
    /// with zero flights still count as available. Offers without exactly two
    /// slices are dropped here since nothing downstream can key them.
    pub fn normalize(
        &self,
        results: Vec<ProviderResult>,
    ) -> Result<Vec<FlightRecord>, NormalizeError> {
        let batches: Vec<_> = results
            .into_iter()
            .filter_map(|result| match result {
                ProviderResult::Fetched(batch) => Some(batch),
                ProviderResult::Failed(_) => None,
            })
            .collect();

        if batches.is_empty() {
            return Err(NormalizeError::NoSourcesAvailable);
        }

        let mut flights = Vec::new();
        let mut rejected = 0;
        for flight in batches.into_iter().flat_map(|batch| batch.flights) {
            if flight.is_well_formed() {
                flights.push(flight);
            } else {
                rejected += 1;
            }
        }

        if rejected > 0 {
            log_warn!(
                self.logger,
                "Dropped {} flight offers without exactly {} slices",
                rejected,
                EXPECTED_SLICES
            );
        }

        Ok(flights)
    }
}
