// Fan-out coordinator: fetch every source at once and race the lot against one time limit

use crate::log_warn;
use crate::logger::Logger;
use crate::source_client::{ProviderResult, SourceClient};
use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
#[error("Time limit exceeded")]
pub struct TimeoutExceeded {
    pub limit: Duration,
}

pub struct FanOutCoordinator {
    client: Arc<SourceClient>,
    logger: Arc<dyn Logger>,
}

impl FanOutCoordinator {
    pub fn new(client: Arc<SourceClient>, logger: Arc<dyn Logger>) -> Self {
        Self { client, logger }
    }

    /// Fetches all `urls` concurrently.
    ///
    /// Returns one result per URL, in input order, if every fetch settles within
    /// `time_limit`. Otherwise the whole batch loses the race: the pending fetches
    /// are dropped (which cancels them) and nothing they produce later is observable.
    pub async fn fetch_all(
        &self,
        urls: &[String],
        time_limit: Duration,
    ) -> Result<Vec<ProviderResult>, TimeoutExceeded> {
        let fetches = join_all(urls.iter().map(|url| self.client.fetch(url)));

        match tokio::time::timeout(time_limit, fetches).await {
            Ok(results) => Ok(results),
            Err(_) => {
                log_warn!(
                    self.logger,
                    "Fetching {} flight sources exceeded the {}ms time limit",
                    urls.len(),
                    time_limit.as_millis()
                );
                Err(TimeoutExceeded { limit: time_limit })
            }
        }
    }
}
