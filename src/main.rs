use anyhow::Context;
use flight_aggregator::config::ServiceConfig;
use flight_aggregator::http_api::router;
use flight_aggregator::logger::TracingLogger;
use flight_aggregator::source_client::ReqwestTransport;
use flight_aggregator::FlightAggregator;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // RUST_LOG wins, otherwise info
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let config = ServiceConfig::from_env().context("loading configuration")?;
    let transport = ReqwestTransport::new().context("building HTTP client")?;
    let aggregator = FlightAggregator::new(
        config.aggregator,
        Arc::new(transport),
        Arc::new(TracingLogger),
    )?;

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("binding {}", config.bind_addr))?;
    tracing::info!(
        "Serving flights from {} sources on {} (time limit {}ms)",
        aggregator.config().sources.len(),
        config.bind_addr,
        aggregator.config().time_limit.as_millis()
    );

    axum::serve(listener, router(Arc::new(aggregator)))
        .await
        .context("HTTP server stopped")?;

    Ok(())
}
