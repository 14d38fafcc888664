// Flight offer aggregation across independent sources

pub mod aggregator;
pub mod config;
pub mod dedup;
pub mod fan_out;
pub mod flight;
pub mod http_api;
pub mod identifier;
pub mod logger;
pub mod normalizer;
pub mod source_client;

// Re-export key types for convenience
pub use aggregator::{AggregateError, FlightAggregator, FlightSearch};
pub use config::{AggregatorConfig, ConfigError, ServiceConfig};
pub use flight::{AggregateResult, FlightBatch, FlightRecord, Slice};
pub use logger::{LogLevel, Logger, NoOpLogger, RecordingLogger, TracingLogger};
pub use source_client::{ProviderResult, ReqwestTransport, SourceFailure, Transport, TransportError};
