/// Ports: contracts implemented by concrete brokers and by the caller.
pub mod application;
/// Settings loading (defaults, file, environment).
pub mod config;
/// Subscription and publish data sources for the query engine.
pub mod datasource;
/// Request fingerprinting over raw configuration bytes.
pub mod fingerprint;
/// Flexible logging (formatting, filters).
pub mod logging;
/// In-process broker, connector and channel sink.
pub mod pubsub;

// -----------------------------------------------------------------------------
//  Frequently used public types
// -----------------------------------------------------------------------------

/// Broker and sink ports.
pub use application::{BrokerCapability, BrokerConnector, SubscriptionSink};
/// config
pub use config::{BrokerSettings, Settings};
/// Event configurations and data sources.
pub use datasource::{
    PublishAck, PublishDataSource, PublishEventConfiguration, SubscriptionEventConfiguration,
    SubscriptionSource,
};
/// Fingerprints.
pub use fingerprint::{Fingerprint, FingerprintAlgorithm, FingerprintHasher, RequestFingerprinter};
/// Logging setup.
pub use logging::{init_logging, LogFormat, LoggingConfig};
/// Pub/Sub API.
pub use pubsub::{ChannelSink, InMemoryBroker, InMemoryConnector, Message, SinkReceiver};

/// Error types and result alias.
pub use eventbridge_error::{
    BridgeResult, BrokerError, ClosedError, ConfigError, ErrorExt, ExtractionError, SinkError,
    StackError, StatusCode,
};
/// Re-exported for callers that drive subscriptions.
pub use tokio_util::sync::CancellationToken;
