//! Порты адаптера: контракты, которые реализует конкретный брокер и
//! вызывающая сторона.

pub mod broker_port;
pub mod sink_port;

pub use broker_port::{BrokerCapability, BrokerConnector};
pub use sink_port::SubscriptionSink;
