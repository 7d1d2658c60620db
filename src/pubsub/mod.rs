//! Реализации портов брокера и приёмника.
//!
//! - `memory`: внутрипроцессный брокер и коннектор к нему.
//! - `message`: сообщение, проходящее через топик.
//! - `sink`: приёмник подписки поверх `mpsc`-канала.

pub mod memory;
pub mod message;
pub mod sink;

pub use memory::{InMemoryBroker, InMemoryConnector};
pub use message::Message;
pub use sink::{ChannelSink, SinkReceiver};
