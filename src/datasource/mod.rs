//! Источники данных для движка: подписка и публикация поверх брокера.
//!
//! - `configuration`: конфигурации событий, разбираемые из входа запроса.
//! - `subscription`: отпечаток запроса и запуск подписки.
//! - `publish`: публикация и подтверждение `{"success": ...}`.

pub mod configuration;
pub mod publish;
pub mod subscription;

pub use configuration::{PublishEventConfiguration, SubscriptionEventConfiguration};
pub use publish::{PublishAck, PublishDataSource};
pub use subscription::SubscriptionSource;
