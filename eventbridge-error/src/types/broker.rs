//! Ошибки брокера.
//!
//! [`ClosedError`] возвращается на любой вызов после `shutdown`.
//! [`BrokerError`]: общий словарь ошибок, который могут использовать
//! реализации брокера. Реализации вправе возвращать собственные типы:
//! адаптеры пробрасывают их без изменений.

use std::any::Any;

use thiserror::Error;

use crate::{ErrorExt, StatusCode};

/// Операция вызвана после остановки брокера.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("broker is shut down (attempted `{operation}`)")]
pub struct ClosedError {
    pub operation: &'static str,
}

/// Ошибки, определяемые реализацией брокера.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BrokerError {
    #[error("operation cancelled")]
    Cancelled,

    #[error("broker operation timed out")]
    Timeout,

    #[error("unknown topic `{topic}`")]
    UnknownTopic { topic: String },

    #[error("provider `{requested}` is not served by broker `{actual}`")]
    ProviderMismatch { requested: String, actual: String },

    #[error("broker connection lost: {reason}")]
    Disconnected { reason: String },

    #[error("broker rejected the request: {reason}")]
    Rejected { reason: String },
}

impl ClosedError {
    pub fn new(operation: &'static str) -> Self {
        Self { operation }
    }
}

impl ErrorExt for ClosedError {
    fn status_code(&self) -> StatusCode {
        StatusCode::BrokerClosed
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl ErrorExt for BrokerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Cancelled => StatusCode::Cancelled,
            Self::Timeout => StatusCode::Timeout,
            Self::UnknownTopic { .. } => StatusCode::NotFound,
            Self::ProviderMismatch { .. } => StatusCode::ProviderMismatch,
            Self::Disconnected { .. } => StatusCode::ConnectionClosed,
            Self::Rejected { .. } => StatusCode::BrokerRejected,
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn metrics_tags(&self) -> Vec<(&'static str, String)> {
        let mut tags = vec![
            ("error_type", "broker".to_string()),
            ("status_code", self.status_code().to_string()),
        ];

        match self {
            Self::UnknownTopic { topic } => tags.push(("topic", topic.clone())),
            Self::ProviderMismatch { requested, .. } => {
                tags.push(("provider_id", requested.clone()))
            }
            _ => {}
        }

        tags
    }
}
