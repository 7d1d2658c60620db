pub mod broker;
pub mod datasource;

pub use broker::*;
pub use datasource::*;

use std::any::Any;

use thiserror::Error;

use crate::{ErrorExt, StatusCode};

/// Ошибка с произвольным кодом и сообщением; её создают `bail!` и
/// `ensure!`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct GenericError {
    code: StatusCode,
    message: String,
}

impl GenericError {
    pub fn new(
        code: StatusCode,
        message: impl Into<String>,
    ) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl ErrorExt for GenericError {
    fn status_code(&self) -> StatusCode {
        self.code
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generic_error_keeps_code() {
        let err = GenericError::new(StatusCode::InvalidConfig, "broker.channel_capacity is 0");
        assert_eq!(err.status_code(), StatusCode::InvalidConfig);
        assert_eq!(err.to_string(), "broker.channel_capacity is 0");
        assert!(err
            .metrics_tags()
            .iter()
            .any(|(k, v)| *k == "error_type" && v == "GenericError"));
    }
}
