//! Ошибки разбора входных данных адаптеров.
//!
//! - [`ConfigError`]: конфигурация подписки/публикации не разобрана;
//!   брокер при этом не вызывается.
//! - [`ExtractionError`]: не найдено поле, участвующее в отпечатке запроса.
//! - [`SinkError`]: не удалось записать подтверждение публикации.

use std::{any::Any, io};

use crate::{ErrorExt, StatusCode};

/// Ошибка разбора конфигурации события.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Полезная нагрузка не является корректной конфигурацией
    Malformed {
        reason: String,
        line: usize,
        column: usize,
    },
    /// Отсутствует обязательное поле
    MissingField { field: String },
}

/// Ошибка извлечения полей для отпечатка запроса.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    /// Поле верхнего уровня отсутствует в полезной нагрузке
    MissingField { field: &'static str },
    /// Сканер не смог разобрать полезную нагрузку до нужного поля
    Malformed { offset: usize, reason: &'static str },
}

/// Ошибка записи подтверждения в приёмник.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkError {
    Io {
        kind: io::ErrorKind,
        message: String,
    },
}

impl ConfigError {
    pub fn malformed(
        reason: impl Into<String>,
        line: usize,
        column: usize,
    ) -> Self {
        Self::Malformed {
            reason: reason.into(),
            line,
            column,
        }
    }

    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }
}

impl ExtractionError {
    /// Имя отсутствующего поля, если ошибка вызвана его отсутствием.
    pub fn missing_field(&self) -> Option<&'static str> {
        match self {
            Self::MissingField { field } => Some(*field),
            Self::Malformed { .. } => None,
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        match self {
            Self::Malformed {
                reason,
                line,
                column,
            } => write!(
                f,
                "Malformed event configuration at line {line}, column {column}: {reason}"
            ),
            Self::MissingField { field } => {
                write!(f, "Event configuration is missing field `{field}`")
            }
        }
    }
}

impl std::fmt::Display for ExtractionError {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        match self {
            Self::MissingField { field } => {
                write!(f, "Fingerprint field `{field}` not found in payload")
            }
            Self::Malformed { offset, reason } => {
                write!(f, "Cannot scan payload at byte {offset}: {reason}")
            }
        }
    }
}

impl std::fmt::Display for SinkError {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        match self {
            Self::Io { kind, message } => {
                write!(f, "Failed to write acknowledgment ({kind:?}): {message}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
impl std::error::Error for ExtractionError {}
impl std::error::Error for SinkError {}

impl From<io::Error> for SinkError {
    fn from(err: io::Error) -> Self {
        Self::Io {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

impl ErrorExt for ConfigError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Malformed { .. } => StatusCode::InvalidConfig,
            Self::MissingField { .. } => StatusCode::MissingField,
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl ErrorExt for ExtractionError {
    fn status_code(&self) -> StatusCode {
        StatusCode::ExtractionFailed
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn metrics_tags(&self) -> Vec<(&'static str, String)> {
        let mut tags = vec![
            ("error_type", "fingerprint_extraction".to_string()),
            ("status_code", self.status_code().to_string()),
        ];
        if let Self::MissingField { field } = self {
            tags.push(("field", field.to_string()));
        }
        tags
    }
}

impl ErrorExt for SinkError {
    fn status_code(&self) -> StatusCode {
        StatusCode::SinkWriteFailed
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
