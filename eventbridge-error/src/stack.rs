use std::{fmt, panic::Location, sync::Arc};

use crate::{ErrorExt, StatusCode};

/// Ошибка адаптера: корневая ошибка и цепочка контекстов поверх неё.
///
/// Корень хранится как есть. Ошибки брокера доходят до вызывающей стороны
/// без переупаковки и восстанавливаются через [`StackError::downcast_ref`];
/// контекст добавляет только сам адаптер и только к своим ошибкам.
#[derive(Clone)]
pub struct StackError {
    root: Arc<dyn ErrorExt>,
    trail: Vec<Frame>,
}

/// Один шаг контекста: сообщение и место, где его добавили.
#[derive(Debug, Clone)]
pub struct Frame {
    pub message: String,
    pub location: &'static Location<'static>,
}

impl StackError {
    pub fn new<E: ErrorExt>(err: E) -> Self {
        Self {
            root: Arc::new(err),
            trail: Vec::new(),
        }
    }

    #[track_caller]
    pub fn context(
        mut self,
        msg: impl Into<String>,
    ) -> Self {
        self.trail.push(Frame {
            message: msg.into(),
            location: Location::caller(),
        });
        self
    }

    pub fn status_code(&self) -> StatusCode {
        self.root.status_code()
    }

    /// Контексты в порядке добавления, от внутреннего к внешнему.
    pub fn contexts(&self) -> &[Frame] {
        &self.trail
    }

    pub fn metrics_tags(&self) -> Vec<(&'static str, String)> {
        self.root.metrics_tags()
    }

    pub fn downcast_ref<T: ErrorExt>(&self) -> Option<&T> {
        self.root.as_any().downcast_ref::<T>()
    }

    /// Корневая ошибка имеет тип `T`.
    pub fn is<T: ErrorExt>(&self) -> bool {
        self.downcast_ref::<T>().is_some()
    }

    /// Обе ошибки указывают на один и тот же корневой объект.
    ///
    /// Клон и ошибка с добавленным контекстом сохраняют корень.
    pub fn same_root(
        &self,
        other: &StackError,
    ) -> bool {
        Arc::ptr_eq(&self.root, &other.root)
    }
}

impl fmt::Debug for StackError {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let mut debug = f.debug_struct("StackError");
        debug
            .field("root", &format_args!("{}", self.root))
            .field("status_code", &self.status_code());
        for frame in &self.trail {
            debug.field(
                "context",
                &format_args!(
                    "{} ({}:{})",
                    frame.message,
                    frame.location.file(),
                    frame.location.line()
                ),
            );
        }
        debug.finish()
    }
}

impl fmt::Display for StackError {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        for frame in self.trail.iter().rev() {
            write!(f, "{}: ", frame.message)?;
        }
        write!(f, "{}", self.root)
    }
}

impl std::error::Error for StackError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.root.as_ref())
    }
}

impl<E: ErrorExt> From<E> for StackError {
    fn from(e: E) -> Self {
        StackError::new(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BrokerError, ConfigError};

    /// Тест проверяет, что контексты копятся по порядку и помнят место
    /// вызова.
    #[test]
    fn test_context_trail() {
        let stack = StackError::new(ConfigError::missing_field("topics"))
            .context("parse subscription configuration")
            .context("subscription start");

        let frames = stack.contexts();
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].message, "parse subscription configuration");
        assert_eq!(frames[0].location.file(), file!());
        assert_eq!(stack.status_code(), StatusCode::MissingField);
    }

    /// Тест проверяет downcast к типу корня.
    #[test]
    fn test_downcast() {
        let stack = StackError::new(BrokerError::UnknownTopic {
            topic: "orders".to_string(),
        });

        assert!(stack.is::<BrokerError>());
        assert!(!stack.is::<ConfigError>());
        assert!(matches!(
            stack.downcast_ref::<BrokerError>(),
            Some(BrokerError::UnknownTopic { topic }) if topic == "orders"
        ));
    }

    /// Тест проверяет, что клон и контекст не меняют корень.
    #[test]
    fn test_same_root_survives_clone_and_context() {
        let stack = StackError::new(BrokerError::Timeout);
        let wrapped = stack.clone().context("retry later");
        let other = StackError::new(BrokerError::Timeout);

        assert!(stack.same_root(&wrapped));
        assert!(!stack.same_root(&other));
    }

    /// Тест проверяет, что `Display` выводит внешний контекст первым.
    #[test]
    fn test_display_outer_context_first() {
        let stack = StackError::new(BrokerError::Cancelled)
            .context("publish")
            .context("load");

        assert_eq!(stack.to_string(), "load: publish: operation cancelled");
    }
}
