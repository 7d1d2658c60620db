use std::{any::Any, error::Error};

use crate::StatusCode;

/// Расширение для ошибок адаптера (object-safe).
///
/// Каждая ошибка таксономии (`ConfigError`, `ExtractionError`,
/// `ClosedError`, `BrokerError`) и любая ошибка, которую возвращает
/// конкретная реализация брокера, реализует этот трейт. Благодаря
/// [`ErrorExt::as_any`] вызывающая сторона может восстановить исходный тип
/// из [`StackError`](crate::StackError) без потери информации.
pub trait ErrorExt: Error + Send + Sync + 'static {
    /// Статус ошибки.
    ///
    /// По умолчанию возвращает [`StatusCode::Internal`].
    fn status_code(&self) -> StatusCode {
        StatusCode::Internal
    }

    /// Возвращает ошибку как [`Any`](std::any::Any) для downcast.
    fn as_any(&self) -> &dyn Any;

    /// Теги для структурированных логов адаптера.
    fn metrics_tags(&self) -> Vec<(&'static str, String)> {
        vec![
            ("error_type", self.type_name()),
            ("status_code", self.status_code().to_string()),
        ]
    }

    /// Короткое имя типа ошибки (без пути модулей).
    fn type_name(&self) -> String {
        std::any::type_name::<Self>()
            .rsplit("::")
            .next()
            .unwrap_or("Unknown")
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use std::{any::Any, error::Error, fmt};

    use super::*;

    // Ошибка "брокера" без переопределения status_code (default = Internal).
    #[derive(Debug)]
    struct OpaqueBrokerFailure(pub &'static str);

    impl fmt::Display for OpaqueBrokerFailure {
        fn fmt(
            &self,
            f: &mut fmt::Formatter<'_>,
        ) -> fmt::Result {
            write!(f, "broker failure: {}", self.0)
        }
    }

    impl Error for OpaqueBrokerFailure {}

    impl ErrorExt for OpaqueBrokerFailure {
        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[derive(Debug)]
    struct TopicGone(pub &'static str);

    impl fmt::Display for TopicGone {
        fn fmt(
            &self,
            f: &mut fmt::Formatter<'_>,
        ) -> fmt::Result {
            write!(f, "topic gone: {}", self.0)
        }
    }

    impl Error for TopicGone {}

    impl ErrorExt for TopicGone {
        fn status_code(&self) -> StatusCode {
            StatusCode::NotFound
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    /// Тест проверяет, что ошибка без собственного кода получает
    /// `Internal`.
    #[test]
    fn test_default_status_code() {
        let e = OpaqueBrokerFailure("socket 10.0.0.3 reset");
        assert_eq!(e.status_code(), StatusCode::Internal);
        assert!(e
            .metrics_tags()
            .iter()
            .any(|(k, v)| *k == "error_type" && v == "OpaqueBrokerFailure"));
    }

    /// Тест проверяет downcast через `as_any`.
    #[test]
    fn test_as_any_downcast() {
        let e = TopicGone("x");
        let down = e.as_any().downcast_ref::<TopicGone>();
        assert_eq!(down.map(|t| t.0), Some("x"));
        assert!(e.as_any().downcast_ref::<OpaqueBrokerFailure>().is_none());
    }

    /// Тест проверяет теги метрик и короткое имя типа.
    #[test]
    fn test_metrics_tags_and_type_name() {
        let e = TopicGone("t");
        let tags = e.metrics_tags();
        assert!(tags
            .iter()
            .any(|(k, v)| *k == "error_type" && v == "TopicGone"));
        assert!(tags
            .iter()
            .any(|(k, v)| *k == "status_code" && *v == StatusCode::NotFound.to_string()));
    }
}
