//! Отпечаток запроса подписки.
//!
//! Движок сравнивает отпечатки, чтобы решить, можно ли обслужить два
//! логических запроса одной подпиской на стороне брокера. Отпечаток
//! строится в два этапа:
//!
//! 1. [`scanner`] находит сырые байты полей `topics` и `providerId`, не
//!    разбирая полезную нагрузку целиком;
//! 2. [`digest`] прогоняет эти байты именно в таком порядке через
//!    фиксированный версионированный хеш.
//!
//! Хешируются сырые байты, а не каноническая форма. Два семантически
//! одинаковых запроса с разным форматированием внутри этих полей (пробелы,
//! экранирование) дадут разные отпечатки и не будут мультиплексированы.

pub mod digest;
pub mod scanner;

pub use digest::{Fingerprint, FingerprintAlgorithm, FingerprintHasher};
pub use scanner::find_top_level_field;

use eventbridge_error::ExtractionError;

pub const TOPICS_FIELD: &str = "topics";
pub const PROVIDER_ID_FIELD: &str = "providerId";

/// Вычисляет отпечаток запроса подписки по сырым байтам конфигурации.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestFingerprinter {
    algorithm: FingerprintAlgorithm,
}

impl RequestFingerprinter {
    pub fn new(algorithm: FingerprintAlgorithm) -> Self {
        Self { algorithm }
    }

    pub fn algorithm(&self) -> FingerprintAlgorithm {
        self.algorithm
    }

    /// Возвращает отпечаток полей `topics` и `providerId`.
    pub fn fingerprint(
        &self,
        input: &[u8],
    ) -> Result<Fingerprint, ExtractionError> {
        let mut hasher = FingerprintHasher::new(self.algorithm);
        self.write_request_id(input, &mut hasher)?;
        Ok(hasher.finish())
    }

    /// Дописывает поля запроса во внешний аккумулятор.
    ///
    /// Оба поля извлекаются до записи: при ошибке `hasher` не изменяется.
    pub fn write_request_id(
        &self,
        input: &[u8],
        hasher: &mut FingerprintHasher,
    ) -> Result<(), ExtractionError> {
        let topics = find_top_level_field(input, TOPICS_FIELD)?;
        let provider_id = find_top_level_field(input, PROVIDER_ID_FIELD)?;

        hasher.update(topics);
        hasher.update(provider_id);
        Ok(())
    }
}
