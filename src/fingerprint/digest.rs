use std::fmt;

use xxhash_rust::xxh64::Xxh64;

/// Версионированный алгоритм отпечатка.
///
/// Идентификатор алгоритма входит в [`Fingerprint`]: смена алгоритма даёт
/// новый вариант, а отпечатки уже активных подписок не меняются молча.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[non_exhaustive]
pub enum FingerprintAlgorithm {
    /// xxHash64 с нулевым seed.
    #[default]
    Xxh64V1,
}

impl FingerprintAlgorithm {
    /// Стабильный строковый идентификатор.
    pub const fn id(&self) -> &'static str {
        match self {
            Self::Xxh64V1 => "xxh64-v1",
        }
    }

    const fn seed(&self) -> u64 {
        match self {
            Self::Xxh64V1 => 0,
        }
    }
}

/// Потоковый аккумулятор отпечатка.
pub struct FingerprintHasher {
    algorithm: FingerprintAlgorithm,
    state: Xxh64,
}

impl FingerprintHasher {
    pub fn new(algorithm: FingerprintAlgorithm) -> Self {
        Self {
            algorithm,
            state: Xxh64::new(algorithm.seed()),
        }
    }

    pub fn update(
        &mut self,
        bytes: &[u8],
    ) {
        self.state.update(bytes);
    }

    pub fn finish(&self) -> Fingerprint {
        Fingerprint {
            algorithm: self.algorithm,
            value: self.state.digest(),
        }
    }
}

/// Отпечаток запроса подписки фиксированной ширины.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint {
    algorithm: FingerprintAlgorithm,
    value: u64,
}

impl Fingerprint {
    pub fn algorithm(&self) -> FingerprintAlgorithm {
        self.algorithm
    }

    pub fn value(&self) -> u64 {
        self.value
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{}:{:016x}", self.algorithm.id(), self.value)
    }
}
