use std::path::Path;

use config::{
    builder::DefaultState, Config, ConfigBuilder, ConfigError as SettingsError, Environment, File,
};
use serde::{Deserialize, Serialize};

use eventbridge_error::{ensure, BridgeResult, StatusCode};

use crate::logging::LoggingConfig;

pub const ENV_PREFIX: &str = "EVENTBRIDGE";

/// Настройки встроенного брокера.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrokerSettings {
    pub provider_id: String,
    pub channel_capacity: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub broker: BrokerSettings,
    pub logging: LoggingConfig,
}

impl Default for BrokerSettings {
    fn default() -> Self {
        Self {
            provider_id: "default".to_string(),
            channel_capacity: 1024,
        }
    }
}

impl Settings {
    /// Значения по умолчанию, затем переменные окружения `EVENTBRIDGE_*`.
    pub fn load() -> Result<Self, SettingsError> {
        Self::builder()?
            .add_source(Self::environment())
            .build()?
            .try_deserialize()
    }

    /// Значения по умолчанию, затем файл `path`, затем окружение.
    ///
    /// Формат файла определяется по расширению.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        Self::builder()?
            .add_source(File::from(path.as_ref()))
            .add_source(Self::environment())
            .build()?
            .try_deserialize()
    }

    pub fn validate(&self) -> BridgeResult<()> {
        ensure!(
            !self.broker.provider_id.trim().is_empty(),
            StatusCode::InvalidConfig,
            "broker.provider_id must not be empty"
        );
        ensure!(
            self.broker.channel_capacity > 0,
            StatusCode::InvalidConfig,
            "broker.channel_capacity must be greater than zero"
        );
        self.logging.validate()
    }

    fn builder() -> Result<ConfigBuilder<DefaultState>, SettingsError> {
        let defaults = BrokerSettings::default();
        Config::builder()
            // Добавляем значения по умолчанию
            .set_default("broker.provider_id", defaults.provider_id)?
            .set_default("broker.channel_capacity", defaults.channel_capacity as i64)
    }

    // EVENTBRIDGE_BROKER__CHANNEL_CAPACITY=64 → broker.channel_capacity
    fn environment() -> Environment {
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
    }
}
