use serde::{Deserialize, Serialize};

use eventbridge_error::ConfigError;

/// Конфигурация подписки: упорядоченный список топиков и провайдер.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionEventConfiguration {
    pub topics: Vec<String>,
    pub provider_id: String,
}

/// Конфигурация публикации: топик, непрозрачные данные и провайдер.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishEventConfiguration {
    pub topic: String,
    pub data: serde_json::Value,
    pub provider_id: String,
}

impl SubscriptionEventConfiguration {
    pub fn from_slice(input: &[u8]) -> Result<Self, ConfigError> {
        serde_json::from_slice(input).map_err(into_config_error)
    }
}

impl PublishEventConfiguration {
    pub fn from_slice(input: &[u8]) -> Result<Self, ConfigError> {
        serde_json::from_slice(input).map_err(into_config_error)
    }
}

fn into_config_error(err: serde_json::Error) -> ConfigError {
    let message = err.to_string();
    if err.is_data() {
        if let Some(field) = message
            .strip_prefix("missing field `")
            .and_then(|rest| rest.split('`').next())
        {
            return ConfigError::missing_field(field);
        }
    }
    ConfigError::malformed(message, err.line(), err.column())
}
