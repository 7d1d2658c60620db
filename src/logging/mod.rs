pub mod config;
mod filters;
mod formatter;

pub use config::{LogFormat, LoggingConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Инициализация глобального логирования с конфигурацией.
///
/// Повторный вызов возвращает ошибку: глобальный subscriber уже установлен.
pub fn init_logging(mut config: LoggingConfig) -> Result<(), Box<dyn std::error::Error>> {
    config.apply_env_overrides();
    config.validate()?;

    tracing_subscriber::registry()
        .with(filters::build_filter_from_config(&config))
        .with(formatter::build_formatter_from_config(&config))
        .try_init()?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        log_level = %config.level,
        log_format = %config.format,
        "Logging system initialized"
    );

    Ok(())
}
