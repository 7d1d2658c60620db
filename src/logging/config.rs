use std::{env, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use eventbridge_error::{ensure, BridgeResult, StatusCode};

const LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Формат вывода логов.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Compact,
    Json,
}

/// Конфигурация логирования.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Базовый уровень: trace, debug, info, warn, error
    pub level: String,
    pub format: LogFormat,
    pub with_ansi: bool,
    pub with_target: bool,
    pub with_thread_ids: bool,
    /// Дополнительные директивы `EnvFilter`, например `eventbridge::pubsub=trace`
    pub directives: Vec<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
            with_ansi: true,
            with_target: true,
            with_thread_ids: false,
            directives: Vec::new(),
        }
    }
}

impl LoggingConfig {
    /// Применяет `EVENTBRIDGE_LOG_LEVEL` и `EVENTBRIDGE_LOG_FORMAT`.
    ///
    /// Нераспознанный формат игнорируется.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(level) = env::var("EVENTBRIDGE_LOG_LEVEL") {
            self.level = level.to_lowercase();
        }
        if let Ok(format) = env::var("EVENTBRIDGE_LOG_FORMAT") {
            match format.parse() {
                Ok(format) => self.format = format,
                Err(e) => eprintln!("Ignoring EVENTBRIDGE_LOG_FORMAT: {e}"),
            }
        }
    }

    pub fn validate(&self) -> BridgeResult<()> {
        ensure!(
            LEVELS.contains(&self.level.as_str()),
            StatusCode::InvalidConfig,
            "Invalid log level '{}', expected one of {:?}",
            self.level,
            LEVELS
        );
        ensure!(
            self.directives.iter().all(|d| !d.trim().is_empty()),
            StatusCode::InvalidConfig,
            "Log filter directives must not be empty"
        );
        Ok(())
    }

    /// Директива фильтра: базовый уровень и дополнительные директивы через
    /// запятую.
    pub fn build_filter_directive(&self) -> String {
        std::iter::once(self.level.as_str())
            .chain(self.directives.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "compact" => Ok(Self::Compact),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown log format '{other}'")),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let name = match self {
            Self::Pretty => "pretty",
            Self::Compact => "compact",
            Self::Json => "json",
        };
        f.write_str(name)
    }
}
