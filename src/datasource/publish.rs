use std::{io::Write, sync::Arc};

use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use eventbridge_error::{BridgeResult, ResultExt, SinkError};

use super::PublishEventConfiguration;
use crate::application::BrokerCapability;

/// Подтверждение публикации, записываемое в приёмник движка.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishAck {
    Success,
    Failure,
}

impl PublishAck {
    pub const fn as_bytes(&self) -> &'static [u8] {
        match self {
            Self::Success => br#"{"success": true}"#,
            Self::Failure => br#"{"success": false}"#,
        }
    }
}

/// Источник данных для мутаций: публикует событие и пишет подтверждение.
#[derive(Clone)]
pub struct PublishDataSource {
    pubsub: Arc<dyn BrokerCapability>,
}

impl PublishDataSource {
    pub fn new(pubsub: Arc<dyn BrokerCapability>) -> Self {
        Self { pubsub }
    }

    /// Публикует событие из `input` и пишет в `out` ровно одно
    /// подтверждение.
    ///
    /// - некорректная конфигурация: `ConfigError`, в `out` ничего не
    ///   пишется, брокер не вызывается;
    /// - успех: `{"success": true}` и `Ok(())`;
    /// - ошибка брокера: `{"success": false}` и та же ошибка брокера.
    ///
    /// Если не удалась запись подтверждения после успешной публикации,
    /// возвращается `SinkError`. После неудачной публикации ошибка записи
    /// только логируется, возвращается ошибка брокера.
    pub async fn load<W>(
        &self,
        ctx: &CancellationToken,
        input: &[u8],
        out: &mut W,
    ) -> BridgeResult<()>
    where
        W: Write + Send + ?Sized,
    {
        let config =
            PublishEventConfiguration::from_slice(input).context("parse publish configuration")?;
        let topic = config.topic.clone();
        let provider_id = config.provider_id.clone();

        match self.pubsub.publish(ctx, config).await {
            Ok(()) => {
                debug!(%topic, %provider_id, "Event published");
                write_ack(out, PublishAck::Success)
                    .with_context(|| format!("acknowledge publish to `{topic}`"))?;
                Ok(())
            }
            Err(err) => {
                warn!(
                    %topic,
                    %provider_id,
                    status_code = %err.status_code(),
                    retryable = err.status_code().is_retryable(),
                    tags = ?err.metrics_tags(),
                    error = %err,
                    "Publish failed"
                );
                if let Err(write_err) = write_ack(out, PublishAck::Failure) {
                    warn!(%topic, error = %write_err, "Failed to write publish acknowledgment");
                }
                Err(err)
            }
        }
    }
}

fn write_ack<W>(
    out: &mut W,
    ack: PublishAck,
) -> Result<(), SinkError>
where
    W: Write + ?Sized,
{
    out.write_all(ack.as_bytes())?;
    Ok(())
}
