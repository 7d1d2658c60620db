//! Интерфейс (порт) приёмника сообщений подписки.
//!
//! Приёмник принадлежит вызывающей стороне. Брокер только проталкивает в
//! него сообщения и сигнализирует о закрытии; реализация может опираться на
//! потоки, задачи или каналы.

use bytes::Bytes;

pub trait SubscriptionSink: Send + Sync {
    /// Доставить одно сообщение.
    fn deliver(
        &self,
        payload: Bytes,
    );

    /// Сообщить, что сообщений больше не будет.
    fn close(&self);

    /// Приёмник больше не принимает сообщения (например, получатель
    /// отключился). Брокер может прекратить доставку досрочно.
    fn is_closed(&self) -> bool {
        false
    }
}
