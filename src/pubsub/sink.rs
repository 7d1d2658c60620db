use bytes::Bytes;
use parking_lot::Mutex;
use tokio::sync::mpsc;

use crate::application::SubscriptionSink;

/// Приёмник подписки поверх неограниченного `mpsc`-канала.
///
/// `close` идемпотентен: отправитель освобождается, и после выдачи
/// буферизованных сообщений [`SinkReceiver::recv`] вернёт `None`.
pub struct ChannelSink {
    tx: Mutex<Option<mpsc::UnboundedSender<Bytes>>>,
}

/// Принимающая сторона [`ChannelSink`].
pub struct SinkReceiver {
    rx: mpsc::UnboundedReceiver<Bytes>,
}

impl ChannelSink {
    pub fn channel() -> (Self, SinkReceiver) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                tx: Mutex::new(Some(tx)),
            },
            SinkReceiver { rx },
        )
    }
}

impl SubscriptionSink for ChannelSink {
    fn deliver(
        &self,
        payload: Bytes,
    ) {
        if let Some(tx) = self.tx.lock().as_ref() {
            // Получатель мог уйти раньше: тогда сообщение просто теряется.
            let _ = tx.send(payload);
        }
    }

    fn close(&self) {
        self.tx.lock().take();
    }

    fn is_closed(&self) -> bool {
        self.tx.lock().as_ref().map_or(true, |tx| tx.is_closed())
    }
}

impl SinkReceiver {
    /// Ожидает следующее сообщение; `None` после закрытия приёмника.
    pub async fn recv(&mut self) -> Option<Bytes> {
        self.rx.recv().await
    }

    /// Неблокирующая попытка получить сообщение.
    pub fn try_recv(&mut self) -> Option<Bytes> {
        self.rx.try_recv().ok()
    }
}
