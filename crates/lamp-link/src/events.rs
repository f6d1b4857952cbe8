//! Link lifecycle notifications.

use tokio::sync::mpsc;

/// Notifications emitted by the link to registered consumers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkEvent {
    /// Connection established.
    Opened,
    /// A previously open connection closed.
    Closed {
        /// Close code reported by the peer, if any.
        code: Option<u16>,
        /// Reason for the close.
        reason: String,
    },
    /// Connection failure not masked by an active reconnect cycle.
    Error(String),
    /// Raw text frame received from the stream. Never interpreted here.
    Message(String),
}

/// Delivers [`LinkEvent`]s to registered consumers, in order, at most once
/// per event per consumer.
#[derive(Debug, Default)]
pub struct EventNotifier {
    subscribers: Vec<mpsc::Sender<LinkEvent>>,
}

impl EventNotifier {
    /// Create an empty notifier.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new consumer and return its event stream.
    pub fn subscribe(&mut self) -> mpsc::Receiver<LinkEvent> {
        let (tx, rx) = mpsc::channel(32);
        self.subscribers.push(tx);
        rx
    }

    /// Deliver an event to every live consumer; dropped consumers are pruned.
    pub async fn emit(&mut self, event: LinkEvent) {
        let mut live = Vec::with_capacity(self.subscribers.len());
        for tx in self.subscribers.drain(..) {
            if tx.send(event.clone()).await.is_ok() {
                live.push(tx);
            }
        }
        self.subscribers = live;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_emit_delivers_in_order() {
        let mut notifier = EventNotifier::new();
        let mut rx = notifier.subscribe();

        notifier.emit(LinkEvent::Opened).await;
        notifier
            .emit(LinkEvent::Closed {
                code: Some(1000),
                reason: "normal".to_string(),
            })
            .await;

        assert_eq!(rx.recv().await, Some(LinkEvent::Opened));
        assert_eq!(
            rx.recv().await,
            Some(LinkEvent::Closed {
                code: Some(1000),
                reason: "normal".to_string(),
            })
        );
    }

    #[tokio::test]
    async fn test_emit_reaches_every_subscriber() {
        let mut notifier = EventNotifier::new();
        let mut first = notifier.subscribe();
        let mut second = notifier.subscribe();

        notifier.emit(LinkEvent::Error("boom".to_string())).await;

        assert_eq!(first.recv().await, Some(LinkEvent::Error("boom".to_string())));
        assert_eq!(second.recv().await, Some(LinkEvent::Error("boom".to_string())));
    }

    #[tokio::test]
    async fn test_dropped_subscriber_is_pruned() {
        let mut notifier = EventNotifier::new();
        let rx = notifier.subscribe();
        let mut live = notifier.subscribe();
        drop(rx);

        notifier.emit(LinkEvent::Opened).await;
        notifier.emit(LinkEvent::Opened).await;

        assert_eq!(live.recv().await, Some(LinkEvent::Opened));
        assert_eq!(live.recv().await, Some(LinkEvent::Opened));
        assert_eq!(notifier.subscribers.len(), 1);
    }
}
