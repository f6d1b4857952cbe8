//! Transport abstraction and the WebSocket implementation.
//!
//! A [`Transport`] creates handles without blocking; the outcome of the
//! attempt arrives asynchronously on the event channel supplied to
//! [`Transport::create`]. Every handle reports exactly one of
//! [`TransportEvent::Opened`] or [`TransportEvent::Failed`], then zero or
//! more [`TransportEvent::Message`]s, then at most one
//! [`TransportEvent::Closed`] after a successful open.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio::task::AbortHandle;
use tokio_tungstenite::tungstenite::Message;

/// Options passed through to transport creation.
#[derive(Debug, Clone)]
pub struct TransportOptions {
    /// How long a connection attempt may take before it is failed.
    pub connect_timeout: Duration,
}

impl Default for TransportOptions {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
        }
    }
}

/// Events reported by a transport handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// The connection was established.
    Opened,
    /// The connection could not be established, or errored while open.
    Failed {
        /// Description of the failure.
        reason: String,
    },
    /// A text frame arrived.
    Message(String),
    /// The connection closed. Fires only for handles that opened.
    Closed {
        /// Close code reported by the peer, if any.
        code: Option<u16>,
        /// Reason for the close.
        reason: String,
    },
}

/// A live transport session.
///
/// Both operations are best-effort and infallible: outcomes are observed
/// through the event channel, never as return values.
pub trait TransportHandle: Send {
    /// Send a liveness probe to detect silent peer failure.
    fn send_liveness_probe(&mut self);

    /// Request the session terminate. Does not wait for acknowledgment.
    fn terminate(&mut self);
}

/// Factory for transport sessions.
pub trait Transport: Send + 'static {
    /// The handle type produced by this transport.
    type Handle: TransportHandle;

    /// Begin a connection attempt. Returns immediately; the outcome is
    /// delivered on `events`.
    fn create(
        &self,
        address: &str,
        options: &TransportOptions,
        events: mpsc::Sender<TransportEvent>,
    ) -> Self::Handle;
}

/// WebSocket transport backed by tokio-tungstenite.
#[derive(Debug, Clone, Copy, Default)]
pub struct WsTransport;

/// Commands accepted by a live WebSocket session task.
#[derive(Debug)]
enum WsCommand {
    Ping,
    Close,
}

/// Handle to a WebSocket session.
#[derive(Debug)]
pub struct WsHandle {
    commands: mpsc::Sender<WsCommand>,
    abort: AbortHandle,
}

impl TransportHandle for WsHandle {
    fn send_liveness_probe(&mut self) {
        // A full command queue means the session is stalled; the next
        // interval tick retries.
        let _ = self.commands.try_send(WsCommand::Ping);
    }

    fn terminate(&mut self) {
        if self.commands.try_send(WsCommand::Close).is_err() {
            self.abort.abort();
        }
    }
}

impl Transport for WsTransport {
    type Handle = WsHandle;

    fn create(
        &self,
        address: &str,
        options: &TransportOptions,
        events: mpsc::Sender<TransportEvent>,
    ) -> WsHandle {
        let (commands, command_rx) = mpsc::channel(8);
        let task = tokio::spawn(run_socket(
            address.to_string(),
            options.clone(),
            command_rx,
            events,
        ));
        WsHandle {
            commands,
            abort: task.abort_handle(),
        }
    }
}

/// Connect and pump one WebSocket session until it ends.
async fn run_socket(
    address: String,
    options: TransportOptions,
    mut commands: mpsc::Receiver<WsCommand>,
    events: mpsc::Sender<TransportEvent>,
) {
    let attempt = tokio_tungstenite::connect_async(address.as_str());
    let stream = match tokio::time::timeout(options.connect_timeout, attempt).await {
        Ok(Ok((stream, _response))) => stream,
        Ok(Err(e)) => {
            let _ = events
                .send(TransportEvent::Failed {
                    reason: e.to_string(),
                })
                .await;
            return;
        }
        Err(_) => {
            let _ = events
                .send(TransportEvent::Failed {
                    reason: format!(
                        "connect timed out after {} ms",
                        options.connect_timeout.as_millis()
                    ),
                })
                .await;
            return;
        }
    };

    let _ = events.send(TransportEvent::Opened).await;
    let (mut write, mut read) = stream.split();

    loop {
        tokio::select! {
            incoming = read.next() => match incoming {
                Some(Ok(Message::Text(text))) => {
                    let _ = events.send(TransportEvent::Message(text.to_string())).await;
                }
                Some(Ok(Message::Close(frame))) => {
                    let (code, reason) = match frame {
                        Some(frame) => (Some(u16::from(frame.code)), frame.reason.to_string()),
                        None => (None, String::new()),
                    };
                    let _ = events.send(TransportEvent::Closed { code, reason }).await;
                    return;
                }
                Some(Ok(_)) => {
                    // Binary, Ping, Pong, raw frames: nothing to surface.
                }
                Some(Err(e)) => {
                    let reason = e.to_string();
                    let _ = events
                        .send(TransportEvent::Failed { reason: reason.clone() })
                        .await;
                    let _ = events.send(TransportEvent::Closed { code: None, reason }).await;
                    return;
                }
                None => {
                    let _ = events
                        .send(TransportEvent::Closed {
                            code: None,
                            reason: "stream ended".to_string(),
                        })
                        .await;
                    return;
                }
            },
            command = commands.recv() => match command {
                Some(WsCommand::Ping) => {
                    if write.send(Message::Ping(Vec::new().into())).await.is_err() {
                        let _ = events
                            .send(TransportEvent::Closed {
                                code: None,
                                reason: "probe write failed".to_string(),
                            })
                            .await;
                        return;
                    }
                }
                Some(WsCommand::Close) | None => {
                    let _ = write.close().await;
                    let _ = events
                        .send(TransportEvent::Closed {
                            code: None,
                            reason: "closed locally".to_string(),
                        })
                        .await;
                    return;
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = TransportOptions::default();
        assert_eq!(options.connect_timeout, Duration::from_secs(10));
    }

    #[tokio::test]
    async fn test_silent_peer_fails_within_connect_timeout() {
        // A listener that accepts but never answers the handshake.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind listener");
        let address = format!("ws://{}", listener.local_addr().expect("local addr"));
        tokio::spawn(async move {
            let _socket = listener.accept().await;
            std::future::pending::<()>().await;
        });

        let (events, mut rx) = mpsc::channel(8);
        let options = TransportOptions {
            connect_timeout: Duration::from_millis(200),
        };
        let _handle = WsTransport.create(&address, &options, events);

        let event = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("event before test timeout")
            .expect("channel open");

        match event {
            TransportEvent::Failed { reason } => {
                assert!(reason.contains("timed out"), "unexpected reason: {reason}");
            }
            other => panic!("expected Failed, got {other:?}"),
        }
    }
}
