//! Connection manager.
//!
//! All mutable link state lives inside the [`ConnectionManager`] actor and
//! is driven by one message channel carrying consumer commands, timer
//! firings, and transport events. Messages are processed strictly one at a
//! time, so no state transition ever overlaps another.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, trace, warn};

use crate::backoff::{BackoffConfig, BackoffPolicy};
use crate::error::LinkError;
use crate::events::{EventNotifier, LinkEvent};
use crate::keepalive::{self, KeepaliveConfig, KeepaliveHandle};
use crate::scheduler::ReconnectScheduler;
use crate::state::{AtomicLinkState, LinkState};
use crate::transport::{Transport, TransportEvent, TransportHandle, TransportOptions};

/// Configuration for a [`ConnectionManager`].
#[derive(Debug, Clone, Default)]
pub struct LinkConfig {
    /// Endpoint to connect to. Opaque to the manager.
    pub address: String,
    /// Options passed through to transport creation.
    pub options: TransportOptions,
    /// Reconnection backoff bounds.
    pub backoff: BackoffConfig,
    /// Liveness probing.
    pub keepalive: KeepaliveConfig,
}

impl LinkConfig {
    /// Create a configuration with default backoff and keepalive settings.
    #[must_use]
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            ..Self::default()
        }
    }
}

/// Messages processed by the manager actor.
#[derive(Debug)]
pub(crate) enum Msg {
    Activate,
    Deactivate,
    RetryFired,
    KeepaliveTick,
    Transport {
        generation: u64,
        event: TransportEvent,
    },
}

/// Clonable front for controlling a running [`ConnectionManager`].
#[derive(Debug, Clone)]
pub struct LinkHandle {
    tx: mpsc::Sender<Msg>,
    state: Arc<AtomicLinkState>,
}

impl LinkHandle {
    /// Declare intent to stay connected. Idempotent.
    pub async fn activate(&self) {
        let _ = self.tx.send(Msg::Activate).await;
    }

    /// Withdraw intent: close any connection and stop retrying. Idempotent.
    pub async fn deactivate(&self) {
        let _ = self.tx.send(Msg::Deactivate).await;
    }

    /// Current observable link state.
    #[must_use]
    pub fn state(&self) -> LinkState {
        self.state.load()
    }
}

/// Maintains one logical connection to a remote stream, retrying with
/// backoff on failure and probing liveness while connected.
pub struct ConnectionManager<T: Transport> {
    address: String,
    options: TransportOptions,
    transport: T,
    scheduler: ReconnectScheduler,
    notifier: EventNotifier,
    keepalive: KeepaliveConfig,
    keepalive_task: Option<KeepaliveHandle>,
    active_handle: Option<T::Handle>,
    should_reconnect: bool,
    connected: bool,
    generation: u64,
    shared_state: Arc<AtomicLinkState>,
    tx: mpsc::Sender<Msg>,
    rx: mpsc::Receiver<Msg>,
}

impl<T: Transport> ConnectionManager<T> {
    /// Create a manager. Fails fast on contract-violating configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the backoff or keepalive configuration is
    /// invalid.
    pub fn new(config: LinkConfig, transport: T) -> Result<Self, LinkError> {
        config.keepalive.validate()?;
        let policy = BackoffPolicy::new(config.backoff)?;
        let (tx, rx) = mpsc::channel(64);

        Ok(Self {
            address: config.address,
            options: config.options,
            transport,
            scheduler: ReconnectScheduler::new(policy),
            notifier: EventNotifier::new(),
            keepalive: config.keepalive,
            keepalive_task: None,
            active_handle: None,
            should_reconnect: false,
            connected: false,
            generation: 0,
            shared_state: Arc::new(AtomicLinkState::new(LinkState::Idle)),
            tx,
            rx,
        })
    }

    /// Register a consumer for lifecycle notifications and stream frames.
    pub fn subscribe(&mut self) -> mpsc::Receiver<LinkEvent> {
        self.notifier.subscribe()
    }

    /// Obtain a control handle. Handles stay valid while the actor runs.
    #[must_use]
    pub fn handle(&self) -> LinkHandle {
        LinkHandle {
            tx: self.tx.clone(),
            state: Arc::clone(&self.shared_state),
        }
    }

    /// Current observable link state.
    #[must_use]
    pub fn state(&self) -> LinkState {
        self.shared_state.load()
    }

    /// Run the actor. The manager lives for the lifetime of the process;
    /// `deactivate` clears intent without ending the loop.
    pub async fn run(mut self) {
        while let Some(msg) = self.rx.recv().await {
            self.handle_msg(msg).await;
        }
    }

    async fn handle_msg(&mut self, msg: Msg) {
        match msg {
            Msg::Activate => {
                if self.should_reconnect {
                    return;
                }
                info!(address = %self.address, "link activated");
                self.should_reconnect = true;
                self.open();
            }
            Msg::Deactivate => {
                if !self.should_reconnect {
                    return;
                }
                info!(address = %self.address, "link deactivated");
                self.should_reconnect = false;
                self.scheduler.stop();
                self.close();
                self.shared_state.store(LinkState::Idle);
            }
            Msg::RetryFired => {
                if !self.scheduler.is_active() {
                    trace!("ignoring stale retry timer");
                    return;
                }
                self.scheduler.timer_fired();
                self.open();
                // Queue the next attempt before this one resolves; a
                // successful open stops the cycle asynchronously.
                self.scheduler.advance();
                self.scheduler.schedule_next(&self.tx);
            }
            Msg::KeepaliveTick => {
                if !self.connected {
                    trace!("ignoring stale keepalive tick");
                    return;
                }
                if let Some(handle) = self.active_handle.as_mut() {
                    handle.send_liveness_probe();
                }
            }
            Msg::Transport { generation, event } => {
                if generation != self.generation || self.active_handle.is_none() {
                    trace!(generation, "ignoring event from superseded handle");
                    return;
                }
                self.handle_transport_event(event).await;
            }
        }
    }

    async fn handle_transport_event(&mut self, event: TransportEvent) {
        match event {
            TransportEvent::Opened => {
                self.connected = true;
                self.scheduler.stop();
                self.shared_state.store(LinkState::Open);
                info!(address = %self.address, "link established");
                self.notifier.emit(LinkEvent::Opened).await;
                self.keepalive_task = Some(keepalive::start_ticker(
                    self.keepalive.interval,
                    self.tx.clone(),
                ));
            }
            TransportEvent::Failed { reason } => {
                if self.scheduler.is_active() {
                    // The retry cycle itself communicates failure.
                    debug!(%reason, "connection attempt failed");
                } else {
                    warn!(%reason, "connection failed");
                    self.notifier.emit(LinkEvent::Error(reason)).await;
                }
                if !self.connected {
                    // A handle that never opened reports no close; release
                    // the slot here so the next attempt can proceed.
                    self.active_handle = None;
                    self.enter_retry_or_idle();
                }
            }
            TransportEvent::Message(frame) => {
                if self.connected {
                    self.notifier.emit(LinkEvent::Message(frame)).await;
                }
            }
            TransportEvent::Closed { code, reason } => {
                self.stop_keepalive();
                let was_connected = self.connected;
                self.connected = false;
                self.active_handle = None;
                if was_connected {
                    info!(?code, %reason, "link closed");
                    self.notifier.emit(LinkEvent::Closed { code, reason }).await;
                }
                self.enter_retry_or_idle();
            }
        }
    }

    /// Begin a connection attempt. No-op while a handle exists, whether it
    /// is still connecting or already connected: the manager never holds
    /// two transports.
    fn open(&mut self) {
        if self.active_handle.is_some() {
            return;
        }

        self.generation += 1;
        let generation = self.generation;
        let (event_tx, mut event_rx) = mpsc::channel(16);
        let handle = self.transport.create(&self.address, &self.options, event_tx);
        self.active_handle = Some(handle);

        // Tag everything this handle reports with its generation so events
        // from a superseded session are discarded.
        let tx = self.tx.clone();
        tokio::spawn(async move {
            while let Some(event) = event_rx.recv().await {
                if tx.send(Msg::Transport { generation, event }).await.is_err() {
                    break;
                }
            }
        });

        if !self.connected {
            self.shared_state.store(LinkState::Connecting);
        }
        debug!(address = %self.address, generation, "connection attempt started");
    }

    /// Tear down the current handle, if any. The slot is cleared without
    /// waiting for the transport to acknowledge termination.
    fn close(&mut self) {
        let Some(mut handle) = self.active_handle.take() else {
            return;
        };
        self.connected = false;
        self.stop_keepalive();
        handle.terminate();
    }

    fn stop_keepalive(&mut self) {
        if let Some(task) = self.keepalive_task.take() {
            task.stop();
        }
    }

    fn enter_retry_or_idle(&mut self) {
        if self.should_reconnect {
            self.scheduler.start(&self.tx);
            self.shared_state.store(LinkState::Reconnecting);
        } else {
            self.shared_state.store(LinkState::Idle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    struct NullHandle;

    impl TransportHandle for NullHandle {
        fn send_liveness_probe(&mut self) {}
        fn terminate(&mut self) {}
    }

    struct NullTransport;

    impl Transport for NullTransport {
        type Handle = NullHandle;

        fn create(
            &self,
            _address: &str,
            _options: &TransportOptions,
            _events: mpsc::Sender<TransportEvent>,
        ) -> NullHandle {
            NullHandle
        }
    }

    #[tokio::test]
    async fn test_new_starts_idle() {
        let manager =
            ConnectionManager::new(LinkConfig::new("ws://example.invalid"), NullTransport)
                .expect("valid config");
        assert_eq!(manager.state(), LinkState::Idle);
        assert_eq!(manager.handle().state(), LinkState::Idle);
    }

    #[tokio::test]
    async fn test_invalid_backoff_rejected_at_construction() {
        let config = LinkConfig {
            backoff: BackoffConfig {
                min_delay: Duration::from_secs(10),
                max_delay: Duration::from_secs(1),
                multiplier: 2.0,
            },
            ..LinkConfig::new("ws://example.invalid")
        };

        let result = ConnectionManager::new(config, NullTransport);
        assert!(matches!(result, Err(LinkError::InvalidConfig(_))));
    }

    #[tokio::test]
    async fn test_invalid_keepalive_rejected_at_construction() {
        let config = LinkConfig {
            keepalive: KeepaliveConfig {
                interval: Duration::ZERO,
            },
            ..LinkConfig::new("ws://example.invalid")
        };

        let result = ConnectionManager::new(config, NullTransport);
        assert!(result.is_err());
    }
}
