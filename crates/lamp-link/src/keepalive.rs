//! Keepalive ticker.
//!
//! While the link is open, a ticker delivers periodic tick messages to the
//! manager, which sends one liveness probe through the active transport
//! handle per tick. The ticker exists only while the link is connected.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::error::LinkError;
use crate::manager::Msg;

/// Configuration for keepalive behavior.
#[derive(Debug, Clone)]
pub struct KeepaliveConfig {
    /// Interval between liveness probes.
    pub interval: Duration,
}

impl Default for KeepaliveConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(30),
        }
    }
}

impl KeepaliveConfig {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the interval is zero.
    pub fn validate(&self) -> Result<(), LinkError> {
        if self.interval.is_zero() {
            return Err(LinkError::InvalidConfig(
                "keepalive interval must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Handle for stopping a running keepalive ticker.
#[derive(Debug)]
pub(crate) struct KeepaliveHandle {
    task: JoinHandle<()>,
}

impl KeepaliveHandle {
    /// Stop the ticker. Ticks already delivered may still be observed by
    /// the manager; it ignores them once disconnected.
    pub(crate) fn stop(self) {
        self.task.abort();
    }
}

/// Start a periodic ticker that feeds tick messages to the manager.
pub(crate) fn start_ticker(interval: Duration, tx: mpsc::Sender<Msg>) -> KeepaliveHandle {
    let task = tokio::spawn(async move {
        let mut timer = tokio::time::interval(interval);
        // The first tick completes immediately; probing starts one full
        // interval after the connection opens.
        timer.tick().await;
        loop {
            timer.tick().await;
            if tx.send(Msg::KeepaliveTick).await.is_err() {
                break;
            }
        }
    });
    KeepaliveHandle { task }
}
