//! Reconnect scheduling.
//!
//! The scheduler owns a single pending one-shot timer. It always queues the
//! next attempt before the outcome of the current one is known, because
//! connection establishment is asynchronous: a successful open interrupts
//! the cycle from the outside via [`ReconnectScheduler::stop`].

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::sleep;

use crate::backoff::BackoffPolicy;
use crate::manager::Msg;

/// Drives reconnection attempts on a backoff schedule.
#[derive(Debug)]
pub(crate) struct ReconnectScheduler {
    policy: BackoffPolicy,
    active: bool,
    pending: Option<JoinHandle<()>>,
}

impl ReconnectScheduler {
    pub(crate) fn new(policy: BackoffPolicy) -> Self {
        Self {
            policy,
            active: false,
            pending: None,
        }
    }

    /// Whether a reconnect cycle is in progress.
    pub(crate) fn is_active(&self) -> bool {
        self.active
    }

    /// Begin a reconnect cycle. Idempotent: an active cycle is untouched,
    /// so an in-progress backoff sequence is never reset by repeat failures.
    pub(crate) fn start(&mut self, tx: &mpsc::Sender<Msg>) {
        if self.active {
            return;
        }
        self.active = true;
        self.policy.reset();
        self.schedule_next(tx);
    }

    /// Arm the one-shot timer for the current delay. No-op when inactive,
    /// which also swallows calls racing a `stop`.
    pub(crate) fn schedule_next(&mut self, tx: &mpsc::Sender<Msg>) {
        if !self.active {
            return;
        }
        let delay = self.policy.current_delay();
        let tx = tx.clone();
        self.pending = Some(tokio::spawn(async move {
            sleep(delay).await;
            let _ = tx.send(Msg::RetryFired).await;
        }));
    }

    /// Acknowledge a fired timer, releasing the pending slot.
    pub(crate) fn timer_fired(&mut self) {
        self.pending = None;
    }

    /// Grow the delay for the next attempt.
    pub(crate) fn advance(&mut self) {
        self.policy.advance();
    }

    /// End the cycle and cancel any pending timer. An attempt already in
    /// flight is not cancelled; it only prevents new ones.
    pub(crate) fn stop(&mut self) {
        self.active = false;
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }
    }
}
