//! Link state types.

use std::sync::atomic::{AtomicU32, Ordering};

/// Observable state of the link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    /// No connection and no intent to connect.
    Idle,
    /// A connection attempt is in flight.
    Connecting,
    /// Connected.
    Open,
    /// Disconnected, retrying with backoff.
    Reconnecting,
}

/// Atomic wrapper for link state.
#[derive(Debug)]
pub struct AtomicLinkState(AtomicU32);

impl AtomicLinkState {
    /// Create a new atomic state.
    #[must_use]
    pub const fn new(state: LinkState) -> Self {
        Self(AtomicU32::new(state as u32))
    }

    /// Load the current state.
    #[must_use]
    pub fn load(&self) -> LinkState {
        match self.0.load(Ordering::SeqCst) {
            1 => LinkState::Connecting,
            2 => LinkState::Open,
            3 => LinkState::Reconnecting,
            _ => LinkState::Idle,
        }
    }

    /// Store a new state.
    pub fn store(&self, state: LinkState) {
        self.0.store(state as u32, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_state_enum() {
        assert_eq!(LinkState::Idle as u32, 0);
        assert_eq!(LinkState::Connecting as u32, 1);
        assert_eq!(LinkState::Open as u32, 2);
        assert_eq!(LinkState::Reconnecting as u32, 3);
    }

    #[test]
    fn test_atomic_link_state() {
        let state = AtomicLinkState::new(LinkState::Idle);
        assert_eq!(state.load(), LinkState::Idle);

        state.store(LinkState::Connecting);
        assert_eq!(state.load(), LinkState::Connecting);

        state.store(LinkState::Open);
        assert_eq!(state.load(), LinkState::Open);

        state.store(LinkState::Reconnecting);
        assert_eq!(state.load(), LinkState::Reconnecting);
    }
}
