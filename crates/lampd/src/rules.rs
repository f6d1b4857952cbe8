//! Lamp color rules.
//!
//! [`StatusSnapshot`] folds stream messages into the latest known picture
//! of the monitored system; [`color_for`] maps that picture to a color.
//! Both are free of I/O and time.

use std::collections::BTreeMap;

use lamp_proto::{Health, Severity, StreamMessage};

use crate::indicator::LampColor;

/// Latest known state of the monitored system.
#[derive(Debug, Clone, Default)]
pub struct StatusSnapshot {
    services: BTreeMap<String, Health>,
    alert: bool,
}

impl StatusSnapshot {
    /// Create an empty snapshot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one stream message into the snapshot.
    ///
    /// A state update is authoritative: it replaces the service table and
    /// clears any standing alert. A critical event raises a standing alert
    /// that persists until the next state update.
    pub fn apply(&mut self, message: &StreamMessage) {
        match message {
            StreamMessage::StateUpdate { services, .. } => {
                self.services = services
                    .iter()
                    .map(|service| (service.name.clone(), service.health))
                    .collect();
                self.alert = false;
            }
            StreamMessage::Event { severity, .. } => {
                if *severity == Severity::Critical {
                    self.alert = true;
                }
            }
        }
    }

    /// Whether any state update has been seen yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    fn any(&self, health: Health) -> bool {
        self.services.values().any(|&h| h == health)
    }
}

/// Map a snapshot to the color the lamp should show.
#[must_use]
pub fn color_for(snapshot: &StatusSnapshot) -> LampColor {
    if snapshot.alert || snapshot.any(Health::Down) {
        LampColor::Red
    } else if snapshot.any(Health::Degraded) {
        LampColor::Amber
    } else if snapshot.is_empty() {
        LampColor::White
    } else {
        LampColor::Green
    }
}
