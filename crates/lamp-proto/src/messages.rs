//! Stream message definitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{Severity, ServiceHealth};

/// Messages delivered by the status stream.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamMessage {
    /// Full snapshot of monitored service health. Replaces any prior state.
    StateUpdate {
        /// Health of every monitored service.
        services: Vec<ServiceHealth>,
        /// Timestamp.
        timestamp: DateTime<Utc>,
    },
    /// Discrete occurrence (deploy finished, alert fired, ...).
    Event {
        /// Event name.
        name: String,
        /// Severity.
        severity: Severity,
        /// Optional human-readable detail.
        message: Option<String>,
        /// Timestamp.
        timestamp: DateTime<Utc>,
    },
}

impl StreamMessage {
    /// Create a state update message.
    #[must_use]
    pub fn state_update(services: Vec<ServiceHealth>) -> Self {
        Self::StateUpdate {
            services,
            timestamp: Utc::now(),
        }
    }

    /// Create an event message.
    #[must_use]
    pub fn event(name: impl Into<String>, severity: Severity, message: Option<String>) -> Self {
        Self::Event {
            name: name.into(),
            severity,
            message,
            timestamp: Utc::now(),
        }
    }

    /// Serialize to JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, crate::ProtoError> {
        serde_json::to_string(self).map_err(|e| crate::ProtoError::Encoding(e.to_string()))
    }

    /// Deserialize from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if deserialization fails.
    pub fn from_json(json: &str) -> Result<Self, crate::ProtoError> {
        serde_json::from_str(json).map_err(|e| crate::ProtoError::Decoding(e.to_string()))
    }
}
