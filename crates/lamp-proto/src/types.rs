//! Core protocol types.

use serde::{Deserialize, Serialize};

/// Health of a single monitored service.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Health {
    /// Service is operating normally.
    Ok,
    /// Service is up but impaired.
    Degraded,
    /// Service is unavailable.
    Down,
}

/// Severity of a discrete stream event.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Informational, no action needed.
    Info,
    /// Something is off but the system is functional.
    Warning,
    /// Immediate attention required.
    Critical,
}

/// Health report for one named service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServiceHealth {
    /// Service name, unique within one state update.
    pub name: String,
    /// Reported health.
    pub health: Health,
}

impl ServiceHealth {
    /// Create a service health report.
    #[must_use]
    pub fn new(name: impl Into<String>, health: Health) -> Self {
        Self {
            name: name.into(),
            health,
        }
    }
}
