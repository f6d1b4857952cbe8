//! Error types for lamp-link.

use thiserror::Error;

/// Errors that can occur when constructing a link.
///
/// Runtime failures (connect errors, disconnects) are never surfaced as
/// `Result`s; they become [`crate::LinkEvent`] notifications and internal
/// state transitions.
#[derive(Debug, Error)]
pub enum LinkError {
    /// Configuration violates a construction-time contract.
    #[error("invalid link configuration: {0}")]
    InvalidConfig(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_config_display() {
        let err = LinkError::InvalidConfig("min_delay must not exceed max_delay".to_string());
        assert_eq!(
            err.to_string(),
            "invalid link configuration: min_delay must not exceed max_delay"
        );
    }
}
