//! Error types for lampd.

use thiserror::Error;

/// Errors that can occur in daemon operations.
#[derive(Debug, Error)]
pub enum LampError {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Indicator device error.
    #[error("indicator error: {0}")]
    Indicator(String),

    /// Link construction error.
    #[error("link error: {0}")]
    Link(#[from] lamp_link::LinkError),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = LampError::Config("stream_url cannot be empty".to_string());
        assert_eq!(
            err.to_string(),
            "configuration error: stream_url cannot be empty"
        );
    }

    #[test]
    fn test_indicator_error_display() {
        let err = LampError::Indicator("unknown color: purple".to_string());
        assert_eq!(err.to_string(), "indicator error: unknown color: purple");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such device");
        let err: LampError = io_err.into();
        assert!(err.to_string().contains("io error"));
    }

    #[test]
    fn test_link_error_conversion() {
        let link_err = lamp_link::LinkError::InvalidConfig("bad multiplier".to_string());
        let err: LampError = link_err.into();
        assert!(err.to_string().contains("link error"));
    }
}
