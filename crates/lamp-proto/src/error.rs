//! Error types for the lamp-proto crate.

use thiserror::Error;

/// Errors that can occur during protocol operations.
#[derive(Debug, Error)]
pub enum ProtoError {
    /// Failed to encode a message.
    #[error("encoding error: {0}")]
    Encoding(String),

    /// Failed to decode a message.
    #[error("decoding error: {0}")]
    Decoding(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encoding_error_display() {
        let err = ProtoError::Encoding("bad payload".to_string());
        assert_eq!(err.to_string(), "encoding error: bad payload");
    }

    #[test]
    fn test_decoding_error_display() {
        let err = ProtoError::Decoding("unexpected token".to_string());
        assert_eq!(err.to_string(), "decoding error: unexpected token");
    }
}
