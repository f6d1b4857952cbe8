//! # lamp-proto
//!
//! Message definitions for the statuslamp stream protocol.
//!
//! The stream delivers JSON text frames; each frame decodes into a single
//! [`StreamMessage`]. The codec is stateless: frames are independent and
//! carry no sequencing.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod messages;
pub mod types;

pub use error::ProtoError;
pub use messages::StreamMessage;
pub use types::{Health, Severity, ServiceHealth};
