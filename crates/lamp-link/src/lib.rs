//! # lamp-link
//!
//! Resilient link to a remote message stream.
//!
//! A [`ConnectionManager`] owns at most one live transport handle at a time
//! and shields consumers from transient disconnects: on failure it retries
//! with exponential backoff until the connection is re-established or the
//! link is deactivated, and while connected it probes liveness on a fixed
//! interval. Consumers observe the link through [`LinkEvent`] notifications
//! and control it through a [`LinkHandle`].

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod backoff;
pub mod error;
pub mod events;
pub mod keepalive;
pub mod manager;
mod scheduler;
pub mod state;
pub mod transport;

pub use backoff::{BackoffConfig, BackoffPolicy};
pub use error::LinkError;
pub use events::LinkEvent;
pub use keepalive::KeepaliveConfig;
pub use manager::{ConnectionManager, LinkConfig, LinkHandle};
pub use state::{AtomicLinkState, LinkState};
pub use transport::{Transport, TransportEvent, TransportHandle, TransportOptions, WsTransport};
