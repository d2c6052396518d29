//! Network Module
//!
//! Blocking TCP connection to the store server.
//!
//! ## Lifecycle
//! - Connect (bounded by the caller's deadline)
//! - Handshake: `AUTH` if a credential is configured, `SELECT` for a
//!   non-zero database
//! - One request / one reply at a time

mod connection;

pub use connection::Connection;
