//! Command definitions
//!
//! The requests this client sends to the store.

use super::Frame;

/// A command sent to the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Authenticate the connection
    Auth { password: String },

    /// Switch the connection to a logical database
    Select { db: u32 },

    /// Get a value by key
    Get { key: String },

    /// Set a key to a value, no expiry
    Set { key: String, value: String },

    /// Delete a key
    Del { key: String },

    /// Ping (health check)
    Ping,
}

impl Command {
    /// Command name as sent on the wire
    pub fn name(&self) -> &'static str {
        match self {
            Command::Auth { .. } => "AUTH",
            Command::Select { .. } => "SELECT",
            Command::Get { .. } => "GET",
            Command::Set { .. } => "SET",
            Command::Del { .. } => "DEL",
            Command::Ping => "PING",
        }
    }

    /// Render as an array of bulk strings
    pub fn to_frame(&self) -> Frame {
        let name = Frame::bulk(self.name());
        let parts = match self {
            Command::Auth { password } => vec![name, Frame::bulk(password)],
            Command::Select { db } => vec![name, Frame::bulk(db.to_string())],
            Command::Get { key } => vec![name, Frame::bulk(key)],
            Command::Set { key, value } => vec![name, Frame::bulk(key), Frame::bulk(value)],
            Command::Del { key } => vec![name, Frame::bulk(key)],
            Command::Ping => vec![name],
        };
        Frame::Array(parts)
    }
}
