//! RESP backend
//!
//! Talks to a Redis-compatible server over a single lazily opened
//! connection.

use parking_lot::Mutex;

use super::KvBackend;
use crate::config::StoreConfig;
use crate::deadline::Deadline;
use crate::error::{KvDocError, Result};
use crate::network::Connection;
use crate::protocol::{Command, Frame};

/// Backend over a remote store
///
/// ## Connection handling
/// - Nothing is opened until the first call
/// - Calls are serialized on the one connection; time spent waiting for
///   it counts against the caller's deadline
/// - A call whose deadline has already passed fails without touching the
///   connection
/// - A call that fails at the transport level drops the connection; the
///   call is not retried, the next call opens a fresh one
pub struct RespBackend {
    /// Immutable connection settings
    config: StoreConfig,

    /// The open connection, if any
    conn: Mutex<Option<Connection>>,
}

impl RespBackend {
    /// Create a backend for the given server. Does not connect.
    pub fn new(config: StoreConfig) -> Self {
        Self {
            config,
            conn: Mutex::new(None),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Whether a connection is currently open
    pub fn is_connected(&self) -> bool {
        self.conn.lock().is_some()
    }

    /// Run one command, opening the connection first if needed
    fn request(&self, command: Command, deadline: Deadline) -> Result<Frame> {
        // Waiting behind another caller counts against this call's deadline
        let mut slot = match deadline.instant() {
            Some(at) => self
                .conn
                .try_lock_until(at)
                .ok_or(KvDocError::DeadlineExceeded)?,
            None => self.conn.lock(),
        };

        if slot.is_none() {
            tracing::debug!("Opening connection to {}", self.config.addr());
            *slot = Some(Connection::open(&self.config, deadline)?);
        }

        // Nothing has been sent yet, so expiring here leaves the connection
        // in sync and it is kept
        let timeout = deadline.remaining()?;

        let result = match slot.as_mut() {
            Some(conn) => conn.request_with_timeout(&command, timeout),
            None => Err(KvDocError::ConnectionFailure("no connection".to_string())),
        };

        if let Err(ref e) = result {
            if e.is_transport() {
                tracing::warn!(
                    "Dropping connection to {} after {} failed: {}",
                    self.config.addr(),
                    command.name(),
                    e
                );
                *slot = None;
            }
        }

        result
    }
}

impl KvBackend for RespBackend {
    fn get(&self, key: &str, deadline: Deadline) -> Result<Option<String>> {
        tracing::debug!("GET {}", key);
        match self.request(Command::Get { key: key.to_string() }, deadline)? {
            Frame::Null => Ok(None),
            Frame::Bulk(bytes) => String::from_utf8(bytes).map(Some).map_err(|_| {
                KvDocError::MalformedRecord(format!("value at {:?} is not UTF-8", key))
            }),
            other => Err(unexpected("GET", &other)),
        }
    }

    fn set(&self, key: &str, value: &str, deadline: Deadline) -> Result<()> {
        tracing::debug!("SET {} ({} bytes)", key, value.len());
        let command = Command::Set {
            key: key.to_string(),
            value: value.to_string(),
        };
        match self.request(command, deadline)? {
            Frame::Simple(ref s) if s == "OK" => Ok(()),
            other => Err(unexpected("SET", &other)),
        }
    }

    fn delete(&self, key: &str, deadline: Deadline) -> Result<bool> {
        tracing::debug!("DEL {}", key);
        match self.request(Command::Del { key: key.to_string() }, deadline)? {
            Frame::Integer(n) => Ok(n > 0),
            other => Err(unexpected("DEL", &other)),
        }
    }

    fn ping(&self, deadline: Deadline) -> Result<()> {
        tracing::debug!("PING");
        match self.request(Command::Ping, deadline)? {
            Frame::Simple(ref s) if s == "PONG" => Ok(()),
            Frame::Bulk(_) => Ok(()),
            other => Err(unexpected("PING", &other)),
        }
    }
}

fn unexpected(command: &str, frame: &Frame) -> KvDocError {
    KvDocError::Protocol(format!("{} returned unexpected {}", command, frame.kind()))
}
