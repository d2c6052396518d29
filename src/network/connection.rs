//! Connection Handler
//!
//! A single client connection to the store.

use std::io::{BufReader, BufWriter};
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

use crate::config::StoreConfig;
use crate::deadline::Deadline;
use crate::error::{KvDocError, Result};
use crate::protocol::{read_frame, write_command, Command, Frame};

/// An open, authenticated connection to the store
pub struct Connection {
    /// TCP stream reader (buffered for efficiency)
    reader: BufReader<TcpStream>,

    /// TCP stream writer (buffered for efficiency)
    writer: BufWriter<TcpStream>,

    /// Peer address for logging
    peer_addr: String,
}

impl Connection {
    /// Connect to the configured server and run the handshake
    pub fn open(config: &StoreConfig, deadline: Deadline) -> Result<Self> {
        let addr = config.addr();
        let stream = connect(&addr, deadline)?;

        let peer_addr = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| addr.clone());

        // Disable Nagle's algorithm for low latency
        stream
            .set_nodelay(true)
            .map_err(KvDocError::from_transport)?;

        // Clone stream for separate read/write handles
        let read_stream = stream.try_clone().map_err(KvDocError::from_transport)?;
        let write_stream = stream;

        let mut conn = Self {
            reader: BufReader::new(read_stream),
            writer: BufWriter::new(write_stream),
            peer_addr,
        };

        tracing::debug!("Connected to {}", conn.peer_addr);
        conn.handshake(config, deadline)?;
        Ok(conn)
    }

    /// Authenticate and select the database
    fn handshake(&mut self, config: &StoreConfig, deadline: Deadline) -> Result<()> {
        if let Some(password) = &config.credential {
            let reply = self.request(
                &Command::Auth {
                    password: password.clone(),
                },
                deadline,
            )?;
            expect_ok("AUTH", reply)?;
            tracing::debug!("Authenticated with {}", self.peer_addr);
        }

        if config.database != 0 {
            let reply = self.request(&Command::Select { db: config.database }, deadline)?;
            expect_ok("SELECT", reply)?;
            tracing::debug!("Selected database {} on {}", config.database, self.peer_addr);
        }

        Ok(())
    }

    /// Send one command and read its reply
    ///
    /// The remaining deadline becomes the socket read/write timeout for this
    /// round trip. An error reply from the server becomes `StoreRejected`.
    pub fn request(&mut self, command: &Command, deadline: Deadline) -> Result<Frame> {
        let timeout = deadline.remaining()?;
        self.request_with_timeout(command, timeout)
    }

    /// Like [`request`](Self::request), with the socket timeout already
    /// worked out. `None` blocks for as long as the socket does.
    pub fn request_with_timeout(
        &mut self,
        command: &Command,
        timeout: Option<Duration>,
    ) -> Result<Frame> {
        self.set_timeouts(timeout)?;

        tracing::trace!("Sending {} to {}", command.name(), self.peer_addr);
        write_command(&mut self.writer, command).map_err(KvDocError::into_transport)?;

        let reply = read_frame(&mut self.reader).map_err(|e| match e {
            KvDocError::Io(ref io) if io.kind() == std::io::ErrorKind::UnexpectedEof => {
                KvDocError::ConnectionFailure(format!(
                    "connection to {} closed by server",
                    self.peer_addr
                ))
            }
            other => other.into_transport(),
        })?;

        tracing::trace!("Received {} from {}", reply.kind(), self.peer_addr);

        match reply {
            Frame::Error(message) => Err(KvDocError::StoreRejected(message)),
            frame => Ok(frame),
        }
    }

    /// Configure socket read/write timeouts
    fn set_timeouts(&mut self, timeout: Option<Duration>) -> Result<()> {
        self.reader
            .get_ref()
            .set_read_timeout(timeout)
            .map_err(KvDocError::from_transport)?;
        self.writer
            .get_ref()
            .set_write_timeout(timeout)
            .map_err(KvDocError::from_transport)?;

        Ok(())
    }

    /// Get the peer address string
    pub fn peer_addr(&self) -> &str {
        &self.peer_addr
    }
}

/// Resolve and connect, trying each resolved address in turn
fn connect(addr: &str, deadline: Deadline) -> Result<TcpStream> {
    let addrs: Vec<SocketAddr> = addr
        .to_socket_addrs()
        .map_err(|e| KvDocError::ConnectionFailure(format!("cannot resolve {}: {}", addr, e)))?
        .collect();

    let mut last_err = None;
    for socket_addr in addrs {
        let attempt = match deadline.remaining()? {
            Some(timeout) => TcpStream::connect_timeout(&socket_addr, timeout),
            None => TcpStream::connect(socket_addr),
        };
        match attempt {
            Ok(stream) => return Ok(stream),
            Err(e) => {
                tracing::debug!("Connect to {} failed: {}", socket_addr, e);
                last_err = Some(e);
            }
        }
    }

    Err(match last_err {
        Some(e) => KvDocError::from_transport(e),
        None => KvDocError::ConnectionFailure(format!("{} resolved to no addresses", addr)),
    })
}

fn expect_ok(step: &str, reply: Frame) -> Result<()> {
    match reply {
        Frame::Simple(ref s) if s == "OK" => Ok(()),
        other => Err(KvDocError::Protocol(format!(
            "{} returned unexpected {}",
            step,
            other.kind()
        ))),
    }
}
