//! Configuration for the store client
//!
//! Host and port are always supplied by the caller; the core carries no
//! default address.

use std::env;
use std::fmt;

use crate::error::{KvDocError, Result};

/// Environment variable holding the store host
pub const ENV_HOST: &str = "KVDOC_HOST";

/// Environment variable holding the store port
pub const ENV_PORT: &str = "KVDOC_PORT";

/// Environment variable holding the optional store password
pub const ENV_PASSWORD: &str = "KVDOC_PASSWORD";

/// Connection settings for a remote store
#[derive(Clone, PartialEq, Eq)]
pub struct StoreConfig {
    // -------------------------------------------------------------------------
    // Network Configuration
    // -------------------------------------------------------------------------
    /// Host name or IP address of the store server
    pub host: String,

    /// TCP port of the store server
    pub port: u16,

    // -------------------------------------------------------------------------
    // Session Configuration
    // -------------------------------------------------------------------------
    /// Password sent with `AUTH` after connecting. `None` skips `AUTH`.
    pub credential: Option<String>,

    /// Logical database selected after connecting.
    /// 0 is the server's default, so `SELECT` is only sent for other indexes.
    pub database: u32,
}

impl StoreConfig {
    /// Create a new config builder for the given server
    pub fn builder(host: impl Into<String>, port: u16) -> StoreConfigBuilder {
        StoreConfigBuilder {
            config: StoreConfig {
                host: host.into(),
                port,
                credential: None,
                database: 0,
            },
        }
    }

    /// Read the config from `KVDOC_HOST`, `KVDOC_PORT` and `KVDOC_PASSWORD`.
    ///
    /// Host and port are required. An empty password counts as no password.
    pub fn from_env() -> Result<Self> {
        let host = env::var(ENV_HOST)
            .map_err(|_| KvDocError::Config(format!("{} is not set", ENV_HOST)))?;
        let port = env::var(ENV_PORT)
            .map_err(|_| KvDocError::Config(format!("{} is not set", ENV_PORT)))?;
        let port = parse_port(&port)?;

        let mut builder = Self::builder(host, port);
        if let Ok(password) = env::var(ENV_PASSWORD) {
            builder = builder.credential(password);
        }
        Ok(builder.build())
    }

    /// `host:port` string used for connecting and logging
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

// The credential must never end up in logs.
impl fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("credential", &self.credential.as_ref().map(|_| "<redacted>"))
            .field("database", &self.database)
            .finish()
    }
}

/// Parse a TCP port, rejecting 0 and anything outside `u16`
pub fn parse_port(raw: &str) -> Result<u16> {
    match raw.trim().parse::<u16>() {
        Ok(0) | Err(_) => Err(KvDocError::Config(format!("invalid port: {:?}", raw))),
        Ok(port) => Ok(port),
    }
}

/// Builder for StoreConfig
pub struct StoreConfigBuilder {
    config: StoreConfig,
}

impl StoreConfigBuilder {
    /// Set the password used to authenticate. Empty strings are ignored.
    pub fn credential(mut self, credential: impl Into<String>) -> Self {
        let credential = credential.into();
        self.config.credential = if credential.is_empty() {
            None
        } else {
            Some(credential)
        };
        self
    }

    /// Set the logical database index
    pub fn database(mut self, index: u32) -> Self {
        self.config.database = index;
        self
    }

    pub fn build(self) -> StoreConfig {
        self.config
    }
}
