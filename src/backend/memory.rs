//! In-memory backend
//!
//! HashMap wrapped in RwLock. Many concurrent readers, one writer.

use std::collections::HashMap;

use parking_lot::RwLock;

use super::KvBackend;
use crate::deadline::Deadline;
use crate::error::{KvDocError, Result};

/// In-process stand-in for the remote store
#[derive(Debug, Default)]
pub struct MemoryBackend {
    data: RwLock<HashMap<String, String>>,
}

impl MemoryBackend {
    /// Create a new empty backend
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.read().is_empty()
    }

    /// Store raw text without going through a document, e.g. to plant a
    /// record that does not decode
    pub fn insert_raw(&self, key: impl Into<String>, value: impl Into<String>) {
        self.data.write().insert(key.into(), value.into());
    }
}

fn check(deadline: Deadline) -> Result<()> {
    if deadline.is_expired() {
        return Err(KvDocError::DeadlineExceeded);
    }
    Ok(())
}

impl KvBackend for MemoryBackend {
    fn get(&self, key: &str, deadline: Deadline) -> Result<Option<String>> {
        check(deadline)?;
        Ok(self.data.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str, deadline: Deadline) -> Result<()> {
        check(deadline)?;
        self.data.write().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&self, key: &str, deadline: Deadline) -> Result<bool> {
        check(deadline)?;
        Ok(self.data.write().remove(key).is_some())
    }

    fn ping(&self, deadline: Deadline) -> Result<()> {
        check(deadline)
    }
}
