//! Backend Module
//!
//! The key-value operations the document store needs, behind a trait so the
//! network store can be swapped for an in-process one.
//!
//! ## Implementations
//! - [`RespBackend`]: a Redis-compatible server over TCP
//! - [`MemoryBackend`]: a `HashMap`, for tests and local runs

mod memory;
mod resp;

pub use memory::MemoryBackend;
pub use resp::RespBackend;

use crate::deadline::Deadline;
use crate::error::Result;

/// Raw string key-value operations against a store
///
/// Each call is one round trip to the store and must finish before
/// `deadline`. Implementations are shared across threads.
pub trait KvBackend: Send + Sync {
    /// Fetch the value at `key`, `None` if absent
    fn get(&self, key: &str, deadline: Deadline) -> Result<Option<String>>;

    /// Store `value` at `key` with no expiry, overwriting any previous value
    fn set(&self, key: &str, value: &str, deadline: Deadline) -> Result<()>;

    /// Remove `key`. Returns whether it existed.
    fn delete(&self, key: &str, deadline: Deadline) -> Result<bool>;

    /// Check the store is reachable
    fn ping(&self, deadline: Deadline) -> Result<()>;
}

impl<B: KvBackend + ?Sized> KvBackend for std::sync::Arc<B> {
    fn get(&self, key: &str, deadline: Deadline) -> Result<Option<String>> {
        (**self).get(key, deadline)
    }

    fn set(&self, key: &str, value: &str, deadline: Deadline) -> Result<()> {
        (**self).set(key, value, deadline)
    }

    fn delete(&self, key: &str, deadline: Deadline) -> Result<bool> {
        (**self).delete(key, deadline)
    }

    fn ping(&self, deadline: Deadline) -> Result<()> {
        (**self).ping(deadline)
    }
}
