//! Per-call deadlines
//!
//! A [`Deadline`] is created by the caller and handed to each operation.
//! Nothing in the crate holds one across calls.

use std::time::{Duration, Instant};

use crate::error::{KvDocError, Result};

/// Absolute time limit for a single store operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Deadline {
    at: Option<Instant>,
}

impl Deadline {
    /// No limit: the call blocks for as long as the transport does
    pub const fn none() -> Self {
        Self { at: None }
    }

    /// Expire `timeout` from now
    pub fn after(timeout: Duration) -> Self {
        Self {
            at: Instant::now().checked_add(timeout),
        }
    }

    /// Expire at a fixed instant
    pub fn at(instant: Instant) -> Self {
        Self { at: Some(instant) }
    }

    /// The instant this deadline expires, if any
    pub fn instant(&self) -> Option<Instant> {
        self.at
    }

    pub fn is_expired(&self) -> bool {
        matches!(self.at, Some(at) if Instant::now() >= at)
    }

    /// Time left before expiry.
    ///
    /// `Ok(None)` means unbounded. Fails with `DeadlineExceeded` once the
    /// instant has passed, so the result is never a zero duration (which
    /// socket timeouts reject).
    pub fn remaining(&self) -> Result<Option<Duration>> {
        match self.at {
            None => Ok(None),
            Some(at) => {
                let left = at.saturating_duration_since(Instant::now());
                if left.is_zero() {
                    Err(KvDocError::DeadlineExceeded)
                } else {
                    Ok(Some(left))
                }
            }
        }
    }
}
