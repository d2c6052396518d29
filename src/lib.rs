//! # kvdoc
//!
//! A small document store layered over a Redis-compatible key-value server:
//! - Three-field [`Document`] records stored as JSON under their id
//! - Create / read / update / delete, one remote call each
//! - RESP2 wire protocol over a plain blocking TCP connection
//! - Caller-owned per-call [`Deadline`]s
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      DocumentStore                           │
//! │            (encode / decode, NotFound mapping)               │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │  KvBackend (get / set / delete)
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │ RespBackend │          │MemoryBackend│
//!   │ (lazy conn) │          │  (RwLock)   │
//!   └──────┬──────┘          └─────────────┘
//!          │
//!          ▼
//!   ┌─────────────┐
//!   │ Connection  │──── RESP2 over TCP ────▶ store server
//!   └─────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;
pub mod deadline;

pub mod document;
pub mod protocol;
pub mod network;
pub mod backend;
pub mod store;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{KvDocError, Result};
pub use config::StoreConfig;
pub use deadline::Deadline;
pub use document::Document;
pub use backend::{KvBackend, MemoryBackend, RespBackend};
pub use store::DocumentStore;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of kvdoc
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
