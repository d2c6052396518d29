//! Document Store
//!
//! Create / read / update / delete of [`Document`]s over a [`KvBackend`].
//!
//! Every operation is exactly one backend call. `create` and `update` are
//! both upserts: neither checks whether the id already exists.

use crate::backend::{KvBackend, RespBackend};
use crate::config::StoreConfig;
use crate::deadline::Deadline;
use crate::document::Document;
use crate::error::{KvDocError, Result};

/// Documents keyed by id on a key-value backend
pub struct DocumentStore<B: KvBackend = RespBackend> {
    backend: B,
}

impl DocumentStore<RespBackend> {
    /// Build a store for a remote server
    ///
    /// No connection is made here; an unreachable server is reported by the
    /// first operation.
    pub fn connect(config: StoreConfig) -> Self {
        tracing::debug!("Document store configured for {}", config.addr());
        Self::with_backend(RespBackend::new(config))
    }
}

impl<B: KvBackend> DocumentStore<B> {
    /// Build a store on any backend
    pub fn with_backend(backend: B) -> Self {
        Self { backend }
    }

    /// Get the underlying backend
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Write `doc` under its id, replacing whatever was there
    pub fn create(&self, doc: &Document, deadline: Deadline) -> Result<()> {
        tracing::debug!("Creating document {}", doc.id);
        self.write(doc, deadline)
    }

    /// Fetch and decode the document stored under `id`
    pub fn read(&self, id: &str, deadline: Deadline) -> Result<Document> {
        tracing::debug!("Reading document {}", id);
        let raw = self
            .backend
            .get(id, deadline)?
            .ok_or_else(|| KvDocError::NotFound(id.to_string()))?;
        Document::decode(&raw)
    }

    /// Same as [`create`](Self::create)
    pub fn update(&self, doc: &Document, deadline: Deadline) -> Result<()> {
        tracing::debug!("Updating document {}", doc.id);
        self.write(doc, deadline)
    }

    /// Remove the document stored under `id`. Absent ids are not an error.
    pub fn delete(&self, id: &str, deadline: Deadline) -> Result<()> {
        tracing::debug!("Deleting document {}", id);
        let existed = self.backend.delete(id, deadline)?;
        if !existed {
            tracing::debug!("Document {} was already absent", id);
        }
        Ok(())
    }

    /// Check the backend is reachable
    pub fn ping(&self, deadline: Deadline) -> Result<()> {
        self.backend.ping(deadline)
    }

    fn write(&self, doc: &Document, deadline: Deadline) -> Result<()> {
        let encoded = doc.encode()?;
        self.backend.set(&doc.id, &encoded, deadline)
    }
}
