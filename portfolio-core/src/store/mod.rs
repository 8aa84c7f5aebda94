//! The remote document store the sync layer mirrors.
//!
//! A store holds schemaless JSON documents addressed by [`DocumentPath`]. It
//! supports point reads, full replacement (`set`), top-level field merges
//! (`merge`) and live per-document subscriptions. A subscription first yields
//! the document's current state, then every later change, as whole snapshots.
//!
//! Two implementations are provided:
//! - [`MemoryStore`]: in-process, with write counting and failure injection
//! - [`FileStore`]: one JSON file per document under a root directory

mod error;
mod file;
mod hub;
mod memory;

use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::partition::DocumentPath;

pub use error::StoreError;
pub use file::FileStore;
pub use hub::SubscriptionHub;
pub use memory::MemoryStore;

/// A document body: the top-level JSON object.
pub type Document = serde_json::Map<String, serde_json::Value>;

/// State of a document at one point in time; `None` if it does not exist.
pub type Snapshot = Option<Document>;

/// Live sequence of snapshots for one document.
pub type SnapshotStream = BoxStream<'static, Result<Snapshot, StoreError>>;

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Opens a live subscription to `path`.
    async fn subscribe(&self, path: &DocumentPath) -> Result<SnapshotStream, StoreError>;

    async fn get(&self, path: &DocumentPath) -> Result<Snapshot, StoreError>;

    /// Replaces the whole document, creating it if needed.
    async fn set(&self, path: &DocumentPath, document: Document) -> Result<(), StoreError>;

    /// Overwrites the given top-level fields of an existing document.
    ///
    /// Fails with [`StoreError::NotFound`] if the document does not exist.
    async fn merge(&self, path: &DocumentPath, fields: Document) -> Result<(), StoreError>;
}
