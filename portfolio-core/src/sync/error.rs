//! Sync error types.

use thiserror::Error;

use crate::auth::AuthError;
use crate::partition::Partition;
use crate::store::StoreError;

/// Errors that can occur during sync layer operations.
///
/// Mutations never return these to the caller as `Err`; they are logged,
/// shown as a notification, and reported through [`Outcome::Failed`].
///
/// [`Outcome::Failed`]: super::Outcome::Failed
#[derive(Error, Debug)]
pub enum SyncError {
    /// A mutation was attempted while signed out
    #[error("You must be logged in to {0}")]
    Unauthorized(String),

    /// The store rejected a write
    #[error("Store write failed: {0}")]
    Store(#[from] StoreError),

    /// A live subscription failed to open or broke
    #[error("Subscription to {partition} failed: {source}")]
    Subscription {
        partition: Partition,
        #[source]
        source: StoreError,
    },

    /// The identity provider failed
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// An update does not fit the entity's shape
    #[error("Invalid update: {0}")]
    InvalidPatch(String),

    /// An entity could not be encoded as a document
    #[error("Failed to encode document: {0}")]
    Encode(#[from] serde_json::Error),
}

impl SyncError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, SyncError::Unauthorized(_))
    }
}
