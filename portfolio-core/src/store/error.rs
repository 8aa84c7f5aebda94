use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::partition::{DocumentPath, DocumentPathError};

/// Errors that can occur during document store operations.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Document not found: {0}")]
    NotFound(DocumentPath),

    #[error(transparent)]
    InvalidPath(#[from] DocumentPathError),

    #[error("I/O error for {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Malformed document {path}: {message}")]
    Malformed { path: DocumentPath, message: String },

    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Subscription fell behind by {0} snapshot(s)")]
    Lagged(u64),
}
