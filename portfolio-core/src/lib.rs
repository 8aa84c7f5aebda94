//! Portfolio Core Library
//!
//! Client-side sync layer for an academic portfolio site: a live mirror of
//! the profile, research and teaching interests, experience, publications,
//! events, lab and awards held in a remote document store, plus the
//! authenticated mutations editors use to change them.

pub mod auth;
pub mod models;
pub mod notify;
pub mod partition;
pub mod store;
pub mod sync;
pub mod upload;

pub use auth::{AuthError, AuthProvider, MemoryAuth, User};
pub use models::{
    Activity, Award, BookChapter, Conference, Experience, FinancialSupport, Item, Lab, LabHours,
    LabLocation, Portfolio, Profile, Publication, ResearchInterest, TeachingInterest, Talk,
};
pub use notify::{ChannelNotifier, LogNotifier, Notification, Notifier, Variant};
pub use partition::{DocumentPath, DocumentPathError, Partition};
pub use store::{Document, DocumentStore, FileStore, MemoryStore, Snapshot, StoreError};
pub use sync::{LabSet, ListEntity, Outcome, PortfolioSync, SyncError, SyncOptions, SyncState};
pub use upload::{FsUploader, UploadError, Uploader, DEFAULT_FOLDER};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}
