//! Filesystem-backed document store.
//!
//! Documents are stored as pretty-printed JSON:
//! ```text
//! <root>/
//!   profile/main.json
//!   lab/main.json
//!   publications/list.json
//!   ...
//! ```
//!
//! Subscribers see writes made through the same `FileStore` instance at
//! once. Changes made by other processes show up on [`FileStore::refresh`].

use async_trait::async_trait;
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;

use super::hub::{snapshot_stream, SubscriptionHub};
use super::{Document, DocumentStore, Snapshot, SnapshotStream, StoreError};
use crate::partition::{validate_segment, DocumentPath};

pub struct FileStore {
    root: PathBuf,
    hub: SubscriptionHub,
    /// Serializes read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            hub: SubscriptionHub::new(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the file a document is stored in.
    pub fn document_file(&self, path: &DocumentPath) -> Result<PathBuf, StoreError> {
        validate_segment(path.collection())?;
        validate_segment(path.document())?;
        Ok(self
            .root
            .join(path.collection())
            .join(format!("{}.json", path.document())))
    }

    /// Re-reads every subscribed document and republishes it.
    ///
    /// Returns how many documents were republished.
    pub async fn refresh(&self) -> Result<usize, StoreError> {
        let paths = self.hub.watched_paths().await;
        for path in &paths {
            let snapshot = self.read(path).await?;
            self.hub.publish(path, snapshot).await;
        }
        tracing::debug!("Refreshed {} document(s) from disk", paths.len());
        Ok(paths.len())
    }

    async fn read(&self, path: &DocumentPath) -> Result<Snapshot, StoreError> {
        let file = self.document_file(path)?;

        let bytes = match fs::read(&file).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(StoreError::Io { path: file, source }),
        };

        let value: serde_json::Value =
            serde_json::from_slice(&bytes).map_err(|e| StoreError::Malformed {
                path: path.clone(),
                message: e.to_string(),
            })?;

        match value {
            serde_json::Value::Object(document) => Ok(Some(document)),
            other => Err(StoreError::Malformed {
                path: path.clone(),
                message: format!("expected a JSON object, found {}", json_kind(&other)),
            }),
        }
    }

    /// Writes via a temporary file so readers never see a partial document.
    async fn write(&self, path: &DocumentPath, document: &Document) -> Result<(), StoreError> {
        let file = self.document_file(path)?;
        let dir = file.parent().unwrap_or(&self.root).to_path_buf();

        fs::create_dir_all(&dir)
            .await
            .map_err(|source| StoreError::Io { path: dir, source })?;

        let bytes = serde_json::to_vec_pretty(document).map_err(|e| StoreError::Malformed {
            path: path.clone(),
            message: e.to_string(),
        })?;

        let tmp = file.with_extension("json.tmp");
        fs::write(&tmp, bytes).await.map_err(|source| StoreError::Io {
            path: tmp.clone(),
            source,
        })?;
        fs::rename(&tmp, &file)
            .await
            .map_err(|source| StoreError::Io { path: file, source })?;

        tracing::debug!("Wrote document {}", path);
        Ok(())
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

#[async_trait]
impl DocumentStore for FileStore {
    async fn subscribe(&self, path: &DocumentPath) -> Result<SnapshotStream, StoreError> {
        let receiver = self.hub.subscribe(path).await;
        let current = self.read(path).await?;
        Ok(snapshot_stream(current, receiver))
    }

    async fn get(&self, path: &DocumentPath) -> Result<Snapshot, StoreError> {
        self.read(path).await
    }

    async fn set(&self, path: &DocumentPath, document: Document) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        self.write(path, &document).await?;
        self.hub.publish(path, Some(document)).await;
        Ok(())
    }

    async fn merge(&self, path: &DocumentPath, fields: Document) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut document = self
            .read(path)
            .await?
            .ok_or_else(|| StoreError::NotFound(path.clone()))?;
        document.extend(fields);
        self.write(path, &document).await?;
        self.hub.publish(path, Some(document)).await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::partition::Partition;
    use futures::StreamExt;
    use serde_json::json;
    use tempfile::TempDir;

    fn test_store() -> (FileStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path());
        (store, temp_dir)
    }

    fn document(value: serde_json::Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn test_get_nonexistent_returns_none() {
        let (store, _temp) = test_store();
        assert_eq!(store.get(&Partition::Profile.path()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_persists_to_disk() {
        let (store, temp) = test_store();
        let path = Partition::Publications.path();

        store
            .set(&path, document(json!({"items": [{"id": "1", "title": "T"}]})))
            .await
            .unwrap();

        assert!(temp.path().join("publications").join("list.json").exists());

        // A fresh instance over the same directory sees the document
        let reopened = FileStore::new(temp.path());
        let loaded = reopened.get(&path).await.unwrap().unwrap();
        assert_eq!(loaded["items"][0]["title"], "T");
    }

    #[tokio::test]
    async fn test_merge_requires_existing_document() {
        let (store, _temp) = test_store();
        let path = Partition::Lab.path();

        let result = store.merge(&path, document(json!({"name": "Lab"}))).await;
        assert!(matches!(result, Err(StoreError::NotFound(_))));

        store
            .set(&path, document(json!({"name": "Lab", "members": ["A"]})))
            .await
            .unwrap();
        store
            .merge(&path, document(json!({"members": ["A", "B"]})))
            .await
            .unwrap();

        let loaded = store.get(&path).await.unwrap().unwrap();
        assert_eq!(loaded["name"], "Lab");
        assert_eq!(loaded["members"], json!(["A", "B"]));
    }

    #[tokio::test]
    async fn test_subscribers_see_writes() {
        let (store, _temp) = test_store();
        let path = Partition::Awards.path();

        let mut stream = store.subscribe(&path).await.unwrap();
        store
            .set(&path, document(json!({"items": []})))
            .await
            .unwrap();

        assert_eq!(stream.next().await.unwrap().unwrap(), None);
        assert_eq!(
            stream.next().await.unwrap().unwrap(),
            Some(document(json!({"items": []})))
        );
    }

    #[tokio::test]
    async fn test_refresh_picks_up_other_writers() {
        let (store, temp) = test_store();
        let path = Partition::Talks.path();
        let mut stream = store.subscribe(&path).await.unwrap();
        assert_eq!(stream.next().await.unwrap().unwrap(), None);

        // Another process writes the file directly
        let other = FileStore::new(temp.path());
        other
            .set(&path, document(json!({"items": [{"id": "1"}]})))
            .await
            .unwrap();

        assert_eq!(store.refresh().await.unwrap(), 1);
        assert_eq!(
            stream.next().await.unwrap().unwrap(),
            Some(document(json!({"items": [{"id": "1"}]})))
        );
    }

    #[tokio::test]
    async fn test_malformed_document() {
        let (store, temp) = test_store();
        let dir = temp.path().join("talks");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("list.json"), "[1, 2, 3]").unwrap();

        let result = store.get(&Partition::Talks.path()).await;
        assert!(matches!(result, Err(StoreError::Malformed { .. })));
    }
}
