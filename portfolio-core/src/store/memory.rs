use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::Mutex;

use super::hub::{snapshot_stream, SubscriptionHub};
use super::{Document, DocumentStore, Snapshot, SnapshotStream, StoreError};
use crate::partition::DocumentPath;

/// In-process document store.
///
/// Besides serving as a store it records how many writes were attempted and
/// can be told to fail writes or subscriptions, which is what the sync layer's
/// tests observe.
#[derive(Default)]
pub struct MemoryStore {
    documents: Mutex<BTreeMap<DocumentPath, Document>>,
    hub: SubscriptionHub,
    write_calls: AtomicUsize,
    fail_writes: AtomicBool,
    failing_subscriptions: Mutex<BTreeSet<DocumentPath>>,
}

impl MemoryStore {
    /// Builds an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `document` at `path` without counting it as a write.
    ///
    /// Subscribers are notified as for any other change.
    pub async fn seed(&self, path: &DocumentPath, document: Document) {
        self.documents
            .lock()
            .await
            .insert(path.clone(), document.clone());
        self.hub.publish(path, Some(document)).await;
    }

    /// Number of `set`/`merge` calls made so far, failed ones included.
    pub fn write_calls(&self) -> usize {
        self.write_calls.load(Ordering::SeqCst)
    }

    /// Makes every subsequent `set`/`merge` fail with [`StoreError::Unavailable`].
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Makes subsequent subscriptions to `path` fail to establish.
    pub async fn fail_subscription(&self, path: &DocumentPath) {
        self.failing_subscriptions.lock().await.insert(path.clone());
    }

    pub async fn subscriber_count(&self, path: &DocumentPath) -> usize {
        self.hub.subscriber_count(path).await
    }

    fn begin_write(&self) -> Result<(), StoreError> {
        self.write_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("writes are disabled".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn subscribe(&self, path: &DocumentPath) -> Result<SnapshotStream, StoreError> {
        if self.failing_subscriptions.lock().await.contains(path) {
            return Err(StoreError::Unavailable(format!(
                "subscription to {} refused",
                path
            )));
        }

        let receiver = self.hub.subscribe(path).await;
        let current = self.documents.lock().await.get(path).cloned();
        Ok(snapshot_stream(current, receiver))
    }

    async fn get(&self, path: &DocumentPath) -> Result<Snapshot, StoreError> {
        Ok(self.documents.lock().await.get(path).cloned())
    }

    async fn set(&self, path: &DocumentPath, document: Document) -> Result<(), StoreError> {
        self.begin_write()?;

        self.documents
            .lock()
            .await
            .insert(path.clone(), document.clone());
        self.hub.publish(path, Some(document)).await;
        Ok(())
    }

    async fn merge(&self, path: &DocumentPath, fields: Document) -> Result<(), StoreError> {
        self.begin_write()?;

        let merged = {
            let mut documents = self.documents.lock().await;
            let document = documents
                .get_mut(path)
                .ok_or_else(|| StoreError::NotFound(path.clone()))?;
            document.extend(fields);
            document.clone()
        };
        self.hub.publish(path, Some(merged)).await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::partition::Partition;
    use futures::StreamExt;
    use serde_json::json;

    fn document(value: serde_json::Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn test_set_and_get() {
        let store = MemoryStore::new();
        let path = Partition::Awards.path();

        assert_eq!(store.get(&path).await.unwrap(), None);
        store
            .set(&path, document(json!({"items": []})))
            .await
            .unwrap();

        assert_eq!(
            store.get(&path).await.unwrap(),
            Some(document(json!({"items": []})))
        );
        assert_eq!(store.write_calls(), 1);
    }

    #[tokio::test]
    async fn test_merge_overwrites_only_given_fields() {
        let store = MemoryStore::new();
        let path = Partition::Profile.path();
        store
            .seed(&path, document(json!({"name": "Jane", "title": "Dr."})))
            .await;

        store
            .merge(&path, document(json!({"title": "Prof."})))
            .await
            .unwrap();

        assert_eq!(
            store.get(&path).await.unwrap(),
            Some(document(json!({"name": "Jane", "title": "Prof."})))
        );
    }

    #[tokio::test]
    async fn test_merge_missing_document_fails() {
        let store = MemoryStore::new();
        let result = store
            .merge(&Partition::Lab.path(), document(json!({"name": "x"})))
            .await;
        assert!(matches!(result, Err(StoreError::NotFound(_))));
        assert_eq!(store.write_calls(), 1);
    }

    #[tokio::test]
    async fn test_failed_writes_are_counted_and_not_applied() {
        let store = MemoryStore::new();
        let path = Partition::Talks.path();
        store.fail_writes(true);

        let result = store.set(&path, document(json!({"items": []}))).await;

        assert!(matches!(result, Err(StoreError::Unavailable(_))));
        assert_eq!(store.write_calls(), 1);
        assert_eq!(store.get(&path).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_subscription_sees_current_then_changes() {
        let store = MemoryStore::new();
        let path = Partition::Talks.path();
        store.seed(&path, document(json!({"items": []}))).await;

        let mut stream = store.subscribe(&path).await.unwrap();
        store
            .set(&path, document(json!({"items": [{"id": "1"}]})))
            .await
            .unwrap();

        let first = stream.next().await.unwrap().unwrap();
        let second = stream.next().await.unwrap().unwrap();
        assert_eq!(first, Some(document(json!({"items": []}))));
        assert_eq!(second, Some(document(json!({"items": [{"id": "1"}]}))));
    }

    #[tokio::test]
    async fn test_failing_subscription() {
        let store = MemoryStore::new();
        let path = Partition::Profile.path();
        store.fail_subscription(&path).await;

        assert!(store.subscribe(&path).await.is_err());
        assert!(store.subscribe(&Partition::Lab.path()).await.is_ok());
    }
}
