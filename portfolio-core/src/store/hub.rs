//! Fan-out of document changes to live subscribers.

use futures::{stream, StreamExt};
use std::collections::HashMap;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::sync::RwLock;

use super::{Snapshot, SnapshotStream, StoreError};
use crate::partition::DocumentPath;

/// Snapshots buffered per document before a slow subscriber starts lagging.
const CHANNEL_CAPACITY: usize = 64;

/// Tracks subscribers per document and broadcasts new snapshots to them.
pub struct SubscriptionHub {
    channels: RwLock<HashMap<DocumentPath, broadcast::Sender<Snapshot>>>,
}

impl SubscriptionHub {
    pub fn new() -> Self {
        Self {
            channels: RwLock::new(HashMap::new()),
        }
    }

    /// Subscribes to future snapshots of `path`.
    pub async fn subscribe(&self, path: &DocumentPath) -> broadcast::Receiver<Snapshot> {
        let mut channels = self.channels.write().await;

        if let Some(sender) = channels.get(path) {
            sender.subscribe()
        } else {
            let (sender, receiver) = broadcast::channel(CHANNEL_CAPACITY);
            channels.insert(path.clone(), sender);
            receiver
        }
    }

    /// Broadcasts a new snapshot of `path` to all of its subscribers.
    pub async fn publish(&self, path: &DocumentPath, snapshot: Snapshot) {
        let channels = self.channels.read().await;

        if let Some(sender) = channels.get(path) {
            // No receivers is fine
            let _ = sender.send(snapshot);
        }
    }

    /// Documents that currently have at least one subscriber.
    pub async fn watched_paths(&self) -> Vec<DocumentPath> {
        let channels = self.channels.read().await;
        channels
            .iter()
            .filter(|(_, sender)| sender.receiver_count() > 0)
            .map(|(path, _)| path.clone())
            .collect()
    }

    pub async fn subscriber_count(&self, path: &DocumentPath) -> usize {
        let channels = self.channels.read().await;
        channels.get(path).map_or(0, |s| s.receiver_count())
    }
}

impl Default for SubscriptionHub {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds a snapshot stream that yields `current` first, then every broadcast.
///
/// Callers must subscribe *before* reading `current` so no change is missed;
/// a change landing in between is delivered twice, which is harmless since
/// every snapshot is a full replacement.
pub fn snapshot_stream(current: Snapshot, receiver: broadcast::Receiver<Snapshot>) -> SnapshotStream {
    let updates = stream::unfold(receiver, |mut receiver| async move {
        match receiver.recv().await {
            Ok(snapshot) => Some((Ok(snapshot), receiver)),
            Err(RecvError::Lagged(skipped)) => Some((Err(StoreError::Lagged(skipped)), receiver)),
            Err(RecvError::Closed) => None,
        }
    });

    stream::once(async move { Ok(current) })
        .chain(updates)
        .boxed()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::partition::Partition;

    fn doc(key: &str) -> Snapshot {
        let mut document = crate::store::Document::new();
        document.insert(key.to_string(), serde_json::Value::Bool(true));
        Some(document)
    }

    #[tokio::test]
    async fn test_hub_subscribe_and_publish() {
        let hub = SubscriptionHub::new();
        let path = Partition::Awards.path();

        let mut rx = hub.subscribe(&path).await;
        hub.publish(&path, doc("a")).await;

        assert_eq!(rx.try_recv().unwrap(), doc("a"));
    }

    #[tokio::test]
    async fn test_hub_isolates_documents() {
        let hub = SubscriptionHub::new();
        let mut awards = hub.subscribe(&Partition::Awards.path()).await;
        let mut talks = hub.subscribe(&Partition::Talks.path()).await;

        hub.publish(&Partition::Awards.path(), doc("a")).await;

        assert!(awards.try_recv().is_ok());
        assert!(talks.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_watched_paths_skip_dropped_subscribers() {
        let hub = SubscriptionHub::new();
        let _awards = hub.subscribe(&Partition::Awards.path()).await;
        drop(hub.subscribe(&Partition::Talks.path()).await);

        assert_eq!(hub.watched_paths().await, vec![Partition::Awards.path()]);
    }

    #[tokio::test]
    async fn test_snapshot_stream_yields_current_first() {
        let hub = SubscriptionHub::new();
        let path = Partition::Lab.path();

        let rx = hub.subscribe(&path).await;
        let mut stream = snapshot_stream(None, rx);
        hub.publish(&path, doc("b")).await;

        assert_eq!(stream.next().await.unwrap().unwrap(), None);
        assert_eq!(stream.next().await.unwrap().unwrap(), doc("b"));
        assert_eq!(hub.subscriber_count(&path).await, 1);
    }
}
