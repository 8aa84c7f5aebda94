//! The sync layer: a live local mirror of every portfolio partition plus the
//! mutations editors use to change them.
//!
//! ## Data flow
//!
//! 1. [`PortfolioSync::start`] opens one subscription per [`Partition`]
//! 2. A single task applies incoming snapshots to the mirror, in arrival order
//! 3. Readers observe [`SyncState`] through a `watch` channel
//! 4. Mutations compute the new document from the last stored document and
//!    write it to the store; the mirror only changes when the store echoes the
//!    write back
//!
//! Mutations never return `Err`. Every outcome is logged and surfaced to the
//! user through the [`Notifier`], and reported to the caller as an [`Outcome`].

mod entity;
mod error;
mod named;
mod reducer;
mod state;

pub use entity::ListEntity;
pub use error::SyncError;
pub use reducer::{apply_snapshot, decode_items, encode_entries, entry_id, merge_patch};
pub use state::{SyncOptions, SyncState, DEFAULT_LOADING_GRACE};

use futures::stream::{self, BoxStream, SelectAll};
use futures::StreamExt;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, RwLock};
use tokio::task::JoinHandle;

use crate::auth::{AuthProvider, User};
use crate::models::{Item, Lab, Portfolio, Profile};
use crate::notify::{Notification, Notifier};
use crate::partition::{Partition, ITEMS_FIELD};
use crate::store::{Document, DocumentStore, Snapshot, StoreError};

type TaggedSnapshots = BoxStream<'static, (Partition, Result<Snapshot, StoreError>)>;

/// What a mutation did.
#[derive(Debug)]
pub enum Outcome {
    /// The store accepted the write.
    Written,
    /// Nothing needed writing (unknown id, duplicate set member).
    Unchanged,
    /// The mutation was refused or the write failed.
    Failed(SyncError),
}

impl Outcome {
    pub fn is_written(&self) -> bool {
        matches!(self, Outcome::Written)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Outcome::Failed(_))
    }

    pub fn error(&self) -> Option<&SyncError> {
        match self {
            Outcome::Failed(error) => Some(error),
            _ => None,
        }
    }
}

/// The string sets kept inside the lab document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabSet {
    Members,
    Research,
}

impl LabSet {
    fn field(self) -> &'static str {
        match self {
            LabSet::Members => "members",
            LabSet::Research => "research",
        }
    }

    fn noun(self) -> &'static str {
        match self {
            LabSet::Members => "lab member",
            LabSet::Research => "research area",
        }
    }

    fn duplicate_title(self) -> &'static str {
        match self {
            LabSet::Members => "Member already exists",
            LabSet::Research => "Research area already exists",
        }
    }
}

/// What a mutation is about, for log lines and notifications.
#[derive(Debug, Clone, Copy)]
enum Subject {
    List(&'static str),
    Profile,
    Lab,
    LabSet(LabSet),
}

impl Subject {
    fn noun(self) -> &'static str {
        match self {
            Subject::List(noun) => noun,
            Subject::Profile => "profile",
            Subject::Lab => "lab information",
            Subject::LabSet(set) => set.noun(),
        }
    }

    fn success(self, op: Op) -> Notification {
        let noun = self.noun();
        match self {
            Subject::Profile => Notification::success(
                "Profile updated",
                "Your profile has been successfully updated.",
            ),
            Subject::Lab => Notification::success(
                "Lab updated",
                format!("Your {} has been {} successfully.", noun, op.done()),
            ),
            Subject::List(_) => Notification::success(
                format!("{} {}", capitalize(noun), op.done()),
                format!("Your {} has been {} successfully.", noun, op.done()),
            ),
            Subject::LabSet(_) => Notification::success(
                format!("{} {}", capitalize(noun), op.done()),
                format!("The {} has been {} successfully.", noun, op.done()),
            ),
        }
    }

    fn failure(self, op: Op) -> Notification {
        let owner = match self {
            Subject::LabSet(_) => "the",
            _ => "your",
        };
        Notification::failure(
            op.failure_title(),
            format!("There was an error {} {} {}.", op.doing(), owner, self.noun()),
        )
    }
}

#[derive(Debug, Clone, Copy)]
enum Op {
    Add,
    Update,
    Remove,
}

impl Op {
    fn verb(self) -> &'static str {
        match self {
            Op::Add => "add",
            Op::Update => "update",
            Op::Remove => "remove",
        }
    }

    fn done(self) -> &'static str {
        match self {
            Op::Add => "added",
            Op::Update => "updated",
            Op::Remove => "removed",
        }
    }

    fn doing(self) -> &'static str {
        match self {
            Op::Add => "adding",
            Op::Update => "updating",
            Op::Remove => "removing",
        }
    }

    fn failure_title(self) -> &'static str {
        match self {
            Op::Add => "Addition failed",
            Op::Update => "Update failed",
            Op::Remove => "Removal failed",
        }
    }
}

struct Shared {
    store: Arc<dyn DocumentStore>,
    auth: Arc<dyn AuthProvider>,
    notifier: Arc<dyn Notifier>,
    state: watch::Sender<SyncState>,
    /// Last document seen per partition, exactly as stored.
    documents: RwLock<HashMap<Partition, Document>>,
}

impl Shared {
    async fn apply(&self, partition: Partition, snapshot: Snapshot) {
        {
            let mut documents = self.documents.write().await;
            match &snapshot {
                Some(document) => documents.insert(partition, document.clone()),
                None => documents.remove(&partition),
            };
        }

        self.state.send_if_modified(|state| {
            match apply_snapshot(&mut state.portfolio, partition, snapshot) {
                Ok(changed) => {
                    if changed {
                        tracing::debug!("Mirror of {} updated", partition);
                    }
                    changed
                }
                Err(e) => {
                    tracing::warn!("Ignoring malformed {} document: {}", partition, e);
                    false
                }
            }
        });
    }

    fn subscription_failed(&self, partition: Partition, source: StoreError) {
        let error = SyncError::Subscription { partition, source };
        tracing::error!("{}", error);

        if partition == Partition::Profile {
            self.finish_loading();
        }
    }

    fn finish_loading(&self) {
        self.state
            .send_if_modified(|state| std::mem::replace(&mut state.is_loading, false));
    }

    fn set_authenticated(&self, signed_in: bool) {
        self.state.send_if_modified(|state| {
            let changed = state.is_authenticated != signed_in;
            state.is_authenticated = signed_in;
            changed
        });
    }
}

/// Live mirror of the portfolio and the operations that edit it.
///
/// Dropping the handle (or calling [`shutdown`](Self::shutdown)) closes every
/// subscription.
pub struct PortfolioSync {
    shared: Arc<Shared>,
    tasks: Vec<JoinHandle<()>>,
}

impl PortfolioSync {
    /// Subscribes to every partition and starts mirroring.
    ///
    /// A partition whose subscription cannot be opened is logged and left
    /// empty; the rest still load.
    pub async fn start(
        store: Arc<dyn DocumentStore>,
        auth: Arc<dyn AuthProvider>,
        notifier: Arc<dyn Notifier>,
        options: SyncOptions,
    ) -> Self {
        let initial = SyncState {
            is_authenticated: auth.current_user().is_some(),
            is_loading: true,
            portfolio: Portfolio::default(),
        };
        let (state, _) = watch::channel(initial);
        let shared = Arc::new(Shared {
            store,
            auth,
            notifier,
            state,
            documents: RwLock::new(HashMap::new()),
        });

        let mut streams: Vec<TaggedSnapshots> = Vec::with_capacity(Partition::ALL.len());
        for partition in Partition::ALL {
            match shared.store.subscribe(&partition.path()).await {
                Ok(snapshots) => {
                    streams.push(snapshots.map(move |result| (partition, result)).boxed())
                }
                Err(e) => shared.subscription_failed(partition, e),
            }
        }
        tracing::info!(
            "Subscribed to {} of {} partitions",
            streams.len(),
            Partition::ALL.len()
        );

        let session = shared.auth.watch();
        let tasks = vec![
            tokio::spawn(follow_session(Arc::clone(&shared), session)),
            tokio::spawn(mirror(Arc::clone(&shared), stream::select_all(streams))),
            tokio::spawn(end_loading_after(
                Arc::clone(&shared),
                options.loading_grace,
            )),
        ];

        Self { shared, tasks }
    }

    /// Closes every subscription and stops background work.
    pub async fn shutdown(mut self) {
        for task in self.tasks.drain(..) {
            task.abort();
            let _ = task.await;
        }
        tracing::debug!("Portfolio sync stopped");
    }

    // --- Reading ---

    /// Current state, cloned.
    pub fn state(&self) -> SyncState {
        self.shared.state.borrow().clone()
    }

    /// Follows every state change.
    pub fn subscribe(&self) -> watch::Receiver<SyncState> {
        self.shared.state.subscribe()
    }

    pub fn is_authenticated(&self) -> bool {
        self.shared.state.borrow().is_authenticated
    }

    pub fn is_loading(&self) -> bool {
        self.shared.state.borrow().is_loading
    }

    pub fn portfolio(&self) -> Portfolio {
        self.shared.state.borrow().portfolio.clone()
    }

    pub fn items<T: ListEntity>(&self) -> Vec<Item<T>> {
        T::items(&self.shared.state.borrow().portfolio).clone()
    }

    pub fn profile(&self) -> Option<Profile> {
        self.shared.state.borrow().portfolio.profile.clone()
    }

    /// The lab with display defaults filled in.
    pub fn lab(&self) -> Option<Lab> {
        self.shared.state.borrow().portfolio.lab.clone()
    }

    /// Resolves once loading has ended.
    pub async fn loaded(&self) {
        let mut receiver = self.subscribe();
        let _ = receiver.wait_for(|state| !state.is_loading).await;
    }

    // --- Session ---

    /// Reports whether a user is signed in.
    ///
    /// Credentials are exchanged by the host before this is called; the
    /// arguments are accepted for interface compatibility only.
    pub async fn login(&self, email: &str, _password: &str) -> bool {
        let signed_in = self.shared.auth.current_user().is_some();
        tracing::info!("Login check for {}: signed_in={}", email, signed_in);
        signed_in
    }

    pub async fn logout(&self) -> Outcome {
        match self.shared.auth.sign_out().await {
            Ok(()) => {
                self.shared.set_authenticated(false);
                tracing::info!("Signed out");
                self.notify(Notification::success(
                    "Logged out",
                    "You have been successfully logged out.",
                ));
                Outcome::Written
            }
            Err(e) => {
                tracing::error!("Error logging out: {}", e);
                self.notify(Notification::failure(
                    "Logout failed",
                    "There was an error logging out. Please try again.",
                ));
                Outcome::Failed(e.into())
            }
        }
    }

    // --- List partitions ---

    /// Appends `fields` under a freshly generated id.
    pub async fn add<T: ListEntity>(&self, fields: T) -> Outcome {
        let op = Op::Add;
        let subject = Subject::List(T::NOUN);
        if let Err(e) = self.authorize(op, subject) {
            return self.failed(op, subject, e);
        }

        let item = Item::new(fields);
        tracing::debug!("Adding {} {}", T::NOUN, item.id);
        let result = self.append_entry(T::PARTITION, &item).await;
        self.finish(op, subject, result)
    }

    /// Overlays `patch` (an object of fields) onto the item with `id`.
    ///
    /// An unknown id is a silent no-op.
    pub async fn update<T: ListEntity>(&self, id: &str, patch: Value) -> Outcome {
        let op = Op::Update;
        let subject = Subject::List(T::NOUN);
        if let Err(e) = self.authorize(op, subject) {
            return self.failed(op, subject, e);
        }
        let patch = match reducer::patch_document(patch) {
            Ok(patch) => patch,
            Err(e) => return self.failed(op, subject, e),
        };

        let mut entries = match self.stored_array(T::PARTITION, ITEMS_FIELD).await {
            Ok(entries) => entries,
            Err(e) => return self.failed(op, subject, e),
        };
        let Some(index) = entries.iter().position(|entry| entry_id(entry) == Some(id)) else {
            tracing::debug!("No {} with id {}, nothing to update", T::NOUN, id);
            return Outcome::Unchanged;
        };
        match merge_patch::<T>(&entries[index], &patch) {
            Ok(updated) => entries[index] = updated,
            Err(e) => return self.failed(op, subject, e),
        }

        let result = self.write_entries(T::PARTITION, entries).await;
        self.finish(op, subject, result)
    }

    /// Drops the item with `id`. An unknown id is a silent no-op.
    pub async fn remove<T: ListEntity>(&self, id: &str) -> Outcome {
        let op = Op::Remove;
        let subject = Subject::List(T::NOUN);
        if let Err(e) = self.authorize(op, subject) {
            return self.failed(op, subject, e);
        }

        let mut entries = match self.stored_array(T::PARTITION, ITEMS_FIELD).await {
            Ok(entries) => entries,
            Err(e) => return self.failed(op, subject, e),
        };
        let before = entries.len();
        entries.retain(|entry| entry_id(entry) != Some(id));
        if entries.len() == before {
            tracing::debug!("No {} with id {}, nothing to remove", T::NOUN, id);
            return Outcome::Unchanged;
        }

        let result = self.write_entries(T::PARTITION, entries).await;
        self.finish(op, subject, result)
    }

    // --- Singletons ---

    /// Merges `patch` into the profile document, which must already exist.
    pub async fn update_profile(&self, patch: Value) -> Outcome {
        self.merge_record(Partition::Profile, Subject::Profile, self.profile(), patch)
            .await
    }

    /// Merges `patch` into the lab document, which must already exist.
    pub async fn update_lab(&self, patch: Value) -> Outcome {
        self.merge_record(Partition::Lab, Subject::Lab, self.lab(), patch)
            .await
    }

    /// Adds `value` to a lab set unless already present.
    ///
    /// Only the affected field is written, so concurrent edits to other lab
    /// fields survive.
    pub async fn add_to_lab(&self, set: LabSet, value: impl Into<String>) -> Outcome {
        let op = Op::Add;
        let subject = Subject::LabSet(set);
        if let Err(e) = self.authorize(op, subject) {
            return self.failed(op, subject, e);
        }

        let value = value.into();
        let mut values = match self.stored_array(Partition::Lab, set.field()).await {
            Ok(values) => values,
            Err(e) => return self.failed(op, subject, e),
        };
        if values.iter().any(|v| v.as_str() == Some(value.as_str())) {
            tracing::warn!("{} {:?} is already present", set.noun(), value);
            self.notify(Notification::failure(
                set.duplicate_title(),
                format!("This {} is already in the list.", set.noun()),
            ));
            return Outcome::Unchanged;
        }
        values.push(Value::String(value));

        let result = self.write_lab_set(set, values).await;
        self.finish(op, subject, result)
    }

    /// Removes every occurrence of `value` from a lab set.
    pub async fn remove_from_lab(&self, set: LabSet, value: &str) -> Outcome {
        let op = Op::Remove;
        let subject = Subject::LabSet(set);
        if let Err(e) = self.authorize(op, subject) {
            return self.failed(op, subject, e);
        }

        let mut values = match self.stored_array(Partition::Lab, set.field()).await {
            Ok(values) => values,
            Err(e) => return self.failed(op, subject, e),
        };
        values.retain(|v| v.as_str() != Some(value));

        let result = self.write_lab_set(set, values).await;
        self.finish(op, subject, result)
    }

    // --- Internals ---

    fn authorize(&self, op: Op, subject: Subject) -> Result<(), SyncError> {
        if self.is_authenticated() {
            Ok(())
        } else {
            Err(SyncError::Unauthorized(format!(
                "{} the {}",
                op.verb(),
                subject.noun()
            )))
        }
    }

    fn notify(&self, notification: Notification) {
        self.shared.notifier.notify(notification);
    }

    fn finish(&self, op: Op, subject: Subject, result: Result<(), SyncError>) -> Outcome {
        match result {
            Ok(()) => {
                tracing::info!("{} {}", capitalize(subject.noun()), op.done());
                self.notify(subject.success(op));
                Outcome::Written
            }
            Err(e) => self.failed(op, subject, e),
        }
    }

    fn failed(&self, op: Op, subject: Subject, error: SyncError) -> Outcome {
        if error.is_unauthorized() {
            tracing::warn!("{}", error);
        } else {
            tracing::error!("Error {} {}: {}", op.doing(), subject.noun(), error);
        }
        self.notify(subject.failure(op));
        Outcome::Failed(error)
    }

    /// The array under `field` in the last stored document of `partition`.
    async fn stored_array(
        &self,
        partition: Partition,
        field: &str,
    ) -> Result<Vec<Value>, SyncError> {
        let documents = self.shared.documents.read().await;
        reducer::stored_array(partition, documents.get(&partition), field)
    }

    async fn append_entry<T: ListEntity>(
        &self,
        partition: Partition,
        item: &Item<T>,
    ) -> Result<(), SyncError> {
        let mut entries = self.stored_array(partition, ITEMS_FIELD).await?;
        entries.push(serde_json::to_value(item)?);
        self.write_entries(partition, entries).await
    }

    async fn write_entries(
        &self,
        partition: Partition,
        entries: Vec<Value>,
    ) -> Result<(), SyncError> {
        self.shared
            .store
            .set(&partition.path(), encode_entries(entries))
            .await?;
        Ok(())
    }

    /// Checks `patch` against the record type, then merges it into the stored
    /// document. A patch that would leave the document undecodable is refused.
    async fn merge_record<R>(
        &self,
        partition: Partition,
        subject: Subject,
        current: Option<R>,
        patch: Value,
    ) -> Outcome
    where
        R: Serialize + DeserializeOwned + Default,
    {
        let op = Op::Update;
        if let Err(e) = self.authorize(op, subject) {
            return self.failed(op, subject, e);
        }
        let fields = match reducer::patch_document(patch) {
            Ok(fields) => fields,
            Err(e) => return self.failed(op, subject, e),
        };
        if let Err(e) = reducer::check_record(subject.noun(), current, &fields) {
            return self.failed(op, subject, e);
        }

        let result = self
            .shared
            .store
            .merge(&partition.path(), fields)
            .await
            .map_err(SyncError::from);
        self.finish(op, subject, result)
    }

    async fn write_lab_set(&self, set: LabSet, values: Vec<Value>) -> Result<(), SyncError> {
        let mut fields = Document::new();
        fields.insert(set.field().to_string(), Value::Array(values));
        self.shared.store.merge(&Partition::Lab.path(), fields).await?;
        Ok(())
    }
}

impl Drop for PortfolioSync {
    fn drop(&mut self) {
        for task in &self.tasks {
            task.abort();
        }
    }
}

async fn follow_session(shared: Arc<Shared>, mut session: watch::Receiver<Option<User>>) {
    loop {
        let signed_in = session.borrow_and_update().is_some();
        shared.set_authenticated(signed_in);
        if session.changed().await.is_err() {
            break;
        }
    }
}

async fn mirror(shared: Arc<Shared>, mut snapshots: SelectAll<TaggedSnapshots>) {
    while let Some((partition, result)) = snapshots.next().await {
        match result {
            Ok(snapshot) => shared.apply(partition, snapshot).await,
            Err(e) => shared.subscription_failed(partition, e),
        }
    }
    tracing::debug!("All partition subscriptions closed");
}

async fn end_loading_after(shared: Arc<Shared>, grace: Duration) {
    tokio::time::sleep(grace).await;
    shared.finish_loading();
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
