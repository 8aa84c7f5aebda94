//! Pure state transitions between the mirror and store documents.
//!
//! Snapshot handling replaces whole lists or records; nothing is diffed.
//! Writes start from the raw stored document rather than the typed mirror, so
//! entries and keys the models do not understand are written back untouched.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use super::entity::ListEntity;
use super::error::SyncError;
use crate::models::{
    Activity, Award, BookChapter, Conference, Experience, FinancialSupport, Item, Lab, Portfolio,
    Profile, Publication, ResearchInterest, TeachingInterest, Talk,
};
use crate::partition::{Partition, ITEMS_FIELD};
use crate::store::{Document, Snapshot, StoreError};

/// Applies a snapshot of `partition` to the mirror.
///
/// Returns whether the mirror changed. A missing document, or a list document
/// without `items`, leaves the mirror untouched. On a decode error nothing is
/// modified.
pub fn apply_snapshot(
    portfolio: &mut Portfolio,
    partition: Partition,
    snapshot: Snapshot,
) -> Result<bool, serde_json::Error> {
    let Some(document) = snapshot else {
        return Ok(false);
    };

    match partition {
        Partition::Profile => {
            let profile: Profile = serde_json::from_value(Value::Object(document))?;
            Ok(replace(&mut portfolio.profile, Some(profile)))
        }
        Partition::Lab => {
            let lab: Lab = serde_json::from_value(Value::Object(document))?;
            Ok(replace(&mut portfolio.lab, Some(lab.with_defaults())))
        }
        Partition::ResearchInterests => apply_list::<ResearchInterest>(portfolio, document),
        Partition::TeachingInterests => apply_list::<TeachingInterest>(portfolio, document),
        Partition::Experiences => apply_list::<Experience>(portfolio, document),
        Partition::Publications => apply_list::<Publication>(portfolio, document),
        Partition::BookChapters => apply_list::<BookChapter>(portfolio, document),
        Partition::Talks => apply_list::<Talk>(portfolio, document),
        Partition::Activities => apply_list::<Activity>(portfolio, document),
        Partition::Conferences => apply_list::<Conference>(portfolio, document),
        Partition::Awards => apply_list::<Award>(portfolio, document),
        Partition::FinancialSupports => apply_list::<FinancialSupport>(portfolio, document),
    }
}

fn apply_list<T: ListEntity>(
    portfolio: &mut Portfolio,
    document: Document,
) -> Result<bool, serde_json::Error> {
    match decode_items::<T>(document)? {
        Some(items) => Ok(replace(T::items_mut(portfolio), items)),
        None => Ok(false),
    }
}

/// Decodes the `items` array of a list document one entry at a time.
///
/// Entries that do not fit `T` are logged and left out of the result; the
/// store keeps them. Returns `None` when `items` is absent or null.
pub fn decode_items<T: ListEntity>(
    mut document: Document,
) -> Result<Option<Vec<Item<T>>>, serde_json::Error> {
    let entries: Vec<Value> = match document.remove(ITEMS_FIELD) {
        None | Some(Value::Null) => return Ok(None),
        Some(items) => serde_json::from_value(items)?,
    };

    let mut items = Vec::with_capacity(entries.len());
    for (index, entry) in entries.into_iter().enumerate() {
        match serde_json::from_value(entry) {
            Ok(item) => items.push(item),
            Err(e) => tracing::warn!("Skipping {} entry {}: {}", T::NOUN, index, e),
        }
    }
    Ok(Some(items))
}

/// Reads the array stored under `field` of a raw partition document.
///
/// A missing document, field or null yields an empty array. Any other
/// non-array value is malformed: writing over it would lose data.
pub fn stored_array(
    partition: Partition,
    document: Option<&Document>,
    field: &str,
) -> Result<Vec<Value>, SyncError> {
    match document.and_then(|document| document.get(field)) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(entries)) => Ok(entries.clone()),
        Some(other) => Err(StoreError::Malformed {
            path: partition.path(),
            message: format!("`{}` should be an array, found {}", field, other),
        }
        .into()),
    }
}

/// The `id` of a raw list entry.
pub fn entry_id(entry: &Value) -> Option<&str> {
    entry.get("id").and_then(Value::as_str)
}

/// Wraps raw entries as a list partition document.
pub fn encode_entries(entries: Vec<Value>) -> Document {
    let mut document = Document::new();
    document.insert(ITEMS_FIELD.to_string(), Value::Array(entries));
    document
}

/// Overlays `patch` onto a raw list entry and checks the result still fits `T`.
///
/// An `id` key in the patch is ignored: items keep the identifier they were
/// created with. A `null` removes the field. Keys `T` does not know are kept.
pub fn merge_patch<T: ListEntity>(entry: &Value, patch: &Document) -> Result<Value, SyncError> {
    let Value::Object(mut fields) = entry.clone() else {
        return Err(SyncError::InvalidPatch(format!("{} is not a record", T::NOUN)));
    };

    for (key, value) in patch {
        if key == "id" {
            continue;
        }
        if value.is_null() {
            fields.remove(key);
        } else {
            fields.insert(key.clone(), value.clone());
        }
    }

    let merged = Value::Object(fields);
    serde_json::from_value::<Item<T>>(merged.clone())
        .map_err(|e| SyncError::InvalidPatch(format!("{}: {}", T::NOUN, e)))?;
    Ok(merged)
}

/// Checks that merging `patch` into `current` (or a blank record) still
/// decodes as `R`.
pub fn check_record<R>(noun: &str, current: Option<R>, patch: &Document) -> Result<(), SyncError>
where
    R: Serialize + DeserializeOwned + Default,
{
    let mut fields = match serde_json::to_value(current.unwrap_or_default())? {
        Value::Object(fields) => fields,
        _ => Document::new(),
    };
    fields.extend(patch.clone());

    serde_json::from_value::<R>(Value::Object(fields))
        .map(|_| ())
        .map_err(|e| SyncError::InvalidPatch(format!("{}: {}", noun, e)))
}

/// Requires a patch to be a JSON object.
pub fn patch_document(patch: Value) -> Result<Document, SyncError> {
    match patch {
        Value::Object(document) => Ok(document),
        other => Err(SyncError::InvalidPatch(format!(
            "expected an object of fields, got {}",
            other
        ))),
    }
}

fn replace<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        return false;
    }
    *slot = value;
    true
}
