use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Deref, DerefMut};
use uuid::Uuid;

/// A list entry: the entity's fields plus the identifier it was stored under.
///
/// On the wire the `id` sits next to the entity fields, so
/// `Item<Award>` serializes as `{"id": "...", "title": "...", "date": "..."}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item<T> {
    pub id: String,
    #[serde(flatten)]
    pub fields: T,
}

impl<T> Item<T> {
    /// Wraps `fields` under a freshly generated identifier.
    pub fn new(fields: T) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            fields,
        }
    }

    pub fn with_id(id: impl Into<String>, fields: T) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }

    pub fn into_fields(self) -> T {
        self.fields
    }
}

impl<T> Deref for Item<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.fields
    }
}

impl<T> DerefMut for Item<T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.fields
    }
}

impl<T: fmt::Display> fmt::Display for Item<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.id, self.fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Award;

    #[test]
    fn test_item_new_generates_unique_ids() {
        let a = Item::new(Award::new("Best Paper", "2023"));
        let b = Item::new(Award::new("Best Paper", "2023"));
        assert!(!a.id.is_empty());
        assert_ne!(a.id, b.id);
        assert_eq!(a.fields, b.fields);
    }

    #[test]
    fn test_item_flattens_id_next_to_fields() {
        let item = Item::with_id("5", Award::new("Young Scientist", "2021"));
        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"id": "5", "title": "Young Scientist", "date": "2021"})
        );
    }

    #[test]
    fn test_item_deref_to_fields() {
        let item = Item::with_id("1", Award::new("Fellowship", "2020"));
        assert_eq!(item.title, "Fellowship");
    }
}
