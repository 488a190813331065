//! Item module - the remote objects whose fields carry links

use crate::{ItemId, ProjectId, UserId};
use std::collections::BTreeMap;

/// Value of a single item field
///
/// Only text values can contain anchors; everything else (numbers, picklist
/// ids, dates) is carried so that the item stays complete but is never
/// scanned.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// String or rich-text value
    Text(String),
    /// Any other value, kept in its textual JSON form
    Other(String),
}

impl FieldValue {
    /// Get the value as text if it is a string field
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) => Some(text),
            FieldValue::Other(_) => None,
        }
    }
}

/// Lock state of an item
///
/// A locked item rejects writes from everybody except the lock owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LockState {
    /// Whether the item is locked
    pub locked: bool,
    /// User holding the lock, if known
    pub locked_by: Option<UserId>,
}

impl LockState {
    /// An unlocked item
    pub fn unlocked() -> Self {
        Self::default()
    }

    /// An item locked by the given user
    pub fn locked_by(user: UserId) -> Self {
        Self {
            locked: true,
            locked_by: Some(user),
        }
    }
}

/// An item as returned by the remote repository
///
/// The tool only holds a transient copy for the duration of one run.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    /// Item identifier
    pub id: ItemId,
    /// Project the item belongs to
    pub project: ProjectId,
    /// Stable human-readable label (e.g. `REQ-12`)
    pub document_key: String,
    /// Field name → value
    pub fields: BTreeMap<String, FieldValue>,
    /// Lock state
    pub lock: LockState,
}

impl Item {
    /// Create an unlocked item without fields
    pub fn new(id: ItemId, project: ProjectId, document_key: impl Into<String>) -> Self {
        Self {
            id,
            project,
            document_key: document_key.into(),
            fields: BTreeMap::new(),
            lock: LockState::unlocked(),
        }
    }

    /// Builder-style helper to add a text field
    pub fn with_text_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(name.into(), FieldValue::Text(value.into()));
        self
    }

    /// Builder-style helper to set the lock state
    pub fn with_lock(mut self, lock: LockState) -> Self {
        self.lock = lock;
        self
    }

    /// Iterate over the text fields of this item in name order
    pub fn text_fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields
            .iter()
            .filter_map(|(name, value)| value.as_text().map(|text| (name.as_str(), text)))
    }

    /// Look up a display attribute
    ///
    /// `documentKey` is answered from the item itself because the API
    /// exposes it both as a top-level property and as a field.
    pub fn display_value(&self, attribute: &str) -> Option<&str> {
        match self.fields.get(attribute).and_then(FieldValue::as_text) {
            Some(value) => Some(value),
            None if attribute == "documentKey" => Some(self.document_key.as_str()),
            None => None,
        }
    }
}

/// A project of the instance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    /// Project identifier
    pub id: ProjectId,
    /// Project name, if the API returned one
    pub name: Option<String>,
}

/// Member of an item's sync pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SyncedItem {
    /// Identifier of the synced duplicate
    pub id: ItemId,
    /// Project the duplicate lives in
    pub project: ProjectId,
}

/// A user account, only needed to name lock owners
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// User identifier
    pub id: UserId,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
}

impl User {
    /// `"First Last"`, trimmed when one of the parts is empty
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_item() -> Item {
        Item::new(ItemId::new(1), ProjectId::new(7), "REQ-1")
            .with_text_field("description", "<p>text</p>")
            .with_text_field("name", "Braking distance")
    }

    #[test]
    fn test_text_fields_skip_other_values() {
        let mut item = sample_item();
        item.fields
            .insert("priority".to_string(), FieldValue::Other("3".to_string()));

        let names: Vec<&str> = item.text_fields().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["description", "name"]);
    }

    #[test]
    fn test_display_value_falls_back_to_document_key() {
        let item = sample_item();
        assert_eq!(item.display_value("documentKey"), Some("REQ-1"));
        assert_eq!(item.display_value("name"), Some("Braking distance"));
        assert_eq!(item.display_value("missing"), None);
    }

    #[test]
    fn test_user_display_name() {
        let user = User {
            id: UserId::new(3),
            first_name: "Ada".to_string(),
            last_name: String::new(),
        };
        assert_eq!(user.display_name(), "Ada");
    }

    #[test]
    fn test_lock_state_helpers() {
        assert!(!LockState::unlocked().locked);
        let lock = LockState::locked_by(UserId::new(9));
        assert!(lock.locked);
        assert_eq!(lock.locked_by, Some(UserId::new(9)));
    }
}
