//! Response envelopes and resource shapes of the REST API.

use linkfix_domain::{
    FieldValue, Item, ItemId, LockState, PatchOperation, Project, ProjectId, SyncedItem, User,
    UserId,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Every response is wrapped as `{ "meta": ..., "data": ... }`
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    /// Status, message and paging information
    #[serde(default)]
    pub meta: Meta,
    /// Payload, absent on errors and on some write responses
    pub data: Option<T>,
}

/// Response metadata
#[derive(Debug, Default, Deserialize)]
pub struct Meta {
    /// Textual status, e.g. `OK` or `Bad Request`
    pub status: Option<String>,
    /// Human-readable error message
    pub message: Option<String>,
    /// Paging information for list endpoints
    #[serde(rename = "pageInfo")]
    pub page_info: Option<PageInfo>,
}

/// Paging information of a list response
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    /// Offset of the first result in this page
    pub start_index: usize,
    /// Number of results in this page
    pub result_count: usize,
    /// Number of results across all pages
    pub total_results: usize,
}

/// OAuth token response
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    /// Bearer token
    pub access_token: String,
    /// Lifetime in seconds
    #[serde(default)]
    pub expires_in: Option<u64>,
}

/// Item resource
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiItem {
    /// Item id
    pub id: u64,
    /// Top-level document key
    #[serde(default)]
    pub document_key: Option<String>,
    /// Owning project
    pub project: u64,
    /// Raw field values
    #[serde(default)]
    pub fields: Map<String, Value>,
    /// Lock information
    #[serde(default)]
    pub lock: Option<ApiLock>,
}

/// Lock information of an item
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiLock {
    /// Whether the item is locked
    #[serde(default)]
    pub locked: bool,
    /// Lock owner
    #[serde(default)]
    pub locked_by: Option<u64>,
}

/// Project resource
#[derive(Debug, Deserialize)]
pub struct ApiProject {
    /// Project id
    pub id: u64,
    /// Project fields, `name` among them
    #[serde(default)]
    pub fields: Map<String, Value>,
}

/// User resource
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiUser {
    /// User id
    pub id: u64,
    /// Given name
    #[serde(default)]
    pub first_name: String,
    /// Family name
    #[serde(default)]
    pub last_name: String,
}

/// One operation of a PATCH request body
#[derive(Debug, Serialize)]
pub struct ApiPatch<'a> {
    /// Operation name
    pub op: &'a str,
    /// Target path
    pub path: &'a str,
    /// New value
    pub value: &'a str,
}

impl<'a> From<&'a PatchOperation> for ApiPatch<'a> {
    fn from(op: &'a PatchOperation) -> Self {
        Self {
            op: &op.op,
            path: &op.path,
            value: &op.value,
        }
    }
}

impl From<ApiItem> for Item {
    fn from(item: ApiItem) -> Self {
        let document_key = item
            .document_key
            .or_else(|| {
                item.fields
                    .get("documentKey")
                    .and_then(Value::as_str)
                    .map(str::to_string)
            })
            .unwrap_or_default();

        let fields: BTreeMap<String, FieldValue> = item
            .fields
            .into_iter()
            .map(|(name, value)| {
                let value = match value {
                    Value::String(text) => FieldValue::Text(text),
                    other => FieldValue::Other(other.to_string()),
                };
                (name, value)
            })
            .collect();

        let lock = item
            .lock
            .map(|lock| LockState {
                locked: lock.locked,
                locked_by: lock.locked_by.map(UserId::new),
            })
            .unwrap_or_default();

        Item {
            id: ItemId::new(item.id),
            project: ProjectId::new(item.project),
            document_key,
            fields,
            lock,
        }
    }
}

impl From<&ApiItem> for SyncedItem {
    fn from(item: &ApiItem) -> Self {
        SyncedItem {
            id: ItemId::new(item.id),
            project: ProjectId::new(item.project),
        }
    }
}

impl From<ApiProject> for Project {
    fn from(project: ApiProject) -> Self {
        Project {
            id: ProjectId::new(project.id),
            name: project
                .fields
                .get("name")
                .and_then(Value::as_str)
                .map(str::to_string),
        }
    }
}

impl From<ApiUser> for User {
    fn from(user: ApiUser) -> Self {
        User {
            id: UserId::new(user.id),
            first_name: user.first_name,
            last_name: user.last_name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_envelope_parsing() {
        let json = r#"{
            "meta": {"status": "OK", "timestamp": "2024-01-01T00:00:00.000+0000"},
            "links": {},
            "data": {
                "id": 100,
                "documentKey": "SRS-12",
                "project": 5,
                "itemType": 24,
                "fields": {
                    "name": "Stop distance",
                    "description": "<p>see <a href=\"https://acme.example.com/perspective.req?projectId=5&amp;docId=90\">SRS-3</a></p>",
                    "priority": 301
                },
                "lock": {"locked": true, "lastLockedDate": "2024-01-01T00:00:00.000+0000", "lockedBy": 44}
            }
        }"#;

        let envelope: Envelope<ApiItem> = serde_json::from_str(json).unwrap();
        assert_eq!(envelope.meta.status.as_deref(), Some("OK"));

        let item: Item = envelope.data.unwrap().into();
        assert_eq!(item.id, ItemId::new(100));
        assert_eq!(item.project, ProjectId::new(5));
        assert_eq!(item.document_key, "SRS-12");
        assert_eq!(item.lock, LockState::locked_by(UserId::new(44)));
        assert_eq!(item.fields.get("priority"), Some(&FieldValue::Other("301".to_string())));
        assert_eq!(item.text_fields().count(), 2);
    }

    #[test]
    fn test_document_key_from_fields() {
        let json = r#"{"id": 1, "project": 2, "fields": {"documentKey": "TC-1"}}"#;
        let item: Item = serde_json::from_str::<ApiItem>(json).unwrap().into();
        assert_eq!(item.document_key, "TC-1");
        assert!(!item.lock.locked);
    }

    #[test]
    fn test_page_info_parsing() {
        let json = r#"{
            "meta": {"status": "OK", "pageInfo": {"startIndex": 50, "resultCount": 20, "totalResults": 70}},
            "data": []
        }"#;
        let envelope: Envelope<Vec<ApiItem>> = serde_json::from_str(json).unwrap();
        let page = envelope.meta.page_info.unwrap();
        assert_eq!(page.start_index, 50);
        assert_eq!(page.result_count, 20);
        assert_eq!(page.total_results, 70);
    }

    #[test]
    fn test_patch_serialization() {
        let op = PatchOperation::replace_field("description", "<p>x</p>");
        let body = serde_json::to_value(vec![ApiPatch::from(&op)]).unwrap();
        assert_eq!(
            body,
            serde_json::json!([{"op": "replace", "path": "/fields/description", "value": "<p>x</p>"}])
        );
    }
}
