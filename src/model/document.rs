//! Remote listings and stored documents.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::kind::ResourceKind;

/// One resource as reported by a remote listing.
///
/// Only observed during reconciliation, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteResource {
    /// Resource id (without owner prefix).
    pub id: String,
    /// Display name chosen in Postman.
    pub name: String,
    /// Account-scoped unique id used by every other endpoint.
    pub uid: String,
}

/// Derive the tracked name for a freshly selected remote resource.
///
/// The first eight characters of the id keep two resources that share a
/// display name apart. Path separators are replaced so the name is always
/// a single file name.
#[must_use]
pub fn tracked_name(resource: &RemoteResource) -> String {
    let prefix: String = resource.id.chars().take(8).collect();
    let name = resource.name.replace(['/', '\\'], "-");
    format!("{name}_{prefix}")
}

/// A JSON document, wrapped as `{ <wrap_key>: <body> }` once normalized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document(Value);

impl Document {
    /// Wrap an arbitrary JSON value.
    #[must_use]
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Whether the body sits under the kind's wrap key.
    #[must_use]
    pub fn is_wrapped(&self, kind: ResourceKind) -> bool {
        self.0
            .get(kind.wrap_key())
            .is_some_and(|body| !body.is_null())
    }

    /// Return the document wrapped for `kind`, and whether wrapping was needed.
    ///
    /// Documents saved straight from the Postman app are bare bodies; the API
    /// always expects (and returns) them under the wrap key.
    #[must_use]
    pub fn into_wrapped(self, kind: ResourceKind) -> (Self, bool) {
        if self.is_wrapped(kind) {
            return (self, false);
        }
        let mut wrapped = serde_json::Map::new();
        wrapped.insert(kind.wrap_key().to_string(), self.0);
        (Self(Value::Object(wrapped)), true)
    }

    /// The `uid` of the wrapped body, as returned by create/update.
    #[must_use]
    pub fn uid(&self, kind: ResourceKind) -> Option<&str> {
        self.0
            .get(kind.wrap_key())
            .and_then(|body| body.get("uid"))
            .and_then(Value::as_str)
    }

    /// Borrow the underlying JSON.
    #[must_use]
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Take the underlying JSON.
    #[must_use]
    pub fn into_value(self) -> Value {
        self.0
    }
}

impl From<Value> for Document {
    fn from(value: Value) -> Self {
        Self(value)
    }
}
