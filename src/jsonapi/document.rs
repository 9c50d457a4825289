//! JSON:API document model.
//!
//! The types here mirror the wire format closely. Attribute values stay as
//! [`serde_json::Value`] because the API's attribute sets vary per service
//! and per sparse fieldset.
//!
//! Resource ids arrive as strings or numbers depending on the endpoint; they
//! are always held as `String` in memory so `(type, id)` lookups match
//! regardless of wire spelling.

use std::collections::BTreeMap;
use std::fmt;

use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// A JSON:API resource object.
///
/// After an included-resource merge, relationship data may hold full
/// resources instead of `{type, id}` stubs.
///
/// # Example
///
/// ```rust
/// use placements_io::jsonapi::Resource;
/// use serde_json::json;
///
/// let resource: Resource = serde_json::from_value(json!({
///     "type": "campaigns",
///     "id": 42,
///     "attributes": {"name": "Spring Launch"}
/// })).unwrap();
///
/// assert_eq!(resource.id.as_deref(), Some("42"));
/// assert_eq!(resource.attribute("name"), Some(&json!("Spring Launch")));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    /// The resource type (e.g., "accounts").
    #[serde(rename = "type")]
    pub kind: String,

    /// The resource id; absent on objects being created.
    #[serde(
        default,
        deserialize_with = "string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,

    /// Attribute members keyed by hyphenated field name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Map<String, Value>>,

    /// Relationship members keyed by relation name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationships: Option<BTreeMap<String, Relationship>>,

    /// Resource-level links.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Value>,

    /// Resource-level meta.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Value>,
}

impl Resource {
    /// Creates a `{type, id}` stub.
    #[must_use]
    pub fn stub(kind: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            id: Some(id.into()),
            ..Self::default()
        }
    }

    /// Returns the `(type, id)` identity, if the resource has an id.
    #[must_use]
    pub fn identifier(&self) -> Option<(&str, &str)> {
        self.id.as_deref().map(|id| (self.kind.as_str(), id))
    }

    /// Returns `true` if the resource carries nothing beyond its identity.
    #[must_use]
    pub const fn is_stub(&self) -> bool {
        self.attributes.is_none()
            && self.relationships.is_none()
            && self.links.is_none()
            && self.meta.is_none()
    }

    /// Returns an attribute value by name.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.as_ref().and_then(|attrs| attrs.get(name))
    }

    /// Returns a relationship by name.
    #[must_use]
    pub fn relationship(&self, name: &str) -> Option<&Relationship> {
        self.relationships.as_ref().and_then(|rels| rels.get(name))
    }
}

/// A JSON:API relationship object.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    /// Linkage data: a single resource, a list, or nothing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<RelationshipData>,

    /// Relationship links (`self`, `related`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Value>,

    /// Relationship meta.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Value>,
}

impl Relationship {
    /// Returns the `links.related` URL, if present.
    #[must_use]
    pub fn related_link(&self) -> Option<&str> {
        self.links
            .as_ref()
            .and_then(|links| links.get("related"))
            .and_then(Value::as_str)
    }

    /// Returns the to-one resource, if this is a to-one relationship.
    #[must_use]
    pub fn one(&self) -> Option<&Resource> {
        match &self.data {
            Some(RelationshipData::One(resource)) => Some(resource),
            _ => None,
        }
    }

    /// Returns the to-many resources, if this is a to-many relationship.
    #[must_use]
    pub fn many(&self) -> Option<&[Resource]> {
        match &self.data {
            Some(RelationshipData::Many(resources)) => Some(resources),
            _ => None,
        }
    }
}

/// Relationship linkage.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RelationshipData {
    /// A to-one relationship.
    One(Box<Resource>),
    /// A to-many relationship.
    Many(Vec<Resource>),
}

/// Primary data of a document: one resource or many.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PrimaryData {
    /// A single-resource document.
    One(Box<Resource>),
    /// A collection document.
    Many(Vec<Resource>),
}

impl PrimaryData {
    /// Converts the primary data into a list of resources.
    #[must_use]
    pub fn into_vec(self) -> Vec<Resource> {
        match self {
            Self::One(resource) => vec![*resource],
            Self::Many(resources) => resources,
        }
    }
}

/// A JSON:API top-level document.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Primary data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<PrimaryData>,

    /// Sideloaded related resources.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub included: Vec<Resource>,

    /// Top-level meta (`record-count`, `page-count`, ...).
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub meta: Map<String, Value>,

    /// Top-level errors.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ErrorObject>,
}

impl Document {
    /// Returns `meta.page-count`, defaulting to 0 when absent.
    #[must_use]
    pub fn page_count(&self) -> u64 {
        meta_count(&self.meta, "page-count")
    }
}

pub(crate) fn meta_count(meta: &Map<String, Value>, key: &str) -> u64 {
    meta.get(key)
        .and_then(|v| v.as_u64().or_else(|| v.as_str().and_then(|s| s.parse().ok())))
        .unwrap_or(0)
}

/// A JSON:API error object.
///
/// Known members are typed; anything else the server sends is kept in
/// `extra` so the error list can be reported verbatim.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorObject {
    /// HTTP status code, as sent by the server.
    #[serde(
        default,
        deserialize_with = "string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub status: Option<String>,

    /// Application-specific error code.
    #[serde(
        default,
        deserialize_with = "string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub code: Option<String>,

    /// Short summary of the problem.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Explanation specific to this occurrence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,

    /// Pointer to the offending part of the request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<Value>,

    /// Any other members.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl fmt::Display for ErrorObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = self.status.as_deref().unwrap_or("?");
        match (&self.title, &self.detail) {
            (Some(title), Some(detail)) => write!(f, "[{status}] {title}: {detail}"),
            (Some(text), None) | (None, Some(text)) => write!(f, "[{status}] {text}"),
            (None, None) => write!(f, "[{status}]"),
        }
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(de::Error::custom(format!(
            "expected a string or number, found {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_numeric_and_string_ids_normalize() {
        let numeric: Resource = serde_json::from_value(json!({"type": "accounts", "id": 9})).unwrap();
        let string: Resource = serde_json::from_value(json!({"type": "accounts", "id": "9"})).unwrap();
        assert_eq!(numeric.identifier(), string.identifier());
        assert_eq!(numeric.identifier(), Some(("accounts", "9")));
    }

    #[test]
    fn test_stub_serializes_without_attributes() {
        let stub = Resource::stub("accounts", "9");
        assert!(stub.is_stub());
        assert_eq!(
            serde_json::to_value(&stub).unwrap(),
            json!({"type": "accounts", "id": "9"})
        );
    }

    #[test]
    fn test_relationship_shapes() {
        let resource: Resource = serde_json::from_value(json!({
            "type": "campaigns",
            "id": "1",
            "relationships": {
                "advertiser": {"data": {"type": "accounts", "id": "9"}},
                "line-items": {"data": [{"type": "line-items", "id": "3"}]},
                "agency": {"data": null},
                "product-rates": {"links": {"related": "https://api/v1/rate_cards/1/product_rates"}}
            }
        }))
        .unwrap();

        assert_eq!(
            resource.relationship("advertiser").unwrap().one().unwrap().id.as_deref(),
            Some("9")
        );
        assert_eq!(resource.relationship("line-items").unwrap().many().unwrap().len(), 1);
        assert!(resource.relationship("agency").unwrap().data.is_none());
        assert_eq!(
            resource.relationship("product-rates").unwrap().related_link(),
            Some("https://api/v1/rate_cards/1/product_rates")
        );
    }

    #[test]
    fn test_document_page_count() {
        let doc: Document = serde_json::from_value(json!({
            "data": [],
            "meta": {"record-count": 250, "page-count": 3}
        }))
        .unwrap();
        assert_eq!(doc.page_count(), 3);
        assert_eq!(Document::default().page_count(), 0);
    }

    #[test]
    fn test_single_resource_document() {
        let doc: Document =
            serde_json::from_value(json!({"data": {"type": "reports", "id": 4}})).unwrap();
        let data = doc.data.unwrap().into_vec();
        assert_eq!(data.len(), 1);
        assert_eq!(data[0].id.as_deref(), Some("4"));
    }

    #[test]
    fn test_error_object_keeps_unknown_members() {
        let raw = json!({
            "status": 400,
            "title": "Invalid field",
            "detail": "foo is not a valid field",
            "meta": {"field": "foo"}
        });
        let error: ErrorObject = serde_json::from_value(raw).unwrap();
        assert_eq!(error.status.as_deref(), Some("400"));
        assert_eq!(error.extra.get("meta"), Some(&json!({"field": "foo"})));
        assert_eq!(error.to_string(), "[400] Invalid field: foo is not a valid field");
    }
}
