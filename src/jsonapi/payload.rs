//! Payloads for updates and creates.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;
use futures::FutureExt;
use serde_json::{Map, Value};

/// An async function from resource id to payload.
pub type PayloadResolver = Arc<dyn Fn(String) -> BoxFuture<'static, Value> + Send + Sync>;

/// Attributes or relationships for an update.
///
/// `Fixed` is sent verbatim for every id. `Resolver` is called once per id
/// before the first request goes out.
///
/// # Example
///
/// ```rust
/// use placements_io::jsonapi::PayloadSource;
/// use serde_json::json;
///
/// let fixed = PayloadSource::from(json!({"archived": true}));
/// let per_id = PayloadSource::resolver(|id| async move {
///     json!({"name": format!("Line item {id}")})
/// });
/// # let _ = (fixed, per_id);
/// ```
#[derive(Clone)]
pub enum PayloadSource {
    /// The same mapping for every id.
    Fixed(Value),
    /// A mapping computed per id.
    Resolver(PayloadResolver),
}

impl PayloadSource {
    /// Wraps an async closure as a per-id resolver.
    pub fn resolver<F, Fut>(resolve: F) -> Self
    where
        F: Fn(String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Value> + Send + 'static,
    {
        Self::Resolver(Arc::new(move |id| resolve(id).boxed()))
    }

    /// Returns `true` for a fixed payload that carries nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Fixed(Value::Object(map)) => map.is_empty(),
            Self::Fixed(Value::Null) => true,
            _ => false,
        }
    }

    /// Produces the payload for one id.
    pub async fn resolve(&self, id: &str) -> Value {
        match self {
            Self::Fixed(value) => value.clone(),
            Self::Resolver(resolve) => resolve(id.to_string()).await,
        }
    }
}

impl fmt::Debug for PayloadSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(value) => f.debug_tuple("Fixed").field(value).finish(),
            Self::Resolver(_) => f.write_str("Resolver(..)"),
        }
    }
}

impl From<Value> for PayloadSource {
    fn from(value: Value) -> Self {
        Self::Fixed(value)
    }
}

impl From<Map<String, Value>> for PayloadSource {
    fn from(map: Map<String, Value>) -> Self {
        Self::Fixed(Value::Object(map))
    }
}

/// A resource to create.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NewResource {
    /// Attribute members.
    pub attributes: Option<Value>,
    /// Relationship members.
    pub relationships: Option<Value>,
}

impl NewResource {
    /// Creates an empty resource.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the attributes.
    #[must_use]
    pub fn attributes(mut self, attributes: impl Into<Value>) -> Self {
        self.attributes = Some(attributes.into());
        self
    }

    /// Sets the relationships.
    #[must_use]
    pub fn relationships(mut self, relationships: impl Into<Value>) -> Self {
        self.relationships = Some(relationships.into());
        self
    }
}

/// Builds a `{"data": {...}}` request body.
///
/// Only object-valued attributes and relationships are sent.
pub(crate) fn resource_body(
    kind: &str,
    id: Option<&str>,
    attributes: Option<Value>,
    relationships: Option<Value>,
) -> Value {
    let mut data = Map::new();
    if let Some(id) = id {
        data.insert("id".to_string(), Value::String(id.to_string()));
    }
    data.insert("type".to_string(), Value::String(kind.to_string()));
    if let Some(attributes) = attributes.filter(Value::is_object) {
        data.insert("attributes".to_string(), attributes);
    }
    if let Some(relationships) = relationships.filter(Value::is_object) {
        data.insert("relationships".to_string(), relationships);
    }

    let mut body = Map::new();
    body.insert("data".to_string(), Value::Object(data));
    Value::Object(body)
}
