//! A bound service collection.

use std::fmt::Display;
use std::sync::Arc;

use serde_json::Value;

use crate::jsonapi::{
    ApiResponse, JsonApiClient, JsonApiError, NewResource, PayloadSource, Query, Resource,
};
use crate::resources::catalog::{ServiceDefinition, DEFAULT_FILTERS};

/// A resource collection such as `accounts` or `line_items`.
///
/// Cheap to clone; all services of a [`PlacementsIo`](crate::PlacementsIo)
/// share one HTTP client.
///
/// # Example
///
/// ```rust,ignore
/// use placements_io::jsonapi::{PayloadSource, Query};
/// use serde_json::json;
///
/// let line_items = pio.line_items();
///
/// let delivering = line_items
///     .get(&Query::new().filter("delivery_status", "delivering").include("campaign"))
///     .await?;
///
/// let results = line_items
///     .update(["101", "102"], Some(json!({"archived": true}).into()), None)
///     .await?;
/// ```
#[derive(Clone, Debug)]
pub struct Service {
    client: Arc<JsonApiClient>,
    path: String,
    filters: &'static [&'static str],
}

impl Service {
    pub(crate) fn new(client: Arc<JsonApiClient>, definition: ServiceDefinition) -> Self {
        Self {
            client,
            path: definition.path.to_string(),
            filters: definition.filters,
        }
    }

    /// A service at an arbitrary path with only the default filters.
    pub(crate) fn ad_hoc(client: Arc<JsonApiClient>, path: impl Into<String>) -> Self {
        Self {
            client,
            path: path.into(),
            filters: &[],
        }
    }

    pub(crate) fn client(&self) -> &JsonApiClient {
        &self.client
    }

    /// Returns the service path relative to the base URL.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns `true` if `key` is a documented filter for this service.
    #[must_use]
    pub fn accepts_filter(&self, key: &str) -> bool {
        DEFAULT_FILTERS.contains(&key) || self.filters.contains(&key)
    }

    /// Reads every page matching `query`, with included resources merged.
    ///
    /// # Errors
    ///
    /// Returns [`JsonApiError`] if any page fails; see
    /// [`JsonApiClient::fetch_collection`].
    pub async fn get(&self, query: &Query) -> Result<ApiResponse, JsonApiError> {
        for key in query.filters().keys() {
            if !self.accepts_filter(key) {
                tracing::debug!("Filter '{}' is not documented for {}", key, self.path);
            }
        }
        self.client.fetch_collection(&self.path, query).await
    }

    /// Reads a single resource by id.
    ///
    /// # Errors
    ///
    /// Returns [`JsonApiError`] if the read fails; see
    /// [`JsonApiClient::fetch_one`].
    pub async fn find(&self, id: impl Display) -> Result<Resource, JsonApiError> {
        let path = format!("{}/{}", self.path.trim_end_matches('/'), id);
        self.client.fetch_one(&path).await
    }

    /// Updates resources by id.
    ///
    /// Returns one body per id, in the order given; failed items carry
    /// their `errors` inline.
    ///
    /// # Errors
    ///
    /// Returns [`JsonApiError::MissingUpdatePayload`] before sending anything
    /// if both payloads are absent, or [`JsonApiError::Http`] on transport
    /// failures.
    pub async fn update<I, T>(
        &self,
        ids: I,
        attributes: Option<PayloadSource>,
        relationships: Option<PayloadSource>,
    ) -> Result<Vec<Value>, JsonApiError>
    where
        I: IntoIterator<Item = T>,
        T: Display,
    {
        let ids = ids.into_iter().map(|id| id.to_string()).collect();
        self.client
            .update(&self.path, ids, attributes, relationships)
            .await
    }

    /// Creates resources.
    ///
    /// Returns one body per object, in the order given.
    ///
    /// # Errors
    ///
    /// Returns [`JsonApiError::Http`] on transport failures.
    pub async fn create(&self, objects: Vec<NewResource>) -> Result<Vec<Value>, JsonApiError> {
        self.client.create(&self.path, objects).await
    }
}
