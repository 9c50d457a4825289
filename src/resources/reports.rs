//! Report requests.
//!
//! Creating a report returns its id immediately; the report itself is
//! generated asynchronously on the server and can be read back with
//! [`Reports::get`].

use std::fmt::Display;

use serde_json::{Map, Value};

use crate::jsonapi::{JsonApiError, Resource};
use crate::resources::service::Service;

/// The `reports` service.
///
/// # Example
///
/// ```rust,ignore
/// use chrono::{Duration, Utc};
/// use placements_io::jsonapi::datetime::to_wire;
/// use serde_json::json;
///
/// let start = Utc::now() - Duration::days(7);
/// let id = pio.reports().create(Some(json!({"start-date": to_wire(&start)}))).await?;
/// let report = pio.reports().get(&id).await?;
/// ```
#[derive(Clone, Debug)]
pub struct Reports {
    service: Service,
}

impl Reports {
    pub(crate) const fn new(service: Service) -> Self {
        Self { service }
    }

    /// Returns the underlying service.
    #[must_use]
    pub const fn service(&self) -> &Service {
        &self.service
    }

    /// Requests a new report and returns its id.
    ///
    /// # Errors
    ///
    /// Returns [`JsonApiError::Api`] if the server answers with `errors`, and
    /// [`JsonApiError::Decode`] if the response carries no report id.
    pub async fn create(&self, attributes: Option<Value>) -> Result<String, JsonApiError> {
        let mut data = Map::new();
        data.insert("type".to_string(), Value::String(self.service.path().to_string()));
        data.insert(
            "attributes".to_string(),
            attributes.unwrap_or_else(|| Value::Object(Map::new())),
        );
        let mut body = Map::new();
        body.insert("data".to_string(), Value::Object(data));

        let document = self
            .service
            .client()
            .post_document(self.service.path(), Value::Object(body))
            .await?;

        let id = document
            .data
            .and_then(|data| data.into_vec().into_iter().next())
            .and_then(|report| report.id);

        match id {
            Some(id) => {
                tracing::info!("Created report {}", id);
                Ok(id)
            }
            None => Err(<serde_json::Error as serde::de::Error>::custom(
                "report response has no id",
            )
            .into()),
        }
    }

    /// Reads a report by id.
    ///
    /// # Errors
    ///
    /// Returns [`JsonApiError`] if the read fails.
    pub async fn get(&self, id: impl Display) -> Result<Resource, JsonApiError> {
        self.service.find(id).await
    }
}
