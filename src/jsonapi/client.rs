//! JSON:API request engine.
//!
//! [`JsonApiClient`] drives the read, update, and create flows on top of
//! [`HttpClient`]:
//!
//! - Reads fetch page 1, then pages `2..=page-count` concurrently. A
//!   top-level `errors` array fails the whole call.
//! - Updates send one PATCH per id and creates one POST per object, all
//!   concurrently. Responses with status 429 are retried as a group after a
//!   fixed wait until none remain; every other response is final and comes
//!   back inline, errors included.
//!
//! There is no cap on rate-limit retries. A server that keeps answering 429
//! keeps the call waiting.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use futures::future::join_all;
use serde_json::Value;

use crate::clients::{HttpClient, HttpError, HttpMethod, HttpRequest, HttpResponse, HttpResponseError};
use crate::config::PlacementsConfig;
use crate::jsonapi::document::{Document, ErrorObject, Resource};
use crate::jsonapi::errors::JsonApiError;
use crate::jsonapi::payload::{resource_body, NewResource, PayloadSource};
use crate::jsonapi::query::{resource_type, Query};
use crate::jsonapi::response::ApiResponse;

/// Request engine for JSON:API services.
///
/// # Thread Safety
///
/// `JsonApiClient` is `Send + Sync`, making it safe to share across async tasks.
///
/// # Example
///
/// ```rust,ignore
/// use placements_io::jsonapi::{JsonApiClient, Query};
///
/// let client = JsonApiClient::new(&config)?;
/// let campaigns = client
///     .fetch_collection("campaigns", &Query::new().include("advertiser"))
///     .await?;
/// ```
#[derive(Debug)]
pub struct JsonApiClient {
    http_client: HttpClient,
    rate_limit_wait: Duration,
}

const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<JsonApiClient>();
};

impl JsonApiClient {
    /// Creates an engine from the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`JsonApiError::Http`] if the HTTP client cannot be created.
    pub fn new(config: &PlacementsConfig) -> Result<Self, JsonApiError> {
        Ok(Self {
            http_client: HttpClient::new(config)?,
            rate_limit_wait: config.rate_limit_wait(),
        })
    }

    /// Returns the underlying HTTP client.
    #[must_use]
    pub const fn http_client(&self) -> &HttpClient {
        &self.http_client
    }

    /// Returns the wait between rate-limited rounds.
    #[must_use]
    pub const fn rate_limit_wait(&self) -> Duration {
        self.rate_limit_wait
    }

    /// Reads every page of a collection and merges included resources.
    ///
    /// Resources come back in page-number order. Included resources of all
    /// pages are combined, keeping the first copy of each `(type, id)`.
    ///
    /// # Errors
    ///
    /// - [`JsonApiError::Api`] if any page carries an `errors` array
    /// - [`JsonApiError::Http`] on transport failures or bare non-2xx responses
    /// - [`JsonApiError::Decode`] if a 2xx body is not a JSON:API document
    pub async fn fetch_collection(
        &self,
        service: &str,
        query: &Query,
    ) -> Result<ApiResponse, JsonApiError> {
        let first = self.get_document(service, query.encode(service, 1)).await?;
        let page_count = first.page_count();
        tracing::info!("Fetched page 1 of {} from {}", page_count.max(1), service);

        let mut data = first.data.map(|d| d.into_vec()).unwrap_or_default();
        let mut included = first.included;
        let meta = first.meta;

        if page_count > 1 {
            tracing::info!("Fetching pages 2..={} from {}", page_count, service);
            let pages = join_all(
                (2..=page_count).map(|page| self.get_document(service, query.encode(service, page))),
            )
            .await;
            for page in pages {
                let page = page?;
                data.extend(page.data.map(|d| d.into_vec()).unwrap_or_default());
                included.extend(page.included);
            }
        }

        tracing::info!("Fetched {} resource(s) from {}", data.len(), service);
        Ok(ApiResponse::new(data, dedupe_resources(included), meta))
    }

    /// Reads a single resource (e.g., `reports/12`) and merges its includes.
    ///
    /// # Errors
    ///
    /// As [`fetch_collection`](Self::fetch_collection); a document without
    /// primary data is a [`JsonApiError::Decode`] error.
    pub async fn fetch_one(&self, path: &str) -> Result<Resource, JsonApiError> {
        let document = self.get_document(path, HashMap::new()).await?;
        ApiResponse::from_document(document)
            .into_inner()
            .into_iter()
            .next()
            .ok_or_else(|| {
                <serde_json::Error as serde::de::Error>::custom(format!(
                    "response for {path} has no primary data"
                ))
                .into()
            })
    }

    /// Sends `body` as a POST and decodes the answer as a document.
    ///
    /// Unlike [`create`](Self::create), an `errors` array fails the call.
    ///
    /// # Errors
    ///
    /// As [`fetch_collection`](Self::fetch_collection).
    pub async fn post_document(&self, path: &str, body: Value) -> Result<Document, JsonApiError> {
        tracing::debug!("Posting to {} with payload: {}", path, body);
        let request = HttpRequest::builder(HttpMethod::Post, path)
            .body(body)
            .build()
            .map_err(HttpError::from)?;
        let response = self.send(request).await?;
        decode_document(response)
    }

    /// Updates resources by id with one PATCH per id.
    ///
    /// Results are the response `data` (or the whole body when there is no
    /// `data`, as for error responses), in the order of `ids`. Repeated ids
    /// are sent once, at their first position.
    ///
    /// # Errors
    ///
    /// - [`JsonApiError::MissingUpdatePayload`] before any request, if both
    ///   payloads are absent or empty
    /// - [`JsonApiError::Http`] if any request fails at the transport level
    pub async fn update(
        &self,
        service: &str,
        ids: Vec<String>,
        attributes: Option<PayloadSource>,
        relationships: Option<PayloadSource>,
    ) -> Result<Vec<Value>, JsonApiError> {
        let attributes = attributes.filter(|source| !source.is_empty());
        let relationships = relationships.filter(|source| !source.is_empty());
        if attributes.is_none() && relationships.is_none() {
            return Err(JsonApiError::MissingUpdatePayload);
        }

        let mut seen = HashSet::new();
        let ids: Vec<String> = ids.into_iter().filter(|id| seen.insert(id.clone())).collect();

        let kind = resource_type(service);
        let bodies = join_all(ids.iter().map(|id| {
            let attributes = attributes.as_ref();
            let relationships = relationships.as_ref();
            async move {
                let attributes = match attributes {
                    Some(source) => Some(source.resolve(id).await),
                    None => None,
                };
                let relationships = match relationships {
                    Some(source) => Some(source.resolve(id).await),
                    None => None,
                };
                resource_body(kind, Some(id), attributes, relationships)
            }
        }))
        .await;

        tracing::info!("Updating {} {} resource(s)", ids.len(), service);
        let mut requests = Vec::with_capacity(ids.len());
        for (id, body) in ids.iter().zip(bodies) {
            let path = format!("{}/{}", service.trim_end_matches('/'), id);
            tracing::debug!("Updating {} with payload: {}", path, body);
            requests.push(
                HttpRequest::builder(HttpMethod::Patch, path)
                    .body(body)
                    .build()
                    .map_err(HttpError::from)?,
            );
        }

        let responses = self.fan_out(requests).await?;
        Ok(responses.into_iter().map(HttpResponse::into_data_or_body).collect())
    }

    /// Creates resources with one POST per object.
    ///
    /// Results are in the order of `objects`, shaped as for
    /// [`update`](Self::update).
    ///
    /// # Errors
    ///
    /// Returns [`JsonApiError::Http`] if any request fails at the transport level.
    pub async fn create(
        &self,
        service: &str,
        objects: Vec<NewResource>,
    ) -> Result<Vec<Value>, JsonApiError> {
        let kind = resource_type(service);
        tracing::info!("Creating {} {} resource(s)", objects.len(), service);

        let mut requests = Vec::with_capacity(objects.len());
        for object in objects {
            let body = resource_body(kind, None, object.attributes, object.relationships);
            tracing::debug!("Creating {} with payload: {}", service, body);
            requests.push(
                HttpRequest::builder(HttpMethod::Post, service)
                    .body(body)
                    .build()
                    .map_err(HttpError::from)?,
            );
        }

        let responses = self.fan_out(requests).await?;
        Ok(responses.into_iter().map(HttpResponse::into_data_or_body).collect())
    }

    async fn get_document(
        &self,
        path: &str,
        params: HashMap<String, String>,
    ) -> Result<Document, JsonApiError> {
        let request = HttpRequest::builder(HttpMethod::Get, path)
            .query(params)
            .build()
            .map_err(HttpError::from)?;
        let response = self.send(request).await?;
        decode_document(response)
    }

    /// Sends one request, waiting out 429 responses.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, JsonApiError> {
        loop {
            let response = self.http_client.request(request.clone()).await?;
            if !response.is_rate_limited() {
                return Ok(response);
            }
            tracing::warn!(
                "Rate limited on {}; waiting {:?} before retrying...",
                request.path,
                self.rate_limit_wait
            );
            tokio::time::sleep(self.rate_limit_wait).await;
        }
    }

    /// Sends every request concurrently, re-sending the rate-limited ones
    /// in rounds until each has a final response.
    ///
    /// Responses are returned in request order.
    async fn fan_out(&self, requests: Vec<HttpRequest>) -> Result<Vec<HttpResponse>, JsonApiError> {
        let mut results: Vec<Option<HttpResponse>> = vec![None; requests.len()];
        let mut outstanding: Vec<usize> = (0..requests.len()).collect();
        let mut round: u32 = 0;

        while !outstanding.is_empty() {
            if round > 0 {
                tracing::warn!("{} request(s) remaining...", outstanding.len());
                tracing::warn!("Waiting {:?} before retrying...", self.rate_limit_wait);
                tokio::time::sleep(self.rate_limit_wait).await;
            }

            let responses = join_all(
                outstanding
                    .iter()
                    .map(|&index| self.http_client.request(requests[index].clone())),
            )
            .await;

            let mut rate_limited = Vec::new();
            for (index, response) in outstanding.into_iter().zip(responses) {
                let response = response?;
                if response.is_rate_limited() {
                    rate_limited.push(index);
                } else {
                    results[index] = Some(response);
                }
            }
            outstanding = rate_limited;
            round += 1;
        }

        tracing::debug!("Fan-out of {} request(s) finished in {} round(s)", results.len(), round);
        Ok(results.into_iter().flatten().collect())
    }
}

/// Decodes a response body, failing on `errors` or a bare non-2xx status.
fn decode_document(response: HttpResponse) -> Result<Document, JsonApiError> {
    let code = response.code;
    let ok = response.is_ok();
    let request_id = response.request_id().map(String::from);

    let errors = response
        .body
        .get("errors")
        .and_then(|errors| serde_json::from_value::<Vec<ErrorObject>>(errors.clone()).ok())
        .unwrap_or_default();
    if !errors.is_empty() {
        return Err(JsonApiError::Api { errors });
    }

    match serde_json::from_value::<Document>(response.body.clone()) {
        Ok(document) if ok => Ok(document),
        Err(error) if ok => Err(error.into()),
        _ => Err(HttpError::from(HttpResponseError {
            code,
            message: response.body.to_string(),
            request_id,
        })
        .into()),
    }
}

fn dedupe_resources(resources: Vec<Resource>) -> Vec<Resource> {
    let mut seen = HashSet::new();
    resources
        .into_iter()
        .filter(|resource| match resource.identifier() {
            Some((kind, id)) => seen.insert((kind.to_string(), id.to_string())),
            None => true,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response(code: u16, body: Value) -> HttpResponse {
        HttpResponse::new(code, HashMap::new(), body)
    }

    #[test]
    fn test_decode_document_raises_on_errors_array() {
        let result = decode_document(response(
            400,
            json!({"errors": [{"status": "400", "title": "Invalid filter"}]}),
        ));
        let Err(JsonApiError::Api { errors }) = result else {
            panic!("expected Api error");
        };
        assert_eq!(errors[0].title.as_deref(), Some("Invalid filter"));
    }

    #[test]
    fn test_decode_document_raises_on_errors_even_with_2xx() {
        let result = decode_document(response(200, json!({"data": [], "errors": [{"title": "x"}]})));
        assert!(matches!(result, Err(JsonApiError::Api { .. })));
    }

    #[test]
    fn test_decode_document_keeps_errors_when_data_is_malformed() {
        let result = decode_document(response(
            200,
            json!({"data": "nope", "errors": [{"title": "Partial failure"}]}),
        ));
        let Err(JsonApiError::Api { errors }) = result else {
            panic!("expected Api error");
        };
        assert_eq!(errors[0].title.as_deref(), Some("Partial failure"));
    }

    #[test]
    fn test_decode_document_bare_non_2xx_is_http_error() {
        let result = decode_document(response(502, json!({"raw_body": "Bad Gateway"})));
        let Err(JsonApiError::Http(HttpError::Response(error))) = result else {
            panic!("expected HTTP response error");
        };
        assert_eq!(error.code, 502);
        assert!(error.message.contains("Bad Gateway"));
    }

    #[test]
    fn test_decode_document_success() {
        let document = decode_document(response(
            200,
            json!({"data": [{"type": "accounts", "id": "1"}], "meta": {"page-count": 1}}),
        ))
        .unwrap();
        assert_eq!(document.page_count(), 1);
    }

    #[test]
    fn test_decode_document_malformed_2xx_is_decode_error() {
        let result = decode_document(response(200, json!({"data": "nope"})));
        assert!(matches!(result, Err(JsonApiError::Decode(_))));
    }

    #[test]
    fn test_dedupe_resources_keeps_first_copy() {
        let mut first = Resource::stub("accounts", "1");
        first.attributes = Some(serde_json::Map::new());
        let resources = vec![
            first.clone(),
            Resource::stub("accounts", "2"),
            Resource::stub("accounts", "1"),
        ];
        let deduped = dedupe_resources(resources);
        assert_eq!(deduped.len(), 2);
        assert_eq!(deduped[0], first);
    }
}
