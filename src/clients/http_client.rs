//! HTTP client for Placements.io API communication.
//!
//! This module provides the [`HttpClient`] type, which attaches the standard
//! headers to every request and sends it exactly once. Rate-limit retries
//! are handled one layer up, by the JSON:API engine.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;

use crate::clients::errors::HttpError;
use crate::clients::http_request::{HttpMethod, HttpRequest};
use crate::clients::http_response::HttpResponse;
use crate::config::{PlacementsConfig, TokenProvider};

/// Client version from Cargo.toml.
pub const CLIENT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// JSON:API media type sent as `Content-Type`.
pub const JSON_API_CONTENT_TYPE: &str = "application/vnd.api+json";

/// Name of the metadata header sent with every request.
pub const METADATA_HEADER: &str = "x-metadata";

/// HTTP client for making requests to the Placements.io API.
///
/// Every request carries:
/// - `Authorization: Bearer <token>` (the token provider is asked each time)
/// - `Content-Type: application/vnd.api+json`
/// - `User-Agent: PlacementsIO Rust Client/<version>` (optionally prefixed)
/// - `x-metadata: {"release":"alpha"}`
///
/// # Thread Safety
///
/// `HttpClient` is `Send + Sync`, making it safe to share across async tasks.
///
/// # Example
///
/// ```rust,ignore
/// use placements_io::{ApiToken, PlacementsConfig};
/// use placements_io::clients::{HttpClient, HttpMethod, HttpRequest};
///
/// let config = PlacementsConfig::builder()
///     .token(ApiToken::new("token").unwrap())
///     .build()
///     .unwrap();
/// let client = HttpClient::new(&config)?;
///
/// let request = HttpRequest::builder(HttpMethod::Get, "accounts").build().unwrap();
/// let response = client.request(request).await?;
/// ```
#[derive(Debug)]
pub struct HttpClient {
    client: reqwest::Client,
    base_url: String,
    token: Arc<dyn TokenProvider>,
    default_headers: HashMap<String, String>,
}

const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpClient>();
};

impl HttpClient {
    /// Creates a new HTTP client from the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Network`] if the underlying reqwest client cannot
    /// be created (e.g., TLS initialization failure).
    pub fn new(config: &PlacementsConfig) -> Result<Self, HttpError> {
        let user_agent_prefix = config
            .user_agent_prefix()
            .map_or(String::new(), |prefix| format!("{prefix} | "));
        let user_agent = format!("{user_agent_prefix}PlacementsIO Rust Client/{CLIENT_VERSION}");

        let mut default_headers = HashMap::new();
        default_headers.insert("User-Agent".to_string(), user_agent);
        default_headers.insert(
            "Content-Type".to_string(),
            JSON_API_CONTENT_TYPE.to_string(),
        );
        default_headers.insert(
            METADATA_HEADER.to_string(),
            serde_json::json!({"release": "alpha"}).to_string(),
        );

        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .timeout(config.timeout())
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url().to_string(),
            token: Arc::clone(config.token_provider()),
            default_headers,
        })
    }

    /// Returns the base URL for this client.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the headers sent with every request, excluding `Authorization`.
    #[must_use]
    pub const fn default_headers(&self) -> &HashMap<String, String> {
        &self.default_headers
    }

    /// Returns the full header set for the next request, including a freshly
    /// resolved `Authorization` header.
    #[must_use]
    pub fn headers(&self) -> HashMap<String, String> {
        let mut headers = self.default_headers.clone();
        headers.insert(
            "Authorization".to_string(),
            format!("Bearer {}", self.token.token()),
        );
        headers
    }

    /// Resolves a service path (or an absolute URL) against the base URL.
    #[must_use]
    pub fn url_for(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Sends a request once and returns the response, whatever its status.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::InvalidRequest`] if validation fails and
    /// [`HttpError::Network`] on connection failures or timeouts.
    pub async fn request(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
        request.verify()?;

        let url = self.url_for(&request.path);

        let mut headers = self.headers();
        if let Some(extra) = &request.extra_headers {
            for (key, value) in extra {
                headers.insert(key.clone(), value.clone());
            }
        }

        let mut req_builder = match request.http_method {
            HttpMethod::Get => self.client.get(&url),
            HttpMethod::Post => self.client.post(&url),
            HttpMethod::Patch => self.client.patch(&url),
        };

        for (key, value) in &headers {
            req_builder = req_builder.header(key, value);
        }

        if let Some(query) = &request.query {
            req_builder = req_builder.query(query);
        }

        if let Some(body) = &request.body {
            req_builder = req_builder.body(body.to_string());
        }

        let res = req_builder.send().await?;

        let code = res.status().as_u16();
        let res_headers = Self::parse_response_headers(res.headers());
        let body_text = res.text().await?;
        let body = Self::parse_body(code, body_text);

        tracing::trace!(
            "{} {} -> {}",
            request.http_method,
            request.path,
            code
        );

        Ok(HttpResponse::new(code, res_headers, body))
    }

    fn parse_response_headers(
        headers: &reqwest::header::HeaderMap,
    ) -> HashMap<String, Vec<String>> {
        let mut result: HashMap<String, Vec<String>> = HashMap::new();
        for (name, value) in headers {
            let key = name.as_str().to_lowercase();
            let value = value.to_str().unwrap_or_default().to_string();
            result.entry(key).or_default().push(value);
        }
        result
    }

    fn parse_body(code: u16, body_text: String) -> Value {
        serde_json::from_str(&body_text).unwrap_or_else(|_| {
            if (200..300).contains(&code) {
                serde_json::json!({})
            } else {
                serde_json::json!({ "raw_body": body_text })
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ApiToken, BaseUrl};

    fn create_test_config() -> PlacementsConfig {
        PlacementsConfig::builder()
            .base_url(BaseUrl::new("https://api.example.com/v1").unwrap())
            .token(ApiToken::new("test-token").unwrap())
            .build()
            .unwrap()
    }

    #[test]
    fn test_client_uses_configured_base_url() {
        let client = HttpClient::new(&create_test_config()).unwrap();
        assert_eq!(client.base_url(), "https://api.example.com/v1");
    }

    #[test]
    fn test_standard_headers() {
        let client = HttpClient::new(&create_test_config()).unwrap();
        let headers = client.headers();

        assert_eq!(
            headers.get("Authorization"),
            Some(&"Bearer test-token".to_string())
        );
        assert_eq!(
            headers.get("Content-Type"),
            Some(&"application/vnd.api+json".to_string())
        );
        assert_eq!(
            headers.get("x-metadata"),
            Some(&r#"{"release":"alpha"}"#.to_string())
        );
        assert!(headers
            .get("User-Agent")
            .unwrap()
            .starts_with("PlacementsIO Rust Client/"));
    }

    #[test]
    fn test_default_headers_exclude_authorization() {
        let client = HttpClient::new(&create_test_config()).unwrap();
        assert!(!client.default_headers().contains_key("Authorization"));
    }

    #[test]
    fn test_user_agent_with_prefix() {
        let config = PlacementsConfig::builder()
            .token(ApiToken::new("t").unwrap())
            .user_agent_prefix("MyScript/2.0")
            .build()
            .unwrap();
        let client = HttpClient::new(&config).unwrap();

        let user_agent = client.default_headers().get("User-Agent").unwrap();
        assert!(user_agent.starts_with("MyScript/2.0 | PlacementsIO Rust Client/"));
    }

    #[test]
    fn test_url_for_joins_paths() {
        let client = HttpClient::new(&create_test_config()).unwrap();
        assert_eq!(client.url_for("accounts"), "https://api.example.com/v1/accounts");
        assert_eq!(
            client.url_for("/accounts/5"),
            "https://api.example.com/v1/accounts/5"
        );
        assert_eq!(
            client.url_for("https://other.example.com/x"),
            "https://other.example.com/x"
        );
    }

    #[test]
    fn test_parse_body_handles_non_json() {
        assert_eq!(HttpClient::parse_body(200, String::new()), serde_json::json!({}));
        assert_eq!(
            HttpClient::parse_body(404, String::new()),
            serde_json::json!({"raw_body": ""})
        );
        assert_eq!(
            HttpClient::parse_body(200, "ok".to_string()),
            serde_json::json!({})
        );
        assert_eq!(
            HttpClient::parse_body(403, "Forbidden".to_string()),
            serde_json::json!({"raw_body": "Forbidden"})
        );
        assert_eq!(
            HttpClient::parse_body(502, "Bad Gateway".to_string()),
            serde_json::json!({"raw_body": "Bad Gateway"})
        );
    }
}
