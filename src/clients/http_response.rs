//! HTTP response type.

use std::collections::HashMap;

use serde_json::Value;

/// HTTP status returned when the API rate limits a request.
pub const TOO_MANY_REQUESTS: u16 = 429;

/// An HTTP response from the API.
///
/// Headers are stored lowercased; the body is always JSON. A 2xx body that
/// is empty or not JSON becomes `{}`; any other status keeps its text as
/// `{"raw_body": ...}`, so a failed item never looks like an empty success.
#[derive(Clone, Debug)]
pub struct HttpResponse {
    /// The HTTP status code.
    pub code: u16,
    /// Response headers (headers may have multiple values).
    pub headers: HashMap<String, Vec<String>>,
    /// The parsed response body.
    pub body: Value,
}

impl HttpResponse {
    /// Creates a new `HttpResponse`.
    #[must_use]
    pub const fn new(code: u16, headers: HashMap<String, Vec<String>>, body: Value) -> Self {
        Self {
            code,
            headers,
            body,
        }
    }

    /// Returns `true` if the response status code is in the 2xx range.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.code >= 200 && self.code <= 299
    }

    /// Returns `true` if the request was rate limited (HTTP 429).
    #[must_use]
    pub const fn is_rate_limited(&self) -> bool {
        self.code == TOO_MANY_REQUESTS
    }

    /// Returns the `Retry-After` header in seconds, if present and numeric.
    ///
    /// Informational only: retries always wait the configured fixed interval.
    #[must_use]
    pub fn retry_after(&self) -> Option<f64> {
        self.header("retry-after")
            .and_then(|value| value.parse::<f64>().ok())
    }

    /// Returns the `X-Request-Id` header value, if present.
    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        self.header("x-request-id")
    }

    /// Returns the first value of a header by lowercase name.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(name)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Returns the primary `data` member of the body, or the whole body
    /// when there is none (so wrapped error bodies stay visible).
    #[must_use]
    pub fn into_data_or_body(self) -> Value {
        match self.body {
            Value::Object(mut map) if map.contains_key("data") => {
                map.remove("data").unwrap_or(Value::Null)
            }
            body => body,
        }
    }
}
