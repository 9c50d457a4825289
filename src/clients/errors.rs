//! HTTP-specific error types.
//!
//! - [`HttpResponseError`]: Non-2xx responses that carry no JSON:API `errors` array
//! - [`InvalidHttpRequestError`]: A request failed validation before sending
//! - [`HttpError`]: Unified error type encompassing all HTTP-related errors
//!
//! Network failures and timeouts surface as [`HttpError::Network`] and are
//! never retried by the client.

use thiserror::Error;

/// Error returned when a response has a non-successful status and no
/// JSON:API `errors` member to report instead.
///
/// # Example
///
/// ```rust
/// use placements_io::clients::HttpResponseError;
///
/// let error = HttpResponseError {
///     code: 502,
///     message: r#"{"raw_body":"Bad Gateway"}"#.to_string(),
///     request_id: None,
/// };
/// assert!(error.to_string().contains("502"));
/// ```
#[derive(Debug, Error)]
#[error("HTTP {code}: {message}")]
pub struct HttpResponseError {
    /// The HTTP status code of the response.
    pub code: u16,
    /// The serialized response body.
    pub message: String,
    /// Value of the `X-Request-Id` header, if present.
    pub request_id: Option<String>,
}

/// Error returned when an HTTP request fails validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidHttpRequestError {
    /// A POST or PATCH request was made without a body.
    #[error("Cannot use {method} without specifying data.")]
    MissingBody {
        /// The HTTP method that requires a body.
        method: String,
    },
}

/// Unified error type for all HTTP-related errors.
#[derive(Debug, Error)]
pub enum HttpError {
    /// A non-2xx response.
    #[error(transparent)]
    Response(#[from] HttpResponseError),

    /// Request validation failed.
    #[error(transparent)]
    InvalidRequest(#[from] InvalidHttpRequestError),

    /// Network, timeout, or connection error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}
