//! HTTP transport for the Placements.io API.
//!
//! This module provides the low-level client layer: request construction,
//! standard header injection, and response parsing. It sends each request
//! exactly once and reports the status back to the caller; rate-limit
//! handling lives in [`jsonapi`](crate::jsonapi).
//!
//! # Overview
//!
//! - [`HttpClient`]: The async HTTP client
//! - [`HttpRequest`]: A request to be sent to the API
//! - [`HttpResponse`]: A parsed response from the API
//! - [`HttpMethod`]: Supported HTTP methods (GET, POST, PATCH)
//! - [`HttpError`]: Transport-level errors

mod errors;
mod http_client;
mod http_request;
mod http_response;

pub use errors::{HttpError, HttpResponseError, InvalidHttpRequestError};
pub use http_client::{HttpClient, CLIENT_VERSION, JSON_API_CONTENT_TYPE, METADATA_HEADER};
pub use http_request::{query_value, HttpMethod, HttpRequest, HttpRequestBuilder};
pub use http_response::{HttpResponse, TOO_MANY_REQUESTS};
