//! Errors raised by the JSON:API engine.
//!
//! Only whole-call failures are errors. Per-item failures of a bulk update
//! or create come back inline in the result list, and rate limiting is
//! absorbed by the retry loop.

use thiserror::Error;

use crate::clients::HttpError;
use crate::jsonapi::document::ErrorObject;

/// Error type for JSON:API operations.
#[derive(Debug, Error)]
pub enum JsonApiError {
    /// The response carried a top-level `errors` array.
    #[error("API returned errors: {}", join_errors(.errors))]
    Api {
        /// The error objects, as sent by the server.
        errors: Vec<ErrorObject>,
    },

    /// An update was requested with neither attributes nor relationships.
    #[error("Must provide either attributes or relationships to update.")]
    MissingUpdatePayload,

    /// The transport failed or the server answered with a bare non-2xx.
    #[error(transparent)]
    Http(#[from] HttpError),

    /// The response body was not a JSON:API document.
    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl JsonApiError {
    /// Returns the server's error objects, if this is an API error.
    #[must_use]
    pub fn api_errors(&self) -> Option<&[ErrorObject]> {
        match self {
            Self::Api { errors } => Some(errors),
            _ => None,
        }
    }
}

fn join_errors(errors: &[ErrorObject]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
