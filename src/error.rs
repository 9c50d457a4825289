//! Error types for the Placements.io client.
//!
//! This module contains the configuration errors raised while building a
//! [`PlacementsConfig`](crate::PlacementsConfig). Transport and JSON:API
//! errors live next to the layers that produce them
//! ([`HttpError`](crate::HttpError) and [`JsonApiError`](crate::JsonApiError)).
//!
//! # Example
//!
//! ```rust
//! use placements_io::{ApiToken, ConfigError};
//!
//! let result = ApiToken::new("");
//! assert!(matches!(result, Err(ConfigError::EmptyApiToken)));
//! ```

use thiserror::Error;

/// Errors that can occur while configuring the client.
///
/// Each variant carries enough context to tell the caller what to fix.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// API token cannot be empty.
    #[error("API token cannot be empty. Please provide a valid Placements.io API token.")]
    EmptyApiToken,

    /// No token was supplied and none was found in the environment.
    #[error("No API token found for environment '{environment}'. Pass a token explicitly or set PLACEMENTS_IO_API_TOKEN_{upper} or PLACEMENTS_IO_API_TOKEN.", upper = .environment.to_uppercase())]
    MissingToken {
        /// The environment the token was resolved for.
        environment: String,
    },

    /// The environment name is not one of the known environments.
    #[error("Unknown environment '{name}'. Expected one of: production, staging, edge.")]
    UnknownEnvironment {
        /// The name that was provided.
        name: String,
    },

    /// Base URL is invalid.
    #[error("Invalid base URL '{url}'. Please provide a valid URL with scheme (e.g., 'https://api.placements.io/v1').")]
    InvalidBaseUrl {
        /// The invalid URL that was provided.
        url: String,
    },

    /// A required field is missing.
    #[error("Missing required field: '{field}'. This field must be set before building the configuration.")]
    MissingRequiredField {
        /// The name of the missing field.
        field: &'static str,
    },
}
