//! Configuration types for the Placements.io client.
//!
//! # Overview
//!
//! - [`PlacementsConfig`]: The configuration struct holding all client settings
//! - [`PlacementsConfigBuilder`]: A builder for constructing [`PlacementsConfig`]
//! - [`Environment`]: The named API environments (production, staging, edge)
//! - [`ApiToken`]: A validated bearer token with masked debug output
//! - [`BaseUrl`]: A validated origin overriding the environment default
//! - [`TokenProvider`]: A source of bearer tokens evaluated per request
//!
//! # Example
//!
//! ```rust
//! use placements_io::{ApiToken, Environment, PlacementsConfig};
//!
//! let config = PlacementsConfig::builder()
//!     .environment(Environment::Production)
//!     .token(ApiToken::new("my-token").unwrap())
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.base_url(), "https://api.placements.io/v1");
//! ```

mod environment;
mod newtypes;

pub use environment::Environment;
pub use newtypes::{ApiToken, BaseUrl, TOKEN_ENV_VAR};

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::error::ConfigError;

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Default back-off between rate-limited rounds.
pub const DEFAULT_RATE_LIMIT_WAIT: Duration = Duration::from_secs(60);

/// A source of bearer tokens.
///
/// The provider is consulted for every outgoing request, so implementations
/// may rotate or refresh tokens between calls.
///
/// # Example
///
/// ```rust
/// use placements_io::TokenProvider;
///
/// #[derive(Debug)]
/// struct Rotating;
///
/// impl TokenProvider for Rotating {
///     fn token(&self) -> String {
///         "fresh-token".to_string()
///     }
/// }
/// ```
pub trait TokenProvider: fmt::Debug + Send + Sync {
    /// Returns the token to send in the `Authorization` header.
    fn token(&self) -> String;
}

impl TokenProvider for ApiToken {
    fn token(&self) -> String {
        self.as_ref().to_string()
    }
}

/// Configuration for the Placements.io client.
///
/// `PlacementsConfig` is `Clone`, `Send`, and `Sync`; the token provider is
/// shared behind an `Arc`.
#[derive(Clone, Debug)]
pub struct PlacementsConfig {
    environment: Environment,
    base_url: BaseUrl,
    token: Arc<dyn TokenProvider>,
    timeout: Duration,
    rate_limit_wait: Duration,
    user_agent_prefix: Option<String>,
}

impl PlacementsConfig {
    /// Creates a new builder for constructing a `PlacementsConfig`.
    #[must_use]
    pub fn builder() -> PlacementsConfigBuilder {
        PlacementsConfigBuilder::new()
    }

    /// Builds a configuration for `environment`, resolving the token from
    /// `explicit` or the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingToken`] if no token can be resolved.
    pub fn from_env(environment: Environment, explicit: Option<&str>) -> Result<Self, ConfigError> {
        let token = ApiToken::resolve(explicit, environment)?;
        Self::builder().environment(environment).token(token).build()
    }

    /// Returns the environment.
    #[must_use]
    pub const fn environment(&self) -> Environment {
        self.environment
    }

    /// Returns the base URL requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.base_url.as_ref()
    }

    /// Returns the token provider.
    #[must_use]
    pub fn token_provider(&self) -> &Arc<dyn TokenProvider> {
        &self.token
    }

    /// Returns the request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns the fixed back-off between rate-limited rounds.
    #[must_use]
    pub const fn rate_limit_wait(&self) -> Duration {
        self.rate_limit_wait
    }

    /// Returns the user agent prefix, if configured.
    #[must_use]
    pub fn user_agent_prefix(&self) -> Option<&str> {
        self.user_agent_prefix.as_deref()
    }
}

const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<PlacementsConfig>();
};

/// Builder for constructing [`PlacementsConfig`] instances.
///
/// A token (or token provider) is required. All other fields have defaults.
///
/// # Defaults
///
/// - `environment`: [`Environment::Staging`]
/// - `base_url`: the environment's origin
/// - `timeout`: 60 seconds
/// - `rate_limit_wait`: 60 seconds
/// - `user_agent_prefix`: `None`
#[derive(Debug, Default)]
pub struct PlacementsConfigBuilder {
    environment: Option<Environment>,
    base_url: Option<BaseUrl>,
    token: Option<Arc<dyn TokenProvider>>,
    timeout: Option<Duration>,
    rate_limit_wait: Option<Duration>,
    user_agent_prefix: Option<String>,
}

impl PlacementsConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the environment.
    #[must_use]
    pub const fn environment(mut self, environment: Environment) -> Self {
        self.environment = Some(environment);
        self
    }

    /// Overrides the environment's base URL.
    #[must_use]
    pub fn base_url(mut self, base_url: BaseUrl) -> Self {
        self.base_url = Some(base_url);
        self
    }

    /// Sets a fixed bearer token.
    #[must_use]
    pub fn token(mut self, token: ApiToken) -> Self {
        self.token = Some(Arc::new(token));
        self
    }

    /// Sets a token provider evaluated on every request.
    #[must_use]
    pub fn token_provider(mut self, provider: Arc<dyn TokenProvider>) -> Self {
        self.token = Some(provider);
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the fixed wait between rate-limited retry rounds.
    #[must_use]
    pub const fn rate_limit_wait(mut self, wait: Duration) -> Self {
        self.rate_limit_wait = Some(wait);
        self
    }

    /// Sets the user agent prefix for HTTP requests.
    #[must_use]
    pub fn user_agent_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.user_agent_prefix = Some(prefix.into());
        self
    }

    /// Builds the [`PlacementsConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequiredField`] if no token was set.
    pub fn build(self) -> Result<PlacementsConfig, ConfigError> {
        let token = self
            .token
            .ok_or(ConfigError::MissingRequiredField { field: "token" })?;
        let environment = self.environment.unwrap_or_default();

        Ok(PlacementsConfig {
            environment,
            base_url: self.base_url.unwrap_or_else(|| environment.into()),
            token,
            timeout: self.timeout.unwrap_or(DEFAULT_TIMEOUT),
            rate_limit_wait: self.rate_limit_wait.unwrap_or(DEFAULT_RATE_LIMIT_WAIT),
            user_agent_prefix: self.user_agent_prefix,
        })
    }
}
