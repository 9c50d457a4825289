//! Validated newtype wrappers for configuration values.
//!
//! This module provides type-safe wrappers around string values that validate
//! their contents on construction, plus the token resolution strategy used
//! when no token is passed explicitly.

use std::fmt;

use crate::config::Environment;
use crate::error::ConfigError;

/// Generic token variable, consulted after the environment-scoped one.
pub const TOKEN_ENV_VAR: &str = "PLACEMENTS_IO_API_TOKEN";

/// A validated Placements.io API bearer token.
///
/// # Security
///
/// The `Debug` implementation masks the token, displaying only
/// `ApiToken(*****)`.
///
/// # Example
///
/// ```rust
/// use placements_io::ApiToken;
///
/// let token = ApiToken::new("secret-token").unwrap();
/// assert_eq!(token.as_ref(), "secret-token");
/// assert_eq!(format!("{:?}", token), "ApiToken(*****)");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct ApiToken(String);

impl ApiToken {
    /// Creates a new validated API token.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyApiToken`] if the token is empty or blank.
    pub fn new(token: impl Into<String>) -> Result<Self, ConfigError> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(ConfigError::EmptyApiToken);
        }
        Ok(Self(token))
    }

    /// Resolves a token from an explicit value or the process environment.
    ///
    /// Resolution order is: `explicit`, then
    /// `PLACEMENTS_IO_API_TOKEN_<ENVIRONMENT>`, then `PLACEMENTS_IO_API_TOKEN`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingToken`] if no source yields a token.
    pub fn resolve(explicit: Option<&str>, environment: Environment) -> Result<Self, ConfigError> {
        Self::resolve_with(explicit, environment, |name| std::env::var(name).ok())
    }

    /// Same as [`resolve`](Self::resolve) with a caller-supplied variable lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingToken`] if no source yields a token.
    pub fn resolve_with<F>(
        explicit: Option<&str>,
        environment: Environment,
        lookup: F,
    ) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let scoped_var = format!("{TOKEN_ENV_VAR}_{}", environment.name().to_uppercase());

        explicit
            .map(ToString::to_string)
            .filter(|t| !t.trim().is_empty())
            .or_else(|| lookup(&scoped_var).filter(|t| !t.trim().is_empty()))
            .or_else(|| lookup(TOKEN_ENV_VAR).filter(|t| !t.trim().is_empty()))
            .map(Self)
            .ok_or_else(|| ConfigError::MissingToken {
                environment: environment.name().to_string(),
            })
    }
}

impl AsRef<str> for ApiToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiToken(*****)")
    }
}

/// A validated API base URL.
///
/// Overrides the fixed environment origin. Trailing slashes are trimmed so
/// service paths can be appended with a single `/`.
///
/// # Example
///
/// ```rust
/// use placements_io::BaseUrl;
///
/// let url = BaseUrl::new("http://127.0.0.1:8080/v1/").unwrap();
/// assert_eq!(url.as_ref(), "http://127.0.0.1:8080/v1");
/// assert_eq!(url.scheme(), "http");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BaseUrl {
    url: String,
    scheme_end: usize,
}

impl BaseUrl {
    /// Creates a new validated base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUrl`] if the URL has no scheme or host.
    pub fn new(url: impl Into<String>) -> Result<Self, ConfigError> {
        let raw = url.into();
        let url = raw.trim().trim_end_matches('/').to_string();

        let scheme_end = url
            .find("://")
            .ok_or_else(|| ConfigError::InvalidBaseUrl { url: raw.clone() })?;

        let scheme = &url[..scheme_end];
        if scheme.is_empty() || !scheme.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ConfigError::InvalidBaseUrl { url: raw });
        }

        let host_start = scheme_end + 3;
        let remainder = &url[host_start..];
        let host_end = remainder.find([':', '/', '?', '#']).unwrap_or(remainder.len());
        if host_end == 0 {
            return Err(ConfigError::InvalidBaseUrl { url: raw });
        }

        Ok(Self { url, scheme_end })
    }

    /// Returns the URL scheme (e.g., "https").
    #[must_use]
    pub fn scheme(&self) -> &str {
        &self.url[..self.scheme_end]
    }
}

impl AsRef<str> for BaseUrl {
    fn as_ref(&self) -> &str {
        &self.url
    }
}

impl From<Environment> for BaseUrl {
    fn from(environment: Environment) -> Self {
        Self {
            url: environment.base_url().to_string(),
            scheme_end: "https".len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_api_token_rejects_empty() {
        assert!(matches!(ApiToken::new(""), Err(ConfigError::EmptyApiToken)));
        assert!(matches!(ApiToken::new("   "), Err(ConfigError::EmptyApiToken)));
    }

    #[test]
    fn test_api_token_debug_is_masked() {
        let token = ApiToken::new("super-secret").unwrap();
        let debug = format!("{token:?}");
        assert!(!debug.contains("super-secret"));
    }

    #[test]
    fn test_resolve_prefers_explicit_token() {
        let lookup = lookup_from(&[
            ("PLACEMENTS_IO_API_TOKEN_STAGING", "scoped"),
            ("PLACEMENTS_IO_API_TOKEN", "generic"),
        ]);
        let token = ApiToken::resolve_with(Some("explicit"), Environment::Staging, lookup).unwrap();
        assert_eq!(token.as_ref(), "explicit");
    }

    #[test]
    fn test_resolve_prefers_scoped_over_generic() {
        let lookup = lookup_from(&[
            ("PLACEMENTS_IO_API_TOKEN_PRODUCTION", "scoped"),
            ("PLACEMENTS_IO_API_TOKEN", "generic"),
        ]);
        let token = ApiToken::resolve_with(None, Environment::Production, lookup).unwrap();
        assert_eq!(token.as_ref(), "scoped");
    }

    #[test]
    fn test_resolve_falls_back_to_generic() {
        let lookup = lookup_from(&[
            ("PLACEMENTS_IO_API_TOKEN_PRODUCTION", "wrong-env"),
            ("PLACEMENTS_IO_API_TOKEN", "generic"),
        ]);
        let token = ApiToken::resolve_with(None, Environment::Edge, lookup).unwrap();
        assert_eq!(token.as_ref(), "generic");
    }

    #[test]
    fn test_resolve_without_any_source_fails() {
        let result = ApiToken::resolve_with(None, Environment::Staging, |_| None);
        assert!(matches!(
            result,
            Err(ConfigError::MissingToken { environment }) if environment == "staging"
        ));
    }

    #[test]
    fn test_base_url_trims_trailing_slash() {
        let url = BaseUrl::new("https://example.com/v1///").unwrap();
        assert_eq!(url.as_ref(), "https://example.com/v1");
    }

    #[test]
    fn test_base_url_accepts_port() {
        let url = BaseUrl::new("http://127.0.0.1:4010").unwrap();
        assert_eq!(url.as_ref(), "http://127.0.0.1:4010");
    }

    #[test]
    fn test_base_url_rejects_missing_scheme_or_host() {
        assert!(BaseUrl::new("api.placements.io").is_err());
        assert!(BaseUrl::new("https://").is_err());
        assert!(BaseUrl::new("://host").is_err());
    }

    #[test]
    fn test_base_url_from_environment() {
        let url = BaseUrl::from(Environment::Production);
        assert_eq!(url.as_ref(), "https://api.placements.io/v1");
        assert_eq!(url.scheme(), "https");
    }
}
