//! Placements.io API environments.
//!
//! Each environment is a fixed origin. Custom origins (proxies, mock
//! servers) are configured with [`BaseUrl`](crate::BaseUrl) instead.

use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// A named Placements.io API environment.
///
/// # Example
///
/// ```rust
/// use placements_io::Environment;
///
/// let env: Environment = "production".parse().unwrap();
/// assert_eq!(env.base_url(), "https://api.placements.io/v1");
/// assert_eq!(Environment::default(), Environment::Staging);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Environment {
    /// The live production API.
    Production,
    /// The staging API.
    #[default]
    Staging,
    /// The edge (pre-release) API.
    Edge,
}

impl Environment {
    /// All known environments.
    pub const ALL: [Self; 3] = [Self::Production, Self::Staging, Self::Edge];

    /// Returns the fixed origin for this environment, without a trailing slash.
    #[must_use]
    pub const fn base_url(&self) -> &'static str {
        match self {
            Self::Production => "https://api.placements.io/v1",
            Self::Staging => "https://api-staging.placements.io/v1",
            Self::Edge => "https://api-edge.placements.io/v1",
        }
    }

    /// Returns the lowercase environment name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Production => "production",
            Self::Staging => "staging",
            Self::Edge => "edge",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|env| env.name() == name)
            .ok_or(ConfigError::UnknownEnvironment {
                name: s.to_string(),
            })
    }
}
