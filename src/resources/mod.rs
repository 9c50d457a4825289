//! Service facade.
//!
//! [`PlacementsIo`] is the entry point: one accessor per service, each
//! returning a [`Service`] bound to its path. All services share one
//! [`JsonApiClient`].
//!
//! # Example
//!
//! ```rust,ignore
//! use placements_io::{Environment, PlacementsConfig, PlacementsIo};
//! use placements_io::jsonapi::Query;
//!
//! let config = PlacementsConfig::from_env(Environment::Production, None)?;
//! let pio = PlacementsIo::new(&config)?;
//!
//! let campaigns = pio
//!     .campaigns()
//!     .get(&Query::new().filter("archived", false).include("advertiser"))
//!     .await?;
//!
//! for campaign in &campaigns {
//!     println!("{:?}", campaign.attribute("name"));
//! }
//! ```

mod catalog;
mod reports;
mod service;

use std::sync::Arc;

pub use catalog::{
    ServiceDefinition, ACCOUNTS, ALL_SERVICES, CAMPAIGNS, CONTACTS, CREATIVES, CUSTOM_FIELDS,
    DEFAULT_FILTERS, GROUPS, LINE_ITEMS, OPPORTUNITIES, OPPORTUNITY_LINE_ITEMS, PACKAGES,
    PRODUCTS, PRODUCT_RATES, RATE_CARDS, REPORTS, USERS,
};
pub use reports::Reports;
pub use service::Service;

use crate::config::PlacementsConfig;
use crate::jsonapi::{JsonApiClient, JsonApiError};

/// Client for the Placements.io API.
///
/// # Thread Safety
///
/// `PlacementsIo` is `Send + Sync` and cheap to clone.
#[derive(Clone, Debug)]
pub struct PlacementsIo {
    client: Arc<JsonApiClient>,
}

const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<PlacementsIo>();
};

impl PlacementsIo {
    /// Creates a client from the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`JsonApiError::Http`] if the HTTP client cannot be created.
    pub fn new(config: &PlacementsConfig) -> Result<Self, JsonApiError> {
        Ok(Self {
            client: Arc::new(JsonApiClient::new(config)?),
        })
    }

    /// Returns the shared request engine.
    #[must_use]
    pub fn client(&self) -> &JsonApiClient {
        &self.client
    }

    /// Returns the service for any catalog entry.
    #[must_use]
    pub fn service(&self, definition: ServiceDefinition) -> Service {
        Service::new(Arc::clone(&self.client), definition)
    }

    /// Turns a `links.related` URL from an earlier response into a service.
    ///
    /// The base URL is stripped so the path resolves against this client;
    /// URLs on another origin are used as-is.
    #[must_use]
    pub fn relationship(&self, related_url: &str) -> Service {
        let base_url = self.client.http_client().base_url();
        let path = related_url
            .strip_prefix(base_url)
            .unwrap_or(related_url)
            .trim_start_matches('/');
        Service::ad_hoc(Arc::clone(&self.client), path)
    }

    /// Accounts.
    #[must_use]
    pub fn accounts(&self) -> Service {
        self.service(ACCOUNTS)
    }

    /// Campaigns.
    #[must_use]
    pub fn campaigns(&self) -> Service {
        self.service(CAMPAIGNS)
    }

    /// Contacts.
    #[must_use]
    pub fn contacts(&self) -> Service {
        self.service(CONTACTS)
    }

    /// Creatives.
    #[must_use]
    pub fn creatives(&self) -> Service {
        self.service(CREATIVES)
    }

    /// Custom fields.
    #[must_use]
    pub fn custom_fields(&self) -> Service {
        self.service(CUSTOM_FIELDS)
    }

    /// Groups.
    #[must_use]
    pub fn groups(&self) -> Service {
        self.service(GROUPS)
    }

    /// Line items.
    #[must_use]
    pub fn line_items(&self) -> Service {
        self.service(LINE_ITEMS)
    }

    /// Opportunities.
    #[must_use]
    pub fn opportunities(&self) -> Service {
        self.service(OPPORTUNITIES)
    }

    /// Opportunity line items.
    #[must_use]
    pub fn opportunity_line_items(&self) -> Service {
        self.service(OPPORTUNITY_LINE_ITEMS)
    }

    /// Packages.
    #[must_use]
    pub fn packages(&self) -> Service {
        self.service(PACKAGES)
    }

    /// Products.
    #[must_use]
    pub fn products(&self) -> Service {
        self.service(PRODUCTS)
    }

    /// Product rates.
    #[must_use]
    pub fn product_rates(&self) -> Service {
        self.service(PRODUCT_RATES)
    }

    /// Rate cards.
    #[must_use]
    pub fn rate_cards(&self) -> Service {
        self.service(RATE_CARDS)
    }

    /// Reports.
    #[must_use]
    pub fn reports(&self) -> Reports {
        Reports::new(self.service(REPORTS))
    }

    /// Users.
    #[must_use]
    pub fn users(&self) -> Service {
        self.service(USERS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ApiToken, BaseUrl};

    fn pio() -> PlacementsIo {
        let config = PlacementsConfig::builder()
            .base_url(BaseUrl::new("https://api.example.com/v1").unwrap())
            .token(ApiToken::new("t").unwrap())
            .build()
            .unwrap();
        PlacementsIo::new(&config).unwrap()
    }

    #[test]
    fn test_accessors_bind_paths() {
        let pio = pio();
        assert_eq!(pio.accounts().path(), "accounts");
        assert_eq!(pio.line_items().path(), "line_items");
        assert_eq!(pio.opportunity_line_items().path(), "opportunity_line_items");
        assert_eq!(pio.reports().service().path(), "reports");
    }

    #[test]
    fn test_relationship_strips_base_url() {
        let service = pio().relationship("https://api.example.com/v1/rate_cards/992/product_rates");
        assert_eq!(service.path(), "rate_cards/992/product_rates");
        assert!(service.accepts_filter("id"));
        assert!(!service.accepts_filter("archived"));
    }

    #[test]
    fn test_relationship_keeps_foreign_urls() {
        let service = pio().relationship("https://other.example.com/v1/x");
        assert_eq!(service.path(), "https://other.example.com/v1/x");
    }
}
