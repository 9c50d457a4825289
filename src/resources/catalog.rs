//! Service catalog.
//!
//! Each [`ServiceDefinition`] binds a service path to the filter keys the
//! API documents for it. The list is advisory: unknown filter keys are
//! still sent, and only logged at debug level.
//!
//! # Example
//!
//! ```rust
//! use placements_io::resources::{ServiceDefinition, LINE_ITEMS};
//!
//! assert_eq!(LINE_ITEMS.path, "line_items");
//! assert!(LINE_ITEMS.accepts_filter("modified_since"));
//! assert!(LINE_ITEMS.accepts_filter("delivery_status"));
//! assert!(!LINE_ITEMS.accepts_filter("email"));
//! ```

/// Filters every service accepts.
pub const DEFAULT_FILTERS: &[&str] = &["id", "modified_since", "name", "uid", "org_id"];

/// A service path and its documented filter keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceDefinition {
    /// The path relative to the base URL (e.g., `"line_items"`).
    pub path: &'static str,
    /// Filters beyond [`DEFAULT_FILTERS`].
    pub filters: &'static [&'static str],
}

impl ServiceDefinition {
    /// Creates a new `ServiceDefinition`.
    #[must_use]
    pub const fn new(path: &'static str, filters: &'static [&'static str]) -> Self {
        Self { path, filters }
    }

    /// Returns `true` if `key` is a documented filter for this service.
    #[must_use]
    pub fn accepts_filter(&self, key: &str) -> bool {
        DEFAULT_FILTERS.contains(&key) || self.filters.contains(&key)
    }

    /// Iterates over every documented filter key, defaults first.
    pub fn filter_keys(&self) -> impl Iterator<Item = &'static str> {
        DEFAULT_FILTERS.iter().chain(self.filters.iter()).copied()
    }
}

/// Accounts (advertisers, agencies, and so on).
pub const ACCOUNTS: ServiceDefinition = ServiceDefinition::new(
    "accounts",
    &[
        "account_type",
        "external_id",
        "archived",
        "advertiser_of_record",
        "agency_of_record",
    ],
);

/// Campaigns.
pub const CAMPAIGNS: ServiceDefinition = ServiceDefinition::new(
    "campaigns",
    &[
        "ad_server_network_code",
        "ad_server_id",
        "archived",
        "campaign_number",
    ],
);

/// Contacts.
pub const CONTACTS: ServiceDefinition = ServiceDefinition::new("contacts", &[]);

/// Creatives.
pub const CREATIVES: ServiceDefinition = ServiceDefinition::new("creatives", &[]);

/// Custom field definitions.
pub const CUSTOM_FIELDS: ServiceDefinition = ServiceDefinition::new("custom_fields", &[]);

/// Line item groups.
pub const GROUPS: ServiceDefinition = ServiceDefinition::new(
    "groups",
    &["ad_server_network_code", "ad_server_id", "campaign"],
);

/// Line items.
pub const LINE_ITEMS: ServiceDefinition = ServiceDefinition::new(
    "line_items",
    &[
        "ad_server_network_code",
        "archived",
        "approval_status",
        "delivery_status",
        "started_before",
        "started_after",
        "ended_before",
        "ended_after",
        "ad_server_id",
        "campaign",
        "group",
    ],
);

/// Opportunities.
pub const OPPORTUNITIES: ServiceDefinition = ServiceDefinition::new(
    "opportunities",
    &["archived", "opportunity_order_number"],
);

/// Opportunity line items.
pub const OPPORTUNITY_LINE_ITEMS: ServiceDefinition = ServiceDefinition::new(
    "opportunity_line_items",
    &[
        "ad_server_network_code",
        "archived",
        "started_before",
        "started_after",
        "ended_before",
        "ended_after",
        "opportunity",
    ],
);

/// Packages.
pub const PACKAGES: ServiceDefinition = ServiceDefinition::new("packages", &["active", "archived"]);

/// Products.
pub const PRODUCTS: ServiceDefinition = ServiceDefinition::new(
    "products",
    &["ad_server", "ad_server_network_code", "active", "archived"],
);

/// Product rates.
pub const PRODUCT_RATES: ServiceDefinition = ServiceDefinition::new("product_rates", &[]);

/// Rate cards.
pub const RATE_CARDS: ServiceDefinition = ServiceDefinition::new("rate_cards", &[]);

/// Reports.
pub const REPORTS: ServiceDefinition = ServiceDefinition::new("reports", &[]);

/// Users.
pub const USERS: ServiceDefinition = ServiceDefinition::new("users", &["email"]);

/// Every service in the catalog.
pub const ALL_SERVICES: &[ServiceDefinition] = &[
    ACCOUNTS,
    CAMPAIGNS,
    CONTACTS,
    CREATIVES,
    CUSTOM_FIELDS,
    GROUPS,
    LINE_ITEMS,
    OPPORTUNITIES,
    OPPORTUNITY_LINE_ITEMS,
    PACKAGES,
    PRODUCTS,
    PRODUCT_RATES,
    RATE_CARDS,
    REPORTS,
    USERS,
];
