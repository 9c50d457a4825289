//! # Placements.io API Rust Client
//!
//! An async client for the Placements.io JSON:API, covering paginated reads,
//! bulk updates and creates with rate-limit handling, and merging of
//! included resources into relationship payloads.
//!
//! ## Overview
//!
//! This crate provides:
//! - Type-safe configuration via [`PlacementsConfig`] and [`PlacementsConfigBuilder`]
//! - Token resolution from explicit values or environment variables
//! - Named environments (production, staging, edge) via [`Environment`]
//! - One [`Service`] per resource collection through [`PlacementsIo`]
//! - Concurrent pagination, with included resources merged into [`ApiResponse`]
//! - Per-id fan-out updates and creates that wait out HTTP 429 responses
//!
//! ## Quick Start
//!
//! ```rust
//! use placements_io::{ApiToken, Environment, PlacementsConfig, PlacementsIo};
//!
//! let config = PlacementsConfig::builder()
//!     .environment(Environment::Staging)
//!     .token(ApiToken::new("your-api-token").unwrap())
//!     .build()
//!     .unwrap();
//!
//! let pio = PlacementsIo::new(&config).unwrap();
//! assert_eq!(pio.line_items().path(), "line_items");
//! ```
//!
//! ## Reading Resources
//!
//! ```rust,ignore
//! use placements_io::jsonapi::{Fields, Query};
//!
//! let query = Query::new()
//!     .filter("archived", false)
//!     .include("campaign.advertiser")
//!     .fields(Fields::list(["name", "start-date"]));
//!
//! let line_items = pio.line_items().get(&query).await?;
//! println!("{} of {} line items", line_items.len(), line_items.record_count());
//!
//! for item in &line_items {
//!     let campaign = item.relationship("campaign").and_then(|r| r.one());
//!     println!("{:?} -> {:?}", item.attribute("name"), campaign.and_then(|c| c.attribute("name")));
//! }
//! ```
//!
//! ## Updating and Creating
//!
//! Bulk operations return one body per item. Items the server rejected
//! carry an `errors` member instead of raising, so one bad row does not
//! abort the batch.
//!
//! ```rust,ignore
//! use placements_io::jsonapi::{NewResource, PayloadSource};
//! use serde_json::json;
//!
//! let renamed = pio
//!     .line_items()
//!     .update(
//!         [101, 102],
//!         Some(PayloadSource::resolver(|id| async move {
//!             json!({"name": format!("Line item {id}")})
//!         })),
//!         None,
//!     )
//!     .await?;
//!
//! let created = pio
//!     .creatives()
//!     .create(vec![NewResource::new()
//!         .attributes(json!({"name": "Banner"}))
//!         .relationships(json!({"account": {"data": {"type": "accounts", "id": 7}}}))])
//!     .await?;
//! ```
//!
//! ## Logging
//!
//! The crate logs through [`tracing`]; install a subscriber to see fetch
//! progress (`info`), request payloads (`debug`), and rate-limit waits
//! (`warn`).

pub mod clients;
pub mod config;
pub mod error;
pub mod jsonapi;
pub mod resources;

// Re-export public types at crate root for convenience
pub use config::{
    ApiToken, BaseUrl, Environment, PlacementsConfig, PlacementsConfigBuilder, TokenProvider,
};
pub use error::ConfigError;

// Re-export HTTP client types
pub use clients::{
    HttpClient, HttpError, HttpMethod, HttpRequest, HttpRequestBuilder, HttpResponse,
    HttpResponseError, InvalidHttpRequestError,
};

// Re-export the JSON:API engine and facade
pub use jsonapi::{ApiResponse, JsonApiClient, JsonApiError, Resource};
pub use resources::{PlacementsIo, Reports, Service};
