//! JSON:API engine.
//!
//! This module holds everything between the raw HTTP transport and the
//! per-service facade:
//!
//! - [`Query`] / [`Fields`]: filter, include, fieldset, and page encoding
//! - [`JsonApiClient`]: pagination, fan-out updates and creates, rate-limit retries
//! - [`merge_included`] / [`ApiResponse`]: included-resource merging
//! - [`Resource`], [`Document`], and friends: the document model
//! - [`PayloadSource`] / [`NewResource`]: update and create payloads
//! - [`JsonApiError`]: whole-call failures

mod client;
pub mod datetime;
mod document;
mod errors;
mod merge;
mod payload;
mod query;
mod response;

pub use client::JsonApiClient;
pub use document::{Document, ErrorObject, PrimaryData, Relationship, RelationshipData, Resource};
pub use errors::JsonApiError;
pub use merge::merge_included;
pub use payload::{NewResource, PayloadResolver, PayloadSource};
pub use query::{
    augment_fields, fields_params, filter_params, hyphenate, include_params, page_params,
    top_level_includes, Fields, Query, PAGE_SIZE,
};
pub use response::ApiResponse;
