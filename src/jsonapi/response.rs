//! Merged collection response.

use std::ops::{Deref, Index};
use std::slice::SliceIndex;

use serde_json::{Map, Value};

use crate::jsonapi::document::{meta_count, Document, Resource};
use crate::jsonapi::merge::merge_included;

/// The result of a collection read.
///
/// Behaves like an ordered, read-only sequence of [`Resource`] (length,
/// indexing, iteration) whose relationship stubs have already been replaced
/// by the matching included resources. The raw included resources and the
/// top-level `meta` of the response ride along as side channels.
///
/// # Example
///
/// ```rust
/// use placements_io::jsonapi::{ApiResponse, Document};
/// use serde_json::json;
///
/// let document: Document = serde_json::from_value(json!({
///     "data": [{"type": "accounts", "id": "1"}, {"type": "accounts", "id": "2"}],
///     "meta": {"record-count": 2, "page-count": 1}
/// })).unwrap();
///
/// let response = ApiResponse::from_document(document);
/// assert_eq!(response.len(), 2);
/// assert_eq!(response[1].id.as_deref(), Some("2"));
/// assert_eq!(response.record_count(), 2);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ApiResponse {
    data: Vec<Resource>,
    included: Vec<Resource>,
    meta: Map<String, Value>,
}

impl ApiResponse {
    /// Builds a response, merging `included` into `data`.
    #[must_use]
    pub fn new(data: Vec<Resource>, included: Vec<Resource>, meta: Map<String, Value>) -> Self {
        let data = merge_included(data, &included);
        Self {
            data,
            included,
            meta,
        }
    }

    /// Builds a response from a single decoded document.
    #[must_use]
    pub fn from_document(document: Document) -> Self {
        let data = document.data.map(|d| d.into_vec()).unwrap_or_default();
        Self::new(data, document.included, document.meta)
    }

    /// Returns the included resources as sent by the server.
    #[must_use]
    pub fn included(&self) -> &[Resource] {
        &self.included
    }

    /// Returns the top-level `meta` of the first page.
    #[must_use]
    pub const fn meta(&self) -> &Map<String, Value> {
        &self.meta
    }

    /// Returns `meta.record-count`, or 0.
    #[must_use]
    pub fn record_count(&self) -> u64 {
        meta_count(&self.meta, "record-count")
    }

    /// Returns `meta.page-count`, or 0.
    #[must_use]
    pub fn page_count(&self) -> u64 {
        meta_count(&self.meta, "page-count")
    }

    /// Consumes the response and returns the merged resources.
    #[must_use]
    pub fn into_inner(self) -> Vec<Resource> {
        self.data
    }
}

impl Deref for ApiResponse {
    type Target = [Resource];

    fn deref(&self) -> &Self::Target {
        &self.data
    }
}

impl<I: SliceIndex<[Resource]>> Index<I> for ApiResponse {
    type Output = I::Output;

    fn index(&self, index: I) -> &Self::Output {
        &self.data[index]
    }
}

impl IntoIterator for ApiResponse {
    type Item = Resource;
    type IntoIter = std::vec::IntoIter<Resource>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.into_iter()
    }
}

impl<'a> IntoIterator for &'a ApiResponse {
    type Item = &'a Resource;
    type IntoIter = std::slice::Iter<'a, Resource>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.iter()
    }
}
