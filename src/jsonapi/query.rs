//! Query-parameter encoding for JSON:API reads.
//!
//! This module turns filters, includes, sparse fieldsets, and a page number
//! into the bracketed query parameters the API expects:
//!
//! - `filter[key]=value` for every filter
//! - `include=a,b.c` with full dotted paths
//! - `fields[type]=x,y` with hyphenated type names
//! - `page[number]=N&page[size]=100`
//!
//! # Include Augmentation
//!
//! A sparse fieldset hides every attribute and relationship not listed, so
//! an included relationship must also appear in the primary type's field
//! list or the server will not return its linkage. For every include path
//! the first segment (`"campaign"` for `"campaign.advertiser"`) is appended
//! to the primary fieldset if missing. When no fieldset is requested at
//! all, nothing is sent and the server returns its defaults.
//!
//! # Example
//!
//! ```rust
//! use placements_io::jsonapi::Query;
//!
//! let query = Query::new()
//!     .filter("archived", false)
//!     .include("campaign.advertiser")
//!     .fields(["name"]);
//!
//! let params = query.encode("line_items", 1);
//! assert_eq!(params["filter[archived]"], "false");
//! assert_eq!(params["include"], "campaign.advertiser");
//! assert_eq!(params["fields[line-items]"], "name,campaign");
//! assert_eq!(params["page[number]"], "1");
//! assert_eq!(params["page[size]"], "100");
//! ```

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, TimeZone};
use serde_json::Value;

use crate::clients::query_value;
use crate::jsonapi::datetime;

/// Number of records requested per page.
pub const PAGE_SIZE: u32 = 100;

/// Sparse fieldset selection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Fields {
    /// Fields of the primary service.
    List(Vec<String>),
    /// Fields per resource type; keys may use underscores or hyphens.
    ByType(BTreeMap<String, Vec<String>>),
}

impl Fields {
    /// Creates a flat field list for the primary service.
    pub fn list<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::List(fields.into_iter().map(Into::into).collect())
    }

    /// Creates a per-type field mapping.
    pub fn by_type<I, K, F, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, F)>,
        K: Into<String>,
        F: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::ByType(
            entries
                .into_iter()
                .map(|(kind, fields)| (kind.into(), fields.into_iter().map(Into::into).collect()))
                .collect(),
        )
    }

    /// Returns `true` if no field is selected at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::List(list) => list.is_empty(),
            Self::ByType(map) => map.is_empty(),
        }
    }
}

impl<S: Into<String>> FromIterator<S> for Fields {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::list(iter)
    }
}

/// Filters, includes, and sparse fieldsets for a collection read.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Query {
    filters: BTreeMap<String, Value>,
    includes: Vec<String>,
    fields: Option<Fields>,
}

impl Query {
    /// Creates an empty query.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a filter; the value is serialized by the transport.
    #[must_use]
    pub fn filter(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.insert(key.into(), value.into());
        self
    }

    /// Adds a date/time filter in the API's wire format.
    #[must_use]
    pub fn filter_datetime<Tz>(self, key: impl Into<String>, value: &DateTime<Tz>) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        self.filter(key, datetime::to_wire(value))
    }

    /// Adds a relationship path to include.
    #[must_use]
    pub fn include(mut self, path: impl Into<String>) -> Self {
        self.includes.push(path.into());
        self
    }

    /// Adds several relationship paths to include.
    #[must_use]
    pub fn includes<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.includes.extend(paths.into_iter().map(Into::into));
        self
    }

    /// Sets the sparse fieldset selection.
    #[must_use]
    pub fn fields(mut self, fields: impl Into<Fields>) -> Self {
        self.fields = Some(fields.into());
        self
    }

    /// Returns the filters.
    #[must_use]
    pub const fn filters(&self) -> &BTreeMap<String, Value> {
        &self.filters
    }

    /// Returns the include paths.
    #[must_use]
    pub fn include_paths(&self) -> &[String] {
        &self.includes
    }

    /// Encodes the query for `service` at the given page number.
    ///
    /// For a nested path such as `rate_cards/992/product_rates`, the last
    /// segment names the primary type.
    #[must_use]
    pub fn encode(&self, service: &str, page: u64) -> HashMap<String, String> {
        let primary = resource_type(service);
        let mut params = filter_params(&self.filters);
        params.extend(include_params(&self.includes));
        if let Some(fields) = self.fields.as_ref().filter(|f| !f.is_empty()) {
            let fields = augment_fields(primary, fields, &self.includes);
            params.extend(fields_params(primary, &fields));
        }
        params.extend(page_params(page));
        params
    }
}

impl<S: Into<String>> From<Vec<S>> for Fields {
    fn from(fields: Vec<S>) -> Self {
        Self::list(fields)
    }
}

impl<S: Into<String>, const N: usize> From<[S; N]> for Fields {
    fn from(fields: [S; N]) -> Self {
        Self::list(fields)
    }
}

/// The JSON:API type of a service path: its last segment.
pub(crate) fn resource_type(service: &str) -> &str {
    service
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or(service)
}

/// Normalizes a resource type name to its hyphenated spelling.
#[must_use]
pub fn hyphenate(name: &str) -> String {
    name.replace('_', "-")
}

/// Encodes filters as `filter[key]=value`.
#[must_use]
pub fn filter_params(filters: &BTreeMap<String, Value>) -> HashMap<String, String> {
    filters
        .iter()
        .map(|(key, value)| (format!("filter[{key}]"), query_value(value)))
        .collect()
}

/// Encodes include paths as a single comma-joined `include` parameter.
#[must_use]
pub fn include_params(includes: &[String]) -> HashMap<String, String> {
    if includes.is_empty() {
        return HashMap::new();
    }
    HashMap::from([("include".to_string(), includes.join(","))])
}

/// Encodes pagination parameters.
#[must_use]
pub fn page_params(page: u64) -> HashMap<String, String> {
    HashMap::from([
        ("page[number]".to_string(), page.to_string()),
        ("page[size]".to_string(), PAGE_SIZE.to_string()),
    ])
}

/// Returns the deduplicated top-level segments of the include paths.
#[must_use]
pub fn top_level_includes(includes: &[String]) -> Vec<String> {
    let mut roots: Vec<String> = Vec::new();
    for path in includes {
        let root = path.split('.').next().unwrap_or_default();
        if !root.is_empty() && !roots.iter().any(|r| r == root) {
            roots.push(root.to_string());
        }
    }
    roots
}

/// Adds the top-level include segments to the primary service's fieldset.
///
/// A flat list is always augmented. A per-type mapping is augmented only on
/// the primary service's entry, and left alone when that entry is absent.
/// Mapping keys come back hyphenated.
#[must_use]
pub fn augment_fields(service: &str, fields: &Fields, includes: &[String]) -> Fields {
    let roots = top_level_includes(includes);
    match fields {
        Fields::List(list) => {
            let mut list = dedupe(list.iter().cloned());
            append_missing(&mut list, &roots);
            Fields::List(list)
        }
        Fields::ByType(map) => {
            let mut normalized: BTreeMap<String, Vec<String>> = BTreeMap::new();
            for (kind, list) in map {
                let entry = normalized.entry(hyphenate(kind)).or_default();
                append_missing(entry, list);
            }
            if let Some(primary) = normalized.get_mut(&hyphenate(service)) {
                append_missing(primary, &roots);
            }
            Fields::ByType(normalized)
        }
    }
}

/// Encodes a fieldset as `fields[type]=a,b` parameters.
#[must_use]
pub fn fields_params(service: &str, fields: &Fields) -> HashMap<String, String> {
    match fields {
        Fields::List(list) if list.is_empty() => HashMap::new(),
        Fields::List(list) => {
            HashMap::from([(format!("fields[{}]", hyphenate(service)), list.join(","))])
        }
        Fields::ByType(map) => map
            .iter()
            .map(|(kind, list)| (format!("fields[{}]", hyphenate(kind)), list.join(",")))
            .collect(),
    }
}

fn dedupe(items: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut out = Vec::new();
    append_missing(&mut out, &items.into_iter().collect::<Vec<_>>());
    out
}

fn append_missing(target: &mut Vec<String>, items: &[String]) {
    for item in items {
        if !target.contains(item) {
            target.push(item.clone());
        }
    }
}
