//! Included-resource merge.
//!
//! Rewrites relationship stubs (`{type, id}`) into full copies of the
//! matching sideloaded resources, recursively, so a flat JSON:API document
//! becomes a nested object graph.
//!
//! Each included resource is expanded once per merge call and the result is
//! reused wherever that resource is referenced from a primary resource.
//! Within one expansion a `(type, id)` is expanded at most once; later
//! references to it stay stubs. This keeps the output proportional to the
//! input even for densely cross-linked graphs, and it also stops cycles.
//! Stubs without a matching included resource are left untouched.

use std::collections::{HashMap, HashSet};

use crate::jsonapi::document::{RelationshipData, Resource};

type Key = (String, String);

/// Merges `included` resources into the relationships of `primary`.
///
/// List order is preserved at every level.
///
/// # Example
///
/// ```rust
/// use placements_io::jsonapi::{merge_included, Resource};
/// use serde_json::json;
///
/// let primary: Vec<Resource> = serde_json::from_value(json!([{
///     "type": "campaigns",
///     "id": "1",
///     "relationships": {"advertiser": {"data": {"type": "accounts", "id": "9"}}}
/// }])).unwrap();
/// let included: Vec<Resource> = serde_json::from_value(json!([
///     {"type": "accounts", "id": "9", "attributes": {"name": "X"}}
/// ])).unwrap();
///
/// let merged = merge_included(primary, &included);
/// let advertiser = merged[0].relationship("advertiser").unwrap().one().unwrap();
/// assert_eq!(advertiser.attribute("name"), Some(&json!("X")));
/// ```
#[must_use]
pub fn merge_included(primary: Vec<Resource>, included: &[Resource]) -> Vec<Resource> {
    if included.is_empty() {
        return primary;
    }

    let mut merger = Merger {
        lookup: included
            .iter()
            .filter_map(|resource| resource.identifier().map(|key| (owned(key), resource)))
            .collect(),
        expanded: HashMap::new(),
    };

    primary
        .into_iter()
        .map(|mut resource| {
            for target in targets_mut(&mut resource) {
                if let Some(full) = merger.expansion(target) {
                    *target = full;
                }
            }
            resource
        })
        .collect()
}

struct Merger<'a> {
    lookup: HashMap<Key, &'a Resource>,
    expanded: HashMap<Key, Resource>,
}

impl Merger<'_> {
    /// The expanded copy of the included resource `stub` refers to.
    fn expansion(&mut self, stub: &Resource) -> Option<Resource> {
        let key = stub.identifier().map(owned)?;
        if let Some(done) = self.expanded.get(&key) {
            return Some(done.clone());
        }
        let full = (*self.lookup.get(&key)?).clone();
        let tree = expand(full, &self.lookup, &mut HashSet::new());
        self.expanded.insert(key, tree.clone());
        Some(tree)
    }
}

fn owned((kind, id): (&str, &str)) -> Key {
    (kind.to_string(), id.to_string())
}

fn expand(
    mut resource: Resource,
    lookup: &HashMap<Key, &Resource>,
    visited: &mut HashSet<Key>,
) -> Resource {
    if let Some(key) = resource.identifier().map(owned) {
        visited.insert(key);
    }

    for target in targets_mut(&mut resource) {
        let Some(key) = target.identifier().map(owned) else {
            continue;
        };
        if visited.contains(&key) {
            continue;
        }
        if let Some(full) = lookup.get(&key) {
            *target = expand((*full).clone(), lookup, visited);
        }
    }
    resource
}

/// Every relationship target of `resource`, to-one and to-many alike.
fn targets_mut(resource: &mut Resource) -> impl Iterator<Item = &mut Resource> + '_ {
    resource
        .relationships
        .iter_mut()
        .flat_map(|relationships| relationships.values_mut())
        .filter_map(|relationship| relationship.data.as_mut())
        .flat_map(|data| match data {
            RelationshipData::One(target) => std::slice::from_mut(target.as_mut()),
            RelationshipData::Many(targets) => targets.as_mut_slice(),
        })
}
