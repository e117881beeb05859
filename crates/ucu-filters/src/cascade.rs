//! Dependency graph between filter dimensions.
//!
//! Changing or clearing a parent invalidates every descendant:
//!
//! ```text
//! faculty_id ──> department_id ──> program_id
//!      └──────────────────────────────^
//! ```
//!
//! Keys outside the graph (semester, intake year, high school, gender and the
//! search-derived keys) are never invalidated. Setting a child while its parent
//! is unset is allowed and cascades nothing.

use std::collections::{BTreeSet, VecDeque};

use ucu_model::{FilterKey, FilterMap};

/// Static `parent -> children` edges.
pub const DEPENDENCY_EDGES: &[(FilterKey, &[FilterKey])] = &[
    (
        FilterKey::FacultyId,
        &[FilterKey::DepartmentId, FilterKey::ProgramId],
    ),
    (FilterKey::DepartmentId, &[FilterKey::ProgramId]),
];

/// Direct children of `key`.
pub fn children(key: FilterKey) -> &'static [FilterKey] {
    for (parent, children) in DEPENDENCY_EDGES {
        if *parent == key {
            return *children;
        }
    }
    &[]
}

/// Every key reachable from `key`, without duplicates, nearest first.
pub fn descendants(key: FilterKey) -> Vec<FilterKey> {
    let mut found: Vec<FilterKey> = Vec::new();
    let mut queue: VecDeque<FilterKey> = children(key).iter().copied().collect();
    while let Some(next) = queue.pop_front() {
        if next == key || found.contains(&next) {
            continue;
        }
        found.push(next);
        queue.extend(children(next).iter().copied());
    }
    found
}

/// Whether `key` is a parent or child in the dependency graph.
pub fn is_in_graph(key: FilterKey) -> bool {
    DEPENDENCY_EDGES
        .iter()
        .any(|(parent, children)| *parent == key || children.contains(&key))
}

/// Keys that must be cleared because `changed` was set or cleared.
///
/// Only descendants that currently hold a value are returned, so resolving
/// again after [`apply`] yields an empty set.
pub fn resolve(changed: FilterKey, filters: &FilterMap) -> BTreeSet<FilterKey> {
    descendants(changed)
        .into_iter()
        .filter(|key| filters.contains(*key))
        .collect()
}

/// Remove `invalidated` keys from `filters`. Returns how many were present.
pub fn apply(filters: &mut FilterMap, invalidated: &BTreeSet<FilterKey>) -> usize {
    let mut removed = 0;
    for key in invalidated {
        if filters.remove(*key).is_some() {
            removed += 1;
        }
    }
    removed
}
