//! Option lists published by the filter-options service.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::filter_map::FilterMap;
use crate::key::FilterKey;
use crate::value::FilterValue;

/// One selectable choice for a dimension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOption {
    pub id: FilterValue,
    pub label: String,
}

impl FilterOption {
    pub fn new(id: impl Into<FilterValue>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

/// Ordered choices for one dimension. Order is the server's order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OptionSet(Vec<FilterOption>);

impl OptionSet {
    pub fn new(options: Vec<FilterOption>) -> Self {
        Self(options)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FilterOption> {
        self.0.iter()
    }

    pub fn contains(&self, id: &FilterValue) -> bool {
        self.0.iter().any(|option| &option.id == id)
    }

    /// Label for `id`, if it is one of the choices.
    pub fn label_of(&self, id: &FilterValue) -> Option<&str> {
        self.0
            .iter()
            .find(|option| &option.id == id)
            .map(|option| option.label.as_str())
    }
}

impl FromIterator<FilterOption> for OptionSet {
    fn from_iter<I: IntoIterator<Item = FilterOption>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Option lists for every option-bearing dimension.
///
/// A dimension with no entry has no published choices.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterOptions(BTreeMap<FilterKey, OptionSet>);

impl FilterOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: FilterKey) -> Option<&OptionSet> {
        self.0.get(&key)
    }

    /// Replace the list for `key`. Returns the previous list.
    pub fn set(&mut self, key: FilterKey, options: OptionSet) -> Option<OptionSet> {
        self.0.insert(key, options)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FilterKey, &OptionSet)> {
        self.0.iter().map(|(key, set)| (*key, set))
    }

    #[must_use]
    pub fn with(mut self, key: FilterKey, options: OptionSet) -> Self {
        self.set(key, options);
        self
    }
}

/// The parent selections that determine which option lists are valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OptionScope {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub faculty_id: Option<FilterValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department_id: Option<FilterValue>,
}

impl OptionScope {
    /// The unscoped scope: every list at its root.
    pub fn root() -> Self {
        Self::default()
    }

    pub fn is_root(&self) -> bool {
        self.faculty_id.is_none() && self.department_id.is_none()
    }

    /// Scope implied by the current selection.
    pub fn from_filters(filters: &FilterMap) -> Self {
        Self {
            faculty_id: filters.get(FilterKey::FacultyId).cloned(),
            department_id: filters.get(FilterKey::DepartmentId).cloned(),
        }
    }

    /// Query pairs for the options service, in a stable order.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::with_capacity(2);
        if let Some(faculty) = &self.faculty_id {
            pairs.push((FilterKey::FacultyId.as_str(), faculty.to_string()));
        }
        if let Some(department) = &self.department_id {
            pairs.push((FilterKey::DepartmentId.as_str(), department.to_string()));
        }
        pairs
    }
}
