//! The current filter selection.

use std::collections::BTreeMap;
use std::collections::btree_map;

use serde::{Deserialize, Deserializer, Serialize};

use crate::key::FilterKey;
use crate::value::FilterValue;

/// Mapping from [`FilterKey`] to a value. An absent key means "no constraint".
///
/// Empty values are never stored: [`FilterMap::insert`] with an empty value
/// removes the key instead. Identifier keys hold `"7"` and `7` as the same
/// value, [`FilterValue::Integer`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FilterMap(BTreeMap<FilterKey, FilterValue>);

impl FilterMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: FilterKey) -> Option<&FilterValue> {
        self.0.get(&key)
    }

    pub fn contains(&self, key: FilterKey) -> bool {
        self.0.contains_key(&key)
    }

    /// Store `value` under `key`, or remove the key when `value` is `None` or
    /// empty. Returns the previous value.
    pub fn insert(&mut self, key: FilterKey, value: Option<FilterValue>) -> Option<FilterValue> {
        match value.filter(|v| !v.is_empty()) {
            Some(value) if key.is_identifier() => self.0.insert(key, value.into_identifier()),
            Some(value) => self.0.insert(key, value),
            None => self.0.remove(&key),
        }
    }

    pub fn remove(&mut self, key: FilterKey) -> Option<FilterValue> {
        self.0.remove(&key)
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of keys holding a value (the "N active" badge).
    pub fn active_count(&self) -> usize {
        self.0.len()
    }

    pub fn keys(&self) -> impl Iterator<Item = FilterKey> + '_ {
        self.0.keys().copied()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, FilterKey, FilterValue> {
        self.0.iter()
    }

    /// Builder-style insert, mostly for tests and fixtures.
    #[must_use]
    pub fn with(mut self, key: FilterKey, value: impl Into<FilterValue>) -> Self {
        self.insert(key, Some(value.into()));
        self
    }
}

impl<'de> Deserialize<'de> for FilterMap {
    /// Snapshots written by the browser front end keep cleared keys as `null`
    /// or `""`. Both are dropped on the way in.
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = BTreeMap::<FilterKey, Option<FilterValue>>::deserialize(deserializer)?;
        let mut map = FilterMap::new();
        for (key, value) in raw {
            map.insert(key, value);
        }
        Ok(map)
    }
}

impl FromIterator<(FilterKey, FilterValue)> for FilterMap {
    fn from_iter<I: IntoIterator<Item = (FilterKey, FilterValue)>>(iter: I) -> Self {
        let mut map = FilterMap::new();
        for (key, value) in iter {
            map.insert(key, Some(value));
        }
        map
    }
}

impl<'a> IntoIterator for &'a FilterMap {
    type Item = (&'a FilterKey, &'a FilterValue);
    type IntoIter = btree_map::Iter<'a, FilterKey, FilterValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
