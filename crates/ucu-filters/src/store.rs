//! The live filter selection for one mounted page.

use std::collections::BTreeSet;

use ucu_model::{FilterKey, FilterMap, FilterOptions, FilterValue, OptionScope, OptionSet};

use crate::cascade;
use crate::error::Result;
use crate::loader::LoadOutcome;

/// Handle returned by [`FilterStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber = Box<dyn FnMut(&FilterMap)>;

/// Owns the current [`FilterMap`] and option lists for a page.
///
/// Mutations run synchronously on the caller's thread. A mutation that leaves
/// the map different from before is a committed change: the cascade runs first,
/// then every subscriber is called once with the resulting map, in
/// registration order.
pub struct FilterStore {
    filters: FilterMap,
    options: FilterOptions,
    root_options: FilterOptions,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_subscription: u64,
}

impl Default for FilterStore {
    fn default() -> Self {
        Self::new(FilterOptions::default())
    }
}

impl FilterStore {
    /// Create an empty selection with `root_options` as the unscoped lists.
    pub fn new(root_options: FilterOptions) -> Self {
        Self {
            filters: FilterMap::new(),
            options: root_options.clone(),
            root_options,
            subscribers: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Snapshot of the current selection.
    pub fn get(&self) -> FilterMap {
        self.filters.clone()
    }

    /// Borrow the current selection without cloning.
    pub fn filters(&self) -> &FilterMap {
        &self.filters
    }

    pub fn value(&self, key: FilterKey) -> Option<&FilterValue> {
        self.filters.get(key)
    }

    /// Current option lists (scoped by the selected faculty/department).
    pub fn options(&self) -> &FilterOptions {
        &self.options
    }

    pub fn root_options(&self) -> &FilterOptions {
        &self.root_options
    }

    /// The scope the current option lists should match.
    pub fn scope(&self) -> OptionScope {
        OptionScope::from_filters(&self.filters)
    }

    /// Set `key` to `value`, or clear it when `value` is `None` or empty.
    ///
    /// Dependent keys are cleared before subscribers hear about the change.
    /// Clearing always cascades, even when `key` was already unset; setting
    /// `key` to the value it already holds does not. Returns the resulting
    /// selection.
    pub fn set(&mut self, key: FilterKey, value: Option<FilterValue>) -> FilterMap {
        self.set_many([(key, value)])
    }

    /// Apply several changes in order as one commit.
    ///
    /// Each change cascades onto the map left by the previous one. Subscribers
    /// are called at most once, with the final map.
    pub fn set_many<I>(&mut self, changes: I) -> FilterMap
    where
        I: IntoIterator<Item = (FilterKey, Option<FilterValue>)>,
    {
        let mut next = self.filters.clone();
        for (key, value) in changes {
            let previous = next.insert(key, value);
            if previous.is_some() && previous.as_ref() == next.get(key) {
                continue;
            }
            let invalidated = cascade::resolve(key, &next);
            cascade::apply(&mut next, &invalidated);
            if previous.is_some() || next.contains(key) || !invalidated.is_empty() {
                log_change(key, next.get(key), &invalidated);
            }
        }

        if next != self.filters {
            self.commit(next);
        }
        self.get()
    }

    /// [`set`](Self::set) for keys arriving as strings.
    ///
    /// # Errors
    ///
    /// [`FilterError::InvalidKey`](crate::FilterError::InvalidKey) if `name`
    /// is not a filter key. The selection is left untouched.
    pub fn set_by_name(&mut self, name: &str, value: Option<FilterValue>) -> Result<FilterMap> {
        let key: FilterKey = name.parse()?;
        Ok(self.set(key, value))
    }

    /// Replace the whole selection, e.g. when restoring a saved page.
    ///
    /// The map is taken as-is; no cascade runs.
    pub fn restore(&mut self, filters: FilterMap) {
        if self.filters != filters {
            self.commit(filters);
        }
    }

    /// Drop every filter and reset option lists to their unscoped state.
    ///
    /// Subscribers are notified even if nothing was selected.
    pub fn clear_all(&mut self) {
        self.options = self.root_options.clone();
        tracing::debug!(cleared = self.filters.len(), "Cleared all filters");
        self.commit(FilterMap::new());
    }

    /// Replace the option list for `key`. The selection is not touched.
    pub fn set_options(&mut self, key: FilterKey, options: OptionSet) {
        self.options.set(key, options);
    }

    /// Replace every option list at once.
    pub fn replace_options(&mut self, options: FilterOptions) {
        self.options = options;
    }

    /// Set the unscoped lists used by [`clear_all`](Self::clear_all).
    ///
    /// Also becomes the current lists while nothing is scoped.
    pub fn set_root_options(&mut self, options: FilterOptions) {
        if self.scope().is_root() {
            self.options = options.clone();
        }
        self.root_options = options;
    }

    /// Apply a loader result. Returns whether the option lists changed.
    ///
    /// Only `Loaded` results for the store's current scope are applied;
    /// anything else leaves the last good lists in place.
    pub fn apply_load(&mut self, outcome: LoadOutcome) -> bool {
        match outcome {
            LoadOutcome::Loaded { scope, options } => {
                if scope != self.scope() {
                    tracing::debug!(?scope, "Ignoring filter options for a scope no longer selected");
                    return false;
                }
                if scope.is_root() {
                    self.root_options = options.clone();
                }
                self.options = options;
                true
            }
            LoadOutcome::Superseded { .. } => false,
            LoadOutcome::Failed { scope, error } => {
                tracing::debug!(?scope, %error, "Keeping previous filter options");
                false
            }
        }
    }

    /// Register `callback` for every committed change.
    pub fn subscribe(&mut self, callback: impl FnMut(&FilterMap) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    /// Remove a subscriber. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(existing, _)| *existing != id);
        self.subscribers.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    fn commit(&mut self, next: FilterMap) {
        self.filters = next;
        for (_, subscriber) in &mut self.subscribers {
            subscriber(&self.filters);
        }
    }
}

fn log_change(key: FilterKey, value: Option<&FilterValue>, invalidated: &BTreeSet<FilterKey>) {
    match value {
        Some(value) => tracing::debug!(%key, %value, ?invalidated, "Filter set"),
        None => tracing::debug!(%key, ?invalidated, "Filter cleared"),
    }
}

impl std::fmt::Debug for FilterStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterStore")
            .field("filters", &self.filters)
            .field("options", &self.options)
            .field("subscribers", &self.subscribers.len())
            .finish_non_exhaustive()
    }
}
