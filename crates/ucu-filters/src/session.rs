//! Lifecycle of one mounted analytics page.

use std::fmt;
use std::sync::Arc;

use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use ucu_model::{FilterKey, FilterMap, FilterOptions, FilterValue, OptionScope, PageState};
use ucu_persistence::{KeyValueStore, PersistenceAdapter};

use crate::error::Result;
use crate::loader::{LoadOutcome, OptionsLoader, OptionsSource};
use crate::search::classify_search;
use crate::store::{FilterStore, SubscriptionId};

/// Where a page is in its mount lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagePhase {
    Unmounted,
    /// Reading the saved snapshot.
    Mounting,
    /// Store active, changes are saved as they happen.
    Live,
    /// Tearing down. Nothing is saved on the way out.
    Unmounting,
}

impl fmt::Display for PagePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PagePhase::Unmounted => "unmounted",
            PagePhase::Mounting => "mounting",
            PagePhase::Live => "live",
            PagePhase::Unmounting => "unmounting",
        };
        f.write_str(name)
    }
}

/// One page's filter store, wired to persistence and option loading.
///
/// Every committed change (filter, tab, drilldown or search term) is written
/// through the adapter immediately. A failed save is logged and otherwise
/// ignored; the live state stays authoritative.
pub struct PageSession<S, K> {
    page: String,
    phase: PagePhase,
    store: FilterStore,
    active_tab: Option<String>,
    drilldown: Option<String>,
    search_term: String,
    adapter: PersistenceAdapter<K>,
    loader: Arc<OptionsLoader<S>>,
}

impl<S, K> PageSession<S, K>
where
    S: OptionsSource + 'static,
    K: KeyValueStore,
{
    /// Mount `page`, restoring its saved state over `defaults`.
    pub fn mount(
        page: impl Into<String>,
        adapter: PersistenceAdapter<K>,
        loader: Arc<OptionsLoader<S>>,
        defaults: PageState,
    ) -> Self {
        let page = page.into();
        let mut session = Self {
            page,
            phase: PagePhase::Unmounted,
            store: FilterStore::default(),
            active_tab: None,
            drilldown: None,
            search_term: String::new(),
            adapter,
            loader,
        };

        session.enter(PagePhase::Mounting);
        let restored = session.adapter.load(&session.page, defaults);
        session.store.restore(restored.filters);
        session.active_tab = restored.active_tab;
        session.drilldown = restored.drilldown;
        session.search_term = restored.search_term;
        session.enter(PagePhase::Live);

        tracing::info!(
            page = %session.page,
            filters = session.store.filters().len(),
            "Mounted page"
        );
        session
    }

    pub fn page(&self) -> &str {
        &self.page
    }

    pub fn phase(&self) -> PagePhase {
        self.phase
    }

    pub fn store(&self) -> &FilterStore {
        &self.store
    }

    pub fn filters(&self) -> FilterMap {
        self.store.get()
    }

    pub fn options(&self) -> &FilterOptions {
        self.store.options()
    }

    pub fn active_tab(&self) -> Option<&str> {
        self.active_tab.as_deref()
    }

    pub fn drilldown(&self) -> Option<&str> {
        self.drilldown.as_deref()
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    /// The current state as it would be persisted.
    pub fn state(&self) -> PageState {
        PageState {
            filters: self.store.get(),
            active_tab: self.active_tab.clone(),
            drilldown: self.drilldown.clone(),
            search_term: self.search_term.clone(),
        }
    }

    /// Set or clear one filter, cascading to its dependents.
    pub fn set_filter(&mut self, key: FilterKey, value: Option<FilterValue>) -> FilterMap {
        let before = self.store.get();
        let after = self.store.set(key, value);
        if after != before {
            self.save();
        }
        after
    }

    /// [`set_filter`](Self::set_filter) with a key given by name.
    ///
    /// # Errors
    ///
    /// [`FilterError::InvalidKey`](crate::FilterError::InvalidKey) for an
    /// unknown key; nothing is changed or saved.
    pub fn set_filter_by_name(&mut self, name: &str, value: Option<FilterValue>) -> Result<FilterMap> {
        let key: FilterKey = name.parse()?;
        Ok(self.set_filter(key, value))
    }

    pub fn set_tab(&mut self, tab: Option<String>) {
        if self.active_tab != tab {
            self.active_tab = tab;
            self.save();
        }
    }

    pub fn set_drilldown(&mut self, drilldown: Option<String>) {
        if self.drilldown != drilldown {
            self.drilldown = drilldown;
            self.save();
        }
    }

    /// Update the search box text without applying it as a filter.
    pub fn set_search_term(&mut self, term: impl Into<String>) {
        let term = term.into();
        if self.search_term != term {
            self.search_term = term;
            self.save();
        }
    }

    /// Apply a search term: store it and set the filter its shape selects.
    ///
    /// Only one search-derived key is active at a time, so the other two are
    /// cleared in the same commit. A blank term clears all three.
    pub fn search(&mut self, term: &str) -> FilterMap {
        let before = self.state();
        let classified = classify_search(term);

        let changes = FilterKey::ALL
            .into_iter()
            .filter(|key| key.is_search_derived())
            .map(|key| match &classified {
                Some((selected, value)) if *selected == key => (key, Some(value.clone())),
                _ => (key, None),
            });
        let filters = self.store.set_many(changes);
        self.search_term = term.trim().to_string();

        if let Some((key, _)) = &classified {
            tracing::debug!(page = %self.page, %key, "Applied search term");
        }
        if self.state() != before {
            self.save();
        }
        filters
    }

    /// Drop every filter and the search term, resetting options to root.
    ///
    /// Tab and drilldown are kept.
    pub fn clear_all(&mut self) {
        let before = self.state();
        self.store.clear_all();
        self.search_term.clear();
        if self.state() != before {
            self.save();
        }
    }

    /// Set the unscoped option lists restored by [`clear_all`](Self::clear_all).
    pub fn set_root_options(&mut self, options: FilterOptions) {
        self.store.set_root_options(options);
    }

    /// The option scope of the current selection.
    pub fn scope(&self) -> OptionScope {
        self.store.scope()
    }

    /// Start loading options for the current scope.
    ///
    /// The scope is captured now, so the future can be driven elsewhere and
    /// its outcome handed back through [`apply_options`](Self::apply_options).
    pub fn options_request(&self) -> BoxFuture<'static, LoadOutcome> {
        let loader = Arc::clone(&self.loader);
        let scope = self.store.scope();
        async move { loader.load(scope).await }.boxed()
    }

    /// Apply a loader outcome. Returns whether the option lists changed.
    pub fn apply_options(&mut self, outcome: LoadOutcome) -> bool {
        if let LoadOutcome::Failed { error, .. } = &outcome {
            tracing::warn!(page = %self.page, %error, "{}", error.user_message());
        }
        self.store.apply_load(outcome)
    }

    /// Load and apply options for the current scope.
    pub async fn refresh_options(&mut self) -> bool {
        let outcome = self.options_request().await;
        self.apply_options(outcome)
    }

    pub fn subscribe(&mut self, callback: impl FnMut(&FilterMap) + 'static) -> SubscriptionId {
        self.store.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.store.unsubscribe(id)
    }

    /// Tear the page down and return its final state.
    ///
    /// The saved snapshot is left as the last committed change wrote it.
    pub fn unmount(mut self) -> PageState {
        self.enter(PagePhase::Unmounting);
        let state = self.state();
        self.enter(PagePhase::Unmounted);
        tracing::info!(page = %self.page, "Unmounted page");
        state
    }

    fn enter(&mut self, phase: PagePhase) {
        tracing::trace!(page = %self.page, from = %self.phase, to = %phase, "Page phase change");
        self.phase = phase;
    }

    fn save(&self) {
        if let Err(e) = self.adapter.save(&self.page, &self.state()) {
            tracing::warn!(page = %self.page, error = %e, "Failed to save page state");
        }
    }
}

impl<S, K> fmt::Debug for PageSession<S, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageSession")
            .field("page", &self.page)
            .field("phase", &self.phase)
            .field("store", &self.store)
            .field("active_tab", &self.active_tab)
            .field("drilldown", &self.drilldown)
            .field("search_term", &self.search_term)
            .finish_non_exhaustive()
    }
}
