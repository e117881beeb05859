//! Scope-keyed loading of filter option lists.
//!
//! Provides:
//! - `OptionsSource` - the external filter-options collaborator
//! - `HttpOptionsSource` - the REST implementation of it
//! - `OptionsLoader` - coalesces identical pending requests and discards
//!   responses for scopes that are no longer the latest requested

mod http;
mod source;
mod wire;

use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::sync::{Mutex, MutexGuard, PoisonError};

use futures_util::FutureExt;
use futures_util::future::{BoxFuture, Shared};
use lru::LruCache;
use ucu_model::{FilterOptions, OptionScope};

use crate::error::LoadError;

pub use http::{FILTER_OPTIONS_PATH, HttpOptionsSource};
pub use source::OptionsSource;
pub use wire::FilterOptionsResponse;

type PendingFetch = Shared<BoxFuture<'static, Result<FilterOptions, LoadError>>>;

/// Loader tuning.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoaderConfig {
    /// Number of scopes whose last successful response is kept.
    ///
    /// `0` disables caching: every `load` performs one request.
    pub cache_capacity: usize,
}

impl LoaderConfig {
    pub fn with_cache(capacity: usize) -> Self {
        Self {
            cache_capacity: capacity,
        }
    }
}

/// How a single `load` call settled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Fresh option lists for the latest requested scope.
    Loaded {
        scope: OptionScope,
        options: FilterOptions,
    },
    /// A newer scope was requested while this one was pending. Discard.
    Superseded { scope: OptionScope },
    /// The request failed. Previous option lists stay in place.
    Failed {
        scope: OptionScope,
        error: LoadError,
    },
}

impl LoadOutcome {
    pub fn scope(&self) -> &OptionScope {
        match self {
            LoadOutcome::Loaded { scope, .. }
            | LoadOutcome::Superseded { scope }
            | LoadOutcome::Failed { scope, .. } => scope,
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, LoadOutcome::Loaded { .. })
    }
}

struct InFlight {
    fetch: PendingFetch,
    waiters: usize,
}

struct LoaderState {
    latest: Option<OptionScope>,
    in_flight: HashMap<OptionScope, InFlight>,
    cache: Option<LruCache<OptionScope, FilterOptions>>,
    requests_sent: u64,
}

/// Loads option lists for a scope through an [`OptionsSource`].
///
/// At most one request per scope is pending at any time; a second `load` for
/// the same scope awaits the first. Every `load` marks its scope as the latest
/// requested one, and a response that settles after a different scope was
/// requested comes back as [`LoadOutcome::Superseded`].
pub struct OptionsLoader<S> {
    source: S,
    state: Mutex<LoaderState>,
}

impl<S: OptionsSource> OptionsLoader<S> {
    pub fn new(source: S, config: LoaderConfig) -> Self {
        let cache = NonZeroUsize::new(config.cache_capacity).map(LruCache::new);
        Self {
            source,
            state: Mutex::new(LoaderState {
                latest: None,
                in_flight: HashMap::new(),
                cache,
                requests_sent: 0,
            }),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// The scope of the most recent `load` call.
    pub fn latest_scope(&self) -> Option<OptionScope> {
        self.lock().latest.clone()
    }

    /// Number of requests actually handed to the source.
    pub fn requests_sent(&self) -> u64 {
        self.lock().requests_sent
    }

    /// Whether a request for `scope` is pending.
    pub fn is_pending(&self, scope: &OptionScope) -> bool {
        self.lock().in_flight.contains_key(scope)
    }

    /// Load option lists for `scope`.
    ///
    /// Never fails past this boundary: errors come back as
    /// [`LoadOutcome::Failed`].
    pub async fn load(&self, scope: OptionScope) -> LoadOutcome {
        let pending = {
            let mut state = self.lock();
            state.latest = Some(scope.clone());

            if let Some(options) = state.cache.as_mut().and_then(|cache| cache.get(&scope)) {
                tracing::debug!(?scope, "Filter options served from cache");
                return LoadOutcome::Loaded {
                    scope,
                    options: options.clone(),
                };
            }

            match state.in_flight.get_mut(&scope) {
                Some(entry) => {
                    tracing::debug!(?scope, "Joining pending filter options request");
                    entry.waiters += 1;
                    entry.fetch.clone()
                }
                None => {
                    tracing::debug!(?scope, "Requesting filter options");
                    let fetch = self.source.fetch(&scope).shared();
                    state.in_flight.insert(
                        scope.clone(),
                        InFlight {
                            fetch: fetch.clone(),
                            waiters: 1,
                        },
                    );
                    state.requests_sent += 1;
                    fetch
                }
            }
        };

        let mut waiter = Waiter {
            state: &self.state,
            scope: &scope,
            fetch: pending,
            settled: false,
        };
        let result = waiter.fetch.clone().await;
        waiter.settled = true;
        drop(waiter);

        let mut state = self.lock();
        if let (Ok(options), Some(cache)) = (&result, state.cache.as_mut()) {
            cache.put(scope.clone(), options.clone());
        }

        if state.latest.as_ref() != Some(&scope) {
            tracing::debug!(?scope, "Discarding filter options for superseded scope");
            return LoadOutcome::Superseded { scope };
        }

        match result {
            Ok(options) => LoadOutcome::Loaded { scope, options },
            Err(error) => {
                tracing::warn!(?scope, %error, "Failed to load filter options");
                LoadOutcome::Failed { scope, error }
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, LoaderState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// One `load` call's claim on an in-flight request.
///
/// A settled request leaves the map on the first waiter's return. An unsettled
/// one leaves when its last waiter is dropped, so the next `load` starts over.
struct Waiter<'a> {
    state: &'a Mutex<LoaderState>,
    scope: &'a OptionScope,
    fetch: PendingFetch,
    settled: bool,
}

impl Drop for Waiter<'_> {
    fn drop(&mut self) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let Some(entry) = state.in_flight.get_mut(self.scope) else {
            return;
        };
        if !entry.fetch.ptr_eq(&self.fetch) {
            return;
        }
        entry.waiters = entry.waiters.saturating_sub(1);
        if self.settled || entry.waiters == 0 {
            if !self.settled {
                tracing::debug!(scope = ?self.scope, "Dropping abandoned filter options request");
            }
            state.in_flight.remove(self.scope);
        }
    }
}

impl<S> std::fmt::Debug for OptionsLoader<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OptionsLoader").finish_non_exhaustive()
    }
}
