//! Cascading filter state for the analytics pages.
//!
//! Every analytics page is driven by one filter selection spanning dependent
//! dimensions (faculty, then department, then program) and independent ones
//! (semester, intake year, gender, search-derived keys). This crate keeps that
//! selection coherent:
//!
//! - `cascade` - which dependent keys a change invalidates
//! - `FilterStore` - the live selection, option lists and subscribers
//! - `OptionsLoader` - scope-keyed option fetches with in-flight coalescing
//!   and a stale-response guard
//! - `PageSession` - mount/restore, save-on-change and teardown for one page
//!
//! Control flow for one user interaction:
//!
//! ```text
//! set(key, value) -> cascade::resolve -> clear children -> notify subscribers
//!                 -> save PageState -> OptionsLoader::load(scope) -> apply options
//! ```

pub mod auth;
pub mod cascade;
mod error;
pub mod loader;
pub mod search;
mod session;
mod store;

pub use auth::{StaticToken, TokenProvider};
pub use error::{FilterError, LoadError, Result};
pub use loader::{HttpOptionsSource, LoadOutcome, LoaderConfig, OptionsLoader, OptionsSource};
pub use search::classify_search;
pub use session::{PagePhase, PageSession};
pub use store::{FilterStore, SubscriptionId};

pub use ucu_model::{
    FilterKey, FilterMap, FilterOption, FilterOptions, FilterValue, OptionScope, OptionSet,
    PageState,
};
