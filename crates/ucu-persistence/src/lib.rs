//! Durable storage for per-page dashboard state.
//!
//! Every analytics page keeps its filters, active tab, drilldown choice and
//! search term in a key/value slot so a returning user lands where they left.
//!
//! # Features
//!
//! - **Last write wins**: every save overwrites the slot, no merging
//! - **Never fails a load**: missing or corrupted snapshots fall back to the
//!   caller's default state
//! - **Browser-compatible layout**: keys are `ucu_analytics_<page>_state` and
//!   values are the same JSON the web front end writes
//! - **Atomic file writes** for the on-disk store
//!
//! # Stored format
//!
//! ```text
//! key:   ucu_analytics_senate_finance_state
//! value: {"filters":{"faculty_id":"7"},"tab":null,"drilldown":"overall",
//!         "searchTerm":"","timestamp":"2026-01-05T09:12:44Z"}
//! ```
//!
//! # Example
//!
//! ```ignore
//! use ucu_persistence::{MemoryStore, PersistenceAdapter};
//! use ucu_model::PageState;
//!
//! let adapter = PersistenceAdapter::new(MemoryStore::new());
//! adapter.save("hod_dashboard", &state)?;
//! let restored = adapter.load("hod_dashboard", PageState::default());
//! ```

mod adapter;
mod error;
mod store;

pub use adapter::{DEFAULT_KEY_PREFIX, PersistenceAdapter};
pub use error::{PersistenceError, Result};
pub use store::{FileStore, KeyValueStore, MemoryStore};
