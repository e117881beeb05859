//! Core data model for the analytics dashboard filter state.
//!
//! - [`FilterKey`]: the closed set of filterable dimensions
//! - [`FilterValue`] / [`FilterMap`]: the current selection
//! - [`FilterOption`] / [`OptionSet`] / [`FilterOptions`]: server-provided choices
//! - [`OptionScope`]: the parent selections that scope option lists
//! - [`PageState`]: the unit persisted per page

pub mod error;
pub mod filter_map;
pub mod key;
pub mod options;
pub mod page_state;
pub mod value;

pub use error::{ModelError, Result};
pub use filter_map::FilterMap;
pub use key::FilterKey;
pub use options::{FilterOption, FilterOptions, OptionScope, OptionSet};
pub use page_state::PageState;
pub use value::FilterValue;
