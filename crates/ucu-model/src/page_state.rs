//! Per-page persisted state.

use serde::{Deserialize, Serialize};

use crate::filter_map::FilterMap;

/// Everything a page restores on remount.
///
/// Field names on the wire match the browser snapshot format
/// (`filters`, `tab`, `drilldown`, `searchTerm`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageState {
    pub filters: FilterMap,
    #[serde(rename = "tab")]
    pub active_tab: Option<String>,
    pub drilldown: Option<String>,
    #[serde(rename = "searchTerm")]
    pub search_term: String,
}

impl PageState {
    pub fn new(filters: FilterMap) -> Self {
        Self {
            filters,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_tab(mut self, tab: impl Into<String>) -> Self {
        self.active_tab = Some(tab.into());
        self
    }

    #[must_use]
    pub fn with_drilldown(mut self, drilldown: impl Into<String>) -> Self {
        self.drilldown = Some(drilldown.into());
        self
    }

    #[must_use]
    pub fn with_search_term(mut self, term: impl Into<String>) -> Self {
        self.search_term = term.into();
        self
    }
}
