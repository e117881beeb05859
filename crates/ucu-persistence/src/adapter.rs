//! Page state save/load on top of a key/value store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use ucu_model::{FilterMap, PageState};

use crate::error::{PersistenceError, Result};
use crate::store::KeyValueStore;

/// Key prefix shared with the web front end.
pub const DEFAULT_KEY_PREFIX: &str = "ucu_analytics_";

const STATE_SUFFIX: &str = "_state";

/// Saves and restores [`PageState`] per page name.
///
/// Holds no live references to any page; it only reads and writes serialized
/// snapshots.
#[derive(Debug)]
pub struct PersistenceAdapter<K> {
    store: K,
    prefix: String,
}

/// What gets written: the page state plus the time of the write.
#[derive(Serialize)]
struct StoredPageStateRef<'a> {
    #[serde(flatten)]
    state: &'a PageState,
    timestamp: DateTime<Utc>,
}

/// What gets read back. Every field is optional so partial snapshots can be
/// completed from the caller's default.
#[derive(Deserialize)]
struct StoredPageState {
    #[serde(default)]
    filters: Option<FilterMap>,
    #[serde(default, deserialize_with = "present")]
    tab: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    drilldown: Option<Option<String>>,
    #[serde(default, rename = "searchTerm")]
    search_term: Option<String>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    timestamp: Option<DateTime<Utc>>,
}

/// Distinguishes an explicit `null` (`Some(None)`) from a missing field (`None`).
fn present<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// The timestamp is informational: anything unparseable reads as unknown.
fn lenient_timestamp<'de, D>(deserializer: D) -> std::result::Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(raw).ok())
}

impl StoredPageState {
    fn merge_onto(self, default: PageState) -> PageState {
        PageState {
            filters: self.filters.unwrap_or(default.filters),
            active_tab: self.tab.unwrap_or(default.active_tab),
            drilldown: self.drilldown.unwrap_or(default.drilldown),
            search_term: self.search_term.unwrap_or(default.search_term),
        }
    }
}

impl<K: KeyValueStore> PersistenceAdapter<K> {
    pub fn new(store: K) -> Self {
        Self::with_prefix(store, DEFAULT_KEY_PREFIX)
    }

    pub fn with_prefix(store: K, prefix: impl Into<String>) -> Self {
        Self {
            store,
            prefix: prefix.into(),
        }
    }

    pub fn store(&self) -> &K {
        &self.store
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Storage key for `page`: `<prefix><page>_state`.
    pub fn storage_key(&self, page: &str) -> String {
        format!("{}{page}{STATE_SUFFIX}", self.prefix)
    }

    /// Overwrite the stored snapshot for `page`.
    pub fn save(&self, page: &str, state: &PageState) -> Result<()> {
        let key = self.storage_key(page);
        let stored = StoredPageStateRef {
            state,
            timestamp: Utc::now(),
        };
        let json = serde_json::to_string(&stored)
            .map_err(|e| PersistenceError::Serialization { source: e })?;
        self.store.set(&key, &json)?;
        tracing::debug!(page, key = %key, "Saved page state");
        Ok(())
    }

    /// Restore the snapshot for `page`, or `default` if there is nothing
    /// usable. Never fails.
    pub fn load(&self, page: &str, default: PageState) -> PageState {
        match self.read(page) {
            Ok(Some(stored)) => {
                tracing::debug!(page, "Restored page state");
                stored.merge_onto(default)
            }
            Ok(None) => {
                tracing::debug!(page, "No saved page state, using defaults");
                default
            }
            Err(e) => {
                tracing::warn!(page, error = %e, "Failed to load page state, using defaults");
                default
            }
        }
    }

    /// Like [`load`](Self::load) but surfaces errors and misses. Missing
    /// fields are filled from `PageState::default()`.
    pub fn try_load(&self, page: &str) -> Result<Option<PageState>> {
        Ok(self
            .read(page)?
            .map(|stored| stored.merge_onto(PageState::default())))
    }

    /// When the snapshot for `page` was written, if known.
    pub fn saved_at(&self, page: &str) -> Result<Option<DateTime<Utc>>> {
        Ok(self.read(page)?.and_then(|stored| stored.timestamp))
    }

    /// Remove the stored snapshot for `page`.
    pub fn clear(&self, page: &str) -> Result<()> {
        let key = self.storage_key(page);
        self.store.remove(&key)?;
        tracing::info!(page, "Cleared saved page state");
        Ok(())
    }

    /// Names of pages with a stored snapshot under this prefix.
    pub fn pages(&self) -> Result<Vec<String>> {
        Ok(self
            .store
            .keys()?
            .into_iter()
            .filter_map(|key| {
                key.strip_prefix(&self.prefix)
                    .and_then(|rest| rest.strip_suffix(STATE_SUFFIX))
                    .filter(|page| !page.is_empty())
                    .map(str::to_string)
            })
            .collect())
    }

    fn read(&self, page: &str) -> Result<Option<StoredPageState>> {
        let key = self.storage_key(page);
        let Some(raw) = self.store.get(&key)? else {
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| PersistenceError::Deserialization { key, source: e })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use ucu_model::FilterKey;

    fn adapter() -> PersistenceAdapter<MemoryStore> {
        PersistenceAdapter::new(MemoryStore::new())
    }

    #[test]
    fn test_storage_key_layout() {
        assert_eq!(
            adapter().storage_key("senate_finance"),
            "ucu_analytics_senate_finance_state"
        );
    }

    #[test]
    fn test_load_missing_returns_default() {
        let default = PageState::default().with_drilldown("overall");
        assert_eq!(adapter().load("never_saved", default.clone()), default);
    }

    #[test]
    fn test_load_corrupted_returns_default() {
        let adapter = adapter();
        adapter
            .store()
            .set(&adapter.storage_key("dean"), "{not json")
            .unwrap();

        let default = PageState::default().with_tab("overview");
        assert_eq!(adapter.load("dean", default.clone()), default);
        assert!(matches!(
            adapter.try_load("dean"),
            Err(PersistenceError::Deserialization { .. })
        ));
    }

    #[test]
    fn test_partial_snapshot_takes_missing_fields_from_default() {
        let adapter = adapter();
        adapter
            .store()
            .set(
                &adapter.storage_key("senate_finance"),
                r#"{"filters":{"faculty_id":"3"},"drilldown":null}"#,
            )
            .unwrap();

        let default = PageState::default()
            .with_tab("payments")
            .with_drilldown("overall");
        let loaded = adapter.load("senate_finance", default);

        assert_eq!(
            loaded.filters,
            FilterMap::new().with(FilterKey::FacultyId, "3")
        );
        // Missing field: from default
        assert_eq!(loaded.active_tab.as_deref(), Some("payments"));
        // Explicit null: honoured
        assert_eq!(loaded.drilldown, None);
    }

    #[test]
    fn test_save_records_timestamp() {
        let adapter = adapter();
        let before = Utc::now();
        adapter.save("hr", &PageState::default()).unwrap();
        let saved_at = adapter.saved_at("hr").unwrap().unwrap();
        assert!(saved_at >= before);
    }

    #[test]
    fn test_malformed_timestamp_keeps_filters() {
        let adapter = adapter();
        adapter
            .store()
            .set(
                &adapter.storage_key("dean"),
                r#"{"filters":{"gender":"F"},"timestamp":"last tuesday"}"#,
            )
            .unwrap();

        let loaded = adapter.load("dean", PageState::default());
        assert_eq!(loaded.filters, FilterMap::new().with(FilterKey::Gender, "F"));
        assert_eq!(adapter.saved_at("dean").unwrap(), None);
    }

    #[test]
    fn test_clear_and_pages() {
        let adapter = adapter();
        adapter.save("hod", &PageState::default()).unwrap();
        adapter.save("dean", &PageState::default()).unwrap();
        adapter.store().set("unrelated", "1").unwrap();

        assert_eq!(adapter.pages().unwrap(), vec!["dean", "hod"]);

        adapter.clear("hod").unwrap();
        assert_eq!(adapter.pages().unwrap(), vec!["dean"]);
        assert_eq!(adapter.try_load("hod").unwrap(), None);
    }
}
