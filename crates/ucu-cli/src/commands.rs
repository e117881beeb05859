//! Command implementations, independent of argument parsing and printing.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use anyhow::{Context, Result, anyhow, bail};
use chrono::{DateTime, Utc};
use serde::Serialize;
use ucu_filters::{
    FilterKey, FilterOptions, FilterValue, HttpOptionsSource, LoadOutcome, LoaderConfig,
    OptionScope, OptionsLoader, OptionsSource, PageSession, PageState, StaticToken,
};
use ucu_persistence::{FileStore, PersistenceAdapter};

use crate::config::DashboardConfig;

/// One `key=value` argument. An empty value clears the key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub key: FilterKey,
    pub value: Option<FilterValue>,
}

impl FromStr for Assignment {
    type Err = anyhow::Error;

    fn from_str(input: &str) -> Result<Self> {
        let (key, value) = input
            .split_once('=')
            .ok_or_else(|| anyhow!("expected key=value, got '{input}'"))?;
        let key: FilterKey = key.parse()?;
        Ok(Self {
            key,
            value: FilterValue::parse_loose(value),
        })
    }
}

impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => write!(f, "{}={value}", self.key),
            None => write!(f, "{}=", self.key),
        }
    }
}

/// A stored page snapshot as shown to the user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SavedPage {
    pub page: String,
    #[serde(flatten)]
    pub state: PageState,
    pub saved_at: Option<DateTime<Utc>>,
}

/// Pretty JSON for `show --json`.
pub fn page_json(saved: &SavedPage) -> Result<String> {
    serde_json::to_string_pretty(saved).context("serialize page state")
}

/// Saved pages plus the options service, as configured.
pub struct Dashboard<S> {
    config: DashboardConfig,
    state_dir: PathBuf,
    loader: Arc<OptionsLoader<S>>,
}

impl Dashboard<HttpOptionsSource<StaticToken>> {
    /// Dashboard talking to the configured API with `token`.
    pub fn connect(config: DashboardConfig, token: Option<String>) -> Result<Self> {
        let source = HttpOptionsSource::new(
            &config.api_base_url,
            StaticToken::from_option(token),
            config.request_timeout(),
        )
        .context("create options client")?;
        Self::new(config, source)
    }
}

impl<S: OptionsSource + 'static> Dashboard<S> {
    pub fn new(config: DashboardConfig, source: S) -> Result<Self> {
        let state_dir = config.state_dir()?;
        let loader = OptionsLoader::new(
            source,
            LoaderConfig::with_cache(config.options_cache_capacity),
        );
        Ok(Self {
            config,
            state_dir,
            loader: Arc::new(loader),
        })
    }

    pub fn state_dir(&self) -> &Path {
        &self.state_dir
    }

    pub fn loader(&self) -> &OptionsLoader<S> {
        &self.loader
    }

    fn adapter(&self) -> Result<PersistenceAdapter<FileStore>> {
        let store = FileStore::open(&self.state_dir)
            .with_context(|| format!("open state directory {}", self.state_dir.display()))?;
        Ok(PersistenceAdapter::with_prefix(store, &self.config.key_prefix))
    }

    /// Mount `page` with its saved state.
    pub fn open_page(&self, page: &str) -> Result<PageSession<S, FileStore>> {
        let page = validate_page(page)?;
        Ok(PageSession::mount(
            page,
            self.adapter()?,
            Arc::clone(&self.loader),
            PageState::default(),
        ))
    }

    /// The stored snapshot for `page`, if any.
    pub fn show(&self, page: &str) -> Result<Option<SavedPage>> {
        let page = validate_page(page)?;
        let adapter = self.adapter()?;
        let Some(state) = adapter
            .try_load(page)
            .with_context(|| format!("read saved state for '{page}'"))?
        else {
            return Ok(None);
        };
        let saved_at = adapter.saved_at(page).unwrap_or_default();
        Ok(Some(SavedPage {
            page: page.to_string(),
            state,
            saved_at,
        }))
    }

    /// Apply `assignments` in order, cascading each, and save.
    pub fn set_filters(&self, page: &str, assignments: &[Assignment]) -> Result<PageState> {
        let mut session = self.open_page(page)?;
        for assignment in assignments {
            session.set_filter(assignment.key, assignment.value.clone());
        }
        Ok(session.unmount())
    }

    pub fn search(&self, page: &str, term: &str) -> Result<PageState> {
        let mut session = self.open_page(page)?;
        session.search(term);
        Ok(session.unmount())
    }

    pub fn set_tab(&self, page: &str, tab: Option<String>) -> Result<PageState> {
        let mut session = self.open_page(page)?;
        session.set_tab(tab.filter(|t| !t.trim().is_empty()));
        Ok(session.unmount())
    }

    pub fn set_drilldown(&self, page: &str, drilldown: Option<String>) -> Result<PageState> {
        let mut session = self.open_page(page)?;
        session.set_drilldown(drilldown.filter(|d| !d.trim().is_empty()));
        Ok(session.unmount())
    }

    /// Drop every filter and the search term, keeping tab and drilldown.
    pub fn reset_filters(&self, page: &str) -> Result<PageState> {
        let mut session = self.open_page(page)?;
        session.clear_all();
        Ok(session.unmount())
    }

    /// Remove the stored snapshot. Returns whether there was one.
    pub fn clear(&self, page: &str) -> Result<bool> {
        let page = validate_page(page)?;
        let adapter = self.adapter()?;
        let existed = adapter.pages()?.iter().any(|p| p == page);
        adapter
            .clear(page)
            .with_context(|| format!("clear saved state for '{page}'"))?;
        Ok(existed)
    }

    pub fn pages(&self) -> Result<Vec<String>> {
        Ok(self.adapter()?.pages()?)
    }

    /// Fetch option lists for `scope`.
    pub async fn options(&self, scope: OptionScope) -> Result<FilterOptions> {
        match self.loader.load(scope).await {
            LoadOutcome::Loaded { options, .. } => Ok(options),
            LoadOutcome::Failed { error, .. } => {
                bail!("{} ({error})", error.user_message())
            }
            LoadOutcome::Superseded { scope } => {
                bail!("request for {scope:?} was superseded")
            }
        }
    }
}

impl<S> fmt::Debug for Dashboard<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dashboard")
            .field("config", &self.config)
            .field("state_dir", &self.state_dir)
            .finish_non_exhaustive()
    }
}

/// Scope built from optional faculty/department arguments.
pub fn scope_from_args(faculty: Option<&str>, department: Option<&str>) -> OptionScope {
    OptionScope {
        faculty_id: faculty.and_then(FilterValue::parse_loose),
        department_id: department.and_then(FilterValue::parse_loose),
    }
}

fn validate_page(page: &str) -> Result<&str> {
    let page = page.trim();
    if page.is_empty() {
        bail!("page name must not be empty");
    }
    Ok(page)
}
