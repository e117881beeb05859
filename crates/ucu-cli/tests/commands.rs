//! Command behavior against a temporary state directory.

use chrono::{TimeZone, Utc};
use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use tempfile::TempDir;
use ucu_cli::commands::{Assignment, Dashboard, SavedPage, page_json, scope_from_args};
use ucu_cli::config::DashboardConfig;
use ucu_filters::{
    FilterKey, FilterMap, FilterOption, FilterOptions, FilterValue, LoadError, OptionScope,
    OptionsSource, PageState,
};
use ucu_persistence::{FileStore, KeyValueStore, PersistenceAdapter};

/// Faculty list for the root scope, nothing otherwise. Fails when told to.
struct FixedSource {
    fail: bool,
}

impl OptionsSource for FixedSource {
    fn fetch(&self, scope: &OptionScope) -> BoxFuture<'static, Result<FilterOptions, LoadError>> {
        let fail = self.fail;
        let root = scope.is_root();
        async move {
            if fail {
                return Err(LoadError::Unauthorized { status: 401 });
            }
            let faculties = if root {
                vec![FilterOption::new(1, "Engineering"), FilterOption::new(2, "Law")]
            } else {
                Vec::new()
            };
            Ok(FilterOptions::new().with(FilterKey::FacultyId, faculties.into_iter().collect()))
        }
        .boxed()
    }
}

fn dashboard(dir: &TempDir) -> Dashboard<FixedSource> {
    dashboard_with(dir, DashboardConfig::default(), false)
}

fn dashboard_with(dir: &TempDir, config: DashboardConfig, fail: bool) -> Dashboard<FixedSource> {
    let config = DashboardConfig {
        storage_dir: Some(dir.path().to_path_buf()),
        ..config
    };
    Dashboard::new(config, FixedSource { fail }).unwrap()
}

fn assignments(args: &[&str]) -> Vec<Assignment> {
    args.iter().map(|arg| arg.parse().unwrap()).collect()
}

#[test]
fn test_set_applies_cascade_in_argument_order() {
    let dir = tempfile::tempdir().unwrap();
    let dashboard = dashboard(&dir);

    let state = dashboard
        .set_filters(
            "hod_dashboard",
            &assignments(&["faculty_id=7", "department_id=3", "gender=F", "faculty_id=9"]),
        )
        .unwrap();

    assert_eq!(
        state.filters,
        FilterMap::new()
            .with(FilterKey::FacultyId, 9)
            .with(FilterKey::Gender, "F")
    );

    let saved = dashboard.show("hod_dashboard").unwrap().unwrap();
    assert_eq!(saved.state, state);
    assert!(saved.saved_at.is_some());
}

#[test]
fn test_reselecting_faculty_saved_by_browser_keeps_department() {
    let dir = tempfile::tempdir().unwrap();
    let browser = PersistenceAdapter::new(FileStore::open(dir.path()).unwrap());
    browser
        .store()
        .set(
            &browser.storage_key("hod_dashboard"),
            r#"{"filters":{"faculty_id":"7","department_id":"3"},"tab":null,"drilldown":null,"searchTerm":""}"#,
        )
        .unwrap();

    let state = dashboard(&dir)
        .set_filters("hod_dashboard", &assignments(&["faculty_id=7"]))
        .unwrap();

    assert_eq!(
        state.filters,
        FilterMap::new()
            .with(FilterKey::FacultyId, 7)
            .with(FilterKey::DepartmentId, 3)
    );
}

#[test]
fn test_empty_value_clears_a_filter() {
    let dir = tempfile::tempdir().unwrap();
    let dashboard = dashboard(&dir);
    dashboard
        .set_filters("dean_grades", &assignments(&["semester_id=2", "intake_year=2024"]))
        .unwrap();

    let state = dashboard
        .set_filters("dean_grades", &assignments(&["semester_id="]))
        .unwrap();
    assert_eq!(state.filters, FilterMap::new().with(FilterKey::IntakeYear, 2024));
}

#[test]
fn test_search_tab_and_drilldown_are_kept_together() {
    let dir = tempfile::tempdir().unwrap();
    let dashboard = dashboard(&dir);
    dashboard.search("analyst_students", "21B12/345").unwrap();
    dashboard
        .set_tab("analyst_students", Some("grades".into()))
        .unwrap();
    let state = dashboard
        .set_drilldown("analyst_students", Some("course".into()))
        .unwrap();

    assert_eq!(
        state,
        PageState::new(FilterMap::new().with(FilterKey::RegNumber, "21B12/345"))
            .with_tab("grades")
            .with_drilldown("course")
            .with_search_term("21B12/345")
    );

    let state = dashboard.reset_filters("analyst_students").unwrap();
    assert!(state.filters.is_empty());
    assert_eq!(state.search_term, "");
    assert_eq!(state.active_tab.as_deref(), Some("grades"));
}

#[test]
fn test_blank_tab_clears_it() {
    let dir = tempfile::tempdir().unwrap();
    let dashboard = dashboard(&dir);
    dashboard.set_tab("hr_staff", Some("payroll".into())).unwrap();
    let state = dashboard.set_tab("hr_staff", Some("  ".into())).unwrap();
    assert_eq!(state.active_tab, None);
}

#[test]
fn test_pages_and_clear() {
    let dir = tempfile::tempdir().unwrap();
    let dashboard = dashboard(&dir);
    assert!(dashboard.pages().unwrap().is_empty());

    dashboard
        .set_filters("senate_overview", &assignments(&["gender=M"]))
        .unwrap();
    dashboard
        .set_filters("finance_payments", &assignments(&["intake_year=2023"]))
        .unwrap();
    assert_eq!(
        dashboard.pages().unwrap(),
        vec!["finance_payments".to_string(), "senate_overview".to_string()]
    );

    assert!(dashboard.clear("senate_overview").unwrap());
    assert!(!dashboard.clear("senate_overview").unwrap());
    assert!(dashboard.show("senate_overview").unwrap().is_none());
    assert_eq!(dashboard.pages().unwrap(), vec!["finance_payments".to_string()]);
}

#[test]
fn test_key_prefix_separates_dashboards() {
    let dir = tempfile::tempdir().unwrap();
    let staging = DashboardConfig {
        key_prefix: "ucu_staging_".to_string(),
        ..DashboardConfig::default()
    };
    dashboard_with(&dir, staging, false)
        .set_filters("dean_overview", &assignments(&["faculty_id=1"]))
        .unwrap();

    assert!(dashboard(&dir).pages().unwrap().is_empty());
}

#[test]
fn test_blank_page_name_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    assert!(dashboard(&dir).show("  ").is_err());
}

#[test]
fn test_show_json_layout() {
    let saved = SavedPage {
        page: "dean_overview".to_string(),
        state: PageState::new(
            FilterMap::new()
                .with(FilterKey::FacultyId, 7)
                .with(FilterKey::Gender, "F"),
        )
        .with_tab("trends"),
        saved_at: Some(Utc.with_ymd_and_hms(2025, 3, 1, 8, 30, 0).unwrap()),
    };

    insta::assert_snapshot!(page_json(&saved).unwrap(), @r#"
    {
      "page": "dean_overview",
      "filters": {
        "faculty_id": 7,
        "gender": "F"
      },
      "tab": "trends",
      "drilldown": null,
      "searchTerm": "",
      "saved_at": "2025-03-01T08:30:00Z"
    }
    "#);
}

#[tokio::test]
async fn test_options_for_root_scope() {
    let dir = tempfile::tempdir().unwrap();
    let dashboard = dashboard(&dir);
    let options = dashboard.options(scope_from_args(None, None)).await.unwrap();

    let faculties = options.get(FilterKey::FacultyId).unwrap();
    assert_eq!(faculties.label_of(&FilterValue::from(2)), Some("Law"));
}

#[tokio::test]
async fn test_options_failure_explains_itself() {
    let dir = tempfile::tempdir().unwrap();
    let dashboard = dashboard_with(&dir, DashboardConfig::default(), true);
    let error = dashboard
        .options(scope_from_args(Some("3"), None))
        .await
        .unwrap_err();
    assert!(error.to_string().contains("sign in again"), "{error}");
}

#[tokio::test]
async fn test_options_cache_avoids_repeat_requests() {
    let dir = tempfile::tempdir().unwrap();
    let config = DashboardConfig {
        options_cache_capacity: 4,
        ..DashboardConfig::default()
    };
    let dashboard = dashboard_with(&dir, config, false);
    dashboard.options(OptionScope::root()).await.unwrap();
    dashboard.options(OptionScope::root()).await.unwrap();
    assert_eq!(dashboard.loader().requests_sent(), 1);
}
