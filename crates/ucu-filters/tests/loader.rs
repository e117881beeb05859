//! Overlapping and duplicate option loads.

use std::sync::Mutex;

use futures_util::FutureExt;
use futures_util::future::{BoxFuture, join, join3};
use tokio::sync::oneshot;
use ucu_filters::{
    FilterKey, FilterOption, FilterOptions, FilterStore, LoadError, LoadOutcome, LoaderConfig,
    OptionScope, OptionsLoader, OptionsSource,
};

type Reply = Result<FilterOptions, LoadError>;

/// Holds every request open until the test answers it.
#[derive(Default)]
struct GatedSource {
    pending: Mutex<Vec<(OptionScope, oneshot::Sender<Reply>)>>,
}

impl GatedSource {
    fn answer(&self, scope: &OptionScope, reply: Reply) {
        let mut pending = self.pending.lock().unwrap();
        let index = pending
            .iter()
            .position(|(s, sender)| s == scope && !sender.is_closed())
            .expect("no request for scope");
        let (_, sender) = pending.remove(index);
        let _ = sender.send(reply);
    }

    fn open_requests(&self) -> usize {
        self.pending.lock().unwrap().len()
    }
}

impl OptionsSource for GatedSource {
    fn fetch(&self, scope: &OptionScope) -> BoxFuture<'static, Reply> {
        let (tx, rx) = oneshot::channel();
        self.pending.lock().unwrap().push((scope.clone(), tx));
        async move {
            rx.await
                .unwrap_or_else(|_| Err(LoadError::Network("request dropped".into())))
        }
        .boxed()
    }
}

fn faculty_scope(id: i64) -> OptionScope {
    OptionScope {
        faculty_id: Some(id.into()),
        department_id: None,
    }
}

fn departments(label: &str) -> FilterOptions {
    FilterOptions::new().with(
        FilterKey::DepartmentId,
        [FilterOption::new(1, label)].into_iter().collect(),
    )
}

#[tokio::test]
async fn test_later_scope_wins_when_it_settles_first() {
    let loader = OptionsLoader::new(GatedSource::default(), LoaderConfig::default());
    let (a, b) = (faculty_scope(1), faculty_scope(2));

    let driver = async {
        tokio::task::yield_now().await;
        loader.source().answer(&b, Ok(departments("from B")));
        tokio::task::yield_now().await;
        loader.source().answer(&a, Ok(departments("from A")));
    };
    let (outcome_a, outcome_b, ()) = join3(loader.load(a.clone()), loader.load(b.clone()), driver).await;

    assert_eq!(outcome_a, LoadOutcome::Superseded { scope: a });
    assert_eq!(
        outcome_b,
        LoadOutcome::Loaded {
            scope: b.clone(),
            options: departments("from B"),
        }
    );

    // Applied in settle order: B, then the stale A
    let mut store = FilterStore::default();
    store.set(FilterKey::FacultyId, Some(2.into()));
    assert!(store.apply_load(outcome_b));
    assert!(!store.apply_load(outcome_a));
    assert_eq!(store.options(), &departments("from B"));
    assert_eq!(loader.latest_scope(), Some(b));
}

#[tokio::test]
async fn test_earlier_scope_settling_first_is_still_discarded() {
    let loader = OptionsLoader::new(GatedSource::default(), LoaderConfig::default());
    let (a, b) = (faculty_scope(1), faculty_scope(2));

    let driver = async {
        tokio::task::yield_now().await;
        loader.source().answer(&a, Ok(departments("from A")));
        tokio::task::yield_now().await;
        loader.source().answer(&b, Ok(departments("from B")));
    };
    let (outcome_a, outcome_b, ()) = join3(loader.load(a.clone()), loader.load(b.clone()), driver).await;

    assert!(matches!(outcome_a, LoadOutcome::Superseded { .. }));
    assert!(outcome_b.is_loaded());
}

#[tokio::test]
async fn test_superseded_failure_is_not_reported_as_failure() {
    let loader = OptionsLoader::new(GatedSource::default(), LoaderConfig::default());
    let (a, b) = (faculty_scope(1), faculty_scope(2));

    let driver = async {
        tokio::task::yield_now().await;
        loader.source().answer(&a, Err(LoadError::Unauthorized { status: 401 }));
        loader.source().answer(&b, Ok(departments("from B")));
    };
    let (outcome_a, outcome_b, ()) = join3(loader.load(a.clone()), loader.load(b.clone()), driver).await;

    assert_eq!(outcome_a, LoadOutcome::Superseded { scope: a });
    assert!(outcome_b.is_loaded());
}

#[tokio::test]
async fn test_identical_pending_scopes_share_one_request() {
    let loader = OptionsLoader::new(GatedSource::default(), LoaderConfig::default());
    let scope = faculty_scope(5);

    let loads = join(loader.load(scope.clone()), loader.load(scope.clone()));
    let driver = async {
        tokio::task::yield_now().await;
        assert_eq!(loader.source().open_requests(), 1);
        assert!(loader.is_pending(&scope));
        loader.source().answer(&scope, Ok(departments("shared")));
    };
    let ((first, second), ()) = join(loads, driver).await;

    assert_eq!(first, second);
    assert!(first.is_loaded());
    assert_eq!(loader.requests_sent(), 1);
    assert!(!loader.is_pending(&scope));
}

#[tokio::test]
async fn test_failure_is_reported_for_latest_scope() {
    let loader = OptionsLoader::new(GatedSource::default(), LoaderConfig::default());
    let scope = OptionScope::root();

    let driver = async {
        tokio::task::yield_now().await;
        loader.source().answer(&scope, Err(LoadError::Network("reset".into())));
    };
    let (outcome, ()) = join(loader.load(scope.clone()), driver).await;

    assert_eq!(
        outcome,
        LoadOutcome::Failed {
            scope,
            error: LoadError::Network("reset".into()),
        }
    );
}

#[tokio::test]
async fn test_abandoned_request_is_forgotten() {
    let loader = OptionsLoader::new(GatedSource::default(), LoaderConfig::default());
    let scope = faculty_scope(3);

    assert!(loader.load(scope.clone()).now_or_never().is_none());

    assert!(!loader.is_pending(&scope));
    let driver = async {
        tokio::task::yield_now().await;
        loader.source().answer(&scope, Ok(departments("retry")));
    };
    let (outcome, ()) = join(loader.load(scope.clone()), driver).await;
    assert!(outcome.is_loaded());
    assert_eq!(loader.requests_sent(), 2);
}

#[tokio::test]
async fn test_request_outlives_one_of_two_waiters() {
    let loader = OptionsLoader::new(GatedSource::default(), LoaderConfig::default());
    let scope = faculty_scope(4);

    let mut first = Box::pin(loader.load(scope.clone()));
    let mut second = Box::pin(loader.load(scope.clone()));
    assert!(first.as_mut().now_or_never().is_none());
    assert!(second.as_mut().now_or_never().is_none());
    drop(first);

    assert!(loader.is_pending(&scope));
    loader.source().answer(&scope, Ok(departments("kept")));
    assert!(second.await.is_loaded());
    assert!(!loader.is_pending(&scope));
    assert_eq!(loader.requests_sent(), 1);
}
