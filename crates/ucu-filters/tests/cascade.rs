//! Cascade laws and the documented filter scenarios.

use proptest::prelude::*;
use ucu_filters::cascade::{self, descendants, is_in_graph};
use ucu_filters::{FilterKey, FilterMap, FilterOption, FilterOptions, FilterStore, FilterValue};

fn any_key() -> impl Strategy<Value = FilterKey> {
    prop::sample::select(FilterKey::ALL.to_vec())
}

fn any_value() -> impl Strategy<Value = FilterValue> {
    prop_oneof![
        (1i64..500).prop_map(FilterValue::Integer),
        "[A-Za-z0-9/]{1,8}".prop_map(FilterValue::Text),
    ]
}

fn any_filters() -> impl Strategy<Value = FilterMap> {
    prop::collection::vec((any_key(), any_value()), 0..12)
        .prop_map(|pairs| pairs.into_iter().collect())
}

proptest! {
    #[test]
    fn test_applying_resolution_clears_every_descendant(filters in any_filters(), key in any_key()) {
        let mut filters = filters;
        let invalidated = cascade::resolve(key, &filters);
        cascade::apply(&mut filters, &invalidated);
        for child in descendants(key) {
            prop_assert!(!filters.contains(child), "{child} survived a change to {key}");
        }
    }

    #[test]
    fn test_resolution_is_idempotent(filters in any_filters(), key in any_key()) {
        let mut filters = filters;
        let first = cascade::resolve(key, &filters);
        prop_assert_eq!(&first, &cascade::resolve(key, &filters));
        cascade::apply(&mut filters, &first);
        prop_assert!(cascade::resolve(key, &filters).is_empty());
    }

    #[test]
    fn test_non_graph_keys_never_invalidate(filters in any_filters(), key in any_key(), value in any_value()) {
        prop_assume!(!is_in_graph(key));
        let mut store = FilterStore::default();
        store.restore(filters.clone());
        let result = store.set(key, Some(value.clone()));

        let mut expected = filters;
        expected.insert(key, Some(value));
        prop_assert_eq!(result, expected);
    }

    #[test]
    fn test_store_never_holds_child_without_parent_after_parent_change(
        steps in prop::collection::vec((any_key(), prop::option::of(any_value())), 1..20)
    ) {
        let mut store = FilterStore::default();
        for (key, value) in steps {
            let cleared_parent = value.is_none();
            let result = store.set(key, value);
            if cleared_parent {
                for child in descendants(key) {
                    prop_assert!(!result.contains(child));
                }
            }
        }
    }
}

#[test]
fn test_changing_faculty_drops_department_and_program() {
    let mut store = FilterStore::default();
    store.set(FilterKey::FacultyId, Some(7.into()));
    store.set(FilterKey::DepartmentId, Some(3.into()));
    let result = store.set(FilterKey::FacultyId, Some(9.into()));

    assert_eq!(result.get(FilterKey::FacultyId), Some(&FilterValue::Integer(9)));
    assert!(!result.contains(FilterKey::DepartmentId));
    assert!(!result.contains(FilterKey::ProgramId));
}

#[test]
fn test_independent_filter_survives_faculty_choice() {
    let mut store = FilterStore::default();
    store.set(FilterKey::Gender, Some("F".into()));
    let result = store.set(FilterKey::FacultyId, Some(2.into()));

    assert_eq!(
        result,
        FilterMap::new()
            .with(FilterKey::Gender, "F")
            .with(FilterKey::FacultyId, 2)
    );
}

#[test]
fn test_clear_all_empties_filters_and_restores_root_lists() {
    let root = FilterOptions::new().with(
        FilterKey::FacultyId,
        [FilterOption::new(1, "Engineering"), FilterOption::new(2, "Law")]
            .into_iter()
            .collect(),
    );
    let mut store = FilterStore::new(root.clone());
    store.set(FilterKey::FacultyId, Some(1.into()));
    store.set(FilterKey::SemesterId, Some(4.into()));
    store.set(FilterKey::StudentName, Some("Okello".into()));
    store.replace_options(FilterOptions::new());

    store.clear_all();

    assert!(store.get().is_empty());
    assert_eq!(store.options(), &root);
}
