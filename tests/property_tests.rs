//! Property-based tests for the person store.
//!
//! Uses proptest to verify invariants across random operation sequences:
//! - The store never holds two records with the same id
//! - Updating one record leaves every other record untouched
//! - Optimistic removal followed by undo is the identity

// Property tests use expect/unwrap for simplicity - panics are acceptable in tests
#![allow(clippy::expect_used, clippy::unwrap_used)]

use people_store::config::StoreConfig;
use people_store::services::{UndoRemoval, optimistic_remove, optimistic_undo_remove};
use people_store::{DataStore, JsonFileStore, Person};
use proptest::prelude::*;
use std::collections::HashSet;
use tempfile::TempDir;

fn person(id: u8, first: &str) -> Person {
    Person::with_id(format!("id-{id}"), first, "Tester")
}

fn empty_store() -> (TempDir, JsonFileStore<Vec<Person>>) {
    let dir = TempDir::new().unwrap();
    let store = JsonFileStore::new(StoreConfig::new(dir.path()), Vec::new()).unwrap();
    store.initialize().unwrap();
    (dir, store)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Property: ids stay unique whatever sequence of inserts runs.
    #[test]
    fn prop_inserts_keep_ids_unique(ids in prop::collection::vec(0u8..12, 0..40)) {
        let (_dir, store) = empty_store();
        for (n, id) in ids.iter().enumerate() {
            store.insert(person(*id, &format!("P{n}"))).unwrap();
        }

        let all = store.select_all().unwrap();
        let distinct: HashSet<_> = all.iter().map(|p| p.id.clone()).collect();
        prop_assert_eq!(distinct.len(), all.len());

        let expected: HashSet<_> = ids.iter().map(|id| format!("id-{id}")).collect();
        prop_assert_eq!(all.len(), expected.len());
    }

    /// Property: update replaces exactly one record.
    #[test]
    fn prop_update_is_replace(
        count in 1u8..10,
        pick in any::<prop::sample::Index>(),
        new_name in "[A-Za-z]{1,12}",
    ) {
        let (_dir, store) = empty_store();
        for id in 0..count {
            store.insert(person(id, "Original")).unwrap();
        }
        let before = store.select_all().unwrap();
        let target = before[pick.index(before.len())].clone();

        let mut replacement = target.clone();
        replacement.first_name.clone_from(&new_name);
        store.update(replacement.clone()).unwrap();

        prop_assert_eq!(store.find_by_id(target.id.as_str()).unwrap(), Some(replacement));
        for other in before.iter().filter(|p| p.id != target.id) {
            let found = store.find_by_id(other.id.as_str()).unwrap();
            prop_assert_eq!(found.as_ref(), Some(other));
        }
        prop_assert_eq!(store.len().unwrap(), before.len());
    }

    /// Property: removing then undoing returns the original list.
    #[test]
    fn prop_remove_then_undo_is_identity(
        count in 1u8..20,
        pick in any::<prop::sample::Index>(),
    ) {
        let list: Vec<Person> = (0..count).map(|id| person(id, "Listed")).collect();
        let target = list[pick.index(list.len())].clone();

        let (shrunk, slot) = optimistic_remove(&list, &target, |p: &Person| &p.id).unwrap();
        prop_assert_eq!(shrunk.len(), list.len() - 1);

        match optimistic_undo_remove(&shrunk, |p: &Person| &p.id, slot) {
            UndoRemoval::Restored { list: restored, .. } => prop_assert_eq!(restored, list),
            other => prop_assert!(false, "unexpected outcome {:?}", other),
        }
    }
}
