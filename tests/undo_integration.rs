//! Integration tests for optimistic removal and undo.
//!
//! Covers the controller end to end over a real JSON store:
//! - A second removal replaces the pending undo
//! - Undo restores the original position
//! - Background failures leave the optimistic list in place, for both the
//!   delete and the recreate after undo

#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

use people_store::config::StoreConfig;
use people_store::models::PersistOperation;
use people_store::observability::EventBus;
use people_store::{
    DataStore, JsonFileStore, PeopleController, Person, PersonEvent, PersonRepository,
};
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

type Controller = PeopleController<JsonFileStore<Vec<Person>>>;

fn five() -> Vec<Person> {
    vec![
        Person::with_id("a", "Anna", "Arndt"),
        Person::with_id("b", "Ben", "Bauer"),
        Person::with_id("c", "Clara", "Conrad"),
        Person::with_id("d", "David", "Dorn"),
        Person::with_id("e", "Eva", "Engel"),
    ]
}

fn open(dir: &TempDir) -> (Controller, EventBus) {
    let store = JsonFileStore::new(StoreConfig::new(dir.path()), five()).unwrap();
    let repository = PersonRepository::new(store);
    repository.initialize().unwrap();

    let events = EventBus::default();
    let controller =
        PeopleController::on_current_runtime(Arc::new(repository), events.clone()).unwrap();
    controller.fetch().unwrap();
    (controller, events)
}

/// Occupies the temp path with a directory so every later write fails.
fn block_writes(controller: &Controller) {
    let file_path = controller.repository().store().file_path().to_path_buf();
    let mut temp_name = file_path.file_name().unwrap().to_owned();
    temp_name.push(".tmp");
    fs::create_dir_all(file_path.with_file_name(temp_name)).unwrap();
}

fn ids(people: &[Person]) -> Vec<&str> {
    people.iter().map(|p| p.id.as_str()).collect()
}

#[tokio::test]
async fn test_undo_restores_index_two_of_five() {
    let dir = TempDir::new().unwrap();
    let (controller, _) = open(&dir);
    let before = controller.state();
    assert_eq!(before.people.len(), 5);

    let target = before.people[2].clone();
    let removed = controller.remove_optimistic(&target);
    assert_eq!(ids(&removed.people), vec!["a", "b", "d", "e"]);

    let restored = controller.undo();
    assert_eq!(restored.people, before.people);
    assert_eq!(restored.people[2], target);
    assert_eq!(restored.restored_person_id, Some(target.id.clone()));

    controller.settle().await;
    assert!(controller
        .repository()
        .find_by_id(target.id.as_str())
        .unwrap()
        .is_some());
}

#[tokio::test]
async fn test_second_removal_replaces_pending_undo() {
    let dir = TempDir::new().unwrap();
    let (controller, _) = open(&dir);
    let people = controller.state().people;
    let first = people[0].clone();
    let second = people[3].clone();

    controller.remove_optimistic(&first);
    controller.remove_optimistic(&second);
    let state = controller.undo();

    assert_eq!(ids(&state.people), vec!["b", "c", "d", "e"]);
    assert_eq!(state.restored_person_id, Some(second.id.clone()));
    assert!(!controller.has_pending_undo());

    // Nothing left to undo; A stays deleted.
    assert_eq!(controller.undo(), state);

    controller.settle().await;
    let stored = controller.repository().get_all().unwrap();
    assert!(stored.iter().all(|p| p.id != first.id));
    assert!(stored.iter().any(|p| p.id == second.id));
    assert_eq!(stored.len(), 4);
}

#[tokio::test]
async fn test_undo_clamps_when_list_shrank() {
    let dir = TempDir::new().unwrap();
    let (controller, _) = open(&dir);
    let last = controller.state().people[4].clone();

    controller.remove_optimistic(&last);
    controller.settle().await;
    controller
        .remove(&Person::with_id("a", "Anna", "Arndt"))
        .unwrap();

    // Reload replaced the list, but the slot survives and clamps.
    assert!(controller.has_pending_undo());
    let state = controller.undo();
    assert_eq!(ids(&state.people), vec!["b", "c", "d", "e"]);
}

#[tokio::test]
async fn test_acknowledge_without_restoration_is_noop() {
    let dir = TempDir::new().unwrap();
    let (controller, _) = open(&dir);
    let before = controller.state();

    assert_eq!(controller.acknowledge_restored(), before);
    assert_eq!(controller.acknowledge_restored(), before);
}

#[tokio::test]
async fn test_acknowledge_clears_marker_only() {
    let dir = TempDir::new().unwrap();
    let (controller, _) = open(&dir);
    let target = controller.state().people[1].clone();

    controller.remove_optimistic(&target);
    let restored = controller.undo();
    let acked = controller.acknowledge_restored();

    assert!(acked.restored_person_id.is_none());
    assert_eq!(acked.people, restored.people);
}

#[tokio::test]
async fn test_events_follow_remove_and_undo() {
    let dir = TempDir::new().unwrap();
    let (controller, events) = open(&dir);
    let mut rx = events.subscribe();
    let target = controller.state().people[2].clone();

    controller.remove_optimistic(&target);
    controller.undo();
    controller.settle().await;

    match rx.recv().await.unwrap() {
        PersonEvent::Removed {
            person_id,
            original_index,
            ..
        } => {
            assert_eq!(person_id, target.id);
            assert_eq!(original_index, 2);
        },
        other => panic!("expected Removed, got {other:?}"),
    }
    match rx.recv().await.unwrap() {
        PersonEvent::Restored {
            person_id, index, ..
        } => {
            assert_eq!(person_id, target.id);
            assert_eq!(index, 2);
        },
        other => panic!("expected Restored, got {other:?}"),
    }
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn test_background_failure_keeps_optimistic_state() {
    let dir = TempDir::new().unwrap();
    let (controller, events) = open(&dir);
    let mut failures = events.subscribe_failures();
    let target = controller.state().people[0].clone();

    block_writes(&controller);

    let state = controller.remove_optimistic(&target);
    controller.settle().await;

    assert_eq!(state.people.len(), 4);
    assert_eq!(controller.state().people, state.people);

    match failures.recv().await {
        Ok(PersonEvent::PersistenceFailed {
            operation,
            person_id,
            ..
        }) => {
            assert_eq!(operation, PersistOperation::Remove);
            assert_eq!(person_id, target.id);
        },
        other => panic!("expected PersistenceFailed, got {other:?}"),
    }

    // Memory and store have drifted; a reload shows the persisted truth.
    assert!(controller
        .repository()
        .find_by_id(target.id.as_str())
        .unwrap()
        .is_some());
    let reloaded = controller.fetch().unwrap();
    assert_eq!(reloaded.people.len(), 5);
}

#[tokio::test]
async fn test_failed_recreate_after_undo_keeps_restored_list() {
    let dir = TempDir::new().unwrap();
    let (controller, events) = open(&dir);
    let mut failures = events.subscribe_failures();
    let target = controller.state().people[1].clone();

    controller.remove_optimistic(&target);
    controller.settle().await;
    assert!(controller
        .repository()
        .find_by_id(target.id.as_str())
        .unwrap()
        .is_none());

    block_writes(&controller);

    let state = controller.undo();
    controller.settle().await;

    assert_eq!(state.people.len(), 5);
    assert_eq!(state.people[1], target);
    assert_eq!(controller.state().people, state.people);

    match failures.recv().await {
        Ok(PersonEvent::PersistenceFailed {
            operation,
            person_id,
            ..
        }) => {
            assert_eq!(operation, PersistOperation::Create);
            assert_eq!(person_id, target.id);
        },
        other => panic!("expected PersistenceFailed, got {other:?}"),
    }

    assert!(controller
        .repository()
        .find_by_id(target.id.as_str())
        .unwrap()
        .is_none());
    assert_eq!(controller.repository().get_all().unwrap().len(), 4);
}
