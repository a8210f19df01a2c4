mod support;

use support::{id_of, texts, Harness};
use tasker::persist::FailureKind;
use tasker::storage::MemoryStore;
use tasker::task::is_sorted;
use tasker::Priority;

#[tokio::test]
async fn scenario_orders_high_medium_low() {
    let mut h = Harness::empty().await;
    h.store.add_task("Buy milk", Priority::Low);
    h.store.add_task("Call bank", Priority::High);
    let tasks = h.store.add_task("Email boss", Priority::Medium);

    assert_eq!(texts(tasks), vec!["Call bank", "Email boss", "Buy milk"]);
    assert_eq!(tasks[0].priority, Priority::High);
    assert_eq!(tasks[1].priority, Priority::Medium);
    assert_eq!(tasks[2].priority, Priority::Low);
}

#[tokio::test]
async fn equal_priorities_keep_insertion_order() {
    let mut h = Harness::empty().await;
    h.store.add_task("A", Priority::High);
    h.store.add_task("low", Priority::Low);
    let tasks = h.store.add_task("B", Priority::High);

    assert_eq!(texts(tasks), vec!["A", "B", "low"]);
}

#[tokio::test]
async fn blank_text_never_changes_length() {
    let mut h = Harness::empty().await;
    h.store.add_task("keep", Priority::Medium);

    assert_eq!(h.store.add_task("", Priority::High).len(), 1);
    assert_eq!(h.store.add_task("   ", Priority::High).len(), 1);
}

#[tokio::test]
async fn toggle_twice_restores_completion() {
    let mut h = Harness::empty().await;
    h.store.add_task("one", Priority::Low);
    h.store.add_task("two", Priority::High);
    let original = h.store.tasks().to_vec();
    let id = id_of(&original, "one");

    let once = h.store.toggle_task(&id).to_vec();
    assert!(once.iter().find(|t| t.id == id).unwrap().completed);

    let twice = h.store.toggle_task(&id);
    assert_eq!(twice, original.as_slice());
}

#[tokio::test]
async fn delete_twice_is_noop_second_time() {
    let mut h = Harness::empty().await;
    h.store.add_task("one", Priority::Low);
    h.store.add_task("two", Priority::High);
    let id = id_of(h.store.tasks(), "one");

    let after_first = h.store.delete_task(&id).to_vec();
    assert_eq!(texts(&after_first), vec!["two"]);

    let after_second = h.store.delete_task(&id);
    assert_eq!(after_second, after_first.as_slice());
}

#[tokio::test]
async fn toggle_unknown_id_leaves_list_and_blob_identical() {
    let mut h = Harness::empty().await;
    h.store.add_task("one", Priority::Medium);
    let before_blob = h.persisted_tasks().await;
    let before = h.store.tasks().to_vec();

    assert_eq!(h.store.toggle_task("no-such-id"), before.as_slice());
    assert_eq!(h.persisted_tasks().await, before_blob);
}

#[tokio::test]
async fn every_mutation_mirrors_full_list() {
    let mut h = Harness::empty().await;
    h.store.add_task("a", Priority::Low);
    h.store.add_task("b", Priority::High);
    let id = id_of(h.store.tasks(), "a");
    h.store.toggle_task(&id);

    let persisted = h.persisted_tasks().await.expect("list persisted");
    assert_eq!(persisted, h.store.tasks());
    assert_eq!(h.storage.write_count(), 3);
}

#[tokio::test]
async fn state_survives_restart() {
    let mut h = Harness::empty().await;
    h.store.add_task("Buy milk", Priority::Low);
    h.store.add_task("Call bank", Priority::High);
    let id = id_of(h.store.tasks(), "Buy milk");
    h.store.toggle_task(&id);
    h.store.set_dark_mode(true);
    let before = h.store.tasks().to_vec();

    let h = h.reopen().await;
    assert_eq!(h.store.tasks(), before.as_slice());
    assert!(h.store.dark_mode());
    assert!(h.log.records().is_empty());
}

#[tokio::test]
async fn write_failures_are_logged_and_memory_stays_authoritative() {
    let storage = MemoryStore::new();
    storage.set_fail_writes(true);
    let mut h = Harness::with_storage(storage).await;

    h.store.add_task("offline", Priority::High);
    h.store.set_dark_mode(true);
    h.store.flush().await;

    assert_eq!(texts(h.store.tasks()), vec!["offline"]);
    assert!(h.store.dark_mode());
    assert_eq!(h.log.count(FailureKind::Write), 2);
    let keys: Vec<String> = h.log.records().into_iter().map(|r| r.key).collect();
    assert_eq!(keys, vec!["tasks", "darkMode"]);
}

#[tokio::test]
async fn read_failure_falls_back_to_defaults() {
    let storage = MemoryStore::with_values([("tasks", "[]"), ("darkMode", "true")]);
    storage.set_fail_reads(true);
    let h = Harness::with_storage(storage).await;

    assert!(h.store.tasks().is_empty());
    assert!(!h.store.dark_mode());
    assert_eq!(h.log.count(FailureKind::Read), 2);
}

#[tokio::test]
async fn loads_lists_written_with_millisecond_ids() {
    let raw = r#"[
        {"id":"1718000000001","text":"Call bank","completed":false,"priority":"High"},
        {"id":"1718000000000","text":"Buy milk","completed":true,"priority":"Low"}
    ]"#;
    let mut h = Harness::with_storage(MemoryStore::with_values([("tasks", raw)])).await;

    assert_eq!(texts(h.store.tasks()), vec!["Call bank", "Buy milk"]);
    let tasks = h.store.toggle_task("1718000000000");
    assert!(!tasks[1].completed);
    assert!(is_sorted(tasks));
}
