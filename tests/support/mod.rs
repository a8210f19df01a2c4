#![allow(dead_code)]

use std::sync::Arc;

use tasker::persist::RecordingLog;
use tasker::storage::MemoryStore;
use tasker::{StorageKeys, Task, TaskStore};

pub struct Harness {
    pub storage: Arc<MemoryStore>,
    pub log: Arc<RecordingLog>,
    pub store: TaskStore,
}

impl Harness {
    pub async fn empty() -> Self {
        Self::with_storage(MemoryStore::new()).await
    }

    pub async fn with_storage(storage: MemoryStore) -> Self {
        let storage = Arc::new(storage);
        let log = Arc::new(RecordingLog::new());
        let store =
            TaskStore::initialize(storage.clone(), StorageKeys::default(), log.clone()).await;
        Self {
            storage,
            log,
            store,
        }
    }

    /// Reload a fresh store from the same storage, as after a restart.
    pub async fn reopen(self) -> Self {
        self.store.shutdown().await;
        let log = Arc::new(RecordingLog::new());
        let store =
            TaskStore::initialize(self.storage.clone(), StorageKeys::default(), log.clone())
                .await;
        Self {
            storage: self.storage,
            log,
            store,
        }
    }

    /// Persisted task list, decoded.
    pub async fn persisted_tasks(&self) -> Option<Vec<Task>> {
        self.store.flush().await;
        let raw = self.storage.raw("tasks").await?;
        Some(serde_json::from_str(&raw).expect("persisted list parses"))
    }
}

pub fn texts(tasks: &[Task]) -> Vec<String> {
    tasks.iter().map(|t| t.text.clone()).collect()
}

pub fn id_of(tasks: &[Task], text: &str) -> String {
    tasks
        .iter()
        .find(|t| t.text == text)
        .map(|t| t.id.clone())
        .unwrap_or_else(|| panic!("no task with text {text:?}"))
}
