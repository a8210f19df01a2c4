//! The task store: canonical in-memory task list and theme flag.
//!
//! State is loaded once by [`TaskStore::initialize`] and mirrored back to the
//! storage collaborator after every mutation. Memory is authoritative for the
//! running session; storage is a best-effort copy written through the
//! background [`Persister`].

use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::Error;
use crate::persist::{FailureLog, Persister, StorageFailure, TracingLog};
use crate::storage::KeyValueStore;
use crate::task::{dedup_ids, is_sorted, sort_tasks, Priority, Task, TaskIdGenerator};

/// Storage keys used by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKeys {
    pub tasks: String,
    pub theme: String,
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self {
            tasks: "tasks".to_string(),
            theme: "darkMode".to_string(),
        }
    }
}

pub struct TaskStore {
    tasks: Vec<Task>,
    dark_mode: bool,
    keys: StorageKeys,
    ids: TaskIdGenerator,
    log: Arc<dyn FailureLog>,
    persister: Persister,
}

impl TaskStore {
    /// Load state from `storage` and start the write queue.
    ///
    /// Missing, unreadable or unparsable blobs fall back to an empty list and
    /// light theme; each failure is reported to `log`.
    pub async fn initialize(
        storage: Arc<dyn KeyValueStore>,
        keys: StorageKeys,
        log: Arc<dyn FailureLog>,
    ) -> Self {
        let mut tasks: Vec<Task> = load_value(storage.as_ref(), &keys.tasks, log.as_ref())
            .await
            .unwrap_or_default();
        let dropped = dedup_ids(&mut tasks);
        if dropped > 0 {
            debug!(dropped, "dropped tasks with duplicate ids");
        }
        if !is_sorted(&tasks) {
            sort_tasks(&mut tasks);
        }

        let dark_mode: bool = load_value(storage.as_ref(), &keys.theme, log.as_ref())
            .await
            .unwrap_or(false);

        debug!(tasks = tasks.len(), dark_mode, "task store loaded");

        let persister = Persister::spawn(storage, Arc::clone(&log));
        Self {
            tasks,
            dark_mode,
            keys,
            ids: TaskIdGenerator::new(),
            log,
            persister,
        }
    }

    /// [`initialize`](Self::initialize) with default keys and tracing-only logging.
    pub async fn open(storage: Arc<dyn KeyValueStore>) -> Self {
        Self::initialize(storage, StorageKeys::default(), Arc::new(TracingLog)).await
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn dark_mode(&self) -> bool {
        self.dark_mode
    }

    pub fn keys(&self) -> &StorageKeys {
        &self.keys
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Add a task unless `text` is blank. Returns the (possibly unchanged) list.
    pub fn add_task(&mut self, text: &str, priority: Priority) -> &[Task] {
        if text.trim().is_empty() {
            return &self.tasks;
        }

        let mut id = self.ids.next_id();
        while self.get(&id).is_some() {
            id = self.ids.next_id();
        }
        debug!(id = %id, priority = %priority, "task added");

        self.tasks.push(Task::new(id, text, priority));
        sort_tasks(&mut self.tasks);
        self.persist_tasks();
        &self.tasks
    }

    /// Flip completion of the task with `id`. Unknown ids leave the list as is.
    pub fn toggle_task(&mut self, id: &str) -> &[Task] {
        if let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) {
            task.completed = !task.completed;
            debug!(id = %id, completed = task.completed, "task toggled");
        }
        self.persist_tasks();
        &self.tasks
    }

    /// Remove the task with `id`. Unknown ids leave the list as is.
    pub fn delete_task(&mut self, id: &str) -> &[Task] {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        if self.tasks.len() != before {
            debug!(id = %id, "task deleted");
        }
        self.persist_tasks();
        &self.tasks
    }

    pub fn set_dark_mode(&mut self, enabled: bool) {
        self.dark_mode = enabled;
        self.persist_theme();
    }

    /// Flip the theme flag and return the new value.
    pub fn toggle_dark_mode(&mut self) -> bool {
        self.set_dark_mode(!self.dark_mode);
        self.dark_mode
    }

    /// Wait for every write dispatched so far to be attempted.
    pub async fn flush(&self) {
        self.persister.flush().await;
    }

    /// Drain pending writes and stop the write queue.
    pub async fn shutdown(self) {
        self.persister.shutdown().await;
    }

    fn persist_tasks(&self) {
        self.persist(&self.keys.tasks, serde_json::to_string(&self.tasks));
    }

    fn persist_theme(&self) {
        self.persist(&self.keys.theme, serde_json::to_string(&self.dark_mode));
    }

    fn persist(&self, key: &str, encoded: serde_json::Result<String>) {
        match encoded {
            Ok(value) => self.persister.dispatch(key, value),
            Err(e) => self.log.record(&StorageFailure::Write {
                key: key.to_string(),
                source: Error::Json(e),
            }),
        }
    }
}

impl fmt::Debug for TaskStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskStore")
            .field("tasks", &self.tasks)
            .field("dark_mode", &self.dark_mode)
            .field("keys", &self.keys)
            .finish_non_exhaustive()
    }
}

/// Read and decode `key`; `None` when absent or on any failure.
async fn load_value<T: DeserializeOwned>(
    storage: &dyn KeyValueStore,
    key: &str,
    log: &dyn FailureLog,
) -> Option<T> {
    let raw = match storage.get(key).await {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(source) => {
            log.record(&StorageFailure::Read {
                key: key.to_string(),
                source,
            });
            return None;
        }
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            log.record(&StorageFailure::Read {
                key: key.to_string(),
                source: Error::Json(e),
            });
            None
        }
    }
}
