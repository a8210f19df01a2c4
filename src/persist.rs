//! Background persistence queue.
//!
//! Mutations on the task store never wait for storage. Each one hands a full
//! snapshot to a [`Persister`], whose single worker task applies writes in
//! dispatch order: the last dispatched snapshot wins, nothing is retried, and
//! a failed write is reported to the [`FailureLog`] and dropped.

use std::sync::{Arc, Mutex};

use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::error::Error;
use crate::storage::KeyValueStore;

/// A storage failure that was recovered inside the store.
#[derive(Debug, Error)]
pub enum StorageFailure {
    /// Read or parse failure during load; defaults were used.
    #[error("failed to load '{key}': {source}")]
    Read { key: String, source: Error },

    /// Write failure; the snapshot was dropped.
    #[error("failed to save '{key}': {source}")]
    Write { key: String, source: Error },
}

impl StorageFailure {
    pub fn key(&self) -> &str {
        match self {
            StorageFailure::Read { key, .. } | StorageFailure::Write { key, .. } => key,
        }
    }

    pub fn kind(&self) -> FailureKind {
        match self {
            StorageFailure::Read { .. } => FailureKind::Read,
            StorageFailure::Write { .. } => FailureKind::Write,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Read,
    Write,
}

/// Sink for recovered storage failures.
pub trait FailureLog: Send + Sync {
    fn record(&self, failure: &StorageFailure);
}

/// Emits each failure as a `tracing` warning.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLog;

impl FailureLog for TracingLog {
    fn record(&self, failure: &StorageFailure) {
        match failure {
            StorageFailure::Read { key, source } => {
                warn!(key = %key, error = %source, "storage read failed, using defaults")
            }
            StorageFailure::Write { key, source } => {
                warn!(key = %key, error = %source, "storage write failed, snapshot dropped")
            }
        }
    }
}

/// Captured copy of a [`StorageFailure`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureRecord {
    pub kind: FailureKind,
    pub key: String,
    pub message: String,
}

/// Keeps every failure in memory and forwards it to tracing.
#[derive(Debug, Default)]
pub struct RecordingLog {
    records: Mutex<Vec<FailureRecord>>,
}

impl RecordingLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<FailureRecord> {
        match self.records.lock() {
            Ok(records) => records.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn count(&self, kind: FailureKind) -> usize {
        self.records().iter().filter(|r| r.kind == kind).count()
    }
}

impl FailureLog for RecordingLog {
    fn record(&self, failure: &StorageFailure) {
        TracingLog.record(failure);
        let record = FailureRecord {
            kind: failure.kind(),
            key: failure.key().to_string(),
            message: failure.to_string(),
        };
        match self.records.lock() {
            Ok(mut records) => records.push(record),
            Err(poisoned) => poisoned.into_inner().push(record),
        }
    }
}

enum Command {
    Write { key: String, value: String },
    Flush(oneshot::Sender<()>),
}

/// Single-worker write queue. Must be created inside a tokio runtime.
pub struct Persister {
    tx: mpsc::UnboundedSender<Command>,
    worker: JoinHandle<()>,
}

impl Persister {
    pub fn spawn(storage: Arc<dyn KeyValueStore>, log: Arc<dyn FailureLog>) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let worker = tokio::spawn(async move {
            while let Some(command) = rx.recv().await {
                match command {
                    Command::Write { key, value } => match storage.set(&key, &value).await {
                        Ok(()) => debug!(key = %key, bytes = value.len(), "snapshot saved"),
                        Err(source) => log.record(&StorageFailure::Write { key, source }),
                    },
                    Command::Flush(done) => {
                        let _ = done.send(());
                    }
                }
            }
            debug!("persister drained");
        });
        Self { tx, worker }
    }

    /// Queue a write of `value` under `key`. Returns immediately.
    pub fn dispatch(&self, key: &str, value: String) {
        let command = Command::Write {
            key: key.to_string(),
            value,
        };
        if self.tx.send(command).is_err() {
            warn!(key = %key, "persister stopped, snapshot dropped");
        }
    }

    /// Wait until every write dispatched before this call has been attempted.
    pub async fn flush(&self) {
        let (done, wait) = oneshot::channel();
        if self.tx.send(Command::Flush(done)).is_ok() {
            let _ = wait.await;
        }
    }

    /// Drain outstanding writes and stop the worker.
    pub async fn shutdown(self) {
        let Persister { tx, worker } = self;
        drop(tx);
        if let Err(e) = worker.await {
            warn!(error = %e, "persister worker ended abnormally");
        }
    }
}
