//! tasker - priority-sorted to-do list library
//!
//! This library provides the task store behind the `tasker` CLI: a list of
//! tasks kept in priority order, a light/dark theme flag, and best-effort
//! persistence to a key-value storage collaborator.
//!
//! # Core Concepts
//!
//! - **Tasks**: text, completion flag and a fixed High/Medium/Low priority
//! - **Task store**: canonical in-memory state, mutated synchronously
//! - **Persister**: background queue mirroring each mutation to storage
//! - **Storage collaborator**: async get/set of string blobs by key
//!
//! # Module Organization
//!
//! - `cli`: Command-line interface using clap
//! - `config`: Configuration loading from `tasker.toml`
//! - `error`: Error types and result aliases
//! - `lock`: File locking and atomic writes for the file store
//! - `output`: Human and JSON output for CLI commands
//! - `persist`: Background write queue and failure logging
//! - `present`: Display attributes for tasks
//! - `storage`: Key-value trait with memory and file implementations
//! - `store`: The task store
//! - `task`: Task records, priorities and ordering

pub mod cli;
pub mod config;
pub mod error;
pub mod lock;
pub mod output;
pub mod persist;
pub mod present;
pub mod storage;
pub mod store;
pub mod task;

pub use error::{Error, Result};
pub use store::{StorageKeys, TaskStore};
pub use task::{Priority, Task};
