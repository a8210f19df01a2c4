//! Task records and priority ordering.
//!
//! A task list is kept sorted by priority rank (High, Medium, Low). Ties keep
//! insertion order, so every sort here goes through the stable
//! `slice::sort_by_key`.

use std::collections::HashSet;
use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use ulid::{Generator, Ulid};

/// Priority level chosen when a task is created.
#[derive(
    Debug, Clone, Copy, Default, Serialize, Deserialize, ValueEnum, PartialEq, Eq, Hash,
)]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::High, Priority::Medium, Priority::Low];

    /// Ordinal used for sorting: High=1, Medium=2, Low=3.
    pub fn rank(self) -> u8 {
        match self {
            Priority::High => 1,
            Priority::Medium => 2,
            Priority::Low => 3,
        }
    }

    /// Label as persisted and displayed.
    pub fn as_str(self) -> &'static str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }

    /// Parse a persisted/displayed label, case-insensitively.
    pub fn from_label(label: &str) -> Option<Self> {
        let trimmed = label.trim();
        Self::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(trimmed))
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single to-do item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Task {
    pub id: String,
    pub text: String,
    pub completed: bool,
    pub priority: Priority,
}

impl Task {
    pub fn new(id: impl Into<String>, text: impl Into<String>, priority: Priority) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            completed: false,
            priority,
        }
    }
}

/// Stable sort by priority rank.
pub fn sort_tasks(tasks: &mut [Task]) {
    tasks.sort_by_key(|task| task.priority.rank());
}

/// True when the list is in priority rank order.
pub fn is_sorted(tasks: &[Task]) -> bool {
    tasks
        .windows(2)
        .all(|pair| pair[0].priority.rank() <= pair[1].priority.rank())
}

/// Drop tasks whose id already appeared earlier in the list.
///
/// Returns the number of tasks removed.
pub fn dedup_ids(tasks: &mut Vec<Task>) -> usize {
    let before = tasks.len();
    let mut seen = HashSet::new();
    tasks.retain(|task| seen.insert(task.id.clone()));
    before - tasks.len()
}

/// Issues time-derived ids that are strictly increasing within the process.
pub struct TaskIdGenerator {
    inner: Generator,
}

impl TaskIdGenerator {
    pub fn new() -> Self {
        Self {
            inner: Generator::new(),
        }
    }

    pub fn next_id(&mut self) -> String {
        match self.inner.generate() {
            Ok(id) => id.to_string(),
            // Random bits exhausted within one millisecond; fall back to a fresh ULID.
            Err(_) => Ulid::new().to_string(),
        }
    }
}

impl Default for TaskIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TaskIdGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskIdGenerator").finish_non_exhaustive()
    }
}
