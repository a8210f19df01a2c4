//! Display attributes for tasks.
//!
//! Pure mappings from task data to what a renderer needs: a background color
//! token per priority, strikethrough for completed tasks, and the item label.

use serde::Serialize;

use crate::task::{Priority, Task};

/// Background color token for a task row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorToken {
    Alert,
    Warning,
    Success,
    Neutral,
}

impl ColorToken {
    pub fn for_priority(priority: Priority) -> Self {
        match priority {
            Priority::High => ColorToken::Alert,
            Priority::Medium => ColorToken::Warning,
            Priority::Low => ColorToken::Success,
        }
    }

    /// Map a raw priority label; unrecognized labels get [`ColorToken::Neutral`].
    pub fn for_label(label: &str) -> Self {
        Priority::from_label(label)
            .map(Self::for_priority)
            .unwrap_or(ColorToken::Neutral)
    }

    pub fn hex(self) -> &'static str {
        match self {
            ColorToken::Alert => "#ff6b6b",
            ColorToken::Warning => "#ffa500",
            ColorToken::Success => "#32cd32",
            ColorToken::Neutral => "#eee",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TaskStyle {
    pub background: ColorToken,
    pub strikethrough: bool,
}

impl TaskStyle {
    pub fn for_task(task: &Task) -> Self {
        Self {
            background: ColorToken::for_priority(task.priority),
            strikethrough: task.completed,
        }
    }
}

/// Row label, e.g. `Buy milk (Low)`.
pub fn display_label(task: &Task) -> String {
    format!("{} ({})", task.text, task.priority)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priorities_map_to_tokens() {
        assert_eq!(ColorToken::for_priority(Priority::High), ColorToken::Alert);
        assert_eq!(ColorToken::for_priority(Priority::Medium), ColorToken::Warning);
        assert_eq!(ColorToken::for_priority(Priority::Low), ColorToken::Success);
    }

    #[test]
    fn unknown_label_is_neutral() {
        assert_eq!(ColorToken::for_label("Low"), ColorToken::Success);
        assert_eq!(ColorToken::for_label("Someday"), ColorToken::Neutral);
        assert_eq!(ColorToken::for_label(""), ColorToken::Neutral);
        assert_eq!(ColorToken::Neutral.hex(), "#eee");
    }

    #[test]
    fn completed_tasks_are_struck_through() {
        let mut task = Task::new("1", "Call bank", Priority::High);
        assert_eq!(
            TaskStyle::for_task(&task),
            TaskStyle {
                background: ColorToken::Alert,
                strikethrough: false
            }
        );
        task.completed = true;
        assert!(TaskStyle::for_task(&task).strikethrough);
        assert_eq!(display_label(&task), "Call bank (High)");
    }
}
