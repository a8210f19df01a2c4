//! tasker task command implementations (add, list, toggle, delete).

use std::collections::HashSet;

use serde::Serialize;

use crate::cli::Context;
use crate::error::{Error, Result};
use crate::output::{emit_success, HumanOutput};
use crate::present::{display_label, TaskStyle};
use crate::store::TaskStore;
use crate::task::{Priority, Task};

pub struct AddOptions {
    pub text: String,
    pub priority: Option<Priority>,
}

#[derive(Serialize)]
struct TaskView<'a> {
    #[serde(flatten)]
    task: &'a Task,
    label: String,
    style: TaskStyle,
}

impl<'a> TaskView<'a> {
    fn new(task: &'a Task) -> Self {
        Self {
            task,
            label: display_label(task),
            style: TaskStyle::for_task(task),
        }
    }
}

#[derive(Serialize)]
struct AddReport<'a> {
    added: Option<TaskView<'a>>,
    tasks: Vec<TaskView<'a>>,
}

#[derive(Serialize)]
struct ListReport<'a> {
    dark_mode: bool,
    tasks: Vec<TaskView<'a>>,
}

#[derive(Serialize)]
struct ChangeReport<'a> {
    id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    completed: Option<bool>,
    tasks: Vec<TaskView<'a>>,
}

fn views(tasks: &[Task]) -> Vec<TaskView<'_>> {
    tasks.iter().map(TaskView::new).collect()
}

fn task_line(task: &Task) -> String {
    let mark = if task.completed { "x" } else { " " };
    format!("[{mark}] {}  {}", task.id, display_label(task))
}

fn push_task_lines(human: &mut HumanOutput, tasks: &[Task]) {
    for task in tasks {
        human.push_detail(task_line(task));
    }
}

fn count_label(n: usize) -> String {
    if n == 1 {
        "1 task".to_string()
    } else {
        format!("{n} tasks")
    }
}

pub async fn run_add(ctx: &Context, options: AddOptions) -> Result<()> {
    let priority = options
        .priority
        .unwrap_or(ctx.config.tasks.default_priority);

    let mut store = ctx.open_store().await;
    let before: HashSet<String> = store.tasks().iter().map(|t| t.id.clone()).collect();
    store.add_task(&options.text, priority);
    let tasks = store.tasks().to_vec();
    store.shutdown().await;

    let added = tasks.iter().find(|t| !before.contains(&t.id));
    let mut human = match added {
        Some(task) => {
            let mut human = HumanOutput::new(format!("tasker add: {}", display_label(task)));
            human.push_summary("id", task.id.clone());
            human
        }
        None => {
            let mut human = HumanOutput::new("tasker add: nothing added");
            human.push_warning("task text is blank");
            human
        }
    };
    push_task_lines(&mut human, &tasks);

    let report = AddReport {
        added: added.map(TaskView::new),
        tasks: views(&tasks),
    };
    emit_success(ctx.output, "add", &report, Some(&human))
}

pub async fn run_list(ctx: &Context) -> Result<()> {
    let store = ctx.open_store().await;
    let tasks = store.tasks().to_vec();
    let dark_mode = store.dark_mode();
    store.shutdown().await;

    let done = tasks.iter().filter(|t| t.completed).count();
    let mut human = HumanOutput::new(format!("tasker list: {}", count_label(tasks.len())));
    human.push_summary("completed", done.to_string());
    human.push_summary("theme", if dark_mode { "dark" } else { "light" });
    push_task_lines(&mut human, &tasks);

    let report = ListReport {
        dark_mode,
        tasks: views(&tasks),
    };
    emit_success(ctx.output, "list", &report, Some(&human))
}

pub async fn run_toggle(ctx: &Context, id: &str) -> Result<()> {
    let mut store = ctx.open_store().await;
    ensure_exists(&store, id)?;
    store.toggle_task(id);
    let completed = store.get(id).map(|t| t.completed);
    let tasks = store.tasks().to_vec();
    store.shutdown().await;

    let state = if completed == Some(true) { "completed" } else { "open" };
    let mut human = HumanOutput::new(format!("tasker toggle: {id} is {state}"));
    push_task_lines(&mut human, &tasks);

    let report = ChangeReport {
        id,
        completed,
        tasks: views(&tasks),
    };
    emit_success(ctx.output, "toggle", &report, Some(&human))
}

pub async fn run_delete(ctx: &Context, id: &str) -> Result<()> {
    let mut store = ctx.open_store().await;
    ensure_exists(&store, id)?;
    store.delete_task(id);
    let tasks = store.tasks().to_vec();
    store.shutdown().await;

    let mut human = HumanOutput::new(format!("tasker delete: removed {id}"));
    human.push_summary("remaining", count_label(tasks.len()));
    push_task_lines(&mut human, &tasks);

    let report = ChangeReport {
        id,
        completed: None,
        tasks: views(&tasks),
    };
    emit_success(ctx.output, "delete", &report, Some(&human))
}

fn ensure_exists(store: &TaskStore, id: &str) -> Result<()> {
    if store.get(id).is_none() {
        return Err(Error::TaskNotFound(id.to_string()));
    }
    Ok(())
}
