//! Command-line interface for tasker
//!
//! This module defines the CLI structure using clap derive macros.
//! Each command group lives in its own submodule.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};

use crate::config::{self, Config};
use crate::error::{Error, Result};
use crate::output::OutputOptions;
use crate::persist::TracingLog;
use crate::storage::FileStore;
use crate::store::TaskStore;
use crate::task::Priority;

mod init;
mod task;
mod theme;

/// tasker - priority-sorted to-do list
///
/// Add tasks with a priority, toggle them done, delete them, and keep a
/// light/dark theme preference. State persists in a local data directory.
#[derive(Parser, Debug)]
#[command(name = "tasker")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Directory holding persisted state (defaults to the platform data dir)
    #[arg(long, global = true, env = "TASKER_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Config file (defaults to tasker.toml in the data dir)
    #[arg(long, global = true, env = "TASKER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add a task
    Add {
        /// Task text (multiple words are joined with spaces)
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,

        /// Priority: high, medium, low (defaults to tasks.default_priority)
        #[arg(short, long, value_enum)]
        priority: Option<Priority>,
    },

    /// List tasks in priority order
    List,

    /// Toggle a task between open and completed
    Toggle {
        /// Task id
        id: String,
    },

    /// Delete a task
    Delete {
        /// Task id
        id: String,
    },

    /// Show or change the theme preference
    Theme {
        #[arg(value_enum, default_value_t = ThemeAction::Show)]
        action: ThemeAction,
    },

    /// Write a default tasker.toml into the data dir
    Init {
        /// Overwrite an existing config
        #[arg(long)]
        force: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ThemeAction {
    Show,
    Dark,
    Light,
    Toggle,
}

/// Resolved settings shared by every command.
#[derive(Debug, Clone)]
pub struct Context {
    pub data_dir: PathBuf,
    pub config: Config,
    pub output: OutputOptions,
}

impl Context {
    fn resolve(
        data_dir: Option<PathBuf>,
        config_path: Option<PathBuf>,
        output: OutputOptions,
    ) -> Result<Self> {
        let data_dir = match data_dir.or_else(config::default_data_dir) {
            Some(dir) => dir,
            None => {
                return Err(Error::InvalidArgument(
                    "cannot determine a data directory; pass --data-dir".to_string(),
                ))
            }
        };
        let config = match config_path {
            Some(path) => Config::load(&path)?,
            None => Config::load_from_dir(&data_dir),
        };
        Ok(Self {
            data_dir,
            config,
            output,
        })
    }

    /// Open the file-backed task store for this data dir.
    pub async fn open_store(&self) -> TaskStore {
        let storage = Arc::new(FileStore::new(&self.data_dir));
        TaskStore::initialize(storage, self.config.storage_keys(), Arc::new(TracingLog)).await
    }
}

impl Cli {
    /// Execute the CLI command
    pub fn run(self) -> Result<()> {
        let output = OutputOptions {
            json: self.json,
            quiet: self.quiet,
        };
        let ctx = Context::resolve(self.data_dir, self.config, output)?;
        let command = self.command;

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        runtime.block_on(async move {
            match command {
                Commands::Add { text, priority } => {
                    task::run_add(
                        &ctx,
                        task::AddOptions {
                            text: text.join(" "),
                            priority,
                        },
                    )
                    .await
                }
                Commands::List => task::run_list(&ctx).await,
                Commands::Toggle { id } => task::run_toggle(&ctx, &id).await,
                Commands::Delete { id } => task::run_delete(&ctx, &id).await,
                Commands::Theme { action } => theme::run(&ctx, action).await,
                Commands::Init { force } => init::run(&ctx, force),
            }
        })
    }
}
