//! tasker init command implementation
//!
//! Creates the data directory and a default `tasker.toml` inside it.

use std::fs;
use std::path::{Path, PathBuf};

use crate::cli::Context;
use crate::config::{Config, CONFIG_FILE};
use crate::error::Result;
use crate::output::{emit_success, HumanOutput};

#[derive(serde::Serialize)]
struct InitReport {
    data_dir: PathBuf,
    config: PathBuf,
    created: InitCreated,
}

#[derive(serde::Serialize)]
struct InitCreated {
    data_dir: bool,
    config: bool,
}

pub fn run(ctx: &Context, force: bool) -> Result<()> {
    let created_data_dir = ensure_dir(&ctx.data_dir)?;
    let config_path = ctx.data_dir.join(CONFIG_FILE);
    let created_config = ensure_config(&config_path, force)?;

    let mut human = HumanOutput::new(format!("tasker init: {}", ctx.data_dir.display()));
    human.push_summary("config", config_path.display().to_string());
    if !created_config {
        human.push_warning("config already exists; pass --force to overwrite");
    }

    let report = InitReport {
        data_dir: ctx.data_dir.clone(),
        config: config_path,
        created: InitCreated {
            data_dir: created_data_dir,
            config: created_config,
        },
    };
    emit_success(ctx.output, "init", &report, Some(&human))
}

fn ensure_dir(path: &Path) -> Result<bool> {
    if path.is_dir() {
        return Ok(false);
    }
    fs::create_dir_all(path)?;
    Ok(true)
}

fn ensure_config(path: &Path, force: bool) -> Result<bool> {
    if path.exists() && !force {
        return Ok(false);
    }
    Config::default().save(path)?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_config_respects_force() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);

        assert!(ensure_config(&path, false).unwrap());
        fs::write(&path, "# edited\n").unwrap();
        assert!(!ensure_config(&path, false).unwrap());
        assert_eq!(fs::read_to_string(&path).unwrap(), "# edited\n");

        assert!(ensure_config(&path, true).unwrap());
        assert!(Config::load(&path).is_ok());
    }
}
