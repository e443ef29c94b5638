//! Initialize findtask in a project

use std::fs;
use std::path::Path;

use findtask::config::{Config, starter_config};
use findtask::output::{OperationResult, OutputMode};
use findtask::paths;

/// Write `.findtask.toml` and create the store partitions
pub fn init(project: &Path, force: bool, mode: OutputMode) -> anyhow::Result<()> {
    let config_path = paths::project_config(project);

    let wrote_config = if config_path.exists() && !force {
        false
    } else {
        fs::write(&config_path, starter_config())?;
        true
    };

    let config = Config::load_from(&config_path)?;
    let store = config.task_store(project);
    store.ensure_all()?;

    let message = if wrote_config {
        format!(
            "Created {}\nCreated task store at {}",
            paths::CONFIG_FILE,
            store.root().display()
        )
    } else {
        format!(
            "Already initialized ({} exists). Use --force to reinitialize.\nTask store at {}",
            paths::CONFIG_FILE,
            store.root().display()
        )
    };

    OperationResult {
        success: true,
        message,
    }
    .render(mode);
    Ok(())
}
