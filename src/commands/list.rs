//! List command - show tasks across store partitions

use std::path::Path;

use findtask::output::{OutputMode, TaskListResult};

/// List tasks, optionally from one partition only
pub fn list(
    project: &Path,
    partition: Option<&str>,
    store: Option<&Path>,
    mode: OutputMode,
) -> anyhow::Result<()> {
    let config = super::load_config(project)?;
    let store = super::task_store(&config, project, store);

    if let Some(name) = partition {
        if !store.partitions().iter().any(|p| p == name) {
            anyhow::bail!("Unknown partition: {name}. Use: {}", store.partitions().join(", "));
        }
    }

    TaskListResult::from(store.list(partition)).render(mode);
    Ok(())
}
