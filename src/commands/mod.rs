//! Command implementations

mod export;
mod fix;
mod init;
mod list;
mod next_id;

use std::fs;
use std::io::Read;
use std::path::Path;

use anyhow::Context;
use findtask::config::{Config, ConfigSource};
use findtask::models::Finding;
use findtask::storage::TaskStore;

pub use export::{ExportArgs, export};
pub use fix::{fix, prompt};
pub use init::init;
pub use list::list;
pub use next_id::next_id;

/// Load the project configuration, logging where it came from
fn load_config(project: &Path) -> anyhow::Result<Config> {
    let (config, source) = Config::load(project)?;
    match source {
        ConfigSource::Project(path) | ConfigSource::Global(path) => {
            log::debug!("using config {}", path.display());
        },
        ConfigSource::Defaults => log::debug!("no config file, using defaults"),
    }
    Ok(config)
}

/// Task store from config, or from an explicit directory
fn task_store(config: &Config, project: &Path, store: Option<&Path>) -> TaskStore {
    match store {
        Some(dir) => TaskStore::new(project.join(dir), config.store.partitions.clone()),
        None => config.task_store(project),
    }
}

/// Read a JSON array of findings from a file, or stdin for "-"
fn read_findings(source: &str) -> anyhow::Result<Vec<Finding>> {
    let content = if source == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf).context("failed to read findings from stdin")?;
        buf
    } else {
        fs::read_to_string(source).with_context(|| format!("failed to read {source}"))?
    };
    serde_json::from_str(&content).with_context(|| format!("invalid findings JSON in {source}"))
}

/// Pick one finding by 1-based position
fn nth_finding(findings: Vec<Finding>, index: usize) -> anyhow::Result<Finding> {
    let total = findings.len();
    if index == 0 || index > total {
        anyhow::bail!("No finding #{index} (file has {total})");
    }
    findings
        .into_iter()
        .nth(index - 1)
        .ok_or_else(|| anyhow::anyhow!("No finding #{index}"))
}
