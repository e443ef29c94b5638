//! Centralized path definitions for findtask
//!
//! ## Storage Layout
//!
//! ```text
//! project/
//! ├── .findtask.toml                 # Project config (optional)
//! └── backlog/                       # Task store root
//!     ├── tasks/                     # Active partition (exports land here)
//!     │   ├── TASK-1-spotbugs-....md
//!     │   └── TASK-2-spotbugs-....md
//!     ├── completed/                 # Moved here by the task board
//!     └── archive/
//!         └── tasks/                 # Archived tasks
//! ```
//!
//! ```text
//! ~/.findtask/
//! └── config.toml                    # User-level fallback config
//! ```
//!
//! Every partition is scanned when allocating ids, so a task keeps its number
//! reserved after the board moves it out of `tasks/`.

use std::path::{Path, PathBuf};

/// Project configuration filename
pub const CONFIG_FILE: &str = ".findtask.toml";

/// Default store directory, relative to the project root
pub const DEFAULT_STORE_DIR: &str = "backlog";

/// Partition new artifacts are written to
pub const ACTIVE_PARTITION: &str = "tasks";

/// Partitions scanned for existing ids, active first
pub const DEFAULT_PARTITIONS: [&str; 3] = [ACTIVE_PARTITION, "completed", "archive/tasks"];

/// Artifact file extension (without the dot)
pub const ARTIFACT_EXTENSION: &str = "md";

/// Line that opens and closes an artifact header
pub const HEADER_SENTINEL: &str = "---";

/// Global config directory name
const GLOBAL_DIR: &str = ".findtask";

/// Global config filename
const GLOBAL_CONFIG_FILE: &str = "config.toml";

/// Get the project root directory (the current directory).
#[must_use]
pub fn project_root() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

/// Get path to the project config file.
#[must_use]
pub fn project_config(project: &Path) -> PathBuf {
    project.join(CONFIG_FILE)
}

/// Resolve a partition name (which may contain `/`) below a store root.
#[must_use]
pub fn partition_dir(store_root: &Path, partition: &str) -> PathBuf {
    partition
        .split('/')
        .filter(|segment| !segment.is_empty())
        .fold(store_root.to_path_buf(), |dir, segment| dir.join(segment))
}

/// Whether a path looks like a task artifact.
#[must_use]
pub fn is_artifact(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == ARTIFACT_EXTENSION)
}

/// Get the global findtask directory.
///
/// Returns `~/.findtask/`.
#[must_use]
pub fn global_config_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("~")).join(GLOBAL_DIR)
}

/// Get the global config file path.
///
/// Returns `~/.findtask/config.toml`.
#[must_use]
pub fn global_config() -> PathBuf {
    global_config_dir().join(GLOBAL_CONFIG_FILE)
}
