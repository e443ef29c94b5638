//! Configuration
//!
//! Settings come from `.findtask.toml` in the project root. When that file is
//! missing, `~/.findtask/config.toml` is used, and failing that the defaults.
//! Files are never merged: the first one found wins.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::bridge::{self, AssistantBridge, DEFAULT_CAPABILITY};
use crate::error::ConfigError;
use crate::paths::{self, DEFAULT_PARTITIONS, DEFAULT_STORE_DIR};
use crate::prompt::PromptBuilder;
use crate::storage::TaskStore;
use crate::synth::{Synthesizer, ToolProfile};

/// findtask configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Task store layout
    #[serde(default)]
    pub store: StoreConfig,
    /// Analyzer the findings come from
    #[serde(default)]
    pub tool: ToolProfile,
    /// External assistant
    #[serde(default)]
    pub assistant: AssistantConfig,
    /// Prompt construction
    #[serde(default)]
    pub prompt: PromptConfig,
}

/// Task store layout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Store root, relative to the project root
    pub root: String,
    /// Partitions scanned for ids; the first receives new tasks
    pub partitions: Vec<String>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            root: DEFAULT_STORE_DIR.to_string(),
            partitions: DEFAULT_PARTITIONS.iter().map(ToString::to_string).collect(),
        }
    }
}

/// External assistant settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantConfig {
    /// Capability name to register the command under
    pub capability: String,
    /// Command (argv) that receives the prompt on stdin; empty disables
    pub command: Vec<String>,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            capability: DEFAULT_CAPABILITY.to_string(),
            command: Vec::new(),
        }
    }
}

/// Prompt settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptConfig {
    /// Directories, relative to the project root, searched for source files
    pub source_roots: Vec<String>,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            source_roots: vec![
                ".".to_string(),
                "src/main/java".to_string(),
                "src/test/java".to_string(),
            ],
        }
    }
}

/// Where the active configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Project `.findtask.toml`
    Project(PathBuf),
    /// User-level `~/.findtask/config.toml`
    Global(PathBuf),
    /// Built-in defaults
    Defaults,
}

impl Config {
    /// Load the configuration for a project
    pub fn load(project: &Path) -> Result<(Self, ConfigSource), ConfigError> {
        let project_file = paths::project_config(project);
        if project_file.exists() {
            let config = Self::load_from(&project_file)?;
            return Ok((config, ConfigSource::Project(project_file)));
        }

        let global_file = paths::global_config();
        if global_file.exists() {
            let config = Self::load_from(&global_file)?;
            return Ok((config, ConfigSource::Global(global_file)));
        }

        Ok((Self::default(), ConfigSource::Defaults))
    }

    /// Load a specific config file
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Write this config to `path`
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Task store for a project
    #[must_use]
    pub fn task_store(&self, project: &Path) -> TaskStore {
        TaskStore::new(project.join(&self.store.root), self.store.partitions.clone())
    }

    /// Synthesizer stamping today's date
    #[must_use]
    pub fn synthesizer(&self) -> Synthesizer {
        Synthesizer::today(self.tool.clone())
    }

    /// Assistant bridge for the configured command
    #[must_use]
    pub fn bridge(&self) -> AssistantBridge {
        let registry =
            bridge::registry_from_command(&self.assistant.capability, &self.assistant.command);
        AssistantBridge::new(registry, self.assistant.capability.clone())
    }

    /// Prompt builder resolving sources below `project`
    #[must_use]
    pub fn prompt_builder(&self, project: &Path) -> PromptBuilder {
        let roots = self.prompt.source_roots.iter().map(|r| project.join(r)).collect();
        PromptBuilder::new(self.tool.display_name.clone(), roots)
    }
}

/// Commented starter config written by `findtask init`
#[must_use]
pub fn starter_config() -> String {
    format!(
        r#"# findtask configuration

[store]
# Task store, relative to this file
root = "{DEFAULT_STORE_DIR}"
# Scanned for existing ids; new tasks go to the first one
partitions = ["tasks", "completed", "archive/tasks"]

[tool]
name = "spotbugs"
display_name = "SpotBugs"
docs_url = "https://spotbugs.readthedocs.io/"

[assistant]
capability = "{DEFAULT_CAPABILITY}"
# Command that receives a prompt on stdin, e.g. ["my-assistant", "--stdin"]
command = []

[prompt]
source_roots = [".", "src/main/java", "src/test/java"]
"#
    )
}
