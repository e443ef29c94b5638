//! Error types
//!
//! One enum per failure family. Scan and parse failures are recovered inside
//! the allocator; write failures are collected per item by the exporter;
//! bridge failures never leave the bridge.

use std::path::PathBuf;

use thiserror::Error;

/// Header could not be parsed
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// No opening `---` line
    #[error("no header: missing opening sentinel")]
    MissingHeader,

    /// Opening `---` without a closing one
    #[error("unterminated header: missing closing sentinel")]
    Unterminated,

    /// Header has no `id:` line
    #[error("header has no id field")]
    MissingId,

    /// `id:` value is not `TASK-<number>`
    #[error("invalid id value: {0:?}")]
    InvalidId(String),
}

/// A store directory or file could not be read while computing ids
#[derive(Debug, Error)]
pub enum ScanError {
    /// Partition directory could not be listed
    #[error("cannot list {path}: {source}")]
    Directory {
        /// Directory that failed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: walkdir::Error,
    },

    /// Artifact could not be read
    #[error("cannot read {path}: {source}")]
    File {
        /// File that failed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Artifact was read but its header is malformed
    #[error("cannot parse {path}: {source}")]
    Parse {
        /// File that failed
        path: PathBuf,
        /// Parse failure
        #[source]
        source: ParseError,
    },
}

/// One artifact could not be written
#[derive(Debug, Error)]
#[error("cannot write {path}: {source}")]
pub struct WriteError {
    /// Target path
    pub path: PathBuf,
    /// Underlying error
    #[source]
    pub source: std::io::Error,
}

/// Failures that prevent a batch from starting at all
#[derive(Debug, Error)]
pub enum ExportError {
    /// Another batch is already writing to this store
    #[error("an export is already running for {0}")]
    Busy(PathBuf),

    /// Worker thread could not be started or panicked
    #[error("export worker failed: {0}")]
    Worker(String),
}

/// Capability invocation failure (only ever logged)
#[derive(Debug, Error)]
pub enum BridgeError {
    /// Capability is registered but not usable right now
    #[error("capability {0} is not available")]
    Unavailable(String),

    /// External process could not be run
    #[error("failed to run {program}: {source}")]
    Spawn {
        /// Program name
        program: String,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Capability reported a failure of its own
    #[error("{0}")]
    Failed(String),
}

/// Configuration file could not be loaded or saved
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Read or write failed
    #[error("config io error at {path}: {source}")]
    Io {
        /// Config path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// File is not valid TOML for the config schema
    #[error("invalid config {path}: {source}")]
    Parse {
        /// Config path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: toml::de::Error,
    },

    /// Config could not be serialized
    #[error("cannot serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}
