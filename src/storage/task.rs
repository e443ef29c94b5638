//! Task store
//!
//! A store is a directory holding named partitions, each a flat directory of
//! markdown task artifacts. This crate only ever adds files to the active
//! partition; moving files between partitions is left to the task board.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;

use super::allocator::{self, ScanReport};
use crate::error::{ScanError, WriteError};
use crate::frontmatter;
use crate::models::{TaskHeader, TaskId};
use crate::paths::{self, DEFAULT_PARTITIONS};
use crate::synth::TaskFile;

/// A parsed artifact and where it lives
#[derive(Debug, Clone, Serialize)]
pub struct StoredTask {
    /// Partition name
    pub partition: String,
    /// Full path
    pub path: PathBuf,
    /// Parsed header
    pub header: TaskHeader,
}

/// Result of listing a store
#[derive(Debug, Default)]
pub struct TaskListing {
    /// Artifacts with a readable header, ordered by id
    pub tasks: Vec<StoredTask>,
    /// Artifacts that could not be read or parsed
    pub skipped: Vec<ScanError>,
}

/// File-based task store rooted at a directory
#[derive(Debug, Clone)]
pub struct TaskStore {
    root: PathBuf,
    partitions: Vec<String>,
}

impl TaskStore {
    /// Store with an explicit partition list; the first one is active
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, partitions: Vec<String>) -> Self {
        let partitions = if partitions.is_empty() {
            DEFAULT_PARTITIONS.iter().map(ToString::to_string).collect()
        } else {
            partitions
        };
        Self {
            root: root.into(),
            partitions,
        }
    }

    /// Store with the default `tasks`, `completed`, `archive/tasks` layout
    #[must_use]
    pub fn with_default_partitions(root: impl Into<PathBuf>) -> Self {
        Self::new(root, Vec::new())
    }

    /// Store root directory
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Partition names, active first
    #[must_use]
    pub fn partitions(&self) -> &[String] {
        &self.partitions
    }

    /// Name of the partition new artifacts go to
    #[must_use]
    pub fn active_partition(&self) -> &str {
        self.partitions.first().map_or(paths::ACTIVE_PARTITION, String::as_str)
    }

    /// Directory of the active partition
    #[must_use]
    pub fn active_dir(&self) -> PathBuf {
        paths::partition_dir(&self.root, self.active_partition())
    }

    /// Create the active partition directory tree if it is missing
    pub fn ensure_active(&self) -> Result<PathBuf, WriteError> {
        let dir = self.active_dir();
        fs::create_dir_all(&dir).map_err(|source| WriteError {
            path: dir.clone(),
            source,
        })?;
        Ok(dir)
    }

    /// Create every partition directory if missing
    pub fn ensure_all(&self) -> Result<(), WriteError> {
        for partition in &self.partitions {
            let dir = paths::partition_dir(&self.root, partition);
            fs::create_dir_all(&dir).map_err(|source| WriteError { path: dir, source })?;
        }
        Ok(())
    }

    /// Scan every partition for existing ids
    #[must_use]
    pub fn scan(&self) -> ScanReport {
        allocator::scan(&self.root, self.partitions.as_slice())
    }

    /// Next free id across every partition
    #[must_use]
    pub fn next_id(&self) -> TaskId {
        allocator::next_id(&self.root, self.partitions.as_slice())
    }

    /// Write an artifact into the active partition
    ///
    /// Never overwrites: an existing file with the same name is an error.
    pub fn write(&self, file: &TaskFile) -> Result<PathBuf, WriteError> {
        let path = self.active_dir().join(&file.filename);
        let result = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .and_then(|mut handle| handle.write_all(file.content.as_bytes()));

        match result {
            Ok(()) => Ok(path),
            Err(source) => Err(WriteError { path, source }),
        }
    }

    /// Parse every artifact header in the given partition, or all of them
    #[must_use]
    pub fn list(&self, partition: Option<&str>) -> TaskListing {
        let mut listing = TaskListing::default();
        let report = match partition {
            Some(name) => allocator::scan(&self.root, &[name]),
            None => self.scan(),
        };

        for file in report.files {
            let parsed = fs::read_to_string(&file.path)
                .map_err(|source| ScanError::File {
                    path: file.path.clone(),
                    source,
                })
                .and_then(|content| {
                    frontmatter::parse_header(&content).map_err(|source| ScanError::Parse {
                        path: file.path.clone(),
                        source,
                    })
                });

            match parsed {
                Ok(header) => listing.tasks.push(StoredTask {
                    partition: file.partition,
                    path: file.path,
                    header,
                }),
                Err(err) => listing.skipped.push(err),
            }
        }

        // File-level failures were re-read above; only listing failures remain
        listing.skipped.extend(
            report
                .errors
                .into_iter()
                .filter(|err| matches!(err, ScanError::Directory { .. })),
        );

        listing.tasks.sort_by_key(|t| t.header.id);
        listing
    }
}
