//! Task id allocation
//!
//! Ids are allocated by scanning every partition of the store and taking the
//! highest `TASK-<n>` found in any artifact header. Nothing on disk can make
//! the scan fail: unreadable directories, unreadable files and malformed
//! headers all count as 0 and are logged.

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::ScanError;
use crate::frontmatter;
use crate::models::TaskId;
use crate::paths;

/// One artifact seen during a scan
#[derive(Debug, Clone)]
pub struct ScannedFile {
    /// Partition the file lives in
    pub partition: String,
    /// Full path
    pub path: PathBuf,
    /// Id from the header, `None` when it could not be read or parsed
    pub id: Option<TaskId>,
}

/// Result of scanning a store
#[derive(Debug, Default)]
pub struct ScanReport {
    /// Every artifact file found, in partition then filename order
    pub files: Vec<ScannedFile>,
    /// Failures that were recovered from
    pub errors: Vec<ScanError>,
}

impl ScanReport {
    /// Highest id in the store, 0 when there is none
    #[must_use]
    pub fn max_id(&self) -> u32 {
        self.files
            .iter()
            .filter_map(|f| f.id)
            .map(TaskId::number)
            .max()
            .unwrap_or(0)
    }

    /// First id that is not taken
    #[must_use]
    pub fn next_id(&self) -> TaskId {
        let max = self.max_id();
        if max == u32::MAX {
            log::warn!("task id space exhausted; reusing {}", TaskId::new(max));
        }
        TaskId::new(max.saturating_add(1))
    }
}

/// Scan the given partitions of a store
#[must_use]
pub fn scan<S: AsRef<str>>(store_root: &Path, partitions: &[S]) -> ScanReport {
    let mut report = ScanReport::default();

    for partition in partitions {
        let partition = partition.as_ref();
        let dir = paths::partition_dir(store_root, partition);
        if !dir.is_dir() {
            log::debug!("partition {partition} does not exist at {}", dir.display());
            continue;
        }
        scan_partition(partition, &dir, &mut report);
    }

    report
}

/// Compute the next free id across the given partitions
///
/// An empty or missing store yields `TASK-1`.
#[must_use]
pub fn next_id<S: AsRef<str>>(store_root: &Path, partitions: &[S]) -> TaskId {
    let report = scan(store_root, partitions);
    let next = report.next_id();
    log::debug!(
        "scanned {} artifact(s) with {} recovered error(s); next id is {next}",
        report.files.len(),
        report.errors.len()
    );
    next
}

/// Read one artifact and return its id
pub fn read_id(path: &Path) -> Result<TaskId, ScanError> {
    let content = fs::read_to_string(path).map_err(|source| ScanError::File {
        path: path.to_path_buf(),
        source,
    })?;
    frontmatter::extract_id(&content).map_err(|source| ScanError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn scan_partition(partition: &str, dir: &Path, report: &mut ScanReport) {
    let entries = WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name();

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(source) => {
                let err = ScanError::Directory {
                    path: dir.to_path_buf(),
                    source,
                };
                log::warn!("{err}");
                report.errors.push(err);
                continue;
            },
        };

        if !paths::is_artifact(entry.path()) {
            continue;
        }

        let id = match read_id(entry.path()) {
            Ok(id) => {
                log::debug!("{} -> {id}", entry.path().display());
                Some(id)
            },
            Err(err) => {
                if matches!(err, ScanError::Parse { .. }) {
                    log::debug!("{err}");
                } else {
                    log::warn!("{err}");
                }
                report.errors.push(err);
                None
            },
        };

        report.files.push(ScannedFile {
            partition: partition.to_string(),
            path: entry.into_path(),
            id,
        });
    }
}
