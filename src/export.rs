//! Batch export of findings into the task store
//!
//! A batch goes `Idle -> Scanning -> Writing(0..n) -> Completed`. The store is
//! scanned exactly once; finding `i` gets id `base + i`. A failed write is
//! recorded and the batch moves on. There is no failed end state: a batch
//! that wrote nothing is `Completed` with only errors.
//!
//! Two batches against the same store must not overlap, since both would
//! snapshot the same base id. [`JobRegistry`] hands out one in-flight guard per
//! store root; [`ExportJob`] takes one before it starts.

use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};

use serde::Serialize;

use crate::error::ExportError;
use crate::models::{Finding, TaskId};
use crate::storage::TaskStore;
use crate::synth::Synthesizer;

/// Where a batch is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum BatchState {
    /// Not started
    #[default]
    Idle,
    /// Computing the base id
    Scanning,
    /// Writing item `index` of `total`
    Writing {
        /// Zero-based item index
        index: usize,
        /// Batch size
        total: usize,
    },
    /// Done, successfully or not
    Completed,
}

/// Cooperative cancellation flag, checked between items
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// New, not cancelled
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the batch to stop before its next item
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation was requested
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// An artifact written by a batch
#[derive(Debug, Clone, Serialize)]
pub struct WrittenTask {
    /// Position in the input
    pub index: usize,
    /// Assigned id
    pub id: TaskId,
    /// Where it was written
    pub path: PathBuf,
}

/// A per-item failure
#[derive(Debug, Clone, Serialize)]
pub struct ItemError {
    /// Position in the input
    pub index: usize,
    /// Id that was assigned, if any
    pub id: Option<TaskId>,
    /// Rule of the finding, for reporting
    pub rule: String,
    /// Target path, if one was computed
    pub path: Option<PathBuf>,
    /// What went wrong
    pub message: String,
}

/// How a finished batch should be presented
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Empty input
    Nothing,
    /// Everything written
    Success,
    /// Some written, some failed or cancelled
    Partial,
    /// Nothing written
    Failed,
}

/// Aggregate result of one batch
#[derive(Debug, Clone, Default, Serialize)]
pub struct ExportReport {
    /// Number of findings handed in
    pub requested: usize,
    /// Number of artifacts written
    pub created: usize,
    /// Per-item failures
    pub errors: Vec<ItemError>,
    /// Written artifacts in input order
    pub written: Vec<WrittenTask>,
    /// First id of the batch, `None` when the store was never scanned
    pub base_id: Option<TaskId>,
    /// Whether the batch was cancelled before finishing
    pub cancelled: bool,
}

impl ExportReport {
    /// Classify the batch result
    #[must_use]
    pub fn outcome(&self) -> Outcome {
        if self.requested == 0 {
            Outcome::Nothing
        } else if self.created == 0 {
            Outcome::Failed
        } else if self.errors.is_empty() && !self.cancelled {
            Outcome::Success
        } else {
            Outcome::Partial
        }
    }
}

/// Writes batches of findings into one store
#[derive(Debug, Clone)]
pub struct Exporter {
    store: TaskStore,
    synthesizer: Synthesizer,
}

impl Exporter {
    /// Exporter for `store`, building artifacts with `synthesizer`
    #[must_use]
    pub const fn new(store: TaskStore, synthesizer: Synthesizer) -> Self {
        Self { store, synthesizer }
    }

    /// Target store
    #[must_use]
    pub const fn store(&self) -> &TaskStore {
        &self.store
    }

    /// Export `findings` in the given order
    #[must_use]
    pub fn export_batch(&self, findings: &[Finding]) -> ExportReport {
        self.export_batch_with(findings, &CancelToken::new(), |_| {})
    }

    /// Export `findings`, honouring `cancel` and reporting state changes
    pub fn export_batch_with<F>(
        &self,
        findings: &[Finding],
        cancel: &CancelToken,
        mut on_state: F,
    ) -> ExportReport
    where
        F: FnMut(BatchState),
    {
        let mut report = ExportReport {
            requested: findings.len(),
            ..ExportReport::default()
        };

        if findings.is_empty() {
            on_state(BatchState::Completed);
            return report;
        }

        // A failure here shows up again on every write below
        if let Err(err) = self.store.ensure_active() {
            log::warn!("{err}");
        }

        on_state(BatchState::Scanning);
        let base = self.store.next_id();
        report.base_id = Some(base);
        log::debug!("batch of {} starts at {base}", findings.len());

        let total = findings.len();
        for (index, finding) in findings.iter().enumerate() {
            if cancel.is_cancelled() {
                log::info!("Export cancelled after {index} of {total} task(s)");
                report.cancelled = true;
                break;
            }

            on_state(BatchState::Writing { index, total });
            log::info!("Creating task {} of {total}", index + 1);

            let Some(id) = offset_id(base, index) else {
                report.errors.push(ItemError {
                    index,
                    id: None,
                    rule: finding.rule.clone(),
                    path: None,
                    message: "task id space exhausted".to_string(),
                });
                continue;
            };

            let file = self.synthesizer.synthesize(finding, id);
            match self.store.write(&file) {
                Ok(path) => {
                    report.created += 1;
                    report.written.push(WrittenTask { index, id, path });
                },
                Err(err) => {
                    log::warn!("{err}");
                    report.errors.push(ItemError {
                        index,
                        id: Some(id),
                        rule: finding.rule.clone(),
                        message: err.to_string(),
                        path: Some(err.path),
                    });
                },
            }
        }

        on_state(BatchState::Completed);
        report
    }
}

fn offset_id(base: TaskId, index: usize) -> Option<TaskId> {
    u32::try_from(index)
        .ok()
        .and_then(|offset| base.number().checked_add(offset))
        .map(TaskId::new)
}

/// Tracks which store roots have a batch in flight
#[derive(Debug, Clone, Default)]
pub struct JobRegistry {
    in_flight: Arc<Mutex<HashSet<PathBuf>>>,
}

impl JobRegistry {
    /// Empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `store_root`; fails if a batch already holds it
    pub fn acquire(&self, store_root: &Path) -> Result<InFlightGuard, ExportError> {
        let key = registry_key(store_root);
        let mut in_flight = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        if !in_flight.insert(key.clone()) {
            return Err(ExportError::Busy(key));
        }
        Ok(InFlightGuard {
            registry: self.clone(),
            key,
        })
    }

    /// Whether a batch currently holds `store_root`
    #[must_use]
    pub fn is_busy(&self, store_root: &Path) -> bool {
        let key = registry_key(store_root);
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&key)
    }
}

/// Canonical form of `store_root`, stable across the store being created
///
/// The deepest ancestor that exists is canonicalized and the missing tail is
/// appended with `.` and `..` resolved, so a root keeps the same key before
/// and after its directories appear.
fn registry_key(store_root: &Path) -> PathBuf {
    let absolute = if store_root.is_absolute() {
        store_root.to_path_buf()
    } else {
        std::env::current_dir().map_or_else(|_| store_root.to_path_buf(), |cwd| cwd.join(store_root))
    };

    for ancestor in absolute.ancestors() {
        let Ok(mut key) = ancestor.canonicalize() else {
            continue;
        };
        let Ok(missing) = absolute.strip_prefix(ancestor) else {
            continue;
        };
        for part in missing.components() {
            match part {
                Component::ParentDir => {
                    key.pop();
                },
                Component::Normal(name) => key.push(name),
                _ => {},
            }
        }
        return key;
    }
    absolute
}

/// Releases a store root when dropped
#[derive(Debug)]
pub struct InFlightGuard {
    registry: JobRegistry,
    key: PathBuf,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.registry
            .in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.key);
    }
}

/// A batch running on its own worker thread
#[derive(Debug)]
pub struct ExportJob {
    cancel: CancelToken,
    state: Arc<Mutex<BatchState>>,
    handle: JoinHandle<ExportReport>,
}

impl ExportJob {
    /// Start exporting `findings` in the background
    ///
    /// The store is claimed in `registry` before the worker starts, so a
    /// second job for the same store fails here with [`ExportError::Busy`].
    pub fn spawn(
        exporter: Exporter,
        findings: Vec<Finding>,
        registry: &JobRegistry,
    ) -> Result<Self, ExportError> {
        let guard = registry.acquire(exporter.store().root())?;
        let cancel = CancelToken::new();
        let state = Arc::new(Mutex::new(BatchState::Idle));

        let worker_cancel = cancel.clone();
        let worker_state = Arc::clone(&state);
        let handle = thread::Builder::new()
            .name("findtask-export".to_string())
            .spawn(move || {
                let _guard = guard;
                exporter.export_batch_with(&findings, &worker_cancel, |next| {
                    *worker_state.lock().unwrap_or_else(PoisonError::into_inner) = next;
                })
            })
            .map_err(|e| ExportError::Worker(e.to_string()))?;

        Ok(Self {
            cancel,
            state,
            handle,
        })
    }

    /// Request cancellation; items already written stay on disk
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Current batch state
    #[must_use]
    pub fn state(&self) -> BatchState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Whether the worker has exited
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the batch and return its report
    pub fn join(self) -> Result<ExportReport, ExportError> {
        self.handle
            .join()
            .map_err(|_| ExportError::Worker("export worker panicked".to_string()))
    }
}
