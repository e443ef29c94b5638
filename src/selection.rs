//! Finding selection
//!
//! Findings are stored once in a [`FindingArena`] and referred to by
//! [`FindingHandle`]. A [`Selection`] is a set of handles, so two findings with
//! identical contents are still two separate entries.
//!
//! A [`Session`] ties an arena and a selection together for one caller; it is
//! created explicitly and cleared once its selection has been exported.

use std::collections::BTreeSet;

use crate::export::ExportReport;
use crate::models::{Finding, sort_by_location};

/// Opaque reference to a finding in an arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FindingHandle(usize);

impl FindingHandle {
    /// Insertion position in the arena
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Append-only store of findings
#[derive(Debug, Clone, Default)]
pub struct FindingArena {
    findings: Vec<Finding>,
}

impl FindingArena {
    /// Empty arena
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a finding and return its handle
    pub fn insert(&mut self, finding: Finding) -> FindingHandle {
        self.findings.push(finding);
        FindingHandle(self.findings.len() - 1)
    }

    /// Look up a finding
    #[must_use]
    pub fn get(&self, handle: FindingHandle) -> Option<&Finding> {
        self.findings.get(handle.0)
    }

    /// Handle for an insertion position, if it exists
    #[must_use]
    pub fn handle_at(&self, index: usize) -> Option<FindingHandle> {
        (index < self.findings.len()).then_some(FindingHandle(index))
    }

    /// Number of findings
    #[must_use]
    pub fn len(&self) -> usize {
        self.findings.len()
    }

    /// Whether the arena is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.findings.is_empty()
    }

    /// All findings with their handles, in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (FindingHandle, &Finding)> {
        self.findings.iter().enumerate().map(|(i, f)| (FindingHandle(i), f))
    }
}

/// Identifies a registered selection listener
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenerId(usize);

type Listener = Box<dyn Fn(usize) + Send>;

/// Set of selected handles with change notification
///
/// Listeners receive the new selection count after every change.
#[derive(Default)]
pub struct Selection {
    selected: BTreeSet<FindingHandle>,
    listeners: Vec<(ListenerId, Listener)>,
    next_listener: usize,
}

impl std::fmt::Debug for Selection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Selection")
            .field("selected", &self.selected)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl Selection {
    /// Empty selection
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip a handle in or out; returns whether it is now selected
    pub fn toggle(&mut self, handle: FindingHandle) -> bool {
        let selected = if self.selected.remove(&handle) {
            false
        } else {
            self.selected.insert(handle);
            true
        };
        self.notify();
        selected
    }

    /// Whether `handle` is selected
    #[must_use]
    pub fn is_selected(&self, handle: FindingHandle) -> bool {
        self.selected.contains(&handle)
    }

    /// Number of selected handles
    #[must_use]
    pub fn count(&self) -> usize {
        self.selected.len()
    }

    /// Selected handles in insertion order
    pub fn handles(&self) -> impl Iterator<Item = FindingHandle> + '_ {
        self.selected.iter().copied()
    }

    /// Deselect everything
    pub fn clear(&mut self) {
        self.selected.clear();
        self.notify();
    }

    /// Register a change listener
    pub fn add_listener(&mut self, listener: impl Fn(usize) + Send + 'static) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Unregister a change listener; returns whether it was registered
    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        self.listeners.len() < before
    }

    fn notify(&self) {
        let count = self.count();
        for (_, listener) in &self.listeners {
            listener(count);
        }
    }
}

/// One caller's findings and selection
#[derive(Debug, Default)]
pub struct Session {
    arena: FindingArena,
    selection: Selection,
}

impl Session {
    /// Empty session
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Session over an existing set of findings
    #[must_use]
    pub fn with_findings(findings: impl IntoIterator<Item = Finding>) -> Self {
        let mut session = Self::new();
        for finding in findings {
            session.arena.insert(finding);
        }
        session
    }

    /// Add a finding and return its handle
    pub fn add(&mut self, finding: Finding) -> FindingHandle {
        self.arena.insert(finding)
    }

    /// All findings
    #[must_use]
    pub const fn findings(&self) -> &FindingArena {
        &self.arena
    }

    /// Current selection
    #[must_use]
    pub const fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Current selection, for registering listeners
    pub const fn selection_mut(&mut self) -> &mut Selection {
        &mut self.selection
    }

    /// Toggle a finding; unknown handles are ignored and return `false`
    pub fn toggle(&mut self, handle: FindingHandle) -> bool {
        if self.arena.get(handle).is_none() {
            return false;
        }
        self.selection.toggle(handle)
    }

    /// Selected findings in a stable export order
    ///
    /// Sorted by source path, line, rule, then insertion order, so the same
    /// selection always maps to the same ids.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Finding> {
        let mut picked: Vec<Finding> = self
            .selection
            .handles()
            .filter_map(|h| self.arena.get(h).cloned())
            .collect();
        // Stable sort over handle order breaks ties by insertion order
        sort_by_location(&mut picked);
        picked
    }

    /// Clear the selection once a batch has written something
    pub fn finish_export(&mut self, report: &ExportReport) {
        if report.created > 0 {
            self.selection.clear();
        }
    }
}
