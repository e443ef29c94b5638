//! Task store and id allocation
//!
//! - `allocator`: scans partitions and computes the next free id
//! - `task`: the store itself (layout, writes, listing)

pub mod allocator;
pub mod task;

pub use allocator::{ScanReport, ScannedFile, next_id, scan};
pub use task::{StoredTask, TaskListing, TaskStore};
