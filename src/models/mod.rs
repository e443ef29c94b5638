//! Data models for findtask
//!
//! Core abstractions:
//! - Finding: "the analyzer reported X at Y" (supplied from outside)
//! - Task: "X at Y needs fixing" (persisted as a numbered markdown file)

pub mod finding;
pub mod task;

pub use finding::{Finding, SourceLocation, sort_by_location};
pub use task::{Priority, TaskHeader, TaskId, TaskStatus};
