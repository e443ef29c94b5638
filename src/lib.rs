//! findtask - Turn static-analysis findings into numbered backlog task files
//!
//! The library scans a partitioned task store for the highest `TASK-<n>` id,
//! synthesizes one self-describing markdown artifact per finding, and writes
//! a whole batch with contiguous ids taken from a single scan.

// Deny all clippy warnings in this crate
#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    missing_debug_implementations,
    missing_copy_implementations,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code,
    unused_import_braces,
    unused_qualifications
)]
// Allow some pedantic lints that are too noisy or not applicable
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::cargo_common_metadata
)]

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod bridge;
pub mod config;
pub mod error;
pub mod export;
pub mod frontmatter;
pub mod models;
pub mod output;
pub mod paths;
pub mod prompt;
pub mod selection;
pub mod storage;
pub mod synth;
