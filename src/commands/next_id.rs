//! Next-id command - show which id the next export starts at

use std::path::Path;

use findtask::output::{NextIdResult, OutputMode};

/// Print the next free task id
pub fn next_id(project: &Path, store: Option<&Path>, mode: OutputMode) -> anyhow::Result<()> {
    let config = super::load_config(project)?;
    let store = super::task_store(&config, project, store);
    let report = store.scan();

    NextIdResult {
        next_id: report.next_id().to_string(),
        scanned: report.files.len(),
        unreadable: report.files.iter().filter(|f| f.id.is_none()).count(),
    }
    .render(mode);
    Ok(())
}
