//! Export command - create task files from findings

use std::path::{Path, PathBuf};

use findtask::export::{ExportJob, Exporter, JobRegistry, Outcome};
use findtask::models::Finding;
use findtask::output::{ExportResult, OutputMode};
use findtask::selection::Session;

/// Arguments of the export command
#[derive(Debug)]
pub struct ExportArgs {
    /// Findings file, or "-" for stdin
    pub findings: String,
    /// 1-based positions to export; empty exports everything
    pub pick: Vec<usize>,
    /// Keep file order instead of sorting by location
    pub keep_order: bool,
    /// Store directory override
    pub store: Option<PathBuf>,
}

/// Export findings as task files
pub fn export(project: &Path, args: &ExportArgs, mode: OutputMode) -> anyhow::Result<()> {
    let config = super::load_config(project)?;
    let store = super::task_store(&config, project, args.store.as_deref());
    let mut session = Session::with_findings(super::read_findings(&args.findings)?);

    select(&mut session, &args.pick)?;
    let findings = if args.keep_order {
        selected_in_file_order(&session)
    } else {
        session.snapshot()
    };

    let directory = store.active_dir().display().to_string();
    let exporter = Exporter::new(store, config.synthesizer());
    let registry = JobRegistry::new();
    let report = ExportJob::spawn(exporter, findings, &registry)?.join()?;
    session.finish_export(&report);

    let result = ExportResult {
        outcome: report.outcome(),
        directory,
        report,
    };
    result.render(mode);

    if result.outcome == Outcome::Failed {
        anyhow::bail!("No task files were created");
    }
    Ok(())
}

/// Select the picked positions, or everything when none are given
fn select(session: &mut Session, pick: &[usize]) -> anyhow::Result<()> {
    let total = session.findings().len();
    if pick.is_empty() {
        let handles: Vec<_> = session.findings().iter().map(|(h, _)| h).collect();
        for handle in handles {
            session.toggle(handle);
        }
        return Ok(());
    }

    for &position in pick {
        let handle = position
            .checked_sub(1)
            .and_then(|i| session.findings().handle_at(i))
            .ok_or_else(|| anyhow::anyhow!("No finding #{position} (file has {total})"))?;
        if !session.selection().is_selected(handle) {
            session.toggle(handle);
        }
    }
    Ok(())
}

fn selected_in_file_order(session: &Session) -> Vec<Finding> {
    session
        .selection()
        .handles()
        .filter_map(|h| session.findings().get(h).cloned())
        .collect()
}
