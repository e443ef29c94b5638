//! Prompt and fix commands - hand a finding to the assistant

use std::path::Path;

use findtask::output::{FixResult, OutputMode};

/// Print the assistant prompt for one finding
pub fn prompt(project: &Path, findings: &str, index: usize) -> anyhow::Result<()> {
    let config = super::load_config(project)?;
    let finding = super::nth_finding(super::read_findings(findings)?, index)?;
    print!("{}", config.prompt_builder(project).build(&finding));
    Ok(())
}

/// Send the prompt for one finding to the assistant
pub fn fix(project: &Path, findings: &str, index: usize, mode: OutputMode) -> anyhow::Result<()> {
    let config = super::load_config(project)?;
    let finding = super::nth_finding(super::read_findings(findings)?, index)?;
    let bridge = config.bridge();

    let available = bridge.is_available();
    let sent = available && bridge.send_prompt(&config.prompt_builder(project).build(&finding));

    FixResult {
        available,
        sent,
        rule: finding.rule,
    }
    .render(mode);

    if !sent {
        anyhow::bail!("Prompt was not delivered");
    }
    Ok(())
}
