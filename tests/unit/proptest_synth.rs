//! Property tests for synthesis and header parsing

use findtask::frontmatter::{extract_id, parse_header};
use findtask::models::{Finding, SourceLocation, TaskId};
use findtask::synth::MAX_BASENAME_LEN;
use proptest::prelude::*;

use crate::common::synthesizer;

fn arb_finding() -> impl Strategy<Value = Finding> {
    (
        "\\PC{0,60}",
        "[A-Z_]{0,20}",
        "\\PC{0,80}",
        -5i32..500,
        "[a-z/]{0,20}",
        "\\PC{0,30}",
        0u32..100_000,
    )
        .prop_map(|(rule, category, message, severity, dir, file, line)| {
            Finding::new(
                rule,
                category,
                message,
                severity,
                SourceLocation::new(format!("{dir}{file}"), file, line),
            )
        })
}

proptest! {
    #[test]
    fn synthesized_id_always_reparses(finding in arb_finding(), n in 1u32..u32::MAX) {
        let file = synthesizer().synthesize(&finding, TaskId::new(n));
        prop_assert_eq!(extract_id(&file.content), Ok(TaskId::new(n)));
        let header = parse_header(&file.content).unwrap();
        prop_assert_eq!(header.id, TaskId::new(n));
        prop_assert_eq!(header.status, "To Do");
    }

    #[test]
    fn filename_is_bounded_and_safe(finding in arb_finding(), n in 1u32..u32::MAX) {
        let name = synthesizer().filename(&finding, TaskId::new(n));
        prop_assert!(name.len() <= MAX_BASENAME_LEN + 3);
        prop_assert!(name.ends_with(".md"));
        let base = name.trim_end_matches(".md");
        prop_assert!(base.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-'));
        let prefix = format!("TASK-{n}-");
        prop_assert!(name.starts_with(&prefix));
    }
}
