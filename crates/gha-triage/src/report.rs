//! Markdown report rendering and best-effort file output.

use std::path::{Path, PathBuf};

use chrono::Local;

use crate::github::WorkflowRun;
use crate::proposal::FixProposal;

/// Render the analysis as a markdown report.
pub fn render_report(run: &WorkflowRun, proposal: &FixProposal, model: &str) -> String {
    let mut report = String::new();

    report.push_str("# GitHub Workflow Failure Analysis Report\n\n");
    report.push_str(&format!("**Workflow URL**: {}\n", run.url));
    report.push_str(&format!("**Repository**: {}\n", run.repository));
    report.push_str(&format!("**Run ID**: {}\n", run.run_id));
    report.push_str(&format!("**Conclusion**: {}\n\n", run.conclusion));

    report.push_str("---\n\n");

    report.push_str("## Root Cause\n\n");
    report.push_str(&proposal.root_cause);
    report.push_str("\n\n");

    report.push_str("## Detailed Analysis\n\n");
    report.push_str(&proposal.analysis);
    report.push_str("\n\n");

    report.push_str("## Proposed Fix\n\n");
    report.push_str(&proposal.proposed_fix);
    report.push_str("\n\n");

    if !proposal.files_to_check.is_empty() {
        report.push_str("## Files to Check\n\n");
        for file in &proposal.files_to_check {
            report.push_str(&format!("- {file}\n"));
        }
        report.push('\n');
    }

    if !proposal.code_changes.is_empty() {
        report.push_str("## Suggested Code Changes\n\n");
        for (i, change) in proposal.code_changes.iter().enumerate() {
            report.push_str(&format!("### Change {}: {}\n\n", i + 1, change.file));
            report.push_str(&format!("{}\n\n", change.description));
            if !change.diff_snippet.is_empty() {
                report.push_str("```diff\n");
                report.push_str(&change.diff_snippet);
                report.push_str("\n```\n\n");
            }
        }
    }

    report.push_str(&format!("**Confidence Level**: {}\n\n", proposal.confidence));

    report.push_str("---\n\n");
    report.push_str(&format!("*AI Model: {model}*\n"));
    report.push_str(&format!("*Generated at {}*\n", Local::now().to_rfc3339()));

    report
}

/// Write the report into `dir` under a timestamp-derived filename.
///
/// Returns the path written. Failure here does not invalidate the report —
/// it was already rendered (and printed) from memory — so the caller only
/// warns on `Err`.
pub fn save_report(report: &str, dir: &Path) -> Result<PathBuf, String> {
    let filename = Local::now()
        .format("workflow-debug-%Y%m%d-%H%M%S.md")
        .to_string();
    let path = dir.join(filename);
    std::fs::write(&path, report)
        .map_err(|e| format!("failed to write {}: {e}", path.display()))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logs::summary::ErrorSummary;
    use crate::proposal::CodeChange;

    fn sample_run() -> WorkflowRun {
        WorkflowRun {
            url: "https://github.com/acme/widgets/actions/runs/42".into(),
            run_id: "42".into(),
            repository: "acme/widgets".into(),
            status: "completed".into(),
            conclusion: "failure".into(),
            failed_logs: String::new(),
            error_summary: ErrorSummary::default(),
        }
    }

    fn sample_proposal() -> FixProposal {
        FixProposal {
            root_cause: "Port collision in the integration fixture.".into(),
            analysis: "The mock server binds a fixed port.".into(),
            proposed_fix: "Bind to port 0.".into(),
            files_to_check: vec!["tests/integration.rs".into()],
            code_changes: vec![],
            confidence: "High".into(),
        }
    }

    #[test]
    fn report_contains_metadata_and_sections() {
        let report = render_report(&sample_run(), &sample_proposal(), "gpt-4o-mini");
        assert!(report.starts_with("# GitHub Workflow Failure Analysis Report"));
        assert!(report.contains("**Repository**: acme/widgets"));
        assert!(report.contains("## Root Cause\n\nPort collision"));
        assert!(report.contains("- tests/integration.rs"));
        assert!(report.contains("**Confidence Level**: High"));
        assert!(report.contains("*AI Model: gpt-4o-mini*"));
    }

    #[test]
    fn code_changes_render_with_diff_fences() {
        let mut proposal = sample_proposal();
        proposal.code_changes.push(CodeChange {
            file: "src/server.rs".into(),
            description: "Use an ephemeral port.".into(),
            diff_snippet: "-bind(8080)\n+bind(0)".into(),
        });
        let report = render_report(&sample_run(), &proposal, "gpt-4o-mini");
        assert!(report.contains("### Change 1: src/server.rs"));
        assert!(report.contains("```diff\n-bind(8080)\n+bind(0)\n```"));
    }

    #[test]
    fn empty_code_changes_section_is_omitted() {
        let report = render_report(&sample_run(), &sample_proposal(), "gpt-4o-mini");
        assert!(!report.contains("## Suggested Code Changes"));
    }

    #[test]
    fn save_report_writes_timestamped_markdown_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = save_report("report body", dir.path()).unwrap();
        let name = path.file_name().unwrap().to_string_lossy();
        assert!(name.starts_with("workflow-debug-"));
        assert!(name.ends_with(".md"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "report body");
    }

    #[test]
    fn save_report_surfaces_write_errors() {
        let missing = Path::new("/nonexistent-dir-for-sure");
        assert!(save_report("body", missing).is_err());
    }
}
