//! Analysis prompt assembly under a character budget.

use tracing::debug;

use crate::github::WorkflowRun;
use crate::logs::{estimate_tokens, filter_relevant};

/// System persona for the analysis call.
pub const SYSTEM_PROMPT: &str = "You are an expert DevOps engineer specializing in debugging \
     CI/CD workflows and GitHub Actions failures. You provide detailed, actionable analysis \
     and fixes.";

/// Context ceiling of the target models, in tokens.
pub const MODEL_TOKEN_CEILING: usize = 128_000;

/// Default character budget for the log portion of the prompt.
///
/// The raw arithmetic allows far more: 128k tokens minus ~8k reserved for
/// the response and ~1k of prompt overhead leaves room for roughly 290k
/// characters of logs at 2.5 chars/token. 30k chars (~12k tokens) is a
/// deliberately conservative ceiling, not a computed bound — estimates are
/// approximate and an over-long prompt fails the whole invocation.
/// Tunable via `--log-budget`.
pub const DEFAULT_LOG_BUDGET: usize = 30_000;

/// At most this many failed job names are listed; the rest become a count.
const MAX_LISTED_JOBS: usize = 5;

/// Build the analysis prompt for a workflow run.
///
/// The header sections (metadata, error summary, task instructions) are
/// always included in full; the logs are filtered into whatever part of
/// `log_budget` the header has not already consumed.
pub fn build_analysis_prompt(run: &WorkflowRun, log_budget: usize) -> String {
    let mut prompt = String::new();

    prompt.push_str(
        "Analyze this GitHub Actions workflow failure and provide a comprehensive diagnosis.\n\n",
    );
    prompt.push_str("## Workflow Information\n");
    prompt.push_str(&format!("- URL: {}\n", run.url));
    prompt.push_str(&format!("- Repository: {}\n", run.repository));
    prompt.push_str(&format!("- Run ID: {}\n", run.run_id));
    prompt.push_str(&format!("- Status: {}\n", run.status));
    prompt.push_str(&format!("- Conclusion: {}\n\n", run.conclusion));

    prompt.push_str("## Error Summary\n");
    let summary = &run.error_summary;
    if !summary.failed_jobs.is_empty() {
        prompt.push_str(&format!("Failed Jobs ({} total):\n", summary.failed_jobs.len()));
        for (i, job) in summary.failed_jobs.iter().enumerate() {
            if i >= MAX_LISTED_JOBS {
                prompt.push_str(&format!(
                    "  ... and {} more\n",
                    summary.failed_jobs.len() - MAX_LISTED_JOBS
                ));
                break;
            }
            prompt.push_str(&format!("  - {job}\n"));
        }
    }

    // Counts only — the details are in the logs themselves.
    if !summary.timeouts.is_empty() {
        prompt.push_str(&format!("Timeout messages: {}\n", summary.timeouts.len()));
    }
    if !summary.failed_tests.is_empty() {
        prompt.push_str(&format!("Failed tests: {}\n", summary.failed_tests.len()));
    }
    if !summary.exit_codes.is_empty() {
        prompt.push_str(&format!("Exit Codes: {:?}\n", summary.unique_exit_codes()));
    }

    // Whatever the header hasn't used of the log budget goes to the logs.
    let remaining = log_budget.saturating_sub(prompt.len());

    prompt.push_str("\n## Failed Job Logs\n");
    prompt.push_str("```\n");
    prompt.push_str(&filter_relevant(&run.failed_logs, remaining));
    prompt.push_str("\n```\n\n");

    prompt.push_str("## Task\n");
    prompt.push_str("Please analyze this workflow failure and provide:\n\n");
    prompt.push_str("1. **Root Cause**: What is the fundamental issue causing the failure?\n");
    prompt.push_str("2. **Detailed Analysis**: Explain what went wrong, including:\n");
    prompt.push_str("   - Which component/test failed\n");
    prompt.push_str("   - Why it failed (timeout, assertion, error, etc.)\n");
    prompt.push_str("   - Any relevant context from the logs\n");
    prompt.push_str("3. **Proposed Fix**: Specific, actionable steps to resolve the issue\n");
    prompt.push_str("4. **Files to Check**: Which files should be examined or modified\n");
    prompt.push_str("5. **Code Changes**: If applicable, suggest specific code modifications\n");
    prompt.push_str(
        "6. **Confidence Level**: Rate your confidence in this diagnosis (High/Medium/Low)\n\n",
    );
    prompt.push_str("Format your response with clear markdown sections using the headers above.\n");

    debug!(
        "prompt assembled: {} chars, ~{} tokens (ceiling {})",
        prompt.len(),
        estimate_tokens(&prompt),
        MODEL_TOKEN_CEILING,
    );

    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logs::summary::ErrorSummary;

    fn sample_run(failed_logs: &str, summary: ErrorSummary) -> WorkflowRun {
        WorkflowRun {
            url: "https://github.com/acme/widgets/actions/runs/42".into(),
            run_id: "42".into(),
            repository: "acme/widgets".into(),
            status: "completed".into(),
            conclusion: "failure".into(),
            failed_logs: failed_logs.into(),
            error_summary: summary,
        }
    }

    #[test]
    fn includes_metadata_and_task_sections() {
        let run = sample_run("Error: boom", ErrorSummary::extract("Error: boom"));
        let prompt = build_analysis_prompt(&run, DEFAULT_LOG_BUDGET);
        assert!(prompt.contains("- Repository: acme/widgets"));
        assert!(prompt.contains("- Conclusion: failure"));
        assert!(prompt.contains("## Failed Job Logs"));
        assert!(prompt.contains("Error: boom"));
        assert!(prompt.contains("**Confidence Level**"));
    }

    #[test]
    fn lists_at_most_five_jobs_then_elides() {
        let mut summary = ErrorSummary::default();
        for i in 0..8 {
            summary.failed_jobs.push(format!("build / job-{i}"));
        }
        let run = sample_run("", summary);
        let prompt = build_analysis_prompt(&run, DEFAULT_LOG_BUDGET);
        assert!(prompt.contains("Failed Jobs (8 total):"));
        assert!(prompt.contains("  - build / job-4\n"));
        assert!(!prompt.contains("  - build / job-5\n"));
        assert!(prompt.contains("... and 3 more"));
    }

    #[test]
    fn surfaces_counts_and_unique_exit_codes() {
        let logs = "\
Error: one
Timed out waiting
Process completed with exit code 1.
Process completed with exit code 1.
Process completed with exit code 2.";
        let run = sample_run(logs, ErrorSummary::extract(logs));
        let prompt = build_analysis_prompt(&run, DEFAULT_LOG_BUDGET);
        assert!(prompt.contains("Timeout messages: 1"));
        assert!(prompt.contains("Exit Codes: [1, 2]"));
    }

    #[test]
    fn log_section_respects_budget() {
        let noisy: String = (0..5000).map(|i| format!("line {i}\n")).collect();
        let run = sample_run(&noisy, ErrorSummary::default());
        let budget = 2_000;
        let prompt = build_analysis_prompt(&run, budget);
        // Generous bound: budget + marker + header/task boilerplate.
        assert!(prompt.len() < budget + 2_000);
        assert!(prompt.contains("...[middle section omitted]..."));
    }

    #[test]
    fn header_larger_than_budget_still_produces_prompt() {
        let run = sample_run("Error: boom", ErrorSummary::default());
        let prompt = build_analysis_prompt(&run, 0);
        // Logs get no budget, but the prompt skeleton is intact.
        assert!(prompt.contains("## Failed Job Logs\n```\n\n```"));
    }
}
