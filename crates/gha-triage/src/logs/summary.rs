//! Structured error extraction from raw CI log text.
//!
//! One linear scan, keyword/regex heuristics per category. There is no
//! grammar for GitHub Actions log output, so false positives and negatives
//! are expected; the summary feeds prompt headers and diagnostics, not
//! anything that has to be exact.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

/// Leading "group / job-name" pattern on job log lines. The name capture is
/// lazy so it stops at the first whitespace run instead of swallowing the
/// rest of the line.
static JOB_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^([^/]+) / ([^/]+?)\s+").unwrap());

/// A file-and-line source location like `runner.rs:42` or `main.go:17`.
static SOURCE_LOC_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\.[A-Za-z]+:\d+").unwrap());

static EXIT_CODE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"exit code (\d+)").unwrap());

/// Structured information about a workflow failure, bucketed per category.
///
/// Each list is independently ordered by first occurrence in the log. A line
/// may land in several categories at once. Only job names are deduplicated;
/// repeated error/timeout/test lines are kept so their counts stay honest.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ErrorSummary {
    /// Unique "group / job" identifiers, first-seen order.
    pub failed_jobs: Vec<String>,
    /// Lines containing `Error:` or `ERROR`.
    pub error_messages: Vec<String>,
    /// Lines mentioning a timeout.
    pub timeouts: Vec<String>,
    /// Lines with a source location plus a failure marker.
    pub failed_tests: Vec<String>,
    /// Every `exit code N` occurrence, in order, duplicates included.
    pub exit_codes: Vec<u32>,
}

impl ErrorSummary {
    /// Scan `logs` line by line and bucket matches into categories.
    ///
    /// Pure aside from diagnostic counters; empty input yields an empty
    /// summary, never an error.
    pub fn extract(logs: &str) -> Self {
        let mut summary = ErrorSummary::default();
        let mut seen_jobs = HashSet::new();

        for line in logs.split('\n') {
            if let Some(caps) = JOB_RE.captures(line) {
                let job = format!("{} / {}", &caps[1], &caps[2]);
                if seen_jobs.insert(job.clone()) {
                    summary.failed_jobs.push(job);
                }
            }

            if line.contains("Timed out") || line.to_lowercase().contains("timeout") {
                summary.timeouts.push(line.trim().to_string());
            }

            if line.contains("Error:") || line.contains("ERROR") {
                summary.error_messages.push(line.trim().to_string());
            }

            if SOURCE_LOC_RE.is_match(line) && (line.contains("FAIL") || line.contains("Error")) {
                summary.failed_tests.push(line.trim().to_string());
            }

            if let Some(caps) = EXIT_CODE_RE.captures(line) {
                if let Ok(code) = caps[1].parse::<u32>() {
                    summary.exit_codes.push(code);
                }
            }
        }

        debug!(
            "error summary: {} failed jobs, {} error messages, {} timeouts, {} failed tests, {} exit codes",
            summary.failed_jobs.len(),
            summary.error_messages.len(),
            summary.timeouts.len(),
            summary.failed_tests.len(),
            summary.exit_codes.len(),
        );

        summary
    }

    /// Exit codes with duplicates removed, first-seen order.
    pub fn unique_exit_codes(&self) -> Vec<u32> {
        let mut seen = HashSet::new();
        self.exit_codes
            .iter()
            .copied()
            .filter(|code| seen.insert(*code))
            .collect()
    }
}
