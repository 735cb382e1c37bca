//! GitHub Actions data access via the `gh` CLI.
//!
//! The `gh` binary handles auth and pagination, so this module only shells
//! out and parses. Log availability is best-effort: a job-specific fetch
//! falls back to the run's failed-job logs, and a total fetch failure
//! degrades to empty logs rather than aborting the run.

use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::logs::summary::ErrorSummary;

/// Job URL: `github.com/{owner}/{repo}/actions/runs/{run_id}/job/{job_id}`.
static JOB_URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"github\.com/([^/]+/[^/]+)/actions/runs/(\d+)/job/(\d+)").unwrap());

/// Run URL: `github.com/{owner}/{repo}/actions/runs/{run_id}`.
static RUN_URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"github\.com/([^/]+/[^/]+)/actions/runs/(\d+)").unwrap());

/// A GitHub Actions workflow run with its fetched failure logs.
#[derive(Debug, Clone)]
pub struct WorkflowRun {
    pub url: String,
    pub run_id: String,
    pub repository: String,
    pub status: String,
    pub conclusion: String,
    pub failed_logs: String,
    pub error_summary: ErrorSummary,
}

/// Extract `(repository, run_id, job_id)` from a GitHub Actions URL.
///
/// Both the workflow-run and the job URL form are accepted; the job form is
/// tried first since it is more specific. Anything else is an input error —
/// there is nothing to recover from a malformed reference.
pub fn parse_workflow_url(url: &str) -> Result<(String, String, Option<String>), String> {
    debug!("parsing workflow URL: {url}");

    if let Some(caps) = JOB_URL_RE.captures(url) {
        debug!("job URL: repo={}, run={}, job={}", &caps[1], &caps[2], &caps[3]);
        return Ok((caps[1].to_string(), caps[2].to_string(), Some(caps[3].to_string())));
    }

    if let Some(caps) = RUN_URL_RE.captures(url) {
        debug!("workflow URL: repo={}, run={}", &caps[1], &caps[2]);
        return Ok((caps[1].to_string(), caps[2].to_string(), None));
    }

    Err("invalid GitHub Actions URL (expected a workflow-run or job URL)".to_string())
}

#[derive(Deserialize)]
struct RunStatus {
    status: Option<String>,
    // "conclusion" is null while a run is still in progress.
    conclusion: Option<String>,
}

/// Run `gh` with `args` and return its stdout, or stderr-flavored error.
async fn gh_output(args: &[&str]) -> Result<String, String> {
    debug!("running: gh {}", args.join(" "));
    let output = Command::new("gh")
        .args(args)
        .output()
        .await
        .map_err(|e| format!("failed to run gh: {e}"))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(format!("gh exited with {}: {}", output.status, stderr.trim()));
    }

    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}

/// Fetch run metadata and failure logs for the run behind `workflow_url`.
///
/// The status query is the only hard dependency; log fetches degrade
/// gracefully (see module docs). The returned run already carries its
/// extracted [`ErrorSummary`].
pub async fn fetch_workflow_run(workflow_url: &str) -> Result<WorkflowRun, String> {
    let (repository, run_id, job_id) = parse_workflow_url(workflow_url)?;

    info!("fetching status for run {run_id} in {repository}");
    let status_json = gh_output(&[
        "run",
        "view",
        &run_id,
        "--repo",
        &repository,
        "--json",
        "status,conclusion",
    ])
    .await
    .map_err(|e| format!("failed to get workflow status: {e}"))?;

    let run_status: RunStatus = serde_json::from_str(&status_json)
        .map_err(|e| format!("failed to parse workflow status: {e}"))?;
    let status = run_status.status.unwrap_or_default();
    let conclusion = run_status.conclusion.unwrap_or_default();
    info!("workflow status: {status}, conclusion: {conclusion}");

    let failed_logs = match &job_id {
        Some(job) => {
            info!("fetching logs for job {job}");
            match gh_output(&[
                "run", "view", &run_id, "--repo", &repository, "--log", "--job", job,
            ])
            .await
            {
                Ok(logs) => logs,
                Err(e) => {
                    warn!("failed to get job logs: {e}; falling back to all failed logs");
                    fetch_failed_logs(&run_id, &repository).await
                }
            }
        }
        None => fetch_failed_logs(&run_id, &repository).await,
    };
    debug!("fetched {} bytes of logs", failed_logs.len());

    let error_summary = ErrorSummary::extract(&failed_logs);

    Ok(WorkflowRun {
        url: workflow_url.to_string(),
        run_id,
        repository,
        status,
        conclusion,
        failed_logs,
        error_summary,
    })
}

/// Fetch the logs of all failed jobs in a run; empty logs on failure.
async fn fetch_failed_logs(run_id: &str, repository: &str) -> String {
    info!("fetching all failed job logs");
    match gh_output(&["run", "view", run_id, "--repo", repository, "--log-failed"]).await {
        Ok(logs) => logs,
        Err(e) => {
            warn!("failed to get failed-job logs: {e}; proceeding with empty logs");
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_workflow_run_url() {
        let url = "https://github.com/konveyor/ci/actions/runs/19353355807";
        let (repo, run_id, job_id) = parse_workflow_url(url).unwrap();
        assert_eq!(repo, "konveyor/ci");
        assert_eq!(run_id, "19353355807");
        assert_eq!(job_id, None);
    }

    #[test]
    fn parses_job_url() {
        let url = "https://github.com/konveyor/ci/actions/runs/19353355807/job/55364349255";
        let (repo, run_id, job_id) = parse_workflow_url(url).unwrap();
        assert_eq!(repo, "konveyor/ci");
        assert_eq!(run_id, "19353355807");
        assert_eq!(job_id.as_deref(), Some("55364349255"));
    }

    #[test]
    fn rejects_non_actions_url() {
        assert!(parse_workflow_url("https://github.com/konveyor/ci/pull/12").is_err());
        assert!(parse_workflow_url("not a url at all").is_err());
    }

    #[test]
    fn run_status_tolerates_null_conclusion() {
        // In-progress runs report "conclusion": null.
        let parsed: RunStatus =
            serde_json::from_str(r#"{"status":"in_progress","conclusion":null}"#).unwrap();
        assert_eq!(parsed.status.as_deref(), Some("in_progress"));
        assert_eq!(parsed.conclusion, None);
    }
}
