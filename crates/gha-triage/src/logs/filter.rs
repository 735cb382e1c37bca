//! Relevance filtering: reduce raw CI logs to a bounded blob that still
//! contains the failure signal.
//!
//! Lines matching a fixed failure-keyword set are emitted first, verbatim and
//! in original order. Whatever budget remains is filled with the *tail* of
//! the non-matching lines, since the actual failure is usually near the end
//! of a log; a visible marker shows where the middle was dropped.

use tracing::debug;

/// Marker inserted where normal-line content was truncated.
pub const OMISSION_MARKER: &str = "\n...[middle section omitted]...\n\n";

/// Keywords that flag a log line as failure-relevant (matched
/// case-insensitively against the whole line).
const RELEVANT_KEYWORDS: &[&str] = &[
    "error",
    "failed",
    "fatal",
    "panic",
    "timed out",
    "timeout",
    "exit code",
    "assertion",
    "expected",
    "actual",
    "stack trace",
    "fail:",
    "fail ",
    "✗",
    "❌",
];

/// Extract the most relevant parts of `logs` into at most `budget` characters.
///
/// Relevant lines are emitted first, one per line, stopping before any line
/// that would push the output past `budget` (lines are never split). The
/// remaining budget is filled with the tail of the normal lines; if they do
/// not all fit, [`OMISSION_MARKER`] is inserted and only the last
/// `remaining` bytes are kept.
///
/// The output never exceeds `budget` except for the marker itself, which is
/// not counted against the budget. Downstream token-budget constants carry
/// enough margin to absorb this fixed slack, so it is part of the contract
/// rather than something callers need to compensate for.
///
/// A budget of zero yields the empty string. This function never fails.
pub fn filter_relevant(logs: &str, budget: usize) -> String {
    debug!(
        "filtering logs: input {} chars, budget {} chars",
        logs.len(),
        budget
    );

    let mut relevant_lines = Vec::new();
    let mut normal_lines = Vec::new();
    for line in logs.split('\n') {
        if is_relevant_line(line) {
            relevant_lines.push(line);
        } else {
            normal_lines.push(line);
        }
    }

    let mut result = String::new();
    let mut used = 0usize;
    let mut emitted = 0usize;

    // High-priority lines first, whole lines only.
    for line in &relevant_lines {
        if used + line.len() + 1 > budget {
            break;
        }
        result.push_str(line);
        result.push('\n');
        used += line.len() + 1;
        emitted += 1;
    }

    debug!(
        "kept {emitted} of {} relevant lines ({used} chars)",
        relevant_lines.len()
    );

    // Fill what's left with context from the end of the log.
    let remaining = budget.saturating_sub(used);
    if remaining > 0 && !normal_lines.is_empty() {
        let normal_text = normal_lines.join("\n");
        if normal_text.len() > remaining {
            result.push_str(OMISSION_MARKER);
            let kept = tail(&normal_text, remaining);
            result.push_str(kept);
            debug!(
                "kept {} chars from end of logs (truncated from {})",
                kept.len(),
                normal_text.len()
            );
        } else {
            result.push_str(&normal_text);
            debug!(
                "kept all {} normal lines ({} chars)",
                normal_lines.len(),
                normal_text.len()
            );
        }
    }

    if !logs.is_empty() {
        debug!(
            "filtering complete: output {} chars ({:.1}% of input)",
            result.len(),
            result.len() as f64 / logs.len() as f64 * 100.0
        );
    }

    result
}

fn is_relevant_line(line: &str) -> bool {
    let lower = line.to_lowercase();
    RELEVANT_KEYWORDS.iter().any(|kw| lower.contains(kw))
}

/// The last `max` bytes of `s`, backed off to a char boundary so the slice is
/// always valid UTF-8. The result is never longer than `max`.
fn tail(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut start = s.len() - max;
    while !s.is_char_boundary(start) {
        start += 1;
    }
    #[allow(clippy::string_slice)] // start is adjusted to a char boundary above
    &s[start..]
}
