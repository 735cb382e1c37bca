//! Parse the model's markdown answer into a structured fix proposal.
//!
//! The model is asked to format its answer with fixed section headers; each
//! section is pulled out by regex. Models do not always comply, so a missing
//! section simply leaves its field empty — the raw text still ends up in the
//! report either way.

use std::sync::LazyLock;

use regex::Regex;

fn section_re(header: &str) -> Regex {
    // Matches "## <header>" (one or two hashes, any case) and captures
    // everything up to the next section header or end of text.
    Regex::new(&format!(r"(?is)##?\s*{header}[:\s]*\n(.*?)(?:\n##|\z)")).unwrap()
}

static ROOT_CAUSE_RE: LazyLock<Regex> = LazyLock::new(|| section_re("Root Cause"));
static ANALYSIS_RE: LazyLock<Regex> = LazyLock::new(|| section_re("Detailed Analysis"));
static FIX_RE: LazyLock<Regex> = LazyLock::new(|| section_re("Proposed Fix"));
static FILES_RE: LazyLock<Regex> = LazyLock::new(|| section_re("Files to Check"));
static CONFIDENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)##?\s*Confidence Level[:\s]*\n?\s*([^\n]+)").unwrap());

/// A proposed fix for the workflow failure, as parsed from the model answer.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FixProposal {
    pub root_cause: String,
    pub analysis: String,
    pub proposed_fix: String,
    pub files_to_check: Vec<String>,
    pub code_changes: Vec<CodeChange>,
    pub confidence: String,
}

/// A suggested code modification.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CodeChange {
    pub file: String,
    pub description: String,
    pub diff_snippet: String,
}

impl FixProposal {
    /// Extract structured sections from a markdown model response.
    pub fn from_response(response: &str) -> Self {
        let mut proposal = FixProposal {
            root_cause: capture_section(&ROOT_CAUSE_RE, response),
            analysis: capture_section(&ANALYSIS_RE, response),
            proposed_fix: capture_section(&FIX_RE, response),
            confidence: capture_section(&CONFIDENCE_RE, response),
            ..FixProposal::default()
        };

        // Bullet lines under "Files to Check" become a path list.
        let files_text = capture_section(&FILES_RE, response);
        for line in files_text.lines() {
            let line = line.trim();
            if let Some(stripped) = line.strip_prefix('-').or_else(|| line.strip_prefix('*')) {
                let file = stripped.trim();
                if !file.is_empty() {
                    proposal.files_to_check.push(file.to_string());
                }
            }
        }

        proposal
    }
}

fn capture_section(re: &Regex, response: &str) -> String {
    re.captures(response)
        .map(|caps| caps[1].trim().to_string())
        .unwrap_or_default()
}
