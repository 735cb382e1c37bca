//! Triage a failed GitHub Actions run with an LLM.
//!
//! `gha-triage` fetches a workflow run's failure logs through the `gh` CLI,
//! distills them into a character-bounded prompt, asks a chat-completions
//! model for a diagnosis, and renders the answer as a markdown report.
//!
//! The pipeline is a single sequential pass per invocation:
//!
//! ```text
//! URL ─▶ github::fetch_workflow_run ─▶ logs::summary + logs::filter
//!     ─▶ prompt::build_analysis_prompt ─▶ api::OpenAiClient::chat
//!     ─▶ proposal::FixProposal::from_response ─▶ report::render_report
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`github`] | Workflow URL parsing, run metadata and log fetch via `gh` |
//! | [`logs`] | Token estimation, relevance filtering, error extraction |
//! | [`prompt`] | Analysis prompt assembly under a character budget |
//! | [`api`] | OpenAI chat-completions client |
//! | [`proposal`] | Parsing the model answer into a [`FixProposal`] |
//! | [`report`] | Markdown report rendering and best-effort save |
//!
//! # Design notes
//!
//! - **Logs are the scarcest input.** CI logs routinely exceed the model's
//!   context window; [`logs::filter`] keeps failure-relevant lines first and
//!   the tail of the rest, under a budget that [`prompt`] keeps deliberately
//!   far below the context ceiling.
//! - **Degrade, don't die.** A failed log fetch falls back to a broader one,
//!   and then to empty logs; a failed report write only warns. The only hard
//!   failures are a malformed URL, a missing run, and the completion call.
//! - **No retries, no state.** One fetch, one filter pass, one model call,
//!   one file write. Nothing persists across invocations.

pub mod api;
pub mod github;
pub mod logs;
pub mod prompt;
pub mod proposal;
pub mod report;

// Re-export the types that make up the pipeline's surface.
pub use api::{ChatRequest, Message, OpenAiClient};
pub use github::{WorkflowRun, fetch_workflow_run, parse_workflow_url};
pub use logs::{ErrorSummary, estimate_tokens, filter_relevant};
pub use proposal::{CodeChange, FixProposal};
