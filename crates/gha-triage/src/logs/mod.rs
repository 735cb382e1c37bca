//! Log triage: budget arithmetic, relevance filtering, and error extraction.
//!
//! CI logs are routinely megabytes; the model's context window is not. This
//! module decides what survives the trip to the completion API:
//!
//! 1. **[`budget`]** — chars-to-tokens planning heuristic used to keep the
//!    assembled prompt far under the model's context ceiling.
//!
//! 2. **[`filter`]** — partitions log lines into failure-relevant and normal,
//!    then composes a bounded blob: all relevant lines first, the tail of the
//!    rest after (the actual failure signal is usually near the end).
//!
//! 3. **[`summary`]** — keyword/regex extraction of failed jobs, error
//!    messages, timeouts, failed tests, and exit codes from raw log text.
//!
//! Everything here is pure string processing: no I/O, no failure modes, and
//! diagnostics go to `tracing` without ever affecting output content.

pub mod budget;
pub mod filter;
pub mod summary;

// Re-export commonly used items at the module level.
pub use budget::{CHARS_PER_TOKEN, estimate_tokens};
pub use filter::{OMISSION_MARKER, filter_relevant};
pub use summary::ErrorSummary;
