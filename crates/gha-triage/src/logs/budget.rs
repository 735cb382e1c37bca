//! Token estimation heuristic for prompt planning.
//!
//! This is deliberately not a real tokenizer. The estimate only has to be
//! conservative enough to decide whether a character budget is safely under
//! the completion API's context ceiling before a request is sent.

/// Characters per token for logs and code.
///
/// English prose averages ~4 chars/token, but logs and code are denser, so
/// the ratio is kept low on purpose: overestimating token usage is safe,
/// underestimating it rejects requests the API would have accepted.
pub const CHARS_PER_TOKEN: f64 = 2.5;

/// Estimate the number of tokens a text blob will consume.
///
/// Deterministic `floor(len / CHARS_PER_TOKEN)`. Monotonically non-decreasing
/// in input length; the empty string estimates to zero.
pub fn estimate_tokens(text: &str) -> usize {
    (text.len() as f64 / CHARS_PER_TOKEN) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_is_zero_tokens() {
        assert_eq!(estimate_tokens(""), 0);
    }

    #[test]
    fn floors_fractional_estimates() {
        // 4 chars / 2.5 = 1.6 -> 1
        assert_eq!(estimate_tokens("abcd"), 1);
        // 5 chars / 2.5 = 2.0 -> 2
        assert_eq!(estimate_tokens("abcde"), 2);
    }

    #[test]
    fn monotone_in_input_length() {
        let mut prev = 0;
        for n in 0..200 {
            let est = estimate_tokens(&"x".repeat(n));
            assert!(est >= prev, "estimate decreased at length {n}");
            prev = est;
        }
    }

    #[test]
    fn large_input_scales() {
        assert_eq!(estimate_tokens(&"a".repeat(30_000)), 12_000);
    }
}
