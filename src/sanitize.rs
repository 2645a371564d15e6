//! Adversarial-text sanitization.
//!
//! The serialized tree and extracted page text are fed directly to a language
//! model as trusted context, and page authors are adversarial. Every string
//! sourced from page content (accessible names, titles, extracted text) runs
//! through [`sanitize_text`] before leaving this crate. Internal identifiers
//! (reference ids, roles) never do.
//!
//! The pattern list is a best-effort mitigation, not a security boundary.
//! Extending it is a one-line edit to [`INJECTION_PATTERNS`].

use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};

/// Replacement marker for matched injection phrases.
pub const FILTERED_MARKER: &str = "[FILTERED]";

/// Prompt-injection phrases commonly planted in page content to steer an
/// automated reader. Matched case-insensitively.
pub const INJECTION_PATTERNS: &[&str] = &[
    r"ignore\s+(?:all\s+)?(?:previous|prior|above|earlier)\s+(?:instructions|prompts|directions)",
    r"disregard\s+(?:all\s+)?(?:previous|prior|above|earlier)\s+(?:instructions|prompts|directions)",
    r"forget\s+(?:all\s+)?(?:previous|prior|your)\s+(?:instructions|prompts|training)",
    r"you\s+are\s+now\s+(?:a|an|in)\b",
    r"(?:new|updated)\s+system\s+(?:prompt|message|role)",
    r"system\s*:\s*you\s+are",
    r"act\s+as\s+(?:if\s+you|though\s+you|a\s+different)",
    r"pretend\s+(?:you\s+are|to\s+be)",
    r"jailbreak",
    r"developer\s+mode",
    r"bypass\s+(?:all\s+)?(?:safety|security|content)\s+(?:filters?|restrictions?|guidelines)",
    r"do\s+anything\s+now",
];

static COMPILED: Lazy<Vec<Regex>> = Lazy::new(|| {
    INJECTION_PATTERNS
        .iter()
        .map(|p| {
            RegexBuilder::new(p)
                .case_insensitive(true)
                .build()
                .expect("injection pattern must compile")
        })
        .collect()
});

/// Replace known prompt-injection phrases with [`FILTERED_MARKER`].
pub fn sanitize_text(text: &str) -> String {
    let mut out = text.to_string();
    for re in COMPILED.iter() {
        if re.is_match(&out) {
            out = re.replace_all(&out, FILTERED_MARKER).into_owned();
        }
    }
    out
}

/// Collapse runs of whitespace (including newlines) into single spaces and
/// trim the result.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Cut a string at `max` characters, respecting char boundaries.
pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Cut a string at `max` characters, appending an ellipsis when cut.
pub fn ellipsize(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        format!("{}...", truncate_chars(text, max))
    } else {
        text.to_string()
    }
}
