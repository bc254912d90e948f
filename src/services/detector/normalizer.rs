//! Text normalization for book titles and series names.
//! Produces the canonical comparison keys used by every match strategy.

use deunicode::deunicode;
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

/// Compiled regex for stripping non-alphanumeric characters.
static RE_NON_ALNUM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z0-9\s]").expect("Invalid regex"));

/// Leading articles stripped before comparison (English and French).
const LEADING_ARTICLES: &[&str] = &["the", "a", "an", "le", "la", "les", "un", "une", "des"];

/// Normalize a title or series name into its canonical comparison key.
///
/// Pipeline:
/// 1. Fold diacritics and non-Latin characters to ASCII via deunicode
/// 2. Rewrite `&` as "and"
/// 3. Strip non-alphanumeric symbols (keep spaces)
/// 4. Lowercase
/// 5. Drop leading articles ("the", "le", "des", ...) while more than one
///    token remains
/// 6. Collapse and trim whitespace
///
/// Pure and idempotent: `normalize(normalize(s)) == normalize(s)` for any
/// input, and the empty string maps to itself.
pub fn normalize(text: &str) -> String {
    let folded = deunicode(text).replace('&', " and ");
    let clean = RE_NON_ALNUM.replace_all(&folded, " ");
    let lower = clean.to_lowercase();

    let mut words: Vec<&str> = lower.split_whitespace().collect();
    // Keep the last token even if it is an article, so a non-empty title
    // never normalizes to an empty key.
    while words.len() > 1 && LEADING_ARTICLES.contains(&words[0]) {
        words.remove(0);
    }

    words.join(" ")
}

/// Split a title into its normalized whole-token set.
///
/// Used by the keyword strategy: catalog keywords must appear as whole
/// tokens, not substrings.
pub fn tokenize(text: &str) -> HashSet<String> {
    normalize(text)
        .split_whitespace()
        .map(|s| s.to_string())
        .collect()
}

#[cfg(test)]
#[path = "tests/normalizer_tests.rs"]
mod tests;
