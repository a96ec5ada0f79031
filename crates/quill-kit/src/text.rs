// File: src/text.rs
// Purpose: Small string helpers for titles and previews

use once_cell::sync::Lazy;
use regex::Regex;

// Anything that is not an ASCII word character or a space
static NON_WORD_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Za-z0-9_ ]+").expect("non-word regex is valid"));

static SPACES_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r" +").expect("spaces regex is valid"));

/// Cut `text` to `length` characters and append `...`; shorter text is returned as-is
pub fn truncate(text: &str, length: usize) -> String {
    if text.chars().count() <= length {
        return text.to_string();
    }
    let mut out: String = text.chars().take(length).collect();
    out.push_str("...");
    out
}

/// URL slug: lowercase, punctuation stripped, space runs become `-`
pub fn slugify(text: &str) -> String {
    let lowered = text.to_lowercase();
    let stripped = NON_WORD_REGEX.replace_all(&lowered, "");
    SPACES_REGEX.replace_all(&stripped, "-").into_owned()
}
