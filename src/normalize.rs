//! Journal title normalization.
//!
//! Every source spells the same journal slightly differently (case, punctuation,
//! doubled spaces). All seven source maps and the unified record set are keyed by
//! [`normalize_key`] so those variants collide into one identity. [`to_display_name`]
//! derives the cosmetic form shown to users; it is never used for matching.

use regex::Regex;
use std::sync::OnceLock;

/// Matches anything that is not a word character or whitespace
fn punctuation_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^\w\s]").unwrap_or_else(|_| Regex::new(r"$a").expect("fallback regex")))
}

/// Matches runs of whitespace
fn whitespace_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").unwrap_or_else(|_| Regex::new(r"$a").expect("fallback regex")))
}

/// Normalize a raw journal title into its matching key.
///
/// Lowercases, strips punctuation (replaced by a space so "J.Finance" and
/// "J Finance" meet), collapses whitespace runs and trims. An empty or
/// whitespace-only title yields the empty string; callers must skip empty
/// keys, they never enter the unified set.
pub fn normalize_key(title: &str) -> String {
    let lowered = title.to_lowercase();
    let no_punct = punctuation_re().replace_all(&lowered, " ");
    whitespace_re().replace_all(no_punct.trim(), " ").into_owned()
}

/// Derive the display name from a normalized key.
///
/// Each whitespace-separated token is Title-cased; tokens of two characters or
/// fewer are treated as acronyms and fully upper-cased ("of" loses but "IEEE"
/// fragments like "ai" win - the rule is cosmetic and applied uniformly).
pub fn to_display_name(key: &str) -> String {
    key.split(' ')
        .map(capitalize_word)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize_word(word: &str) -> String {
    if word.len() <= 2 {
        return word.to_uppercase();
    }
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
