// src/utils/text.rs

//! Accent- and case-insensitive text folding.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Remove diacritics and lower-case `text`.
///
/// Applied identically to keywords and candidate text so every keyword
/// comparison is accent- and case-insensitive on both sides.
pub fn normalize(text: &str) -> String {
    // Lower-casing can yield decomposable characters (e.g. `İ`), so fold twice.
    strip_marks(&strip_marks(text).to_lowercase())
}

fn strip_marks(text: &str) -> String {
    text.nfkd().filter(|c| !is_combining_mark(*c)).collect()
}

/// Collapse every whitespace run into a single space and trim the ends.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Keep at most `max` characters of `text`.
pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_spanish_accents() {
        assert_eq!(normalize("ÁÉÍÓÚÑ"), "aeioun");
        assert_eq!(normalize("Subvención"), "subvencion");
        assert_eq!(normalize("Economía Circular"), "economia circular");
    }

    #[test]
    fn normalize_is_idempotent() {
        for sample in ["ÁÉÍÓÚÑ", "İstanbul", "País Vasco", "㎒ Ünïcödé", "plain"] {
            let once = normalize(sample);
            assert_eq!(normalize(&once), once, "sample {sample:?}");
        }
    }

    #[test]
    fn normalize_handles_empty_input() {
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn collapse_whitespace_joins_lines() {
        assert_eq!(collapse_whitespace("  a\n b\t\tc  "), "a b c");
    }

    #[test]
    fn truncate_counts_characters_not_bytes() {
        assert_eq!(truncate_chars("áéíóú", 3), "áéí");
        assert_eq!(truncate_chars("ab", 5), "ab");
    }
}
