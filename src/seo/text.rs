//! Small string helpers shared by the pipeline stages.
//!
//! All lengths are counted in `char`s so truncation never splits a
//! multi-byte character.

use once_cell::sync::Lazy;
use regex::Regex;

pub(crate) const ELLIPSIS: &str = "...";

static SENTENCE_DELIMITERS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.!?]+").unwrap());

/// Split on runs of `.`, `!` and `?`, keeping empty pieces
pub(crate) fn split_sentences(text: &str) -> impl Iterator<Item = &str> {
    SENTENCE_DELIMITERS.split(text)
}

pub(crate) fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// First `max_chars` characters of `text`
pub(crate) fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

/// Cut to `max_chars - 3` characters and append `...`
pub(crate) fn truncate_with_ellipsis(text: &str, max_chars: usize) -> String {
    let mut out = truncate_chars(text, max_chars.saturating_sub(ELLIPSIS.len())).to_string();
    out.push_str(ELLIPSIS);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_sentences_keeps_trailing_piece() {
        let parts: Vec<&str> = split_sentences("One. Two!? Three").collect();
        assert_eq!(parts, vec!["One", " Two", " Three"]);

        let parts: Vec<&str> = split_sentences("Done.").collect();
        assert_eq!(parts, vec!["Done", ""]);
    }

    #[test]
    fn test_truncate_chars_is_char_safe() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("abc", 10), "abc");
        assert_eq!(truncate_chars("abc", 0), "");
    }

    #[test]
    fn test_truncate_with_ellipsis() {
        assert_eq!(truncate_with_ellipsis("abcdefghij", 8), "abcde...");
        assert_eq!(char_len(&truncate_with_ellipsis("abcdefghij", 8)), 8);
        assert_eq!(truncate_with_ellipsis("abcdefghij", 2), "...");
    }
}
