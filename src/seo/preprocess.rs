//! Markup stripping and bounded previews of post bodies.

use super::text::{char_len, split_sentences, truncate_with_ellipsis};
use once_cell::sync::Lazy;
use regex::Regex;

/// Default preview bound used by the generator
pub const DEFAULT_PREVIEW_LENGTH: usize = 1000;

static MARKUP_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").unwrap());
static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Remove `<...>` tags, collapse whitespace and trim
pub fn clean_markup(content: &str) -> String {
    let without_tags = MARKUP_TAG.replace_all(content, "");
    WHITESPACE_RUN
        .replace_all(&without_tags, " ")
        .trim()
        .to_string()
}

/// Plain-text preview of `content` bounded to `max_length` characters.
///
/// Short content is returned whole. Longer content is cut at sentence
/// boundaries; when not even the first sentence fits, it is hard-truncated
/// with a trailing `...`.
pub fn extract_preview(content: &str, max_length: usize) -> String {
    let clean = clean_markup(content);
    if char_len(&clean) <= max_length {
        return clean;
    }

    let mut preview = String::new();
    let mut preview_len = 0;
    for sentence in split_sentences(&clean) {
        let piece_len = char_len(sentence) + 2;
        if preview_len + piece_len > max_length {
            break;
        }
        preview.push_str(sentence);
        preview.push_str(". ");
        preview_len += piece_len;
    }

    let preview = preview.trim();
    if preview.is_empty() {
        truncate_with_ellipsis(&clean, max_length)
    } else {
        preview.to_string()
    }
}
