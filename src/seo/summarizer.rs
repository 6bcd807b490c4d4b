//! Lead-sentence extraction.

use super::text::{char_len, split_sentences, truncate_chars, truncate_with_ellipsis};

/// Sentences must be longer than this (after trimming) to lead a summary
const MIN_SENTENCE_CHARS: usize = 20;

/// First substantial sentence of `content`, bounded to `max_length` characters.
///
/// Without any sentence longer than 20 characters the raw content is cut to
/// `max_length` with no ellipsis.
pub fn summarize(content: &str, max_length: usize) -> String {
    let lead = split_sentences(content)
        .map(str::trim)
        .find(|sentence| char_len(sentence) > MIN_SENTENCE_CHARS);

    match lead {
        None => truncate_chars(content, max_length).to_string(),
        Some(sentence) if char_len(sentence) > max_length => {
            truncate_with_ellipsis(sentence, max_length)
        }
        Some(sentence) => sentence.to_string(),
    }
}
