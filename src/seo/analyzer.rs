//! Content Analyzer
//!
//! Tokenization, keyword frequency ranking, content-type classification
//! and a simplified Flesch Reading Ease score.

use super::text::split_sentences;
use super::types::{ContentAnalysis, ContentType};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use tracing::debug;

/// Maximum number of ranked keywords
pub const MAX_TOP_KEYWORDS: usize = 15;

/// Tokens must be longer than this many characters
const MIN_TOKEN_CHARS: usize = 3;

const MIN_META_LENGTH: usize = 120;
const MAX_META_LENGTH: usize = 155;

static NON_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^A-Za-z0-9_\s]").unwrap());
static NUMBERED_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^(?:[0-9]+\.|•)").unwrap());
static SILENT_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:[^laeiouy]es|ed|[^laeiouy]e)$").unwrap());
static LEADING_Y: Lazy<Regex> = Lazy::new(|| Regex::new(r"^y").unwrap());
static VOWEL_GROUP: Lazy<Regex> = Lazy::new(|| Regex::new(r"[aeiouy]{1,2}").unwrap());

/// Lowercased title and content a classification rule looks at
pub struct ClassificationInput<'a> {
    pub title: &'a str,
    pub content: &'a str,
    /// Original casing, for line-structure checks
    pub raw_content: &'a str,
}

/// One entry of the ordered classification table
pub struct ClassificationRule {
    pub content_type: ContentType,
    pub matches: fn(&ClassificationInput<'_>) -> bool,
}

/// Checked top to bottom; the first match wins, `General` otherwise.
pub const CLASSIFICATION_RULES: &[ClassificationRule] = &[
    ClassificationRule {
        content_type: ContentType::Tutorial,
        matches: is_tutorial,
    },
    ClassificationRule {
        content_type: ContentType::Review,
        matches: is_review,
    },
    ClassificationRule {
        content_type: ContentType::Listicle,
        matches: is_listicle,
    },
    ClassificationRule {
        content_type: ContentType::Informational,
        matches: is_informational,
    },
    ClassificationRule {
        content_type: ContentType::Commercial,
        matches: is_commercial,
    },
];

fn is_tutorial(input: &ClassificationInput<'_>) -> bool {
    input.title.contains("how to") || input.content.contains("step")
}

fn is_review(input: &ClassificationInput<'_>) -> bool {
    input.title.contains("review") || input.content.contains("pros and cons")
}

fn is_listicle(input: &ClassificationInput<'_>) -> bool {
    input.title.contains("list") || NUMBERED_LINE.is_match(input.raw_content)
}

fn is_informational(input: &ClassificationInput<'_>) -> bool {
    input.content.contains("what is") || input.content.contains("definition")
}

fn is_commercial(input: &ClassificationInput<'_>) -> bool {
    input.content.contains("buy") || input.content.contains("price")
}

/// Analyze `content` titled `title`
pub fn analyze(content: &str, title: &str) -> ContentAnalysis {
    let tokens = tokenize(content);
    let word_count = tokens.len();
    let top_keywords = rank_keywords(&tokens, MAX_TOP_KEYWORDS);
    let content_type = classify(content, title);
    let readability_score = readability_score(content);

    debug!(
        word_count,
        %content_type,
        readability_score,
        keywords = top_keywords.len(),
        "content analyzed"
    );

    ContentAnalysis {
        title: title.to_string(),
        word_count,
        top_keywords,
        suggested_meta_length: suggested_meta_length(word_count),
        content_type,
        readability_score,
    }
}

/// Lowercase, blank out punctuation and keep tokens longer than three characters
pub fn tokenize(content: &str) -> Vec<String> {
    let lowered = content.to_lowercase();
    NON_WORD
        .replace_all(&lowered, " ")
        .split_whitespace()
        .filter(|token| token.chars().count() > MIN_TOKEN_CHARS)
        .map(str::to_string)
        .collect()
}

/// Most frequent tokens first; equal counts keep first-seen order
pub fn rank_keywords(tokens: &[String], limit: usize) -> Vec<String> {
    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<(&str, usize)> = Vec::new();

    for token in tokens {
        match positions.get(token.as_str()) {
            Some(&idx) => counts[idx].1 += 1,
            None => {
                positions.insert(token.as_str(), counts.len());
                counts.push((token.as_str(), 1));
            }
        }
    }

    // sort_by is stable, so ties stay in insertion order
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
        .into_iter()
        .take(limit)
        .map(|(token, _)| token.to_string())
        .collect()
}

pub fn suggested_meta_length(word_count: usize) -> usize {
    (word_count / 12).clamp(MIN_META_LENGTH, MAX_META_LENGTH)
}

pub fn classify(content: &str, title: &str) -> ContentType {
    let lower_content = content.to_lowercase();
    let lower_title = title.to_lowercase();
    let input = ClassificationInput {
        title: &lower_title,
        content: &lower_content,
        raw_content: content,
    };

    CLASSIFICATION_RULES
        .iter()
        .find(|rule| (rule.matches)(&input))
        .map(|rule| rule.content_type)
        .unwrap_or(ContentType::General)
}

/// Simplified Flesch Reading Ease, rounded and clamped to [0, 100]
pub fn readability_score(content: &str) -> u32 {
    let sentences = split_sentences(content)
        .filter(|s| !s.trim().is_empty())
        .count();
    let words: Vec<&str> = content.split_whitespace().collect();

    if sentences == 0 || words.is_empty() {
        return 0;
    }

    let syllables: usize = words.iter().map(|word| count_syllables(word)).sum();
    let avg_sentence_length = words.len() as f64 / sentences as f64;
    let avg_syllables_per_word = syllables as f64 / words.len() as f64;

    let score = 206.835 - (1.015 * avg_sentence_length) - (84.6 * avg_syllables_per_word);
    score.round().clamp(0.0, 100.0) as u32
}

/// Heuristic syllable count; never less than one
pub fn count_syllables(word: &str) -> usize {
    let word = word.to_lowercase();
    if word.chars().count() <= 3 {
        return 1;
    }

    let stripped = SILENT_SUFFIX.replace(&word, "");
    let stripped = LEADING_Y.replace(&stripped, "");

    match VOWEL_GROUP.find_iter(&stripped).count() {
        0 => 1,
        n => n,
    }
}
