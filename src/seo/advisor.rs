//! Heuristic improvement suggestions for a generated description.

use super::text::char_len;
use super::types::{ContentAnalysis, ContentType};
use once_cell::sync::Lazy;
use regex::Regex;

/// Lower bound of the conventional meta description window
pub const SEO_MIN_LENGTH: usize = 120;

/// Upper bound of the conventional meta description window
pub const SEO_MAX_LENGTH: usize = 155;

static REVIEW_TERMS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(?-u:\b)(?:review|rating|pros|cons)(?-u:\b)").unwrap());
static CALL_TO_ACTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(?-u:\b)(?:learn|discover|find|get|read|see)(?-u:\b)").unwrap());

/// Every matching suggestion, in a fixed order
pub fn suggest(description: &str, keywords: &[String], analysis: &ContentAnalysis) -> Vec<String> {
    let mut suggestions = Vec::new();
    let lower = description.to_lowercase();
    let length = char_len(description);

    if length < SEO_MIN_LENGTH {
        suggestions.push(
            "Consider making the description longer (120-155 characters is optimal for SEO)"
                .to_string(),
        );
    } else if length > SEO_MAX_LENGTH {
        suggestions.push(
            "Description exceeds recommended length - consider shortening to under 155 characters"
                .to_string(),
        );
    }

    if let Some(primary) = keywords.first() {
        let has_keyword = keywords
            .iter()
            .any(|keyword| lower.contains(&keyword.to_lowercase()));
        if !has_keyword {
            suggestions.push(format!(
                "Consider including your primary keyword \"{}\" in the meta description",
                primary
            ));
        }
    }

    if analysis.content_type == ContentType::Tutorial && !lower.contains("how") {
        suggestions
            .push("For tutorial content, consider including \"how to\" in your meta description".to_string());
    }

    if analysis.content_type == ContentType::Review && !REVIEW_TERMS.is_match(description) {
        suggestions.push(
            "For review content, consider mentioning \"review\", \"rating\", or \"pros and cons\""
                .to_string(),
        );
    }

    if !CALL_TO_ACTION.is_match(description) {
        suggestions.push(
            "Consider adding a call-to-action word like \"learn\", \"discover\", or \"find out\""
                .to_string(),
        );
    }

    if !description.ends_with(['.', '!', '?']) {
        suggestions.push("Consider ending with proper punctuation for better readability".to_string());
    }

    suggestions
}
