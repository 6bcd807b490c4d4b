//! Description Templates
//!
//! Renders a tone-specific template from title, summary and primary keyword,
//! then enforces the hard length cap.

use super::text::{char_len, truncate_chars, truncate_with_ellipsis};
use super::types::Tone;
use rand::Rng;
use std::fmt;

/// Lead verbs for the marketing tone
pub const MARKETING_ACTIONS: &[&str] = &["Discover", "Learn", "Get", "Find", "Unlock", "Master"];

/// Openers for the casual tone
pub const CASUAL_STARTERS: &[&str] = &[
    "Check out",
    "Looking for",
    "Want to know about",
    "Here's everything about",
];

/// Picks one of several interchangeable template phrases
pub trait PhraseSelector: Send + Sync + fmt::Debug {
    /// `options` is never empty
    fn select<'a>(&self, options: &[&'a str]) -> &'a str;
}

/// Always the first option; the deterministic default
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstPhrase;

impl PhraseSelector for FirstPhrase {
    fn select<'a>(&self, options: &[&'a str]) -> &'a str {
        options[0]
    }
}

/// A fixed position, wrapped around the option count
#[derive(Debug, Clone, Copy)]
pub struct FixedPhrase(pub usize);

impl PhraseSelector for FixedPhrase {
    fn select<'a>(&self, options: &[&'a str]) -> &'a str {
        options[self.0 % options.len()]
    }
}

/// Uniformly random choice from the calling thread's RNG
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomPhrase;

impl PhraseSelector for RandomPhrase {
    fn select<'a>(&self, options: &[&'a str]) -> &'a str {
        let idx = rand::thread_rng().gen_range(0..options.len());
        options[idx]
    }
}

/// Render the description for `tone`, capped at `max_length` characters
pub fn describe(
    title: &str,
    summary: &str,
    keyword: Option<&str>,
    tone: Tone,
    max_length: usize,
    selector: &dyn PhraseSelector,
) -> String {
    let keyword = keyword.filter(|k| !k.is_empty());

    let rendered = match tone {
        Tone::Marketing => {
            let action = selector.select(MARKETING_ACTIONS);
            match keyword {
                Some(keyword) => format!(
                    "{} {} with our {}. {}",
                    action,
                    keyword,
                    title.to_lowercase(),
                    summary
                ),
                None => format!("{} {}. {}", action, title.to_lowercase(), summary),
            }
        }
        Tone::Technical => match keyword {
            Some(keyword) => format!("Technical guide to {}: {}. {}", keyword, title, summary),
            None => format!("{}: {}", title, summary),
        },
        Tone::Casual => {
            let starter = selector.select(CASUAL_STARTERS);
            match keyword {
                Some(keyword) => format!("{} {}? {}. {}", starter, keyword, title, summary),
                None => format!("{} {}. {}", starter, title.to_lowercase(), summary),
            }
        }
        Tone::Professional => match keyword {
            Some(keyword) if !summary.to_lowercase().contains(&keyword.to_lowercase()) => {
                format!("{}: Professional guide to {}. {}", title, keyword, summary)
            }
            _ => format!("{}. {}", title, summary),
        },
    };

    cap_length(truncate_chars(&rendered, max_length), max_length)
}

/// Final length guarantee: anything over `max_length` ends in `...`
pub fn cap_length(description: &str, max_length: usize) -> String {
    if char_len(description) > max_length {
        truncate_with_ellipsis(description, max_length)
    } else {
        description.to_string()
    }
}
