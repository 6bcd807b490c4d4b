//! Request and result types for the meta description pipeline.

use crate::error::Error;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default maximum length of a generated description
pub const DEFAULT_MAX_LENGTH: usize = 155;

/// Smallest accepted `maxLength`
pub const MIN_MAX_LENGTH: usize = 50;

/// Largest accepted `maxLength`
pub const MAX_MAX_LENGTH: usize = 300;

/// Stylistic preset controlling template wording
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    #[default]
    Professional,
    Casual,
    Technical,
    Marketing,
}

impl Tone {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::Professional => "professional",
            Tone::Casual => "casual",
            Tone::Technical => "technical",
            Tone::Marketing => "marketing",
        }
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tone {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "professional" => Ok(Tone::Professional),
            "casual" => Ok(Tone::Casual),
            "technical" => Ok(Tone::Technical),
            "marketing" => Ok(Tone::Marketing),
            other => Err(Error::InvalidInput(format!(
                "Unknown tone '{}' (expected professional, casual, technical or marketing)",
                other
            ))),
        }
    }
}

/// Coarse genre of a piece of content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Tutorial,
    Review,
    Listicle,
    Informational,
    Commercial,
    General,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Tutorial => "tutorial",
            ContentType::Review => "review",
            ContentType::Listicle => "listicle",
            ContentType::Informational => "informational",
            ContentType::Commercial => "commercial",
            ContentType::General => "general",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Input of a single description generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    /// Target keywords, primary keyword first
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default = "default_max_length")]
    pub max_length: usize,
    #[serde(default)]
    pub tone: Tone,
}

fn default_max_length() -> usize {
    DEFAULT_MAX_LENGTH
}

impl GenerationRequest {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            keywords: Vec::new(),
            max_length: DEFAULT_MAX_LENGTH,
            tone: Tone::default(),
        }
    }

    pub fn with_keywords(mut self, keywords: Vec<String>) -> Self {
        self.keywords = keywords;
        self
    }

    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = max_length;
        self
    }

    pub fn with_tone(mut self, tone: Tone) -> Self {
        self.tone = tone;
        self
    }

    /// Reject empty title/content and an out-of-range `max_length`
    pub fn validate(&self) -> Result<(), Error> {
        if self.title.trim().is_empty() {
            return Err(Error::InvalidInput("Title cannot be empty".to_string()));
        }
        if self.content.trim().is_empty() {
            return Err(Error::InvalidInput("Content cannot be empty".to_string()));
        }
        if !(MIN_MAX_LENGTH..=MAX_MAX_LENGTH).contains(&self.max_length) {
            return Err(Error::InvalidInput(format!(
                "maxLength must be between {} and {}, got {}",
                MIN_MAX_LENGTH, MAX_MAX_LENGTH, self.max_length
            )));
        }
        Ok(())
    }

    /// Primary keyword, if any
    pub fn primary_keyword(&self) -> Option<&str> {
        self.keywords.first().map(String::as_str)
    }
}

/// Derived, read-only analysis of a piece of content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentAnalysis {
    pub title: String,
    pub word_count: usize,
    /// At most 15 tokens, most frequent first
    pub top_keywords: Vec<String>,
    /// Always within [120, 155]
    pub suggested_meta_length: usize,
    pub content_type: ContentType,
    /// Simplified Flesch Reading Ease, within [0, 100]
    pub readability_score: u32,
}

impl ContentAnalysis {
    /// Trimmed view embedded in generation results
    pub fn summary(&self) -> AnalysisSummary {
        AnalysisSummary {
            word_count: self.word_count,
            content_type: self.content_type,
            top_keywords: self.top_keywords.iter().take(5).cloned().collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisSummary {
    pub word_count: usize,
    pub content_type: ContentType,
    pub top_keywords: Vec<String>,
}

/// Result of a single description generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedDescription {
    #[serde(rename = "metaDescription")]
    pub text: String,
    /// Length of `text` in characters
    pub length: usize,
    pub tone: Tone,
    pub keywords: Vec<String>,
    pub suggestions: Vec<String>,
    pub analysis: AnalysisSummary,
}

/// One post of a batch request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchItem {
    #[serde(default, deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default, deserialize_with = "deserialize_keywords")]
    pub keywords: Vec<String>,
}

impl BatchItem {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            content: content.into(),
            keywords: Vec::new(),
        }
    }

    pub fn with_keywords(mut self, keywords: Vec<String>) -> Self {
        self.keywords = keywords;
        self
    }
}

/// WordPress post ids arrive as numbers or strings
fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    })
}

/// `null` keywords mean no keywords
fn deserialize_keywords<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Outcome of one batch item; failures carry `error` instead of a payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchResult {
    pub id: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BatchResult {
    pub fn succeeded(id: impl Into<String>, generated: GeneratedDescription) -> Self {
        Self {
            id: id.into(),
            success: true,
            meta_description: Some(generated.text),
            length: Some(generated.length),
            suggestions: Some(generated.suggestions),
            error: None,
        }
    }

    pub fn failed(id: impl Into<String>, error: &Error) -> Self {
        Self {
            id: id.into(),
            success: false,
            meta_description: None,
            length: None,
            suggestions: None,
            error: Some(error.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tone_parsing() {
        assert_eq!("Marketing".parse::<Tone>().unwrap(), Tone::Marketing);
        assert_eq!(" casual ".parse::<Tone>().unwrap(), Tone::Casual);
        assert!("snarky".parse::<Tone>().is_err());
        assert_eq!(Tone::default(), Tone::Professional);
    }

    #[test]
    fn test_request_defaults_from_json() {
        let request: GenerationRequest =
            serde_json::from_str(r#"{"title": "T", "content": "C"}"#).unwrap();
        assert_eq!(request.max_length, DEFAULT_MAX_LENGTH);
        assert_eq!(request.tone, Tone::Professional);
        assert!(request.keywords.is_empty());

        let request: GenerationRequest = serde_json::from_str(
            r#"{"title": "T", "content": "C", "maxLength": 80, "tone": "technical", "keywords": ["b", "a"]}"#,
        )
        .unwrap();
        assert_eq!(request.max_length, 80);
        assert_eq!(request.tone, Tone::Technical);
        assert_eq!(request.primary_keyword(), Some("b"));
    }

    #[test]
    fn test_request_validation() {
        assert!(GenerationRequest::new("Title", "Body").validate().is_ok());

        let err = GenerationRequest::new("   ", "Body").validate().unwrap_err();
        assert_eq!(err.to_string(), "Title cannot be empty");

        let err = GenerationRequest::new("Title", "\n\t").validate().unwrap_err();
        assert_eq!(err.to_string(), "Content cannot be empty");

        assert!(GenerationRequest::new("Title", "Body")
            .with_max_length(49)
            .validate()
            .is_err());
        assert!(GenerationRequest::new("Title", "Body")
            .with_max_length(300)
            .validate()
            .is_ok());
    }

    #[test]
    fn test_batch_item_numeric_id() {
        let item: BatchItem =
            serde_json::from_str(r#"{"id": 42, "title": "T", "content": "C"}"#).unwrap();
        assert_eq!(item.id, "42");

        let item: BatchItem = serde_json::from_str(r#"{"id": "post-7"}"#).unwrap();
        assert_eq!(item.id, "post-7");
        assert!(item.title.is_empty());
    }

    #[test]
    fn test_batch_item_null_keywords() {
        let item: BatchItem =
            serde_json::from_str(r#"{"id": "1", "title": "T", "content": "C", "keywords": null}"#)
                .unwrap();
        assert!(item.keywords.is_empty());

        let item: BatchItem =
            serde_json::from_str(r#"{"id": "1", "keywords": ["bread"]}"#).unwrap();
        assert_eq!(item.keywords, vec!["bread"]);
    }

    #[test]
    fn test_batch_result_serialization() {
        let failed = BatchResult::failed("3", &Error::InvalidInput("Title cannot be empty".into()));
        let json = serde_json::to_value(&failed).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "Title cannot be empty");
        assert!(json.get("metaDescription").is_none());
    }
}
