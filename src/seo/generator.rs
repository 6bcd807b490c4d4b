//! Meta Description Generator
//!
//! Runs the full pipeline (preview, analysis, summary, template, advice)
//! behind the three public entry points.

use super::advisor::suggest;
use super::analyzer::analyze;
use super::describer::{describe, FirstPhrase, PhraseSelector};
use super::preprocess::{extract_preview, DEFAULT_PREVIEW_LENGTH};
use super::summarizer::summarize;
use super::text::char_len;
use super::types::{
    BatchItem, BatchResult, ContentAnalysis, GeneratedDescription, GenerationRequest, Tone,
    DEFAULT_MAX_LENGTH,
};
use crate::error::{Error, Result};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Room reserved next to the title when budgeting the summary
const TITLE_OVERHEAD: usize = 20;

/// Default cap on posts per batch
pub const DEFAULT_MAX_BATCH_ITEMS: usize = 20;

/// Tunables of a [`MetaGenerator`]
#[derive(Debug, Clone)]
pub struct GeneratorOptions {
    pub preview_length: usize,
    pub max_batch_items: usize,
    pub selector: Arc<dyn PhraseSelector>,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            preview_length: DEFAULT_PREVIEW_LENGTH,
            max_batch_items: DEFAULT_MAX_BATCH_ITEMS,
            selector: Arc::new(FirstPhrase),
        }
    }
}

/// Stateless pipeline; one instance can serve any number of requests
#[derive(Debug, Clone, Default)]
pub struct MetaGenerator {
    options: GeneratorOptions,
}

impl MetaGenerator {
    pub fn new(options: GeneratorOptions) -> Self {
        Self { options }
    }

    /// Same pipeline with a different phrase selector
    pub fn with_selector(mut self, selector: Arc<dyn PhraseSelector>) -> Self {
        self.options.selector = selector;
        self
    }

    pub fn options(&self) -> &GeneratorOptions {
        &self.options
    }

    /// Generate a meta description for one post
    pub fn generate_description(&self, request: &GenerationRequest) -> Result<GeneratedDescription> {
        request.validate()?;

        let preview = extract_preview(&request.content, self.options.preview_length);
        let analysis = analyze(&request.content, &request.title);

        let summary_budget = request
            .max_length
            .saturating_sub(char_len(&request.title) + TITLE_OVERHEAD);
        let summary = summarize(&preview, summary_budget);

        let text = describe(
            &request.title,
            &summary,
            request.primary_keyword(),
            request.tone,
            request.max_length,
            self.options.selector.as_ref(),
        );
        let suggestions = suggest(&text, &request.keywords, &analysis);

        debug!(
            tone = %request.tone,
            length = char_len(&text),
            suggestions = suggestions.len(),
            "meta description generated"
        );

        Ok(GeneratedDescription {
            length: char_len(&text),
            text,
            tone: request.tone,
            keywords: request.keywords.clone(),
            suggestions,
            analysis: analysis.summary(),
        })
    }

    /// Analyze content without generating a description
    pub fn analyze_content(&self, content: &str, title: &str) -> Result<ContentAnalysis> {
        if content.trim().is_empty() {
            return Err(Error::InvalidInput("Content cannot be empty".to_string()));
        }
        Ok(analyze(content, title))
    }

    /// Generate descriptions for several posts in order.
    ///
    /// Every item runs with `tone` and a 155 character cap. A failing item
    /// becomes an error entry; the remaining items still run.
    pub fn batch_generate(&self, items: &[BatchItem], tone: Tone) -> Result<Vec<BatchResult>> {
        self.check_batch_size(items.len())?;

        let results: Vec<BatchResult> = items
            .iter()
            .map(|item| self.generate_item(item, tone))
            .collect();

        let failed = results.iter().filter(|r| !r.success).count();
        info!("Batch processed: {} items, {} failed", results.len(), failed);

        Ok(results)
    }

    /// Reject empty batches and batches over the configured limit
    pub fn check_batch_size(&self, len: usize) -> Result<()> {
        if len == 0 {
            return Err(Error::InvalidInput("Posts array cannot be empty".to_string()));
        }
        if len > self.options.max_batch_items {
            return Err(Error::InvalidInput(format!(
                "Too many posts: {} (at most {} per batch)",
                len, self.options.max_batch_items
            )));
        }
        Ok(())
    }

    /// Run one batch entry; errors become a failed [`BatchResult`]
    pub fn generate_item(&self, item: &BatchItem, tone: Tone) -> BatchResult {
        let request = GenerationRequest {
            title: item.title.clone(),
            content: item.content.clone(),
            keywords: item.keywords.clone(),
            max_length: DEFAULT_MAX_LENGTH,
            tone,
        };
        match self.generate_description(&request) {
            Ok(generated) => BatchResult::succeeded(item.id.clone(), generated),
            Err(e) => {
                warn!("Batch item {} failed: {}", item.id, e);
                BatchResult::failed(item.id.clone(), &e)
            }
        }
    }
}
