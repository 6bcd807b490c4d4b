//! SEO Meta Description Module
//!
//! Text analysis and meta description synthesis for WordPress posts.
//!
//! Stages, in pipeline order:
//! - [`preprocess`]: markup stripping and bounded previews
//! - [`analyzer`]: keywords, word count, content type, readability
//! - [`summarizer`]: lead sentence extraction
//! - [`describer`]: tone templates and the length cap
//! - [`advisor`]: improvement suggestions
//!
//! [`MetaGenerator`] ties them together and adds batch processing.

pub mod advisor;
pub mod analyzer;
pub mod describer;
pub mod generator;
pub mod preprocess;
pub mod summarizer;
mod text;
pub mod types;

pub use analyzer::analyze;
pub use describer::{FirstPhrase, FixedPhrase, PhraseSelector, RandomPhrase};
pub use generator::{GeneratorOptions, MetaGenerator};
pub use preprocess::extract_preview;
pub use types::{
    AnalysisSummary, BatchItem, BatchResult, ContentAnalysis, ContentType, GeneratedDescription,
    GenerationRequest, Tone, DEFAULT_MAX_LENGTH, MAX_MAX_LENGTH, MIN_MAX_LENGTH,
};
