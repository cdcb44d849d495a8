// Resume screening pipeline.
// Implements: sanitizing, chunking, retrieval, analysis, scoring, recommendations, ranking.
// All model and embedding calls go through llm_client traits; no direct HTTP here.

use serde::Serialize;
use thiserror::Error;

use crate::llm_client::LlmError;

pub mod analysis;
pub mod chunker;
pub mod handlers;
pub mod loader;
pub mod pipeline;
pub mod prompts;
pub mod ranker;
pub mod recommendations;
pub mod retriever;
pub mod sanitizer;
pub mod scoring;

/// Per-resume pipeline failure. None of these abort a batch; the pipeline
/// turns them into `ResumeFailure` entries.
#[derive(Debug, Error)]
pub enum ScreeningError {
    #[error("embedding service error: {0}")]
    EmbeddingService(String),

    #[error("malformed model response: {reason}")]
    MalformedResponse { reason: String, raw: String },

    #[error("unknown role: {0}")]
    UnknownRole(String),

    #[error("model service error: {0}")]
    Model(#[source] LlmError),

    #[error("PDF extraction failed: {0}")]
    Extraction(String),

    #[error("no text left after sanitization")]
    EmptyDocument,
}

impl ScreeningError {
    /// Stable machine-readable code surfaced to the caller.
    pub fn code(&self) -> &'static str {
        match self {
            ScreeningError::EmbeddingService(_) => "EMBEDDING_SERVICE_ERROR",
            ScreeningError::MalformedResponse { .. } => "MALFORMED_RESPONSE",
            ScreeningError::UnknownRole(_) => "UNKNOWN_ROLE",
            ScreeningError::Model(_) => "MODEL_SERVICE_ERROR",
            ScreeningError::Extraction(_) => "EXTRACTION_ERROR",
            ScreeningError::EmptyDocument => "EMPTY_DOCUMENT",
        }
    }

    /// The unparsed model output, when the failure came from parsing it.
    pub fn raw_response(&self) -> Option<&str> {
        match self {
            ScreeningError::MalformedResponse { raw, .. } => Some(raw),
            _ => None,
        }
    }
}

/// Per-resume pipeline stage. A failure records the stage it was attempting;
/// `Uploaded` covers PDF extraction. Sanitizing and ranking cannot fail and
/// have no variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Uploaded,
    Chunked,
    Indexed,
    Retrieved,
    Analyzed,
    Scored,
    Recommended,
}
