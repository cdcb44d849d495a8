use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::screening::analysis::AnalysisResult;

/// One uploaded PDF, as received from the caller.
#[derive(Debug, Clone)]
pub struct ResumeUpload {
    pub filename: String,
    pub bytes: Bytes,
}

/// A run of extracted text with its 1-based page number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextSegment {
    pub page: u32,
    pub text: String,
}

/// Ordered text segments of one resume. Sanitized in place before chunking.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResumeDocument {
    pub segments: Vec<TextSegment>,
}

impl ResumeDocument {
    pub fn new(segments: Vec<TextSegment>) -> Self {
        Self { segments }
    }

    pub fn is_blank(&self) -> bool {
        self.segments.iter().all(|s| s.text.trim().is_empty())
    }
}

/// Completed screening result for one resume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeRecord {
    pub resume: String,
    pub final_score: f64,
    pub analysis: AnalysisResult,
    /// Free-form mentor advice. Opaque prose: never parsed for structure.
    pub recommendations: String,
}
