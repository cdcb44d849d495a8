//! Retriever Index — per-resume, in-memory embedding index.
//!
//! Built fresh for every resume, queried once, then dropped. Nothing is persisted.

use tracing::debug;

use crate::llm_client::EmbeddingService;
use crate::screening::chunker::Chunk;
use crate::screening::ScreeningError;

/// Fixed question used to pull resume context for both model prompts.
pub const EXTRACTION_QUERY: &str = "Extract skills, experience, projects";

/// A chunk returned by a query, with its cosine similarity to the question.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredChunk {
    pub chunk: Chunk,
    pub similarity: f32,
}

#[derive(Debug, Clone, Default)]
pub struct EmbeddingIndex {
    entries: Vec<(Chunk, Vec<f32>)>,
    dim: usize,
}

impl EmbeddingIndex {
    /// Embeds every chunk (one service call each) and stores the pairs.
    ///
    /// Any failed call, empty vector, non-finite component or dimension change
    /// fails the whole build with `EmbeddingService`.
    pub async fn build(
        chunks: Vec<Chunk>,
        embedder: &dyn EmbeddingService,
    ) -> Result<Self, ScreeningError> {
        let mut index = EmbeddingIndex {
            entries: Vec::with_capacity(chunks.len()),
            dim: 0,
        };

        for chunk in chunks {
            let vector = embed_checked(embedder, &chunk.text, index.expected_dim()).await?;
            if index.dim == 0 {
                index.dim = vector.len();
            }
            index.entries.push((chunk, vector));
        }

        debug!(
            "Built embedding index: {} chunks, dim={}",
            index.len(),
            index.dim
        );
        Ok(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn expected_dim(&self) -> Option<usize> {
        (self.dim > 0).then_some(self.dim)
    }

    /// Returns up to `k` chunks nearest to `question`, most similar first.
    /// Ties keep chunk order. `k` larger than the index returns everything.
    pub async fn query(
        &self,
        question: &str,
        k: usize,
        embedder: &dyn EmbeddingService,
    ) -> Result<Vec<ScoredChunk>, ScreeningError> {
        if k == 0 || self.is_empty() {
            return Ok(Vec::new());
        }

        let query_vector = embed_checked(embedder, question, self.expected_dim()).await?;
        Ok(self.nearest(&query_vector, k))
    }

    fn nearest(&self, query: &[f32], k: usize) -> Vec<ScoredChunk> {
        let mut scored: Vec<ScoredChunk> = self
            .entries
            .iter()
            .map(|(chunk, vector)| ScoredChunk {
                chunk: chunk.clone(),
                similarity: cosine_similarity(query, vector),
            })
            .collect();

        // stable sort keeps earlier chunks first on equal similarity
        scored.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
        scored.truncate(k);
        scored
    }
}

async fn embed_checked(
    embedder: &dyn EmbeddingService,
    text: &str,
    expected_dim: Option<usize>,
) -> Result<Vec<f32>, ScreeningError> {
    let vector = embedder
        .embed(text)
        .await
        .map_err(|e| ScreeningError::EmbeddingService(e.to_string()))?;

    if vector.is_empty() {
        return Err(ScreeningError::EmbeddingService(
            "embedding service returned an empty vector".to_string(),
        ));
    }
    if vector.iter().any(|v| !v.is_finite()) {
        return Err(ScreeningError::EmbeddingService(
            "embedding contains non-finite values".to_string(),
        ));
    }
    if let Some(dim) = expected_dim {
        if vector.len() != dim {
            return Err(ScreeningError::EmbeddingService(format!(
                "vector size mismatch: got {}, want {dim}",
                vector.len()
            )));
        }
    }
    Ok(vector)
}

/// Cosine similarity; zero-norm vectors score 0.0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a * norm_b)
}
