//! Screening Pipeline — drives every resume through the stages in upload order.
//!
//! Flow per resume: load → sanitize → chunk → index → retrieve → analyze →
//!                  score → recommend. Records are ranked once all resumes ran.
//!
//! Each resume runs in its own failure scope: an error becomes a `ResumeFailure`
//! and the batch moves on to the next upload.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::llm_client::{EmbeddingService, ModelService};
use crate::models::resume::{ResumeDocument, ResumeRecord, ResumeUpload};
use crate::screening::analysis::request_analysis;
use crate::screening::chunker::{chunk_document, ChunkerConfig};
use crate::screening::loader::load_resume;
use crate::screening::ranker::rank_records;
use crate::screening::recommendations::request_recommendations;
use crate::screening::retriever::{EmbeddingIndex, EXTRACTION_QUERY};
use crate::screening::sanitizer::sanitize_document;
use crate::screening::scoring::{compute_final_score, RoleWeights};
use crate::screening::{ScreeningError, Stage};

/// Default number of context chunks retrieved per resume.
pub const DEFAULT_TOP_K: usize = 4;

/// External service handles for one run.
#[derive(Clone, Copy)]
pub struct ScreeningServices<'a> {
    pub model: &'a dyn ModelService,
    pub embedder: &'a dyn EmbeddingService,
}

/// Caller-supplied parameters shared by every resume in a run.
#[derive(Debug, Clone)]
pub struct ScreeningRequest {
    pub job_description: String,
    pub role: String,
    pub top_k: usize,
}

/// A resume that did not make it to the ranking.
#[derive(Debug, Clone, Serialize)]
pub struct ResumeFailure {
    pub resume: String,
    pub stage: Stage,
    pub code: &'static str,
    pub message: String,
    /// Unparsed model output, for diagnosing malformed responses.
    pub raw_response: Option<String>,
}

/// Outcome of one screening run.
#[derive(Debug, Clone, Serialize)]
pub struct ScreeningReport {
    pub run_id: Uuid,
    pub role: String,
    pub generated_at: DateTime<Utc>,
    pub total_resumes: usize,
    pub top_score: Option<f64>,
    /// Successful records, highest final score first.
    pub ranked: Vec<ResumeRecord>,
    /// Failed resumes in upload order.
    pub failures: Vec<ResumeFailure>,
}

/// Screens every upload sequentially and ranks the successes.
///
/// Only an unknown role fails the whole run, and it does so before any
/// resume is touched.
pub async fn run_screening(
    uploads: Vec<ResumeUpload>,
    request: &ScreeningRequest,
    services: ScreeningServices<'_>,
    role_weights: &RoleWeights,
    chunker: &ChunkerConfig,
) -> Result<ScreeningReport, ScreeningError> {
    role_weights.get(&request.role)?;

    let run_id = Uuid::new_v4();
    let total_resumes = uploads.len();
    info!(
        %run_id,
        role = %request.role,
        resumes = total_resumes,
        top_k = request.top_k,
        "Starting screening run"
    );

    let mut records = Vec::with_capacity(total_resumes);
    let mut failures = Vec::new();

    for upload in uploads {
        let filename = upload.filename.clone();
        match screen_resume(upload, request, services, role_weights, chunker).await {
            Ok(record) => {
                info!(%run_id, resume = %filename, score = record.final_score, "Resume screened");
                records.push(record);
            }
            Err((stage, err)) => {
                warn!(%run_id, resume = %filename, ?stage, "Resume failed: {err}");
                failures.push(ResumeFailure {
                    resume: filename,
                    stage,
                    code: err.code(),
                    message: err.to_string(),
                    raw_response: err.raw_response().map(str::to_string),
                });
            }
        }
    }

    let ranked = rank_records(records);
    let top_score = ranked.first().map(|r| r.final_score);
    info!(
        %run_id,
        ranked = ranked.len(),
        failed = failures.len(),
        "Screening run finished"
    );

    Ok(ScreeningReport {
        run_id,
        role: request.role.clone(),
        generated_at: Utc::now(),
        total_resumes,
        top_score,
        ranked,
        failures,
    })
}

/// Runs one upload through every stage. Errors carry the stage being attempted.
pub async fn screen_resume(
    upload: ResumeUpload,
    request: &ScreeningRequest,
    services: ScreeningServices<'_>,
    role_weights: &RoleWeights,
    chunker: &ChunkerConfig,
) -> Result<ResumeRecord, (Stage, ScreeningError)> {
    let doc = load_resume(upload.bytes)
        .await
        .map_err(|e| (Stage::Uploaded, e))?;
    screen_document(doc, upload.filename, request, services, role_weights, chunker).await
}

/// Runs an already-extracted document through sanitize → recommend.
pub async fn screen_document(
    mut doc: ResumeDocument,
    filename: String,
    request: &ScreeningRequest,
    services: ScreeningServices<'_>,
    role_weights: &RoleWeights,
    chunker: &ChunkerConfig,
) -> Result<ResumeRecord, (Stage, ScreeningError)> {
    sanitize_document(&mut doc);

    let chunks = chunk_document(&doc, chunker);
    drop(doc);
    if chunks.is_empty() {
        return Err((Stage::Chunked, ScreeningError::EmptyDocument));
    }

    let index = EmbeddingIndex::build(chunks, services.embedder)
        .await
        .map_err(|e| (Stage::Indexed, e))?;

    let context = index
        .query(EXTRACTION_QUERY, request.top_k, services.embedder)
        .await
        .map_err(|e| (Stage::Retrieved, e))?;
    drop(index);

    let analysis = request_analysis(services.model, &context, &request.job_description)
        .await
        .map_err(|e| (Stage::Analyzed, e))?;

    let final_score = compute_final_score(&analysis, &request.role, role_weights)
        .map_err(|e| (Stage::Scored, e))?;

    let recommendations =
        request_recommendations(services.model, &context, &request.job_description)
            .await
            .map_err(|e| (Stage::Recommended, e))?;

    Ok(ResumeRecord {
        resume: filename,
        final_score,
        analysis,
        recommendations,
    })
}
