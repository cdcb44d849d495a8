//! Axum route handlers for the Screening API.

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::Serialize;
use tracing::info;

use crate::errors::AppError;
use crate::models::resume::ResumeUpload;
use crate::screening::pipeline::{
    run_screening, ScreeningReport, ScreeningRequest, ScreeningServices, DEFAULT_TOP_K,
};
use crate::screening::scoring::WeightSet;
use crate::state::AppState;

/// Context depth the caller-facing selector allows.
pub const MIN_TOP_K: usize = 2;
pub const MAX_TOP_K: usize = 6;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct RoleEntry {
    pub role: String,
    pub weights: WeightSet,
}

#[derive(Debug, Serialize)]
pub struct RolesResponse {
    pub roles: Vec<RoleEntry>,
}

/// Fields collected from the multipart screening form.
#[derive(Debug, Default)]
struct ScreeningForm {
    resumes: Vec<ResumeUpload>,
    job_description: Option<String>,
    role: Option<String>,
    top_k: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/roles
///
/// Lists the roles a screening can be run against, with their weights.
pub async fn handle_list_roles(State(state): State<AppState>) -> Json<RolesResponse> {
    let roles = state
        .role_weights
        .iter()
        .map(|(role, weights)| RoleEntry {
            role: role.clone(),
            weights: *weights,
        })
        .collect();
    Json(RolesResponse { roles })
}

/// POST /api/v1/screenings
///
/// Multipart fields: `resumes` (one or more PDF files), `job_description`,
/// `role`, optional `top_k`. Inputs are validated before any resume is processed.
pub async fn handle_screen_resumes(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ScreeningReport>, AppError> {
    let form = read_form(multipart).await?;
    let (uploads, request) = validate_form(form, &state)?;

    info!(
        "Screening {} resume(s) for role '{}'",
        uploads.len(),
        request.role
    );

    let services = ScreeningServices {
        model: state.llm.as_ref(),
        embedder: state.embedder.as_ref(),
    };
    let report = run_screening(
        uploads,
        &request,
        services,
        &state.role_weights,
        &state.chunker,
    )
    .await?;

    Ok(Json(report))
}

async fn read_form(mut multipart: Multipart) -> Result<ScreeningForm, AppError> {
    let mut form = ScreeningForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "resumes" => {
                let filename = field
                    .file_name()
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("resume-{}.pdf", form.resumes.len() + 1));
                let bytes = field.bytes().await.map_err(|e| {
                    AppError::Validation(format!("Failed to read upload '{filename}': {e}"))
                })?;
                form.resumes.push(ResumeUpload { filename, bytes });
            }
            "job_description" | "role" | "top_k" => {
                let value = field.text().await.map_err(|e| {
                    AppError::Validation(format!("Failed to read field '{name}': {e}"))
                })?;
                match name.as_str() {
                    "job_description" => form.job_description = Some(value),
                    "role" => form.role = Some(value),
                    _ => form.top_k = Some(value),
                }
            }
            _ => {}
        }
    }

    Ok(form)
}

fn validate_form(
    form: ScreeningForm,
    state: &AppState,
) -> Result<(Vec<ResumeUpload>, ScreeningRequest), AppError> {
    if form.resumes.is_empty() {
        return Err(AppError::Validation(
            "Upload at least one PDF resume".to_string(),
        ));
    }

    let job_description = form
        .job_description
        .filter(|jd| !jd.trim().is_empty())
        .ok_or_else(|| AppError::Validation("job_description cannot be empty".to_string()))?;

    let role = form
        .role
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty())
        .ok_or_else(|| AppError::Validation("role is required".to_string()))?;
    if !state.role_weights.contains(&role) {
        return Err(AppError::UnknownRole(role));
    }

    let top_k = match form.top_k.as_deref().map(str::trim) {
        None | Some("") => DEFAULT_TOP_K,
        Some(raw) => raw
            .parse::<usize>()
            .ok()
            .filter(|k| (MIN_TOP_K..=MAX_TOP_K).contains(k))
            .ok_or_else(|| {
                AppError::Validation(format!(
                    "top_k must be a whole number from {MIN_TOP_K} to {MAX_TOP_K}"
                ))
            })?,
    };

    Ok((
        form.resumes,
        ScreeningRequest {
            job_description,
            role,
            top_k,
        },
    ))
}
