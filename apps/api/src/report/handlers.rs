//! Axum route handlers for the Report API.

use axum::{
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use tracing::info;

use crate::errors::AppError;
use crate::report::{render_pdf, ReportData};

/// POST /api/v1/reports
///
/// Renders one screening record as a PDF attachment.
pub async fn handle_render_report(Json(data): Json<ReportData>) -> Result<Response, AppError> {
    let file_name = data.file_name();
    let bytes = tokio::task::spawn_blocking(move || render_pdf(&data))
        .await
        .map_err(|e| AppError::Report(format!("render task failed: {e}")))?
        .map_err(|e| AppError::Report(e.to_string()))?;

    info!("Rendered report {file_name} ({} bytes)", bytes.len());

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        bytes,
    )
        .into_response())
}
