//! Axum route handlers for the Analysis API.

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    Json,
};
use tracing::info;

use crate::analysis::pipeline::{run_analysis, AnalysisResponse, PipelineDeps};
use crate::analysis::repository::get_latest_analysis;
use crate::errors::AppError;
use crate::models::analysis::AnalysisRow;
use crate::profile::intake::IntakeForm;
use crate::profile::multipart::intake_from_multipart;
use crate::session::extractor::CurrentUser;
use crate::state::AppState;

/// POST /api/v1/analyses
///
/// Multipart submission of the intake form. Runs the full pipeline and returns
/// the report together with the dashboard built from it.
pub async fn handle_submit(
    State(state): State<AppState>,
    current: CurrentUser,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<AnalysisResponse>, AppError> {
    let mut form = intake_from_multipart(multipart?, IntakeForm::new()).await?;
    form.validate_all();
    let (submission, documents) = form.into_submission()?;

    info!("Intake complete for user {}", current.user.id);

    let response = run_analysis(
        PipelineDeps {
            db: &state.db,
            s3: &state.s3,
            s3_bucket: &state.config.s3_bucket,
            analyzer: state.analyzer.as_ref(),
        },
        &current.user,
        submission,
        documents,
    )
    .await?;

    Ok(Json(response))
}

/// GET /api/v1/analyses/latest
pub async fn handle_latest(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Json<AnalysisRow>, AppError> {
    let row = get_latest_analysis(&state.db, current.user.id)
        .await?
        .ok_or_else(|| AppError::NotFound("No analysis yet. Submit your profile first.".to_string()))?;
    Ok(Json(row))
}
