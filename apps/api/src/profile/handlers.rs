//! Axum route handlers for the Profile API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::extract::AppJson;
use crate::profile::intake::{IntakeForm, IntakeProgress, IntakeStep};
use crate::profile::models::ProfileForm;
use crate::profile::repository::get_profile;
use crate::session::extractor::CurrentUser;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    /// Stored profile in form shape, for prefilling; `None` for first-time users.
    pub profile: Option<ProfileForm>,
    pub intake: IntakeProgress,
}

#[derive(Debug, Deserialize)]
pub struct ProgressRequest {
    #[serde(flatten)]
    pub fields: ProfileForm,
    #[serde(default)]
    pub job_description_text: String,
    #[serde(default)]
    pub has_resume: bool,
    #[serde(default)]
    pub has_company_requirements: bool,
}

/// GET /api/v1/profile
pub async fn handle_get_profile(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Json<ProfileResponse>, AppError> {
    let row = get_profile(&state.db, current.user.id).await?;

    let response = match row {
        Some(row) => {
            let form = IntakeForm::prefilled(&row);
            ProfileResponse {
                profile: Some(form.fields.clone()),
                intake: form.snapshot(),
            }
        }
        None => ProfileResponse {
            profile: None,
            intake: IntakeForm::new().snapshot(),
        },
    };
    Ok(Json(response))
}

/// POST /api/v1/profile/progress
///
/// Evaluates a draft of the form (files reported as presence flags) and returns
/// per-step completion so the client can enable submission.
pub async fn handle_progress(
    _current: CurrentUser,
    AppJson(req): AppJson<ProgressRequest>,
) -> Json<IntakeProgress> {
    Json(evaluate_draft(req))
}

fn evaluate_draft(req: ProgressRequest) -> IntakeProgress {
    let mut form = IntakeForm::new();
    form.fields = req.fields;
    form.set_job_description_text(req.job_description_text);
    form.validate_all();

    // Files are not uploaded until submission; trust the client's flags here.
    if req.has_resume {
        form.completed.resume = true;
    }
    if req.has_company_requirements {
        form.completed.company = true;
    }
    form.active_step = form
        .incomplete_steps()
        .first()
        .copied()
        .unwrap_or(IntakeStep::Assessment);
    form.snapshot()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draft_with_file_flags_is_complete() {
        let req: ProgressRequest = serde_json::from_str(
            r#"{
                "academic_details": {
                    "cgpa": "8.0", "tenth_percentage": "90",
                    "twelfth_percentage": "85", "branch": "CSE"
                },
                "codolio_profile": "https://codolio.com/me",
                "has_resume": true,
                "has_company_requirements": true
            }"#,
        )
        .unwrap();
        let progress = evaluate_draft(req);
        assert!(progress.is_complete);
        assert_eq!(progress.progress, 100.0);
        assert_eq!(progress.active_step, IntakeStep::Assessment);
    }

    #[test]
    fn test_empty_draft_points_at_academic() {
        let req: ProgressRequest = serde_json::from_str("{}").unwrap();
        let progress = evaluate_draft(req);
        assert_eq!(progress.active_step, IntakeStep::Academic);
        assert_eq!(progress.completed.completed_count(), 1);
        assert_eq!(
            progress.incomplete_steps,
            vec![
                IntakeStep::Academic,
                IntakeStep::Codolio,
                IntakeStep::Resume,
                IntakeStep::Company
            ]
        );
    }
}
