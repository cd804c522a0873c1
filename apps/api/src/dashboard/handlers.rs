//! Axum route handlers for the Dashboard API.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use crate::analysis::models::AnalysisReport;
use crate::analysis::repository::{get_latest_analysis, report_from_row};
use crate::dashboard::view::{
    company_detail, CompanyDetail, Dashboard, DashboardTab, StudentSummary, TabView,
};
use crate::errors::AppError;
use crate::profile::repository::get_profile;
use crate::session::extractor::CurrentUser;
use crate::state::AppState;

/// `tab` is parsed by hand so unknown names get the JSON error envelope.
#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    pub tab: Option<String>,
}

fn requested_tab(raw: Option<&str>) -> Result<Option<DashboardTab>, AppError> {
    raw.map(|raw| {
        DashboardTab::parse(raw).ok_or_else(|| {
            let expected: Vec<&str> = DashboardTab::ALL.iter().map(|t| t.as_str()).collect();
            AppError::Validation(format!(
                "Unknown tab '{raw}'; expected one of {}",
                expected.join(", ")
            ))
        })
    })
    .transpose()
}

async fn load_inputs(
    state: &AppState,
    current: &CurrentUser,
) -> Result<(AnalysisReport, StudentSummary), AppError> {
    let user_id = current.user.id;
    let row = get_latest_analysis(&state.db, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Submit your profile to see the analysis".to_string()))?;
    let profile = get_profile(&state.db, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Profile for user {user_id} not found")))?;

    let report = report_from_row(&row).map_err(|e| AppError::Internal(e.into()))?;
    Ok((report, StudentSummary::new(&current.user, &profile)))
}

/// GET /api/v1/dashboard[?tab=score|skills|companies|action_plan]
pub async fn handle_dashboard(
    State(state): State<AppState>,
    current: CurrentUser,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let tab = requested_tab(query.tab.as_deref())?;
    let (report, student) = load_inputs(&state, &current).await?;
    let dashboard = Dashboard::build(&report, &student);

    let body = match tab {
        Some(tab) => serde_json::to_value::<TabView>(dashboard.into_tab(tab)),
        None => serde_json::to_value(dashboard),
    }
    .map_err(|e| AppError::Internal(e.into()))?;
    Ok(Json(body))
}

/// GET /api/v1/dashboard/companies/:name
pub async fn handle_company_detail(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(name): Path<String>,
) -> Result<Json<CompanyDetail>, AppError> {
    let (report, student) = load_inputs(&state, &current).await?;
    let detail = company_detail(&report, &student, &name)
        .ok_or_else(|| AppError::NotFound(format!("Company {name} not found in analysis")))?;
    Ok(Json(detail))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requested_tab_parses_known_names() {
        assert_eq!(requested_tab(None).unwrap(), None);
        assert_eq!(
            requested_tab(Some("action_plan")).unwrap(),
            Some(DashboardTab::ActionPlan)
        );
    }

    #[test]
    fn test_unknown_tab_is_validation_error() {
        let err = requested_tab(Some("bogus")).unwrap_err();
        assert!(matches!(
            err,
            AppError::Validation(ref m)
                if m == "Unknown tab 'bogus'; expected one of score, skills, companies, action_plan"
        ));
    }
}
