//! Home screen state for a signed-in user: greeting and which top-level tab
//! to open. The analysis tab is only reachable once an analysis exists.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::analysis::repository::get_latest_analysis;
use crate::errors::AppError;
use crate::profile::repository::get_profile;
use crate::session::extractor::CurrentUser;
use crate::session::AuthUser;
use crate::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HomeTab {
    Input,
    Analysis,
}

#[derive(Debug, Serialize)]
pub struct HomeView {
    pub display_name: String,
    pub avatar_initial: String,
    pub has_profile: bool,
    pub analysis_available: bool,
    pub active_tab: HomeTab,
}

pub fn build_home_view(user: &AuthUser, has_profile: bool, analysis_available: bool) -> HomeView {
    let display_name = user.display_name();
    let avatar_initial = display_name
        .chars()
        .next()
        .map(|c| c.to_uppercase().to_string())
        .unwrap_or_else(|| "U".to_string());
    HomeView {
        display_name,
        avatar_initial,
        has_profile,
        analysis_available,
        active_tab: if analysis_available {
            HomeTab::Analysis
        } else {
            HomeTab::Input
        },
    }
}

/// GET /api/v1/home
pub async fn handle_home(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Json<HomeView>, AppError> {
    let user_id = current.user.id;
    let has_profile = get_profile(&state.db, user_id).await?.is_some();
    let analysis_available = get_latest_analysis(&state.db, user_id).await?.is_some();
    Ok(Json(build_home_view(&current.user, has_profile, analysis_available)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn user(full_name: Option<&str>, email: Option<&str>) -> AuthUser {
        AuthUser {
            id: Uuid::new_v4(),
            email: email.map(String::from),
            full_name: full_name.map(String::from),
        }
    }

    #[test]
    fn test_first_visit_opens_input_tab() {
        let view = build_home_view(&user(Some("priya sharma"), None), false, false);
        assert_eq!(view.active_tab, HomeTab::Input);
        assert_eq!(view.avatar_initial, "P");
        assert_eq!(view.display_name, "priya sharma");
    }

    #[test]
    fn test_existing_analysis_opens_analysis_tab() {
        let view = build_home_view(&user(None, Some("kiran@uni.edu")), true, true);
        assert_eq!(view.active_tab, HomeTab::Analysis);
        assert_eq!(view.avatar_initial, "K");
    }

    #[test]
    fn test_anonymous_user_falls_back_to_student() {
        let view = build_home_view(&user(None, None), false, false);
        assert_eq!(view.display_name, "Student");
        assert_eq!(view.avatar_initial, "S");
    }
}
