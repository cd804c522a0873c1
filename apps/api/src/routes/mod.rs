pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::analysis::handlers as analysis;
use crate::dashboard::handlers as dashboard;
use crate::home;
use crate::profile::handlers as profile;
use crate::session::handlers as auth;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // Session
        .route("/api/v1/auth/sign-up", post(auth::handle_sign_up))
        .route("/api/v1/auth/sign-in", post(auth::handle_sign_in))
        .route("/api/v1/auth/refresh", post(auth::handle_refresh))
        .route("/api/v1/auth/sign-out", post(auth::handle_sign_out))
        .route("/api/v1/auth/session", get(auth::handle_session))
        // Home
        .route("/api/v1/home", get(home::handle_home))
        // Profile intake
        .route("/api/v1/profile", get(profile::handle_get_profile))
        .route("/api/v1/profile/progress", post(profile::handle_progress))
        // Analysis pipeline
        .route(
            "/api/v1/analyses",
            post(analysis::handle_submit).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/api/v1/analyses/latest", get(analysis::handle_latest))
        // Dashboard
        .route("/api/v1/dashboard", get(dashboard::handle_dashboard))
        .route(
            "/api/v1/dashboard/companies/:name",
            get(dashboard::handle_company_detail),
        )
        .with_state(state)
}
