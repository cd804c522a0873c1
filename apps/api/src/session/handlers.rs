//! Axum route handlers for the Auth API.

use axum::{extract::State, http::StatusCode, Json};

use crate::errors::AppError;
use crate::extract::AppJson;
use crate::session::extractor::CurrentUser;
use crate::session::{
    AuthUser, RefreshRequest, Session, SignInRequest, SignUpOutcome, SignUpRequest,
};
use crate::state::AppState;

/// POST /api/v1/auth/sign-up
pub async fn handle_sign_up(
    State(state): State<AppState>,
    AppJson(req): AppJson<SignUpRequest>,
) -> Result<(StatusCode, Json<SignUpOutcome>), AppError> {
    let outcome = state.auth.sign_up(&req).await?;
    Ok((StatusCode::CREATED, Json(outcome)))
}

/// POST /api/v1/auth/sign-in
pub async fn handle_sign_in(
    State(state): State<AppState>,
    AppJson(req): AppJson<SignInRequest>,
) -> Result<Json<Session>, AppError> {
    Ok(Json(state.auth.sign_in(&req).await?))
}

/// POST /api/v1/auth/refresh
pub async fn handle_refresh(
    State(state): State<AppState>,
    AppJson(req): AppJson<RefreshRequest>,
) -> Result<Json<Session>, AppError> {
    Ok(Json(state.auth.refresh(&req).await?))
}

/// POST /api/v1/auth/sign-out
pub async fn handle_sign_out(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<StatusCode, AppError> {
    state.auth.sign_out(&current.access_token).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/auth/session
pub async fn handle_session(current: CurrentUser) -> Json<AuthUser> {
    Json(current.user)
}
