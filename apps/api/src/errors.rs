use axum::{
    extract::{multipart::MultipartRejection, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::profile::intake::IntakeError;
use crate::session::AuthError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unprocessable entity: {0}")]
    UnprocessableEntity(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Auth error: {0}")]
    Auth(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Auth provider unavailable: {0}")]
    AuthUnavailable(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("S3 error: {0}")]
    S3(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidInput(msg) => AppError::Validation(msg),
            AuthError::Rejected { status, message } => match status {
                401 | 403 => AppError::Auth(message),
                429 => AppError::RateLimited(message),
                500..=599 => {
                    AppError::AuthUnavailable(format!("auth provider returned {status}: {message}"))
                }
                // Sign-up conflicts, weak passwords and other input the provider refused.
                _ => AppError::Validation(message),
            },
            AuthError::InvalidToken => AppError::Unauthorized,
            AuthError::Http(e) => AppError::AuthUnavailable(format!("auth provider unreachable: {e}")),
            AuthError::Parse(e) => {
                AppError::Internal(anyhow::anyhow!("auth provider returned malformed JSON: {e}"))
            }
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<MultipartRejection> for AppError {
    fn from(rejection: MultipartRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<IntakeError> for AppError {
    fn from(err: IntakeError) -> Self {
        match err {
            IntakeError::Incomplete(_) => AppError::UnprocessableEntity(err.to_string()),
            other => AppError::Validation(other.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::UnprocessableEntity(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "UNPROCESSABLE_ENTITY",
                msg.clone(),
            ),
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "Authentication required".to_string(),
            ),
            // Provider messages ("Invalid login credentials", ...) are meant for the user.
            AppError::Auth(msg) => (StatusCode::UNAUTHORIZED, "AUTH_ERROR", msg.clone()),
            AppError::RateLimited(msg) => {
                (StatusCode::TOO_MANY_REQUESTS, "RATE_LIMITED", msg.clone())
            }
            AppError::AuthUnavailable(msg) => {
                tracing::error!("Auth provider unavailable: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "AUTH_UNAVAILABLE",
                    "The authentication service is unavailable, please try again".to_string(),
                )
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "A database error occurred".to_string(),
                )
            }
            AppError::Llm(msg) => {
                tracing::error!("LLM error: {msg}");
                (StatusCode::BAD_GATEWAY, "LLM_ERROR", msg.clone())
            }
            AppError::S3(msg) => {
                tracing::error!("S3 error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "S3_ERROR",
                    "A storage error occurred".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rejected(status: u16, message: &str) -> AppError {
        AuthError::Rejected {
            status,
            message: message.to_string(),
        }
        .into()
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_rejected_credentials_are_unauthorized() {
        let err = rejected(401, "Invalid login credentials");
        assert!(matches!(err, AppError::Auth(ref m) if m == "Invalid login credentials"));
        assert_eq!(
            rejected(403, "Email not confirmed").into_response().status(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn test_provider_refusing_input_is_bad_request() {
        let err = rejected(422, "User already registered");
        assert!(matches!(err, AppError::Validation(ref m) if m == "User already registered"));
        assert_eq!(
            rejected(400, "Password should be at least 6 characters")
                .into_response()
                .status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_provider_rate_limit_passes_through() {
        let response = rejected(429, "Email rate limit exceeded").into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    }

    #[tokio::test]
    async fn test_provider_outage_is_bad_gateway() {
        let response = rejected(503, "upstream connect error").into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "AUTH_UNAVAILABLE");
    }

    #[tokio::test]
    async fn test_database_errors_are_masked() {
        let response = AppError::from(sqlx::Error::PoolTimedOut).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "DATABASE_ERROR");
        assert_eq!(body["error"]["message"], "A database error occurred");
    }

    #[test]
    fn test_invalid_token_maps_to_unauthorized() {
        let err: AppError = AuthError::InvalidToken.into();
        assert_eq!(err.into_response().status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_incomplete_intake_is_unprocessable() {
        let err: AppError = IntakeError::Incomplete(vec!["resume".to_string()]).into();
        assert_eq!(err.into_response().status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_llm_error_is_bad_gateway() {
        let err = AppError::Llm("Failed to analyze profile with AI: boom".to_string());
        assert_eq!(err.into_response().status(), StatusCode::BAD_GATEWAY);
    }
}
