//! Request-body extractors whose rejections use the `AppError` envelope.

use axum::extract::FromRequest;

use crate::errors::AppError;

/// `axum::Json` with malformed or mistyped bodies answered as
/// 400 `VALIDATION_ERROR` instead of axum's plain-text rejection.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{header::CONTENT_TYPE, Request, StatusCode},
        routing::post,
        Json, Router,
    };
    use serde::Deserialize;
    use serde_json::Value;
    use tower::ServiceExt;

    #[derive(Debug, Deserialize)]
    struct Credentials {
        #[allow(dead_code)]
        email: String,
    }

    fn app() -> Router {
        Router::new().route(
            "/",
            post(|AppJson(_creds): AppJson<Credentials>| async { Json("ok") }),
        )
    }

    async fn send(body: &'static str, content_type: &str) -> (StatusCode, Value) {
        let request = Request::post("/")
            .header(CONTENT_TYPE, content_type)
            .body(Body::from(body))
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_malformed_json_uses_error_envelope() {
        let (status, body) = send("{not json", "application/json").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_missing_field_uses_error_envelope() {
        let (status, body) = send("{}", "application/json").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert!(body["error"]["message"].as_str().unwrap().contains("email"));
    }

    #[tokio::test]
    async fn test_wrong_content_type_uses_error_envelope() {
        let (status, body) = send(r#"{"email":"a@b.c"}"#, "text/plain").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_valid_body_reaches_handler() {
        let (status, body) = send(r#"{"email":"a@b.c"}"#, "application/json").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "ok");
    }
}
