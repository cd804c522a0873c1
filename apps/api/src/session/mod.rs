//! Session store: wraps the hosted auth provider (Supabase GoTrue REST API).
//!
//! Exposes sign-up / sign-in / refresh / sign-out and resolves bearer tokens to
//! the current user. Resolved users are cached in Redis (see `cache`).

use reqwest::{Client, RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

pub mod cache;
pub mod extractor;
pub mod handlers;
pub mod validation;

use crate::session::cache::SessionCache;
use crate::session::validation::{validate_sign_in, validate_sign_up};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("{message}")]
    Rejected { status: u16, message: String },

    #[error("Invalid or expired access token")]
    InvalidToken,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// The signed-in user as the rest of the service sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: Option<String>,
    pub full_name: Option<String>,
}

impl AuthUser {
    /// Name shown in greetings and on the dashboard header.
    pub fn display_name(&self) -> String {
        self.full_name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .or(self.email.as_deref().filter(|e| !e.trim().is_empty()))
            .unwrap_or("Student")
            .to_string()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: u64,
    pub user: AuthUser,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SignUpRequest {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    #[serde(default)]
    pub full_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Serialize)]
pub struct SignUpOutcome {
    pub message: String,
    /// Present only when the provider confirms accounts without e-mail verification.
    pub session: Option<Session>,
}

// Wire shapes of the provider's responses.

#[derive(Debug, Deserialize)]
struct ProviderUser {
    id: Uuid,
    email: Option<String>,
    #[serde(default)]
    user_metadata: Value,
}

impl From<ProviderUser> for AuthUser {
    fn from(user: ProviderUser) -> Self {
        let full_name = user
            .user_metadata
            .get("full_name")
            .and_then(|v| v.as_str())
            .map(String::from);
        AuthUser {
            id: user.id,
            email: user.email,
            full_name,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ProviderSession {
    access_token: String,
    refresh_token: String,
    #[serde(default = "default_token_type")]
    token_type: String,
    #[serde(default)]
    expires_in: u64,
    user: ProviderUser,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

impl From<ProviderSession> for Session {
    fn from(s: ProviderSession) -> Self {
        Session {
            access_token: s.access_token,
            refresh_token: s.refresh_token,
            token_type: s.token_type,
            expires_in: s.expires_in,
            user: s.user.into(),
        }
    }
}

/// Client for the provider's auth endpoints plus the token → user cache.
#[derive(Clone)]
pub struct AuthClient {
    client: Client,
    base_url: String,
    anon_key: String,
    cache: SessionCache,
}

impl AuthClient {
    pub fn new(
        base_url: &str,
        anon_key: String,
        cache: SessionCache,
    ) -> Result<Self, AuthError> {
        Ok(Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()?,
            base_url: format!("{}/auth/v1", base_url.trim_end_matches('/')),
            anon_key,
            cache,
        })
    }

    fn request(&self, method: reqwest::Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}{}", self.base_url, path))
            .header("apikey", &self.anon_key)
    }

    pub async fn sign_up(&self, req: &SignUpRequest) -> Result<SignUpOutcome, AuthError> {
        validate_sign_up(req)?;

        let body = json!({
            "email": req.email.trim(),
            "password": req.password,
            "data": { "full_name": req.full_name.trim() },
        });
        let value: Value = send(self.request(reqwest::Method::POST, "/signup").json(&body)).await?;

        info!("Registered account for {}", req.email.trim());

        // With auto-confirm the provider returns a full session, otherwise the bare user.
        let session: Option<Session> = if value.get("access_token").is_some() {
            Some(serde_json::from_value::<ProviderSession>(value)?.into())
        } else {
            None
        };

        Ok(SignUpOutcome {
            message: "Registration successful! Please check your email to verify your account."
                .to_string(),
            session,
        })
    }

    pub async fn sign_in(&self, req: &SignInRequest) -> Result<Session, AuthError> {
        validate_sign_in(req)?;

        let body = json!({ "email": req.email.trim(), "password": req.password });
        let session: ProviderSession = send(
            self.request(reqwest::Method::POST, "/token?grant_type=password")
                .json(&body),
        )
        .await
        .map_err(credentials_rejected)?;
        let session: Session = session.into();

        self.cache.store(&session.access_token, &session.user).await;
        info!("User {} signed in", session.user.id);
        Ok(session)
    }

    pub async fn refresh(&self, req: &RefreshRequest) -> Result<Session, AuthError> {
        if req.refresh_token.trim().is_empty() {
            return Err(AuthError::InvalidInput(
                "refresh_token cannot be empty".to_string(),
            ));
        }

        let body = json!({ "refresh_token": req.refresh_token });
        let session: ProviderSession = send(
            self.request(reqwest::Method::POST, "/token?grant_type=refresh_token")
                .json(&body),
        )
        .await
        .map_err(credentials_rejected)?;
        let session: Session = session.into();

        self.cache.store(&session.access_token, &session.user).await;
        Ok(session)
    }

    pub async fn sign_out(&self, access_token: &str) -> Result<(), AuthError> {
        self.cache.evict(access_token).await;

        let response = self
            .request(reqwest::Method::POST, "/logout")
            .bearer_auth(access_token)
            .send()
            .await?;

        // An already-expired token is as signed out as it gets.
        if response.status().is_success() || response.status() == StatusCode::UNAUTHORIZED {
            return Ok(());
        }
        Err(rejection(response).await)
    }

    /// Resolves a bearer token to its user, consulting the session cache first.
    pub async fn current_user(&self, access_token: &str) -> Result<AuthUser, AuthError> {
        if let Some(user) = self.cache.lookup(access_token).await {
            debug!("Session cache hit for user {}", user.id);
            return Ok(user);
        }

        let response = self
            .request(reqwest::Method::GET, "/user")
            .bearer_auth(access_token)
            .send()
            .await?;

        if matches!(
            response.status(),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN
        ) {
            return Err(AuthError::InvalidToken);
        }
        if !response.status().is_success() {
            return Err(rejection(response).await);
        }

        let user: AuthUser = response.json::<ProviderUser>().await?.into();
        self.cache.store(access_token, &user).await;
        Ok(user)
    }
}

async fn send<T: serde::de::DeserializeOwned>(request: RequestBuilder) -> Result<T, AuthError> {
    let response = request.send().await?;
    if !response.status().is_success() {
        return Err(rejection(response).await);
    }
    let body = response.text().await?;
    Ok(serde_json::from_str(&body)?)
}

async fn rejection(response: reqwest::Response) -> AuthError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    AuthError::Rejected {
        status,
        message: provider_message(&body),
    }
}

/// The token endpoint answers wrong passwords and stale refresh tokens with 400.
fn credentials_rejected(err: AuthError) -> AuthError {
    match err {
        AuthError::Rejected { status: 400, message } => AuthError::Rejected {
            status: 401,
            message,
        },
        other => other,
    }
}

/// Picks the human-readable message out of a provider error body.
/// GoTrue uses `error_description`, `msg` or `message` depending on the endpoint.
fn provider_message(body: &str) -> String {
    let parsed: Option<Value> = serde_json::from_str(body).ok();
    parsed
        .as_ref()
        .and_then(|v| {
            ["error_description", "msg", "message", "error"]
                .iter()
                .find_map(|key| v.get(*key).and_then(|m| m.as_str()))
        })
        .map(String::from)
        .unwrap_or_else(|| {
            if body.trim().is_empty() {
                "Authentication failed".to_string()
            } else {
                body.trim().to_string()
            }
        })
}
