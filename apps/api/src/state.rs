use std::sync::Arc;

use aws_sdk_s3::Client as S3Client;
use sqlx::PgPool;

use crate::analysis::analyzer::ReadinessAnalyzer;
use crate::config::Config;
use crate::session::AuthClient;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub s3: S3Client,
    /// Auth provider client; owns the Redis-backed session cache.
    pub auth: AuthClient,
    /// Pluggable analyzer. Default: GeminiAnalyzer.
    pub analyzer: Arc<dyn ReadinessAnalyzer>,
    pub config: Config,
}
