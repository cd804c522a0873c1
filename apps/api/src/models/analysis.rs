use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// Append-only; the newest row per user is the one the dashboard shows.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AnalysisRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub profile_id: Uuid,
    pub overall_score: i32,
    /// The model's report as returned (see `analysis::models::AnalysisReport`).
    pub analysis_data: Value,
    pub resume_s3_key: Option<String>,
    pub company_requirements_s3_key: Option<String>,
    pub created_at: DateTime<Utc>,
}
