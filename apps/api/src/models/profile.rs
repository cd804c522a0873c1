use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One row per user in `profiles`; upserted on `user_id`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProfileRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub cgpa: f64,
    pub tenth_percentage: f64,
    pub twelfth_percentage: f64,
    pub backlogs: i32,
    pub branch: String,
    pub codolio_profile: Option<String>,
    pub technical_skills_rating: Option<i32>,
    pub personal_reflection: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
