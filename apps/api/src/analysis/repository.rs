use sqlx::types::Json;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::analysis::models::AnalysisReport;
use crate::models::analysis::AnalysisRow;
use crate::storage::ArchivedDocuments;

pub struct NewAnalysis<'a> {
    pub user_id: Uuid,
    pub profile_id: Uuid,
    pub report: &'a AnalysisReport,
    pub documents: &'a ArchivedDocuments,
}

/// Appends an analysis row. Earlier analyses are kept.
pub async fn save_analysis(pool: &PgPool, new: NewAnalysis<'_>) -> Result<AnalysisRow, sqlx::Error> {
    let NewAnalysis {
        user_id,
        profile_id,
        report,
        documents,
    } = new;

    let row = sqlx::query_as::<_, AnalysisRow>(
        r#"
        INSERT INTO analyses
            (user_id, profile_id, overall_score, analysis_data,
             resume_s3_key, company_requirements_s3_key)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(profile_id)
    .bind(report.score())
    .bind(Json(report))
    .bind(&documents.resume_key)
    .bind(&documents.company_requirements_key)
    .fetch_one(pool)
    .await?;

    info!(
        "Saved analysis {} (score {}) for user {user_id}",
        row.id, row.overall_score
    );
    Ok(row)
}

/// Returns the user's newest analysis, or `None` if they have never run one.
pub async fn get_latest_analysis(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Option<AnalysisRow>, sqlx::Error> {
    sqlx::query_as::<_, AnalysisRow>(
        "SELECT * FROM analyses WHERE user_id = $1 ORDER BY created_at DESC LIMIT 1",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

/// Decodes a stored row's report. Rows written by older clients may be sparse;
/// missing fields take their defaults.
pub fn report_from_row(row: &AnalysisRow) -> Result<AnalysisReport, serde_json::Error> {
    serde_json::from_value(row.analysis_data.clone())
}
