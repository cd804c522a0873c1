use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::models::profile::ProfileRow;
use crate::profile::models::ProfileSubmission;

/// Inserts or replaces the user's single profile row.
pub async fn save_profile(
    pool: &PgPool,
    user_id: Uuid,
    submission: &ProfileSubmission,
) -> Result<ProfileRow, sqlx::Error> {
    let row = sqlx::query_as::<_, ProfileRow>(
        r#"
        INSERT INTO profiles
            (user_id, cgpa, tenth_percentage, twelfth_percentage, backlogs, branch,
             codolio_profile, technical_skills_rating, personal_reflection, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, NOW())
        ON CONFLICT (user_id) DO UPDATE SET
            cgpa = EXCLUDED.cgpa,
            tenth_percentage = EXCLUDED.tenth_percentage,
            twelfth_percentage = EXCLUDED.twelfth_percentage,
            backlogs = EXCLUDED.backlogs,
            branch = EXCLUDED.branch,
            codolio_profile = EXCLUDED.codolio_profile,
            technical_skills_rating = EXCLUDED.technical_skills_rating,
            personal_reflection = EXCLUDED.personal_reflection,
            updated_at = EXCLUDED.updated_at
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(submission.cgpa)
    .bind(submission.tenth_percentage)
    .bind(submission.twelfth_percentage)
    .bind(submission.backlogs)
    .bind(&submission.branch)
    .bind(&submission.codolio_profile)
    .bind(submission.technical_skills_rating)
    .bind(&submission.personal_reflection)
    .fetch_one(pool)
    .await?;

    info!("Saved profile {} for user {user_id}", row.id);
    Ok(row)
}

/// Returns the user's profile, or `None` if they have never submitted one.
pub async fn get_profile(pool: &PgPool, user_id: Uuid) -> Result<Option<ProfileRow>, sqlx::Error> {
    sqlx::query_as::<_, ProfileRow>("SELECT * FROM profiles WHERE user_id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await
}
