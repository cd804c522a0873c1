//! Analysis pipeline: the linear submit path.
//!
//! Flow: save_profile → archive documents → analyzer.analyze → save_analysis →
//!       dashboard. Any step failing aborts the run with that step's error;
//!       earlier steps are not rolled back.

use serde::Serialize;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::analysis::analyzer::ReadinessAnalyzer;
use crate::analysis::models::AnalysisReport;
use crate::analysis::repository::{save_analysis, NewAnalysis};
use crate::dashboard::view::{Dashboard, StudentSummary};
use crate::errors::AppError;
use crate::profile::models::{AnalysisDocuments, ProfileSubmission};
use crate::profile::repository::save_profile;
use crate::session::AuthUser;
use crate::storage::archive_documents;

#[derive(Debug, Serialize)]
pub struct AnalysisResponse {
    pub analysis_id: Uuid,
    pub profile_id: Uuid,
    pub report: AnalysisReport,
    pub dashboard: Dashboard,
}

pub struct PipelineDeps<'a> {
    pub db: &'a PgPool,
    pub s3: &'a aws_sdk_s3::Client,
    pub s3_bucket: &'a str,
    pub analyzer: &'a dyn ReadinessAnalyzer,
}

pub async fn run_analysis(
    deps: PipelineDeps<'_>,
    user: &AuthUser,
    submission: ProfileSubmission,
    documents: AnalysisDocuments,
) -> Result<AnalysisResponse, AppError> {
    // Step 1: Persist the profile
    let profile = save_profile(deps.db, user.id, &submission).await?;

    // Step 2: Archive the uploads
    let run_id = Uuid::new_v4();
    let archived = archive_documents(deps.s3, deps.s3_bucket, user.id, run_id, &documents).await?;

    // Step 3: Model call
    info!("Analyzing profile {} for user {}", profile.id, user.id);
    let report = deps.analyzer.analyze(&submission, &documents).await?;

    // Step 4: Persist the analysis
    let row = save_analysis(
        deps.db,
        NewAnalysis {
            user_id: user.id,
            profile_id: profile.id,
            report: &report,
            documents: &archived,
        },
    )
    .await?;

    // Step 5: Hand the result to the dashboard
    let student = StudentSummary::new(user, &profile);
    let dashboard = Dashboard::build(&report, &student);

    Ok(AnalysisResponse {
        analysis_id: row.id,
        profile_id: profile.id,
        report,
        dashboard,
    })
}
