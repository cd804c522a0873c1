//! Readiness analyzer: pluggable backend that turns a profile and its
//! documents into an `AnalysisReport`.
//!
//! `AppState` holds an `Arc<dyn ReadinessAnalyzer>`; production uses
//! `GeminiAnalyzer`.

use async_trait::async_trait;
use tracing::{info, warn};

use crate::analysis::models::AnalysisReport;
use crate::analysis::prompts::{build_analysis_prompt, COMPANY_TEXT_HEADER};
use crate::errors::AppError;
use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::{LlmClient, LlmError, Part};
use crate::profile::models::{AnalysisDocuments, CompanyRequirements, ProfileSubmission};

#[async_trait]
pub trait ReadinessAnalyzer: Send + Sync {
    async fn analyze(
        &self,
        profile: &ProfileSubmission,
        documents: &AnalysisDocuments,
    ) -> Result<AnalysisReport, AppError>;
}

/// Sends the profile and both documents to Gemini in a single call.
pub struct GeminiAnalyzer(pub LlmClient);

#[async_trait]
impl ReadinessAnalyzer for GeminiAnalyzer {
    async fn analyze(
        &self,
        profile: &ProfileSubmission,
        documents: &AnalysisDocuments,
    ) -> Result<AnalysisReport, AppError> {
        let parts = build_parts(profile, documents);
        let report: AnalysisReport = self
            .0
            .generate_json(&parts, JSON_ONLY_SYSTEM)
            .await
            .map_err(analysis_failed)?;

        let report = normalize_report(report);
        info!(
            "Analysis returned score {} across {} companies",
            report.score(),
            report.companies.len()
        );
        Ok(report)
    }
}

fn analysis_failed(err: LlmError) -> AppError {
    AppError::Llm(format!("Failed to analyze profile with AI: {err}"))
}

/// Prompt text, then the resume PDF, then the requirements (PDF or text).
pub fn build_parts(profile: &ProfileSubmission, documents: &AnalysisDocuments) -> Vec<Part> {
    let resume = &documents.resume;
    let mut parts = vec![
        Part::text(build_analysis_prompt(profile)),
        Part::inline(resume.mime_type(), &resume.bytes),
    ];
    match &documents.company_requirements {
        CompanyRequirements::Document(doc) => parts.push(Part::inline(doc.mime_type(), &doc.bytes)),
        CompanyRequirements::Text(text) => {
            parts.push(Part::text(format!("{COMPANY_TEXT_HEADER}{text}")))
        }
    }
    parts
}

/// Pulls out-of-range numbers back into the documented scales.
fn normalize_report(mut report: AnalysisReport) -> AnalysisReport {
    if !(0.0..=100.0).contains(&report.overall_score) {
        warn!(
            "Model returned out-of-range overall score {}; clamping",
            report.overall_score
        );
        report.overall_score = report.overall_score.clamp(0.0, 100.0);
    }
    for company in &mut report.companies {
        company.match_percentage = company.match_percentage.clamp(0.0, 100.0);
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::models::CompanyAnalysis;
    use crate::profile::models::UploadedDocument;
    use bytes::Bytes;

    fn profile() -> ProfileSubmission {
        ProfileSubmission {
            cgpa: 7.6,
            tenth_percentage: 88.0,
            twelfth_percentage: 79.0,
            backlogs: 1,
            branch: "Mechanical".to_string(),
            codolio_profile: "https://codolio.com/profile/meera".to_string(),
            technical_skills_rating: 6,
            personal_reflection: Some("Comfortable with Python".to_string()),
        }
    }

    fn pdf(name: &str) -> UploadedDocument {
        UploadedDocument {
            file_name: name.to_string(),
            content_type: "application/pdf".to_string(),
            bytes: Bytes::from_static(b"%PDF-1.5 body"),
        }
    }

    #[test]
    fn test_parts_with_text_requirements() {
        let docs = AnalysisDocuments {
            resume: pdf("resume.pdf"),
            company_requirements: CompanyRequirements::Text("Infosys SE, 60% aggregate".to_string()),
        };
        let parts = serde_json::to_value(build_parts(&profile(), &docs)).unwrap();
        let parts = parts.as_array().unwrap();
        assert_eq!(parts.len(), 3);
        assert!(parts[0]["text"].as_str().unwrap().contains("- CGPA: 7.6"));
        assert_eq!(parts[1]["inlineData"]["mimeType"], "application/pdf");
        assert_eq!(
            parts[2]["text"],
            "COMPANY REQUIREMENTS TEXT:\nInfosys SE, 60% aggregate"
        );
    }

    #[test]
    fn test_parts_with_pdf_requirements() {
        let docs = AnalysisDocuments {
            resume: pdf("resume.pdf"),
            company_requirements: CompanyRequirements::Document(pdf("jd.pdf")),
        };
        let parts = serde_json::to_value(build_parts(&profile(), &docs)).unwrap();
        let parts = parts.as_array().unwrap();
        assert_eq!(parts.len(), 3);
        assert!(parts[2].get("inlineData").is_some());
    }

    #[test]
    fn test_model_failures_carry_analysis_prefix() {
        let err = analysis_failed(LlmError::InvalidFormat);
        assert!(matches!(
            err,
            AppError::Llm(ref m) if m == "Failed to analyze profile with AI: Invalid response format from Gemini"
        ));

        let err = analysis_failed(LlmError::Api {
            status: 400,
            message: "API key not valid".to_string(),
        });
        assert!(matches!(
            err,
            AppError::Llm(ref m) if m.starts_with("Failed to analyze profile with AI: ")
                && m.ends_with("API key not valid")
        ));
    }

    #[test]
    fn test_normalize_clamps_scores() {
        let report = AnalysisReport {
            overall_score: 104.0,
            companies: vec![CompanyAnalysis {
                match_percentage: -5.0,
                ..Default::default()
            }],
            action_plan: vec![],
        };
        let report = normalize_report(report);
        assert_eq!(report.overall_score, 100.0);
        assert_eq!(report.companies[0].match_percentage, 0.0);
    }
}
