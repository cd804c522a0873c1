//! Intake form state: the five-step profile form and the completion
//! tracking that gates submission.
//!
//! Steps run Academic → Codolio → Resume → Company → Assessment. Validating a
//! step records whether it is complete and, when it is, moves the form on to the
//! next step. Submission requires every step to be complete.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::profile::ProfileRow;
use crate::profile::models::{
    AnalysisDocuments, CompanyRequirements, ProfileForm, ProfileSubmission, UploadedDocument,
};

#[derive(Debug, Error)]
pub enum IntakeError {
    #[error("Please select a PDF file only.")]
    NotPdf,

    #[error("Complete all required steps before submitting: {}", .0.join(", "))]
    Incomplete(Vec<String>),

    #[error("Invalid {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },

    #[error("Malformed form upload: {0}")]
    Multipart(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntakeStep {
    Academic,
    Codolio,
    Resume,
    Company,
    Assessment,
}

impl IntakeStep {
    pub const ALL: [IntakeStep; 5] = [
        IntakeStep::Academic,
        IntakeStep::Codolio,
        IntakeStep::Resume,
        IntakeStep::Company,
        IntakeStep::Assessment,
    ];

    pub fn next(self) -> Option<IntakeStep> {
        let idx = Self::ALL.iter().position(|s| *s == self)?;
        Self::ALL.get(idx + 1).copied()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            IntakeStep::Academic => "academic",
            IntakeStep::Codolio => "codolio",
            IntakeStep::Resume => "resume",
            IntakeStep::Company => "company",
            IntakeStep::Assessment => "assessment",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepCompletion {
    pub academic: bool,
    pub codolio: bool,
    pub resume: bool,
    pub company: bool,
    pub assessment: bool,
}

impl StepCompletion {
    pub fn get(&self, step: IntakeStep) -> bool {
        match step {
            IntakeStep::Academic => self.academic,
            IntakeStep::Codolio => self.codolio,
            IntakeStep::Resume => self.resume,
            IntakeStep::Company => self.company,
            IntakeStep::Assessment => self.assessment,
        }
    }

    fn set(&mut self, step: IntakeStep, done: bool) {
        match step {
            IntakeStep::Academic => self.academic = done,
            IntakeStep::Codolio => self.codolio = done,
            IntakeStep::Resume => self.resume = done,
            IntakeStep::Company => self.company = done,
            IntakeStep::Assessment => self.assessment = done,
        }
    }

    pub fn completed_count(&self) -> usize {
        IntakeStep::ALL.iter().filter(|s| self.get(**s)).count()
    }
}

/// Snapshot returned to clients so they can gate their submit control.
#[derive(Debug, Clone, Serialize)]
pub struct IntakeProgress {
    pub active_step: IntakeStep,
    pub completed: StepCompletion,
    pub progress: f64,
    pub is_complete: bool,
    pub incomplete_steps: Vec<IntakeStep>,
}

#[derive(Debug, Clone)]
pub struct IntakeForm {
    pub active_step: IntakeStep,
    pub fields: ProfileForm,
    pub resume: Option<UploadedDocument>,
    pub company_requirements: Option<UploadedDocument>,
    pub job_description_text: String,
    pub completed: StepCompletion,
}

impl Default for IntakeForm {
    fn default() -> Self {
        Self::new()
    }
}

impl IntakeForm {
    pub fn new() -> Self {
        Self {
            active_step: IntakeStep::Academic,
            fields: ProfileForm::default(),
            resume: None,
            company_requirements: None,
            job_description_text: String::new(),
            completed: StepCompletion::default(),
        }
    }

    /// Starts from the stored profile. Files are never stored, so the resume
    /// and company steps always start incomplete.
    pub fn prefilled(row: &ProfileRow) -> Self {
        let fields = ProfileForm::from(row);
        let completed = StepCompletion {
            academic: true,
            codolio: !fields.codolio_profile.is_empty(),
            resume: false,
            company: false,
            assessment: true,
        };
        Self {
            fields,
            completed,
            ..Self::new()
        }
    }

    pub fn attach_resume(&mut self, doc: UploadedDocument) -> Result<(), IntakeError> {
        if !doc.is_pdf() {
            return Err(IntakeError::NotPdf);
        }
        self.resume = Some(doc);
        self.completed.resume = true;
        Ok(())
    }

    /// Attaching a requirements PDF discards any pasted job description.
    pub fn attach_company_requirements(&mut self, doc: UploadedDocument) -> Result<(), IntakeError> {
        if !doc.is_pdf() {
            return Err(IntakeError::NotPdf);
        }
        self.company_requirements = Some(doc);
        self.job_description_text.clear();
        self.completed.company = true;
        Ok(())
    }

    /// Non-blank text discards any attached requirements PDF.
    pub fn set_job_description_text(&mut self, text: impl Into<String>) {
        self.job_description_text = text.into();
        if !self.job_description_text.trim().is_empty() {
            self.company_requirements = None;
        }
    }

    pub fn validate_step(&mut self, step: IntakeStep) -> bool {
        let valid = step_is_valid(
            step,
            &self.fields,
            self.resume.is_some(),
            self.company_requirements.is_some(),
            &self.job_description_text,
        );
        self.completed.set(step, valid);
        if valid {
            if let Some(next) = step.next() {
                self.active_step = next;
            }
        }
        valid
    }

    /// Validates every step in order and parks the form on the first incomplete one.
    pub fn validate_all(&mut self) {
        for step in IntakeStep::ALL {
            self.validate_step(step);
        }
        self.active_step = self
            .incomplete_steps()
            .first()
            .copied()
            .unwrap_or(IntakeStep::Assessment);
    }

    pub fn progress(&self) -> f64 {
        self.completed.completed_count() as f64 / IntakeStep::ALL.len() as f64 * 100.0
    }

    pub fn is_complete(&self) -> bool {
        IntakeStep::ALL.iter().all(|s| self.completed.get(*s))
    }

    pub fn incomplete_steps(&self) -> Vec<IntakeStep> {
        IntakeStep::ALL
            .into_iter()
            .filter(|s| !self.completed.get(*s))
            .collect()
    }

    pub fn snapshot(&self) -> IntakeProgress {
        IntakeProgress {
            active_step: self.active_step,
            completed: self.completed,
            progress: self.progress(),
            is_complete: self.is_complete(),
            incomplete_steps: self.incomplete_steps(),
        }
    }

    /// Consumes a complete form, producing the typed profile and the documents
    /// for the model. Incomplete forms are rejected before any field is parsed.
    pub fn into_submission(self) -> Result<(ProfileSubmission, AnalysisDocuments), IntakeError> {
        if !self.is_complete() {
            return Err(IntakeError::Incomplete(
                self.incomplete_steps()
                    .into_iter()
                    .map(|s| s.as_str().to_string())
                    .collect(),
            ));
        }

        let academic = &self.fields.academic_details;
        let assessment = &self.fields.self_assessment;

        let submission = ProfileSubmission {
            cgpa: parse_bounded("cgpa", &academic.cgpa, 0.0, 10.0)?,
            tenth_percentage: parse_bounded("tenth_percentage", &academic.tenth_percentage, 0.0, 100.0)?,
            twelfth_percentage: parse_bounded(
                "twelfth_percentage",
                &academic.twelfth_percentage,
                0.0,
                100.0,
            )?,
            backlogs: parse_count("backlogs", &academic.backlogs, i32::MAX)?,
            branch: academic.branch.trim().to_string(),
            codolio_profile: self.fields.codolio_profile.trim().to_string(),
            technical_skills_rating: parse_count("technical_skills", &assessment.technical_skills, 10)?,
            personal_reflection: Some(assessment.personal_reflection.trim())
                .filter(|r| !r.is_empty())
                .map(String::from),
        };

        let resume = self.resume.ok_or_else(|| IntakeError::Incomplete(vec!["resume".to_string()]))?;
        let company_requirements = match self.company_requirements {
            Some(doc) => CompanyRequirements::Document(doc),
            None if !self.job_description_text.trim().is_empty() => {
                CompanyRequirements::Text(self.job_description_text.trim().to_string())
            }
            None => return Err(IntakeError::Incomplete(vec!["company".to_string()])),
        };

        Ok((
            submission,
            AnalysisDocuments {
                resume,
                company_requirements,
            },
        ))
    }
}

/// Completion rule for a single step. Presence checks only; values are typed
/// in `into_submission`.
pub fn step_is_valid(
    step: IntakeStep,
    fields: &ProfileForm,
    has_resume: bool,
    has_company_document: bool,
    job_description_text: &str,
) -> bool {
    let filled = |s: &str| !s.trim().is_empty();
    match step {
        IntakeStep::Academic => {
            let a = &fields.academic_details;
            filled(&a.cgpa)
                && filled(&a.tenth_percentage)
                && filled(&a.twelfth_percentage)
                && filled(&a.branch)
        }
        IntakeStep::Codolio => filled(&fields.codolio_profile),
        IntakeStep::Resume => has_resume,
        IntakeStep::Company => has_company_document || filled(job_description_text),
        // Self-assessment is optional.
        IntakeStep::Assessment => true,
    }
}

fn parse_bounded(field: &'static str, raw: &str, min: f64, max: f64) -> Result<f64, IntakeError> {
    let value: f64 = raw.trim().parse().map_err(|_| IntakeError::InvalidField {
        field,
        reason: format!("'{}' is not a number", raw.trim()),
    })?;
    if !value.is_finite() || value < min || value > max {
        return Err(IntakeError::InvalidField {
            field,
            reason: format!("must be between {min} and {max}"),
        });
    }
    Ok(value)
}

/// Blank counts as zero, matching the form's defaults.
fn parse_count(field: &'static str, raw: &str, max: i32) -> Result<i32, IntakeError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(0);
    }
    let value: i32 = raw.parse().map_err(|_| IntakeError::InvalidField {
        field,
        reason: format!("'{raw}' is not a whole number"),
    })?;
    if value < 0 || value > max {
        return Err(IntakeError::InvalidField {
            field,
            reason: format!("must be between 0 and {max}"),
        });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use chrono::Utc;
    use uuid::Uuid;

    fn pdf(name: &str) -> UploadedDocument {
        UploadedDocument {
            file_name: name.to_string(),
            content_type: "application/pdf".to_string(),
            bytes: Bytes::from_static(b"%PDF-1.4\n%fake"),
        }
    }

    fn filled_form() -> IntakeForm {
        let mut form = IntakeForm::new();
        form.fields.academic_details.cgpa = "8.2".to_string();
        form.fields.academic_details.tenth_percentage = "91".to_string();
        form.fields.academic_details.twelfth_percentage = "87.5".to_string();
        form.fields.academic_details.branch = "Information Technology".to_string();
        form.fields.codolio_profile = "https://codolio.com/profile/asha".to_string();
        form
    }

    #[test]
    fn test_new_form_starts_on_academic_with_no_progress() {
        let form = IntakeForm::new();
        assert_eq!(form.active_step, IntakeStep::Academic);
        assert_eq!(form.progress(), 0.0);
        assert!(!form.is_complete());
    }

    #[test]
    fn test_valid_step_advances_to_next() {
        let mut form = filled_form();
        assert!(form.validate_step(IntakeStep::Academic));
        assert_eq!(form.active_step, IntakeStep::Codolio);
        assert!(form.validate_step(IntakeStep::Codolio));
        assert_eq!(form.active_step, IntakeStep::Resume);
    }

    #[test]
    fn test_invalid_step_stays_put_and_clears_completion() {
        let mut form = filled_form();
        form.validate_step(IntakeStep::Academic);
        form.fields.academic_details.branch = "   ".to_string();
        form.active_step = IntakeStep::Academic;
        assert!(!form.validate_step(IntakeStep::Academic));
        assert_eq!(form.active_step, IntakeStep::Academic);
        assert!(!form.completed.academic);
    }

    #[test]
    fn test_assessment_is_optional() {
        let mut form = IntakeForm::new();
        assert!(form.validate_step(IntakeStep::Assessment));
        // Last step: nothing to advance to.
        assert_eq!(form.active_step, IntakeStep::Academic);
        assert_eq!(form.progress(), 20.0);
    }

    #[test]
    fn test_non_pdf_upload_rejected() {
        let mut form = IntakeForm::new();
        let doc = UploadedDocument {
            file_name: "resume.docx".to_string(),
            content_type: "application/vnd.openxmlformats-officedocument.wordprocessingml.document".to_string(),
            bytes: Bytes::from_static(b"PK\x03\x04"),
        };
        assert!(matches!(form.attach_resume(doc), Err(IntakeError::NotPdf)));
        assert!(!form.completed.resume);
    }

    #[test]
    fn test_company_pdf_clears_text_and_text_clears_pdf() {
        let mut form = IntakeForm::new();
        form.set_job_description_text("SDE-1 at Acme, CGPA >= 7");
        form.attach_company_requirements(pdf("jd.pdf")).unwrap();
        assert!(form.job_description_text.is_empty());
        assert!(form.company_requirements.is_some());

        form.set_job_description_text("Backend intern, Rust");
        assert!(form.company_requirements.is_none());
        assert!(form.validate_step(IntakeStep::Company));
    }

    #[test]
    fn test_blank_text_keeps_attached_pdf() {
        let mut form = IntakeForm::new();
        form.attach_company_requirements(pdf("jd.pdf")).unwrap();
        form.set_job_description_text("   ");
        assert!(form.company_requirements.is_some());
    }

    #[test]
    fn test_validate_all_parks_on_first_incomplete_step() {
        let mut form = filled_form();
        form.set_job_description_text("Graduate engineer trainee");
        form.validate_all();
        assert_eq!(form.active_step, IntakeStep::Resume);
        assert_eq!(form.incomplete_steps(), vec![IntakeStep::Resume]);
        assert_eq!(form.progress(), 80.0);
    }

    #[test]
    fn test_incomplete_form_cannot_be_submitted() {
        let mut form = filled_form();
        form.validate_all();
        let err = form.into_submission().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Complete all required steps before submitting: resume, company"
        );
    }

    #[test]
    fn test_complete_form_produces_typed_submission() {
        let mut form = filled_form();
        form.fields.self_assessment.technical_skills = "7".to_string();
        form.attach_resume(pdf("resume.pdf")).unwrap();
        form.set_job_description_text("  Needs DSA and SQL  ");
        form.validate_all();
        assert!(form.is_complete());
        assert_eq!(form.progress(), 100.0);

        let (submission, docs) = form.into_submission().unwrap();
        assert_eq!(submission.cgpa, 8.2);
        assert_eq!(submission.backlogs, 0);
        assert_eq!(submission.technical_skills_rating, 7);
        assert_eq!(submission.personal_reflection, None);
        assert!(matches!(
            docs.company_requirements,
            CompanyRequirements::Text(ref t) if t == "Needs DSA and SQL"
        ));
    }

    #[test]
    fn test_out_of_range_values_rejected() {
        let mut form = filled_form();
        form.fields.academic_details.cgpa = "11".to_string();
        form.attach_resume(pdf("resume.pdf")).unwrap();
        form.attach_company_requirements(pdf("jd.pdf")).unwrap();
        form.validate_all();
        let err = form.into_submission().unwrap_err();
        assert!(matches!(err, IntakeError::InvalidField { field: "cgpa", .. }));
    }

    #[test]
    fn test_negative_backlogs_rejected() {
        assert!(parse_count("backlogs", "-1", i32::MAX).is_err());
        assert_eq!(parse_count("backlogs", "", i32::MAX).unwrap(), 0);
        assert!(parse_count("technical_skills", "11", 10).is_err());
        assert!(parse_count("technical_skills", "7.5", 10).is_err());
    }

    #[test]
    fn test_prefilled_form_marks_stored_steps_complete() {
        let now = Utc::now();
        let row = ProfileRow {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            cgpa: 7.9,
            tenth_percentage: 85.0,
            twelfth_percentage: 80.0,
            backlogs: 1,
            branch: "ECE".to_string(),
            codolio_profile: Some(String::new()),
            technical_skills_rating: None,
            personal_reflection: None,
            created_at: now,
            updated_at: now,
        };
        let form = IntakeForm::prefilled(&row);
        assert!(form.completed.academic);
        assert!(!form.completed.codolio);
        assert!(!form.completed.resume);
        assert!(!form.completed.company);
        assert!(form.completed.assessment);
        assert_eq!(form.progress(), 40.0);
    }

    #[test]
    fn test_step_order() {
        assert_eq!(IntakeStep::Academic.next(), Some(IntakeStep::Codolio));
        assert_eq!(IntakeStep::Company.next(), Some(IntakeStep::Assessment));
        assert_eq!(IntakeStep::Assessment.next(), None);
    }
}
