use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::models::profile::ProfileRow;

const PDF_MIME: &str = "application/pdf";
const PDF_MAGIC: &[u8] = b"%PDF-";

/// Academic fields exactly as typed into the form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcademicDetails {
    #[serde(default)]
    pub cgpa: String,
    #[serde(default)]
    pub tenth_percentage: String,
    #[serde(default)]
    pub twelfth_percentage: String,
    #[serde(default = "default_backlogs")]
    pub backlogs: String,
    #[serde(default)]
    pub branch: String,
}

fn default_backlogs() -> String {
    "0".to_string()
}

impl Default for AcademicDetails {
    fn default() -> Self {
        Self {
            cgpa: String::new(),
            tenth_percentage: String::new(),
            twelfth_percentage: String::new(),
            backlogs: default_backlogs(),
            branch: String::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelfAssessment {
    /// 1-10 rating, as typed.
    #[serde(default)]
    pub technical_skills: String,
    #[serde(default)]
    pub personal_reflection: String,
}

/// The text portion of the intake form (files travel separately).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileForm {
    #[serde(default)]
    pub academic_details: AcademicDetails,
    #[serde(default)]
    pub codolio_profile: String,
    #[serde(default)]
    pub self_assessment: SelfAssessment,
}

impl From<&ProfileRow> for ProfileForm {
    fn from(row: &ProfileRow) -> Self {
        ProfileForm {
            academic_details: AcademicDetails {
                cgpa: row.cgpa.to_string(),
                tenth_percentage: row.tenth_percentage.to_string(),
                twelfth_percentage: row.twelfth_percentage.to_string(),
                backlogs: row.backlogs.to_string(),
                branch: row.branch.clone(),
            },
            codolio_profile: row.codolio_profile.clone().unwrap_or_default(),
            self_assessment: SelfAssessment {
                technical_skills: row
                    .technical_skills_rating
                    .map(|r| r.to_string())
                    .unwrap_or_default(),
                personal_reflection: row.personal_reflection.clone().unwrap_or_default(),
            },
        }
    }
}

/// A file received through the intake form.
#[derive(Debug, Clone)]
pub struct UploadedDocument {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

impl UploadedDocument {
    /// Declared as `application/pdf` and carries the PDF header.
    pub fn is_pdf(&self) -> bool {
        let essence = self
            .content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim();
        essence.eq_ignore_ascii_case(PDF_MIME) && self.bytes.starts_with(PDF_MAGIC)
    }

    pub fn mime_type(&self) -> &'static str {
        PDF_MIME
    }
}

/// The job description travels either as a PDF or as pasted text, never both.
#[derive(Debug, Clone)]
pub enum CompanyRequirements {
    Document(UploadedDocument),
    Text(String),
}

/// Documents sent to the model alongside the profile.
#[derive(Debug, Clone)]
pub struct AnalysisDocuments {
    pub resume: UploadedDocument,
    pub company_requirements: CompanyRequirements,
}

/// A complete, type-checked intake form ready for persistence and analysis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileSubmission {
    pub cgpa: f64,
    pub tenth_percentage: f64,
    pub twelfth_percentage: f64,
    pub backlogs: i32,
    pub branch: String,
    pub codolio_profile: String,
    pub technical_skills_rating: i32,
    pub personal_reflection: Option<String>,
}
