//! Builds an `IntakeForm` from a `multipart/form-data` submission.
//!
//! Fields are applied in arrival order, so when a client sends both a
//! requirements PDF and pasted text, whichever arrives last wins.

use axum::extract::Multipart;
use tracing::debug;

use crate::profile::intake::{IntakeError, IntakeForm};
use crate::profile::models::UploadedDocument;

pub async fn intake_from_multipart(
    mut multipart: Multipart,
    mut form: IntakeForm,
) -> Result<IntakeForm, IntakeError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| IntakeError::Multipart(e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(String::from);
        let content_type = field.content_type().unwrap_or_default().to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| IntakeError::Multipart(e.to_string()))?;

        if let Some(file_name) = file_name {
            // Browsers send an empty part for an untouched file input.
            if data.is_empty() {
                continue;
            }
            let doc = UploadedDocument {
                file_name,
                content_type,
                bytes: data,
            };
            match name.as_str() {
                "resume" => form.attach_resume(doc)?,
                "company_requirements" => form.attach_company_requirements(doc)?,
                other => debug!("Ignoring unexpected file field '{other}'"),
            }
            continue;
        }

        let value = String::from_utf8(data.to_vec())
            .map_err(|_| IntakeError::Multipart(format!("field '{name}' is not valid UTF-8")))?;
        apply_text_field(&mut form, &name, value);
    }

    Ok(form)
}

fn apply_text_field(form: &mut IntakeForm, name: &str, value: String) {
    let fields = &mut form.fields;
    match name {
        "cgpa" => fields.academic_details.cgpa = value,
        "tenth_percentage" => fields.academic_details.tenth_percentage = value,
        "twelfth_percentage" => fields.academic_details.twelfth_percentage = value,
        "backlogs" => fields.academic_details.backlogs = value,
        "branch" => fields.academic_details.branch = value,
        "codolio_profile" => fields.codolio_profile = value,
        "technical_skills" => fields.self_assessment.technical_skills = value,
        "personal_reflection" => fields.self_assessment.personal_reflection = value,
        "job_description_text" => form.set_job_description_text(value),
        other => debug!("Ignoring unexpected form field '{other}'"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_fields_land_in_form() {
        let mut form = IntakeForm::new();
        apply_text_field(&mut form, "cgpa", "9.1".to_string());
        apply_text_field(&mut form, "backlogs", "2".to_string());
        apply_text_field(&mut form, "codolio_profile", "https://codolio.com/x".to_string());
        apply_text_field(&mut form, "technical_skills", "8".to_string());
        apply_text_field(&mut form, "unknown", "ignored".to_string());

        assert_eq!(form.fields.academic_details.cgpa, "9.1");
        assert_eq!(form.fields.academic_details.backlogs, "2");
        assert_eq!(form.fields.codolio_profile, "https://codolio.com/x");
        assert_eq!(form.fields.self_assessment.technical_skills, "8");
    }

    #[test]
    fn test_job_description_text_goes_through_setter() {
        let mut form = IntakeForm::new();
        apply_text_field(&mut form, "job_description_text", "Java, Spring".to_string());
        assert_eq!(form.job_description_text, "Java, Spring");
    }
}
