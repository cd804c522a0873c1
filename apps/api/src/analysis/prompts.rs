// Prompt constants for the readiness analysis call.

use crate::profile::models::ProfileSubmission;

/// Analysis prompt template.
/// Replace: {cgpa}, {branch}, {tenth_percentage}, {twelfth_percentage},
///          {backlogs}, {codolio_profile}, {technical_skills}, {personal_reflection}
pub const ANALYSIS_PROMPT_TEMPLATE: &str = r#"Analyze the following student profile against company requirements and provide a detailed analysis:

STUDENT PROFILE:
- CGPA: {cgpa}
- Branch: {branch}
- 10th Percentage: {tenth_percentage}%
- 12th Percentage: {twelfth_percentage}%
- Backlogs: {backlogs}
- Codolio Profile: {codolio_profile}
- Technical Skills Rating: {technical_skills}/10
- Personal Reflection: {personal_reflection}

Attached are the student's resume as a PDF and the company requirements, either as a second PDF or as text following this prompt.

1. Resume PDF: extract all relevant information including skills, projects, experience and education details.
2. Company requirements (PDF or text): extract company names, job requirements, eligibility criteria and required skills.

Analyze the resume against the company requirements and return a JSON object with this EXACT schema:
{
  "overallScore": 0,
  "companies": [
    {
      "name": "Company Name",
      "role": "Role title if stated",
      "matchPercentage": 0,
      "description": "Brief company description",
      "eligibilityCriteria": [
        {
          "name": "Criteria name",
          "studentValue": "Student's value",
          "requiredValue": "Required value",
          "isMet": true
        }
      ],
      "skillGaps": [
        {
          "skill": "Skill name",
          "studentLevel": 1,
          "requiredLevel": 1,
          "gap": 0
        }
      ],
      "recommendations": [
        {
          "title": "Recommendation title",
          "description": "Detailed description",
          "priority": "high",
          "resources": [
            {"title": "Resource title", "link": "Resource URL"}
          ]
        }
      ],
      "strengthAreas": ["Strength"],
      "improvementAreas": ["Improvement area"]
    }
  ],
  "actionPlan": [
    {
      "action": "Action description",
      "timeline": "Timeline estimate",
      "resources": [
        {"name": "Resource name", "url": "Resource URL"}
      ]
    }
  ]
}

RULES:
1. overallScore and matchPercentage are numbers from 0 to 100
2. studentLevel and requiredLevel are numbers from 1 to 10; gap = requiredLevel - studentLevel
3. priority is exactly one of "high", "medium", "low"
4. Take company names ONLY from the company requirements; never invent companies
5. Give realistic skill assessments and actionable recommendations
6. Return only the JSON object, with no additional text"#;

pub const COMPANY_TEXT_HEADER: &str = "COMPANY REQUIREMENTS TEXT:\n";

pub fn build_analysis_prompt(profile: &ProfileSubmission) -> String {
    let cgpa = profile.cgpa.to_string();
    let tenth = profile.tenth_percentage.to_string();
    let twelfth = profile.twelfth_percentage.to_string();
    let backlogs = profile.backlogs.to_string();
    let technical_skills = profile.technical_skills_rating.to_string();
    let reflection = profile
        .personal_reflection
        .as_deref()
        .unwrap_or("Not provided");

    interpolate(
        ANALYSIS_PROMPT_TEMPLATE,
        &[
            ("cgpa", cgpa.as_str()),
            ("branch", profile.branch.as_str()),
            ("tenth_percentage", tenth.as_str()),
            ("twelfth_percentage", twelfth.as_str()),
            ("backlogs", backlogs.as_str()),
            ("codolio_profile", profile.codolio_profile.as_str()),
            ("technical_skills", technical_skills.as_str()),
            ("personal_reflection", reflection),
        ],
    )
}

/// Single left-to-right pass: substituted values are never rescanned, and
/// braces that don't name a known placeholder (the JSON schema) pass through.
fn interpolate(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let hit = vars.iter().find_map(|(name, value)| {
            after
                .strip_prefix(*name)
                .and_then(|tail| tail.strip_prefix('}'))
                .map(|tail| (*value, tail))
        });
        match hit {
            Some((value, tail)) => {
                out.push_str(value);
                rest = tail;
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}
