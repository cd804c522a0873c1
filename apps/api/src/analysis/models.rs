//! The readiness report as the model returns it.
//!
//! Field names are camelCase on the wire (the prompt's schema). Every field is
//! lenient: missing values take defaults, numbers sent as strings and strings
//! sent as numbers are accepted.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    #[serde(default, deserialize_with = "lenient_number")]
    pub overall_score: f64,
    #[serde(default)]
    pub companies: Vec<CompanyAnalysis>,
    #[serde(default)]
    pub action_plan: Vec<ActionItem>,
}

impl AnalysisReport {
    /// The readiness score as stored: rounded and clamped to 0..=100.
    pub fn score(&self) -> i32 {
        self.overall_score.round().clamp(0.0, 100.0) as i32
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyAnalysis {
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub match_percentage: f64,
    #[serde(default, deserialize_with = "lenient_text")]
    pub description: String,
    #[serde(default)]
    pub eligibility_criteria: Vec<EligibilityCriterion>,
    #[serde(default)]
    pub skill_gaps: Vec<SkillGap>,
    #[serde(default)]
    pub recommendations: Vec<Recommendation>,
    #[serde(default)]
    pub strength_areas: Vec<String>,
    #[serde(default)]
    pub improvement_areas: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EligibilityCriterion {
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub student_value: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub required_value: String,
    #[serde(default)]
    pub is_met: bool,
}

/// Levels are on a 1-10 scale.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillGap {
    #[serde(default, deserialize_with = "lenient_text")]
    pub skill: String,
    #[serde(default, deserialize_with = "lenient_number")]
    pub student_level: f64,
    #[serde(default, deserialize_with = "lenient_number")]
    pub required_level: f64,
    #[serde(default, deserialize_with = "lenient_number")]
    pub gap: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "Option<String>")]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl From<Option<String>> for Priority {
    fn from(raw: Option<String>) -> Self {
        match raw.unwrap_or_default().trim().to_ascii_lowercase().as_str() {
            "high" => Priority::High,
            "low" => Priority::Low,
            _ => Priority::Medium,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    #[serde(default, deserialize_with = "lenient_text")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub description: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub resources: Vec<RecommendationResource>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecommendationResource {
    #[serde(default, deserialize_with = "lenient_text")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub link: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionItem {
    #[serde(default, deserialize_with = "lenient_text")]
    pub action: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub timeline: String,
    #[serde(default)]
    pub resources: Vec<ActionResource>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionResource {
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub url: String,
}

fn lenient_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64().unwrap_or_default(),
        Value::String(s) => s
            .trim()
            .trim_end_matches('%')
            .trim()
            .parse()
            .unwrap_or_default(),
        _ => 0.0,
    })
}

fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Null => String::new(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_report_deserializes() {
        let json = r#"{
            "overallScore": 74,
            "companies": [{
                "name": "Acme Systems",
                "matchPercentage": 81,
                "description": "Cloud infrastructure vendor",
                "eligibilityCriteria": [
                    {"name": "CGPA", "studentValue": 8.1, "requiredValue": "7.0", "isMet": true}
                ],
                "skillGaps": [
                    {"skill": "System Design", "studentLevel": 4, "requiredLevel": 7, "gap": 3}
                ],
                "recommendations": [{
                    "title": "Practice design interviews",
                    "description": "Two mock sessions per week",
                    "priority": "HIGH",
                    "resources": [{"title": "Primer", "link": "github.com/donnemartin/system-design-primer"}]
                }],
                "strengthAreas": ["DSA"],
                "improvementAreas": ["Design"]
            }],
            "actionPlan": [
                {"action": "Revise SQL joins", "timeline": "2 weeks",
                 "resources": [{"name": "SQLBolt", "url": "https://sqlbolt.com"}]}
            ]
        }"#;

        let report: AnalysisReport = serde_json::from_str(json).unwrap();
        assert_eq!(report.score(), 74);
        let company = &report.companies[0];
        assert_eq!(company.eligibility_criteria[0].student_value, "8.1");
        assert_eq!(company.skill_gaps[0].gap, 3.0);
        assert_eq!(company.recommendations[0].priority, Priority::High);
        assert_eq!(report.action_plan[0].resources[0].name, "SQLBolt");
    }

    #[test]
    fn test_sparse_report_uses_defaults() {
        let report: AnalysisReport = serde_json::from_str(r#"{"companies": [{}]}"#).unwrap();
        assert_eq!(report.overall_score, 0.0);
        assert_eq!(report.companies[0].name, "");
        assert!(report.action_plan.is_empty());
    }

    #[test]
    fn test_numbers_as_strings_are_accepted() {
        let report: AnalysisReport =
            serde_json::from_str(r#"{"overallScore": "68.6", "companies": [{"matchPercentage": "72%"}]}"#)
                .unwrap();
        assert_eq!(report.score(), 69);
        assert_eq!(report.companies[0].match_percentage, 72.0);
    }

    #[test]
    fn test_score_is_clamped() {
        let high = AnalysisReport {
            overall_score: 140.0,
            ..Default::default()
        };
        let low = AnalysisReport {
            overall_score: -3.0,
            ..Default::default()
        };
        assert_eq!(high.score(), 100);
        assert_eq!(low.score(), 0);
    }

    #[test]
    fn test_unknown_priority_is_medium() {
        let rec: Recommendation = serde_json::from_str(r#"{"priority": "urgent"}"#).unwrap();
        assert_eq!(rec.priority, Priority::Medium);
        let rec: Recommendation = serde_json::from_str(r#"{"priority": null}"#).unwrap();
        assert_eq!(rec.priority, Priority::Medium);
    }

    #[test]
    fn test_report_serializes_back_to_camel_case() {
        let value = serde_json::to_value(AnalysisReport {
            overall_score: 50.0,
            ..Default::default()
        })
        .unwrap();
        assert!(value.get("overallScore").is_some());
        assert!(value.get("actionPlan").is_some());
    }
}
