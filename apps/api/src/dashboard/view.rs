//! Dashboard views: tab-shaped derivations over a stored report.
//!
//! Nothing here scores the student; every number comes from the model's report
//! or the stored profile. These functions only filter, count, sort and label.

use serde::{Deserialize, Serialize};

use crate::analysis::models::{
    ActionItem, ActionResource, AnalysisReport, CompanyAnalysis, SkillGap,
};
use crate::models::profile::ProfileRow;
use crate::session::AuthUser;

const EXCELLENT_SCORE: f64 = 80.0;
const GOOD_SCORE: f64 = 60.0;
const CGPA_ELIGIBILITY: f64 = 7.5;
const COMPANY_MATCH_THRESHOLD: f64 = 70.0;
const DEFAULT_ROLE: &str = "Software Engineer";
const INTERVIEW_EXPERIENCES_BASE: &str = "https://www.geeksforgeeks.org/companies";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DashboardTab {
    Score,
    Skills,
    Companies,
    ActionPlan,
}

impl DashboardTab {
    pub const ALL: [DashboardTab; 4] = [
        DashboardTab::Score,
        DashboardTab::Skills,
        DashboardTab::Companies,
        DashboardTab::ActionPlan,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DashboardTab::Score => "score",
            DashboardTab::Skills => "skills",
            DashboardTab::Companies => "companies",
            DashboardTab::ActionPlan => "action_plan",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tab| tab.as_str() == raw.trim())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBand {
    Excellent,
    Good,
    NeedsImprovement,
}

impl ScoreBand {
    pub fn from_score(score: f64) -> Self {
        if score >= EXCELLENT_SCORE {
            ScoreBand::Excellent
        } else if score >= GOOD_SCORE {
            ScoreBand::Good
        } else {
            ScoreBand::NeedsImprovement
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ScoreBand::Excellent => "Excellent",
            ScoreBand::Good => "Good",
            ScoreBand::NeedsImprovement => "Needs Improvement",
        }
    }
}

/// Company match strength, same cut-offs as the score band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchBand {
    High,
    Medium,
    Low,
}

impl MatchBand {
    pub fn from_percentage(pct: f64) -> Self {
        if pct >= EXCELLENT_SCORE {
            MatchBand::High
        } else if pct >= GOOD_SCORE {
            MatchBand::Medium
        } else {
            MatchBand::Low
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentSummary {
    pub name: String,
    pub cgpa: f64,
    pub branch: String,
    pub backlogs: i32,
    pub tenth_percentage: f64,
    pub twelfth_percentage: f64,
    pub codolio_profile: Option<String>,
}

impl StudentSummary {
    pub fn new(user: &AuthUser, profile: &ProfileRow) -> Self {
        StudentSummary {
            name: user
                .full_name
                .clone()
                .filter(|n| !n.trim().is_empty())
                .unwrap_or_else(|| "Student".to_string()),
            cgpa: profile.cgpa,
            branch: profile.branch.clone(),
            backlogs: profile.backlogs,
            tenth_percentage: profile.tenth_percentage,
            twelfth_percentage: profile.twelfth_percentage,
            codolio_profile: profile
                .codolio_profile
                .clone()
                .filter(|c| !c.trim().is_empty()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreTab {
    pub overall_score: i32,
    pub band: ScoreBand,
    pub band_label: &'static str,
    pub academically_eligible: bool,
    pub skills_total: usize,
    pub skills_needing_improvement: usize,
    /// Share of skills below the required level, 0-100.
    pub skills_needing_improvement_pct: f64,
    pub companies_total: usize,
    pub companies_matched: usize,
    /// Share of companies at or above the match threshold, 0-100.
    pub companies_matched_pct: f64,
    pub student: StudentSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkillView {
    pub skill: String,
    pub student_level: f64,
    pub required_level: f64,
    /// `required_level - student_level`; negative when the student exceeds it.
    pub gap: f64,
    pub meets_requirement: bool,
}

impl From<&SkillGap> for SkillView {
    fn from(g: &SkillGap) -> Self {
        SkillView {
            skill: g.skill.clone(),
            student_level: g.student_level,
            required_level: g.required_level,
            gap: g.required_level - g.student_level,
            meets_requirement: g.student_level >= g.required_level,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkillsTab {
    pub skills: Vec<SkillView>,
    pub improvement_suggestions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompanyMatch {
    pub name: String,
    pub role: String,
    pub match_percentage: f64,
    pub match_band: MatchBand,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompaniesTab {
    /// Best match first.
    pub companies: Vec<CompanyMatch>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompanyDetail {
    pub company: CompanyAnalysis,
    pub match_band: MatchBand,
    pub skills: Vec<SkillView>,
    pub student: StudentSummary,
    /// Community interview write-ups for this company.
    pub interview_experiences_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionPlanTab {
    pub items: Vec<ActionItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub score: ScoreTab,
    pub skills: SkillsTab,
    pub companies: CompaniesTab,
    pub action_plan: ActionPlanTab,
}

/// A single tab, for `?tab=` requests.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TabView {
    Score(ScoreTab),
    Skills(SkillsTab),
    Companies(CompaniesTab),
    ActionPlan(ActionPlanTab),
}

impl Dashboard {
    pub fn build(report: &AnalysisReport, student: &StudentSummary) -> Self {
        let skills = dashboard_skills(report);
        Dashboard {
            score: score_tab(report, &skills, student),
            skills: skills_tab(skills),
            companies: companies_tab(report),
            action_plan: action_plan_tab(report),
        }
    }

    pub fn into_tab(self, tab: DashboardTab) -> TabView {
        match tab {
            DashboardTab::Score => TabView::Score(self.score),
            DashboardTab::Skills => TabView::Skills(self.skills),
            DashboardTab::Companies => TabView::Companies(self.companies),
            DashboardTab::ActionPlan => TabView::ActionPlan(self.action_plan),
        }
    }
}

/// The dashboard's skill list is the first company's skill gaps.
fn dashboard_skills(report: &AnalysisReport) -> Vec<SkillView> {
    report
        .companies
        .first()
        .map(|c| c.skill_gaps.iter().map(SkillView::from).collect())
        .unwrap_or_default()
}

fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64 * 100.0
    }
}

fn score_tab(report: &AnalysisReport, skills: &[SkillView], student: &StudentSummary) -> ScoreTab {
    let overall_score = report.score();
    let band = ScoreBand::from_score(f64::from(overall_score));
    let skills_needing_improvement = skills.iter().filter(|s| !s.meets_requirement).count();
    let companies_matched = report
        .companies
        .iter()
        .filter(|c| c.match_percentage >= COMPANY_MATCH_THRESHOLD)
        .count();

    ScoreTab {
        overall_score,
        band,
        band_label: band.label(),
        academically_eligible: student.cgpa >= CGPA_ELIGIBILITY,
        skills_total: skills.len(),
        skills_needing_improvement,
        skills_needing_improvement_pct: percentage(skills_needing_improvement, skills.len()),
        companies_total: report.companies.len(),
        companies_matched,
        companies_matched_pct: percentage(companies_matched, report.companies.len()),
        student: student.clone(),
    }
}

fn skills_tab(skills: Vec<SkillView>) -> SkillsTab {
    let improvement_suggestions = skills
        .iter()
        .filter(|s| !s.meets_requirement)
        .map(|s| {
            format!(
                "Improve your {} skills by {} points to meet company requirements",
                s.skill, s.gap
            )
        })
        .collect();
    SkillsTab {
        skills,
        improvement_suggestions,
    }
}

fn companies_tab(report: &AnalysisReport) -> CompaniesTab {
    let mut companies: Vec<CompanyMatch> = report
        .companies
        .iter()
        .map(|c| CompanyMatch {
            name: c.name.clone(),
            role: c
                .role
                .clone()
                .filter(|r| !r.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_ROLE.to_string()),
            match_percentage: c.match_percentage,
            match_band: MatchBand::from_percentage(c.match_percentage),
            description: c.description.clone(),
        })
        .collect();
    // Stable: equal matches keep the model's order.
    companies.sort_by(|a, b| b.match_percentage.total_cmp(&a.match_percentage));
    CompaniesTab { companies }
}

fn action_plan_tab(report: &AnalysisReport) -> ActionPlanTab {
    let items = report
        .action_plan
        .iter()
        .map(|item| ActionItem {
            action: item.action.clone(),
            timeline: item.timeline.clone(),
            resources: item
                .resources
                .iter()
                .map(|r| ActionResource {
                    name: r.name.clone(),
                    url: normalize_url(&r.url),
                })
                .collect(),
        })
        .collect();
    ActionPlanTab { items }
}

/// Selects one company by exact name.
pub fn company_detail(
    report: &AnalysisReport,
    student: &StudentSummary,
    name: &str,
) -> Option<CompanyDetail> {
    let company = report.companies.iter().find(|c| c.name == name)?;
    let mut company = company.clone();
    for rec in &mut company.recommendations {
        for resource in &mut rec.resources {
            resource.link = normalize_url(&resource.link);
        }
    }
    Some(CompanyDetail {
        match_band: MatchBand::from_percentage(company.match_percentage),
        interview_experiences_url: interview_experiences_url(&company.name),
        company,
        skills: dashboard_skills(report),
        student: student.clone(),
    })
}

/// `Tata Consultancy` → `.../companies/tataconsultancy/articles/`.
pub fn interview_experiences_url(company_name: &str) -> String {
    let slug: String = company_name
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    format!("{INTERVIEW_EXPERIENCES_BASE}/{slug}/articles/")
}

/// Bare hosts like `leetcode.com/...` become `https://leetcode.com/...`.
pub fn normalize_url(url: &str) -> String {
    let url = url.trim();
    if url.is_empty() || url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!("https://{url}")
    }
}
