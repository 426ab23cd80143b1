use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::date_util::weeks_between;

/// The five groups a metric belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    Activity,
    Quality,
    Collaboration,
    Growth,
    Impact,
}

/// Closed set of metric names carried by [`DeveloperMetrics`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MetricKey {
    CommitFrequency,
    PrVelocity,
    IssueResolutionRate,
    CodeReviewParticipation,
    CodeQualityScore,
    TestCoverageAverage,
    DocumentationScore,
    BugRate,
    CollaborationScore,
    MentorshipActivity,
    CommunityEngagement,
    SkillDiversity,
    LearningVelocity,
    ProjectComplexity,
    RepoStars,
    Forks,
    Dependents,
    Downloads,
}

impl MetricKey {
    pub const ALL: [MetricKey; 18] = [
        MetricKey::CommitFrequency,
        MetricKey::PrVelocity,
        MetricKey::IssueResolutionRate,
        MetricKey::CodeReviewParticipation,
        MetricKey::CodeQualityScore,
        MetricKey::TestCoverageAverage,
        MetricKey::DocumentationScore,
        MetricKey::BugRate,
        MetricKey::CollaborationScore,
        MetricKey::MentorshipActivity,
        MetricKey::CommunityEngagement,
        MetricKey::SkillDiversity,
        MetricKey::LearningVelocity,
        MetricKey::ProjectComplexity,
        MetricKey::RepoStars,
        MetricKey::Forks,
        MetricKey::Dependents,
        MetricKey::Downloads,
    ];

    /// Wire name, matching the serialized field on [`DeveloperMetrics`].
    pub fn as_str(self) -> &'static str {
        match self {
            MetricKey::CommitFrequency => "commitFrequency",
            MetricKey::PrVelocity => "prVelocity",
            MetricKey::IssueResolutionRate => "issueResolutionRate",
            MetricKey::CodeReviewParticipation => "codeReviewParticipation",
            MetricKey::CodeQualityScore => "codeQualityScore",
            MetricKey::TestCoverageAverage => "testCoverageAverage",
            MetricKey::DocumentationScore => "documentationScore",
            MetricKey::BugRate => "bugRate",
            MetricKey::CollaborationScore => "collaborationScore",
            MetricKey::MentorshipActivity => "mentorshipActivity",
            MetricKey::CommunityEngagement => "communityEngagement",
            MetricKey::SkillDiversity => "skillDiversity",
            MetricKey::LearningVelocity => "learningVelocity",
            MetricKey::ProjectComplexity => "projectComplexity",
            MetricKey::RepoStars => "repoStars",
            MetricKey::Forks => "forks",
            MetricKey::Dependents => "dependents",
            MetricKey::Downloads => "downloads",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MetricKey::CommitFrequency => "Commit Frequency",
            MetricKey::PrVelocity => "PR Velocity",
            MetricKey::IssueResolutionRate => "Issue Resolution Rate",
            MetricKey::CodeReviewParticipation => "Code Review Participation",
            MetricKey::CodeQualityScore => "Code Quality Score",
            MetricKey::TestCoverageAverage => "Test Coverage",
            MetricKey::DocumentationScore => "Documentation Score",
            MetricKey::BugRate => "Bug Rate",
            MetricKey::CollaborationScore => "Collaboration Score",
            MetricKey::MentorshipActivity => "Mentorship Activity",
            MetricKey::CommunityEngagement => "Community Engagement",
            MetricKey::SkillDiversity => "Skill Diversity",
            MetricKey::LearningVelocity => "Learning Velocity",
            MetricKey::ProjectComplexity => "Project Complexity",
            MetricKey::RepoStars => "Repository Stars",
            MetricKey::Forks => "Forks",
            MetricKey::Dependents => "Dependents",
            MetricKey::Downloads => "Downloads",
        }
    }

    pub fn dimension(self) -> Dimension {
        match self {
            MetricKey::CommitFrequency
            | MetricKey::PrVelocity
            | MetricKey::IssueResolutionRate
            | MetricKey::CodeReviewParticipation => Dimension::Activity,
            MetricKey::CodeQualityScore
            | MetricKey::TestCoverageAverage
            | MetricKey::DocumentationScore
            | MetricKey::BugRate => Dimension::Quality,
            MetricKey::CollaborationScore
            | MetricKey::MentorshipActivity
            | MetricKey::CommunityEngagement => Dimension::Collaboration,
            MetricKey::SkillDiversity
            | MetricKey::LearningVelocity
            | MetricKey::ProjectComplexity => Dimension::Growth,
            MetricKey::RepoStars
            | MetricKey::Forks
            | MetricKey::Dependents
            | MetricKey::Downloads => Dimension::Impact,
        }
    }

    /// Bug rate is the only metric where a smaller value is better.
    pub fn higher_is_better(self) -> bool {
        !matches!(self, MetricKey::BugRate)
    }
}

impl fmt::Display for MetricKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized performance metrics for one developer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DeveloperMetrics {
    // Activity
    /// Commits per week.
    pub commit_frequency: f64,
    /// PRs per month, derived from the weekly rate.
    pub pr_velocity: f64,
    /// Resolved issues as a percentage of all issues.
    pub issue_resolution_rate: f64,
    /// Reviews per week.
    pub code_review_participation: f64,

    // Quality
    pub code_quality_score: f64,
    pub test_coverage_average: f64,
    pub documentation_score: f64,
    pub bug_rate: f64,

    // Collaboration
    pub collaboration_score: f64,
    pub mentorship_activity: f64,
    pub community_engagement: f64,

    // Growth
    /// Distinct languages/skills.
    pub skill_diversity: f64,
    pub learning_velocity: f64,
    pub project_complexity: f64,

    // Impact
    pub repo_stars: f64,
    pub forks: f64,
    pub dependents: f64,
    pub downloads: f64,
}

impl DeveloperMetrics {
    pub fn get(&self, key: MetricKey) -> f64 {
        match key {
            MetricKey::CommitFrequency => self.commit_frequency,
            MetricKey::PrVelocity => self.pr_velocity,
            MetricKey::IssueResolutionRate => self.issue_resolution_rate,
            MetricKey::CodeReviewParticipation => self.code_review_participation,
            MetricKey::CodeQualityScore => self.code_quality_score,
            MetricKey::TestCoverageAverage => self.test_coverage_average,
            MetricKey::DocumentationScore => self.documentation_score,
            MetricKey::BugRate => self.bug_rate,
            MetricKey::CollaborationScore => self.collaboration_score,
            MetricKey::MentorshipActivity => self.mentorship_activity,
            MetricKey::CommunityEngagement => self.community_engagement,
            MetricKey::SkillDiversity => self.skill_diversity,
            MetricKey::LearningVelocity => self.learning_velocity,
            MetricKey::ProjectComplexity => self.project_complexity,
            MetricKey::RepoStars => self.repo_stars,
            MetricKey::Forks => self.forks,
            MetricKey::Dependents => self.dependents,
            MetricKey::Downloads => self.downloads,
        }
    }

    /// All metrics in [`MetricKey::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = (MetricKey, f64)> + '_ {
        MetricKey::ALL.into_iter().map(move |k| (k, self.get(k)))
    }
}

/// Scores the calculator cannot derive from raw counters. Supplied upstream
/// when known; anything missing stays 0.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MetricEstimates {
    pub code_quality_score: f64,
    pub test_coverage_average: f64,
    pub documentation_score: f64,
    pub bug_rate: f64,
    pub collaboration_score: f64,
    pub mentorship_activity: f64,
    pub community_engagement: f64,
    pub learning_velocity: f64,
    pub project_complexity: f64,
    pub dependents: f64,
    pub downloads: f64,
}

/// Raw activity counters for one developer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ActivityInput {
    pub commits: u64,
    pub prs: u64,
    pub issues: u64,
    pub resolved_issues: u64,
    pub reviews: u64,
    pub received_reviews: u64,
    pub stars: u64,
    pub forks: u64,
    pub languages: Vec<String>,
    pub weeks_active: f64,
    pub estimates: MetricEstimates,
}

impl ActivityInput {
    /// Weeks between the first recorded activity and `as_of`.
    pub fn weeks_since(first_activity: NaiveDate, as_of: NaiveDate) -> f64 {
        weeks_between(first_activity, as_of)
    }
}

/// One usage observation of a skill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillTrendPoint {
    pub skill: String,
    pub category: String,
    /// 0..=100
    pub usage: f64,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillTrend {
    pub skill: String,
    pub category: String,
    /// Latest usage minus earliest usage.
    pub proficiency_growth: f64,
    pub current_usage: f64,
    pub data_points: usize,
}

/// Peer-relative standing for a single metric.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Benchmark {
    /// 0..=100
    pub percentile: f64,
    /// 1 = best.
    pub rank: usize,
}
