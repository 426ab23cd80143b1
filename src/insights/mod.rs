//! Rule-based insight generation.
//!
//! Each rule group looks at one area of [`DeveloperMetrics`] and fires at most
//! one insight. Results are ordered by priority, keeping rule order within
//! a priority.

pub mod types;

pub use types::*;

use crate::comparison::CompetitiveInsight;
use crate::config::InsightThresholds;
use crate::metrics::{DeveloperMetrics, SkillTrend};

/// Extra signals beyond the raw metrics.
#[derive(Debug, Clone, Copy, Default)]
pub struct InsightContext<'a> {
    pub trends: &'a [SkillTrend],
    pub competitive: Option<&'a CompetitiveInsight>,
}

#[allow(clippy::too_many_arguments)]
fn insight(
    id: &'static str,
    category: InsightCategory,
    priority: Priority,
    title: &str,
    description: String,
    action_items: &[&str],
    estimated_impact: Impact,
    timeframe: &str,
) -> Insight {
    Insight {
        id,
        category,
        priority,
        title: title.to_string(),
        description,
        action_items: action_items.iter().map(|s| s.to_string()).collect(),
        estimated_impact,
        timeframe: timeframe.to_string(),
    }
}

fn activity_rule(m: &DeveloperMetrics, t: &InsightThresholds) -> Option<Insight> {
    if m.commit_frequency < t.low_commit_frequency {
        Some(insight(
            "increase-commit-frequency",
            InsightCategory::Opportunity,
            Priority::High,
            "Increase Commit Frequency",
            format!(
                "You average {:.1} commits per week. Regular, smaller commits make work easier to review and track.",
                m.commit_frequency
            ),
            &[
                "Break work into smaller, focused commits",
                "Commit at the end of each working session",
                "Set a weekly target for meaningful commits",
            ],
            Impact::High,
            "2-4 weeks",
        ))
    } else if m.commit_frequency > t.high_commit_frequency {
        Some(insight(
            "excellent-activity",
            InsightCategory::Strength,
            Priority::Medium,
            "Excellent Activity Level",
            format!(
                "At {:.1} commits per week you are one of the most active contributors.",
                m.commit_frequency
            ),
            &[
                "Share your workflow with teammates",
                "Keep commit quality high as volume grows",
            ],
            Impact::Medium,
            "Ongoing",
        ))
    } else {
        None
    }
}

fn code_quality_rule(m: &DeveloperMetrics, t: &InsightThresholds) -> Option<Insight> {
    (m.code_quality_score < t.low_code_quality).then(|| {
        insight(
            "improve-code-quality",
            InsightCategory::Warning,
            Priority::High,
            "Improve Code Quality",
            format!(
                "Your code quality score is {:.0}, below the {:.0} target.",
                m.code_quality_score, t.low_code_quality
            ),
            &[
                "Add automated linting and formatting",
                "Write tests for new and changed code",
                "Ask for thorough reviews on complex changes",
            ],
            Impact::High,
            "1-3 months",
        )
    })
}

fn collaboration_rule(m: &DeveloperMetrics, t: &InsightThresholds) -> Option<Insight> {
    (m.collaboration_score < t.low_collaboration).then(|| {
        insight(
            "enhance-collaboration",
            InsightCategory::Opportunity,
            Priority::Medium,
            "Enhance Collaboration",
            format!(
                "Your collaboration score is {:.0}. Reviews and discussions spread knowledge across the team.",
                m.collaboration_score
            ),
            &[
                "Review at least two pull requests per week",
                "Join discussions on issues and design proposals",
                "Pair with a teammate on a feature",
            ],
            Impact::Medium,
            "1-2 months",
        )
    })
}

fn growth_rule(m: &DeveloperMetrics, t: &InsightThresholds) -> Option<Insight> {
    if m.skill_diversity < t.narrow_skill_diversity {
        Some(insight(
            "diversify-skills",
            InsightCategory::Suggestion,
            Priority::Medium,
            "Diversify Your Skills",
            format!(
                "You work in {} language(s). A broader toolset opens up more kinds of projects.",
                m.skill_diversity
            ),
            &[
                "Pick a language from a different paradigm",
                "Build a small side project with it",
                "Contribute to a project outside your usual stack",
            ],
            Impact::Medium,
            "3-6 months",
        ))
    } else if m.skill_diversity > t.broad_skill_diversity {
        Some(insight(
            "polyglot-skills",
            InsightCategory::Strength,
            Priority::Low,
            "Impressive Polyglot Skills",
            format!("You work across {} languages.", m.skill_diversity),
            &[
                "Mentor others in languages you know well",
                "Deepen expertise in your primary stack",
            ],
            Impact::Low,
            "Ongoing",
        ))
    } else {
        None
    }
}

fn impact_rule(m: &DeveloperMetrics, t: &InsightThresholds) -> Option<Insight> {
    if m.repo_stars < t.low_repo_stars {
        Some(insight(
            "build-open-source-presence",
            InsightCategory::Suggestion,
            Priority::Low,
            "Build Open Source Presence",
            format!(
                "Your repositories have {} stars. Public, well-documented projects attract users and contributors.",
                m.repo_stars
            ),
            &[
                "Publish a useful utility as open source",
                "Write a clear README with examples",
                "Contribute fixes to libraries you depend on",
            ],
            Impact::Medium,
            "3-6 months",
        ))
    } else if m.repo_stars > t.high_repo_stars {
        Some(insight(
            "strong-open-source-impact",
            InsightCategory::Strength,
            Priority::Low,
            "Strong Open Source Impact",
            format!("Your repositories have earned {} stars.", m.repo_stars),
            &[
                "Document contribution guidelines",
                "Invite contributors to help maintain your projects",
            ],
            Impact::Low,
            "Ongoing",
        ))
    } else {
        None
    }
}

fn skill_growth_rule(trends: &[SkillTrend], t: &InsightThresholds) -> Option<Insight> {
    let rapid: Vec<&str> = trends
        .iter()
        .filter(|tr| tr.proficiency_growth >= t.rapid_growth)
        .map(|tr| tr.skill.as_str())
        .collect();
    if rapid.is_empty() {
        return None;
    }
    let skills = rapid.join(", ");
    let mut found = insight(
        "rapid-skill-growth",
        InsightCategory::Strength,
        Priority::Medium,
        "Rapid Skill Growth",
        format!("Your usage of {skills} has grown quickly."),
        &["Share what you learned in a write-up"],
        Impact::Medium,
        "Ongoing",
    );
    found
        .action_items
        .insert(0, format!("Apply {skills} in a production project"));
    Some(found)
}

fn competitive_rule(competitive: &CompetitiveInsight) -> Option<Insight> {
    if competitive.underperforming_areas.is_empty() {
        return None;
    }
    let areas: Vec<&str> = competitive
        .underperforming_areas
        .iter()
        .map(|k| k.label())
        .collect();
    Some(Insight {
        id: "close-competitive-gaps",
        category: InsightCategory::Opportunity,
        priority: Priority::Medium,
        title: "Close Competitive Gaps".to_string(),
        description: format!("You trail your peers in {}.", areas.join(", ")),
        action_items: competitive.actionable_insights.clone(),
        estimated_impact: Impact::High,
        timeframe: "1-3 months".to_string(),
    })
}

fn sort_by_priority(mut insights: Vec<Insight>) -> Vec<Insight> {
    // Stable: rule order is kept within a priority.
    insights.sort_by_key(|i| i.priority);
    insights
}

/// Insights from metric thresholds alone, highest priority first.
pub fn generate_insights(metrics: &DeveloperMetrics, thresholds: &InsightThresholds) -> Vec<Insight> {
    let insights: Vec<Insight> = [
        activity_rule(metrics, thresholds),
        code_quality_rule(metrics, thresholds),
        collaboration_rule(metrics, thresholds),
        growth_rule(metrics, thresholds),
        impact_rule(metrics, thresholds),
    ]
    .into_iter()
    .flatten()
    .collect();

    log::debug!("Generated {} insights", insights.len());
    sort_by_priority(insights)
}

/// Metric insights plus rules driven by skill trends and peer comparison.
pub fn generate_insights_with_context(
    metrics: &DeveloperMetrics,
    context: &InsightContext<'_>,
    thresholds: &InsightThresholds,
) -> Vec<Insight> {
    let mut insights = generate_insights(metrics, thresholds);
    insights.extend(skill_growth_rule(context.trends, thresholds));
    insights.extend(context.competitive.and_then(competitive_rule));
    sort_by_priority(insights)
}
