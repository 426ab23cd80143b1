pub mod types;

pub use types::*;

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::config::InsightThresholds;
use crate::stats::{self, Distribution};

/// Average weeks per month (365.25 / 12 / 7).
pub const WEEKS_PER_MONTH: f64 = 365.25 / 12.0 / 7.0;

/// Turn raw activity counters into normalized metrics.
///
/// Per-week rates are 0 when `weeks_active` is not positive. Fields that
/// cannot be derived from counters are copied from `input.estimates`.
pub fn calculate_developer_metrics(input: &ActivityInput) -> DeveloperMetrics {
    let weeks = input.weeks_active;
    if weeks <= 0.0 {
        log::warn!("weeks_active is {weeks}; per-week rates will be 0");
    }

    let skills: BTreeSet<&str> = input.languages.iter().map(String::as_str).collect();
    let est = &input.estimates;

    let metrics = DeveloperMetrics {
        commit_frequency: stats::safe_div(input.commits as f64, weeks),
        pr_velocity: stats::safe_div(input.prs as f64, weeks) * WEEKS_PER_MONTH,
        issue_resolution_rate: if input.issues > 0 {
            input.resolved_issues as f64 / input.issues as f64 * 100.0
        } else {
            0.0
        },
        code_review_participation: stats::safe_div(input.reviews as f64, weeks),

        code_quality_score: est.code_quality_score,
        test_coverage_average: est.test_coverage_average,
        documentation_score: est.documentation_score,
        bug_rate: est.bug_rate,

        collaboration_score: est.collaboration_score,
        mentorship_activity: est.mentorship_activity,
        community_engagement: est.community_engagement,

        skill_diversity: skills.len() as f64,
        learning_velocity: est.learning_velocity,
        project_complexity: est.project_complexity,

        repo_stars: input.stars as f64,
        forks: input.forks as f64,
        dependents: est.dependents,
        downloads: est.downloads,
    };

    log::debug!(
        "Computed metrics: commit_frequency={:.2} pr_velocity={:.2} issue_resolution_rate={:.1} skills={}",
        metrics.commit_frequency,
        metrics.pr_velocity,
        metrics.issue_resolution_rate,
        metrics.skill_diversity
    );
    metrics
}

/// Collapse a usage history into one trend per skill, in first-seen order.
pub fn calculate_skill_trends(history: &[SkillTrendPoint]) -> Vec<SkillTrend> {
    let mut order: Vec<&str> = Vec::new();
    let mut groups: HashMap<&str, Vec<&SkillTrendPoint>> = HashMap::new();

    for point in history {
        let skill = point.skill.as_str();
        groups
            .entry(skill)
            .or_insert_with(|| {
                order.push(skill);
                Vec::new()
            })
            .push(point);
    }

    order
        .into_iter()
        .filter_map(|skill| {
            let mut points = groups.remove(skill)?;
            let category = points.first()?.category.clone();
            // Stable, so same-day points keep input order.
            points.sort_by_key(|p| p.date);
            let first = points.first()?;
            let last = points.last()?;
            Some(SkillTrend {
                skill: skill.to_string(),
                category,
                proficiency_growth: last.usage - first.usage,
                current_usage: last.usage,
                data_points: points.len(),
            })
        })
        .collect()
}

/// Percentile and rank of every metric against a peer sample.
pub fn calculate_benchmarks(
    user: &DeveloperMetrics,
    peers: &[DeveloperMetrics],
) -> BTreeMap<MetricKey, Benchmark> {
    MetricKey::ALL
        .into_iter()
        .map(|key| {
            let values: Vec<f64> = peers.iter().map(|p| p.get(key)).collect();
            let value = user.get(key);
            (
                key,
                Benchmark {
                    percentile: stats::percentile_of(value, &values),
                    rank: stats::rank_of(value, &values),
                },
            )
        })
        .collect()
}

/// Per-metric distribution across a peer sample. Empty when there are no peers.
pub fn calculate_cohort_statistics(peers: &[DeveloperMetrics]) -> BTreeMap<MetricKey, Distribution> {
    MetricKey::ALL
        .into_iter()
        .filter_map(|key| {
            let values: Vec<f64> = peers.iter().map(|p| p.get(key)).collect();
            stats::distribution(&values).map(|d| (key, d))
        })
        .collect()
}

/// Short plain-text observations about a developer's metrics and skill trends.
pub fn generate_insights(
    metrics: &DeveloperMetrics,
    trends: &[SkillTrend],
    thresholds: &InsightThresholds,
) -> Vec<String> {
    let t = thresholds;
    let mut messages = Vec::new();

    if metrics.commit_frequency >= t.summary_strong_commit_frequency {
        messages.push(format!(
            "High commit frequency of {:.1} commits per week shows consistent activity",
            metrics.commit_frequency
        ));
    } else if metrics.commit_frequency < t.summary_weak_commit_frequency {
        messages.push(format!(
            "Low commit frequency ({:.1} per week); smaller, more frequent commits would help",
            metrics.commit_frequency
        ));
    }

    if metrics.code_quality_score >= t.summary_excellent_code_quality {
        messages.push(format!(
            "Excellent code quality score of {:.0}",
            metrics.code_quality_score
        ));
    } else if metrics.code_quality_score < t.summary_poor_code_quality {
        messages.push(format!(
            "Low code quality score of {:.0}; consider more reviews and tests",
            metrics.code_quality_score
        ));
    }

    if metrics.code_review_participation >= t.summary_strong_review_participation {
        messages.push(format!(
            "Strong collaboration through {:.1} code reviews per week",
            metrics.code_review_participation
        ));
    } else if metrics.code_review_participation < t.summary_weak_review_participation {
        messages.push(
            "Reviewing more pull requests would improve collaboration with the team".to_string(),
        );
    }

    if metrics.skill_diversity >= t.summary_broad_skill_diversity {
        messages.push(format!(
            "Diverse skill set spanning {} languages",
            metrics.skill_diversity
        ));
    } else if metrics.skill_diversity <= t.summary_narrow_skill_diversity {
        messages.push("Narrow skill set; learning another language would broaden it".to_string());
    }

    if metrics.repo_stars >= t.summary_recognized_repo_stars {
        messages.push(format!(
            "Strong community recognition with {} stars",
            metrics.repo_stars
        ));
    }

    let rapid: Vec<&str> = trends
        .iter()
        .filter(|tr| tr.proficiency_growth >= t.rapid_growth)
        .map(|tr| tr.skill.as_str())
        .collect();
    if !rapid.is_empty() {
        messages.push(format!("Rapid growth in {}", rapid.join(", ")));
    }

    messages
}
