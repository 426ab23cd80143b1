pub mod types;

pub use types::*;

use crate::config::{EngineConfig, PositionThresholds, SignificanceThresholds};
use crate::error::{Error, Result};
use crate::metrics::{calculate_benchmarks, DeveloperMetrics, MetricKey};
use crate::stats;

/// Configured metrics whose values are finite on every given record.
fn comparable_metrics(config: &EngineConfig, records: &[&DeveloperMetrics]) -> Vec<MetricKey> {
    let mut keys: Vec<MetricKey> = Vec::new();
    for &key in &config.comparison.metrics {
        if keys.contains(&key) {
            continue;
        }
        if records.iter().all(|m| m.get(key).is_finite()) {
            keys.push(key);
        }
    }
    keys
}

/// Map a relative gap onto a significance band.
pub fn classify_significance(relative_difference: f64, bands: &SignificanceThresholds) -> Significance {
    if relative_difference >= bands.high {
        Significance::High
    } else if relative_difference >= bands.medium {
        Significance::Medium
    } else {
        Significance::Low
    }
}

pub fn classify_position(percentile: f64, cuts: &PositionThresholds) -> Position {
    if percentile > cuts.top {
        Position::Top
    } else if percentile > cuts.above_average {
        Position::AboveAverage
    } else if percentile > cuts.average {
        Position::Average
    } else {
        Position::BelowAverage
    }
}

/// A metric value mapped into 0..1 by `v / (v + reference)`, flipped for
/// lower-is-better metrics. Strictly increasing in `v`, so values past the
/// reference still separate developers. Reaching the reference scores 0.5.
fn normalized(config: &EngineConfig, key: MetricKey, value: f64) -> f64 {
    let value = value.max(0.0);
    let n = stats::safe_div(value, value + config.comparison.reference(key));
    if key.higher_is_better() {
        n
    } else {
        1.0 - n
    }
}

fn score_over(config: &EngineConfig, keys: &[MetricKey], metrics: &DeveloperMetrics) -> Result<f64> {
    let mean = stats::weighted_mean(
        keys.iter()
            .map(|&k| (config.comparison.weight(k), normalized(config, k, metrics.get(k)))),
    )
    .ok_or(Error::NoComparableMetrics)?;
    Ok(mean * 100.0)
}

/// Weighted aggregate score in 0..=100.
pub fn overall_score(config: &EngineConfig, metrics: &DeveloperMetrics) -> Result<f64> {
    let keys = comparable_metrics(config, &[metrics]);
    if keys.is_empty() {
        return Err(Error::NoComparableMetrics);
    }
    score_over(config, &keys, metrics)
}

/// Metric-by-metric comparison of two developers.
pub fn compare_developers(
    config: &EngineConfig,
    user1: &Developer,
    user2: &Developer,
) -> Result<ComparisonResult> {
    let keys = comparable_metrics(config, &[&user1.metrics, &user2.metrics]);
    if keys.is_empty() {
        return Err(Error::NoComparableMetrics);
    }

    let mut comparisons = Vec::with_capacity(keys.len());
    let mut strengths = StrengthPair::default();

    for &key in &keys {
        let a = user1.metrics.get(key);
        let b = user2.metrics.get(key);

        let winner = if a > b {
            Winner::User1
        } else if b > a {
            Winner::User2
        } else {
            Winner::Tie
        };
        let relative_difference = stats::relative_difference(a, b);
        let significance = classify_significance(relative_difference, &config.significance);

        if significance != Significance::Low {
            match winner {
                Winner::User1 => strengths.user1.push(key),
                Winner::User2 => strengths.user2.push(key),
                Winner::Tie => {}
            }
        }

        comparisons.push(MetricComparison {
            metric: key,
            user1_value: a,
            user2_value: b,
            relative_difference,
            winner,
            significance,
        });
    }

    let overall = ScorePair {
        user1: score_over(config, &keys, &user1.metrics)?,
        user2: score_over(config, &keys, &user2.metrics)?,
    };

    log::debug!(
        "Compared {} vs {} over {} metrics: {:.1} / {:.1}",
        user1.id,
        user2.id,
        keys.len(),
        overall.user1,
        overall.user2
    );

    Ok(ComparisonResult {
        user1: user1.clone(),
        user2: user2.clone(),
        comparisons,
        overall_score: overall,
        strengths,
    })
}

/// Rank a cohort by overall score, best first. Equal scores keep input order.
pub fn rank_developers(config: &EngineConfig, developers: &[Developer]) -> Result<Vec<RankedDeveloper>> {
    let mut scored = developers
        .iter()
        .map(|d| overall_score(config, &d.metrics).map(|score| (d, score)))
        .collect::<Result<Vec<_>>>()?;

    scored.sort_by(|a, b| b.1.total_cmp(&a.1));

    Ok(scored
        .into_iter()
        .enumerate()
        .map(|(i, (d, score))| RankedDeveloper {
            id: d.id.clone(),
            name: d.name.clone(),
            metrics: d.metrics.clone(),
            score,
            rank: i + 1,
        })
        .collect())
}

/// The `top_n` candidates closest to `target`, most similar first.
///
/// Each metric's gap is scaled by its reference value before aggregation.
/// Candidates with no finite metric in common with the target are skipped.
pub fn find_similar_developers(
    config: &EngineConfig,
    target: &DeveloperMetrics,
    candidates: &[Developer],
    top_n: usize,
) -> Result<Vec<SimilarityMatch>> {
    if config.comparison.metrics.is_empty() {
        return Err(Error::NoComparableMetrics);
    }
    let tolerance = config.similarity.tolerance;

    let mut matches = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        let keys = comparable_metrics(config, &[target, &candidate.metrics]);
        let components = keys.iter().map(|&k| {
            let gap = (target.get(k) - candidate.metrics.get(k)).abs();
            let d = stats::safe_div(gap, config.comparison.reference(k)).clamp(0.0, 1.0);
            (config.comparison.weight(k), d)
        });
        let Some(distance) = stats::weighted_distance(components) else {
            log::warn!("Skipping {}: no comparable metrics with target", candidate.id);
            continue;
        };

        let matching_areas = keys
            .iter()
            .copied()
            .filter(|&k| {
                let t = target.get(k);
                let c = candidate.metrics.get(k);
                (t != 0.0 || c != 0.0) && (t - c).abs() <= tolerance * t.abs()
            })
            .collect();

        matches.push(SimilarityMatch {
            id: candidate.id.clone(),
            name: candidate.name.clone(),
            similarity: (1.0 - distance).clamp(0.0, 1.0),
            matching_areas,
        });
    }

    matches.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
    matches.truncate(top_n);
    Ok(matches)
}

/// Where `subject` stands within `peers`, and which areas lead or lag.
pub fn generate_competitive_insights(
    config: &EngineConfig,
    subject: &DeveloperMetrics,
    peers: &[DeveloperMetrics],
) -> Result<CompetitiveInsight> {
    let mut records: Vec<&DeveloperMetrics> = peers.iter().collect();
    records.push(subject);
    let keys = comparable_metrics(config, &records);
    if keys.is_empty() {
        return Err(Error::NoComparableMetrics);
    }

    let benchmarks = calculate_benchmarks(subject, peers);

    // Metrics where everyone sits at zero say nothing about standing.
    let informative: Vec<MetricKey> = keys
        .iter()
        .copied()
        .filter(|&k| records.iter().any(|m| m.get(k) != 0.0))
        .collect();

    let percentile = if informative.is_empty() {
        100.0
    } else {
        informative
            .iter()
            .map(|k| benchmarks.get(k).map_or(100.0, |b| b.percentile))
            .sum::<f64>()
            / informative.len() as f64
    };
    let position = classify_position(percentile, &config.position);

    let mut outperforming_areas = Vec::new();
    let mut underperforming_areas = Vec::new();
    let mut actionable_insights = Vec::new();

    for &key in &informative {
        let values: Vec<f64> = peers.iter().map(|p| p.get(key)).collect();
        let Some(median) = stats::median(&values) else {
            continue;
        };
        let value = subject.get(key);
        if value > median {
            outperforming_areas.push(key);
        } else if value < median {
            underperforming_areas.push(key);
            let label = key.label();
            actionable_insights.push(if key.higher_is_better() {
                format!("Raise your {label}: peer median is {median:.1}, you are at {value:.1}")
            } else {
                format!("Keep your {label} low: peer median is {median:.1}, you are at {value:.1}")
            });
        }
    }

    log::debug!(
        "Competitive position {} at {percentile:.1} against {} peers",
        position.as_str(),
        peers.len()
    );

    Ok(CompetitiveInsight {
        position,
        percentile,
        outperforming_areas,
        underperforming_areas,
        actionable_insights,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dev(id: &str, metrics: DeveloperMetrics) -> Developer {
        Developer {
            id: id.to_string(),
            name: format!("Dev {id}"),
            metrics,
        }
    }

    fn solid() -> DeveloperMetrics {
        DeveloperMetrics {
            commit_frequency: 10.0,
            pr_velocity: 8.0,
            issue_resolution_rate: 80.0,
            code_review_participation: 2.0,
            code_quality_score: 75.0,
            test_coverage_average: 70.0,
            documentation_score: 60.0,
            bug_rate: 2.0,
            collaboration_score: 65.0,
            skill_diversity: 4.0,
            repo_stars: 120.0,
            forks: 15.0,
            ..Default::default()
        }
    }

    fn weaker() -> DeveloperMetrics {
        DeveloperMetrics {
            commit_frequency: 9.5,
            pr_velocity: 5.0,
            issue_resolution_rate: 95.0,
            code_review_participation: 1.0,
            code_quality_score: 75.0,
            test_coverage_average: 40.0,
            documentation_score: 62.0,
            bug_rate: 4.0,
            collaboration_score: 50.0,
            skill_diversity: 4.0,
            repo_stars: 30.0,
            forks: 2.0,
            ..Default::default()
        }
    }

    fn scaled(m: &DeveloperMetrics, factor: f64) -> DeveloperMetrics {
        let mut out = m.clone();
        out.commit_frequency *= factor;
        out.pr_velocity *= factor;
        out.issue_resolution_rate *= factor;
        out.code_review_participation *= factor;
        out.code_quality_score *= factor;
        out.test_coverage_average *= factor;
        out.documentation_score *= factor;
        out.collaboration_score *= factor;
        out.skill_diversity *= factor;
        out.repo_stars *= factor;
        out.forks *= factor;
        out.bug_rate /= factor;
        out
    }

    #[test]
    fn test_significance_bands() {
        let bands = SignificanceThresholds::default();
        assert_eq!(classify_significance(0.0, &bands), Significance::Low);
        assert_eq!(classify_significance(0.099, &bands), Significance::Low);
        assert_eq!(classify_significance(0.10, &bands), Significance::Medium);
        assert_eq!(classify_significance(0.25, &bands), Significance::High);
        assert_eq!(classify_significance(1.0, &bands), Significance::High);
    }

    #[test]
    fn test_significance_is_monotonic() {
        let bands = SignificanceThresholds::default();
        let mut prev = Significance::Low;
        for step in 0..=100 {
            let s = classify_significance(step as f64 / 100.0, &bands);
            assert!(s >= prev);
            prev = s;
        }
    }

    #[test]
    fn test_position_boundaries() {
        let cuts = PositionThresholds::default();
        assert_eq!(classify_position(100.0, &cuts), Position::Top);
        assert_eq!(classify_position(75.1, &cuts), Position::Top);
        assert_eq!(classify_position(75.0, &cuts), Position::AboveAverage);
        assert_eq!(classify_position(50.0, &cuts), Position::Average);
        assert_eq!(classify_position(25.0, &cuts), Position::BelowAverage);
        assert_eq!(classify_position(0.0, &cuts), Position::BelowAverage);
    }

    #[test]
    fn test_compare_winners_and_strengths() {
        let config = EngineConfig::default();
        let result = compare_developers(&config, &dev("a", solid()), &dev("b", weaker())).unwrap();

        let by_key = |k: MetricKey| {
            result
                .comparisons
                .iter()
                .find(|c| c.metric == k)
                .unwrap()
                .clone()
        };

        let stars = by_key(MetricKey::RepoStars);
        assert_eq!(stars.winner, Winner::User1);
        assert_eq!(stars.significance, Significance::High);

        let issues = by_key(MetricKey::IssueResolutionRate);
        assert_eq!(issues.winner, Winner::User2);
        assert_eq!(issues.significance, Significance::Medium);

        // 10 vs 9.5 is a 5% gap.
        let commits = by_key(MetricKey::CommitFrequency);
        assert_eq!(commits.winner, Winner::User1);
        assert_eq!(commits.significance, Significance::Low);

        let quality = by_key(MetricKey::CodeQualityScore);
        assert_eq!(quality.winner, Winner::Tie);

        // Winner is the larger value, bug rate included.
        let bugs = by_key(MetricKey::BugRate);
        assert_eq!(bugs.winner, Winner::User2);
        assert_eq!(bugs.significance, Significance::High);

        assert!(result.strengths.user1.contains(&MetricKey::RepoStars));
        assert!(!result.strengths.user1.contains(&MetricKey::CommitFrequency));
        assert_eq!(
            result.strengths.user2,
            vec![MetricKey::IssueResolutionRate, MetricKey::BugRate]
        );

        assert!(result.overall_score.user1 > result.overall_score.user2);
        assert!((0.0..=100.0).contains(&result.overall_score.user1));
        assert!((0.0..=100.0).contains(&result.overall_score.user2));
    }

    #[test]
    fn test_compare_is_symmetric() {
        let config = EngineConfig::default();
        let a = dev("a", solid());
        let b = dev("b", weaker());
        let ab = compare_developers(&config, &a, &b).unwrap();
        let ba = compare_developers(&config, &b, &a).unwrap();

        assert_eq!(ab.comparisons.len(), ba.comparisons.len());
        for (x, y) in ab.comparisons.iter().zip(&ba.comparisons) {
            assert_eq!(x.metric, y.metric);
            assert_eq!(x.winner, y.winner.swapped());
            assert_eq!(x.significance, y.significance);
        }
        assert_eq!(ab.overall_score.user1, ba.overall_score.user2);
        assert_eq!(ab.overall_score.user2, ba.overall_score.user1);
        assert_eq!(ab.strengths.user1, ba.strengths.user2);
    }

    #[test]
    fn test_compare_identical_is_all_ties() {
        let config = EngineConfig::default();
        let result = compare_developers(&config, &dev("a", solid()), &dev("b", solid())).unwrap();
        assert!(result.comparisons.iter().all(|c| c.winner == Winner::Tie));
        assert!(result.comparisons.iter().all(|c| c.significance == Significance::Low));
        assert_eq!(result.overall_score.user1, result.overall_score.user2);
        assert!(result.strengths.user1.is_empty());
        assert!(result.strengths.user2.is_empty());
    }

    #[test]
    fn test_compare_without_metrics_is_an_error() {
        let mut config = EngineConfig::default();
        config.comparison.metrics.clear();
        let err = compare_developers(&config, &dev("a", solid()), &dev("b", weaker())).unwrap_err();
        assert!(matches!(err, Error::NoComparableMetrics));
    }

    #[test]
    fn test_compare_skips_non_finite_values() {
        let mut config = EngineConfig::default();
        config.comparison.metrics = vec![MetricKey::CommitFrequency, MetricKey::RepoStars];

        let mut broken = solid();
        broken.commit_frequency = f64::NAN;
        let result = compare_developers(&config, &dev("a", broken.clone()), &dev("b", weaker())).unwrap();
        assert_eq!(result.comparisons.len(), 1);
        assert_eq!(result.comparisons[0].metric, MetricKey::RepoStars);

        broken.repo_stars = f64::INFINITY;
        let err = compare_developers(&config, &dev("a", broken), &dev("b", weaker())).unwrap_err();
        assert!(matches!(err, Error::NoComparableMetrics));
    }

    #[test]
    fn test_zero_weights_cannot_score() {
        let mut config = EngineConfig::default();
        config.comparison.metrics = vec![MetricKey::Forks];
        config.comparison.weights.insert(MetricKey::Forks, 0.0);
        assert!(matches!(
            overall_score(&config, &solid()).unwrap_err(),
            Error::NoComparableMetrics
        ));
    }

    #[test]
    fn test_rank_prefers_more_stars_and_commits() {
        let config = EngineConfig::default();
        let base = DeveloperMetrics {
            commit_frequency: 5.0,
            repo_stars: 20.0,
            code_quality_score: 70.0,
            ..Default::default()
        };
        let c = DeveloperMetrics {
            commit_frequency: 12.0,
            repo_stars: 200.0,
            ..base.clone()
        };
        let ranked = rank_developers(
            &config,
            &[dev("a", base.clone()), dev("b", base), dev("c", c)],
        )
        .unwrap();

        assert_eq!(ranked[0].id, "c");
        assert_eq!(ranked[0].rank, 1);
        // Tied developers keep input order.
        assert_eq!(ranked[1].id, "a");
        assert_eq!(ranked[2].id, "b");
        assert_eq!(
            ranked.iter().map(|r| r.rank).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
        assert!(ranked[0].score > ranked[1].score);
        assert_eq!(ranked[1].score, ranked[2].score);
    }

    #[test]
    fn test_rank_separates_values_beyond_reference() {
        let config = EngineConfig::default();
        let saturated = DeveloperMetrics {
            commit_frequency: 25.0,
            repo_stars: 600.0,
            ..Default::default()
        };
        let c = DeveloperMetrics {
            commit_frequency: 40.0,
            repo_stars: 2000.0,
            ..Default::default()
        };
        let ranked = rank_developers(
            &config,
            &[dev("a", saturated.clone()), dev("b", saturated), dev("c", c)],
        )
        .unwrap();

        assert_eq!(ranked[0].id, "c");
        assert_eq!(ranked[0].rank, 1);
        assert!(ranked[0].score > ranked[1].score);
        assert_eq!(ranked[1].id, "a");
        assert_eq!(ranked[2].id, "b");
    }

    #[test]
    fn test_score_strictly_increases_past_reference() {
        let config = EngineConfig::default();
        for key in MetricKey::ALL {
            let reference = config.comparison.reference(key);
            let mut prev: Option<f64> = None;
            for factor in [0.0, 0.5, 1.0, 2.0, 10.0, 100.0] {
                let n = normalized(&config, key, reference * factor);
                assert!((0.0..=1.0).contains(&n), "{key} out of range at {factor}");
                if let Some(p) = prev {
                    if key.higher_is_better() {
                        assert!(n > p, "{key} not increasing at {factor}");
                    } else {
                        assert!(n < p, "{key} not decreasing at {factor}");
                    }
                }
                prev = Some(n);
            }
        }
    }

    #[test]
    fn test_compare_scores_follow_winner_when_saturated() {
        let mut config = EngineConfig::default();
        config.comparison.metrics = vec![MetricKey::RepoStars];
        let a = DeveloperMetrics {
            repo_stars: 600.0,
            ..Default::default()
        };
        let b = DeveloperMetrics {
            repo_stars: 5000.0,
            ..Default::default()
        };
        let result = compare_developers(&config, &dev("a", a), &dev("b", b)).unwrap();
        assert_eq!(result.comparisons[0].winner, Winner::User2);
        assert_eq!(result.comparisons[0].significance, Significance::High);
        assert!(result.overall_score.user2 > result.overall_score.user1);
    }

    #[test]
    fn test_rank_empty_cohort() {
        assert!(rank_developers(&EngineConfig::default(), &[]).unwrap().is_empty());
    }

    #[test]
    fn test_rank_uses_compare_weighting() {
        let config = EngineConfig::default();
        let a = dev("a", solid());
        let b = dev("b", weaker());
        let ranked = rank_developers(&config, &[b.clone(), a.clone()]).unwrap();
        let cmp = compare_developers(&config, &a, &b).unwrap();
        assert_eq!(ranked[0].id, "a");
        assert_eq!(ranked[0].score, cmp.overall_score.user1);
        assert_eq!(ranked[1].score, cmp.overall_score.user2);
    }

    #[test]
    fn test_similar_orders_by_closeness() {
        let config = EngineConfig::default();
        let target = solid();
        let candidates = vec![
            dev("far", scaled(&target, 3.0)),
            dev("twin", target.clone()),
            dev("near", scaled(&target, 1.05)),
        ];

        let matches = find_similar_developers(&config, &target, &candidates, 2).unwrap();
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].id, "twin");
        assert_eq!(matches[0].similarity, 1.0);
        assert_eq!(matches[1].id, "near");
        assert!(matches[1].similarity < 1.0);
        assert!(matches[1].similarity > 0.9);

        // Zero-valued metrics on both sides are not reported as matching.
        assert!(!matches[0].matching_areas.contains(&MetricKey::Downloads));
        assert!(matches[0].matching_areas.contains(&MetricKey::CommitFrequency));
        // 5% apart is within the 10% tolerance.
        assert!(matches[1].matching_areas.contains(&MetricKey::RepoStars));
    }

    #[test]
    fn test_similar_bounds_and_short_lists() {
        let config = EngineConfig::default();
        let target = solid();
        let candidates = vec![dev("x", weaker()), dev("y", scaled(&target, 10.0))];
        let matches = find_similar_developers(&config, &target, &candidates, 10).unwrap();
        assert_eq!(matches.len(), 2);
        for m in &matches {
            assert!((0.0..=1.0).contains(&m.similarity));
        }
        assert!(matches[0].similarity >= matches[1].similarity);

        assert!(find_similar_developers(&config, &target, &[], 5).unwrap().is_empty());
        assert!(find_similar_developers(&config, &target, &candidates, 0).unwrap().is_empty());
    }

    #[test]
    fn test_similar_large_metric_does_not_dominate() {
        let config = EngineConfig::default();
        let target = solid();
        let mut downloads_only = target.clone();
        downloads_only.downloads = 50.0;
        let mut commits_off = target.clone();
        commits_off.commit_frequency = 20.0;

        let matches = find_similar_developers(
            &config,
            &target,
            &[dev("commits", commits_off), dev("downloads", downloads_only)],
            2,
        )
        .unwrap();
        // 50 downloads against a 10k reference is a tiny gap.
        assert_eq!(matches[0].id, "downloads");
    }

    #[test]
    fn test_competitive_top_against_weaker_peers() {
        let config = EngineConfig::default();
        let subject = solid();
        let peers = vec![
            scaled(&subject, 0.3),
            scaled(&subject, 0.5),
            scaled(&subject, 0.4),
        ];
        let insight = generate_competitive_insights(&config, &subject, &peers).unwrap();
        assert_eq!(insight.position, Position::Top);
        assert!(insight.percentile > 75.0);
        assert!(insight.outperforming_areas.contains(&MetricKey::CommitFrequency));
        // Peers carry higher bug rates, so the subject sits below their median.
        assert_eq!(insight.underperforming_areas, vec![MetricKey::BugRate]);
        assert_eq!(
            insight.actionable_insights,
            vec!["Keep your Bug Rate low: peer median is 5.0, you are at 2.0".to_string()]
        );
    }

    #[test]
    fn test_competitive_below_average_has_actions() {
        let config = EngineConfig::default();
        let subject = scaled(&solid(), 0.3);
        let peers = vec![solid(), scaled(&solid(), 1.2), scaled(&solid(), 0.9)];
        let insight = generate_competitive_insights(&config, &subject, &peers).unwrap();
        assert_eq!(insight.position, Position::BelowAverage);
        assert!(!insight.underperforming_areas.is_empty());
        assert_eq!(
            insight.actionable_insights.len(),
            insight.underperforming_areas.len()
        );
        assert!(insight
            .actionable_insights
            .iter()
            .any(|s| s.contains("Commit Frequency")));
        assert!(insight.outperforming_areas.contains(&MetricKey::BugRate));
    }

    #[test]
    fn test_competitive_without_peers() {
        let insight =
            generate_competitive_insights(&EngineConfig::default(), &solid(), &[]).unwrap();
        assert_eq!(insight.percentile, 100.0);
        assert_eq!(insight.position, Position::Top);
        assert!(insight.outperforming_areas.is_empty());
        assert!(insight.underperforming_areas.is_empty());
    }
}
