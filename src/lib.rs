//! Developer metrics and comparative analytics.
//!
//! Raw activity counters flow through the [`metrics`] calculator into
//! [`DeveloperMetrics`], which the [`comparison`] engine benchmarks and ranks
//! against peers and the [`insights`] generator turns into recommendations.
//! All computation is pure: no I/O, no shared state.

pub mod comparison;
pub mod config;
pub mod date_util;
pub mod error;
pub mod insights;
pub mod metrics;
pub mod stats;

use std::collections::BTreeMap;

pub use comparison::{
    CompetitiveInsight, ComparisonResult, Developer, MetricComparison, Position, RankedDeveloper,
    Significance, SimilarityMatch, Winner,
};
pub use config::EngineConfig;
pub use error::{Error, Result};
pub use insights::{Insight, InsightCategory, InsightContext, Priority};
pub use metrics::{
    ActivityInput, Benchmark, DeveloperMetrics, MetricEstimates, MetricKey, SkillTrend,
    SkillTrendPoint,
};
pub use stats::Distribution;

/// Main entry point: every engine operation, bound to one configuration.
#[derive(Debug, Clone, Default)]
pub struct MetricsEngine {
    config: EngineConfig,
}

impl MetricsEngine {
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // ── Calculator ─────────────────────────────────────────────────

    pub fn developer_metrics(&self, input: &ActivityInput) -> DeveloperMetrics {
        metrics::calculate_developer_metrics(input)
    }

    pub fn skill_trends(&self, history: &[SkillTrendPoint]) -> Vec<SkillTrend> {
        metrics::calculate_skill_trends(history)
    }

    pub fn benchmarks(
        &self,
        user: &DeveloperMetrics,
        peers: &[DeveloperMetrics],
    ) -> BTreeMap<MetricKey, Benchmark> {
        metrics::calculate_benchmarks(user, peers)
    }

    pub fn cohort_statistics(&self, peers: &[DeveloperMetrics]) -> BTreeMap<MetricKey, Distribution> {
        metrics::calculate_cohort_statistics(peers)
    }

    /// Plain-text observations.
    pub fn summary(&self, metrics: &DeveloperMetrics, trends: &[SkillTrend]) -> Vec<String> {
        metrics::generate_insights(metrics, trends, &self.config.insights)
    }

    // ── Comparison ─────────────────────────────────────────────────

    pub fn overall_score(&self, metrics: &DeveloperMetrics) -> Result<f64> {
        comparison::overall_score(&self.config, metrics)
    }

    pub fn compare(&self, user1: &Developer, user2: &Developer) -> Result<ComparisonResult> {
        comparison::compare_developers(&self.config, user1, user2)
    }

    pub fn rank(&self, developers: &[Developer]) -> Result<Vec<RankedDeveloper>> {
        comparison::rank_developers(&self.config, developers)
    }

    pub fn similar(
        &self,
        target: &DeveloperMetrics,
        candidates: &[Developer],
        top_n: usize,
    ) -> Result<Vec<SimilarityMatch>> {
        comparison::find_similar_developers(&self.config, target, candidates, top_n)
    }

    pub fn competitive(
        &self,
        subject: &DeveloperMetrics,
        peers: &[DeveloperMetrics],
    ) -> Result<CompetitiveInsight> {
        comparison::generate_competitive_insights(&self.config, subject, peers)
    }

    // ── Insights ───────────────────────────────────────────────────

    pub fn insights(&self, metrics: &DeveloperMetrics) -> Vec<Insight> {
        insights::generate_insights(metrics, &self.config.insights)
    }

    pub fn insights_with_context(
        &self,
        metrics: &DeveloperMetrics,
        context: &InsightContext<'_>,
    ) -> Vec<Insight> {
        insights::generate_insights_with_context(metrics, context, &self.config.insights)
    }
}
