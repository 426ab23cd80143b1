//! Engine configuration: every threshold, weight and reference scale the
//! engine uses lives here rather than as literals in the algorithms.
//!
//! Configuration is read from a JSON file (default `~/.devmetrics/config.json`).
//! Every section is optional; missing values take the defaults below.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::metrics::MetricKey;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub significance: SignificanceThresholds,
    pub position: PositionThresholds,
    pub insights: InsightThresholds,
    pub comparison: ComparisonConfig,
    pub similarity: SimilarityConfig,
}

/// Relative-gap bands for classifying a metric difference. A gap at or
/// above `high` is high, at or above `medium` is medium, otherwise low.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignificanceThresholds {
    pub high: f64,
    pub medium: f64,
}

impl Default for SignificanceThresholds {
    fn default() -> Self {
        Self {
            high: 0.25,
            medium: 0.10,
        }
    }
}

/// Exclusive lower percentile bounds for competitive positions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PositionThresholds {
    pub top: f64,
    pub above_average: f64,
    pub average: f64,
}

impl Default for PositionThresholds {
    fn default() -> Self {
        Self {
            top: 75.0,
            above_average: 50.0,
            average: 25.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InsightThresholds {
    // Structured insight rules.
    pub low_commit_frequency: f64,
    pub high_commit_frequency: f64,
    pub low_code_quality: f64,
    pub low_collaboration: f64,
    pub narrow_skill_diversity: f64,
    pub broad_skill_diversity: f64,
    pub low_repo_stars: f64,
    pub high_repo_stars: f64,
    /// Proficiency growth at or above this counts as rapid.
    pub rapid_growth: f64,

    // Plain-text summary messages.
    pub summary_strong_commit_frequency: f64,
    pub summary_weak_commit_frequency: f64,
    pub summary_excellent_code_quality: f64,
    pub summary_poor_code_quality: f64,
    pub summary_strong_review_participation: f64,
    pub summary_weak_review_participation: f64,
    pub summary_broad_skill_diversity: f64,
    pub summary_narrow_skill_diversity: f64,
    pub summary_recognized_repo_stars: f64,
}

impl Default for InsightThresholds {
    fn default() -> Self {
        Self {
            low_commit_frequency: 5.0,
            high_commit_frequency: 15.0,
            low_code_quality: 60.0,
            low_collaboration: 50.0,
            narrow_skill_diversity: 3.0,
            broad_skill_diversity: 7.0,
            low_repo_stars: 50.0,
            high_repo_stars: 100.0,
            rapid_growth: 30.0,

            summary_strong_commit_frequency: 10.0,
            summary_weak_commit_frequency: 3.0,
            summary_excellent_code_quality: 80.0,
            summary_poor_code_quality: 60.0,
            summary_strong_review_participation: 2.0,
            summary_weak_review_participation: 0.5,
            summary_broad_skill_diversity: 5.0,
            summary_narrow_skill_diversity: 2.0,
            summary_recognized_repo_stars: 100.0,
        }
    }
}

/// Which metrics take part in comparisons and how each one is scored.
/// `weights` and `reference` only need to list overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComparisonConfig {
    pub metrics: Vec<MetricKey>,
    pub weights: BTreeMap<MetricKey, f64>,
    /// Value at which a metric's normalized score saturates.
    pub reference: BTreeMap<MetricKey, f64>,
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        Self {
            metrics: MetricKey::ALL.to_vec(),
            weights: BTreeMap::new(),
            reference: BTreeMap::new(),
        }
    }
}

impl ComparisonConfig {
    pub fn weight(&self, key: MetricKey) -> f64 {
        self.weights
            .get(&key)
            .copied()
            .unwrap_or_else(|| default_weight(key))
    }

    pub fn reference(&self, key: MetricKey) -> f64 {
        self.reference
            .get(&key)
            .copied()
            .unwrap_or_else(|| default_reference(key))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimilarityConfig {
    /// A metric "matches" when the candidate is within this fraction of the target.
    pub tolerance: f64,
}

impl Default for SimilarityConfig {
    fn default() -> Self {
        Self { tolerance: 0.10 }
    }
}

pub fn default_weight(key: MetricKey) -> f64 {
    match key {
        MetricKey::CommitFrequency | MetricKey::PrVelocity | MetricKey::CodeQualityScore => 1.5,
        MetricKey::IssueResolutionRate
        | MetricKey::CodeReviewParticipation
        | MetricKey::TestCoverageAverage
        | MetricKey::BugRate
        | MetricKey::CollaborationScore
        | MetricKey::SkillDiversity
        | MetricKey::RepoStars => 1.0,
        MetricKey::DocumentationScore
        | MetricKey::MentorshipActivity
        | MetricKey::CommunityEngagement
        | MetricKey::LearningVelocity
        | MetricKey::ProjectComplexity
        | MetricKey::Forks
        | MetricKey::Dependents
        | MetricKey::Downloads => 0.5,
    }
}

pub fn default_reference(key: MetricKey) -> f64 {
    match key {
        MetricKey::CommitFrequency => 20.0,
        MetricKey::PrVelocity => 20.0,
        MetricKey::CodeReviewParticipation => 10.0,
        MetricKey::IssueResolutionRate
        | MetricKey::CodeQualityScore
        | MetricKey::TestCoverageAverage
        | MetricKey::DocumentationScore
        | MetricKey::CollaborationScore
        | MetricKey::CommunityEngagement => 100.0,
        MetricKey::BugRate => 10.0,
        MetricKey::MentorshipActivity => 10.0,
        MetricKey::SkillDiversity => 10.0,
        MetricKey::LearningVelocity => 10.0,
        MetricKey::ProjectComplexity => 10.0,
        MetricKey::RepoStars => 500.0,
        MetricKey::Forks => 100.0,
        MetricKey::Dependents => 100.0,
        MetricKey::Downloads => 10_000.0,
    }
}

impl EngineConfig {
    /// Default config location (`~/.devmetrics/config.json`).
    pub fn default_path() -> Result<PathBuf> {
        let dir = dirs::home_dir()
            .ok_or_else(|| Error::Config("cannot determine home directory".into()))?
            .join(".devmetrics");
        Ok(dir.join("config.json"))
    }

    /// Load and validate a config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let config: EngineConfig = serde_json::from_str(&raw)?;
        config.validate()?;
        log::info!("Loaded engine config from {}", path.display());
        Ok(config)
    }

    /// Load an explicit path, or the default path when it exists, or fall
    /// back to built-in defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load(path);
        }
        let default = Self::default_path()?;
        if default.exists() {
            Self::load(default)
        } else {
            log::debug!("No config at {}, using defaults", default.display());
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> Result<()> {
        let s = &self.significance;
        if !(s.medium >= 0.0 && s.high >= s.medium) {
            return Err(Error::Config(format!(
                "significance bands must satisfy 0 <= medium <= high (got medium={}, high={})",
                s.medium, s.high
            )));
        }

        let p = &self.position;
        if !(p.top >= p.above_average && p.above_average >= p.average) {
            return Err(Error::Config(format!(
                "position cut points must descend (got top={}, above_average={}, average={})",
                p.top, p.above_average, p.average
            )));
        }

        for (key, w) in &self.comparison.weights {
            if !w.is_finite() || *w < 0.0 {
                return Err(Error::Config(format!("weight for {key} must be >= 0, got {w}")));
            }
        }
        for (key, r) in &self.comparison.reference {
            if !r.is_finite() || *r <= 0.0 {
                return Err(Error::Config(format!(
                    "reference scale for {key} must be > 0, got {r}"
                )));
            }
        }

        if !self.similarity.tolerance.is_finite() || self.similarity.tolerance < 0.0 {
            return Err(Error::Config(format!(
                "similarity tolerance must be >= 0, got {}",
                self.similarity.tolerance
            )));
        }
        Ok(())
    }
}
