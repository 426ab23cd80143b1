use serde::{Deserialize, Serialize};

use crate::metrics::{DeveloperMetrics, MetricKey};

/// A developer as seen by the comparison engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Developer {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub metrics: DeveloperMetrics,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Winner {
    User1,
    User2,
    Tie,
}

impl Winner {
    pub fn swapped(self) -> Self {
        match self {
            Winner::User1 => Winner::User2,
            Winner::User2 => Winner::User1,
            Winner::Tie => Winner::Tie,
        }
    }
}

/// How large a gap between two values is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Significance {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricComparison {
    pub metric: MetricKey,
    pub user1_value: f64,
    pub user2_value: f64,
    /// Gap relative to the larger magnitude, 0..=1.
    pub relative_difference: f64,
    pub winner: Winner,
    pub significance: Significance,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScorePair {
    pub user1: f64,
    pub user2: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StrengthPair {
    pub user1: Vec<MetricKey>,
    pub user2: Vec<MetricKey>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonResult {
    pub user1: Developer,
    pub user2: Developer,
    pub comparisons: Vec<MetricComparison>,
    pub overall_score: ScorePair,
    pub strengths: StrengthPair,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedDeveloper {
    pub id: String,
    pub name: String,
    pub metrics: DeveloperMetrics,
    /// 0..=100
    pub score: f64,
    /// 1-based.
    pub rank: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimilarityMatch {
    pub id: String,
    pub name: String,
    /// 0..=1, higher is more similar.
    pub similarity: f64,
    pub matching_areas: Vec<MetricKey>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Position {
    Top,
    AboveAverage,
    Average,
    BelowAverage,
}

impl Position {
    pub fn as_str(self) -> &'static str {
        match self {
            Position::Top => "top",
            Position::AboveAverage => "above-average",
            Position::Average => "average",
            Position::BelowAverage => "below-average",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompetitiveInsight {
    pub position: Position,
    pub percentile: f64,
    pub outperforming_areas: Vec<MetricKey>,
    pub underperforming_areas: Vec<MetricKey>,
    pub actionable_insights: Vec<String>,
}
