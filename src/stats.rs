//! Numeric helpers shared by the calculator and the comparison engine.
//!
//! Every function here treats degenerate denominators as zero instead of
//! producing NaN or infinity.

use serde::Serialize;

/// Summary of a metric across a peer sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Distribution {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub p90: f64,
    pub min: f64,
    pub max: f64,
}

/// `numerator / denominator`, or 0 when the denominator is not positive
/// or the quotient is not finite.
pub fn safe_div(numerator: f64, denominator: f64) -> f64 {
    if denominator <= 0.0 {
        return 0.0;
    }
    let q = numerator / denominator;
    if q.is_finite() {
        q
    } else {
        0.0
    }
}

/// Share of peers whose value is at or below the subject's, scaled to
/// 0..=100. An empty peer list is trivially the top.
pub fn percentile_of(value: f64, peers: &[f64]) -> f64 {
    if peers.is_empty() {
        return 100.0;
    }
    let at_or_below = peers.iter().filter(|&&p| p <= value).count();
    (at_or_below as f64 / peers.len() as f64 * 100.0).clamp(0.0, 100.0)
}

/// 1 + number of peers with a strictly larger value.
pub fn rank_of(value: f64, peers: &[f64]) -> usize {
    1 + peers.iter().filter(|&&p| p > value).count()
}

fn sorted(values: &[f64]) -> Vec<f64> {
    let mut v = values.to_vec();
    v.sort_by(|a, b| a.total_cmp(b));
    v
}

fn median_of_sorted(v: &[f64]) -> f64 {
    if v.len().is_multiple_of(2) {
        let mid = v.len() / 2;
        (v[mid - 1] + v[mid]) / 2.0
    } else {
        v[v.len() / 2]
    }
}

pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(median_of_sorted(&sorted(values)))
}

pub fn distribution(values: &[f64]) -> Option<Distribution> {
    if values.is_empty() {
        return None;
    }
    let v = sorted(values);
    let mean = v.iter().sum::<f64>() / v.len() as f64;

    let p90_idx = ((v.len() as f64) * 0.9).ceil() as usize;
    let p90_idx = p90_idx.min(v.len()).max(1) - 1;

    Some(Distribution {
        count: v.len(),
        mean,
        median: median_of_sorted(&v),
        p90: v[p90_idx],
        min: v[0],
        max: v[v.len() - 1],
    })
}

/// Weighted mean of `(weight, value)` pairs. `None` when the total weight is zero.
pub fn weighted_mean(pairs: impl IntoIterator<Item = (f64, f64)>) -> Option<f64> {
    let (total_weight, total) = pairs
        .into_iter()
        .fold((0.0, 0.0), |(tw, t), (w, v)| (tw + w, t + w * v));
    if total_weight > 0.0 {
        Some(total / total_weight)
    } else {
        None
    }
}

/// |a − b| relative to the larger magnitude, in 0..=1. Two zeros differ by 0.
pub fn relative_difference(a: f64, b: f64) -> f64 {
    let scale = a.abs().max(b.abs()).max(f64::EPSILON);
    ((a - b).abs() / scale).min(1.0)
}

/// Root of the weighted mean of squared component distances. Components are
/// expected in 0..=1, so the result is too.
pub fn weighted_distance(components: impl IntoIterator<Item = (f64, f64)>) -> Option<f64> {
    weighted_mean(components.into_iter().map(|(w, d)| (w, d * d))).map(f64::sqrt)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_div_zero_denominator() {
        assert_eq!(safe_div(10.0, 0.0), 0.0);
        assert_eq!(safe_div(10.0, -1.0), 0.0);
        assert_eq!(safe_div(0.0, 0.0), 0.0);
        assert_eq!(safe_div(10.0, 4.0), 2.5);
    }

    #[test]
    fn test_percentile_half_of_peers() {
        let peers = [10.0, 12.0, 20.0, 5.0];
        assert_eq!(percentile_of(15.0, &peers), 50.0);
        assert_eq!(rank_of(15.0, &peers), 2);
    }

    #[test]
    fn test_percentile_empty_peers() {
        assert_eq!(percentile_of(0.0, &[]), 100.0);
        assert_eq!(rank_of(0.0, &[]), 1);
    }

    #[test]
    fn test_percentile_counts_ties_as_matched() {
        assert_eq!(percentile_of(5.0, &[5.0, 5.0]), 100.0);
        assert_eq!(rank_of(5.0, &[5.0, 5.0]), 1);
    }

    #[test]
    fn test_percentile_is_monotonic() {
        let peer_sets: [&[f64]; 4] = [
            &[3.0, 7.0, 7.0, 11.0, 40.0],
            &[0.0, 0.0, 0.0],
            &[-2.0, 0.5, 49.5],
            &[25.0],
        ];
        for peers in peer_sets {
            let mut prev_pct = -1.0;
            let mut prev_rank = usize::MAX;
            for step in -10..100 {
                let v = step as f64 * 0.5;
                let pct = percentile_of(v, peers);
                let rank = rank_of(v, peers);
                assert!(pct >= prev_pct, "percentile dropped at {v} for {peers:?}");
                assert!(rank <= prev_rank, "rank worsened at {v} for {peers:?}");
                prev_pct = pct;
                prev_rank = rank;
            }
        }
    }

    #[test]
    fn test_median() {
        assert_eq!(median(&[]), None);
        assert_eq!(median(&[9.0, 1.0, 5.0]), Some(5.0));
        assert_eq!(median(&[7.0, 3.0]), Some(5.0));
    }

    #[test]
    fn test_distribution_single_element() {
        let d = distribution(&[5.0]).unwrap();
        assert_eq!(d.count, 1);
        assert_eq!(d.mean, 5.0);
        assert_eq!(d.median, 5.0);
        assert_eq!(d.p90, 5.0);
        assert_eq!(d.min, 5.0);
        assert_eq!(d.max, 5.0);
    }

    #[test]
    fn test_distribution_many_elements() {
        let values: Vec<f64> = (1..=100).rev().map(f64::from).collect();
        let d = distribution(&values).unwrap();
        assert_eq!(d.mean, 50.5);
        assert_eq!(d.median, 50.5);
        assert_eq!(d.p90, 90.0);
        assert_eq!(d.min, 1.0);
        assert_eq!(d.max, 100.0);
    }

    #[test]
    fn test_weighted_mean() {
        assert_eq!(weighted_mean([(1.0, 10.0), (3.0, 20.0)]), Some(17.5));
        assert_eq!(weighted_mean([(0.0, 10.0)]), None);
        assert_eq!(weighted_mean(std::iter::empty()), None);
    }

    #[test]
    fn test_relative_difference() {
        assert_eq!(relative_difference(0.0, 0.0), 0.0);
        assert_eq!(relative_difference(10.0, 5.0), 0.5);
        assert_eq!(relative_difference(5.0, 10.0), 0.5);
        assert_eq!(relative_difference(0.0, 3.0), 1.0);
    }

    #[test]
    fn test_weighted_distance() {
        assert_eq!(weighted_distance([(1.0, 0.0), (1.0, 0.0)]), Some(0.0));
        assert_eq!(weighted_distance([(1.0, 1.0), (1.0, 1.0)]), Some(1.0));
        let d = weighted_distance([(1.0, 1.0), (1.0, 0.0)]).unwrap();
        assert!((d - 0.5f64.sqrt()).abs() < 1e-12);
    }
}
