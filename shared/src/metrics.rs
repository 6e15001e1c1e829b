//! Chart-ready projections over one session's results.
//!
//! Every function here is total: empty inputs give empty outputs and all
//! divisions are guarded.

use crate::model::{PerAlgorithm, PredictionResult, ProbabilityMap};
use serde::{Deserialize, Serialize};

/// Probabilities shown per algorithm in the results view.
pub const DETAIL_TOP_K: usize = 5;
/// Probabilities shown per algorithm in history rows and detail summaries.
pub const SUMMARY_TOP_K: usize = 3;
/// Categories kept by [`probability_ceiling`].
pub const CEILING_LIMIT: usize = 6;

const AXIS_MAX: f64 = 100.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryScore {
    pub category: String,
    pub probability: f64,
}

impl CategoryScore {
    pub fn percent(&self) -> f64 {
        self.probability * 100.0
    }
}

/// One algorithm's point on the speed/confidence/precision radar, each axis in `[0, 100]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RadarPoint {
    pub speed: f64,
    pub confidence: f64,
    /// Not a measured precision: the confidence percentage stands in for it.
    pub precision: f64,
}

pub const RADAR_AXES: [&str; 3] = ["Speed", "Confidence", "Precision"];

impl RadarPoint {
    pub fn axes(&self) -> [f64; 3] {
        [self.speed, self.confidence, self.precision]
    }
}

/// The `k` most probable categories, highest first. Equal probabilities keep
/// the order of `probabilities`.
pub fn top_k(probabilities: &ProbabilityMap, k: usize) -> Vec<CategoryScore> {
    let mut ranked = rank(probabilities);
    ranked.truncate(k);
    ranked
}

fn rank(probabilities: &ProbabilityMap) -> Vec<CategoryScore> {
    let mut scores: Vec<CategoryScore> = probabilities
        .iter()
        .map(|(category, probability)| CategoryScore {
            category: category.to_string(),
            probability,
        })
        .collect();
    // sort_by is stable, so ties stay in source order
    scores.sort_by(|a, b| b.probability.total_cmp(&a.probability));
    scores
}

pub fn timing_series(results: &PerAlgorithm<PredictionResult>) -> PerAlgorithm<f64> {
    results.map(|_, result| result.prediction_time_ms)
}

pub fn confidence_series(results: &PerAlgorithm<PredictionResult>) -> PerAlgorithm<f64> {
    results.map(|_, result| result.confidence_percent())
}

/// Highest probability any algorithm gave each category, top
/// [`CEILING_LIMIT`] categories. Ties keep first-seen category order.
pub fn probability_ceiling(results: &PerAlgorithm<PredictionResult>) -> Vec<CategoryScore> {
    let mut ceiling = ProbabilityMap::new();
    for (_, result) in results.iter() {
        for (category, probability) in result.probabilities.iter() {
            if ceiling.get(category).is_none_or(|current| probability > current) {
                ceiling.insert(category, probability);
            }
        }
    }
    top_k(&ceiling, CEILING_LIMIT)
}

/// Speed is inverted against the slowest algorithm: the slowest scores 0 and
/// faster ones approach 100. All speeds are 0 when every time is 0.
pub fn radar_projection(results: &PerAlgorithm<PredictionResult>) -> PerAlgorithm<RadarPoint> {
    let times = timing_series(results);
    let slowest = times
        .to_array()
        .into_iter()
        .fold(0.0_f64, |max, time| max.max(time));

    results.map(|algorithm, result| {
        let speed = if slowest > 0.0 {
            (1.0 - times.get(algorithm) / slowest) * AXIS_MAX
        } else {
            0.0
        };
        let confidence = result.confidence_percent();
        RadarPoint {
            speed: clamp_axis(speed),
            confidence: clamp_axis(confidence),
            precision: clamp_axis(confidence),
        }
    })
}

fn clamp_axis(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, AXIS_MAX)
    }
}

/// Sub-millisecond durations render in milliseconds, the rest in seconds.
pub fn format_seconds(seconds: f64) -> String {
    if seconds < 0.001 {
        format!("{:.3} ms", seconds * 1000.0)
    } else {
        format!("{:.6}s", seconds)
    }
}

pub fn format_percent(fraction: f64) -> String {
    format!("{:.2}%", fraction * 100.0)
}
