//! Nearest-rank quantiles and three-way bucketing.
//!
//! Cut points are taken from the observed population itself, so the same
//! value can land in different buckets as the population changes. Values are
//! never interpolated: the quantile is always one of the observations.

use serde::{Deserialize, Serialize};

/// Lower cut (33rd percentile).
pub const LOWER_QUANTILE: f64 = 0.33;
/// Upper cut (66th percentile).
pub const UPPER_QUANTILE: f64 = 0.66;

/// Ordinal class of an observation relative to its population.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bucket {
    Low = 0,
    Mid = 1,
    High = 2,
}

impl Bucket {
    pub fn value(&self) -> i32 {
        *self as i32
    }
}

impl From<Bucket> for i32 {
    fn from(b: Bucket) -> Self {
        b.value()
    }
}

/// 33rd / 66th percentile cut points of a population.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CutPoints {
    pub cut33: f64,
    pub cut66: f64,
}

impl CutPoints {
    /// Classify `v` against these cut points.
    pub fn classify(&self, v: f64) -> Bucket {
        classify(v, self)
    }
}

/// Nearest-rank quantile of `values` at probability `p`.
///
/// The input is not reordered; a sorted copy is used. Index is
/// `floor((n - 1) * p)` clamped into range. An empty slice yields `0.0`.
pub fn quantile(values: &[f64], p: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    sorted[rank_index(sorted.len(), p)]
}

fn rank_index(n: usize, p: f64) -> usize {
    let raw = ((n - 1) as f64 * p).floor();
    if raw.is_nan() || raw < 0.0 {
        0
    } else {
        (raw as usize).min(n - 1)
    }
}

/// Compute both cut points with a single sort.
pub fn bucketize(values: &[f64]) -> CutPoints {
    if values.is_empty() {
        return CutPoints::default();
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let n = sorted.len();
    CutPoints {
        cut33: sorted[rank_index(n, LOWER_QUANTILE)],
        cut66: sorted[rank_index(n, UPPER_QUANTILE)],
    }
}

/// `v <= cut33` is low, `v <= cut66` is mid, anything above is high.
/// Values equal to a cut point fall into the lower bucket.
pub fn classify(v: f64, cuts: &CutPoints) -> Bucket {
    if v <= cuts.cut33 {
        Bucket::Low
    } else if v <= cuts.cut66 {
        Bucket::Mid
    } else {
        Bucket::High
    }
}
