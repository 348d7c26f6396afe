//! RFM-style customer segmentation.
//!
//! Each customer is bucketed on three metrics (recency, total spend, order
//! count) against cut points drawn from the population passed in, and the
//! buckets are folded into one composite score:
//!
//! ```text
//! score = bucket(total) + bucket(orders) - bucket(recency)      in [-2, 4]
//!
//! score <= 0  -> low value
//! score == 1  -> mid value
//! score >= 2  -> high value
//! ```
//!
//! Recency is "days since", so a stale customer lands in the high recency
//! bucket and is penalised the most.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::quantile::{bucketize, Bucket, CutPoints};
use crate::models::customer::CustomerSnapshot;
use crate::models::date_range::days_between;
use crate::models::ids::CustomerId;

/// Per-customer inputs to the scorer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerAggregate {
    pub id: CustomerId,
    pub total: f64,
    pub orders: i64,
    /// Days since the reference event, never below 1.
    pub recency: i64,
}

impl CustomerAggregate {
    /// Build the aggregate from a stored snapshot, measuring recency at `now`.
    pub fn from_snapshot(snapshot: &CustomerSnapshot, now: DateTime<Utc>) -> Self {
        Self {
            id: snapshot.id.clone(),
            total: snapshot.total_spent,
            orders: snapshot.orders_count,
            recency: days_between(now, snapshot.created_at).max(1),
        }
    }
}

/// Composite value class of a customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Segment {
    Low,
    Mid,
    High,
}

impl Segment {
    pub fn from_score(score: i32) -> Self {
        match score {
            s if s <= 0 => Self::Low,
            1 => Self::Mid,
            _ => Self::High,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Mid => "mid",
            Self::High => "high",
        }
    }
}

impl FromStr for Segment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Self::Low),
            "mid" => Ok(Self::Mid),
            "high" => Ok(Self::High),
            other => Err(format!("Unknown segment: {}", other)),
        }
    }
}

/// A customer aggregate together with its three metric buckets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledCustomer {
    #[serde(flatten)]
    pub customer: CustomerAggregate,
    pub seg_rec: Bucket,
    pub seg_tot: Bucket,
    pub seg_ord: Bucket,
}

impl LabeledCustomer {
    pub fn score(&self) -> i32 {
        self.seg_tot.value() + self.seg_ord.value() - self.seg_rec.value()
    }

    pub fn segment(&self) -> Segment {
        Segment::from_score(self.score())
    }
}

/// Number of customers per segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SegmentBuckets {
    pub low: usize,
    pub mid: usize,
    pub high: usize,
}

impl SegmentBuckets {
    pub fn record(&mut self, segment: Segment) {
        match segment {
            Segment::Low => self.low += 1,
            Segment::Mid => self.mid += 1,
            Segment::High => self.high += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.low + self.mid + self.high
    }
}

/// Output of [`score_customers`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentationResult {
    pub buckets: SegmentBuckets,
    pub labeled: Vec<LabeledCustomer>,
}

/// Cut points for each of the three metrics over one population.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MetricCuts {
    pub recency: CutPoints,
    pub total: CutPoints,
    pub orders: CutPoints,
}

impl MetricCuts {
    pub fn from_population(rows: &[CustomerAggregate]) -> Self {
        let recency: Vec<f64> = rows.iter().map(|r| r.recency as f64).collect();
        let total: Vec<f64> = rows.iter().map(|r| r.total).collect();
        let orders: Vec<f64> = rows.iter().map(|r| r.orders as f64).collect();
        Self {
            recency: bucketize(&recency),
            total: bucketize(&total),
            orders: bucketize(&orders),
        }
    }

    pub fn label(&self, row: &CustomerAggregate) -> LabeledCustomer {
        LabeledCustomer {
            customer: row.clone(),
            seg_rec: self.recency.classify(row.recency as f64),
            seg_tot: self.total.classify(row.total),
            seg_ord: self.orders.classify(row.orders as f64),
        }
    }
}

/// Attach the three metric buckets to every customer.
pub fn label_customers(rows: &[CustomerAggregate]) -> Vec<LabeledCustomer> {
    if rows.is_empty() {
        return Vec::new();
    }
    let cuts = MetricCuts::from_population(rows);
    rows.iter().map(|r| cuts.label(r)).collect()
}

/// Label every customer and count how many fall into each segment.
pub fn score_customers(rows: &[CustomerAggregate]) -> SegmentationResult {
    let labeled = label_customers(rows);
    let mut buckets = SegmentBuckets::default();
    for customer in &labeled {
        buckets.record(customer.segment());
    }
    SegmentationResult { buckets, labeled }
}

#[cfg(test)]
#[path = "segmentation_tests.rs"]
mod segmentation_tests;
