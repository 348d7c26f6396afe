//! Pure numeric transforms behind the insights endpoints.
//!
//! - [`quantile`]: nearest-rank cut points and low/mid/high bucketing
//! - [`segmentation`]: composite recency/spend/frequency customer scoring
//! - [`forecast`]: exponential smoothing revenue projection
//!
//! Everything here is synchronous and side-effect free; callers hand in a
//! snapshot and get fresh values back.

pub mod forecast;
pub mod quantile;
pub mod segmentation;

pub use forecast::{exp_smooth, forecast, BandPoint, Forecast, ForecastParams};
pub use quantile::{bucketize, classify, quantile, Bucket, CutPoints};
pub use segmentation::{
    label_customers, score_customers, CustomerAggregate, LabeledCustomer, Segment,
    SegmentBuckets, SegmentationResult,
};
