use serde::{Deserialize, Serialize};

use crate::algorithms::{BandPoint, SegmentBuckets};
use crate::routes::dashboard::DailyRevenue;

/// Customer counts per value segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentsResponse {
    pub buckets: SegmentBuckets,
}

/// Revenue history, point forecast and confidence band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResponse {
    /// Daily revenue over the history window. Days without orders are absent.
    pub last90: Vec<DailyRevenue>,
    pub forecast: Vec<f64>,
    pub band: Vec<BandPoint>,
}

pub const GET_SEGMENTS: &str = "get_segments";
pub const GET_FORECAST: &str = "get_forecast";
