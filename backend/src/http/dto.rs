//! Data Transfer Objects for the HTTP API.
//!
//! Response bodies are re-exported from [`crate::api`]; the structs here are
//! the query strings and request bodies the handlers extract. List queries
//! reuse the raw query types of [`crate::services`].

use serde::{Deserialize, Serialize};

use crate::models::pagination::{lenient_bool, lenient_i64};

pub use crate::api::{
    CustomerListItem, CustomerSummary, DailyRevenue, ForecastResponse, KpiSummary, OrderDetail,
    OrderListItem, OrderStatusUpdate, Paged, RecentOrders, SegmentsResponse, TopProduct,
};
pub use crate::services::customers::CustomerListQuery;
pub use crate::services::orders::OrderListQuery;

/// Query parameters for the KPI endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct KpiQuery {
    /// `30d` or `90d`; anything else reads as `30d`
    #[serde(default)]
    pub range: Option<String>,
}

/// Query parameters for the sales endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SalesQuery {
    /// Days of history (default 90)
    #[serde(default, deserialize_with = "lenient_i64")]
    pub days: Option<i64>,
    /// Report days without orders as zero revenue
    #[serde(default, deserialize_with = "lenient_bool")]
    pub fill: Option<bool>,
}

/// Query parameters for the recent orders endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RecentOrdersQuery {
    #[serde(default, deserialize_with = "lenient_i64")]
    pub limit: Option<i64>,
}

/// Query parameters for the forecast endpoint.
///
/// Kept as text so malformed numbers surface as `invalid_params` instead of
/// an extractor rejection.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ForecastQuery {
    /// Smoothing factor override, in `(0, 1]`
    #[serde(default)]
    pub alpha: Option<String>,
    /// Projected days override
    #[serde(default)]
    pub horizon: Option<String>,
}

/// Body of `PATCH /v1/orders/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StatusUpdateRequest {
    #[serde(default)]
    pub status: Option<String>,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Whether the repository answered
    pub ok: bool,
    /// Status of the service
    pub status: String,
    /// Version of the API
    pub version: String,
    /// Database connection status
    pub database: String,
}
