//! Public API surface for the dashboard backend.
//!
//! This file consolidates the DTO types for the HTTP API.
//! All types derive Serialize/Deserialize for JSON serialization and use
//! the camelCase field names the dashboard UI reads.

pub use crate::routes::customers::CustomerListItem;
pub use crate::routes::customers::CustomerSummary;
pub use crate::routes::dashboard::DailyRevenue;
pub use crate::routes::dashboard::KpiSummary;
pub use crate::routes::insights::ForecastResponse;
pub use crate::routes::insights::SegmentsResponse;
pub use crate::routes::orders::OrderCustomerRef;
pub use crate::routes::orders::OrderDetail;
pub use crate::routes::orders::OrderDetailItem;
pub use crate::routes::orders::OrderListItem;
pub use crate::routes::orders::OrderProductRef;
pub use crate::routes::orders::OrderStatusUpdate;
pub use crate::routes::orders::RecentOrder;
pub use crate::routes::orders::RecentOrders;
pub use crate::routes::products::TopProduct;

pub use crate::algorithms::forecast::BandPoint;
pub use crate::algorithms::segmentation::SegmentBuckets;
pub use crate::models::{
    CustomerId, OrderId, OrderItemId, OrderStatus, Paged, ProductId, RangePreset, TenantId,
};
