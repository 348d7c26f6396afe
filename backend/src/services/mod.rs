//! Service layer behind the dashboard endpoints.
//!
//! Each service normalises the raw query values it is handed, calls the
//! repository through [`crate::db::services`] or the repository traits, and
//! runs the pure transforms from [`crate::algorithms`] over the result.
//! Everything is generic over `R: FullRepository + ?Sized` so the same code
//! serves the in-memory and Postgres backends.

pub mod customers;
pub mod insights;
pub mod kpis;
pub mod orders;
pub mod products;
pub mod sales;

pub use customers::{customer_summary, list_customers, CustomerListQuery};
pub use insights::{forecast, segment_members, segments, ForecastOverrides};
pub use kpis::{compute_kpis, pct_delta, PeriodTotals};
pub use orders::{get_order, list_orders, recent_orders, update_status, OrderListQuery};
pub use products::top_products;
pub use sales::{fill_daily_gaps, sales_series};

#[cfg(test)]
pub(crate) mod fixtures;
