//! Aggregate queries behind the sales chart and product ranking.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::error::RepositoryResult;
use crate::db::models::{DailyRevenue, TenantId, TopProduct};

/// Repository trait for aggregate reads.
#[async_trait]
pub trait AnalyticsRepository: Send + Sync {
    /// Revenue per UTC day for orders created at or after `since`.
    ///
    /// Ascending by date. Days without any order produce no row.
    async fn daily_revenue(
        &self,
        tenant: &TenantId,
        since: DateTime<Utc>,
    ) -> RepositoryResult<Vec<DailyRevenue>>;

    /// Products ranked by line revenue (`quantity * unit_price`), highest first.
    ///
    /// Products that never sold are not listed.
    async fn top_products(
        &self,
        tenant: &TenantId,
        limit: usize,
    ) -> RepositoryResult<Vec<TopProduct>>;
}
