//! Order repository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::error::RepositoryResult;
use crate::db::models::{
    OrderDetail, OrderFilter, OrderId, OrderListItem, OrderStatus, Paged, RecentOrder, TenantId,
};

/// Repository trait for order reads and status changes.
///
/// Every call is scoped by tenant: an order id belonging to another tenant
/// behaves exactly like a missing one.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// One page of orders matching `filter`, with the matching total.
    async fn list_orders(
        &self,
        tenant: &TenantId,
        filter: &OrderFilter,
    ) -> RepositoryResult<Paged<OrderListItem>>;

    /// Newest `limit` orders, newest first.
    async fn recent_orders(
        &self,
        tenant: &TenantId,
        limit: usize,
    ) -> RepositoryResult<Vec<RecentOrder>>;

    /// Order with customer and line items.
    ///
    /// # Returns
    /// * `Err(RepositoryError::NotFound)` - If the order doesn't exist for this tenant
    async fn get_order(&self, tenant: &TenantId, id: &OrderId) -> RepositoryResult<OrderDetail>;

    /// Set an order's status.
    ///
    /// # Returns
    /// * `Err(RepositoryError::NotFound)` - If the order doesn't exist for this tenant
    async fn update_order_status(
        &self,
        tenant: &TenantId,
        id: &OrderId,
        status: OrderStatus,
    ) -> RepositoryResult<()>;

    /// Totals of orders created in `[from, to)`; an open `to` means no upper bound.
    async fn order_totals_between(
        &self,
        tenant: &TenantId,
        from: DateTime<Utc>,
        to: Option<DateTime<Utc>>,
    ) -> RepositoryResult<Vec<f64>>;
}
