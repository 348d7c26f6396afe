//! Order table, recent orders, order detail and status changes.

use serde::Deserialize;

use crate::api::{OrderDetail, OrderListItem, OrderStatusUpdate, RecentOrders};
use crate::db::models::{normalize_query, OrderFilter, OrderSort};
use crate::db::repository::{FullRepository, RepositoryError, RepositoryResult};
use crate::db::services as db_services;
use crate::models::date_range::parse_from_to;
use crate::models::pagination::lenient_i64;
use crate::models::{OrderId, OrderStatus, PageRequest, Paged, SortDir, TenantId};

pub const DEFAULT_RECENT_LIMIT: usize = 10;
pub const MAX_RECENT_LIMIT: usize = 50;

/// Raw order list query, as sent by the orders page.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderListQuery {
    #[serde(default, deserialize_with = "lenient_i64")]
    pub page: Option<i64>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub page_size: Option<i64>,
    pub sort: Option<String>,
    pub dir: Option<String>,
    pub q: Option<String>,
    pub status: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
}

impl OrderListQuery {
    /// Normalised filter. Unknown statuses and unparseable dates are
    /// dropped rather than rejected.
    pub fn to_filter(&self) -> OrderFilter {
        let (from, to) = parse_from_to(self.from.as_deref(), self.to.as_deref());
        OrderFilter {
            query: normalize_query(self.q.as_deref()),
            status: self.status.as_deref().and_then(|s| s.parse().ok()),
            from,
            to,
            sort: OrderSort::lenient(self.sort.as_deref()),
            dir: SortDir::lenient(self.dir.as_deref()),
            page: PageRequest::from_raw(self.page, self.page_size),
        }
    }
}

pub async fn list_orders<R: FullRepository + ?Sized>(
    repo: &R,
    tenant: &TenantId,
    query: &OrderListQuery,
) -> RepositoryResult<Paged<OrderListItem>> {
    db_services::list_orders(repo, tenant, &query.to_filter()).await
}

/// Clamp the `limit` query value: absent or non-positive means
/// [`DEFAULT_RECENT_LIMIT`], never more than [`MAX_RECENT_LIMIT`].
pub fn recent_limit(raw: Option<i64>) -> usize {
    raw.filter(|l| *l > 0)
        .map(|l| l as usize)
        .unwrap_or(DEFAULT_RECENT_LIMIT)
        .min(MAX_RECENT_LIMIT)
}

/// Newest orders first.
pub async fn recent_orders<R: FullRepository + ?Sized>(
    repo: &R,
    tenant: &TenantId,
    limit: Option<i64>,
) -> RepositoryResult<RecentOrders> {
    let items = db_services::recent_orders(repo, tenant, recent_limit(limit)).await?;
    Ok(RecentOrders { items })
}

pub async fn get_order<R: FullRepository + ?Sized>(
    repo: &R,
    tenant: &TenantId,
    id: &OrderId,
) -> RepositoryResult<OrderDetail> {
    db_services::get_order(repo, tenant, id).await
}

/// Parse the requested status label; anything but the three exact labels is
/// a validation error.
pub fn parse_status(raw: Option<&str>) -> RepositoryResult<OrderStatus> {
    raw.and_then(|s| s.parse().ok())
        .ok_or_else(|| {
            RepositoryError::validation("status must be one of PENDING, PAID, CANCELLED")
        })
}

/// Set an order's status. The order must belong to `tenant`.
pub async fn update_status<R: FullRepository + ?Sized>(
    repo: &R,
    tenant: &TenantId,
    id: &OrderId,
    status: Option<&str>,
) -> RepositoryResult<OrderStatusUpdate> {
    let status = parse_status(status)?;
    db_services::update_order_status(repo, tenant, id, status).await?;
    Ok(OrderStatusUpdate {
        id: id.clone(),
        status,
    })
}

#[cfg(test)]
#[path = "orders_tests.rs"]
mod orders_tests;
