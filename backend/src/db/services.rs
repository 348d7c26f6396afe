//! Repository-agnostic database operations.
//!
//! Thin wrappers over the repository traits that add logging and the few
//! invariants every caller wants regardless of backend. The HTTP-facing
//! logic in [`crate::services`] builds on these.
//!
//! # Usage
//!
//! ```no_run
//! use shoplytics::db::{services, repositories::LocalRepository};
//! use shoplytics::models::TenantId;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let repo = LocalRepository::new();
//!     let recent = services::recent_orders(&repo, &TenantId::new("tenant_demo"), 10).await?;
//!     println!("Found {} orders", recent.len());
//!     Ok(())
//! }
//! ```

use chrono::{DateTime, Utc};
use log::{debug, info, warn};

use super::models::{
    DailyRevenue, OrderDetail, OrderFilter, OrderId, OrderListItem, OrderStatus, Paged,
    RecentOrder, TenantId, TopProduct,
};
use super::repository::dataset::DatasetCounts;
use super::repository::{FullRepository, RepositoryResult};
use super::seed::DemoDataset;

// ==================== Health & Connection ====================

/// Check if the database connection is healthy.
pub async fn health_check<R: FullRepository + ?Sized>(repo: &R) -> RepositoryResult<bool> {
    let healthy = repo.health_check().await?;
    if !healthy {
        warn!("Repository reported unhealthy");
    }
    Ok(healthy)
}

// ==================== Orders ====================

pub async fn list_orders<R: FullRepository + ?Sized>(
    repo: &R,
    tenant: &TenantId,
    filter: &OrderFilter,
) -> RepositoryResult<Paged<OrderListItem>> {
    let page = repo.list_orders(tenant, filter).await?;
    debug!(
        "Listed {} of {} orders for tenant {} (page {})",
        page.items.len(),
        page.total,
        tenant,
        page.page
    );
    Ok(page)
}

pub async fn recent_orders<R: FullRepository + ?Sized>(
    repo: &R,
    tenant: &TenantId,
    limit: usize,
) -> RepositoryResult<Vec<RecentOrder>> {
    repo.recent_orders(tenant, limit).await
}

pub async fn get_order<R: FullRepository + ?Sized>(
    repo: &R,
    tenant: &TenantId,
    id: &OrderId,
) -> RepositoryResult<OrderDetail> {
    repo.get_order(tenant, id)
        .await
        .map_err(|e| e.with_operation("get_order"))
}

/// Change an order's status. Unknown orders surface as `NotFound`.
pub async fn update_order_status<R: FullRepository + ?Sized>(
    repo: &R,
    tenant: &TenantId,
    id: &OrderId,
    status: OrderStatus,
) -> RepositoryResult<()> {
    repo.update_order_status(tenant, id, status).await?;
    info!("Order {} of tenant {} set to {}", id, tenant, status);
    Ok(())
}

// ==================== Aggregates ====================

pub async fn daily_revenue<R: FullRepository + ?Sized>(
    repo: &R,
    tenant: &TenantId,
    since: DateTime<Utc>,
) -> RepositoryResult<Vec<DailyRevenue>> {
    let series = repo.daily_revenue(tenant, since).await?;
    debug!(
        "Daily revenue for tenant {} since {}: {} days",
        tenant,
        since,
        series.len()
    );
    Ok(series)
}

pub async fn top_products<R: FullRepository + ?Sized>(
    repo: &R,
    tenant: &TenantId,
    limit: usize,
) -> RepositoryResult<Vec<TopProduct>> {
    repo.top_products(tenant, limit).await
}

// ==================== Seeding ====================

/// Replace a tenant's data with `dataset`.
pub async fn store_dataset<R: FullRepository + ?Sized>(
    repo: &R,
    dataset: &DemoDataset,
) -> RepositoryResult<DatasetCounts> {
    info!(
        "Storing dataset for tenant {}: {} products, {} customers, {} orders",
        dataset.tenant_id,
        dataset.products.len(),
        dataset.customers.len(),
        dataset.orders.len()
    );
    let counts = repo.store_dataset(dataset).await?;
    info!(
        "Dataset stored for tenant {} ({} order items)",
        dataset.tenant_id, counts.order_items
    );
    Ok(counts)
}
