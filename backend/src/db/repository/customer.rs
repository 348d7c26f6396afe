//! Customer repository trait.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::db::models::{CustomerFilter, CustomerListItem, CustomerSnapshot, Paged, TenantId};

/// Repository trait for customer reads.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait CustomerRepository: Send + Sync {
    // ==================== Health & Connection ====================

    /// Check if the backing store is reachable.
    ///
    /// # Returns
    /// - `Ok(true)` if connection is healthy
    /// - `Ok(false)` if connection is unhealthy but no error occurred
    /// - `Err(RepositoryError)` if an error occurred during the check
    async fn health_check(&self) -> RepositoryResult<bool>;

    // ==================== Customers ====================

    /// One page of a tenant's customers.
    ///
    /// Filtering (email search, id restriction) is applied before counting, so
    /// `total` is the number of matching customers, not the tenant size.
    async fn list_customers(
        &self,
        tenant: &TenantId,
        filter: &CustomerFilter,
    ) -> RepositoryResult<Paged<CustomerListItem>>;

    /// Every customer of a tenant, reduced to the fields the scorer needs.
    async fn fetch_customer_snapshots(
        &self,
        tenant: &TenantId,
    ) -> RepositoryResult<Vec<CustomerSnapshot>>;
}
