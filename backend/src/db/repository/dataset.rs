//! Bulk loading of tenant data.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::db::models::TenantId;
use crate::db::seed::DemoDataset;

/// Row counts written by [`DatasetRepository::store_dataset`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize)]
pub struct DatasetCounts {
    pub products: usize,
    pub customers: usize,
    pub orders: usize,
    pub order_items: usize,
}

#[async_trait]
pub trait DatasetRepository: Send + Sync {
    /// Replace everything stored for the dataset's tenant with its contents.
    async fn store_dataset(&self, dataset: &DemoDataset) -> RepositoryResult<DatasetCounts>;

    /// Delete all rows owned by `tenant`. Returns the number of orders removed.
    async fn clear_tenant(&self, tenant: &TenantId) -> RepositoryResult<usize>;
}
