use crate::api::TopProduct;
use crate::db::repository::{FullRepository, RepositoryResult};
use crate::db::services as db_services;
use crate::models::TenantId;
use crate::routes::products::TOP_PRODUCTS_LIMIT;

/// Best sellers by revenue across all orders, with their margin.
pub async fn top_products<R: FullRepository + ?Sized>(
    repo: &R,
    tenant: &TenantId,
) -> RepositoryResult<Vec<TopProduct>> {
    db_services::top_products(repo, tenant, TOP_PRODUCTS_LIMIT).await
}
