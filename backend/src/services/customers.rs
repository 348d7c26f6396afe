//! Customer table and customer summary cards.

use chrono::{DateTime, Utc};
use log::debug;
use serde::Deserialize;

use crate::algorithms::segmentation::Segment;
use crate::api::{CustomerListItem, CustomerSummary};
use crate::db::models::{normalize_query, CustomerFilter, CustomerSort};
use crate::db::repository::{FullRepository, RepositoryResult};
use crate::models::pagination::lenient_i64;
use crate::models::{PageRequest, Paged, SortDir, TenantId};

use super::insights::segment_members;

/// Raw customer list query, as sent by the customers page.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerListQuery {
    #[serde(default, deserialize_with = "lenient_i64")]
    pub page: Option<i64>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub page_size: Option<i64>,
    pub sort: Option<String>,
    pub dir: Option<String>,
    pub q: Option<String>,
    pub segment: Option<String>,
}

impl CustomerListQuery {
    /// Segment filter; unknown names are ignored.
    pub fn segment(&self) -> Option<Segment> {
        self.segment.as_deref().and_then(|s| s.parse().ok())
    }

    /// Normalised filter without the segment restriction.
    pub fn to_filter(&self) -> CustomerFilter {
        CustomerFilter {
            query: normalize_query(self.q.as_deref()),
            ids: None,
            sort: CustomerSort::lenient(self.sort.as_deref()),
            dir: SortDir::lenient(self.dir.as_deref()),
            page: PageRequest::clamped(self.page, self.page_size),
        }
    }
}

/// One page of customers.
///
/// With a segment filter the whole tenant is scored first and only members
/// of that segment are listed; an empty segment yields an empty page.
pub async fn list_customers<R: FullRepository + ?Sized>(
    repo: &R,
    tenant: &TenantId,
    query: &CustomerListQuery,
    now: DateTime<Utc>,
) -> RepositoryResult<Paged<CustomerListItem>> {
    let mut filter = query.to_filter();
    if let Some(segment) = query.segment() {
        let members = segment_members(repo, tenant, now, segment).await?;
        debug!(
            "Segment {} of tenant {} has {} customers",
            segment.as_str(),
            tenant,
            members.len()
        );
        if members.is_empty() {
            return Ok(Paged::empty(filter.page));
        }
        filter.ids = Some(members);
    }
    repo.list_customers(tenant, &filter).await
}

/// Total, new/returning split and average lifetime value.
pub async fn customer_summary<R: FullRepository + ?Sized>(
    repo: &R,
    tenant: &TenantId,
) -> RepositoryResult<CustomerSummary> {
    let snapshots = repo.fetch_customer_snapshots(tenant).await?;
    let total = snapshots.len();
    let returning = snapshots.iter().filter(|c| c.orders_count > 1).count();
    let ltv_avg = if total > 0 {
        snapshots.iter().map(|c| c.total_spent).sum::<f64>() / total as f64
    } else {
        0.0
    };
    Ok(CustomerSummary {
        total,
        new_count: total - returning,
        returning,
        ltv_avg,
    })
}

#[cfg(test)]
#[path = "customers_tests.rs"]
mod customers_tests;
