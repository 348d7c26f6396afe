//! Daily revenue series for the sales chart.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use std::collections::BTreeMap;

use crate::api::DailyRevenue;
use crate::db::repository::{FullRepository, RepositoryResult};
use crate::db::services as db_services;
use crate::models::TenantId;

pub const DEFAULT_SALES_DAYS: i64 = 90;
pub const MAX_SALES_DAYS: i64 = 730;

/// Normalise the `days` query value: absent or non-positive means the
/// default, anything above [`MAX_SALES_DAYS`] is capped.
pub fn sales_days(raw: Option<i64>) -> i64 {
    raw.filter(|d| *d > 0)
        .unwrap_or(DEFAULT_SALES_DAYS)
        .min(MAX_SALES_DAYS)
}

/// Revenue per UTC day for orders created since `now - days`.
///
/// Days without orders are absent unless `fill` is set, in which case they
/// are reported with zero revenue up to and including `now`'s day.
pub async fn sales_series<R: FullRepository + ?Sized>(
    repo: &R,
    tenant: &TenantId,
    days: i64,
    now: DateTime<Utc>,
    fill: bool,
) -> RepositoryResult<Vec<DailyRevenue>> {
    let since = now - Duration::days(days);
    let series = db_services::daily_revenue(repo, tenant, since).await?;
    if !fill {
        return Ok(series);
    }
    Ok(fill_daily_gaps(&series, since.date_naive(), now.date_naive()))
}

/// Dense series over `[from, to]` with missing days set to zero revenue.
///
/// Points outside the range are dropped; duplicate dates are summed.
pub fn fill_daily_gaps(
    series: &[DailyRevenue],
    from: NaiveDate,
    to: NaiveDate,
) -> Vec<DailyRevenue> {
    let mut by_day: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for point in series {
        if point.date >= from && point.date <= to {
            *by_day.entry(point.date).or_insert(0.0) += point.revenue;
        }
    }
    from.iter_days()
        .take_while(|d| *d <= to)
        .map(|d| DailyRevenue::new(d, by_day.get(&d).copied().unwrap_or(0.0)))
        .collect()
}
