//! Headline KPIs for the dashboard cards.

use chrono::{DateTime, Duration, Utc};
use log::debug;

use crate::api::KpiSummary;
use crate::db::repository::{FullRepository, RepositoryResult};
use crate::models::{RangePreset, TenantId};

/// Revenue, order count, AOV and conversion over one window.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PeriodTotals {
    pub revenue: f64,
    pub orders: usize,
    pub aov: f64,
    /// Percentage of `sessions` that produced an order.
    pub conversion: f64,
}

impl PeriodTotals {
    pub fn from_totals(totals: &[f64], sessions: u64) -> Self {
        let revenue: f64 = totals.iter().sum();
        let orders = totals.len();
        let aov = if orders > 0 {
            revenue / orders as f64
        } else {
            0.0
        };
        let conversion = if sessions > 0 {
            orders as f64 / sessions as f64 * 100.0
        } else {
            0.0
        };
        Self {
            revenue,
            orders,
            aov,
            conversion,
        }
    }
}

/// Relative change from `prev` to `curr` in percent.
///
/// `None` when there is no usable baseline (`prev` zero or not finite).
pub fn pct_delta(curr: f64, prev: f64) -> Option<f64> {
    if !prev.is_finite() || prev == 0.0 {
        return None;
    }
    Some((curr - prev) / prev * 100.0)
}

/// KPI summary for `preset`, compared against the window of equal length
/// immediately before it.
///
/// The current window is `[now - days, now)` and the previous one
/// `[now - 2*days, now - days)`. Sessions are synthetic
/// (`days * sessions_per_day`) since no traffic data is stored.
pub async fn compute_kpis<R: FullRepository + ?Sized>(
    repo: &R,
    tenant: &TenantId,
    preset: RangePreset,
    now: DateTime<Utc>,
    sessions_per_day: u32,
) -> RepositoryResult<KpiSummary> {
    let days = preset.days();
    let since_current = now - Duration::days(days);
    let since_previous = now - Duration::days(2 * days);

    let current = repo
        .order_totals_between(tenant, since_current, Some(now))
        .await?;
    let previous = repo
        .order_totals_between(tenant, since_previous, Some(since_current))
        .await?;

    let sessions = days as u64 * u64::from(sessions_per_day);
    let cur = PeriodTotals::from_totals(&current, sessions);
    let prev = PeriodTotals::from_totals(&previous, sessions);
    debug!(
        "KPIs for tenant {} ({}): {} orders now, {} before",
        tenant,
        preset.as_str(),
        cur.orders,
        prev.orders
    );

    Ok(KpiSummary {
        range: preset,
        revenue: cur.revenue,
        orders: cur.orders,
        aov: cur.aov,
        conversion: cur.conversion,
        delta_revenue_pct: pct_delta(cur.revenue, prev.revenue),
        delta_orders_pct: pct_delta(cur.orders as f64, prev.orders as f64),
        delta_aov_pct: pct_delta(cur.aov, prev.aov),
        delta_conversion_pct: pct_delta(cur.conversion, prev.conversion),
    })
}

#[cfg(test)]
#[path = "kpis_tests.rs"]
mod kpis_tests;
