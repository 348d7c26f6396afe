//! Customer segments and the revenue forecast.

use chrono::{DateTime, Duration, Utc};
use log::{debug, info};
use std::collections::HashSet;

use crate::algorithms::segmentation::{
    label_customers, score_customers, CustomerAggregate, Segment,
};
use crate::algorithms::{self, ForecastParams};
use crate::api::{ForecastResponse, SegmentsResponse};
use crate::db::repository::{FullRepository, RepositoryError, RepositoryResult};
use crate::db::services as db_services;
use crate::models::{CustomerId, TenantId};

/// Longest projection a caller may request.
pub const MAX_FORECAST_HORIZON: usize = 365;

/// Per-request overrides of the configured forecast parameters.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ForecastOverrides {
    pub alpha: Option<f64>,
    pub horizon: Option<usize>,
}

impl ForecastOverrides {
    /// Read raw query text. Blank values count as absent; anything that is
    /// not a number (or, for the horizon, a non-negative integer) is a
    /// validation error.
    pub fn parse(alpha: Option<&str>, horizon: Option<&str>) -> RepositoryResult<Self> {
        let alpha = match non_blank(alpha) {
            Some(raw) => Some(raw.parse::<f64>().map_err(|_| {
                RepositoryError::validation(format!("alpha must be a number, got {:?}", raw))
            })?),
            None => None,
        };
        let horizon = match non_blank(horizon) {
            Some(raw) => Some(raw.parse::<usize>().map_err(|_| {
                RepositoryError::validation(format!(
                    "horizon must be a positive integer, got {:?}",
                    raw
                ))
            })?),
            None => None,
        };
        Ok(Self { alpha, horizon })
    }

    /// Merge onto `base` and validate the result.
    pub fn apply(&self, base: ForecastParams) -> RepositoryResult<ForecastParams> {
        let params = ForecastParams {
            alpha: self.alpha.unwrap_or(base.alpha),
            horizon: self.horizon.unwrap_or(base.horizon),
            band_window: base.band_window,
        };
        params.validate().map_err(RepositoryError::validation)?;
        if params.horizon > MAX_FORECAST_HORIZON {
            return Err(RepositoryError::validation(format!(
                "horizon must be at most {}, got {}",
                MAX_FORECAST_HORIZON, params.horizon
            )));
        }
        Ok(params)
    }
}

fn non_blank(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|v| !v.is_empty())
}

async fn customer_aggregates<R: FullRepository + ?Sized>(
    repo: &R,
    tenant: &TenantId,
    now: DateTime<Utc>,
) -> RepositoryResult<Vec<CustomerAggregate>> {
    let snapshots = repo.fetch_customer_snapshots(tenant).await?;
    Ok(snapshots
        .iter()
        .map(|s| CustomerAggregate::from_snapshot(s, now))
        .collect())
}

/// Low/mid/high customer counts over the whole tenant.
pub async fn segments<R: FullRepository + ?Sized>(
    repo: &R,
    tenant: &TenantId,
    now: DateTime<Utc>,
) -> RepositoryResult<SegmentsResponse> {
    let rows = customer_aggregates(repo, tenant, now).await?;
    let result = score_customers(&rows);
    debug!(
        "Segments for tenant {}: low={} mid={} high={}",
        tenant, result.buckets.low, result.buckets.mid, result.buckets.high
    );
    Ok(SegmentsResponse {
        buckets: result.buckets,
    })
}

/// Ids of the customers that fall into `segment`, scored against the full
/// tenant population.
pub async fn segment_members<R: FullRepository + ?Sized>(
    repo: &R,
    tenant: &TenantId,
    now: DateTime<Utc>,
    segment: Segment,
) -> RepositoryResult<HashSet<CustomerId>> {
    let rows = customer_aggregates(repo, tenant, now).await?;
    Ok(label_customers(&rows)
        .into_iter()
        .filter(|c| c.segment() == segment)
        .map(|c| c.customer.id)
        .collect())
}

/// Daily revenue for the last `history_days` plus a flat exponential
/// smoothing projection and its band.
///
/// The history is the sparse series as stored; days without orders are not
/// filled in before smoothing.
pub async fn forecast<R: FullRepository + ?Sized>(
    repo: &R,
    tenant: &TenantId,
    now: DateTime<Utc>,
    history_days: i64,
    params: ForecastParams,
) -> RepositoryResult<ForecastResponse> {
    params.validate().map_err(RepositoryError::validation)?;
    let since = now - Duration::days(history_days.max(1));
    let history = db_services::daily_revenue(repo, tenant, since).await?;
    let series: Vec<f64> = history.iter().map(|p| p.revenue).collect();
    let projected = algorithms::forecast(&series, &params);
    info!(
        "Forecast for tenant {}: {} history days, horizon {}, alpha {}",
        tenant,
        series.len(),
        params.horizon,
        params.alpha
    );
    Ok(ForecastResponse {
        last90: history,
        forecast: projected.values,
        band: projected.band.unwrap_or_default(),
    })
}

#[cfg(test)]
#[path = "insights_tests.rs"]
mod insights_tests;
