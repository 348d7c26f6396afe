use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::RangePreset;

/// Headline figures for the dashboard over one range, with deltas against
/// the immediately preceding window of the same length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KpiSummary {
    pub range: RangePreset,
    pub revenue: f64,
    pub orders: usize,
    pub aov: f64,
    /// Percent of demo sessions that converted into an order.
    pub conversion: f64,
    pub delta_revenue_pct: Option<f64>,
    pub delta_orders_pct: Option<f64>,
    pub delta_aov_pct: Option<f64>,
    pub delta_conversion_pct: Option<f64>,
}

/// Revenue summed over one UTC calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRevenue {
    pub date: NaiveDate,
    pub revenue: f64,
}

impl DailyRevenue {
    pub fn new(date: NaiveDate, revenue: f64) -> Self {
        Self { date, revenue }
    }
}

pub const GET_KPIS: &str = "get_kpis";
pub const GET_SALES: &str = "get_sales";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_daily_revenue_serializes_plain_date() {
        let day = DailyRevenue::new(NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(), 1234.5);
        let json = serde_json::to_value(&day).unwrap();
        assert_eq!(json["date"], "2025-07-01");
        assert_eq!(json["revenue"], 1234.5);
    }

    #[test]
    fn test_kpi_summary_camel_case() {
        let summary = KpiSummary {
            range: RangePreset::Last90Days,
            revenue: 10.0,
            orders: 2,
            aov: 5.0,
            conversion: 0.002,
            delta_revenue_pct: None,
            delta_orders_pct: Some(100.0),
            delta_aov_pct: None,
            delta_conversion_pct: None,
        };
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["range"], "90d");
        assert!(json["deltaRevenuePct"].is_null());
        assert_eq!(json["deltaOrdersPct"], 100.0);
    }
}
