//! Single-parameter exponential smoothing with a flat projection.
//!
//! The smoothed level after the last observation is repeated for every day
//! of the horizon; no trend or seasonality is extrapolated. A crude
//! confidence band of one sample standard deviation (taken over the trailing
//! window of the history) can be attached, with the lower edge floored at
//! zero because revenue cannot be negative.

use serde::{Deserialize, Serialize};

pub const DEFAULT_ALPHA: f64 = 0.4;
pub const DEFAULT_HORIZON: usize = 30;
pub const DEFAULT_BAND_WINDOW: usize = 30;

/// Tuning knobs for [`forecast`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastParams {
    /// Smoothing factor in `(0, 1]`.
    pub alpha: f64,
    /// Number of projected points.
    pub horizon: usize,
    /// Trailing observations used for the band; `0` disables the band.
    pub band_window: usize,
}

impl Default for ForecastParams {
    fn default() -> Self {
        Self {
            alpha: DEFAULT_ALPHA,
            horizon: DEFAULT_HORIZON,
            band_window: DEFAULT_BAND_WINDOW,
        }
    }
}

impl ForecastParams {
    pub fn validate(&self) -> Result<(), String> {
        if !(self.alpha > 0.0 && self.alpha <= 1.0) {
            return Err(format!("alpha must be in (0, 1], got {}", self.alpha));
        }
        if self.horizon == 0 {
            return Err("horizon must be positive".to_string());
        }
        Ok(())
    }
}

/// One point of the confidence band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandPoint {
    pub low: f64,
    pub high: f64,
}

/// Projected values with an optional band of the same length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub values: Vec<f64>,
    pub band: Option<Vec<BandPoint>>,
}

/// Final smoothed level of `series`, or `None` when it is empty.
pub fn smoothed_level(series: &[f64], alpha: f64) -> Option<f64> {
    let (first, rest) = series.split_first()?;
    Some(rest.iter().fold(*first, |s, &x| alpha * x + (1.0 - alpha) * s))
}

/// Flat `horizon`-day projection of the smoothed level (zeros for no history).
pub fn exp_smooth(series: &[f64], alpha: f64, horizon: usize) -> Vec<f64> {
    let level = smoothed_level(series, alpha).unwrap_or(0.0);
    vec![level; horizon]
}

/// Mean and sample standard deviation of the last `window` values.
///
/// Fewer than two values give a standard deviation of `0.0` instead of
/// dividing by zero; an empty window also has a mean of `0.0`.
pub fn trailing_stats(series: &[f64], window: usize) -> (f64, f64) {
    let start = series.len().saturating_sub(window);
    let recent = &series[start..];
    if recent.is_empty() {
        return (0.0, 0.0);
    }
    let n = recent.len() as f64;
    let mean = recent.iter().sum::<f64>() / n;
    if recent.len() < 2 {
        return (mean, 0.0);
    }
    let var = recent.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1.0);
    (mean, var.sqrt())
}

pub fn trailing_std_dev(series: &[f64], window: usize) -> f64 {
    trailing_stats(series, window).1
}

/// `[y - sd, y + sd]` around every projected value, low edge floored at 0.
pub fn confidence_band(values: &[f64], sd: f64) -> Vec<BandPoint> {
    values
        .iter()
        .map(|&y| BandPoint {
            low: (y - sd).max(0.0),
            high: y + sd,
        })
        .collect()
}

/// Smooth, project and (when `band_window > 0`) attach the band.
pub fn forecast(series: &[f64], params: &ForecastParams) -> Forecast {
    let values = exp_smooth(series, params.alpha, params.horizon);
    let band = (params.band_window > 0).then(|| {
        let sd = trailing_std_dev(series, params.band_window);
        confidence_band(&values, sd)
    });
    Forecast { values, band }
}

#[cfg(test)]
#[path = "forecast_tests.rs"]
mod forecast_tests;
