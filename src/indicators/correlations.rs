//! Asset correlation indicator - average pairwise return correlation

use crate::series::TimeSeries;
use crate::types::{IndicatorResult, Status};
use chrono::NaiveDate;
use std::collections::BTreeSet;

/// Thresholds for the correlation regime classification.
#[derive(Debug, Clone, Copy)]
pub struct CorrelationParams {
    /// Number of daily return rows to correlate over
    pub lookback: usize,
    /// Average correlation at or above this reads RED (forced selling)
    pub red_threshold: f64,
    /// Average correlation at or below this reads GREEN (dispersion)
    pub green_threshold: f64,
    /// Minimum number of usable asset series
    pub min_assets: usize,
}

impl Default for CorrelationParams {
    fn default() -> Self {
        Self {
            lookback: 10,
            red_threshold: 0.75,
            green_threshold: 0.55,
            min_assets: 3,
        }
    }
}

/// Average pairwise Pearson correlation of daily returns across assets.
///
/// High average correlation implies forced selling / risk-off; low
/// implies dispersion. Fewer than `min_assets` usable series, or fewer
/// than `lookback` aligned return rows, degrades to YELLOW with a reason.
pub fn asset_correlations(
    series: &[(&str, &TimeSeries)],
    params: &CorrelationParams,
) -> IndicatorResult {
    let usable: Vec<(&str, &TimeSeries)> = series
        .iter()
        .filter(|(_, s)| !s.is_empty())
        .copied()
        .collect();

    if usable.len() < params.min_assets {
        return IndicatorResult::fallback("insufficient_data");
    }

    // Dates present in every usable series
    let mut common: BTreeSet<NaiveDate> = usable[0].1.points().iter().map(|(d, _)| *d).collect();
    for (_, s) in usable.iter().skip(1) {
        let dates: BTreeSet<NaiveDate> = s.points().iter().map(|(d, _)| *d).collect();
        common = common.intersection(&dates).copied().collect();
    }

    // lookback returns need lookback + 1 price rows; +1 more to mirror
    // the short-history guard on the raw matrix
    if common.len() < params.lookback + 2 {
        return IndicatorResult::fallback("insufficient_data");
    }

    let dates: Vec<NaiveDate> = common.into_iter().collect();
    let mut returns: Vec<Vec<f64>> = Vec::with_capacity(usable.len());
    for (_, s) in &usable {
        let values: Vec<f64> = s
            .points()
            .iter()
            .filter(|(d, _)| dates.binary_search(d).is_ok())
            .map(|(_, v)| *v)
            .collect();
        let mut rets: Vec<f64> = values
            .windows(2)
            .map(|w| if w[0] != 0.0 { w[1] / w[0] - 1.0 } else { 0.0 })
            .collect();
        let keep = rets.len().saturating_sub(params.lookback);
        rets.drain(..keep);
        returns.push(rets);
    }

    if returns.iter().any(|r| r.len() < params.lookback) {
        return IndicatorResult::fallback("insufficient_aligned_data");
    }

    // Upper triangle, excluding the diagonal; zero-variance pairs skipped
    let mut values = Vec::new();
    for i in 0..returns.len() {
        for j in (i + 1)..returns.len() {
            if let Some(c) = pearson(&returns[i], &returns[j]) {
                values.push(c);
            }
        }
    }

    if values.is_empty() {
        return IndicatorResult::fallback("no_corr_values");
    }

    let avg_corr = values.iter().sum::<f64>() / values.len() as f64;

    let combined = if avg_corr >= params.red_threshold {
        Status::Red
    } else if avg_corr <= params.green_threshold {
        Status::Green
    } else {
        Status::Yellow
    };

    IndicatorResult::new(combined)
        .with_metric("avg_corr", avg_corr)
        .with_metric("assets_used", usable.len() as f64)
        .with_metric("lookback_days", params.lookback as f64)
        .with_note(format!(
            "Average pairwise correlation across {}: higher implies forced selling.",
            usable
                .iter()
                .map(|(n, _)| *n)
                .collect::<Vec<_>>()
                .join(", ")
        ))
}

/// Pearson correlation of two equal-length samples. None when either
/// sample has zero variance.
fn pearson(x: &[f64], y: &[f64]) -> Option<f64> {
    let n = x.len().min(y.len());
    if n < 2 {
        return None;
    }
    let mx = x[..n].iter().sum::<f64>() / n as f64;
    let my = y[..n].iter().sum::<f64>() / n as f64;

    let mut cov = 0.0;
    let mut vx = 0.0;
    let mut vy = 0.0;
    for i in 0..n {
        let dx = x[i] - mx;
        let dy = y[i] - my;
        cov += dx * dy;
        vx += dx * dx;
        vy += dy * dy;
    }
    if vx == 0.0 || vy == 0.0 {
        return None;
    }
    Some(cov / (vx.sqrt() * vy.sqrt()))
}
