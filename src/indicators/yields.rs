//! Real yields indicator (US real 10Y + Canada nominal proxy)

use super::combine_legs;
use super::trend::{ryg_trend, TrendParams};
use crate::series::TimeSeries;
use crate::types::IndicatorResult;

/// Real-yield trend across US and Canada.
///
/// US: real 10Y yield (rising = tighter conditions). Canada: nominal 10Y
/// yield direction as a proxy until a clean real-yield series is wired.
/// Neither leg is inverted. RED if either leg is RED, GREEN only if both.
pub fn real_yields(
    us_real_10y: &TimeSeries,
    ca_10y_nominal: &TimeSeries,
    windows: &TrendParams,
    flat_band: f64,
) -> IndicatorResult {
    let params = windows.banded(flat_band);
    let us = ryg_trend(us_real_10y, &params);
    let ca = ryg_trend(ca_10y_nominal, &params);

    let combined = combine_legs(&[us.status, ca.status]);

    let mut result = IndicatorResult::new(combined)
        .with_leg("us", us.status)
        .with_leg("ca", ca.status)
        .with_note("Canada leg is a proxy (10Y nominal yield trend).");

    if let (Some(f), Some(s)) = (us.fast_ma, us.slow_ma) {
        result = result.with_metric("us_fast_ma", f).with_metric("us_slow_ma", s);
    }
    if let (Some(f), Some(s)) = (ca.fast_ma, ca.slow_ma) {
        result = result.with_metric("ca_fast_ma", f).with_metric("ca_slow_ma", s);
    }
    if let Some(r) = us.reason.or(ca.reason) {
        result = result.with_reason(r);
    }

    result
}
