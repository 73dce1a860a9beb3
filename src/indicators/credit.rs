//! Credit stress indicator (US spreads + Canada HY proxy)

use super::trend::{ryg_trend, TrendParams};
use super::combine_legs;
use crate::series::TimeSeries;
use crate::types::IndicatorResult;

/// Credit stress across US and Canada.
///
/// US leg classifies the HY OAS spread directly (widening spreads = RED).
/// The Canada leg classifies an HY ETF *price* series, so its raw colour
/// is inverted: a falling price means rising credit stress.
///
/// `windows` supplies the fast/slow MA windows; each leg applies its own
/// flat band on top.
pub fn credit_stress(
    us_hy_oas: &TimeSeries,
    ca_hy_etf: &TimeSeries,
    windows: &TrendParams,
    us_band: f64,
    ca_band: f64,
) -> IndicatorResult {
    let us = ryg_trend(us_hy_oas, &windows.banded(us_band));
    let ca_raw = ryg_trend(ca_hy_etf, &windows.banded(ca_band));
    let ca_status = ca_raw.status.inverted();

    let combined = combine_legs(&[us.status, ca_status]);

    let mut result = IndicatorResult::new(combined)
        .with_leg("us", us.status)
        .with_leg("ca", ca_status);

    if let (Some(f), Some(s)) = (us.fast_ma, us.slow_ma) {
        result = result.with_metric("us_fast_ma", f).with_metric("us_slow_ma", s);
    }
    if let (Some(f), Some(s)) = (ca_raw.fast_ma, ca_raw.slow_ma) {
        result = result.with_metric("ca_fast_ma", f).with_metric("ca_slow_ma", s);
    }
    if let Some(r) = us.reason.or(ca_raw.reason) {
        result = result.with_reason(r);
    }

    result
}
