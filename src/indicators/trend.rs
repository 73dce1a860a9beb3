//! Trend classification - fast/slow moving-average comparison
//!
//! The single classification primitive applied uniformly across the
//! heterogeneous input series. Direction semantics (which colour means
//! stress) are assigned by each caller, not here: for a raw series a
//! rising fast trend relative to the slow trend reads RED and a falling
//! one GREEN.

use crate::series::TimeSeries;
use crate::types::Status;
use serde::{Deserialize, Serialize};

/// Parameters for the fast/slow trend classifier.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TrendParams {
    /// Fast moving-average window (number of points)
    #[serde(default = "default_fast")]
    pub fast: usize,
    /// Slow moving-average window
    #[serde(default = "default_slow")]
    pub slow: usize,
    /// Flat band as a fraction of the slow MA; readings inside
    /// `slow_ma * (1 ± flat_band)` are YELLOW
    #[serde(default = "default_flat_band")]
    pub flat_band: f64,
}

fn default_fast() -> usize {
    5
}
fn default_slow() -> usize {
    20
}
fn default_flat_band() -> f64 {
    0.05
}

impl Default for TrendParams {
    fn default() -> Self {
        Self {
            fast: default_fast(),
            slow: default_slow(),
            flat_band: default_flat_band(),
        }
    }
}

impl TrendParams {
    /// Default windows with an indicator-specific flat band.
    pub fn with_band(flat_band: f64) -> Self {
        Self::default().banded(flat_band)
    }

    /// Same windows, indicator-specific flat band.
    pub fn banded(self, flat_band: f64) -> Self {
        Self { flat_band, ..self }
    }
}

/// Outcome of one trend classification.
#[derive(Debug, Clone, Copy)]
pub struct TrendSignal {
    pub status: Status,
    pub fast_ma: Option<f64>,
    pub slow_ma: Option<f64>,
    pub reason: Option<&'static str>,
}

/// Classify a series as RED/YELLOW/GREEN from its fast vs slow trend.
///
/// Fewer than `slow` valid points returns YELLOW with reason
/// `insufficient_data` - the designated fallback for short history.
/// Pure function: identical input always yields identical output.
pub fn ryg_trend(series: &TimeSeries, params: &TrendParams) -> TrendSignal {
    if series.len() < params.slow {
        return TrendSignal {
            status: Status::Yellow,
            fast_ma: None,
            slow_ma: None,
            reason: Some("insufficient_data"),
        };
    }

    // Both windows over the same cleaned series, unweighted, overlapping.
    // Guarded by the length check above.
    let fast_ma = match series.tail_mean(params.fast) {
        Some(v) => v,
        None => {
            return TrendSignal {
                status: Status::Yellow,
                fast_ma: None,
                slow_ma: None,
                reason: Some("insufficient_data"),
            }
        }
    };
    let slow_ma = match series.tail_mean(params.slow) {
        Some(v) => v,
        None => {
            return TrendSignal {
                status: Status::Yellow,
                fast_ma: Some(fast_ma),
                slow_ma: None,
                reason: Some("insufficient_data"),
            }
        }
    };

    let status = if fast_ma > slow_ma * (1.0 + params.flat_band) {
        Status::Red
    } else if fast_ma < slow_ma * (1.0 - params.flat_band) {
        Status::Green
    } else {
        Status::Yellow
    };

    TrendSignal {
        status,
        fast_ma: Some(fast_ma),
        slow_ma: Some(slow_ma),
        reason: None,
    }
}

/// Direction of a relative-strength ratio over a lookback window.
#[derive(Debug, Clone, Copy)]
pub struct RatioTrend {
    /// +1 ratio up more than the band, -1 down more than the band, 0 flat
    /// or insufficient data
    pub direction: i8,
    pub start: Option<f64>,
    pub end: Option<f64>,
    pub reason: Option<&'static str>,
}

impl RatioTrend {
    fn neutral(reason: &'static str) -> Self {
        Self {
            direction: 0,
            start: None,
            end: None,
            reason: Some(reason),
        }
    }
}

/// Compare the A/B ratio now against `lookback` aligned steps back.
///
/// Series are inner-joined on shared dates; fewer than `lookback + 1`
/// aligned points returns a typed neutral result rather than an error.
/// `band` is the flat fraction (0.01 = ±1%).
pub fn ratio_trend(a: &TimeSeries, b: &TimeSeries, lookback: usize, band: f64) -> RatioTrend {
    if a.len() < lookback + 1 || b.len() < lookback + 1 {
        return RatioTrend::neutral("insufficient_data");
    }

    let aligned = a.align_inner(b);
    if aligned.len() < lookback + 1 {
        return RatioTrend::neutral("insufficient_aligned_data");
    }

    let ratios: Vec<f64> = aligned
        .iter()
        .filter(|(_, _, vb)| *vb != 0.0)
        .map(|(_, va, vb)| va / vb)
        .collect();
    if ratios.len() < lookback + 1 {
        return RatioTrend::neutral("insufficient_aligned_data");
    }

    let start = ratios[ratios.len() - (lookback + 1)];
    let end = ratios[ratios.len() - 1];

    let direction = if end > start * (1.0 + band) {
        1
    } else if end < start * (1.0 - band) {
        -1
    } else {
        0
    };

    RatioTrend {
        direction,
        start: Some(start),
        end: Some(end),
        reason: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::testutil::daily;

    #[test]
    fn test_short_series_is_yellow_insufficient() {
        let s = daily(&[1.0; 19]); // one short of the default slow window
        let sig = ryg_trend(&s, &TrendParams::default());
        assert_eq!(sig.status, Status::Yellow);
        assert_eq!(sig.reason, Some("insufficient_data"));
    }

    #[test]
    fn test_constant_series_is_yellow_for_any_band() {
        let s = daily(&[42.0; 30]);
        for band in [0.0, 0.02, 0.05, 0.5] {
            let sig = ryg_trend(&s, &TrendParams::with_band(band));
            assert_eq!(sig.status, Status::Yellow, "band {band}");
        }
    }

    #[test]
    fn test_rising_series_goes_red() {
        // Steep rise: fast MA ends up well above slow MA * 1.05
        let values: Vec<f64> = (0..30).map(|i| 100.0 + 10.0 * i as f64).collect();
        let sig = ryg_trend(&daily(&values), &TrendParams::default());
        assert_eq!(sig.status, Status::Red);
        assert!(sig.fast_ma.unwrap() > sig.slow_ma.unwrap());
    }

    #[test]
    fn test_falling_series_goes_green() {
        let values: Vec<f64> = (0..30).map(|i| 400.0 - 10.0 * i as f64).collect();
        let sig = ryg_trend(&daily(&values), &TrendParams::default());
        assert_eq!(sig.status, Status::Green);
    }

    #[test]
    fn test_ratio_trend_insufficient() {
        let a = daily(&[1.0; 5]);
        let b = daily(&[1.0; 5]);
        let rt = ratio_trend(&a, &b, 10, 0.01);
        assert_eq!(rt.direction, 0);
        assert_eq!(rt.reason, Some("insufficient_data"));
    }

    #[test]
    fn test_ratio_trend_directions() {
        let flat = daily(&[100.0; 12]);
        let rising: Vec<f64> = (0..12).map(|i| 100.0 + 2.0 * i as f64).collect();
        let falling: Vec<f64> = (0..12).map(|i| 100.0 - 2.0 * i as f64).collect();

        let up = ratio_trend(&daily(&rising), &flat, 10, 0.01);
        assert_eq!(up.direction, 1);
        let down = ratio_trend(&daily(&falling), &flat, 10, 0.01);
        assert_eq!(down.direction, -1);
        let none = ratio_trend(&flat, &flat, 10, 0.01);
        assert_eq!(none.direction, 0);
        assert!(none.reason.is_none());
    }
}
