//! High-beta leadership indicator (relative-strength ratios)

use super::trend::ratio_trend;
use crate::series::TimeSeries;
use crate::types::{IndicatorResult, Status};

/// Measures whether high-beta assets are leading, via three relative
/// ratios: BTC/SPY, QQQ/DIA, IWM/SPY.
///
/// GREEN if at least two ratios are up over the lookback, RED if at
/// least two are down, YELLOW otherwise (including any mix of flat and
/// insufficient pairs).
pub fn high_beta_leadership(
    btc: &TimeSeries,
    spy: &TimeSeries,
    qqq: &TimeSeries,
    dia: &TimeSeries,
    iwm: &TimeSeries,
    lookback: usize,
    band: f64,
) -> IndicatorResult {
    let pairs: [(&str, &TimeSeries, &TimeSeries); 3] = [
        ("BTC/SPY", btc, spy),
        ("QQQ/DIA", qqq, dia),
        ("IWM/SPY", iwm, spy),
    ];

    let mut ups = 0usize;
    let mut downs = 0usize;
    let mut result = IndicatorResult::new(Status::Yellow);

    for (name, a, b) in pairs {
        let rt = ratio_trend(a, b, lookback, band);
        let leg = match rt.direction {
            1 => {
                ups += 1;
                Status::Green
            }
            -1 => {
                downs += 1;
                Status::Red
            }
            _ => Status::Yellow,
        };
        result = result.with_leg(name, leg);
        if let (Some(start), Some(end)) = (rt.start, rt.end) {
            result = result
                .with_metric(format!("{name}_start"), start)
                .with_metric(format!("{name}_end"), end);
        }
    }

    result.combined = if ups >= 2 {
        Status::Green
    } else if downs >= 2 {
        Status::Red
    } else {
        Status::Yellow
    };
    result = result
        .with_metric("ups", ups as f64)
        .with_metric("downs", downs as f64)
        .with_note(format!(
            "High-beta leadership from {lookback}D relative strength of BTC/SPY, QQQ/DIA, IWM/SPY."
        ));

    result
}
