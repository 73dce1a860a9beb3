//! Report rendering - plain-text subject and body for delivery

use chrono::Utc;

use crate::engine::DashboardReport;
use crate::indicators::names;
use crate::types::Status;

fn status_glyph(status: Status) -> &'static str {
    match status {
        Status::Red => "\u{1F534}",    // red circle
        Status::Yellow => "\u{1F7E1}", // yellow circle
        Status::Green => "\u{1F7E2}",  // green circle
    }
}

fn display_name(key: &str) -> &'static str {
    match key {
        names::CREDIT_STRESS => "1. Credit Stress (US+CA)",
        names::POLICY_ACTIONS => "2. Policy Actions (BoC+Fed)",
        names::ASSET_CORRELATIONS => "3. Asset Correlations",
        names::REAL_YIELDS => "4. Real Yields (US+CA)",
        names::BAD_NEWS_REACTION => "5. Bad News Reaction",
        names::HIGH_BETA => "6. High-Beta Leadership",
        _ => "Indicator",
    }
}

/// Commentary keyed off the credit indicator, the most common
/// failure-point for early risk-on attempts.
fn commentary(report: &DashboardReport) -> Vec<&'static str> {
    match report
        .indicators
        .get(names::CREDIT_STRESS)
        .map(|r| r.combined)
    {
        Some(Status::Green) => vec![
            "Credit conditions are improving on both the U.S. (spreads) and Canada (HY proxy).",
            "If other indicators follow, this becomes a sturdier risk-on backdrop.",
        ],
        Some(Status::Red) => vec![
            "Credit stress is elevated (at least one of U.S. spreads or Canada HY proxy is deteriorating).",
            "This is the most common failure-point for early risk-on attempts.",
        ],
        _ => vec![
            "Credit conditions are mixed/unclear (no clean trend yet).",
            "This is typically a 'watch closely' zone rather than a signal zone.",
        ],
    }
}

/// Render a run into an email-style (subject, body) pair.
pub fn render(report: &DashboardReport) -> (String, String) {
    let stamp = report
        .generated_at
        .with_timezone(&Utc)
        .format("%Y-%m-%d %H:%M UTC");
    let subject = format!("Risk Regime Dashboard (CAN+US) \u{2014} {stamp}");

    let mut body = Vec::new();
    body.push("RISK REGIME DASHBOARD (CAN + US)".to_string());
    body.push(format!("Timestamp: {stamp}"));
    body.push(String::new());

    for key in names::ORDERED {
        if let Some(result) = report.indicators.get(key) {
            let mut line = format!("{}: {}", display_name(key), status_glyph(result.combined));
            if let Some(reason) = &result.reason {
                line.push_str(&format!(" ({reason})"));
            }
            body.push(line);
        }
    }

    body.push(String::new());
    body.push(format!("GREEN COUNT: {} / 6", report.green_count));
    body.push(format!(
        "STAND-DOWN: {}",
        if report.regime.stand_down_active {
            "ACTIVE"
        } else {
            "NOT ACTIVE"
        }
    ));
    if report.regime.stand_down_reason != "none" {
        body.push(format!("Reason: {}", report.regime.stand_down_reason));
    }
    body.push(format!(
        "RISK WINDOW OPENING: {}",
        if report.regime.risk_window_opening {
            "YES (sustained green streak)"
        } else {
            "no"
        }
    ));
    if !report.regime.history_glyph.is_empty() {
        body.push(format!(
            "Recent runs (oldest first): {}",
            report.regime.history_glyph
        ));
    }

    let notes: Vec<String> = names::ORDERED
        .iter()
        .filter_map(|key| {
            report.indicators.get(*key).and_then(|r| {
                r.note
                    .as_ref()
                    .map(|n| format!("- {}: {}", display_name(key), n))
            })
        })
        .collect();
    if !notes.is_empty() {
        body.push(String::new());
        body.push("Indicator Notes".to_string());
        body.extend(notes);
    }

    body.push(String::new());
    body.push("Context & Interpretation (Non-Directive)".to_string());
    body.extend(commentary(report).iter().map(|c| format!("- {c}")));

    (subject, body.join("\n"))
}
