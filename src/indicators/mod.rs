//! Indicator Combinators - six macro risk-regime indicators
//!
//! Each combinator consumes one or more time series (two of them also
//! consume scored news items) and produces a tri-state `IndicatorResult`.
//! Missing or insufficient input always degrades to YELLOW with a
//! machine-readable reason; nothing in this module returns an error.

use crate::types::Status;

pub mod bad_news;
pub mod correlations;
pub mod credit;
pub mod leadership;
pub mod policy;
pub mod trend;
pub mod yields;

pub use bad_news::bad_news_reaction;
pub use correlations::asset_correlations;
pub use credit::credit_stress;
pub use leadership::high_beta_leadership;
pub use policy::policy_actions;
pub use trend::{ratio_trend, ryg_trend, RatioTrend, TrendParams, TrendSignal};
pub use yields::real_yields;

/// Canonical indicator keys used in run history and reports.
pub mod names {
    pub const CREDIT_STRESS: &str = "credit_stress";
    pub const REAL_YIELDS: &str = "real_yields";
    pub const HIGH_BETA: &str = "high_beta";
    pub const ASSET_CORRELATIONS: &str = "asset_correlations";
    pub const POLICY_ACTIONS: &str = "policy_actions";
    pub const BAD_NEWS_REACTION: &str = "bad_news_reaction";

    /// Display order for reports (matches the email layout).
    pub const ORDERED: [&str; 6] = [
        CREDIT_STRESS,
        POLICY_ACTIONS,
        ASSET_CORRELATIONS,
        REAL_YIELDS,
        BAD_NEWS_REACTION,
        HIGH_BETA,
    ];
}

/// Conservative leg combination shared by the multi-leg indicators:
/// RED if any leg is RED, GREEN only if every leg is GREEN, else YELLOW.
pub fn combine_legs(legs: &[Status]) -> Status {
    if legs.iter().any(|s| *s == Status::Red) {
        Status::Red
    } else if !legs.is_empty() && legs.iter().all(|s| *s == Status::Green) {
        Status::Green
    } else {
        Status::Yellow
    }
}
