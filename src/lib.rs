//! Regime Watch - macro risk-regime dashboard
//!
//! Computes six RED/YELLOW/GREEN macro-financial indicators from public
//! time-series and news-feed data, keeps a bounded history of past runs,
//! and derives persistence signals (risk-window opening, stand-down) on
//! top of single-run conservative overrides.

pub mod config;
pub mod engine;
pub mod history;
pub mod indicators;
pub mod notify;
pub mod regime;
pub mod report;
pub mod series;
pub mod sources;
pub mod types;

// Re-export main types for convenience
pub use config::Settings;
pub use engine::{DashboardEngine, DashboardReport, MarketData, NewsFeed};
pub use history::{FileHistoryStore, HistoryStore, MemoryHistoryStore, RunHistory, RunRecord};
pub use regime::RegimeDecision;
pub use series::TimeSeries;
pub use types::{IndicatorResult, NewsItem, Status};
