//! Deployment settings with documented defaults
//!
//! Every tunable (flat bands, correlation cutoffs, lookbacks,
//! persistence windows, symbols, feed URLs, state path) is configuration
//! rather than a hardcoded constant. Values come from an optional
//! `regime-watch.toml` next to the binary, overridden by
//! `REGIME__`-prefixed environment variables
//! (e.g. `REGIME__CORRELATIONS__RED_THRESHOLD=0.8`).

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::indicators::trend::TrendParams;
use crate::regime::PersistenceParams;

/// Full settings tree for one deployment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub trend: TrendParams,
    pub credit: CreditSettings,
    pub yields: YieldSettings,
    pub leadership: LeadershipSettings,
    pub correlations: CorrelationSettings,
    pub policy: PolicySettings,
    pub bad_news: BadNewsSettings,
    pub history: HistorySettings,
    pub persistence: PersistenceParams,
    pub notify: NotifySettings,
}

impl Settings {
    /// Load settings from the optional config file plus environment
    /// overrides, falling back to defaults for everything unset.
    pub fn load() -> anyhow::Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name("regime-watch").required(false))
            .add_source(
                config::Environment::with_prefix("REGIME")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }
}

/// Credit stress inputs (US HY OAS spread + Canada HY ETF proxy).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CreditSettings {
    /// FRED series for US HY option-adjusted spread
    pub us_fred_series: String,
    /// Yahoo ticker for the Canadian HY ETF price proxy
    pub ca_ticker: String,
    pub us_flat_band: f64,
    pub ca_flat_band: f64,
}

impl Default for CreditSettings {
    fn default() -> Self {
        Self {
            us_fred_series: "BAMLH0A0HYM2".to_string(),
            ca_ticker: "XHY.TO".to_string(),
            us_flat_band: 0.03,
            ca_flat_band: 0.02,
        }
    }
}

/// Real-yield inputs (US 10Y TIPS + Canada 10Y nominal proxy).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct YieldSettings {
    /// FRED series for the US 10Y real yield
    pub us_fred_series: String,
    /// Bank of Canada Valet CSV URL for the 10Y nominal benchmark
    pub ca_valet_url: String,
    pub flat_band: f64,
}

impl Default for YieldSettings {
    fn default() -> Self {
        Self {
            us_fred_series: "DFII10".to_string(),
            ca_valet_url:
                "https://www.bankofcanada.ca/valet/observations/BD.CDN.10YR.DQ.YLD/csv?recent=120"
                    .to_string(),
            flat_band: 0.02,
        }
    }
}

/// High-beta leadership ratio pairs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LeadershipSettings {
    pub btc_ticker: String,
    pub spy_ticker: String,
    pub qqq_ticker: String,
    pub dia_ticker: String,
    pub iwm_ticker: String,
    pub lookback: usize,
    /// Flat band on the ratio move (0.01 = ±1%)
    pub ratio_band: f64,
}

impl Default for LeadershipSettings {
    fn default() -> Self {
        Self {
            btc_ticker: "BTC-USD".to_string(),
            spy_ticker: "SPY".to_string(),
            qqq_ticker: "QQQ".to_string(),
            dia_ticker: "DIA".to_string(),
            iwm_ticker: "IWM".to_string(),
            lookback: 10,
            ratio_band: 0.01,
        }
    }
}

/// Asset correlation basket and thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorrelationSettings {
    /// Yahoo tickers for the basket
    pub tickers: Vec<String>,
    pub lookback: usize,
    pub red_threshold: f64,
    pub green_threshold: f64,
    pub min_assets: usize,
}

impl Default for CorrelationSettings {
    fn default() -> Self {
        Self {
            tickers: ["XIC.TO", "SPY", "HYG", "XRE.TO", "VNQ", "BTC-USD"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            lookback: 10,
            red_threshold: 0.75,
            green_threshold: 0.55,
            min_assets: 3,
        }
    }
}

/// Policy tone feeds and score thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicySettings {
    pub boc_feed: String,
    pub fed_feed: String,
    /// Recency cutoff for feed items
    pub window_hours: i64,
    pub max_items_per_feed: usize,
    pub green_score: i64,
    pub red_score: i64,
}

impl Default for PolicySettings {
    fn default() -> Self {
        Self {
            boc_feed: "https://www.bankofcanada.ca/content_type/press-releases/feed/".to_string(),
            fed_feed: "https://www.federalreserve.gov/feeds/press_all.xml".to_string(),
            window_hours: 48,
            max_items_per_feed: 20,
            green_score: 2,
            red_score: -2,
        }
    }
}

/// Bad-news feeds and reaction parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BadNewsSettings {
    pub feeds: Vec<String>,
    pub window_hours: i64,
    pub max_items_per_feed: usize,
    /// Minimum bad-term matches for an item to be flagged
    pub min_term_hits: usize,
    /// Keep at most this many flagged items
    pub max_hits: usize,
    /// Yahoo ticker for the market-reaction proxy
    pub reaction_ticker: String,
    /// Sessions to look back on the reaction proxy
    pub reaction_lookback: usize,
    pub reaction_band: f64,
}

impl Default for BadNewsSettings {
    fn default() -> Self {
        Self {
            feeds: vec![
                "https://www.cnbc.com/id/100003114/device/rss/rss.html".to_string(),
                "https://feeds.content.dowjones.io/public/rss/mw_topstories".to_string(),
            ],
            window_hours: 48,
            max_items_per_feed: 25,
            min_term_hits: 2,
            max_hits: 6,
            reaction_ticker: "SPY".to_string(),
            reaction_lookback: 3,
            reaction_band: 0.01,
        }
    }
}

/// Run-history storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HistorySettings {
    /// Path of the history JSON file
    pub path: PathBuf,
    /// Maximum retained runs (FIFO eviction beyond this)
    pub max_runs: usize,
}

impl Default for HistorySettings {
    fn default() -> Self {
        let base = dirs::data_dir().unwrap_or_else(|| PathBuf::from("state"));
        Self {
            path: base.join("regime-watch").join("history.json"),
            max_runs: 60,
        }
    }
}

/// Optional report delivery.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NotifySettings {
    /// Webhook to POST the rendered report to; log-only when unset
    pub webhook_url: Option<String>,
    pub timeout_secs: Option<u64>,
}
