//! External data sources - FRED, Yahoo Finance, BoC Valet, RSS feeds
//!
//! Simple I/O glue: each client fetches one kind of public data and
//! returns a cleaned `TimeSeries` or a list of `NewsItem`s. Transport
//! and parse failures surface as errors; the engine converts them into
//! YELLOW fallback results so a single bad fetch never aborts a run.

pub mod boc;
pub mod feeds;
pub mod fred;
pub mod yahoo;

pub use boc::BocClient;
pub use feeds::FeedClient;
pub use fred::FredClient;
pub use yahoo::YahooClient;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::engine::MarketData;
use crate::series::TimeSeries;

/// Identifies one fetchable daily series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SeriesSpec {
    /// FRED series by id (e.g. BAMLH0A0HYM2)
    Fred { series_id: String },
    /// Yahoo Finance daily adjusted close by ticker
    Yahoo { ticker: String },
    /// Bank of Canada Valet CSV by full URL
    BocValet { url: String },
}

impl SeriesSpec {
    pub fn fred(series_id: impl Into<String>) -> Self {
        Self::Fred {
            series_id: series_id.into(),
        }
    }

    pub fn yahoo(ticker: impl Into<String>) -> Self {
        Self::Yahoo {
            ticker: ticker.into(),
        }
    }

    pub fn boc(url: impl Into<String>) -> Self {
        Self::BocValet { url: url.into() }
    }

    /// Short label for logs and fallback reasons.
    pub fn label(&self) -> String {
        match self {
            Self::Fred { series_id } => format!("fred:{series_id}"),
            Self::Yahoo { ticker } => format!("yahoo:{ticker}"),
            Self::BocValet { .. } => "boc_valet".to_string(),
        }
    }
}

/// Routes series specs to the matching client.
pub struct CompositeMarketData {
    fred: FredClient,
    yahoo: YahooClient,
    boc: BocClient,
}

impl CompositeMarketData {
    pub fn new() -> Self {
        Self {
            fred: FredClient::new(),
            yahoo: YahooClient::new(),
            boc: BocClient::new(),
        }
    }
}

impl Default for CompositeMarketData {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MarketData for CompositeMarketData {
    async fn daily_series(&self, spec: &SeriesSpec) -> anyhow::Result<TimeSeries> {
        match spec {
            SeriesSpec::Fred { series_id } => self.fred.series(series_id).await,
            SeriesSpec::Yahoo { ticker } => self.yahoo.adj_close(ticker).await,
            SeriesSpec::BocValet { url } => self.boc.series(url).await,
        }
    }
}
