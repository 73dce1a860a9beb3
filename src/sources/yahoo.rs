//! Yahoo Finance chart API client
//!
//! Pulls daily bars from the public v8 chart endpoint and extracts the
//! adjusted close, falling back to the raw close when the adjusted
//! array is absent. Null slots (holidays, halts) are dropped.

use anyhow::Context;
use chrono::DateTime;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::series::TimeSeries;
use crate::types::SourceError;

const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";

pub struct YahooClient {
    client: Client,
    base_url: String,
    range: String,
}

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
    error: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    #[serde(default)]
    adjclose: Vec<AdjClose>,
    #[serde(default)]
    quote: Vec<Quote>,
}

#[derive(Debug, Deserialize)]
struct AdjClose {
    adjclose: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct Quote {
    close: Vec<Option<f64>>,
}

impl YahooClient {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Base URL override for tests.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(20))
                .user_agent("Mozilla/5.0 (compatible; regime-watch)")
                .build()
                .expect("Failed to create HTTP client"),
            base_url: base_url.into(),
            range: "6mo".to_string(),
        }
    }

    /// Daily adjusted-close series for one ticker.
    pub async fn adj_close(&self, ticker: &str) -> anyhow::Result<TimeSeries> {
        let url = format!(
            "{}/v8/finance/chart/{}?range={}&interval=1d",
            self.base_url, ticker, self.range
        );
        debug!("Fetching Yahoo daily bars for {}", ticker);

        let response: ChartResponse = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("Yahoo request failed for {ticker}"))?
            .error_for_status()
            .with_context(|| format!("Yahoo returned an error status for {ticker}"))?
            .json()
            .await
            .with_context(|| format!("failed to parse Yahoo chart JSON for {ticker}"))?;

        if let Some(err) = response.chart.error {
            if !err.is_null() {
                return Err(
                    SourceError::InvalidResponse(format!("Yahoo error for {ticker}: {err}")).into(),
                );
            }
        }

        let result = response
            .chart
            .result
            .and_then(|mut r| (!r.is_empty()).then(|| r.remove(0)))
            .ok_or_else(|| SourceError::Empty(format!("Yahoo {ticker}")))?;

        let timestamps = result
            .timestamp
            .ok_or_else(|| SourceError::Empty(format!("Yahoo {ticker}")))?;

        // Prefer adjusted close; some tickers only carry the raw quote
        let closes: &[Option<f64>] = if let Some(adj) = result.indicators.adjclose.first() {
            &adj.adjclose
        } else if let Some(quote) = result.indicators.quote.first() {
            &quote.close
        } else {
            return Err(SourceError::Empty(format!("Yahoo {ticker}")).into());
        };

        let points = timestamps
            .iter()
            .zip(closes.iter())
            .filter_map(|(ts, close)| {
                let value = (*close)?;
                let date = DateTime::from_timestamp(*ts, 0)?.date_naive();
                Some((date, value))
            })
            .collect();

        let series = TimeSeries::from_points(points);
        if series.is_empty() {
            return Err(SourceError::Empty(format!("Yahoo {ticker}")).into());
        }
        Ok(series)
    }
}

impl Default for YahooClient {
    fn default() -> Self {
        Self::new()
    }
}
