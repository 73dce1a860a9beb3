//! FRED graph CSV client
//!
//! Pulls the public `fredgraph.csv` export for one series id. No API
//! key required. Missing observations appear as `.` in the CSV and are
//! dropped.

use anyhow::Context;
use chrono::NaiveDate;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

use crate::series::TimeSeries;
use crate::types::SourceError;

const DEFAULT_BASE_URL: &str = "https://fred.stlouisfed.org";

pub struct FredClient {
    client: Client,
    base_url: String,
}

impl FredClient {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Base URL override for tests.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(20))
                .build()
                .expect("Failed to create HTTP client"),
            base_url: base_url.into(),
        }
    }

    /// Fetch one series as a cleaned daily time series.
    pub async fn series(&self, series_id: &str) -> anyhow::Result<TimeSeries> {
        let url = format!("{}/graph/fredgraph.csv?id={}", self.base_url, series_id);
        debug!("Fetching FRED series {}", series_id);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("FRED request failed for {series_id}"))?
            .error_for_status()
            .with_context(|| format!("FRED returned an error status for {series_id}"))?;

        let text = response
            .text()
            .await
            .with_context(|| format!("failed to read FRED response for {series_id}"))?;

        let series = parse_fred_csv(&text)?;
        if series.is_empty() {
            return Err(SourceError::Empty(format!("FRED {series_id}")).into());
        }
        Ok(series)
    }
}

impl Default for FredClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse a `date,value` CSV body. Header row and non-numeric
/// observations are skipped.
fn parse_fred_csv(text: &str) -> anyhow::Result<TimeSeries> {
    let mut lines = text.lines();
    let header = lines
        .next()
        .ok_or_else(|| SourceError::InvalidResponse("empty FRED CSV".to_string()))?;
    if !header.to_lowercase().contains("date") {
        return Err(SourceError::InvalidResponse(format!(
            "unexpected FRED CSV header: {header}"
        ))
        .into());
    }

    let mut points = Vec::new();
    for line in lines {
        let mut cols = line.splitn(2, ',');
        let (Some(date_str), Some(value_str)) = (cols.next(), cols.next()) else {
            continue;
        };
        let Ok(date) = NaiveDate::parse_from_str(date_str.trim(), "%Y-%m-%d") else {
            continue;
        };
        // FRED prints "." for missing observations
        let Ok(value) = value_str.trim().parse::<f64>() else {
            continue;
        };
        points.push((date, value));
    }

    Ok(TimeSeries::from_points(points))
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const BODY: &str = "DATE,BAMLH0A0HYM2\n\
        2024-01-02,3.39\n\
        2024-01-03,.\n\
        2024-01-04,3.48\n";

    #[test]
    fn test_parse_skips_missing_observations() {
        let series = parse_fred_csv(BODY).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.last_value(), Some(3.48));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_fred_csv("<html>maintenance</html>\nmore").is_err());
    }

    #[tokio::test]
    async fn test_fetch_against_mock_server() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/graph/fredgraph.csv"))
            .and(query_param("id", "BAMLH0A0HYM2"))
            .respond_with(ResponseTemplate::new(200).set_body_string(BODY))
            .mount(&server)
            .await;

        let client = FredClient::with_base_url(server.uri());
        let series = client.series("BAMLH0A0HYM2").await.unwrap();
        assert_eq!(series.len(), 2);
    }

    #[tokio::test]
    async fn test_fetch_error_status_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = FredClient::with_base_url(server.uri());
        assert!(client.series("BAMLH0A0HYM2").await.is_err());
    }
}
