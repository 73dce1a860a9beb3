//! Bank of Canada Valet CSV client
//!
//! Valet CSV exports carry a metadata preamble before the actual data
//! table; parsing skips ahead to the row whose first column is `date`
//! and reads `date,value` rows from there.

use anyhow::Context;
use chrono::NaiveDate;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

use crate::series::TimeSeries;
use crate::types::SourceError;

pub struct BocClient {
    client: Client,
}

impl BocClient {
    pub fn new() -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(20))
                .build()
                .expect("Failed to create HTTP client"),
        }
    }

    /// Fetch one Valet CSV URL as a cleaned daily series.
    pub async fn series(&self, url: &str) -> anyhow::Result<TimeSeries> {
        debug!("Fetching BoC Valet series");
        let text = self
            .client
            .get(url)
            .send()
            .await
            .context("BoC Valet request failed")?
            .error_for_status()
            .context("BoC Valet returned an error status")?
            .text()
            .await
            .context("failed to read BoC Valet response")?;

        let series = parse_valet_csv(&text)?;
        if series.is_empty() {
            return Err(SourceError::Empty("BoC Valet".to_string()).into());
        }
        Ok(series)
    }
}

impl Default for BocClient {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_valet_csv(text: &str) -> anyhow::Result<TimeSeries> {
    let lines: Vec<&str> = text.lines().collect();

    let header_idx = lines
        .iter()
        .position(|line| {
            let first = line.split(',').next().unwrap_or("").trim().trim_matches('"');
            first.eq_ignore_ascii_case("date")
        })
        .ok_or_else(|| {
            SourceError::InvalidResponse("no data header row in BoC Valet CSV".to_string())
        })?;

    let mut points = Vec::new();
    for line in &lines[header_idx + 1..] {
        let mut cols = line.split(',');
        let (Some(date_str), Some(value_str)) = (cols.next(), cols.next()) else {
            continue;
        };
        let Ok(date) =
            NaiveDate::parse_from_str(date_str.trim().trim_matches('"'), "%Y-%m-%d")
        else {
            continue;
        };
        let Ok(value) = value_str.trim().trim_matches('"').parse::<f64>() else {
            continue;
        };
        points.push((date, value));
    }

    Ok(TimeSeries::from_points(points))
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &str = "\"Terms and Conditions\"\n\
        \"https://www.bankofcanada.ca/terms/\"\n\
        \n\
        \"SERIES\"\n\
        \"id\",\"label\"\n\
        \"BD.CDN.10YR.DQ.YLD\",\"10 year benchmark\"\n\
        \n\
        \"OBSERVATIONS\"\n\
        \"date\",\"BD.CDN.10YR.DQ.YLD\"\n\
        \"2024-01-02\",\"3.12\"\n\
        \"2024-01-03\",\"3.08\"\n\
        \"2024-01-04\",\" \"\n";

    #[test]
    fn test_parse_skips_preamble_and_blanks() {
        let series = parse_valet_csv(BODY).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.last_value(), Some(3.08));
    }

    #[test]
    fn test_parse_without_header_is_error() {
        assert!(parse_valet_csv("\"Terms\"\nno table here").is_err());
    }
}
