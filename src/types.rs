//! Shared types - indicator statuses, results, and news items

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Tri-state indicator status.
///
/// Not a numeric severity scale: combination rules across legs and
/// indicators are explicit, never averaged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    Red,
    Yellow,
    Green,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Red => "RED",
            Status::Yellow => "YELLOW",
            Status::Green => "GREEN",
        }
    }

    /// Swap RED and GREEN, keeping YELLOW.
    ///
    /// Used for legs whose raw series moves opposite to the stress it
    /// proxies (e.g. a falling HY ETF price means rising credit stress).
    pub fn inverted(self) -> Status {
        match self {
            Status::Red => Status::Green,
            Status::Green => Status::Red,
            Status::Yellow => Status::Yellow,
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one indicator computation.
///
/// Immutable once produced; consumed for display and run history only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndicatorResult {
    /// Combined status across all legs
    pub combined: Status,
    /// Per-leg statuses (post-inversion where a leg is inverted)
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub legs: BTreeMap<String, Status>,
    /// Numeric metrics backing the classification
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metrics: BTreeMap<String, f64>,
    /// Machine-readable degradation reason, if the indicator fell back
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Free-form note for the rendered report
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl IndicatorResult {
    pub fn new(combined: Status) -> Self {
        Self {
            combined,
            legs: BTreeMap::new(),
            metrics: BTreeMap::new(),
            reason: None,
            note: None,
        }
    }

    /// YELLOW fallback carrying a machine-readable reason.
    ///
    /// Every degraded path in the system funnels through this: a missing
    /// fetch, an insufficient series, a failed combinator.
    pub fn fallback(reason: impl Into<String>) -> Self {
        Self::new(Status::Yellow).with_reason(reason)
    }

    pub fn with_leg(mut self, name: impl Into<String>, status: Status) -> Self {
        self.legs.insert(name.into(), status);
        self
    }

    pub fn with_metric(mut self, name: impl Into<String>, value: f64) -> Self {
        self.metrics.insert(name.into(), value);
        self
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

/// One item pulled from an RSS/Atom feed.
///
/// Consumed by keyword scoring only; never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsItem {
    pub time: Option<DateTime<Utc>>,
    pub title: String,
    pub link: String,
    pub summary: String,
    pub source: String,
}

/// Error types for series fetching and parsing
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("invalid response format: {0}")]
    InvalidResponse(String),

    #[error("no data returned for {0}")]
    Empty(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_inversion() {
        assert_eq!(Status::Red.inverted(), Status::Green);
        assert_eq!(Status::Green.inverted(), Status::Red);
        assert_eq!(Status::Yellow.inverted(), Status::Yellow);
    }

    #[test]
    fn test_status_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&Status::Red).unwrap(), "\"RED\"");
        assert_eq!(serde_json::to_string(&Status::Green).unwrap(), "\"GREEN\"");
        let back: Status = serde_json::from_str("\"YELLOW\"").unwrap();
        assert_eq!(back, Status::Yellow);
    }

    #[test]
    fn test_fallback_is_yellow_with_reason() {
        let r = IndicatorResult::fallback("insufficient_data");
        assert_eq!(r.combined, Status::Yellow);
        assert_eq!(r.reason.as_deref(), Some("insufficient_data"));
        assert!(r.legs.is_empty());
    }
}
