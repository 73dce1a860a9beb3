//! Bad-news reaction indicator - flagged headlines vs market response

use crate::series::TimeSeries;
use crate::types::{IndicatorResult, NewsItem, Status};
use serde::Serialize;

/// Stress vocabulary; an item needs at least `min_hits` matches to be
/// flagged, which keeps single-word noise out.
const BAD_TERMS: [&str; 17] = [
    "bank",
    "insolv",
    "default",
    "credit event",
    "liquidity",
    "layoff",
    "job cuts",
    "recession",
    "downgrade",
    "guidance cut",
    "missed expectations",
    "delinquen",
    "foreclosure",
    "bankrupt",
    "run on",
    "stress",
    "bailout",
];

/// A flagged bad-news item.
#[derive(Debug, Clone, Serialize)]
pub struct BadNewsHit {
    pub title: String,
    pub link: String,
    pub score: usize,
}

/// Flag items whose text matches at least `min_hits` bad terms, keeping
/// the top `cap` by match count.
pub fn detect_bad_news(items: &[NewsItem], min_hits: usize, cap: usize) -> Vec<BadNewsHit> {
    let mut hits: Vec<BadNewsHit> = items
        .iter()
        .filter_map(|item| {
            let text = format!("{} {}", item.title, item.summary).to_lowercase();
            let score = BAD_TERMS.iter().filter(|k| text.contains(*k)).count();
            (score >= min_hits).then(|| BadNewsHit {
                title: item.title.clone(),
                link: item.link.clone(),
                score,
            })
        })
        .collect();
    hits.sort_by(|a, b| b.score.cmp(&a.score));
    hits.truncate(cap);
    hits
}

/// Parameters for the reaction leg.
#[derive(Debug, Clone, Copy)]
pub struct ReactionParams {
    /// Minimum bad-term matches for an item to count
    pub min_hits: usize,
    /// Keep at most this many flagged items
    pub max_hits: usize,
    /// Sessions to look back on the reaction proxy
    pub lookback: usize,
    /// Flat band on the proxy move (0.01 = ±1%)
    pub band: f64,
}

impl Default for ReactionParams {
    fn default() -> Self {
        Self {
            min_hits: 2,
            max_hits: 6,
            lookback: 3,
            band: 0.01,
        }
    }
}

/// How the market took recent bad news.
///
/// No flagged item: YELLOW with reason `no_bad_news` (nothing to react
/// to). With flagged items, classify the reaction proxy over the
/// lookback: a fall beyond the band is RED (market confirming the
/// stress), a rise beyond the band is GREEN (market shrugging it off),
/// inside the band YELLOW. Missing proxy data degrades to YELLOW.
pub fn bad_news_reaction(
    items: &[NewsItem],
    reaction: &TimeSeries,
    params: &ReactionParams,
) -> IndicatorResult {
    let hits = detect_bad_news(items, params.min_hits, params.max_hits);

    if hits.is_empty() {
        return IndicatorResult::fallback("no_bad_news")
            .with_metric("bad_news_count", 0.0)
            .with_note("No flagged bad-news items in the window.");
    }

    let points = reaction.points();
    if points.len() < params.lookback + 1 {
        return IndicatorResult::fallback("insufficient_reaction_data")
            .with_metric("bad_news_count", hits.len() as f64);
    }

    let start = points[points.len() - (params.lookback + 1)].1;
    let end = points[points.len() - 1].1;
    if start == 0.0 {
        return IndicatorResult::fallback("insufficient_reaction_data")
            .with_metric("bad_news_count", hits.len() as f64);
    }
    let change = end / start - 1.0;

    let combined = if change < -params.band {
        Status::Red
    } else if change > params.band {
        Status::Green
    } else {
        Status::Yellow
    };

    let titles: Vec<&str> = hits.iter().map(|h| h.title.as_str()).collect();
    IndicatorResult::new(combined)
        .with_metric("bad_news_count", hits.len() as f64)
        .with_metric("reaction_change", change)
        .with_note(format!("Flagged: {}", titles.join("; ")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::testutil::daily;

    fn item(title: &str, summary: &str) -> NewsItem {
        NewsItem {
            time: None,
            title: title.to_string(),
            link: "https://example.org/item".to_string(),
            summary: summary.to_string(),
            source: "test".to_string(),
        }
    }

    #[test]
    fn test_detection_needs_two_terms() {
        let items = vec![
            item("Quiet bank earnings", ""), // one term only
            item("Regional bank faces liquidity stress", ""),
        ];
        let hits = detect_bad_news(&items, 2, 6);
        assert_eq!(hits.len(), 1);
        assert!(hits[0].score >= 2);
    }

    #[test]
    fn test_detection_caps_and_orders_by_score() {
        let items: Vec<NewsItem> = (0..8)
            .map(|i| item(&format!("Bank default story {i}"), "liquidity stress"))
            .collect();
        let hits = detect_bad_news(&items, 2, 6);
        assert_eq!(hits.len(), 6);
    }

    #[test]
    fn test_no_bad_news_is_yellow() {
        let result = bad_news_reaction(
            &[item("Markets calm", "nothing notable")],
            &daily(&[100.0; 10]),
            &ReactionParams::default(),
        );
        assert_eq!(result.combined, Status::Yellow);
        assert_eq!(result.reason.as_deref(), Some("no_bad_news"));
    }

    #[test]
    fn test_market_falling_on_bad_news_is_red() {
        let items = vec![item("Bank bailout after run on deposits", "")];
        let proxy = daily(&[100.0, 100.0, 99.0, 97.0, 95.0]);
        let result = bad_news_reaction(&items, &proxy, &ReactionParams::default());
        assert_eq!(result.combined, Status::Red);
        assert!(result.metrics["reaction_change"] < -0.01);
    }

    #[test]
    fn test_market_shrugging_off_bad_news_is_green() {
        let items = vec![item("Bank bailout after run on deposits", "")];
        let proxy = daily(&[100.0, 100.0, 101.0, 102.0, 103.0]);
        let result = bad_news_reaction(&items, &proxy, &ReactionParams::default());
        assert_eq!(result.combined, Status::Green);
    }

    #[test]
    fn test_missing_proxy_degrades_to_yellow() {
        let items = vec![item("Bank bailout after run on deposits", "")];
        let result = bad_news_reaction(&items, &TimeSeries::new(), &ReactionParams::default());
        assert_eq!(result.combined, Status::Yellow);
        assert_eq!(result.reason.as_deref(), Some("insufficient_reaction_data"));
    }
}
