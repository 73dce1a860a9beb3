//! Policy tone indicator - keyword-scored central-bank news

use crate::types::{IndicatorResult, NewsItem, Status};
use serde::Serialize;

/// Dovish phrases: liquidity support, backstops, market-functioning talk.
const DOVISH: [&str; 11] = [
    "financial stability",
    "liquidity",
    "facility",
    "backstop",
    "support",
    "market functioning",
    "guarantee",
    "temporary measure",
    "provide liquidity",
    "standing repo",
    "swap line",
];

/// Hawkish phrases: restrictive stance, tightening, inflation-fighting.
const HAWKISH: [&str; 9] = [
    "restrictive",
    "higher for longer",
    "inflation remains",
    "tightening",
    "raise rates",
    "rate increase",
    "reduce balance sheet",
    "quantitative tightening",
    "inflation is too high",
];

/// One item that matched at least one keyword.
#[derive(Debug, Clone, Serialize)]
pub struct KeywordHit {
    pub title: String,
    pub link: String,
    pub dovish: usize,
    pub hawkish: usize,
}

/// Score a corpus: +1 per dovish hit, -1 per hawkish hit, per item.
pub fn score_policy_items(items: &[NewsItem]) -> (i64, Vec<KeywordHit>) {
    let mut score = 0i64;
    let mut hits = Vec::new();

    for item in items {
        let text = format!("{} {}", item.title, item.summary).to_lowercase();
        let d = DOVISH.iter().filter(|k| text.contains(*k)).count();
        let h = HAWKISH.iter().filter(|k| text.contains(*k)).count();

        score += d as i64 - h as i64;
        if d > 0 || h > 0 {
            hits.push(KeywordHit {
                title: item.title.clone(),
                link: item.link.clone(),
                dovish: d,
                hawkish: h,
            });
        }
    }

    (score, hits)
}

/// Policy tone from BoC and Fed feed items combined.
///
/// GREEN if the summed score reaches `green_score` (default 2), RED at
/// or below `red_score` (default -2), YELLOW otherwise or when neither
/// corpus yielded any items at all.
pub fn policy_actions(
    boc_items: &[NewsItem],
    fed_items: &[NewsItem],
    green_score: i64,
    red_score: i64,
) -> IndicatorResult {
    let (boc_score, boc_hits) = score_policy_items(boc_items);
    let (fed_score, fed_hits) = score_policy_items(fed_items);
    let total = boc_score + fed_score;

    if boc_items.is_empty() && fed_items.is_empty() {
        return IndicatorResult::fallback("no_items")
            .with_note("No recent BoC or Fed feed items to score.");
    }

    let combined = if total >= green_score {
        Status::Green
    } else if total <= red_score {
        Status::Red
    } else {
        Status::Yellow
    };

    let top_hits: Vec<String> = boc_hits
        .iter()
        .take(5)
        .chain(fed_hits.iter().take(5))
        .map(|h| h.title.clone())
        .collect();

    let note = if top_hits.is_empty() {
        "Keyword-scored policy tone from recent official RSS feeds.".to_string()
    } else {
        format!("Keyword-scored policy tone; matched: {}", top_hits.join("; "))
    };

    IndicatorResult::new(combined)
        .with_metric("boc_score", boc_score as f64)
        .with_metric("fed_score", fed_score as f64)
        .with_metric("total_score", total as f64)
        .with_note(note)
}

#[cfg(test)]
mod tests {
    use super::*;

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
    fn test_scoring_counts_per_keyword_per_item() {
        let items = vec![item(
            "Bank announces standing repo facility",
            "A temporary measure to provide liquidity and support market functioning",
        )];
        let (score, hits) = score_policy_items(&items);
        // facility, temporary measure, provide liquidity, liquidity,
        // support, market functioning, standing repo
        assert!(score >= 5);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].hawkish, 0);
    }

    #[test]
    fn test_dovish_tone_is_green() {
        let boc = vec![item("New liquidity facility", "backstop for market functioning")];
        let result = policy_actions(&boc, &[], 2, -2);
        assert_eq!(result.combined, Status::Green);
        assert!(result.metrics["total_score"] >= 2.0);
    }

    #[test]
    fn test_hawkish_tone_is_red() {
        let fed = vec![item(
            "Policy remains restrictive",
            "higher for longer; quantitative tightening continues",
        )];
        let result = policy_actions(&[], &fed, 2, -2);
        assert_eq!(result.combined, Status::Red);
    }

    #[test]
    fn test_mixed_tone_is_yellow() {
        let fed = vec![item("Tightening with liquidity support", "")];
        let result = policy_actions(&[], &fed, 2, -2);
        assert_eq!(result.combined, Status::Yellow);
    }

    #[test]
    fn test_no_items_is_yellow_with_reason() {
        let result = policy_actions(&[], &[], 2, -2);
        assert_eq!(result.combined, Status::Yellow);
        assert_eq!(result.reason.as_deref(), Some("no_items"));
    }
}
