//! RSS/Atom feed client
//!
//! Fetches one or more feeds and returns recent items for keyword
//! scoring. Items older than the hours cutoff are dropped, and each
//! feed contributes at most `max_items` entries. One feed failing does
//! not fail the others.

use anyhow::Context;
use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

use crate::engine::NewsFeed;
use crate::types::NewsItem;

pub struct FeedClient {
    client: Client,
}

impl FeedClient {
    pub fn new() -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(20))
                .user_agent("regime-watch/0.1")
                .build()
                .expect("Failed to create HTTP client"),
        }
    }

    async fn fetch_one(
        &self,
        url: &str,
        hours: i64,
        max_items: usize,
    ) -> anyhow::Result<Vec<NewsItem>> {
        debug!("Fetching feed {}", url);
        let bytes = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("feed request failed: {url}"))?
            .error_for_status()
            .with_context(|| format!("feed returned an error status: {url}"))?
            .bytes()
            .await
            .with_context(|| format!("failed to read feed body: {url}"))?;

        let feed = feed_rs::parser::parse(bytes.as_ref())
            .with_context(|| format!("failed to parse feed: {url}"))?;

        let cutoff = Utc::now() - ChronoDuration::hours(hours);
        let items = feed
            .entries
            .into_iter()
            .take(max_items)
            .filter_map(|entry| {
                let time = entry.published.or(entry.updated);
                // Undated items are kept; dated items must be recent
                if let Some(t) = time {
                    if t < cutoff {
                        return None;
                    }
                }
                Some(NewsItem {
                    time,
                    title: entry.title.map(|t| t.content).unwrap_or_default(),
                    link: entry
                        .links
                        .first()
                        .map(|l| l.href.clone())
                        .unwrap_or_default(),
                    summary: entry.summary.map(|t| t.content).unwrap_or_default(),
                    source: url.to_string(),
                })
            })
            .collect();
        Ok(items)
    }
}

impl Default for FeedClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NewsFeed for FeedClient {
    async fn recent_items(
        &self,
        feed_urls: &[String],
        hours: i64,
        max_items: usize,
    ) -> anyhow::Result<Vec<NewsItem>> {
        let mut items = Vec::new();
        for url in feed_urls {
            match self.fetch_one(url, hours, max_items).await {
                Ok(mut batch) => items.append(&mut batch),
                Err(e) => warn!("Skipping feed {}: {:#}", url, e),
            }
        }
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn rss_body(pub_date: &str) -> String {
        format!(
            "<?xml version=\"1.0\"?>\
             <rss version=\"2.0\"><channel>\
             <title>Press Releases</title>\
             <item>\
               <title>Bank announces liquidity facility</title>\
               <link>https://example.org/release</link>\
               <description>Temporary measure to support market functioning</description>\
               <pubDate>{pub_date}</pubDate>\
             </item>\
             </channel></rss>"
        )
    }

    #[tokio::test]
    async fn test_recent_items_parses_rss() {
        let server = MockServer::start().await;
        let recent = (Utc::now() - ChronoDuration::hours(1)).to_rfc2822();
        Mock::given(method("GET"))
            .and(path("/feed"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(rss_body(&recent)),
            )
            .mount(&server)
            .await;

        let client = FeedClient::new();
        let urls = vec![format!("{}/feed", server.uri())];
        let items = client.recent_items(&urls, 48, 20).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "Bank announces liquidity facility");
        assert!(items[0].summary.contains("market functioning"));
    }

    #[tokio::test]
    async fn test_stale_items_are_dropped() {
        let server = MockServer::start().await;
        let stale = (Utc::now() - ChronoDuration::hours(100)).to_rfc2822();
        Mock::given(method("GET"))
            .and(path("/feed"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(rss_body(&stale)),
            )
            .mount(&server)
            .await;

        let client = FeedClient::new();
        let urls = vec![format!("{}/feed", server.uri())];
        let items = client.recent_items(&urls, 48, 20).await.unwrap();
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn test_one_broken_feed_does_not_fail_the_rest() {
        let server = MockServer::start().await;
        let recent = (Utc::now() - ChronoDuration::hours(1)).to_rfc2822();
        Mock::given(method("GET"))
            .and(path("/good"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(rss_body(&recent)),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/bad"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = FeedClient::new();
        let urls = vec![
            format!("{}/bad", server.uri()),
            format!("{}/good", server.uri()),
        ];
        let items = client.recent_items(&urls, 48, 20).await.unwrap();
        assert_eq!(items.len(), 1);
    }
}
