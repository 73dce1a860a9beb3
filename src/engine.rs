//! Dashboard engine - one run from raw data to regime decision
//!
//! Orchestrates a single run: load history, compute the six indicators
//! (each independently guarded so one bad fetch cannot abort the run),
//! append the run record, evaluate the persistence/override engine, and
//! save the truncated history back. Providers are injected as trait
//! objects so tests can substitute canned data and an in-memory store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::Settings;
use crate::history::{HistoryStore, RunHistory, RunRecord};
use crate::indicators::correlations::CorrelationParams;
use crate::indicators::bad_news::ReactionParams;
use crate::indicators::{self, names};
use crate::regime::{self, RegimeDecision};
use crate::series::TimeSeries;
use crate::sources::SeriesSpec;
use crate::types::{IndicatorResult, NewsItem, Status};

/// Provider of daily time series (prices, spreads, yields).
#[async_trait]
pub trait MarketData: Send + Sync {
    async fn daily_series(&self, spec: &SeriesSpec) -> anyhow::Result<TimeSeries>;
}

/// Provider of recent news-feed items.
#[async_trait]
pub trait NewsFeed: Send + Sync {
    async fn recent_items(
        &self,
        feed_urls: &[String],
        hours: i64,
        max_items: usize,
    ) -> anyhow::Result<Vec<NewsItem>>;
}

/// The structured result of one run, for the presentation layer.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardReport {
    pub generated_at: DateTime<Utc>,
    pub indicators: BTreeMap<String, IndicatorResult>,
    pub green_count: u32,
    pub regime: RegimeDecision,
}

pub struct DashboardEngine {
    market: Arc<dyn MarketData>,
    news: Arc<dyn NewsFeed>,
    history: Arc<dyn HistoryStore>,
    settings: Settings,
}

impl DashboardEngine {
    pub fn new(
        market: Arc<dyn MarketData>,
        news: Arc<dyn NewsFeed>,
        history: Arc<dyn HistoryStore>,
        settings: Settings,
    ) -> Self {
        Self {
            market,
            news,
            history,
            settings,
        }
    }

    /// Execute one dashboard run.
    ///
    /// Only history persistence can fail this method; every indicator
    /// path degrades to a YELLOW fallback instead of erroring.
    pub async fn run(&self) -> anyhow::Result<DashboardReport> {
        let generated_at = Utc::now();

        // Corrupt or unreadable history degrades the persistence flags
        // to false rather than aborting the run.
        let mut history = match self.history.load().await {
            Ok(h) => h,
            Err(e) => {
                warn!("History unreadable, proceeding with empty history: {:#}", e);
                RunHistory::default()
            }
        };

        let mut results = BTreeMap::new();
        results.insert(
            names::CREDIT_STRESS.to_string(),
            guard(names::CREDIT_STRESS, self.credit_stress()).await,
        );
        results.insert(
            names::REAL_YIELDS.to_string(),
            guard(names::REAL_YIELDS, self.real_yields()).await,
        );
        results.insert(
            names::HIGH_BETA.to_string(),
            guard(names::HIGH_BETA, self.high_beta()).await,
        );
        results.insert(
            names::ASSET_CORRELATIONS.to_string(),
            guard(names::ASSET_CORRELATIONS, self.asset_correlations()).await,
        );
        results.insert(
            names::POLICY_ACTIONS.to_string(),
            guard(names::POLICY_ACTIONS, self.policy_actions()).await,
        );
        results.insert(
            names::BAD_NEWS_REACTION.to_string(),
            guard(names::BAD_NEWS_REACTION, self.bad_news_reaction()).await,
        );

        let statuses: BTreeMap<String, Status> = results
            .iter()
            .map(|(name, r)| (name.clone(), r.combined))
            .collect();
        let green_count = statuses
            .values()
            .filter(|s| **s == Status::Green)
            .count() as u32;

        history.append(
            RunRecord {
                ts: generated_at,
                green_count,
                statuses: statuses.clone(),
            },
            self.settings.history.max_runs,
        );

        let decision = regime::evaluate(&history, &statuses, &self.settings.persistence);

        // Persistence failure here is fatal for the run: silently
        // dropping the record would corrupt every future decision.
        self.history.save(&history).await?;

        info!(
            green_count,
            stand_down = decision.stand_down_active,
            risk_window = decision.risk_window_opening,
            glyph = %decision.history_glyph,
            "Run complete"
        );

        Ok(DashboardReport {
            generated_at,
            indicators: results,
            green_count,
            regime: decision,
        })
    }

    async fn credit_stress(&self) -> anyhow::Result<IndicatorResult> {
        let cfg = &self.settings.credit;
        let us = self
            .market
            .daily_series(&SeriesSpec::fred(&cfg.us_fred_series))
            .await?;
        let ca = self
            .market
            .daily_series(&SeriesSpec::yahoo(&cfg.ca_ticker))
            .await?;
        Ok(indicators::credit_stress(
            &us,
            &ca,
            &self.settings.trend,
            cfg.us_flat_band,
            cfg.ca_flat_band,
        ))
    }

    async fn real_yields(&self) -> anyhow::Result<IndicatorResult> {
        let cfg = &self.settings.yields;
        let us = self
            .market
            .daily_series(&SeriesSpec::fred(&cfg.us_fred_series))
            .await?;
        let ca = self
            .market
            .daily_series(&SeriesSpec::boc(&cfg.ca_valet_url))
            .await?;
        Ok(indicators::real_yields(
            &us,
            &ca,
            &self.settings.trend,
            cfg.flat_band,
        ))
    }

    async fn high_beta(&self) -> anyhow::Result<IndicatorResult> {
        let cfg = &self.settings.leadership;
        let btc = self
            .market
            .daily_series(&SeriesSpec::yahoo(&cfg.btc_ticker))
            .await?;
        let spy = self
            .market
            .daily_series(&SeriesSpec::yahoo(&cfg.spy_ticker))
            .await?;
        let qqq = self
            .market
            .daily_series(&SeriesSpec::yahoo(&cfg.qqq_ticker))
            .await?;
        let dia = self
            .market
            .daily_series(&SeriesSpec::yahoo(&cfg.dia_ticker))
            .await?;
        let iwm = self
            .market
            .daily_series(&SeriesSpec::yahoo(&cfg.iwm_ticker))
            .await?;
        Ok(indicators::high_beta_leadership(
            &btc,
            &spy,
            &qqq,
            &dia,
            &iwm,
            cfg.lookback,
            cfg.ratio_band,
        ))
    }

    async fn asset_correlations(&self) -> anyhow::Result<IndicatorResult> {
        let cfg = &self.settings.correlations;

        // One failed basket member is dropped, not fatal; the
        // combinator enforces the minimum asset count.
        let mut fetched: Vec<(String, TimeSeries)> = Vec::new();
        for ticker in &cfg.tickers {
            match self
                .market
                .daily_series(&SeriesSpec::yahoo(ticker))
                .await
            {
                Ok(series) => fetched.push((ticker.clone(), series)),
                Err(e) => warn!("Correlation basket member {} unavailable: {:#}", ticker, e),
            }
        }
        let series: Vec<(&str, &TimeSeries)> = fetched
            .iter()
            .map(|(name, s)| (name.as_str(), s))
            .collect();

        Ok(indicators::asset_correlations(
            &series,
            &CorrelationParams {
                lookback: cfg.lookback,
                red_threshold: cfg.red_threshold,
                green_threshold: cfg.green_threshold,
                min_assets: cfg.min_assets,
            },
        ))
    }

    async fn policy_actions(&self) -> anyhow::Result<IndicatorResult> {
        let cfg = &self.settings.policy;
        let boc = self
            .news
            .recent_items(
                std::slice::from_ref(&cfg.boc_feed),
                cfg.window_hours,
                cfg.max_items_per_feed,
            )
            .await?;
        let fed = self
            .news
            .recent_items(
                std::slice::from_ref(&cfg.fed_feed),
                cfg.window_hours,
                cfg.max_items_per_feed,
            )
            .await?;
        Ok(indicators::policy_actions(
            &boc,
            &fed,
            cfg.green_score,
            cfg.red_score,
        ))
    }

    async fn bad_news_reaction(&self) -> anyhow::Result<IndicatorResult> {
        let cfg = &self.settings.bad_news;
        let items = self
            .news
            .recent_items(&cfg.feeds, cfg.window_hours, cfg.max_items_per_feed)
            .await?;
        let reaction = self
            .market
            .daily_series(&SeriesSpec::yahoo(&cfg.reaction_ticker))
            .await
            .unwrap_or_else(|e| {
                warn!("Reaction proxy unavailable: {:#}", e);
                TimeSeries::new()
            });
        Ok(indicators::bad_news_reaction(
            &items,
            &reaction,
            &ReactionParams {
                min_hits: cfg.min_term_hits,
                max_hits: cfg.max_hits,
                lookback: cfg.reaction_lookback,
                band: cfg.reaction_band,
            },
        ))
    }
}

/// Collapse an indicator failure into the YELLOW fallback contract.
async fn guard(
    name: &str,
    fut: impl Future<Output = anyhow::Result<IndicatorResult>>,
) -> IndicatorResult {
    match fut.await {
        Ok(result) => result,
        Err(e) => {
            warn!("Indicator {} failed, reporting fallback: {:#}", name, e);
            IndicatorResult::fallback(format!("fetch_failed:{name}"))
        }
    }
}
