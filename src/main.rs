//! Regime Watch - one-shot dashboard run
//!
//! Executes a single run (scheduling is external, e.g. cron or a CI
//! workflow): fetch market and feed data, compute the six indicators,
//! update the run history, and print/deliver the report.

use std::sync::Arc;
use tracing::{info, Level};

use regime_watch::notify::ReportNotifier;
use regime_watch::sources::{CompositeMarketData, FeedClient};
use regime_watch::{report, DashboardEngine, FileHistoryStore, Settings};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    info!("Starting Regime Watch...");

    let settings = Settings::load()?;
    info!("History file: {:?}", settings.history.path);

    let market = Arc::new(CompositeMarketData::new());
    let news = Arc::new(FeedClient::new());
    let history = Arc::new(FileHistoryStore::new(settings.history.path.clone()));

    let notifier = ReportNotifier::new(settings.notify.clone());
    let engine = DashboardEngine::new(market, news, history, settings);

    let run_report = engine.run().await?;
    let (subject, body) = report::render(&run_report);

    println!("{subject}\n\n{body}");
    notifier.deliver(&run_report, &subject, &body).await;

    Ok(())
}
