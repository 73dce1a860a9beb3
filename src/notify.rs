//! Report delivery - optional webhook POST of the rendered report

use reqwest::Client;
use std::time::Duration;
use tracing::{info, warn};

use crate::config::NotifySettings;
use crate::engine::DashboardReport;

/// Delivers one rendered report to a configured webhook. When no
/// webhook is configured the report is log-only, which keeps actual
/// transport (SMTP bridges, chat hooks) outside this crate.
pub struct ReportNotifier {
    settings: NotifySettings,
    client: Client,
}

impl ReportNotifier {
    pub fn new(settings: NotifySettings) -> Self {
        let timeout = settings.timeout_secs.unwrap_or(10);
        Self {
            settings,
            client: Client::builder()
                .timeout(Duration::from_secs(timeout))
                .build()
                .expect("Failed to build HTTP client"),
        }
    }

    /// POST the report; delivery failure is logged, never fatal.
    pub async fn deliver(&self, report: &DashboardReport, subject: &str, body: &str) {
        let Some(url) = &self.settings.webhook_url else {
            info!("No webhook configured, report is log-only");
            return;
        };

        let payload = serde_json::json!({
            "subject": subject,
            "body": body,
            "green_count": report.green_count,
            "stand_down_active": report.regime.stand_down_active,
            "stand_down_reason": report.regime.stand_down_reason,
            "risk_window_opening": report.regime.risk_window_opening,
            "history_glyph": report.regime.history_glyph,
            "generated_at": report.generated_at.to_rfc3339(),
        });

        match self.client.post(url).json(&payload).send().await {
            Ok(resp) if resp.status().is_success() => {
                info!("Report delivered to webhook");
            }
            Ok(resp) => warn!("Webhook returned status {}", resp.status()),
            Err(e) => warn!("Webhook delivery failed: {:#}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::names;
    use crate::regime::RegimeDecision;
    use crate::types::{IndicatorResult, Status};
    use chrono::Utc;
    use std::collections::BTreeMap;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn sample_report() -> DashboardReport {
        let mut indicators = BTreeMap::new();
        indicators.insert(
            names::CREDIT_STRESS.to_string(),
            IndicatorResult::new(Status::Green),
        );
        DashboardReport {
            generated_at: Utc::now(),
            indicators,
            green_count: 1,
            regime: RegimeDecision {
                risk_window_opening: false,
                stand_down_persist: false,
                stand_down_override: false,
                stand_down_active: false,
                stand_down_reason: "none".to_string(),
                history_glyph: "Y".to_string(),
            },
        }
    }

    #[tokio::test]
    async fn test_deliver_posts_payload() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/hook"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let notifier = ReportNotifier::new(NotifySettings {
            webhook_url: Some(format!("{}/hook", server.uri())),
            timeout_secs: Some(5),
        });
        notifier.deliver(&sample_report(), "subject", "body").await;
    }

    #[tokio::test]
    async fn test_deliver_without_webhook_is_noop() {
        let notifier = ReportNotifier::new(NotifySettings::default());
        notifier.deliver(&sample_report(), "subject", "body").await;
    }
}
