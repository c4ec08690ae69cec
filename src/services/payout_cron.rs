use std::str::FromStr;

use chrono::{DateTime, FixedOffset, Utc};
use cron::Schedule;

use crate::api::{ApiResult, PayoutsClient};
use crate::config::PayoutConfig;
use crate::models::PayoutRunSummary;

/// Parse a cron expression. Five-field expressions get a leading seconds
/// field of `0`, since the `cron` crate counts seconds.
pub fn parse_schedule(expr: &str) -> anyhow::Result<Schedule> {
    let expr = expr.trim();
    let normalized = if expr.split_whitespace().count() == 5 {
        format!("0 {}", expr)
    } else {
        expr.to_string()
    };

    Schedule::from_str(&normalized)
        .map_err(|e| anyhow::anyhow!("invalid cron expression '{}': {}", expr, e))
}

/// Daily trigger of the upstream payout processor
pub struct PayoutCron {
    schedule: Schedule,
    expression: String,
    timezone: String,
    offset: FixedOffset,
    client: PayoutsClient,
}

impl PayoutCron {
    pub fn new(config: &PayoutConfig, client: PayoutsClient) -> anyhow::Result<Self> {
        Ok(Self {
            schedule: parse_schedule(&config.schedule)?,
            expression: config.schedule.clone(),
            timezone: config.timezone.clone(),
            offset: config.offset()?,
            client,
        })
    }

    /// First firing strictly after `now`
    pub fn next_run_after(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.schedule
            .after(&now.with_timezone(&self.offset))
            .next()
            .map(|at| at.with_timezone(&Utc))
    }

    pub async fn run_once(&self) -> ApiResult<PayoutRunSummary> {
        self.client.process_ready_payouts().await
    }

    /// Run forever; a failed run is logged and the next tick proceeds
    pub async fn run(self) {
        tracing::info!(
            "Payout cron scheduled: {} ({})",
            self.expression,
            self.timezone
        );

        loop {
            let now = Utc::now();
            let Some(next) = self.next_run_after(now) else {
                tracing::warn!("Payout schedule {} has no upcoming runs", self.expression);
                return;
            };
            tracing::debug!("Next payout run at {}", next);

            let wait = (next - now).to_std().unwrap_or_default();
            tokio::time::sleep(wait).await;

            tracing::info!("Running scheduled payout processing");
            match self.run_once().await {
                Ok(summary) => tracing::info!(
                    "Payout run finished: {} processed, {} errors",
                    summary.processed,
                    summary.error_count()
                ),
                Err(e) => tracing::error!("Payout run failed: {}", e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiClient;
    use chrono::TimeZone;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn cron_for(api_base: &str) -> PayoutCron {
        let config = PayoutConfig::default();
        let client = ApiClient::new(api_base)
            .unwrap()
            .payouts(&config.process_path, None);
        PayoutCron::new(&config, client).unwrap()
    }

    #[test]
    fn test_parse_schedule_accepts_five_and_six_fields() {
        assert!(parse_schedule("0 9 * * *").is_ok());
        assert!(parse_schedule("30 0 9 * * *").is_ok());
        assert!(parse_schedule("nine o'clock").is_err());
    }

    #[test]
    fn test_next_run_is_nine_in_manila() {
        let cron = cron_for("http://localhost:5000/api");

        // 08:00 in Manila
        let now = Utc.with_ymd_and_hms(2026, 10, 18, 0, 0, 0).unwrap();
        assert_eq!(
            cron.next_run_after(now),
            Some(Utc.with_ymd_and_hms(2026, 10, 18, 1, 0, 0).unwrap())
        );

        // Exactly at the firing time the next one is a day later
        let now = Utc.with_ymd_and_hms(2026, 10, 18, 1, 0, 0).unwrap();
        assert_eq!(
            cron.next_run_after(now),
            Some(Utc.with_ymd_and_hms(2026, 10, 19, 1, 0, 0).unwrap())
        );
    }

    #[tokio::test]
    async fn test_run_once_reports_summary() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/payouts/process-ready"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": { "processed": 2, "errors": [] }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let cron = cron_for(&format!("{}/api", server.uri()));
        let summary = tokio_test::assert_ok!(cron.run_once().await);
        assert_eq!(summary.processed, 2);
        assert_eq!(summary.error_count(), 0);
    }
}
