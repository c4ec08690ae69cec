use serde_json::json;

use super::{decode_data, handle_json, ApiClient, ApiResult};
use crate::models::PayoutRunSummary;

/// Trigger for the upstream payout processor
#[derive(Clone, Debug)]
pub struct PayoutsClient {
    api: ApiClient,
    segments: Vec<String>,
    token: Option<String>,
}

impl PayoutsClient {
    pub fn new(api: ApiClient, process_path: &str, token: Option<String>) -> Self {
        let segments = process_path
            .split('/')
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        Self {
            api,
            segments,
            token,
        }
    }

    /// Process every payout that is ready to be paid out
    pub async fn process_ready_payouts(&self) -> ApiResult<PayoutRunSummary> {
        let segments: Vec<&str> = self.segments.iter().map(String::as_str).collect();
        let url = self.api.endpoint(&segments)?;

        let mut request = self.api.http().post(url).json(&json!({}));
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let body = handle_json(request.send().await?).await?;
        decode_data(body)
    }
}
