use serde::Deserialize;

/// Result of one payout processing run
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayoutRunSummary {
    #[serde(default)]
    pub processed: u64,
    #[serde(default)]
    pub errors: Vec<serde_json::Value>,
}

impl PayoutRunSummary {
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }
}
