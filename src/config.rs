use chrono::FixedOffset;
use serde::Deserialize;

/// Application configuration
#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Base URL of the Museo REST API (e.g. https://api.museo.example/api)
    pub api_base: String,

    /// Name of the upstream session cookie, used to key open details views
    #[serde(default = "default_session_cookie")]
    pub session_cookie: String,

    /// Maximum request body size for return creation (evidence uploads)
    #[serde(default = "default_upload_limit")]
    pub upload_limit_bytes: usize,

    /// Minutes an open details view may sit idle before it is dropped
    #[serde(default = "default_details_idle_minutes")]
    pub details_idle_minutes: u64,

    /// Payout cron configuration
    #[serde(default)]
    pub payout: PayoutConfig,
}

#[derive(Clone, Debug, Deserialize)]
pub struct PayoutConfig {
    /// Run the payout cron inside this process
    #[serde(default = "default_payout_enabled")]
    pub enabled: bool,

    /// Five-field cron expression (minute hour day month weekday)
    #[serde(default = "default_payout_schedule")]
    pub schedule: String,

    /// Timezone label, only used for logging
    #[serde(default = "default_payout_timezone")]
    pub timezone: String,

    /// Offset of `timezone` from UTC in hours
    #[serde(default = "default_payout_offset")]
    pub utc_offset_hours: i32,

    /// Path of the payout processing endpoint, relative to `api_base`
    #[serde(default = "default_payout_path")]
    pub process_path: String,

    /// Bearer token for the payout endpoint
    pub token: Option<String>,
}

impl Default for PayoutConfig {
    fn default() -> Self {
        Self {
            enabled: default_payout_enabled(),
            schedule: default_payout_schedule(),
            timezone: default_payout_timezone(),
            utc_offset_hours: default_payout_offset(),
            process_path: default_payout_path(),
            token: None,
        }
    }
}

impl PayoutConfig {
    /// Fixed UTC offset the schedule is evaluated in
    pub fn offset(&self) -> anyhow::Result<FixedOffset> {
        FixedOffset::east_opt(self.utc_offset_hours * 3600)
            .ok_or_else(|| anyhow::anyhow!("invalid utc offset: {} hours", self.utc_offset_hours))
    }
}

// Default value functions
fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_session_cookie() -> String {
    "token".to_string()
}

fn default_upload_limit() -> usize {
    20 * 1024 * 1024 // 20 MiB
}

fn default_details_idle_minutes() -> u64 {
    30
}

fn default_payout_enabled() -> bool {
    true
}

fn default_payout_schedule() -> String {
    "0 9 * * *".to_string()
}

fn default_payout_timezone() -> String {
    "Asia/Manila".to_string()
}

fn default_payout_offset() -> i32 {
    8
}

fn default_payout_path() -> String {
    "/payouts/process-ready".to_string()
}

impl Config {
    /// Load configuration from environment and config file
    pub fn load() -> anyhow::Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            // Start with defaults
            .set_default("host", default_host())?
            .set_default("port", default_port())?
            .set_default("session_cookie", default_session_cookie())?
            .set_default("upload_limit_bytes", default_upload_limit() as u64)?
            .set_default("details_idle_minutes", default_details_idle_minutes())?
            // Load from config file if exists
            .add_source(config::File::with_name("config").required(false))
            // Override with environment variables (MUSEO_ prefix)
            .add_source(
                config::Environment::with_prefix("MUSEO")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Config = config.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.api_base.trim().is_empty() {
            anyhow::bail!("api_base is required");
        }
        reqwest::Url::parse(&self.api_base)
            .map_err(|e| anyhow::anyhow!("api_base is not a valid URL: {}", e))?;

        if self.payout.enabled {
            crate::services::payout_cron::parse_schedule(&self.payout.schedule)?;
            self.payout.offset()?;
        }

        Ok(())
    }
}
