mod api;
mod config;
mod error;
mod middleware;
mod models;
mod routes;
mod services;

use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api::ApiClient;
use crate::config::Config;
use crate::services::{DetailsStore, PayoutCron};

/// Application state shared across all handlers
pub struct AppState {
    pub api: ApiClient,
    pub details: DetailsStore,
    pub config: Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "museo=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::load()?;
    tracing::info!("Configuration loaded, API at {}", config.api_base);

    let api = ApiClient::new(&config.api_base)?;

    // Payout cron
    if config.payout.enabled {
        let client = api.payouts(&config.payout.process_path, config.payout.token.clone());
        let cron = PayoutCron::new(&config.payout, client)?;
        tokio::spawn(cron.run());
    } else {
        tracing::warn!("Payout cron disabled");
    }

    // Create shared application state
    let state = Arc::new(AppState {
        api,
        details: DetailsStore::new(),
        config: config.clone(),
    });

    // Spawn background task dropping idle details views
    let bg_state = state.clone();
    tokio::spawn(async move {
        prune_details_task(bg_state).await;
    });

    let app = routes::router(state);

    // Start server
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Background task to drop details views nobody has touched lately
async fn prune_details_task(state: Arc<AppState>) {
    let max_idle = Duration::from_secs(state.config.details_idle_minutes * 60);
    let mut interval = tokio::time::interval(Duration::from_secs(60));

    loop {
        interval.tick().await;

        let pruned = state.details.prune_idle(max_idle).await;
        if pruned > 0 {
            tracing::info!(
                "Dropped {} idle details views, {} still open",
                pruned,
                state.details.len().await
            );
        }
    }
}
