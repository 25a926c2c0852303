//! Budgetly API Server
//!
//! Main entry point for the Budgetly backend service.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use budgetly_api::{AppState, create_router};
use budgetly_core::{BudgetPlanner, BudgetStore, CurrencyPair, InMemoryBudgetStore};
use budgetly_db::{PgBudgetStore, connect};
use budgetly_shared::{
    AppConfig, JwtConfig, JwtService,
    config::{LogFormat, StorageBackend},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;
    init_tracing(config.log.format);

    let store: Arc<dyn BudgetStore> = match config.database.backend {
        StorageBackend::Postgres => {
            let db = connect(&config.database)
                .await
                .context("Failed to connect to database")?;
            info!("Connected to database");
            Arc::new(PgBudgetStore::new(db))
        }
        StorageBackend::Memory => {
            info!("Using in-memory storage, budgets are lost on restart");
            Arc::new(InMemoryBudgetStore::new())
        }
    };

    let currencies = CurrencyPair {
        primary: config.currency.primary,
        foreign: config.currency.foreign,
    };
    let planner = BudgetPlanner::new(store, currencies);

    let jwt_service = JwtService::new(JwtConfig {
        secret: config.jwt.secret.clone(),
        audience: config.jwt.audience.clone(),
        access_token_expires_minutes: i64::try_from(config.jwt.access_token_expiry_secs / 60)
            .unwrap_or(i64::MAX),
    });

    let timezone = config.timezone()?;
    info!(
        primary = currencies.primary.code(),
        foreign = currencies.foreign.code(),
        %timezone,
        "Budget settings loaded"
    );

    let state = AppState {
        planner: Arc::new(planner),
        jwt_service: Arc::new(jwt_service),
        timezone,
        request_timeout: Duration::from_secs(config.server.request_timeout_secs),
    };

    let app = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "budgetly=debug,tower_http=debug".into());
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    info!("Shutting down");
}
