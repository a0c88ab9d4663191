use std::sync::Arc;

use actix_web::web;
use anyhow::Context;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod config;
mod domain;
mod http;
mod metrics;
mod store;
mod utils;

use config::{AppConfig, DatabaseConfig};
use domain::order::OrdersHandler;
use metrics::Metrics;
use store::{Fixtures, InMemoryStore, PgStore, Store, SystemClock};
use utils::{retry_on_transient, RetryConfig};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Structured logging, INFO by default, overridable with RUST_LOG
    // Example: RUST_LOG=debug cargo run
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_thread_ids(true))
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,coffee_orders=debug"))
        )
        .init();

    tracing::info!("☕ Starting coffee order service");

    let config = AppConfig::from_env()?;

    // === 1. Storage backend ===
    let store: Arc<dyn Store> = match &config.database {
        Some(database) => Arc::new(connect_postgres(database).await?),
        None => {
            tracing::warn!("DATABASE_URL not set, orders are kept in memory only");
            Arc::new(in_memory_store(&config)?)
        }
    };

    // === 2. Metrics ===
    let metrics = Metrics::new()?;
    tracing::info!("📊 Metrics registry created with {} metrics", metrics.registry().gather().len());

    // === 3. HTTP API ===
    let handler = OrdersHandler::new(store, Arc::new(SystemClock));
    http::run_server(&config.http, web::Data::new(handler), web::Data::new(metrics)).await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn connect_postgres(database: &DatabaseConfig) -> anyhow::Result<PgStore> {
    tracing::info!("Connecting to PostgreSQL...");

    let retry = RetryConfig::default().with_max_attempts(database.connect_attempts);
    let store = retry_on_transient(retry, |_attempt| PgStore::connect(database))
        .await
        .into_result()
        .context("could not connect to PostgreSQL")?;

    store.ensure_schema().await?;
    Ok(store)
}

fn in_memory_store(config: &AppConfig) -> anyhow::Result<InMemoryStore> {
    let Some(path) = &config.fixtures_path else {
        return Ok(InMemoryStore::new());
    };

    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading fixtures from {}", path.display()))?;
    let fixtures: Fixtures = serde_json::from_str(&raw)
        .with_context(|| format!("parsing fixtures from {}", path.display()))?;

    tracing::info!(
        users = fixtures.users.len(),
        coffees = fixtures.coffees.len(),
        "Loaded fixtures"
    );
    Ok(InMemoryStore::from_fixtures(fixtures)?)
}
