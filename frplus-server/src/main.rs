mod admin;
mod calculations;
mod config;
mod error;
mod network;
mod store;
mod types;

use config::Config;
use network::routes::app;
use network::state::AppState;
use std::{net::SocketAddr, sync::Arc};
use store::PgStore;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
    dotenvy::dotenv().ok();

    info!("🚀 Starting FRPlus server...");

    let config = Config::from_env()?;
    info!("📋 Configuration loaded");

    let store = Arc::new(PgStore::connect(&config).await?);

    if config.seed_admin_on_start {
        match admin::seed_admin(store.as_ref(), &config.admin).await {
            Ok(outcome) if outcome.created => info!("👤 Seeded admin {}", outcome.email),
            Ok(_) => {}
            Err(e) => tracing::error!("❌ Admin seed failed: {}", e),
        }
    }

    let state = Arc::new(AppState::new(config.clone(), store));
    let app = app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    info!("🌐 HTTP server starting on {}", addr);
    info!("✅ FRPlus server is ready!");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
