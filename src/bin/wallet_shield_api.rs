//! Wallet Shield API Server
//!
//! Usage:
//!   cargo run --bin wallet_shield_api
//!
//! Environment (a `.env` file is honored):
//!   ANALYSIS_BACKEND_URL  - Analysis service base URL (default: http://localhost:8000)
//!   LEDGER_RPC_URL        - Ledger RPC endpoint (default: https://mainnet.helius-rpc.com)
//!   LEDGER_RPC_API_KEY    - Ledger RPC credential (fallback: HELIUS_API_KEY)
//!   PORT                  - Server port (fallback: WALLET_SHIELD_PORT, default: 8080)
//!   WALLET_SHIELD_HOST    - Server host (default: 0.0.0.0)
//!   UPSTREAM_TIMEOUT_SECS - Outbound call timeout (default: none)
//!   RUST_LOG              - Log filter (default: info)

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use wallet_shield::api::{create_router, AppState};
use wallet_shield::utils::constants::{APP_NAME, APP_VERSION};
use wallet_shield::AppConfig;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .init();

    let config = AppConfig::from_env()?;
    let state = Arc::new(AppState::from_config(&config)?);
    let app = create_router(state);

    let addr = config.bind_addr();

    info!("🚀 {} API v{} starting on http://{}", APP_NAME, APP_VERSION, addr);
    info!("Endpoints:");
    info!("  POST /api/analyze_wallet           - Wallet risk analysis");
    info!("  GET  /api/wallet_activity/:wallet  - Recent activity (analysis service)");
    info!("  POST /api/explain                  - Report explanation (analysis service)");
    info!("  GET  /api/wallet_overview/:wallet  - Balance, holdings, transactions");
    info!("  GET  /api/health                   - Health check");
    info!("Press Ctrl+C for graceful shutdown");

    let listener = TcpListener::bind(&addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("👋 {} API shutdown complete", APP_NAME);
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("⚠️ Failed to install Ctrl+C handler: {}", e);
        std::future::pending::<()>().await;
    }
    info!("🛑 Shutdown signal received");
}
