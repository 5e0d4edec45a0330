//! API Request Handlers

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    Json,
};
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

use super::types::{HealthData, OverviewQuery};
use crate::core::proxy::{AnalysisProxy, AnalyzeWalletRequest};
use crate::models::config::AppConfig;
use crate::models::errors::{AppError, AppResult};
use crate::models::types::{AnalysisResult, WalletOverview};
use crate::providers::solana::LedgerClient;
use crate::utils::constants::{DEFAULT_TRANSACTION_LIMIT, MAX_TRANSACTION_LIMIT};

/// Shared application state
pub struct AppState {
    pub proxy: AnalysisProxy,
    pub ledger: LedgerClient,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(proxy: AnalysisProxy, ledger: LedgerClient) -> Self {
        Self {
            proxy,
            ledger,
            start_time: Instant::now(),
        }
    }

    pub fn from_config(config: &AppConfig) -> eyre::Result<Self> {
        Ok(Self::new(
            AnalysisProxy::from_config(config)?,
            LedgerClient::from_config(config)?,
        ))
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

// ============================================
// Health Check
// ============================================

pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthData> {
    Json(HealthData {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.uptime_seconds(),
    })
}

// ============================================
// Wallet Analysis
// ============================================

/// POST /api/analyze_wallet
///
/// Body is taken raw so that a malformed body maps onto the error envelope
/// instead of axum's plain-text rejection.
pub async fn analyze_wallet(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> AppResult<Json<AnalysisResult>> {
    let request = if body.is_empty() {
        AnalyzeWalletRequest::default()
    } else {
        AnalyzeWalletRequest::from_slice(&body)?
    };

    let result = state.proxy.analyze(&request).await?;
    Ok(Json(result))
}

/// GET /api/wallet_activity/:wallet
pub async fn wallet_activity(
    State(state): State<Arc<AppState>>,
    Path(wallet): Path<String>,
) -> AppResult<Json<Value>> {
    let activity = state.proxy.wallet_activity(&wallet).await?;
    Ok(Json(activity))
}

/// POST /api/explain
pub async fn explain(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> AppResult<Json<Value>> {
    let payload: Value =
        serde_json::from_slice(&body).map_err(|e| AppError::invalid_body(e.to_string()))?;
    let explanation = state.proxy.explain(&payload).await?;
    Ok(Json(explanation))
}

// ============================================
// Ledger Overview
// ============================================

/// GET /api/wallet_overview/:wallet?limit=N
///
/// Always 200: ledger failures degrade to empty data.
pub async fn wallet_overview(
    State(state): State<Arc<AppState>>,
    Path(wallet): Path<String>,
    query: Option<Query<OverviewQuery>>,
) -> Json<WalletOverview> {
    let limit = query
        .map(|Query(q)| q.limit)
        .filter(|limit| *limit > 0)
        .unwrap_or(DEFAULT_TRANSACTION_LIMIT)
        .min(MAX_TRANSACTION_LIMIT);

    let overview = state.ledger.fetch_overview(wallet.trim(), limit).await;
    info!(
        "📊 Overview {}: {:.4} SOL, {} tokens, {} transactions",
        overview.wallet,
        overview.native_balance,
        overview.token_count,
        overview.transactions.len()
    );
    Json(overview)
}
