//! Analysis Proxy - Request Validation & Reply Interpretation
//!
//! Pipeline for one analysis request:
//! 1. Validate the wallet (no network call when it is missing or blank)
//! 2. POST `{ "wallet": ... }` to the analysis service, cache-busted
//! 3. Interpret the reply: status first, body parsed exactly once
//! 4. Normalize `detailed.token_forensics`
//!
//! Status mapping:
//! - upstream non-2xx -> same status, `error`/`details` lifted from its body
//! - upstream 2xx, body not JSON or not a result -> 502
//! - transport failure -> 500

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use super::normalizer::{normalize_result, NormalizationReport};
use crate::models::config::AppConfig;
use crate::models::errors::{AppError, AppResult};
use crate::models::types::AnalysisResult;
use crate::providers::analysis::{AnalysisServiceClient, UpstreamReply};
use crate::utils::constants::{
    ANALYZE_WALLET_SEGMENTS, EXPLAIN_SEGMENTS, WALLET_ACTIVITY_SEGMENTS,
};

// ============================================
// REQUEST
// ============================================

/// Body of an analysis request
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalyzeWalletRequest {
    #[serde(default)]
    pub wallet: Option<String>,
    /// Caller's freshness nonce of any JSON type; accepted and ignored,
    /// the outbound cache buster is always generated here.
    #[serde(default)]
    pub timestamp: Option<Value>,
}

impl AnalyzeWalletRequest {
    pub fn new(wallet: impl Into<String>) -> Self {
        Self {
            wallet: Some(wallet.into()),
            timestamp: None,
        }
    }

    /// Parse a raw request body
    pub fn from_slice(body: &[u8]) -> AppResult<Self> {
        serde_json::from_slice(body).map_err(|e| AppError::invalid_body(e.to_string()))
    }

    /// Trimmed, non-empty wallet or a validation error
    pub fn validated_wallet(&self) -> AppResult<&str> {
        match self.wallet.as_deref().map(str::trim) {
            Some(wallet) if !wallet.is_empty() => Ok(wallet),
            _ => Err(AppError::missing_wallet()),
        }
    }
}

// ============================================
// PROXY
// ============================================

/// Forwards requests to the analysis service and interprets its replies
#[derive(Clone)]
pub struct AnalysisProxy {
    client: AnalysisServiceClient,
}

impl AnalysisProxy {
    pub fn new(client: AnalysisServiceClient) -> Self {
        Self { client }
    }

    pub fn from_config(config: &AppConfig) -> eyre::Result<Self> {
        let client = AnalysisServiceClient::new(&config.backend_url, config.upstream_timeout)?;
        info!("✅ Analysis backend: {}", config.backend_url);
        Ok(Self::new(client))
    }

    /// Forward a request and return the decoded result without normalization
    pub async fn forward(&self, request: &AnalyzeWalletRequest) -> AppResult<AnalysisResult> {
        let wallet = request.validated_wallet()?;
        if let Some(nonce) = &request.timestamp {
            debug!("Client freshness nonce {} ignored", nonce);
        }

        let body = serde_json::json!({ "wallet": wallet });
        let reply = self.client.post_json(&ANALYZE_WALLET_SEGMENTS, &body).await?;
        interpret_analysis_reply(reply)
    }

    /// Full pipeline: forward, then normalize the forensic map
    pub async fn analyze(&self, request: &AnalyzeWalletRequest) -> AppResult<AnalysisResult> {
        let (result, report) = self.analyze_with_report(request).await?;
        if report.faulted > 0 {
            warn!(
                "⚠️ {} of {} forensic entries for {} could not be normalized",
                report.faulted, report.total, result.wallet
            );
        }
        Ok(result)
    }

    pub async fn analyze_with_report(
        &self,
        request: &AnalyzeWalletRequest,
    ) -> AppResult<(AnalysisResult, NormalizationReport)> {
        let mut result = self.forward(request).await?;
        let report = normalize_result(&mut result);
        info!(
            "🛡️ {} rated {} (trust score {})",
            result.wallet, result.risk_rating, result.trust_score
        );
        Ok((result, report))
    }

    /// Recent activity as reported by the analysis service, relayed as-is
    pub async fn wallet_activity(&self, wallet: &str) -> AppResult<Value> {
        let wallet = wallet.trim();
        if wallet.is_empty() {
            return Err(AppError::missing_wallet());
        }

        let mut segments = WALLET_ACTIVITY_SEGMENTS.to_vec();
        segments.push(wallet);
        let reply = self.client.get(&segments).await?;
        interpret_json_reply(reply)
    }

    /// Natural-language explanation of a report, relayed as-is
    pub async fn explain(&self, body: &Value) -> AppResult<Value> {
        let reply = self.client.post_json(&EXPLAIN_SEGMENTS, body).await?;
        interpret_json_reply(reply)
    }
}

// ============================================
// REPLY INTERPRETATION
// ============================================

/// Decode an analysis reply into a typed result
pub fn interpret_analysis_reply(reply: UpstreamReply) -> AppResult<AnalysisResult> {
    let value = interpret_json_reply(reply)?;
    AnalysisResult::from_value(value).map_err(AppError::malformed_upstream)
}

/// Status check plus a single JSON parse of the body
pub fn interpret_json_reply(reply: UpstreamReply) -> AppResult<Value> {
    let parsed = serde_json::from_str::<Value>(&reply.body);

    if !reply.is_success() {
        let (error, details) = match &parsed {
            Ok(body) => extract_upstream_error(body),
            Err(_) => (None, None),
        };
        warn!("❌ Analysis backend answered {}", reply.status);
        return Err(AppError::upstream_status(reply.status, error, details));
    }

    parsed.map_err(|e| {
        AppError::malformed_upstream(format!(
            "The backend returned an invalid JSON response ({})",
            e
        ))
    })
}

/// Pull `error` and `details` out of an upstream failure body.
///
/// Recognized shapes:
/// - `{ "error": ..., "details": ... }` or `{ "error": ..., "message": ... }`
/// - `{ "detail": { "error": ..., "details": ... } }`
/// - `{ "detail": "text" }` or `{ "detail": [ ... ] }`
fn extract_upstream_error(body: &Value) -> (Option<String>, Option<String>) {
    let nested = body.get("detail");

    let error = string_field(body, "error")
        .or_else(|| nested.and_then(|detail| string_field(detail, "error")));

    let details = string_field(body, "details")
        .or_else(|| string_field(body, "message"))
        .or_else(|| match nested {
            Some(Value::String(text)) => Some(text.clone()),
            Some(detail @ Value::Object(_)) => string_field(detail, "details")
                .or_else(|| string_field(detail, "message")),
            Some(Value::Null) | None => None,
            Some(other) => Some(other.to_string()),
        });

    (error, details)
}

fn string_field(value: &Value, field: &str) -> Option<String> {
    value
        .get(field)
        .and_then(Value::as_str)
        .map(str::to_string)
}
