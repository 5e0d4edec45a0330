//! Configuration module for Wallet Shield
//!
//! Endpoints and the RPC credential are supplied out of band through the
//! environment (optionally via a `.env` file). Defaults live in
//! utils/constants.rs.

use std::time::Duration;
use tracing::info;

use crate::models::errors::{AppError, AppResult};
use crate::utils::constants::{DEFAULT_BACKEND_URL, DEFAULT_HOST, DEFAULT_PORT, DEFAULT_RPC_URL};

/// Runtime configuration shared by the API server and the CLI
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Bind host for the API server
    pub host: String,
    /// Bind port for the API server
    pub port: u16,
    /// Analysis service base URL
    pub backend_url: String,
    /// Ledger RPC provider base URL
    pub rpc_url: String,
    /// Ledger RPC credential, appended as `api-key` query parameter
    pub rpc_api_key: Option<String>,
    /// Client-side timeout for outbound calls. None leaves only the
    /// transport's own limits in force.
    pub upstream_timeout: Option<Duration>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            rpc_url: DEFAULT_RPC_URL.to_string(),
            rpc_api_key: None,
            upstream_timeout: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from process environment
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Empty values count as unset
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let port = match get("PORT").or_else(|| get("WALLET_SHIELD_PORT")) {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| AppError::invalid_config("PORT", &raw))?,
            None => defaults.port,
        };

        let upstream_timeout = match get("UPSTREAM_TIMEOUT_SECS") {
            Some(raw) => {
                let secs = raw
                    .trim()
                    .parse::<u64>()
                    .ok()
                    .filter(|s| *s > 0)
                    .ok_or_else(|| AppError::invalid_config("UPSTREAM_TIMEOUT_SECS", &raw))?;
                Some(Duration::from_secs(secs))
            }
            None => None,
        };

        let rpc_api_key = get("LEDGER_RPC_API_KEY").or_else(|| get("HELIUS_API_KEY"));
        if rpc_api_key.is_some() {
            info!("🔑 Ledger RPC API key configured (key hidden)");
        }

        Ok(Self {
            host: get("WALLET_SHIELD_HOST").unwrap_or(defaults.host),
            port,
            backend_url: get("ANALYSIS_BACKEND_URL")
                .or_else(|| get("NEXT_PUBLIC_BACKEND_URL"))
                .unwrap_or(defaults.backend_url),
            rpc_url: get("LEDGER_RPC_URL").unwrap_or(defaults.rpc_url),
            rpc_api_key,
            upstream_timeout,
        })
    }

    /// Full RPC endpoint including the credential. Never log this value.
    pub fn rpc_endpoint(&self) -> String {
        match &self.rpc_api_key {
            Some(key) => format!("{}/?api-key={}", self.rpc_url.trim_end_matches('/'), key),
            None => self.rpc_url.clone(),
        }
    }

    /// Socket address string for the API server
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
