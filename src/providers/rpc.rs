//! RPC Client Module - Single-Endpoint JSON-RPC Transport
//!
//! One configured provider endpoint, one attempt per call. No retries, no
//! fallback, no caching: callers decide how to react to a failure.
//! Requests carry a User-Agent and ask for gzip responses.

use eyre::{eyre, Result};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_ENCODING, USER_AGENT};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::utils::constants::USER_AGENT as USER_AGENT_CONST;

/// JSON-RPC 2.0 provider bound to a single endpoint
#[derive(Clone)]
pub struct RpcProvider {
    /// Endpoint URL, possibly carrying the API credential
    url: String,
    /// HTTP client with custom headers (gzip enabled)
    client: reqwest::Client,
}

impl RpcProvider {
    /// Create a provider for an endpoint
    pub fn new(url: impl Into<String>, timeout: Option<Duration>) -> Result<Self> {
        Ok(Self {
            url: url.into(),
            client: Self::build_client(timeout)?,
        })
    }

    /// Build HTTP client with custom headers
    fn build_client(timeout: Option<Duration>) -> Result<reqwest::Client> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_CONST));
        headers.insert(ACCEPT_ENCODING, HeaderValue::from_static("gzip"));

        let mut builder = reqwest::Client::builder().default_headers(headers).gzip(true);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        builder
            .build()
            .map_err(|e| eyre!("Failed to build HTTP client: {}", e))
    }

    /// Execute a single JSON-RPC call and decode its `result`
    pub async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> Result<T> {
        let payload = serde_json::json!({
            "jsonrpc": "2.0",
            "id": method,
            "method": method,
            "params": params
        });

        debug!("📡 RPC {} -> {}", method, self.masked_url());

        // without_url keeps the credential out of error messages
        let response = self
            .client
            .post(&self.url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| eyre!("Request failed: {}", e.without_url()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(eyre!("HTTP error: {}", status));
        }

        let json: RpcResponse<T> = response
            .json()
            .await
            .map_err(|e| eyre!("Failed to parse response: {}", e.without_url()))?;

        if let Some(error) = json.error {
            return Err(eyre!("RPC error: {} (code: {})", error.message, error.code));
        }

        json.result.ok_or_else(|| eyre!("No result in response"))
    }

    /// Get RPC URL with the credential masked (for logging)
    pub fn masked_url(&self) -> String {
        match self.url.split_once("api-key=") {
            Some((base, _)) => format!("{}api-key=***HIDDEN***", base),
            None => self.url.clone(),
        }
    }
}

/// JSON-RPC response structure
#[derive(Debug, Deserialize)]
struct RpcResponse<T> {
    result: Option<T>,
    error: Option<RpcError>,
}

/// JSON-RPC error structure
#[derive(Debug, Clone, Deserialize)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
}
