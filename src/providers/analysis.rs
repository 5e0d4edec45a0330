//! Analysis Service Client - Cache-Defeating HTTP Transport
//!
//! Every outbound request:
//! - carries a fresh `t=<unix millis>` query parameter
//! - sends `Cache-Control: no-cache, no-store, must-revalidate` and `Pragma: no-cache`
//! - reads the response body exactly once, as text
//!
//! Interpreting the reply (status vs. body) is the proxy's job, see
//! core/proxy.rs. This layer only reports transport failures.

use chrono::Utc;
use eyre::{eyre, Result};
use reqwest::header::{HeaderMap, HeaderValue, CACHE_CONTROL, PRAGMA, USER_AGENT};
use reqwest::Url;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use crate::models::errors::{AppError, AppResult};
use crate::utils::constants::{
    CACHE_BUST_PARAM, NO_CACHE_DIRECTIVE, PRAGMA_NO_CACHE, USER_AGENT as USER_AGENT_CONST,
};

/// Raw upstream reply: status plus the body text, read once
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamReply {
    pub status: u16,
    pub body: String,
}

impl UpstreamReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// HTTP client for the external analysis service
#[derive(Clone)]
pub struct AnalysisServiceClient {
    base_url: Url,
    client: reqwest::Client,
}

impl AnalysisServiceClient {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let base_url =
            Url::parse(base_url).map_err(|e| eyre!("Invalid backend URL {:?}: {}", base_url, e))?;
        if base_url.cannot_be_a_base() {
            return Err(eyre!("Backend URL {} cannot carry a path", base_url));
        }

        Ok(Self {
            base_url,
            client: Self::build_client(timeout)?,
        })
    }

    fn build_client(timeout: Option<Duration>) -> Result<reqwest::Client> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_CONST));
        headers.insert(CACHE_CONTROL, HeaderValue::from_static(NO_CACHE_DIRECTIVE));
        headers.insert(PRAGMA, HeaderValue::from_static(PRAGMA_NO_CACHE));

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        builder
            .build()
            .map_err(|e| eyre!("Failed to build HTTP client: {}", e))
    }

    /// Base URL + path segments (each percent-encoded) + cache buster
    pub fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url.query_pairs_mut().append_pair(
            CACHE_BUST_PARAM,
            &Utc::now().timestamp_millis().to_string(),
        );
        url
    }

    /// POST a JSON body
    pub async fn post_json(&self, segments: &[&str], body: &Value) -> AppResult<UpstreamReply> {
        let url = self.endpoint(segments);
        debug!("📤 POST {}", url);
        let request = self.client.post(url).json(body);
        Self::send(request).await
    }

    /// GET without a body
    pub async fn get(&self, segments: &[&str]) -> AppResult<UpstreamReply> {
        let url = self.endpoint(segments);
        debug!("📤 GET {}", url);
        Self::send(self.client.get(url)).await
    }

    async fn send(request: reqwest::RequestBuilder) -> AppResult<UpstreamReply> {
        let response = request.send().await.map_err(AppError::upstream_transport)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(AppError::upstream_transport)?;

        debug!("📥 Upstream replied {} ({} bytes)", status, body.len());
        Ok(UpstreamReply { status, body })
    }
}
