//! API Request/Response Types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::models::errors::AppError;
use crate::utils::constants::DEFAULT_TRANSACTION_LIMIT;

/// Error envelope returned on every failure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl From<&AppError> for ErrorBody {
    fn from(err: &AppError) -> Self {
        Self {
            error: err.message.clone(),
            details: err.details.clone(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            error!(
                code = self.code_str(),
                status = status.as_u16(),
                transient = self.code.is_transient(),
                "{}",
                self
            );
        } else {
            warn!(code = self.code_str(), status = status.as_u16(), "{}", self);
        }

        (status, Json(ErrorBody::from(&self))).into_response()
    }
}

// ============================================
// Health
// ============================================

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthData {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
}

// ============================================
// Wallet Overview
// ============================================

#[derive(Debug, Deserialize)]
pub struct OverviewQuery {
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    DEFAULT_TRANSACTION_LIMIT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_body_shape() {
        let body = ErrorBody::from(&AppError::missing_wallet());
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["error"], "Wallet address is required");
        assert_eq!(value["details"], "No wallet address provided in the request body");

        let bare = ErrorBody {
            error: "x".into(),
            details: None,
        };
        assert!(serde_json::to_value(&bare).unwrap().get("details").is_none());
    }

    #[test]
    fn test_error_response_status() {
        let response = AppError::upstream_status(418, None, None).into_response();
        assert_eq!(response.status(), StatusCode::IM_A_TEAPOT);

        let response = AppError::malformed_upstream("x").into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }
}
