//! Centralized Error Handling Module
//!
//! Every surfaced failure carries a unique code so logs and the error
//! envelope can be correlated.
//!
//! Error codes follow pattern: CATEGORY_SPECIFIC_ERROR
//! - VALIDATION_xxx: caller input, never retried
//! - UPSTREAM_xxx: analysis service failures, always surfaced
//! - NORMALIZATION_xxx: per-entry forensic map faults, contained locally
//! - CFG_xxx: configuration errors

use std::fmt;

use crate::utils::constants::{DEFAULT_UPSTREAM_DETAILS, DEFAULT_UPSTREAM_ERROR};

/// Application-wide error type
#[derive(Debug)]
pub struct AppError {
    /// Unique error code for logging/monitoring
    pub code: ErrorCode,
    /// Short human-readable message (`error` in the envelope)
    pub message: String,
    /// Technical detail (`details` in the envelope)
    pub details: Option<String>,
    /// Status override; set when an upstream status is propagated verbatim
    pub status: Option<u16>,
    /// Optional underlying error
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new AppError
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
            status: None,
            source: None,
        }
    }

    /// Create AppError with source error
    pub fn with_source(
        code: ErrorCode,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            source: Some(Box::new(source)),
            ..Self::new(code, message)
        }
    }

    /// Attach a technical detail string
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Get error code as string (for logging)
    pub fn code_str(&self) -> &'static str {
        self.code.as_str()
    }

    /// HTTP status for the error envelope
    pub fn http_status(&self) -> u16 {
        self.status.unwrap_or_else(|| self.code.http_status())
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code.as_str(), self.message)?;
        if let Some(details) = &self.details {
            write!(f, ": {}", details)?;
        }
        Ok(())
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_ref().map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Unique error codes for monitoring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // ============================================
    // Validation Errors
    // ============================================
    /// Wallet missing or empty
    ValidationMissingWallet,
    /// Request body is not the expected JSON object
    ValidationInvalidBody,

    // ============================================
    // Upstream (Analysis Service) Errors
    // ============================================
    /// Could not connect to the analysis service
    UpstreamConnectionFailed,
    /// Transport timeout talking to the analysis service
    UpstreamTimeout,
    /// Analysis service answered with a non-2xx status
    UpstreamStatus,
    /// Analysis service answered 2xx with an unusable body
    UpstreamMalformedBody,

    // ============================================
    // Normalization Errors
    // ============================================
    /// One forensic entry could not be interpreted
    NormalizationFault,

    // ============================================
    // Configuration Errors
    // ============================================
    /// Invalid configuration value
    ConfigInvalidValue,

    // ============================================
    // Generic Errors
    // ============================================
    /// Unknown error
    Unknown,
}

impl ErrorCode {
    /// Get string representation of error code
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ValidationMissingWallet => "VALIDATION_MISSING_WALLET",
            Self::ValidationInvalidBody => "VALIDATION_INVALID_BODY",

            Self::UpstreamConnectionFailed => "UPSTREAM_CONNECTION_FAILED",
            Self::UpstreamTimeout => "UPSTREAM_TIMEOUT",
            Self::UpstreamStatus => "UPSTREAM_STATUS",
            Self::UpstreamMalformedBody => "UPSTREAM_MALFORMED_BODY",

            Self::NormalizationFault => "NORMALIZATION_FAULT",

            Self::ConfigInvalidValue => "CFG_INVALID_VALUE",

            Self::Unknown => "UNKNOWN_ERROR",
        }
    }

    /// Get HTTP status code for API responses
    pub fn http_status(&self) -> u16 {
        match self {
            Self::ValidationMissingWallet | Self::ValidationInvalidBody => 400,
            Self::UpstreamMalformedBody => 502,
            _ => 500,
        }
    }

    /// Whether a caller may reasonably try again later.
    /// Nothing in this crate retries on its own.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::UpstreamConnectionFailed | Self::UpstreamTimeout
        )
    }
}

// ============================================
// Convenience constructors
// ============================================

impl AppError {
    /// Wallet missing or empty
    pub fn missing_wallet() -> Self {
        Self::new(ErrorCode::ValidationMissingWallet, "Wallet address is required")
            .with_details("No wallet address provided in the request body")
    }

    /// Body could not be read as a request object
    pub fn invalid_body(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationInvalidBody, "Invalid request").with_details(msg)
    }

    /// Transport failure reaching the analysis service
    pub fn upstream_transport(err: reqwest::Error) -> Self {
        let code = if err.is_timeout() {
            ErrorCode::UpstreamTimeout
        } else if err.is_connect() {
            ErrorCode::UpstreamConnectionFailed
        } else {
            ErrorCode::Unknown
        };
        let details = err.to_string();
        Self::with_source(code, "Internal server error", err).with_details(details)
    }

    /// Analysis service rejected the request; its status is propagated
    pub fn upstream_status(status: u16, error: Option<String>, details: Option<String>) -> Self {
        let mut err = Self::new(
            ErrorCode::UpstreamStatus,
            error.unwrap_or_else(|| DEFAULT_UPSTREAM_ERROR.to_string()),
        )
        .with_details(details.unwrap_or_else(|| DEFAULT_UPSTREAM_DETAILS.to_string()));
        err.status = Some(status);
        err
    }

    /// Analysis service returned a 2xx body that cannot be used
    pub fn malformed_upstream(details: impl Into<String>) -> Self {
        Self::new(ErrorCode::UpstreamMalformedBody, "Invalid response from backend")
            .with_details(details)
    }

    /// Invalid configuration value
    pub fn invalid_config(key: &str, value: &str) -> Self {
        Self::new(
            ErrorCode::ConfigInvalidValue,
            format!("Invalid value for {}: {:?}", key, value),
        )
    }
}

// ============================================
// Result type alias
// ============================================

/// Application Result type
pub type AppResult<T> = Result<T, AppError>;
