//! Constants Module - Single Source of Truth
//!
//! Program ids, unit divisors, header values, default endpoints and
//! placeholder strings used across the crate. No other module hardcodes these.

// ============================================
// APPLICATION CONSTANTS
// ============================================

/// Application name
pub const APP_NAME: &str = "WalletShield";

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// User-Agent for outbound HTTP requests
pub const USER_AGENT: &str = "WalletShield/0.1.0";

// ============================================
// ENDPOINT DEFAULTS
// ============================================

/// Analysis service base URL when nothing is configured
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";

/// Ledger RPC provider when nothing is configured
pub const DEFAULT_RPC_URL: &str = "https://mainnet.helius-rpc.com";

/// Server bind defaults
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;

/// Analysis service routes (path segments, appended to the backend base URL)
pub const ANALYZE_WALLET_SEGMENTS: [&str; 2] = ["api", "analyze_wallet"];
pub const WALLET_ACTIVITY_SEGMENTS: [&str; 2] = ["api", "wallet_activity"];
pub const EXPLAIN_SEGMENTS: [&str; 2] = ["api", "explain"];

// ============================================
// CACHE DISCIPLINE
// ============================================

/// Cache-Control value sent on every upstream request and every response
pub const NO_CACHE_DIRECTIVE: &str = "no-cache, no-store, must-revalidate";

/// Pragma value for HTTP/1.0 intermediaries
pub const PRAGMA_NO_CACHE: &str = "no-cache";

/// Expires value marking responses as already stale
pub const EXPIRES_NOW: &str = "0";

/// Query parameter carrying the per-request cache buster
pub const CACHE_BUST_PARAM: &str = "t";

// ============================================
// LEDGER CONSTANTS
// ============================================

/// SPL Token Program ID (fungible-token program scope)
pub const TOKEN_PROGRAM: &str = "TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA";

/// Smallest units per native display unit (lamports per SOL)
pub const LAMPORTS_PER_SOL: u64 = 1_000_000_000;

/// Commitment level for token-account enumeration
pub const DEFAULT_COMMITMENT: &str = "confirmed";

/// Default signature history length
pub const DEFAULT_TRANSACTION_LIMIT: usize = 10;

/// Upper bound the provider accepts for one signature page
pub const MAX_TRANSACTION_LIMIT: usize = 1000;

/// Symbol reported when the provider has no verified symbol
pub const PLACEHOLDER_SYMBOL: &str = "TOKEN";

/// Transaction classification is not resolved by the RPC client
pub const UNKNOWN_TX_TYPE: &str = "Unknown";

/// Status reported when the provider omits confirmation status
pub const DEFAULT_TX_STATUS: &str = "confirmed";

// ============================================
// ANALYSIS CONSTANTS
// ============================================

/// Upper bound of the trust score scale
pub const MAX_TRUST_SCORE: u8 = 100;

/// Forensic entries above this risk score count as high risk
pub const HIGH_RISK_TOKEN_THRESHOLD: f64 = 70.0;

/// Field added to a forensic entry that could not be normalized
pub const NORMALIZATION_ERROR_FIELD: &str = "normalization_error";

/// Metadata fields lifted from a JSON-encoded forensic key into its value
pub const KEY_METADATA_FIELDS: [&str; 3] = ["name", "symbol", "logo"];

/// Generic upstream error strings
pub const DEFAULT_UPSTREAM_ERROR: &str = "Backend error";
pub const DEFAULT_UPSTREAM_DETAILS: &str = "Unknown error occurred";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lamport_divisor() {
        assert_eq!(LAMPORTS_PER_SOL, 10u64.pow(9));
    }

    #[test]
    fn test_no_cache_directive_covers_store_and_revalidate() {
        assert!(NO_CACHE_DIRECTIVE.contains("no-store"));
        assert!(NO_CACHE_DIRECTIVE.contains("must-revalidate"));
    }
}
