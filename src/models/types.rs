//! Core Types for Wallet Shield
//!
//! Ledger records produced by the RPC client and the analysis report
//! relayed from the analysis service.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use crate::utils::constants::{HIGH_RISK_TOKEN_THRESHOLD, MAX_TRUST_SCORE};

// ============================================
// LEDGER RECORDS
// ============================================

/// One non-zero holding of a fungible asset in an account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenBalance {
    pub mint: String,
    /// Raw amount in the token's smallest unit, as a decimal string
    pub amount: String,
    pub decimals: u8,
    pub token_account: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_metadata: Option<TokenMetadata>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_info: Option<PriceInfo>,
}

/// Best-effort display metadata for a holding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenMetadata {
    pub name: String,
    pub symbol: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceInfo {
    pub price_per_token: f64,
    pub total_price: f64,
}

/// One historical ledger transaction for an account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub signature: String,
    /// ISO-8601, millisecond precision, UTC
    pub timestamp: String,
    #[serde(rename = "type")]
    pub tx_type: String,
    pub fee: f64,
    pub status: String,
}

/// Supplementary ledger data for one account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletOverview {
    pub wallet: String,
    /// Native balance in display units (SOL)
    pub native_balance: f64,
    pub token_count: usize,
    pub tokens: Vec<TokenBalance>,
    pub transactions: Vec<Transaction>,
}

// ============================================
// ANALYSIS REPORT
// ============================================

/// Coarse risk classification assigned by the analysis service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskRating {
    Low,
    Medium,
    High,
}

impl fmt::Display for RiskRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
        };
        write!(f, "{}", s)
    }
}

/// Per-asset forensic map, keyed by asset identifier once normalized.
/// Values stay opaque so backend-specific fields survive untouched.
pub type TokenForensics = Map<String, Value>;

/// Risk report for one account.
///
/// Fields the analysis service adds beyond the typed ones (such as
/// `combined_summary`) are kept in `extra` and serialized back verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub wallet: String,
    pub risk_rating: RiskRating,
    pub trust_score: u8,
    pub detailed: DetailedReport,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `detailed` section of a report.
///
/// Only `token_forensics` is typed since the normalizer rewrites it. Every
/// other section (`transaction_monitor`, `risk_advisor`, ...) stays in
/// `extra` exactly as received, nulls included.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetailedReport {
    /// None when the section was absent; null is read as an empty map
    #[serde(
        default,
        deserialize_with = "null_as_empty_map",
        skip_serializing_if = "Option::is_none"
    )]
    pub token_forensics: Option<TokenForensics>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DetailedReport {
    /// Forensic entries, empty when the section was absent
    pub fn forensics(&self) -> impl Iterator<Item = (&String, &Value)> + '_ {
        self.token_forensics.iter().flatten()
    }

    pub fn transaction_monitor(&self) -> Option<&Value> {
        self.extra.get("transaction_monitor")
    }

    pub fn risk_advisor(&self) -> Option<&Value> {
        self.extra.get("risk_advisor")
    }
}

fn null_as_empty_map<'de, D>(deserializer: D) -> Result<Option<TokenForensics>, D::Error>
where
    D: Deserializer<'de>,
{
    let map = Option::<TokenForensics>::deserialize(deserializer)?;
    Ok(Some(map.unwrap_or_default()))
}

impl AnalysisResult {
    /// Decode a parsed response body, enforcing the result contract.
    pub fn from_value(value: Value) -> Result<Self, String> {
        let result: AnalysisResult = serde_json::from_value(value)
            .map_err(|e| format!("response did not match the analysis result schema: {}", e))?;

        if result.trust_score > MAX_TRUST_SCORE {
            return Err(format!(
                "trust_score {} is outside 0..={}",
                result.trust_score, MAX_TRUST_SCORE
            ));
        }

        Ok(result)
    }

    /// Typed view of every forensic entry that fits the common shape
    pub fn forensic_entries(&self) -> impl Iterator<Item = (&str, TokenForensicsEntry)> + '_ {
        self.detailed
            .forensics()
            .filter_map(|(key, value)| {
                TokenForensicsEntry::from_value(value).map(|entry| (key.as_str(), entry))
            })
    }

    /// Number of held assets the service scored above the high-risk threshold
    pub fn high_risk_token_count(&self) -> usize {
        self.forensic_entries()
            .filter(|(_, entry)| entry.is_high_risk())
            .count()
    }
}

/// Common fields of a forensic entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenForensicsEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    #[serde(default)]
    pub risk_score: f64,
    #[serde(default)]
    pub is_verified: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TokenForensicsEntry {
    /// Returns None when the entry does not have the common shape
    pub fn from_value(value: &Value) -> Option<Self> {
        serde_json::from_value(value.clone()).ok()
    }

    pub fn is_high_risk(&self) -> bool {
        self.risk_score > HIGH_RISK_TOKEN_THRESHOLD
    }
}
