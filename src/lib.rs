//! Wallet Shield Library
//!
//! Wallet risk pipeline for Solana accounts:
//! - Ledger RPC client: token holdings, signature history, native balance
//! - Analysis proxy: validated, cache-defeating relay to the analysis service
//! - Token forensics normalizer: canonical per-asset keys
//! - HTTP API exposing all of the above

pub mod api;
pub mod core;
pub mod models;
pub mod providers;
pub mod utils;

pub use crate::core::normalizer::{normalize_result, normalize_token_forensics, NormalizationReport};
pub use crate::core::proxy::{AnalysisProxy, AnalyzeWalletRequest};
pub use models::config::AppConfig;
pub use models::errors::{AppError, AppResult, ErrorCode};
pub use models::types::{
    AnalysisResult, DetailedReport, RiskRating, TokenBalance, TokenForensics,
    TokenForensicsEntry, TokenMetadata, Transaction, WalletOverview,
};
pub use providers::analysis::{AnalysisServiceClient, UpstreamReply};
pub use providers::rpc::RpcProvider;
pub use providers::solana::LedgerClient;
