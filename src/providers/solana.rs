//! Solana Provider Module - Ledger RPC Gateway Client
//!
//! Read-only access to an account's token holdings, signature history and
//! native balance through standard JSON-RPC:
//! - getTokenAccountsByOwner (SPL Token program scope, jsonParsed, confirmed)
//! - getSignaturesForAddress (newest first, caller-supplied limit)
//! - getBalance (lamports)
//!
//! Every public fetch is FAIL-SOFT: transport or decode failures are logged
//! with `warn!` and degrade to an empty list or zero. Ledger data is
//! supplementary; a summary view must never block on it.
//!
//! Symbol resolution is best-effort: the jsonParsed encoding carries no
//! token metadata, so every holding reports the placeholder symbol.

use chrono::{SecondsFormat, TimeZone, Utc};
use eyre::{eyre, Result};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use super::rpc::RpcProvider;
use crate::models::config::AppConfig;
use crate::models::types::{TokenBalance, TokenMetadata, Transaction, WalletOverview};
use crate::utils::constants::{
    DEFAULT_COMMITMENT, DEFAULT_TRANSACTION_LIMIT, DEFAULT_TX_STATUS, LAMPORTS_PER_SOL,
    PLACEHOLDER_SYMBOL, TOKEN_PROGRAM, UNKNOWN_TX_TYPE,
};

// ============================================
// SOLANA RPC TYPES
// ============================================

/// `{ context, value }` wrapper used by most account queries
#[derive(Debug, Clone, Deserialize)]
struct RpcValue<T> {
    value: T,
}

/// One entry of getTokenAccountsByOwner (jsonParsed encoding)
#[derive(Debug, Clone, Deserialize)]
struct KeyedTokenAccount {
    pubkey: String,
    account: ParsedAccount,
}

#[derive(Debug, Clone, Deserialize)]
struct ParsedAccount {
    data: ParsedAccountData,
}

#[derive(Debug, Clone, Deserialize)]
struct ParsedAccountData {
    parsed: ParsedTokenAccount,
}

#[derive(Debug, Clone, Deserialize)]
struct ParsedTokenAccount {
    info: TokenAccountInfo,
}

/// Token account info
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenAccountInfo {
    pub mint: String,
    pub token_amount: TokenAmount,
}

/// Token amount
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenAmount {
    pub amount: String,
    pub decimals: u8,
    pub ui_amount: Option<f64>,
    #[serde(default)]
    pub ui_amount_string: Option<String>,
}

/// One entry of getSignaturesForAddress
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureInfo {
    pub signature: String,
    pub block_time: Option<i64>,
    pub confirmation_status: Option<String>,
}

// ============================================
// DECODING
// ============================================

/// Map one raw token-account entry to a TokenBalance.
/// Returns None for undecodable entries and for zero or absent amounts.
fn token_balance_from_entry(entry: &Value) -> Option<TokenBalance> {
    let keyed: KeyedTokenAccount = serde_json::from_value(entry.clone()).ok()?;
    let info = keyed.account.data.parsed.info;
    let amount = info.token_amount;

    if !amount.ui_amount.is_some_and(|ui| ui > 0.0) {
        return None;
    }

    // No names in jsonParsed output; the display amount stands in
    let name = amount
        .ui_amount_string
        .clone()
        .unwrap_or_else(|| amount.ui_amount.unwrap_or_default().to_string());

    Some(TokenBalance {
        mint: info.mint,
        amount: amount.amount,
        decimals: amount.decimals,
        token_account: keyed.pubkey,
        token_metadata: Some(TokenMetadata {
            name,
            symbol: PLACEHOLDER_SYMBOL.to_string(),
            image: None,
        }),
        price_info: None,
    })
}

/// Block time (seconds) to ISO-8601 with millisecond precision
fn block_time_to_iso(block_time: i64) -> Option<String> {
    let millis = block_time.checked_mul(1000)?;
    Utc.timestamp_millis_opt(millis)
        .single()
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true))
}

fn transaction_from_signature(info: SignatureInfo) -> Option<Transaction> {
    let timestamp = info.block_time.and_then(block_time_to_iso)?;

    Some(Transaction {
        signature: info.signature,
        timestamp,
        tx_type: UNKNOWN_TX_TYPE.to_string(),
        fee: 0.0,
        status: info
            .confirmation_status
            .unwrap_or_else(|| DEFAULT_TX_STATUS.to_string()),
    })
}

fn lamports_to_sol(lamports: u64) -> f64 {
    lamports as f64 / LAMPORTS_PER_SOL as f64
}

// ============================================
// LEDGER CLIENT
// ============================================

/// Stateless gateway to the ledger RPC provider
#[derive(Clone)]
pub struct LedgerClient {
    provider: RpcProvider,
}

impl LedgerClient {
    pub fn new(provider: RpcProvider) -> Self {
        Self { provider }
    }

    /// Build from configuration (endpoint + credential + timeout)
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let provider = RpcProvider::new(config.rpc_endpoint(), config.upstream_timeout)?;
        info!("✅ Ledger RPC client ready ({})", provider.masked_url());
        Ok(Self::new(provider))
    }

    // ============================================
    // FAIL-SOFT OPERATIONS
    // ============================================

    /// Non-zero fungible token holdings of an account. Empty on any failure.
    pub async fn fetch_token_balances(&self, account: &str) -> Vec<TokenBalance> {
        match self.try_fetch_token_balances(account).await {
            Ok(tokens) => tokens,
            Err(e) => {
                warn!("⚠️ Error fetching wallet tokens for {}: {}", account, e);
                Vec::new()
            }
        }
    }

    /// Most recent `limit` transactions, newest first as the provider returns them.
    /// Empty on any failure.
    pub async fn fetch_transactions(&self, account: &str, limit: usize) -> Vec<Transaction> {
        match self.try_fetch_transactions(account, limit).await {
            Ok(txs) => txs,
            Err(e) => {
                warn!("⚠️ Error fetching wallet transactions for {}: {}", account, e);
                Vec::new()
            }
        }
    }

    /// `fetch_transactions` with the default history length
    pub async fn fetch_recent_transactions(&self, account: &str) -> Vec<Transaction> {
        self.fetch_transactions(account, DEFAULT_TRANSACTION_LIMIT).await
    }

    /// Native balance in SOL. Zero on any failure.
    pub async fn fetch_native_balance(&self, account: &str) -> f64 {
        match self.try_fetch_native_balance(account).await {
            Ok(balance) => balance,
            Err(e) => {
                warn!("⚠️ Error fetching wallet balance for {}: {}", account, e);
                0.0
            }
        }
    }

    /// All three reads issued concurrently
    pub async fn fetch_overview(&self, account: &str, limit: usize) -> WalletOverview {
        let (native_balance, tokens, transactions) = tokio::join!(
            self.fetch_native_balance(account),
            self.fetch_token_balances(account),
            self.fetch_transactions(account, limit),
        );

        WalletOverview {
            wallet: account.to_string(),
            native_balance,
            token_count: tokens.len(),
            tokens,
            transactions,
        }
    }

    // ============================================
    // FALLIBLE CALLS
    // ============================================

    async fn try_fetch_token_balances(&self, account: &str) -> Result<Vec<TokenBalance>> {
        ensure_account(account)?;

        let params = serde_json::json!([
            account,
            { "programId": TOKEN_PROGRAM },
            { "encoding": "jsonParsed", "commitment": DEFAULT_COMMITMENT }
        ]);

        let result: RpcValue<Vec<Value>> =
            self.provider.call("getTokenAccountsByOwner", params).await?;

        let total = result.value.len();
        let tokens: Vec<TokenBalance> = result
            .value
            .iter()
            .filter_map(token_balance_from_entry)
            .collect();

        debug!("💰 {} of {} token accounts held by {}", tokens.len(), total, account);
        Ok(tokens)
    }

    async fn try_fetch_transactions(&self, account: &str, limit: usize) -> Result<Vec<Transaction>> {
        ensure_account(account)?;

        let params = serde_json::json!([account, { "limit": limit }]);
        let signatures: Vec<SignatureInfo> =
            self.provider.call("getSignaturesForAddress", params).await?;

        let total = signatures.len();
        let txs: Vec<Transaction> = signatures
            .into_iter()
            .filter_map(transaction_from_signature)
            .collect();

        if txs.len() < total {
            debug!("⏭️ Skipped {} signatures without block time", total - txs.len());
        }
        Ok(txs)
    }

    async fn try_fetch_native_balance(&self, account: &str) -> Result<f64> {
        ensure_account(account)?;

        let result: RpcValue<u64> = self
            .provider
            .call("getBalance", serde_json::json!([account]))
            .await?;

        Ok(lamports_to_sol(result.value))
    }
}

fn ensure_account(account: &str) -> Result<()> {
    if account.trim().is_empty() {
        return Err(eyre!("Account address is empty"));
    }
    Ok(())
}
