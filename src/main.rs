//! Wallet Shield CLI
//!
//! One-shot risk check for a single account:
//!   wallet_shield <WALLET> [--limit N] [--skip-analysis]
//!
//! Prints `{ "overview": ..., "analysis": ... }` as pretty JSON on stdout.
//! Logs go to stderr. Exits non-zero when the analysis step fails; ledger
//! failures only degrade the overview.

use clap::Parser;
use eyre::Result;
use serde_json::json;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use wallet_shield::api::ErrorBody;
use wallet_shield::utils::constants::{APP_NAME, APP_VERSION, DEFAULT_TRANSACTION_LIMIT};
use wallet_shield::{AnalysisProxy, AnalyzeWalletRequest, AppConfig, LedgerClient};

#[derive(Parser)]
#[command(author, version, about = "Wallet risk check for Solana accounts")]
struct Cli {
    /// Account address to inspect
    wallet: String,

    /// Number of recent transactions to fetch
    #[arg(short, long, default_value_t = DEFAULT_TRANSACTION_LIMIT)]
    limit: usize,

    /// Only fetch ledger data, do not call the analysis service
    #[arg(long)]
    skip_analysis: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();
    let config = AppConfig::from_env()?;
    info!("🛡️ {} v{}", APP_NAME, APP_VERSION);

    let ledger = LedgerClient::from_config(&config)?;
    let overview = ledger.fetch_overview(cli.wallet.trim(), cli.limit).await;

    if cli.skip_analysis {
        println!("{}", serde_json::to_string_pretty(&json!({ "overview": overview }))?);
        return Ok(());
    }

    let proxy = AnalysisProxy::from_config(&config)?;
    match proxy.analyze(&AnalyzeWalletRequest::new(cli.wallet)).await {
        Ok(analysis) => {
            let high_risk = analysis.high_risk_token_count();
            let report = json!({
                "overview": overview,
                "analysis": analysis,
                "high_risk_token_count": high_risk,
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(())
        }
        Err(e) => {
            error!("❌ Analysis failed: {}", e);
            let report = json!({
                "overview": overview,
                "error": ErrorBody::from(&e),
                "status": e.http_status(),
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
            std::process::exit(1);
        }
    }
}
