//! Providers Module - External Data Sources
//!
//! Outbound transports: the ledger JSON-RPC gateway and the analysis service.

pub mod analysis;
pub mod rpc;
pub mod solana;

pub use analysis::*;
pub use rpc::*;
pub use solana::*;
