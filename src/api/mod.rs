//! Wallet Shield HTTP API
//!
//! Relays wallet analysis requests to the analysis service and serves
//! supplementary ledger data.

pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod types;

pub use handlers::AppState;
pub use routes::create_router;
pub use types::*;
