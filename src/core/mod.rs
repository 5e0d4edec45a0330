//! Core Module - Analysis Relay Logic
//!
//! Proxy pipeline (validate, forward, interpret) and the token forensics
//! normalizer. Transport lives in providers/, HTTP surface in api/.

pub mod normalizer;
pub mod proxy;

pub use normalizer::*;
pub use proxy::*;
