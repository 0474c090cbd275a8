//! A library for inspecting packed EOSIO transactions
//!
//! This crate unpacks a transaction, walks its header and actions, decodes
//! action payloads against built-in or freshly installed ABIs, and renders a
//! human-readable report of what the transaction would do.

pub mod analyzer;
pub mod cache;
pub mod codec;
pub mod constants;
pub mod decoder;
pub mod errors;
pub mod interpreter;
pub mod models;
pub mod utils;

use analyzer::{Analyzer, AnalyzerConfig, Report};
use errors::AnalyzerResult;
use models::transaction::PackedTransaction;

/// Main entry point: analyze a packed transaction with default settings
pub fn analyze_packed_transaction(trx: &PackedTransaction, verbose: bool) -> Report {
    Analyzer::new(verbose).analyze_packed(trx)
}

/// Parse `data` in any supported input form and analyze it.
///
/// Fails only if the input is not recognisable as a packed transaction;
/// problems inside the transaction end up in the [`Report`].
pub fn analyze_bytes(data: &[u8], config: AnalyzerConfig) -> AnalyzerResult<Report> {
    let trx = utils::transaction_parser::parse_packed_transaction(data)?;
    Ok(Analyzer::with_config(config).analyze_packed(&trx))
}

/// Version of the transaction analyzer
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
