//! Transaction report builder
//!
//! One [`Analyzer`] is one pass over one transaction. It owns the report
//! writer, the reference time and the ABI cache, and is consumed by the
//! `analyze_*` call that produces the [`Report`].

mod action;
mod report;

use chrono::{DateTime, Utc};
use log::{debug, info, warn};

use crate::cache::AbiCache;
use crate::constants::{SECTION_ACTIONS, SECTION_HEADER, SECTION_PACKED, SECTION_SIGNED};
use crate::errors::AnalyzerError;
use crate::models::transaction::{PackedTransaction, SignedTransaction, Transaction};
use crate::utils::time::{format_relative, format_timestamp};

pub use self::action::{abi_summary, write_value_tree, ActionKind, SchemaSource};
pub use self::report::ReportWriter;

/// Options for one analysis pass
#[derive(Debug, Clone, Copy, Default)]
pub struct AnalyzerConfig {
    /// Include hex dumps and ABI JSON
    pub verbose: bool,
    /// Reference time for expiration; the wall clock when unset
    pub now: Option<DateTime<Utc>>,
}

/// Result of a pass: the report text and the error that stopped it, if any
#[derive(Debug)]
pub struct Report {
    pub text: String,
    pub fatal: Option<AnalyzerError>,
}

impl Report {
    pub fn is_fatal(&self) -> bool {
        self.fatal.is_some()
    }
}

#[derive(Debug)]
enum PassState {
    Running,
    Failed(AnalyzerError),
}

/// Builds the report for a single transaction
pub struct Analyzer {
    writer: ReportWriter,
    now: DateTime<Utc>,
    cache: AbiCache,
    state: PassState,
}

impl Analyzer {
    pub fn new(verbose: bool) -> Self {
        Self::with_config(AnalyzerConfig { verbose, now: None })
    }

    pub fn with_config(config: AnalyzerConfig) -> Self {
        Self {
            writer: ReportWriter::new(config.verbose),
            now: config.now.unwrap_or_else(Utc::now),
            cache: AbiCache::new(),
            state: PassState::Running,
        }
    }

    /// Full report: envelope, unpacked transaction, header and actions.
    ///
    /// Failing to unpack is the only fatal outcome; it is written into the
    /// report and returned in [`Report::fatal`].
    pub fn analyze_packed(mut self, trx: &PackedTransaction) -> Report {
        info!("Analyzing packed transaction ({} bytes)", trx.packed_trx.len());
        self.packed_section(trx);

        self.writer.banner(SECTION_SIGNED);
        match trx.unpack() {
            Ok(signed) => {
                self.signed_section(signed);
                self.transaction_sections(&signed.transaction);
            }
            Err(e) => self.fail(e),
        }
        self.finish()
    }

    pub fn analyze_signed_transaction(mut self, signed: &SignedTransaction) -> Report {
        self.writer.banner(SECTION_SIGNED);
        self.signed_section(signed);
        self.transaction_sections(&signed.transaction);
        self.finish()
    }

    pub fn analyze_transaction(mut self, tx: &Transaction) -> Report {
        self.transaction_sections(tx);
        self.finish()
    }

    fn fail(&mut self, error: AnalyzerError) {
        warn!("Analysis stopped: {}", error);
        self.writer.line(format_args!("Could not unpack the transaction: {}", error));
        self.state = PassState::Failed(error);
    }

    fn finish(self) -> Report {
        let fatal = match self.state {
            PassState::Running => None,
            PassState::Failed(error) => Some(error),
        };
        debug!("Pass finished, {} ABIs installed", self.cache.len());
        Report {
            text: self.writer.into_text(),
            fatal,
        }
    }

    fn packed_section(&mut self, trx: &PackedTransaction) {
        self.writer.banner(SECTION_PACKED);
        match trx.id() {
            Ok(id) => self.writer.line(format_args!("Transaction ID: {}", id)),
            Err(e) => self.writer.line(format_args!("Transaction ID: unavailable ({})", e)),
        }
        self.writer.line(format_args!("Compression: {}", trx.compression));
        self.writer.line(format_args!("Signatures: {}", trx.signatures.len()));
        for (idx, signature) in trx.signatures.iter().enumerate() {
            self.writer.line(format_args!("{}. {}", idx + 1, signature));
        }
        self.writer.line(format_args!(
            "Packed context free data length: {}",
            trx.packed_context_free_data.len()
        ));
        self.writer.verbose_dump(&trx.packed_context_free_data);
        self.writer
            .line(format_args!("Packed transaction data length: {}", trx.packed_trx.len()));
        self.writer.verbose_dump(&trx.packed_trx);
    }

    fn signed_section(&mut self, signed: &SignedTransaction) {
        self.writer
            .line(format_args!("Signatures: {}", signed.signatures.len()));
        self.writer.line(format_args!(
            "Number of context-free data blobs (on Transaction): {}",
            signed.context_free_data.len()
        ));
        for (idx, blob) in signed.context_free_data.iter().enumerate() {
            self.writer.line(format_args!("{}. Blob length: {}", idx + 1, blob.len()));
            self.writer.verbose_dump(blob);
        }
    }

    fn transaction_sections(&mut self, tx: &Transaction) {
        self.header_section(tx);
        self.actions_section(tx);
    }

    fn header_section(&mut self, tx: &Transaction) {
        self.writer.banner(SECTION_HEADER);
        let expiration = tx.expiration_time();
        self.writer.line(format_args!(
            "Expiration: {} ({}, analysis time: {})",
            format_timestamp(expiration),
            format_relative(expiration, self.now),
            format_timestamp(self.now)
        ));
        self.writer
            .line(format_args!("Reference block number: {}", tx.ref_block_num));
        self.writer
            .line(format_args!("Reference block prefix: {:x}", tx.ref_block_prefix));
        self.writer.line(format_args!(
            "Maximum net usage words (of 8 bytes, 0 = unlimited): {}",
            tx.max_net_usage_words
        ));
        self.writer.line(format_args!(
            "Maximum CPU usage in milliseconds (0 = unlimited): {}",
            tx.max_cpu_usage_ms
        ));
        self.writer.line(format_args!(
            "Number of seconds to delay transaction (cancellable during that time): {}",
            tx.delay_sec
        ));
        self.writer
            .line(format_args!("Transaction extensions: {}", tx.transaction_extensions.len()));
    }

    fn actions_section(&mut self, tx: &Transaction) {
        self.writer.banner(SECTION_ACTIONS);
        self.writer
            .line(format_args!("Context-free actions: {}", tx.context_free_actions.len()));
        for (idx, action) in tx.context_free_actions.iter().enumerate() {
            self.report_action(idx, action);
        }
        self.writer.blank();
        self.writer.line(format_args!("Actions: {}", tx.actions.len()));
        for (idx, action) in tx.actions.iter().enumerate() {
            self.report_action(idx, action);
        }
    }
}
