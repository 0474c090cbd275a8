//! Error handling for the transaction analyzer.
//!
//! Two layers of errors exist. [`DecodeError`] is produced by the binary
//! codec, the schema decoder and the ABI interpreter; the analyzer catches
//! it at the point of decode and turns it into an inline note in the report.
//! [`AnalyzerError`] is what escapes to callers: failing to unpack the
//! transaction envelope, or failing to read the input at all.

use thiserror::Error;
use std::fmt;

/// Errors raised while decoding bytes against a schema.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The input ended before the schema was satisfied.
    #[error("unexpected end of input at offset {offset}: needed {needed} bytes, {remaining} remaining")]
    Truncated {
        offset: usize,
        needed: usize,
        remaining: usize,
    },

    /// The bytes are present but do not form a valid encoding.
    #[error("invalid data at offset {offset}: {reason}")]
    InvalidData { offset: usize, reason: String },

    /// A schema references a type that is neither built in nor declared.
    #[error("unknown type `{0}`")]
    UnknownType(String),

    /// Type resolution recursed too deeply, usually a self-referencing schema.
    #[error("maximum nesting depth of {0} exceeded")]
    DepthExceeded(usize),
}

impl DecodeError {
    pub fn invalid(offset: usize, reason: impl Into<String>) -> Self {
        DecodeError::InvalidData {
            offset,
            reason: reason.into(),
        }
    }

    /// Whether the error comes from the schema itself rather than from the data.
    pub fn is_structural(&self) -> bool {
        matches!(self, DecodeError::UnknownType(_) | DecodeError::DepthExceeded(_))
    }

    /// Short label used in report notes.
    pub fn class(&self) -> &'static str {
        if self.is_structural() {
            "schema error"
        } else {
            "decode error"
        }
    }
}

pub type DecodeResult<T> = Result<T, DecodeError>;

/// Main error type for the analyzer.
#[derive(Error, Debug)]
pub enum AnalyzerError {
    /// The packed transaction envelope could not be unpacked.
    #[error("Unpack error: {context}: {source}")]
    Unpack {
        context: ErrorContext,
        #[source]
        source: DecodeError,
    },

    /// Compressed transaction data could not be inflated.
    #[error("Decompression error: {0}")]
    Decompression(String),

    /// Input could not be recognised as a packed transaction.
    #[error("Input parsing error: {0}")]
    InputParsing(String),

    /// Errors related to file I/O.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Errors from the JSON layer.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for the analyzer.
pub type AnalyzerResult<T> = Result<T, AnalyzerError>;

/// Where an envelope error happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorContext {
    /// Component where the error occurred (e.g., "packed_transaction").
    pub component: String,

    /// Operation being performed when the error occurred (e.g., "unpack").
    pub operation: String,

    /// Additional context details, such as input sizes.
    pub details: Option<String>,
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "in {} while {}", self.component, self.operation)?;
        if let Some(details) = &self.details {
            write!(f, " ({})", details)?;
        }
        Ok(())
    }
}

/// Extension trait for turning decode failures into envelope errors.
pub trait ErrorExt<T> {
    /// Attach full context to a decode error.
    fn with_context(self, context: ErrorContext) -> AnalyzerResult<T>;

    /// Attach component and operation only.
    fn with_simple_context(self, component: &str, operation: &str) -> AnalyzerResult<T>;
}

impl<T> ErrorExt<T> for DecodeResult<T> {
    fn with_context(self, context: ErrorContext) -> AnalyzerResult<T> {
        self.map_err(|source| AnalyzerError::Unpack { context, source })
    }

    fn with_simple_context(self, component: &str, operation: &str) -> AnalyzerResult<T> {
        self.with_context(ErrorContext {
            component: component.to_string(),
            operation: operation.to_string(),
            details: None,
        })
    }
}
