//! Input parsing for packed transactions.
//!
//! A packed transaction may arrive in several forms: the JSON object printed
//! by wallets and node APIs, a hex or base64 string of the binary encoding,
//! or the raw binary encoding itself. Each form is tried in turn and the
//! first one that yields a complete packed transaction wins.

use log::{debug, warn};
use serde::Deserialize;
use serde_json::Value as JsonValue;

use crate::codec::{ByteReader, Decode};
use crate::errors::{AnalyzerError, AnalyzerResult};
use crate::models::transaction::{CompressionType, KeyType, PackedTransaction, Signature};

/// Length of the checksum appended to base58 signature text
const SIGNATURE_CHECKSUM_LEN: usize = 4;

/// Parse a packed transaction from any supported input form.
pub fn parse_packed_transaction(data: &[u8]) -> AnalyzerResult<PackedTransaction> {
    let result = try_parse_json(data)
        .or_else(|e| {
            debug!("JSON parsing failed: {}", e);
            try_parse_hex(data)
        })
        .or_else(|e| {
            debug!("Hex parsing failed: {}", e);
            try_parse_base64(data)
        })
        .or_else(|e| {
            debug!("Base64 parsing failed: {}", e);
            try_parse_binary(data)
        });

    match &result {
        Ok(packed) => debug!(
            "Parsed packed transaction: {} signatures, {} bytes of transaction data",
            packed.signatures.len(),
            packed.packed_trx.len()
        ),
        Err(e) => warn!("All parsing methods failed: {}", e),
    }

    result.map_err(|e| {
        AnalyzerError::InputParsing(format!(
            "input of {} bytes is not a packed transaction in JSON, hex, base64 or binary form (last error: {})",
            data.len(),
            e
        ))
    })
}

/// Decode the binary encoding; the whole input must be consumed.
fn try_parse_binary(data: &[u8]) -> AnalyzerResult<PackedTransaction> {
    let mut reader = ByteReader::new(data);
    let packed = PackedTransaction::decode(&mut reader)
        .map_err(|e| AnalyzerError::InputParsing(format!("Failed to decode packed transaction: {}", e)))?;
    if !reader.is_empty() {
        return Err(AnalyzerError::InputParsing(format!(
            "{} unexpected bytes after packed transaction",
            reader.remaining()
        )));
    }
    Ok(packed)
}

fn text_input(data: &[u8]) -> AnalyzerResult<&str> {
    let s = std::str::from_utf8(data)
        .map_err(|_| AnalyzerError::InputParsing("Not a valid UTF-8 string".to_string()))?
        .trim();
    if s.is_empty() {
        return Err(AnalyzerError::InputParsing("Input is empty".to_string()));
    }
    Ok(s)
}

fn try_parse_hex(data: &[u8]) -> AnalyzerResult<PackedTransaction> {
    let s = text_input(data)?;
    let decoded = hex::decode(s)
        .map_err(|e| AnalyzerError::InputParsing(format!("Not a valid hex encoded transaction: {}", e)))?;
    try_parse_binary(&decoded)
}

fn try_parse_base64(data: &[u8]) -> AnalyzerResult<PackedTransaction> {
    let s = text_input(data)?;
    let decoded = base64::decode(s)
        .map_err(|e| AnalyzerError::InputParsing(format!("Not a valid base64 encoded transaction: {}", e)))?;
    try_parse_binary(&decoded)
}

/// JSON shape of a packed transaction
#[derive(Debug, Deserialize)]
struct JsonPackedTransaction {
    #[serde(default)]
    signatures: Vec<String>,
    #[serde(default)]
    compression: Option<JsonValue>,
    #[serde(default)]
    packed_context_free_data: String,
    packed_trx: String,
}

fn try_parse_json(data: &[u8]) -> AnalyzerResult<PackedTransaction> {
    let mut root: JsonValue = serde_json::from_slice(data)?;

    // Push-transaction responses and some wallets wrap the object
    let wrapped = root
        .get_mut("transaction")
        .filter(|inner| inner.get("packed_trx").is_some())
        .map(JsonValue::take);
    if let Some(inner) = wrapped {
        root = inner;
    }
    let json: JsonPackedTransaction = serde_json::from_value(root)?;

    let signatures = json
        .signatures
        .iter()
        .map(|s| parse_signature_text(s))
        .collect::<AnalyzerResult<Vec<_>>>()?;
    let compression = parse_compression(json.compression.as_ref())?;
    let packed_context_free_data = hex::decode(&json.packed_context_free_data)
        .map_err(|e| AnalyzerError::InputParsing(format!("packed_context_free_data is not hex: {}", e)))?;
    let packed_trx = hex::decode(&json.packed_trx)
        .map_err(|e| AnalyzerError::InputParsing(format!("packed_trx is not hex: {}", e)))?;

    Ok(PackedTransaction::new(
        signatures,
        compression,
        packed_context_free_data,
        packed_trx,
    ))
}

fn parse_compression(value: Option<&JsonValue>) -> AnalyzerResult<CompressionType> {
    let compression = match value {
        None | Some(JsonValue::Null) => Some(CompressionType::None),
        Some(JsonValue::String(s)) => match s.to_ascii_lowercase().as_str() {
            "none" | "" => Some(CompressionType::None),
            "zlib" => Some(CompressionType::Zlib),
            _ => None,
        },
        Some(JsonValue::Number(n)) => n
            .as_u64()
            .and_then(|v| u8::try_from(v).ok())
            .and_then(CompressionType::from_u8),
        Some(_) => None,
    };
    compression.ok_or_else(|| AnalyzerError::InputParsing(format!("unknown compression {:?}", value)))
}

/// Parse `SIG_<TYPE>_<base58>` signature text.
///
/// The trailing checksum is stripped without being verified.
pub fn parse_signature_text(text: &str) -> AnalyzerResult<Signature> {
    let invalid = |reason: &str| AnalyzerError::InputParsing(format!("invalid signature {:?}: {}", text, reason));

    let rest = text.strip_prefix("SIG_").ok_or_else(|| invalid("missing SIG_ prefix"))?;
    let (prefix, encoded) = rest.split_once('_').ok_or_else(|| invalid("missing key type"))?;
    let key_type = KeyType::from_prefix(prefix).ok_or_else(|| invalid("unsupported key type"))?;
    let mut data = bs58::decode(encoded)
        .into_vec()
        .map_err(|e| invalid(&e.to_string()))?;
    if data.len() <= SIGNATURE_CHECKSUM_LEN {
        return Err(invalid("too short"));
    }
    data.truncate(data.len() - SIGNATURE_CHECKSUM_LEN);
    Ok(Signature { key_type, data })
}
