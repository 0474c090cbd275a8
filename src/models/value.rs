//! Decoded value tree produced by the schema decoder

use chrono::{TimeZone, Utc};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use std::fmt;

use crate::models::name::Name;
use crate::models::transaction::{KeyType, Signature};

/// Milliseconds between the Unix epoch and the block timestamp epoch (2000-01-01)
pub const BLOCK_TIMESTAMP_EPOCH_MS: i64 = 946_684_800_000;
/// Length of one block timestamp slot
pub const BLOCK_INTERVAL_MS: i64 = 500;

/// A value decoded against a schema
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Int(i64),
    UInt(u64),
    Int128(i128),
    UInt128(u128),
    Float32(f32),
    Float64(f64),
    Name(Name),
    String(String),
    /// Variable-length byte string
    Bytes(Vec<u8>),
    /// Fixed-width digest or raw value (checksums, float128)
    Checksum(Vec<u8>),
    /// Microseconds since the Unix epoch
    TimePoint(i64),
    /// Seconds since the Unix epoch
    TimePointSec(u32),
    /// Half-second slots since 2000-01-01
    BlockTimestamp(u32),
    Symbol { precision: u8, code: String },
    SymbolCode(String),
    Asset { amount: i64, precision: u8, code: String },
    PublicKey { key_type: KeyType, data: Vec<u8> },
    Signature(Signature),
    Array(Vec<Value>),
    Optional(Option<Box<Value>>),
    /// Fields in declaration order, base struct first
    Struct(Vec<(String, Value)>),
    /// Selected alternative of a variant
    Variant { type_name: String, value: Box<Value> },
}

impl Value {
    /// Look up a struct field
    pub fn field(&self, name: &str) -> Option<&Value> {
        match self {
            Value::Struct(fields) => fields.iter().find(|(n, _)| n == name).map(|(_, v)| v),
            _ => None,
        }
    }

    pub fn as_name(&self) -> Option<Name> {
        match self {
            Value::Name(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(b) | Value::Checksum(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Value::UInt(v) => Some(*v),
            Value::Int(v) => u64::try_from(*v).ok(),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Whether the value renders on a single line
    pub fn is_scalar(&self) -> bool {
        match self {
            Value::Struct(_) | Value::Variant { .. } => false,
            Value::Array(items) => items.iter().all(Value::is_scalar),
            Value::Optional(inner) => inner.as_deref().map_or(true, Value::is_scalar),
            _ => true,
        }
    }
}

/// `amount` scaled down by `precision` decimals, e.g. `10000, 4` -> `1.0000`
pub fn format_amount(amount: i64, precision: u8) -> String {
    let digits = amount.unsigned_abs().to_string();
    let sign = if amount < 0 { "-" } else { "" };
    let precision = usize::from(precision);
    if precision == 0 {
        return format!("{}{}", sign, digits);
    }
    let padded = format!("{:0>width$}", digits, width = precision + 1);
    let (int_part, frac_part) = padded.split_at(padded.len() - precision);
    format!("{}{}.{}", sign, int_part, frac_part)
}

fn format_time_millis(millis: i64) -> String {
    match Utc.timestamp_millis_opt(millis).single() {
        Some(t) => t.format("%Y-%m-%dT%H:%M:%S%.3f").to_string(),
        None => format!("{}ms", millis),
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(v) => write!(f, "{}", v),
            Value::Int(v) => write!(f, "{}", v),
            Value::UInt(v) => write!(f, "{}", v),
            Value::Int128(v) => write!(f, "{}", v),
            Value::UInt128(v) => write!(f, "{}", v),
            Value::Float32(v) => write!(f, "{}", v),
            Value::Float64(v) => write!(f, "{}", v),
            Value::Name(n) => write!(f, "{}", n),
            Value::String(s) => write!(f, "{:?}", s),
            Value::Bytes(b) | Value::Checksum(b) => f.write_str(&hex::encode(b)),
            Value::TimePoint(us) => f.write_str(&format_time_millis(us.div_euclid(1000))),
            Value::TimePointSec(s) => f.write_str(&format_time_millis(i64::from(*s) * 1000)),
            Value::BlockTimestamp(slot) => f.write_str(&format_time_millis(
                BLOCK_TIMESTAMP_EPOCH_MS + i64::from(*slot) * BLOCK_INTERVAL_MS,
            )),
            Value::Symbol { precision, code } => write!(f, "{},{}", precision, code),
            Value::SymbolCode(code) => f.write_str(code),
            Value::Asset { amount, precision, code } => {
                write!(f, "{} {}", format_amount(*amount, *precision), code)
            }
            Value::PublicKey { key_type, data } => write!(f, "PUB_{}:{}", key_type, hex::encode(data)),
            Value::Signature(sig) => write!(f, "{}", sig),
            Value::Array(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
            Value::Optional(None) => f.write_str("null"),
            Value::Optional(Some(inner)) => write!(f, "{}", inner),
            Value::Struct(fields) => {
                f.write_str("{")?;
                for (i, (name, value)) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: {}", name, value)?;
                }
                f.write_str("}")
            }
            Value::Variant { type_name, value } => write!(f, "{}({})", type_name, value),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Bool(v) => serializer.serialize_bool(*v),
            Value::Int(v) => serializer.serialize_i64(*v),
            Value::UInt(v) => serializer.serialize_u64(*v),
            Value::Float32(v) => serializer.serialize_f32(*v),
            Value::Float64(v) => serializer.serialize_f64(*v),
            Value::String(s) => serializer.serialize_str(s),
            Value::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Optional(None) => serializer.serialize_none(),
            Value::Optional(Some(inner)) => serializer.serialize_some(inner.as_ref()),
            Value::Struct(fields) => {
                let mut map = serializer.serialize_map(Some(fields.len()))?;
                for (name, value) in fields {
                    map.serialize_entry(name, value)?;
                }
                map.end()
            }
            Value::Variant { type_name, value } => {
                let mut seq = serializer.serialize_seq(Some(2))?;
                seq.serialize_element(type_name)?;
                seq.serialize_element(value.as_ref())?;
                seq.end()
            }
            // Everything else serializes as its text form
            other => serializer.collect_str(other),
        }
    }
}
