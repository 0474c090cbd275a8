//! Built-in ABI types

use crate::codec::{ByteReader, Decode};
use crate::errors::{DecodeError, DecodeResult};
use crate::models::name::Name;
use crate::models::transaction::{KeyType, Signature};
use crate::models::value::Value;

/// Every type name the decoder understands without a schema
pub const BUILTIN_TYPES: &[&str] = &[
    "bool",
    "int8",
    "uint8",
    "int16",
    "uint16",
    "int32",
    "uint32",
    "int64",
    "uint64",
    "int128",
    "uint128",
    "varint32",
    "varuint32",
    "float32",
    "float64",
    "float128",
    "time_point",
    "time_point_sec",
    "block_timestamp_type",
    "name",
    "bytes",
    "string",
    "checksum160",
    "checksum256",
    "checksum512",
    "public_key",
    "signature",
    "symbol",
    "symbol_code",
    "asset",
    "extended_asset",
];

/// Compressed K1/R1 public key length
const PUBLIC_KEY_LEN: usize = 33;

pub fn is_builtin(ty: &str) -> bool {
    BUILTIN_TYPES.contains(&ty)
}

/// Decode a built-in type, or `None` if `ty` is not built in.
pub fn decode_builtin(reader: &mut ByteReader<'_>, ty: &str) -> Option<DecodeResult<Value>> {
    let value = match ty {
        "bool" => reader.read_bool().map(Value::Bool),
        "int8" => reader.read_i8().map(|v| Value::Int(v.into())),
        "uint8" => reader.read_u8().map(|v| Value::UInt(v.into())),
        "int16" => reader.read_i16().map(|v| Value::Int(v.into())),
        "uint16" => reader.read_u16().map(|v| Value::UInt(v.into())),
        "int32" => reader.read_i32().map(|v| Value::Int(v.into())),
        "uint32" => reader.read_u32().map(|v| Value::UInt(v.into())),
        "int64" => reader.read_i64().map(Value::Int),
        "uint64" => reader.read_u64().map(Value::UInt),
        "int128" => reader.read_i128().map(Value::Int128),
        "uint128" => reader.read_u128().map(Value::UInt128),
        "varint32" => reader.read_varint32().map(|v| Value::Int(v.into())),
        "varuint32" => reader.read_varuint32().map(|v| Value::UInt(v.into())),
        "float32" => reader.read_f32().map(Value::Float32),
        "float64" => reader.read_f64().map(Value::Float64),
        "float128" => fixed(reader, 16),
        "time_point" => reader.read_i64().map(Value::TimePoint),
        "time_point_sec" => reader.read_u32().map(Value::TimePointSec),
        "block_timestamp_type" => reader.read_u32().map(Value::BlockTimestamp),
        "name" => Name::decode(reader).map(Value::Name),
        "bytes" => reader.read_bytes().map(Value::Bytes),
        "string" => reader.read_string().map(Value::String),
        "checksum160" => fixed(reader, 20),
        "checksum256" => fixed(reader, 32),
        "checksum512" => fixed(reader, 64),
        "public_key" => read_public_key(reader),
        "signature" => Signature::decode(reader).map(Value::Signature),
        "symbol" => read_symbol(reader),
        "symbol_code" => read_symbol_code(reader),
        "asset" => read_asset(reader),
        "extended_asset" => read_extended_asset(reader),
        _ => return None,
    };
    Some(value)
}

fn fixed(reader: &mut ByteReader<'_>, len: usize) -> DecodeResult<Value> {
    Ok(Value::Checksum(reader.read_slice(len)?.to_vec()))
}

fn read_public_key(reader: &mut ByteReader<'_>) -> DecodeResult<Value> {
    let offset = reader.position();
    let index = reader.read_varuint32()?;
    let key_type = KeyType::from_index(index)
        .ok_or_else(|| DecodeError::invalid(offset, format!("unsupported public key type {}", index)))?;
    let start = reader.position();
    reader.read_slice(PUBLIC_KEY_LEN)?;
    if key_type == KeyType::WA {
        // WebAuthn keys carry a presence flag and the relying party id
        reader.read_u8()?;
        reader.read_string()?;
    }
    Ok(Value::PublicKey {
        key_type,
        data: reader.consumed_since(start).to_vec(),
    })
}

/// Symbol code characters packed little-endian, NUL padded
fn symbol_code_text(raw: u64, offset: usize) -> DecodeResult<String> {
    let code: String = raw
        .to_le_bytes()
        .iter()
        .take_while(|&&b| b != 0)
        .map(|&b| b as char)
        .collect();
    if !code.chars().all(|c| c.is_ascii_uppercase()) {
        return Err(DecodeError::invalid(offset, format!("invalid symbol code {:?}", code)));
    }
    Ok(code)
}

fn read_symbol_parts(reader: &mut ByteReader<'_>) -> DecodeResult<(u8, String)> {
    let offset = reader.position();
    let raw = reader.read_u64()?;
    let precision = (raw & 0xff) as u8;
    let code = symbol_code_text(raw >> 8, offset + 1)?;
    Ok((precision, code))
}

fn read_symbol(reader: &mut ByteReader<'_>) -> DecodeResult<Value> {
    let (precision, code) = read_symbol_parts(reader)?;
    Ok(Value::Symbol { precision, code })
}

fn read_symbol_code(reader: &mut ByteReader<'_>) -> DecodeResult<Value> {
    let offset = reader.position();
    let raw = reader.read_u64()?;
    Ok(Value::SymbolCode(symbol_code_text(raw, offset)?))
}

fn read_asset(reader: &mut ByteReader<'_>) -> DecodeResult<Value> {
    let amount = reader.read_i64()?;
    let (precision, code) = read_symbol_parts(reader)?;
    Ok(Value::Asset { amount, precision, code })
}

fn read_extended_asset(reader: &mut ByteReader<'_>) -> DecodeResult<Value> {
    let quantity = read_asset(reader)?;
    let contract = Name::decode(reader)?;
    Ok(Value::Struct(vec![
        ("quantity".to_string(), quantity),
        ("contract".to_string(), Value::Name(contract)),
    ]))
}
