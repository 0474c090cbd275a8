//! Schema-driven payload decoder
//!
//! One generic engine decodes any payload given an [`Abi`] and a type name.
//! Type names are resolved in this order:
//!
//! 1. suffixes: `T[]` (array), `T?` (optional), `T$` (binary extension)
//! 2. typedef aliases declared by the ABI
//! 3. built-in types ([`builtins`])
//! 4. variants declared by the ABI
//! 5. structs declared by the ABI, base struct fields first
//!
//! Anything else is a structural error ([`DecodeError::UnknownType`]).

pub mod builtins;
#[cfg(test)]
mod tests;

use log::trace;

use crate::codec::ByteReader;
use crate::errors::{DecodeError, DecodeResult};
use crate::models::abi::{Abi, StructDef};
use crate::models::value::Value;

/// Maximum nesting of types, arrays and structs in one decode
pub const MAX_DEPTH: usize = 32;

/// Upper bound on an array count that exceeds the remaining input.
/// Only arrays of empty structs can legitimately get there.
pub const MAX_UNSIZED_ITEMS: usize = 1 << 16;

/// Result of decoding a complete payload
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedPayload {
    /// Type the payload was decoded as
    pub type_name: String,
    pub value: Value,
    /// Bytes left after the value; not an error, but worth reporting
    pub trailing: usize,
}

/// Decode `bytes` as `type_name` under `abi`.
pub fn decode(bytes: &[u8], abi: &Abi, type_name: &str) -> DecodeResult<DecodedPayload> {
    let mut reader = ByteReader::new(bytes);
    let value = SchemaDecoder::new(abi).decode_type(&mut reader, type_name)?;
    Ok(DecodedPayload {
        type_name: type_name.to_string(),
        value,
        trailing: reader.remaining(),
    })
}

/// Decoder bound to one schema
#[derive(Debug, Clone, Copy)]
pub struct SchemaDecoder<'s> {
    abi: &'s Abi,
}

impl<'s> SchemaDecoder<'s> {
    pub fn new(abi: &'s Abi) -> Self {
        Self { abi }
    }

    /// Decode one value of `type_name` from the reader
    pub fn decode_type(&self, reader: &mut ByteReader<'_>, type_name: &str) -> DecodeResult<Value> {
        self.decode_at_depth(reader, type_name, 0)
    }

    fn decode_at_depth(&self, reader: &mut ByteReader<'_>, ty: &str, depth: usize) -> DecodeResult<Value> {
        if depth > MAX_DEPTH {
            return Err(DecodeError::DepthExceeded(MAX_DEPTH));
        }
        trace!("decoding `{}` at offset {}", ty, reader.position());

        if let Some(inner) = ty.strip_suffix('$') {
            return self.decode_at_depth(reader, inner, depth + 1);
        }
        if let Some(inner) = ty.strip_suffix("[]") {
            let offset = reader.position();
            let len = reader.read_count()?;
            if len > reader.remaining() && len > MAX_UNSIZED_ITEMS {
                return Err(DecodeError::Truncated {
                    offset,
                    needed: len,
                    remaining: reader.remaining(),
                });
            }
            let mut items = Vec::with_capacity(len.min(reader.remaining()));
            for _ in 0..len {
                items.push(self.decode_at_depth(reader, inner, depth + 1)?);
            }
            return Ok(Value::Array(items));
        }
        if let Some(inner) = ty.strip_suffix('?') {
            let offset = reader.position();
            return match reader.read_u8()? {
                0 => Ok(Value::Optional(None)),
                1 => Ok(Value::Optional(Some(Box::new(self.decode_at_depth(reader, inner, depth + 1)?)))),
                flag => Err(DecodeError::invalid(offset, format!("optional flag must be 0 or 1, got {}", flag))),
            };
        }

        let resolved = self
            .abi
            .resolve_type(ty)
            .ok_or_else(|| DecodeError::UnknownType(format!("{} (cyclic typedef)", ty)))?;
        if resolved != ty {
            return self.decode_at_depth(reader, resolved, depth + 1);
        }

        if let Some(value) = builtins::decode_builtin(reader, ty) {
            return value;
        }

        if let Some(variant) = self.abi.find_variant(ty) {
            let offset = reader.position();
            let index = reader.read_varuint32()? as usize;
            let alternative = variant.types.get(index).ok_or_else(|| {
                DecodeError::invalid(
                    offset,
                    format!("variant `{}` has no alternative {} ({} declared)", ty, index, variant.types.len()),
                )
            })?;
            let value = self.decode_at_depth(reader, alternative, depth + 1)?;
            return Ok(Value::Variant {
                type_name: alternative.clone(),
                value: Box::new(value),
            });
        }

        if let Some(def) = self.abi.find_struct(ty) {
            let mut fields = Vec::with_capacity(def.fields.len());
            self.decode_struct(reader, def, depth + 1, &mut fields)?;
            return Ok(Value::Struct(fields));
        }

        Err(DecodeError::UnknownType(ty.to_string()))
    }

    fn decode_struct(
        &self,
        reader: &mut ByteReader<'_>,
        def: &StructDef,
        depth: usize,
        fields: &mut Vec<(String, Value)>,
    ) -> DecodeResult<()> {
        if depth > MAX_DEPTH {
            return Err(DecodeError::DepthExceeded(MAX_DEPTH));
        }
        if !def.base.is_empty() {
            let base_name = self
                .abi
                .resolve_type(&def.base)
                .ok_or_else(|| DecodeError::UnknownType(def.base.clone()))?;
            let base = self
                .abi
                .find_struct(base_name)
                .ok_or_else(|| DecodeError::UnknownType(def.base.clone()))?;
            self.decode_struct(reader, base, depth + 1, fields)?;
        }

        for field in &def.fields {
            // Binary extensions may be cut off at the end of the input
            if field.ty.ends_with('$') && reader.is_empty() {
                break;
            }
            let value = self.decode_at_depth(reader, &field.ty, depth + 1)?;
            fields.push((field.name.clone(), value));
        }
        Ok(())
    }
}

fn strip_type_suffixes(ty: &str) -> &str {
    let mut current = ty;
    loop {
        if let Some(inner) = current.strip_suffix('$') {
            current = inner;
        } else if let Some(inner) = current.strip_suffix("[]") {
            current = inner;
        } else if let Some(inner) = current.strip_suffix('?') {
            current = inner;
        } else {
            return current;
        }
    }
}

/// Type references in `abi` that no decode could ever resolve.
///
/// Such references only fail once a payload reaches them, so this lets a
/// report flag them up front. Names are returned once each, in first-seen order.
pub fn undefined_types(abi: &Abi) -> Vec<String> {
    let referenced = abi
        .types
        .iter()
        .map(|t| t.ty.as_str())
        .chain(abi.structs.iter().filter(|s| !s.base.is_empty()).map(|s| s.base.as_str()))
        .chain(abi.structs.iter().flat_map(|s| s.fields.iter().map(|f| f.ty.as_str())))
        .chain(abi.variants.iter().flat_map(|v| v.types.iter().map(String::as_str)))
        .chain(abi.actions.iter().map(|a| a.ty.as_str()))
        .chain(abi.tables.iter().map(|t| t.ty.as_str()));

    let mut missing: Vec<String> = Vec::new();
    for ty in referenced {
        let base = strip_type_suffixes(ty);
        let known = match abi.resolve_type(base) {
            Some(resolved) => {
                let resolved = strip_type_suffixes(resolved);
                builtins::is_builtin(resolved)
                    || abi.find_struct(resolved).is_some()
                    || abi.find_variant(resolved).is_some()
                    || abi.find_typedef(resolved).is_some()
            }
            None => false,
        };
        if !known && !missing.iter().any(|m| m == base) {
            missing.push(base.to_string());
        }
    }
    missing
}
