//! ABI interpreter
//!
//! An ABI blob is itself data in the same wire format, described by a fixed
//! meta-schema (`abi_def`). Interpreting a blob therefore runs the regular
//! schema decoder with the meta-schema, then lifts the resulting value tree
//! into an [`Abi`] that can decode further payloads.

#[cfg(test)]
mod tests;

use log::debug;
use once_cell::sync::Lazy;

use crate::codec::ByteReader;
use crate::decoder::SchemaDecoder;
use crate::errors::{DecodeError, DecodeResult};
use crate::models::abi::{
    Abi, ActionDef, ActionResultDef, ClausePair, ErrorMessage, FieldDef, StructDef, TableDef, TypeDef,
    VariantDef,
};
use crate::models::name::Name;
use crate::models::transaction::Extension;
use crate::models::value::Value;

/// Root type of the meta-schema
pub const ABI_DEF_TYPE: &str = "abi_def";

static META_SCHEMA: Lazy<Abi> = Lazy::new(build_meta_schema);

fn build_meta_schema() -> Abi {
    let mut abi = Abi::new("eosio::abi/1.2");
    abi.add_struct("type_def", "", &[("new_type_name", "string"), ("type", "string")]);
    abi.add_struct("field_def", "", &[("name", "string"), ("type", "string")]);
    abi.add_struct("struct_def", "", &[("name", "string"), ("base", "string"), ("fields", "field_def[]")]);
    abi.add_struct(
        "action_def",
        "",
        &[("name", "name"), ("type", "string"), ("ricardian_contract", "string")],
    );
    abi.add_struct(
        "table_def",
        "",
        &[
            ("name", "name"),
            ("index_type", "string"),
            ("key_names", "string[]"),
            ("key_types", "string[]"),
            ("type", "string"),
        ],
    );
    abi.add_struct("clause_pair", "", &[("id", "string"), ("body", "string")]);
    abi.add_struct("error_message", "", &[("error_code", "uint64"), ("error_msg", "string")]);
    abi.add_struct("extensions_entry", "", &[("tag", "uint16"), ("value", "bytes")]);
    abi.add_struct("variant_def", "", &[("name", "string"), ("types", "string[]")]);
    abi.add_struct("action_result_def", "", &[("name", "name"), ("result_type", "string")]);
    abi.add_struct(
        ABI_DEF_TYPE,
        "",
        &[
            ("version", "string"),
            ("types", "type_def[]"),
            ("structs", "struct_def[]"),
            ("actions", "action_def[]"),
            ("tables", "table_def[]"),
            ("ricardian_clauses", "clause_pair[]"),
            ("error_messages", "error_message[]"),
            ("abi_extensions", "extensions_entry[]"),
            ("variants", "variant_def[]$"),
            ("action_results", "action_result_def[]$"),
        ],
    );
    abi
}

/// Schema describing binary ABI documents
pub fn meta_schema() -> &'static Abi {
    &META_SCHEMA
}

/// An ABI lifted from a blob, with what was left after it
#[derive(Debug, Clone)]
pub struct InterpretedAbi {
    pub abi: Abi,
    /// Bytes after the document; not an error, but worth reporting
    pub trailing: usize,
}

/// Decode a binary ABI document, keeping the count of leftover bytes.
pub fn interpret_document(bytes: &[u8]) -> DecodeResult<InterpretedAbi> {
    let mut reader = ByteReader::new(bytes);
    let value = SchemaDecoder::new(meta_schema()).decode_type(&mut reader, ABI_DEF_TYPE)?;
    let trailing = reader.remaining();
    if trailing > 0 {
        debug!("{} trailing bytes after ABI document", trailing);
    }
    Ok(InterpretedAbi {
        abi: abi_from_value(&value)?,
        trailing,
    })
}

/// Decode a binary ABI document.
pub fn interpret(bytes: &[u8]) -> DecodeResult<Abi> {
    interpret_document(bytes).map(|document| document.abi)
}

fn missing(field: &str) -> DecodeError {
    DecodeError::invalid(0, format!("ABI document field `{}` is missing or mistyped", field))
}

fn text(value: &Value, field: &str) -> DecodeResult<String> {
    value
        .field(field)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| missing(field))
}

/// List field; binary extensions that were cut off read as empty
fn list<'v>(value: &'v Value, field: &str) -> DecodeResult<&'v [Value]> {
    match value.field(field) {
        None => Ok(Default::default()),
        Some(v) => v.as_array().ok_or_else(|| missing(field)),
    }
}

fn texts(value: &Value, field: &str) -> DecodeResult<Vec<String>> {
    list(value, field)?
        .iter()
        .map(|v| v.as_str().map(str::to_string).ok_or_else(|| missing(field)))
        .collect()
}

fn name_field(value: &Value, field: &str) -> DecodeResult<Name> {
    value.field(field).and_then(Value::as_name).ok_or_else(|| missing(field))
}

/// Lift a value decoded with the meta-schema into an [`Abi`]
pub fn abi_from_value(value: &Value) -> DecodeResult<Abi> {
    let types = list(value, "types")?
        .iter()
        .map(|t| {
            Ok(TypeDef {
                new_type_name: text(t, "new_type_name")?,
                ty: text(t, "type")?,
            })
        })
        .collect::<DecodeResult<Vec<_>>>()?;

    let structs = list(value, "structs")?
        .iter()
        .map(|s| {
            let fields = list(s, "fields")?
                .iter()
                .map(|f| {
                    Ok(FieldDef {
                        name: text(f, "name")?,
                        ty: text(f, "type")?,
                    })
                })
                .collect::<DecodeResult<Vec<_>>>()?;
            Ok(StructDef {
                name: text(s, "name")?,
                base: text(s, "base")?,
                fields,
            })
        })
        .collect::<DecodeResult<Vec<_>>>()?;

    let actions = list(value, "actions")?
        .iter()
        .map(|a| {
            Ok(ActionDef {
                name: name_field(a, "name")?,
                ty: text(a, "type")?,
                ricardian_contract: text(a, "ricardian_contract")?,
            })
        })
        .collect::<DecodeResult<Vec<_>>>()?;

    let tables = list(value, "tables")?
        .iter()
        .map(|t| {
            Ok(TableDef {
                name: name_field(t, "name")?,
                index_type: text(t, "index_type")?,
                key_names: texts(t, "key_names")?,
                key_types: texts(t, "key_types")?,
                ty: text(t, "type")?,
            })
        })
        .collect::<DecodeResult<Vec<_>>>()?;

    let ricardian_clauses = list(value, "ricardian_clauses")?
        .iter()
        .map(|c| {
            Ok(ClausePair {
                id: text(c, "id")?,
                body: text(c, "body")?,
            })
        })
        .collect::<DecodeResult<Vec<_>>>()?;

    let error_messages = list(value, "error_messages")?
        .iter()
        .map(|e| {
            Ok(ErrorMessage {
                error_code: e.field("error_code").and_then(Value::as_u64).ok_or_else(|| missing("error_code"))?,
                error_msg: text(e, "error_msg")?,
            })
        })
        .collect::<DecodeResult<Vec<_>>>()?;

    let abi_extensions = list(value, "abi_extensions")?
        .iter()
        .map(|x| {
            Ok(Extension {
                kind: x
                    .field("tag")
                    .and_then(Value::as_u64)
                    .and_then(|v| u16::try_from(v).ok())
                    .ok_or_else(|| missing("tag"))?,
                data: x.field("value").and_then(Value::as_bytes).ok_or_else(|| missing("value"))?.to_vec(),
            })
        })
        .collect::<DecodeResult<Vec<_>>>()?;

    let variants = list(value, "variants")?
        .iter()
        .map(|v| {
            Ok(VariantDef {
                name: text(v, "name")?,
                types: texts(v, "types")?,
            })
        })
        .collect::<DecodeResult<Vec<_>>>()?;

    let action_results = list(value, "action_results")?
        .iter()
        .map(|r| {
            Ok(ActionResultDef {
                name: name_field(r, "name")?,
                result_type: text(r, "result_type")?,
            })
        })
        .collect::<DecodeResult<Vec<_>>>()?;

    Ok(Abi {
        version: text(value, "version")?,
        types,
        structs,
        actions,
        tables,
        ricardian_clauses,
        error_messages,
        abi_extensions,
        variants,
        action_results,
    })
}
