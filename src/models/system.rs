//! Payloads of the built-in system actions that get a dedicated report

use serde::Serialize;

use crate::codec::{ByteWriter, Encode};
use crate::errors::{DecodeError, DecodeResult};
use crate::models::name::Name;
use crate::models::value::Value;

/// System contract account
pub const EOSIO: Name = Name::from_literal("eosio");
pub const SETCODE: Name = Name::from_literal("setcode");
pub const SETABI: Name = Name::from_literal("setabi");

/// Recognized system actions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemAction {
    SetCode,
    SetAbi,
}

impl SystemAction {
    pub fn recognize(account: Name, action: Name) -> Option<Self> {
        match (account, action) {
            (EOSIO, SETCODE) => Some(SystemAction::SetCode),
            (EOSIO, SETABI) => Some(SystemAction::SetAbi),
            _ => None,
        }
    }

    /// Struct describing the payload in the system ABI
    pub fn struct_type(self) -> &'static str {
        match self {
            SystemAction::SetCode => "setcode",
            SystemAction::SetAbi => "setabi",
        }
    }
}

/// `eosio::setcode`: deploy contract code to an account
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SetCode {
    pub account: Name,
    pub vm_type: u8,
    pub vm_version: u8,
    #[serde(with = "crate::models::hex_bytes")]
    pub code: Vec<u8>,
}

/// `eosio::setabi`: publish the ABI of an account
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SetAbi {
    pub account: Name,
    /// Binary-encoded ABI document
    #[serde(with = "crate::models::hex_bytes")]
    pub abi: Vec<u8>,
}

fn missing(field: &str) -> DecodeError {
    DecodeError::invalid(0, format!("missing or mistyped field `{}`", field))
}

fn small_uint(value: &Value, field: &str) -> DecodeResult<u8> {
    value
        .field(field)
        .and_then(Value::as_u64)
        .and_then(|v| u8::try_from(v).ok())
        .ok_or_else(|| missing(field))
}

impl SetCode {
    /// Build from a value decoded with the system `setcode` struct
    pub fn from_value(value: &Value) -> DecodeResult<Self> {
        Ok(Self {
            account: value.field("account").and_then(Value::as_name).ok_or_else(|| missing("account"))?,
            vm_type: small_uint(value, "vmtype")?,
            vm_version: small_uint(value, "vmversion")?,
            code: value
                .field("code")
                .and_then(Value::as_bytes)
                .ok_or_else(|| missing("code"))?
                .to_vec(),
        })
    }
}

impl SetAbi {
    /// Build from a value decoded with the system `setabi` struct
    pub fn from_value(value: &Value) -> DecodeResult<Self> {
        Ok(Self {
            account: value.field("account").and_then(Value::as_name).ok_or_else(|| missing("account"))?,
            abi: value
                .field("abi")
                .and_then(Value::as_bytes)
                .ok_or_else(|| missing("abi"))?
                .to_vec(),
        })
    }
}

impl Encode for SetCode {
    fn encode(&self, writer: &mut ByteWriter) {
        self.account.encode(writer);
        writer.write_u8(self.vm_type);
        writer.write_u8(self.vm_version);
        writer.write_bytes(&self.code);
    }
}

impl Encode for SetAbi {
    fn encode(&self, writer: &mut ByteWriter) {
        self.account.encode(writer);
        writer.write_bytes(&self.abi);
    }
}
