//! Data models for transactions, ABIs and decoded values

pub mod abi;
pub mod name;
pub mod system;
pub mod transaction;
pub mod value;
#[cfg(test)]
mod tests;

pub use self::abi::Abi;
pub use self::name::Name;
pub use self::system::{SetAbi, SetCode, SystemAction};
pub use self::transaction::{
    Action, CompressionType, Extension, KeyType, PackedTransaction, PermissionLevel, Signature,
    SignedTransaction, Transaction,
};
pub use self::value::Value;

/// Serde helpers rendering byte buffers as lowercase hex strings
pub(crate) mod hex_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        hex::decode(s).map_err(serde::de::Error::custom)
    }

    pub fn serialize_list<S: Serializer>(blobs: &[Vec<u8>], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(blobs.iter().map(hex::encode))
    }
}
