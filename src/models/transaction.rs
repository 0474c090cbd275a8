//! Transaction envelope: packed, signed and plain transactions

use chrono::{DateTime, TimeZone, Utc};
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use log::debug;
use once_cell::unsync::OnceCell;
use serde::Serialize;
use std::borrow::Cow;
use std::fmt;
use std::io::{Read, Write};

use crate::codec::{self, ByteReader, ByteWriter, Decode, Encode};
use crate::errors::{AnalyzerError, AnalyzerResult, DecodeError, DecodeResult, ErrorContext, ErrorExt};
use crate::models::name::Name;
use crate::utils::hash;

/// Largest zlib-inflated section accepted from a packed transaction
pub const MAX_UNPACKED_SIZE: usize = 1024 * 1024;

/// An `actor@permission` pair authorizing an action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct PermissionLevel {
    pub actor: Name,
    pub permission: Name,
}

impl PermissionLevel {
    pub fn new(actor: Name, permission: Name) -> Self {
        Self { actor, permission }
    }
}

impl fmt::Display for PermissionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.actor, self.permission)
    }
}

impl Decode for PermissionLevel {
    fn decode(reader: &mut ByteReader<'_>) -> DecodeResult<Self> {
        Ok(Self {
            actor: Name::decode(reader)?,
            permission: Name::decode(reader)?,
        })
    }
}

impl Encode for PermissionLevel {
    fn encode(&self, writer: &mut ByteWriter) {
        self.actor.encode(writer);
        self.permission.encode(writer);
    }
}

/// A single contract invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Action {
    /// Contract account owning the action
    pub account: Name,
    /// Action name within the contract
    pub name: Name,
    /// Co-signers, in order
    pub authorization: Vec<PermissionLevel>,
    /// Serialized payload
    #[serde(with = "crate::models::hex_bytes")]
    pub data: Vec<u8>,
}

impl Action {
    pub fn new(account: Name, name: Name, authorization: Vec<PermissionLevel>, data: Vec<u8>) -> Self {
        Self {
            account,
            name,
            authorization,
            data,
        }
    }

    /// Authorizations joined as `actor@permission, ...`
    pub fn authorization_list(&self) -> String {
        self.authorization
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl Decode for Action {
    fn decode(reader: &mut ByteReader<'_>) -> DecodeResult<Self> {
        Ok(Self {
            account: Name::decode(reader)?,
            name: Name::decode(reader)?,
            authorization: Vec::decode(reader)?,
            data: reader.read_bytes()?,
        })
    }
}

impl Encode for Action {
    fn encode(&self, writer: &mut ByteWriter) {
        self.account.encode(writer);
        self.name.encode(writer);
        self.authorization.encode(writer);
        writer.write_bytes(&self.data);
    }
}

/// Tagged extension blob, used by transactions and ABIs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, serde::Deserialize)]
pub struct Extension {
    #[serde(rename = "type")]
    pub kind: u16,
    #[serde(with = "crate::models::hex_bytes")]
    pub data: Vec<u8>,
}

impl Decode for Extension {
    fn decode(reader: &mut ByteReader<'_>) -> DecodeResult<Self> {
        Ok(Self {
            kind: reader.read_u16()?,
            data: reader.read_bytes()?,
        })
    }
}

impl Encode for Extension {
    fn encode(&self, writer: &mut ByteWriter) {
        writer.write_u16(self.kind);
        writer.write_bytes(&self.data);
    }
}

/// Transaction header plus its actions
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Transaction {
    /// Seconds since the Unix epoch after which the transaction is rejected
    pub expiration: u32,
    /// Low 16 bits of a recent block number (TaPoS)
    pub ref_block_num: u16,
    /// 32 bits of the referenced block id (TaPoS)
    pub ref_block_prefix: u32,
    /// Network bandwidth cap in 8-byte words, 0 = unlimited
    pub max_net_usage_words: u32,
    /// CPU cap in milliseconds, 0 = unlimited
    pub max_cpu_usage_ms: u8,
    /// Seconds before execution, cancellable meanwhile
    pub delay_sec: u32,
    pub context_free_actions: Vec<Action>,
    pub actions: Vec<Action>,
    pub transaction_extensions: Vec<Extension>,
}

impl Transaction {
    pub fn expiration_time(&self) -> DateTime<Utc> {
        Utc.timestamp_opt(i64::from(self.expiration), 0)
            .single()
            .unwrap_or_default()
    }
}

impl Decode for Transaction {
    fn decode(reader: &mut ByteReader<'_>) -> DecodeResult<Self> {
        Ok(Self {
            expiration: reader.read_u32()?,
            ref_block_num: reader.read_u16()?,
            ref_block_prefix: reader.read_u32()?,
            max_net_usage_words: reader.read_varuint32()?,
            max_cpu_usage_ms: reader.read_u8()?,
            delay_sec: reader.read_varuint32()?,
            context_free_actions: Vec::decode(reader)?,
            actions: Vec::decode(reader)?,
            transaction_extensions: Vec::decode(reader)?,
        })
    }
}

impl Encode for Transaction {
    fn encode(&self, writer: &mut ByteWriter) {
        writer.write_u32(self.expiration);
        writer.write_u16(self.ref_block_num);
        writer.write_u32(self.ref_block_prefix);
        writer.write_varuint32(self.max_net_usage_words);
        writer.write_u8(self.max_cpu_usage_ms);
        writer.write_varuint32(self.delay_sec);
        self.context_free_actions.encode(writer);
        self.actions.encode(writer);
        self.transaction_extensions.encode(writer);
    }
}

/// Curve of a key or signature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum KeyType {
    K1,
    R1,
    WA,
}

impl KeyType {
    pub fn from_index(index: u32) -> Option<Self> {
        match index {
            0 => Some(KeyType::K1),
            1 => Some(KeyType::R1),
            2 => Some(KeyType::WA),
            _ => None,
        }
    }

    pub fn index(self) -> u32 {
        match self {
            KeyType::K1 => 0,
            KeyType::R1 => 1,
            KeyType::WA => 2,
        }
    }

    pub fn from_prefix(prefix: &str) -> Option<Self> {
        match prefix {
            "K1" => Some(KeyType::K1),
            "R1" => Some(KeyType::R1),
            "WA" => Some(KeyType::WA),
            _ => None,
        }
    }
}

impl fmt::Display for KeyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            KeyType::K1 => "K1",
            KeyType::R1 => "R1",
            KeyType::WA => "WA",
        })
    }
}

/// Length of a compact K1/R1 signature
pub const COMPACT_SIGNATURE_LEN: usize = 65;

/// Signature bytes as found on the wire. Never verified.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Signature {
    pub key_type: KeyType,
    pub data: Vec<u8>,
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.key_type, hex::encode(&self.data))
    }
}

impl Serialize for Signature {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl Decode for Signature {
    fn decode(reader: &mut ByteReader<'_>) -> DecodeResult<Self> {
        let offset = reader.position();
        let index = reader.read_varuint32()?;
        let key_type = KeyType::from_index(index)
            .ok_or_else(|| DecodeError::invalid(offset, format!("unsupported signature type {}", index)))?;
        let start = reader.position();
        reader.read_slice(COMPACT_SIGNATURE_LEN)?;
        if key_type == KeyType::WA {
            // WebAuthn: compact signature, authenticator data, client JSON
            reader.read_bytes()?;
            reader.read_string()?;
        }
        Ok(Self {
            key_type,
            data: reader.consumed_since(start).to_vec(),
        })
    }
}

impl Encode for Signature {
    fn encode(&self, writer: &mut ByteWriter) {
        writer.write_varuint32(self.key_type.index());
        writer.write_raw(&self.data);
    }
}

/// A transaction with the material that travels next to it
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct SignedTransaction {
    pub transaction: Transaction,
    pub signatures: Vec<Signature>,
    /// Blobs referenced positionally by context-free actions
    #[serde(serialize_with = "crate::models::hex_bytes::serialize_list")]
    pub context_free_data: Vec<Vec<u8>>,
}

impl SignedTransaction {
    pub fn new(transaction: Transaction) -> Self {
        Self {
            transaction,
            ..Default::default()
        }
    }
}

/// Compression applied to the packed transaction and context-free data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CompressionType {
    #[default]
    None,
    Zlib,
}

impl CompressionType {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(CompressionType::None),
            1 => Some(CompressionType::Zlib),
            _ => None,
        }
    }
}

impl fmt::Display for CompressionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CompressionType::None => "none",
            CompressionType::Zlib => "zlib",
        })
    }
}

/// Outermost wire form of a transaction
#[derive(Debug, Clone, Default)]
pub struct PackedTransaction {
    pub signatures: Vec<Signature>,
    pub compression: CompressionType,
    pub packed_context_free_data: Vec<u8>,
    pub packed_trx: Vec<u8>,
    unpacked: OnceCell<SignedTransaction>,
}

impl PackedTransaction {
    pub fn new(
        signatures: Vec<Signature>,
        compression: CompressionType,
        packed_context_free_data: Vec<u8>,
        packed_trx: Vec<u8>,
    ) -> Self {
        Self {
            signatures,
            compression,
            packed_context_free_data,
            packed_trx,
            unpacked: OnceCell::new(),
        }
    }

    /// Pack a signed transaction, compressing if asked to.
    pub fn from_signed(signed: &SignedTransaction, compression: CompressionType) -> AnalyzerResult<Self> {
        let trx = codec::to_bytes(&signed.transaction);
        let cfd = if signed.context_free_data.is_empty() {
            Vec::new()
        } else {
            let mut writer = ByteWriter::new();
            writer.write_length(signed.context_free_data.len());
            for blob in &signed.context_free_data {
                writer.write_bytes(blob);
            }
            writer.into_inner()
        };

        let (packed_trx, packed_cfd) = match compression {
            CompressionType::None => (trx, cfd),
            CompressionType::Zlib => (zlib_compress(&trx)?, zlib_compress(&cfd)?),
        };
        Ok(Self::new(signed.signatures.clone(), compression, packed_cfd, packed_trx))
    }

    /// The serialized transaction, inflated if necessary
    pub fn transaction_bytes(&self) -> AnalyzerResult<Cow<'_, [u8]>> {
        decompress(self.compression, &self.packed_trx)
    }

    /// Transaction id: SHA-256 of the uncompressed transaction bytes
    pub fn id(&self) -> AnalyzerResult<String> {
        Ok(hash::sha256_hex(&self.transaction_bytes()?))
    }

    /// Decode the envelope. The result is memoized, so repeated calls are free.
    pub fn unpack(&self) -> AnalyzerResult<&SignedTransaction> {
        self.unpacked.get_or_try_init(|| self.unpack_uncached())
    }

    fn unpack_uncached(&self) -> AnalyzerResult<SignedTransaction> {
        let trx_bytes = self.transaction_bytes()?;
        debug!("Unpacking transaction ({} bytes, compression: {})", trx_bytes.len(), self.compression);

        let mut reader = ByteReader::new(&trx_bytes);
        let transaction = Transaction::decode(&mut reader).with_context(ErrorContext {
            component: "packed_transaction".to_string(),
            operation: "decoding the transaction".to_string(),
            details: Some(format!("packed_trx_len={}", self.packed_trx.len())),
        })?;
        if !reader.is_empty() {
            debug!("{} trailing bytes after transaction", reader.remaining());
        }

        let cfd_bytes = decompress(self.compression, &self.packed_context_free_data)?;
        let context_free_data = if cfd_bytes.is_empty() {
            Vec::new()
        } else {
            let mut reader = ByteReader::new(&cfd_bytes);
            let len = reader
                .read_length()
                .with_simple_context("packed_transaction", "decoding context-free data")?;
            let mut blobs = Vec::with_capacity(len);
            for _ in 0..len {
                blobs.push(
                    reader
                        .read_bytes()
                        .with_simple_context("packed_transaction", "decoding context-free data")?,
                );
            }
            blobs
        };

        Ok(SignedTransaction {
            transaction,
            signatures: self.signatures.clone(),
            context_free_data,
        })
    }
}

impl PartialEq for PackedTransaction {
    fn eq(&self, other: &Self) -> bool {
        self.signatures == other.signatures
            && self.compression == other.compression
            && self.packed_context_free_data == other.packed_context_free_data
            && self.packed_trx == other.packed_trx
    }
}

impl Decode for PackedTransaction {
    fn decode(reader: &mut ByteReader<'_>) -> DecodeResult<Self> {
        let signatures = Vec::decode(reader)?;
        let offset = reader.position();
        let flag = reader.read_u8()?;
        let compression = CompressionType::from_u8(flag)
            .ok_or_else(|| DecodeError::invalid(offset, format!("unknown compression type {}", flag)))?;
        Ok(Self::new(
            signatures,
            compression,
            reader.read_bytes()?,
            reader.read_bytes()?,
        ))
    }
}

impl Encode for PackedTransaction {
    fn encode(&self, writer: &mut ByteWriter) {
        self.signatures.encode(writer);
        writer.write_u8(match self.compression {
            CompressionType::None => 0,
            CompressionType::Zlib => 1,
        });
        writer.write_bytes(&self.packed_context_free_data);
        writer.write_bytes(&self.packed_trx);
    }
}

fn decompress(compression: CompressionType, data: &[u8]) -> AnalyzerResult<Cow<'_, [u8]>> {
    match compression {
        CompressionType::None => Ok(Cow::Borrowed(data)),
        CompressionType::Zlib if data.is_empty() => Ok(Cow::Borrowed(data)),
        CompressionType::Zlib => {
            let mut out = Vec::new();
            ZlibDecoder::new(data)
                .take(MAX_UNPACKED_SIZE as u64 + 1)
                .read_to_end(&mut out)
                .map_err(|e| AnalyzerError::Decompression(format!("zlib: {}", e)))?;
            if out.len() > MAX_UNPACKED_SIZE {
                return Err(AnalyzerError::Decompression(format!(
                    "zlib: inflated data exceeds {} bytes",
                    MAX_UNPACKED_SIZE
                )));
            }
            Ok(Cow::Owned(out))
        }
    }
}

fn zlib_compress(data: &[u8]) -> AnalyzerResult<Vec<u8>> {
    if data.is_empty() {
        return Ok(Vec::new());
    }
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}
