//! Account, action and permission names

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::codec::{ByteReader, ByteWriter, Decode, Encode};
use crate::errors::DecodeResult;

const CHARMAP: &[u8; 32] = b".12345abcdefghijklmnopqrstuvwxyz";

/// Maximum length of the text form
pub const MAX_NAME_LEN: usize = 13;

/// A 64-bit name, written as up to 13 characters of `.12345a-z`.
///
/// The first 12 characters take 5 bits each, the 13th only the low 4 bits,
/// so it is restricted to `.12345a-j`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Name(pub u64);

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseNameError {
    #[error("name `{0}` is longer than 13 characters")]
    TooLong(String),
    #[error("name `{name}` contains invalid character {ch:?}")]
    InvalidChar { name: String, ch: char },
    #[error("name `{0}` has a 13th character outside `.12345a-j`")]
    InvalidLastChar(String),
}

fn symbol_value(c: u8) -> Option<u64> {
    match c {
        b'a'..=b'z' => Some(u64::from(c - b'a') + 6),
        b'1'..=b'5' => Some(u64::from(c - b'1') + 1),
        b'.' => Some(0),
        _ => None,
    }
}

impl Name {
    pub const fn new(value: u64) -> Self {
        Name(value)
    }

    /// Encode a name literal at compile time.
    ///
    /// Invalid literals fail constant evaluation, so this is meant for
    /// `const` items; runtime input goes through [`FromStr`].
    pub const fn from_literal(s: &str) -> Self {
        let bytes = s.as_bytes();
        assert!(bytes.len() <= MAX_NAME_LEN, "name literal too long");
        let mut value = 0u64;
        let mut i = 0;
        while i < bytes.len() {
            let c = bytes[i];
            let symbol = match c {
                b'a'..=b'z' => (c - b'a') as u64 + 6,
                b'1'..=b'5' => (c - b'1') as u64 + 1,
                b'.' => 0,
                _ => panic!("invalid character in name literal"),
            };
            if i < 12 {
                value |= (symbol & 0x1f) << (64 - 5 * (i + 1));
            } else {
                assert!(symbol <= 0x0f, "invalid 13th character in name literal");
                value |= symbol;
            }
            i += 1;
        }
        Name(value)
    }

    pub fn value(self) -> u64 {
        self.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl FromStr for Name {
    type Err = ParseNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.as_bytes();
        if bytes.len() > MAX_NAME_LEN {
            return Err(ParseNameError::TooLong(s.to_string()));
        }

        let mut value = 0u64;
        for (i, &c) in bytes.iter().enumerate() {
            let symbol = symbol_value(c).ok_or_else(|| ParseNameError::InvalidChar {
                name: s.to_string(),
                ch: c as char,
            })?;
            if i < 12 {
                value |= (symbol & 0x1f) << (64 - 5 * (i + 1));
            } else {
                if symbol > 0x0f {
                    return Err(ParseNameError::InvalidLastChar(s.to_string()));
                }
                value |= symbol;
            }
        }
        Ok(Name(value))
    }
}

impl TryFrom<&str> for Name {
    type Error = ParseNameError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = [b'.'; MAX_NAME_LEN];
        let mut tmp = self.0;
        for i in 0..MAX_NAME_LEN {
            let (mask, shift) = if i == 0 { (0x0f, 4) } else { (0x1f, 5) };
            out[MAX_NAME_LEN - 1 - i] = CHARMAP[(tmp & mask) as usize];
            tmp >>= shift;
        }
        let end = out.iter().rposition(|&c| c != b'.').map_or(0, |p| p + 1);
        // Every byte comes from CHARMAP, which is ASCII.
        f.write_str(std::str::from_utf8(&out[..end]).unwrap_or_default())
    }
}

impl Decode for Name {
    fn decode(reader: &mut ByteReader<'_>) -> DecodeResult<Self> {
        reader.read_u64().map(Name)
    }
}

impl Encode for Name {
    fn encode(&self, writer: &mut ByteWriter) {
        writer.write_u64(self.0);
    }
}

impl Serialize for Name {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Name {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
