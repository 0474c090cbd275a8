//! Binary codec for the EOSIO wire format
//!
//! Fixed-layout envelope types (packed transactions, actions, ABI documents)
//! implement [`Decode`] and [`Encode`] directly. Contract payloads have no
//! fixed layout and go through the schema-driven decoder in
//! [`crate::decoder`] instead, which is built on the same [`ByteReader`].

mod reader;
mod writer;

pub use self::reader::ByteReader;
pub use self::writer::ByteWriter;

use crate::errors::DecodeResult;

/// Types with a fixed binary layout
pub trait Decode: Sized {
    fn decode(reader: &mut ByteReader<'_>) -> DecodeResult<Self>;
}

/// Symmetric counterpart of [`Decode`]
pub trait Encode {
    fn encode(&self, writer: &mut ByteWriter);
}

/// Decode a value from the start of `bytes`, ignoring anything after it.
pub fn from_bytes<T: Decode>(bytes: &[u8]) -> DecodeResult<T> {
    let mut reader = ByteReader::new(bytes);
    T::decode(&mut reader)
}

pub fn to_bytes<T: Encode + ?Sized>(value: &T) -> Vec<u8> {
    let mut writer = ByteWriter::new();
    value.encode(&mut writer);
    writer.into_inner()
}

impl Decode for u8 {
    fn decode(reader: &mut ByteReader<'_>) -> DecodeResult<Self> {
        reader.read_u8()
    }
}

impl Encode for u8 {
    fn encode(&self, writer: &mut ByteWriter) {
        writer.write_u8(*self);
    }
}

impl Decode for u16 {
    fn decode(reader: &mut ByteReader<'_>) -> DecodeResult<Self> {
        reader.read_u16()
    }
}

impl Encode for u16 {
    fn encode(&self, writer: &mut ByteWriter) {
        writer.write_u16(*self);
    }
}

impl Decode for u32 {
    fn decode(reader: &mut ByteReader<'_>) -> DecodeResult<Self> {
        reader.read_u32()
    }
}

impl Encode for u32 {
    fn encode(&self, writer: &mut ByteWriter) {
        writer.write_u32(*self);
    }
}

impl Decode for u64 {
    fn decode(reader: &mut ByteReader<'_>) -> DecodeResult<Self> {
        reader.read_u64()
    }
}

impl Encode for u64 {
    fn encode(&self, writer: &mut ByteWriter) {
        writer.write_u64(*self);
    }
}

impl Decode for String {
    fn decode(reader: &mut ByteReader<'_>) -> DecodeResult<Self> {
        reader.read_string()
    }
}

impl Encode for String {
    fn encode(&self, writer: &mut ByteWriter) {
        writer.write_string(self);
    }
}

impl Encode for str {
    fn encode(&self, writer: &mut ByteWriter) {
        writer.write_string(self);
    }
}

impl<T: Decode> Decode for Vec<T> {
    fn decode(reader: &mut ByteReader<'_>) -> DecodeResult<Self> {
        let len = reader.read_count()?;
        let mut items = Vec::with_capacity(len.min(reader.remaining()));
        for _ in 0..len {
            items.push(T::decode(reader)?);
        }
        Ok(items)
    }
}

impl<T: Encode> Encode for Vec<T> {
    fn encode(&self, writer: &mut ByteWriter) {
        writer.write_length(self.len());
        for item in self {
            item.encode(writer);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::DecodeError;

    #[test]
    fn test_varuint32_known_encodings() {
        for (value, expected) in [
            (0u32, vec![0x00]),
            (127, vec![0x7f]),
            (128, vec![0x80, 0x01]),
            (300, vec![0xac, 0x02]),
            (u32::MAX, vec![0xff, 0xff, 0xff, 0xff, 0x0f]),
        ] {
            let mut writer = ByteWriter::new();
            writer.write_varuint32(value);
            let bytes = writer.into_inner();
            assert_eq!(bytes, expected, "encoding of {}", value);
            assert_eq!(ByteReader::new(&bytes).read_varuint32().unwrap(), value);
        }
    }

    #[test]
    fn test_varint32_zigzag() {
        let mut writer = ByteWriter::new();
        writer.write_varint32(-1);
        writer.write_varint32(1);
        writer.write_varint32(-64);
        let bytes = writer.into_inner();
        assert_eq!(bytes, vec![0x01, 0x02, 0x7f]);

        let mut reader = ByteReader::new(&bytes);
        assert_eq!(reader.read_varint32().unwrap(), -1);
        assert_eq!(reader.read_varint32().unwrap(), 1);
        assert_eq!(reader.read_varint32().unwrap(), -64);
    }

    #[test]
    fn test_overlong_varuint32_is_invalid() {
        let bytes = [0xff, 0xff, 0xff, 0xff, 0xff, 0x01];
        let err = ByteReader::new(&bytes).read_varuint32().unwrap_err();
        assert!(matches!(err, DecodeError::InvalidData { offset: 0, .. }));
    }

    #[test]
    fn test_truncated_read_reports_offset() {
        let bytes = [1u8, 2, 3];
        let mut reader = ByteReader::new(&bytes);
        reader.read_u16().unwrap();
        let err = reader.read_u32().unwrap_err();
        assert_eq!(err, DecodeError::Truncated { offset: 2, needed: 4, remaining: 1 });
    }

    #[test]
    fn test_length_prefix_larger_than_input() {
        // Claims 10 bytes, only 2 follow.
        let bytes = [10u8, 0xaa, 0xbb];
        let err = ByteReader::new(&bytes).read_bytes().unwrap_err();
        assert!(matches!(err, DecodeError::Truncated { needed: 10, remaining: 2, .. }));
    }

    #[test]
    fn test_vec_count_is_not_trusted_for_allocation() {
        // varuint32 max count, then half of one u32
        let bytes = [0xff, 0xff, 0xff, 0xff, 0x0f, 0x01, 0x02];
        let err = Vec::<u32>::decode(&mut ByteReader::new(&bytes)).unwrap_err();
        assert_eq!(err, DecodeError::Truncated { offset: 5, needed: 4, remaining: 2 });
    }

    #[test]
    fn test_invalid_utf8_string() {
        let bytes = [2u8, 0xc3, 0x28];
        let err = ByteReader::new(&bytes).read_string().unwrap_err();
        assert!(matches!(err, DecodeError::InvalidData { offset: 1, .. }));
    }

    #[test]
    fn test_bool_rejects_other_bytes() {
        assert!(ByteReader::new(&[1]).read_bool().unwrap());
        assert!(ByteReader::new(&[2]).read_bool().is_err());
    }

    #[test]
    fn test_vec_of_strings() {
        let items = vec!["a".to_string(), "bc".to_string()];
        let bytes = to_bytes(&items);
        assert_eq!(bytes, vec![2, 1, b'a', 2, b'b', b'c']);
        let decoded: Vec<String> = from_bytes(&bytes).unwrap();
        assert_eq!(decoded, items);
    }
}
