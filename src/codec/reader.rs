//! Cursor over borrowed wire bytes

use crate::errors::{DecodeError, DecodeResult};

/// Little-endian reader over a borrowed byte slice.
///
/// The reader never copies or mutates the input; it only advances an offset.
#[derive(Debug, Clone)]
pub struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Current offset from the start of the input
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Bytes consumed since `start`, which must be an earlier position.
    pub fn consumed_since(&self, start: usize) -> &'a [u8] {
        &self.data[start.min(self.pos)..self.pos]
    }

    /// Read exactly `len` bytes
    pub fn read_slice(&mut self, len: usize) -> DecodeResult<&'a [u8]> {
        if len > self.remaining() {
            return Err(DecodeError::Truncated {
                offset: self.pos,
                needed: len,
                remaining: self.remaining(),
            });
        }
        let slice = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    pub fn read_array<const N: usize>(&mut self) -> DecodeResult<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_slice(N)?);
        Ok(out)
    }

    pub fn read_u8(&mut self) -> DecodeResult<u8> {
        Ok(self.read_array::<1>()?[0])
    }

    pub fn read_i8(&mut self) -> DecodeResult<i8> {
        Ok(self.read_u8()? as i8)
    }

    pub fn read_u16(&mut self) -> DecodeResult<u16> {
        Ok(u16::from_le_bytes(self.read_array()?))
    }

    pub fn read_i16(&mut self) -> DecodeResult<i16> {
        Ok(i16::from_le_bytes(self.read_array()?))
    }

    pub fn read_u32(&mut self) -> DecodeResult<u32> {
        Ok(u32::from_le_bytes(self.read_array()?))
    }

    pub fn read_i32(&mut self) -> DecodeResult<i32> {
        Ok(i32::from_le_bytes(self.read_array()?))
    }

    pub fn read_u64(&mut self) -> DecodeResult<u64> {
        Ok(u64::from_le_bytes(self.read_array()?))
    }

    pub fn read_i64(&mut self) -> DecodeResult<i64> {
        Ok(i64::from_le_bytes(self.read_array()?))
    }

    pub fn read_u128(&mut self) -> DecodeResult<u128> {
        Ok(u128::from_le_bytes(self.read_array()?))
    }

    pub fn read_i128(&mut self) -> DecodeResult<i128> {
        Ok(i128::from_le_bytes(self.read_array()?))
    }

    pub fn read_f32(&mut self) -> DecodeResult<f32> {
        Ok(f32::from_le_bytes(self.read_array()?))
    }

    pub fn read_f64(&mut self) -> DecodeResult<f64> {
        Ok(f64::from_le_bytes(self.read_array()?))
    }

    pub fn read_bool(&mut self) -> DecodeResult<bool> {
        let offset = self.pos;
        match self.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(DecodeError::invalid(offset, format!("bool byte must be 0 or 1, got {}", other))),
        }
    }

    /// LEB128 encoded unsigned 32-bit integer
    pub fn read_varuint32(&mut self) -> DecodeResult<u32> {
        let offset = self.pos;
        let mut value: u64 = 0;
        let mut shift = 0u32;
        loop {
            let byte = self.read_u8()?;
            value |= u64::from(byte & 0x7f) << shift;
            if byte & 0x80 == 0 {
                break;
            }
            shift += 7;
            if shift >= 35 {
                return Err(DecodeError::invalid(offset, "varuint32 is longer than 5 bytes"));
            }
        }
        u32::try_from(value).map_err(|_| DecodeError::invalid(offset, "varuint32 overflows 32 bits"))
    }

    /// Zig-zag encoded signed 32-bit integer
    pub fn read_varint32(&mut self) -> DecodeResult<i32> {
        let raw = self.read_varuint32()?;
        Ok(((raw >> 1) as i32) ^ -((raw & 1) as i32))
    }

    /// Element count of an array. Elements may encode to zero bytes, so the
    /// count is not bounded by what is left; each element read reports its
    /// own truncation.
    pub fn read_count(&mut self) -> DecodeResult<usize> {
        Ok(self.read_varuint32()? as usize)
    }

    /// Length prefix of a byte sequence, checked against what is left.
    ///
    /// Also fits collections whose elements take at least one byte each,
    /// where a length larger than the remaining input can only be a truncation.
    pub fn read_length(&mut self) -> DecodeResult<usize> {
        let offset = self.pos;
        let len = self.read_varuint32()? as usize;
        if len > self.remaining() {
            return Err(DecodeError::Truncated {
                offset,
                needed: len,
                remaining: self.remaining(),
            });
        }
        Ok(len)
    }

    /// varuint32 length followed by that many raw bytes
    pub fn read_bytes(&mut self) -> DecodeResult<Vec<u8>> {
        let len = self.read_length()?;
        Ok(self.read_slice(len)?.to_vec())
    }

    pub fn read_string(&mut self) -> DecodeResult<String> {
        let len = self.read_length()?;
        let offset = self.pos;
        let raw = self.read_slice(len)?;
        std::str::from_utf8(raw)
            .map(str::to_string)
            .map_err(|e| DecodeError::invalid(offset, format!("string is not valid UTF-8: {}", e)))
    }
}
