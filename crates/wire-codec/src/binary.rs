//! Borsh-style positional binary codec.
//!
//! Layout rules, applied field by field in declaration order:
//!
//! - fixed-width integers: little-endian, 1/2/4/8/16 bytes
//! - `bool`: one byte, `0` or `1`
//! - `Option<T>`: tag byte (`0` absent, `1` present) then the value
//! - `Vec<T>` / `String`: `u32` little-endian length, then the elements
//! - `[u8; N]`: raw bytes, no length prefix
//!
//! The format is not self-describing. Producer and consumer agree on the
//! layout of a type by implementing [`BinaryEncode`] and [`BinaryDecode`]
//! with the same field order.

use crate::error::{DecodingError, EncodingError};
use crate::short_vec;

/// Cursor over an immutable byte buffer.
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> Reader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    /// Bytes consumed so far.
    pub fn position(&self) -> usize {
        self.offset
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.offset
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// The unread tail of the buffer.
    pub fn rest(&self) -> &'a [u8] {
        &self.data[self.offset..]
    }

    pub fn peek_u8(&self) -> Option<u8> {
        self.data.get(self.offset).copied()
    }

    /// Read `len` bytes and advance the cursor.
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], DecodingError> {
        let remaining = self.remaining();
        if len > remaining {
            return Err(DecodingError::UnexpectedEndOfData {
                needed: len,
                remaining,
            });
        }
        let slice = &self.data[self.offset..self.offset + len];
        self.offset += len;
        Ok(slice)
    }

    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], DecodingError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    pub fn read_u8(&mut self) -> Result<u8, DecodingError> {
        Ok(self.read_array::<1>()?[0])
    }

    pub fn read<T: BinaryDecode>(&mut self) -> Result<T, DecodingError> {
        T::decode(self)
    }

    /// Read a `u32` length prefix.
    pub fn read_len_prefix(&mut self) -> Result<usize, DecodingError> {
        let len = u32::decode(self)?;
        usize::try_from(len).map_err(|_| DecodingError::LengthOverflow)
    }

    /// Read a compact-length sequence count.
    pub fn read_compact_len(&mut self) -> Result<usize, DecodingError> {
        let (value, consumed) = short_vec::decode_compact_len(self.rest())?;
        self.offset += consumed;
        usize::try_from(value).map_err(|_| DecodingError::LengthOverflow)
    }

    /// Fail if any input is left unread.
    pub fn finish(self) -> Result<(), DecodingError> {
        match self.remaining() {
            0 => Ok(()),
            n => Err(DecodingError::TrailingBytes(n)),
        }
    }
}

/// Growable output buffer.
#[derive(Debug, Clone, Default)]
pub struct Writer {
    buf: Vec<u8>,
}

impl Writer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn write_u8(&mut self, value: u8) {
        self.buf.push(value);
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    pub fn write<T: BinaryEncode + ?Sized>(&mut self, value: &T) -> Result<(), EncodingError> {
        value.encode(self)
    }

    /// Write a `u32` little-endian length prefix.
    pub fn write_len_prefix(&mut self, len: usize) -> Result<(), EncodingError> {
        let len = u32::try_from(len).map_err(|_| EncodingError::LengthOverflow(len))?;
        self.write_bytes(&len.to_le_bytes());
        Ok(())
    }

    /// Write a compact-length sequence count.
    pub fn write_compact_len(&mut self, len: usize) -> Result<(), EncodingError> {
        let len = u32::try_from(len).map_err(|_| EncodingError::LengthOverflow(len))?;
        short_vec::write_compact_len(&mut self.buf, len);
        Ok(())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

/// Types with a fixed positional binary layout.
pub trait BinaryEncode {
    fn encode(&self, writer: &mut Writer) -> Result<(), EncodingError>;

    fn to_bytes(&self) -> Result<Vec<u8>, EncodingError> {
        let mut writer = Writer::new();
        self.encode(&mut writer)?;
        Ok(writer.into_bytes())
    }
}

/// Inverse of [`BinaryEncode`].
pub trait BinaryDecode: Sized {
    fn decode(reader: &mut Reader<'_>) -> Result<Self, DecodingError>;

    /// Decode a value that must span the whole buffer.
    fn from_bytes(bytes: &[u8]) -> Result<Self, DecodingError> {
        let mut reader = Reader::new(bytes);
        let value = Self::decode(&mut reader)?;
        reader.finish()?;
        Ok(value)
    }
}

macro_rules! impl_fixed_width {
    ($($ty:ty),* $(,)?) => {$(
        impl BinaryEncode for $ty {
            fn encode(&self, writer: &mut Writer) -> Result<(), EncodingError> {
                writer.write_bytes(&self.to_le_bytes());
                Ok(())
            }
        }

        impl BinaryDecode for $ty {
            fn decode(reader: &mut Reader<'_>) -> Result<Self, DecodingError> {
                Ok(<$ty>::from_le_bytes(reader.read_array()?))
            }
        }
    )*};
}

impl_fixed_width!(u8, u16, u32, u64, u128, i8, i16, i32, i64, i128);

impl BinaryEncode for bool {
    fn encode(&self, writer: &mut Writer) -> Result<(), EncodingError> {
        writer.write_u8(u8::from(*self));
        Ok(())
    }
}

impl BinaryDecode for bool {
    fn decode(reader: &mut Reader<'_>) -> Result<Self, DecodingError> {
        match reader.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(DecodingError::InvalidBool(other)),
        }
    }
}

impl<T: BinaryEncode> BinaryEncode for Option<T> {
    fn encode(&self, writer: &mut Writer) -> Result<(), EncodingError> {
        match self {
            None => {
                writer.write_u8(0);
                Ok(())
            }
            Some(value) => {
                writer.write_u8(1);
                value.encode(writer)
            }
        }
    }
}

impl<T: BinaryDecode> BinaryDecode for Option<T> {
    fn decode(reader: &mut Reader<'_>) -> Result<Self, DecodingError> {
        match reader.read_u8()? {
            0 => Ok(None),
            1 => Ok(Some(T::decode(reader)?)),
            other => Err(DecodingError::InvalidOptionTag(other)),
        }
    }
}

impl<T: BinaryEncode> BinaryEncode for [T] {
    fn encode(&self, writer: &mut Writer) -> Result<(), EncodingError> {
        writer.write_len_prefix(self.len())?;
        for item in self {
            item.encode(writer)?;
        }
        Ok(())
    }
}

impl<T: BinaryEncode> BinaryEncode for Vec<T> {
    fn encode(&self, writer: &mut Writer) -> Result<(), EncodingError> {
        self.as_slice().encode(writer)
    }
}

impl<T: BinaryDecode> BinaryDecode for Vec<T> {
    fn decode(reader: &mut Reader<'_>) -> Result<Self, DecodingError> {
        let len = reader.read_len_prefix()?;
        // Every element occupies at least one byte, so a prefix larger than
        // the remaining input cannot be honest; cap the allocation.
        let mut out = Vec::with_capacity(len.min(reader.remaining()));
        for _ in 0..len {
            out.push(T::decode(reader)?);
        }
        Ok(out)
    }
}

impl BinaryEncode for str {
    fn encode(&self, writer: &mut Writer) -> Result<(), EncodingError> {
        writer.write_len_prefix(self.len())?;
        writer.write_bytes(self.as_bytes());
        Ok(())
    }
}

impl BinaryEncode for String {
    fn encode(&self, writer: &mut Writer) -> Result<(), EncodingError> {
        self.as_str().encode(writer)
    }
}

impl BinaryDecode for String {
    fn decode(reader: &mut Reader<'_>) -> Result<Self, DecodingError> {
        let len = reader.read_len_prefix()?;
        let bytes = reader.read_bytes(len)?;
        String::from_utf8(bytes.to_vec()).map_err(|_| DecodingError::InvalidUtf8)
    }
}

impl<const N: usize> BinaryEncode for [u8; N] {
    fn encode(&self, writer: &mut Writer) -> Result<(), EncodingError> {
        writer.write_bytes(self);
        Ok(())
    }
}

impl<const N: usize> BinaryDecode for [u8; N] {
    fn decode(reader: &mut Reader<'_>) -> Result<Self, DecodingError> {
        reader.read_array()
    }
}
