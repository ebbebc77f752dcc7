//! Byte-level serialization: a cursor reader, a growable writer, and
//! the big-endian variable-length integer.
//!
//! All multi-byte integers on the wire are big-endian. `VarInt` decode
//! rejects any encoding longer than necessary for the value.

use crate::PrimitivesError;

// ----- VarInt -----

/// Variable-length integer with big-endian payloads.
///
/// Values below 0xfd are a single byte; larger values use a one-byte
/// prefix (`0xfd`/`0xfe`/`0xff`) followed by a big-endian u16/u32/u64.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VarInt(pub u64);

impl VarInt {
    /// Encoded length in bytes for this value.
    pub fn size(&self) -> usize {
        match self.0 {
            0..=0xfc => 1,
            0xfd..=0xffff => 3,
            0x10000..=0xffff_ffff => 5,
            _ => 9,
        }
    }

    /// Serializes the value in minimal form.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut writer = ByteWriter::new();
        self.put_bytes(&mut writer);
        writer.into_bytes()
    }

    /// Appends the minimal encoding to `writer`.
    pub fn put_bytes(&self, writer: &mut ByteWriter) {
        match self.0 {
            0..=0xfc => writer.write_u8(self.0 as u8),
            0xfd..=0xffff => {
                writer.write_u8(0xfd);
                writer.write_u16_be(self.0 as u16);
            }
            0x10000..=0xffff_ffff => {
                writer.write_u8(0xfe);
                writer.write_u32_be(self.0 as u32);
            }
            _ => {
                writer.write_u8(0xff);
                writer.write_u64_be(self.0);
            }
        }
    }

    /// Reads a VarInt, rejecting non-minimal encodings.
    pub fn from_reader(reader: &mut ByteReader) -> Result<Self, PrimitivesError> {
        let first = reader.read_u8()?;
        let value = match first {
            0xff => {
                let v = reader.read_u64_be()?;
                if v <= 0xffff_ffff {
                    return Err(PrimitivesError::NonMinimalEncoding);
                }
                v
            }
            0xfe => {
                let v = reader.read_u32_be()? as u64;
                if v <= 0xffff {
                    return Err(PrimitivesError::NonMinimalEncoding);
                }
                v
            }
            0xfd => {
                let v = reader.read_u16_be()? as u64;
                if v < 0xfd {
                    return Err(PrimitivesError::NonMinimalEncoding);
                }
                v
            }
            b => b as u64,
        };
        Ok(VarInt(value))
    }

    /// Parses a VarInt that must consume the whole input.
    pub fn from_bytes(data: &[u8]) -> Result<Self, PrimitivesError> {
        let mut reader = ByteReader::new(data);
        let var_int = Self::from_reader(&mut reader)?;
        if reader.remaining() > 0 {
            return Err(PrimitivesError::TooMuchData(reader.remaining()));
        }
        Ok(var_int)
    }
}

// ----- ByteReader -----

/// Cursor over a byte slice with checked big-endian reads.
pub struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        ByteReader { data, pos: 0 }
    }

    /// Bytes left to read.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// True once the cursor has consumed the whole input.
    pub fn eof(&self) -> bool {
        self.pos >= self.data.len()
    }

    pub fn read_bytes(&mut self, n: usize) -> Result<Vec<u8>, PrimitivesError> {
        if self.remaining() < n {
            return Err(PrimitivesError::NotEnoughData {
                needed: n,
                available: self.remaining(),
            });
        }
        let out = self.data[self.pos..self.pos + n].to_vec();
        self.pos += n;
        Ok(out)
    }

    /// Reads exactly `N` bytes into a fixed array.
    pub fn read_fixed<const N: usize>(&mut self) -> Result<[u8; N], PrimitivesError> {
        if self.remaining() < N {
            return Err(PrimitivesError::NotEnoughData {
                needed: N,
                available: self.remaining(),
            });
        }
        let mut out = [0u8; N];
        out.copy_from_slice(&self.data[self.pos..self.pos + N]);
        self.pos += N;
        Ok(out)
    }

    /// Consumes and returns everything left in the buffer.
    pub fn read_remainder(&mut self) -> Vec<u8> {
        let out = self.data[self.pos..].to_vec();
        self.pos = self.data.len();
        out
    }

    pub fn read_u8(&mut self) -> Result<u8, PrimitivesError> {
        Ok(self.read_fixed::<1>()?[0])
    }

    pub fn read_u16_be(&mut self) -> Result<u16, PrimitivesError> {
        Ok(u16::from_be_bytes(self.read_fixed::<2>()?))
    }

    pub fn read_u32_be(&mut self) -> Result<u32, PrimitivesError> {
        Ok(u32::from_be_bytes(self.read_fixed::<4>()?))
    }

    pub fn read_u64_be(&mut self) -> Result<u64, PrimitivesError> {
        Ok(u64::from_be_bytes(self.read_fixed::<8>()?))
    }

    /// Reads a minimally-encoded VarInt and returns its value.
    pub fn read_var_int(&mut self) -> Result<u64, PrimitivesError> {
        Ok(VarInt::from_reader(self)?.0)
    }
}

// ----- ByteWriter -----

/// Growable output buffer with big-endian writes. Writes never fail.
#[derive(Debug, Default, Clone)]
pub struct ByteWriter {
    buf: Vec<u8>,
}

impl ByteWriter {
    pub fn new() -> Self {
        ByteWriter { buf: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    pub fn write_u16_be(&mut self, v: u16) {
        self.buf.extend_from_slice(&v.to_be_bytes());
    }

    pub fn write_u32_be(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_be_bytes());
    }

    pub fn write_u64_be(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_be_bytes());
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Writes `v` as a minimal VarInt.
    pub fn write_var_int(&mut self, v: u64) {
        VarInt(v).put_bytes(self);
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}
