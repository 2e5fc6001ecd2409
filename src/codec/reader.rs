use byteorder::{ByteOrder, LittleEndian};

use crate::error::{Error, Result};

/// Forward-only binary reader over a decompressed save buffer.
///
/// There is no way to move the position backwards: every
/// decoder consumes fields strictly in stream order.
pub struct BinaryReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> BinaryReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    pub fn skip(&mut self, n: usize) -> Result<()> {
        self.read_bytes(n).map(|_| ())
    }

    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        if self.remaining() < n {
            return Err(Error::UnexpectedEof {
                offset: self.pos,
                need: n,
                have: self.remaining(),
            });
        }
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    /// Read `n` bytes into an owned buffer
    pub fn read_vec(&mut self, n: usize) -> Result<Vec<u8>> {
        Ok(self.read_bytes(n)?.to_vec())
    }

    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_bytes(1)?[0])
    }

    pub fn read_i8(&mut self) -> Result<i8> {
        Ok(self.read_u8()? as i8)
    }

    pub fn read_bool(&mut self) -> Result<bool> {
        Ok(self.read_u8()? != 0)
    }

    pub fn read_u16_le(&mut self) -> Result<u16> {
        Ok(LittleEndian::read_u16(self.read_bytes(2)?))
    }

    pub fn read_i16_le(&mut self) -> Result<i16> {
        Ok(LittleEndian::read_i16(self.read_bytes(2)?))
    }

    pub fn read_u32_le(&mut self) -> Result<u32> {
        Ok(LittleEndian::read_u32(self.read_bytes(4)?))
    }

    pub fn read_i32_le(&mut self) -> Result<i32> {
        Ok(LittleEndian::read_i32(self.read_bytes(4)?))
    }

    /// Read a presence flag. Anything other than 0 or 1 means the stream
    /// is out of step with the layout.
    pub fn read_flag(&mut self, field: &'static str) -> Result<bool> {
        let offset = self.pos;
        match self.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            value => Err(Error::InvalidFlag { offset, field, value }),
        }
    }

    /// Consume a byte that is always zero in well-formed files
    pub fn expect_zero(&mut self, field: &'static str) -> Result<()> {
        let offset = self.pos;
        match self.read_u8()? {
            0 => Ok(()),
            value => Err(Error::ExpectedZero { offset, field, value }),
        }
    }

    /// Read a string prefixed with a single length byte.
    ///
    /// Names in saves are not guaranteed to be valid UTF-8, so invalid
    /// sequences are replaced rather than rejected.
    pub fn read_string(&mut self) -> Result<String> {
        let len = self.read_u8()? as usize;
        let bytes = self.read_bytes(len)?;
        Ok(String::from_utf8_lossy(bytes).into_owned())
    }

    /// Read an unsigned (x, y) grid coordinate pair
    pub fn read_coords_u32(&mut self) -> Result<(u32, u32)> {
        Ok((self.read_u32_le()?, self.read_u32_le()?))
    }

    /// Read a signed (x, y) coordinate pair
    pub fn read_coords_i32(&mut self) -> Result<(i32, i32)> {
        Ok((self.read_i32_le()?, self.read_i32_le()?))
    }

    /// Read a u16-count-prefixed list of u16 values
    pub fn read_u16_list(&mut self) -> Result<Vec<u16>> {
        let count = self.read_u16_le()? as usize;
        let mut out = Vec::with_capacity(count.min(self.remaining() / 2));
        for _ in 0..count {
            out.push(self.read_u16_le()?);
        }
        Ok(out)
    }
}
