/*
    REFERENCES
    ----------

    1. https://github.com/shaka-project/shaka-player/blob/f539147d480fff9cc8d685f3aac0e6f5dc28a182/lib/util/data_view_reader.js

*/

use crate::{Error, Result};

/// Big-endian reader over a borrowed byte slice.
#[derive(Clone, Debug, Default)]
pub struct Reader<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> Reader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    pub fn has_more_data(&self) -> bool {
        self.position < self.data.len()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// Number of bytes between the cursor and the end of the data.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.position
    }

    pub fn skip(&mut self, bytes: usize) -> Result<()> {
        self.take(bytes, "skipped bytes")?;
        Ok(())
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.array::<1>("u8")?[0])
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(u16::from_be_bytes(self.array("u16")?))
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(u32::from_be_bytes(self.array("u32")?))
    }

    pub fn read_u64(&mut self) -> Result<u64> {
        Ok(u64::from_be_bytes(self.array("u64")?))
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(i32::from_be_bytes(self.array("i32")?))
    }

    pub fn read_bytes(&mut self, bytes: usize) -> Result<&'a [u8]> {
        self.take(bytes, "byte range")
    }

    /// Consume everything left after the cursor.
    pub fn read_to_end(&mut self) -> &'a [u8] {
        let data = self.data;
        let rest = &data[self.position..];
        self.position = self.data.len();
        rest
    }

    fn array<const N: usize>(&mut self, what: &'static str) -> Result<[u8; N]> {
        let mut buf = [0; N];
        buf.copy_from_slice(self.take(N, what)?);
        Ok(buf)
    }

    fn take(&mut self, bytes: usize, what: &'static str) -> Result<&'a [u8]> {
        let end = self
            .position
            .checked_add(bytes)
            .filter(|end| *end <= self.data.len())
            .ok_or_else(|| Error::Read {
                what,
                position: self.position,
                wanted: bytes,
                available: self.remaining(),
            })?;

        let data = self.data;
        let slice = &data[self.position..end];
        self.position = end;
        Ok(slice)
    }
}
