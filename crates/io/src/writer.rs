//! Bounded array writer
//!
//! [`BoundedWriter`] writes into a caller-owned byte array. A write that
//! would pass the current end fails with end-of-data and leaves the array
//! untouched, which lets a page writer try a record and fall back to another
//! page without cleanup. [`BoundedWriter::set_limit`] narrows the writable
//! region to a fixed number of bytes from the current position.

use crate::data::DataOutput;
use stratafmt_core::error::{FormatError, Result};

/// Cursor over a mutable borrowed byte array.
#[derive(Debug)]
pub struct BoundedWriter<'a> {
    data: &'a mut [u8],
    begin: usize,
    position: usize,
    end: usize,
}

impl<'a> BoundedWriter<'a> {
    /// Writer over the whole of `data`, positioned at zero.
    pub fn new(data: &'a mut [u8]) -> Self {
        let end = data.len();
        Self {
            data,
            begin: 0,
            position: 0,
            end,
        }
    }

    /// Writer over `data`, positioned at `offset`.
    pub fn at(data: &'a mut [u8], offset: usize) -> Result<Self> {
        if offset > data.len() {
            return Err(FormatError::end_of_data(offset, data.len()));
        }
        let end = data.len();
        Ok(Self {
            data,
            begin: offset,
            position: offset,
            end,
        })
    }

    /// Allow only `len` more bytes to be written from the current position.
    ///
    /// Fails with end-of-data when the array does not have room for `len`
    /// bytes; the current limit is kept in that case.
    pub fn set_limit(&mut self, len: usize) -> Result<()> {
        let available = self.data.len() - self.position;
        if len > available {
            return Err(FormatError::end_of_data(len, available));
        }
        self.end = self.position + len;
        Ok(())
    }

    /// Remove the limit; returns how many limited bytes went unused.
    pub fn clear_limit(&mut self) -> usize {
        let unused = self.end - self.position;
        self.end = self.data.len();
        unused
    }

    /// Current position.
    #[inline]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Move the cursor inside `[0, end]`.
    pub fn set_position(&mut self, position: usize) -> Result<()> {
        if position > self.end {
            return Err(FormatError::end_of_data(
                position - self.position.min(position),
                self.end - self.position,
            ));
        }
        self.position = position;
        Ok(())
    }

    /// Position the current record began at.
    #[inline]
    pub fn begin_position(&self) -> usize {
        self.begin
    }

    /// Mark where the current record begins.
    pub fn set_begin_position(&mut self, begin: usize) {
        self.begin = begin;
    }

    /// Bytes written since the begin position.
    #[inline]
    pub fn written(&self) -> usize {
        self.position.saturating_sub(self.begin)
    }

    /// Bytes that can still be written before the end.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.end - self.position
    }

    /// The bytes from the begin position to the cursor.
    pub fn written_bytes(&self) -> &[u8] {
        &self.data[self.begin.min(self.position)..self.position]
    }
}

impl DataOutput for BoundedWriter<'_> {
    fn write_all(&mut self, bytes: &[u8]) -> Result<()> {
        if bytes.len() > self.remaining() {
            return Err(FormatError::end_of_data(bytes.len(), self.remaining()));
        }
        self.data[self.position..self.position + bytes.len()].copy_from_slice(bytes);
        self.position += bytes.len();
        Ok(())
    }

    fn write_u8(&mut self, value: u8) -> Result<()> {
        if self.position >= self.end {
            return Err(FormatError::end_of_data(1, 0));
        }
        self.data[self.position] = value;
        self.position += 1;
        Ok(())
    }
}
