//! Bounded array reader
//!
//! [`BoundedReader`] reads from a borrowed byte array inside a window
//! `[start, end)`. The window can be narrowed with [`BoundedReader::set_limit`]
//! so that a field decoder cannot run past the bytes that belong to it, and
//! the same reader can be re-pointed at another array without allocating.
//!
//! Positions are absolute offsets into the array.

use crate::compressed;
use crate::data::DataInput;
use crate::utf;
use stratafmt_core::error::{FormatError, Result};

/// Cursor over a borrowed byte array, limited to a window.
#[derive(Debug, Clone)]
pub struct BoundedReader<'a> {
    data: &'a [u8],
    start: usize,
    position: usize,
    end: usize,
}

impl<'a> BoundedReader<'a> {
    /// Reader over the whole of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            start: 0,
            position: 0,
            end: data.len(),
        }
    }

    /// Reader over `data[offset..offset + len]`, positioned at `offset`.
    pub fn with_window(data: &'a [u8], offset: usize, len: usize) -> Result<Self> {
        let mut reader = Self::new(data);
        reader.rebind_window(data, offset, len)?;
        Ok(reader)
    }

    /// Point the reader at a new array and reset the window to all of it.
    pub fn rebind(&mut self, data: &'a [u8]) {
        self.data = data;
        self.start = 0;
        self.position = 0;
        self.end = data.len();
    }

    /// Point the reader at `data[offset..offset + len]`.
    ///
    /// Fails with end-of-data, leaving the reader unchanged, when the window
    /// lies outside the array.
    pub fn rebind_window(&mut self, data: &'a [u8], offset: usize, len: usize) -> Result<()> {
        let end = offset
            .checked_add(len)
            .filter(|&end| end <= data.len())
            .ok_or_else(|| FormatError::end_of_data(len, data.len().saturating_sub(offset)))?;
        self.data = data;
        self.start = offset;
        self.position = offset;
        self.end = end;
        Ok(())
    }

    /// Restrict reading to `[offset, offset + len)` of the current array.
    ///
    /// On failure the window collapses to empty at position zero, so a
    /// caller that ignores the error cannot read stale bytes.
    pub fn set_limit(&mut self, offset: usize, len: usize) -> Result<()> {
        match offset.checked_add(len).filter(|&end| end <= self.data.len()) {
            Some(end) => {
                self.start = offset;
                self.position = offset;
                self.end = end;
                Ok(())
            }
            None => {
                let available = self.data.len().saturating_sub(offset);
                self.start = 0;
                self.position = 0;
                self.end = 0;
                Err(FormatError::end_of_data(len, available))
            }
        }
    }

    /// Restrict reading to the next `len` bytes from the current position.
    ///
    /// Returns the previous end so the caller can restore it with
    /// [`BoundedReader::restore_limit`] once the field has been read.
    pub fn set_limit_from_position(&mut self, len: usize) -> Result<usize> {
        if len > self.available() {
            return Err(FormatError::end_of_data(len, self.available()));
        }
        let old_end = self.end;
        self.start = self.position;
        self.end = self.position + len;
        Ok(old_end)
    }

    /// Put back an end returned by [`BoundedReader::set_limit_from_position`].
    pub fn restore_limit(&mut self, end: usize) {
        self.end = end.min(self.data.len()).max(self.position);
    }

    /// Widen the window back to the whole array, keeping the position.
    pub fn clear_limit(&mut self) {
        self.start = 0;
        self.end = self.data.len();
    }

    /// Current absolute position.
    #[inline]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Move to an absolute position inside the window.
    pub fn set_position(&mut self, position: usize) -> Result<()> {
        if position < self.start || position > self.end {
            return Err(FormatError::end_of_data(
                position.saturating_sub(self.position),
                self.end - self.position,
            ));
        }
        self.position = position;
        Ok(())
    }

    /// Start of the window.
    #[inline]
    pub fn start(&self) -> usize {
        self.start
    }

    /// End of the window (exclusive).
    #[inline]
    pub fn end(&self) -> usize {
        self.end
    }

    /// The backing array.
    #[inline]
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Advance by `n` bytes; returns the new position.
    pub fn skip(&mut self, n: usize) -> Result<usize> {
        self.ensure(n)?;
        self.position += n;
        Ok(self.position)
    }

    /// Borrow the next `n` bytes without copying.
    pub fn read_slice(&mut self, n: usize) -> Result<&'a [u8]> {
        self.ensure(n)?;
        let slice = &self.data[self.position..self.position + n];
        self.position += n;
        Ok(slice)
    }

    /// Bytes between the position and the end of the window.
    #[inline]
    fn remaining(&self) -> &'a [u8] {
        &self.data[self.position..self.end]
    }

    /// Read a length prefix and decode the payload straight from the window.
    fn decode_utf(
        &mut self,
        chars: &mut Vec<u16>,
        decode: fn(&[u8], usize, &mut Vec<u16>) -> Result<usize>,
    ) -> Result<usize> {
        let declared = self.read_u16()? as usize;
        let consumed = match decode(self.remaining(), declared, chars) {
            Ok(consumed) => consumed,
            Err(e) => {
                // leave the cursor on the length prefix
                self.position -= 2;
                return Err(e);
            }
        };
        self.position += consumed;
        Ok(chars.len())
    }

    #[inline]
    fn ensure(&self, n: usize) -> Result<()> {
        let available = self.end - self.position;
        if n > available {
            return Err(FormatError::end_of_data(n, available));
        }
        Ok(())
    }
}

impl DataInput for BoundedReader<'_> {
    fn read_fully(&mut self, buf: &mut [u8]) -> Result<()> {
        let src = self.read_slice(buf.len())?;
        buf.copy_from_slice(src);
        Ok(())
    }

    fn skip_bytes(&mut self, n: usize) -> Result<()> {
        self.skip(n).map(|_| ())
    }

    #[inline]
    fn available(&self) -> usize {
        self.end - self.position
    }

    fn read_u8(&mut self) -> Result<u8> {
        self.ensure(1)?;
        let b = self.data[self.position];
        self.position += 1;
        Ok(b)
    }

    fn read_compressed_int(&mut self) -> Result<i32> {
        let (value, len) = compressed::read_int_at(self.remaining(), 0)?;
        self.position += len;
        Ok(value)
    }

    fn read_compressed_long(&mut self) -> Result<i64> {
        let (value, len) = compressed::read_long_at(self.remaining(), 0)?;
        self.position += len;
        Ok(value)
    }

    fn read_modified_utf(&mut self, chars: &mut Vec<u16>) -> Result<usize> {
        self.decode_utf(chars, utf::decode)
    }

    fn read_long_modified_utf(&mut self, chars: &mut Vec<u16>) -> Result<usize> {
        self.decode_utf(chars, utf::decode_long)
    }
}
