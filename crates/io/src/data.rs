//! Data stream traits
//!
//! [`DataInput`] and [`DataOutput`] describe a cursor over bytes that reads or
//! writes big-endian fixed-width values, booleans, modified UTF-8 strings and
//! the compressed numbers of [`crate::compressed`]. The bounded buffers
//! implement them directly over a caller-owned byte array; `Vec<u8>`
//! implements [`DataOutput`] for unbounded scratch encoding.
//!
//! Only the primitive byte operations are required. Everything else has a
//! provided implementation that implementers may override with a faster path
//! (the bounded reader decodes compressed numbers and UTF straight from its
//! slice).

use crate::compressed;
use crate::utf;
use byteorder::{BigEndian, ByteOrder};
use stratafmt_core::error::{FormatError, Result};
use stratafmt_core::limits::LONG_UTF_TERMINATOR;

/// Cursor-based source of stored bytes.
pub trait DataInput {
    /// Fill `buf` completely or fail with end-of-data.
    fn read_fully(&mut self, buf: &mut [u8]) -> Result<()>;

    /// Advance the cursor by `n` bytes.
    fn skip_bytes(&mut self, n: usize) -> Result<()>;

    /// Bytes left before the end of the readable window.
    fn available(&self) -> usize;

    /// Decode a length-prefixed modified UTF-8 string into `chars`.
    ///
    /// `chars` is cleared first and only reallocated when its capacity is too
    /// small. Returns the number of UTF-16 units decoded. A declared length of
    /// zero is the empty string.
    fn read_modified_utf(&mut self, chars: &mut Vec<u16>) -> Result<usize>;

    /// Decode a string written by [`DataOutput::write_long_utf`] into `chars`.
    ///
    /// A declared length of zero reads to the end of the window unless the
    /// `E0 00 00` terminator appears first, which is consumed.
    fn read_long_modified_utf(&mut self, chars: &mut Vec<u16>) -> Result<usize> {
        let declared = self.read_u16()? as usize;
        if declared > 0 {
            let mut payload = vec![0u8; declared.min(self.available())];
            self.read_fully(&mut payload)?;
            utf::decode(&payload, declared, chars)?;
            return Ok(chars.len());
        }
        let mut payload = Vec::new();
        while self.available() > 0 && !payload.ends_with(&LONG_UTF_TERMINATOR) {
            payload.push(self.read_u8()?);
        }
        utf::decode_long(&payload, 0, chars)?;
        Ok(chars.len())
    }

    /// Read one byte.
    fn read_u8(&mut self) -> Result<u8> {
        let mut b = [0u8; 1];
        self.read_fully(&mut b)?;
        Ok(b[0])
    }

    /// Read one signed byte.
    fn read_i8(&mut self) -> Result<i8> {
        Ok(self.read_u8()? as i8)
    }

    /// Read a boolean; any non-zero byte is true.
    fn read_bool(&mut self) -> Result<bool> {
        Ok(self.read_u8()? != 0)
    }

    /// Read a big-endian unsigned short.
    fn read_u16(&mut self) -> Result<u16> {
        let mut b = [0u8; 2];
        self.read_fully(&mut b)?;
        Ok(BigEndian::read_u16(&b))
    }

    /// Read a big-endian short.
    fn read_i16(&mut self) -> Result<i16> {
        let mut b = [0u8; 2];
        self.read_fully(&mut b)?;
        Ok(BigEndian::read_i16(&b))
    }

    /// Read a big-endian int.
    fn read_i32(&mut self) -> Result<i32> {
        let mut b = [0u8; 4];
        self.read_fully(&mut b)?;
        Ok(BigEndian::read_i32(&b))
    }

    /// Read a big-endian long.
    fn read_i64(&mut self) -> Result<i64> {
        let mut b = [0u8; 8];
        self.read_fully(&mut b)?;
        Ok(BigEndian::read_i64(&b))
    }

    /// Read a big-endian IEEE-754 float.
    fn read_f32(&mut self) -> Result<f32> {
        let mut b = [0u8; 4];
        self.read_fully(&mut b)?;
        Ok(BigEndian::read_f32(&b))
    }

    /// Read a big-endian IEEE-754 double.
    fn read_f64(&mut self) -> Result<f64> {
        let mut b = [0u8; 8];
        self.read_fully(&mut b)?;
        Ok(BigEndian::read_f64(&b))
    }

    /// Read a compressed int (1, 2 or 4 bytes).
    fn read_compressed_int(&mut self) -> Result<i32> {
        compressed::read_int(self)
    }

    /// Read a compressed long (2, 4 or 8 bytes).
    fn read_compressed_long(&mut self) -> Result<i64> {
        compressed::read_long(self)
    }

    /// Read a length-prefixed modified UTF-8 string.
    fn read_utf(&mut self) -> Result<String> {
        let mut chars = Vec::new();
        self.read_modified_utf(&mut chars)?;
        utf::units_to_string(&chars)
    }

    /// Read a string written by [`DataOutput::write_long_utf`].
    fn read_long_utf(&mut self) -> Result<String> {
        let mut chars = Vec::new();
        self.read_long_modified_utf(&mut chars)?;
        utf::units_to_string(&chars)
    }
}

/// Cursor-based sink for stored bytes.
pub trait DataOutput {
    /// Write all of `bytes` or fail with end-of-data.
    fn write_all(&mut self, bytes: &[u8]) -> Result<()>;

    /// Write one byte.
    fn write_u8(&mut self, value: u8) -> Result<()> {
        self.write_all(&[value])
    }

    /// Write one signed byte.
    fn write_i8(&mut self, value: i8) -> Result<()> {
        self.write_all(&[value as u8])
    }

    /// Write a boolean as `0` or `1`.
    fn write_bool(&mut self, value: bool) -> Result<()> {
        self.write_all(&[u8::from(value)])
    }

    /// Write a big-endian unsigned short.
    fn write_u16(&mut self, value: u16) -> Result<()> {
        let mut b = [0u8; 2];
        BigEndian::write_u16(&mut b, value);
        self.write_all(&b)
    }

    /// Write a big-endian short.
    fn write_i16(&mut self, value: i16) -> Result<()> {
        let mut b = [0u8; 2];
        BigEndian::write_i16(&mut b, value);
        self.write_all(&b)
    }

    /// Write a big-endian int.
    fn write_i32(&mut self, value: i32) -> Result<()> {
        let mut b = [0u8; 4];
        BigEndian::write_i32(&mut b, value);
        self.write_all(&b)
    }

    /// Write a big-endian long.
    fn write_i64(&mut self, value: i64) -> Result<()> {
        let mut b = [0u8; 8];
        BigEndian::write_i64(&mut b, value);
        self.write_all(&b)
    }

    /// Write a big-endian IEEE-754 float.
    fn write_f32(&mut self, value: f32) -> Result<()> {
        let mut b = [0u8; 4];
        BigEndian::write_f32(&mut b, value);
        self.write_all(&b)
    }

    /// Write a big-endian IEEE-754 double.
    fn write_f64(&mut self, value: f64) -> Result<()> {
        let mut b = [0u8; 8];
        BigEndian::write_f64(&mut b, value);
        self.write_all(&b)
    }

    /// Write a compressed int; returns the number of bytes written.
    fn write_compressed_int(&mut self, value: i32) -> Result<usize> {
        compressed::write_int(self, value)
    }

    /// Write a compressed long; returns the number of bytes written.
    fn write_compressed_long(&mut self, value: i64) -> Result<usize> {
        compressed::write_long(self, value)
    }

    /// Write a 2-byte length followed by the modified UTF-8 bytes of `s`.
    ///
    /// Fails with an encoding error when the encoded form is longer than a
    /// 2-byte length can declare.
    fn write_utf(&mut self, s: &str) -> Result<()> {
        let len = utf::utf_length(s);
        if len > stratafmt_core::limits::MAX_UTF_LENGTH {
            return Err(FormatError::Encoding(format!(
                "UTF length {} exceeds {}",
                len,
                stratafmt_core::limits::MAX_UTF_LENGTH
            )));
        }
        self.write_u16(len as u16)?;
        write_utf_units(self, s)
    }

    /// Write `s` in the character-column form.
    ///
    /// Strings that fit a 2-byte length are written as by
    /// [`DataOutput::write_utf`], except the empty string, which is written
    /// as a zero length followed by the terminator so it stays self-delimiting.
    /// Longer strings declare length zero and are followed by the
    /// `E0 00 00` terminator.
    fn write_long_utf(&mut self, s: &str) -> Result<()> {
        let len = utf::utf_length(s);
        if len == 0 {
            self.write_u16(0)?;
            return self.write_all(&LONG_UTF_TERMINATOR);
        }
        if len <= stratafmt_core::limits::MAX_UTF_LENGTH {
            self.write_u16(len as u16)?;
            return write_utf_units(self, s);
        }
        self.write_u16(0)?;
        write_utf_units(self, s)?;
        self.write_all(&LONG_UTF_TERMINATOR)
    }
}

fn write_utf_units<W: DataOutput + ?Sized>(out: &mut W, s: &str) -> Result<()> {
    let mut buf = [0u8; 3];
    for unit in s.encode_utf16() {
        let n = utf::encode_unit(unit, &mut buf);
        out.write_all(&buf[..n])?;
    }
    Ok(())
}

impl DataOutput for Vec<u8> {
    #[inline]
    fn write_all(&mut self, bytes: &[u8]) -> Result<()> {
        self.extend_from_slice(bytes);
        Ok(())
    }
}

impl<W: DataOutput + ?Sized> DataOutput for &mut W {
    #[inline]
    fn write_all(&mut self, bytes: &[u8]) -> Result<()> {
        (**self).write_all(bytes)
    }
}

impl<R: DataInput + ?Sized> DataInput for &mut R {
    #[inline]
    fn read_fully(&mut self, buf: &mut [u8]) -> Result<()> {
        (**self).read_fully(buf)
    }

    #[inline]
    fn skip_bytes(&mut self, n: usize) -> Result<()> {
        (**self).skip_bytes(n)
    }

    #[inline]
    fn available(&self) -> usize {
        (**self).available()
    }

    #[inline]
    fn read_modified_utf(&mut self, chars: &mut Vec<u16>) -> Result<usize> {
        (**self).read_modified_utf(chars)
    }

    #[inline]
    fn read_long_modified_utf(&mut self, chars: &mut Vec<u16>) -> Result<usize> {
        (**self).read_long_modified_utf(chars)
    }

    #[inline]
    fn read_compressed_int(&mut self) -> Result<i32> {
        (**self).read_compressed_int()
    }

    #[inline]
    fn read_compressed_long(&mut self) -> Result<i64> {
        (**self).read_compressed_long()
    }
}
