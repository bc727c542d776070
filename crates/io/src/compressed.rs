//! Compressed numbers
//!
//! Non-negative ints and longs are stored in a self-delimiting form whose
//! size tag lives in the top bits of the first byte. The format is fixed:
//! stored format ids implicitly depend on it, so a different layout needs a
//! new set of functions rather than a change here.
//!
//! ## Int layout
//!
//! ```text
//! 1 byte  00xxxxxx                              value <= 0x3F
//! 2 bytes 01xxxxxx xxxxxxxx                     value <= 0x3FFF
//! 4 bytes 1xxxxxxx xxxxxxxx xxxxxxxx xxxxxxxx   value <= i32::MAX
//! ```
//!
//! ## Long layout
//!
//! ```text
//! 2 bytes 00xxxxxx xxxxxxxx                     value <= 0x3FFF
//! 4 bytes 01xxxxxx xxxxxxxx xxxxxxxx xxxxxxxx   value <= 0x3FFFFFFF
//! 8 bytes 1xxxxxxx xxxxxxxx ... (7 more bytes)   value <= i64::MAX
//! ```
//!
//! Remaining bytes are big-endian; the decoder looks only at the first byte
//! to learn the total length.

use crate::data::{DataInput, DataOutput};
use stratafmt_core::error::{FormatError, Result};

/// Maximum number of bytes written for an int.
pub const MAX_INT_STORED_SIZE: usize = 4;

/// Maximum number of bytes written for a long.
pub const MAX_LONG_STORED_SIZE: usize = 8;

/// Largest int stored in 1 byte.
pub const MAX_COMPRESSED_INT_ONE_BYTE: i32 = 0x3F;

/// Largest int stored in 2 bytes.
pub const MAX_COMPRESSED_INT_TWO_BYTES: i32 = 0x3FFF;

/// Largest long stored in 2 bytes.
pub const MAX_COMPRESSED_LONG_TWO_BYTES: i64 = 0x3FFF;

/// Largest long stored in 4 bytes.
pub const MAX_COMPRESSED_LONG_FOUR_BYTES: i64 = 0x3FFF_FFFF;

/// Encode `value` into `buf`, returning the encoded length.
///
/// Negative values are a caller bug and fail with an encoding error.
pub fn encode_int(value: i32, buf: &mut [u8; MAX_INT_STORED_SIZE]) -> Result<usize> {
    if value < 0 {
        return Err(FormatError::Encoding(format!(
            "cannot compress negative int {}",
            value
        )));
    }
    let v = value as u32;
    if value <= MAX_COMPRESSED_INT_ONE_BYTE {
        buf[0] = v as u8;
        return Ok(1);
    }
    if value <= MAX_COMPRESSED_INT_TWO_BYTES {
        buf[0] = 0x40 | (v >> 8) as u8;
        buf[1] = v as u8;
        return Ok(2);
    }
    buf[0] = 0x80 | (v >> 24) as u8;
    buf[1] = (v >> 16) as u8;
    buf[2] = (v >> 8) as u8;
    buf[3] = v as u8;
    Ok(4)
}

/// Encode `value` into `buf`, returning the encoded length.
///
/// Negative values are a caller bug and fail with an encoding error.
pub fn encode_long(value: i64, buf: &mut [u8; MAX_LONG_STORED_SIZE]) -> Result<usize> {
    if value < 0 {
        return Err(FormatError::Encoding(format!(
            "cannot compress negative long {}",
            value
        )));
    }
    let v = value as u64;
    if value <= MAX_COMPRESSED_LONG_TWO_BYTES {
        buf[0] = (v >> 8) as u8;
        buf[1] = v as u8;
        return Ok(2);
    }
    if value <= MAX_COMPRESSED_LONG_FOUR_BYTES {
        buf[0] = 0x40 | (v >> 24) as u8;
        buf[1] = (v >> 16) as u8;
        buf[2] = (v >> 8) as u8;
        buf[3] = v as u8;
        return Ok(4);
    }
    buf[..].copy_from_slice(&v.to_be_bytes());
    buf[0] |= 0x80;
    Ok(8)
}

/// Write a compressed int; returns the number of bytes written.
pub fn write_int<W: DataOutput + ?Sized>(out: &mut W, value: i32) -> Result<usize> {
    let mut buf = [0u8; MAX_INT_STORED_SIZE];
    let len = encode_int(value, &mut buf)?;
    out.write_all(&buf[..len])?;
    Ok(len)
}

/// Write a compressed long; returns the number of bytes written.
pub fn write_long<W: DataOutput + ?Sized>(out: &mut W, value: i64) -> Result<usize> {
    let mut buf = [0u8; MAX_LONG_STORED_SIZE];
    let len = encode_long(value, &mut buf)?;
    out.write_all(&buf[..len])?;
    Ok(len)
}

/// Encoded length of an int as announced by its first byte.
#[inline]
pub const fn int_length_from_first_byte(first: u8) -> usize {
    if first & 0x80 != 0 {
        4
    } else if first & 0x40 != 0 {
        2
    } else {
        1
    }
}

/// Encoded length of a long as announced by its first byte.
#[inline]
pub const fn long_length_from_first_byte(first: u8) -> usize {
    if first & 0x80 != 0 {
        8
    } else if first & 0x40 != 0 {
        4
    } else {
        2
    }
}

/// Read an int previously written by [`write_int`].
pub fn read_int<R: DataInput + ?Sized>(input: &mut R) -> Result<i32> {
    let first = input.read_u8()?;
    match int_length_from_first_byte(first) {
        1 => Ok(first as i32),
        2 => {
            let b1 = input.read_u8()?;
            Ok((((first & 0x3F) as i32) << 8) | b1 as i32)
        }
        _ => {
            let mut rest = [0u8; 3];
            input.read_fully(&mut rest)?;
            Ok(i32::from_be_bytes([first & 0x7F, rest[0], rest[1], rest[2]]))
        }
    }
}

/// Read a long previously written by [`write_long`].
pub fn read_long<R: DataInput + ?Sized>(input: &mut R) -> Result<i64> {
    let first = input.read_u8()?;
    match long_length_from_first_byte(first) {
        2 => {
            let b1 = input.read_u8()?;
            Ok(((first as i64) << 8) | b1 as i64)
        }
        4 => {
            let mut rest = [0u8; 3];
            input.read_fully(&mut rest)?;
            Ok(i32::from_be_bytes([first & 0x3F, rest[0], rest[1], rest[2]]) as i64)
        }
        _ => {
            let mut bytes = [0u8; 8];
            bytes[0] = first & 0x7F;
            input.read_fully(&mut bytes[1..])?;
            Ok(i64::from_be_bytes(bytes))
        }
    }
}

/// Skip an int previously written by [`write_int`]; returns its length.
pub fn skip_int<R: DataInput + ?Sized>(input: &mut R) -> Result<usize> {
    let len = int_length_from_first_byte(input.read_u8()?);
    input.skip_bytes(len - 1)?;
    Ok(len)
}

/// Skip a long previously written by [`write_long`]; returns its length.
pub fn skip_long<R: DataInput + ?Sized>(input: &mut R) -> Result<usize> {
    let len = long_length_from_first_byte(input.read_u8()?);
    input.skip_bytes(len - 1)?;
    Ok(len)
}

/// Decode an int stored at `data[offset..]`.
///
/// Returns the value and its encoded length.
pub fn read_int_at(data: &[u8], offset: usize) -> Result<(i32, usize)> {
    let first = *data
        .get(offset)
        .ok_or_else(|| FormatError::end_of_data(1, 0))?;
    let len = int_length_from_first_byte(first);
    let bytes = data
        .get(offset..offset + len)
        .ok_or_else(|| FormatError::end_of_data(len, data.len() - offset))?;
    let value = match len {
        1 => first as i32,
        2 => (((first & 0x3F) as i32) << 8) | bytes[1] as i32,
        _ => i32::from_be_bytes([first & 0x7F, bytes[1], bytes[2], bytes[3]]),
    };
    Ok((value, len))
}

/// Decode a long stored at `data[offset..]`.
///
/// Returns the value and its encoded length.
pub fn read_long_at(data: &[u8], offset: usize) -> Result<(i64, usize)> {
    let first = *data
        .get(offset)
        .ok_or_else(|| FormatError::end_of_data(1, 0))?;
    let len = long_length_from_first_byte(first);
    let bytes = data
        .get(offset..offset + len)
        .ok_or_else(|| FormatError::end_of_data(len, data.len() - offset))?;
    let value = match len {
        2 => ((first as i64) << 8) | bytes[1] as i64,
        4 => i32::from_be_bytes([first & 0x3F, bytes[1], bytes[2], bytes[3]]) as i64,
        _ => {
            let mut be = [0u8; 8];
            be.copy_from_slice(bytes);
            be[0] &= 0x7F;
            i64::from_be_bytes(be)
        }
    };
    Ok((value, len))
}

/// Decode an int at `data[offset..]` and return `value + encoded_len + 1`.
///
/// Record-header walkers use this to jump over a length-prefixed field and
/// the byte that follows it in one step.
pub fn read_int_with_overhead(data: &[u8], offset: usize) -> Result<usize> {
    let (value, len) = read_int_at(data, offset)?;
    Ok(value as usize + len + 1)
}

/// Number of bytes [`write_int`] would produce for `value`.
#[inline]
pub const fn size_int(value: i32) -> usize {
    if value <= MAX_COMPRESSED_INT_ONE_BYTE {
        1
    } else if value <= MAX_COMPRESSED_INT_TWO_BYTES {
        2
    } else {
        4
    }
}

/// Number of bytes [`write_long`] would produce for `value`.
#[inline]
pub const fn size_long(value: i64) -> usize {
    if value <= MAX_COMPRESSED_LONG_TWO_BYTES {
        2
    } else if value <= MAX_COMPRESSED_LONG_FOUR_BYTES {
        4
    } else {
        8
    }
}
