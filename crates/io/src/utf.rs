//! Modified UTF-8
//!
//! Strings are stored as UTF-16 units, each written as 1, 2 or 3 bytes:
//!
//! ```text
//! 0x0001..=0x007F          0xxxxxxx
//! 0x0000, 0x0080..=0x07FF  110xxxxx 10xxxxxx
//! 0x0800..=0xFFFF          1110xxxx 10xxxxxx 10xxxxxx
//! ```
//!
//! NUL never appears as a single zero byte and surrogate halves are encoded
//! one unit at a time, which is what separates this from standard UTF-8.
//!
//! The payload is preceded by a 2-byte unsigned length. [`decode`] reads
//! exactly that many bytes, so a zero length is the empty string.
//!
//! Character columns use the long form read by [`decode_long`], where a
//! declared length of zero has three readings:
//! - zero length, then `E0 00 00`: an explicitly empty string;
//! - zero length, payload, then `E0 00 00`: a long string whose length did
//!   not fit the prefix;
//! - zero length with no terminator: the string runs to the end of the
//!   readable window.
//!
//! `E0 00 00` can never occur inside valid data, since `0x00` is not a
//! continuation byte.

use stratafmt_core::error::{FormatError, Result};
use stratafmt_core::limits::{LONG_UTF_TERMINATOR, UTF_GROWTH_QUANTUM};

/// Encoded byte length of one UTF-16 unit.
#[inline]
pub const fn unit_length(unit: u16) -> usize {
    if unit >= 0x0001 && unit <= 0x007F {
        1
    } else if unit <= 0x07FF {
        2
    } else {
        3
    }
}

/// Encoded byte length of `s`, not counting the length prefix.
pub fn utf_length(s: &str) -> usize {
    s.encode_utf16().map(unit_length).sum()
}

/// Encode one UTF-16 unit into `buf`; returns the number of bytes used.
#[inline]
pub fn encode_unit(unit: u16, buf: &mut [u8; 3]) -> usize {
    match unit_length(unit) {
        1 => {
            buf[0] = unit as u8;
            1
        }
        2 => {
            buf[0] = 0xC0 | ((unit >> 6) & 0x1F) as u8;
            buf[1] = 0x80 | (unit & 0x3F) as u8;
            2
        }
        _ => {
            buf[0] = 0xE0 | ((unit >> 12) & 0x0F) as u8;
            buf[1] = 0x80 | ((unit >> 6) & 0x3F) as u8;
            buf[2] = 0x80 | (unit & 0x3F) as u8;
            3
        }
    }
}

/// Sequence length announced by a lead byte, or `None` if the byte cannot
/// start a sequence.
#[inline]
const fn sequence_length(lead: u8) -> Option<usize> {
    if lead & 0x80 == 0 {
        Some(1)
    } else if lead & 0xE0 == 0xC0 {
        Some(2)
    } else if lead & 0xF0 == 0xE0 {
        Some(3)
    } else {
        None
    }
}

#[inline]
fn continuation(byte: u8, at: usize) -> Result<u16> {
    if byte & 0xC0 != 0x80 {
        return Err(FormatError::malformed(format!(
            "bad continuation byte {:#04x} at offset {}",
            byte, at
        )));
    }
    Ok((byte & 0x3F) as u16)
}

/// Decode one sequence starting at `src[pos]`.
///
/// Returns `Ok(None)` when the sequence is cut off by the end of `src`; the
/// caller decides whether that is a malformed string or short data.
fn decode_sequence(src: &[u8], pos: usize) -> Result<Option<(u16, usize)>> {
    let lead = src[pos];
    let n = sequence_length(lead).ok_or_else(|| {
        FormatError::malformed(format!("invalid lead byte {:#04x} at offset {}", lead, pos))
    })?;
    if pos + n > src.len() {
        return Ok(None);
    }
    let unit = match n {
        1 => lead as u16,
        2 => (((lead & 0x1F) as u16) << 6) | continuation(src[pos + 1], pos + 1)?,
        _ => {
            (((lead & 0x0F) as u16) << 12)
                | (continuation(src[pos + 1], pos + 1)? << 6)
                | continuation(src[pos + 2], pos + 2)?
        }
    };
    Ok(Some((unit, n)))
}

/// Make sure `chars` can hold `needed` units without reallocating per push.
#[inline]
fn ensure_capacity(chars: &mut Vec<u16>, needed: usize) {
    if chars.capacity() < needed {
        let target = needed.max(UTF_GROWTH_QUANTUM);
        chars.reserve(target - chars.len());
    }
}

/// Decode a modified UTF-8 payload whose length prefix has already been read.
///
/// `src` is the readable window starting right after the prefix and
/// `declared` is the prefix value; zero decodes the empty string. Units are
/// decoded into `chars`, which is cleared first and grown only when
/// undersized. Returns the number of bytes consumed from `src`.
pub fn decode(src: &[u8], declared: usize, chars: &mut Vec<u16>) -> Result<usize> {
    chars.clear();
    decode_declared(src, declared, chars)
}

/// Decode a long-form payload whose length prefix has already been read.
///
/// Same as [`decode`] for a non-zero `declared`. A zero length runs to the
/// end of `src` or stops at `E0 00 00`. Returns the number of bytes consumed,
/// including the terminator if one ended the string.
pub fn decode_long(src: &[u8], declared: usize, chars: &mut Vec<u16>) -> Result<usize> {
    chars.clear();
    if declared > 0 {
        return decode_declared(src, declared, chars);
    }

    ensure_capacity(chars, UTF_GROWTH_QUANTUM);
    let mut pos = 0;
    while pos < src.len() {
        if src[pos..].starts_with(&LONG_UTF_TERMINATOR) {
            return Ok(pos + LONG_UTF_TERMINATOR.len());
        }
        let (unit, n) = decode_sequence(src, pos)?.ok_or_else(|| {
            let needed = sequence_length(src[pos]).unwrap_or(1);
            FormatError::end_of_data(needed, src.len() - pos)
        })?;
        if chars.len() == chars.capacity() {
            chars.reserve(UTF_GROWTH_QUANTUM);
        }
        chars.push(unit);
        pos += n;
    }
    Ok(pos)
}

fn decode_declared(src: &[u8], declared: usize, chars: &mut Vec<u16>) -> Result<usize> {
    if src.len() < declared {
        return Err(FormatError::end_of_data(declared, src.len()));
    }
    let payload = &src[..declared];
    ensure_capacity(chars, declared);
    let mut pos = 0;
    while pos < declared {
        let (unit, n) = decode_sequence(payload, pos)?.ok_or_else(|| {
            FormatError::malformed(format!(
                "partial character at end of declared length {}",
                declared
            ))
        })?;
        chars.push(unit);
        pos += n;
    }
    Ok(pos)
}

/// Turn decoded UTF-16 units into a `String`.
///
/// Unpaired surrogates cannot be represented and are reported as malformed.
pub fn units_to_string(units: &[u16]) -> Result<String> {
    String::from_utf16(units)
        .map_err(|_| FormatError::malformed("unpaired surrogate in UTF-16 data"))
}
