//! Packed bit vector
//!
//! A length-tracked array of bits, stored most significant bit first in each
//! byte: bit 0 is `0x80` of byte 0, bit 8 is `0x80` of byte 1.
//!
//! Two invariants hold after every mutation:
//! - the byte array is exactly `ceil(len / 8)` bytes long;
//! - every bit at an index `>= len` is zero.
//!
//! Because unused bits are always zero, byte-wise operations never need to
//! mask the other operand, and equality and hashing can use the bytes
//! directly.
//!
//! Stored form: 4-byte big-endian bit count, then the bytes.

use crate::formatable::{Formatable, ObjectInput, ObjectOutput};
use std::cmp::Ordering;
use std::fmt;
use stratafmt_core::error::{FormatError, Result};
use stratafmt_core::format_id::{ids, FormatId};

/// Position of the first set bit (MSB first) for every byte value; 8 for 0.
const FIRST_SET: [u8; 256] = build_first_set();

const fn build_first_set() -> [u8; 256] {
    let mut table = [8u8; 256];
    let mut b = 1;
    while b < 256 {
        let mut pos = 0;
        while (b << pos) & 0x80 == 0 {
            pos += 1;
        }
        table[b] = pos as u8;
        b += 1;
    }
    table
}

/// Set bits per nibble.
const BITS_IN_NIBBLE: [u8; 16] = [0, 1, 1, 2, 1, 2, 2, 3, 1, 2, 2, 3, 2, 3, 3, 4];

/// A growable, length-tracked bit array.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct PackedBitVector {
    value: Vec<u8>,
    len: usize,
}

impl PackedBitVector {
    /// Empty vector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Vector of `len` zero bits.
    pub fn with_len(len: usize) -> Self {
        Self {
            value: vec![0; Self::num_bytes_from_bits(len)],
            len,
        }
    }

    /// Vector over a copy of `bytes`; every bit counts.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            value: bytes.to_vec(),
            len: bytes.len() * 8,
        }
    }

    /// Bytes needed to hold `bits` bits.
    #[inline]
    pub const fn num_bytes_from_bits(bits: usize) -> usize {
        (bits + 7) / 8
    }

    /// Largest bit count whose stored form fits in `bytes` bytes,
    /// including the 4-byte length.
    #[inline]
    pub const fn max_bits_for_space(bytes: usize) -> usize {
        bytes.saturating_sub(4) * 8
    }

    /// Length in bits.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// True if the length is zero.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Length of the backing bytes.
    #[inline]
    pub fn len_in_bytes(&self) -> usize {
        self.value.len()
    }

    /// The backing bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.value
    }

    /// True when both invariants hold.
    pub fn invariants_hold(&self) -> bool {
        if self.value.len() != Self::num_bytes_from_bits(self.len) {
            return false;
        }
        match self.value.last() {
            Some(&last) => last & !Self::last_byte_mask(self.len) == 0,
            None => true,
        }
    }

    /// Mask of the used bits in the last byte of a `len`-bit vector.
    #[inline]
    fn last_byte_mask(len: usize) -> u8 {
        match len % 8 {
            0 => 0xFF,
            used => !(0xFFu8 >> used),
        }
    }

    #[inline]
    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.len {
            return Err(FormatError::BitIndexOutOfRange {
                index,
                len: self.len,
            });
        }
        Ok(())
    }

    /// True if bit `index` is set.
    pub fn is_set(&self, index: usize) -> Result<bool> {
        self.check_index(index)?;
        Ok(self.value[index / 8] & (0x80 >> (index % 8)) != 0)
    }

    /// Set bit `index`.
    pub fn set(&mut self, index: usize) -> Result<()> {
        self.check_index(index)?;
        self.value[index / 8] |= 0x80 >> (index % 8);
        Ok(())
    }

    /// Clear bit `index`.
    pub fn clear(&mut self, index: usize) -> Result<()> {
        self.check_index(index)?;
        self.value[index / 8] &= !(0x80 >> (index % 8));
        Ok(())
    }

    /// Set every bit.
    pub fn set_all(&mut self) {
        self.value.fill(0xFF);
        self.mask_tail();
    }

    /// Clear every bit.
    pub fn clear_all(&mut self) {
        self.value.fill(0);
    }

    /// Zero the bits past `len` in the last byte.
    fn mask_tail(&mut self) {
        let mask = Self::last_byte_mask(self.len);
        if let Some(last) = self.value.last_mut() {
            *last &= mask;
        }
        debug_assert!(self.invariants_hold());
    }

    /// Extend to `n` bits with zeros. No-op if `n <= len`.
    pub fn grow(&mut self, n: usize) {
        if n <= self.len {
            return;
        }
        self.value.resize(Self::num_bytes_from_bits(n), 0);
        self.len = n;
        debug_assert!(self.invariants_hold());
    }

    /// Truncate to `n` bits. No-op if `n >= len`.
    pub fn shrink(&mut self, n: usize) {
        if n >= self.len {
            return;
        }
        self.value.truncate(Self::num_bytes_from_bits(n));
        self.len = n;
        self.mask_tail();
    }

    /// Bitwise AND with `other`, which is treated as zero past its length.
    /// The length of `self` is unchanged.
    pub fn and(&mut self, other: &PackedBitVector) {
        let common = self.value.len().min(other.value.len());
        for (a, b) in self.value[..common].iter_mut().zip(&other.value) {
            *a &= b;
        }
        for a in &mut self.value[common..] {
            *a = 0;
        }
        debug_assert!(self.invariants_hold());
    }

    /// Bitwise OR with `other`; grows `self` to `other.len()` if shorter.
    pub fn or(&mut self, other: &PackedBitVector) {
        self.grow(other.len);
        for (a, b) in self.value.iter_mut().zip(&other.value) {
            *a |= b;
        }
        debug_assert!(self.invariants_hold());
    }

    /// Bitwise XOR with `other`; grows `self` to `other.len()` if shorter.
    pub fn xor(&mut self, other: &PackedBitVector) {
        self.grow(other.len);
        for (a, b) in self.value.iter_mut().zip(&other.value) {
            *a ^= b;
        }
        debug_assert!(self.invariants_hold());
    }

    /// First set bit, if any.
    pub fn any_set_bit(&self) -> Option<usize> {
        self.first_set_from(0)
    }

    /// First set bit after `beyond`.
    pub fn any_set_bit_beyond(&self, beyond: usize) -> Option<usize> {
        self.first_set_from(beyond.checked_add(1)?)
    }

    fn first_set_from(&self, start: usize) -> Option<usize> {
        if start >= self.len {
            return None;
        }
        let first_byte = start / 8;
        let head = self.value[first_byte] & (0xFF >> (start % 8));
        if head != 0 {
            return Some(first_byte * 8 + FIRST_SET[head as usize] as usize);
        }
        self.value[first_byte + 1..]
            .iter()
            .position(|&b| b != 0)
            .map(|i| {
                let byte = first_byte + 1 + i;
                byte * 8 + FIRST_SET[self.value[byte] as usize] as usize
            })
    }

    /// Iterator over the indices of set bits, ascending.
    pub fn set_bits(&self) -> SetBits<'_> {
        SetBits {
            bits: self,
            next: self.any_set_bit(),
        }
    }

    /// Number of set bits.
    pub fn num_bits_set(&self) -> usize {
        self.value
            .iter()
            .map(|&b| (BITS_IN_NIBBLE[(b & 0x0F) as usize] + BITS_IN_NIBBLE[(b >> 4) as usize]) as usize)
            .sum()
    }

    /// Byte-wise comparison.
    ///
    /// The first differing byte decides, compared unsigned. If one vector's
    /// bytes are a prefix of the other's, the longer vector is greater.
    pub fn compare(&self, other: &PackedBitVector) -> Ordering {
        for (a, b) in self.value.iter().zip(&other.value) {
            if a != b {
                return a.cmp(b);
            }
        }
        self.len.cmp(&other.len)
    }
}

impl PartialOrd for PackedBitVector {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PackedBitVector {
    fn cmp(&self, other: &Self) -> Ordering {
        self.compare(other)
    }
}

/// Iterator returned by [`PackedBitVector::set_bits`].
#[derive(Debug)]
pub struct SetBits<'a> {
    bits: &'a PackedBitVector,
    next: Option<usize>,
}

impl Iterator for SetBits<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let current = self.next?;
        self.next = self.bits.any_set_bit_beyond(current);
        Some(current)
    }
}

impl fmt::Display for PackedBitVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, bit) in self.set_bits().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", bit)?;
        }
        f.write_str("}")
    }
}

impl fmt::Debug for PackedBitVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PackedBitVector(len={}, {})", self.len, self)
    }
}

impl Formatable for PackedBitVector {
    fn format_id(&self) -> FormatId {
        ids::BITIMPL_V01_ID
    }

    fn write_external(&self, out: &mut dyn ObjectOutput) -> Result<()> {
        let len = i32::try_from(self.len).map_err(|_| {
            FormatError::Encoding(format!("bit vector of {} bits is too large", self.len))
        })?;
        out.write_i32(len)?;
        out.write_all(&self.value)
    }

    fn read_external(&mut self, input: &mut dyn ObjectInput) -> Result<()> {
        let len = input.read_i32()?;
        if len < 0 {
            return Err(FormatError::malformed(format!("negative bit count {}", len)));
        }
        let len = len as usize;
        let num_bytes = Self::num_bytes_from_bits(len);
        if num_bytes > input.available() {
            return Err(FormatError::end_of_data(num_bytes, input.available()));
        }
        let mut value = vec![0u8; num_bytes];
        input.read_fully(&mut value)?;
        let read = Self { value, len };
        if !read.invariants_hold() {
            return Err(FormatError::malformed(format!(
                "bit vector has set bits past its length {}",
                len
            )));
        }
        *self = read;
        Ok(())
    }

    fn value_eq(&self, other: &dyn Formatable) -> Option<bool> {
        Some(other.downcast_ref::<Self>() == Some(self))
    }
}
