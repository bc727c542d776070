//! Formatable holders
//!
//! Small containers that are always present (never individually null), so
//! the codec writes them without a null flag.

use crate::formatable::{Formatable, ObjectInput, ObjectOutput, StoredObject};
use stratafmt_core::error::{FormatError, Result};
use stratafmt_core::format_id::{ids, FormatId};

/// A single int.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IntHolder {
    value: i32,
}

impl IntHolder {
    /// Holder for `value`.
    pub fn new(value: i32) -> Self {
        Self { value }
    }

    /// The held int.
    pub fn value(&self) -> i32 {
        self.value
    }
}

impl Formatable for IntHolder {
    fn format_id(&self) -> FormatId {
        ids::FORMATABLE_INT_HOLDER_V01_ID
    }

    fn write_external(&self, out: &mut dyn ObjectOutput) -> Result<()> {
        out.write_i32(self.value)
    }

    fn read_external(&mut self, input: &mut dyn ObjectInput) -> Result<()> {
        self.value = input.read_i32()?;
        Ok(())
    }

    fn value_eq(&self, other: &dyn Formatable) -> Option<bool> {
        Some(other.downcast_ref::<Self>() == Some(self))
    }
}

/// A single long.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LongHolder {
    value: i64,
}

impl LongHolder {
    /// Holder for `value`.
    pub fn new(value: i64) -> Self {
        Self { value }
    }

    /// The held long.
    pub fn value(&self) -> i64 {
        self.value
    }
}

impl Formatable for LongHolder {
    fn format_id(&self) -> FormatId {
        ids::FORMATABLE_LONG_HOLDER_V01_ID
    }

    fn write_external(&self, out: &mut dyn ObjectOutput) -> Result<()> {
        out.write_i64(self.value)
    }

    fn read_external(&mut self, input: &mut dyn ObjectInput) -> Result<()> {
        self.value = input.read_i64()?;
        Ok(())
    }

    fn value_eq(&self, other: &dyn Formatable) -> Option<bool> {
        Some(other.downcast_ref::<Self>() == Some(self))
    }
}

/// Read a 4-byte element count and check it against the bytes left.
fn read_count(input: &mut dyn ObjectInput, what: &str) -> Result<usize> {
    let count = input.read_i32()?;
    if count < 0 {
        return Err(FormatError::malformed(format!(
            "negative {} count {}",
            what, count
        )));
    }
    Ok(count as usize)
}

/// A length-prefixed byte array.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ByteArray {
    bytes: Vec<u8>,
}

impl ByteArray {
    /// Holder for `bytes`.
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    /// The held bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Take the bytes out.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

impl Formatable for ByteArray {
    fn format_id(&self) -> FormatId {
        ids::FORMATABLE_BYTE_ARRAY_V01_ID
    }

    fn write_external(&self, out: &mut dyn ObjectOutput) -> Result<()> {
        let len = i32::try_from(self.bytes.len()).map_err(|_| {
            FormatError::Encoding(format!("byte array of {} bytes is too large", self.bytes.len()))
        })?;
        out.write_i32(len)?;
        out.write_all(&self.bytes)
    }

    fn read_external(&mut self, input: &mut dyn ObjectInput) -> Result<()> {
        let len = read_count(input, "byte array")?;
        if len > input.available() {
            return Err(FormatError::end_of_data(len, input.available()));
        }
        self.bytes.clear();
        self.bytes.resize(len, 0);
        input.read_fully(&mut self.bytes)
    }

    fn value_eq(&self, other: &dyn Formatable) -> Option<bool> {
        Some(other.downcast_ref::<Self>() == Some(self))
    }
}

/// An array of self-describing values.
///
/// Elements are written through the enclosing object stream, so they may be
/// of any stored shape, including nested arrays.
#[derive(Debug, Default)]
pub struct ArrayHolder {
    items: Vec<StoredObject>,
}

impl ArrayHolder {
    /// Holder for `items`.
    pub fn new(items: Vec<StoredObject>) -> Self {
        Self { items }
    }

    /// The held values.
    pub fn items(&self) -> &[StoredObject] {
        &self.items
    }

    /// Append a value.
    pub fn push(&mut self, item: impl Into<StoredObject>) {
        self.items.push(item.into());
    }

    /// Number of held values.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True if no values are held.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Take the values out.
    pub fn into_items(self) -> Vec<StoredObject> {
        self.items
    }
}

impl Formatable for ArrayHolder {
    fn format_id(&self) -> FormatId {
        ids::FORMATABLE_ARRAY_HOLDER_V01_ID
    }

    fn write_external(&self, out: &mut dyn ObjectOutput) -> Result<()> {
        let count = i32::try_from(self.items.len()).map_err(|_| {
            FormatError::Encoding(format!("array of {} values is too large", self.items.len()))
        })?;
        out.write_i32(count)?;
        for item in &self.items {
            out.write_object(item.as_object_ref())?;
        }
        Ok(())
    }

    fn read_external(&mut self, input: &mut dyn ObjectInput) -> Result<()> {
        let count = read_count(input, "array")?;
        // every element takes at least its 2-byte format id
        let mut items = Vec::with_capacity(count.min(input.available() / 2));
        for _ in 0..count {
            items.push(input.read_object()?);
        }
        self.items = items;
        Ok(())
    }

    fn value_eq(&self, other: &dyn Formatable) -> Option<bool> {
        let Some(other) = other.downcast_ref::<Self>() else {
            return Some(false);
        };
        if self.items.len() != other.items.len() {
            return Some(false);
        }
        for (a, b) in self.items.iter().zip(&other.items) {
            match (a, b) {
                (StoredObject::Formatable(x), StoredObject::Formatable(y)) => {
                    match x.value_eq(y.as_ref()) {
                        Some(true) => {}
                        other => return other,
                    }
                }
                _ => {
                    if a != b {
                        return Some(false);
                    }
                }
            }
        }
        Some(true)
    }
}
