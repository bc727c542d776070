//! Stored format identifiers
//!
//! A [`FormatId`] is the 16-bit big-endian tag written in front of every
//! self-describing value. Ids are append-only: once a number has been handed
//! out it is never removed, reused or repurposed, because data written with
//! it may still be on disk.
//!
//! Three marker ids sit below the registry range and are handled by the
//! object codec directly:
//!
//! | id | marker           | payload                                   |
//! |----|------------------|-------------------------------------------|
//! | 0  | [`NULL_FORMAT_ID`]         | none                            |
//! | 1  | [`STRING_FORMAT_ID`]       | 2-byte length + modified UTF-8  |
//! | 2  | [`SERIALIZABLE_FORMAT_ID`] | native-fallback bytes           |
//!
//! To add a new stored type: take the next unused number after
//! [`MAX_ID_2`], add a constant to [`ids`], bump [`MAX_ID_2`], and register
//! the type in the object crate's built-in table.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Byte length of a stored format id.
pub const TWO_BYTE_FORMAT_ID_BYTE_LENGTH: usize = 2;

/// Minimum value for a two byte format id.
pub const MIN_TWO_BYTE_FORMAT_ID: u16 = 0;

/// Maximum value for a two byte format id.
pub const MAX_TWO_BYTE_FORMAT_ID: u16 = 0x7FFF;

/// Special format id for any null reference.
pub const NULL_FORMAT_ID: FormatId = FormatId(MIN_TWO_BYTE_FORMAT_ID);

/// Special format id for inline UTF strings.
pub const STRING_FORMAT_ID: FormatId = FormatId(MIN_TWO_BYTE_FORMAT_ID + 1);

/// Special format id for values written through the native fallback.
pub const SERIALIZABLE_FORMAT_ID: FormatId = FormatId(MIN_TWO_BYTE_FORMAT_ID + 2);

/// First id handled by the registry table.
pub const FIRST_REGISTERED_ID: u16 = MIN_TWO_BYTE_FORMAT_ID + 3;

/// Largest id currently assigned. Update when a new stored type is added.
pub const MAX_ID_2: u16 = MIN_TWO_BYTE_FORMAT_ID + 452;

/// A 16-bit stored format tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FormatId(pub u16);

impl FormatId {
    /// Raw tag value.
    #[inline]
    pub const fn value(self) -> u16 {
        self.0
    }

    /// True for the three reserved marker ids.
    #[inline]
    pub const fn is_marker(self) -> bool {
        self.0 < FIRST_REGISTERED_ID
    }

    /// Big-endian wire form.
    #[inline]
    pub const fn to_bytes(self) -> [u8; TWO_BYTE_FORMAT_ID_BYTE_LENGTH] {
        self.0.to_be_bytes()
    }

    /// Parse the big-endian wire form.
    #[inline]
    pub const fn from_bytes(bytes: [u8; TWO_BYTE_FORMAT_ID_BYTE_LENGTH]) -> Self {
        FormatId(u16::from_be_bytes(bytes))
    }
}

impl fmt::Display for FormatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u16> for FormatId {
    fn from(value: u16) -> Self {
        FormatId(value)
    }
}

/// Assigned format ids. Never remove or renumber an entry.
pub mod ids {
    use super::{FormatId, MIN_TWO_BYTE_FORMAT_ID as MIN_ID_2};

    // SQL type descriptors (factory-built, told their id on creation)

    /// BOOLEAN type descriptor
    pub const BOOLEAN_TYPE_ID: FormatId = FormatId(MIN_ID_2 + 4);
    /// CHAR type descriptor
    pub const CHAR_TYPE_ID: FormatId = FormatId(MIN_ID_2 + 5);
    /// DOUBLE type descriptor
    pub const DOUBLE_TYPE_ID: FormatId = FormatId(MIN_ID_2 + 6);
    /// INTEGER type descriptor
    pub const INT_TYPE_ID: FormatId = FormatId(MIN_ID_2 + 7);
    /// REAL type descriptor
    pub const REAL_TYPE_ID: FormatId = FormatId(MIN_ID_2 + 8);
    /// SMALLINT type descriptor
    pub const SMALLINT_TYPE_ID: FormatId = FormatId(MIN_ID_2 + 10);
    /// BIGINT type descriptor
    pub const LONGINT_TYPE_ID: FormatId = FormatId(MIN_ID_2 + 11);
    /// VARCHAR type descriptor
    pub const VARCHAR_TYPE_ID: FormatId = FormatId(MIN_ID_2 + 13);

    // SQL values (nullable)

    /// BOOLEAN value
    pub const SQL_BOOLEAN_ID: FormatId = FormatId(MIN_ID_2 + 77);
    /// CHAR value
    pub const SQL_CHAR_ID: FormatId = FormatId(MIN_ID_2 + 78);
    /// DOUBLE value
    pub const SQL_DOUBLE_ID: FormatId = FormatId(MIN_ID_2 + 79);
    /// INTEGER value
    pub const SQL_INTEGER_ID: FormatId = FormatId(MIN_ID_2 + 80);
    /// SMALLINT value
    pub const SQL_SMALLINT_ID: FormatId = FormatId(MIN_ID_2 + 83);
    /// BIGINT value
    pub const SQL_LONGINT_ID: FormatId = FormatId(MIN_ID_2 + 84);
    /// VARCHAR value
    pub const SQL_VARCHAR_ID: FormatId = FormatId(MIN_ID_2 + 85);

    // Formatable holders and utilities

    /// Length-prefixed byte array
    pub const FORMATABLE_BYTE_ARRAY_V01_ID: FormatId = FormatId(MIN_ID_2 + 219);
    /// Packed bit vector
    pub const BITIMPL_V01_ID: FormatId = FormatId(MIN_ID_2 + 269);
    /// Array of self-describing values
    pub const FORMATABLE_ARRAY_HOLDER_V01_ID: FormatId = FormatId(MIN_ID_2 + 270);
    /// Single int
    pub const FORMATABLE_INT_HOLDER_V01_ID: FormatId = FormatId(MIN_ID_2 + 303);
    /// Single long
    pub const FORMATABLE_LONG_HOLDER_V01_ID: FormatId = FormatId(MIN_ID_2 + 329);
}
