//! Nullable SQL values
//!
//! Each value holds an `Option` of its Rust type; `None` is SQL NULL. The
//! object codec writes the null flag, so `write_external` is only reached
//! for non-null values and writing a NULL directly is an encoding error.
//!
//! | type          | bytes                                      |
//! |---------------|--------------------------------------------|
//! | `SqlBoolean`  | 1 byte, 0 or 1                             |
//! | `SqlSmallint` | 2 bytes BE                                 |
//! | `SqlInteger`  | 4 bytes BE                                 |
//! | `SqlLongint`  | 8 bytes BE                                 |
//! | `SqlDouble`   | 8 bytes BE IEEE-754                        |
//! | `SqlChar`     | character-column UTF (long form past 64K)  |
//! | `SqlVarchar`  | character-column UTF (long form past 64K)  |

use crate::formatable::{Formatable, ObjectInput, ObjectOutput, Storable};
use stratafmt_core::error::{FormatError, Result};
use stratafmt_core::format_id::{ids, FormatId};

fn null_write(type_name: &str) -> FormatError {
    FormatError::Encoding(format!("cannot externalize a NULL {}", type_name))
}

macro_rules! sql_fixed {
    ($(#[$doc:meta])* $name:ident, $ty:ty, $id:expr, $write:ident, $read:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
        pub struct $name {
            value: Option<$ty>,
        }

        impl $name {
            /// Non-null value.
            pub fn new(value: $ty) -> Self {
                Self { value: Some(value) }
            }

            /// SQL NULL.
            pub fn null() -> Self {
                Self { value: None }
            }

            /// The value, `None` if NULL.
            pub fn value(&self) -> Option<$ty> {
                self.value
            }

            /// Replace the value.
            pub fn set_value(&mut self, value: $ty) {
                self.value = Some(value);
            }

            /// True if NULL.
            pub fn is_null_value(&self) -> bool {
                self.value.is_none()
            }
        }

        impl From<$ty> for $name {
            fn from(value: $ty) -> Self {
                Self::new(value)
            }
        }

        impl Formatable for $name {
            fn format_id(&self) -> FormatId {
                $id
            }

            fn write_external(&self, out: &mut dyn ObjectOutput) -> Result<()> {
                match self.value {
                    Some(v) => out.$write(v),
                    None => Err(null_write(stringify!($name))),
                }
            }

            fn read_external(&mut self, input: &mut dyn ObjectInput) -> Result<()> {
                self.value = Some(input.$read()?);
                Ok(())
            }

            fn as_storable(&self) -> Option<&dyn Storable> {
                Some(self)
            }

            fn as_storable_mut(&mut self) -> Option<&mut dyn Storable> {
                Some(self)
            }

            fn value_eq(&self, other: &dyn Formatable) -> Option<bool> {
                Some(other.downcast_ref::<Self>() == Some(self))
            }
        }

        impl Storable for $name {
            fn is_null(&self) -> bool {
                self.value.is_none()
            }

            fn restore_to_null(&mut self) {
                self.value = None;
            }
        }
    };
}

sql_fixed!(
    /// SQL BOOLEAN
    SqlBoolean, bool, ids::SQL_BOOLEAN_ID, write_bool, read_bool
);
sql_fixed!(
    /// SQL SMALLINT
    SqlSmallint, i16, ids::SQL_SMALLINT_ID, write_i16, read_i16
);
sql_fixed!(
    /// SQL INTEGER
    SqlInteger, i32, ids::SQL_INTEGER_ID, write_i32, read_i32
);
sql_fixed!(
    /// SQL BIGINT
    SqlLongint, i64, ids::SQL_LONGINT_ID, write_i64, read_i64
);

/// SQL DOUBLE
///
/// NaN has no SQL meaning and is rejected on write.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SqlDouble {
    value: Option<f64>,
}

impl SqlDouble {
    /// Non-null value.
    pub fn new(value: f64) -> Self {
        Self { value: Some(value) }
    }

    /// SQL NULL.
    pub fn null() -> Self {
        Self { value: None }
    }

    /// The value, `None` if NULL.
    pub fn value(&self) -> Option<f64> {
        self.value
    }
}

impl Formatable for SqlDouble {
    fn format_id(&self) -> FormatId {
        ids::SQL_DOUBLE_ID
    }

    fn write_external(&self, out: &mut dyn ObjectOutput) -> Result<()> {
        match self.value {
            Some(v) if v.is_nan() => Err(FormatError::Encoding(
                "NaN is not a valid DOUBLE value".to_string(),
            )),
            Some(v) => out.write_f64(v),
            None => Err(null_write("SqlDouble")),
        }
    }

    fn read_external(&mut self, input: &mut dyn ObjectInput) -> Result<()> {
        self.value = Some(input.read_f64()?);
        Ok(())
    }

    fn as_storable(&self) -> Option<&dyn Storable> {
        Some(self)
    }

    fn as_storable_mut(&mut self) -> Option<&mut dyn Storable> {
        Some(self)
    }

    fn value_eq(&self, other: &dyn Formatable) -> Option<bool> {
        let other = other.downcast_ref::<Self>();
        Some(match (self.value, other.map(|o| o.value)) {
            (None, Some(None)) => true,
            (Some(a), Some(Some(b))) => a.to_bits() == b.to_bits(),
            _ => false,
        })
    }
}

impl Storable for SqlDouble {
    fn is_null(&self) -> bool {
        self.value.is_none()
    }

    fn restore_to_null(&mut self) {
        self.value = None;
    }
}

macro_rules! sql_string {
    ($(#[$doc:meta])* $name:ident, $id:expr) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq, Default)]
        pub struct $name {
            value: Option<String>,
        }

        impl $name {
            /// Non-null value.
            pub fn new(value: impl Into<String>) -> Self {
                Self {
                    value: Some(value.into()),
                }
            }

            /// SQL NULL.
            pub fn null() -> Self {
                Self { value: None }
            }

            /// The string, `None` if NULL.
            pub fn as_str(&self) -> Option<&str> {
                self.value.as_deref()
            }

            /// Take the string out.
            pub fn into_string(self) -> Option<String> {
                self.value
            }
        }

        impl Formatable for $name {
            fn format_id(&self) -> FormatId {
                $id
            }

            fn write_external(&self, out: &mut dyn ObjectOutput) -> Result<()> {
                match &self.value {
                    Some(s) => out.write_long_utf(s),
                    None => Err(null_write(stringify!($name))),
                }
            }

            fn read_external(&mut self, input: &mut dyn ObjectInput) -> Result<()> {
                self.value = Some(input.read_long_utf()?);
                Ok(())
            }

            fn as_storable(&self) -> Option<&dyn Storable> {
                Some(self)
            }

            fn as_storable_mut(&mut self) -> Option<&mut dyn Storable> {
                Some(self)
            }

            fn value_eq(&self, other: &dyn Formatable) -> Option<bool> {
                Some(other.downcast_ref::<Self>() == Some(self))
            }
        }

        impl Storable for $name {
            fn is_null(&self) -> bool {
                self.value.is_none()
            }

            fn restore_to_null(&mut self) {
                self.value = None;
            }
        }
    };
}

sql_string!(
    /// SQL CHAR
    SqlChar,
    ids::SQL_CHAR_ID
);
sql_string!(
    /// SQL VARCHAR
    SqlVarchar,
    ids::SQL_VARCHAR_ID
);
