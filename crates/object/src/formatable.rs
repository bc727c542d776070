//! Self-describing value traits
//!
//! A [`Formatable`] value knows its [`FormatId`] and can write and read its
//! own bytes. A [`Storable`] value is a formatable with an explicit null
//! state; the object codec writes a null flag in front of its bytes.
//!
//! Values are handed to the codec as an [`ObjectRef`] and come back as an
//! owned [`StoredObject`]. [`ObjectRef::capability`] sorts a reference into
//! the payload shape the writer uses for it.

use crate::native::NativeObject;
use std::any::Any;
use std::fmt;
use stratafmt_core::error::Result;
use stratafmt_core::format_id::FormatId;
use stratafmt_core::limits::MAX_INLINE_STRING_CHARS;
use stratafmt_io::{DataInput, DataOutput};

/// Dynamic downcasting support for value trait objects.
pub trait AsAny: Any {
    /// Borrow as `Any`.
    fn as_any(&self) -> &dyn Any;
    /// Mutably borrow as `Any`.
    fn as_any_mut(&mut self) -> &mut dyn Any;
    /// Convert a box into `Box<dyn Any>`.
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

/// A value that writes and reads its own stored bytes.
pub trait Formatable: AsAny + fmt::Debug + Send {
    /// Stored format id of this value.
    fn format_id(&self) -> FormatId;

    /// Write the value's bytes (without the format id).
    fn write_external(&self, out: &mut dyn ObjectOutput) -> Result<()>;

    /// Replace this value's state with bytes read from `input`.
    fn read_external(&mut self, input: &mut dyn ObjectInput) -> Result<()>;

    /// This value as a [`Storable`], if it has a null state.
    fn as_storable(&self) -> Option<&dyn Storable> {
        None
    }

    /// Mutable counterpart of [`Formatable::as_storable`].
    fn as_storable_mut(&mut self) -> Option<&mut dyn Storable> {
        None
    }

    /// Value equality against another formatable.
    ///
    /// `None` means the type only has identity equality; the write
    /// cross-check skips such values.
    fn value_eq(&self, _other: &dyn Formatable) -> Option<bool> {
        None
    }

    /// Concrete type name, for diagnostics.
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// A formatable value with an explicit null state.
pub trait Storable: Formatable {
    /// True if this value is SQL NULL.
    fn is_null(&self) -> bool;

    /// Turn this value into NULL.
    fn restore_to_null(&mut self);
}

impl dyn Formatable {
    /// True if the concrete type is `T`.
    pub fn is<T: Formatable>(&self) -> bool {
        self.as_any().is::<T>()
    }

    /// Borrow as the concrete type `T`.
    pub fn downcast_ref<T: Formatable>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    /// Mutably borrow as the concrete type `T`.
    pub fn downcast_mut<T: Formatable>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }

    /// Unbox as the concrete type `T`.
    pub fn downcast<T: Formatable>(self: Box<Self>) -> Option<Box<T>> {
        self.into_any().downcast::<T>().ok()
    }
}

/// A stream a formatable value writes itself to.
///
/// Besides the data primitives it can write nested self-describing values,
/// which is how container values store their elements.
pub trait ObjectOutput: DataOutput {
    /// Write `value` with its format id.
    fn write_object(&mut self, value: ObjectRef<'_>) -> Result<()>;
}

/// A stream a formatable value reads itself from.
pub trait ObjectInput: DataInput {
    /// Read the next self-describing value.
    fn read_object(&mut self) -> Result<StoredObject>;
}

/// Borrowed value handed to the object writer.
#[derive(Debug, Clone, Copy)]
pub enum ObjectRef<'a> {
    /// No value
    Null,
    /// A string
    Str(&'a str),
    /// A self-describing value
    Formatable(&'a dyn Formatable),
    /// A value with no format id, written through the native fallback
    Native(&'a dyn NativeObject),
}

/// Native-fallback payloads.
#[derive(Debug, Clone, Copy)]
pub enum Fallback<'a> {
    /// A string too long for the inline form
    String(&'a str),
    /// A serde value
    Native(&'a dyn NativeObject),
}

/// Payload shape chosen for a value on write.
#[derive(Debug, Clone, Copy)]
pub enum Capability<'a> {
    /// Null marker, no payload
    Null,
    /// String marker, 2-byte length and modified UTF-8
    ShortString(&'a str),
    /// Format id, null flag, then bytes unless null
    Storable {
        /// The value
        value: &'a dyn Formatable,
        /// Its null state
        is_null: bool,
    },
    /// Format id, then bytes
    Formatable(&'a dyn Formatable),
    /// Native-fallback marker, then serialized bytes
    Fallback(Fallback<'a>),
}

impl<'a> ObjectRef<'a> {
    /// Sort this reference into the payload shape used to write it.
    pub fn capability(self) -> Capability<'a> {
        match self {
            ObjectRef::Null => Capability::Null,
            ObjectRef::Str(s) => {
                if is_inline_string(s) {
                    Capability::ShortString(s)
                } else {
                    Capability::Fallback(Fallback::String(s))
                }
            }
            ObjectRef::Formatable(f) => match f.as_storable() {
                Some(s) => Capability::Storable {
                    value: f,
                    is_null: s.is_null(),
                },
                None => Capability::Formatable(f),
            },
            ObjectRef::Native(n) => Capability::Fallback(Fallback::Native(n)),
        }
    }
}

impl<'a> From<&'a str> for ObjectRef<'a> {
    fn from(s: &'a str) -> Self {
        ObjectRef::Str(s)
    }
}

impl<'a> From<&'a String> for ObjectRef<'a> {
    fn from(s: &'a String) -> Self {
        ObjectRef::Str(s.as_str())
    }
}

impl<'a> From<&'a dyn Formatable> for ObjectRef<'a> {
    fn from(f: &'a dyn Formatable) -> Self {
        ObjectRef::Formatable(f)
    }
}

impl<'a, T: Into<ObjectRef<'a>>> From<Option<T>> for ObjectRef<'a> {
    fn from(value: Option<T>) -> Self {
        value.map_or(ObjectRef::Null, Into::into)
    }
}

/// True if `s` fits the inline string form.
///
/// The threshold is in UTF-16 units, so even three bytes per unit stays
/// within a 2-byte length.
pub fn is_inline_string(s: &str) -> bool {
    // UTF-8 byte length bounds the UTF-16 unit count
    if s.len() <= MAX_INLINE_STRING_CHARS {
        return true;
    }
    s.encode_utf16().count() <= MAX_INLINE_STRING_CHARS
}

/// Owned value produced by the object reader.
#[derive(Debug)]
pub enum StoredObject {
    /// Null marker
    Null,
    /// String, inline or from the native fallback
    String(String),
    /// Value rebuilt through the format registry
    Formatable(Box<dyn Formatable>),
    /// Value rebuilt through the class resolver
    Native(Box<dyn NativeObject>),
}

impl StoredObject {
    /// True for the null marker.
    pub fn is_null(&self) -> bool {
        matches!(self, StoredObject::Null)
    }

    /// The string, if this is one.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            StoredObject::String(s) => Some(s),
            _ => None,
        }
    }

    /// The formatable value, if this is one.
    pub fn as_formatable(&self) -> Option<&dyn Formatable> {
        match self {
            StoredObject::Formatable(f) => Some(f.as_ref()),
            _ => None,
        }
    }

    /// Borrow a formatable value as its concrete type.
    pub fn downcast_ref<T: Formatable>(&self) -> Option<&T> {
        self.as_formatable().and_then(|f| f.downcast_ref::<T>())
    }

    /// Borrow a native value as its concrete type.
    pub fn native_ref<T: Any>(&self) -> Option<&T> {
        match self {
            StoredObject::Native(n) => (**n).as_any().downcast_ref::<T>(),
            _ => None,
        }
    }

    /// Take the formatable value as its concrete type.
    pub fn into_formatable<T: Formatable>(self) -> Option<Box<T>> {
        match self {
            StoredObject::Formatable(f) => f.downcast::<T>(),
            _ => None,
        }
    }

    /// Borrow this value for writing.
    pub fn as_object_ref(&self) -> ObjectRef<'_> {
        match self {
            StoredObject::Null => ObjectRef::Null,
            StoredObject::String(s) => ObjectRef::Str(s),
            StoredObject::Formatable(f) => ObjectRef::Formatable(f.as_ref()),
            StoredObject::Native(n) => ObjectRef::Native(n.as_ref()),
        }
    }
}

impl PartialEq for StoredObject {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (StoredObject::Null, StoredObject::Null) => true,
            (StoredObject::String(a), StoredObject::String(b)) => a == b,
            (StoredObject::Formatable(a), StoredObject::Formatable(b)) => {
                a.value_eq(b.as_ref()) == Some(true)
            }
            (StoredObject::Native(a), StoredObject::Native(b)) => a.native_eq(b.as_ref()),
            _ => false,
        }
    }
}

impl From<String> for StoredObject {
    fn from(s: String) -> Self {
        StoredObject::String(s)
    }
}

impl From<Box<dyn Formatable>> for StoredObject {
    fn from(f: Box<dyn Formatable>) -> Self {
        StoredObject::Formatable(f)
    }
}
