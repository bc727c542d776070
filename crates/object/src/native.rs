//! Native fallback values
//!
//! Values with no format id are written behind the serializable marker as:
//!
//! ```text
//! UTF type name | compressed int length | bincode bytes
//! ```
//!
//! The reader looks the type name up through a [`ClassResolver`] supplied by
//! the host. [`NativeTypeTable`] is the default resolver; it knows `String`
//! (long strings travel this path) and any type registered with it.

use crate::formatable::{AsAny, StoredObject};
use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use stratafmt_core::error::{FormatError, Result};

/// Type name under which strings are written to the fallback.
pub const STRING_NATIVE_NAME: &str = "String";

/// A value written through the native fallback.
///
/// Implemented for every [`NativeType`]; implement [`NativeType`] rather
/// than this trait.
pub trait NativeObject: AsAny + fmt::Debug + Send {
    /// Stable type name written ahead of the bytes.
    fn native_name(&self) -> &'static str;

    /// Serialized bytes.
    fn encode_native(&self) -> Result<Vec<u8>>;

    /// Value equality with another native value.
    fn native_eq(&self, other: &dyn NativeObject) -> bool;
}

/// A serde type that may be stored through the native fallback.
pub trait NativeType: Serialize + DeserializeOwned + fmt::Debug + PartialEq + Send + 'static {
    /// Stable type name. Changing it makes stored values unreadable.
    const NATIVE_NAME: &'static str;
}

impl<T: NativeType> NativeObject for T {
    fn native_name(&self) -> &'static str {
        T::NATIVE_NAME
    }

    fn encode_native(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    fn native_eq(&self, other: &dyn NativeObject) -> bool {
        other
            .as_any()
            .downcast_ref::<T>()
            .map_or(false, |other| other == self)
    }
}

/// Decodes the bytes written for one native type.
pub type NativeDecoder = fn(&[u8]) -> Result<StoredObject>;

/// Host hook that turns a stored type name into a decoder.
pub trait ClassResolver: Send + Sync + fmt::Debug {
    /// Decoder for `type_name`, or a class-resolution error.
    fn resolve(&self, type_name: &str) -> Result<NativeDecoder>;
}

static DEFAULT_RESOLVER: Lazy<Arc<dyn ClassResolver>> =
    Lazy::new(|| NativeTypeTable::new().into_shared());

/// Shared resolver that only knows `String`.
pub fn default_resolver() -> Arc<dyn ClassResolver> {
    Arc::clone(&DEFAULT_RESOLVER)
}

fn decode_string(bytes: &[u8]) -> Result<StoredObject> {
    Ok(StoredObject::String(bincode::deserialize(bytes)?))
}

fn decode_native<T: NativeType>(bytes: &[u8]) -> Result<StoredObject> {
    let value: T = bincode::deserialize(bytes)?;
    Ok(StoredObject::Native(Box::new(value)))
}

/// Default [`ClassResolver`]: a table of registered native types.
#[derive(Clone)]
pub struct NativeTypeTable {
    decoders: FxHashMap<&'static str, NativeDecoder>,
}

impl NativeTypeTable {
    /// Table that knows `String`.
    pub fn new() -> Self {
        let mut decoders: FxHashMap<&'static str, NativeDecoder> = FxHashMap::default();
        decoders.insert(STRING_NATIVE_NAME, decode_string);
        Self { decoders }
    }

    /// Table that knows nothing, not even `String`.
    pub fn empty() -> Self {
        Self {
            decoders: FxHashMap::default(),
        }
    }

    /// Register `T` under its native name.
    ///
    /// Fails if the name is already taken.
    pub fn register<T: NativeType>(&mut self) -> Result<()> {
        if self.decoders.contains_key(T::NATIVE_NAME) {
            return Err(FormatError::InvalidRegistration(format!(
                "native type name '{}' already registered",
                T::NATIVE_NAME
            )));
        }
        self.decoders.insert(T::NATIVE_NAME, decode_native::<T>);
        Ok(())
    }

    /// Builder form of [`NativeTypeTable::register`].
    pub fn with<T: NativeType>(mut self) -> Result<Self> {
        self.register::<T>()?;
        Ok(self)
    }

    /// True if `type_name` has a decoder.
    pub fn knows(&self, type_name: &str) -> bool {
        self.decoders.contains_key(type_name)
    }

    /// Wrap for sharing between readers.
    pub fn into_shared(self) -> Arc<dyn ClassResolver> {
        Arc::new(self)
    }
}

impl Default for NativeTypeTable {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for NativeTypeTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.decoders.keys().copied().collect();
        names.sort_unstable();
        f.debug_struct("NativeTypeTable").field("types", &names).finish()
    }
}

impl ClassResolver for NativeTypeTable {
    fn resolve(&self, type_name: &str) -> Result<NativeDecoder> {
        self.decoders
            .get(type_name)
            .copied()
            .ok_or_else(|| FormatError::ClassResolution {
                type_name: type_name.to_string(),
                cause: "no decoder registered for type".into(),
            })
    }
}
