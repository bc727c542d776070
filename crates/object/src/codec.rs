//! Self-describing object codec
//!
//! [`FormatIdOutput`] writes values with their format id in front;
//! [`FormatIdInput`] reads the id back and rebuilds the value through the
//! [`FormatRegistry`]. Both wrap a data stream and pass its primitives
//! through, so a formatable value sees one stream for its own fields and
//! for nested values.
//!
//! ## Payload shapes
//!
//! ```text
//! null        | 00 00 |
//! string      | 00 01 | u16 length | modified UTF-8 |
//! fallback    | 00 02 | UTF type name | compressed length | bincode bytes |
//! storable    | id    | null flag | bytes (only if the flag is 0) |
//! formatable  | id    | bytes |
//! ```
//!
//! ## Write cross-check
//!
//! When [`CodecConfig::verify_enabled`] is true, every formatable value is
//! encoded a second time into scratch memory and decoded again, and the
//! result is compared with the original by value. A mismatch or a decode
//! failure is logged at `warn` and never fails the write. Values with only
//! identity equality are skipped.

use crate::formatable::{
    Capability, Fallback, Formatable, ObjectInput, ObjectOutput, ObjectRef, StoredObject,
};
use crate::native::{default_resolver, ClassResolver, STRING_NATIVE_NAME};
use crate::registry::FormatRegistry;
use std::sync::Arc;
use stratafmt_core::config::CodecConfig;
use stratafmt_core::error::{FormatError, Result};
use stratafmt_core::format_id::{
    FormatId, NULL_FORMAT_ID, SERIALIZABLE_FORMAT_ID, STRING_FORMAT_ID,
};
use stratafmt_io::{utf, BoundedReader, DataInput, DataOutput};
use tracing::warn;

/// Writes self-describing values to a data stream.
#[derive(Debug)]
pub struct FormatIdOutput<W: DataOutput> {
    inner: W,
    verify: bool,
    config: CodecConfig,
    registry: Arc<FormatRegistry>,
    resolver: Arc<dyn ClassResolver>,
}

impl<W: DataOutput> FormatIdOutput<W> {
    /// Wrap `inner` with the default config and the global registry.
    pub fn new(inner: W) -> Self {
        let config = CodecConfig::default();
        Self {
            inner,
            verify: config.verify_enabled(),
            config,
            registry: FormatRegistry::global(),
            resolver: default_resolver(),
        }
    }

    /// Use `config`.
    pub fn with_config(mut self, config: CodecConfig) -> Self {
        self.verify = config.verify_enabled();
        self.config = config;
        self
    }

    /// Read back through `registry` during the write cross-check.
    pub fn with_registry(mut self, registry: Arc<FormatRegistry>) -> Self {
        self.registry = registry;
        self
    }

    /// Read back through `resolver` during the write cross-check.
    pub fn with_resolver(mut self, resolver: Arc<dyn ClassResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    /// Borrow the wrapped stream.
    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    /// Mutably borrow the wrapped stream.
    pub fn get_mut(&mut self) -> &mut W {
        &mut self.inner
    }

    /// Unwrap the stream.
    pub fn into_inner(self) -> W {
        self.inner
    }

    /// Write a bare format id.
    #[inline]
    pub fn write_format_id(&mut self, id: FormatId) -> Result<()> {
        self.inner.write_all(&id.to_bytes())
    }

    /// Write `value` with its format id.
    pub fn write_object<'a>(&mut self, value: impl Into<ObjectRef<'a>>) -> Result<()> {
        self.encode(value.into())
    }

    /// Write a formatable value with its format id.
    pub fn write_formatable(&mut self, value: &dyn Formatable) -> Result<()> {
        self.encode(ObjectRef::Formatable(value))
    }

    fn encode(&mut self, value: ObjectRef<'_>) -> Result<()> {
        match value.capability() {
            Capability::Null => self.write_format_id(NULL_FORMAT_ID),
            Capability::ShortString(s) => {
                self.write_format_id(STRING_FORMAT_ID)?;
                self.inner.write_utf(s)
            }
            Capability::Storable { value, is_null } => {
                self.write_format_id(value.format_id())?;
                self.inner.write_bool(is_null)?;
                if !is_null {
                    value.write_external(self)?;
                }
                if self.verify {
                    self.cross_check(value);
                }
                Ok(())
            }
            Capability::Formatable(value) => {
                self.write_format_id(value.format_id())?;
                value.write_external(self)?;
                if self.verify {
                    self.cross_check(value);
                }
                Ok(())
            }
            Capability::Fallback(fallback) => self.write_fallback(fallback),
        }
    }

    fn write_fallback(&mut self, fallback: Fallback<'_>) -> Result<()> {
        let (name, bytes) = match fallback {
            Fallback::String(s) => (STRING_NATIVE_NAME, bincode::serialize(s)?),
            Fallback::Native(n) => (n.native_name(), n.encode_native()?),
        };
        let len = i32::try_from(bytes.len()).map_err(|_| {
            FormatError::Encoding(format!(
                "native payload of {} bytes for '{}' is too large",
                bytes.len(),
                name
            ))
        })?;
        self.write_format_id(SERIALIZABLE_FORMAT_ID)?;
        self.inner.write_utf(name)?;
        self.inner.write_compressed_int(len)?;
        self.inner.write_all(&bytes)
    }

    /// Encode `value` again into scratch memory, decode it and compare.
    fn cross_check(&self, value: &dyn Formatable) {
        if value.value_eq(value).is_none() {
            return;
        }
        let id = value.format_id();
        let mut scratch = FormatIdOutput::new(Vec::new())
            .with_config(self.config.clone().with_verify_writes(false))
            .with_registry(Arc::clone(&self.registry))
            .with_resolver(Arc::clone(&self.resolver));
        if let Err(e) = scratch.write_formatable(value) {
            warn!(
                target: "stratafmt::codec",
                format_id = %id,
                type_name = value.type_name(),
                error = %e,
                "Cross-check could not re-encode value"
            );
            return;
        }
        let bytes = scratch.into_inner();
        let mut input = FormatIdInput::new(BoundedReader::new(&bytes))
            .with_registry(Arc::clone(&self.registry))
            .with_resolver(Arc::clone(&self.resolver));
        match input.read_object() {
            Ok(StoredObject::Formatable(decoded)) => {
                if value.value_eq(decoded.as_ref()) != Some(true) {
                    warn!(
                        target: "stratafmt::codec",
                        format_id = %id,
                        type_name = value.type_name(),
                        written = ?value,
                        read_back = ?decoded,
                        "Cross-check mismatch: value read back differs from value written"
                    );
                }
            }
            Ok(other) => {
                warn!(
                    target: "stratafmt::codec",
                    format_id = %id,
                    type_name = value.type_name(),
                    read_back = ?other,
                    "Cross-check mismatch: value read back is not a formatable"
                );
            }
            Err(e) => {
                warn!(
                    target: "stratafmt::codec",
                    format_id = %id,
                    type_name = value.type_name(),
                    error = %e,
                    bytes = bytes.len(),
                    "Cross-check failed to decode written value"
                );
            }
        }
    }
}

impl<W: DataOutput> DataOutput for FormatIdOutput<W> {
    #[inline]
    fn write_all(&mut self, bytes: &[u8]) -> Result<()> {
        self.inner.write_all(bytes)
    }

    #[inline]
    fn write_u8(&mut self, value: u8) -> Result<()> {
        self.inner.write_u8(value)
    }
}

impl<W: DataOutput> ObjectOutput for FormatIdOutput<W> {
    fn write_object(&mut self, value: ObjectRef<'_>) -> Result<()> {
        self.encode(value)
    }
}

/// Reads self-describing values from a data stream.
#[derive(Debug)]
pub struct FormatIdInput<R: DataInput> {
    inner: R,
    registry: Arc<FormatRegistry>,
    resolver: Arc<dyn ClassResolver>,
    chars: Vec<u16>,
}

impl<R: DataInput> FormatIdInput<R> {
    /// Wrap `inner` with the global registry and the default resolver.
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            registry: FormatRegistry::global(),
            resolver: default_resolver(),
            chars: Vec::new(),
        }
    }

    /// Size the reusable UTF buffer from `config`.
    pub fn with_config(mut self, config: &CodecConfig) -> Self {
        self.chars = Vec::with_capacity(config.utf_scratch_capacity);
        self
    }

    /// Rebuild formatable values through `registry`.
    pub fn with_registry(mut self, registry: Arc<FormatRegistry>) -> Self {
        self.registry = registry;
        self
    }

    /// Rebuild fallback values through `resolver`.
    pub fn with_resolver(mut self, resolver: Arc<dyn ClassResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    /// Borrow the wrapped stream.
    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    /// Mutably borrow the wrapped stream, e.g. to rebind a reader.
    pub fn get_mut(&mut self) -> &mut R {
        &mut self.inner
    }

    /// Unwrap the stream.
    pub fn into_inner(self) -> R {
        self.inner
    }

    /// The registry values are rebuilt through.
    pub fn registry(&self) -> &Arc<FormatRegistry> {
        &self.registry
    }

    /// Read a bare format id.
    #[inline]
    pub fn read_format_id(&mut self) -> Result<FormatId> {
        Ok(FormatId(self.inner.read_u16()?))
    }

    /// Read the next self-describing value.
    pub fn read_object(&mut self) -> Result<StoredObject> {
        let id = self.read_format_id()?;
        match id {
            NULL_FORMAT_ID => Ok(StoredObject::Null),
            STRING_FORMAT_ID => Ok(StoredObject::String(self.read_string()?)),
            SERIALIZABLE_FORMAT_ID => self.read_fallback(),
            _ => {
                let mut value = self.registry.instantiate(id)?;
                self.read_into(id, value.as_mut())?;
                Ok(StoredObject::Formatable(value))
            }
        }
    }

    /// Read the next value as a `T`.
    ///
    /// A null marker reads as `None`. Any other shape, or a formatable of
    /// another type, is a reconstruction mismatch.
    pub fn read_formatable<T: Formatable>(&mut self) -> Result<Option<T>> {
        let expected = std::any::type_name::<T>();
        let mismatch = |id: FormatId, type_name: &'static str| FormatError::ReconstructionMismatch {
            id,
            type_name,
            detail: format!("expected {}", expected),
        };
        match self.read_object()? {
            StoredObject::Null => Ok(None),
            StoredObject::Formatable(value) => {
                let id = value.format_id();
                let type_name = value.type_name();
                value
                    .downcast::<T>()
                    .map(|boxed| Some(*boxed))
                    .ok_or_else(|| mismatch(id, type_name))
            }
            StoredObject::String(_) => Err(mismatch(STRING_FORMAT_ID, STRING_NATIVE_NAME)),
            StoredObject::Native(n) => Err(mismatch(SERIALIZABLE_FORMAT_ID, n.native_name())),
        }
    }

    fn read_into(&mut self, id: FormatId, value: &mut dyn Formatable) -> Result<()> {
        if value.format_id() != id {
            return Err(FormatError::ReconstructionMismatch {
                id,
                type_name: value.type_name(),
                detail: format!("registry built a value with format id {}", value.format_id()),
            });
        }
        if let Some(storable) = value.as_storable_mut() {
            if self.inner.read_bool()? {
                storable.restore_to_null();
                return Ok(());
            }
        }
        value.read_external(self)
    }

    fn read_string(&mut self) -> Result<String> {
        self.inner.read_modified_utf(&mut self.chars)?;
        utf::units_to_string(&self.chars)
    }

    fn read_fallback(&mut self) -> Result<StoredObject> {
        let type_name = self.read_string()?;
        let decode = self.resolver.resolve(&type_name)?;
        let len = self.inner.read_compressed_int()? as usize;
        if len > self.inner.available() {
            return Err(FormatError::end_of_data(len, self.inner.available()));
        }
        let mut bytes = vec![0u8; len];
        self.inner.read_fully(&mut bytes)?;
        decode(&bytes)
    }
}

impl<R: DataInput> DataInput for FormatIdInput<R> {
    #[inline]
    fn read_fully(&mut self, buf: &mut [u8]) -> Result<()> {
        self.inner.read_fully(buf)
    }

    #[inline]
    fn skip_bytes(&mut self, n: usize) -> Result<()> {
        self.inner.skip_bytes(n)
    }

    #[inline]
    fn available(&self) -> usize {
        self.inner.available()
    }

    #[inline]
    fn read_modified_utf(&mut self, chars: &mut Vec<u16>) -> Result<usize> {
        self.inner.read_modified_utf(chars)
    }

    #[inline]
    fn read_long_modified_utf(&mut self, chars: &mut Vec<u16>) -> Result<usize> {
        self.inner.read_long_modified_utf(chars)
    }

    #[inline]
    fn read_u8(&mut self) -> Result<u8> {
        self.inner.read_u8()
    }

    #[inline]
    fn read_compressed_int(&mut self) -> Result<i32> {
        self.inner.read_compressed_int()
    }

    #[inline]
    fn read_compressed_long(&mut self) -> Result<i64> {
        self.inner.read_compressed_long()
    }

    fn read_utf(&mut self) -> Result<String> {
        self.read_string()
    }

    fn read_long_utf(&mut self) -> Result<String> {
        self.inner.read_long_modified_utf(&mut self.chars)?;
        utf::units_to_string(&self.chars)
    }
}

impl<R: DataInput> ObjectInput for FormatIdInput<R> {
    fn read_object(&mut self) -> Result<StoredObject> {
        FormatIdInput::read_object(self)
    }
}

/// Encode one value, with its format id, into a new vector.
pub fn to_bytes<'a>(value: impl Into<ObjectRef<'a>>) -> Result<Vec<u8>> {
    let mut out = FormatIdOutput::new(Vec::new());
    out.write_object(value)?;
    Ok(out.into_inner())
}

/// Decode one value from the start of `bytes` with the global registry.
pub fn from_bytes(bytes: &[u8]) -> Result<StoredObject> {
    FormatIdInput::new(BoundedReader::new(bytes)).read_object()
}
