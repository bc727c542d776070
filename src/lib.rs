//! stratafmt - self-describing binary encoding for stored rows
//!
//! Stored values carry a 16-bit format id naming their type and version, so
//! bytes written today can be reconstructed by any later release that still
//! registers the id.
//!
//! # Quick Start
//!
//! ```
//! use stratafmt::{from_bytes, to_bytes, ObjectRef};
//! use stratafmt::values::SqlInteger;
//!
//! let bytes = to_bytes(ObjectRef::Formatable(&SqlInteger::new(7))).unwrap();
//! assert_eq!(bytes, vec![0x00, 0x50, 0x00, 0x00, 0x00, 0x00, 0x07]);
//!
//! let value = from_bytes(&bytes).unwrap();
//! assert_eq!(value.downcast_ref::<SqlInteger>().unwrap().value(), Some(7));
//! ```
//!
//! # Layers
//!
//! - [`stratafmt_core`]: format ids, errors, limits and codec configuration
//! - [`stratafmt_io`]: compressed numbers, modified UTF-8 and bounded cursors
//! - [`stratafmt_object`]: the format id registry and the object stream pair

pub use stratafmt_core;
pub use stratafmt_io;
pub use stratafmt_object;

pub use stratafmt_core::{CodecConfig, FormatError, FormatId, Result};
pub use stratafmt_io::{BoundedReader, BoundedWriter, DataInput, DataOutput};
pub use stratafmt_object::{
    from_bytes, to_bytes, values, Formatable, FormatIdInput, FormatIdOutput, FormatRegistry,
    NativeType, NativeTypeTable, ObjectRef, PackedBitVector, RegistryBuilder, Storable,
    StoredObject,
};
