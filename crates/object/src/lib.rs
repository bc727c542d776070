//! Self-describing stored objects
//!
//! This crate layers format ids over the byte-level cursors:
//! - formatable: the Formatable/Storable contracts and the stored object model
//! - registry: format id to constructor table
//! - native: named fallback encoding for values without a format id
//! - codec: FormatIdOutput / FormatIdInput, the object stream pair
//! - bitset: PackedBitVector
//! - values: built-in SQL values and holders

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod bitset;
pub mod codec;
pub mod formatable;
pub mod native;
pub mod registry;
pub mod values;

pub use bitset::PackedBitVector;
pub use codec::{from_bytes, to_bytes, FormatIdInput, FormatIdOutput};
pub use formatable::{
    AsAny, Capability, Fallback, Formatable, ObjectInput, ObjectOutput, ObjectRef, Storable,
    StoredObject,
};
pub use native::{
    default_resolver, ClassResolver, NativeDecoder, NativeObject, NativeType, NativeTypeTable,
};
pub use registry::{FormatRegistry, Reconstruct, RegistryBuilder, RegistryEntry};
