//! Built-in stored value types
//!
//! - sql: nullable SQL values (boolean, smallint, integer, bigint, double,
//!   char, varchar)
//! - holders: int, long, byte array and array holders
//! - type_id: factory-built SQL type descriptors
//!
//! [`BUILTINS`] is the registry table for all of them plus the packed bit
//! vector. Entries are only ever appended.

mod holders;
mod sql;
mod type_id;

pub use holders::{ArrayHolder, ByteArray, IntHolder, LongHolder};
pub use sql::{SqlBoolean, SqlChar, SqlDouble, SqlInteger, SqlLongint, SqlSmallint, SqlVarchar};
pub use type_id::TypeIdDescriptor;

use crate::bitset::PackedBitVector;
use crate::formatable::Formatable;
use crate::registry::Reconstruct;
use stratafmt_core::format_id::{ids, FormatId};

fn blank<T: Formatable + Default>() -> Box<dyn Formatable> {
    Box::new(T::default())
}

/// Built-in registry entries: id, type name, constructor.
pub const BUILTINS: &[(FormatId, &str, Reconstruct)] = &[
    (ids::BOOLEAN_TYPE_ID, "BooleanTypeId", Reconstruct::Factory(TypeIdDescriptor::build)),
    (ids::CHAR_TYPE_ID, "CharTypeId", Reconstruct::Factory(TypeIdDescriptor::build)),
    (ids::DOUBLE_TYPE_ID, "DoubleTypeId", Reconstruct::Factory(TypeIdDescriptor::build)),
    (ids::INT_TYPE_ID, "IntTypeId", Reconstruct::Factory(TypeIdDescriptor::build)),
    (ids::REAL_TYPE_ID, "RealTypeId", Reconstruct::Factory(TypeIdDescriptor::build)),
    (ids::SMALLINT_TYPE_ID, "SmallintTypeId", Reconstruct::Factory(TypeIdDescriptor::build)),
    (ids::LONGINT_TYPE_ID, "LongintTypeId", Reconstruct::Factory(TypeIdDescriptor::build)),
    (ids::VARCHAR_TYPE_ID, "VarcharTypeId", Reconstruct::Factory(TypeIdDescriptor::build)),
    (ids::SQL_BOOLEAN_ID, "SqlBoolean", Reconstruct::Instance(blank::<SqlBoolean>)),
    (ids::SQL_CHAR_ID, "SqlChar", Reconstruct::Instance(blank::<SqlChar>)),
    (ids::SQL_DOUBLE_ID, "SqlDouble", Reconstruct::Instance(blank::<SqlDouble>)),
    (ids::SQL_INTEGER_ID, "SqlInteger", Reconstruct::Instance(blank::<SqlInteger>)),
    (ids::SQL_SMALLINT_ID, "SqlSmallint", Reconstruct::Instance(blank::<SqlSmallint>)),
    (ids::SQL_LONGINT_ID, "SqlLongint", Reconstruct::Instance(blank::<SqlLongint>)),
    (ids::SQL_VARCHAR_ID, "SqlVarchar", Reconstruct::Instance(blank::<SqlVarchar>)),
    (ids::FORMATABLE_BYTE_ARRAY_V01_ID, "ByteArray", Reconstruct::Instance(blank::<ByteArray>)),
    (ids::BITIMPL_V01_ID, "PackedBitVector", Reconstruct::Instance(blank::<PackedBitVector>)),
    (ids::FORMATABLE_ARRAY_HOLDER_V01_ID, "ArrayHolder", Reconstruct::Instance(blank::<ArrayHolder>)),
    (ids::FORMATABLE_INT_HOLDER_V01_ID, "IntHolder", Reconstruct::Instance(blank::<IntHolder>)),
    (ids::FORMATABLE_LONG_HOLDER_V01_ID, "LongHolder", Reconstruct::Instance(blank::<LongHolder>)),
];
