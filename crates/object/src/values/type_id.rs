//! SQL type descriptors
//!
//! One descriptor type serves several format ids. The registry builds it
//! through a factory that passes the id being read, and the descriptor
//! keeps that id as its own format id.

use crate::formatable::{Formatable, ObjectInput, ObjectOutput};
use stratafmt_core::error::Result;
use stratafmt_core::format_id::{ids, FormatId};

/// Describes a SQL column type by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeIdDescriptor {
    format_id: FormatId,
    sql_name: String,
}

impl TypeIdDescriptor {
    /// Descriptor for `format_id` with its standard SQL name.
    pub fn new(format_id: FormatId) -> Self {
        Self {
            format_id,
            sql_name: standard_sql_name(format_id).to_string(),
        }
    }

    /// Registry factory.
    pub fn build(format_id: FormatId) -> Box<dyn Formatable> {
        Box::new(Self::new(format_id))
    }

    /// SQL name of the described type.
    pub fn sql_name(&self) -> &str {
        &self.sql_name
    }
}

fn standard_sql_name(id: FormatId) -> &'static str {
    match id {
        ids::BOOLEAN_TYPE_ID => "BOOLEAN",
        ids::CHAR_TYPE_ID => "CHAR",
        ids::DOUBLE_TYPE_ID => "DOUBLE",
        ids::INT_TYPE_ID => "INTEGER",
        ids::REAL_TYPE_ID => "REAL",
        ids::SMALLINT_TYPE_ID => "SMALLINT",
        ids::LONGINT_TYPE_ID => "BIGINT",
        ids::VARCHAR_TYPE_ID => "VARCHAR",
        _ => "",
    }
}

impl Formatable for TypeIdDescriptor {
    fn format_id(&self) -> FormatId {
        self.format_id
    }

    fn write_external(&self, out: &mut dyn ObjectOutput) -> Result<()> {
        out.write_utf(&self.sql_name)
    }

    fn read_external(&mut self, input: &mut dyn ObjectInput) -> Result<()> {
        self.sql_name = input.read_utf()?;
        Ok(())
    }

    fn value_eq(&self, other: &dyn Formatable) -> Option<bool> {
        Some(other.downcast_ref::<Self>() == Some(self))
    }
}
