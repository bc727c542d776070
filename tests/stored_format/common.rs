//! Shared helpers and host-defined value types.

use std::sync::Arc;
use stratafmt::stratafmt_object::formatable::{ObjectInput, ObjectOutput};
use stratafmt::stratafmt_object::Reconstruct;
use stratafmt::{
    BoundedReader, FormatId, FormatIdInput, FormatIdOutput, FormatRegistry, Formatable, ObjectRef,
    RegistryBuilder, Result, StoredObject,
};

/// Format id a host assigns to [`Counter`].
pub const COUNTER_ID: FormatId = FormatId(500);

/// Format id a host assigns to [`Drifting`].
pub const DRIFTING_ID: FormatId = FormatId(501);

/// Host type: a named counter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Counter {
    pub name: String,
    pub count: i32,
}

impl Formatable for Counter {
    fn format_id(&self) -> FormatId {
        COUNTER_ID
    }

    fn write_external(&self, out: &mut dyn ObjectOutput) -> Result<()> {
        out.write_utf(&self.name)?;
        out.write_compressed_int(self.count)?;
        Ok(())
    }

    fn read_external(&mut self, input: &mut dyn ObjectInput) -> Result<()> {
        self.name = input.read_utf()?;
        self.count = input.read_compressed_int()?;
        Ok(())
    }

    fn value_eq(&self, other: &dyn Formatable) -> Option<bool> {
        Some(other.downcast_ref::<Self>() == Some(self))
    }
}

/// Host type whose reader does not invert its writer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Drifting {
    pub value: i32,
}

impl Formatable for Drifting {
    fn format_id(&self) -> FormatId {
        DRIFTING_ID
    }

    fn write_external(&self, out: &mut dyn ObjectOutput) -> Result<()> {
        out.write_i32(self.value)
    }

    fn read_external(&mut self, input: &mut dyn ObjectInput) -> Result<()> {
        self.value = input.read_i32()?.wrapping_add(1);
        Ok(())
    }

    fn value_eq(&self, other: &dyn Formatable) -> Option<bool> {
        Some(other.downcast_ref::<Self>() == Some(self))
    }
}

fn new_counter() -> Box<dyn Formatable> {
    Box::new(Counter::default())
}

fn new_drifting() -> Box<dyn Formatable> {
    Box::new(Drifting::default())
}

/// Built-ins plus the host types above.
pub fn host_registry() -> Arc<FormatRegistry> {
    let registry = RegistryBuilder::with_builtins()
        .register(COUNTER_ID, "Counter", Reconstruct::Instance(new_counter))
        .and_then(|b| b.register(DRIFTING_ID, "Drifting", Reconstruct::Instance(new_drifting)))
        .expect("host ids are free");
    Arc::new(registry.build())
}

/// Encode a sequence of values into one buffer through `registry`.
pub fn encode_all(registry: &Arc<FormatRegistry>, values: &[ObjectRef<'_>]) -> Vec<u8> {
    let mut out = FormatIdOutput::new(Vec::new()).with_registry(Arc::clone(registry));
    for value in values {
        out.write_object(*value).unwrap();
    }
    out.into_inner()
}

/// Decode `count` values from `bytes` through `registry`.
pub fn decode_all(registry: &Arc<FormatRegistry>, bytes: &[u8], count: usize) -> Vec<StoredObject> {
    let mut input =
        FormatIdInput::new(BoundedReader::new(bytes)).with_registry(Arc::clone(registry));
    (0..count).map(|_| input.read_object().unwrap()).collect()
}
