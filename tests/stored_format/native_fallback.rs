//! Native Fallback Tests
//!
//! Values without a format id travel as a type name plus serde bytes and
//! come back through the host's resolver.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use stratafmt::stratafmt_object::{ClassResolver, NativeObject};
use stratafmt::{
    to_bytes, BoundedReader, DataInput, FormatError, FormatIdInput, FormatIdOutput, NativeType,
    NativeTypeTable, ObjectRef, StoredObject,
};

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Session {
    user: String,
    scopes: Vec<String>,
}

impl NativeType for Session {
    const NATIVE_NAME: &'static str = "host.Session";
}

fn resolver() -> Arc<dyn ClassResolver> {
    NativeTypeTable::new()
        .with::<Session>()
        .unwrap()
        .into_shared()
}

fn session() -> Session {
    Session {
        user: "ada".into(),
        scopes: vec!["read".into(), "write".into()],
    }
}

fn write_native(value: &dyn NativeObject) -> Vec<u8> {
    let mut out = FormatIdOutput::new(Vec::new()).with_resolver(resolver());
    out.write_object(ObjectRef::Native(value)).unwrap();
    out.into_inner()
}

#[test]
fn native_value_roundtrips_through_resolver() {
    let original = session();
    let bytes = write_native(&original);
    assert_eq!(&bytes[..2], &[0x00, 0x02]);
    assert_eq!(&bytes[2..4], &[0x00, 12]);
    assert_eq!(&bytes[4..16], b"host.Session");

    let mut input = FormatIdInput::new(BoundedReader::new(&bytes)).with_resolver(resolver());
    let decoded = input.read_object().unwrap();
    assert_eq!(decoded.native_ref::<Session>(), Some(&original));
    assert_eq!(decoded, StoredObject::Native(Box::new(session())));
    assert_eq!(input.available(), 0);
}

#[test]
fn default_resolver_cannot_resolve_host_type() {
    let bytes = write_native(&session());
    let err = stratafmt::from_bytes(&bytes).unwrap_err();
    assert!(
        matches!(err, FormatError::ClassResolution { ref type_name, .. } if type_name == "host.Session")
    );
    assert!(err.is_reconstruction_failure());
    assert!(std::error::Error::source(&err).is_some());
}

#[test]
fn duplicate_native_name_is_rejected() {
    let err = NativeTypeTable::new()
        .with::<Session>()
        .and_then(|t| t.with::<Session>())
        .unwrap_err();
    assert!(matches!(err, FormatError::InvalidRegistration(_)));
}

#[test]
fn declared_length_past_buffer_is_end_of_data() {
    let mut bytes = write_native(&session());
    bytes.truncate(bytes.len() - 1);
    let mut input = FormatIdInput::new(BoundedReader::new(&bytes)).with_resolver(resolver());
    assert!(input.read_object().unwrap_err().is_end_of_data());
}

#[test]
fn long_string_fallback_uses_default_resolver() {
    let text = "\u{00E9}".repeat(25_000);
    let bytes = to_bytes(text.as_str()).unwrap();
    assert_eq!(&bytes[..2], &[0x00, 0x02]);
    let decoded = stratafmt::from_bytes(&bytes).unwrap();
    assert_eq!(decoded.as_str(), Some(text.as_str()));
}
