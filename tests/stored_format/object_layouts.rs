//! Object Layout Tests
//!
//! Byte layouts of every payload shape, and sequences of values sharing one
//! buffer.

use crate::common::{decode_all, encode_all, host_registry, Counter, COUNTER_ID};
use stratafmt::values::{ArrayHolder, IntHolder, SqlInteger, SqlVarchar};
use stratafmt::{
    from_bytes, to_bytes, BoundedReader, FormatError, FormatIdInput, ObjectRef, RegistryBuilder,
    StoredObject,
};

// ============================================================================
// Fixed layouts
// ============================================================================

#[test]
fn null_is_two_zero_bytes() {
    assert_eq!(to_bytes(ObjectRef::Null).unwrap(), vec![0x00, 0x00]);
    assert_eq!(from_bytes(&[0x00, 0x00]).unwrap(), StoredObject::Null);
}

#[test]
fn short_string_is_inline() {
    let bytes = to_bytes("abc").unwrap();
    assert_eq!(bytes, vec![0x00, 0x01, 0x00, 0x03, b'a', b'b', b'c']);
    assert_eq!(from_bytes(&bytes).unwrap().as_str(), Some("abc"));
}

#[test]
fn storable_layout_carries_null_flag() {
    assert_eq!(
        to_bytes(ObjectRef::Formatable(&SqlInteger::new(7))).unwrap(),
        vec![0x00, 0x50, 0x00, 0x00, 0x00, 0x00, 0x07]
    );
    assert_eq!(
        to_bytes(ObjectRef::Formatable(&SqlInteger::null())).unwrap(),
        vec![0x00, 0x50, 0x01]
    );
}

#[test]
fn plain_formatable_has_no_null_flag() {
    assert_eq!(
        to_bytes(ObjectRef::Formatable(&IntHolder::new(1))).unwrap(),
        vec![0x01, 0x2F, 0x00, 0x00, 0x00, 0x01]
    );
}

#[test]
fn host_type_writes_compressed_fields() {
    let registry = host_registry();
    let counter = Counter {
        name: "a".into(),
        count: 100_000,
    };
    let bytes = encode_all(&registry, &[ObjectRef::Formatable(&counter)]);
    assert_eq!(
        bytes,
        vec![0x01, 0xF4, 0x00, 0x01, b'a', 0x80, 0x01, 0x86, 0xA0]
    );
    let decoded = decode_all(&registry, &bytes, 1);
    assert_eq!(decoded[0].downcast_ref::<Counter>(), Some(&counter));
}

// ============================================================================
// String threshold
// ============================================================================

#[test]
fn string_at_threshold_stays_inline() {
    let text = "x".repeat(20_000);
    let bytes = to_bytes(text.as_str()).unwrap();
    assert_eq!(&bytes[..2], &[0x00, 0x01]);
    assert_eq!(from_bytes(&bytes).unwrap().as_str(), Some(text.as_str()));
}

#[test]
fn string_past_threshold_uses_fallback() {
    let text = "x".repeat(20_001);
    let bytes = to_bytes(text.as_str()).unwrap();
    assert_eq!(&bytes[..2], &[0x00, 0x02]);
    assert_eq!(&bytes[2..4], &[0x00, 0x06]);
    assert_eq!(&bytes[4..10], b"String");
    assert_eq!(from_bytes(&bytes).unwrap().as_str(), Some(text.as_str()));
}

// ============================================================================
// Sequences
// ============================================================================

#[test]
fn mixed_sequence_in_one_buffer() {
    let registry = host_registry();
    let counter = Counter {
        name: "hits".into(),
        count: 3,
    };
    let varchar = SqlVarchar::new("");
    let missing = SqlVarchar::null();
    let mut array = ArrayHolder::default();
    array.push("inner".to_string());
    array.push(StoredObject::Formatable(Box::new(SqlInteger::new(-1))));

    let values = [
        ObjectRef::Formatable(&counter),
        ObjectRef::Null,
        ObjectRef::Str("tail"),
        ObjectRef::Formatable(&varchar),
        ObjectRef::Formatable(&missing),
        ObjectRef::Formatable(&array),
    ];
    let bytes = encode_all(&registry, &values);
    let decoded = decode_all(&registry, &bytes, values.len());

    assert_eq!(decoded[0].downcast_ref::<Counter>(), Some(&counter));
    assert!(decoded[1].is_null());
    assert_eq!(decoded[2].as_str(), Some("tail"));
    assert_eq!(
        decoded[3].downcast_ref::<SqlVarchar>().unwrap().as_str(),
        Some("")
    );
    assert_eq!(decoded[4].downcast_ref::<SqlVarchar>().unwrap().as_str(), None);
    let read_array = decoded[5].downcast_ref::<ArrayHolder>().unwrap();
    assert_eq!(read_array.len(), 2);
    assert_eq!(read_array.items()[0].as_str(), Some("inner"));
}

#[test]
fn empty_strings_between_values() {
    let registry = host_registry();
    let unnamed = Counter {
        name: String::new(),
        count: 100_000,
    };
    let mut array = ArrayHolder::default();
    array.push(String::new());
    array.push(StoredObject::Formatable(Box::new(IntHolder::new(3))));

    let values = [
        ObjectRef::Str(""),
        ObjectRef::Formatable(&unnamed),
        ObjectRef::Str(""),
        ObjectRef::Formatable(&array),
        ObjectRef::Str("last"),
    ];
    let bytes = encode_all(&registry, &values);
    // id 500, empty name, compressed 100000
    assert_eq!(
        &bytes[4..12],
        &[0x01, 0xF4, 0x00, 0x00, 0x80, 0x01, 0x86, 0xA0]
    );
    let decoded = decode_all(&registry, &bytes, values.len());

    assert_eq!(decoded[0].as_str(), Some(""));
    assert_eq!(decoded[1].downcast_ref::<Counter>(), Some(&unnamed));
    assert_eq!(decoded[2].as_str(), Some(""));
    let read_array = decoded[3].downcast_ref::<ArrayHolder>().unwrap();
    assert_eq!(read_array.items()[0].as_str(), Some(""));
    assert_eq!(
        read_array.items()[1].downcast_ref::<IntHolder>().unwrap().value(),
        3
    );
    assert_eq!(decoded[4].as_str(), Some("last"));
}

// ============================================================================
// Failures
// ============================================================================

#[test]
fn host_id_unknown_to_global_registry() {
    let registry = host_registry();
    let counter = Counter::default();
    let bytes = encode_all(&registry, &[ObjectRef::Formatable(&counter)]);
    let err = from_bytes(&bytes).unwrap_err();
    assert!(matches!(err, FormatError::UnresolvedFormatId { id } if id == COUNTER_ID));
    assert!(err.is_reconstruction_failure());
}

#[test]
fn typed_read_of_wrong_type_is_mismatch() {
    let bytes = to_bytes(ObjectRef::Formatable(&SqlVarchar::new("v"))).unwrap();
    let mut input = FormatIdInput::new(BoundedReader::new(&bytes));
    let err = input.read_formatable::<SqlInteger>().unwrap_err();
    assert!(matches!(err, FormatError::ReconstructionMismatch { .. }));
}

#[test]
fn typed_read_of_null_marker_is_none() {
    let mut input = FormatIdInput::new(BoundedReader::new(&[0x00, 0x00]));
    assert!(input.read_formatable::<SqlInteger>().unwrap().is_none());
}

#[test]
fn every_truncation_is_end_of_data() {
    let counter = Counter {
        name: "truncate me".into(),
        count: 1 << 20,
    };
    let registry = host_registry();
    let bytes = encode_all(&registry, &[ObjectRef::Formatable(&counter)]);
    for cut in 1..bytes.len() {
        let mut input = FormatIdInput::new(BoundedReader::new(&bytes[..cut]))
            .with_registry(registry.clone());
        let err = input.read_object().unwrap_err();
        assert!(err.is_end_of_data(), "cut at {}: {}", cut, err);
    }
}

#[test]
fn empty_registry_resolves_only_markers() {
    let registry = std::sync::Arc::new(RegistryBuilder::new().build());
    let decoded = decode_all(&registry, &[0x00, 0x00, 0x00, 0x01, 0x00, 0x00], 2);
    assert!(decoded[0].is_null());
    assert_eq!(decoded[1].as_str(), Some(""));
    let bytes = to_bytes(ObjectRef::Formatable(&IntHolder::new(1))).unwrap();
    let mut input = FormatIdInput::new(BoundedReader::new(&bytes)).with_registry(registry);
    assert!(input.read_object().unwrap_err().is_reconstruction_failure());
}
