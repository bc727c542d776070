//! Registry Extension Tests
//!
//! Hosts append ids to the built-in table; ids are never reused.

use crate::common::{host_registry, COUNTER_ID, DRIFTING_ID};
use stratafmt::stratafmt_core::ids;
use stratafmt::stratafmt_object::Reconstruct;
use stratafmt::values::{IntHolder, SqlInteger};
use stratafmt::{FormatError, FormatId, FormatRegistry, Formatable, RegistryBuilder};

fn new_int_holder() -> Box<dyn Formatable> {
    Box::new(IntHolder::new(0))
}

#[test]
fn host_registry_keeps_builtins() {
    let registry = host_registry();
    assert!(registry.contains(ids::SQL_INTEGER_ID));
    assert!(registry.contains(ids::BITIMPL_V01_ID));
    assert!(registry.contains(COUNTER_ID));
    assert!(registry.contains(DRIFTING_ID));
    assert_eq!(registry.len(), FormatRegistry::global().len() + 2);
}

#[test]
fn instantiate_builds_the_registered_type() {
    let registry = host_registry();
    let value = registry.instantiate(ids::SQL_INTEGER_ID).unwrap();
    assert!(value.is::<SqlInteger>());
    assert_eq!(registry.get(COUNTER_ID).unwrap().name, "Counter");
}

#[test]
fn ids_are_ascending() {
    let ids = host_registry().ids();
    assert!(ids.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(ids.last(), Some(&DRIFTING_ID));
}

#[test]
fn reusing_a_builtin_id_is_rejected() {
    let err = RegistryBuilder::with_builtins()
        .register(
            ids::SQL_INTEGER_ID,
            "Impostor",
            Reconstruct::Instance(new_int_holder),
        )
        .unwrap_err();
    assert!(matches!(err, FormatError::InvalidRegistration(ref msg) if msg.contains("SqlInteger")));
}

#[test]
fn markers_and_out_of_range_ids_are_rejected() {
    for id in [0u16, 1, 2, 0x8000, u16::MAX] {
        let result = RegistryBuilder::new().register(
            FormatId(id),
            "Bad",
            Reconstruct::Instance(new_int_holder),
        );
        assert!(
            matches!(result, Err(FormatError::InvalidRegistration(_))),
            "id {} accepted",
            id
        );
    }
}

#[test]
fn gaps_are_unresolved() {
    let registry = host_registry();
    let err = registry.instantiate(FormatId(499)).unwrap_err();
    assert!(matches!(err, FormatError::UnresolvedFormatId { id } if id == FormatId(499)));
    assert!(registry.instantiate(FormatId(0x7FFF)).is_err());
}
