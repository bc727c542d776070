//! Packed Bit Vector Tests

use stratafmt::{from_bytes, to_bytes, FormatError, ObjectRef, PackedBitVector};

fn vector(len: usize, set: &[usize]) -> PackedBitVector {
    let mut v = PackedBitVector::with_len(len);
    for &i in set {
        v.set(i).unwrap();
    }
    v
}

#[test]
fn twelve_bit_fixture() {
    let v = vector(12, &[0, 2, 4, 8]);
    let bytes = to_bytes(ObjectRef::Formatable(&v)).unwrap();
    assert_eq!(&bytes[2..], &[0x00, 0x00, 0x00, 0x0C, 0xA8, 0x80]);
    let decoded = from_bytes(&bytes).unwrap();
    let read = decoded.downcast_ref::<PackedBitVector>().unwrap();
    assert_eq!(read.to_string(), "{0, 2, 4, 8}");
    assert_eq!(read.num_bits_set(), 4);
}

#[test]
fn combine_masks_then_scan() {
    let mut live = vector(20, &[1, 5, 9, 13, 17]);
    let visible = vector(10, &[1, 2, 9]);
    live.and(&visible);
    assert_eq!(live.len(), 20);
    assert_eq!(live.set_bits().collect::<Vec<_>>(), vec![1, 9]);

    let mut dirty = PackedBitVector::new();
    dirty.or(&live);
    assert_eq!(dirty, live);
    dirty.xor(&live);
    assert_eq!(dirty.any_set_bit(), None);
}

#[test]
fn out_of_range_access_fails() {
    let mut v = vector(4, &[]);
    let err = v.set(4).unwrap_err();
    assert!(matches!(err, FormatError::BitIndexOutOfRange { index: 4, len: 4 }));
    v.grow(5);
    v.set(4).unwrap();
    assert!(v.is_set(4).unwrap());
}

#[test]
fn ordering_follows_bytes_then_length() {
    let mut sorted = vec![
        vector(16, &[0]),
        vector(8, &[7]),
        vector(8, &[0]),
        vector(3, &[0]),
        PackedBitVector::new(),
    ];
    sorted.sort();
    let strings: Vec<String> = sorted.iter().map(|v| format!("{}:{}", v.len(), v)).collect();
    assert_eq!(strings, vec!["0:{}", "8:{7}", "3:{0}", "8:{0}", "16:{0}"]);
}
