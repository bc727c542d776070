//! Bounded Cursor Tests
//!
//! Records written into a fixed page with a writer window, read back through
//! reader windows.

use stratafmt::stratafmt_io::compressed;
use stratafmt::stratafmt_object::formatable::ObjectRef;
use stratafmt::values::SqlVarchar;
use stratafmt::{BoundedReader, BoundedWriter, DataInput, DataOutput, FormatIdInput, FormatIdOutput};

#[test]
fn compressed_int_100000_scenario() {
    let mut page = [0u8; 8];
    let mut writer = BoundedWriter::new(&mut page);
    assert_eq!(writer.write_compressed_int(100_000).unwrap(), 4);
    assert_eq!(writer.written_bytes(), &[0x80, 0x01, 0x86, 0xA0]);

    let mut reader = BoundedReader::new(&page);
    assert_eq!(reader.read_compressed_int().unwrap(), 100_000);
    assert_eq!(reader.position(), 4);
    assert_eq!(compressed::size_int(100_000), 4);
}

#[test]
fn writer_limit_rejects_without_writing() {
    let mut page = [0xEEu8; 6];
    let mut writer = BoundedWriter::new(&mut page);
    writer.set_limit(3).unwrap();
    writer.write_u16(0x0102).unwrap();
    let err = writer.write_i32(7).unwrap_err();
    assert!(err.is_end_of_data());
    assert_eq!(writer.written(), 2);
    assert_eq!(page, [0x01, 0x02, 0xEE, 0xEE, 0xEE, 0xEE]);
}

#[test]
fn record_slots_in_one_page() {
    let mut page = vec![0u8; 64];
    let mut slots = Vec::new();
    let mut offset = 0;
    for text in ["alpha", "", "gamma"] {
        let value = SqlVarchar::new(text);
        let mut out = FormatIdOutput::new(BoundedWriter::at(&mut page, offset).unwrap());
        out.write_object(ObjectRef::Formatable(&value)).unwrap();
        let written = out.get_ref().written();
        slots.push((offset, written));
        offset += written;
    }

    // read the middle slot alone; the window stops the reader at its end
    let (start, len) = slots[1];
    let mut input = FormatIdInput::new(BoundedReader::with_window(&page, start, len).unwrap());
    let value = input.read_object().unwrap();
    assert_eq!(value.downcast_ref::<SqlVarchar>().unwrap().as_str(), Some(""));
    assert_eq!(input.available(), 0);
    assert!(input.read_u8().unwrap_err().is_end_of_data());

    // one reader rebound over each slot in turn
    let mut input = FormatIdInput::new(BoundedReader::new(&page));
    let mut texts = Vec::new();
    for &(start, len) in &slots {
        input.get_mut().set_limit(start, len).unwrap();
        let value = input.read_object().unwrap();
        texts.push(
            value
                .downcast_ref::<SqlVarchar>()
                .unwrap()
                .as_str()
                .unwrap()
                .to_string(),
        );
    }
    assert_eq!(texts, vec!["alpha", "", "gamma"]);
}

#[test]
fn zero_length_utf_is_empty_before_next_field() {
    let bytes = [0x00, 0x00, 0x00, 0x02, b'h', b'i'];
    let mut reader = BoundedReader::new(&bytes);
    assert_eq!(reader.read_utf().unwrap(), "");
    assert_eq!(reader.read_utf().unwrap(), "hi");
    assert_eq!(reader.available(), 0);
}

#[test]
fn zero_length_long_utf_reads_to_window_end() {
    let bytes = [0x00, 0x00, b'h', b'i', 0xFF];
    let mut reader = BoundedReader::with_window(&bytes, 0, 4).unwrap();
    assert_eq!(reader.read_long_utf().unwrap(), "hi");
    assert_eq!(reader.available(), 0);
}

#[test]
fn zero_length_long_utf_stops_at_terminator() {
    let bytes = [0x00, 0x00, b'o', b'k', 0xE0, 0x00, 0x00, 0x2A];
    let mut reader = BoundedReader::new(&bytes);
    assert_eq!(reader.read_long_utf().unwrap(), "ok");
    assert_eq!(reader.read_u8().unwrap(), 0x2A);
}

#[test]
fn declared_utf_crossing_its_length_is_malformed() {
    // length 2, but the second character needs 2 bytes starting at byte 2
    let bytes = [0x00, 0x02, b'a', 0xC3, 0xA9];
    let mut reader = BoundedReader::new(&bytes);
    let err = reader.read_utf().unwrap_err();
    assert!(err.is_corruption(), "{}", err);
    assert_eq!(reader.position(), 0);
}
