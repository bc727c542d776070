//! Config File Tests

use stratafmt::stratafmt_core::config::CONFIG_FILE_NAME;
use stratafmt::{CodecConfig, FormatError, FormatIdInput, BoundedReader};
use tempfile::tempdir;

#[test]
fn written_config_reads_back() {
    let dir = tempdir().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);
    let config = CodecConfig {
        verify_writes: false,
        utf_scratch_capacity: 256,
    };
    config.write_to_file(&path).unwrap();
    assert_eq!(CodecConfig::from_file(&path).unwrap(), config);
}

#[test]
fn default_toml_parses() {
    let config = CodecConfig::from_toml_str(CodecConfig::default_toml()).unwrap();
    assert_eq!(config.utf_scratch_capacity, 64);
    assert_eq!(config.verify_writes, CodecConfig::default().verify_writes);
}

#[test]
fn bad_config_names_the_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);
    std::fs::write(&path, "utf_scratch_capacity = \"big\"").unwrap();
    let err = CodecConfig::from_file(&path).unwrap_err();
    assert!(matches!(err, FormatError::Config(ref msg) if msg.contains(CONFIG_FILE_NAME)));
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempdir().unwrap();
    let err = CodecConfig::from_file(&dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, FormatError::Io(_)));
}

#[test]
fn reader_takes_scratch_size_from_config() {
    let config = CodecConfig::from_toml_str("utf_scratch_capacity = 1024").unwrap();
    let bytes = [0x00, 0x01, 0x00, 0x02, b'o', b'k'];
    let mut input = FormatIdInput::new(BoundedReader::new(&bytes)).with_config(&config);
    assert_eq!(input.read_object().unwrap().as_str(), Some("ok"));
}
