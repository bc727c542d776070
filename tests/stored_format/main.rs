//! Stored format integration tests
//!
//! Exercises the public surface end to end: byte layouts that must never
//! change, host registration of new format ids, the native fallback, the
//! write cross-check and config loading.

mod common;

mod bit_vector;
mod bounded_cursors;
mod config_file;
mod cross_check;
mod native_fallback;
mod object_layouts;
mod registry_extension;
