//! Core types for the stored-format layer
//!
//! This crate defines the foundational pieces shared by the codec crates:
//! - FormatId: 16-bit stored format tag, reserved markers and assigned ids
//! - FormatError: Error type hierarchy
//! - CodecConfig: Object codec configuration (TOML)
//! - Limits: Frozen size constants of the stored format

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod format_id;
pub mod limits;

pub use config::CodecConfig;
pub use error::{BoxedCause, FormatError, Result};
pub use format_id::{
    ids, FormatId, FIRST_REGISTERED_ID, MAX_ID_2, MAX_TWO_BYTE_FORMAT_ID, NULL_FORMAT_ID,
    SERIALIZABLE_FORMAT_ID, STRING_FORMAT_ID, TWO_BYTE_FORMAT_ID_BYTE_LENGTH,
};
