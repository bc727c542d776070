//! Error types for the stored-format layer
//!
//! Every failure raised by the numeric codec, the bounded buffers, the format
//! registry and the object codec is a [`FormatError`]. We use `thiserror` for
//! automatic `Display` and `Error` trait implementations.
//!
//! The variants split into three groups:
//! - cursor/limit violations ([`FormatError::EndOfData`]), which a caller may
//!   recover from by retrying with a larger buffer;
//! - grammar violations in the stored bytes ([`FormatError::MalformedEncoding`]);
//! - reconstruction failures raised while turning a tag back into a value
//!   ([`FormatError::UnresolvedFormatId`], [`FormatError::ReconstructionMismatch`],
//!   [`FormatError::ClassResolution`]).

use crate::format_id::FormatId;
use std::io;
use thiserror::Error;

/// Result type alias for stored-format operations
pub type Result<T> = std::result::Result<T, FormatError>;

/// Boxed cause chained under a reconstruction failure
pub type BoxedCause = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Error types for the stored-format layer
#[derive(Debug, Error)]
pub enum FormatError {
    /// Cursor or limit violation on read or write
    #[error("End of data: needed {needed} bytes, {available} available")]
    EndOfData {
        /// Bytes the operation required
        needed: usize,
        /// Bytes left inside the current window
        available: usize,
    },

    /// Stored bytes violate the UTF or numeric grammar
    #[error("Malformed encoding: {0}")]
    MalformedEncoding(String),

    /// A value cannot be encoded (negative compressed number, over-long UTF)
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// Tag does not match any registry entry or marker
    #[error("Unresolved format id {id}")]
    UnresolvedFormatId {
        /// Offending format id
        id: FormatId,
    },

    /// Decoded value does not satisfy the capability the writer assumed
    #[error("Reconstruction mismatch for format id {id} ({type_name}): {detail}")]
    ReconstructionMismatch {
        /// Format id read from the stream
        id: FormatId,
        /// Type the registry produced for the id
        type_name: &'static str,
        /// What did not match
        detail: String,
    },

    /// The class-resolution hook could not produce a decoder
    #[error("Cannot resolve native type '{type_name}': {cause}")]
    ClassResolution {
        /// Native type name read from the stream
        type_name: String,
        /// Underlying failure
        #[source]
        cause: BoxedCause,
    },

    /// Bit index outside `0..len` of a packed bit vector
    #[error("Bit index {index} out of range for length {len}")]
    BitIndexOutOfRange {
        /// Requested bit
        index: usize,
        /// Current length in bits
        len: usize,
    },

    /// Attempt to reuse or repurpose a format id
    #[error("Invalid registration: {0}")]
    InvalidRegistration(String),

    /// Native-fallback serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration could not be read or parsed
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error (configuration files)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl FormatError {
    /// Shorthand for an end-of-data failure.
    pub fn end_of_data(needed: usize, available: usize) -> Self {
        FormatError::EndOfData { needed, available }
    }

    /// Shorthand for a malformed-encoding failure.
    pub fn malformed(msg: impl Into<String>) -> Self {
        FormatError::MalformedEncoding(msg.into())
    }

    /// True for cursor/limit violations ("short record").
    pub fn is_end_of_data(&self) -> bool {
        matches!(self, FormatError::EndOfData { .. })
    }

    /// True for the failures raised while reconstructing a value from its tag.
    pub fn is_reconstruction_failure(&self) -> bool {
        matches!(
            self,
            FormatError::UnresolvedFormatId { .. }
                | FormatError::ReconstructionMismatch { .. }
                | FormatError::ClassResolution { .. }
        )
    }

    /// True when the stored bytes themselves are broken, as opposed to a
    /// short buffer or a misuse of the API.
    pub fn is_corruption(&self) -> bool {
        matches!(
            self,
            FormatError::MalformedEncoding(_)
                | FormatError::UnresolvedFormatId { .. }
                | FormatError::ReconstructionMismatch { .. }
        )
    }
}

impl From<bincode::Error> for FormatError {
    fn from(e: bincode::Error) -> Self {
        FormatError::Serialization(e.to_string())
    }
}
