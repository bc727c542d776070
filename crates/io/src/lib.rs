//! Byte-level building blocks of the stored format
//!
//! This crate provides:
//! - compressed: 1/2/4-byte ints and 2/4/8-byte longs
//! - utf: modified UTF-8 with the zero-length/terminator conventions
//! - DataInput / DataOutput: cursor traits over stored bytes
//! - BoundedReader / BoundedWriter: windowed cursors over borrowed arrays

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod compressed;
pub mod data;
pub mod reader;
pub mod utf;
pub mod writer;

pub use data::{DataInput, DataOutput};
pub use reader::BoundedReader;
pub use writer::BoundedWriter;
