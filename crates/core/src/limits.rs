//! Fixed size limits of the stored format
//!
//! These constants are part of the on-disk contract. Changing any of them
//! changes how existing bytes are interpreted, so they are FROZEN.

/// Largest byte count a 2-byte UTF length prefix can declare.
pub const MAX_UTF_LENGTH: usize = 0xFFFF;

/// Largest number of bytes modified UTF-8 spends on one UTF-16 unit.
pub const MAX_UTF_BYTES_PER_CHAR: usize = 3;

/// Strings up to this many UTF-16 units are written inline behind the string
/// marker. Even at three bytes per unit the payload fits a 2-byte length.
pub const MAX_INLINE_STRING_CHARS: usize = 20_000;

/// Terminator written after the payload of a long string whose declared
/// length is zero.
pub const LONG_UTF_TERMINATOR: [u8; 3] = [0xE0, 0x00, 0x00];

/// Minimum growth step of a reusable UTF character buffer.
pub const UTF_GROWTH_QUANTUM: usize = 64;
