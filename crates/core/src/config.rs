//! Codec configuration via `stratafmt.toml`
//!
//! Every field has a default, so an empty file (or no file at all) yields a
//! usable configuration.

use crate::error::{FormatError, Result};
use crate::limits::UTF_GROWTH_QUANTUM;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Config file name looked up by hosts that keep one next to their data.
pub const CONFIG_FILE_NAME: &str = "stratafmt.toml";

/// Object codec configuration.
///
/// # Example
///
/// ```toml
/// # Decode every self-describing value right after writing it and log
/// # mismatches (debug builds only)
/// verify_writes = true
///
/// # Initial capacity of the reusable UTF character buffer
/// utf_scratch_capacity = 64
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Read back each written value and compare it to the original.
    ///
    /// Only honoured in builds with debug assertions; see
    /// [`CodecConfig::verify_enabled`].
    pub verify_writes: bool,
    /// Initial capacity, in UTF-16 units, of reader scratch buffers.
    pub utf_scratch_capacity: usize,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            verify_writes: cfg!(debug_assertions),
            utf_scratch_capacity: UTF_GROWTH_QUANTUM,
        }
    }
}

impl CodecConfig {
    /// Effective cross-check switch: requested AND a development build.
    #[inline]
    pub fn verify_enabled(&self) -> bool {
        cfg!(debug_assertions) && self.verify_writes
    }

    /// Copy of this config with the cross-check switched on or off.
    pub fn with_verify_writes(mut self, verify: bool) -> Self {
        self.verify_writes = verify;
        self
    }

    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# Stored-format codec configuration
#
# Decode every self-describing value right after writing it and log any
# mismatch. Ignored in release builds.
# verify_writes = true

# Initial capacity (UTF-16 units) of the reusable UTF character buffer.
utf_scratch_capacity = 64
"#
    }

    /// Parse a config from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| FormatError::Config(format!("Failed to parse codec config: {}", e)))
    }

    /// Read and parse config from a file path.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content).map_err(|e| {
            FormatError::Config(format!("'{}': {}", path.display(), e))
        })
    }

    /// Serialize this config to TOML and write it to the given path.
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| FormatError::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
