//! Format id registry
//!
//! Maps a stored [`FormatId`] to the way a blank value of that format is
//! built before its bytes are read. The table is a dense array indexed by
//! `id - FIRST_REGISTERED_ID`; the three marker ids never reach it.
//!
//! ## Usage
//!
//! ```rust,ignore
//! // Process-wide table with the built-in types
//! let registry = FormatRegistry::global();
//! let blank = registry.instantiate(ids::SQL_INTEGER_ID)?;
//!
//! // Host table with an extra type appended after the built-ins
//! let registry = RegistryBuilder::with_builtins()
//!     .register(FormatId(500), "app.Widget", Reconstruct::Instance(Widget::blank))?
//!     .build();
//! ```
//!
//! Entries are append-only. A builder refuses to reuse an id, so once a
//! table is built the meaning of every id in it is fixed.
//!
//! Both [`Reconstruct`] forms are plain `fn` pointers bound when the entry is
//! registered; nothing is looked up by name while reading. The
//! [`ClassResolver`](crate::native::ClassResolver) hook only serves the
//! named native fallback, so an id with no entry in the reader's table is
//! reported as [`FormatError::UnresolvedFormatId`] whether or not its type
//! would have been built by a factory.

use crate::formatable::Formatable;
use crate::values;
use once_cell::sync::Lazy;
use std::fmt;
use std::sync::Arc;
use stratafmt_core::error::{FormatError, Result};
use stratafmt_core::format_id::{FormatId, FIRST_REGISTERED_ID, MAX_TWO_BYTE_FORMAT_ID};
use tracing::{debug, warn};

/// How a registry entry builds a blank value.
#[derive(Clone, Copy)]
pub enum Reconstruct {
    /// Zero-argument constructor
    Instance(fn() -> Box<dyn Formatable>),
    /// Factory that is told which id it is building for
    Factory(fn(FormatId) -> Box<dyn Formatable>),
}

impl Reconstruct {
    fn build(self, id: FormatId) -> Box<dyn Formatable> {
        match self {
            Reconstruct::Instance(new) => new(),
            Reconstruct::Factory(make) => make(id),
        }
    }
}

impl fmt::Debug for Reconstruct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reconstruct::Instance(_) => f.write_str("Instance"),
            Reconstruct::Factory(_) => f.write_str("Factory"),
        }
    }
}

/// One registered format.
#[derive(Debug, Clone, Copy)]
pub struct RegistryEntry {
    /// Type name, for diagnostics
    pub name: &'static str,
    /// Blank-value constructor
    pub reconstruct: Reconstruct,
}

/// Read-only map from format id to reconstruction strategy.
pub struct FormatRegistry {
    entries: Vec<Option<RegistryEntry>>,
}

static GLOBAL: Lazy<Arc<FormatRegistry>> =
    Lazy::new(|| Arc::new(RegistryBuilder::with_builtins().build()));

impl FormatRegistry {
    /// Process-wide table holding the built-in types.
    pub fn global() -> Arc<FormatRegistry> {
        Arc::clone(&GLOBAL)
    }

    /// Entry for `id`, if registered.
    #[inline]
    pub fn get(&self, id: FormatId) -> Option<&RegistryEntry> {
        let index = (id.value() as usize).checked_sub(FIRST_REGISTERED_ID as usize)?;
        self.entries.get(index)?.as_ref()
    }

    /// True if `id` has an entry.
    pub fn contains(&self, id: FormatId) -> bool {
        self.get(id).is_some()
    }

    /// Build a blank value for `id`.
    pub fn instantiate(&self, id: FormatId) -> Result<Box<dyn Formatable>> {
        let entry = self
            .get(id)
            .ok_or(FormatError::UnresolvedFormatId { id })?;
        Ok(entry.reconstruct.build(id))
    }

    /// Registered ids in ascending order.
    pub fn ids(&self) -> Vec<FormatId> {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.is_some())
            .map(|(i, _)| FormatId(FIRST_REGISTERED_ID + i as u16))
            .collect()
    }

    /// Number of registered ids.
    pub fn len(&self) -> usize {
        self.entries.iter().filter(|e| e.is_some()).count()
    }

    /// True if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for FormatRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormatRegistry")
            .field("entry_count", &self.len())
            .field("table_size", &self.entries.len())
            .finish()
    }
}

/// Collects entries for a [`FormatRegistry`].
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    entries: Vec<Option<RegistryEntry>>,
}

impl RegistryBuilder {
    /// Builder with no entries.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder pre-loaded with the built-in types.
    pub fn with_builtins() -> Self {
        let mut builder = Self::new();
        for &(id, name, reconstruct) in values::BUILTINS {
            // built-in ids are distinct constants inside the table range
            if let Err(e) = builder.insert(id, name, reconstruct) {
                warn!(
                    target: "stratafmt::registry",
                    format_id = %id,
                    name,
                    error = %e,
                    "Built-in entry rejected"
                );
                debug_assert!(false, "built-in entry {} ({}) rejected: {}", name, id, e);
            }
        }
        builder
    }

    /// Add an entry.
    ///
    /// Fails for marker ids, ids above the two-byte range, and ids that are
    /// already taken.
    pub fn register(
        mut self,
        id: FormatId,
        name: &'static str,
        reconstruct: Reconstruct,
    ) -> Result<Self> {
        self.insert(id, name, reconstruct)?;
        Ok(self)
    }

    fn insert(&mut self, id: FormatId, name: &'static str, reconstruct: Reconstruct) -> Result<()> {
        if id.is_marker() {
            return Err(FormatError::InvalidRegistration(format!(
                "format id {} is a reserved marker",
                id
            )));
        }
        if id.value() > MAX_TWO_BYTE_FORMAT_ID {
            return Err(FormatError::InvalidRegistration(format!(
                "format id {} exceeds {}",
                id, MAX_TWO_BYTE_FORMAT_ID
            )));
        }
        let index = (id.value() - FIRST_REGISTERED_ID) as usize;
        if index >= self.entries.len() {
            self.entries.resize(index + 1, None);
        }
        if let Some(existing) = &self.entries[index] {
            return Err(FormatError::InvalidRegistration(format!(
                "format id {} already assigned to {}",
                id, existing.name
            )));
        }
        self.entries[index] = Some(RegistryEntry { name, reconstruct });
        Ok(())
    }

    /// Freeze into a read-only table.
    pub fn build(self) -> FormatRegistry {
        let registry = FormatRegistry {
            entries: self.entries,
        };
        debug!(
            target: "stratafmt::registry",
            entries = registry.len(),
            table_size = registry.entries.len(),
            "Format registry built"
        );
        registry
    }
}
