//! Table objects and name-keyed tables

use crate::error::{DxfError, Result};
use crate::types::Handle;
use ahash::RandomState;
use indexmap::IndexMap;

pub mod block_record;
pub mod layer;

pub use block_record::BlockRecord;
pub use layer::{Layer, LayerFlags};

/// Fold a table name to its case-insensitive key
pub fn fold_name(name: &str) -> String {
    name.to_uppercase()
}

/// Compare two table names case-insensitively
pub fn names_equal(a: &str, b: &str) -> bool {
    fold_name(a) == fold_name(b)
}

/// Case-insensitive "starts with" check for table names
pub fn starts_with_ignore_case(name: &str, prefix: &str) -> bool {
    fold_name(name).starts_with(&fold_name(prefix))
}

/// Base trait for named, owned graph nodes
pub trait TableObject {
    /// Get the object's handle
    fn handle(&self) -> Handle;

    /// Get the object's name (case preserved)
    fn name(&self) -> &str;

    /// Check if the object is reserved and may not be removed from its table
    fn is_reserved(&self) -> bool {
        false
    }

    /// Handle of the containing object, if any
    fn owner(&self) -> Option<Handle> {
        None
    }

    /// Rename the object in place.
    ///
    /// Objects whose name is derived from another object refuse with
    /// [`DxfError::RenameForbidden`].
    fn set_name(&mut self, _name: String) -> Result<()> {
        Err(DxfError::RenameForbidden(self.name().to_string()))
    }

    /// Check if this object answers to `name` (case-insensitive)
    fn is_named(&self, name: &str) -> bool {
        names_equal(self.name(), name)
    }
}

/// Ordered table of named objects, keyed case-insensitively.
///
/// Stored entries are read-only so that an entry's name and its key cannot
/// drift apart. Rename through [`Table::rename`], or take an entry out with
/// [`Table::remove`] and add it back after editing.
#[derive(Debug)]
pub struct Table<T: TableObject> {
    entries: IndexMap<String, T, RandomState>,
    handle: Handle,
}

impl<T: TableObject> Table<T> {
    /// Create a new empty table
    pub fn new() -> Self {
        Table {
            entries: IndexMap::default(),
            handle: Handle::NULL,
        }
    }

    /// Create a table with a specific handle
    pub fn with_handle(handle: Handle) -> Self {
        Table {
            entries: IndexMap::default(),
            handle,
        }
    }

    /// Get the table's handle
    pub fn handle(&self) -> Handle {
        self.handle
    }

    /// Add an entry to the table
    pub fn add(&mut self, entry: T) -> Result<()> {
        let key = fold_name(entry.name());
        if self.entries.contains_key(&key) {
            return Err(DxfError::DuplicateKey(entry.name().to_string()));
        }
        self.entries.insert(key, entry);
        Ok(())
    }

    /// Get an entry by name (case-insensitive)
    pub fn get(&self, name: &str) -> Option<&T> {
        self.entries.get(&fold_name(name))
    }

    /// Look up an entry by name, failing with [`DxfError::NotFound`]
    pub fn find(&self, name: &str) -> Result<&T> {
        self.get(name)
            .ok_or_else(|| DxfError::NotFound(name.to_string()))
    }

    /// Rename an entry and re-key it, keeping its position.
    ///
    /// Fails with [`DxfError::NotFound`] if `old` is absent and with
    /// [`DxfError::DuplicateKey`] if another entry already answers to `new`.
    /// If the entry refuses the new name the table is left unchanged.
    pub fn rename(&mut self, old: &str, new: impl Into<String>) -> Result<()> {
        let new = new.into();
        let old_key = fold_name(old);
        let new_key = fold_name(&new);
        let index = self
            .entries
            .get_index_of(&old_key)
            .ok_or_else(|| DxfError::NotFound(old.to_string()))?;
        if new_key != old_key && self.entries.contains_key(&new_key) {
            return Err(DxfError::DuplicateKey(new));
        }

        if let Some((_, entry)) = self.entries.get_index_mut(index) {
            entry.set_name(new)?;
        }
        if new_key != old_key {
            if let Some((_, entry)) = self.entries.shift_remove_index(index) {
                self.entries.shift_insert(index, new_key, entry);
            }
        }
        Ok(())
    }

    /// Remove an entry by name (case-insensitive)
    pub fn remove(&mut self, name: &str) -> Option<T> {
        self.entries.shift_remove(&fold_name(name))
    }

    /// Check if an entry exists (case-insensitive)
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(&fold_name(name))
    }

    /// Get the number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the table is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over all entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.values()
    }

    /// Get all entry names
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.values().map(|e| e.name())
    }
}

impl<T: TableObject> Default for Table<T> {
    fn default() -> Self {
        Self::new()
    }
}
