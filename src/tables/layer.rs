//! Layer table entry

use super::TableObject;
use crate::error::{DxfError, Result};
use crate::types::Handle;

/// Layer flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LayerFlags {
    /// Layer is frozen
    pub frozen: bool,
    /// Layer is locked
    pub locked: bool,
    /// Layer is off (invisible)
    pub off: bool,
}

/// A layer table entry, as referenced by blocks
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    /// Unique handle
    pub handle: Handle,
    /// Layer name
    pub name: String,
    /// Layer flags
    pub flags: LayerFlags,
    /// Line type name
    pub line_type: String,
}

impl Layer {
    /// Name of the layer every drawing contains
    pub const DEFAULT_NAME: &'static str = "0";

    /// Create a new layer with default settings
    pub fn new(name: impl Into<String>) -> Self {
        Layer {
            handle: Handle::NULL,
            name: name.into(),
            flags: LayerFlags::default(),
            line_type: "Continuous".to_string(),
        }
    }

    /// Create the standard "0" layer
    pub fn layer_0() -> Self {
        Self::new(Self::DEFAULT_NAME)
    }
}

impl Default for Layer {
    fn default() -> Self {
        Self::layer_0()
    }
}

impl TableObject for Layer {
    fn handle(&self) -> Handle {
        self.handle
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn is_reserved(&self) -> bool {
        self.name == Self::DEFAULT_NAME
    }

    /// Layer "0" keeps its name
    fn set_name(&mut self, name: String) -> Result<()> {
        if name.is_empty() {
            return Err(DxfError::InvalidName(name));
        }
        if self.is_reserved() {
            return Err(DxfError::RenameForbidden(self.name.clone()));
        }
        self.name = name;
        Ok(())
    }
}
