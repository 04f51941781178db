//! Block record table entry

use super::{names_equal, starts_with_ignore_case, TableObject};
use crate::blocks::{DEFAULT_MODEL_SPACE_NAME, DEFAULT_PAPER_SPACE_NAME, INTERNAL_USE_PREFIX};
use crate::types::{DrawingUnits, Handle};
use std::fmt;

/// The owner-side record of a block in the BLOCK_RECORD table.
///
/// Every [`Block`](crate::blocks::Block) holds exactly one record and the
/// record holds the block's name. Renames go through the block so the pair
/// can never disagree; the record only exposes a read accessor for it.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockRecord {
    handle: Handle,
    name: String,
    owner: Option<Handle>,
    layout: Option<Handle>,
    units: DrawingUnits,
    allow_exploding: bool,
    scale_uniformly: bool,
}

impl BlockRecord {
    /// Name validation is the caller's job; blocks may build records for
    /// internally synthesized names.
    pub(crate) fn new(name: impl Into<String>, units: DrawingUnits) -> Self {
        BlockRecord {
            handle: Handle::NULL,
            name: name.into(),
            owner: None,
            layout: None,
            units,
            allow_exploding: true,
            scale_uniformly: false,
        }
    }

    /// Block record names are case insensitive.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn set_name(&mut self, name: String) {
        self.name = name;
    }

    pub fn set_handle(&mut self, handle: Handle) {
        self.handle = handle;
    }

    /// Handle of the BLOCK_RECORD table that contains this record
    pub fn set_owner(&mut self, owner: Option<Handle>) {
        self.owner = owner;
    }

    /// Handle of the associated layout, if the block is a layout block
    pub fn layout(&self) -> Option<Handle> {
        self.layout
    }

    pub fn set_layout(&mut self, layout: Option<Handle>) {
        self.layout = layout;
    }

    /// Block insertion units
    pub fn units(&self) -> DrawingUnits {
        self.units
    }

    pub fn set_units(&mut self, units: DrawingUnits) {
        self.units = units;
    }

    /// Whether the block can be exploded (AutoCAD 2007 and later)
    pub fn allow_exploding(&self) -> bool {
        self.allow_exploding
    }

    pub fn set_allow_exploding(&mut self, allow: bool) {
        self.allow_exploding = allow;
    }

    /// Whether the block must be scaled uniformly (AutoCAD 2007 and later)
    pub fn scale_uniformly(&self) -> bool {
        self.scale_uniformly
    }

    pub fn set_scale_uniformly(&mut self, uniform: bool) {
        self.scale_uniformly = uniform;
    }

    /// Records whose name starts with "*" are for internal use and should
    /// not be modified.
    pub fn is_for_internal_use_only(&self) -> bool {
        starts_with_ignore_case(&self.name, INTERNAL_USE_PREFIX)
    }

    /// Check if this is the model space record
    pub fn is_model_space(&self) -> bool {
        names_equal(&self.name, DEFAULT_MODEL_SPACE_NAME)
    }

    /// Check if this is a paper space record (`*Paper_Space`, `*Paper_Space0`, ...)
    pub fn is_paper_space(&self) -> bool {
        starts_with_ignore_case(&self.name, DEFAULT_PAPER_SPACE_NAME)
    }

    /// Check if this record backs a layout
    pub fn is_layout(&self) -> bool {
        self.layout.is_some()
    }
}

impl TableObject for BlockRecord {
    fn handle(&self) -> Handle {
        self.handle
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn is_reserved(&self) -> bool {
        self.is_model_space()
    }

    fn owner(&self) -> Option<Handle> {
        self.owner
    }
}

impl fmt::Display for BlockRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
