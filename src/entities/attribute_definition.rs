//! AttributeDefinition - block attribute template

use crate::collections::{private, CollectionItem, ItemRef, OwnerRef};
use crate::error::{DxfError, Result};
use crate::tables::fold_name;
use crate::types::Handle;
use bitflags::bitflags;
use std::cell::RefCell;
use std::rc::Rc;

bitflags! {
    /// Attribute flags (DXF group code 70)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct AttributeFlags: i16 {
        /// Attribute is invisible
        const INVISIBLE = 1;
        /// Attribute is constant (value cannot be changed)
        const CONSTANT = 2;
        /// Verification required on input
        const VERIFY = 4;
        /// Attribute is preset (no prompt during insertion)
        const PRESET = 8;
        /// Attribute may not be moved relative to the block
        const LOCKED_POSITION = 16;
    }
}

/// Shared handle to an attribute definition
pub type AttributeDefinitionRef = ItemRef<AttributeDefinition>;

/// Template for the attributes of block inserts, keyed by tag
#[derive(Debug)]
pub struct AttributeDefinition {
    handle: Handle,
    tag: String,
    /// Prompt shown when inserting the block
    pub prompt: String,
    /// Default value
    pub value: String,
    pub flags: AttributeFlags,
    owner: Option<OwnerRef>,
}

impl AttributeDefinition {
    /// Create a definition. Tags must be non-empty and contain no spaces.
    pub fn new(tag: impl Into<String>) -> Result<Self> {
        let tag = tag.into();
        validate_tag(&tag)?;
        Ok(AttributeDefinition {
            handle: Handle::NULL,
            tag,
            prompt: String::new(),
            value: String::new(),
            flags: AttributeFlags::empty(),
            owner: None,
        })
    }

    /// Builder: Set the prompt
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    /// Builder: Set the default value
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    /// Builder: Set the flags
    pub fn with_flags(mut self, flags: AttributeFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Wrap into a shared handle ready to be added to a block
    pub fn into_ref(self) -> AttributeDefinitionRef {
        Rc::new(RefCell::new(self))
    }

    pub fn handle(&self) -> Handle {
        self.handle
    }

    pub fn set_handle(&mut self, handle: Handle) {
        self.handle = handle;
    }

    /// Attribute tag (case-insensitive key inside a block)
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Change the tag. Only allowed while the definition is not owned by a
    /// block, since the tag is its key there.
    pub fn set_tag(&mut self, tag: impl Into<String>) -> Result<()> {
        let tag = tag.into();
        validate_tag(&tag)?;
        if self.owner().is_some() {
            return Err(DxfError::OwnershipConflict { key: fold_name(&self.tag) });
        }
        self.tag = tag;
        Ok(())
    }

    pub fn is_constant(&self) -> bool {
        self.flags.contains(AttributeFlags::CONSTANT)
    }

    /// The block this definition belongs to, if any
    pub fn owner(&self) -> Option<&OwnerRef> {
        self.owner.as_ref().filter(|owner| owner.is_alive())
    }
}

fn validate_tag(tag: &str) -> Result<()> {
    if tag.is_empty() || tag.contains(char::is_whitespace) {
        return Err(DxfError::InvalidName(tag.to_string()));
    }
    Ok(())
}

impl private::Sealed for AttributeDefinition {
    fn set_owner(&mut self, owner: Option<OwnerRef>) {
        self.owner = owner;
    }
}

impl CollectionItem for AttributeDefinition {
    type Key = String;

    fn key(&self) -> String {
        fold_name(&self.tag)
    }

    fn normalize_key(key: &String) -> String {
        fold_name(key)
    }

    fn owner(&self) -> Option<&OwnerRef> {
        self.owner.as_ref().filter(|owner| owner.is_alive())
    }
}
