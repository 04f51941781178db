//! Payloads of block-level collection notifications

use crate::collections::OwnerRef;
use crate::entities::{AttributeDefinition, EntityObject};
use crate::types::Handle;

/// Passed to observers when an entity is added to or removed from a block
#[derive(Debug, Clone, Copy)]
pub struct BlockEntityChangeEventArgs<'a> {
    block: &'a OwnerRef,
    item: &'a EntityObject,
}

impl<'a> BlockEntityChangeEventArgs<'a> {
    pub fn new(block: &'a OwnerRef, item: &'a EntityObject) -> Self {
        Self { block, item }
    }

    /// The block raising the event
    pub fn block(&self) -> &'a OwnerRef {
        self.block
    }

    /// Handle of the block raising the event
    pub fn block_handle(&self) -> Option<Handle> {
        self.block.handle()
    }

    /// The entity being added or removed
    pub fn item(&self) -> &'a EntityObject {
        self.item
    }
}

/// Passed to observers when an attribute definition is added to or removed
/// from a block
#[derive(Debug, Clone, Copy)]
pub struct BlockAttributeDefinitionChangeEventArgs<'a> {
    block: &'a OwnerRef,
    item: &'a AttributeDefinition,
}

impl<'a> BlockAttributeDefinitionChangeEventArgs<'a> {
    pub fn new(block: &'a OwnerRef, item: &'a AttributeDefinition) -> Self {
        Self { block, item }
    }

    /// The block raising the event
    pub fn block(&self) -> &'a OwnerRef {
        self.block
    }

    /// Handle of the block raising the event
    pub fn block_handle(&self) -> Option<Handle> {
        self.block.handle()
    }

    /// The attribute definition being added or removed
    pub fn item(&self) -> &'a AttributeDefinition {
        self.item
    }
}
