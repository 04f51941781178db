//! Entities owned by blocks
//!
//! The block model treats entities as opaque payloads: it only needs an
//! identity handle to key them by and a back-reference to the block that
//! owns them. Geometry lives with the encoder/decoder.

use crate::collections::{private, CollectionItem, ItemRef, OwnerRef};
use crate::types::Handle;
use std::cell::RefCell;
use std::rc::Rc;

pub mod attribute_definition;

pub use attribute_definition::{AttributeDefinition, AttributeDefinitionRef, AttributeFlags};

/// Shared handle to an entity
pub type EntityRef = ItemRef<EntityObject>;

/// A drawable entity stored in a block
#[derive(Debug)]
pub struct EntityObject {
    handle: Handle,
    entity_type: String,
    /// Layer name
    pub layer: String,
    owner: Option<OwnerRef>,
}

impl EntityObject {
    /// Create an unowned entity. `handle` is its key inside a block and must
    /// be unique there.
    pub fn new(handle: Handle, entity_type: impl Into<String>) -> Self {
        EntityObject {
            handle,
            entity_type: entity_type.into(),
            layer: "0".to_string(),
            owner: None,
        }
    }

    /// Builder: Set the layer name
    pub fn with_layer(mut self, layer: impl Into<String>) -> Self {
        self.layer = layer.into();
        self
    }

    /// Wrap into a shared handle ready to be added to a block
    pub fn into_ref(self) -> EntityRef {
        Rc::new(RefCell::new(self))
    }

    pub fn handle(&self) -> Handle {
        self.handle
    }

    /// DXF entity type name, e.g. `LINE`
    pub fn entity_type(&self) -> &str {
        &self.entity_type
    }

    /// The block this entity belongs to, if any
    pub fn owner(&self) -> Option<&OwnerRef> {
        self.owner.as_ref().filter(|owner| owner.is_alive())
    }
}

impl private::Sealed for EntityObject {
    fn set_owner(&mut self, owner: Option<OwnerRef>) {
        self.owner = owner;
    }
}

impl CollectionItem for EntityObject {
    type Key = Handle;

    fn key(&self) -> Handle {
        self.handle
    }

    fn owner(&self) -> Option<&OwnerRef> {
        self.owner.as_ref().filter(|owner| owner.is_alive())
    }
}
