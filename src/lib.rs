//! # dxf-blocks
//!
//! The block object model of a DXF drawing: blocks, their block records and
//! end markers, and the owned collections (entities, attribute definitions)
//! they contain.
//!
//! Encoding, geometry and the document container live elsewhere; this crate
//! keeps the ownership graph consistent while it is being edited.
//!
//! ## Quick Start
//!
//! ```rust
//! use dxf_blocks::{AttributeDefinition, Block, EntityObject, Handle};
//!
//! let line = EntityObject::new(Handle::new(0x30), "LINE").into_ref();
//! let tag = AttributeDefinition::new("PARTNO")?.into_ref();
//!
//! let mut block = Block::with_content("Bolt", vec![line.clone()], vec![tag])?;
//! block.set_name("Bolt_M8")?;
//! assert_eq!(block.record().name(), "Bolt_M8");
//!
//! // Moving an entity to another block goes through remove-then-add.
//! let mut other = Block::new("Nut")?;
//! let line = block.entities_mut().remove(&Handle::new(0x30))?;
//! other.entities_mut().add(line)?;
//! # Ok::<(), dxf_blocks::DxfError>(())
//! ```
//!
//! ## Architecture
//!
//! - [`VetoableCollection`] - owned collection with before/after add and
//!   remove hooks
//! - [`ChangeNotifier`] - single-handler slot that can override a new value
//! - [`TableObject`] - trait for named table entries
//! - [`Block`], [`BlockRecord`], [`EndBlock`] - the block triple
//!
//! Everything is single-threaded (`Rc`/`RefCell`); hooks run synchronously
//! on the caller's thread.

#![allow(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod blocks;
pub mod collections;
pub mod entities;
pub mod error;
pub mod notification;
pub mod tables;
pub mod types;

// Re-export commonly used types
pub use error::{DxfError, Result};
pub use types::{DrawingUnits, Handle, Vector3};

pub use blocks::{
    AttributeDefinitionDictionary, Block, BlockAttributeDefinitionChangeEventArgs,
    BlockConfiguration, BlockContent, BlockEntityChangeEventArgs, BlockTypeFlags, EndBlock,
    EntityCollection, ANONYMOUS_BLOCK_PREFIXES, DEFAULT_MODEL_SPACE_NAME,
    DEFAULT_PAPER_SPACE_NAME, INTERNAL_USE_PREFIX,
};
pub use collections::{CollectionItem, ItemRef, OwnerRef, VetoableCollection};
pub use entities::{
    AttributeDefinition, AttributeDefinitionRef, AttributeFlags, EntityObject, EntityRef,
};
pub use notification::{ChangeNotifier, ChangedEventArgs};
pub use tables::{BlockRecord, Layer, LayerFlags, Table, TableObject};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
