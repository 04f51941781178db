//! Block - a named container of entities and attribute definitions

use super::{
    BlockAttributeDefinitionChangeEventArgs, BlockConfiguration, BlockEntityChangeEventArgs,
    EndBlock, ANONYMOUS_BLOCK_PREFIXES, DEFAULT_MODEL_SPACE_NAME, DEFAULT_PAPER_SPACE_NAME,
    INTERNAL_USE_PREFIX,
};
use crate::collections::owner::OwnerAnchor;
use crate::collections::{OwnerRef, VetoableCollection};
use crate::entities::{AttributeDefinition, AttributeDefinitionRef, EntityObject, EntityRef};
use crate::error::{DxfError, Result};
use crate::notification::{ChangeNotifier, ChangedEventArgs};
use crate::tables::{names_equal, starts_with_ignore_case, BlockRecord, Layer, TableObject};
use crate::types::{Handle, Vector3};
use bitflags::bitflags;
use std::rc::Rc;
use tracing::debug;

bitflags! {
    /// Block-type flags (DXF group code 70), bit-coded and combinable.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct BlockTypeFlags: i16 {
        /// No flags.
        const NONE = 0;
        /// Anonymous block generated by hatching, dimensioning, etc.
        const ANONYMOUS_BLOCK = 1;
        /// Block has non-constant attribute definitions.
        const NON_CONSTANT_ATTRIBUTE_DEFINITIONS = 2;
        /// Block is an external reference.
        const XREF = 4;
        /// Block is an xref overlay.
        const XREF_OVERLAY = 8;
        /// Block is externally dependent.
        const EXTERNALLY_DEPENDENT = 16;
        /// Resolved external reference, or dependent of an external reference.
        const RESOLVED_EXTERNAL_REFERENCE = 32;
        /// Definition is a referenced external reference.
        const REFERENCED_EXTERNAL_REFERENCE = 64;
    }
}

/// Entities of a block, keyed by handle
pub type EntityCollection = VetoableCollection<Handle, EntityObject>;

/// Attribute definitions of a block, keyed by tag (case-insensitive)
pub type AttributeDefinitionDictionary = VetoableCollection<String, AttributeDefinition>;

/// What a block is built from
#[derive(Debug, Clone)]
pub enum BlockContent {
    /// External reference to another drawing
    XRef {
        /// Path of the referenced drawing
        file: String,
        /// Attach as overlay instead of attachment
        overlay: bool,
    },
    /// Local definition with initial content
    Local {
        entities: Vec<EntityRef>,
        attributes: Vec<AttributeDefinitionRef>,
    },
}

impl BlockContent {
    /// Local content with no entities or attributes
    pub fn empty() -> Self {
        BlockContent::Local {
            entities: Vec::new(),
            attributes: Vec::new(),
        }
    }
}

impl Default for BlockContent {
    fn default() -> Self {
        Self::empty()
    }
}

/// A block definition.
///
/// The block owns its entities, attribute definitions, end marker and
/// block record. The record stores the block's name, so block and record
/// can never disagree about it.
///
/// # Example
///
/// ```
/// use dxf_blocks::{Block, EntityObject, Handle};
///
/// let mut block = Block::new("Door")?;
/// let line = EntityObject::new(Handle::new(0x20), "LINE").into_ref();
/// block.entities_mut().add(line.clone())?;
///
/// assert!(block.owns_entity(&line));
/// assert_eq!(block.record().name(), "Door");
/// # Ok::<(), dxf_blocks::DxfError>(())
/// ```
#[derive(Debug)]
pub struct Block {
    record: BlockRecord,
    anchor: Rc<OwnerAnchor>,
    is_reserved: bool,
    for_internal_use: bool,
    description: String,
    origin: Vector3,
    layer: Layer,
    flags: BlockTypeFlags,
    xref_file: String,
    entities: EntityCollection,
    attributes: AttributeDefinitionDictionary,
    end: EndBlock,
    layer_changed: ChangeNotifier<Layer>,
}

impl Block {
    /// Create an empty local block
    pub fn new(name: impl Into<String>) -> Result<Self> {
        Self::with_configuration(name, BlockContent::empty(), &BlockConfiguration::default())
    }

    /// Create a local block seeded with entities and attribute definitions.
    ///
    /// Every item goes through the regular add protocol, so an item that
    /// already belongs to another block makes construction fail.
    pub fn with_content<E, A>(name: impl Into<String>, entities: E, attributes: A) -> Result<Self>
    where
        E: IntoIterator<Item = EntityRef>,
        A: IntoIterator<Item = AttributeDefinitionRef>,
    {
        let content = BlockContent::Local {
            entities: entities.into_iter().collect(),
            attributes: attributes.into_iter().collect(),
        };
        Self::with_configuration(name, content, &BlockConfiguration::default())
    }

    /// Create an external reference block
    pub fn xref(name: impl Into<String>, file: impl Into<String>, overlay: bool) -> Result<Self> {
        let content = BlockContent::XRef {
            file: file.into(),
            overlay,
        };
        Self::with_configuration(name, content, &BlockConfiguration::default())
    }

    /// Create a local block with a description and entities
    pub fn create<E>(name: impl Into<String>, description: impl Into<String>, entities: E) -> Result<Self>
    where
        E: IntoIterator<Item = EntityRef>,
    {
        let mut block = Self::with_content(name, entities, Vec::new())?;
        block.set_description(description);
        Ok(block)
    }

    /// Create a block from any content using explicit construction defaults
    pub fn with_configuration(
        name: impl Into<String>,
        content: BlockContent,
        config: &BlockConfiguration,
    ) -> Result<Self> {
        Self::build(name.into(), content, config, true)
    }

    /// Fresh model space block. Every call returns a new instance.
    pub fn model_space() -> Self {
        Self::bare(
            DEFAULT_MODEL_SPACE_NAME.to_string(),
            &BlockConfiguration::default(),
            String::new(),
            BlockTypeFlags::NONE,
        )
    }

    /// Fresh paper space block. Every call returns a new instance.
    pub fn paper_space() -> Self {
        Self::bare(
            DEFAULT_PAPER_SPACE_NAME.to_string(),
            &BlockConfiguration::default(),
            String::new(),
            BlockTypeFlags::NONE,
        )
    }

    /// `check_name = false` lets decoders and anonymous-block generators use
    /// names that regular validation rejects.
    pub(crate) fn build(
        name: String,
        content: BlockContent,
        config: &BlockConfiguration,
        check_name: bool,
    ) -> Result<Self> {
        if check_name {
            validate_name(&name)?;
        }

        match content {
            BlockContent::XRef { file, overlay } => {
                let mut flags = BlockTypeFlags::XREF | BlockTypeFlags::RESOLVED_EXTERNAL_REFERENCE;
                if overlay {
                    flags |= BlockTypeFlags::XREF_OVERLAY;
                }
                Ok(Self::bare(name, config, file, flags))
            }
            BlockContent::Local {
                entities,
                attributes,
            } => {
                let mut block = Self::bare(name, config, String::new(), BlockTypeFlags::NONE);
                block.entities.add_range(entities)?;
                block.attributes.add_range(attributes)?;
                Ok(block)
            }
        }
    }

    fn bare(name: String, config: &BlockConfiguration, xref_file: String, flags: BlockTypeFlags) -> Self {
        let anchor = OwnerAnchor::new_ref();
        let owner = OwnerRef::from_anchor(&anchor);
        let is_reserved = names_equal(&name, DEFAULT_MODEL_SPACE_NAME);
        let for_internal_use = starts_with_ignore_case(&name, INTERNAL_USE_PREFIX);

        Block {
            record: BlockRecord::new(name, config.default_units),
            is_reserved,
            for_internal_use,
            description: String::new(),
            origin: Vector3::ZERO,
            layer: config.default_layer.clone(),
            flags,
            xref_file,
            entities: VetoableCollection::new(owner.clone()),
            attributes: VetoableCollection::new(owner.clone()),
            end: EndBlock::new(owner),
            layer_changed: ChangeNotifier::new(),
            anchor,
        }
    }

    // ==================== Identity ====================

    pub fn handle(&self) -> Handle {
        self.anchor.handle()
    }

    /// Set the block handle. Event payloads report it through the block's
    /// [`OwnerRef`].
    pub fn set_handle(&mut self, handle: Handle) {
        self.anchor.set_handle(handle);
    }

    /// Block name; always equal to the record's name
    pub fn name(&self) -> &str {
        self.record.name()
    }

    /// Rename the block (and its record).
    ///
    /// Internal-use blocks (name starting with `*`) can only be renamed when
    /// they are anonymous (`*U...`, `*T...`); doing so clears
    /// [`BlockTypeFlags::ANONYMOUS_BLOCK`].
    pub fn set_name(&mut self, name: impl Into<String>) -> Result<()> {
        self.rename(name.into(), true)
    }

    pub(crate) fn rename(&mut self, name: String, check_name: bool) -> Result<()> {
        if check_name {
            validate_name(&name)?;
        }
        if self.for_internal_use {
            if !is_anonymous_name(self.name()) {
                return Err(DxfError::RenameForbidden(self.name().to_string()));
            }
            self.flags.remove(BlockTypeFlags::ANONYMOUS_BLOCK);
        }

        debug!(from = self.name(), to = %name, "block renamed");
        self.record.set_name(name);
        self.for_internal_use = starts_with_ignore_case(self.record.name(), INTERNAL_USE_PREFIX);
        Ok(())
    }

    /// All blocks whose name starts with "*" are for internal use only
    pub fn is_for_internal_use_only(&self) -> bool {
        self.for_internal_use
    }

    /// Only the model space block is reserved
    pub fn is_reserved(&self) -> bool {
        self.is_reserved
    }

    /// The block record paired with this block
    pub fn record(&self) -> &BlockRecord {
        &self.record
    }

    /// Mutable access to the record's layout, units and policy flags.
    /// The record name can only change through [`set_name`](Self::set_name).
    pub fn record_mut(&mut self) -> &mut BlockRecord {
        &mut self.record
    }

    /// Reference that this block's entities, attribute definitions and end
    /// marker point back to
    pub fn owner_ref(&self) -> OwnerRef {
        OwnerRef::from_anchor(&self.anchor)
    }

    /// The block end marker
    pub fn end(&self) -> &EndBlock {
        &self.end
    }

    pub fn end_mut(&mut self) -> &mut EndBlock {
        &mut self.end
    }

    // ==================== Properties ====================

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    /// Block origin in world coordinates; best left at zero
    pub fn origin(&self) -> Vector3 {
        self.origin
    }

    pub fn set_origin(&mut self, origin: Vector3) {
        self.origin = origin;
    }

    pub fn layer(&self) -> &Layer {
        &self.layer
    }

    /// Assign the block layer.
    ///
    /// `None` fails with [`DxfError::NullReference`] and keeps the current
    /// layer. Otherwise the layer-changed handler, if any, decides what is
    /// actually stored.
    pub fn set_layer(&mut self, layer: impl Into<Option<Layer>>) -> Result<()> {
        let layer = layer.into().ok_or(DxfError::NullReference("Layer"))?;
        let requested = layer.name.clone();
        let stored = self.layer_changed.raise(&self.layer, layer);
        if stored.name != requested {
            debug!(requested = %requested, stored = %stored.name, "layer substituted");
        }
        self.layer = stored;
        Ok(())
    }

    /// Block-type flags.
    ///
    /// [`BlockTypeFlags::NON_CONSTANT_ATTRIBUTE_DEFINITIONS`] is derived
    /// from the attribute definitions currently in the block.
    pub fn flags(&self) -> BlockTypeFlags {
        let mut flags = self.flags;
        let non_constant = self
            .attributes
            .iter()
            .any(|def| def.try_borrow().map_or(true, |def| !def.is_constant()));
        flags.set(BlockTypeFlags::NON_CONSTANT_ATTRIBUTE_DEFINITIONS, non_constant);
        flags
    }

    pub fn set_flags(&mut self, flags: BlockTypeFlags) {
        self.flags = flags;
    }

    /// External reference path, empty for local blocks
    pub fn xref_file(&self) -> &str {
        &self.xref_file
    }

    pub fn is_xref(&self) -> bool {
        self.flags.contains(BlockTypeFlags::XREF)
    }

    // ==================== Collections ====================

    pub fn entities(&self) -> &EntityCollection {
        &self.entities
    }

    pub fn entities_mut(&mut self) -> &mut EntityCollection {
        &mut self.entities
    }

    pub fn attribute_definitions(&self) -> &AttributeDefinitionDictionary {
        &self.attributes
    }

    pub fn attribute_definitions_mut(&mut self) -> &mut AttributeDefinitionDictionary {
        &mut self.attributes
    }

    /// Check whether `entity` currently belongs to this block
    pub fn owns_entity(&self, entity: &EntityRef) -> bool {
        let owner = self.owner_ref();
        entity
            .try_borrow()
            .map_or(false, |entity| entity.owner() == Some(&owner))
    }

    /// Check whether `definition` currently belongs to this block
    pub fn owns_attribute_definition(&self, definition: &AttributeDefinitionRef) -> bool {
        let owner = self.owner_ref();
        definition
            .try_borrow()
            .map_or(false, |definition| definition.owner() == Some(&owner))
    }

    // ==================== Events ====================

    /// Register the layer-changed handler, replacing any previous one
    pub fn on_layer_changed<F>(&mut self, handler: F)
    where
        F: FnMut(&mut ChangedEventArgs<'_, Layer>) + 'static,
    {
        self.layer_changed.subscribe(handler);
    }

    /// The layer-changed slot, e.g. to unsubscribe
    pub fn layer_changed(&mut self) -> &mut ChangeNotifier<Layer> {
        &mut self.layer_changed
    }

    /// Observe entities added to this block, replacing any previous
    /// observer. Runs after the entity collection's own after-add hook and
    /// is not affected by its hook setters.
    pub fn on_entity_added<F>(&mut self, mut handler: F)
    where
        F: FnMut(&BlockEntityChangeEventArgs<'_>) + 'static,
    {
        let block = self.owner_ref();
        self.entities.set_added_observer(move |item| {
            handler(&BlockEntityChangeEventArgs::new(&block, item))
        });
    }

    /// Observe entities removed from this block, replacing any previous
    /// observer.
    pub fn on_entity_removed<F>(&mut self, mut handler: F)
    where
        F: FnMut(&BlockEntityChangeEventArgs<'_>) + 'static,
    {
        let block = self.owner_ref();
        self.entities.set_removed_observer(move |item| {
            handler(&BlockEntityChangeEventArgs::new(&block, item))
        });
    }

    /// Observe attribute definitions added to this block
    pub fn on_attribute_definition_added<F>(&mut self, mut handler: F)
    where
        F: FnMut(&BlockAttributeDefinitionChangeEventArgs<'_>) + 'static,
    {
        let block = self.owner_ref();
        self.attributes.set_added_observer(move |item| {
            handler(&BlockAttributeDefinitionChangeEventArgs::new(&block, item))
        });
    }

    /// Observe attribute definitions removed from this block
    pub fn on_attribute_definition_removed<F>(&mut self, mut handler: F)
    where
        F: FnMut(&BlockAttributeDefinitionChangeEventArgs<'_>) + 'static,
    {
        let block = self.owner_ref();
        self.attributes.set_removed_observer(move |item| {
            handler(&BlockAttributeDefinitionChangeEventArgs::new(&block, item))
        });
    }
}

impl TableObject for Block {
    fn handle(&self) -> Handle {
        self.anchor.handle()
    }

    fn name(&self) -> &str {
        self.record.name()
    }

    fn is_reserved(&self) -> bool {
        self.is_reserved
    }

    /// A block is owned by its record
    fn owner(&self) -> Option<Handle> {
        Some(self.record.handle())
    }

    fn set_name(&mut self, name: String) -> Result<()> {
        self.rename(name, true)
    }
}

fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(DxfError::InvalidName(name.to_string()));
    }
    Ok(())
}

fn is_anonymous_name(name: &str) -> bool {
    ANONYMOUS_BLOCK_PREFIXES
        .iter()
        .any(|prefix| starts_with_ignore_case(name, prefix))
}
