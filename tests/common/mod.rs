//! Shared test utilities for dxf-blocks integration tests.
//!
//! Builders for entities, attribute definitions and populated blocks, plus
//! an event recorder that hooks every block-level notification.

#![allow(dead_code)]

use dxf_blocks::{
    AttributeDefinition, AttributeDefinitionRef, Block, EntityObject, EntityRef, Handle,
};
use std::cell::RefCell;
use std::rc::Rc;

/// Entity types cycled through by [`entities`]
const ENTITY_TYPES: [&str; 4] = ["LINE", "CIRCLE", "ARC", "TEXT"];

/// Create an unowned entity with the given handle.
pub fn entity(handle: u64) -> EntityRef {
    let kind = ENTITY_TYPES[handle as usize % ENTITY_TYPES.len()];
    EntityObject::new(Handle::new(handle), kind).into_ref()
}

/// Create `count` entities with handles starting at `first`.
pub fn entities(first: u64, count: u64) -> Vec<EntityRef> {
    (first..first + count).map(entity).collect()
}

/// Create an unowned attribute definition.
pub fn attdef(tag: &str) -> AttributeDefinitionRef {
    AttributeDefinition::new(tag)
        .expect("test tags are valid")
        .with_prompt(format!("Enter {tag}"))
        .into_ref()
}

/// Create `count` attribute definitions tagged `TAG0`, `TAG1`, ...
pub fn attdefs(count: usize) -> Vec<AttributeDefinitionRef> {
    (0..count).map(|i| attdef(&format!("TAG{i}"))).collect()
}

/// Build a block holding `entity_count` entities and `attdef_count`
/// attribute definitions.
pub fn populated_block(name: &str, entity_count: u64, attdef_count: usize) -> Block {
    Block::with_content(name, entities(1, entity_count), attdefs(attdef_count))
        .expect("populated block builds")
}

/// Records every block-level notification as a readable line.
#[derive(Debug, Default, Clone)]
pub struct EventLog(Rc<RefCell<Vec<String>>>);

impl EventLog {
    /// Subscribe to all four collection notifications of `block`.
    pub fn attach(block: &mut Block) -> Self {
        let log = EventLog::default();

        let l = log.clone();
        block.on_entity_added(move |args| l.push(format!("+entity {}", args.item().handle())));
        let l = log.clone();
        block.on_entity_removed(move |args| l.push(format!("-entity {}", args.item().handle())));
        let l = log.clone();
        block.on_attribute_definition_added(move |args| {
            l.push(format!("+attdef {}", args.item().tag()))
        });
        let l = log.clone();
        block.on_attribute_definition_removed(move |args| {
            l.push(format!("-attdef {}", args.item().tag()))
        });

        log
    }

    fn push(&self, line: String) {
        self.0.borrow_mut().push(line);
    }

    pub fn lines(&self) -> Vec<String> {
        self.0.borrow().clone()
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.0.borrow().iter().filter(|l| l.starts_with(prefix)).count()
    }
}
