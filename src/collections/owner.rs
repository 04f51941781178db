//! Non-owning back-references from collection items to their owner

use crate::types::Handle;
use std::cell::Cell;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::{Rc, Weak};

/// Identity anchor held by the object that owns collections.
///
/// Its address identifies the owner; items point at it weakly. The owner's
/// handle lives here so that back-references can report it.
#[derive(Debug, Default)]
pub(crate) struct OwnerAnchor {
    handle: Cell<Handle>,
}

impl OwnerAnchor {
    pub(crate) fn new_ref() -> Rc<OwnerAnchor> {
        Rc::new(OwnerAnchor::default())
    }

    pub(crate) fn handle(&self) -> Handle {
        self.handle.get()
    }

    pub(crate) fn set_handle(&self, handle: Handle) {
        self.handle.set(handle);
    }
}

/// Weak reference from an owned item (entity, attribute definition, end
/// block) back to the block that owns it.
///
/// Two references are equal when they point at the same owner. A reference
/// whose owner has been dropped is no longer alive and equals nothing but
/// references to that same dropped owner.
#[derive(Clone)]
pub struct OwnerRef(Weak<OwnerAnchor>);

impl OwnerRef {
    pub(crate) fn from_anchor(anchor: &Rc<OwnerAnchor>) -> Self {
        OwnerRef(Rc::downgrade(anchor))
    }

    /// Check whether the owner still exists
    pub fn is_alive(&self) -> bool {
        self.0.strong_count() > 0
    }

    /// Handle of the owner, or `None` once it has been dropped
    pub fn handle(&self) -> Option<Handle> {
        self.0.upgrade().map(|anchor| anchor.handle())
    }
}

impl PartialEq for OwnerRef {
    fn eq(&self, other: &Self) -> bool {
        Weak::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for OwnerRef {}

impl Hash for OwnerRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::ptr::hash(self.0.as_ptr(), state);
    }
}

impl fmt::Debug for OwnerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OwnerRef")
            .field("ptr", &self.0.as_ptr())
            .field("alive", &self.is_alive())
            .finish()
    }
}
