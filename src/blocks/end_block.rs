//! EndBlock - marks the end of a block definition

use crate::collections::OwnerRef;
use crate::types::Handle;

/// Terminator of a block definition (ENDBLK).
///
/// Created once by its block and never handed to another one.
#[derive(Debug)]
pub struct EndBlock {
    handle: Handle,
    owner: OwnerRef,
}

impl EndBlock {
    pub(crate) fn new(owner: OwnerRef) -> Self {
        EndBlock {
            handle: Handle::NULL,
            owner,
        }
    }

    pub fn handle(&self) -> Handle {
        self.handle
    }

    pub fn set_handle(&mut self, handle: Handle) {
        self.handle = handle;
    }

    /// The block this terminator belongs to
    pub fn owner(&self) -> &OwnerRef {
        &self.owner
    }

    /// DXF entity type name
    pub fn entity_type(&self) -> &'static str {
        "ENDBLK"
    }
}
