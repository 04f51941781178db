//! Error types for dxf-blocks

use thiserror::Error;

/// Main error type for block and collection operations
#[derive(Debug, Error)]
pub enum DxfError {
    /// Name is empty where a name is required
    #[error("Invalid name: {0:?}")]
    InvalidName(String),

    /// Attempt to rename an internal-use block that is not anonymous
    #[error("Blocks for internal use cannot be renamed: {0}")]
    RenameForbidden(String),

    /// A required reference was supplied as absent
    #[error("{0} cannot be null")]
    NullReference(&'static str),

    /// Collection add with a key that is already present
    #[error("Duplicate key: {0}")]
    DuplicateKey(String),

    /// Item already belongs to another collection
    #[error("Item {key} is already owned by another collection")]
    OwnershipConflict { key: String },

    /// Lookup by name or key with no match
    #[error("Not found: {0}")]
    NotFound(String),

    /// Item is borrowed elsewhere while a collection tries to mutate it
    #[error("Item is in use and cannot be mutated: {0}")]
    ItemInUse(String),

    /// Generic error with custom message, used by veto handlers
    #[error("{0}")]
    Custom(String),
}

/// Result type alias for dxf-blocks operations
pub type Result<T> = std::result::Result<T, DxfError>;

impl DxfError {
    /// Check whether this is a failed lookup rather than a contract violation
    pub fn is_not_found(&self) -> bool {
        matches!(self, DxfError::NotFound(_))
    }
}

impl From<String> for DxfError {
    fn from(s: String) -> Self {
        DxfError::Custom(s)
    }
}

impl From<&str> for DxfError {
    fn from(s: &str) -> Self {
        DxfError::Custom(s.to_string())
    }
}
