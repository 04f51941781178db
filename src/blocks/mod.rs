//! Block definitions and their owned collections

pub mod block;
pub mod configuration;
pub mod end_block;
pub mod events;

pub use block::{AttributeDefinitionDictionary, Block, BlockContent, BlockTypeFlags, EntityCollection};
pub use configuration::BlockConfiguration;
pub use end_block::EndBlock;
pub use events::{BlockAttributeDefinitionChangeEventArgs, BlockEntityChangeEventArgs};

/// Name of the model space block
pub const DEFAULT_MODEL_SPACE_NAME: &str = "*Model_Space";

/// Name of the (first) paper space block
pub const DEFAULT_PAPER_SPACE_NAME: &str = "*Paper_Space";

/// Blocks whose name starts with this prefix are for internal use only
pub const INTERNAL_USE_PREFIX: &str = "*";

/// Prefixes of anonymous blocks, the only internal-use blocks that may be renamed
pub const ANONYMOUS_BLOCK_PREFIXES: [&str; 2] = ["*U", "*T"];
