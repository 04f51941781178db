//! Construction defaults for blocks

use crate::tables::Layer;
use crate::types::DrawingUnits;

/// Defaults applied when a block (and its record) is constructed.
///
/// Values are copied into each new block; changing a configuration later
/// does not affect blocks built from it.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockConfiguration {
    /// Insertion units seeded into every new block record.
    ///
    /// Default: `Unitless`.
    pub default_units: DrawingUnits,
    /// Layer assigned to every new block.
    ///
    /// Default: layer "0".
    pub default_layer: Layer,
}

impl BlockConfiguration {
    /// Builder: Set the default insertion units
    pub fn with_default_units(mut self, units: DrawingUnits) -> Self {
        self.default_units = units;
        self
    }

    /// Builder: Set the default layer
    pub fn with_default_layer(mut self, layer: Layer) -> Self {
        self.default_layer = layer;
        self
    }
}

impl Default for BlockConfiguration {
    fn default() -> Self {
        Self {
            default_units: DrawingUnits::Unitless,
            default_layer: Layer::layer_0(),
        }
    }
}
