//! Layer types for tile and object layers

use crate::document::LayerDocument;
use crate::{LoadError, ObjectRegion};

/// Layer class marking tiles drawn above entities
pub const OVERHEAD_CLASS: &str = "top";

/// A layer (tiles or objects)
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    pub name: String,
    pub visible: bool,
    /// Free-form class label, e.g. [`OVERHEAD_CLASS`]
    pub class: Option<String>,
    pub data: LayerData,
}

impl Layer {
    /// Create a new, empty tile layer
    pub fn new_tile_layer(name: String, width: u32, height: u32) -> Self {
        let size = width as usize * height as usize;
        Self {
            name,
            visible: true,
            class: None,
            data: LayerData::Tiles {
                width,
                height,
                tiles: vec![0; size],
            },
        }
    }

    /// Create a new object layer
    pub fn new_object_layer(name: String, regions: Vec<ObjectRegion>) -> Self {
        Self {
            name,
            visible: true,
            class: None,
            data: LayerData::Objects { regions },
        }
    }

    /// Convert a document layer, checking tile data matches the dimensions
    ///
    /// Returns `Ok(None)` for layer types the runtime does not use.
    pub fn from_document(layer: LayerDocument) -> Result<Option<Self>, LoadError> {
        match layer {
            LayerDocument::Tiles(tiles) => {
                let expected = tiles.width as usize * tiles.height as usize;
                if tiles.data.len() != expected {
                    return Err(LoadError::LayerSize {
                        layer: tiles.name,
                        width: tiles.width,
                        height: tiles.height,
                        expected,
                        actual: tiles.data.len(),
                    });
                }
                Ok(Some(Self {
                    name: tiles.name,
                    visible: tiles.visible,
                    class: tiles.class,
                    data: LayerData::Tiles {
                        width: tiles.width,
                        height: tiles.height,
                        tiles: tiles.data,
                    },
                }))
            }
            LayerDocument::Objects(objects) => Ok(Some(Self {
                name: objects.name,
                visible: objects.visible,
                class: objects.class,
                data: LayerData::Objects {
                    regions: objects.objects,
                },
            })),
            LayerDocument::Other => Ok(None),
        }
    }

    /// Get the type of this layer
    pub fn layer_type(&self) -> LayerType {
        match &self.data {
            LayerData::Tiles { .. } => LayerType::Tiles,
            LayerData::Objects { .. } => LayerType::Objects,
        }
    }

    /// Check if this layer is drawn above entities
    pub fn is_overhead(&self) -> bool {
        self.class.as_deref() == Some(OVERHEAD_CLASS)
    }

    /// Get (width, height) in tiles if this is a tile layer
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        match &self.data {
            LayerData::Tiles { width, height, .. } => Some((*width, *height)),
            LayerData::Objects { .. } => None,
        }
    }

    /// Object regions of this layer (empty for tile layers)
    pub fn regions(&self) -> &[ObjectRegion] {
        match &self.data {
            LayerData::Objects { regions } => regions,
            LayerData::Tiles { .. } => &[],
        }
    }
}

/// The type of a layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerType {
    Tiles,
    Objects,
}

/// The data contained in a layer
#[derive(Debug, Clone, PartialEq)]
pub enum LayerData {
    /// Tile layer with global tile ids
    Tiles {
        width: u32,
        height: u32,
        /// Row-major gids, 0 means empty. Length is `width * height`.
        tiles: Vec<u32>,
    },
    /// Object layer containing named regions
    Objects { regions: Vec<ObjectRegion> },
}
