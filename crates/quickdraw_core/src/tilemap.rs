//! The validated, in-memory map
//!
//! A [`Tilemap`] is only ever built through [`Tilemap::from_document`], which
//! rejects the whole map on the first problem. Anything holding a `Tilemap`
//! may therefore rely on:
//! - every tile layer holding exactly `width * height` cells
//! - tileset ranges being sorted, contiguous and non-overlapping
//! - every non-zero cell resolving to a tileset image

use crate::document::TilemapDocument;
use crate::{Layer, LayerData, LoadError, ObjectRegion, TileSource, Tileset, TilesetRegistry};
use tracing::debug;

/// One non-empty cell of a tile layer, ready to draw
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TilePlacement<'a> {
    /// Cell index in the layer data
    pub index: usize,
    /// (column, row) in the layer grid
    pub cell: [u32; 2],
    pub gid: u32,
    pub tileset_index: usize,
    pub source: TileSource<'a>,
    /// Top-left corner in map pixels
    pub position: [f32; 2],
}

/// A loaded map: layers in authoring order plus the tileset registry
#[derive(Debug, Clone, PartialEq)]
pub struct Tilemap {
    tile_width: u32,
    tile_height: u32,
    layers: Vec<Layer>,
    tilesets: TilesetRegistry,
}

impl Tilemap {
    /// Validate a parsed document
    pub fn from_document(document: TilemapDocument) -> Result<Self, LoadError> {
        if document.tile_width == 0 || document.tile_height == 0 {
            return Err(LoadError::TileSize {
                width: document.tile_width,
                height: document.tile_height,
            });
        }

        let tilesets = document
            .tilesets
            .iter()
            .map(Tileset::from_entry)
            .collect::<Result<Vec<_>, _>>()?;
        let tilesets = TilesetRegistry::new(tilesets)?;

        let mut layers = Vec::with_capacity(document.layers.len());
        for layer in document.layers {
            match Layer::from_document(layer)? {
                Some(layer) => layers.push(layer),
                None => debug!("Skipping layer of unsupported type"),
            }
        }

        let map = Self {
            tile_width: document.tile_width,
            tile_height: document.tile_height,
            layers,
            tilesets,
        };
        map.check_tiles()?;
        Ok(map)
    }

    /// Parse and validate a map from a JSON string
    pub fn from_json_str(json: &str) -> Result<Self, LoadError> {
        Self::from_document(TilemapDocument::from_json_str(json)?)
    }

    /// Parse and validate a map from JSON bytes
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, LoadError> {
        Self::from_document(TilemapDocument::from_json_slice(bytes)?)
    }

    fn check_tiles(&self) -> Result<(), LoadError> {
        if self.tile_layers().next().is_none() {
            return Err(LoadError::NoTileLayer);
        }
        for layer in self.tile_layers() {
            let LayerData::Tiles { tiles, .. } = &layer.data else {
                continue;
            };
            for (index, &gid) in tiles.iter().enumerate() {
                if gid != 0 && self.tilesets.resolve(gid).is_none() {
                    return Err(LoadError::UnresolvedTile {
                        layer: layer.name.clone(),
                        index,
                        gid,
                    });
                }
            }
        }
        Ok(())
    }

    /// Size of one grid cell in pixels
    pub fn tile_size(&self) -> [u32; 2] {
        [self.tile_width, self.tile_height]
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn tilesets(&self) -> &TilesetRegistry {
        &self.tilesets
    }

    /// Tile layers in authoring order
    pub fn tile_layers(&self) -> impl Iterator<Item = &Layer> {
        self.layers
            .iter()
            .filter(|l| matches!(l.data, LayerData::Tiles { .. }))
    }

    /// Visible tile layers drawn below entities
    pub fn ground_layers(&self) -> impl Iterator<Item = &Layer> {
        self.tile_layers().filter(|l| l.visible && !l.is_overhead())
    }

    /// Visible tile layers drawn above entities
    pub fn overhead_layers(&self) -> impl Iterator<Item = &Layer> {
        self.tile_layers().filter(|l| l.visible && l.is_overhead())
    }

    /// Every region of every object layer, in authoring order
    pub fn object_regions(&self) -> impl Iterator<Item = &ObjectRegion> {
        self.layers.iter().flat_map(|l| l.regions())
    }

    /// Map size in tiles, taken from the first tile layer
    pub fn grid_size(&self) -> [u32; 2] {
        self.tile_layers()
            .find_map(|l| l.dimensions())
            .map(|(w, h)| [w, h])
            .unwrap_or_default()
    }

    /// Map size in pixels
    pub fn pixel_size(&self) -> [f32; 2] {
        let [w, h] = self.grid_size();
        [
            w as f32 * self.tile_width as f32,
            h as f32 * self.tile_height as f32,
        ]
    }

    /// Non-empty cells of a tile layer with their tileset source and position
    ///
    /// Yields nothing for object layers.
    pub fn placements<'a>(&'a self, layer: &'a Layer) -> impl Iterator<Item = TilePlacement<'a>> {
        let (width, height, tiles): (u32, u32, &[u32]) = match &layer.data {
            LayerData::Tiles {
                width,
                height,
                tiles,
            } => (*width, *height, tiles.as_slice()),
            LayerData::Objects { .. } => (0, 0, &[][..]),
        };
        let cells = width as usize * height as usize;
        debug_assert_eq!(
            tiles.len(),
            cells,
            "layer '{}' data does not match its dimensions",
            layer.name
        );

        tiles
            .iter()
            .enumerate()
            .take(cells)
            .filter(|(_, gid)| **gid != 0)
            .filter_map(move |(index, &gid)| {
                let resolved = self.tilesets.resolve(gid)?;
                let column = (index % width as usize) as u32;
                let row = (index / width as usize) as u32;
                Some(TilePlacement {
                    index,
                    cell: [column, row],
                    gid,
                    tileset_index: resolved.tileset_index,
                    source: resolved.source,
                    position: [
                        column as f32 * self.tile_width as f32,
                        row as f32 * self.tile_height as f32,
                    ],
                })
            })
    }
}
