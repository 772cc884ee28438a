//! Raw map description as written by the map editor
//!
//! These types mirror the JSON file one-to-one and perform no validation.
//! [`Tilemap::from_document`](crate::Tilemap::from_document) turns a
//! `TilemapDocument` into a checked [`Tilemap`](crate::Tilemap).

use crate::{LoadError, ObjectRegion};
use serde::{Deserialize, Serialize};

fn default_grid_size() -> u32 {
    16
}

fn default_visible() -> bool {
    true
}

/// A parsed but unvalidated map file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TilemapDocument {
    /// Width of a map grid cell in pixels
    #[serde(rename = "tilewidth", default = "default_grid_size")]
    pub tile_width: u32,
    /// Height of a map grid cell in pixels
    #[serde(rename = "tileheight", default = "default_grid_size")]
    pub tile_height: u32,
    /// Layers in authoring order, tile and object layers interleaved
    #[serde(default)]
    pub layers: Vec<LayerDocument>,
    #[serde(default)]
    pub tilesets: Vec<TilesetEntry>,
}

impl TilemapDocument {
    /// Parse a document from a JSON string
    pub fn from_json_str(json: &str) -> Result<Self, LoadError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse a document from JSON bytes
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, LoadError> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Tilesets that only reference an external file and still need loading
    pub fn external_tilesets_mut(&mut self) -> impl Iterator<Item = &mut TilesetEntry> {
        self.tilesets.iter_mut().filter(|t| t.needs_source())
    }
}

/// One entry of the `layers` array
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum LayerDocument {
    #[serde(rename = "tilelayer")]
    Tiles(TileLayerDocument),
    #[serde(rename = "objectgroup")]
    Objects(ObjectLayerDocument),
    /// Image layers, groups and anything newer; skipped on load
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TileLayerDocument {
    #[serde(default)]
    pub name: String,
    pub width: u32,
    pub height: u32,
    /// Row-major global tile ids, 0 marks an empty cell
    #[serde(default)]
    pub data: Vec<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    #[serde(default = "default_visible")]
    pub visible: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectLayerDocument {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub objects: Vec<ObjectRegion>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    #[serde(default = "default_visible")]
    pub visible: bool,
}

/// A tileset reference inside the map
///
/// The definition is either embedded in the map or lives in the external
/// file named by `source`, in which case the definition fields are empty
/// until the loader fills them in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TilesetEntry {
    #[serde(rename = "firstgid")]
    pub first_gid: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(flatten)]
    pub definition: TilesetDefinition,
}

impl TilesetEntry {
    /// Check whether this entry still has to be resolved from `source`
    pub fn needs_source(&self) -> bool {
        self.source.is_some() && self.definition.is_empty()
    }
}

/// Tileset fields shared by embedded and external tilesets
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TilesetDefinition {
    #[serde(default)]
    pub name: String,
    /// Sheet image; absent for image-collection tilesets
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(rename = "tilewidth", default)]
    pub tile_width: u32,
    #[serde(rename = "tileheight", default)]
    pub tile_height: u32,
    #[serde(rename = "tilecount", default)]
    pub tile_count: u32,
    #[serde(default)]
    pub columns: u32,
    #[serde(rename = "imagewidth", default)]
    pub image_width: u32,
    #[serde(rename = "imageheight", default)]
    pub image_height: u32,
    #[serde(default)]
    pub margin: u32,
    #[serde(default)]
    pub spacing: u32,
    /// Per-tile entries; carry their own image in collection tilesets
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tiles: Vec<CollectionTile>,
}

impl TilesetDefinition {
    /// Check if nothing beyond defaults was provided
    pub fn is_empty(&self) -> bool {
        self.image.is_none() && self.tile_count == 0 && self.tiles.is_empty()
    }
}

/// A tile entry of a tileset's `tiles` array
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionTile {
    /// Local tile id
    pub id: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(rename = "imagewidth", default)]
    pub image_width: u32,
    #[serde(rename = "imageheight", default)]
    pub image_height: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_layers_in_authoring_order() {
        let json = r#"{
            "tilewidth": 16, "tileheight": 16,
            "layers": [
                {"type": "tilelayer", "name": "ground", "width": 2, "height": 1, "data": [1, 2]},
                {"type": "objectgroup", "name": "walls", "objects": []},
                {"type": "imagelayer", "name": "sky", "image": "sky.png"},
                {"type": "tilelayer", "name": "roofs", "class": "top", "width": 2, "height": 1, "data": [0, 3]}
            ],
            "tilesets": []
        }"#;
        let doc = TilemapDocument::from_json_str(json).unwrap();

        assert_eq!(doc.layers.len(), 4);
        assert!(matches!(&doc.layers[0], LayerDocument::Tiles(l) if l.name == "ground"));
        assert!(matches!(&doc.layers[1], LayerDocument::Objects(l) if l.name == "walls"));
        assert!(matches!(doc.layers[2], LayerDocument::Other));
        assert!(
            matches!(&doc.layers[3], LayerDocument::Tiles(l) if l.class.as_deref() == Some("top"))
        );
    }

    #[test]
    fn test_grid_size_defaults() {
        let doc = TilemapDocument::from_json_str(r#"{"layers": []}"#).unwrap();
        assert_eq!(doc.tile_width, 16);
        assert_eq!(doc.tile_height, 16);
    }

    #[test]
    fn test_external_tileset_reference() {
        let json = r#"{
            "layers": [],
            "tilesets": [
                {"firstgid": 1, "source": "town.tsj"},
                {"firstgid": 65, "name": "props", "image": "props.png",
                 "tilewidth": 16, "tileheight": 16, "tilecount": 8, "columns": 4}
            ]
        }"#;
        let mut doc = TilemapDocument::from_json_str(json).unwrap();

        assert!(doc.tilesets[0].needs_source());
        assert!(!doc.tilesets[1].needs_source());
        assert_eq!(doc.external_tilesets_mut().count(), 1);
        assert_eq!(doc.tilesets[1].definition.columns, 4);
    }

    #[test]
    fn test_malformed_json_is_error() {
        let result = TilemapDocument::from_json_str(r#"{"layers": [{"type": "tilelayer"}]}"#);
        assert!(matches!(result, Err(LoadError::Json(_))));
    }
}
