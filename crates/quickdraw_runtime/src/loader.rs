//! Loading maps from disk
//!
//! A map file may reference tilesets stored in their own JSON files through a
//! `source` path. [`load_tilemap`] reads those files next to the map and
//! merges them in before validation, so the resulting [`Tilemap`] is complete.
//!
//! Image paths inside an external tileset are relative to the tileset file;
//! they are rebased to be relative to the map file like every other image
//! path in the map.

use quickdraw_core::document::TilesetDefinition;
use quickdraw_core::{LoadError, Tilemap, TilemapDocument};
use std::path::Path;
use tracing::{debug, info};

/// Load and validate a map file, including its external tilesets
pub fn load_tilemap(path: &Path) -> Result<Tilemap, LoadError> {
    let bytes = std::fs::read(path)?;
    let mut document = TilemapDocument::from_json_slice(&bytes)?;

    let map_dir = path.parent().unwrap_or_else(|| Path::new(""));
    resolve_external_tilesets(&mut document, map_dir)?;

    let tilemap = Tilemap::from_document(document)?;
    info!(
        "Loaded map {} ({} layers, {} tilesets)",
        path.display(),
        tilemap.layers().len(),
        tilemap.tilesets().len()
    );
    Ok(tilemap)
}

/// Read every external tileset the document references from `map_dir`
pub fn resolve_external_tilesets(
    document: &mut TilemapDocument,
    map_dir: &Path,
) -> Result<(), LoadError> {
    for entry in document.external_tilesets_mut() {
        let Some(source) = entry.source.clone() else {
            continue;
        };
        let tileset_path = map_dir.join(&source);
        debug!("Reading external tileset {}", tileset_path.display());

        let bytes = std::fs::read(&tileset_path)?;
        let mut definition: TilesetDefinition = serde_json::from_slice(&bytes)?;
        if let Some(dir) = Path::new(&source).parent() {
            rebase_images(&mut definition, dir);
        }
        entry.definition = definition;
    }
    Ok(())
}

fn rebase(dir: &Path, image: &str) -> String {
    dir.join(image).to_string_lossy().into_owned()
}

fn rebase_images(definition: &mut TilesetDefinition, dir: &Path) {
    if dir.as_os_str().is_empty() {
        return;
    }
    if let Some(image) = &mut definition.image {
        *image = rebase(dir, image);
    }
    for tile in &mut definition.tiles {
        if let Some(image) = &mut tile.image {
            *image = rebase(dir, image);
        }
    }
}

/// Parse and validate a map from a JSON string
///
/// External tilesets cannot be resolved without a directory and fail the load.
pub fn load_tilemap_from_str(json: &str) -> Result<Tilemap, LoadError> {
    Tilemap::from_json_str(json)
}

/// Parse and validate a map from bytes
pub fn load_tilemap_from_bytes(bytes: &[u8]) -> Result<Tilemap, LoadError> {
    Tilemap::from_json_slice(bytes)
}

/// Parse and validate a map from a reader
pub fn load_tilemap_from_reader<R: std::io::Read>(reader: R) -> Result<Tilemap, LoadError> {
    let document: TilemapDocument = serde_json::from_reader(reader)?;
    Tilemap::from_document(document)
}
