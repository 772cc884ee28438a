//! Errors raised while turning a map description into a [`Tilemap`](crate::Tilemap)

use thiserror::Error;

/// Error type for map loading failures
///
/// Every variant is fatal: a map that fails any check is never exposed.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to read map: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse map JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Layer '{layer}' holds {actual} tiles but is {width}x{height} ({expected} expected)")]
    LayerSize {
        layer: String,
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
    #[error("Map has no tile layer")]
    NoTileLayer,
    #[error("Map tile size must be non-zero, got {width}x{height}")]
    TileSize { width: u32, height: u32 },
    #[error("Tileset '{name}' has firstgid 0")]
    FirstGidZero { name: String },
    #[error("Tileset '{name}' starts at gid {first_gid} but the previous tileset ends at {expected}")]
    TilesetGap {
        name: String,
        first_gid: u32,
        expected: u32,
    },
    #[error("Tileset '{name}' starts at gid {first_gid}, inside the previous tileset (ends at {expected})")]
    TilesetOverlap {
        name: String,
        first_gid: u32,
        expected: u32,
    },
    #[error("Tileset '{name}' is invalid: {reason}")]
    InvalidTileset { name: String, reason: String },
    #[error("Tileset at firstgid {first_gid} references '{path}' which was not loaded")]
    UnresolvedTileset { first_gid: u32, path: String },
    #[error("Layer '{layer}' cell {index} uses gid {gid}, which no tileset covers")]
    UnresolvedTile { layer: String, index: usize, gid: u32 },
}
