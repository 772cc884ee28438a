//! Core map data for quickdraw
//!
//! This crate turns a layered, grid-based map description into validated
//! in-memory data:
//! - `TilemapDocument` - The raw map file (layers, objects, tileset references)
//! - `Tilemap` - A validated map ready for the runtime
//! - `Layer` - A single layer (tiles or object regions)
//! - `ObjectRegion` - Named, property-tagged rectangle from an object layer
//! - `TilesetRegistry` - Global tile id to tileset + source rect resolution
//! - `Rect` - Map-space rectangle used for colliders, doors and bodies

pub mod document;
mod error;
mod geometry;
mod layer;
mod region;
mod tilemap;
mod tileset;
mod value;

pub use document::TilemapDocument;
pub use error::LoadError;
pub use geometry::{Axis, Rect};
pub use layer::{Layer, LayerData, LayerType, OVERHEAD_CLASS};
pub use region::{ObjectRegion, RegionRole, MAP_PROPERTY, PAIR_PROPERTY, ROLE_PROPERTY};
pub use tilemap::{TilePlacement, Tilemap};
pub use tileset::{ResolvedTile, TileRect, TileSource, Tileset, TilesetImage, TilesetRegistry};
pub use value::{Property, Value};
