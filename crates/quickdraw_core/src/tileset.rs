//! Tilesets and global tile id resolution
//!
//! A map references several tilesets, each owning a contiguous range of
//! global tile ids (gids) starting at its `first_gid`. The
//! [`TilesetRegistry`] keeps them sorted and resolves a gid to its tileset and
//! the pixel rectangle inside the tileset image.

use crate::document::TilesetEntry;
use crate::LoadError;
use std::ops::Range;

/// Pixel rectangle inside a tileset image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TileRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl TileRect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Where to read the pixels of one tile from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileSource<'a> {
    /// Image path as written in the map (relative to the map file)
    pub image: &'a str,
    pub rect: TileRect,
}

/// A single image of an image-collection tileset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TilesetImage {
    /// Local tile id this image stands for
    pub id: u32,
    pub path: String,
    pub width: u32,
    pub height: u32,
}

/// Tileset configuration - either one sheet image or one image per tile
#[derive(Debug, Clone, PartialEq)]
pub struct Tileset {
    pub name: String,
    pub first_gid: u32,
    pub tile_width: u32,
    pub tile_height: u32,
    pub tile_count: u32,
    /// Sheet image path, `None` for image collections
    pub path: Option<String>,
    /// Tiles per sheet row
    pub columns: u32,
    pub image_width: u32,
    pub image_height: u32,
    pub margin: u32,
    pub spacing: u32,
    /// Per-tile images for image collections
    pub images: Vec<TilesetImage>,
}

/// How many cells of `cell` pixels fit along `extent`, between margins and
/// separated by `spacing`
fn fitting_cells(extent: u32, cell: u32, spacing: u32, margin: u32) -> u32 {
    let usable = u64::from(extent).saturating_sub(2 * u64::from(margin)) + u64::from(spacing);
    let cells = usable / (u64::from(cell) + u64::from(spacing));
    u32::try_from(cells).unwrap_or(u32::MAX)
}

/// Pixels taken by `count` cells, their spacing and both margins
fn grid_extent(count: u32, cell: u32, spacing: u32, margin: u32) -> Option<u32> {
    margin
        .checked_mul(2)?
        .checked_add(count.checked_mul(cell)?)?
        .checked_add(count.saturating_sub(1).checked_mul(spacing)?)
}

impl Tileset {
    /// Create a sheet tileset with no margin or spacing
    pub fn new_sheet(
        name: String,
        path: String,
        first_gid: u32,
        tile_width: u32,
        tile_height: u32,
        columns: u32,
        tile_count: u32,
    ) -> Self {
        let rows = tile_count.div_ceil(columns.max(1));
        Self {
            name,
            first_gid,
            tile_width,
            tile_height,
            tile_count,
            path: Some(path),
            columns,
            image_width: columns.saturating_mul(tile_width),
            image_height: rows.saturating_mul(tile_height),
            margin: 0,
            spacing: 0,
            images: Vec::new(),
        }
    }

    /// Create an image-collection tileset
    pub fn new_collection(name: String, first_gid: u32, images: Vec<TilesetImage>) -> Self {
        let tile_width = images.iter().map(|i| i.width).max().unwrap_or(0);
        let tile_height = images.iter().map(|i| i.height).max().unwrap_or(0);
        Self {
            name,
            first_gid,
            tile_width,
            tile_height,
            tile_count: images.len() as u32,
            path: None,
            columns: 0,
            image_width: 0,
            image_height: 0,
            margin: 0,
            spacing: 0,
            images,
        }
    }

    /// Build a tileset from a map entry, checking it is usable
    pub fn from_entry(entry: &TilesetEntry) -> Result<Self, LoadError> {
        if entry.needs_source() {
            return Err(LoadError::UnresolvedTileset {
                first_gid: entry.first_gid,
                path: entry.source.clone().unwrap_or_default(),
            });
        }

        let def = &entry.definition;
        let name = if def.name.is_empty() {
            format!("tileset@{}", entry.first_gid)
        } else {
            def.name.clone()
        };
        if entry.first_gid == 0 {
            return Err(LoadError::FirstGidZero { name });
        }
        let invalid = |reason: &str| LoadError::InvalidTileset {
            name: name.clone(),
            reason: reason.to_string(),
        };

        let tileset = if let Some(path) = &def.image {
            if def.tile_width == 0 || def.tile_height == 0 {
                return Err(invalid("tile size is zero"));
            }
            let columns = if def.columns > 0 {
                def.columns
            } else {
                fitting_cells(def.image_width, def.tile_width, def.spacing, def.margin)
            };
            if columns == 0 {
                return Err(invalid("no column count and no usable image width"));
            }
            let tile_count = if def.tile_count > 0 {
                def.tile_count
            } else {
                fitting_cells(def.image_height, def.tile_height, def.spacing, def.margin)
                    .checked_mul(columns)
                    .ok_or_else(|| invalid("tile count overflows"))?
            };
            if tile_count == 0 {
                return Err(invalid("tileset has no tiles"));
            }
            let rows = tile_count.div_ceil(columns);
            let width = grid_extent(columns, def.tile_width, def.spacing, def.margin)
                .ok_or_else(|| invalid("sheet width overflows"))?;
            let height = grid_extent(rows, def.tile_height, def.spacing, def.margin)
                .ok_or_else(|| invalid("sheet height overflows"))?;
            if def.image_width > 0 && width > def.image_width {
                return Err(invalid(&format!(
                    "{columns} columns need {width}px but the image is {}px wide",
                    def.image_width
                )));
            }
            if def.image_height > 0 && height > def.image_height {
                return Err(invalid(&format!(
                    "{rows} rows need {height}px but the image is {}px high",
                    def.image_height
                )));
            }

            Self {
                name: name.clone(),
                first_gid: entry.first_gid,
                tile_width: def.tile_width,
                tile_height: def.tile_height,
                tile_count,
                path: Some(path.clone()),
                columns,
                image_width: def.image_width.max(width),
                image_height: def.image_height.max(height),
                margin: def.margin,
                spacing: def.spacing,
                images: Vec::new(),
            }
        } else {
            let images: Vec<TilesetImage> = def
                .tiles
                .iter()
                .filter_map(|tile| {
                    let path = tile.image.clone()?;
                    Some(TilesetImage {
                        id: tile.id,
                        path,
                        width: tile.image_width,
                        height: tile.image_height,
                    })
                })
                .collect();
            if images.is_empty() {
                return Err(invalid("no sheet image and no tile images"));
            }
            let mut tileset = Self::new_collection(name.clone(), entry.first_gid, images);
            tileset.tile_width = def.tile_width.max(tileset.tile_width);
            tileset.tile_height = def.tile_height.max(tileset.tile_height);
            tileset.tile_count = def.tile_count.max(tileset.tile_count);
            tileset
        };

        if tileset.first_gid.checked_add(tileset.gid_span()).is_none() {
            return Err(invalid("gid range runs past u32::MAX"));
        }
        Ok(tileset)
    }

    /// Check if this tileset uses one image per tile
    pub fn is_collection(&self) -> bool {
        self.path.is_none()
    }

    /// Number of gids this tileset reserves
    ///
    /// Collections may have gaps in their local ids, so they reserve up to
    /// their highest id.
    pub fn gid_span(&self) -> u32 {
        let highest = self.images.iter().map(|i| i.id.saturating_add(1)).max().unwrap_or(0);
        self.tile_count.max(highest)
    }

    /// Range of global ids owned by this tileset
    pub fn gid_range(&self) -> Range<u32> {
        self.first_gid..self.first_gid.saturating_add(self.gid_span())
    }

    /// Check whether a global id falls in this tileset's range
    pub fn contains_gid(&self, gid: u32) -> bool {
        self.gid_range().contains(&gid)
    }

    /// Convert a local tile id to (column, row) within the sheet
    pub fn local_to_grid(&self, local_id: u32) -> Option<(u32, u32)> {
        if self.is_collection() || local_id >= self.tile_count || self.columns == 0 {
            return None;
        }
        Some((local_id % self.columns, local_id / self.columns))
    }

    /// Get the image and pixel rectangle for a local tile id
    pub fn local_source(&self, local_id: u32) -> Option<TileSource<'_>> {
        match &self.path {
            Some(path) => {
                let (col, row) = self.local_to_grid(local_id)?;
                Some(TileSource {
                    image: path,
                    rect: TileRect::new(
                        self.margin + col * (self.tile_width + self.spacing),
                        self.margin + row * (self.tile_height + self.spacing),
                        self.tile_width,
                        self.tile_height,
                    ),
                })
            }
            None => {
                let image = self.images.iter().find(|img| img.id == local_id)?;
                Some(TileSource {
                    image: &image.path,
                    rect: TileRect::new(0, 0, image.width, image.height),
                })
            }
        }
    }
}

/// A global id resolved against the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedTile<'a> {
    /// Index into the registry (ascending `first_gid` order)
    pub tileset_index: usize,
    /// Id relative to the owning tileset
    pub local_id: u32,
    pub source: TileSource<'a>,
}

/// Tilesets of one map, sorted by `first_gid` with contiguous gid ranges
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TilesetRegistry {
    tilesets: Vec<Tileset>,
}

impl TilesetRegistry {
    /// Sort the tilesets and check their ranges neither overlap nor leave gaps
    pub fn new(mut tilesets: Vec<Tileset>) -> Result<Self, LoadError> {
        tilesets.sort_by_key(|t| t.first_gid);

        for pair in tilesets.windows(2) {
            let (prev, next) = (&pair[0], &pair[1]);
            let expected = prev.gid_range().end;
            if next.first_gid < expected {
                return Err(LoadError::TilesetOverlap {
                    name: next.name.clone(),
                    first_gid: next.first_gid,
                    expected,
                });
            }
            if next.first_gid > expected {
                return Err(LoadError::TilesetGap {
                    name: next.name.clone(),
                    first_gid: next.first_gid,
                    expected,
                });
            }
        }

        Ok(Self { tilesets })
    }

    pub fn len(&self) -> usize {
        self.tilesets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tilesets.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Tileset> {
        self.tilesets.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tileset> {
        self.tilesets.iter()
    }

    /// Every gid covered by the registry
    pub fn gid_range(&self) -> Option<Range<u32>> {
        let first = self.tilesets.first()?;
        let last = self.tilesets.last()?;
        Some(first.first_gid..last.gid_range().end)
    }

    /// Find the index of the tileset owning `gid`
    ///
    /// The owner is the last tileset whose `first_gid` is not above `gid`.
    pub fn resolve_index(&self, gid: u32) -> Option<usize> {
        if gid == 0 {
            return None;
        }
        let index = self
            .tilesets
            .partition_point(|t| t.first_gid <= gid)
            .checked_sub(1)?;
        self.tilesets[index].contains_gid(gid).then_some(index)
    }

    /// Resolve a gid to its tileset and source rectangle
    pub fn resolve(&self, gid: u32) -> Option<ResolvedTile<'_>> {
        let tileset_index = self.resolve_index(gid)?;
        let tileset = &self.tilesets[tileset_index];
        let local_id = gid - tileset.first_gid;
        let source = tileset.local_source(local_id)?;
        Some(ResolvedTile {
            tileset_index,
            local_id,
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::TilesetDefinition;

    fn sheet(name: &str, first_gid: u32, columns: u32, count: u32) -> Tileset {
        Tileset::new_sheet(
            name.to_string(),
            format!("{name}.png"),
            first_gid,
            16,
            16,
            columns,
            count,
        )
    }

    #[test]
    fn test_sheet_source_rect() {
        let tileset = sheet("town", 1, 4, 16);

        assert_eq!(tileset.local_to_grid(0), Some((0, 0)));
        assert_eq!(tileset.local_to_grid(5), Some((1, 1)));
        assert_eq!(tileset.local_to_grid(16), None);

        let source = tileset.local_source(6).unwrap();
        assert_eq!(source.image, "town.png");
        assert_eq!(source.rect, TileRect::new(32, 16, 16, 16));
    }

    #[test]
    fn test_resolve_picks_last_tileset_not_above_gid() {
        let registry = TilesetRegistry::new(vec![
            sheet("props", 17, 2, 4),
            sheet("town", 1, 4, 16),
            sheet("water", 21, 1, 2),
        ])
        .unwrap();

        assert_eq!(registry.get(0).unwrap().name, "town");
        assert_eq!(registry.resolve_index(0), None);
        assert_eq!(registry.resolve_index(1), Some(0));
        assert_eq!(registry.resolve_index(16), Some(0));
        assert_eq!(registry.resolve_index(17), Some(1));
        assert_eq!(registry.resolve_index(20), Some(1));
        assert_eq!(registry.resolve_index(22), Some(2));
        assert_eq!(registry.resolve_index(23), None);

        let tile = registry.resolve(19).unwrap();
        assert_eq!(tile.tileset_index, 1);
        assert_eq!(tile.local_id, 2);
        assert_eq!(tile.source.rect, TileRect::new(0, 16, 16, 16));
    }

    #[test]
    fn test_every_gid_resolves_inside_its_image() {
        let registry = TilesetRegistry::new(vec![
            sheet("town", 1, 4, 14),
            sheet("props", 15, 3, 9),
            sheet("water", 24, 1, 3),
        ])
        .unwrap();

        let range = registry.gid_range().unwrap();
        assert_eq!(range, 1..27);
        for gid in range {
            let tile = registry.resolve(gid).unwrap();
            let tileset = registry.get(tile.tileset_index).unwrap();
            assert!(tileset.contains_gid(gid));
            let owners = registry.iter().filter(|t| t.contains_gid(gid)).count();
            assert_eq!(owners, 1, "gid {gid} owned by {owners} tilesets");
            let rect = tile.source.rect;
            assert!(rect.x + rect.width <= tileset.image_width);
            assert!(rect.y + rect.height <= tileset.image_height);
        }
    }

    #[test]
    fn test_gap_and_overlap_are_rejected() {
        let gap = TilesetRegistry::new(vec![sheet("town", 1, 4, 16), sheet("props", 18, 2, 4)]);
        assert!(matches!(
            gap,
            Err(LoadError::TilesetGap { first_gid: 18, expected: 17, .. })
        ));

        let overlap =
            TilesetRegistry::new(vec![sheet("town", 1, 4, 16), sheet("props", 10, 2, 4)]);
        assert!(matches!(
            overlap,
            Err(LoadError::TilesetOverlap { first_gid: 10, expected: 17, .. })
        ));
    }

    #[test]
    fn test_spacing_and_margin() {
        let mut tileset = sheet("padded", 1, 2, 4);
        tileset.margin = 1;
        tileset.spacing = 2;

        let source = tileset.local_source(3).unwrap();
        assert_eq!(source.rect, TileRect::new(19, 19, 16, 16));
    }

    #[test]
    fn test_columns_derived_from_image_width() {
        let entry = TilesetEntry {
            first_gid: 1,
            source: None,
            definition: TilesetDefinition {
                name: "town".to_string(),
                image: Some("town.png".to_string()),
                tile_width: 16,
                tile_height: 16,
                image_width: 128,
                image_height: 64,
                ..Default::default()
            },
        };
        let tileset = Tileset::from_entry(&entry).unwrap();

        assert_eq!(tileset.columns, 8);
        assert_eq!(tileset.tile_count, 32);
    }

    fn town_entry(first_gid: u32, definition: TilesetDefinition) -> TilesetEntry {
        TilesetEntry {
            first_gid,
            source: None,
            definition: TilesetDefinition {
                name: "town".to_string(),
                image: Some("town.png".to_string()),
                ..definition
            },
        }
    }

    fn invalid_reason(entry: &TilesetEntry) -> String {
        match Tileset::from_entry(entry) {
            Err(LoadError::InvalidTileset { name, reason }) => {
                assert_eq!(name, "town");
                reason
            }
            other => panic!("Expected InvalidTileset, got {other:?}"),
        }
    }

    #[test]
    fn test_gid_range_past_u32_max_is_rejected() {
        let entry = town_entry(
            4_294_967_290,
            TilesetDefinition {
                tile_width: 16,
                tile_height: 16,
                tile_count: 10,
                columns: 10,
                ..Default::default()
            },
        );
        assert!(invalid_reason(&entry).contains("u32::MAX"));

        let fits = town_entry(
            4_294_967_285,
            TilesetDefinition {
                tile_width: 16,
                tile_height: 16,
                tile_count: 10,
                columns: 10,
                ..Default::default()
            },
        );
        let tileset = Tileset::from_entry(&fits).unwrap();
        assert_eq!(tileset.gid_range().end, u32::MAX);
    }

    #[test]
    fn test_oversized_sheet_is_rejected() {
        let entry = town_entry(
            1,
            TilesetDefinition {
                tile_width: 70_000,
                tile_height: 16,
                tile_count: 70_000,
                columns: 70_000,
                ..Default::default()
            },
        );
        assert!(invalid_reason(&entry).contains("overflows"));

        let entry = town_entry(
            1,
            TilesetDefinition {
                tile_width: 16,
                tile_height: 16,
                image_width: u32::MAX,
                image_height: u32::MAX,
                margin: u32::MAX,
                ..Default::default()
            },
        );
        assert!(Tileset::from_entry(&entry).is_err());
    }

    #[test]
    fn test_columns_must_fit_the_image() {
        let entry = town_entry(
            1,
            TilesetDefinition {
                tile_width: 16,
                tile_height: 16,
                tile_count: 4,
                columns: 4,
                image_width: 32,
                image_height: 16,
                ..Default::default()
            },
        );
        assert!(invalid_reason(&entry).contains("columns"));

        let entry = town_entry(
            1,
            TilesetDefinition {
                tile_width: 16,
                tile_height: 16,
                tile_count: 8,
                columns: 2,
                image_width: 32,
                image_height: 32,
                ..Default::default()
            },
        );
        assert!(invalid_reason(&entry).contains("rows"));

        // Margin and spacing count towards the needed size
        let padded = town_entry(
            1,
            TilesetDefinition {
                tile_width: 16,
                tile_height: 16,
                tile_count: 4,
                columns: 2,
                image_width: 36,
                image_height: 36,
                margin: 1,
                spacing: 2,
                ..Default::default()
            },
        );
        let tileset = Tileset::from_entry(&padded).unwrap();
        for local in 0..tileset.tile_count {
            let rect = tileset.local_source(local).unwrap().rect;
            assert!(rect.x + rect.width <= tileset.image_width);
            assert!(rect.y + rect.height <= tileset.image_height);
        }
        let mut tight = padded.clone();
        tight.definition.image_width = 35;
        assert!(invalid_reason(&tight).contains("columns"));
    }

    #[test]
    fn test_collection_tileset() {
        let tileset = Tileset::new_collection(
            "trees".to_string(),
            5,
            vec![
                TilesetImage {
                    id: 0,
                    path: "oak.png".to_string(),
                    width: 32,
                    height: 48,
                },
                TilesetImage {
                    id: 2,
                    path: "pine.png".to_string(),
                    width: 16,
                    height: 48,
                },
            ],
        );

        assert!(tileset.is_collection());
        assert_eq!(tileset.gid_range(), 5..8);
        assert_eq!(tileset.local_source(1), None);

        let pine = tileset.local_source(2).unwrap();
        assert_eq!(pine.image, "pine.png");
        assert_eq!(pine.rect, TileRect::new(0, 0, 16, 48));
    }

    #[test]
    fn test_unresolved_external_tileset() {
        let entry = TilesetEntry {
            first_gid: 1,
            source: Some("town.tsj".to_string()),
            definition: TilesetDefinition::default(),
        };
        assert!(matches!(
            Tileset::from_entry(&entry),
            Err(LoadError::UnresolvedTileset { first_gid: 1, .. })
        ));
    }
}
