//! Colliders and doors extracted from a map's object layers
//!
//! [`MapObjects::from_tilemap`] scans every object region exactly once when a
//! map is loaded. The result is immutable for as long as the map stays
//! active, so every body in a frame resolves against the same snapshot.

use crate::MapId;
use quickdraw_core::{ObjectRegion, Rect, RegionRole, Tilemap};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Which door table a door lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoorSide {
    Entrance,
    Exit,
}

impl DoorSide {
    /// The table a door's pair is looked up in
    pub fn opposite(&self) -> Self {
        match self {
            DoorSide::Entrance => DoorSide::Exit,
            DoorSide::Exit => DoorSide::Entrance,
        }
    }
}

/// A named trigger rectangle paired with another door by name
#[derive(Debug, Clone, PartialEq)]
pub struct Door {
    pub name: String,
    pub rect: Rect,
    /// Name of the paired door on the opposite side
    pub pair: String,
    pub side: DoorSide,
    /// Map the pair lives in, if not this one
    pub destination: Option<MapId>,
}

impl Door {
    fn from_region(region: &ObjectRegion, pair: &str, side: DoorSide) -> Self {
        Self {
            name: region.name.clone(),
            rect: region.rect(),
            pair: pair.to_string(),
            side,
            destination: region.destination_map().map(MapId::from),
        }
    }

    /// Check if entering this door loads another map
    pub fn is_cross_map(&self) -> bool {
        self.destination.is_some()
    }
}

/// Static geometry and doors of the active map
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MapObjects {
    pub colliders: Vec<Rect>,
    pub entrances: BTreeMap<String, Door>,
    pub exits: BTreeMap<String, Door>,
}

impl MapObjects {
    /// Classify every object region of the map
    ///
    /// Unrecognized door regions and doors without a valid pair are logged
    /// and kept out of play; they never fail the load.
    pub fn from_tilemap(tilemap: &Tilemap) -> Self {
        let mut objects = Self::default();

        for region in tilemap.object_regions() {
            match region.role() {
                RegionRole::Collider => {
                    if region.rect().is_empty() {
                        debug!("Skipping zero-area collider '{}'", region.name);
                        continue;
                    }
                    objects.colliders.push(region.rect());
                }
                RegionRole::Entrance { pair } => {
                    objects.insert(Door::from_region(region, pair, DoorSide::Entrance));
                }
                RegionRole::Exit { pair } => {
                    objects.insert(Door::from_region(region, pair, DoorSide::Exit));
                }
                RegionRole::Unrecognized { role } => {
                    warn!(
                        "Ignoring door region '{}' with unrecognized role {:?}",
                        region.name, role
                    );
                }
            }
        }

        objects.warn_unpaired();
        objects
    }

    fn insert(&mut self, door: Door) {
        let table = match door.side {
            DoorSide::Entrance => &mut self.entrances,
            DoorSide::Exit => &mut self.exits,
        };
        if let Some(previous) = table.insert(door.name.clone(), door) {
            warn!(
                "Duplicate {:?} door '{}'; the later region replaces it",
                previous.side, previous.name
            );
        }
    }

    fn warn_unpaired(&self) {
        for door in self.entrances.values().chain(self.exits.values()) {
            if !door.is_cross_map() && self.paired(door).is_none() {
                warn!(
                    "{:?} door '{}' pairs with missing door '{}'; it will never trigger",
                    door.side, door.name, door.pair
                );
            }
        }
    }

    /// Get the door table for one side
    pub fn doors(&self, side: DoorSide) -> &BTreeMap<String, Door> {
        match side {
            DoorSide::Entrance => &self.entrances,
            DoorSide::Exit => &self.exits,
        }
    }

    /// Look up a door's pair in this map
    pub fn paired(&self, door: &Door) -> Option<&Door> {
        self.doors(door.side.opposite()).get(&door.pair)
    }

    /// Check if a door can fire: it leads to another map or its pair exists here
    pub fn is_live(&self, door: &Door) -> bool {
        door.is_cross_map() || self.paired(door).is_some()
    }
}
