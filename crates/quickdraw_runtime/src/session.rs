//! World state and the per-frame update
//!
//! A [`Session`] owns everything that changes while playing: the active map,
//! the player, enemies and the camera. It moves through these states:
//!
//! ```text
//! Unloaded -> Loading -> Populated -> Active -> Transitioning -> Loading -> ...
//! ```
//!
//! `Populated` becomes `Active` on the first [`Session::update`]. A door that
//! leads to another map moves the session to `Transitioning`; the caller then
//! loads the destination with [`Session::complete_transition`] or
//! [`Session::load_map`].

use crate::body::Actor;
use crate::camera::Camera;
use crate::collision::step_body;
use crate::config::RuntimeConfig;
use crate::doors::{update_doors, DoorEvent};
use crate::loader::load_tilemap;
use crate::objects::{DoorSide, MapObjects};
use quickdraw_core::{LoadError, Tilemap};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

/// Identifier of a map, e.g. `"town1"`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MapId(String);

impl MapId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for MapId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for MapId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for MapId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Errors returned when a session cannot load a map
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error("Map '{0}' is not in the map catalog")]
    UnknownMap(MapId),
    #[error("No start map configured")]
    NoStartMap,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Unloaded,
    Loading,
    Populated,
    Active,
    Transitioning,
}

/// The loaded map and everything derived from it
#[derive(Debug, Clone)]
pub struct ActiveMap {
    pub id: MapId,
    pub tilemap: Tilemap,
    pub objects: MapObjects,
}

/// A cross-map door was entered; the destination is not loaded yet
#[derive(Debug, Clone, PartialEq)]
pub struct PendingTransition {
    pub to: MapId,
    /// Door the player lands on in the destination map
    pub arrival: String,
    pub arrival_side: DoorSide,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RoomChanged {
    pub from: MapId,
    pub to: MapId,
}

/// What happened during one [`Session::update`]
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "bevy", derive(bevy::prelude::Resource))]
pub struct FrameOutcome {
    pub room_changed: Option<RoomChanged>,
    pub door: Option<DoorEvent>,
}

/// Movement keys held this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "bevy", derive(bevy::prelude::Resource))]
pub struct MoveIntent {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl MoveIntent {
    /// Per-frame velocity; left overrides right and up overrides down
    pub fn velocity(&self, speed: f32) -> [f32; 2] {
        let mut velocity = [0.0, 0.0];
        if self.right {
            velocity[0] = speed;
        }
        if self.left {
            velocity[0] = -speed;
        }
        if self.down {
            velocity[1] = speed;
        }
        if self.up {
            velocity[1] = -speed;
        }
        velocity
    }
}

/// Explicit world state, updated once per frame
#[derive(Debug, Clone)]
#[cfg_attr(feature = "bevy", derive(bevy::prelude::Resource))]
pub struct Session {
    config: RuntimeConfig,
    state: SessionState,
    map: Option<ActiveMap>,
    pending: Option<PendingTransition>,
    player: Actor,
    enemies: Vec<Actor>,
    camera: Camera,
}

impl Session {
    pub fn new(config: RuntimeConfig) -> Self {
        let player = Actor::new(config.player.spawn);
        Self {
            config,
            state: SessionState::Unloaded,
            map: None,
            pending: None,
            player,
            enemies: Vec::new(),
            camera: Camera::default(),
        }
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn map(&self) -> Option<&ActiveMap> {
        self.map.as_ref()
    }

    pub fn map_id(&self) -> Option<&MapId> {
        self.map.as_ref().map(|m| &m.id)
    }

    pub fn pending(&self) -> Option<&PendingTransition> {
        self.pending.as_ref()
    }

    pub fn player(&self) -> &Actor {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut Actor {
        &mut self.player
    }

    pub fn enemies(&self) -> &[Actor] {
        &self.enemies
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Make a validated map active
    ///
    /// When a cross-map door is pending, the player lands on its arrival door
    /// in the new map. Otherwise, or if that door does not exist, the player
    /// starts at the configured spawn point. Enemies never carry over.
    pub fn load_map(&mut self, id: MapId, tilemap: Tilemap) {
        self.state = SessionState::Loading;
        let objects = MapObjects::from_tilemap(&tilemap);
        self.enemies.clear();

        let arrival = self.pending.take().and_then(|pending| {
            let door = objects.doors(pending.arrival_side).get(&pending.arrival);
            if door.is_none() {
                warn!(
                    "Arrival door '{}' not found in map '{}'; using spawn point",
                    pending.arrival, id
                );
            }
            door.map(|door| (door.name.clone(), door.rect))
        });
        self.player = Actor::new(self.config.player.spawn);
        if let Some((name, rect)) = arrival {
            self.player.body.land_on(&name, rect);
        }

        info!(
            "Map '{}' active: {} colliders, {} entrances, {} exits",
            id,
            objects.colliders.len(),
            objects.entrances.len(),
            objects.exits.len()
        );
        self.map = Some(ActiveMap {
            id,
            tilemap,
            objects,
        });
        self.frame_camera();
        self.state = SessionState::Populated;
    }

    /// Load a map file and make it active
    ///
    /// On failure the session is left `Unloaded` without a map.
    pub fn load_map_file(&mut self, id: MapId, path: &Path) -> Result<(), SessionError> {
        self.state = SessionState::Loading;
        match load_tilemap(path) {
            Ok(tilemap) => {
                self.load_map(id, tilemap);
                Ok(())
            }
            Err(e) => {
                warn!("Failed to load map '{}' from {}: {}", id, path.display(), e);
                self.unload();
                Err(e.into())
            }
        }
    }

    /// Load a map by id through the configured map catalog
    pub fn load_from_catalog(&mut self, id: MapId) -> Result<(), SessionError> {
        let Some(path) = self.config.maps.path_for(&id) else {
            self.unload();
            return Err(SessionError::UnknownMap(id));
        };
        self.load_map_file(id, &path)
    }

    /// Load the configured start map
    pub fn start(&mut self) -> Result<(), SessionError> {
        let id = self
            .config
            .maps
            .start
            .clone()
            .ok_or(SessionError::NoStartMap)?;
        self.load_from_catalog(id)
    }

    /// Load the destination of a pending cross-map door from the catalog
    ///
    /// Does nothing unless the session is `Transitioning`.
    pub fn complete_transition(&mut self) -> Result<(), SessionError> {
        if self.state != SessionState::Transitioning {
            return Ok(());
        }
        match self.pending.as_ref().map(|p| p.to.clone()) {
            Some(to) => self.load_from_catalog(to),
            None => Ok(()),
        }
    }

    fn unload(&mut self) {
        self.state = SessionState::Unloaded;
        self.map = None;
        self.pending = None;
        self.enemies.clear();
    }

    /// Add an enemy to the active map, returning its index
    pub fn spawn_enemy(&mut self, position: [f32; 2], follows_player: bool) -> usize {
        self.enemies.push(Actor::enemy(position, follows_player));
        self.enemies.len() - 1
    }

    /// Run one frame: move the player, check doors, move enemies, frame the camera
    pub fn update(&mut self, intent: MoveIntent) -> FrameOutcome {
        let mut outcome = FrameOutcome::default();
        match self.state {
            SessionState::Unloaded | SessionState::Loading | SessionState::Transitioning => {
                return outcome;
            }
            SessionState::Populated => self.state = SessionState::Active,
            SessionState::Active => {}
        }
        let Some(map) = &self.map else {
            return outcome;
        };
        let colliders = map.objects.colliders.as_slice();

        self.player.set_velocity(intent.velocity(self.config.player.speed));
        step_body(&mut self.player.body, colliders);

        outcome.door = update_doors(&mut self.player.body, &map.objects);
        if let Some(DoorEvent::RoomChange {
            to_map,
            arrival,
            arrival_side,
            ..
        }) = &outcome.door
        {
            info!("Leaving map '{}' for '{}'", map.id, to_map);
            outcome.room_changed = Some(RoomChanged {
                from: map.id.clone(),
                to: to_map.clone(),
            });
            self.pending = Some(PendingTransition {
                to: to_map.clone(),
                arrival: arrival.clone(),
                arrival_side: *arrival_side,
            });
            self.state = SessionState::Transitioning;
        }

        let target = self.player.body.position;
        let speed = self.config.enemy.speed;
        for enemy in &mut self.enemies {
            let velocity = if enemy.follows_player {
                enemy.chase_velocity(target, speed)
            } else {
                [0.0, 0.0]
            };
            enemy.set_velocity(velocity);
            step_body(&mut enemy.body, colliders);
        }

        self.frame_camera();
        outcome
    }

    /// Frame the camera on the center of the player's 16x16 box (`position + 8`)
    fn frame_camera(&mut self) {
        if let Some(map) = &self.map {
            self.camera.frame(
                self.player.body.center(),
                map.tilemap.pixel_size(),
                self.config.viewport.size(),
            );
        }
    }
}
