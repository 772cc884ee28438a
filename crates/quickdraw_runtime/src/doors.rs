//! Door triggers
//!
//! A body overlapping an entrance is moved onto the exit the entrance pairs
//! with, and the other way round. The body lands centered on the paired door,
//! pushed clear of the door it came through if the two are close. Landing
//! latches further door checks off for that body (see
//! [`MovingBody::land_on`]) so it does not bounce straight back.

use crate::body::MovingBody;
use crate::objects::{Door, DoorSide, MapObjects};
use crate::MapId;
use std::collections::BTreeMap;
use tracing::debug;

/// What a door check did to the body
#[derive(Debug, Clone, PartialEq)]
pub enum DoorEvent {
    /// The body was moved onto the paired door in the same map
    Teleported { from: String, to: String },
    /// The door leads to another map; the caller loads it and lands the body
    /// on `arrival` in its `arrival_side` table
    RoomChange {
        door: String,
        to_map: MapId,
        arrival: String,
        arrival_side: DoorSide,
    },
}

fn trigger<'a>(
    body: &MovingBody,
    doors: &'a BTreeMap<String, Door>,
    pairs: &'a BTreeMap<String, Door>,
) -> Option<(&'a Door, Option<&'a Door>)> {
    let bounds = body.bounds();
    doors
        .values()
        .filter(|door| bounds.overlaps(&door.rect))
        .find_map(|door| match &door.destination {
            Some(_) => Some((door, None)),
            None => pairs.get(&door.pair).map(|pair| (door, Some(pair))),
        })
}

fn fire(body: &mut MovingBody, door: &Door, pair: Option<&Door>) -> Option<DoorEvent> {
    match (&door.destination, pair) {
        (Some(to_map), _) => {
            debug!("Door '{}' leads to map '{}'", door.name, to_map);
            Some(DoorEvent::RoomChange {
                door: door.name.clone(),
                to_map: to_map.clone(),
                arrival: door.pair.clone(),
                arrival_side: door.side.opposite(),
            })
        }
        (None, Some(pair)) => {
            debug!("Door '{}' teleports to '{}'", door.name, pair.name);
            body.land_on(&pair.name, pair.rect);
            body.step_off(&door.rect);
            Some(DoorEvent::Teleported {
                from: door.name.clone(),
                to: pair.name.clone(),
            })
        }
        (None, None) => None,
    }
}

/// Teleport the body to the paired exit of the first entrance it overlaps
///
/// Entrances whose pair is missing never fire. Nothing happens while the
/// body's arrival latch is set.
pub fn check_enter(
    body: &mut MovingBody,
    entrances: &BTreeMap<String, Door>,
    exits: &BTreeMap<String, Door>,
) -> Option<DoorEvent> {
    if body.is_arriving() {
        return None;
    }
    let (door, pair) = trigger(body, entrances, exits)?;
    fire(body, door, pair)
}

/// Teleport the body to the paired entrance of the first exit it overlaps
pub fn check_exit(
    body: &mut MovingBody,
    entrances: &BTreeMap<String, Door>,
    exits: &BTreeMap<String, Door>,
) -> Option<DoorEvent> {
    if body.is_arriving() {
        return None;
    }
    let (door, pair) = trigger(body, exits, entrances)?;
    fire(body, door, pair)
}

/// Run one frame of door handling for a body that has already moved
///
/// The arrival latch is advanced first. Entrances are checked before exits and
/// at most one door fires per frame.
pub fn update_doors(body: &mut MovingBody, objects: &MapObjects) -> Option<DoorEvent> {
    body.tick_arrival();
    check_enter(body, &objects.entrances, &objects.exits)
        .or_else(|| check_exit(body, &objects.entrances, &objects.exits))
}
