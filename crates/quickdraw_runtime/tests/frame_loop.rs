//! Drives a session through a cross-map round trip using files on disk

use quickdraw_runtime::{
    DoorEvent, DoorSide, MapId, MoveIntent, RuntimeConfig, Session, SessionState,
};
use std::fs;
use std::path::Path;

const LEFT: MoveIntent = MoveIntent {
    up: false,
    down: false,
    left: true,
    right: false,
};

const RIGHT: MoveIntent = MoveIntent {
    up: false,
    down: false,
    left: false,
    right: true,
};

fn door(name: &str, x: u32, y: u32, pair: &str, role: &str, map: &str) -> String {
    format!(
        r#"{{"name": "{name}", "x": {x}, "y": {y}, "width": 16, "height": 16,
            "properties": [
                {{"name": "pair", "type": "string", "value": "{pair}"}},
                {{"name": "door", "type": "string", "value": "{role}"}},
                {{"name": "map", "type": "string", "value": "{map}"}}
            ]}}"#
    )
}

/// A 20x15 map with a ground layer, a roof layer and the given objects
fn map_json(objects: &[String]) -> String {
    let mut ground = vec!["1"; 20 * 15];
    ground[0] = "2";
    let roofs = vec!["0"; 20 * 15];
    format!(
        r#"{{
            "tilewidth": 16, "tileheight": 16,
            "layers": [
                {{"type": "tilelayer", "name": "ground", "width": 20, "height": 15, "data": [{}]}},
                {{"type": "objectgroup", "name": "objects", "objects": [{}]}},
                {{"type": "tilelayer", "name": "roofs", "class": "top", "width": 20, "height": 15, "data": [{}]}}
            ],
            "tilesets": [{{"firstgid": 1, "source": "tiles.json"}}]
        }}"#,
        ground.join(","),
        objects.join(","),
        roofs.join(",")
    )
}

fn write_world(dir: &Path) {
    fs::write(
        dir.join("tiles.json"),
        r#"{"name": "overworld", "image": "overworld.png",
            "tilewidth": 16, "tileheight": 16, "tilecount": 4, "columns": 2,
            "imagewidth": 32, "imageheight": 32}"#,
    )
    .unwrap();
    fs::write(
        dir.join("town1.json"),
        map_json(&[door("stairs_down", 160, 120, "stairs_up", "in", "cellar")]),
    )
    .unwrap();
    fs::write(
        dir.join("cellar.json"),
        map_json(&[door("stairs_up", 64, 64, "stairs_down", "out", "town1")]),
    )
    .unwrap();
    fs::write(
        dir.join("quickdraw.toml"),
        r#"
[viewport]
width = 160
height = 120

[maps]
start = "town1"

[maps.paths]
town1 = "town1.json"
cellar = "cellar.json"
"#,
    )
    .unwrap();
}

#[test]
fn cross_map_round_trip() {
    let tmp = tempfile::tempdir().unwrap();
    write_world(tmp.path());

    let config = RuntimeConfig::load(&tmp.path().join("quickdraw.toml")).unwrap();
    let mut session = Session::new(config);
    session.start().unwrap();
    assert_eq!(session.map_id(), Some(&MapId::from("town1")));

    let map = session.map().unwrap();
    assert_eq!(map.tilemap.ground_layers().count(), 1);
    assert_eq!(map.tilemap.overhead_layers().count(), 1);
    let ground = map.tilemap.ground_layers().next().unwrap();
    let first = map.tilemap.placements(ground).next().unwrap();
    assert_eq!(first.gid, 2);
    assert_eq!(first.source.image, "overworld.png");
    assert_eq!(first.source.rect.x, 16);

    // Walk into the stairs
    session.player_mut().body.position = [150.0, 120.0];
    let outcome = session.update(RIGHT);
    let changed = outcome.room_changed.unwrap();
    assert_eq!(changed.from, MapId::from("town1"));
    assert_eq!(changed.to, MapId::from("cellar"));
    assert!(matches!(
        outcome.door,
        Some(DoorEvent::RoomChange { arrival_side: DoorSide::Exit, .. })
    ));
    assert_eq!(session.state(), SessionState::Transitioning);

    session.complete_transition().unwrap();
    assert_eq!(session.map_id(), Some(&MapId::from("cellar")));
    assert_eq!(session.player().body.position, [64.0, 64.0]);

    // Walk off the arrival door without bouncing back
    for _ in 0..11 {
        let outcome = session.update(RIGHT);
        assert!(outcome.room_changed.is_none());
    }
    assert_eq!(session.player().body.position, [80.5, 64.0]);
    assert!(!session.player().body.is_arriving());
    assert_eq!(session.state(), SessionState::Active);

    // Step back onto it: return to town
    let outcome = session.update(LEFT);
    assert_eq!(outcome.room_changed.map(|c| c.to), Some(MapId::from("town1")));
    session.complete_transition().unwrap();

    assert_eq!(session.map_id(), Some(&MapId::from("town1")));
    assert_eq!(session.player().body.position, [160.0, 120.0]);
    assert_eq!(session.update(MoveIntent::default()).room_changed, None);
    assert_eq!(session.state(), SessionState::Active);
}

#[test]
fn camera_follows_player_across_frames() {
    let tmp = tempfile::tempdir().unwrap();
    write_world(tmp.path());

    let config = RuntimeConfig::load(&tmp.path().join("quickdraw.toml")).unwrap();
    let mut session = Session::new(config);
    session.start().unwrap();

    // Spawn (125, 125): center (133, 133) in a 320x240 map, 160x120 view
    session.update(MoveIntent::default());
    assert_eq!(session.camera().offset(), [-53.0, -73.0]);

    session.player_mut().body.position = [300.0, 220.0];
    session.update(MoveIntent::default());
    assert_eq!(session.camera().offset(), [-160.0, -120.0]);
}

#[test]
fn missing_map_file_unloads_session() {
    let tmp = tempfile::tempdir().unwrap();
    write_world(tmp.path());
    fs::remove_file(tmp.path().join("cellar.json")).unwrap();

    let config = RuntimeConfig::load(&tmp.path().join("quickdraw.toml")).unwrap();
    let mut session = Session::new(config);
    session.start().unwrap();

    session.player_mut().body.position = [150.0, 120.0];
    assert!(session.update(RIGHT).room_changed.is_some());
    assert!(session.complete_transition().is_err());
    assert_eq!(session.state(), SessionState::Unloaded);
    assert!(session.map().is_none());
}
