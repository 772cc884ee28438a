//! Named rectangles authored in object layers
//!
//! Object regions carry both the static collision geometry and the doors of a
//! map. Which one a region is depends only on its properties, see
//! [`ObjectRegion::role`].

use crate::{Property, Rect, Value};
use serde::{Deserialize, Serialize};

/// Property naming the door a region is paired with
pub const PAIR_PROPERTY: &str = "pair";
/// Property holding a door's role, `"in"` or `"out"`
pub const ROLE_PROPERTY: &str = "door";
/// Property naming the map an entrance leads to
pub const MAP_PROPERTY: &str = "map";

/// An object placed in an object layer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ObjectRegion {
    #[serde(default)]
    pub id: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub y: f32,
    #[serde(default)]
    pub width: f32,
    #[serde(default)]
    pub height: f32,
    #[serde(default)]
    pub properties: Vec<Property>,
}

impl ObjectRegion {
    /// Create a new region without properties
    pub fn new(name: impl Into<String>, rect: Rect) -> Self {
        Self {
            id: 0,
            name: name.into(),
            x: rect.x,
            y: rect.y,
            width: rect.width,
            height: rect.height,
            properties: Vec::new(),
        }
    }

    /// Add a property, replacing any previous value under the same name
    pub fn with_property(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.properties.retain(|p| p.name != name);
        self.properties.push(Property::new(name, value));
        self
    }

    /// Bounds in map pixel space
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// Get a raw property value
    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties
            .iter()
            .find(|p| p.name == name)
            .map(|p| &p.value)
    }

    /// Get a string property
    pub fn get_string(&self, name: &str) -> Option<&str> {
        self.property(name).and_then(|v| v.as_string())
    }

    /// Destination map for a cross-map entrance
    pub fn destination_map(&self) -> Option<&str> {
        self.get_string(MAP_PROPERTY).filter(|s| !s.is_empty())
    }

    /// Classify the region
    ///
    /// A region without a pairing property is solid. A region with one is a
    /// door whose role decides whether it is an entrance or an exit.
    pub fn role(&self) -> RegionRole<'_> {
        let Some(pair) = self.property(PAIR_PROPERTY) else {
            return RegionRole::Collider;
        };
        let Some(pair) = pair.as_string().filter(|s| !s.is_empty()) else {
            return RegionRole::Unrecognized {
                role: self.get_string(ROLE_PROPERTY),
            };
        };
        match self.get_string(ROLE_PROPERTY) {
            Some("in") => RegionRole::Entrance { pair },
            Some("out") => RegionRole::Exit { pair },
            role => RegionRole::Unrecognized { role },
        }
    }
}

/// What an object region stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionRole<'a> {
    /// Static solid geometry
    Collider,
    /// Door that teleports to the exit named `pair`
    Entrance { pair: &'a str },
    /// Door that teleports back to the entrance named `pair`
    Exit { pair: &'a str },
    /// Paired region whose role is missing or unknown
    Unrecognized { role: Option<&'a str> },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region() -> ObjectRegion {
        ObjectRegion::new("house_door", Rect::new(32.0, 48.0, 16.0, 8.0))
    }

    #[test]
    fn test_region_without_pair_is_collider() {
        let wall = region().with_property(ROLE_PROPERTY, "in");
        assert_eq!(wall.role(), RegionRole::Collider);
    }

    #[test]
    fn test_door_roles() {
        let entrance = region()
            .with_property(PAIR_PROPERTY, "house_exit")
            .with_property(ROLE_PROPERTY, "in");
        assert_eq!(entrance.role(), RegionRole::Entrance { pair: "house_exit" });

        let exit = region()
            .with_property(PAIR_PROPERTY, "house_entrance")
            .with_property(ROLE_PROPERTY, "out");
        assert_eq!(exit.role(), RegionRole::Exit { pair: "house_entrance" });
    }

    #[test]
    fn test_unknown_role() {
        let odd = region()
            .with_property(PAIR_PROPERTY, "elsewhere")
            .with_property(ROLE_PROPERTY, "sideways");
        assert_eq!(
            odd.role(),
            RegionRole::Unrecognized {
                role: Some("sideways")
            }
        );

        let missing = region().with_property(PAIR_PROPERTY, "elsewhere");
        assert_eq!(missing.role(), RegionRole::Unrecognized { role: None });
    }

    #[test]
    fn test_parse_object() {
        let json = r#"{
            "id": 7, "name": "cellar", "x": 64, "y": 80, "width": 16, "height": 16,
            "rotation": 0, "visible": true,
            "properties": [
                {"name": "pair", "type": "string", "value": "cellar_out"},
                {"name": "door", "type": "string", "value": "in"},
                {"name": "map", "type": "string", "value": "cellar"}
            ]
        }"#;
        let region: ObjectRegion = serde_json::from_str(json).unwrap();

        assert_eq!(region.id, 7);
        assert_eq!(region.rect(), Rect::new(64.0, 80.0, 16.0, 16.0));
        assert_eq!(region.role(), RegionRole::Entrance { pair: "cellar_out" });
        assert_eq!(region.destination_map(), Some("cellar"));
    }
}
