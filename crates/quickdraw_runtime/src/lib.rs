//! Runtime for quickdraw maps
//!
//! Everything that happens once a map is loaded:
//! - `collision` - Axis-separated resolution against static colliders
//! - `doors` - Paired door triggers and cross-map transitions
//! - `camera` - Follow and clamp the view to the map
//! - `session` - World state and the per-frame update order
//! - `config` - TOML configuration and the map catalog
//! - `loader` - Reading map files and their external tilesets
//!
//! # Example
//!
//! ```rust,ignore
//! use quickdraw_runtime::{MapId, MoveIntent, RuntimeConfig, Session};
//!
//! let config = RuntimeConfig::load("quickdraw.toml".as_ref())?;
//! let mut session = Session::new(config);
//! session.start()?;
//!
//! loop {
//!     let outcome = session.update(MoveIntent { right: true, ..Default::default() });
//!     if outcome.room_changed.is_some() {
//!         session.complete_transition()?;
//!     }
//! }
//! ```
//!
//! With the `bevy` feature, `QuickdrawPlugin` drives a session from a Bevy app.

pub mod body;
pub mod camera;
pub mod collision;
pub mod config;
pub mod doors;
pub mod loader;
pub mod objects;
pub mod session;

#[cfg(feature = "bevy")]
mod plugin;

pub use body::{Actor, Arrival, Direction, MovingBody, BODY_SIZE};
pub use camera::Camera;
pub use collision::{resolve_axis, step_body};
pub use config::{ConfigError, EnemyConfig, MapCatalog, PlayerConfig, RuntimeConfig, ViewportConfig};
pub use doors::{check_enter, check_exit, update_doors, DoorEvent};
pub use loader::load_tilemap;
pub use objects::{Door, DoorSide, MapObjects};
pub use session::{
    ActiveMap, FrameOutcome, MapId, MoveIntent, PendingTransition, RoomChanged, Session,
    SessionError, SessionState,
};

#[cfg(feature = "bevy")]
pub use plugin::QuickdrawPlugin;
