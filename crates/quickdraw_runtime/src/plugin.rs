//! Bevy integration
//!
//! [`QuickdrawPlugin`] stores a [`Session`] as a resource and advances it once
//! per `Update`. Input systems write [`MoveIntent`]; anything interested in
//! door events or room changes reads [`FrameOutcome`].
//!
//! ```rust,ignore
//! use bevy::prelude::*;
//! use quickdraw_runtime::{QuickdrawPlugin, RuntimeConfig};
//!
//! fn main() {
//!     let config = RuntimeConfig::load("quickdraw.toml".as_ref()).unwrap();
//!     App::new()
//!         .add_plugins(DefaultPlugins)
//!         .add_plugins(QuickdrawPlugin::new(config))
//!         .run();
//! }
//! ```

use crate::{FrameOutcome, MoveIntent, RuntimeConfig, Session};
use bevy::prelude::*;
use tracing::error;

/// Plugin that runs a quickdraw session inside a Bevy app
#[derive(Debug, Clone, Default)]
pub struct QuickdrawPlugin {
    pub config: RuntimeConfig,
}

impl QuickdrawPlugin {
    pub fn new(config: RuntimeConfig) -> Self {
        Self { config }
    }
}

impl Plugin for QuickdrawPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(Session::new(self.config.clone()))
            .init_resource::<MoveIntent>()
            .init_resource::<FrameOutcome>()
            .add_systems(Startup, start_session)
            .add_systems(Update, advance_session);
    }
}

/// Load the configured start map, if there is one
fn start_session(mut session: ResMut<Session>) {
    if session.config().maps.start.is_none() {
        return;
    }
    if let Err(e) = session.start() {
        error!("Failed to start session: {}", e);
    }
}

/// Single writer of the session: one frame per `Update`
fn advance_session(
    mut session: ResMut<Session>,
    intent: Res<MoveIntent>,
    mut outcome: ResMut<FrameOutcome>,
) {
    *outcome = session.update(*intent);
    if outcome.room_changed.is_some() {
        if let Err(e) = session.complete_transition() {
            error!("Failed to change room: {}", e);
        }
    }
}
