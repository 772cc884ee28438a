//! Moving bodies and the actors that carry them

use quickdraw_core::{Axis, Rect};

/// Side length of every body's bounding box in pixels
pub const BODY_SIZE: f32 = 16.0;

/// Facing / movement direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
    #[default]
    Idle,
}

impl Direction {
    /// Direction of travel for a velocity; vertical motion takes precedence
    pub fn from_velocity(velocity: [f32; 2]) -> Self {
        let [dx, dy] = velocity;
        if dy < 0.0 {
            Direction::Up
        } else if dy > 0.0 {
            Direction::Down
        } else if dx < 0.0 {
            Direction::Left
        } else if dx > 0.0 {
            Direction::Right
        } else {
            Direction::Idle
        }
    }
}

/// The door a body just landed on
///
/// While set, door checks are suppressed for the body. It is cleared once at
/// least one frame has passed and the body has left `rect`.
#[derive(Debug, Clone, PartialEq)]
pub struct Arrival {
    pub door: String,
    pub rect: Rect,
    /// Frames elapsed since the teleport
    pub frames: u32,
}

/// Position, per-frame velocity and a fixed 16x16 box anchored at the position
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MovingBody {
    /// Top-left corner of the box in map pixels
    pub position: [f32; 2],
    /// Displacement applied on the next step, in pixels per frame
    pub velocity: [f32; 2],
    pub arrival: Option<Arrival>,
}

impl MovingBody {
    pub fn new(position: [f32; 2]) -> Self {
        Self {
            position,
            velocity: [0.0, 0.0],
            arrival: None,
        }
    }

    /// Bounding box at the current position
    pub fn bounds(&self) -> Rect {
        Rect::square(self.position, BODY_SIZE)
    }

    pub fn center(&self) -> [f32; 2] {
        self.bounds().center()
    }

    /// Move the box so it is centered on `rect`
    pub fn center_on(&mut self, rect: &Rect) {
        let [cx, cy] = rect.center();
        self.position = [cx - BODY_SIZE / 2.0, cy - BODY_SIZE / 2.0];
    }

    /// Push the box out of `rect` along the axis needing the shorter move
    ///
    /// The box moves away from the center of `rect`. Does nothing if they do
    /// not overlap.
    pub fn step_off(&mut self, rect: &Rect) {
        let bounds = self.bounds();
        if !bounds.overlaps(rect) {
            return;
        }
        let center = bounds.center();
        let from = rect.center();
        let push = |axis: Axis| {
            let i = axis.index();
            if center[i] >= from[i] {
                rect.max_on(axis) - bounds.min_on(axis)
            } else {
                rect.min_on(axis) - bounds.max_on(axis)
            }
        };
        let dx = push(Axis::Horizontal);
        let dy = push(Axis::Vertical);
        if dx.abs() <= dy.abs() {
            self.position[0] += dx;
        } else {
            self.position[1] += dy;
        }
    }

    /// Place the body on a door and latch door checks off
    pub fn land_on(&mut self, door: &str, rect: Rect) {
        self.center_on(&rect);
        self.arrival = Some(Arrival {
            door: door.to_string(),
            rect,
            frames: 0,
        });
    }

    /// Check whether door checks are currently suppressed
    pub fn is_arriving(&self) -> bool {
        self.arrival.is_some()
    }

    /// Advance the arrival latch by one frame, releasing it when allowed
    pub fn tick_arrival(&mut self) {
        let bounds = self.bounds();
        let released = match &mut self.arrival {
            Some(arrival) => {
                let released = arrival.frames >= 1 && !bounds.overlaps(&arrival.rect);
                arrival.frames = arrival.frames.saturating_add(1);
                released
            }
            None => false,
        };
        if released {
            self.arrival = None;
        }
    }
}

/// A player or enemy
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Actor {
    pub body: MovingBody,
    /// Last direction the actor moved in; kept while standing still
    pub facing: Direction,
    /// Enemies only: walk towards the player every frame
    pub follows_player: bool,
}

impl Actor {
    pub fn new(position: [f32; 2]) -> Self {
        Self {
            body: MovingBody::new(position),
            facing: Direction::Down,
            follows_player: false,
        }
    }

    pub fn enemy(position: [f32; 2], follows_player: bool) -> Self {
        Self {
            follows_player,
            ..Self::new(position)
        }
    }

    /// Set this frame's velocity and update the facing direction
    pub fn set_velocity(&mut self, velocity: [f32; 2]) {
        self.body.velocity = velocity;
        let direction = Direction::from_velocity(velocity);
        if direction != Direction::Idle {
            self.facing = direction;
        }
    }

    /// Direction of travel this frame, `Idle` when standing still
    pub fn motion(&self) -> Direction {
        Direction::from_velocity(self.body.velocity)
    }

    /// Velocity that moves this actor towards `target` at `speed` per axis
    pub fn chase_velocity(&self, target: [f32; 2], speed: f32) -> [f32; 2] {
        let step = |from: f32, to: f32| {
            if from < to {
                speed
            } else if from > to {
                -speed
            } else {
                0.0
            }
        };
        let [x, y] = self.body.position;
        [step(x, target[0]), step(y, target[1])]
    }
}
