//! Translation-only camera
//!
//! The camera is an offset added to every draw position. Following puts the
//! target in the middle of the viewport; constraining keeps the viewport
//! inside the map so nothing past the map edge is shown.

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Camera {
    pub x: f32,
    pub y: f32,
}

/// Clamp one offset axis to `[-(map - view), 0]`
///
/// A map smaller than the viewport has an empty range; it is centered instead.
fn clamp_axis(offset: f32, map: f32, view: f32) -> f32 {
    let lower = -(map - view);
    if lower > 0.0 {
        lower / 2.0
    } else {
        offset.clamp(lower, 0.0)
    }
}

impl Camera {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn offset(&self) -> [f32; 2] {
        [self.x, self.y]
    }

    /// Center the viewport on a target point
    pub fn follow_target(&mut self, tx: f32, ty: f32, vw: f32, vh: f32) {
        self.x = vw / 2.0 - tx;
        self.y = vh / 2.0 - ty;
    }

    /// Keep the viewport within the map bounds
    pub fn constrain(&mut self, mw: f32, mh: f32, vw: f32, vh: f32) {
        self.x = clamp_axis(self.x, mw, vw);
        self.y = clamp_axis(self.y, mh, vh);
    }

    /// Follow then constrain, as done once per frame
    pub fn frame(&mut self, target: [f32; 2], map_size: [f32; 2], viewport: [f32; 2]) {
        self.follow_target(target[0], target[1], viewport[0], viewport[1]);
        self.constrain(map_size[0], map_size[1], viewport[0], viewport[1]);
    }

    /// Map a map-space point to screen space
    pub fn to_screen(&self, point: [f32; 2]) -> [f32; 2] {
        [point[0] + self.x, point[1] + self.y]
    }
}
