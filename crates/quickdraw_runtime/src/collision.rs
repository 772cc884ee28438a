//! Axis-separated collision against static colliders
//!
//! Bodies move one axis at a time: the full horizontal displacement is applied
//! and resolved, then the full vertical displacement. This keeps the two axes
//! independent and lets a body slide along walls.
//!
//! Because displacement is applied in one jump per axis, a body moving faster
//! than its own size per frame can skip over thin geometry or clip a corner.
//! Bodies here move at most about 2 px per frame against a 16 px box, so this
//! approximation is accepted rather than doing swept tests.

use crate::body::{MovingBody, BODY_SIZE};
use quickdraw_core::{Axis, Rect};

/// Push the body out of every collider it overlaps on one axis
///
/// The correction depends on the direction of travel on that axis: moving
/// towards positive coordinates puts the body flush against the collider's
/// near edge, moving towards negative coordinates puts it against the far
/// edge. A body with no velocity on the axis is never moved, so a resting
/// body that already overlaps something stays where it is.
///
/// Colliders are applied in order; if several overlap, the last one wins.
pub fn resolve_axis(body: &mut MovingBody, colliders: &[Rect], axis: Axis) {
    let i = axis.index();
    let velocity = body.velocity[i];
    if velocity == 0.0 {
        return;
    }

    for collider in colliders {
        if !body.bounds().overlaps(collider) {
            continue;
        }
        body.position[i] = if velocity > 0.0 {
            collider.min_on(axis) - BODY_SIZE
        } else {
            collider.max_on(axis)
        };
    }
}

/// Apply one frame of velocity, resolving horizontal then vertical collisions
pub fn step_body(body: &mut MovingBody, colliders: &[Rect]) {
    body.position[0] += body.velocity[0];
    resolve_axis(body, colliders, Axis::Horizontal);

    body.position[1] += body.velocity[1];
    resolve_axis(body, colliders, Axis::Vertical);
}
