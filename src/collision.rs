//! Narrow-phase circle collision: overlap test and impulse response.
//!
//! Mass is taken to be proportional to radius, so larger circles push their
//! partner harder. Positional correction moves only the second body of a pair.

use ultraviolet::Vec2;

use crate::body::Body;

/// What `resolve` did to a pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resolution {
    /// Centers coincided: `a` was released and shoved sideways, no impulse.
    Degenerate,
    /// `b` was pushed out to touching distance; the pair was already separating.
    Separating,
    /// `b` was pushed out and an impulse exchanged.
    Impulse,
}

/// True if the circles touch or overlap.
#[inline]
pub fn overlaps(a: &Body, b: &Body) -> bool {
    let r = a.radius + b.radius;
    (b.pos - a.pos).mag_sq() <= r * r
}

/// Resolves a collision between `a` and the later body `b`.
pub fn resolve(a: &mut Body, b: &mut Body, restitution: f32) -> Resolution {
    let d = b.pos - a.pos;

    if d == Vec2::zero() {
        a.held = false;
        a.pos.x += 2.0 * a.radius;
        log::debug!("bodies {} and {} share a center, separating", a.id, b.id);
        return Resolution::Degenerate;
    }

    let n = d / d.mag();
    let r = a.radius + b.radius;

    // Leave `b` exactly touching `a`.
    b.pos = a.pos + n * r;

    let speed = (a.vel - b.vel).dot(n) * restitution;
    if speed < 0.0 {
        return Resolution::Separating;
    }

    let impulse = 2.0 * speed / r;
    a.vel -= n * (impulse * b.radius);
    b.vel += n * (impulse * a.radius);

    Resolution::Impulse
}
