use ultraviolet::Vec2;

use crate::color::Color;
use crate::config::PhysicsConfig;

/// Stable identifier of a body. Never zero; the C API uses `0` for "none".
pub type BodyId = u32;

/// Below this speed on both axes the heading line is not drawn.
const HEADING_MIN_SPEED: f32 = 0.1;

/// Canvas extent: bodies are kept inside `[0, width] x [0, height]`.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// A line segment in canvas space, used for the cosmetic spokes and heading.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    pub from: Vec2,
    pub to: Vec2,
}

/// A circle in the sandbox.
#[repr(C)]
#[derive(Clone, Copy, Debug)]
pub struct Body {
    /// Center, canvas pixels (+y down).
    pub pos: Vec2,
    /// Velocity in pixels per second.
    pub vel: Vec2,
    /// Radius, fixed at creation.
    pub radius: f32,
    /// Accumulated spin angle of the spokes, radians.
    pub angle: f32,
    pub color: Color,
    /// Under pointer control.
    pub held: bool,
    pub id: BodyId,
}

impl Body {
    pub fn new(id: BodyId, pos: Vec2, vel: Vec2, radius: f32, color: Color) -> Self {
        Self {
            pos,
            vel,
            radius,
            angle: 0.0,
            color,
            held: false,
            id,
        }
    }

    /// Advances the body by `dt` seconds (semi-implicit Euler, velocity first).
    ///
    /// A held body takes its velocity from the pointer displacement since the
    /// previous frame and is not moved; the step snaps it to the pointer instead.
    /// Releasing it therefore keeps the throw velocity.
    pub fn integrate(&mut self, dt: f32, pointer_delta: Vec2, physics: &PhysicsConfig) {
        if self.held {
            self.vel = pointer_delta * physics.drag_sensitivity;
        } else {
            self.vel.x += self.vel.x * physics.friction * dt;
            self.pos.x += self.vel.x * dt;

            self.vel.y += physics.gravity * dt;
            self.pos.y += self.vel.y * dt;
        }

        self.angle += (self.vel.x * dt) / self.radius;
    }

    /// Clamps the body inside `bounds`, reflecting the velocity component of
    /// every wall it penetrates. Side walls are lossless, floor and ceiling
    /// scale by `restitution`.
    pub fn resolve_wall_collision(&mut self, bounds: Bounds, restitution: f32) {
        let r = self.radius;

        if self.pos.x - r < 0.0 {
            self.pos.x = r;
            self.vel.x = -self.vel.x;
        }
        if self.pos.x + r > bounds.width {
            self.pos.x = bounds.width - r;
            self.vel.x = -self.vel.x;
        }
        if self.pos.y - r < 0.0 {
            self.pos.y = r;
            self.vel.y = -self.vel.y * restitution;
        }
        if self.pos.y + r > bounds.height {
            self.pos.y = bounds.height - r;
            self.vel.y = -self.vel.y * restitution;
        }
    }

    #[inline]
    pub fn contains_point(&self, point: Vec2) -> bool {
        (self.pos - point).mag_sq() <= self.radius * self.radius
    }

    /// The four spokes: up, down, left, right, rotated by the spin angle.
    pub fn spokes(&self) -> [Segment; 4] {
        let r = self.radius;
        let (sin, cos) = self.angle.sin_cos();

        [
            Vec2::new(0.0, -r),
            Vec2::new(0.0, r),
            Vec2::new(-r, 0.0),
            Vec2::new(r, 0.0),
        ]
        .map(|offset| {
            let rotated = Vec2::new(
                offset.x * cos - offset.y * sin,
                offset.x * sin + offset.y * cos,
            );
            Segment {
                from: self.pos,
                to: self.pos + rotated,
            }
        })
    }

    /// Velocity line from the center, or `None` while (nearly) at rest.
    pub fn heading(&self) -> Option<Segment> {
        if self.vel.x.abs() <= HEADING_MIN_SPEED && self.vel.y.abs() <= HEADING_MIN_SPEED {
            return None;
        }
        Some(Segment {
            from: self.pos,
            to: self.pos + self.vel,
        })
    }

    pub fn is_finite(&self) -> bool {
        self.pos.x.is_finite()
            && self.pos.y.is_finite()
            && self.vel.x.is_finite()
            && self.vel.y.is_finite()
    }
}
