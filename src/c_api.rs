//! C ABI over a [`Session`] for hosts that are not written in Rust.
//!
//! Handles are single-threaded. Body ids cross the boundary as `u32` with `0`
//! meaning "none".

use crate::{
    body::{Body, BodyId, Segment},
    config::SandboxConfig,
    driver::Session,
    simulation::Cursor,
};
use ultraviolet::Vec2;

const NO_BODY: BodyId = 0;

fn create(width: f32, height: f32, seed: Option<u64>) -> *mut Session {
    let config = SandboxConfig {
        width,
        height,
        seed,
        ..SandboxConfig::default()
    };
    if let Err(err) = config.validate() {
        log::warn!("Sandbox_Create rejected: {err:#}");
        return std::ptr::null_mut();
    }
    Box::into_raw(Box::new(Session::new(config)))
}

/// Returns null if the canvas size is not positive.
#[unsafe(no_mangle)]
pub extern "C" fn Sandbox_Create(width: f32, height: f32) -> *mut Session {
    create(width, height, None)
}

#[unsafe(no_mangle)]
pub extern "C" fn Sandbox_CreateWithSeed(width: f32, height: f32, seed: u64) -> *mut Session {
    create(width, height, Some(seed))
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn Sandbox_Destroy(handle: *mut Session) {
    if !handle.is_null() {
        unsafe { drop(Box::from_raw(handle)) };
    }
}

/// Display refresh at `timestamp` milliseconds. Returns the `dt` stepped, in seconds.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn Sandbox_Frame(handle: *mut Session, timestamp: f64) -> f32 {
    let session = unsafe { handle.as_mut() };
    session.map_or(0.0, |session| session.frame(timestamp))
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn Sandbox_Step(handle: *mut Session, dt: f32) {
    if let Some(session) = unsafe { handle.as_mut() } {
        session.simulation.step(dt);
    }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn Sandbox_SetBounds(handle: *mut Session, width: f32, height: f32) {
    if let Some(session) = unsafe { handle.as_mut() } {
        session.simulation.set_bounds(width, height);
    }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn Sandbox_SetPaused(handle: *mut Session, paused: bool) {
    if let Some(session) = unsafe { handle.as_mut() } {
        session.simulation.paused = paused;
    }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn Sandbox_SetCollisionEnabled(handle: *mut Session, enabled: bool) {
    if let Some(session) = unsafe { handle.as_mut() } {
        session.simulation.collision_enabled = enabled;
    }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn Sandbox_SetShowHeading(handle: *mut Session, show: bool) {
    if let Some(session) = unsafe { handle.as_mut() } {
        session.simulation.show_heading = show;
    }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn Sandbox_PointerMove(handle: *mut Session, x: f32, y: f32) -> Cursor {
    let session = unsafe { handle.as_mut() };
    session.map_or(Cursor::Default, |session| {
        session.simulation.pointer_move(Vec2::new(x, y))
    })
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn Sandbox_PointerDown(handle: *mut Session, x: f32, y: f32) -> Cursor {
    let session = unsafe { handle.as_mut() };
    session.map_or(Cursor::Default, |session| {
        session.simulation.pointer_down(Vec2::new(x, y))
    })
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn Sandbox_PointerUp(handle: *mut Session) -> Cursor {
    let session = unsafe { handle.as_mut() };
    session.map_or(Cursor::Default, |session| session.simulation.pointer_up())
}

/// Spawns a random body. Returns `0` when the population is full.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn Sandbox_Spawn(handle: *mut Session) -> BodyId {
    let session = unsafe { handle.as_mut() };
    session
        .and_then(|session| session.simulation.spawn())
        .unwrap_or(NO_BODY)
}

/// Removes `id`, or the selected body when `id` is `0`, or the oldest when
/// neither is present. Returns the removed id, `0` at the population floor.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn Sandbox_Remove(handle: *mut Session, id: BodyId) -> BodyId {
    let session = unsafe { handle.as_mut() };
    session
        .and_then(|session| {
            let sim = &mut session.simulation;
            let target = if id == NO_BODY { sim.selected } else { Some(id) };
            sim.remove(target)
        })
        .map_or(NO_BODY, |body| body.id)
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn Sandbox_HitTest(handle: *const Session, x: f32, y: f32) -> BodyId {
    let session = unsafe { handle.as_ref() };
    session
        .and_then(|session| session.simulation.hit_test(Vec2::new(x, y)))
        .unwrap_or(NO_BODY)
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn Sandbox_GetSelected(handle: *const Session) -> BodyId {
    let session = unsafe { handle.as_ref() };
    session
        .and_then(|session| session.simulation.selected)
        .unwrap_or(NO_BODY)
}

/// Writes velocity-field values (scaled by the input multiplier). Returns false for an unknown id.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn Sandbox_SetVelocity(
    handle: *mut Session,
    id: BodyId,
    vx: f32,
    vy: f32,
) -> bool {
    let session = unsafe { handle.as_mut() };
    session.is_some_and(|session| session.simulation.set_velocity(id, vx, vy))
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn Sandbox_GetBodyCount(handle: *const Session) -> usize {
    let session = unsafe { handle.as_ref() };
    session.map_or(0, |session| session.simulation.bodies.len())
}

/// Pointer to `Sandbox_GetBodyCount` bodies, valid until the next mutating call.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn Sandbox_GetBodies(handle: *const Session) -> *const Body {
    let session = unsafe { handle.as_ref() };
    session.map_or(std::ptr::null(), |session| session.simulation.bodies.as_ptr())
}

/// Writes the four spoke segments of the body at `index` into `out`.
///
/// # Safety
/// `out` must point to space for four `Segment`s.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn Sandbox_GetSpokes(
    handle: *const Session,
    index: usize,
    out: *mut Segment,
) -> bool {
    let Some(session) = (unsafe { handle.as_ref() }) else {
        return false;
    };
    let Some(body) = session.simulation.bodies.get(index) else {
        return false;
    };
    if out.is_null() {
        return false;
    }

    let spokes = body.spokes();
    unsafe { std::ptr::copy_nonoverlapping(spokes.as_ptr(), out, spokes.len()) };
    true
}
