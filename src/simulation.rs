use crate::{
    body::{Body, BodyId, Bounds, Segment},
    collision,
    color::Color,
    config::SandboxConfig,
    utils,
};

use ultraviolet::Vec2;

/// Mouse cursor the host should show for the current pointer position.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cursor {
    Default,
    /// Pointer is over a body it could pick up.
    Grab,
    /// A body is being dragged.
    Grabbing,
}

/// Drawing sink for `Simulation::render`.
pub trait Renderer {
    fn circle(&mut self, center: Vec2, radius: f32, color: Color);
    fn line(&mut self, segment: Segment, color: Color);
}

/// The whole sandbox state: bodies, canvas, pointer and host-controlled flags.
///
/// Host input handlers and the frame driver both mutate it, never at the same
/// time; `&mut self` on every mutator keeps it that way.
#[derive(Debug)]
pub struct Simulation {
    /// Bodies in spawn order. Order decides collision roles and hit-test priority.
    pub bodies: Vec<Body>,
    pub bounds: Bounds,
    pub pointer: Vec2,
    /// Pointer position at the end of the previous step.
    pub pointer_prev: Vec2,
    pub paused: bool,
    pub collision_enabled: bool,
    pub show_heading: bool,
    /// Body picked by the last pointer-down, kept after release.
    pub selected: Option<BodyId>,
    /// A velocity field has keyboard focus; `velocity_field` stops reporting
    /// so the host does not overwrite what the user is typing.
    pub input_focused: bool,
    /// Number of steps taken, paused ones included.
    pub frame: usize,
    config: SandboxConfig,
    palette: Vec<Color>,
    rng: fastrand::Rng,
    next_id: BodyId,
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new()
    }
}

impl Simulation {
    /// A session with default tuning and the canonical first body.
    pub fn new() -> Self {
        Self::with_config(SandboxConfig::default())
    }

    /// A session seeded with one body at the configured initial position.
    pub fn with_config(config: SandboxConfig) -> Self {
        let mut sim = Self::empty(config);
        let population = &sim.config.population;
        let first = Body::new(
            0,
            population.initial_position(),
            population.initial_velocity(),
            population.radius,
            Color::BLACK,
        );
        sim.insert(first);
        sim
    }

    /// A session with no bodies; callers add them with `insert` or `spawn`.
    pub fn empty(config: SandboxConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => fastrand::Rng::with_seed(seed),
            None => fastrand::Rng::new(),
        };
        let palette = match config.population.colors() {
            colors if colors.is_empty() => vec![Color::BLACK],
            colors => colors,
        };

        Self {
            bodies: Vec::with_capacity(config.population.max_bodies),
            bounds: Bounds::new(config.width, config.height),
            pointer: Vec2::zero(),
            pointer_prev: Vec2::zero(),
            paused: config.paused,
            collision_enabled: config.collision_enabled,
            show_heading: config.show_heading,
            selected: None,
            input_focused: false,
            frame: 0,
            config,
            palette,
            rng,
            next_id: 1,
        }
    }

    pub fn config(&self) -> &SandboxConfig {
        &self.config
    }

    /// Adds a prepared body, assigning it a fresh id. Ignores the population cap.
    pub fn insert(&mut self, mut body: Body) -> BodyId {
        body.id = self.next_id;
        self.next_id += 1;
        self.bodies.push(body);
        body.id
    }

    /// Spawns a body at a random x along the spawn line with a random palette color.
    /// Returns `None` once the population cap is reached.
    pub fn spawn(&mut self) -> Option<BodyId> {
        let radius = self.config.population.radius;
        let x = utils::random_spawn_x(&mut self.rng, self.bounds.width, radius);
        let color = utils::random_color(&mut self.rng, &self.palette);
        self.spawn_at(x, radius, color)
    }

    /// Spawns a body on the spawn line at `x`. Returns `None` once the population cap is reached.
    pub fn spawn_at(&mut self, x: f32, radius: f32, color: Color) -> Option<BodyId> {
        let population = &self.config.population;
        if self.bodies.len() >= population.max_bodies {
            log::debug!("spawn rejected, population at cap {}", population.max_bodies);
            return None;
        }
        if !(x.is_finite() && radius.is_finite() && radius > 0.0) {
            log::debug!("spawn rejected, invalid geometry x={x} r={radius}");
            return None;
        }

        let body = Body::new(
            0,
            Vec2::new(x, population.spawn_y),
            population.initial_velocity(),
            radius,
            color,
        );
        let id = self.insert(body);
        log::debug!("spawned body {id} at x={x} ({} total)", self.bodies.len());
        Some(id)
    }

    /// Removes `target` if it names a live body, otherwise the oldest body.
    /// Never drops below the population floor.
    pub fn remove(&mut self, target: Option<BodyId>) -> Option<Body> {
        if self.bodies.len() <= self.config.population.min_bodies {
            log::debug!(
                "remove rejected, population at floor {}",
                self.config.population.min_bodies
            );
            return None;
        }

        let index = target.and_then(|id| self.index_of(id)).unwrap_or(0);
        let removed = self.bodies.remove(index);
        if self.selected == Some(removed.id) {
            self.selected = None;
        }
        log::debug!("removed body {} ({} left)", removed.id, self.bodies.len());
        Some(removed)
    }

    /// Removes the selected body, or the oldest if nothing is selected.
    pub fn remove_selected(&mut self) -> Option<Body> {
        self.remove(self.selected)
    }

    pub fn index_of(&self, id: BodyId) -> Option<usize> {
        self.bodies.iter().position(|body| body.id == id)
    }

    pub fn body(&self, id: BodyId) -> Option<&Body> {
        self.bodies.iter().find(|body| body.id == id)
    }

    pub fn body_mut(&mut self, id: BodyId) -> Option<&mut Body> {
        self.bodies.iter_mut().find(|body| body.id == id)
    }

    /// First body, in list order, containing `point`.
    pub fn hit_test(&self, point: Vec2) -> Option<BodyId> {
        self.bodies.iter().find(|body| body.contains_point(point)).map(|body| body.id)
    }

    pub fn set_bounds(&mut self, width: f32, height: f32) {
        self.bounds = Bounds::new(width, height);
    }

    pub fn pointer_move(&mut self, point: Vec2) -> Cursor {
        self.pointer = point;
        self.cursor()
    }

    /// Picks up the first body under `point` and releases every other one.
    pub fn pointer_down(&mut self, point: Vec2) -> Cursor {
        self.pointer = point;
        let hit = self.hit_test(point);

        for body in &mut self.bodies {
            body.held = Some(body.id) == hit;
        }
        if let Some(id) = hit {
            self.selected = Some(id);
            log::debug!("picked up body {id}");
        }

        self.cursor()
    }

    /// Drops whatever is held. The selection survives for the velocity fields.
    pub fn pointer_up(&mut self) -> Cursor {
        for body in &mut self.bodies {
            body.held = false;
        }
        self.cursor()
    }

    /// Cursor hint from the first body that is held or under the pointer.
    pub fn cursor(&self) -> Cursor {
        for body in &self.bodies {
            if body.held {
                return Cursor::Grabbing;
            }
            if body.contains_point(self.pointer) {
                return Cursor::Grab;
            }
        }
        Cursor::Default
    }

    /// Sets a body's velocity from velocity-field units. Non-finite input counts as zero.
    pub fn set_velocity(&mut self, id: BodyId, vx: f32, vy: f32) -> bool {
        let scaling = self.config.physics.input_scaling;
        let Some(body) = self.body_mut(id) else {
            return false;
        };

        let field = |v: f32| if v.is_finite() { v } else { 0.0 };
        body.vel = Vec2::new(field(vx), field(vy)) * scaling;
        true
    }

    /// Velocity in field units, rounded to four decimals for display.
    /// `None` while a field is being edited.
    pub fn velocity_field(&self, id: BodyId) -> Option<(f32, f32)> {
        if self.input_focused {
            return None;
        }
        let scaling = self.config.physics.input_scaling;
        let round = |v: f32| ((v / scaling) * 10_000.0).round() / 10_000.0;
        self.body(id).map(|body| (round(body.vel.x), round(body.vel.y)))
    }

    /// Editing a velocity field pauses the sandbox; leaving it resumes.
    pub fn set_input_focused(&mut self, focused: bool) {
        self.input_focused = focused;
        self.paused = focused;
    }

    /// The host window lost focus.
    pub fn focus_lost(&mut self) {
        self.paused = true;
    }

    /// Advances the sandbox by `dt` seconds.
    ///
    /// Bodies are processed in list order. Each one is snapped to the pointer
    /// if held, kept inside the canvas, collided against every later body, and
    /// then integrated, so a body's collision response lands before its own
    /// gravity and friction for the frame.
    ///
    /// A zero (or invalid) `dt` is a frozen frame: held bodies follow the
    /// pointer, nothing else moves and no velocity changes.
    pub fn step(&mut self, dt: f32) {
        if !(dt.is_finite() && dt > 0.0) {
            self.hold_frame();
            return;
        }

        let physics = &self.config.physics;
        let pointer_delta = self.pointer - self.pointer_prev;

        for i in 0..self.bodies.len() {
            let (head, tail) = self.bodies.split_at_mut(i + 1);
            let body = &mut head[i];

            if body.held {
                body.pos = self.pointer;
                body.vel = Vec2::zero();
            }

            body.resolve_wall_collision(self.bounds, physics.restitution);

            if self.collision_enabled {
                for other in tail.iter_mut() {
                    if collision::overlaps(body, other) {
                        collision::resolve(body, other, physics.restitution);
                    }
                }
            }

            body.integrate(dt, pointer_delta, physics);
        }

        self.pointer_prev = self.pointer;
        self.frame += 1;
    }

    fn hold_frame(&mut self) {
        for body in self.bodies.iter_mut().filter(|body| body.held) {
            body.pos = self.pointer;
        }
        self.pointer_prev = self.pointer;
        self.frame += 1;
    }

    /// Draws every body in list order: outline, spokes, and the heading line
    /// when enabled.
    pub fn render<R: Renderer>(&self, renderer: &mut R) {
        for body in &self.bodies {
            renderer.circle(body.pos, body.radius, body.color);
            for spoke in body.spokes() {
                renderer.line(spoke, body.color);
            }
            if self.show_heading {
                if let Some(heading) = body.heading() {
                    renderer.line(heading, body.color);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sandbox() -> Simulation {
        Simulation::with_config(SandboxConfig {
            width: 800.0,
            height: 600.0,
            paused: false,
            seed: Some(3),
            ..SandboxConfig::default()
        })
    }

    #[test]
    fn starts_with_canonical_body() {
        let sim = sandbox();
        assert_eq!(sim.bodies.len(), 1);

        let first = &sim.bodies[0];
        assert_eq!(first.pos, Vec2::new(100.0, 100.0));
        assert_eq!(first.vel, Vec2::new(150.0, 0.0));
        assert_eq!(first.radius, 50.0);
        assert_eq!(first.color, Color::BLACK);
        assert_eq!(first.id, 1);
    }

    #[test]
    fn spawn_stays_on_canvas_and_uses_palette() {
        let mut sim = sandbox();
        for _ in 0..20 {
            let id = sim.spawn().unwrap();
            let body = sim.body(id).unwrap();
            assert!(body.pos.x >= 50.0 && body.pos.x <= 750.0);
            assert_eq!(body.pos.y, 100.0);
            assert_eq!(body.pos.x.fract(), 0.0);
            assert!(sim.palette.contains(&body.color));
        }
    }

    #[test]
    fn ids_are_never_reused() {
        let mut sim = sandbox();
        let a = sim.spawn().unwrap();
        sim.remove(Some(a));
        let b = sim.spawn().unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn remove_prefers_selection_then_oldest() {
        let mut sim = sandbox();
        let first = sim.bodies[0].id;
        let second = sim.spawn_at(300.0, 50.0, Color::BLACK).unwrap();
        let third = sim.spawn_at(500.0, 50.0, Color::BLACK).unwrap();

        sim.selected = Some(third);
        assert_eq!(sim.remove_selected().map(|b| b.id), Some(third));
        assert_eq!(sim.selected, None);

        assert_eq!(sim.remove_selected().map(|b| b.id), Some(first));
        assert_eq!(sim.bodies[0].id, second);

        // Floor of one body.
        assert!(sim.remove_selected().is_none());
        assert_eq!(sim.bodies.len(), 1);
    }

    #[test]
    fn remove_with_stale_id_takes_oldest() {
        let mut sim = sandbox();
        let first = sim.bodies[0].id;
        sim.spawn_at(300.0, 50.0, Color::BLACK).unwrap();

        assert_eq!(sim.remove(Some(999)).map(|b| b.id), Some(first));
    }

    #[test]
    fn pointer_down_holds_only_the_first_hit() {
        let mut sim = sandbox();
        let second = sim.spawn_at(120.0, 50.0, Color::BLACK).unwrap();
        sim.bodies[1].pos = Vec2::new(120.0, 100.0);

        let cursor = sim.pointer_down(Vec2::new(110.0, 100.0));

        assert_eq!(cursor, Cursor::Grabbing);
        assert!(sim.bodies[0].held);
        assert!(!sim.body(second).unwrap().held);
        assert_eq!(sim.selected, Some(sim.bodies[0].id));
    }

    #[test]
    fn pointer_up_releases_but_keeps_selection() {
        let mut sim = sandbox();
        sim.pointer_down(Vec2::new(100.0, 100.0));
        let cursor = sim.pointer_up();

        assert_eq!(cursor, Cursor::Grab);
        assert!(sim.bodies.iter().all(|b| !b.held));
        assert_eq!(sim.selected, Some(sim.bodies[0].id));

        assert_eq!(sim.pointer_move(Vec2::new(700.0, 500.0)), Cursor::Default);
    }

    #[test]
    fn missed_pointer_down_keeps_previous_selection() {
        let mut sim = sandbox();
        sim.pointer_down(Vec2::new(100.0, 100.0));
        sim.pointer_up();
        sim.pointer_down(Vec2::new(700.0, 500.0));

        assert_eq!(sim.selected, Some(sim.bodies[0].id));
        assert!(!sim.bodies[0].held);
    }

    #[test]
    fn held_body_follows_pointer_and_is_thrown_on_release() {
        let mut sim = sandbox();
        sim.pointer_move(Vec2::new(100.0, 100.0));
        sim.step(0.016);
        sim.pointer_down(Vec2::new(100.0, 100.0));

        sim.pointer_move(Vec2::new(104.0, 98.0));
        sim.step(0.016);

        let body = sim.bodies[0];
        assert_eq!(body.pos, Vec2::new(104.0, 98.0));
        assert_eq!(body.vel, Vec2::new(200.0, -100.0));

        sim.pointer_up();
        sim.step(0.016);
        assert!(sim.bodies[0].pos.x > 104.0);
    }

    #[test]
    fn velocity_fields_scale_and_round() {
        let mut sim = sandbox();
        let id = sim.bodies[0].id;

        assert!(sim.set_velocity(id, 2.0, -1.5));
        assert_eq!(sim.bodies[0].vel, Vec2::new(100.0, -75.0));
        assert_eq!(sim.velocity_field(id), Some((2.0, -1.5)));

        sim.bodies[0].vel = Vec2::new(1.0, 0.0);
        assert_eq!(sim.velocity_field(id), Some((0.02, 0.0)));

        assert!(sim.set_velocity(id, f32::NAN, f32::INFINITY));
        assert_eq!(sim.bodies[0].vel, Vec2::zero());

        assert!(!sim.set_velocity(999, 1.0, 1.0));
        assert_eq!(sim.velocity_field(999), None);
    }

    #[test]
    fn field_focus_pauses_and_resumes() {
        let mut sim = sandbox();
        let id = sim.bodies[0].id;
        sim.set_input_focused(true);
        assert!(sim.paused);
        assert_eq!(sim.velocity_field(id), None);
        sim.set_input_focused(false);
        assert!(!sim.paused);
        assert_eq!(sim.velocity_field(id), Some((3.0, 0.0)));
        sim.focus_lost();
        assert!(sim.paused);
    }

    #[test]
    fn collision_toggle_skips_pair_scan() {
        let mut sim = sandbox();
        sim.collision_enabled = false;
        sim.bodies[0].vel = Vec2::zero();
        sim.spawn_at(140.0, 50.0, Color::BLACK).unwrap();
        sim.bodies[1].vel = Vec2::zero();

        sim.step(1.0 / 60.0);
        assert_eq!(sim.bodies[1].pos.x, 140.0);

        sim.collision_enabled = true;
        sim.step(1.0 / 60.0);
        assert_eq!(sim.bodies[1].pos.x, 200.0);
    }

    #[test]
    fn frozen_frame_only_moves_held_bodies() {
        let mut sim = sandbox();
        sim.spawn_at(140.0, 50.0, Color::BLACK).unwrap();
        sim.bodies[1].vel = Vec2::new(-30.0, 0.0);
        let second = sim.bodies[1];

        sim.pointer_down(Vec2::new(100.0, 100.0));
        sim.pointer_move(Vec2::new(90.0, 120.0));
        let held_vel = sim.bodies[0].vel;
        sim.step(0.0);

        assert_eq!(sim.bodies[0].pos, Vec2::new(90.0, 120.0));
        assert_eq!(sim.bodies[0].vel, held_vel);
        assert_eq!(sim.bodies[1].pos, second.pos);
        assert_eq!(sim.bodies[1].vel, second.vel);
        assert_eq!(sim.pointer_prev, sim.pointer);
        assert_eq!(sim.frame, 1);
    }

    #[derive(Default)]
    struct Tally {
        circles: usize,
        lines: usize,
    }

    impl Renderer for Tally {
        fn circle(&mut self, _: Vec2, _: f32, _: Color) {
            self.circles += 1;
        }

        fn line(&mut self, _: Segment, _: Color) {
            self.lines += 1;
        }
    }

    #[test]
    fn render_draws_spokes_and_optional_heading() {
        let mut sim = sandbox();
        sim.spawn_at(400.0, 50.0, Color::BLACK).unwrap();
        sim.bodies[1].vel = Vec2::zero();

        let mut tally = Tally::default();
        sim.render(&mut tally);
        assert_eq!((tally.circles, tally.lines), (2, 8));

        sim.show_heading = true;
        let mut tally = Tally::default();
        sim.render(&mut tally);
        // Only the moving first body gets a heading.
        assert_eq!((tally.circles, tally.lines), (2, 9));
    }
}
