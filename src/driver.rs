use crate::{config::SandboxConfig, simulation::Simulation};

/// Turns display-refresh timestamps into simulation steps.
///
/// The host calls `tick` once per refresh for as long as the sandbox is on
/// screen. While paused the steps still run with `dt = 0` so held bodies keep
/// following the pointer.
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameDriver {
    /// Timestamp of the previous tick, milliseconds.
    pub previous_timestamp: f64,
}

impl FrameDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Steps `sim` for the time since the last tick and returns the `dt` used, in seconds.
    pub fn tick(&mut self, sim: &mut Simulation, timestamp: f64) -> f32 {
        let elapsed = (timestamp - self.previous_timestamp) / 1000.0;
        let dt = if sim.paused || !elapsed.is_finite() || elapsed < 0.0 {
            0.0
        } else {
            elapsed as f32
        };
        if timestamp.is_finite() {
            self.previous_timestamp = timestamp;
        }

        log::trace!("frame {} dt={dt}", sim.frame);
        sim.step(dt);
        dt
    }
}

/// A simulation together with the driver that advances it; the unit a host owns.
#[derive(Debug, Default)]
pub struct Session {
    pub simulation: Simulation,
    pub driver: FrameDriver,
}

impl Session {
    pub fn new(config: SandboxConfig) -> Self {
        Self {
            simulation: Simulation::with_config(config),
            driver: FrameDriver::new(),
        }
    }

    /// One display refresh at `timestamp` milliseconds.
    pub fn frame(&mut self, timestamp: f64) -> f32 {
        self.driver.tick(&mut self.simulation, timestamp)
    }
}
