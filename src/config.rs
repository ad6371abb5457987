//! Tuning constants for a sandbox session, loadable from YAML.
//!
//! Every field has a default, so a scenario file only lists what it changes:
//!
//! ```yaml
//! width: 1920
//! height: 1080
//! paused: false
//! seed: 7
//!
//! physics:
//!   gravity: 1100.0        # px/s², +y is down
//!   friction: -0.5         # horizontal damping coefficient
//!   restitution: 0.8       # kept on floor/ceiling bounces
//!
//! population:
//!   max_bodies: 30
//!   palette: ["#dc8a78", "#40a02b"]
//! ```

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use anyhow::{Context, Result, ensure};
use serde::Deserialize;
use ultraviolet::Vec2;

use crate::color::{Color, DEFAULT_PALETTE};

/// Constants consumed by integration and collision response.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct PhysicsConfig {
    pub gravity: f32,          // downward acceleration, px/s²
    pub friction: f32,         // negative: horizontal velocity decays toward zero
    pub restitution: f32,      // fraction of velocity kept after a floor/ceiling or body bounce
    pub drag_sensitivity: f32, // pointer delta (px/frame) -> held body velocity
    pub input_scaling: f32,    // velocity field units -> px/s
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: 1100.0,
            friction: -0.5,
            restitution: 0.8,
            drag_sensitivity: 50.0,
            input_scaling: 50.0,
        }
    }
}

/// Spawn and removal rules.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct PopulationConfig {
    pub max_bodies: usize,
    pub min_bodies: usize,
    pub radius: f32,
    pub spawn_y: f32,
    pub initial_position: [f32; 2],
    pub initial_velocity: [f32; 2],
    pub palette: Vec<String>,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            max_bodies: 30,
            min_bodies: 1,
            radius: 50.0,
            spawn_y: 100.0,
            initial_position: [100.0, 100.0],
            initial_velocity: [150.0, 0.0],
            palette: DEFAULT_PALETTE.iter().map(|hex| hex.to_string()).collect(),
        }
    }
}

impl PopulationConfig {
    pub fn initial_position(&self) -> Vec2 {
        let [x, y] = self.initial_position;
        Vec2::new(x, y)
    }

    pub fn initial_velocity(&self) -> Vec2 {
        let [x, y] = self.initial_velocity;
        Vec2::new(x, y)
    }

    /// Parsed palette. Malformed entries are skipped; `validate` rejects them up front.
    pub fn colors(&self) -> Vec<Color> {
        self.palette.iter().filter_map(|hex| Color::from_hex(hex)).collect()
    }
}

/// Top-level session configuration.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct SandboxConfig {
    pub width: f32,
    pub height: f32,
    pub paused: bool,
    pub collision_enabled: bool,
    pub show_heading: bool,
    pub seed: Option<u64>,
    pub physics: PhysicsConfig,
    pub population: PopulationConfig,
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
            paused: true,
            collision_enabled: true,
            show_heading: false,
            seed: None,
            physics: PhysicsConfig::default(),
            population: PopulationConfig::default(),
        }
    }
}

impl SandboxConfig {
    /// Loads and validates a YAML scenario file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
        Self::from_reader(BufReader::new(file))
            .with_context(|| format!("loading {}", path.display()))
    }

    pub fn from_reader(reader: impl Read) -> Result<Self> {
        let config: SandboxConfig = serde_yaml::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: SandboxConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let physics = &self.physics;
        let population = &self.population;

        ensure!(
            self.width.is_finite()
                && self.width > 0.0
                && self.height.is_finite()
                && self.height > 0.0,
            "canvas size must be positive, got {}x{}",
            self.width,
            self.height
        );
        ensure!(
            [physics.gravity, physics.friction, physics.drag_sensitivity, physics.input_scaling]
                .iter()
                .all(|v| v.is_finite()),
            "physics constants must be finite"
        );
        ensure!(
            (0.0..=1.0).contains(&physics.restitution),
            "restitution must lie in [0, 1], got {}",
            physics.restitution
        );
        ensure!(physics.input_scaling != 0.0, "input_scaling must be non-zero");
        ensure!(
            population.radius.is_finite() && population.radius > 0.0,
            "radius must be positive, got {}",
            population.radius
        );
        ensure!(
            population.min_bodies >= 1 && population.min_bodies <= population.max_bodies,
            "population bounds must satisfy 1 <= min_bodies <= max_bodies, got {}..={}",
            population.min_bodies,
            population.max_bodies
        );
        ensure!(
            population
                .initial_position
                .iter()
                .chain(&population.initial_velocity)
                .chain(std::iter::once(&population.spawn_y))
                .all(|v| v.is_finite()),
            "initial body state must be finite"
        );
        ensure!(!population.palette.is_empty(), "palette must not be empty");
        for hex in &population.palette {
            ensure!(Color::from_hex(hex).is_some(), "malformed palette color {hex:?}");
        }

        Ok(())
    }
}
