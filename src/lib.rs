pub mod body;
pub mod c_api;
pub mod collision;
pub mod color;
pub mod config;
pub mod driver;
pub mod simulation;
pub mod utils;

pub use body::{Body, BodyId, Bounds, Segment};
pub use collision::{Resolution, overlaps, resolve};
pub use color::Color;
pub use config::{PhysicsConfig, PopulationConfig, SandboxConfig};
pub use driver::{FrameDriver, Session};
pub use simulation::{Cursor, Renderer, Simulation};
pub use ultraviolet::Vec2;
