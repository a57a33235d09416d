//! Slope Sim - hostile actors and projectiles on a downhill course
//!
//! Core modules:
//! - `sim`: Deterministic per-tick simulation (entities, actors, projectiles, collisions)
//! - `terrain`: Height field implementations of the course surface
//! - `level`: Level data loading
//! - `settings`: Data-driven gameplay tuning
//! - `audio`: Sound-effect notifications

pub mod audio;
pub mod level;
pub mod settings;
pub mod sim;
pub mod terrain;

pub use level::{LevelError, load_level};
pub use settings::{ConfigError, Tuning};

use glam::Vec3;

/// Simulation configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Below this speed an actor is considered standing still (no bobbing)
    pub const BOB_SPEED_THRESHOLD: f32 = 0.1;
    /// Base bobbing frequency (rad/s)
    pub const BOB_BASE_FREQUENCY: f32 = 2.0;
    /// Extra bobbing frequency per unit of speed
    pub const BOB_FREQUENCY_PER_SPEED: f32 = 0.3;
    /// Bobbing amplitude (world units)
    pub const BOB_AMPLITUDE: f32 = 0.1;

    /// Pulse frequency while chasing (rad/s)
    pub const PULSE_FREQUENCY: f32 = 4.0;
    /// Pulse amplitude as a fraction of the base diameter
    pub const PULSE_AMPLITUDE: f32 = 0.05;

    /// Projectiles are thrown from this fraction of the actor's height
    pub const THROW_HEIGHT_FRACTION: f32 = 0.8;

    /// Upper bound on interior points tested per sweep
    pub const MAX_SWEEP_SAMPLES: u32 = 1024;
}

/// Unit vector from `from` toward `to`, or zero when the points coincide
#[inline]
pub fn direction_or_zero(from: Vec3, to: Vec3) -> Vec3 {
    (to - from).normalize_or_zero()
}

/// Distance between two points ignoring height
#[inline]
pub fn horizontal_distance(a: Vec3, b: Vec3) -> f32 {
    let dx = a.x - b.x;
    let dz = a.z - b.z;
    (dx * dx + dz * dz).sqrt()
}

/// Point on a horizontal circle around `center` at `angle` (height kept from `y`)
#[inline]
pub fn circle_point(center: Vec3, radius: f32, angle: f32, y: f32) -> Vec3 {
    Vec3::new(
        center.x + angle.cos() * radius,
        y,
        center.z + angle.sin() * radius,
    )
}
