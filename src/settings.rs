//! Gameplay tuning
//!
//! Data-driven constants for actors and projectiles. Loaded from JSON; any
//! field missing from the file keeps its default.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading or validating tuning
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed tuning JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid tuning: {0}")]
    Invalid(String),
}

/// Gameplay tuning values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Projectiles ===
    /// Downward acceleration applied to projectiles (units/s²)
    pub gravity: f32,
    /// Launch speed of a thrown projectile (also used for lead time)
    pub projectile_speed: f32,
    /// Projectile collision radius
    pub projectile_radius: f32,
    /// Seconds before a projectile expires
    pub projectile_max_lifetime: f32,
    /// Upward bias added to the aim direction before normalization
    pub throw_arc_bias: f32,

    // === Throwing ===
    /// Seconds between throws
    pub throw_interval: f32,
    /// Observer must be closer than this to be targeted
    pub throw_range: f32,
    /// Maximum live projectiles per actor
    pub max_live_projectiles: usize,
    /// Observer velocity multiplier on projectile hit
    pub knockback: f32,
    /// Approximate observer radius for projectile hits
    pub observer_radius: f32,

    // === Movement ===
    /// Distance at which a waypoint or home counts as reached
    pub waypoint_tolerance: f32,
    /// Actor speed when level data omits one
    pub default_speed: f32,
    /// Patrol end offset along +x when level data omits the end point
    pub default_patrol_offset: f32,
    pub default_circle_radius: f32,
    pub default_angular_speed: f32,
    pub default_detection_radius: f32,
    /// Return speed as a fraction of chase speed
    pub return_speed_factor: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: 9.81,
            projectile_speed: 15.0,
            projectile_radius: 0.3,
            projectile_max_lifetime: 3.0,
            throw_arc_bias: 0.3,

            throw_interval: 2.0,
            throw_range: 25.0,
            max_live_projectiles: 3,
            knockback: 0.7,
            observer_radius: 0.5,

            waypoint_tolerance: 0.5,
            default_speed: 5.0,
            default_patrol_offset: 10.0,
            default_circle_radius: 5.0,
            default_angular_speed: 1.0,
            default_detection_radius: 15.0,
            return_speed_factor: 0.5,
        }
    }
}

impl Tuning {
    /// Parse and validate tuning from a JSON string
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load tuning from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let tuning = Self::from_json_str(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Reject values that would make per-tick math meaningless
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("projectile_speed", self.projectile_speed),
            ("projectile_radius", self.projectile_radius),
            ("projectile_max_lifetime", self.projectile_max_lifetime),
            ("throw_interval", self.throw_interval),
            ("waypoint_tolerance", self.waypoint_tolerance),
            ("observer_radius", self.observer_radius),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }

        let non_negative = [
            ("gravity", self.gravity),
            ("throw_range", self.throw_range),
            ("default_speed", self.default_speed),
            ("default_circle_radius", self.default_circle_radius),
            ("default_detection_radius", self.default_detection_radius),
            ("return_speed_factor", self.return_speed_factor),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "{name} must not be negative, got {value}"
                )));
            }
        }

        if !(0.0..=1.0).contains(&self.knockback) {
            return Err(ConfigError::Invalid(format!(
                "knockback must be within [0, 1], got {}",
                self.knockback
            )));
        }

        Ok(())
    }
}
