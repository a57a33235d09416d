//! Read-only world state handed to every update
//!
//! The course surface, course dimensions, the observer snapshot and the tuning
//! values are owned outside the simulation core and only borrowed per tick.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::settings::Tuning;

/// Ground height oracle for the course surface
///
/// Implementations must be deterministic and side-effect free.
pub trait Terrain {
    /// Ground height at horizontal position (x, z)
    fn height_at(&self, x: f32, z: f32) -> f32;
}

/// Static course dimensions
///
/// The course runs from `z = 0` down to `z = -length`; `x` spans `[0, width]`
/// with a boundary margin on both lateral edges outside the playable width.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CourseConfig {
    /// Full course width
    pub width: f32,
    /// Playable width (centered, `<= width`)
    pub play_width: f32,
    /// Course length along -z
    pub length: f32,
    /// Height-field samples across the width (level grid columns)
    pub fields_x: u32,
    /// Height-field samples along the length (level grid rows)
    pub fields_z: u32,
}

impl CourseConfig {
    /// Lateral strip on each side kept out of the playable width
    #[inline]
    pub fn boundary_width(&self) -> f32 {
        (self.width - self.play_width) / 2.0
    }

    #[inline]
    pub fn min_x(&self) -> f32 {
        self.boundary_width()
    }

    #[inline]
    pub fn max_x(&self) -> f32 {
        self.width - self.boundary_width()
    }

    /// Clamp x into the playable strip.
    ///
    /// Returns the clamped value and which side was hit: `-1` left, `1` right, `0` none.
    pub fn clamp_x(&self, x: f32) -> (f32, i8) {
        if x < self.min_x() {
            (self.min_x(), -1)
        } else if x > self.max_x() {
            (self.max_x(), 1)
        } else {
            (x, 0)
        }
    }

    /// Whether a point lies inside the playable strip and the course length
    pub fn contains(&self, position: Vec3) -> bool {
        position.x >= self.min_x()
            && position.x <= self.max_x()
            && position.z <= 0.0
            && position.z >= -self.length
    }
}

/// Snapshot of the player-controlled observer for the current tick
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ObserverState {
    pub position: Vec3,
    pub velocity: Vec3,
    /// Observer is off the ground (jumping); actors neither chase nor throw
    pub airborne: bool,
}

/// Everything an update may read, borrowed for one tick
#[derive(Clone, Copy)]
pub struct WorldContext<'a> {
    pub terrain: &'a dyn Terrain,
    pub course: &'a CourseConfig,
    pub observer: &'a ObserverState,
    pub tuning: &'a Tuning,
}

impl<'a> WorldContext<'a> {
    pub fn new(
        terrain: &'a dyn Terrain,
        course: &'a CourseConfig,
        observer: &'a ObserverState,
        tuning: &'a Tuning,
    ) -> Self {
        Self {
            terrain,
            course,
            observer,
            tuning,
        }
    }

    /// Ground height under a point
    #[inline]
    pub fn ground(&self, position: Vec3) -> f32 {
        self.terrain.height_at(position.x, position.z)
    }
}
