//! Thrown projectiles
//!
//! Ballistic objects launched by throwing actors. A projectile flies under
//! constant gravity until it expires, lands, leaves the course or hits the
//! observer.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::world::WorldContext;
use crate::settings::Tuning;

/// A live (or spent) projectile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub position: Vec3,
    pub velocity: Vec3,
    pub radius: f32,
    /// Seconds since launch
    pub lifetime: f32,
    pub max_lifetime: f32,
    pub active: bool,
}

impl Projectile {
    /// Launch from `origin` toward `target` along an arcing path
    ///
    /// The aim direction gets an upward bias before the final normalization,
    /// then is scaled to the launch speed.
    pub fn launch(origin: Vec3, target: Vec3, speed: f32, tuning: &Tuning) -> Self {
        let mut direction = (target - origin).normalize_or_zero();
        direction.y += tuning.throw_arc_bias;
        let velocity = direction.normalize_or_zero() * speed;

        Self {
            position: origin,
            velocity,
            radius: tuning.projectile_radius,
            lifetime: 0.0,
            max_lifetime: tuning.projectile_max_lifetime,
            active: true,
        }
    }

    /// Advance one tick
    pub fn update(&mut self, dt: f32, ctx: &WorldContext) {
        if !self.active {
            return;
        }

        self.lifetime += dt;
        if self.lifetime > self.max_lifetime {
            self.active = false;
            return;
        }

        self.position += self.velocity * dt;
        self.velocity.y -= ctx.tuning.gravity * dt;

        if self.position.y <= ctx.ground(self.position) + self.radius {
            self.active = false;
        }

        if !ctx.course.contains(self.position) {
            self.active = false;
        }
    }

    /// Whether the projectile is touching the observer
    pub fn hits_observer(&self, ctx: &WorldContext) -> bool {
        if !self.active {
            return false;
        }
        let distance = (self.position - ctx.observer.position).length();
        distance < self.radius + ctx.tuning.observer_radius
    }
}
