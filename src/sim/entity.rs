//! Placed course items
//!
//! An `Entity` is anything standing on the course: trees, flags, collectables,
//! and the body of every hostile actor.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::collision::Footprint;
use super::item_type::{ItemKind, ItemType};
use super::world::WorldContext;

/// A movable (or static) course item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: u32,
    pub kind: ItemKind,
    pub position: Vec3,
    pub velocity: Vec3,
    /// Spawn position, used as a home anchor
    pub initial_position: Vec3,
    /// Current (rendered) height
    pub height: f32,
    /// Current (rendered) diameter
    pub diameter: f32,
    /// Footprint size, fixed at creation from the spawn diameter
    collision_diameter: f32,
    pub collected: bool,
}

impl Entity {
    pub fn new(id: u32, kind: ItemKind, position: Vec3, height: f32, diameter: f32) -> Self {
        let collision_diameter = diameter * kind.descriptor().footprint_ratio;
        Self {
            id,
            kind,
            position,
            velocity: Vec3::ZERO,
            initial_position: position,
            height,
            diameter,
            collision_diameter,
            collected: false,
        }
    }

    #[inline]
    pub fn descriptor(&self) -> &'static ItemType {
        self.kind.descriptor()
    }

    #[inline]
    pub fn collision_diameter(&self) -> f32 {
        self.collision_diameter
    }

    #[inline]
    pub fn collision_radius(&self) -> f32 {
        self.collision_diameter / 2.0
    }

    /// Collision box for swept tests against the observer
    pub fn footprint(&self) -> Footprint {
        Footprint {
            center: self.position,
            radius: self.collision_radius(),
            height: self.height,
        }
    }

    /// Whether the observer can currently collide with this item
    pub fn is_solid(&self) -> bool {
        let ty = self.descriptor();
        !self.collected && (ty.has_collision || ty.is_collectable)
    }

    /// Advance one tick: integrate velocity, follow the ground, bounce off the course edges
    pub fn update(&mut self, dt: f32, ctx: &WorldContext) {
        if self.descriptor().is_static || self.collected {
            return;
        }

        self.position += self.velocity * dt;
        self.snap_to_ground(ctx);

        match self.clamp_to_course(ctx) {
            -1 => self.velocity.x = self.velocity.x.abs(),
            1 => self.velocity.x = -self.velocity.x.abs(),
            _ => {}
        }
    }

    #[inline]
    pub(crate) fn snap_to_ground(&mut self, ctx: &WorldContext) {
        self.position.y = ctx.ground(self.position);
    }

    /// Clamp x into the playable strip, returning the side hit (-1 left, 1 right, 0 none)
    pub(crate) fn clamp_to_course(&mut self, ctx: &WorldContext) -> i8 {
        let (x, side) = ctx.course.clamp_x(self.position.x);
        self.position.x = x;
        side
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Tuning;
    use crate::sim::world::{CourseConfig, ObserverState, Terrain};

    struct Ramp;

    impl Terrain for Ramp {
        fn height_at(&self, x: f32, z: f32) -> f32 {
            0.1 * x - 0.5 * z
        }
    }

    fn course() -> CourseConfig {
        CourseConfig {
            width: 100.0,
            play_width: 80.0,
            length: 500.0,
            fields_x: 11,
            fields_z: 51,
        }
    }

    #[test]
    fn test_footprint_from_descriptor() {
        let e = Entity::new(1, ItemKind::Tree, Vec3::ZERO, 3.0, 2.0);
        assert!((e.collision_diameter() - 0.8).abs() < 1e-6);
        assert!((e.collision_radius() - 0.4).abs() < 1e-6);
        let fp = e.footprint();
        assert_eq!(fp.height, 3.0);
    }

    #[test]
    fn test_static_items_do_not_move() {
        let course = course();
        let observer = ObserverState::default();
        let tuning = Tuning::default();
        let ctx = WorldContext::new(&Ramp, &course, &observer, &tuning);

        let mut tree = Entity::new(1, ItemKind::Tree, Vec3::new(50.0, 0.0, -10.0), 3.0, 2.0);
        tree.velocity = Vec3::new(1.0, 0.0, 0.0);
        tree.update(1.0, &ctx);
        assert_eq!(tree.position, Vec3::new(50.0, 0.0, -10.0));
    }

    #[test]
    fn test_collected_items_do_not_move() {
        let course = course();
        let observer = ObserverState::default();
        let tuning = Tuning::default();
        let ctx = WorldContext::new(&Ramp, &course, &observer, &tuning);

        let mut fish = Entity::new(1, ItemKind::Herring, Vec3::new(50.0, 0.0, -10.0), 1.0, 1.0);
        fish.velocity = Vec3::new(1.0, 0.0, 0.0);
        fish.collected = true;
        fish.update(1.0, &ctx);
        assert_eq!(fish.position.x, 50.0);
    }

    #[test]
    fn test_moves_and_follows_ground() {
        let course = course();
        let observer = ObserverState::default();
        let tuning = Tuning::default();
        let ctx = WorldContext::new(&Ramp, &course, &observer, &tuning);

        let mut flag = Entity::new(1, ItemKind::Flag, Vec3::new(50.0, 0.0, -10.0), 1.0, 1.0);
        flag.velocity = Vec3::new(2.0, 0.0, -4.0);
        flag.update(0.5, &ctx);
        assert!((flag.position.x - 51.0).abs() < 1e-5);
        assert!((flag.position.z - (-12.0)).abs() < 1e-5);
        assert!((flag.position.y - Ramp.height_at(51.0, -12.0)).abs() < 1e-5);
    }

    #[test]
    fn test_bounces_off_boundaries() {
        let course = course();
        let observer = ObserverState::default();
        let tuning = Tuning::default();
        let ctx = WorldContext::new(&Ramp, &course, &observer, &tuning);

        let mut flag = Entity::new(1, ItemKind::Flag, Vec3::new(11.0, 0.0, -10.0), 1.0, 1.0);
        flag.velocity = Vec3::new(-4.0, 0.0, 0.0);
        flag.update(1.0, &ctx);
        assert_eq!(flag.position.x, 10.0);
        assert_eq!(flag.velocity.x, 4.0);

        let mut flag = Entity::new(2, ItemKind::Flag, Vec3::new(89.0, 0.0, -10.0), 1.0, 1.0);
        flag.velocity = Vec3::new(4.0, 0.0, 0.0);
        flag.update(1.0, &ctx);
        assert_eq!(flag.position.x, 90.0);
        assert_eq!(flag.velocity.x, -4.0);
    }
}
