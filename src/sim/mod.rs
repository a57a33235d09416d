//! Deterministic simulation module
//!
//! All per-tick gameplay logic lives here. This module must be pure and deterministic:
//! - Called once per step with a step duration
//! - Shared state arrives through an explicit, read-only `WorldContext`
//! - Stable iteration order (by entity ID)
//! - No rendering, audio or platform dependencies

pub mod actor;
pub mod collision;
pub mod entity;
pub mod item_type;
pub mod projectile;
pub mod tick;
pub mod world;

pub use actor::{FollowState, HostileActor, MovementPattern, PatternKind};
pub use collision::{Footprint, SweepResult, footprint_contains, sweep, swept_collision};
pub use entity::Entity;
pub use item_type::{ItemKind, ItemType};
pub use projectile::Projectile;
pub use tick::{
    Environment, Level, RenderItem, RenderProjectile, RenderSnapshot, SimEvent, TickReport, tick,
};
pub use world::{CourseConfig, ObserverState, Terrain, WorldContext};
