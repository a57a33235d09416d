//! Per-tick simulation driver
//!
//! Advances every item and actor of a level by one step, applies the
//! observer-facing side effects they report, then sweeps the observer's
//! movement against everything it can bump into.

use std::collections::BTreeMap;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::actor::{HostileActor, MovementPattern};
use super::collision::sweep;
use super::entity::Entity;
use super::item_type::ItemKind;
use super::world::{CourseConfig, ObserverState, Terrain, WorldContext};
use crate::audio::{SoundEffect, SoundPlayer};
use crate::settings::Tuning;

/// Something that happened during a tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SimEvent {
    /// An actor launched a projectile
    ProjectileThrown { actor: u32 },
    /// A projectile from `actor` struck the observer
    ObserverHit { actor: u32, knockback: f32 },
    /// The observer's movement crossed an obstacle footprint
    ObstacleHit { item: u32 },
    /// The observer picked up a collectable
    Collected { item: u32 },
}

impl SimEvent {
    /// Sound effect to request for this event, if any
    pub fn sound(&self) -> Option<SoundEffect> {
        match self {
            SimEvent::ProjectileThrown { .. } => None,
            SimEvent::ObserverHit { .. } => Some(SoundEffect::ProjectileHit),
            SimEvent::ObstacleHit { .. } => Some(SoundEffect::ObstacleHit),
            SimEvent::Collected { .. } => Some(SoundEffect::Collect),
        }
    }
}

/// Events produced by one tick, in the order they happened
#[derive(Debug, Clone, Default)]
pub struct TickReport {
    pub events: Vec<SimEvent>,
}

impl TickReport {
    /// Ids of obstacles the observer ran into
    pub fn obstacle_hits(&self) -> Vec<u32> {
        self.events
            .iter()
            .filter_map(|e| match e {
                SimEvent::ObstacleHit { item } => Some(*item),
                _ => None,
            })
            .collect()
    }

    /// Number of projectile hits on the observer
    pub fn observer_hits(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, SimEvent::ObserverHit { .. }))
            .count()
    }

    /// Number of projectiles thrown
    pub fn throws(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, SimEvent::ProjectileThrown { .. }))
            .count()
    }
}

/// Course collaborators shared by every tick
#[derive(Clone, Copy)]
pub struct Environment<'a> {
    pub terrain: &'a dyn Terrain,
    pub course: &'a CourseConfig,
    pub tuning: &'a Tuning,
}

impl<'a> Environment<'a> {
    pub fn new(terrain: &'a dyn Terrain, course: &'a CourseConfig, tuning: &'a Tuning) -> Self {
        Self {
            terrain,
            course,
            tuning,
        }
    }

    /// Read-only context for one update, with the given observer snapshot
    pub fn context<'b>(&'b self, observer: &'b ObserverState) -> WorldContext<'b> {
        WorldContext::new(self.terrain, self.course, observer, self.tuning)
    }
}

/// Everything placed on the course for one level
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Level {
    /// Plain items (trees, flags, collectables), sorted by id
    pub items: Vec<Entity>,
    /// Hostile actors, sorted by id
    pub actors: Vec<HostileActor>,
    /// Next entity ID
    next_id: u32,
}

impl Level {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            actors: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id.max(1);
        self.next_id = id + 1;
        id
    }

    /// Place a plain item
    pub fn add_item(&mut self, kind: ItemKind, position: Vec3, height: f32, diameter: f32) -> u32 {
        let id = self.next_entity_id();
        self.items
            .push(Entity::new(id, kind, position, height, diameter));
        id
    }

    /// Place an actor driven by `pattern`
    pub fn add_actor(
        &mut self,
        kind: ItemKind,
        position: Vec3,
        size: (f32, f32),
        pattern: MovementPattern,
        speed: f32,
    ) -> u32 {
        let id = self.next_entity_id();
        let (height, diameter) = size;
        let body = Entity::new(id, kind, position, height, diameter);
        self.actors.push(HostileActor::new(body, pattern, speed));
        id
    }

    /// Ensure deterministic iteration order
    pub fn normalize_order(&mut self) {
        self.items.sort_by_key(|e| e.id);
        self.actors.sort_by_key(|a| a.id());
    }

    /// Every entity body (items first, then actors)
    pub fn bodies(&self) -> impl Iterator<Item = &Entity> {
        self.items
            .iter()
            .chain(self.actors.iter().map(|a| &a.body))
    }

    /// Entity bodies grouped by kind, for batched rendering
    pub fn items_by_kind(&self) -> BTreeMap<ItemKind, Vec<&Entity>> {
        let mut groups: BTreeMap<ItemKind, Vec<&Entity>> = BTreeMap::new();
        for body in self.bodies() {
            groups.entry(body.kind).or_default().push(body);
        }
        groups
    }

    /// Total live projectiles across all actors
    pub fn live_projectiles(&self) -> usize {
        self.actors.iter().map(|a| a.projectiles.len()).sum()
    }

    /// What the renderer needs this frame
    pub fn render_snapshot(&self) -> RenderSnapshot {
        let items = self
            .bodies()
            .filter(|b| !b.collected)
            .map(|b| RenderItem {
                id: b.id,
                kind: b.kind,
                visual_id: b.descriptor().visual_id,
                is_flat: b.descriptor().is_flat,
                position: b.position,
                height: b.height,
                diameter: b.diameter,
            })
            .collect();

        let projectiles = self
            .actors
            .iter()
            .flat_map(|a| a.projectiles.iter())
            .map(|p| RenderProjectile {
                position: p.position,
                radius: p.radius,
                active: p.active,
            })
            .collect();

        RenderSnapshot { items, projectiles }
    }
}

/// Render data for one entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderItem {
    pub id: u32,
    pub kind: ItemKind,
    pub visual_id: u32,
    pub is_flat: bool,
    pub position: Vec3,
    pub height: f32,
    pub diameter: f32,
}

/// Render data for one projectile
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RenderProjectile {
    pub position: Vec3,
    pub radius: f32,
    pub active: bool,
}

/// Render data for a whole level
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RenderSnapshot {
    pub items: Vec<RenderItem>,
    pub projectiles: Vec<RenderProjectile>,
}

/// Advance the level by one step
///
/// `observer` holds the observer's current state; `previous_position` is where
/// it was at the end of the previous tick. Knockback from projectile hits is
/// written back to `observer.velocity` before the next actor updates.
pub fn tick(
    level: &mut Level,
    env: &Environment,
    observer: &mut ObserverState,
    previous_position: Vec3,
    dt: f32,
    sound: &mut dyn SoundPlayer,
) -> TickReport {
    let mut events = Vec::new();

    {
        let snapshot = *observer;
        let ctx = env.context(&snapshot);
        for item in &mut level.items {
            item.update(dt, &ctx);
        }
    }

    for actor in &mut level.actors {
        let snapshot = *observer;
        let ctx = env.context(&snapshot);
        let first = events.len();
        actor.update(dt, &ctx, &mut events);

        for event in &events[first..] {
            if let SimEvent::ObserverHit { knockback, .. } = event {
                observer.velocity *= *knockback;
            }
            if let Some(effect) = event.sound() {
                sound.play(effect);
            }
        }
    }

    let current = observer.position;
    let bodies = level
        .items
        .iter_mut()
        .chain(level.actors.iter_mut().map(|a| &mut a.body));
    for body in bodies {
        if !body.is_solid() {
            continue;
        }
        let result = sweep(&body.footprint(), previous_position, current);
        if !result.hit {
            continue;
        }

        let event = if body.descriptor().is_collectable {
            body.collected = true;
            log::debug!("collected item {} at {:?}", body.id, result.point);
            SimEvent::Collected { item: body.id }
        } else {
            log::debug!("observer hit item {} at {:?}", body.id, result.point);
            SimEvent::ObstacleHit { item: body.id }
        };
        if let Some(effect) = event.sound() {
            sound.play(effect);
        }
        events.push(event);
    }

    TickReport { events }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::RecordingSoundPlayer;
    use crate::consts::SIM_DT;
    use crate::sim::actor::FollowState;
    use crate::sim::projectile::Projectile;
    use crate::terrain::FlatTerrain;

    fn course() -> CourseConfig {
        CourseConfig {
            width: 100.0,
            play_width: 80.0,
            length: 500.0,
            fields_x: 11,
            fields_z: 51,
        }
    }

    fn grounded(position: Vec3) -> ObserverState {
        ObserverState {
            position,
            velocity: Vec3::ZERO,
            airborne: false,
        }
    }

    #[test]
    fn test_entity_ids_are_sequential() {
        let mut level = Level::new();
        let a = level.add_item(ItemKind::Tree, Vec3::ZERO, 3.0, 2.0);
        let b = level.add_actor(
            ItemKind::EnemyYeti,
            Vec3::ZERO,
            (2.0, 2.0),
            MovementPattern::follow(15.0, 2.5),
            5.0,
        );
        assert_eq!((a, b), (1, 2));

        let mut restored = Level::default();
        assert_eq!(restored.next_entity_id(), 1);
    }

    #[test]
    fn test_snowman_throw_end_to_end() {
        let terrain = FlatTerrain::new(0.0);
        let course = course();
        let tuning = Tuning::default();
        let env = Environment::new(&terrain, &course, &tuning);
        let mut sound = RecordingSoundPlayer::new();

        let spot = Vec3::new(50.0, 0.0, -10.0);
        let mut level = Level::new();
        let id = level.add_actor(
            ItemKind::EnemySnowman,
            spot,
            (2.0, 1.5),
            MovementPattern::patrol(spot, spot),
            0.0,
        );

        let mut observer = grounded(Vec3::new(50.0, 0.0, -30.0));
        let previous = observer.position;
        let report = tick(&mut level, &env, &mut observer, previous, SIM_DT, &mut sound);

        assert_eq!(report.throws(), 1);
        assert_eq!(level.live_projectiles(), 1);
        assert_eq!(level.actors[0].id(), id);
        assert_eq!(level.actors[0].throw_cooldown, tuning.throw_interval);

        let report = tick(&mut level, &env, &mut observer, previous, SIM_DT, &mut sound);
        assert_eq!(report.throws(), 0);
        assert_eq!(level.live_projectiles(), 1);
    }

    #[test]
    fn test_projectile_hit_applies_knockback_and_sound() {
        let terrain = FlatTerrain::new(-100.0);
        let course = course();
        let tuning = Tuning::default();
        let env = Environment::new(&terrain, &course, &tuning);
        let mut sound = RecordingSoundPlayer::new();

        let spot = Vec3::new(50.0, 0.0, -10.0);
        let mut level = Level::new();
        level.add_actor(
            ItemKind::EnemySnowman,
            spot,
            (2.0, 1.5),
            MovementPattern::patrol(spot, spot),
            0.0,
        );

        let mut observer = ObserverState {
            position: Vec3::new(50.0, 0.0, -30.0),
            velocity: Vec3::new(0.0, 0.0, -20.0),
            airborne: false,
        };

        let actor = &mut level.actors[0];
        actor.throw_cooldown = 100.0;
        let mut p = Projectile::launch(Vec3::ZERO, Vec3::X, 15.0, &tuning);
        p.position = observer.position;
        p.velocity = Vec3::ZERO;
        actor.projectiles.push(p);

        let previous = observer.position;
        let report = tick(&mut level, &env, &mut observer, previous, SIM_DT, &mut sound);
        assert_eq!(report.observer_hits(), 1);
        assert!((observer.velocity.z - (-14.0)).abs() < 1e-4);
        assert_eq!(sound.count(SoundEffect::ProjectileHit), 1);
        assert_eq!(level.live_projectiles(), 0);
    }

    #[test]
    fn test_fast_observer_cannot_tunnel_through_tree() {
        let terrain = FlatTerrain::new(0.0);
        let course = course();
        let tuning = Tuning::default();
        let env = Environment::new(&terrain, &course, &tuning);
        let mut sound = RecordingSoundPlayer::new();

        let mut level = Level::new();
        let tree = level.add_item(ItemKind::Tree, Vec3::new(50.0, 0.0, -100.0), 4.0, 1.0);
        level.add_item(ItemKind::Tree, Vec3::new(60.0, 0.0, -100.0), 4.0, 1.0);

        // 40 units in a single tick, straight through the first trunk
        let previous = Vec3::new(50.0, 0.5, -80.0);
        let mut observer = grounded(Vec3::new(50.0, 0.5, -120.0));
        let report = tick(&mut level, &env, &mut observer, previous, SIM_DT, &mut sound);

        assert_eq!(report.obstacle_hits(), vec![tree]);
        assert_eq!(sound.count(SoundEffect::ObstacleHit), 1);
    }

    #[test]
    fn test_collectables_are_picked_up_once() {
        let terrain = FlatTerrain::new(0.0);
        let course = course();
        let tuning = Tuning::default();
        let env = Environment::new(&terrain, &course, &tuning);
        let mut sound = RecordingSoundPlayer::new();

        let mut level = Level::new();
        let fish = level.add_item(ItemKind::Herring, Vec3::new(50.0, 0.0, -50.0), 1.0, 1.0);

        let previous = Vec3::new(50.0, 0.2, -45.0);
        let mut observer = grounded(Vec3::new(50.0, 0.2, -55.0));
        let report = tick(&mut level, &env, &mut observer, previous, SIM_DT, &mut sound);
        assert!(report.events.contains(&SimEvent::Collected { item: fish }));
        assert!(level.items[0].collected);

        let report = tick(&mut level, &env, &mut observer, previous, SIM_DT, &mut sound);
        assert!(report.events.is_empty());
        assert_eq!(sound.count(SoundEffect::Collect), 1);
        assert!(level.render_snapshot().items.is_empty());
    }

    #[test]
    fn test_non_colliding_items_are_ignored() {
        let terrain = FlatTerrain::new(0.0);
        let course = course();
        let tuning = Tuning::default();
        let env = Environment::new(&terrain, &course, &tuning);
        let mut sound = RecordingSoundPlayer::new();

        let mut level = Level::new();
        level.add_item(ItemKind::Flag, Vec3::new(50.0, 0.0, -50.0), 2.0, 2.0);
        level.add_item(ItemKind::Start, Vec3::new(50.0, 0.0, -50.0), 2.0, 2.0);

        let mut observer = grounded(Vec3::new(50.0, 0.2, -50.0));
        let previous = observer.position;
        let report = tick(&mut level, &env, &mut observer, previous, SIM_DT, &mut sound);
        assert!(report.events.is_empty());
    }

    #[test]
    fn test_yeti_chases_through_driver() {
        let terrain = FlatTerrain::new(0.0);
        let course = course();
        let tuning = Tuning::default();
        let env = Environment::new(&terrain, &course, &tuning);
        let mut sound = RecordingSoundPlayer::new();

        let mut level = Level::new();
        level.add_actor(
            ItemKind::EnemyYeti,
            Vec3::new(50.0, 0.0, -100.0),
            (2.5, 2.0),
            MovementPattern::follow(15.0, 2.5),
            5.0,
        );

        let mut observer = grounded(Vec3::new(50.0, 0.0, -90.0));
        let previous = observer.position;
        tick(&mut level, &env, &mut observer, previous, SIM_DT, &mut sound);
        assert_eq!(
            level.actors[0].pattern.follow_state(),
            Some(FollowState::Chasing)
        );
    }

    #[test]
    fn test_determinism() {
        let terrain = FlatTerrain::new(0.0);
        let course = course();
        let tuning = Tuning::default();
        let env = Environment::new(&terrain, &course, &tuning);

        let build = || {
            let mut level = Level::new();
            let a = Vec3::new(30.0, 0.0, -40.0);
            level.add_actor(
                ItemKind::EnemyPenguin,
                a,
                (1.0, 1.0),
                MovementPattern::patrol(a, a + Vec3::new(10.0, 0.0, 0.0)),
                4.0,
            );
            level.add_actor(
                ItemKind::EnemySnowman,
                Vec3::new(50.0, 0.0, -60.0),
                (2.0, 1.5),
                MovementPattern::circular(Vec3::new(50.0, 0.0, -60.0), 4.0, 1.0),
                0.0,
            );
            level.add_actor(
                ItemKind::EnemyYeti,
                Vec3::new(60.0, 0.0, -80.0),
                (2.5, 2.0),
                MovementPattern::follow(15.0, 2.5),
                5.0,
            );
            level
        };

        let mut level1 = build();
        let mut level2 = build();
        let mut obs1 = grounded(Vec3::new(50.0, 0.0, 0.0));
        let mut obs2 = obs1;
        let mut sound1 = RecordingSoundPlayer::new();
        let mut sound2 = RecordingSoundPlayer::new();

        for _ in 0..600 {
            let prev1 = obs1.position;
            obs1.velocity = Vec3::new(0.0, 0.0, -12.0);
            obs1.position += obs1.velocity * SIM_DT;
            tick(&mut level1, &env, &mut obs1, prev1, SIM_DT, &mut sound1);

            let prev2 = obs2.position;
            obs2.velocity = Vec3::new(0.0, 0.0, -12.0);
            obs2.position += obs2.velocity * SIM_DT;
            tick(&mut level2, &env, &mut obs2, prev2, SIM_DT, &mut sound2);
        }

        assert_eq!(sound1.played, sound2.played);
        assert_eq!(level1.render_snapshot(), level2.render_snapshot());
        assert_eq!(obs1, obs2);
    }

    #[test]
    fn test_items_by_kind_and_snapshot() {
        let mut level = Level::new();
        level.add_item(ItemKind::Tree, Vec3::new(10.0, 0.0, -5.0), 3.0, 1.0);
        level.add_item(ItemKind::Tree, Vec3::new(20.0, 0.0, -5.0), 3.0, 1.0);
        level.add_item(ItemKind::Flag, Vec3::new(30.0, 0.0, -5.0), 1.0, 1.0);
        level.add_actor(
            ItemKind::EnemyPenguin,
            Vec3::new(40.0, 0.0, -5.0),
            (1.0, 1.0),
            MovementPattern::patrol(Vec3::ZERO, Vec3::X),
            5.0,
        );

        let groups = level.items_by_kind();
        assert_eq!(groups[&ItemKind::Tree].len(), 2);
        assert_eq!(groups[&ItemKind::Flag].len(), 1);
        assert_eq!(groups[&ItemKind::EnemyPenguin].len(), 1);
        assert!(!groups.contains_key(&ItemKind::EnemyYeti));

        let snapshot = level.render_snapshot();
        assert_eq!(snapshot.items.len(), 4);
        assert!(snapshot.projectiles.is_empty());
        assert_eq!(snapshot.items[2].visual_id, 2);
        assert!(snapshot.items[2].is_flat);
    }
}
