//! Hostile actors
//!
//! An actor is an `Entity` body driven by a movement pattern fixed at load
//! time. Patrol and circular patterns are stateless loops; the follow pattern
//! switches between idle, chasing and returning home depending on where the
//! observer is. Throwing actors also own their live projectiles.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::entity::Entity;
use super::projectile::Projectile;
use super::tick::SimEvent;
use super::world::WorldContext;
use crate::consts::*;
use crate::{circle_point, direction_or_zero, horizontal_distance};

/// Movement pattern tag, as named in level data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PatternKind {
    Patrol,
    Circular,
    Follow,
}

impl PatternKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PatternKind::Patrol => "patrolling",
            PatternKind::Circular => "circular",
            PatternKind::Follow => "following",
        }
    }

    pub fn from_name(s: &str) -> Option<Self> {
        match s {
            "patrolling" => Some(PatternKind::Patrol),
            "circular" => Some(PatternKind::Circular),
            "following" => Some(PatternKind::Follow),
            _ => None,
        }
    }
}

/// Sub-state of the follow pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FollowState {
    /// Waiting at home
    #[default]
    Idle,
    /// Pursuing the observer
    Chasing,
    /// Walking back to the spawn position
    Returning,
}

/// Movement pattern with its per-pattern state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MovementPattern {
    /// Walk back and forth between two waypoints
    Patrol {
        start: Vec3,
        end: Vec3,
        heading_to_end: bool,
    },
    /// Orbit a center point at constant angular speed
    Circular {
        center: Vec3,
        radius: f32,
        angular_speed: f32,
        /// Accumulated angle (radians, unbounded)
        angle: f32,
    },
    /// Chase the observer when near, otherwise return home
    Follow {
        detection_radius: f32,
        return_speed: f32,
        state: FollowState,
    },
}

impl MovementPattern {
    pub fn patrol(start: Vec3, end: Vec3) -> Self {
        MovementPattern::Patrol {
            start,
            end,
            heading_to_end: true,
        }
    }

    pub fn circular(center: Vec3, radius: f32, angular_speed: f32) -> Self {
        MovementPattern::Circular {
            center,
            radius,
            angular_speed,
            angle: 0.0,
        }
    }

    pub fn follow(detection_radius: f32, return_speed: f32) -> Self {
        MovementPattern::Follow {
            detection_radius,
            return_speed,
            state: FollowState::Idle,
        }
    }

    pub fn kind(&self) -> PatternKind {
        match self {
            MovementPattern::Patrol { .. } => PatternKind::Patrol,
            MovementPattern::Circular { .. } => PatternKind::Circular,
            MovementPattern::Follow { .. } => PatternKind::Follow,
        }
    }

    /// Follow sub-state, if this is a follow pattern
    pub fn follow_state(&self) -> Option<FollowState> {
        match self {
            MovementPattern::Follow { state, .. } => Some(*state),
            _ => None,
        }
    }
}

/// A hostile actor roaming the course
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostileActor {
    pub body: Entity,
    pub pattern: MovementPattern,
    /// Movement speed (units/s)
    pub speed: f32,
    /// Total simulated time
    pub elapsed: f32,
    /// Clock for cosmetic animation only
    pub anim_time: f32,
    base_height: f32,
    base_diameter: f32,
    /// Live projectiles (throwing actors only)
    pub projectiles: Vec<Projectile>,
    /// Seconds until the next throw is allowed
    pub throw_cooldown: f32,
}

impl HostileActor {
    pub fn new(body: Entity, pattern: MovementPattern, speed: f32) -> Self {
        let base_height = body.height;
        let base_diameter = body.diameter;
        let mut body = body;
        // Orbits begin on the circle, not at its center
        if let MovementPattern::Circular {
            center,
            radius,
            angle,
            ..
        } = pattern
        {
            body.position = circle_point(center, radius, angle, body.position.y);
        }
        Self {
            body,
            pattern,
            speed,
            elapsed: 0.0,
            anim_time: 0.0,
            base_height,
            base_diameter,
            projectiles: Vec::new(),
            throw_cooldown: 0.0,
        }
    }

    #[inline]
    pub fn id(&self) -> u32 {
        self.body.id
    }

    #[inline]
    pub fn can_throw(&self) -> bool {
        self.body.descriptor().can_throw
    }

    #[inline]
    pub fn base_height(&self) -> f32 {
        self.base_height
    }

    #[inline]
    pub fn base_diameter(&self) -> f32 {
        self.base_diameter
    }

    /// Whether a follow-pattern actor is currently pursuing the observer
    pub fn is_chasing(&self) -> bool {
        self.pattern.follow_state() == Some(FollowState::Chasing)
    }

    /// Advance one tick
    ///
    /// Order: pattern movement, ground snap, boundary clamp, animation, then
    /// projectile updates and throwing. Observer hits are reported through `events`.
    pub fn update(&mut self, dt: f32, ctx: &WorldContext, events: &mut Vec<SimEvent>) {
        if self.body.collected {
            return;
        }

        self.elapsed += dt;

        match self.pattern.kind() {
            PatternKind::Patrol => self.update_patrol(dt, ctx),
            PatternKind::Circular => self.update_circular(dt),
            PatternKind::Follow => self.update_follow(dt, ctx),
        }

        self.body.snap_to_ground(ctx);

        if self.body.clamp_to_course(ctx) != 0 {
            // Patrols turn around instead of pressing into the wall
            if let MovementPattern::Patrol { heading_to_end, .. } = &mut self.pattern {
                *heading_to_end = !*heading_to_end;
            }
        }

        self.update_animation(dt);

        if self.can_throw() {
            self.update_throwing(dt, ctx, events);
        }
    }

    fn update_patrol(&mut self, dt: f32, ctx: &WorldContext) {
        let MovementPattern::Patrol {
            start,
            end,
            heading_to_end,
        } = &mut self.pattern
        else {
            return;
        };

        let target = if *heading_to_end { *end } else { *start };
        // Height follows the terrain, so arrival is judged on the ground plane
        let distance = horizontal_distance(self.body.position, target);

        if distance < ctx.tuning.waypoint_tolerance {
            *heading_to_end = !*heading_to_end;
            log::trace!("actor {} patrol turned around", self.body.id);
        } else {
            self.body.velocity = direction_or_zero(self.body.position, target) * self.speed;
            self.body.position += self.body.velocity * dt;
        }
    }

    fn update_circular(&mut self, dt: f32) {
        let MovementPattern::Circular {
            center,
            radius,
            angular_speed,
            angle,
        } = &mut self.pattern
        else {
            return;
        };

        *angle += *angular_speed * dt;
        let new_position = circle_point(*center, *radius, *angle, self.body.position.y);

        // Exact placement on the circle; velocity is derived for animation only
        if dt > 0.0 {
            self.body.velocity = (new_position - self.body.position) / dt;
        }
        self.body.position = new_position;
    }

    fn update_follow(&mut self, dt: f32, ctx: &WorldContext) {
        let MovementPattern::Follow {
            detection_radius,
            return_speed,
            state,
        } = &mut self.pattern
        else {
            return;
        };

        let observer = ctx.observer;
        let distance = (observer.position - self.body.position).length();

        if distance < *detection_radius && !observer.airborne {
            if *state != FollowState::Chasing {
                log::debug!("actor {} started chasing", self.body.id);
            }
            *state = FollowState::Chasing;
            self.body.velocity = direction_or_zero(self.body.position, observer.position) * self.speed;
        } else if *state != FollowState::Idle {
            let home = self.body.initial_position;
            let distance_home = (home - self.body.position).length();

            if distance_home < ctx.tuning.waypoint_tolerance {
                log::debug!("actor {} back home", self.body.id);
                *state = FollowState::Idle;
                self.body.velocity = Vec3::ZERO;
            } else {
                if *state == FollowState::Chasing {
                    log::debug!("actor {} lost the observer, returning", self.body.id);
                }
                *state = FollowState::Returning;
                self.body.velocity = direction_or_zero(self.body.position, home) * *return_speed;
            }
        }

        if self.body.velocity.length_squared() > 0.0 {
            self.body.position += self.body.velocity * dt;
        }
    }

    /// Cosmetic bobbing and pulsing; never feeds back into movement
    fn update_animation(&mut self, dt: f32) {
        self.anim_time += dt;

        let speed = self.body.velocity.length();
        self.body.height = if speed > BOB_SPEED_THRESHOLD {
            let frequency = BOB_BASE_FREQUENCY + speed * BOB_FREQUENCY_PER_SPEED;
            self.base_height + (self.anim_time * frequency).sin() * BOB_AMPLITUDE
        } else {
            self.base_height
        };

        // Anchored to the base diameter so the pulse cannot compound
        self.body.diameter = if self.is_chasing() {
            self.base_diameter * (1.0 + (self.anim_time * PULSE_FREQUENCY).sin() * PULSE_AMPLITUDE)
        } else {
            self.base_diameter
        };
    }

    fn update_throwing(&mut self, dt: f32, ctx: &WorldContext, events: &mut Vec<SimEvent>) {
        if self.throw_cooldown > 0.0 {
            self.throw_cooldown -= dt;
        }

        for projectile in &mut self.projectiles {
            projectile.update(dt, ctx);
            if projectile.hits_observer(ctx) {
                events.push(SimEvent::ObserverHit {
                    actor: self.body.id,
                    knockback: ctx.tuning.knockback,
                });
                projectile.active = false;
            }
        }
        self.projectiles.retain(|p| p.active);

        let observer = ctx.observer;
        let distance = (observer.position - self.body.position).length();
        let tuning = ctx.tuning;

        if distance < tuning.throw_range
            && self.throw_cooldown <= 0.0
            && !observer.airborne
            && self.projectiles.len() < tuning.max_live_projectiles
        {
            let origin = self.body.position + Vec3::Y * (self.body.height * THROW_HEIGHT_FRACTION);

            // Linear lead: where the observer will be when the projectile arrives
            let lead_time = distance / tuning.projectile_speed;
            let predicted = observer.position + observer.velocity * lead_time;

            self.projectiles
                .push(Projectile::launch(origin, predicted, tuning.projectile_speed, tuning));
            self.throw_cooldown = tuning.throw_interval;

            log::debug!(
                "actor {} threw at {:?} (lead {:.2}s)",
                self.body.id,
                predicted,
                lead_time
            );
            events.push(SimEvent::ProjectileThrown {
                actor: self.body.id,
            });
        }
    }
}
