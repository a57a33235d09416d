//! Swept collision between the observer and item footprints
//!
//! The tricky part of a fast descent: the observer can move further than an
//! obstacle is wide in a single tick. Testing only the end position would let
//! it tunnel straight through a thin tree, so the movement segment is sampled
//! at a resolution set by the obstacle's own footprint.

use glam::Vec3;

use crate::consts::MAX_SWEEP_SAMPLES;

/// Axis-aligned collision box of an item
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Footprint {
    /// Base center (ground contact point)
    pub center: Vec3,
    /// Half-width of the box on both horizontal axes
    pub radius: f32,
    /// Height above the base
    pub height: f32,
}

impl Footprint {
    #[inline]
    pub fn diameter(&self) -> f32 {
        self.radius * 2.0
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.center.y + self.height
    }
}

/// Result of a sweep test
#[derive(Debug, Clone, PartialEq)]
pub struct SweepResult {
    /// Whether any tested point was inside the footprint
    pub hit: bool,
    /// First colliding point (endpoint first, then samples from the start of the segment)
    pub point: Vec3,
    /// Number of intermediate points tested
    pub samples: u32,
}

impl SweepResult {
    pub fn miss(samples: u32) -> Self {
        Self {
            hit: false,
            point: Vec3::ZERO,
            samples,
        }
    }

    fn hit(point: Vec3, samples: u32) -> Self {
        Self {
            hit: true,
            point,
            samples,
        }
    }
}

/// Point-in-box test: within the radius on x and z (strict) and below the top
#[inline]
pub fn footprint_contains(footprint: &Footprint, position: Vec3) -> bool {
    let c = footprint.center;
    let r = footprint.radius;
    position.z - r < c.z
        && position.z + r > c.z
        && position.x - r < c.x
        && position.x + r > c.x
        && position.y < footprint.top()
}

/// Sweep the observer's movement from `last` to `current` against a footprint
///
/// The end position is tested first. On a miss, `floor(|movement| / diameter)`
/// evenly spaced interior points are tested, so consecutive samples are
/// closer together than the footprint is wide. The count is capped at
/// `MAX_SWEEP_SAMPLES`; past that, very small footprints may be skipped.
pub fn sweep(footprint: &Footprint, last: Vec3, current: Vec3) -> SweepResult {
    if footprint_contains(footprint, current) {
        return SweepResult::hit(current, 0);
    }

    let diameter = footprint.diameter();
    // A zero-size footprint can only be hit at the endpoint
    if diameter <= 0.0 {
        return SweepResult::miss(0);
    }

    let movement = current - last;
    let distance = movement.length();
    if distance <= 0.0 || !distance.is_finite() {
        return SweepResult::miss(0);
    }

    let num_steps = ((distance / diameter).floor() as u32).min(MAX_SWEEP_SAMPLES);
    if num_steps == 0 {
        return SweepResult::miss(0);
    }

    let step = movement / (num_steps + 1) as f32;
    for i in 1..=num_steps {
        let point = last + step * i as f32;
        if footprint_contains(footprint, point) {
            return SweepResult::hit(point, i);
        }
    }

    SweepResult::miss(num_steps)
}

/// Whether the observer touched the footprint anywhere along its movement
#[inline]
pub fn swept_collision(footprint: &Footprint, last: Vec3, current: Vec3) -> bool {
    sweep(footprint, last, current).hit
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn tree() -> Footprint {
        Footprint {
            center: Vec3::new(0.0, 0.0, 0.0),
            radius: 0.5,
            height: 3.0,
        }
    }

    #[test]
    fn test_endpoint_inside() {
        let fp = tree();
        assert!(swept_collision(&fp, Vec3::new(-5.0, 0.0, 5.0), Vec3::new(0.2, 1.0, -0.2)));
    }

    #[test]
    fn test_endpoint_above_top() {
        let fp = tree();
        assert!(!footprint_contains(&fp, Vec3::new(0.0, 3.5, 0.0)));
        assert!(footprint_contains(&fp, Vec3::new(0.0, 2.9, 0.0)));
    }

    #[test]
    fn test_box_edges_are_exclusive() {
        let fp = tree();
        assert!(!footprint_contains(&fp, Vec3::new(0.5, 0.0, 0.0)));
        assert!(!footprint_contains(&fp, Vec3::new(0.0, 0.0, -0.5)));
        assert!(footprint_contains(&fp, Vec3::new(0.49, 0.0, 0.49)));
    }

    #[test]
    fn test_fast_pass_through_is_detected() {
        let fp = tree();
        let last = Vec3::new(-3.0, 0.0, 0.0);
        let current = Vec3::new(3.0, 0.0, 0.0);
        assert!(!footprint_contains(&fp, last));
        assert!(!footprint_contains(&fp, current));

        let result = sweep(&fp, last, current);
        assert!(result.hit);
        assert!(result.point.x.abs() < 0.5);
    }

    #[test]
    fn test_fast_downhill_pass_through_is_detected() {
        let fp = Footprint {
            center: Vec3::new(20.0, -10.0, -40.0),
            radius: 0.2,
            height: 4.0,
        };
        // 30 units in one tick, straight through the trunk
        let last = Vec3::new(20.0, -8.0, -25.0);
        let current = Vec3::new(20.0, -12.0, -55.0);
        assert!(swept_collision(&fp, last, current));
    }

    #[test]
    fn test_path_beside_obstacle_misses() {
        let fp = tree();
        let last = Vec3::new(-3.0, 0.0, 1.0);
        let current = Vec3::new(3.0, 0.0, 1.0);
        let result = sweep(&fp, last, current);
        assert!(!result.hit);
        assert_eq!(result.samples, 6);
    }

    #[test]
    fn test_jump_over_obstacle_misses() {
        let fp = tree();
        let last = Vec3::new(-3.0, 4.0, 0.0);
        let current = Vec3::new(3.0, 4.0, 0.0);
        assert!(!swept_collision(&fp, last, current));
    }

    #[test]
    fn test_short_move_needs_no_samples() {
        let fp = tree();
        let result = sweep(&fp, Vec3::new(2.0, 0.0, 0.0), Vec3::new(2.5, 0.0, 0.0));
        assert!(!result.hit);
        assert_eq!(result.samples, 0);
    }

    #[test]
    fn test_zero_movement() {
        let fp = tree();
        let p = Vec3::new(2.0, 0.0, 0.0);
        assert!(!swept_collision(&fp, p, p));
        let inside = Vec3::new(0.1, 0.0, 0.1);
        assert!(swept_collision(&fp, inside, inside));
    }

    #[test]
    fn test_zero_footprint_never_loops() {
        let fp = Footprint {
            center: Vec3::ZERO,
            radius: 0.0,
            height: 1.0,
        };
        assert!(!swept_collision(&fp, Vec3::new(-10.0, 0.0, 0.0), Vec3::new(10.0, 0.0, 0.0)));
    }

    #[test]
    fn test_tiny_footprint_sample_count_is_bounded() {
        let fp = Footprint {
            center: Vec3::new(0.0, 0.0, 5.0),
            radius: 1e-6,
            height: 1.0,
        };
        let result = sweep(&fp, Vec3::new(-500.0, 0.0, 0.0), Vec3::new(500.0, 0.0, 0.0));
        assert!(!result.hit);
        assert_eq!(result.samples, MAX_SWEEP_SAMPLES);
    }

    proptest! {
        #[test]
        fn prop_parallel_path_outside_footprint_never_hits(
            offset in 0.5f32..50.0,
            z0 in -100.0f32..100.0,
            z1 in -100.0f32..100.0,
            radius in 0.1f32..3.0,
        ) {
            let fp = Footprint { center: Vec3::ZERO, radius, height: 2.0 };
            let x = radius + offset;
            let last = Vec3::new(x, 0.0, z0);
            let current = Vec3::new(x, 0.0, z1);
            prop_assert!(!swept_collision(&fp, last, current));
        }

        #[test]
        fn prop_endpoint_inside_always_hits(
            dx in -0.49f32..0.49,
            dz in -0.49f32..0.49,
            lx in -100.0f32..100.0,
            lz in -100.0f32..100.0,
        ) {
            let fp = tree();
            let current = Vec3::new(dx, 1.0, dz);
            prop_assert!(swept_collision(&fp, Vec3::new(lx, 1.0, lz), current));
        }
    }
}
