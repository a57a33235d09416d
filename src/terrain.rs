//! Course surface implementations
//!
//! A `HeightGrid` stores height samples on a regular grid spanning the course
//! (`x` in `[0, width]`, `z` in `[-length, 0]`) and interpolates between them.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::sim::{CourseConfig, Terrain};

/// Constant-height ground
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FlatTerrain {
    pub height: f32,
}

impl FlatTerrain {
    pub fn new(height: f32) -> Self {
        Self { height }
    }
}

impl Terrain for FlatTerrain {
    fn height_at(&self, _x: f32, _z: f32) -> f32 {
        self.height
    }
}

/// Height samples on a regular grid, bilinearly interpolated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeightGrid {
    pub width: f32,
    pub length: f32,
    pub fields_x: usize,
    pub fields_z: usize,
    /// Row-major samples, `fields_z` rows of `fields_x` columns. Row 0 is at z = 0.
    pub heights: Vec<f32>,
}

impl HeightGrid {
    /// Build a grid, returning `None` if the sample count does not match
    pub fn new(
        width: f32,
        length: f32,
        fields_x: usize,
        fields_z: usize,
        heights: Vec<f32>,
    ) -> Option<Self> {
        if fields_x < 2 || fields_z < 2 || heights.len() != fields_x * fields_z {
            return None;
        }
        Some(Self {
            width,
            length,
            fields_x,
            fields_z,
            heights,
        })
    }

    /// Procedural downhill course: a constant grade plus smoothed seeded bumps
    pub fn generate(seed: u64, course: &CourseConfig, grade: f32, bumpiness: f32) -> Self {
        let fields_x = course.fields_x.max(2) as usize;
        let fields_z = course.fields_z.max(2) as usize;
        let mut rng = Pcg32::seed_from_u64(seed);

        let noise: Vec<f32> = (0..fields_x * fields_z)
            .map(|_| rng.random_range(-1.0f32..1.0) * bumpiness)
            .collect();

        // One box-blur pass so neighbouring samples agree
        let mut heights = Vec::with_capacity(noise.len());
        for row in 0..fields_z {
            let z = -(row as f32) / (fields_z - 1) as f32 * course.length;
            for col in 0..fields_x {
                let mut sum = 0.0;
                let mut count = 0.0;
                for r in row.saturating_sub(1)..=(row + 1).min(fields_z - 1) {
                    for c in col.saturating_sub(1)..=(col + 1).min(fields_x - 1) {
                        sum += noise[r * fields_x + c];
                        count += 1.0;
                    }
                }
                heights.push(z * grade + sum / count);
            }
        }

        Self {
            width: course.width,
            length: course.length,
            fields_x,
            fields_z,
            heights,
        }
    }

    /// Missing samples (a hand-edited file with too few heights) read as 0
    #[inline]
    fn sample(&self, col: usize, row: usize) -> f32 {
        self.heights
            .get(row * self.fields_x + col)
            .copied()
            .unwrap_or(0.0)
    }
}

impl Terrain for HeightGrid {
    fn height_at(&self, x: f32, z: f32) -> f32 {
        let max_col = self.fields_x.saturating_sub(1) as f32;
        let max_row = self.fields_z.saturating_sub(1) as f32;

        let gx = if self.width > 0.0 {
            (x / self.width * max_col).clamp(0.0, max_col)
        } else {
            0.0
        };
        let gz = if self.length > 0.0 {
            (-z / self.length * max_row).clamp(0.0, max_row)
        } else {
            0.0
        };

        let c0 = gx.floor() as usize;
        let r0 = gz.floor() as usize;
        let c1 = (c0 + 1).min(max_col as usize);
        let r1 = (r0 + 1).min(max_row as usize);
        let tx = gx - c0 as f32;
        let tz = gz - r0 as f32;

        let top = self.sample(c0, r0) * (1.0 - tx) + self.sample(c1, r0) * tx;
        let bottom = self.sample(c0, r1) * (1.0 - tx) + self.sample(c1, r1) * tx;
        top * (1.0 - tz) + bottom * tz
    }
}
