//! Level data loading
//!
//! Level files list placed items in course-grid coordinates. Unknown item
//! types abort loading; unknown movement-pattern names fall back to patrolling
//! with a warning.

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::settings::Tuning;
use crate::sim::{CourseConfig, ItemKind, Level, MovementPattern, PatternKind, Terrain};

/// Fatal level loading errors
#[derive(Debug, Error)]
pub enum LevelError {
    #[error("unknown item type: {0}")]
    UnknownItemType(String),

    #[error("course grid must be at least 2x2 fields, got {fields_x}x{fields_z}")]
    InvalidGrid { fields_x: u32, fields_z: u32 },

    #[error("failed to read level file: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed level JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Top-level level file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LevelData {
    pub items: Vec<ItemData>,
}

/// One placed item as stored in a level file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemData {
    #[serde(rename = "type")]
    pub type_name: String,
    /// Grid column
    pub x: f32,
    /// Grid row
    pub z: f32,
    pub height: f32,
    pub diameter: f32,

    // Actor-only fields
    #[serde(default)]
    pub movement_pattern: Option<String>,
    #[serde(default)]
    pub speed: Option<f32>,
    #[serde(default)]
    pub patrol_end_x: Option<f32>,
    #[serde(default)]
    pub patrol_end_z: Option<f32>,
    #[serde(default)]
    pub radius: Option<f32>,
    #[serde(default)]
    pub angular_speed: Option<f32>,
    #[serde(default)]
    pub detection_radius: Option<f32>,
}

/// Map course-grid coordinates to a world position on the terrain
///
/// Grid column `fields_x` lands at x = 0 and column 1 at x = width; row
/// `fields_z` lands at z = 0 and row 1 at z = -length.
pub fn grid_to_world(course: &CourseConfig, terrain: &dyn Terrain, gx: f32, gz: f32) -> Vec3 {
    let fx = course.fields_x as f32;
    let fz = course.fields_z as f32;
    let x = (fx - gx) / (fx - 1.0) * course.width;
    let z = -((fz - gz) / (fz - 1.0)) * course.length;
    Vec3::new(x, terrain.height_at(x, z), z)
}

/// Build a level from parsed data
pub fn build_level(
    data: &LevelData,
    terrain: &dyn Terrain,
    course: &CourseConfig,
    tuning: &Tuning,
) -> Result<Level, LevelError> {
    if course.fields_x < 2 || course.fields_z < 2 {
        return Err(LevelError::InvalidGrid {
            fields_x: course.fields_x,
            fields_z: course.fields_z,
        });
    }

    let mut level = Level::new();
    for item in &data.items {
        let kind = ItemKind::from_name(&item.type_name)
            .ok_or_else(|| LevelError::UnknownItemType(item.type_name.clone()))?;
        let position = grid_to_world(course, terrain, item.x, item.z);

        match resolve_pattern(item, kind) {
            Some(pattern_kind) => {
                let speed = positive_or(item.speed, tuning.default_speed);
                let pattern = actor_pattern(item, pattern_kind, position, speed, course, terrain, tuning);
                level.add_actor(kind, position, (item.height, item.diameter), pattern, speed);
            }
            None => {
                level.add_item(kind, position, item.height, item.diameter);
            }
        }
    }
    level.normalize_order();

    log::info!(
        "Loaded level: {} items, {} actors",
        level.items.len(),
        level.actors.len()
    );
    Ok(level)
}

/// Parse a level from a JSON string
pub fn parse_level(
    json: &str,
    terrain: &dyn Terrain,
    course: &CourseConfig,
    tuning: &Tuning,
) -> Result<Level, LevelError> {
    let data: LevelData = serde_json::from_str(json)?;
    build_level(&data, terrain, course, tuning)
}

/// Load a level from a JSON file
pub fn load_level(
    path: impl AsRef<Path>,
    terrain: &dyn Terrain,
    course: &CourseConfig,
    tuning: &Tuning,
) -> Result<Level, LevelError> {
    let json = std::fs::read_to_string(path)?;
    parse_level(&json, terrain, course, tuning)
}

/// Movement pattern for an item, or `None` for plain items
fn resolve_pattern(item: &ItemData, kind: ItemKind) -> Option<PatternKind> {
    if !kind.is_actor() {
        return None;
    }
    match item.movement_pattern.as_deref() {
        None => kind.descriptor().default_pattern,
        Some(name) => Some(PatternKind::from_name(name).unwrap_or_else(|| {
            log::warn!("Unknown movement pattern: {name}, defaulting to patrolling");
            PatternKind::Patrol
        })),
    }
}

fn actor_pattern(
    item: &ItemData,
    kind: PatternKind,
    position: Vec3,
    speed: f32,
    course: &CourseConfig,
    terrain: &dyn Terrain,
    tuning: &Tuning,
) -> MovementPattern {
    match kind {
        PatternKind::Patrol => {
            let end = match (item.patrol_end_x, item.patrol_end_z) {
                (Some(ex), Some(ez)) => grid_to_world(course, terrain, ex, ez),
                _ => {
                    let x = position.x + tuning.default_patrol_offset;
                    Vec3::new(x, terrain.height_at(x, position.z), position.z)
                }
            };
            MovementPattern::patrol(position, end)
        }
        PatternKind::Circular => MovementPattern::circular(
            position,
            positive_or(item.radius, tuning.default_circle_radius),
            nonzero_or(item.angular_speed, tuning.default_angular_speed),
        ),
        PatternKind::Follow => MovementPattern::follow(
            positive_or(item.detection_radius, tuning.default_detection_radius),
            speed * tuning.return_speed_factor,
        ),
    }
}

/// Missing or non-positive values take the default
#[inline]
fn positive_or(value: Option<f32>, default: f32) -> f32 {
    value.filter(|v| *v > 0.0).unwrap_or(default)
}

/// Missing or zero values take the default (negative spins the other way)
#[inline]
fn nonzero_or(value: Option<f32>, default: f32) -> f32 {
    value.filter(|v| *v != 0.0).unwrap_or(default)
}
