//! Item type descriptors
//!
//! Every placed item references one of a fixed set of kinds. A kind resolves
//! to an immutable descriptor holding its footprint ratio, behavior flags and
//! visual identifier. Capabilities such as throwing are explicit flags here,
//! resolved once at load time.

use serde::{Deserialize, Serialize};

use super::actor::PatternKind;

/// Immutable per-kind descriptor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemType {
    /// Texture the renderer draws for this kind
    pub texture: &'static str,
    /// Opaque renderer identifier
    pub visual_id: u32,
    /// Footprint scaling: collision diameter = diameter * ratio
    pub footprint_ratio: f32,
    pub has_collision: bool,
    pub is_flat: bool,
    pub is_static: bool,
    pub is_collectable: bool,
    /// Actor throws projectiles at the observer
    pub can_throw: bool,
    /// Movement pattern used when level data names none. `Some` marks an actor kind.
    pub default_pattern: Option<PatternKind>,
}

/// All known item kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ItemKind {
    Shrub,
    Tree,
    Flag,
    Herring,
    TreeBarren,
    Start,
    Finish,
    EnemyPenguin,
    EnemySnowman,
    EnemyYeti,
}

const SHRUB: ItemType = ItemType {
    texture: "shrub.webp",
    visual_id: 0,
    footprint_ratio: 0.6,
    has_collision: true,
    is_flat: false,
    is_static: true,
    is_collectable: false,
    can_throw: false,
    default_pattern: None,
};

const TREE: ItemType = ItemType {
    texture: "snowy_tree1.webp",
    visual_id: 1,
    footprint_ratio: 0.4,
    has_collision: true,
    is_flat: false,
    is_static: true,
    is_collectable: false,
    can_throw: false,
    default_pattern: None,
};

const FLAG: ItemType = ItemType {
    texture: "flag.webp",
    visual_id: 2,
    footprint_ratio: 0.0,
    has_collision: false,
    is_flat: true,
    is_static: false,
    is_collectable: false,
    can_throw: false,
    default_pattern: None,
};

const HERRING: ItemType = ItemType {
    texture: "herring.webp",
    visual_id: 3,
    footprint_ratio: 1.5,
    has_collision: false,
    is_flat: true,
    is_static: false,
    is_collectable: true,
    can_throw: false,
    default_pattern: None,
};

const TREE_BARREN: ItemType = ItemType {
    texture: "tree_barren2.webp",
    visual_id: 4,
    footprint_ratio: 0.4,
    has_collision: true,
    is_flat: false,
    is_static: true,
    is_collectable: false,
    can_throw: false,
    default_pattern: None,
};

const START: ItemType = ItemType {
    texture: "start.webp",
    visual_id: 5,
    footprint_ratio: 0.0,
    has_collision: false,
    is_flat: true,
    is_static: true,
    is_collectable: false,
    can_throw: false,
    default_pattern: None,
};

const FINISH: ItemType = ItemType {
    texture: "finish.webp",
    visual_id: 6,
    footprint_ratio: 0.0,
    has_collision: false,
    is_flat: true,
    is_static: true,
    is_collectable: false,
    can_throw: false,
    default_pattern: None,
};

const ENEMY_PENGUIN: ItemType = ItemType {
    texture: "enemy_penguin.webp",
    visual_id: 7,
    footprint_ratio: 0.8,
    has_collision: true,
    is_flat: false,
    is_static: false,
    is_collectable: false,
    can_throw: false,
    default_pattern: Some(PatternKind::Patrol),
};

const ENEMY_SNOWMAN: ItemType = ItemType {
    texture: "enemy_snowman.webp",
    visual_id: 8,
    footprint_ratio: 0.9,
    has_collision: true,
    is_flat: false,
    is_static: false,
    is_collectable: false,
    can_throw: true,
    default_pattern: Some(PatternKind::Circular),
};

const ENEMY_YETI: ItemType = ItemType {
    texture: "enemy_yeti.webp",
    visual_id: 9,
    footprint_ratio: 1.0,
    has_collision: true,
    is_flat: false,
    is_static: false,
    is_collectable: false,
    can_throw: false,
    default_pattern: Some(PatternKind::Follow),
};

impl ItemKind {
    pub const ALL: [ItemKind; 10] = [
        ItemKind::Shrub,
        ItemKind::Tree,
        ItemKind::Flag,
        ItemKind::Herring,
        ItemKind::TreeBarren,
        ItemKind::Start,
        ItemKind::Finish,
        ItemKind::EnemyPenguin,
        ItemKind::EnemySnowman,
        ItemKind::EnemyYeti,
    ];

    /// Name used in level files
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemKind::Shrub => "SHRUB",
            ItemKind::Tree => "TREE",
            ItemKind::Flag => "FLAG",
            ItemKind::Herring => "HERRING",
            ItemKind::TreeBarren => "TREE_BARREN",
            ItemKind::Start => "START",
            ItemKind::Finish => "FINISH",
            ItemKind::EnemyPenguin => "ENEMY_PENGUIN",
            ItemKind::EnemySnowman => "ENEMY_SNOWMAN",
            ItemKind::EnemyYeti => "ENEMY_YETI",
        }
    }

    /// Resolve a level-file name (exact match)
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == name)
    }

    /// Descriptor for this kind
    pub fn descriptor(&self) -> &'static ItemType {
        match self {
            ItemKind::Shrub => &SHRUB,
            ItemKind::Tree => &TREE,
            ItemKind::Flag => &FLAG,
            ItemKind::Herring => &HERRING,
            ItemKind::TreeBarren => &TREE_BARREN,
            ItemKind::Start => &START,
            ItemKind::Finish => &FINISH,
            ItemKind::EnemyPenguin => &ENEMY_PENGUIN,
            ItemKind::EnemySnowman => &ENEMY_SNOWMAN,
            ItemKind::EnemyYeti => &ENEMY_YETI,
        }
    }

    /// Whether items of this kind are driven by a movement pattern
    #[inline]
    pub fn is_actor(&self) -> bool {
        self.descriptor().default_pattern.is_some()
    }
}
