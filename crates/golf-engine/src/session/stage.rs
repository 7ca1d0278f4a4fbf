//! Stage definitions: cup, static obstacles and per-player start positions.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::api::types::{PlayerId, Pose};
use crate::error::{GolfError, GolfResult};

/// Static geometry placed into the physics world when a stage becomes active.
/// Also used for the ball itself (`Sphere`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ColliderShape {
    /// Infinite plane through the pose origin, normal along the pose's local +Y.
    Plane,
    Box { half_extents: Vec3 },
    Sphere { radius: f32 },
}

/// One placed piece of stage geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub shape: ColliderShape,
    pub position: Vec3,
    #[serde(default = "identity_quat")]
    pub orientation: Quat,
    /// Render colour, 0xRRGGBB.
    #[serde(default = "default_obstacle_color")]
    pub color: u32,
}

fn identity_quat() -> Quat {
    Quat::IDENTITY
}

fn default_obstacle_color() -> u32 {
    0x8b5a2b
}

impl Obstacle {
    pub fn new(shape: ColliderShape, position: Vec3) -> Self {
        Self {
            shape,
            position,
            orientation: Quat::IDENTITY,
            color: default_obstacle_color(),
        }
    }

    pub fn with_orientation(mut self, orientation: Quat) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn with_color(mut self, color: u32) -> Self {
        self.color = color;
        self
    }

    pub fn pose(&self) -> Pose {
        Pose::at(self.position).with_orientation(self.orientation)
    }
}

/// One hole/layout instance. Immutable once the catalog is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stage {
    pub index: usize,
    pub cup_position: Vec3,
    pub obstacles: Vec<Obstacle>,
    /// Start position per player, indexed by `PlayerId`.
    pub player_starts: Vec<Vec3>,
}

impl Stage {
    pub fn start_for(&self, player: PlayerId) -> Option<Vec3> {
        self.player_starts.get(player.index()).copied()
    }
}

/// Ordered, finite, immutable sequence of stages known at match start.
#[derive(Debug, Clone, PartialEq)]
pub struct StageCatalog {
    stages: Vec<Stage>,
}

impl StageCatalog {
    /// Build a catalog. Stage indices are normalised to their position in
    /// the sequence; an empty list is a construction error.
    pub fn new(mut stages: Vec<Stage>) -> GolfResult<Self> {
        if stages.is_empty() {
            return Err(GolfError::StageIndexOutOfRange { index: 0, len: 0 });
        }
        for (i, stage) in stages.iter_mut().enumerate() {
            if stage.index != i {
                log::warn!("stage declared index {} at position {}, renumbering", stage.index, i);
                stage.index = i;
            }
        }
        Ok(Self { stages })
    }

    /// Parse a catalog from a JSON array of stages.
    pub fn from_json(json: &str) -> GolfResult<Self> {
        let stages: Vec<Stage> = serde_json::from_str(json)?;
        Self::new(stages)
    }

    pub fn stage_at(&self, index: usize) -> GolfResult<&Stage> {
        self.stages.get(index).ok_or(GolfError::StageIndexOutOfRange {
            index,
            len: self.stages.len(),
        })
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    pub fn last_index(&self) -> usize {
        self.stages.len() - 1
    }

    pub fn iter(&self) -> impl Iterator<Item = &Stage> {
        self.stages.iter()
    }

    /// Every stage must provide a start position for every player.
    pub fn check_roster(&self, player_count: usize) -> GolfResult<()> {
        for stage in &self.stages {
            if stage.player_starts.len() < player_count {
                return Err(GolfError::MissingStart {
                    stage: stage.index,
                    player: PlayerId(stage.player_starts.len() as u32),
                });
            }
        }
        Ok(())
    }
}
