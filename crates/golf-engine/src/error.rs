use thiserror::Error;

use crate::api::types::{BodyHandle, ColliderHandle, PlayerId};

/// Why a shot attempt was refused. Absorbed by the game loop, never fatal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ShotRejection {
    #[error("player {0} is not part of this match")]
    UnknownPlayer(PlayerId),
    #[error("player {0} has already holed out on this stage")]
    AlreadyHoled(PlayerId),
    #[error("the match is complete")]
    MatchComplete,
}

/// Failure reported by a physics binding. The core cannot recover from these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PhysicsError {
    #[error("stale body handle {0:?}")]
    StaleBody(BodyHandle),
    #[error("stale collider handle {0:?}")]
    StaleCollider(ColliderHandle),
}

#[derive(Debug, Error)]
pub enum GolfError {
    #[error("invalid shot: {0}")]
    InvalidShot(#[from] ShotRejection),

    #[error("stage index {index} out of range (catalog has {len} stages)")]
    StageIndexOutOfRange { index: usize, len: usize },

    #[error("stage {stage} has no start position for player {player}")]
    MissingStart { stage: usize, player: PlayerId },

    #[error("a match needs at least one player")]
    EmptyRoster,

    #[error("physics binding failure: {0}")]
    PhysicsBindingFailure(#[from] PhysicsError),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("malformed json: {0}")]
    Json(#[from] serde_json::Error),
}

impl GolfError {
    /// Whether this error must halt the match. Only rejected shots are absorbed.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, GolfError::InvalidShot(_))
    }
}

pub type GolfResult<T> = Result<T, GolfError>;
