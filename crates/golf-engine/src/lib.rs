pub mod api;
pub mod core;
pub mod error;
pub mod input;
pub mod renderer;
pub mod session;

#[cfg(test)]
mod testing;

pub use glam;

// Re-export key types at crate root for convenience
pub use api::bindings::{PhysicsBinding, RenderingBinding, ScoreboardSink};
pub use api::config::MatchConfig;
pub use api::types::{
    BodyHandle, ColliderHandle, Damping, GameEvent, Material, MeshHandle, PlayerId, Pose, ScreenPoint,
};
pub use crate::core::time::FixedTimestep;
pub use error::{GolfError, GolfResult, PhysicsError, ShotRejection};
pub use input::{pick_player, DragTracker, InputEvent, InputQueue, PickRay, ShotIntent, CUSTOM_RESET};
pub use renderer::{MeshBuffer, MeshInstance};
pub use session::goal::GoalDetector;
pub use session::player::{PlayerSession, PlayerSpec};
pub use session::scheduler::{Advance, RoundScheduler};
pub use session::scoreboard::{ScoreLine, Scoreboard, StageInfo};
pub use session::shot::{ShotApplied, ShotController};
pub use session::stage::{ColliderShape, Obstacle, Stage, StageCatalog};
pub use session::state::{MatchState, MatchStatus};
pub use session::{MatchSession, TickReport};

#[cfg(feature = "physics")]
pub use api::game::{EngineContext, Game, GameConfig};
#[cfg(feature = "physics")]
pub use crate::core::physics::{ColliderMaterial, RapierPhysics};
