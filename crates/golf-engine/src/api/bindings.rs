//! Seams between the match core and its external collaborators.
//!
//! The core never owns position or velocity. It holds handles and reads and
//! writes through these traits. Everything runs on one thread, so calls are
//! naturally serialised.

use glam::{Quat, Vec3};

use crate::api::types::{BodyHandle, ColliderHandle, Damping, Material, MeshHandle, Pose};
use crate::error::PhysicsError;
use crate::session::scoreboard::{ScoreLine, StageInfo};
use crate::session::stage::ColliderShape;

/// Rigid-body simulation the core drives but does not implement.
pub trait PhysicsBinding {
    /// Advance the simulation by one fixed step.
    fn step(&mut self, fixed_dt: f32);

    fn add_static_collider(&mut self, shape: &ColliderShape, pose: Pose) -> ColliderHandle;

    fn remove_static_collider(&mut self, collider: ColliderHandle) -> Result<(), PhysicsError>;

    /// Whether `collider` still refers to a live static collider.
    fn contains_collider(&self, collider: ColliderHandle) -> bool;

    fn add_dynamic_body(
        &mut self,
        shape: &ColliderShape,
        mass: f32,
        pose: Pose,
        damping: Damping,
    ) -> BodyHandle;

    fn apply_impulse(
        &mut self,
        body: BodyHandle,
        impulse: Vec3,
        at_world_point: Vec3,
    ) -> Result<(), PhysicsError>;

    fn transform(&self, body: BodyHandle) -> Result<Pose, PhysicsError>;

    /// Read by the scoreboard to flag balls still rolling.
    fn linear_velocity(&self, body: BodyHandle) -> Result<Vec3, PhysicsError>;

    /// Zero both linear and angular velocity.
    fn zero_velocity(&mut self, body: BodyHandle) -> Result<(), PhysicsError>;

    fn set_body_position(&mut self, body: BodyHandle, position: Vec3) -> Result<(), PhysicsError>;
}

/// Scene-graph side of the world. Meshes are fire-and-forget: unknown
/// handles are ignored by implementations.
pub trait RenderingBinding {
    fn create_mesh(&mut self, shape: &ColliderShape, material: Material) -> MeshHandle;

    fn set_mesh_transform(&mut self, mesh: MeshHandle, position: Vec3, orientation: Quat);

    fn set_visible(&mut self, mesh: MeshHandle, visible: bool);
}

/// Presentation of per-player shot counts and history. Called once per tick
/// after scheduling settles.
pub trait ScoreboardSink {
    fn render(&mut self, players: &[ScoreLine], stage: StageInfo);
}
