//! In-memory bindings for exercising the match core without a real
//! simulation or renderer.

use glam::{Quat, Vec3};

use crate::api::bindings::{PhysicsBinding, RenderingBinding, ScoreboardSink};
use crate::api::types::{BodyHandle, ColliderHandle, Damping, Material, MeshHandle, Pose};
use crate::error::PhysicsError;
use crate::session::scoreboard::{ScoreLine, StageInfo};
use crate::session::stage::{ColliderShape, Stage, StageCatalog, Obstacle};

#[derive(Debug, Clone)]
pub struct FakeBody {
    pub pose: Pose,
    pub velocity: Vec3,
    pub angular_velocity: Vec3,
    pub mass: f32,
    pub alive: bool,
}

/// Scripted physics: no collisions, no gravity. `step` integrates velocity;
/// tests move balls with `place`.
#[derive(Debug, Default)]
pub struct FakePhysics {
    pub bodies: Vec<FakeBody>,
    pub colliders: Vec<Option<ColliderShape>>,
    pub impulses: Vec<(BodyHandle, Vec3, Vec3)>,
    pub steps: u32,
}

impl FakePhysics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn place(&mut self, body: BodyHandle, position: Vec3) {
        self.bodies[body.0 as usize].pose.position = position;
    }

    pub fn position(&self, body: BodyHandle) -> Vec3 {
        self.bodies[body.0 as usize].pose.position
    }

    pub fn kill(&mut self, body: BodyHandle) {
        self.bodies[body.0 as usize].alive = false;
    }

    pub fn live_colliders(&self) -> usize {
        self.colliders.iter().filter(|c| c.is_some()).count()
    }

    fn body(&self, handle: BodyHandle) -> Result<&FakeBody, PhysicsError> {
        self.bodies
            .get(handle.0 as usize)
            .filter(|b| b.alive)
            .ok_or(PhysicsError::StaleBody(handle))
    }

    fn body_mut(&mut self, handle: BodyHandle) -> Result<&mut FakeBody, PhysicsError> {
        self.bodies
            .get_mut(handle.0 as usize)
            .filter(|b| b.alive)
            .ok_or(PhysicsError::StaleBody(handle))
    }
}

impl PhysicsBinding for FakePhysics {
    fn step(&mut self, fixed_dt: f32) {
        self.steps += 1;
        for body in self.bodies.iter_mut().filter(|b| b.alive) {
            body.pose.position += body.velocity * fixed_dt;
        }
    }

    fn add_static_collider(&mut self, shape: &ColliderShape, _pose: Pose) -> ColliderHandle {
        self.colliders.push(Some(*shape));
        ColliderHandle(self.colliders.len() as u32 - 1)
    }

    fn remove_static_collider(&mut self, collider: ColliderHandle) -> Result<(), PhysicsError> {
        match self.colliders.get_mut(collider.0 as usize) {
            Some(slot) if slot.is_some() => {
                *slot = None;
                Ok(())
            }
            _ => Err(PhysicsError::StaleCollider(collider)),
        }
    }

    fn contains_collider(&self, collider: ColliderHandle) -> bool {
        matches!(self.colliders.get(collider.0 as usize), Some(Some(_)))
    }

    fn add_dynamic_body(
        &mut self,
        _shape: &ColliderShape,
        mass: f32,
        pose: Pose,
        _damping: Damping,
    ) -> BodyHandle {
        self.bodies.push(FakeBody {
            pose,
            velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
            mass,
            alive: true,
        });
        BodyHandle(self.bodies.len() as u32 - 1)
    }

    fn apply_impulse(
        &mut self,
        body: BodyHandle,
        impulse: Vec3,
        at_world_point: Vec3,
    ) -> Result<(), PhysicsError> {
        let b = self.body_mut(body)?;
        b.velocity += impulse / b.mass;
        self.impulses.push((body, impulse, at_world_point));
        Ok(())
    }

    fn transform(&self, body: BodyHandle) -> Result<Pose, PhysicsError> {
        self.body(body).map(|b| b.pose)
    }

    fn linear_velocity(&self, body: BodyHandle) -> Result<Vec3, PhysicsError> {
        self.body(body).map(|b| b.velocity)
    }

    fn zero_velocity(&mut self, body: BodyHandle) -> Result<(), PhysicsError> {
        let b = self.body_mut(body)?;
        b.velocity = Vec3::ZERO;
        b.angular_velocity = Vec3::ZERO;
        Ok(())
    }

    fn set_body_position(&mut self, body: BodyHandle, position: Vec3) -> Result<(), PhysicsError> {
        self.body_mut(body)?.pose.position = position;
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct FakeMesh {
    pub shape: ColliderShape,
    pub material: Material,
    pub position: Vec3,
    pub orientation: Quat,
    pub visible: bool,
}

#[derive(Debug, Default)]
pub struct RecordingRender {
    pub meshes: Vec<FakeMesh>,
}

impl RecordingRender {
    pub fn visible_count(&self) -> usize {
        self.meshes.iter().filter(|m| m.visible).count()
    }
}

impl RenderingBinding for RecordingRender {
    fn create_mesh(&mut self, shape: &ColliderShape, material: Material) -> MeshHandle {
        self.meshes.push(FakeMesh {
            shape: *shape,
            material,
            position: Vec3::ZERO,
            orientation: Quat::IDENTITY,
            visible: true,
        });
        MeshHandle(self.meshes.len() as u32 - 1)
    }

    fn set_mesh_transform(&mut self, mesh: MeshHandle, position: Vec3, orientation: Quat) {
        if let Some(m) = self.meshes.get_mut(mesh.0 as usize) {
            m.position = position;
            m.orientation = orientation;
        }
    }

    fn set_visible(&mut self, mesh: MeshHandle, visible: bool) {
        if let Some(m) = self.meshes.get_mut(mesh.0 as usize) {
            m.visible = visible;
        }
    }
}

#[derive(Debug, Default)]
pub struct RecordingSink {
    pub frames: Vec<(Vec<ScoreLine>, StageInfo)>,
}

impl ScoreboardSink for RecordingSink {
    fn render(&mut self, players: &[ScoreLine], stage: StageInfo) {
        self.frames.push((players.to_vec(), stage));
    }
}

/// `count` stages, cups marching along +X, starts for `players` players.
pub fn catalog(count: usize, players: usize) -> StageCatalog {
    let stages = (0..count)
        .map(|i| Stage {
            index: i,
            cup_position: Vec3::new(12.0, 0.25, -6.0 - i as f32),
            obstacles: vec![
                Obstacle::new(ColliderShape::Plane, Vec3::ZERO),
                Obstacle::new(
                    ColliderShape::Box { half_extents: Vec3::new(1.0, 0.5, 2.0) },
                    Vec3::new(6.0, 0.5, -3.0),
                ),
            ],
            player_starts: (0..players)
                .map(|p| Vec3::new(p as f32 * 3.0, 1.0, 10.0 + i as f32))
                .collect(),
        })
        .collect();
    StageCatalog::new(stages).unwrap()
}
