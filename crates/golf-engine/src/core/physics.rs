use glam::{Quat, Vec3};
use rapier3d::prelude::*;
use rapier3d::prelude::ColliderHandle as RapierColliderHandle;

use crate::api::bindings::PhysicsBinding;
use crate::api::types::{BodyHandle, ColliderHandle, Damping, Pose};
use crate::error::PhysicsError;
use crate::session::stage::ColliderShape;

// ---------------------------------------------------------------------------
// Conversion helpers (private) — glam ↔ nalgebra
// ---------------------------------------------------------------------------

fn vec3_to_na(v: Vec3) -> nalgebra::Vector3<f32> {
    nalgebra::Vector3::new(v.x, v.y, v.z)
}

fn na_to_vec3(v: &nalgebra::Vector3<f32>) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

fn pose_to_na(pose: Pose) -> nalgebra::Isometry3<f32> {
    let q = pose.orientation.normalize();
    let rotation = nalgebra::UnitQuaternion::from_quaternion(nalgebra::Quaternion::new(q.w, q.x, q.y, q.z));
    nalgebra::Isometry3::from_parts(
        nalgebra::Translation3::new(pose.position.x, pose.position.y, pose.position.z),
        rotation,
    )
}

fn na_to_pose(iso: &nalgebra::Isometry3<f32>) -> Pose {
    let c = iso.rotation.coords;
    Pose {
        position: na_to_vec3(&iso.translation.vector),
        orientation: Quat::from_xyzw(c.x, c.y, c.z, c.w),
    }
}

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Contact properties for a collider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColliderMaterial {
    pub restitution: f32,
    pub friction: f32,
}

impl ColliderMaterial {
    /// Rolling ball on felt.
    pub const BALL: Self = Self {
        restitution: 0.4,
        friction: 0.6,
    };
    /// Ground, walls and blocks.
    pub const COURSE: Self = Self {
        restitution: 0.5,
        friction: 0.8,
    };
}

impl ColliderShape {
    fn build_collider(&self) -> ColliderBuilder {
        match *self {
            ColliderShape::Plane => ColliderBuilder::halfspace(Vector::y_axis()),
            ColliderShape::Box { half_extents } => {
                ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
            }
            ColliderShape::Sphere { radius } => ColliderBuilder::ball(radius),
        }
    }
}

// ---------------------------------------------------------------------------
// RapierPhysics
// ---------------------------------------------------------------------------

/// Rapier3D world behind the `PhysicsBinding` seam.
///
/// Bodies and static colliders are addressed by dense indices into handle
/// tables; a removed entry stays `None` so old handles report as stale
/// instead of aliasing a new object.
pub struct RapierPhysics {
    gravity: nalgebra::Vector3<f32>,
    integration_parameters: IntegrationParameters,
    physics_pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,
    body_handles: Vec<Option<RigidBodyHandle>>,
    static_handles: Vec<Option<RapierColliderHandle>>,
    ball_material: ColliderMaterial,
    course_material: ColliderMaterial,
}

impl RapierPhysics {
    /// Create a world with the given gravity (Y up, so Earth is `(0, -9.82, 0)`).
    pub fn new(gravity: Vec3) -> Self {
        Self {
            gravity: vec3_to_na(gravity),
            integration_parameters: IntegrationParameters::default(),
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            body_handles: Vec::new(),
            static_handles: Vec::new(),
            ball_material: ColliderMaterial::BALL,
            course_material: ColliderMaterial::COURSE,
        }
    }

    pub fn gravity(&self) -> Vec3 {
        na_to_vec3(&self.gravity)
    }

    fn rapier_body(&self, body: BodyHandle) -> Result<RigidBodyHandle, PhysicsError> {
        self.body_handles
            .get(body.0 as usize)
            .copied()
            .flatten()
            .filter(|h| self.bodies.contains(*h))
            .ok_or(PhysicsError::StaleBody(body))
    }

    fn body_ref(&self, body: BodyHandle) -> Result<&RigidBody, PhysicsError> {
        let handle = self.rapier_body(body)?;
        self.bodies.get(handle).ok_or(PhysicsError::StaleBody(body))
    }

    fn body_mut(&mut self, body: BodyHandle) -> Result<&mut RigidBody, PhysicsError> {
        let handle = self.rapier_body(body)?;
        self.bodies.get_mut(handle).ok_or(PhysicsError::StaleBody(body))
    }
}

impl PhysicsBinding for RapierPhysics {
    fn step(&mut self, fixed_dt: f32) {
        self.integration_parameters.dt = fixed_dt;
        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &(),
        );
    }

    fn add_static_collider(&mut self, shape: &ColliderShape, pose: Pose) -> ColliderHandle {
        let collider = shape
            .build_collider()
            .position(pose_to_na(pose))
            .restitution(self.course_material.restitution)
            .friction(self.course_material.friction)
            .build();
        let handle = self.colliders.insert(collider);
        self.static_handles.push(Some(handle));
        ColliderHandle(self.static_handles.len() as u32 - 1)
    }

    fn remove_static_collider(&mut self, collider: ColliderHandle) -> Result<(), PhysicsError> {
        let handle = self
            .static_handles
            .get_mut(collider.0 as usize)
            .and_then(Option::take)
            .ok_or(PhysicsError::StaleCollider(collider))?;
        self.colliders
            .remove(handle, &mut self.island_manager, &mut self.bodies, true)
            .map(|_| ())
            .ok_or(PhysicsError::StaleCollider(collider))
    }

    fn contains_collider(&self, collider: ColliderHandle) -> bool {
        self.static_handles
            .get(collider.0 as usize)
            .copied()
            .flatten()
            .is_some_and(|h| self.colliders.contains(h))
    }

    fn add_dynamic_body(
        &mut self,
        shape: &ColliderShape,
        mass: f32,
        pose: Pose,
        damping: Damping,
    ) -> BodyHandle {
        let rb = RigidBodyBuilder::dynamic()
            .position(pose_to_na(pose))
            .linear_damping(damping.linear)
            .angular_damping(damping.angular)
            .ccd_enabled(true)
            .build();
        let body_handle = self.bodies.insert(rb);

        let collider = shape
            .build_collider()
            .mass(mass)
            .restitution(self.ball_material.restitution)
            .friction(self.ball_material.friction)
            .build();
        self.colliders
            .insert_with_parent(collider, body_handle, &mut self.bodies);

        self.body_handles.push(Some(body_handle));
        BodyHandle(self.body_handles.len() as u32 - 1)
    }

    fn apply_impulse(
        &mut self,
        body: BodyHandle,
        impulse: Vec3,
        at_world_point: Vec3,
    ) -> Result<(), PhysicsError> {
        let rb = self.body_mut(body)?;
        rb.apply_impulse_at_point(
            vec3_to_na(impulse),
            nalgebra::Point3::new(at_world_point.x, at_world_point.y, at_world_point.z),
            true,
        );
        Ok(())
    }

    fn transform(&self, body: BodyHandle) -> Result<Pose, PhysicsError> {
        self.body_ref(body).map(|rb| na_to_pose(rb.position()))
    }

    fn linear_velocity(&self, body: BodyHandle) -> Result<Vec3, PhysicsError> {
        self.body_ref(body).map(|rb| na_to_vec3(rb.linvel()))
    }

    fn zero_velocity(&mut self, body: BodyHandle) -> Result<(), PhysicsError> {
        let rb = self.body_mut(body)?;
        rb.set_linvel(nalgebra::Vector3::zeros(), true);
        rb.set_angvel(nalgebra::Vector3::zeros(), true);
        Ok(())
    }

    fn set_body_position(&mut self, body: BodyHandle, position: Vec3) -> Result<(), PhysicsError> {
        let rb = self.body_mut(body)?;
        rb.set_translation(vec3_to_na(position), true);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
