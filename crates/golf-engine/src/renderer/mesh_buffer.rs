use bytemuck::{Pod, Zeroable};
use glam::{Quat, Vec3};

use crate::api::bindings::RenderingBinding;
use crate::api::types::{Material, MeshHandle};
use crate::session::stage::ColliderShape;

/// Per-mesh data read by the host renderer straight out of wasm memory.
/// Must match the host's layout: 12 floats = 48 bytes stride.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct MeshInstance {
    /// Shape kind: 0 = plane, 1 = box, 2 = sphere.
    pub kind: f32,
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub qx: f32,
    pub qy: f32,
    pub qz: f32,
    pub qw: f32,
    /// Half extents for boxes, radius on every axis for spheres, 1 for planes.
    pub sx: f32,
    pub sy: f32,
    pub sz: f32,
    /// 0xRRGGBB as an exact integer, or -1 when hidden.
    pub color: f32,
}

impl MeshInstance {
    pub const FLOATS: usize = 12;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;

    pub const KIND_PLANE: f32 = 0.0;
    pub const KIND_BOX: f32 = 1.0;
    pub const KIND_SPHERE: f32 = 2.0;

    const HIDDEN: f32 = -1.0;

    fn new(shape: &ColliderShape, color: u32) -> Self {
        let (kind, scale) = match *shape {
            ColliderShape::Plane => (Self::KIND_PLANE, Vec3::ONE),
            ColliderShape::Box { half_extents } => (Self::KIND_BOX, half_extents),
            ColliderShape::Sphere { radius } => (Self::KIND_SPHERE, Vec3::splat(radius)),
        };
        Self {
            kind,
            qw: 1.0,
            sx: scale.x,
            sy: scale.y,
            sz: scale.z,
            color: (color & 0xFF_FFFF) as f32,
            ..Self::default()
        }
    }

    pub fn position(&self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }

    pub fn orientation(&self) -> Quat {
        Quat::from_xyzw(self.qx, self.qy, self.qz, self.qw)
    }

    pub fn is_visible(&self) -> bool {
        self.color >= 0.0
    }
}

/// All meshes ever created, indexed by `MeshHandle`. Hidden meshes keep
/// their slot so handles never alias.
pub struct MeshBuffer {
    instances: Vec<MeshInstance>,
    /// Colour to restore when a hidden mesh is shown again.
    colors: Vec<u32>,
}

impl MeshBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            instances: Vec::with_capacity(capacity),
            colors: Vec::with_capacity(capacity),
        }
    }

    pub fn get(&self, mesh: MeshHandle) -> Option<&MeshInstance> {
        self.instances.get(mesh.0 as usize)
    }

    pub fn instances(&self) -> &[MeshInstance] {
        &self.instances
    }

    pub fn mesh_count(&self) -> u32 {
        self.instances.len() as u32
    }

    pub fn visible_count(&self) -> usize {
        self.instances.iter().filter(|m| m.is_visible()).count()
    }

    /// Raw pointer to mesh data for host-side reads.
    pub fn instances_ptr(&self) -> *const f32 {
        self.instances.as_ptr() as *const f32
    }

    /// Flat f32 view, `FLOATS` per mesh.
    pub fn as_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.instances)
    }
}

impl Default for MeshBuffer {
    fn default() -> Self {
        Self::new(64)
    }
}

impl RenderingBinding for MeshBuffer {
    fn create_mesh(&mut self, shape: &ColliderShape, material: Material) -> MeshHandle {
        if self.instances.len() == self.instances.capacity() {
            log::debug!("mesh buffer growing past {} meshes", self.instances.len());
        }
        self.instances.push(MeshInstance::new(shape, material.color));
        self.colors.push(material.color & 0xFF_FFFF);
        MeshHandle(self.instances.len() as u32 - 1)
    }

    fn set_mesh_transform(&mut self, mesh: MeshHandle, position: Vec3, orientation: Quat) {
        if let Some(m) = self.instances.get_mut(mesh.0 as usize) {
            m.x = position.x;
            m.y = position.y;
            m.z = position.z;
            m.qx = orientation.x;
            m.qy = orientation.y;
            m.qz = orientation.z;
            m.qw = orientation.w;
        }
    }

    fn set_visible(&mut self, mesh: MeshHandle, visible: bool) {
        let index = mesh.0 as usize;
        if let (Some(m), Some(color)) = (self.instances.get_mut(index), self.colors.get(index)) {
            m.color = if visible { *color as f32 } else { MeshInstance::HIDDEN };
        }
    }
}
