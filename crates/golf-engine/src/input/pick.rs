use glam::Vec3;

use crate::api::types::PlayerId;

/// World-space ray from the camera through the pointer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickRay {
    pub origin: Vec3,
    /// Normalised on construction; a zero direction stays zero and hits nothing.
    pub direction: Vec3,
}

impl PickRay {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Distance along the ray to the first intersection with the sphere, if
    /// any. A ray starting inside the sphere hits at 0.
    pub fn hit_sphere(&self, center: Vec3, radius: f32) -> Option<f32> {
        if self.direction == Vec3::ZERO {
            return None;
        }
        let oc = self.origin - center;
        let b = oc.dot(self.direction);
        let c = oc.length_squared() - radius * radius;
        if c <= 0.0 {
            return Some(0.0);
        }
        // Origin outside and pointing away.
        if b > 0.0 {
            return None;
        }
        let disc = b * b - c;
        if disc < 0.0 {
            return None;
        }
        Some(-b - disc.sqrt())
    }
}

/// Nearest ball hit by the ray, testing each against a bounding sphere of
/// `radius`. Ties go to the lower player id.
pub fn pick_player<I>(ray: &PickRay, balls: I, radius: f32) -> Option<PlayerId>
where
    I: IntoIterator<Item = (PlayerId, Vec3)>,
{
    balls
        .into_iter()
        .filter_map(|(id, center)| ray.hit_sphere(center, radius).map(|t| (id, t)))
        .min_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)))
        .map(|(id, _)| id)
}
