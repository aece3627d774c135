//! Bounding-sphere and ground-plane intersection helpers.

use glam::Vec3;
use vr_survival_core::{Ray, GROUND_HEIGHT};

/// Distance along `ray` to the first intersection with a sphere, if any.
///
/// A ray that starts inside the sphere reports the exit point.
pub(crate) fn ray_sphere(ray: &Ray, center: Vec3, radius: f32) -> Option<f32> {
    let offset = ray.origin() - center;
    let half_b = offset.dot(ray.direction());
    let c = offset.length_squared() - radius * radius;
    let discriminant = half_b * half_b - c;
    if discriminant < 0.0 {
        return None;
    }

    let root = discriminant.sqrt();
    let near = -half_b - root;
    if near >= 0.0 {
        return Some(near);
    }
    let far = -half_b + root;
    (far >= 0.0).then_some(far)
}

/// Distance along `ray` to the ground plane. Rays parallel to or pointing
/// away from the ground never hit it.
pub(crate) fn ray_ground(ray: &Ray) -> Option<f32> {
    let descent = ray.direction().y;
    if descent >= -f32::EPSILON {
        return None;
    }
    let distance = (GROUND_HEIGHT - ray.origin().y) / descent;
    (distance >= 0.0).then_some(distance)
}

/// Reports whether two spheres overlap.
pub(crate) fn spheres_touch(a: Vec3, a_radius: f32, b: Vec3, b_radius: f32) -> bool {
    let reach = a_radius + b_radius;
    a.distance_squared(b) <= reach * reach
}
