//! Pointer picking against the photo panels.

use glam::{Vec2, Vec3, Vec4};

use crate::camera::Camera;
use crate::constants::PANEL_HITBOX;
use crate::photos::PhotoPose;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub dir: Vec3, // unit length
}

/// Distance along the ray to the sphere surface. A ray starting inside the
/// sphere reports the exit distance.
#[inline]
pub fn ray_sphere(ray_origin: Vec3, ray_dir: Vec3, center: Vec3, radius: f32) -> Option<f32> {
    let oc = ray_origin - center;
    let b = oc.dot(ray_dir);
    let c = oc.dot(oc) - radius * radius;
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }
    let sq = disc.sqrt();
    let t = if -b - sq >= 0.0 { -b - sq } else { -b + sq };
    (t >= 0.0).then_some(t)
}

/// Slab test against the axis-aligned box `[-half, half]`.
///
/// `dir` need not be unit length; the result is in units of `dir`.
pub fn ray_box(origin: Vec3, dir: Vec3, half: Vec3) -> Option<f32> {
    let mut t_near = f32::NEG_INFINITY;
    let mut t_far = f32::INFINITY;
    for axis in 0..3 {
        let (o, d, h) = (origin[axis], dir[axis], half[axis]);
        if d.abs() < 1e-8 {
            if o.abs() > h {
                return None;
            }
            continue;
        }
        let a = (-h - o) / d;
        let b = (h - o) / d;
        t_near = t_near.max(a.min(b));
        t_far = t_far.min(a.max(b));
    }
    if t_near > t_far || t_far < 0.0 {
        return None;
    }
    Some(if t_near >= 0.0 { t_near } else { t_far })
}

/// Pixel coordinates to normalized device coordinates (y up).
#[inline]
pub fn ndc_from_pixels(x: f32, y: f32, width: f32, height: f32) -> Vec2 {
    let w = width.max(1.0);
    let h = height.max(1.0);
    Vec2::new((2.0 * x / w) - 1.0, 1.0 - (2.0 * y / h))
}

/// World-space ray from the camera eye through `ndc`.
pub fn screen_ray(camera: &Camera, ndc: Vec2) -> Ray {
    let inv = camera.view_projection().inverse();
    let far = inv * Vec4::new(ndc.x, ndc.y, 1.0, 1.0);
    let far = far.truncate() / far.w;
    let dir = (far - camera.eye).normalize_or_zero();
    Ray {
        origin: camera.eye,
        dir: if dir == Vec3::ZERO { Vec3::NEG_Z } else { dir },
    }
}

/// Distance to a panel's hitbox, if the ray hits it.
pub fn ray_panel(ray: Ray, pose: &PhotoPose) -> Option<f32> {
    let half = PANEL_HITBOX * 0.5;
    ray_sphere(ray.origin, ray.dir, pose.position, half.length() * pose.scale)?;
    if pose.scale <= 0.0 {
        return None;
    }
    // Affine inverse keeps the ray parameter, so t is a world distance.
    let inv = pose.model_matrix().inverse();
    ray_box(
        inv.transform_point3(ray.origin),
        inv.transform_vector3(ray.dir),
        half,
    )
}

/// Nearest panel whose hitbox the ray hits.
pub fn pick_panel(ray: Ray, poses: &[PhotoPose]) -> Option<usize> {
    poses
        .iter()
        .enumerate()
        .filter_map(|(i, pose)| ray_panel(ray, pose).map(|t| (i, t)))
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn box_from_inside_reports_exit() {
        let t = ray_box(Vec3::ZERO, Vec3::X, Vec3::splat(1.0));
        assert_eq!(t, Some(1.0));
    }

    #[test]
    fn box_parallel_miss() {
        assert_eq!(ray_box(Vec3::new(0.0, 5.0, -3.0), Vec3::Z, Vec3::splat(1.0)), None);
    }

    #[test]
    fn ndc_corners() {
        assert_eq!(ndc_from_pixels(0.0, 0.0, 800.0, 600.0), Vec2::new(-1.0, 1.0));
        assert_eq!(ndc_from_pixels(800.0, 600.0, 800.0, 600.0), Vec2::new(1.0, -1.0));
        assert_eq!(ndc_from_pixels(400.0, 300.0, 800.0, 600.0), Vec2::ZERO);
    }
}
