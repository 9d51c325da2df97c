//! Position generators for the two particle arrangements.
//!
//! The assembled layout is a cone standing on the XZ plane, centred on the
//! origin, with its apex at `+height / 2`. The scattered layout is an
//! axis-aligned box cloud around the origin.

use glam::Vec3;
use rand::Rng;
use std::f32::consts::{PI, TAU};

use crate::constants::{MIN_SURFACE_RADIUS, SURFACE_JITTER};

/// Golden-angle increment `π(3 − √5)`, about 2.39996 radians.
pub const GOLDEN_ANGLE: f32 = PI * (3.0 - 2.236_068);

/// Radius of the cone at height `y`.
///
/// Zero at the apex (`y = height / 2`), `base_radius` at the base
/// (`y = -height / 2`). Heights outside the cone are clamped.
#[inline]
pub fn cone_radius_at(y: f32, height: f32, base_radius: f32) -> f32 {
    let normalized = ((y + height / 2.0) / height).clamp(0.0, 1.0);
    (1.0 - normalized) * base_radius
}

/// Height of the `index`-th of `total` surface elements.
///
/// Affine in `index` and strictly decreasing: element 0 sits at the apex.
#[inline]
pub fn surface_height(index: usize, total: usize, height: f32) -> f32 {
    height / 2.0 - (index as f32 / total.max(1) as f32) * height
}

/// Place element `index` of `total` on the cone surface along a golden-angle spiral.
pub fn tree_surface_position<R: Rng + ?Sized>(
    index: usize,
    total: usize,
    height: f32,
    base_radius: f32,
    rng: &mut R,
) -> Vec3 {
    let y = surface_height(index, total, height);
    let cone_radius = cone_radius_at(y, height, base_radius);
    let r = (cone_radius - rng.gen::<f32>() * SURFACE_JITTER).max(MIN_SURFACE_RADIUS);
    let theta = index as f32 * GOLDEN_ANGLE;
    Vec3::new(r * theta.cos(), y, r * theta.sin())
}

/// Random point inside the cone volume.
///
/// The `sqrt` radius draw gives uniform density over each horizontal disc.
pub fn volume_fill_position<R: Rng + ?Sized>(height: f32, base_radius: f32, rng: &mut R) -> Vec3 {
    let y = rng.gen::<f32>() * height - height / 2.0;
    let max_r = cone_radius_at(y, height, base_radius);
    let r = rng.gen::<f32>().sqrt() * max_r;
    let theta = rng.gen::<f32>() * TAU;
    Vec3::new(r * theta.cos(), y, r * theta.sin())
}

/// Uniform random point in the box `[-extent / 2, extent / 2)` on each axis.
pub fn cloud_scatter_position<R: Rng + ?Sized>(extent: Vec3, rng: &mut R) -> Vec3 {
    Vec3::new(
        (rng.gen::<f32>() - 0.5) * extent.x,
        (rng.gen::<f32>() - 0.5) * extent.y,
        (rng.gen::<f32>() - 0.5) * extent.z,
    )
}

/// Distance from the Y axis.
#[inline]
pub fn horizontal_radius(p: Vec3) -> f32 {
    (p.x * p.x + p.z * p.z).sqrt()
}
