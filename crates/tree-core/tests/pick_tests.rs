// Host-side tests for pointer picking.

use glam::{Quat, Vec2, Vec3};
use tree_core::pick::*;
use tree_core::{Camera, PhotoPose};

fn front_camera(z: f32) -> Camera {
    Camera {
        eye: Vec3::new(0.0, 0.0, z),
        target: Vec3::ZERO,
        up: Vec3::Y,
        aspect: 1.0,
        fovy_radians: 45f32.to_radians(),
        znear: 0.1,
        zfar: 200.0,
    }
}

fn pose(position: Vec3, scale: f32) -> PhotoPose {
    PhotoPose {
        position,
        rotation: Quat::IDENTITY,
        scale,
    }
}

#[test]
fn ray_sphere_intersection_basic() {
    let t = ray_sphere(Vec3::ZERO, Vec3::Z, Vec3::new(0.0, 0.0, 5.0), 2.0);
    assert!(matches!(t, Some(t) if (t - 3.0).abs() < 1e-5));
}

#[test]
fn ray_sphere_intersection_miss() {
    assert!(ray_sphere(Vec3::ZERO, Vec3::X, Vec3::new(0.0, 0.0, 5.0), 2.0).is_none());
}

#[test]
fn ray_sphere_behind_origin_is_ignored() {
    assert!(ray_sphere(Vec3::ZERO, Vec3::Z, Vec3::new(0.0, 0.0, -5.0), 2.0).is_none());
}

#[test]
fn ray_sphere_from_inside_hits_exit() {
    let t = ray_sphere(Vec3::ZERO, Vec3::Z, Vec3::ZERO, 2.0);
    assert!(matches!(t, Some(t) if (t - 2.0).abs() < 1e-5));
}

#[test]
fn center_ray_points_at_target() {
    let cam = front_camera(25.0);
    let ray = screen_ray(&cam, Vec2::ZERO);
    assert!((ray.dir - Vec3::NEG_Z).length() < 1e-4);
    assert_eq!(ray.origin, cam.eye);
}

#[test]
fn edge_rays_spread_by_half_fov() {
    let cam = front_camera(25.0);
    let top = screen_ray(&cam, Vec2::new(0.0, 1.0));
    let angle = top.dir.angle_between(Vec3::NEG_Z);
    assert!((angle - 22.5f32.to_radians()).abs() < 1e-3);
    assert!(top.dir.y > 0.0);
}

#[test]
fn nearest_panel_wins() {
    let ray = screen_ray(&front_camera(25.0), Vec2::ZERO);
    let poses = [
        pose(Vec3::new(0.0, 0.0, 0.0), 1.0),
        pose(Vec3::new(0.0, 0.0, 10.0), 1.0),
        pose(Vec3::new(8.0, 0.0, 12.0), 1.0),
    ];
    assert_eq!(pick_panel(ray, &poses), Some(1));
}

#[test]
fn empty_space_picks_nothing() {
    let ray = screen_ray(&front_camera(25.0), Vec2::new(0.9, 0.9));
    let poses = [pose(Vec3::ZERO, 1.0), pose(Vec3::new(0.0, -5.0, 0.0), 0.5)];
    assert_eq!(pick_panel(ray, &poses), None);
}

#[test]
fn hitbox_scales_with_panel() {
    let ray = Ray {
        origin: Vec3::new(3.0, 0.0, 20.0),
        dir: Vec3::NEG_Z,
    };
    // half-width 2 at scale 1 misses x = 3, half-width 7 at scale 3.5 hits
    assert!(ray_panel(ray, &pose(Vec3::ZERO, 1.0)).is_none());
    assert!(ray_panel(ray, &pose(Vec3::ZERO, 3.5)).is_some());
}

#[test]
fn rotated_panel_is_thin_edge_on() {
    let edge_on = PhotoPose {
        position: Vec3::ZERO,
        rotation: Quat::from_rotation_y(std::f32::consts::FRAC_PI_2),
        scale: 1.0,
    };
    // seen edge-on the hitbox is only 1 unit wide
    let ray = Ray {
        origin: Vec3::new(1.0, 0.0, 20.0),
        dir: Vec3::NEG_Z,
    };
    assert!(ray_panel(ray, &edge_on).is_none());
    let ray = Ray {
        origin: Vec3::new(0.2, 0.0, 20.0),
        dir: Vec3::NEG_Z,
    };
    assert!(ray_panel(ray, &edge_on).is_some());
}
