// Host-side tests for tuning constants and their relationships.

use tree_core::constants::*;

#[test]
#[allow(clippy::assertions_on_constants)]
fn thresholds_are_ordered() {
    assert!(CUBE_THRESHOLD < GINGERBREAD_THRESHOLD);
    assert!(GINGERBREAD_THRESHOLD < CANE_THRESHOLD);
    assert!(CANE_THRESHOLD < 1.0);
    assert!(OUTER_ORNAMENT_THRESHOLD > 0.0 && OUTER_ORNAMENT_THRESHOLD < 1.0);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn smoothing_factors_are_fractions() {
    for f in [PARTICLE_LERP, PHOTO_LERP, TILT_LERP, CAMERA_LERP, ORBIT_DAMPING] {
        assert!(f > 0.0 && f < 1.0);
    }
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn counts_add_up() {
    assert_eq!(PARTICLE_COUNT, STRUCTURAL_COUNT + DUST_COUNT);
    assert_eq!(PARTICLE_COUNT, 2500);
    assert_eq!(PHOTO_COUNT, 3);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn zoom_range_contains_identity() {
    assert!(ZOOM_MIN < 1.0 && 1.0 < ZOOM_MAX);
    assert!(ZOOM_STEP > 0.0 && ZOOM_STEP < ZOOM_MAX - ZOOM_MIN);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn scene_fits_the_camera_frustum() {
    assert!(CAMERA_NEAR > 0.0 && CAMERA_NEAR < CAMERA_FAR);
    assert!(CAMERA_ORBIT_RADIUS + SNOW_OUTER_RADIUS < CAMERA_FAR);
    // focused photo sits between the tree and the focus eye
    assert!(PHOTO_FOCUS_POSITION.z < CAMERA_FOCUS_EYE.z);
    assert!(PHOTO_FOCUS_POSITION.z > TREE_BASE_RADIUS);
    assert!(STAR_HEIGHT > TREE_HEIGHT / 2.0 - 0.5);
    assert!(SNOW_INNER_RADIUS > TREE_BASE_RADIUS);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn star_field_stays_inside_the_far_plane() {
    assert!(STARFIELD_RADIUS > SNOW_OUTER_RADIUS + CAMERA_ORBIT_RADIUS);
    assert!(STARFIELD_RADIUS + STARFIELD_DEPTH + CAMERA_ORBIT_RADIUS < CAMERA_FAR);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn focused_frame_outshines_the_rest() {
    assert!(PHOTO_FRAME_FOCUS_GLOW > PHOTO_FRAME_GLOW);
    assert!(PHOTO_FRAME_FOCUS_GLOW <= 1.0);
}
