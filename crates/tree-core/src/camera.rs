//! Camera description and the mode-driven rig that moves it.

use glam::{Mat4, Vec3};

use crate::constants::*;
use crate::mode::{AppMode, SceneState, Zoom};

/// Simple right-handed camera description with perspective projection.
#[derive(Clone, Debug)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub aspect: f32,
    pub fovy_radians: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Camera {
    /// Compute the clip-space projection matrix.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy_radians, self.aspect, self.znear, self.zfar)
    }
    /// Compute the view matrix that transforms world to view space.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

/// Vertical field of view for a zoom factor. Zoom 2 halves the visible extent.
#[inline]
pub fn zoomed_fovy(base_fovy: f32, zoom: Zoom) -> f32 {
    2.0 * ((base_fovy * 0.5).tan() / zoom.get()).atan()
}

/// Orbit parameters around [`CAMERA_LOOK_AT`] for user dragging.
#[derive(Clone, Copy, Debug, Default)]
struct Orbit {
    yaw: f32,
    pitch: f32,
    radius: f32,
    yaw_velocity: f32,
    pitch_velocity: f32,
}

impl Orbit {
    fn from_eye(eye: Vec3, target: Vec3) -> Self {
        let d = eye - target;
        let radius = d.length().max(1.0);
        Self {
            yaw: d.x.atan2(d.z),
            pitch: (d.y / radius).clamp(-1.0, 1.0).asin(),
            radius,
            ..Default::default()
        }
    }

    fn step(&mut self) {
        self.yaw += self.yaw_velocity;
        self.pitch = (self.pitch + self.pitch_velocity).clamp(-ORBIT_PITCH_LIMIT, ORBIT_PITCH_LIMIT);
        self.yaw_velocity *= 1.0 - ORBIT_DAMPING;
        self.pitch_velocity *= 1.0 - ORBIT_DAMPING;
    }

    fn eye(&self, target: Vec3) -> Vec3 {
        let (sy, cy) = self.yaw.sin_cos();
        let (sp, cp) = self.pitch.sin_cos();
        target + Vec3::new(sy * cp, sp, cy * cp) * self.radius
    }
}

/// Drives the camera each frame from the scene mode.
///
/// Assembled: slow automatic drift around the tree. Photo focus: ease to a
/// fixed viewpoint in front of the focused panel. Scattered: free orbit with
/// damped inertia.
#[derive(Clone, Debug)]
pub struct CameraRig {
    camera: Camera,
    base_fovy: f32,
    orbit: Option<Orbit>,
}

impl CameraRig {
    pub fn new(aspect: f32) -> Self {
        let base_fovy = CAMERA_FOV_DEG.to_radians();
        Self {
            camera: Camera {
                eye: CAMERA_START,
                target: CAMERA_LOOK_AT,
                up: Vec3::Y,
                aspect: sanitize_aspect(aspect),
                fovy_radians: base_fovy,
                znear: CAMERA_NEAR,
                zfar: CAMERA_FAR,
            },
            base_fovy,
            orbit: None,
        }
    }

    #[inline]
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        self.camera.aspect = sanitize_aspect(aspect);
    }

    /// Queue a drag of `dx`, `dy` radians. Only honoured while scattered.
    pub fn orbit(&mut self, mode: AppMode, dx: f32, dy: f32) -> bool {
        if mode != AppMode::Scattered {
            return false;
        }
        let eye = self.camera.eye;
        let orbit = self
            .orbit
            .get_or_insert_with(|| Orbit::from_eye(eye, CAMERA_LOOK_AT));
        orbit.yaw_velocity += dx * ORBIT_DAMPING;
        orbit.pitch_velocity += dy * ORBIT_DAMPING;
        true
    }

    pub fn update(&mut self, t: f32, state: &SceneState) {
        self.camera.fovy_radians = zoomed_fovy(self.base_fovy, state.zoom);
        match state.mode {
            AppMode::Assembled => {
                self.orbit = None;
                let drift = Vec3::new(
                    (t * 0.2).sin() * CAMERA_ORBIT_RADIUS,
                    2.0 + (t * 0.1).sin() * 2.0,
                    (t * 0.2).cos() * CAMERA_ORBIT_RADIUS,
                );
                self.ease_to(drift, CAMERA_LOOK_AT);
            }
            AppMode::PhotoFocus { .. } => {
                self.orbit = None;
                self.ease_to(CAMERA_FOCUS_EYE, Vec3::ZERO);
            }
            AppMode::Scattered => {
                let eye = self.camera.eye;
                let orbit = self
                    .orbit
                    .get_or_insert_with(|| Orbit::from_eye(eye, CAMERA_LOOK_AT));
                orbit.step();
                self.camera.eye = orbit.eye(CAMERA_LOOK_AT);
                self.camera.target = self.camera.target.lerp(CAMERA_LOOK_AT, CAMERA_LERP);
            }
        }
    }

    fn ease_to(&mut self, eye: Vec3, target: Vec3) {
        self.camera.eye = self.camera.eye.lerp(eye, CAMERA_LERP);
        self.camera.target = self.camera.target.lerp(target, CAMERA_LERP);
    }
}

fn sanitize_aspect(aspect: f32) -> f32 {
    if aspect.is_finite() && aspect > 0.0 {
        aspect
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zoom_narrows_field_of_view() {
        let base = CAMERA_FOV_DEG.to_radians();
        assert!((zoomed_fovy(base, Zoom::default()) - base).abs() < 1e-6);
        assert!(zoomed_fovy(base, Zoom::new(2.0)) < base);
        assert!(zoomed_fovy(base, Zoom::new(0.5)) > base);
        let half = (base * 0.5).tan();
        let z2 = (zoomed_fovy(base, Zoom::new(2.0)) * 0.5).tan();
        assert!((z2 - half / 2.0).abs() < 1e-5);
    }

    #[test]
    fn orbit_is_ignored_outside_scattered() {
        let mut rig = CameraRig::new(1.5);
        assert!(!rig.orbit(AppMode::Assembled, 1.0, 0.0));
        assert!(!rig.orbit(AppMode::PhotoFocus { panel: 0 }, 1.0, 0.0));
        assert!(rig.orbit(AppMode::Scattered, 1.0, 0.0));
    }

    #[test]
    fn scattered_orbit_keeps_distance_and_settles() {
        let mut rig = CameraRig::new(1.0);
        let state = SceneState::new(AppMode::Scattered, 1.0);
        rig.update(0.0, &state);
        let r0 = rig.camera().eye.distance(CAMERA_LOOK_AT);
        rig.orbit(AppMode::Scattered, 0.5, 0.2);
        for k in 0..400 {
            rig.update(k as f32 / 60.0, &state);
            let r = rig.camera().eye.distance(CAMERA_LOOK_AT);
            assert!((r - r0).abs() < 1e-3);
        }
        let before = rig.camera().eye;
        rig.update(10.0, &state);
        assert!(before.distance(rig.camera().eye) < 1e-3);
    }

    #[test]
    fn photo_focus_converges_on_focus_eye() {
        let mut rig = CameraRig::new(1.0);
        let state = SceneState::new(AppMode::PhotoFocus { panel: 1 }, 1.0);
        for k in 0..1000 {
            rig.update(k as f32 / 60.0, &state);
        }
        assert!(rig.camera().eye.distance(CAMERA_FOCUS_EYE) < 0.01);
    }

    #[test]
    fn bad_aspect_falls_back() {
        let mut rig = CameraRig::new(0.0);
        assert_eq!(rig.camera().aspect, 1.0);
        rig.set_aspect(f32::NAN);
        assert_eq!(rig.camera().aspect, 1.0);
        rig.set_aspect(2.0);
        assert_eq!(rig.camera().aspect, 2.0);
    }
}
