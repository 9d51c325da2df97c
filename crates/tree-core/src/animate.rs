//! Per-frame particle transform updater.

use glam::{EulerRot, Quat, Vec3};
use std::f32::consts::{PI, TAU};

use crate::constants::*;
use crate::instance::{Instance, InstanceBatches};
use crate::mode::{AppMode, SceneState};
use crate::particles::{Category, ParticleDataset, ParticleRecord};

/// Rendered state carried between frames for one particle.
#[derive(Clone, Copy, Debug, Default)]
struct Working {
    position: Vec3,
    euler: Vec3, // XYZ order
}

/// Smoothly moves every particle toward the target of the current mode.
///
/// Positions start at the origin, so the tree grows outward on the first frames.
#[derive(Clone, Debug)]
pub struct ParticleAnimator {
    working: Vec<Working>,
}

/// Where `record` wants to be at time `t` in `mode`.
pub fn particle_target(record: &ParticleRecord, t: f32, mode: AppMode) -> Vec3 {
    let mut target = if mode.is_scattering() {
        let phase = t * record.speed + record.id as f32;
        record.scatter_position
            + Vec3::new(phase.sin() * DRIFT_AMPLITUDE, phase.cos() * DRIFT_AMPLITUDE, 0.0)
    } else {
        record.tree_position
    };
    // Clear the space in front of a focused photo.
    if mode.focused_panel().is_some() && target.length() < FOCUS_CLEAR_RADIUS {
        target *= FOCUS_PUSH;
    }
    target
}

/// Base scale with the shared breathing pulse applied.
#[inline]
pub fn breathing_scale(record: &ParticleRecord, t: f32) -> Vec3 {
    record.scale * (1.0 + (t * BREATH_RATE + record.id as f32).sin() * BREATH_AMPLITUDE)
}

/// Wrap an angle into \[-π, π).
#[inline]
fn wrap_angle(a: f32) -> f32 {
    (a + PI).rem_euclid(TAU) - PI
}

#[inline]
pub fn smooth(current: f32, target: f32, factor: f32) -> f32 {
    current + (target - current) * factor
}

fn advance_rotation(euler: &mut Vec3, record: &ParticleRecord, scattering: bool) {
    spin(euler, record, scattering);
    // Keep long sessions from drifting into imprecise angles.
    *euler = Vec3::new(wrap_angle(euler.x), wrap_angle(euler.y), wrap_angle(euler.z));
}

fn spin(euler: &mut Vec3, record: &ParticleRecord, scattering: bool) {
    if scattering {
        euler.x += SCATTER_SPIN;
        euler.y += SCATTER_SPIN;
        return;
    }
    match record.category {
        Category::Dust => {
            euler.x += DUST_TWINKLE_SPIN;
            euler.y += DUST_TWINKLE_SPIN;
        }
        Category::Cane | Category::Gingerbread => {
            let phase = record.id as f32;
            euler.x = smooth(euler.x, phase.sin() * TILT_AMPLITUDE, TILT_LERP);
            euler.z = smooth(euler.z, phase.cos() * TILT_AMPLITUDE, TILT_LERP);
        }
        Category::Sphere | Category::Cube => {
            euler.y += IDLE_SPIN;
        }
    }
}

impl ParticleAnimator {
    pub fn new(dataset: &ParticleDataset) -> Self {
        Self {
            working: vec![Working::default(); dataset.len()],
        }
    }

    /// Current rendered position of particle `id`.
    pub fn position(&self, id: usize) -> Option<Vec3> {
        self.working.get(id).map(|w| w.position)
    }

    /// Advance one frame and write every particle into its batch slot.
    pub fn update(
        &mut self,
        dataset: &ParticleDataset,
        t: f32,
        state: &SceneState,
        batches: &mut InstanceBatches,
    ) {
        let scattering = state.mode.is_scattering();
        for (record, w) in dataset.records().iter().zip(self.working.iter_mut()) {
            let target = particle_target(record, t, state.mode);
            w.position = w.position.lerp(target, PARTICLE_LERP);
            advance_rotation(&mut w.euler, record, scattering);

            let glow = if record.category == Category::Dust {
                1.0
            } else {
                0.1
            };
            batches.set(
                record.category.batch(),
                dataset.slot(record.id as usize),
                Instance {
                    position: w.position,
                    rotation: Quat::from_euler(EulerRot::XYZ, w.euler.x, w.euler.y, w.euler.z),
                    scale: breathing_scale(record, t),
                    color: record.color,
                    glow,
                },
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(category: Category, id: u32) -> ParticleRecord {
        ParticleRecord {
            id,
            tree_position: Vec3::new(1.0, 2.0, 3.0),
            scatter_position: Vec3::new(10.0, -4.0, 2.0),
            color: [1.0, 0.0, 0.0],
            scale: Vec3::splat(0.3),
            speed: 0.02,
            category,
        }
    }

    #[test]
    fn assembled_target_is_tree_position() {
        let r = record(Category::Sphere, 4);
        assert_eq!(particle_target(&r, 12.0, AppMode::Assembled), r.tree_position);
    }

    #[test]
    fn scattered_target_drifts_only_in_xy() {
        let r = record(Category::Sphere, 4);
        for k in 0..50 {
            let t = k as f32 * 0.7;
            let p = particle_target(&r, t, AppMode::Scattered);
            let d = p - r.scatter_position;
            assert!(d.x.abs() <= DRIFT_AMPLITUDE + 1e-6);
            assert!(d.y.abs() <= DRIFT_AMPLITUDE + 1e-6);
            assert_eq!(d.z, 0.0);
        }
    }

    #[test]
    fn photo_focus_pushes_near_elements_out() {
        let mut r = record(Category::Dust, 0);
        r.scatter_position = Vec3::new(2.0, 0.0, 0.0);
        let p = particle_target(&r, 0.0, AppMode::PhotoFocus { panel: 0 });
        // drift at t=0, id=0 is (0, 0.1, 0)
        assert!((p - Vec3::new(3.0, 0.15, 0.0)).length() < 1e-5);

        r.scatter_position = Vec3::new(20.0, 0.0, 0.0);
        let far = particle_target(&r, 0.0, AppMode::PhotoFocus { panel: 0 });
        assert!((far - Vec3::new(20.0, 0.1, 0.0)).length() < 1e-5);
    }

    #[test]
    fn canes_ease_toward_fixed_tilt() {
        let r = record(Category::Cane, 7);
        let mut e = Vec3::ZERO;
        for _ in 0..500 {
            advance_rotation(&mut e, &r, false);
        }
        assert!((e.x - (7.0_f32).sin() * TILT_AMPLITUDE).abs() < 1e-3);
        assert!((e.z - (7.0_f32).cos() * TILT_AMPLITUDE).abs() < 1e-3);
        assert!(e.y.abs() < 1e-6);
    }

    #[test]
    fn idle_spheres_spin_on_y_only() {
        let r = record(Category::Sphere, 1);
        let mut e = Vec3::ZERO;
        advance_rotation(&mut e, &r, false);
        assert!((e - Vec3::new(0.0, IDLE_SPIN, 0.0)).length() < 1e-6);
        advance_rotation(&mut e, &r, true);
        assert!((e.x - SCATTER_SPIN).abs() < 1e-6);
        assert!((e.y - (IDLE_SPIN + SCATTER_SPIN)).abs() < 1e-6);
    }

    #[test]
    fn spinning_angles_stay_wrapped() {
        let r = record(Category::Dust, 2);
        let mut e = Vec3::ZERO;
        for _ in 0..10_000 {
            advance_rotation(&mut e, &r, false);
            assert!(e.x >= -PI && e.x <= PI);
            assert!(e.y >= -PI && e.y <= PI);
        }
    }

    #[test]
    fn breathing_stays_within_five_percent() {
        let r = record(Category::Sphere, 3);
        for k in 0..100 {
            let s = breathing_scale(&r, k as f32 * 0.13);
            assert!(s.x >= 0.3 * 0.95 - 1e-6 && s.x <= 0.3 * 1.05 + 1e-6);
        }
    }
}
