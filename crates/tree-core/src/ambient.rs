//! Background animators: meteors, the snow ring, the distant star field and
//! the star on top.
//!
//! Each one owns its data, writes only to its own batch, and knows nothing
//! about the mode state machine.

use glam::{Quat, Vec2, Vec3};
use rand::prelude::*;
use std::f32::consts::{FRAC_PI_4, PI, TAU};

use crate::constants::*;
use crate::instance::{Batch, Instance, InstanceBatches};
use crate::palette;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Meteor {
    pub position: Vec3,
    pub speed: f32,
    pub length: f32,
}

impl Meteor {
    pub fn spawn<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            position: Vec3::new(
                (rng.gen::<f32>() - 0.5) * 100.0,
                (rng.gen::<f32>() - 0.5) * 100.0 + 50.0, // start high
                (rng.gen::<f32>() - 0.5) * 50.0 - 20.0,  // behind the tree
            ),
            speed: rng.gen_range(0.2..0.7),
            length: rng.gen_range(2.0..7.0),
        }
    }
}

/// Streaks falling diagonally down-left, respawning at the top.
#[derive(Clone, Debug)]
pub struct MeteorShower {
    meteors: Vec<Meteor>,
    rng: StdRng,
}

impl MeteorShower {
    pub fn new(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let meteors = (0..METEOR_COUNT).map(|_| Meteor::spawn(&mut rng)).collect();
        Self { meteors, rng }
    }

    #[inline]
    pub fn meteors(&self) -> &[Meteor] {
        &self.meteors
    }

    /// Advance one frame.
    pub fn update(&mut self, batches: &mut InstanceBatches) {
        let color = palette::srgb_hex(palette::METEOR);
        let rotation = Quat::from_rotation_z(FRAC_PI_4);
        for (i, m) in self.meteors.iter_mut().enumerate() {
            m.position.x -= m.speed;
            m.position.y -= m.speed;
            if m.position.y < METEOR_FLOOR {
                *m = Meteor::spawn(&mut self.rng);
            }
            batches.set(
                Batch::Meteor,
                i,
                Instance {
                    position: m.position,
                    rotation,
                    scale: Vec3::new(m.length, 0.1, 0.1),
                    color,
                    glow: 1.0,
                },
            );
        }
    }
}

/// A hollow cylinder of flakes slowly turning around the tree.
#[derive(Clone, Debug)]
pub struct SnowRing {
    flakes: Vec<Vec3>,
}

impl SnowRing {
    pub fn new(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let flakes = (0..SNOW_COUNT)
            .map(|_| {
                let r = rng.gen_range(SNOW_INNER_RADIUS..SNOW_OUTER_RADIUS);
                let theta = rng.gen::<f32>() * TAU;
                let y = (rng.gen::<f32>() - 0.5) * SNOW_HEIGHT;
                Vec3::new(r * theta.cos(), y, r * theta.sin())
            })
            .collect();
        Self { flakes }
    }

    #[inline]
    pub fn flakes(&self) -> &[Vec3] {
        &self.flakes
    }

    pub fn update(&self, t: f32, batches: &mut InstanceBatches) {
        let spin = Quat::from_rotation_y(t * SNOW_SPIN);
        let color = palette::srgb_hex(palette::SNOW);
        for (i, flake) in self.flakes.iter().enumerate() {
            batches.set(
                Batch::Snow,
                i,
                Instance {
                    position: spin * *flake,
                    rotation: spin,
                    scale: Vec3::splat(SNOW_SCALE),
                    color,
                    glow: 0.8,
                },
            );
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FieldStar {
    pub position: Vec3,
    pub size: f32,
    pub phase: f32,
}

/// Thousands of faint points on a thick shell far behind everything else.
///
/// Radii shrink from the outer edge inward as stars are placed, so the shell
/// is densest near its inner edge.
#[derive(Clone, Debug)]
pub struct StarField {
    stars: Vec<FieldStar>,
}

impl StarField {
    pub fn new(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let step = STARFIELD_DEPTH / STARFIELD_COUNT as f32;
        let mut r = STARFIELD_RADIUS + STARFIELD_DEPTH;
        let stars = (0..STARFIELD_COUNT)
            .map(|_| {
                r -= step * rng.gen::<f32>();
                // uniform direction on the sphere
                let cos_theta = 1.0 - 2.0 * rng.gen::<f32>();
                let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();
                let phi = rng.gen::<f32>() * TAU;
                FieldStar {
                    position: Vec3::new(sin_theta * phi.cos(), cos_theta, sin_theta * phi.sin()) * r,
                    size: (0.5 + 0.5 * rng.gen::<f32>()) * STARFIELD_SCALE,
                    phase: rng.gen::<f32>() * TAU,
                }
            })
            .collect();
        Self { stars }
    }

    #[inline]
    pub fn stars(&self) -> &[FieldStar] {
        &self.stars
    }

    /// Scale of `star` at time `t`; twinkles between half and full size.
    #[inline]
    pub fn twinkle(star: &FieldStar, t: f32) -> f32 {
        star.size * (3.0 + (t * STARFIELD_TWINKLE + star.phase).sin()) / 4.0
    }

    pub fn update(&self, t: f32, batches: &mut InstanceBatches) {
        let color = palette::srgb_hex(palette::STARFIELD);
        for (i, star) in self.stars.iter().enumerate() {
            batches.set(
                Batch::StarField,
                i,
                Instance {
                    position: star.position,
                    rotation: Quat::IDENTITY,
                    scale: Vec3::splat(Self::twinkle(star, t)),
                    color,
                    glow: 1.0,
                },
            );
        }
    }
}

/// Outline of a `points`-pointed star in the XY plane, first tip pointing up.
pub fn star_outline(points: usize, outer: f32, inner: f32) -> Vec<Vec2> {
    let n = points * 2;
    (0..n)
        .map(|i| {
            let r = if i % 2 == 0 { outer } else { inner };
            let a = (i as f32 / n as f32) * TAU + PI / 2.0;
            Vec2::new(a.cos() * r, a.sin() * r)
        })
        .collect()
}

/// Gold star bobbing and spinning above the apex.
///
/// Rendered as one bead per outline vertex plus a larger core.
#[derive(Clone, Debug)]
pub struct TopStar {
    outline: Vec<Vec2>,
}

impl Default for TopStar {
    fn default() -> Self {
        Self::new()
    }
}

impl TopStar {
    pub fn new() -> Self {
        Self {
            outline: star_outline(STAR_POINTS, STAR_OUTER_RADIUS, STAR_INNER_RADIUS),
        }
    }

    /// Number of instances the star occupies.
    pub fn instance_count(&self) -> usize {
        self.outline.len() + 1
    }

    pub fn center(t: f32) -> Vec3 {
        Vec3::new(0.0, STAR_HEIGHT + (t * 2.0).sin() * STAR_BOB_AMPLITUDE, 0.0)
    }

    pub fn update(&self, t: f32, batches: &mut InstanceBatches) {
        let center = Self::center(t);
        let yaw = Quat::from_rotation_y(t * STAR_SPIN);
        let color = palette::srgb_hex(palette::STAR);
        for (i, p) in self.outline.iter().enumerate() {
            let tip = i % 2 == 0;
            batches.set(
                Batch::Star,
                i,
                Instance {
                    position: center + yaw * p.extend(0.0),
                    rotation: yaw,
                    scale: Vec3::splat(if tip { 0.3 } else { 0.2 }),
                    color,
                    glow: 1.0,
                },
            );
        }
        batches.set(
            Batch::Star,
            self.outline.len(),
            Instance {
                position: center,
                rotation: yaw,
                scale: Vec3::splat(STAR_INNER_RADIUS),
                color,
                glow: 1.0,
            },
        );
    }
}
