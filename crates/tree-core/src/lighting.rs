//! The light set shared by every lit batch.
//!
//! A fixed number of point lights so the shader can loop over a plain uniform
//! array. Unused slots carry zero intensity.

use glam::{Quat, Vec3};

use crate::constants::*;
use crate::palette;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointLight {
    pub position: Vec3,
    pub color: [f32; 3],
    pub intensity: f32,
    /// Distance where the light fades out; 0 lights everything equally.
    pub range: f32,
}

impl PointLight {
    pub const OFF: PointLight = PointLight {
        position: Vec3::ZERO,
        color: [0.0; 3],
        intensity: 0.0,
        range: 0.0,
    };

    #[inline]
    pub fn is_on(&self) -> bool {
        self.intensity > 0.0
    }

    pub fn to_raw(&self) -> LightRaw {
        LightRaw {
            position_range: self.position.extend(self.range).to_array(),
            color_intensity: [self.color[0], self.color[1], self.color[2], self.intensity],
        }
    }
}

/// GPU layout of a [`PointLight`]: two `vec4`s, 32 bytes.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightRaw {
    pub position_range: [f32; 4],
    pub color_intensity: [f32; 4],
}

/// Slots in [`Lighting::lights`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LightSlot {
    Key,
    Fill,
    Under,
    Star,
    Focus,
}

impl LightSlot {
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Lighting {
    pub ambient: f32,
    pub lights: [PointLight; LIGHT_COUNT],
}

impl Default for Lighting {
    fn default() -> Self {
        Self::for_frame(Vec3::new(0.0, STAR_HEIGHT, 0.0), None)
    }
}

impl Lighting {
    /// Warm key from above, red fill from behind, gold from below, the star's
    /// glow, and a gold light in front of the focused photo when there is one.
    pub fn for_frame(star_center: Vec3, focus: Option<(Vec3, Quat)>) -> Self {
        let mut lights = [PointLight::OFF; LIGHT_COUNT];
        lights[LightSlot::Key.index()] = PointLight {
            position: KEY_LIGHT_POSITION,
            color: palette::srgb_hex(palette::KEY_LIGHT),
            intensity: KEY_LIGHT_INTENSITY,
            range: 0.0,
        };
        lights[LightSlot::Fill.index()] = PointLight {
            position: FILL_LIGHT_POSITION,
            color: palette::srgb_hex(palette::FILL_LIGHT),
            intensity: FILL_LIGHT_INTENSITY,
            range: 0.0,
        };
        lights[LightSlot::Under.index()] = PointLight {
            position: UNDER_LIGHT_POSITION,
            color: palette::srgb_hex(palette::PHOTO_FRAME),
            intensity: UNDER_LIGHT_INTENSITY,
            range: 0.0,
        };
        lights[LightSlot::Star.index()] = PointLight {
            position: star_center,
            color: palette::srgb_hex(palette::STAR),
            intensity: STAR_LIGHT_INTENSITY,
            range: STAR_LIGHT_RANGE,
        };
        if let Some((position, rotation)) = focus {
            lights[LightSlot::Focus.index()] = PointLight {
                position: position + rotation * Vec3::new(0.0, 0.0, FOCUS_LIGHT_OFFSET),
                color: palette::srgb_hex(palette::PHOTO_FRAME),
                intensity: FOCUS_LIGHT_INTENSITY,
                range: FOCUS_LIGHT_RANGE,
            };
        }
        Self {
            ambient: LIGHT_AMBIENT,
            lights,
        }
    }

    #[inline]
    pub fn light(&self, slot: LightSlot) -> &PointLight {
        &self.lights[slot.index()]
    }

    pub fn to_raw(&self) -> [LightRaw; LIGHT_COUNT] {
        self.lights.map(|l| l.to_raw())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slots_cover_the_light_array() {
        assert_eq!(LightSlot::Focus.index(), LIGHT_COUNT - 1);
    }

    #[test]
    fn focus_light_only_when_focused() {
        let star = Vec3::new(0.0, STAR_HEIGHT, 0.0);
        let idle = Lighting::for_frame(star, None);
        assert!(!idle.light(LightSlot::Focus).is_on());
        assert!(idle.light(LightSlot::Key).is_on());

        let panel = Vec3::new(0.0, 0.0, 15.0);
        let lit = Lighting::for_frame(star, Some((panel, Quat::IDENTITY)));
        let focus = lit.light(LightSlot::Focus);
        assert!(focus.is_on());
        assert!((focus.position - Vec3::new(0.0, 0.0, 15.0 + FOCUS_LIGHT_OFFSET)).length() < 1e-5);
        assert_eq!(focus.range, FOCUS_LIGHT_RANGE);
    }

    #[test]
    fn fill_light_is_red() {
        let [r, g, b] = Lighting::default().light(LightSlot::Fill).color;
        assert!(r > g * 4.0 && r > b * 4.0);
    }

    #[test]
    fn raw_packs_range_and_intensity_in_w() {
        let light = PointLight {
            position: Vec3::new(1.0, 2.0, 3.0),
            color: [0.5, 0.25, 0.125],
            intensity: 2.0,
            range: 15.0,
        };
        let raw = light.to_raw();
        assert_eq!(raw.position_range, [1.0, 2.0, 3.0, 15.0]);
        assert_eq!(raw.color_intensity, [0.5, 0.25, 0.125, 2.0]);
        assert_eq!(std::mem::size_of::<LightRaw>(), 32);
    }
}
