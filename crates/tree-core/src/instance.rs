//! Per-instance transforms handed to the renderer.
//!
//! Every render batch is sized once when the scene is built and never resized
//! afterwards; updaters only overwrite slots in place.

use glam::{Mat4, Quat, Vec3};

/// Render batches, one instanced draw each.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Batch {
    Sphere,
    Cube,
    Cane,
    Gingerbread,
    Dust,
    Meteor,
    Snow,
    Star,
    StarField,
}

impl Batch {
    pub const COUNT: usize = 9;
    pub const ALL: [Batch; Batch::COUNT] = [
        Batch::Sphere,
        Batch::Cube,
        Batch::Cane,
        Batch::Gingerbread,
        Batch::Dust,
        Batch::Meteor,
        Batch::Snow,
        Batch::Star,
        Batch::StarField,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn label(self) -> &'static str {
        match self {
            Batch::Sphere => "sphere",
            Batch::Cube => "cube",
            Batch::Cane => "cane",
            Batch::Gingerbread => "gingerbread",
            Batch::Dust => "dust",
            Batch::Meteor => "meteor",
            Batch::Snow => "snow",
            Batch::Star => "star",
            Batch::StarField => "starfield",
        }
    }
}

/// Position, orientation, scale and colour of one rendered element.
///
/// `glow` is an emissive factor in \[0, 1\]: 0 is fully lit, 1 ignores lighting.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Instance {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
    pub color: [f32; 3],
    pub glow: f32,
}

impl Default for Instance {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
            color: [1.0, 1.0, 1.0],
            glow: 0.0,
        }
    }
}

impl Instance {
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }

    pub fn to_raw(&self) -> InstanceRaw {
        InstanceRaw {
            model: self.model_matrix().to_cols_array_2d(),
            color: [self.color[0], self.color[1], self.color[2], self.glow],
        }
    }
}

/// GPU layout of an [`Instance`]: column-major model matrix plus RGB + glow.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct InstanceRaw {
    pub model: [[f32; 4]; 4],
    pub color: [f32; 4],
}

/// Fixed-size instance slots for every [`Batch`].
#[derive(Clone, Debug)]
pub struct InstanceBatches {
    batches: [Vec<Instance>; Batch::COUNT],
}

impl InstanceBatches {
    /// Allocate `sizes[batch.index()]` default instances per batch.
    pub fn with_sizes(sizes: [usize; Batch::COUNT]) -> Self {
        Self {
            batches: sizes.map(|n| vec![Instance::default(); n]),
        }
    }

    #[inline]
    pub fn get(&self, batch: Batch) -> &[Instance] {
        &self.batches[batch.index()]
    }

    #[inline]
    pub fn len(&self, batch: Batch) -> usize {
        self.batches[batch.index()].len()
    }

    pub fn total(&self) -> usize {
        self.batches.iter().map(Vec::len).sum()
    }

    /// Overwrite one slot. Writes past the end of a batch are dropped.
    #[inline]
    pub fn set(&mut self, batch: Batch, slot: usize, instance: Instance) {
        if let Some(dst) = self.batches[batch.index()].get_mut(slot) {
            *dst = instance;
        }
    }

    /// Pack one batch for upload, reusing `out`'s allocation.
    pub fn pack_into(&self, batch: Batch, out: &mut Vec<InstanceRaw>) {
        out.clear();
        out.extend(self.get(batch).iter().map(Instance::to_raw));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_indices_follow_all_order() {
        for (i, b) in Batch::ALL.iter().enumerate() {
            assert_eq!(b.index(), i);
        }
    }

    #[test]
    fn batches_are_fixed_size() {
        let mut batches = InstanceBatches::with_sizes([3, 0, 1, 0, 2, 0, 0, 0, 0]);
        assert_eq!(batches.total(), 6);
        batches.set(Batch::Sphere, 10, Instance::default());
        assert_eq!(batches.len(Batch::Sphere), 3);
        assert_eq!(batches.len(Batch::Cube), 0);
    }

    #[test]
    fn raw_packs_translation_in_last_column() {
        let inst = Instance {
            position: Vec3::new(1.0, 2.0, 3.0),
            glow: 0.25,
            ..Default::default()
        };
        let raw = inst.to_raw();
        assert_eq!(raw.model[3], [1.0, 2.0, 3.0, 1.0]);
        assert_eq!(raw.color[3], 0.25);
        assert_eq!(std::mem::size_of::<InstanceRaw>(), 80);
    }
}
