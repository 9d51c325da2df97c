use glam::Vec3;
use rand::prelude::*;

use crate::constants::*;
use crate::instance::Batch;
use crate::layout;
use crate::palette;

/// Kind of decorative element; selects the render batch and rotation behaviour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Category {
    Sphere,
    Cube,
    Cane,
    Gingerbread,
    Dust,
}

impl Category {
    pub const COUNT: usize = 5;
    pub const ALL: [Category; Category::COUNT] = [
        Category::Sphere,
        Category::Cube,
        Category::Cane,
        Category::Gingerbread,
        Category::Dust,
    ];

    /// Map one uniform draw in \[0, 1) to a structural category.
    ///
    /// Top 6% become canes, the next 6% gingerbread, the next 6% cubes and the
    /// rest spheres. Dust is never produced here.
    pub fn from_draw(u: f32) -> Self {
        if u > CANE_THRESHOLD {
            Category::Cane
        } else if u > GINGERBREAD_THRESHOLD {
            Category::Gingerbread
        } else if u > CUBE_THRESHOLD {
            Category::Cube
        } else {
            Category::Sphere
        }
    }

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn batch(self) -> Batch {
        match self {
            Category::Sphere => Batch::Sphere,
            Category::Cube => Batch::Cube,
            Category::Cane => Batch::Cane,
            Category::Gingerbread => Batch::Gingerbread,
            Category::Dust => Batch::Dust,
        }
    }
}

#[derive(Clone, Debug)]
pub struct ParticleRecord {
    pub id: u32,
    pub tree_position: Vec3,
    pub scatter_position: Vec3,
    pub color: [f32; 3],
    pub scale: Vec3,
    pub speed: f32,
    pub category: Category,
}

/// Number of records per category.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CategoryCounts([usize; Category::COUNT]);

impl CategoryCounts {
    #[inline]
    pub fn get(&self, category: Category) -> usize {
        self.0[category.index()]
    }

    pub fn total(&self) -> usize {
        self.0.iter().sum()
    }

    /// Bump the count and return the slot the new element occupies.
    fn claim(&mut self, category: Category) -> usize {
        let slot = self.0[category.index()];
        self.0[category.index()] += 1;
        slot
    }
}

/// The full, immutable set of decorative elements for one session.
#[derive(Clone, Debug)]
pub struct ParticleDataset {
    records: Vec<ParticleRecord>,
    slots: Vec<u32>,
    counts: CategoryCounts,
}

impl ParticleDataset {
    /// Build the dataset with a deterministic `StdRng`.
    pub fn seeded(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        Self::build(&mut rng)
    }

    /// Build the structural spiral layer followed by the dust layer.
    pub fn build<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut records = Vec::with_capacity(PARTICLE_COUNT);
        let mut slots = Vec::with_capacity(PARTICLE_COUNT);
        let mut counts = CategoryCounts::default();

        for i in 0..STRUCTURAL_COUNT {
            let record = structural_record(i, rng);
            slots.push(counts.claim(record.category) as u32);
            records.push(record);
        }
        for i in 0..DUST_COUNT {
            let record = dust_record(STRUCTURAL_COUNT + i, rng);
            slots.push(counts.claim(record.category) as u32);
            records.push(record);
        }

        log::info!(
            "[particles] built {} records: sphere={} cube={} cane={} gingerbread={} dust={}",
            records.len(),
            counts.get(Category::Sphere),
            counts.get(Category::Cube),
            counts.get(Category::Cane),
            counts.get(Category::Gingerbread),
            counts.get(Category::Dust),
        );

        Self {
            records,
            slots,
            counts,
        }
    }

    #[inline]
    pub fn records(&self) -> &[ParticleRecord] {
        &self.records
    }

    #[inline]
    pub fn counts(&self) -> CategoryCounts {
        self.counts
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Slot of record `id` inside its category's batch.
    ///
    /// Slots follow id order within a category, so they are the same every frame.
    #[inline]
    pub fn slot(&self, id: usize) -> usize {
        self.slots[id] as usize
    }
}

fn pick_color<R: Rng + ?Sized>(choices: &[u32], rng: &mut R) -> [f32; 3] {
    let hex = *choices.choose(rng).unwrap_or(&palette::FOLIAGE[0]);
    palette::srgb_hex(hex)
}

fn structural_record<R: Rng + ?Sized>(i: usize, rng: &mut R) -> ParticleRecord {
    let tree_position =
        layout::tree_surface_position(i, STRUCTURAL_COUNT, TREE_HEIGHT, TREE_BASE_RADIUS, rng);
    let category = Category::from_draw(rng.gen());
    let base = rng.gen_range(BASE_SCALE_MIN..BASE_SCALE_MAX);

    let (color, scale) = match category {
        Category::Cane => (palette::srgb_hex(palette::CANE[i % 2]), CANE_SCALE),
        Category::Gingerbread => (
            palette::srgb_hex(palette::GINGERBREAD[i % 2]),
            GINGERBREAD_SCALE,
        ),
        Category::Cube => (
            pick_color(&palette::ORNAMENT, rng),
            Vec3::splat(base * 1.5),
        ),
        _ => {
            // Outer elements are more likely to be ornaments, the inside stays green.
            let cone_radius = layout::cone_radius_at(tree_position.y, TREE_HEIGHT, TREE_BASE_RADIUS);
            let is_outer = layout::horizontal_radius(tree_position) > cone_radius - OUTER_BAND;
            if is_outer && rng.gen::<f32>() > OUTER_ORNAMENT_THRESHOLD {
                (pick_color(&palette::ORNAMENT, rng), Vec3::splat(base * 1.3))
            } else {
                (pick_color(&palette::FOLIAGE, rng), Vec3::splat(base * 1.1))
            }
        }
    };

    ParticleRecord {
        id: i as u32,
        tree_position,
        scatter_position: layout::cloud_scatter_position(STRUCTURAL_SCATTER_EXTENT, rng),
        color,
        scale,
        speed: rng.gen_range(STRUCTURAL_SPEED_MIN..STRUCTURAL_SPEED_MAX),
        category,
    }
}

fn dust_record<R: Rng + ?Sized>(id: usize, rng: &mut R) -> ParticleRecord {
    let tree_position = layout::volume_fill_position(TREE_HEIGHT, TREE_BASE_RADIUS, rng);
    ParticleRecord {
        id: id as u32,
        tree_position,
        scatter_position: layout::cloud_scatter_position(DUST_SCATTER_EXTENT, rng),
        color: pick_color(&palette::DUST, rng),
        scale: Vec3::splat(DUST_SCALE),
        speed: rng.gen_range(DUST_SPEED_MIN..DUST_SPEED_MAX),
        category: Category::Dust,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thresholds_match_documented_cut_points() {
        assert_eq!(Category::from_draw(0.0), Category::Sphere);
        assert_eq!(Category::from_draw(0.82), Category::Sphere);
        assert_eq!(Category::from_draw(0.83), Category::Cube);
        assert_eq!(Category::from_draw(0.88), Category::Cube);
        assert_eq!(Category::from_draw(0.9), Category::Gingerbread);
        assert_eq!(Category::from_draw(0.95), Category::Cane);
        assert_eq!(Category::from_draw(0.999), Category::Cane);
    }

    #[test]
    fn slots_are_dense_per_category() {
        let ds = ParticleDataset::seeded(11);
        let mut seen = [0usize; Category::COUNT];
        for r in ds.records() {
            let c = r.category.index();
            assert_eq!(ds.slot(r.id as usize), seen[c]);
            seen[c] += 1;
        }
        for c in Category::ALL {
            assert_eq!(seen[c.index()], ds.counts().get(c));
        }
    }

    #[test]
    fn ids_are_stable_indices() {
        let ds = ParticleDataset::seeded(5);
        for (i, r) in ds.records().iter().enumerate() {
            assert_eq!(r.id as usize, i);
        }
    }
}
