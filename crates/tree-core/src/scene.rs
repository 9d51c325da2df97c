//! The scene: owns every animator and is the single object a front-end drives.

use glam::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::ambient::{MeteorShower, SnowRing, StarField, TopStar};
use crate::animate::ParticleAnimator;
use crate::camera::CameraRig;
use crate::constants::*;
use crate::error::SceneError;
use crate::instance::{Batch, Instance, InstanceBatches};
use crate::lighting::Lighting;
use crate::mode::{InputEvent, SceneState};
use crate::particles::{Category, ParticleDataset};
use crate::photos::{ImageSource, LoadTicket, PhotoGallery, PhotoPose};
use crate::pick;

/// Photos shown until the user supplies their own.
pub const DEFAULT_PHOTOS: [&str; PHOTO_COUNT] = [
    "https://images.unsplash.com/photo-1543589076-47a827c109fb?q=80&w=500&auto=format&fit=crop",
    "https://images.unsplash.com/photo-1512474932049-782a02663d18?q=80&w=500&auto=format&fit=crop",
    "https://images.unsplash.com/photo-1544005313-94ddf0286df2?q=80&w=500&auto=format&fit=crop",
];

pub const DEFAULT_SEED: u64 = 0x5EED;

#[derive(Clone, Debug, PartialEq)]
pub struct SceneConfig {
    pub seed: u64,
    pub zoom: f32,
    pub photos: [ImageSource; PHOTO_COUNT],
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            zoom: 1.0,
            photos: DEFAULT_PHOTOS.map(ImageSource::parse),
        }
    }
}

// Independent child streams so adding draws to one animator never shifts another.
#[inline]
fn child_seed(seed: u64, stream: u64) -> u64 {
    seed ^ stream.wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

pub struct Scene {
    state: SceneState,
    dataset: ParticleDataset,
    animator: ParticleAnimator,
    gallery: PhotoGallery,
    meteors: MeteorShower,
    snow: SnowRing,
    star: TopStar,
    field: StarField,
    rig: CameraRig,
    lighting: Lighting,
    batches: InstanceBatches,
}

impl Scene {
    pub fn new(config: SceneConfig, aspect: f32) -> Self {
        let seed = config.seed;
        let dataset = ParticleDataset::seeded(child_seed(seed, 1));
        let mut photo_rng = StdRng::seed_from_u64(child_seed(seed, 2));
        let gallery = PhotoGallery::new(config.photos, &mut photo_rng);
        let star = TopStar::new();

        let counts = dataset.counts();
        let mut sizes = [0usize; Batch::COUNT];
        for c in Category::ALL {
            sizes[c.batch().index()] = counts.get(c);
        }
        sizes[Batch::Meteor.index()] = METEOR_COUNT;
        sizes[Batch::Snow.index()] = SNOW_COUNT;
        sizes[Batch::Star.index()] = star.instance_count();
        sizes[Batch::StarField.index()] = STARFIELD_COUNT;
        let batches = InstanceBatches::with_sizes(sizes);

        log::info!(
            "[scene] seed={:#x} particles={} instances={} zoom={}",
            seed,
            dataset.len(),
            batches.total(),
            config.zoom
        );

        Self {
            state: SceneState::new(Default::default(), config.zoom),
            animator: ParticleAnimator::new(&dataset),
            dataset,
            gallery,
            meteors: MeteorShower::new(child_seed(seed, 3)),
            snow: SnowRing::new(child_seed(seed, 4)),
            star,
            field: StarField::new(child_seed(seed, 5)),
            rig: CameraRig::new(aspect),
            lighting: Lighting::default(),
            batches,
        }
    }

    #[inline]
    pub fn state(&self) -> &SceneState {
        &self.state
    }

    #[inline]
    pub fn dataset(&self) -> &ParticleDataset {
        &self.dataset
    }

    #[inline]
    pub fn batches(&self) -> &InstanceBatches {
        &self.batches
    }

    #[inline]
    pub fn photos(&self) -> &PhotoGallery {
        &self.gallery
    }

    #[inline]
    pub fn camera(&self) -> &crate::camera::Camera {
        self.rig.camera()
    }

    #[inline]
    pub fn lighting(&self) -> &Lighting {
        &self.lighting
    }

    pub fn status_label(&self) -> &'static str {
        self.state.mode.status_label()
    }

    /// Returns `true` when the mode changed.
    pub fn handle(&mut self, event: InputEvent) -> bool {
        self.state.apply(event)
    }

    pub fn set_zoom(&mut self, value: f32) {
        self.state.set_zoom(value);
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        self.rig.set_aspect(aspect);
    }

    /// Drag the camera; ignored unless scattered.
    pub fn orbit(&mut self, dx: f32, dy: f32) -> bool {
        self.rig.orbit(self.state.mode, dx, dy)
    }

    /// Advance every animator to elapsed time `t` (seconds).
    pub fn frame(&mut self, t: f32) {
        self.animator
            .update(&self.dataset, t, &self.state, &mut self.batches);
        self.gallery.step(t, self.state.mode);
        self.meteors.update(&mut self.batches);
        self.snow.update(t, &mut self.batches);
        self.star.update(t, &mut self.batches);
        self.field.update(t, &mut self.batches);
        self.rig.update(t, &self.state);

        let focus = self
            .state
            .mode
            .focused_panel()
            .and_then(|i| self.gallery.panel(i))
            .map(|p| {
                let pose = p.pose();
                (pose.position, pose.rotation)
            });
        self.lighting = Lighting::for_frame(TopStar::center(t), focus);
    }

    pub fn photo_poses(&self) -> [PhotoPose; PHOTO_COUNT] {
        std::array::from_fn(|i| {
            self.gallery
                .panel(i)
                .map(|p| p.pose())
                .unwrap_or_default()
        })
    }

    /// Gold frames behind the photos, the focused one glowing.
    pub fn frame_instances(&self) -> [Instance; PHOTO_COUNT] {
        let focused = self.state.mode.focused_panel();
        let poses = self.photo_poses();
        std::array::from_fn(|i| poses[i].frame_instance(focused == Some(i)))
    }

    /// Turn a click at `ndc` into the event it represents.
    pub fn pick(&self, ndc: Vec2) -> InputEvent {
        let ray = pick::screen_ray(self.rig.camera(), ndc);
        match pick::pick_panel(ray, &self.photo_poses()) {
            Some(i) => InputEvent::PanelClick(i),
            None => InputEvent::BackgroundClick,
        }
    }

    /// Loads for the configured sources, issued once at startup.
    pub fn initial_loads(&self) -> Vec<LoadTicket> {
        self.gallery.tickets()
    }

    pub fn replace_photo(
        &mut self,
        index: usize,
        source: ImageSource,
    ) -> Result<LoadTicket, SceneError> {
        self.gallery
            .replace_source(index, source)
            .ok_or(SceneError::PanelOutOfRange {
                index,
                count: PHOTO_COUNT,
            })
    }

    /// Apply a finished load; `false` when the ticket is stale.
    pub fn resolve_photo(&mut self, ticket: &LoadTicket, loaded: bool) -> bool {
        self.gallery.resolve(ticket, loaded)
    }
}
