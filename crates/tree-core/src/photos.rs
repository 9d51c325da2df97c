//! Photo panels: placement on the tree, per-mode target poses, and image
//! source bookkeeping for asynchronous loads.

use glam::{EulerRot, Mat4, Quat, Vec3};
use rand::Rng;
use std::f32::consts::{FRAC_PI_2, TAU};
use std::fmt;
use std::path::PathBuf;

use crate::constants::*;
use crate::instance::Instance;
use crate::layout;
use crate::mode::AppMode;
use crate::palette;

/// Where a panel's image comes from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ImageSource {
    Path(PathBuf),
    Url(String),
    /// Inline `data:` URL carrying the encoded image bytes.
    Data(String),
}

impl ImageSource {
    /// `http(s)://` strings are URLs, `data:` strings are inline images,
    /// anything else is a local path.
    pub fn parse(s: &str) -> Self {
        let lower = s.get(..8).unwrap_or(s).to_ascii_lowercase();
        if lower.starts_with("data:") {
            ImageSource::Data(s.to_string())
        } else if lower.starts_with("http://") || lower.starts_with("https://") {
            ImageSource::Url(s.to_string())
        } else {
            ImageSource::Path(PathBuf::from(s))
        }
    }
}

impl fmt::Display for ImageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageSource::Path(p) => write!(f, "{}", p.display()),
            ImageSource::Url(u) => f.write_str(u),
            // data: URLs can be megabytes long
            ImageSource::Data(d) if d.chars().count() > 64 => {
                let head: String = d.chars().take(64).collect();
                write!(f, "{head}...")
            }
            ImageSource::Data(d) => f.write_str(d),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImageStatus {
    Loading,
    Ready,
    Failed,
}

/// A pending image load for one panel.
///
/// Only the ticket for the panel's latest source can change its image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadTicket {
    pub panel: usize,
    pub generation: u64,
    pub source: ImageSource,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PhotoPose {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: f32,
}

impl Default for PhotoPose {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: 1.0,
        }
    }
}

impl PhotoPose {
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(Vec3::splat(self.scale), self.rotation, self.position)
    }

    /// Transform of the unit photo quad, sized and pushed slightly forward.
    pub fn face_matrix(&self) -> Mat4 {
        self.model_matrix()
            * Mat4::from_translation(Vec3::new(0.0, 0.0, PHOTO_FACE_DEPTH))
            * Mat4::from_scale(Vec3::new(PHOTO_SIZE, PHOTO_SIZE, 1.0))
    }

    /// The gold frame as a unit-cube instance; `focused` frames glow brighter.
    pub fn frame_instance(&self, focused: bool) -> Instance {
        Instance {
            position: self.position + self.rotation * Vec3::new(0.0, 0.0, PHOTO_FRAME_DEPTH * self.scale),
            rotation: self.rotation,
            scale: PHOTO_FRAME_SIZE * self.scale,
            color: palette::srgb_hex(palette::PHOTO_FRAME),
            glow: if focused {
                PHOTO_FRAME_FOCUS_GLOW
            } else {
                PHOTO_FRAME_GLOW
            },
        }
    }
}

/// Height of panel `index` on the tree; decreases with the index.
#[inline]
pub fn panel_height(index: usize) -> f32 {
    PHOTO_BAND_CENTER + PHOTO_BAND_HEIGHT / 2.0 - (index as f32 / 2.0) * PHOTO_BAND_HEIGHT
}

/// Pose of panel `index` nestled on the cone surface, facing outward and
/// tilted back to follow the slope.
pub fn tree_pose(index: usize) -> (Vec3, Quat) {
    let y = panel_height(index);
    let radius =
        (layout::cone_radius_at(y, TREE_HEIGHT, TREE_BASE_RADIUS) - PHOTO_INSET).max(MIN_SURFACE_RADIUS);
    let angle = (index as f32 / PHOTO_COUNT as f32) * TAU + PHOTO_ANGLE_OFFSET;
    let position = Vec3::new(angle.cos() * radius, y, angle.sin() * radius);

    let tilt = (TREE_BASE_RADIUS / TREE_HEIGHT).atan();
    let rotation = Quat::from_euler(EulerRot::YXZ, FRAC_PI_2 - angle, -tilt, 0.0);
    (position, rotation)
}

#[derive(Clone, Debug)]
pub struct PhotoPanel {
    index: usize,
    source: ImageSource,
    generation: u64,
    status: ImageStatus,
    tree_position: Vec3,
    tree_rotation: Quat,
    scatter_position: Vec3,
    current: PhotoPose,
}

impl PhotoPanel {
    pub fn new<R: Rng + ?Sized>(index: usize, source: ImageSource, rng: &mut R) -> Self {
        let (tree_position, tree_rotation) = tree_pose(index);
        let scatter_position =
            layout::cloud_scatter_position(PHOTO_SCATTER_EXTENT, rng) + PHOTO_SCATTER_OFFSET;
        Self {
            index,
            source,
            generation: 0,
            status: ImageStatus::Loading,
            tree_position,
            tree_rotation,
            scatter_position,
            current: PhotoPose::default(),
        }
    }

    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    #[inline]
    pub fn source(&self) -> &ImageSource {
        &self.source
    }

    #[inline]
    pub fn status(&self) -> ImageStatus {
        self.status
    }

    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[inline]
    pub fn shows_placeholder(&self) -> bool {
        self.status != ImageStatus::Ready
    }

    #[inline]
    pub fn tree_position(&self) -> Vec3 {
        self.tree_position
    }

    #[inline]
    pub fn tree_rotation(&self) -> Quat {
        self.tree_rotation
    }

    #[inline]
    pub fn scatter_position(&self) -> Vec3 {
        self.scatter_position
    }

    /// Rendered pose after the latest [`PhotoPanel::step`].
    #[inline]
    pub fn pose(&self) -> PhotoPose {
        self.current
    }

    pub fn is_focused(&self, mode: AppMode) -> bool {
        mode.focused_panel() == Some(self.index)
    }

    /// Pose this panel is heading for at time `t`.
    ///
    /// Unfocused panels during photo focus take the scattered branch.
    pub fn target_pose(&self, t: f32, mode: AppMode) -> PhotoPose {
        if self.is_focused(mode) {
            PhotoPose {
                position: PHOTO_FOCUS_POSITION,
                rotation: Quat::IDENTITY,
                scale: PHOTO_FOCUS_SCALE,
            }
        } else if mode.is_assembled() {
            PhotoPose {
                position: self.tree_position,
                rotation: self.tree_rotation,
                scale: PHOTO_TREE_SCALE,
            }
        } else {
            let bob = (t + self.index as f32).sin() * PHOTO_BOB_AMPLITUDE;
            PhotoPose {
                position: self.scatter_position + Vec3::new(0.0, bob, 0.0),
                rotation: Quat::from_euler(EulerRot::XYZ, (t * 0.5).sin(), (t * 0.3).cos(), 0.0),
                scale: PHOTO_SCATTER_SCALE,
            }
        }
    }

    /// Ease position, orientation and scale toward the target pose.
    pub fn step(&mut self, t: f32, mode: AppMode) {
        let target = self.target_pose(t, mode);
        self.current = PhotoPose {
            position: self.current.position.lerp(target.position, PHOTO_LERP),
            rotation: self.current.rotation.slerp(target.rotation, PHOTO_LERP),
            scale: self.current.scale + (target.scale - self.current.scale) * PHOTO_LERP,
        };
    }

    fn ticket(&self) -> LoadTicket {
        LoadTicket {
            panel: self.index,
            generation: self.generation,
            source: self.source.clone(),
        }
    }

    fn begin_load(&mut self, source: ImageSource) -> LoadTicket {
        self.source = source;
        self.generation += 1;
        self.status = ImageStatus::Loading;
        self.ticket()
    }

    fn resolve(&mut self, ticket: &LoadTicket, loaded: bool) -> bool {
        if ticket.panel != self.index || ticket.generation != self.generation {
            return false;
        }
        self.status = if loaded {
            ImageStatus::Ready
        } else {
            ImageStatus::Failed
        };
        true
    }
}

/// The fixed set of photo panels.
#[derive(Clone, Debug)]
pub struct PhotoGallery {
    panels: [PhotoPanel; PHOTO_COUNT],
}

impl PhotoGallery {
    pub fn new<R: Rng + ?Sized>(sources: [ImageSource; PHOTO_COUNT], rng: &mut R) -> Self {
        let mut sources = sources.into_iter();
        let panels = std::array::from_fn(|i| {
            let source = sources
                .next()
                .unwrap_or_else(|| ImageSource::Url(String::new()));
            PhotoPanel::new(i, source, rng)
        });
        Self { panels }
    }

    #[inline]
    pub fn panels(&self) -> &[PhotoPanel] {
        &self.panels
    }

    #[inline]
    pub fn panel(&self, index: usize) -> Option<&PhotoPanel> {
        self.panels.get(index)
    }

    /// Tickets for every panel's current source, for the initial loads.
    pub fn tickets(&self) -> Vec<LoadTicket> {
        self.panels.iter().map(PhotoPanel::ticket).collect()
    }

    pub fn step(&mut self, t: f32, mode: AppMode) {
        for panel in &mut self.panels {
            panel.step(t, mode);
        }
    }

    /// Swap in a new source; the panel shows its placeholder until resolved.
    ///
    /// Returns `None` when `index` is out of range.
    pub fn replace_source(&mut self, index: usize, source: ImageSource) -> Option<LoadTicket> {
        let panel = self.panels.get_mut(index)?;
        let ticket = panel.begin_load(source);
        log::info!(
            "[photos] panel {} now loading {} (generation {})",
            index,
            ticket.source,
            ticket.generation
        );
        Some(ticket)
    }

    /// Apply a finished load. Stale tickets are discarded and return `false`.
    pub fn resolve(&mut self, ticket: &LoadTicket, loaded: bool) -> bool {
        let Some(panel) = self.panels.get_mut(ticket.panel) else {
            return false;
        };
        let applied = panel.resolve(ticket, loaded);
        if !applied {
            log::debug!(
                "[photos] discarding stale load for panel {} (generation {} != {})",
                ticket.panel,
                ticket.generation,
                panel.generation
            );
        } else if !loaded {
            log::warn!(
                "[photos] panel {} failed to load {}, keeping placeholder",
                ticket.panel,
                ticket.source
            );
        }
        applied
    }
}
