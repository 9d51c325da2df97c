//! Application mode state machine and the scene-wide state value.
//!
//! Focus only exists inside [`AppMode::PhotoFocus`], so a focused panel in any
//! other mode cannot be constructed.

use crate::constants::{PHOTO_COUNT, ZOOM_MAX, ZOOM_MIN};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AppMode {
    #[default]
    Assembled,
    Scattered,
    PhotoFocus {
        panel: usize,
    },
}

/// Discrete pointer events delivered by the front-end.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputEvent {
    BackgroundClick,
    BackgroundDoubleClick,
    PanelClick(usize),
}

impl AppMode {
    #[inline]
    pub fn is_assembled(self) -> bool {
        matches!(self, AppMode::Assembled)
    }

    /// Particles head for their scatter positions in every mode but `Assembled`.
    #[inline]
    pub fn is_scattering(self) -> bool {
        !self.is_assembled()
    }

    #[inline]
    pub fn focused_panel(self) -> Option<usize> {
        match self {
            AppMode::PhotoFocus { panel } => Some(panel),
            _ => None,
        }
    }

    /// Transition for one input event.
    pub fn next(self, event: InputEvent) -> AppMode {
        match (self, event) {
            // Disperses the tree or leaves focus; a no-op once scattered.
            (_, InputEvent::BackgroundClick) => AppMode::Scattered,
            (_, InputEvent::BackgroundDoubleClick) => AppMode::Assembled,
            (AppMode::PhotoFocus { panel }, InputEvent::PanelClick(i)) if panel == i => {
                AppMode::Scattered
            }
            (_, InputEvent::PanelClick(i)) => AppMode::PhotoFocus { panel: i },
        }
    }

    /// Footer text shown by the overlay.
    pub fn status_label(self) -> &'static str {
        match self {
            AppMode::Assembled => "Tree Assembled",
            AppMode::Scattered => "Stars Scattered",
            AppMode::PhotoFocus { .. } => "Viewing Memory",
        }
    }
}

/// Camera zoom factor, always within \[`ZOOM_MIN`, `ZOOM_MAX`\].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Zoom(f32);

impl Zoom {
    /// Clamp silently, so infinities land on the nearest bound; NaN falls back to 1.0.
    pub fn new(value: f32) -> Self {
        if value.is_nan() {
            return Self::default();
        }
        Self(value.clamp(ZOOM_MIN, ZOOM_MAX))
    }

    #[inline]
    pub fn get(self) -> f32 {
        self.0
    }
}

impl Default for Zoom {
    fn default() -> Self {
        Self(1.0)
    }
}

/// Everything the per-frame updaters read and the input handlers write.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SceneState {
    pub mode: AppMode,
    pub zoom: Zoom,
}

impl SceneState {
    pub fn new(mode: AppMode, zoom: f32) -> Self {
        Self {
            mode,
            zoom: Zoom::new(zoom),
        }
    }

    /// Apply an input event. Returns `true` when the mode changed.
    pub fn apply(&mut self, event: InputEvent) -> bool {
        if let InputEvent::PanelClick(i) = event {
            if i >= PHOTO_COUNT {
                log::warn!("[mode] ignoring click on unknown panel {i}");
                return false;
            }
        }
        let next = self.mode.next(event);
        if next == self.mode {
            return false;
        }
        log::debug!("[mode] {:?} --{:?}--> {:?}", self.mode, event, next);
        self.mode = next;
        true
    }

    pub fn set_zoom(&mut self, value: f32) {
        self.zoom = Zoom::new(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_assembled_without_focus() {
        let s = SceneState::default();
        assert_eq!(s.mode, AppMode::Assembled);
        assert_eq!(s.mode.focused_panel(), None);
        assert_eq!(s.zoom.get(), 1.0);
    }

    #[test]
    fn zoom_clamps_and_rejects_nan() {
        assert_eq!(Zoom::new(0.1).get(), 0.5);
        assert_eq!(Zoom::new(5.0).get(), 2.0);
        assert_eq!(Zoom::new(1.25).get(), 1.25);
        assert_eq!(Zoom::new(f32::NAN).get(), 1.0);
        assert_eq!(Zoom::new(f32::INFINITY).get(), ZOOM_MAX);
        assert_eq!(Zoom::new(f32::NEG_INFINITY).get(), ZOOM_MIN);
    }

    #[test]
    fn out_of_range_panel_is_ignored() {
        let mut s = SceneState::default();
        assert!(!s.apply(InputEvent::PanelClick(PHOTO_COUNT)));
        assert_eq!(s.mode, AppMode::Assembled);
    }
}
