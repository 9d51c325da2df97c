// Host-side tests for the mode state machine and zoom.

use tree_core::constants::{PHOTO_COUNT, ZOOM_MAX, ZOOM_MIN};
use tree_core::{AppMode, InputEvent, SceneState, Zoom};

fn all_modes() -> Vec<AppMode> {
    let mut modes = vec![AppMode::Assembled, AppMode::Scattered];
    modes.extend((0..PHOTO_COUNT).map(|panel| AppMode::PhotoFocus { panel }));
    modes
}

#[test]
fn background_click_always_scatters() {
    for mode in all_modes() {
        assert_eq!(mode.next(InputEvent::BackgroundClick), AppMode::Scattered);
    }
}

#[test]
fn background_double_click_always_assembles() {
    for mode in all_modes() {
        assert_eq!(mode.next(InputEvent::BackgroundDoubleClick), AppMode::Assembled);
    }
}

#[test]
fn panel_click_focuses_that_panel() {
    for mode in [AppMode::Assembled, AppMode::Scattered] {
        for i in 0..PHOTO_COUNT {
            assert_eq!(mode.next(InputEvent::PanelClick(i)), AppMode::PhotoFocus { panel: i });
        }
    }
}

#[test]
fn clicking_the_focused_panel_releases_focus() {
    for i in 0..PHOTO_COUNT {
        let mode = AppMode::PhotoFocus { panel: i };
        assert_eq!(mode.next(InputEvent::PanelClick(i)), AppMode::Scattered);
    }
}

#[test]
fn clicking_another_panel_moves_focus() {
    let mode = AppMode::PhotoFocus { panel: 0 };
    assert_eq!(mode.next(InputEvent::PanelClick(2)), AppMode::PhotoFocus { panel: 2 });
}

#[test]
fn focus_only_exists_in_photo_focus() {
    for mode in all_modes() {
        match mode {
            AppMode::PhotoFocus { panel } => assert_eq!(mode.focused_panel(), Some(panel)),
            _ => assert_eq!(mode.focused_panel(), None),
        }
        assert_eq!(mode.is_scattering(), !mode.is_assembled());
    }
}

#[test]
fn status_labels() {
    assert_eq!(AppMode::Assembled.status_label(), "Tree Assembled");
    assert_eq!(AppMode::Scattered.status_label(), "Stars Scattered");
    assert_eq!(AppMode::PhotoFocus { panel: 1 }.status_label(), "Viewing Memory");
}

#[test]
fn apply_reports_changes() {
    let mut s = SceneState::default();
    assert!(s.apply(InputEvent::BackgroundClick));
    assert!(!s.apply(InputEvent::BackgroundClick));
    assert!(s.apply(InputEvent::PanelClick(1)));
    assert_eq!(s.mode, AppMode::PhotoFocus { panel: 1 });
    assert!(!s.apply(InputEvent::PanelClick(7)));
    assert_eq!(s.mode, AppMode::PhotoFocus { panel: 1 });
    assert!(s.apply(InputEvent::BackgroundDoubleClick));
    assert_eq!(s.mode, AppMode::Assembled);
}

#[test]
fn zoom_is_always_in_range() {
    let mut s = SceneState::default();
    for k in -40..40 {
        s.set_zoom(k as f32 * 0.1);
        let z = s.zoom.get();
        assert!((ZOOM_MIN..=ZOOM_MAX).contains(&z));
    }
    s.set_zoom(f32::INFINITY);
    assert_eq!(s.zoom.get(), ZOOM_MAX);
    s.set_zoom(f32::NEG_INFINITY);
    assert_eq!(s.zoom.get(), ZOOM_MIN);
    assert_eq!(Zoom::new(f32::NAN), Zoom::default());
}
