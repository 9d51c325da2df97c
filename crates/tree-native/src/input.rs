use glam::Vec2;
use smallvec::SmallVec;
use instant::Instant;
use std::time::Duration;

const DOUBLE_CLICK_WINDOW: Duration = Duration::from_millis(300);
const DOUBLE_CLICK_SLOP_PX: f32 = 6.0; // max distance between the two clicks
const DRAG_THRESHOLD_PX: f32 = 4.0; // movement before a press becomes a drag
pub const ORBIT_RADIANS_PER_PX: f32 = 0.005;

/// What the pointer did, in window pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerAction {
    Click(Vec2),
    DoubleClick(Vec2),
    /// Orbit by (yaw, pitch) radians.
    Orbit(Vec2),
}

/// Actions gathered between two frames.
pub type ActionQueue = SmallVec<[PointerAction; 8]>;

#[derive(Default, Clone, Copy)]
pub struct MouseState {
    pub x: f32,
    pub y: f32,
    pub down: bool,
}

#[derive(Default, Clone, Copy)]
pub struct DragState {
    pub active: bool,
    pub origin: Vec2,
    pub last: Vec2,
}

/// Turns raw button and cursor events into clicks, double clicks and drags.
#[derive(Default)]
pub struct PointerTracker {
    pub mouse: MouseState,
    drag: DragState,
    last_click: Option<(Instant, Vec2)>,
}

impl PointerTracker {
    #[inline]
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.mouse.x, self.mouse.y)
    }

    pub fn moved(&mut self, pos: Vec2, out: &mut ActionQueue) {
        self.mouse.x = pos.x;
        self.mouse.y = pos.y;
        if !self.mouse.down {
            return;
        }
        if !self.drag.active && pos.distance(self.drag.origin) > DRAG_THRESHOLD_PX {
            self.drag.active = true;
        }
        if self.drag.active {
            out.push(PointerAction::Orbit(orbit_delta(pos - self.drag.last)));
        }
        self.drag.last = pos;
    }

    pub fn pressed(&mut self) {
        self.mouse.down = true;
        let pos = self.position();
        self.drag = DragState {
            active: false,
            origin: pos,
            last: pos,
        };
    }

    pub fn released(&mut self, now: Instant, out: &mut ActionQueue) {
        if !self.mouse.down {
            return;
        }
        self.mouse.down = false;
        if self.drag.active {
            self.drag.active = false;
            self.last_click = None;
            return;
        }
        let pos = self.position();
        out.push(PointerAction::Click(pos));
        if is_double_click(self.last_click, now, pos) {
            out.push(PointerAction::DoubleClick(pos));
            self.last_click = None;
        } else {
            self.last_click = Some((now, pos));
        }
    }
}

/// Drag right spins the scene right; drag down tips the camera up.
#[inline]
pub fn orbit_delta(px: Vec2) -> Vec2 {
    Vec2::new(-px.x, px.y) * ORBIT_RADIANS_PER_PX
}

#[inline]
pub fn is_double_click(previous: Option<(Instant, Vec2)>, now: Instant, pos: Vec2) -> bool {
    match previous {
        Some((t, p)) => {
            now.saturating_duration_since(t) <= DOUBLE_CLICK_WINDOW
                && p.distance(pos) <= DOUBLE_CLICK_SLOP_PX
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn click(tracker: &mut PointerTracker, pos: Vec2, at: Instant, out: &mut ActionQueue) {
        tracker.moved(pos, out);
        tracker.pressed();
        tracker.released(at, out);
    }

    #[test]
    fn single_click_emits_one_click() {
        let mut t = PointerTracker::default();
        let mut q = ActionQueue::new();
        click(&mut t, Vec2::new(10.0, 10.0), Instant::now(), &mut q);
        assert_eq!(q.as_slice(), &[PointerAction::Click(Vec2::new(10.0, 10.0))]);
    }

    #[test]
    fn quick_second_click_is_a_double_click() {
        let mut t = PointerTracker::default();
        let mut q = ActionQueue::new();
        let t0 = Instant::now();
        click(&mut t, Vec2::new(50.0, 50.0), t0, &mut q);
        click(&mut t, Vec2::new(52.0, 51.0), t0 + Duration::from_millis(150), &mut q);
        assert_eq!(q.len(), 3);
        assert!(matches!(q[2], PointerAction::DoubleClick(_)));

        // a third click starts over
        q.clear();
        click(&mut t, Vec2::new(52.0, 51.0), t0 + Duration::from_millis(250), &mut q);
        assert_eq!(q.len(), 1);
    }

    #[test]
    fn slow_or_distant_second_click_is_single() {
        let t0 = Instant::now();
        let prev = Some((t0, Vec2::ZERO));
        assert!(!is_double_click(prev, t0 + Duration::from_millis(400), Vec2::ZERO));
        assert!(!is_double_click(prev, t0 + Duration::from_millis(100), Vec2::new(20.0, 0.0)));
        assert!(is_double_click(prev, t0 + Duration::from_millis(100), Vec2::new(3.0, 0.0)));
        assert!(!is_double_click(None, t0, Vec2::ZERO));
    }

    #[test]
    fn drag_orbits_instead_of_clicking() {
        let mut t = PointerTracker::default();
        let mut q = ActionQueue::new();
        t.moved(Vec2::new(100.0, 100.0), &mut q);
        t.pressed();
        t.moved(Vec2::new(102.0, 100.0), &mut q); // under threshold
        assert!(q.is_empty());
        t.moved(Vec2::new(140.0, 110.0), &mut q);
        t.released(Instant::now(), &mut q);
        assert_eq!(q.len(), 1);
        match q[0] {
            PointerAction::Orbit(d) => {
                assert!(d.x < 0.0 && d.y > 0.0);
                assert!((d.x + 38.0 * ORBIT_RADIANS_PER_PX).abs() < 1e-6);
            }
            other => panic!("expected orbit, got {other:?}"),
        }
    }
}
