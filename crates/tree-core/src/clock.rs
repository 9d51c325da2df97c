use instant::Instant;

/// Seconds since the scene started, plus per-frame delta.
#[derive(Clone, Debug)]
pub struct FrameClock {
    start: Instant,
    last: Instant,
    frames: u64,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start: now,
            last: now,
            frames: 0,
        }
    }

    /// Advance one frame. Returns `(elapsed, dt)` in seconds.
    pub fn tick(&mut self) -> (f32, f32) {
        let now = Instant::now();
        let dt = (now - self.last).as_secs_f32();
        self.last = now;
        self.frames += 1;
        ((now - self.start).as_secs_f32(), dt)
    }

    #[inline]
    pub fn frames(&self) -> u64 {
        self.frames
    }
}
