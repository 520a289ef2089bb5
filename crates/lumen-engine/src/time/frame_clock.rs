use std::time::{Duration, Instant};

/// Shortest step handed to `update`; keeps tight loops from producing zero.
pub const MIN_DELTA: Duration = Duration::from_micros(100);
/// Longest step handed to `update`; a debugger pause or a minimized window
/// must not teleport the camera.
pub const MAX_DELTA: Duration = Duration::from_millis(250);

/// One tick of the game loop.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Seconds since the previous tick, clamped.
    pub dt: f32,

    /// Seconds since the clock was created or reset, unclamped.
    pub total: f32,

    /// Monotonic frame counter.
    pub frame_index: u64,
}

/// Produces clamped delta times between loop ticks.
#[derive(Debug, Clone)]
pub struct FrameClock {
    start: Instant,
    last: Instant,
    frame_index: u64,
    dt_min: Duration,
    dt_max: Duration,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::with_clamps(MIN_DELTA, MAX_DELTA)
    }

    /// Creates a clock with custom delta-time clamps.
    pub fn with_clamps(dt_min: Duration, dt_max: Duration) -> Self {
        debug_assert!(dt_min <= dt_max);
        let now = Instant::now();
        Self {
            start: now,
            last: now,
            frame_index: 0,
            dt_min,
            dt_max,
        }
    }

    /// Restarts timing, e.g. after the renderer finished initializing.
    pub fn reset(&mut self) {
        let now = Instant::now();
        self.start = now;
        self.last = now;
        self.frame_index = 0;
    }

    /// Advances the clock to now.
    pub fn tick(&mut self) -> FrameTime {
        self.tick_at(Instant::now())
    }

    fn tick_at(&mut self, now: Instant) -> FrameTime {
        let dt = now
            .saturating_duration_since(self.last)
            .clamp(self.dt_min, self.dt_max);
        self.last = now;

        let ft = FrameTime {
            dt: dt.as_secs_f32(),
            total: now.saturating_duration_since(self.start).as_secs_f32(),
            frame_index: self.frame_index,
        };

        self.frame_index = self.frame_index.wrapping_add(1);
        ft
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
