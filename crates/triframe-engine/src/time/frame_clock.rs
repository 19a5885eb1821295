use std::time::{Duration, Instant};

/// Frame timing snapshot.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Seconds since the previous tick; `0.0` on the first tick.
    pub dt: f32,

    /// Monotonic timestamp taken at the tick.
    pub now: Instant,

    pub frame_index: u64,
}

/// Produces one [`FrameTime`] per presented frame.
///
/// The first tick has no predecessor and reports `dt = 0`. Later deltas are
/// clamped to `dt_max` so a stall (debugger, minimized window) does not turn
/// into one huge simulation step.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Option<Instant>,
    frame_index: u64,
    dt_max: Duration,
}

impl FrameClock {
    pub const DEFAULT_DT_MAX: Duration = Duration::from_millis(250);

    pub fn new() -> Self {
        Self::with_max_dt(Self::DEFAULT_DT_MAX)
    }

    pub fn with_max_dt(dt_max: Duration) -> Self {
        Self {
            last: None,
            frame_index: 0,
            dt_max,
        }
    }

    /// Forgets the previous tick; the next one reports `dt = 0` again.
    ///
    /// Use after resuming from suspension.
    pub fn reset(&mut self) {
        self.last = None;
    }

    pub fn tick(&mut self) -> FrameTime {
        self.tick_at(Instant::now())
    }

    /// Advances the clock as if the frame happened at `now`.
    pub fn tick_at(&mut self, now: Instant) -> FrameTime {
        let dt = match self.last {
            Some(last) => now.saturating_duration_since(last).min(self.dt_max),
            None => Duration::ZERO,
        };
        self.last = Some(now);

        let ft = FrameTime {
            dt: dt.as_secs_f32(),
            now,
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
