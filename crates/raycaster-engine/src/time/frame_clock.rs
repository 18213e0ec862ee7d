use std::time::{Duration, Instant};

/// Frame clock measuring the time between presented frames.
///
/// Delta time is clamped so a stalled or minimized window does not report a
/// huge step on the next frame.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Instant,
    last_dt: f32,
    dt_min: Duration,
    dt_max: Duration,
}

impl FrameClock {
    /// Creates a new clock with default clamps (0.1 ms .. 250 ms).
    pub fn new() -> Self {
        Self::with_clamps(Duration::from_micros(100), Duration::from_millis(250))
    }

    /// Creates a clock with custom delta-time clamps.
    pub fn with_clamps(dt_min: Duration, dt_max: Duration) -> Self {
        debug_assert!(dt_min <= dt_max);
        Self {
            last: Instant::now(),
            last_dt: 0.0,
            dt_min,
            dt_max,
        }
    }

    /// Delta of the most recent tick, in seconds. Zero before the first tick.
    pub fn last_dt(&self) -> f32 {
        self.last_dt
    }

    /// Advances the clock and returns the clamped delta in seconds.
    pub fn tick(&mut self) -> f32 {
        self.tick_at(Instant::now())
    }

    fn tick_at(&mut self, now: Instant) -> f32 {
        let dt = now
            .saturating_duration_since(self.last)
            .clamp(self.dt_min, self.dt_max);

        self.last = now;
        self.last_dt = dt.as_secs_f32();
        self.last_dt
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

/// Sleeps the calling thread so frames are not presented faster than a
/// target rate.
///
/// Deadlines advance by a fixed period; when a frame overruns by more than
/// one period the schedule restarts from "now" instead of bursting.
#[derive(Debug, Clone)]
pub struct FramePacer {
    period: Duration,
    next: Option<Instant>,
}

impl FramePacer {
    /// Returns `None` for a zero target, meaning "unpaced".
    pub fn new(target_fps: u32) -> Option<Self> {
        if target_fps == 0 {
            return None;
        }
        Some(Self {
            period: Duration::from_secs_f64(1.0 / f64::from(target_fps)),
            next: None,
        })
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Blocks until the next deadline.
    pub fn wait(&mut self) {
        let now = Instant::now();
        let remaining = self.advance(now);
        if !remaining.is_zero() {
            std::thread::sleep(remaining);
        }
    }

    /// Computes how long to wait at `now` and moves the deadline forward.
    fn advance(&mut self, now: Instant) -> Duration {
        let deadline = match self.next {
            Some(d) if d + self.period >= now => d,
            _ => now,
        };
        self.next = Some(deadline + self.period);
        deadline.saturating_duration_since(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_clamps_to_maximum() {
        let mut clock = FrameClock::with_clamps(Duration::from_millis(1), Duration::from_millis(50));
        let start = clock.last;
        let dt = clock.tick_at(start + Duration::from_secs(3));
        assert!((dt - 0.05).abs() < 1e-6);
        assert!((clock.last_dt() - 0.05).abs() < 1e-6);
    }

    #[test]
    fn tick_clamps_to_minimum() {
        let mut clock = FrameClock::with_clamps(Duration::from_millis(1), Duration::from_millis(50));
        let start = clock.last;
        let dt = clock.tick_at(start);
        assert!((dt - 0.001).abs() < 1e-6);
        assert!((clock.last_dt() - 0.001).abs() < 1e-6);
    }

    #[test]
    fn zero_fps_is_unpaced() {
        assert!(FramePacer::new(0).is_none());
    }

    #[test]
    fn pacer_waits_for_remaining_period() {
        let mut pacer = FramePacer::new(10).unwrap();
        let t0 = Instant::now();

        // First frame starts the schedule.
        assert_eq!(pacer.advance(t0), Duration::ZERO);

        let wait = pacer.advance(t0 + Duration::from_millis(30));
        assert_eq!(wait, Duration::from_millis(70));
    }

    #[test]
    fn pacer_resyncs_after_overrun() {
        let mut pacer = FramePacer::new(10).unwrap();
        let t0 = Instant::now();
        pacer.advance(t0);

        let late = t0 + Duration::from_secs(2);
        assert_eq!(pacer.advance(late), Duration::ZERO);
        assert_eq!(
            pacer.advance(late + Duration::from_millis(40)),
            Duration::from_millis(60)
        );
    }
}
