use std::time::{Duration, Instant};

use crate::profiling::profile_function;

/// Produces the per-frame delta handed to tick-driven systems such as the
/// resource loader.
///
/// Deltas are clamped to `max_delta` so a long hitch (window drag, debugger
/// pause) does not burn through several idle gaps in one frame.
///
/// # Example
/// ```ignore
/// let mut clock = FrameClock::new();
/// loop {
///     let dt = clock.update();
///     if handle.tick(dt, &ctx).is_terminal() {
///         break;
///     }
/// }
/// ```
#[derive(Debug, Clone)]
pub struct FrameClock {
    /// Total (clamped) time accumulated since creation
    elapsed: Duration,
    /// Time elapsed during the last frame
    delta: Duration,
    /// Number of frames observed
    frame_count: u64,
    /// Maximum delta reported for a single frame (default: 0.1s)
    max_delta: Duration,
    /// Wall-clock time of the last update
    last_frame_time: Instant,
}

impl FrameClock {
    /// Creates a clock with a 100ms delta cap.
    pub fn new() -> Self {
        Self {
            elapsed: Duration::ZERO,
            delta: Duration::ZERO,
            frame_count: 0,
            max_delta: Duration::from_millis(100),
            last_frame_time: Instant::now(),
        }
    }

    /// Samples the wall clock and starts a new frame, returning its delta.
    pub fn update(&mut self) -> Duration {
        profile_function!();
        let now = Instant::now();
        let raw_delta = now.duration_since(self.last_frame_time);
        self.last_frame_time = now;
        self.advance(raw_delta)
    }

    /// Starts a new frame with an explicit raw delta instead of the wall clock.
    ///
    /// Used for deterministic stepping in tests and replays.
    pub fn advance(&mut self, raw_delta: Duration) -> Duration {
        self.delta = raw_delta.min(self.max_delta);
        self.elapsed += self.delta;
        self.frame_count += 1;
        self.delta
    }

    /// Returns the delta of the current frame
    #[inline]
    pub fn delta(&self) -> Duration {
        self.delta
    }

    /// Returns the delta of the current frame in seconds
    #[inline]
    pub fn delta_seconds(&self) -> f32 {
        self.delta.as_secs_f32()
    }

    /// Returns the total clamped time since creation
    #[inline]
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Returns the number of frames observed
    #[inline]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Returns the maximum delta cap
    #[inline]
    pub fn max_delta(&self) -> Duration {
        self.max_delta
    }

    /// Sets the maximum delta cap
    pub fn set_max_delta(&mut self, max_delta: Duration) {
        self.max_delta = max_delta;
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_clock_creation() {
        let clock = FrameClock::new();
        assert_eq!(clock.frame_count(), 0);
        assert_eq!(clock.elapsed(), Duration::ZERO);
        assert_eq!(clock.delta(), Duration::ZERO);
        assert_eq!(clock.max_delta(), Duration::from_millis(100));
    }

    #[test]
    fn test_clock_update() {
        let mut clock = FrameClock::new();

        thread::sleep(Duration::from_millis(10));
        let dt = clock.update();

        assert_eq!(clock.frame_count(), 1);
        assert!(dt > Duration::ZERO);
        assert_eq!(dt, clock.delta());
        assert!(clock.delta_seconds() > 0.0);
    }

    #[test]
    fn test_advance_is_deterministic() {
        let mut clock = FrameClock::new();

        assert_eq!(clock.advance(Duration::from_millis(16)), Duration::from_millis(16));
        assert_eq!(clock.advance(Duration::from_millis(20)), Duration::from_millis(20));

        assert_eq!(clock.frame_count(), 2);
        assert_eq!(clock.elapsed(), Duration::from_millis(36));
    }

    #[test]
    fn test_max_delta() {
        let mut clock = FrameClock::new();
        clock.set_max_delta(Duration::from_millis(50));

        let dt = clock.advance(Duration::from_millis(250));

        assert_eq!(dt, Duration::from_millis(50));
        assert_eq!(clock.elapsed(), Duration::from_millis(50));
    }
}
