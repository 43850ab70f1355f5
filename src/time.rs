//! Frame clock.
//!
//! Tracks elapsed time since the visualization started and a periodically
//! refreshed frames-per-second estimate shown in the window title.

use std::time::{Duration, Instant};

/// Time tracking for the frame loop.
#[derive(Debug)]
pub struct Clock {
    start: Instant,
    frame_count: u64,
    fps: f32,
    fps_frame_count: u64,
    fps_update_time: Instant,
    fps_update_interval: Duration,
}

impl Clock {
    /// Create a clock starting from now.
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start: now,
            frame_count: 0,
            fps: 0.0,
            fps_frame_count: 0,
            fps_update_time: now,
            fps_update_interval: Duration::from_millis(500),
        }
    }

    /// Advance to the current instant. Call once per frame.
    ///
    /// Returns the seconds elapsed since the clock started.
    pub fn tick(&mut self) -> f32 {
        self.tick_at(Instant::now())
    }

    fn tick_at(&mut self, now: Instant) -> f32 {
        self.frame_count += 1;

        let fps_elapsed = now.saturating_duration_since(self.fps_update_time);
        if fps_elapsed >= self.fps_update_interval {
            let frames_since = self.frame_count - self.fps_frame_count;
            self.fps = frames_since as f32 / fps_elapsed.as_secs_f32();
            self.fps_frame_count = self.frame_count;
            self.fps_update_time = now;
        }

        now.saturating_duration_since(self.start).as_secs_f32()
    }

    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_new() {
        let clock = Clock::new();
        assert_eq!(clock.frame(), 0);
        assert_eq!(clock.fps(), 0.0);
    }

    #[test]
    fn test_clock_tick() {
        let mut clock = Clock::new();
        let later = clock.start + Duration::from_millis(250);
        let elapsed = clock.tick_at(later);
        assert!((elapsed - 0.25).abs() < 1e-4);
        assert_eq!(clock.frame(), 1);

        let elapsed = clock.tick_at(later + Duration::from_millis(100));
        assert!((elapsed - 0.35).abs() < 1e-4);
        assert_eq!(clock.frame(), 2);
    }

    #[test]
    fn test_clock_never_runs_backwards() {
        let mut clock = Clock::new();
        let start = clock.start;
        assert_eq!(clock.tick_at(start), 0.0);
        assert_eq!(clock.tick_at(start), 0.0);
    }

    #[test]
    fn test_fps_estimate() {
        let mut clock = Clock::new();
        let start = clock.start;
        for i in 1..=30 {
            clock.tick_at(start + Duration::from_millis(20 * i));
        }
        // 30 frames over 600ms, first refresh after 500ms (25 frames).
        assert!((clock.fps() - 50.0).abs() < 1.0);
    }
}
