//! Delta-time clock
//!
//! Normalizes frame timing to a 60 Hz multiplier and caps spikes.

use crate::consts::{BASE_FRAME_MS, MAX_FRAME_MS};

/// Window the FPS estimate is averaged over (ms)
const FPS_WINDOW_MS: f32 = 500.0;

/// Frame clock fed by the host's animation-frame timestamps
#[derive(Debug, Clone)]
pub struct DeltaClock {
    last_timestamp: Option<f64>,
    delta_ms: f32,
    fps: u32,
    fps_accumulator: f32,
    fps_frames: u32,
}

impl Default for DeltaClock {
    fn default() -> Self {
        Self::new()
    }
}

impl DeltaClock {
    pub fn new() -> Self {
        Self {
            last_timestamp: None,
            delta_ms: BASE_FRAME_MS,
            fps: 60,
            fps_accumulator: 0.0,
            fps_frames: 0,
        }
    }

    /// Advance to `timestamp_ms`, returning the capped delta in ms.
    ///
    /// The first tick after construction or [`reset`](Self::reset) only seeds
    /// the clock and returns the nominal 60 Hz frame time. Timestamps that go
    /// backwards yield a zero delta.
    pub fn tick(&mut self, timestamp_ms: f64) -> f32 {
        let Some(last) = self.last_timestamp else {
            self.last_timestamp = Some(timestamp_ms);
            self.delta_ms = BASE_FRAME_MS;
            return self.delta_ms;
        };

        let raw = (timestamp_ms - last).max(0.0) as f32;
        self.delta_ms = raw.min(MAX_FRAME_MS);
        self.last_timestamp = Some(timestamp_ms);

        self.fps_accumulator += self.delta_ms;
        self.fps_frames += 1;
        if self.fps_accumulator >= FPS_WINDOW_MS {
            self.fps = (self.fps_frames as f32 * 1000.0 / self.fps_accumulator).round() as u32;
            self.fps_accumulator = 0.0;
            self.fps_frames = 0;
        }

        self.delta_ms
    }

    /// Last delta in ms
    pub fn delta_ms(&self) -> f32 {
        self.delta_ms
    }

    /// Frame-rate independent scaling factor (1.0 at 60 Hz)
    pub fn multiplier(&self) -> f32 {
        self.delta_ms / BASE_FRAME_MS
    }

    /// Rolling FPS estimate
    pub fn fps(&self) -> u32 {
        self.fps
    }

    /// Forget the last timestamp so the next tick reseeds
    pub fn reset(&mut self) {
        self.last_timestamp = None;
        self.delta_ms = BASE_FRAME_MS;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_first_tick_seeds_with_default() {
        let mut clock = DeltaClock::new();
        assert_eq!(clock.tick(12_345.0), BASE_FRAME_MS);
        assert_eq!(clock.tick(12_355.0), 10.0);
        assert!((clock.multiplier() - 10.0 / BASE_FRAME_MS).abs() < 1e-6);
    }

    #[test]
    fn test_reset_reseeds() {
        let mut clock = DeltaClock::new();
        clock.tick(0.0);
        clock.tick(16.0);
        clock.reset();
        assert_eq!(clock.tick(10_000.0), BASE_FRAME_MS);
    }

    #[test]
    fn test_backwards_timestamp_is_zero_delta() {
        let mut clock = DeltaClock::new();
        clock.tick(100.0);
        assert_eq!(clock.tick(90.0), 0.0);
    }

    #[test]
    fn test_fps_estimate_at_steady_rate() {
        let mut clock = DeltaClock::new();
        let mut t = 0.0;
        clock.tick(t);
        for _ in 0..120 {
            t += 20.0;
            clock.tick(t);
        }
        assert_eq!(clock.fps(), 50);
    }

    proptest! {
        #[test]
        fn prop_delta_is_capped(start in 0.0f64..1.0e6, jump in 50.001f64..1.0e6) {
            let mut clock = DeltaClock::new();
            clock.tick(start);
            prop_assert_eq!(clock.tick(start + jump), MAX_FRAME_MS);
        }

        #[test]
        fn prop_small_delta_passes_through(start in 0.0f64..1.0e5, step in 0.0f64..50.0) {
            let mut clock = DeltaClock::new();
            clock.tick(start);
            let delta = clock.tick(start + step);
            prop_assert!((delta as f64 - step).abs() < 1e-2);
        }
    }
}
