//! Screen shake
//!
//! A decaying random camera offset. Purely a render-time perturbation: it
//! never touches any entity's logical position.

use rand::Rng;

use crate::renderer::Canvas;

/// Intensity below which the shake is considered finished
const SHAKE_EPSILON: f32 = 0.1;

/// Preset shake strengths (intensity in px, duration in ms)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShakePreset {
    pub intensity: f32,
    pub duration_ms: f32,
}

pub const SHAKE_COLLISION: ShakePreset = ShakePreset { intensity: 15.0, duration_ms: 300.0 };
pub const SHAKE_LANDING: ShakePreset = ShakePreset { intensity: 3.0, duration_ms: 100.0 };
pub const SHAKE_NEAR_MISS: ShakePreset = ShakePreset { intensity: 2.0, duration_ms: 80.0 };
pub const SHAKE_EXPLOSION: ShakePreset = ShakePreset { intensity: 20.0, duration_ms: 400.0 };

#[derive(Debug, Clone, Default)]
pub struct ScreenShake {
    intensity: f32,
    duration: f32,
    elapsed: f32,
    offset_x: f32,
    offset_y: f32,
}

impl ScreenShake {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start or extend a shake. A weaker request never weakens or shortens
    /// a stronger shake already in progress.
    pub fn shake(&mut self, intensity: f32, duration_ms: f32) {
        let remaining = (self.duration - self.elapsed).max(0.0);
        self.intensity = self.intensity.max(intensity);
        self.duration = remaining.max(duration_ms);
        self.elapsed = 0.0;
    }

    pub fn shake_preset(&mut self, preset: ShakePreset) {
        self.shake(preset.intensity, preset.duration_ms);
    }

    /// Advance by `dt_ms`, sampling a fresh offset scaled by the decayed intensity
    pub fn update<R: Rng>(&mut self, dt_ms: f32, rng: &mut R) {
        if self.duration <= 0.0 || self.intensity < SHAKE_EPSILON {
            self.reset();
            return;
        }

        self.elapsed += dt_ms;
        let progress = (self.elapsed / self.duration).min(1.0);
        let current = self.intensity * (1.0 - progress);

        if self.elapsed >= self.duration || current < SHAKE_EPSILON {
            self.reset();
            return;
        }

        self.offset_x = (rng.random::<f32>() - 0.5) * 2.0 * current;
        self.offset_y = (rng.random::<f32>() - 0.5) * 2.0 * current;
    }

    /// Translate the canvas by the current offset
    pub fn apply<C: Canvas>(&self, ctx: &mut C) {
        if self.offset_x != 0.0 || self.offset_y != 0.0 {
            ctx.translate(self.offset_x, self.offset_y);
        }
    }

    pub fn offset(&self) -> (f32, f32) {
        (self.offset_x, self.offset_y)
    }

    pub fn is_active(&self) -> bool {
        self.duration > 0.0 && self.intensity >= SHAKE_EPSILON
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_offsets_bounded_by_intensity() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut shake = ScreenShake::new();
        shake.shake(10.0, 1000.0);
        for _ in 0..30 {
            shake.update(16.0, &mut rng);
            let (x, y) = shake.offset();
            assert!(x.abs() <= 10.0 && y.abs() <= 10.0);
        }
    }

    #[test]
    fn test_weaker_shake_does_not_shorten_stronger() {
        let mut shake = ScreenShake::new();
        shake.shake(15.0, 300.0);
        shake.elapsed = 100.0;
        shake.shake(2.0, 80.0);
        assert_eq!(shake.intensity, 15.0);
        assert_eq!(shake.duration, 200.0);
        assert_eq!(shake.elapsed, 0.0);
    }

    #[test]
    fn test_stronger_shake_takes_over() {
        let mut shake = ScreenShake::new();
        shake.shake(3.0, 100.0);
        shake.shake(20.0, 400.0);
        assert_eq!(shake.intensity, 20.0);
        assert_eq!(shake.duration, 400.0);
    }

    proptest! {
        #[test]
        fn prop_shake_decays_to_zero(
            intensity in 0.0f32..50.0,
            duration in 1.0f32..1000.0,
            dt in 1.0f32..50.0,
            seed in any::<u64>(),
        ) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut shake = ScreenShake::new();
            shake.shake(intensity, duration);
            let steps = (duration / dt).ceil() as usize;
            for _ in 0..steps {
                shake.update(dt, &mut rng);
            }
            prop_assert_eq!(shake.offset(), (0.0, 0.0));
            prop_assert!(!shake.is_active());
        }
    }
}
