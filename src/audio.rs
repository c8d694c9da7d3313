//! Sound cues
//!
//! The simulation only names cues; an [`AudioSink`] decides what they sound
//! like. In the browser that is a handful of procedural Web Audio
//! oscillators, no sample files needed.

use std::cell::RefCell;
use std::rc::Rc;

/// Named sound events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundCue {
    Jump,
    DoubleJump,
    Land,
    /// Every score milestone
    Score,
    Die,
    /// Enemy lobs a bomb
    EnemyThrow,
    /// Lightning strike
    Electric,
    Explosion,
    NearMiss,
}

impl SoundCue {
    pub fn as_str(&self) -> &'static str {
        match self {
            SoundCue::Jump => "jump",
            SoundCue::DoubleJump => "doubleJump",
            SoundCue::Land => "land",
            SoundCue::Score => "score",
            SoundCue::Die => "die",
            SoundCue::EnemyThrow => "goblin",
            SoundCue::Electric => "electric",
            SoundCue::Explosion => "explosion",
            SoundCue::NearMiss => "nearMiss",
        }
    }
}

/// Fire-and-forget cue player
pub trait AudioSink {
    fn play(&mut self, cue: SoundCue);
    fn set_muted(&mut self, muted: bool);
}

/// Plays nothing
#[derive(Debug, Default)]
pub struct SilentAudio;

impl AudioSink for SilentAudio {
    fn play(&mut self, _cue: SoundCue) {}
    fn set_muted(&mut self, _muted: bool) {}
}

/// Records every audible cue; clones share the same log
#[derive(Debug, Clone, Default)]
pub struct RecordingAudio {
    log: Rc<RefCell<Vec<SoundCue>>>,
    muted: bool,
}

impl RecordingAudio {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cues(&self) -> Vec<SoundCue> {
        self.log.borrow().clone()
    }

    pub fn count(&self, cue: SoundCue) -> usize {
        self.log.borrow().iter().filter(|&&c| c == cue).count()
    }

    pub fn clear(&self) {
        self.log.borrow_mut().clear();
    }
}

impl AudioSink for RecordingAudio {
    fn play(&mut self, cue: SoundCue) {
        if !self.muted {
            self.log.borrow_mut().push(cue);
        }
    }

    fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::WebAudio;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{AudioSink, SoundCue};

    /// Oscillator cues over the page's `AudioContext`
    pub struct WebAudio {
        ctx: Option<AudioContext>,
        volume: f32,
        muted: bool,
    }

    impl Default for WebAudio {
        fn default() -> Self {
            Self::new()
        }
    }

    impl WebAudio {
        pub fn new() -> Self {
            // Not available outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                volume: 1.0,
                muted: false,
            }
        }

        /// Resume after the first user gesture
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        pub fn set_volume(&mut self, volume: f32) {
            self.volume = volume.clamp(0.0, 1.0);
        }

        fn create_osc(ctx: &AudioContext, freq: f32, osc_type: OscillatorType) -> Option<(OscillatorNode, GainNode)> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;

            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            Some((osc, gain))
        }

        /// One oscillator: `steps` are `(offset, freq, ramp)` frequency
        /// moves, then the gain fades linearly from `level` over `length`
        fn tone(
            ctx: &AudioContext,
            osc_type: OscillatorType,
            steps: &[(f64, f32, bool)],
            level: f32,
            length: f64,
        ) {
            let Some((first, rest)) = steps.split_first() else {
                return;
            };
            let Some((osc, gain)) = Self::create_osc(ctx, first.1, osc_type) else {
                return;
            };
            let t = ctx.current_time();

            osc.frequency().set_value_at_time(first.1, t).ok();
            for &(offset, freq, ramp) in rest {
                if ramp {
                    osc.frequency().exponential_ramp_to_value_at_time(freq, t + offset).ok();
                } else {
                    osc.frequency().set_value_at_time(freq, t + offset).ok();
                }
            }
            gain.gain().set_value_at_time(level, t).ok();
            gain.gain().linear_ramp_to_value_at_time(0.0, t + length).ok();

            osc.start().ok();
            osc.stop_with_when(t + length).ok();
        }
    }

    impl AudioSink for WebAudio {
        fn play(&mut self, cue: SoundCue) {
            if self.muted || self.volume <= 0.0 {
                return;
            }
            let Some(ctx) = &self.ctx else { return };
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }
            let v = self.volume;

            match cue {
                SoundCue::Jump => {
                    Self::tone(ctx, OscillatorType::Square, &[(0.0, 200.0, false), (0.1, 500.0, true)], 0.1 * v, 0.1)
                }
                SoundCue::DoubleJump => {
                    Self::tone(ctx, OscillatorType::Sine, &[(0.0, 400.0, false), (0.08, 800.0, true)], 0.08 * v, 0.08)
                }
                SoundCue::Land => {
                    Self::tone(ctx, OscillatorType::Sine, &[(0.0, 120.0, false), (0.06, 60.0, true)], 0.08 * v, 0.06)
                }
                SoundCue::Score => {
                    Self::tone(ctx, OscillatorType::Square, &[(0.0, 520.0, false), (0.05, 660.0, false)], 0.05 * v, 0.15)
                }
                SoundCue::Die => {
                    Self::tone(ctx, OscillatorType::Sawtooth, &[(0.0, 200.0, false), (0.4, 50.0, true)], 0.15 * v, 0.4)
                }
                SoundCue::EnemyThrow => Self::tone(
                    ctx,
                    OscillatorType::Sawtooth,
                    &[(0.0, 150.0, false), (0.1, 200.0, false)],
                    0.08 * v,
                    0.2,
                ),
                SoundCue::Electric => Self::tone(
                    ctx,
                    OscillatorType::Sawtooth,
                    &[(0.0, 1000.0, false), (0.05, 300.0, false)],
                    0.1 * v,
                    0.1,
                ),
                SoundCue::Explosion => {
                    Self::tone(ctx, OscillatorType::Sawtooth, &[(0.0, 90.0, false), (0.35, 30.0, true)], 0.2 * v, 0.35);
                    Self::tone(ctx, OscillatorType::Square, &[(0.0, 60.0, false), (0.2, 40.0, true)], 0.1 * v, 0.2);
                }
                SoundCue::NearMiss => Self::tone(
                    ctx,
                    OscillatorType::Triangle,
                    &[(0.0, 700.0, false), (0.04, 1050.0, false)],
                    0.06 * v,
                    0.12,
                ),
            }
        }

        fn set_muted(&mut self, muted: bool) {
            self.muted = muted;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_audio_shares_log_and_respects_mute() {
        let audio = RecordingAudio::new();
        let mut sink: Box<dyn AudioSink> = Box::new(audio.clone());
        sink.play(SoundCue::Jump);
        sink.set_muted(true);
        sink.play(SoundCue::Die);
        sink.set_muted(false);
        sink.play(SoundCue::Jump);
        assert_eq!(audio.cues(), vec![SoundCue::Jump, SoundCue::Jump]);
        assert_eq!(audio.count(SoundCue::Die), 0);
    }

    #[test]
    fn test_cue_names() {
        assert_eq!(SoundCue::DoubleJump.as_str(), "doubleJump");
        assert_eq!(SoundCue::EnemyThrow.as_str(), "goblin");
    }
}
