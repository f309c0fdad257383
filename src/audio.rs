//! Fire-and-forget audio boundary
//!
//! The engine queues cues during a tick and flushes them to a sink at the
//! frame edge. The sink is an external collaborator: it may be a no-op (no
//! secure context, muted, native headless) and the core must not care.
//! The wasm32 implementation generates effects procedurally with the Web
//! Audio API - no external files needed.

/// Gameplay sound cues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEvent {
    /// Collectible picked up
    Collect,
    /// Hazard collision / damage
    Crash,
    /// Delivery / milestone reached
    LevelUp,
    /// Trivia question appears
    Ping,
    /// Trivia answered correctly
    TriviaCorrect,
    /// Trivia answered incorrectly
    TriviaWrong,
    /// Sonic boom (MachSurfer)
    Boom,
    GameOver,
    Victory,
}

/// Fire-and-forget sound sink. Implementations must never block or fail
/// loudly; an unavailable backend plays nothing.
pub trait AudioSink {
    fn play(&mut self, event: SoundEvent);
}

/// Sink that discards everything (headless, muted, unavailable backend).
#[derive(Debug, Default)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play(&mut self, _event: SoundEvent) {}
}

/// Sink that records cues, for tests.
#[derive(Debug, Default)]
pub struct RecordingAudio {
    pub played: Vec<SoundEvent>,
}

impl AudioSink for RecordingAudio {
    fn play(&mut self, event: SoundEvent) {
        self.played.push(event);
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::WebAudio;

#[cfg(target_arch = "wasm32")]
mod web {
    use super::{AudioSink, SoundEvent};
    use web_sys::{AudioContext, OscillatorType};

    /// Procedural Web Audio sink.
    pub struct WebAudio {
        ctx: Option<AudioContext>,
        volume: f32,
        muted: bool,
    }

    impl WebAudio {
        pub fn new() -> Self {
            // May fail outside a secure context; degrade to silence
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                volume: 0.8,
                muted: false,
            }
        }

        pub fn set_volume(&mut self, vol: f32) {
            self.volume = vol.clamp(0.0, 1.0);
        }

        pub fn set_muted(&mut self, muted: bool) {
            self.muted = muted;
        }

        /// Resume the context (browsers require a user gesture first).
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        /// One enveloped oscillator sweep.
        fn beep(&self, kind: OscillatorType, from_hz: f32, to_hz: f32, secs: f64, gain: f32) {
            let Some(ctx) = &self.ctx else { return };
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }
            let now = ctx.current_time();
            let Ok(osc) = ctx.create_oscillator() else {
                return;
            };
            let Ok(amp) = ctx.create_gain() else { return };
            osc.set_type(kind);
            let _ = osc.frequency().set_value_at_time(from_hz, now);
            let _ = osc
                .frequency()
                .exponential_ramp_to_value_at_time(to_hz.max(1.0), now + secs);
            let _ = amp.gain().set_value_at_time(gain, now);
            let _ = amp
                .gain()
                .exponential_ramp_to_value_at_time(0.0001, now + secs);
            let _ = osc.connect_with_audio_node(&amp);
            let _ = amp.connect_with_audio_node(&ctx.destination());
            let _ = osc.start();
            let _ = osc.stop_with_when(now + secs);
        }
    }

    impl AudioSink for WebAudio {
        fn play(&mut self, event: SoundEvent) {
            if self.muted || self.volume <= 0.0 {
                return;
            }
            let g = self.volume * 0.25;
            match event {
                SoundEvent::Collect => self.beep(OscillatorType::Sine, 660.0, 990.0, 0.09, g),
                SoundEvent::Crash => self.beep(OscillatorType::Sawtooth, 220.0, 55.0, 0.25, g),
                SoundEvent::LevelUp => self.beep(OscillatorType::Square, 440.0, 880.0, 0.2, g),
                SoundEvent::Ping => self.beep(OscillatorType::Sine, 880.0, 880.0, 0.12, g),
                SoundEvent::TriviaCorrect => {
                    self.beep(OscillatorType::Triangle, 523.0, 1046.0, 0.3, g)
                }
                SoundEvent::TriviaWrong => self.beep(OscillatorType::Square, 330.0, 165.0, 0.3, g),
                SoundEvent::Boom => self.beep(OscillatorType::Sawtooth, 110.0, 40.0, 0.4, g),
                SoundEvent::GameOver => self.beep(OscillatorType::Sawtooth, 440.0, 110.0, 0.6, g),
                SoundEvent::Victory => self.beep(OscillatorType::Triangle, 523.0, 1568.0, 0.6, g),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_sink_orders_cues() {
        let mut sink = RecordingAudio::default();
        sink.play(SoundEvent::Collect);
        sink.play(SoundEvent::Crash);
        assert_eq!(sink.played, vec![SoundEvent::Collect, SoundEvent::Crash]);
    }

    #[test]
    fn test_null_sink_is_silent() {
        // Just exercises the no-op path
        NullAudio.play(SoundEvent::Victory);
    }
}
