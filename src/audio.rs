//! Audio system
//!
//! The round reports `GameEvent`s; this module decides what each one sounds
//! like. On wasm32 the sounds are generated with the Web Audio API, so no
//! asset files are needed.

use rand::Rng;

use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Target bubble popped
    Pop,
    /// Wrong bubble or empty space
    Error,
    /// Alternate error buzz so repeated misses don't sound identical
    ErrorAlt,
    /// Round started
    StartJingle,
    /// Begin the background hum
    AmbientLoopStart,
    /// End the background hum
    AmbientLoopStop,
    /// Round finished
    Complete,
}

impl SoundEffect {
    /// Sound for a gameplay event. Misses pick one of the two error sounds.
    pub fn for_event<R: Rng + ?Sized>(event: GameEvent, rng: &mut R) -> Option<Self> {
        match event {
            GameEvent::RoundStart => Some(SoundEffect::StartJingle),
            GameEvent::AmbientLoopStart => Some(SoundEffect::AmbientLoopStart),
            GameEvent::TargetHit => Some(SoundEffect::Pop),
            GameEvent::Miss => {
                if rng.random_bool(0.5) {
                    Some(SoundEffect::Error)
                } else {
                    Some(SoundEffect::ErrorAlt)
                }
            }
            GameEvent::AmbientLoopStop => Some(SoundEffect::AmbientLoopStop),
            GameEvent::RoundComplete => Some(SoundEffect::Complete),
        }
    }

    /// True for the two effects that control the looping hum
    pub fn is_ambient(self) -> bool {
        matches!(
            self,
            SoundEffect::AmbientLoopStart | SoundEffect::AmbientLoopStop
        )
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::SoundEffect;
    use crate::settings::Settings;

    /// Audio manager for the game
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        settings: Settings,
        ambient: Option<(OscillatorNode, GainNode)>,
    }

    impl Default for AudioManager {
        fn default() -> Self {
            Self::new(Settings::default())
        }
    }

    impl AudioManager {
        pub fn new(settings: Settings) -> Self {
            // May fail outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                settings,
                ambient: None,
            }
        }

        /// Resume audio context (required after user gesture)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        pub fn settings(&self) -> &Settings {
            &self.settings
        }

        pub fn set_settings(&mut self, settings: Settings) {
            self.settings = settings;
            if let (Some(ctx), Some((_, gain))) = (&self.ctx, &self.ambient) {
                gain.gain()
                    .set_value_at_time(self.settings.effective_music_volume() * 0.15, ctx.current_time())
                    .ok();
            }
        }

        /// Play a sound effect
        pub fn play(&mut self, effect: SoundEffect) {
            if effect == SoundEffect::AmbientLoopStop {
                self.stop_ambient();
                return;
            }

            let Some(ctx) = &self.ctx else { return };

            // Browsers keep the context suspended until a user gesture
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            if effect == SoundEffect::AmbientLoopStart {
                self.start_ambient();
                return;
            }

            let vol = self.settings.effective_sfx_volume();
            if vol <= 0.0 {
                return;
            }

            match effect {
                SoundEffect::Pop => play_pop(ctx, vol),
                SoundEffect::Error => play_error(ctx, vol, 180.0),
                SoundEffect::ErrorAlt => play_error(ctx, vol, 140.0),
                SoundEffect::StartJingle => play_arpeggio(ctx, vol, &[523.0, 659.0, 784.0], 0.1),
                SoundEffect::Complete => {
                    play_arpeggio(ctx, vol, &[784.0, 659.0, 523.0, 1046.0], 0.12)
                }
                SoundEffect::AmbientLoopStart | SoundEffect::AmbientLoopStop => {}
            }
        }

        fn start_ambient(&mut self) {
            if self.ambient.is_some() {
                return;
            }
            let Some(ctx) = &self.ctx else { return };
            let Some((osc, gain)) = create_osc(ctx, 110.0, OscillatorType::Sine) else {
                return;
            };
            let t = ctx.current_time();
            gain.gain().set_value_at_time(0.0001, t).ok();
            gain.gain()
                .linear_ramp_to_value_at_time(self.settings.effective_music_volume() * 0.15, t + 0.5)
                .ok();
            osc.start().ok();
            self.ambient = Some((osc, gain));
        }

        fn stop_ambient(&mut self) {
            let Some((osc, gain)) = self.ambient.take() else {
                return;
            };
            match &self.ctx {
                Some(ctx) => {
                    let t = ctx.current_time();
                    gain.gain().set_value_at_time(gain.gain().value(), t).ok();
                    gain.gain().linear_ramp_to_value_at_time(0.0, t + 0.3).ok();
                    osc.stop_with_when(t + 0.35).ok();
                }
                None => {
                    osc.stop().ok();
                }
            }
        }
    }

    /// Create an oscillator with gain envelope
    fn create_osc(
        ctx: &AudioContext,
        freq: f32,
        osc_type: OscillatorType,
    ) -> Option<(OscillatorNode, GainNode)> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;

        osc.set_type(osc_type);
        osc.frequency().set_value(freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;

        Some((osc, gain))
    }

    /// Pop - quick upward blip
    fn play_pop(ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = create_osc(ctx, 500.0, OscillatorType::Sine) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.5, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.12)
            .ok();
        osc.frequency().set_value_at_time(500.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(1200.0, t + 0.06)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.15).ok();
    }

    /// Error - low buzz
    fn play_error(ctx: &AudioContext, vol: f32, freq: f32) {
        let Some((osc, gain)) = create_osc(ctx, freq, OscillatorType::Square) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.2, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.2)
            .ok();
        osc.frequency().set_value_at_time(freq, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(freq * 0.6, t + 0.2)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.25).ok();
    }

    fn play_arpeggio(ctx: &AudioContext, vol: f32, notes: &[f32], step: f64) {
        for (i, freq) in notes.iter().enumerate() {
            let delay = i as f64 * step;
            if let Some((osc, gain)) = create_osc(ctx, *freq, OscillatorType::Triangle) {
                let t = ctx.current_time() + delay;
                gain.gain().set_value_at_time(vol * 0.3, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.3)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + 0.35).ok();
            }
        }
    }
}
