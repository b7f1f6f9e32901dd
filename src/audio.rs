//! Audio feedback
//!
//! Procedurally generated sound effects using the Web Audio API - no
//! external files. Which effect (and vibration pattern) a run event gets is
//! decided here on every platform; playback itself is wasm32 only.

use crate::sim::RunEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    Jump,
    SuperJump,
    Dash,
    /// Lost a life
    Collision,
    ShieldBreak,
    Powerup,
    Collectible,
    GameOver,
}

impl SoundEffect {
    /// Sound for a run event, if it has one
    pub fn for_event(event: &RunEvent) -> Option<Self> {
        match event {
            RunEvent::Jumped => Some(SoundEffect::Jump),
            RunEvent::SuperJumped => Some(SoundEffect::SuperJump),
            RunEvent::Dashed => Some(SoundEffect::Dash),
            RunEvent::Hit { .. } => Some(SoundEffect::Collision),
            RunEvent::ShieldBroken => Some(SoundEffect::ShieldBreak),
            RunEvent::PowerupCollected(_) => Some(SoundEffect::Powerup),
            RunEvent::CollectibleCollected => Some(SoundEffect::Collectible),
            RunEvent::GameOver => Some(SoundEffect::GameOver),
            RunEvent::Landed
            | RunEvent::SkillReady
            | RunEvent::Paused
            | RunEvent::Resumed => None,
        }
    }
}

/// Vibration pattern (ms on/off) for a run event
pub fn vibration_pattern(event: &RunEvent) -> Option<&'static [u32]> {
    match event {
        RunEvent::Dashed => Some(&[75][..]),
        RunEvent::PowerupCollected(_) => Some(&[50][..]),
        RunEvent::Hit { .. } | RunEvent::ShieldBroken => Some(&[100][..]),
        RunEvent::GameOver => Some(&[100, 50, 100][..]),
        _ => None,
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
        volume: f32,
        muted: bool,
    }

    impl AudioManager {
        pub fn new(settings: &Settings) -> Self {
            // May fail outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                volume: settings.effective_sfx_volume(),
                muted: false,
            }
        }

        /// Resume audio context (required after user gesture)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        pub fn apply_settings(&mut self, settings: &Settings) {
            self.volume = settings.effective_sfx_volume();
        }

        pub fn set_muted(&mut self, muted: bool) {
            self.muted = muted;
        }

        fn effective_volume(&self) -> f32 {
            if self.muted { 0.0 } else { self.volume }
        }

        /// Play a sound effect
        pub fn play(&self, effect: SoundEffect) {
            let vol = self.effective_volume();
            if vol <= 0.0 {
                return;
            }

            let Some(ctx) = &self.ctx else { return };

            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            match effect {
                SoundEffect::Jump => self.sweep(ctx, vol * 0.2, OscillatorType::Sine, 300.0, 600.0, 0.1),
                SoundEffect::SuperJump => {
                    self.sweep(ctx, vol * 0.2, OscillatorType::Sine, 300.0, 900.0, 0.2)
                }
                SoundEffect::Dash => {
                    self.sweep(ctx, vol * 0.2, OscillatorType::Sawtooth, 600.0, 100.0, 0.2)
                }
                SoundEffect::Collision => {
                    self.sweep(ctx, vol * 0.2, OscillatorType::Square, 150.0, 40.0, 0.4)
                }
                SoundEffect::ShieldBreak => {
                    self.sweep(ctx, vol * 0.2, OscillatorType::Triangle, 1200.0, 200.0, 0.25)
                }
                SoundEffect::Powerup => self.play_powerup(ctx, vol),
                SoundEffect::Collectible => {
                    self.sweep(ctx, vol * 0.15, OscillatorType::Sine, 900.0, 1400.0, 0.06)
                }
                SoundEffect::GameOver => {
                    self.sweep(ctx, vol * 0.25, OscillatorType::Square, 220.0, 55.0, 0.8)
                }
            }
        }

        /// Create an oscillator with gain envelope
        fn create_osc(
            &self,
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

        /// Exponential pitch sweep with a decaying envelope
        fn sweep(
            &self,
            ctx: &AudioContext,
            vol: f32,
            osc_type: OscillatorType,
            from: f32,
            to: f32,
            duration: f64,
        ) {
            let Some((osc, gain)) = self.create_osc(ctx, from, osc_type) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.001, t + duration.max(0.3))
                .ok();
            osc.frequency().set_value_at_time(from, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(to, t + duration)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + duration.max(0.3) + 0.1).ok();
        }

        /// Power-up - quick rise then settle
        fn play_powerup(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 600.0, OscillatorType::Sine) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.2, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.001, t + 0.3)
                .ok();
            osc.frequency().set_value_at_time(600.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(1200.0, t + 0.05)
                .ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(800.0, t + 0.2)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.4).ok();
        }
    }

    /// Vibrate the device if the browser supports it
    pub fn vibrate(pattern: &[u32]) {
        let Some(window) = web_sys::window() else { return };
        let array = js_sys::Array::new();
        for ms in pattern {
            array.push(&wasm_bindgen::JsValue::from(*ms));
        }
        let _ = window.navigator().vibrate_with_pattern(&array);
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::vibrate;
