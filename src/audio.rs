//! Audio system
//!
//! Sound effects are generated procedurally with the Web Audio API on the
//! web build. Native builds only get the event → sound mapping.

use crate::sim::{ClearFeedback, GameEvent};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Piece picked up from the tray
    Drag,
    /// Piece dropped on the board
    Place,
    /// One or more lines cleared
    Clear,
    /// Big multi-line or long-streak clear
    ClearExcellent,
    /// Hammer blast
    Hammer,
    /// Tray shuffled
    Shuffle,
    /// Game over
    GameOver,
    /// New best score
    NewRecord,
}

impl SoundEffect {
    /// Sound to play for a game event, if any
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::Placed { .. } => Some(SoundEffect::Place),
            GameEvent::LinesCleared { feedback, .. } => Some(match feedback {
                ClearFeedback::Excellent => SoundEffect::ClearExcellent,
                _ => SoundEffect::Clear,
            }),
            GameEvent::HammerBlast { .. } => Some(SoundEffect::Hammer),
            GameEvent::Shuffled => Some(SoundEffect::Shuffle),
            GameEvent::GameOver { .. } => Some(SoundEffect::GameOver),
            GameEvent::NewRecord { .. } => Some(SoundEffect::NewRecord),
            GameEvent::TrayRefilled
            | GameEvent::HammerArmed
            | GameEvent::HammerDisarmed
            | GameEvent::Restarted => None,
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web_audio::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web_audio {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::SoundEffect;

    /// Audio manager for the game
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        volume: f32,
        muted: bool,
    }

    impl Default for AudioManager {
        fn default() -> Self {
            Self::new()
        }
    }

    impl AudioManager {
        pub fn new() -> Self {
            // Try to create audio context (may fail if not in secure context)
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                volume: 0.7,
                muted: false,
            }
        }

        /// Resume audio context (required after user gesture)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        /// Set volume (0.0 - 1.0)
        pub fn set_volume(&mut self, vol: f32) {
            self.volume = vol.clamp(0.0, 1.0);
        }

        /// Mute/unmute (also used while a platform ad is showing)
        pub fn set_muted(&mut self, muted: bool) {
            self.muted = muted;
            log::info!("[Sound] Muted: {}", muted);
            if let Some(ctx) = &self.ctx {
                let _ = if muted { ctx.suspend() } else { ctx.resume() };
            }
        }

        /// Pick up the player's sound toggle and volume
        pub fn apply_settings(&mut self, settings: &crate::settings::Settings) {
            self.volume = settings.volume.clamp(0.0, 1.0);
            self.muted = !settings.sound;
        }

        pub fn is_muted(&self) -> bool {
            self.muted
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
                SoundEffect::Drag => self.play_drag(ctx, vol),
                SoundEffect::Place => self.play_place(ctx, vol),
                SoundEffect::Clear => self.play_clear(ctx, vol, false),
                SoundEffect::ClearExcellent => self.play_clear(ctx, vol, true),
                SoundEffect::Hammer => self.play_hammer(ctx, vol),
                SoundEffect::Shuffle => self.play_shuffle(ctx, vol),
                SoundEffect::GameOver => self.play_game_over(ctx, vol),
                SoundEffect::NewRecord => self.play_new_record(ctx, vol),
            }
        }

        // === Sound generators ===

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

        /// Short decaying tone starting `delay` seconds from now
        fn blip(
            &self,
            ctx: &AudioContext,
            freq: f32,
            osc_type: OscillatorType,
            gain_level: f32,
            delay: f64,
            length: f64,
        ) {
            let Some((osc, gain)) = self.create_osc(ctx, freq, osc_type) else {
                return;
            };
            let t = ctx.current_time() + delay;
            gain.gain().set_value_at_time(gain_level, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + length)
                .ok();
            osc.start_with_when(t).ok();
            osc.stop_with_when(t + length + 0.05).ok();
        }

        /// Pick-up click
        fn play_drag(&self, ctx: &AudioContext, vol: f32) {
            self.blip(ctx, 900.0, OscillatorType::Square, vol * 0.12, 0.0, 0.03);
        }

        /// Drop - soft ding
        fn play_place(&self, ctx: &AudioContext, vol: f32) {
            self.blip(ctx, 660.0, OscillatorType::Sine, vol * 0.35, 0.0, 0.12);
            self.blip(ctx, 990.0, OscillatorType::Sine, vol * 0.15, 0.02, 0.1);
        }

        /// Line clear - crystal shimmer, brighter for big clears
        fn play_clear(&self, ctx: &AudioContext, vol: f32, excellent: bool) {
            let notes: &[f32] = if excellent {
                &[660.0, 880.0, 1100.0, 1320.0, 1760.0]
            } else {
                &[660.0, 880.0, 1320.0]
            };
            for (i, freq) in notes.iter().enumerate() {
                self.blip(
                    ctx,
                    *freq,
                    OscillatorType::Triangle,
                    vol * 0.25,
                    i as f64 * 0.05,
                    0.25,
                );
            }
            // Bass thump
            self.blip(ctx, 80.0, OscillatorType::Sine, vol * 0.35, 0.0, 0.15);
        }

        /// Hammer - heavy impact with a falling pitch
        fn play_hammer(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 220.0, OscillatorType::Sawtooth) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.5, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.3)
                .ok();
            osc.frequency().set_value_at_time(220.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(40.0, t + 0.3)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.35).ok();

            self.blip(ctx, 55.0, OscillatorType::Sine, vol * 0.6, 0.0, 0.2);
        }

        /// Shuffle - quick rising sweep
        fn play_shuffle(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 200.0, OscillatorType::Triangle) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.3, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.2)
                .ok();
            osc.frequency().set_value_at_time(200.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(600.0, t + 0.15)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.25).ok();
        }

        /// Game over - sad descending
        fn play_game_over(&self, ctx: &AudioContext, vol: f32) {
            for (i, freq) in [400.0, 350.0, 300.0, 200.0].iter().enumerate() {
                self.blip(ctx, *freq, OscillatorType::Sine, vol * 0.3, i as f64 * 0.2, 0.3);
            }
        }

        /// New record - celebratory
        fn play_new_record(&self, ctx: &AudioContext, vol: f32) {
            for (i, freq) in [500.0, 600.0, 700.0, 800.0, 1000.0].iter().enumerate() {
                self.blip(
                    ctx,
                    *freq,
                    OscillatorType::Triangle,
                    vol * 0.25,
                    i as f64 * 0.08,
                    0.25,
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::FullLines;

    #[test]
    fn test_event_sounds() {
        let placed = GameEvent::Placed {
            slot: 0,
            x: 0,
            y: 0,
            blocks: 1,
            points: 10,
        };
        assert_eq!(SoundEffect::for_event(&placed), Some(SoundEffect::Place));
        assert_eq!(
            SoundEffect::for_event(&GameEvent::Shuffled),
            Some(SoundEffect::Shuffle)
        );
        assert_eq!(SoundEffect::for_event(&GameEvent::TrayRefilled), None);
        assert_eq!(SoundEffect::for_event(&GameEvent::HammerArmed), None);
    }

    #[test]
    fn test_clear_sound_follows_feedback() {
        let clear = |feedback| GameEvent::LinesCleared {
            lines: FullLines {
                rows: vec![0],
                cols: vec![],
            },
            cells: 8,
            streak: 1,
            points: 100,
            feedback,
        };
        assert_eq!(
            SoundEffect::for_event(&clear(ClearFeedback::Normal)),
            Some(SoundEffect::Clear)
        );
        assert_eq!(
            SoundEffect::for_event(&clear(ClearFeedback::Excellent)),
            Some(SoundEffect::ClearExcellent)
        );
    }
}
