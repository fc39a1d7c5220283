//! Browser bindings
//!
//! `WebGame` is the handle a JS front-end drives: it forwards player actions
//! to the simulation, plays sounds, and persists scores in LocalStorage.
//! Rendering, drag-and-drop and DOM work stay on the JS side; board state is
//! handed over as JSON.

use wasm_bindgen::prelude::*;

use crate::audio::{AudioManager, SoundEffect};
use crate::highscores::HighScores;
use crate::persistence::{LocalStorage, SaveManager};
use crate::platform::{LocalPlatform, Platform, Reward};
use crate::settings::Settings;
use crate::sim::{Command, GameEvent, GamePhase, GameState, MoveError, step};
use crate::now_ms;

fn to_js(e: MoveError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

#[wasm_bindgen]
pub struct WebGame {
    state: GameState,
    saves: Option<SaveManager<LocalStorage, LocalPlatform>>,
    settings: Settings,
    high_scores: HighScores,
    audio: AudioManager,
    /// Events since the last `events_json` call
    pending: Vec<GameEvent>,
}

#[wasm_bindgen]
impl WebGame {
    #[wasm_bindgen(constructor)]
    pub fn new(seed: u64) -> WebGame {
        console_error_panic_hook::set_once();
        // A second WebGame on the same page finds the logger already set
        let _ = console_log::init_with_level(log::Level::Info);

        let mut saves = LocalStorage::open().map(|s| SaveManager::new(s, LocalPlatform::new()));
        if saves.is_none() {
            log::warn!("LocalStorage unavailable - progress will not be saved");
        }

        let best = saves.as_mut().map(|s| s.load_best()).unwrap_or(0);
        let settings = saves
            .as_ref()
            .map(|s| Settings::load(&s.storage))
            .unwrap_or_default();
        let high_scores = saves
            .as_ref()
            .map(|s| HighScores::load(&s.storage))
            .unwrap_or_default();

        let mut audio = AudioManager::new();
        audio.apply_settings(&settings);

        log::info!("Crystal Puzzle starting (seed {}, best {})", seed, best);

        WebGame {
            state: GameState::with_best(seed, best),
            saves,
            settings,
            high_scores,
            audio,
            pending: Vec::new(),
        }
    }

    /// Drop tray piece `slot` with its origin at column `x`, row `y`
    pub fn place(&mut self, slot: usize, x: i32, y: i32) -> Result<(), JsValue> {
        self.apply(Command::Place { slot, x, y })
    }

    /// Per tray slot: can the piece go anywhere on the board
    pub fn tray_fit_mask(&self) -> Vec<u8> {
        self.state.tray_fit_mask().iter().map(|&f| f as u8).collect()
    }

    /// Arm or disarm the hammer. Arming goes through the platform reward.
    pub fn toggle_hammer(&mut self) -> Result<bool, JsValue> {
        if self.state.phase == GamePhase::Playing && !self.request_reward(Reward::Hammer) {
            return Ok(false);
        }
        self.apply(Command::ArmHammer)?;
        Ok(self.state.phase == GamePhase::HammerArmed)
    }

    pub fn hammer(&mut self, x: i32, y: i32) -> Result<(), JsValue> {
        self.apply(Command::Hammer { x, y })
    }

    /// Replace the tray, after the platform reward
    pub fn shuffle(&mut self) -> Result<bool, JsValue> {
        if self.state.is_over() {
            return Err(to_js(MoveError::GameOver));
        }
        if !self.request_reward(Reward::Shuffle) {
            return Ok(false);
        }
        self.apply(Command::Shuffle)?;
        Ok(true)
    }

    pub fn restart(&mut self) -> Result<(), JsValue> {
        self.apply(Command::Restart)
    }

    /// Play the pick-up click when a drag starts
    pub fn drag_started(&self) {
        self.audio.resume();
        self.audio.play(SoundEffect::Drag);
    }

    pub fn score(&self) -> u64 {
        self.state.score
    }

    pub fn best_score(&self) -> u64 {
        self.state.best_score
    }

    pub fn is_over(&self) -> bool {
        self.state.is_over()
    }

    /// Full game state as JSON
    pub fn state_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.state).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Events since the previous call, as a JSON array
    pub fn events_json(&mut self) -> Result<String, JsValue> {
        let events = std::mem::take(&mut self.pending);
        serde_json::to_string(&events).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    pub fn high_scores_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.high_scores).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    pub fn settings_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.settings).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Replace settings from JSON and persist them
    pub fn set_settings_json(&mut self, json: &str) -> Result<(), JsValue> {
        let settings: Settings =
            serde_json::from_str(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
        self.audio.apply_settings(&settings);
        if let Some(saves) = self.saves.as_mut() {
            settings.save(&mut saves.storage);
        }
        self.settings = settings;
        Ok(())
    }

    /// Silence audio while a platform ad or overlay is up
    pub fn set_paused(&mut self, paused: bool) {
        self.audio.set_muted(paused || !self.settings.sound);
    }

    /// Wipe saved progress and start over
    pub fn reset_progress(&mut self) -> Result<(), JsValue> {
        if let Some(saves) = self.saves.as_mut() {
            saves.reset_progress();
        }
        self.settings.tutorial_seen = false;
        self.high_scores = HighScores::new();
        self.state.best_score = 0;
        self.apply(Command::Restart)
    }
}

impl WebGame {
    fn request_reward(&mut self, reward: Reward) -> bool {
        match self.saves.as_mut() {
            Some(saves) => saves.platform.request_reward(reward),
            None => LocalPlatform::new().request_reward(reward),
        }
    }

    fn apply(&mut self, command: Command) -> Result<(), JsValue> {
        step(&mut self.state, &command).map_err(to_js)?;
        for event in self.state.drain_events() {
            if let Some(effect) = SoundEffect::for_event(&event) {
                self.audio.play(effect);
            }
            if let GameEvent::GameOver { score, best } = event {
                self.on_game_over(score, best);
            }
            self.pending.push(event);
        }
        Ok(())
    }

    fn on_game_over(&mut self, score: u64, best: u64) {
        let Some(saves) = self.saves.as_mut() else {
            return;
        };
        let now = now_ms();
        saves.on_game_over(best, now);
        if let Some(rank) = self
            .high_scores
            .add_score(score, self.state.stats.lines_cleared, now)
        {
            log::info!("New high score #{}: {}", rank, score);
            self.high_scores.save(&mut saves.storage);
        }
    }
}
