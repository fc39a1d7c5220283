//! Best-score saves with cloud → local fallback

use super::integrity::{ScorePayload, create_payload, validate_json};
use super::storage::Storage;
use crate::consts::LEADERBOARD_NAME;
use crate::platform::Platform;
use crate::settings::Settings;

/// Signed best-score payload
pub const DATA_KEY: &str = "crystal_puzzle_data";
/// Player preferences
pub const SETTINGS_KEY: &str = "crystal_puzzle_settings";
/// Local top-10 list
pub const HIGHSCORES_KEY: &str = "crystal_puzzle_highscores";

/// Where a save ended up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveTarget {
    Cloud,
    Local,
    /// Both backends failed; the score only lives in memory
    Nowhere,
}

/// Loads and stores the signed best score
pub struct SaveManager<S: Storage, P: Platform> {
    pub storage: S,
    pub platform: P,
}

impl<S: Storage, P: Platform> SaveManager<S, P> {
    pub fn new(storage: S, platform: P) -> Self {
        Self { storage, platform }
    }

    /// Sign `score` and save it, preferring the cloud
    pub fn save_best(&mut self, score: u64, now_ms: u64) -> SaveTarget {
        let payload = create_payload(score, now_ms);
        let json = match serde_json::to_string(&payload) {
            Ok(json) => json,
            Err(e) => {
                log::warn!("Could not encode save: {}", e);
                return SaveTarget::Nowhere;
            }
        };

        if self.platform.is_cloud_available() {
            match self.platform.save_cloud_data(&json) {
                Ok(()) => {
                    log::info!("Best score {} saved to cloud", score);
                    return SaveTarget::Cloud;
                }
                Err(e) => log::warn!("Cloud save failed, falling back to local: {}", e),
            }
        }

        match self.storage.set(DATA_KEY, &json) {
            Ok(()) => {
                log::info!("Best score {} saved locally", score);
                SaveTarget::Local
            }
            Err(e) => {
                log::warn!("Local save failed: {}", e);
                SaveTarget::Nowhere
            }
        }
    }

    /// Highest valid saved score across cloud and local (0 if none)
    pub fn load_best(&mut self) -> u64 {
        let mut best = 0;

        if self.platform.is_cloud_available() {
            match self.platform.load_cloud_data() {
                Ok(Some(json)) => best = best.max(Self::accept(&json, "cloud")),
                Ok(None) => {}
                Err(e) => log::warn!("Cloud load failed: {}", e),
            }
        }

        match self.storage.get(DATA_KEY) {
            Ok(Some(json)) => best = best.max(Self::accept(&json, "local")),
            Ok(None) => {}
            Err(e) => log::warn!("Local load failed: {}", e),
        }

        log::info!("Loaded best score: {}", best);
        best
    }

    fn accept(json: &str, source: &str) -> u64 {
        match validate_json(json) {
            Ok(score) => score,
            Err(e) => {
                log::warn!("Ignoring {} save: {}", source, e);
                0
            }
        }
    }

    /// Game-over bookkeeping: persist the best score and post it to the leaderboard
    pub fn on_game_over(&mut self, best: u64, now_ms: u64) -> SaveTarget {
        let target = self.save_best(best, now_ms);
        if let Err(e) = self.platform.submit_score(LEADERBOARD_NAME, best) {
            log::info!("Leaderboard submit skipped: {}", e);
        }
        target
    }

    /// Delete saved progress (best score, local leaderboard) and re-arm the
    /// tutorial. Other preferences are kept.
    pub fn reset_progress(&mut self) {
        for key in [DATA_KEY, HIGHSCORES_KEY] {
            if let Err(e) = self.storage.remove(key) {
                log::warn!("Could not remove {}: {}", key, e);
            }
        }
        let mut settings = Settings::load(&self.storage);
        if settings.tutorial_seen {
            settings.tutorial_seen = false;
            settings.save(&mut self.storage);
        }
        if self.platform.is_cloud_available() {
            let empty = ScorePayload {
                high_score: 0,
                sig: String::new(),
                ts: 0,
                cs: String::new(),
                gv: String::new(),
                last_played: 0,
            };
            if let Ok(json) = serde_json::to_string(&empty) {
                if let Err(e) = self.platform.save_cloud_data(&json) {
                    log::warn!("Could not clear cloud data: {}", e);
                }
            }
        }
        log::info!("Progress reset");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::storage::MemoryStorage;
    use crate::platform::{LocalPlatform, PlatformError, Reward};
    use crate::settings::Language;

    const NOW: u64 = 1_700_000_000_000;

    /// Signed-in platform backed by a string slot
    #[derive(Default)]
    struct CloudPlatform {
        data: Option<String>,
        fail_saves: bool,
        submitted: Vec<(String, u64)>,
    }

    impl Platform for CloudPlatform {
        fn request_reward(&mut self, _reward: Reward) -> bool {
            true
        }
        fn is_cloud_available(&self) -> bool {
            true
        }
        fn load_cloud_data(&mut self) -> Result<Option<String>, PlatformError> {
            Ok(self.data.clone())
        }
        fn save_cloud_data(&mut self, json: &str) -> Result<(), PlatformError> {
            if self.fail_saves {
                return Err(PlatformError::Failed("quota".into()));
            }
            self.data = Some(json.to_string());
            Ok(())
        }
        fn submit_score(&mut self, leaderboard: &str, score: u64) -> Result<(), PlatformError> {
            self.submitted.push((leaderboard.to_string(), score));
            Ok(())
        }
    }

    #[test]
    fn test_local_roundtrip() {
        let mut saves = SaveManager::new(MemoryStorage::new(), LocalPlatform::new());
        assert_eq!(saves.load_best(), 0);
        assert_eq!(saves.save_best(1234, NOW), SaveTarget::Local);
        assert_eq!(saves.load_best(), 1234);
    }

    #[test]
    fn test_cloud_preferred() {
        let mut saves = SaveManager::new(MemoryStorage::new(), CloudPlatform::default());
        assert_eq!(saves.save_best(500, NOW), SaveTarget::Cloud);
        assert!(saves.storage.is_empty());
        assert_eq!(saves.load_best(), 500);
    }

    #[test]
    fn test_cloud_failure_falls_back_to_local() {
        let platform = CloudPlatform {
            fail_saves: true,
            ..Default::default()
        };
        let mut saves = SaveManager::new(MemoryStorage::new(), platform);
        assert_eq!(saves.save_best(800, NOW), SaveTarget::Local);
        assert_eq!(saves.load_best(), 800);
    }

    #[test]
    fn test_load_takes_max_of_valid_saves() {
        let mut saves = SaveManager::new(MemoryStorage::new(), CloudPlatform::default());
        saves.platform.data = Some(serde_json::to_string(&create_payload(300, NOW)).unwrap());
        saves
            .storage
            .set(DATA_KEY, &serde_json::to_string(&create_payload(700, NOW)).unwrap())
            .unwrap();
        assert_eq!(saves.load_best(), 700);
    }

    #[test]
    fn test_tampered_local_save_ignored() {
        let mut saves = SaveManager::new(MemoryStorage::new(), LocalPlatform::new());
        let mut payload = create_payload(100, NOW);
        payload.high_score = 999_000;
        saves
            .storage
            .set(DATA_KEY, &serde_json::to_string(&payload).unwrap())
            .unwrap();
        assert_eq!(saves.load_best(), 0);

        saves.storage.set(DATA_KEY, "{\"highScore\":50}").unwrap();
        assert_eq!(saves.load_best(), 0);
    }

    #[test]
    fn test_game_over_submits_to_leaderboard() {
        let mut saves = SaveManager::new(MemoryStorage::new(), CloudPlatform::default());
        saves.on_game_over(4200, NOW);
        assert_eq!(
            saves.platform.submitted,
            vec![(LEADERBOARD_NAME.to_string(), 4200)]
        );
    }

    #[test]
    fn test_reset_progress() {
        let mut saves = SaveManager::new(MemoryStorage::new(), LocalPlatform::new());
        saves.save_best(900, NOW);
        saves.storage.set(HIGHSCORES_KEY, "{}").unwrap();
        saves.reset_progress();
        assert!(saves.storage.is_empty());
        assert_eq!(saves.load_best(), 0);
    }

    #[test]
    fn test_reset_progress_keeps_preferences() {
        let mut saves = SaveManager::new(MemoryStorage::new(), LocalPlatform::new());
        let settings = Settings {
            sound: false,
            language: Language::Ru,
            tutorial_seen: true,
            ..Settings::default()
        };
        settings.save(&mut saves.storage);
        saves.save_best(900, NOW);

        saves.reset_progress();

        let after = Settings::load(&saves.storage);
        assert_eq!(after.language, Language::Ru);
        assert!(!after.sound);
        assert!(!after.tutorial_seen);
        assert_eq!(saves.load_best(), 0);
    }
}
