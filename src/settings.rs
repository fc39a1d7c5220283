//! Game settings and preferences
//!
//! Persisted separately from score saves.

use serde::{Deserialize, Serialize};

use crate::persistence::Storage;
use crate::persistence::save::SETTINGS_KEY;

/// UI language preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Language {
    #[default]
    En,
    Ru,
    Uz,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::En, Language::Ru, Language::Uz];

    pub fn as_code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Ru => "ru",
            Language::Uz => "uz",
        }
    }

    /// Parse a language code; region suffixes like `ru-RU` are accepted
    pub fn from_code(s: &str) -> Option<Self> {
        let lower = s.to_lowercase();
        let primary = lower.split(['-', '_']).next().unwrap_or("");
        match primary {
            "en" => Some(Language::En),
            "ru" => Some(Language::Ru),
            "uz" => Some(Language::Uz),
            _ => None,
        }
    }
}

/// Player preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Sound effects on/off
    pub sound: bool,
    /// Master volume (0.0 - 1.0)
    pub volume: f32,
    /// Haptic feedback on line clears
    pub vibration: bool,
    pub language: Language,
    /// First-run drag hint already shown
    pub tutorial_seen: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sound: true,
            volume: 0.7,
            vibration: true,
            language: Language::En,
            tutorial_seen: false,
        }
    }
}

impl Settings {
    /// Volume after the sound toggle
    pub fn effective_volume(&self) -> f32 {
        if self.sound {
            self.volume.clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Settings with a detected language, used on first run
    pub fn for_locale(locale: &str) -> Self {
        Self {
            language: Language::from_code(locale).unwrap_or_default(),
            ..Self::default()
        }
    }

    /// Load settings; missing or corrupt data gives defaults
    pub fn load<S: Storage>(storage: &S) -> Self {
        match storage.get_json::<Settings>(SETTINGS_KEY) {
            Ok(Some(settings)) => {
                log::info!("Loaded settings");
                settings
            }
            Ok(None) => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(e) => {
                log::warn!("Settings unreadable ({}), using defaults", e);
                Self::default()
            }
        }
    }

    pub fn save<S: Storage>(&self, storage: &mut S) {
        match storage.set_json(SETTINGS_KEY, self) {
            Ok(()) => log::info!("Settings saved"),
            Err(e) => log::warn!("Could not save settings: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStorage;

    #[test]
    fn test_language_codes() {
        assert_eq!(Language::from_code("ru"), Some(Language::Ru));
        assert_eq!(Language::from_code("uz-UZ"), Some(Language::Uz));
        assert_eq!(Language::from_code("EN_us"), Some(Language::En));
        assert_eq!(Language::from_code("de"), None);
        for lang in Language::ALL {
            assert_eq!(Language::from_code(lang.as_code()), Some(lang));
        }
    }

    #[test]
    fn test_for_locale_falls_back_to_english() {
        assert_eq!(Settings::for_locale("fr-FR").language, Language::En);
        assert_eq!(Settings::for_locale("ru-RU").language, Language::Ru);
    }

    #[test]
    fn test_effective_volume() {
        let mut s = Settings::default();
        assert!((s.effective_volume() - 0.7).abs() < 1e-6);
        s.sound = false;
        assert_eq!(s.effective_volume(), 0.0);
        s.sound = true;
        s.volume = 3.0;
        assert_eq!(s.effective_volume(), 1.0);
    }

    #[test]
    fn test_storage_roundtrip_and_partial_json() {
        let mut storage = MemoryStorage::new();
        let mut s = Settings::default();
        s.language = Language::Uz;
        s.tutorial_seen = true;
        s.save(&mut storage);
        assert_eq!(Settings::load(&storage), s);

        // Older saves without newer fields still load
        storage.set(SETTINGS_KEY, "{\"sound\":false}").unwrap();
        let loaded = Settings::load(&storage);
        assert!(!loaded.sound);
        assert!(loaded.vibration);
    }

    #[test]
    fn test_corrupt_settings_use_defaults() {
        let mut storage = MemoryStorage::new();
        storage.set(SETTINGS_KEY, "[").unwrap();
        assert_eq!(Settings::load(&storage), Settings::default());
    }
}
