//! Platform abstraction layer
//!
//! Handles the gaming-platform services the game consumes:
//! - Rewarded power-ups (hammer, shuffle)
//! - Cloud player data
//! - Leaderboard submission
//!
//! `LocalPlatform` is the development fallback used when no platform SDK
//! is present: rewards are granted immediately and there is no cloud.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlatformError {
    #[error("platform service unavailable")]
    Unavailable,
    #[error("platform call failed: {0}")]
    Failed(String),
}

/// Power-ups unlocked through a reward
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Reward {
    Hammer,
    Shuffle,
}

impl Reward {
    pub fn as_str(&self) -> &'static str {
        match self {
            Reward::Hammer => "hammer",
            Reward::Shuffle => "shuffle",
        }
    }
}

/// Services provided by the host gaming platform
pub trait Platform {
    /// Show whatever the platform requires before granting `reward`.
    /// Returns true when the reward was granted.
    fn request_reward(&mut self, reward: Reward) -> bool;

    /// Whether cloud player data can be used (player signed in)
    fn is_cloud_available(&self) -> bool;

    fn load_cloud_data(&mut self) -> Result<Option<String>, PlatformError>;

    fn save_cloud_data(&mut self, json: &str) -> Result<(), PlatformError>;

    fn submit_score(&mut self, leaderboard: &str, score: u64) -> Result<(), PlatformError>;
}

/// Offline/dev-mode platform
#[derive(Debug, Clone, Default)]
pub struct LocalPlatform {
    /// Rewards granted so far, for diagnostics
    pub rewards_granted: u32,
}

impl LocalPlatform {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Platform for LocalPlatform {
    fn request_reward(&mut self, reward: Reward) -> bool {
        log::info!("Dev mode: {} activated", reward.as_str());
        self.rewards_granted += 1;
        true
    }

    fn is_cloud_available(&self) -> bool {
        false
    }

    fn load_cloud_data(&mut self) -> Result<Option<String>, PlatformError> {
        Err(PlatformError::Unavailable)
    }

    fn save_cloud_data(&mut self, _json: &str) -> Result<(), PlatformError> {
        Err(PlatformError::Unavailable)
    }

    fn submit_score(&mut self, _leaderboard: &str, _score: u64) -> Result<(), PlatformError> {
        Err(PlatformError::Unavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_platform_grants_rewards() {
        let mut p = LocalPlatform::new();
        assert!(p.request_reward(Reward::Hammer));
        assert!(p.request_reward(Reward::Shuffle));
        assert_eq!(p.rewards_granted, 2);
    }

    #[test]
    fn test_local_platform_has_no_cloud() {
        let mut p = LocalPlatform::new();
        assert!(!p.is_cloud_available());
        assert_eq!(p.load_cloud_data(), Err(PlatformError::Unavailable));
        assert_eq!(p.submit_score("board", 10), Err(PlatformError::Unavailable));
    }

    #[test]
    fn test_reward_names() {
        assert_eq!(Reward::Hammer.as_str(), "hammer");
        assert_eq!(Reward::Shuffle.as_str(), "shuffle");
    }
}
