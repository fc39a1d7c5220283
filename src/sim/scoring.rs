//! Point values and feedback tiers

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Points for placing `blocks` cells
pub fn placement_points(blocks: usize) -> u64 {
    blocks as u64 * POINTS_PER_BLOCK
}

/// Multiplier for clearing several lines with one placement
pub fn multi_line_multiplier(lines: usize) -> f64 {
    match lines {
        0 | 1 => 1.0,
        2 => 1.5,
        3 => 2.0,
        _ => 3.0,
    }
}

/// Multiplier for consecutive clearing placements (`streak` counts this one)
pub fn streak_multiplier(streak: u32) -> f64 {
    1.0 + (streak.max(1) - 1) as f64 * 0.5
}

/// Points for clearing `lines` rows+columns on the `streak`-th consecutive clear
pub fn line_clear_points(lines: usize, streak: u32) -> u64 {
    if lines == 0 {
        return 0;
    }
    let base = lines as f64 * BASE_POINTS_PER_LINE as f64;
    let mut points = (base * multi_line_multiplier(lines) * streak_multiplier(streak)).round() as u64;
    if lines >= JACKPOT_LINES {
        points += JACKPOT_BONUS;
    }
    points
}

/// Points for a hammer blast that destroyed `blocks` cells
pub fn hammer_points(blocks: usize) -> u64 {
    blocks as u64 * HAMMER_POINTS_PER_BLOCK
}

/// How loudly a front-end should celebrate a clear
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClearFeedback {
    Normal,
    Combo,
    Excellent,
}

impl ClearFeedback {
    pub fn classify(lines: usize, streak: u32) -> Self {
        if streak >= 4 || lines >= 3 {
            ClearFeedback::Excellent
        } else if streak >= 2 || lines >= 2 {
            ClearFeedback::Combo
        } else {
            ClearFeedback::Normal
        }
    }
}

/// Screen shake tier for a clear
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShakeIntensity {
    Light,
    Medium,
    Heavy,
}

impl ShakeIntensity {
    pub fn for_streak(streak: u32) -> Self {
        match streak {
            0..=1 => ShakeIntensity::Light,
            2..=3 => ShakeIntensity::Medium,
            _ => ShakeIntensity::Heavy,
        }
    }
}
