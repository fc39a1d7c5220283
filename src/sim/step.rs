//! Command processing
//!
//! Every player action goes through `step`. A rejected command leaves the
//! state exactly as it was.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::grid::PlacementError;
use super::scoring::{ClearFeedback, hammer_points, line_clear_points, placement_points};
use super::state::{GameEvent, GamePhase, GameState, RunStats};
use crate::consts::TRAY_SIZE;

/// A single player action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Drop the piece in `slot` with its origin at `(x, y)`
    Place { slot: usize, x: i32, y: i32 },
    /// Toggle hammer mode
    ArmHammer,
    /// Fire the armed hammer at an occupied cell
    Hammer { x: i32, y: i32 },
    /// Replace the whole tray
    Shuffle,
    /// Start over, keeping the best score
    Restart,
}

/// Why a command was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("the game is over")]
    GameOver,
    #[error("tray slot {0} does not exist")]
    SlotOutOfRange(usize),
    #[error("tray slot {0} is empty")]
    EmptySlot(usize),
    #[error("hammer is armed; fire or disarm it first")]
    HammerArmed,
    #[error("hammer is not armed")]
    HammerNotArmed,
    #[error("no block at ({x}, {y})")]
    NoBlockAt { x: i32, y: i32 },
    #[error(transparent)]
    Placement(#[from] PlacementError),
}

/// Apply one command to the game
pub fn step(state: &mut GameState, command: &Command) -> Result<(), MoveError> {
    match *command {
        Command::Place { slot, x, y } => place(state, slot, x, y),
        Command::ArmHammer => toggle_hammer(state),
        Command::Hammer { x, y } => fire_hammer(state, x, y),
        Command::Shuffle => shuffle(state),
        Command::Restart => {
            restart(state);
            Ok(())
        }
    }
}

fn place(state: &mut GameState, slot: usize, x: i32, y: i32) -> Result<(), MoveError> {
    match state.phase {
        GamePhase::GameOver => return Err(MoveError::GameOver),
        GamePhase::HammerArmed => return Err(MoveError::HammerArmed),
        GamePhase::Playing => {}
    }
    if slot >= TRAY_SIZE {
        return Err(MoveError::SlotOutOfRange(slot));
    }
    let piece = state.tray[slot].ok_or(MoveError::EmptySlot(slot))?;

    let blocks = state.grid.place(piece.shape(), x, y, piece.color)?;
    let points = placement_points(blocks);
    state.tray[slot] = None;
    state.stats.moves += 1;
    state.stats.blocks_placed += blocks as u32;
    state.events.push(GameEvent::Placed {
        slot,
        x,
        y,
        blocks,
        points,
    });
    state.add_score(points);

    clear_lines(state);

    if state.tray_is_empty() {
        state.refill_tray();
    }
    check_game_over(state);
    Ok(())
}

/// Clear full lines after a placement and score them
fn clear_lines(state: &mut GameState) {
    let lines = state.grid.full_lines();
    if lines.is_empty() {
        state.combo_streak = 0;
        return;
    }

    state.combo_streak += 1;
    let streak = state.combo_streak;
    let count = lines.count();
    let cells = state.grid.clear(&lines);
    let points = line_clear_points(count, streak);

    state.stats.lines_cleared += count as u32;
    state.stats.best_streak = state.stats.best_streak.max(streak);
    log::debug!(
        "Cleared {} line(s) ({} cells), streak {}, +{}",
        count,
        cells,
        streak,
        points
    );
    state.events.push(GameEvent::LinesCleared {
        lines,
        cells,
        streak,
        points,
        feedback: ClearFeedback::classify(count, streak),
    });
    state.add_score(points);
}

fn toggle_hammer(state: &mut GameState) -> Result<(), MoveError> {
    match state.phase {
        GamePhase::GameOver => Err(MoveError::GameOver),
        GamePhase::Playing => {
            state.phase = GamePhase::HammerArmed;
            state.events.push(GameEvent::HammerArmed);
            Ok(())
        }
        GamePhase::HammerArmed => {
            state.phase = GamePhase::Playing;
            state.events.push(GameEvent::HammerDisarmed);
            Ok(())
        }
    }
}

fn fire_hammer(state: &mut GameState, x: i32, y: i32) -> Result<(), MoveError> {
    match state.phase {
        GamePhase::GameOver => return Err(MoveError::GameOver),
        GamePhase::Playing => return Err(MoveError::HammerNotArmed),
        GamePhase::HammerArmed => {}
    }
    if !state.grid.is_occupied(x, y) {
        return Err(MoveError::NoBlockAt { x, y });
    }

    let destroyed = state.grid.hammer(x, y);
    let points = hammer_points(destroyed);
    state.phase = GamePhase::Playing;
    state.events.push(GameEvent::HammerBlast {
        x,
        y,
        destroyed,
        points,
    });
    state.add_score(points);
    Ok(())
}

fn shuffle(state: &mut GameState) -> Result<(), MoveError> {
    if state.is_over() {
        return Err(MoveError::GameOver);
    }
    state.refill_tray();
    state.events.push(GameEvent::Shuffled);
    check_game_over(state);
    Ok(())
}

fn restart(state: &mut GameState) {
    state.grid.clear_all();
    state.tray = [None; TRAY_SIZE];
    state.score = 0;
    state.combo_streak = 0;
    state.phase = GamePhase::Playing;
    state.record_celebrated = false;
    state.stats = RunStats::default();
    state.events.push(GameEvent::Restarted);
    state.refill_tray();
    log::info!("Restarted (best {})", state.best_score);
}

/// End the game when no remaining tray piece fits
fn check_game_over(state: &mut GameState) {
    if state.is_over() || state.tray_is_empty() {
        return;
    }
    if state.tray_fit_mask().iter().any(|&fits| fits) {
        return;
    }
    state.phase = GamePhase::GameOver;
    log::info!(
        "Game over: score {} (best {}), {} moves",
        state.score,
        state.best_score,
        state.stats.moves
    );
    state.events.push(GameEvent::GameOver {
        score: state.score,
        best: state.best_score,
    });
}
