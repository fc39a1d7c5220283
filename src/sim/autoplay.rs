//! Idle/demo mode - a greedy player
//!
//! Tries every tray piece at every legal origin on a scratch copy of the
//! board and keeps the best-looking result.

use super::state::{GamePhase, GameState};
use super::step::Command;

/// Score of a candidate move (higher is better, compared lexicographically)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Rating {
    lines: usize,
    blocks: usize,
}

/// Best placement for the current tray, or None if nothing can be placed
pub fn suggest_move(state: &GameState) -> Option<Command> {
    if state.phase != GamePhase::Playing {
        return None;
    }

    let mut best: Option<(Rating, Command)> = None;
    for (slot, piece) in state.tray.iter().enumerate() {
        let Some(piece) = piece else { continue };
        let shape = piece.shape();

        for (x, y) in state.grid.placements(shape) {
            let mut scratch = state.grid.clone();
            let Ok(blocks) = scratch.place(shape, x, y, piece.color) else {
                continue;
            };
            let lines = scratch.full_lines();

            let rating = Rating {
                lines: lines.count(),
                blocks,
            };
            // Strictly better only, so ties keep the earliest slot/row/column
            if best.is_none_or(|(b, _)| rating > b) {
                best = Some((rating, Command::Place { slot, x, y }));
            }
        }
    }
    best.map(|(_, cmd)| cmd)
}
