//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - Row-major scan order everywhere
//! - No rendering or platform dependencies

pub mod autoplay;
pub mod grid;
pub mod scoring;
pub mod shape;
pub mod state;
pub mod step;

pub use autoplay::suggest_move;
pub use grid::{FullLines, Grid, PlacementError};
pub use scoring::{ClearFeedback, ShakeIntensity};
pub use shape::{Crystal, Shape, catalog};
pub use state::{GameEvent, GamePhase, GameState, RngState, RunStats, TrayPiece};
pub use step::{Command, MoveError, step};
