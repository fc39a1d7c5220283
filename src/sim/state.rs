//! Game state and core simulation types
//!
//! Everything needed to resume a run lives here and serializes with serde.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::grid::{FullLines, Grid};
use super::scoring::ClearFeedback;
use super::shape::{Crystal, Shape, catalog, shape};
use crate::consts::TRAY_SIZE;

/// Current phase of play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for a placement
    Playing,
    /// Next board tap fires the hammer
    HammerArmed,
    /// No tray piece fits anywhere
    GameOver,
}

/// A piece waiting in the tray
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrayPiece {
    /// Index into the shape catalog
    pub shape_id: usize,
    pub color: Crystal,
}

impl TrayPiece {
    pub fn shape(&self) -> &'static Shape {
        // shape_id always comes from the catalog
        shape(self.shape_id).unwrap_or(&catalog()[0])
    }
}

/// Something the front-end should react to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Placed {
        slot: usize,
        x: i32,
        y: i32,
        blocks: usize,
        points: u64,
    },
    LinesCleared {
        lines: FullLines,
        cells: usize,
        streak: u32,
        points: u64,
        feedback: ClearFeedback,
    },
    TrayRefilled,
    HammerArmed,
    HammerDisarmed,
    HammerBlast {
        x: i32,
        y: i32,
        destroyed: usize,
        points: u64,
    },
    Shuffled,
    NewRecord {
        score: u64,
    },
    GameOver {
        score: u64,
        best: u64,
    },
    Restarted,
}

/// Seeded RNG, stored as seed plus draw count so it survives serialization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
    pub draws: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed, draws: 0 }
    }

    /// Fresh generator for the next batch of draws
    pub fn next_rng(&mut self) -> Pcg32 {
        let stream_seed = self
            .seed
            .wrapping_add(self.draws.wrapping_mul(0x9E37_79B9_7F4A_7C15));
        self.draws += 1;
        Pcg32::seed_from_u64(stream_seed)
    }
}

/// Run statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStats {
    pub moves: u32,
    pub blocks_placed: u32,
    pub lines_cleared: u32,
    pub best_streak: u32,
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng_state: RngState,
    pub grid: Grid,
    /// Pieces on offer; a slot empties once its piece is placed
    pub tray: [Option<TrayPiece>; TRAY_SIZE],
    pub score: u64,
    /// Best score known to this session (seeded from saves)
    pub best_score: u64,
    /// Consecutive placements that cleared at least one line
    pub combo_streak: u32,
    pub phase: GamePhase,
    /// NewRecord already announced this run
    pub record_celebrated: bool,
    pub stats: RunStats,
    /// Events not yet drained by the front-end
    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new game with the given seed
    pub fn new(seed: u64) -> Self {
        let mut state = Self {
            seed,
            rng_state: RngState::new(seed),
            grid: Grid::new(),
            tray: [None; TRAY_SIZE],
            score: 0,
            best_score: 0,
            combo_streak: 0,
            phase: GamePhase::Playing,
            record_celebrated: false,
            stats: RunStats::default(),
            events: Vec::new(),
        };
        state.refill_tray();
        state.events.clear();
        state
    }

    /// New game that remembers a previously saved best score
    pub fn with_best(seed: u64, best_score: u64) -> Self {
        let mut state = Self::new(seed);
        state.best_score = best_score;
        state
    }

    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Replace every tray slot with a random piece
    pub fn refill_tray(&mut self) {
        let mut rng = self.rng_state.next_rng();
        let shapes = catalog().len();
        for slot in self.tray.iter_mut() {
            *slot = Some(TrayPiece {
                shape_id: rng.random_range(0..shapes),
                color: Crystal::ALL[rng.random_range(0..Crystal::ALL.len())],
            });
        }
        self.events.push(GameEvent::TrayRefilled);
    }

    pub fn tray_is_empty(&self) -> bool {
        self.tray.iter().all(Option::is_none)
    }

    /// Per slot: does the piece fit somewhere? Empty slots report false.
    pub fn tray_fit_mask(&self) -> [bool; TRAY_SIZE] {
        let mut mask = [false; TRAY_SIZE];
        for (i, slot) in self.tray.iter().enumerate() {
            if let Some(piece) = slot {
                mask[i] = self.grid.can_place_anywhere(piece.shape());
            }
        }
        mask
    }

    /// Add points and raise the best score if passed
    pub fn add_score(&mut self, points: u64) {
        self.score += points;
        if self.score > self.best_score {
            self.best_score = self.score;
            if !self.record_celebrated && points > 0 {
                self.record_celebrated = true;
                self.events.push(GameEvent::NewRecord { score: self.score });
            }
        }
    }

    /// Take pending events for the front-end
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_game_has_full_tray() {
        let state = GameState::new(42);
        assert!(state.tray.iter().all(Option::is_some));
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.score, 0);
        assert!(state.grid.is_empty());
        assert!(state.events.is_empty());
        assert_eq!(state.tray_fit_mask(), [true; TRAY_SIZE]);
    }

    #[test]
    fn test_same_seed_same_tray() {
        let a = GameState::new(7);
        let b = GameState::new(7);
        assert_eq!(a.tray, b.tray);
        assert_eq!(a.rng_state, b.rng_state);
    }

    #[test]
    fn test_rng_draws_advance() {
        let mut rng = RngState::new(1);
        let mut a = rng.next_rng();
        let mut b = rng.next_rng();
        assert_eq!(rng.draws, 2);
        let xs: Vec<u32> = (0..4).map(|_| a.random()).collect();
        let ys: Vec<u32> = (0..4).map(|_| b.random()).collect();
        assert_ne!(xs, ys);
    }

    #[test]
    fn test_new_record_fires_once() {
        let mut state = GameState::with_best(1, 100);
        state.add_score(50);
        assert!(state.drain_events().is_empty());
        state.add_score(60);
        assert_eq!(state.best_score, 110);
        assert_eq!(state.drain_events(), vec![GameEvent::NewRecord { score: 110 }]);
        state.add_score(10);
        assert_eq!(state.best_score, 120);
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_state_serde_roundtrip_keeps_rng() {
        let state = GameState::new(99);
        let json = serde_json::to_string(&state).unwrap();
        let mut restored: GameState = serde_json::from_str(&json).unwrap();
        let mut original = state.clone();
        restored.refill_tray();
        original.refill_tray();
        assert_eq!(restored.tray, original.tray);
    }
}
