//! The 8x8 board
//!
//! Cells are addressed as `(x, y)` with `x` the column and `y` the row.
//! Storage is row-major: `cells[y][x]`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::shape::{Crystal, Shape};
use crate::consts::GRID_SIZE;

const N: i32 = GRID_SIZE as i32;

/// Why a shape could not be placed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PlacementError {
    #[error("cell ({x}, {y}) is outside the board")]
    OutOfBounds { x: i32, y: i32 },
    #[error("cell ({x}, {y}) is already occupied")]
    Occupied { x: i32, y: i32 },
}

/// Rows and columns that are completely filled
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FullLines {
    pub rows: Vec<usize>,
    pub cols: Vec<usize>,
}

impl FullLines {
    pub fn count(&self) -> usize {
        self.rows.len() + self.cols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() && self.cols.is_empty()
    }
}

/// Board of crystal cells
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    cells: [[Option<Crystal>; GRID_SIZE]; GRID_SIZE],
}

#[inline]
fn in_bounds(x: i32, y: i32) -> bool {
    (0..N).contains(&x) && (0..N).contains(&y)
}

impl Grid {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cell contents, or None when empty or off the board
    pub fn get(&self, x: i32, y: i32) -> Option<Crystal> {
        if !in_bounds(x, y) {
            return None;
        }
        self.cells[y as usize][x as usize]
    }

    pub fn is_occupied(&self, x: i32, y: i32) -> bool {
        self.get(x, y).is_some()
    }

    /// Set a single cell (used by tests and save restore)
    pub fn set(&mut self, x: i32, y: i32, value: Option<Crystal>) -> Result<(), PlacementError> {
        if !in_bounds(x, y) {
            return Err(PlacementError::OutOfBounds { x, y });
        }
        self.cells[y as usize][x as usize] = value;
        Ok(())
    }

    /// Rows, top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[Option<Crystal>; GRID_SIZE]> {
        self.cells.iter()
    }

    /// Every cell as `(x, y, contents)`
    pub fn iter(&self) -> impl Iterator<Item = (i32, i32, Option<Crystal>)> + '_ {
        self.cells.iter().enumerate().flat_map(|(y, row)| {
            row.iter()
                .enumerate()
                .map(move |(x, c)| (x as i32, y as i32, *c))
        })
    }

    pub fn occupied(&self) -> usize {
        self.cells.iter().flatten().filter(|c| c.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.occupied() == 0
    }

    pub fn clear_all(&mut self) {
        self.cells = Default::default();
    }

    /// First blocking cell for `shape` at origin `(x, y)`, if any
    fn check(&self, shape: &Shape, x: i32, y: i32) -> Result<(), PlacementError> {
        for &(dx, dy) in shape.cells() {
            let (gx, gy) = (x + dx, y + dy);
            if !in_bounds(gx, gy) {
                return Err(PlacementError::OutOfBounds { x: gx, y: gy });
            }
            if self.cells[gy as usize][gx as usize].is_some() {
                return Err(PlacementError::Occupied { x: gx, y: gy });
            }
        }
        Ok(())
    }

    /// Whether `shape` fits with its origin at `(x, y)`
    pub fn fits(&self, shape: &Shape, x: i32, y: i32) -> bool {
        self.check(shape, x, y).is_ok()
    }

    /// Whether `shape` fits at any origin on the board
    pub fn can_place_anywhere(&self, shape: &Shape) -> bool {
        (0..N).any(|y| (0..N).any(|x| self.fits(shape, x, y)))
    }

    /// Every origin where `shape` fits, row by row
    pub fn placements<'a>(&'a self, shape: &'a Shape) -> impl Iterator<Item = (i32, i32)> + 'a {
        (0..N)
            .flat_map(|y| (0..N).map(move |x| (x, y)))
            .filter(move |&(x, y)| self.fits(shape, x, y))
    }

    /// Place `shape` at `(x, y)`. All-or-nothing: the board is untouched on error.
    /// Returns the number of blocks written.
    pub fn place(
        &mut self,
        shape: &Shape,
        x: i32,
        y: i32,
        color: Crystal,
    ) -> Result<usize, PlacementError> {
        self.check(shape, x, y)?;
        for &(dx, dy) in shape.cells() {
            self.cells[(y + dy) as usize][(x + dx) as usize] = Some(color);
        }
        Ok(shape.block_count())
    }

    /// Scan for full rows and columns against the current board
    pub fn full_lines(&self) -> FullLines {
        let rows = (0..GRID_SIZE)
            .filter(|&y| self.cells[y].iter().all(Option::is_some))
            .collect();
        let cols = (0..GRID_SIZE)
            .filter(|&x| (0..GRID_SIZE).all(|y| self.cells[y][x].is_some()))
            .collect();
        FullLines { rows, cols }
    }

    /// Empty every cell in the given lines. Returns distinct cells emptied.
    pub fn clear(&mut self, lines: &FullLines) -> usize {
        let mut emptied = 0;
        for &y in &lines.rows {
            for x in 0..GRID_SIZE {
                if self.cells[y][x].take().is_some() {
                    emptied += 1;
                }
            }
        }
        for &x in &lines.cols {
            for y in 0..GRID_SIZE {
                if self.cells[y][x].take().is_some() {
                    emptied += 1;
                }
            }
        }
        emptied
    }

    /// Empty the 3x3 area centred on `(x, y)`, clipped to the board.
    /// Returns the number of occupied cells destroyed.
    pub fn hammer(&mut self, x: i32, y: i32) -> usize {
        let mut destroyed = 0;
        for dy in -1..=1 {
            for dx in -1..=1 {
                let (gx, gy) = (x + dx, y + dy);
                if in_bounds(gx, gy) && self.cells[gy as usize][gx as usize].take().is_some() {
                    destroyed += 1;
                }
            }
        }
        destroyed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::shape::{shape, shape_id};

    fn named(name: &str) -> &'static Shape {
        shape(shape_id(name).unwrap()).unwrap()
    }

    fn fill_row(grid: &mut Grid, y: i32) {
        for x in 0..N {
            grid.set(x, y, Some(Crystal::Blue)).unwrap();
        }
    }

    #[test]
    fn test_fits_empty_board() {
        let grid = Grid::new();
        let rect = named("rect3x2");
        assert!(grid.fits(rect, 0, 0));
        assert!(grid.fits(rect, 5, 6));
        assert!(!grid.fits(rect, 6, 0));
        assert!(!grid.fits(rect, 0, 7));
        assert!(!grid.fits(rect, -1, 0));
    }

    #[test]
    fn test_place_is_all_or_nothing() {
        let mut grid = Grid::new();
        grid.set(2, 0, Some(Crystal::Red)).unwrap();

        let bar = named("bar3_h");
        assert_eq!(
            grid.place(bar, 0, 0, Crystal::Green),
            Err(PlacementError::Occupied { x: 2, y: 0 })
        );
        assert_eq!(grid.occupied(), 1);

        assert_eq!(
            grid.place(bar, 6, 3, Crystal::Green),
            Err(PlacementError::OutOfBounds { x: 8, y: 3 })
        );
        assert_eq!(grid.occupied(), 1);

        assert_eq!(grid.place(bar, 3, 0, Crystal::Green), Ok(3));
        assert_eq!(grid.get(5, 0), Some(Crystal::Green));
    }

    #[test]
    fn test_full_row_and_column_share_intersection() {
        let mut grid = Grid::new();
        fill_row(&mut grid, 3);
        for y in 0..N {
            grid.set(5, y, Some(Crystal::Red)).unwrap();
        }

        let lines = grid.full_lines();
        assert_eq!(lines.rows, vec![3]);
        assert_eq!(lines.cols, vec![5]);
        assert_eq!(lines.count(), 2);

        // 8 + 8 - 1 shared cell
        assert_eq!(grid.clear(&lines), 15);
        assert!(grid.is_empty());
    }

    #[test]
    fn test_partial_row_not_full() {
        let mut grid = Grid::new();
        for x in 0..N - 1 {
            grid.set(x, 0, Some(Crystal::Red)).unwrap();
        }
        assert!(grid.full_lines().is_empty());
    }

    #[test]
    fn test_can_place_anywhere() {
        let mut grid = Grid::new();
        // Checkerboard leaves no two adjacent empty cells
        for (x, y, _) in grid.clone().iter() {
            if (x + y) % 2 == 0 {
                grid.set(x, y, Some(Crystal::Yellow)).unwrap();
            }
        }
        assert!(grid.can_place_anywhere(named("single")));
        assert!(!grid.can_place_anywhere(named("domino_h")));
        assert!(!grid.can_place_anywhere(named("domino_v")));
        assert_eq!(grid.placements(named("single")).count(), 32);
    }

    #[test]
    fn test_hammer_clips_to_board() {
        let mut grid = Grid::new();
        fill_row(&mut grid, 0);
        fill_row(&mut grid, 1);
        // Corner blast only reaches 2x2
        assert_eq!(grid.hammer(0, 0), 4);
        assert_eq!(grid.occupied(), 12);
        // Centre blast on rows 0..=2 hits 3 + 3 occupied
        assert_eq!(grid.hammer(4, 1), 6);
        assert_eq!(grid.occupied(), 6);
    }
}
