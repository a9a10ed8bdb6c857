//! Sudoku cell selection and fill
//!
//! Writes are not checked against row/column/box constraints and there is no
//! completion detection; the board is a scratch pad over a fixed puzzle.

use serde::{Deserialize, Serialize};

pub type Grid = [[u8; 9]; 9];

/// Demo puzzle, 0 = empty
pub const INITIAL_BOARD: Grid = [
    [5, 3, 0, 0, 7, 0, 0, 0, 0],
    [6, 0, 0, 1, 9, 5, 0, 0, 0],
    [0, 9, 8, 0, 0, 0, 0, 6, 0],
    [8, 0, 0, 0, 6, 0, 0, 0, 3],
    [4, 0, 0, 8, 0, 3, 0, 0, 1],
    [7, 0, 0, 0, 2, 0, 0, 0, 6],
    [0, 6, 0, 0, 0, 0, 2, 8, 0],
    [0, 0, 0, 4, 1, 9, 0, 0, 5],
    [0, 0, 0, 0, 8, 0, 0, 7, 9],
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sudoku {
    /// Immutable puzzle; non-zero cells are givens
    given: Grid,
    pub board: Grid,
    pub selected: Option<(usize, usize)>,
}

impl Default for Sudoku {
    fn default() -> Self {
        Self::new()
    }
}

impl Sudoku {
    pub fn new() -> Self {
        Self::with_puzzle(INITIAL_BOARD)
    }

    pub fn with_puzzle(given: Grid) -> Self {
        Self {
            given,
            board: given,
            selected: None,
        }
    }

    pub fn is_given(&self, row: usize, col: usize) -> bool {
        self.given
            .get(row)
            .and_then(|r| r.get(col))
            .is_some_and(|&v| v != 0)
    }

    /// Select an editable cell. Givens and out-of-range cells are ignored.
    pub fn select(&mut self, row: usize, col: usize) -> bool {
        if row >= 9 || col >= 9 || self.is_given(row, col) {
            log::debug!("Sudoku select ignored at ({row}, {col})");
            return false;
        }
        self.selected = Some((row, col));
        true
    }

    /// Write a digit 1-9 into the selected cell
    pub fn input(&mut self, digit: u8) -> bool {
        if !(1..=9).contains(&digit) {
            return false;
        }
        let Some((row, col)) = self.selected else {
            return false;
        };
        self.board[row][col] = digit;
        true
    }

    pub fn reset(&mut self) {
        self.board = self.given;
        self.selected = None;
    }
}
