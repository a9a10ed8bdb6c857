//! Tic-Tac-Toe

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mark {
    X,
    O,
}

impl Mark {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mark::X => "X",
            Mark::O => "O",
        }
    }

    pub fn other(self) -> Self {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }
}

pub type Board = [Option<Mark>; 9];

/// Rows, columns, diagonals
pub const LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

/// The mark occupying a complete line, if any
pub fn check_winner(board: &Board) -> Option<Mark> {
    LINES.iter().find_map(|&[a, b, c]| match board[a] {
        Some(m) if board[b] == Some(m) && board[c] == Some(m) => Some(m),
        _ => None,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TicTacToeStatus {
    Next(Mark),
    Winner(Mark),
    Draw,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicTacToe {
    pub board: Board,
    pub x_next: bool,
}

impl Default for TicTacToe {
    fn default() -> Self {
        Self::new()
    }
}

impl TicTacToe {
    pub fn new() -> Self {
        Self {
            board: [None; 9],
            x_next: true,
        }
    }

    pub fn current(&self) -> Mark {
        if self.x_next { Mark::X } else { Mark::O }
    }

    pub fn winner(&self) -> Option<Mark> {
        check_winner(&self.board)
    }

    pub fn status(&self) -> TicTacToeStatus {
        if let Some(m) = self.winner() {
            TicTacToeStatus::Winner(m)
        } else if self.board.iter().all(Option::is_some) {
            TicTacToeStatus::Draw
        } else {
            TicTacToeStatus::Next(self.current())
        }
    }

    /// Place the current mark. Returns false when the click was ignored.
    pub fn click(&mut self, slot: usize) -> bool {
        if self.winner().is_some() {
            return false;
        }
        match self.board.get(slot) {
            Some(None) => {}
            _ => return false,
        }

        self.board[slot] = Some(self.current());
        self.x_next = !self.x_next;

        if let Some(m) = self.winner() {
            log::info!("Tic-tac-toe won by {}", m.as_str());
        }
        true
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_top_row_wins() {
        let mut board: Board = [None; 9];
        board[0] = Some(Mark::X);
        board[1] = Some(Mark::X);
        board[2] = Some(Mark::X);
        assert_eq!(check_winner(&board), Some(Mark::X));
    }

    #[test]
    fn test_clicks_after_win_are_ignored() {
        let mut game = TicTacToe::new();
        // X: 0 1 2, O: 3 4
        for slot in [0, 3, 1, 4, 2] {
            assert!(game.click(slot));
        }
        assert_eq!(game.status(), TicTacToeStatus::Winner(Mark::X));

        let before = game.board;
        assert!(!game.click(8));
        assert_eq!(game.board, before);
    }

    #[test]
    fn test_occupied_and_out_of_range() {
        let mut game = TicTacToe::new();
        assert!(game.click(4));
        assert!(!game.click(4));
        assert!(!game.click(9));
        assert_eq!(game.current(), Mark::O);
    }

    #[test]
    fn test_draw_and_reset() {
        let mut game = TicTacToe::new();
        // X O X / X O O / O X X
        for slot in [0, 1, 2, 4, 3, 5, 7, 6, 8] {
            assert!(game.click(slot));
        }
        assert_eq!(game.status(), TicTacToeStatus::Draw);

        game.reset();
        assert_eq!(game.board, [None; 9]);
        assert_eq!(game.status(), TicTacToeStatus::Next(Mark::X));
    }

    fn cell() -> impl Strategy<Value = Option<Mark>> {
        prop_oneof![Just(None), Just(Some(Mark::X)), Just(Some(Mark::O))]
    }

    proptest! {
        #[test]
        fn prop_winner_iff_full_line(cells in proptest::array::uniform9(cell())) {
            let winner = check_winner(&cells);
            let full_lines: Vec<Mark> = LINES
                .iter()
                .filter_map(|&[a, b, c]| match cells[a] {
                    Some(m) if cells[b] == Some(m) && cells[c] == Some(m) => Some(m),
                    _ => None,
                })
                .collect();
            prop_assert_eq!(winner.is_some(), !full_lines.is_empty());
            if let Some(m) = winner {
                prop_assert!(full_lines.contains(&m));
            }
        }
    }
}
