//! Mini-game engines
//!
//! Each engine owns its state and transition rules and shares nothing with
//! the others. Timed engines expose `advance(dt_ms)` and keep every pending
//! transition in their own `Timers` queue.

pub mod memory;
pub mod rps;
pub mod snake;
pub mod sudoku;
pub mod tictactoe;
pub mod typing;
pub mod whack;

pub use memory::{MemoryGame, Skill};
pub use rps::{Choice, Outcome, RpsGame, UnknownChoice};
pub use snake::{Direction, SnakeGame, SnakePhase};
pub use sudoku::Sudoku;
pub use tictactoe::{Mark, TicTacToe, TicTacToeStatus};
pub use typing::TypingTest;
pub use whack::WhackGame;
