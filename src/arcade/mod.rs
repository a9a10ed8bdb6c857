//! The games arcade: catalog, one live game at a time, uniform input
//!
//! The platform layer only ever talks to `Arcade`: it forwards DOM events as
//! `GameInput`, advances the clock from `requestAnimationFrame` and paints
//! the returned `Frame`.

pub mod view;

pub use view::{Action, CellView, Frame};

use crate::games::{
    Choice, Direction, MemoryGame, RpsGame, SnakeGame, SnakePhase, Sudoku, TicTacToe, TypingTest,
    WhackGame,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameKind {
    Memory,
    Sudoku,
    Whack,
    TicTacToe,
    Snake,
    Rps,
    Typing,
}

impl GameKind {
    /// Catalog order
    pub const ALL: [GameKind; 7] = [
        GameKind::Memory,
        GameKind::Sudoku,
        GameKind::Whack,
        GameKind::TicTacToe,
        GameKind::Snake,
        GameKind::Rps,
        GameKind::Typing,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GameKind::Memory => "memory",
            GameKind::Sudoku => "sudoku",
            GameKind::Whack => "whack",
            GameKind::TicTacToe => "tictactoe",
            GameKind::Snake => "snake",
            GameKind::Rps => "rps",
            GameKind::Typing => "typing",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == id)
    }

    pub fn title(&self) -> &'static str {
        match self {
            GameKind::Memory => "Skill Match",
            GameKind::Sudoku => "Sudoku",
            GameKind::Whack => "Whack-a-Smiley",
            GameKind::TicTacToe => "Tic Tac Toe",
            GameKind::Snake => "Snake",
            GameKind::Rps => "Rock Paper Scissors",
            GameKind::Typing => "Speed Typing",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            GameKind::Memory => "Flip cards to match the tech stack icons. Test your memory!",
            GameKind::Sudoku => {
                "Classic number puzzle. Fill the grid so every row, column, and 3x3 box contains 1-9."
            }
            GameKind::Whack => "Test your reflexes! Whack the smiling emojis before they disappear.",
            GameKind::TicTacToe => {
                "The classic X and O game. Challenge a friend or play against yourself."
            }
            GameKind::Snake => {
                "Navigate the snake to eat food and grow. Avoid hitting the walls or yourself!"
            }
            GameKind::Rps => "The classic game of chance. Play against the computer.",
            GameKind::Typing => "Test your typing speed (WPM) with a random paragraph.",
        }
    }

    /// Accent color for the catalog card
    pub fn color(&self) -> &'static str {
        match self {
            GameKind::Memory => "#673ab7",
            GameKind::Sudoku => "#4dabf5",
            GameKind::Whack => "#ff9800",
            GameKind::TicTacToe => "#f44336",
            GameKind::Snake => "#4caf50",
            GameKind::Rps => "#9c27b0",
            GameKind::Typing => "#607d8b",
        }
    }
}

/// Everything a player can do, independent of which game is open
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameInput {
    /// Click on the n-th cell of the game's grid
    Cell(usize),
    /// `KeyboardEvent.key`
    Key(String),
    /// Full contents of a text field
    Text(String),
    Digit(u8),
    Choice(Choice),
    Start,
    Pause,
    Reset,
}

/// One live engine
#[derive(Debug, Clone)]
pub enum Game {
    Memory(MemoryGame),
    Sudoku(Sudoku),
    Whack(WhackGame),
    TicTacToe(TicTacToe),
    Snake(SnakeGame),
    Rps(RpsGame),
    Typing(TypingTest),
}

impl Game {
    pub fn new(kind: GameKind, seed: u64) -> Self {
        match kind {
            GameKind::Memory => Game::Memory(MemoryGame::new(seed)),
            GameKind::Sudoku => Game::Sudoku(Sudoku::new()),
            GameKind::Whack => Game::Whack(WhackGame::new(seed)),
            GameKind::TicTacToe => Game::TicTacToe(TicTacToe::new()),
            GameKind::Snake => Game::Snake(SnakeGame::new(seed)),
            GameKind::Rps => Game::Rps(RpsGame::new(seed)),
            GameKind::Typing => Game::Typing(TypingTest::new()),
        }
    }

    pub fn kind(&self) -> GameKind {
        match self {
            Game::Memory(_) => GameKind::Memory,
            Game::Sudoku(_) => GameKind::Sudoku,
            Game::Whack(_) => GameKind::Whack,
            Game::TicTacToe(_) => GameKind::TicTacToe,
            Game::Snake(_) => GameKind::Snake,
            Game::Rps(_) => GameKind::Rps,
            Game::Typing(_) => GameKind::Typing,
        }
    }

    /// Route one input. Returns false when the game ignored it.
    pub fn handle(&mut self, input: &GameInput, now_ms: u64) -> bool {
        match (self, input) {
            (Game::Memory(g), GameInput::Cell(i)) => g.click(*i),
            (Game::Memory(g), GameInput::Reset) => {
                g.reset();
                true
            }

            (Game::Sudoku(g), GameInput::Cell(i)) => g.select(i / 9, i % 9),
            (Game::Sudoku(g), GameInput::Digit(d)) => g.input(*d),
            (Game::Sudoku(g), GameInput::Key(k)) => match parse_digit(k) {
                Some(d) => g.input(d),
                None => false,
            },
            (Game::Sudoku(g), GameInput::Reset) => {
                g.reset();
                true
            }

            (Game::Whack(g), GameInput::Cell(i)) => g.whack(*i),
            (Game::Whack(g), GameInput::Start) => {
                g.start();
                true
            }
            (Game::Whack(g), GameInput::Reset) => {
                g.reset();
                true
            }

            (Game::TicTacToe(g), GameInput::Cell(i)) => g.click(*i),
            (Game::TicTacToe(g), GameInput::Reset) => {
                g.reset();
                true
            }

            (Game::Snake(g), GameInput::Key(k)) => match (Direction::from_key(k), k.as_str()) {
                (Some(dir), _) => g.steer(dir),
                (None, " ") => {
                    g.toggle_pause();
                    true
                }
                _ => false,
            },
            (Game::Snake(g), GameInput::Start) => {
                let was = g.phase;
                g.start();
                g.phase != was
            }
            (Game::Snake(g), GameInput::Pause) => {
                let was = g.phase;
                g.pause();
                g.phase != was
            }
            (Game::Snake(g), GameInput::Reset) => {
                g.reset();
                true
            }

            (Game::Rps(g), GameInput::Choice(c)) => g.play(*c),
            (Game::Rps(g), GameInput::Reset) => {
                g.reset();
                true
            }

            (Game::Typing(g), GameInput::Text(value)) => g.input(value, now_ms),
            (Game::Typing(g), GameInput::Reset) => {
                g.reset();
                true
            }

            (game, input) => {
                log::debug!("{} ignores {input:?}", game.kind().as_str());
                false
            }
        }
    }

    /// Move the game's own clock forward
    pub fn advance(&mut self, dt_ms: u64) {
        match self {
            Game::Memory(g) => g.advance(dt_ms),
            Game::Whack(g) => g.advance(dt_ms),
            Game::Snake(g) => g.advance(dt_ms),
            Game::Rps(g) => g.advance(dt_ms),
            Game::Sudoku(_) | Game::TicTacToe(_) | Game::Typing(_) => {}
        }
    }

    /// Keys the game wants to swallow (arrow keys would scroll the page)
    pub fn captures_key(&self, key: &str) -> bool {
        match self {
            Game::Snake(_) => Direction::from_key(key).is_some() || key == " ",
            Game::Sudoku(_) => parse_digit(key).is_some(),
            _ => false,
        }
    }

    /// Pause play that needs the player's attention. Timed games that run on
    /// a wall clock (whack countdown, typing timestamps) keep going.
    pub fn suspend(&mut self) -> bool {
        match self {
            Game::Snake(g) if g.phase == SnakePhase::Running => {
                g.pause();
                true
            }
            _ => false,
        }
    }

    /// Whether `advance` can change what is on screen
    pub fn is_animating(&self) -> bool {
        match self {
            Game::Memory(g) => g.locked,
            Game::Whack(g) => g.playing,
            Game::Snake(g) => g.phase == SnakePhase::Running,
            Game::Rps(g) => g.is_shuffling(),
            Game::Sudoku(_) | Game::TicTacToe(_) | Game::Typing(_) => false,
        }
    }
}

fn parse_digit(key: &str) -> Option<u8> {
    match key.as_bytes() {
        [b @ b'1'..=b'9'] => Some(b - b'0'),
        _ => None,
    }
}

/// Host for the currently open game
#[derive(Debug, Default)]
pub struct Arcade {
    clock_ms: u64,
    game: Option<Game>,
}

impl Arcade {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn catalog() -> &'static [GameKind] {
        &GameKind::ALL
    }

    /// Open a game, replacing (and dropping) whatever was open
    pub fn launch(&mut self, kind: GameKind, seed: u64) -> &mut Game {
        log::info!("Launching {}", kind.as_str());
        self.game.insert(Game::new(kind, seed))
    }

    pub fn close(&mut self) {
        if let Some(game) = self.game.take() {
            log::info!("Closed {}", game.kind().as_str());
        }
    }

    pub fn game(&self) -> Option<&Game> {
        self.game.as_ref()
    }

    pub fn handle(&mut self, input: GameInput) -> bool {
        let now = self.clock_ms;
        match self.game.as_mut() {
            Some(game) => game.handle(&input, now),
            None => false,
        }
    }

    pub fn advance(&mut self, dt_ms: u64) {
        self.clock_ms += dt_ms;
        if let Some(game) = self.game.as_mut() {
            game.advance(dt_ms);
        }
    }

    /// Called when the page is hidden or loses focus
    pub fn suspend(&mut self) -> bool {
        match self.game.as_mut() {
            Some(game) => {
                if game.suspend() {
                    log::info!("Paused {} while away", game.kind().as_str());
                    true
                } else {
                    false
                }
            }
            _ => false,
        }
    }

    pub fn is_animating(&self) -> bool {
        self.game.as_ref().is_some_and(Game::is_animating)
    }

    pub fn frame(&self) -> Option<Frame> {
        self.game.as_ref().map(Frame::of)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_ids_roundtrip() {
        for kind in GameKind::ALL {
            assert_eq!(GameKind::from_id(kind.as_str()), Some(kind));
            assert!(kind.color().starts_with('#'));
        }
        assert_eq!(GameKind::from_id("chess"), None);
        assert_eq!(Arcade::catalog().len(), 7);
    }

    #[test]
    fn test_launch_replaces_game() {
        let mut arcade = Arcade::new();
        assert!(!arcade.handle(GameInput::Reset));
        arcade.launch(GameKind::TicTacToe, 1);
        assert!(arcade.handle(GameInput::Cell(4)));
        assert!(!arcade.handle(GameInput::Cell(4)));

        arcade.launch(GameKind::Memory, 1);
        assert_eq!(arcade.game().unwrap().kind(), GameKind::Memory);
        arcade.close();
        assert!(arcade.game().is_none());
        assert!(arcade.frame().is_none());
    }

    #[test]
    fn test_mismatched_input_ignored() {
        let mut game = Game::new(GameKind::TicTacToe, 0);
        assert!(!game.handle(&GameInput::Key("ArrowUp".into()), 0));
        assert!(!game.handle(&GameInput::Choice(Choice::Rock), 0));
    }

    #[test]
    fn test_typing_uses_arcade_clock() {
        let mut arcade = Arcade::new();
        arcade.launch(GameKind::Typing, 0);
        let reference = match arcade.game() {
            Some(Game::Typing(t)) => t.reference().to_string(),
            _ => unreachable!(),
        };
        let words = reference.split_whitespace().count() as u32;

        arcade.advance(5_000);
        arcade.handle(GameInput::Text("T".into()));
        arcade.advance(60_000);
        arcade.handle(GameInput::Text(reference));
        match arcade.game() {
            Some(Game::Typing(t)) => assert_eq!(t.wpm, Some(words)),
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_snake_keys_and_clock() {
        let mut arcade = Arcade::new();
        arcade.launch(GameKind::Snake, 9);
        assert!(arcade.handle(GameInput::Start));
        assert!(!arcade.handle(GameInput::Start));
        assert!(arcade.handle(GameInput::Key("ArrowLeft".into())));
        assert!(!arcade.handle(GameInput::Key("a".into())));
        arcade.advance(150);
        match arcade.game() {
            Some(Game::Snake(s)) => assert_eq!(s.head(), glam::IVec2::new(6, 7)),
            _ => unreachable!(),
        }
        assert!(arcade.handle(GameInput::Key(" ".into())));
        match arcade.game() {
            Some(Game::Snake(s)) => assert_eq!(s.phase, SnakePhase::Paused),
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_sudoku_digit_keys() {
        let mut game = Game::new(GameKind::Sudoku, 0);
        // (0, 2) is empty in the demo puzzle
        assert!(game.handle(&GameInput::Cell(2), 0));
        assert!(game.handle(&GameInput::Key("4".into()), 0));
        assert!(!game.handle(&GameInput::Key("0".into()), 0));
        assert!(!game.handle(&GameInput::Key("Enter".into()), 0));
        match &game {
            Game::Sudoku(s) => assert_eq!(s.board[0][2], 4),
            _ => unreachable!(),
        }
        assert!(game.captures_key("7"));
        assert!(!game.captures_key("ArrowUp"));
    }

    #[test]
    fn test_memory_resolves_through_arcade_clock() {
        let mut arcade = Arcade::new();
        arcade.launch(GameKind::Memory, 5);
        let (a, b) = match arcade.game() {
            Some(Game::Memory(m)) => {
                let first = m.cards[0];
                let other = (1..m.cards.len()).find(|&i| m.cards[i] != first).unwrap();
                (0, other)
            }
            _ => unreachable!(),
        };
        arcade.handle(GameInput::Cell(a));
        arcade.handle(GameInput::Cell(b));
        assert!(arcade.game().unwrap().is_animating());
        arcade.advance(1_000);
        assert!(!arcade.game().unwrap().is_animating());
    }

    #[test]
    fn test_suspend_stops_snake_over_long_gap() {
        let mut arcade = Arcade::new();
        arcade.launch(GameKind::Snake, 3);
        arcade.handle(GameInput::Start);
        arcade.advance(16);
        let head = match arcade.game() {
            Some(Game::Snake(s)) => s.head(),
            _ => unreachable!(),
        };

        assert!(arcade.suspend());
        assert!(!arcade.suspend());
        arcade.advance(3_000);
        match arcade.game() {
            Some(Game::Snake(s)) => {
                assert_eq!(s.phase, SnakePhase::Paused);
                assert_eq!(s.head(), head);
            }
            _ => unreachable!(),
        }
        assert!(!arcade.is_animating());

        arcade.handle(GameInput::Start);
        arcade.advance(150);
        match arcade.game() {
            Some(Game::Snake(s)) => assert_eq!(s.head(), head + glam::IVec2::new(0, -1)),
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_suspend_keeps_whack_countdown() {
        let mut arcade = Arcade::new();
        arcade.launch(GameKind::Whack, 3);
        arcade.handle(GameInput::Start);
        assert!(!arcade.suspend());
        arcade.advance(3_000);
        match arcade.game() {
            Some(Game::Whack(w)) => assert_eq!(w.time_left, crate::games::whack::GAME_SECONDS - 3),
            _ => unreachable!(),
        }
    }
}
