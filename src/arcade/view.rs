//! Pure view snapshots
//!
//! A `Frame` is everything needed to paint a game: no DOM types, so every
//! view is testable natively.

use glam::IVec2;

use super::{Game, GameInput};
use crate::games::snake::GRID_SIZE;
use crate::games::tictactoe::TicTacToeStatus;
use crate::games::whack::HOLES;
use crate::games::{
    Choice, Mark, MemoryGame, RpsGame, SnakeGame, SnakePhase, Sudoku, TicTacToe, TypingTest,
    WhackGame,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellView {
    pub label: String,
    /// CSS modifier class
    pub class: &'static str,
}

impl CellView {
    fn new(label: impl Into<String>, class: &'static str) -> Self {
        Self {
            label: label.into(),
            class,
        }
    }

    fn blank(class: &'static str) -> Self {
        Self::new("", class)
    }
}

/// A button under the board
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    pub label: &'static str,
    pub input: GameInput,
}

impl Action {
    fn new(label: &'static str, input: GameInput) -> Self {
        Self { label, input }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub title: &'static str,
    pub status: String,
    /// Grid width; zero when the game has no grid
    pub columns: usize,
    pub cells: Vec<CellView>,
    pub actions: Vec<Action>,
    /// Passage to copy, for the typing test
    pub prompt: Option<String>,
    /// Whether a text field should be shown
    pub text_entry: bool,
}

impl Frame {
    pub fn of(game: &Game) -> Self {
        let mut frame = match game {
            Game::Memory(g) => memory(g),
            Game::Sudoku(g) => sudoku(g),
            Game::Whack(g) => whack(g),
            Game::TicTacToe(g) => tictactoe(g),
            Game::Snake(g) => snake(g),
            Game::Rps(g) => rps(g),
            Game::Typing(g) => typing(g),
        };
        frame.title = game.kind().title();
        frame
    }

    fn empty() -> Self {
        Self {
            title: "",
            status: String::new(),
            columns: 0,
            cells: Vec::new(),
            actions: Vec::new(),
            prompt: None,
            text_entry: false,
        }
    }
}

fn memory(g: &MemoryGame) -> Frame {
    if g.is_won() {
        return Frame {
            status: format!("All Systems Go! You matched all tech stacks in {} moves.", g.moves),
            actions: vec![Action::new("Play Again", GameInput::Reset)],
            ..Frame::empty()
        };
    }
    let cells = g
        .cards
        .iter()
        .enumerate()
        .map(|(i, card)| {
            if g.solved.contains(&i) {
                CellView::new(card.label(), "solved")
            } else if g.is_face_up(i) {
                CellView::new(card.label(), "face-up")
            } else {
                CellView::blank("face-down")
            }
        })
        .collect();
    Frame {
        status: format!("Moves: {}", g.moves),
        columns: 4,
        cells,
        actions: vec![Action::new("Restart", GameInput::Reset)],
        ..Frame::empty()
    }
}

fn sudoku(g: &Sudoku) -> Frame {
    let mut cells = Vec::with_capacity(81);
    for (r, row) in g.board.iter().enumerate() {
        for (c, &value) in row.iter().enumerate() {
            let label = if value == 0 {
                String::new()
            } else {
                value.to_string()
            };
            let class = if g.is_given(r, c) {
                "given"
            } else if g.selected == Some((r, c)) {
                "selected"
            } else if value != 0 {
                "filled"
            } else {
                "empty"
            };
            cells.push(CellView::new(label, class));
        }
    }
    let status = match g.selected {
        Some((r, c)) => format!("Row {}, column {}: type 1-9", r + 1, c + 1),
        None => "Select an empty cell".to_string(),
    };
    Frame {
        status,
        columns: 9,
        cells,
        actions: vec![Action::new("Reset Board", GameInput::Reset)],
        ..Frame::empty()
    }
}

fn whack(g: &WhackGame) -> Frame {
    let status = if g.is_over() {
        format!("Game Over! Score: {}", g.score)
    } else {
        format!("Score: {}  Time: {}s", g.score, g.time_left)
    };
    let cells = (0..HOLES)
        .map(|i| {
            if g.active == Some(i) {
                CellView::new("😀", "target")
            } else {
                CellView::blank("hole")
            }
        })
        .collect();
    let actions = if g.playing {
        Vec::new()
    } else if g.is_over() {
        vec![Action::new("Play Again", GameInput::Start)]
    } else {
        vec![Action::new("Start Game", GameInput::Start)]
    };
    Frame {
        status,
        columns: 3,
        cells,
        actions,
        ..Frame::empty()
    }
}

fn tictactoe(g: &TicTacToe) -> Frame {
    let status = match g.status() {
        TicTacToeStatus::Next(m) => format!("Next Player: {}", m.as_str()),
        TicTacToeStatus::Winner(m) => format!("Winner: {}", m.as_str()),
        TicTacToeStatus::Draw => "Draw!".to_string(),
    };
    let cells = g
        .board
        .iter()
        .map(|slot| match slot {
            Some(Mark::X) => CellView::new("X", "x"),
            Some(Mark::O) => CellView::new("O", "o"),
            None => CellView::blank("empty"),
        })
        .collect();
    Frame {
        status,
        columns: 3,
        cells,
        actions: vec![Action::new("Restart", GameInput::Reset)],
        ..Frame::empty()
    }
}

fn snake(g: &SnakeGame) -> Frame {
    let mut cells = Vec::with_capacity((GRID_SIZE * GRID_SIZE) as usize);
    for y in 0..GRID_SIZE {
        for x in 0..GRID_SIZE {
            let cell = IVec2::new(x, y);
            let class = if cell == g.head() {
                "head"
            } else if g.occupies(cell) {
                "body"
            } else if cell == g.food {
                "food"
            } else {
                "empty"
            };
            cells.push(CellView::blank(class));
        }
    }

    let mut status = format!("Score: {}", g.score);
    if g.is_game_over() {
        status.push_str("  Game Over!");
    }

    let mut actions = match g.phase {
        SnakePhase::GameOver => vec![Action::new("Try Again", GameInput::Reset)],
        SnakePhase::Ready | SnakePhase::Paused => vec![Action::new("Start", GameInput::Start)],
        SnakePhase::Running => vec![
            Action::new("Restart", GameInput::Reset),
            Action::new("Pause", GameInput::Pause),
        ],
    };
    for (label, key) in [
        ("↑", "ArrowUp"),
        ("←", "ArrowLeft"),
        ("↓", "ArrowDown"),
        ("→", "ArrowRight"),
    ] {
        actions.push(Action::new(label, GameInput::Key(key.to_string())));
    }

    Frame {
        status,
        columns: GRID_SIZE as usize,
        cells,
        actions,
        ..Frame::empty()
    }
}

fn hand(choice: Option<Choice>) -> &'static str {
    match choice {
        Some(Choice::Rock) => "✊",
        Some(Choice::Paper) => "✋",
        Some(Choice::Scissors) => "✌️",
        None => "❓",
    }
}

fn rps(g: &RpsGame) -> Frame {
    let status = match g.outcome {
        Some(outcome) => outcome.message().to_string(),
        None if g.is_shuffling() => "...".to_string(),
        None => "Choose your weapon!".to_string(),
    };
    let cells = vec![
        CellView::new(hand(g.player), "player"),
        CellView::new("VS", "versus"),
        CellView::new(hand(g.computer), "computer"),
    ];
    let mut actions: Vec<Action> = Choice::ALL
        .into_iter()
        .map(|c| Action::new(c.as_str(), GameInput::Choice(c)))
        .collect();
    if g.outcome.is_some() {
        actions.push(Action::new("Play Again", GameInput::Reset));
    }
    Frame {
        status,
        columns: 3,
        cells,
        actions,
        ..Frame::empty()
    }
}

fn typing(g: &TypingTest) -> Frame {
    match g.wpm {
        Some(wpm) => Frame {
            status: format!("{wpm} WPM. Great job! You finished the test."),
            actions: vec![Action::new("Try Again", GameInput::Reset)],
            prompt: Some(g.reference().to_string()),
            ..Frame::empty()
        },
        None => Frame {
            status: format!(
                "{}/{} characters correct",
                g.correct_prefix_len(),
                g.reference().chars().count()
            ),
            prompt: Some(g.reference().to_string()),
            text_entry: true,
            ..Frame::empty()
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arcade::GameKind;

    #[test]
    fn test_every_game_renders() {
        for kind in GameKind::ALL {
            let frame = Frame::of(&Game::new(kind, 1));
            assert_eq!(frame.title, kind.title());
            if frame.columns > 0 {
                assert_eq!(frame.cells.len() % frame.columns, 0);
            }
        }
    }

    #[test]
    fn test_snake_board() {
        let frame = Frame::of(&Game::new(GameKind::Snake, 1));
        assert_eq!(frame.cells.len(), 225);
        let at = |x: usize, y: usize| frame.cells[y * 15 + x].class;
        assert_eq!(at(7, 7), "head");
        assert_eq!(at(5, 5), "food");
        assert_eq!(frame.actions[0].input, GameInput::Start);
    }

    #[test]
    fn test_sudoku_classes() {
        let mut game = Game::new(GameKind::Sudoku, 0);
        game.handle(&GameInput::Cell(2), 0);
        let frame = Frame::of(&game);
        assert_eq!(frame.cells[0].class, "given");
        assert_eq!(frame.cells[0].label, "5");
        assert_eq!(frame.cells[2].class, "selected");
        assert_eq!(frame.cells[3].class, "empty");
    }

    #[test]
    fn test_tictactoe_status_line() {
        let mut game = Game::new(GameKind::TicTacToe, 0);
        for slot in [0, 3, 1, 4, 2] {
            game.handle(&GameInput::Cell(slot), 0);
        }
        let frame = Frame::of(&game);
        assert_eq!(frame.status, "Winner: X");
        assert_eq!(frame.cells[0].class, "x");
        assert_eq!(frame.cells[3].class, "o");
    }

    #[test]
    fn test_memory_faces_hidden_until_flipped() {
        let mut game = Game::new(GameKind::Memory, 3);
        let frame = Frame::of(&game);
        assert_eq!(frame.cells.len(), 12);
        assert!(frame.cells.iter().all(|c| c.class == "face-down" && c.label.is_empty()));

        game.handle(&GameInput::Cell(0), 0);
        let frame = Frame::of(&game);
        assert_eq!(frame.cells[0].class, "face-up");
        assert!(!frame.cells[0].label.is_empty());
    }

    #[test]
    fn test_typing_switches_to_result() {
        let mut game = Game::new(GameKind::Typing, 0);
        assert!(Frame::of(&game).text_entry);
        let reference = match &game {
            Game::Typing(t) => t.reference().to_string(),
            _ => unreachable!(),
        };
        game.handle(&GameInput::Text(reference), 0);
        let frame = Frame::of(&game);
        assert!(!frame.text_entry);
        assert!(frame.status.contains("WPM"));
        assert_eq!(frame.actions[0].input, GameInput::Reset);
    }

    #[test]
    fn test_rps_reveal_offers_replay() {
        let mut game = Game::new(GameKind::Rps, 8);
        game.handle(&GameInput::Choice(Choice::Paper), 0);
        assert_eq!(Frame::of(&game).status, "...");
        game.advance(1_000);
        let frame = Frame::of(&game);
        assert_eq!(frame.cells[0].label, "✋");
        assert_eq!(frame.actions.last().unwrap().input, GameInput::Reset);
    }

    #[test]
    fn test_whack_buttons_follow_round() {
        let mut game = Game::new(GameKind::Whack, 2);
        assert_eq!(Frame::of(&game).actions[0].label, "Start Game");
        game.handle(&GameInput::Start, 0);
        assert!(Frame::of(&game).actions.is_empty());
        game.advance(30_000);
        let frame = Frame::of(&game);
        assert!(frame.status.starts_with("Game Over!"));
        assert_eq!(frame.actions[0].label, "Play Again");
    }
}
