//! Rock-Paper-Scissors against the computer

use std::fmt;
use std::str::FromStr;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::timers::Timers;

/// Cadence of the computer's "thinking" shuffle
pub const SHUFFLE_MS: u64 = 100;
/// When the computer's pick is revealed
pub const REVEAL_MS: u64 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    Rock,
    Paper,
    Scissors,
}

impl Choice {
    pub const ALL: [Choice; 3] = [Choice::Rock, Choice::Paper, Choice::Scissors];

    pub fn as_str(&self) -> &'static str {
        match self {
            Choice::Rock => "Rock",
            Choice::Paper => "Paper",
            Choice::Scissors => "Scissors",
        }
    }

    pub fn beats(self, other: Choice) -> bool {
        matches!(
            (self, other),
            (Choice::Rock, Choice::Scissors)
                | (Choice::Paper, Choice::Rock)
                | (Choice::Scissors, Choice::Paper)
        )
    }
}

/// A name that is not rock, paper or scissors
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownChoice(pub String);

impl fmt::Display for UnknownChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown choice: {:?}", self.0)
    }
}

impl std::error::Error for UnknownChoice {}

impl FromStr for Choice {
    type Err = UnknownChoice;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "rock" => Ok(Choice::Rock),
            "paper" => Ok(Choice::Paper),
            "scissors" => Ok(Choice::Scissors),
            _ => Err(UnknownChoice(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Win,
    Lose,
    Tie,
}

impl Outcome {
    pub fn message(&self) -> &'static str {
        match self {
            Outcome::Win => "You Win!",
            Outcome::Lose => "Computer Wins!",
            Outcome::Tie => "It's a Tie!",
        }
    }
}

/// Outcome from the player's point of view
pub fn resolve(player: Choice, computer: Choice) -> Outcome {
    if player == computer {
        Outcome::Tie
    } else if player.beats(computer) {
        Outcome::Win
    } else {
        Outcome::Lose
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RpsTimer {
    Shuffle,
    Reveal,
}

#[derive(Debug, Clone)]
pub struct RpsGame {
    pub player: Option<Choice>,
    /// What the computer side currently shows (cycles while shuffling)
    pub computer: Option<Choice>,
    pub outcome: Option<Outcome>,
    shuffle_step: usize,
    rng: Pcg32,
    timers: Timers<RpsTimer>,
}

impl RpsGame {
    pub fn new(seed: u64) -> Self {
        Self {
            player: None,
            computer: None,
            outcome: None,
            shuffle_step: 0,
            rng: Pcg32::seed_from_u64(seed),
            timers: Timers::new(),
        }
    }

    pub fn is_shuffling(&self) -> bool {
        !self.timers.is_empty()
    }

    /// Throw a hand. Ignored while the previous throw is still being revealed.
    pub fn play(&mut self, choice: Choice) -> bool {
        if self.is_shuffling() {
            return false;
        }
        self.player = Some(choice);
        self.outcome = None;
        self.shuffle_step = 0;
        self.timers.every(SHUFFLE_MS, RpsTimer::Shuffle);
        self.timers.after(REVEAL_MS, RpsTimer::Reveal);
        true
    }

    pub fn advance(&mut self, dt_ms: u64) {
        let until = self.timers.now_ms() + dt_ms;
        while let Some(event) = self.timers.poll(until) {
            match event {
                RpsTimer::Shuffle => {
                    self.computer = Some(Choice::ALL[self.shuffle_step % 3]);
                    self.shuffle_step += 1;
                }
                RpsTimer::Reveal => self.reveal(),
            }
        }
        self.timers.advance_to(until);
    }

    fn reveal(&mut self) {
        self.timers.cancel_all();
        let computer = Choice::ALL[self.rng.random_range(0..3)];
        self.computer = Some(computer);
        if let Some(player) = self.player {
            self.outcome = Some(resolve(player, computer));
        }
    }

    pub fn reset(&mut self) {
        self.timers.cancel_all();
        self.player = None;
        self.computer = None;
        self.outcome = None;
        self.shuffle_step = 0;
    }
}
