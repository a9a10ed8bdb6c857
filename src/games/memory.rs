//! Memory match (pair flipping)

use std::collections::BTreeSet;

use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::timers::{TimerId, Timers};

/// Delay before a mismatched pair flips back
pub const FLIP_BACK_MS: u64 = 1000;

/// Card faces: the skill icons shown on the site
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Skill {
    Code,
    Storage,
    Public,
    Cloud,
    Terminal,
    Smartphone,
}

impl Skill {
    pub const ALL: [Skill; 6] = [
        Skill::Code,
        Skill::Storage,
        Skill::Public,
        Skill::Cloud,
        Skill::Terminal,
        Skill::Smartphone,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Skill::Code => "code",
            Skill::Storage => "storage",
            Skill::Public => "public",
            Skill::Cloud => "cloud",
            Skill::Terminal => "terminal",
            Skill::Smartphone => "smartphone",
        }
    }
}

/// Each symbol twice, uniformly shuffled (Fisher-Yates)
pub fn build_deck<T: Copy>(symbols: &[T], rng: &mut Pcg32) -> Vec<T> {
    let mut deck: Vec<T> = symbols.iter().chain(symbols.iter()).copied().collect();
    deck.shuffle(rng);
    deck
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MemoryTimer {
    FlipBack,
}

#[derive(Debug, Clone)]
pub struct MemoryGame {
    symbols: Vec<Skill>,
    pub cards: Vec<Skill>,
    /// Face-up, unsolved cards in click order (0..=2)
    pub flipped: Vec<usize>,
    pub solved: BTreeSet<usize>,
    pub moves: u32,
    /// Set while a pair is being compared
    pub locked: bool,
    rng: Pcg32,
    timers: Timers<MemoryTimer>,
    flip_back: Option<TimerId>,
}

impl MemoryGame {
    pub fn new(seed: u64) -> Self {
        Self::with_symbols(Skill::ALL.to_vec(), seed)
    }

    pub fn with_symbols(symbols: Vec<Skill>, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let cards = build_deck(&symbols, &mut rng);
        Self {
            symbols,
            cards,
            flipped: Vec::with_capacity(2),
            solved: BTreeSet::new(),
            moves: 0,
            locked: false,
            rng,
            timers: Timers::new(),
            flip_back: None,
        }
    }

    pub fn is_face_up(&self, index: usize) -> bool {
        self.flipped.contains(&index) || self.solved.contains(&index)
    }

    pub fn is_won(&self) -> bool {
        !self.cards.is_empty() && self.solved.len() == self.cards.len()
    }

    /// Flip a card. Returns false when the click was ignored.
    pub fn click(&mut self, index: usize) -> bool {
        if self.locked
            || index >= self.cards.len()
            || self.flipped.contains(&index)
            || self.solved.contains(&index)
        {
            log::debug!("Memory click ignored on card {index}");
            return false;
        }

        let Some(&first) = self.flipped.first() else {
            self.flipped.push(index);
            return true;
        };

        self.locked = true;
        self.flipped.push(index);
        self.moves += 1;

        if self.cards[first] == self.cards[index] {
            self.solved.insert(first);
            self.solved.insert(index);
            self.flipped.clear();
            self.locked = false;
            if self.is_won() {
                log::info!("Memory match cleared in {} moves", self.moves);
            }
        } else {
            self.flip_back = Some(self.timers.after(FLIP_BACK_MS, MemoryTimer::FlipBack));
        }
        true
    }

    /// Advance the game clock, firing the flip-back when due
    pub fn advance(&mut self, dt_ms: u64) {
        let until = self.timers.now_ms() + dt_ms;
        while let Some(event) = self.timers.poll(until) {
            match event {
                MemoryTimer::FlipBack => {
                    self.flipped.clear();
                    self.locked = false;
                    self.flip_back = None;
                }
            }
        }
        self.timers.advance_to(until);
    }

    /// Reshuffle and start over; a pending flip-back is cancelled
    pub fn reset(&mut self) {
        if let Some(id) = self.flip_back.take() {
            self.timers.cancel(id);
        }
        self.cards = build_deck(&self.symbols, &mut self.rng);
        self.flipped.clear();
        self.solved.clear();
        self.moves = 0;
        self.locked = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn positions(game: &MemoryGame, skill: Skill) -> Vec<usize> {
        game.cards
            .iter()
            .enumerate()
            .filter(|(_, s)| **s == skill)
            .map(|(i, _)| i)
            .collect()
    }

    #[test]
    fn test_matching_pair_is_solved() {
        let mut game = MemoryGame::with_symbols(vec![Skill::Code, Skill::Cloud], 7);
        let a = positions(&game, Skill::Code);

        assert!(game.click(a[0]));
        assert!(!game.locked);
        assert!(game.click(a[1]));

        assert_eq!(game.solved.len(), 2);
        assert_eq!(game.moves, 1);
        assert!(game.flipped.is_empty());
        assert!(!game.locked);
    }

    #[test]
    fn test_mismatch_flips_back_after_delay() {
        let mut game = MemoryGame::with_symbols(vec![Skill::Code, Skill::Cloud], 7);
        let a = positions(&game, Skill::Code)[0];
        let b = positions(&game, Skill::Cloud)[0];

        game.click(a);
        game.click(b);
        assert!(game.locked);
        assert_eq!(game.flipped, vec![a, b]);

        // Locked: every click ignored while the pair is showing
        let other = positions(&game, Skill::Code)[1];
        assert!(!game.click(other));

        game.advance(FLIP_BACK_MS - 1);
        assert_eq!(game.flipped.len(), 2);
        game.advance(1);
        assert!(game.flipped.is_empty());
        assert!(!game.locked);
        assert!(game.solved.is_empty());
        assert_eq!(game.moves, 1);
    }

    #[test]
    fn test_repeat_click_on_face_up_card_ignored() {
        let mut game = MemoryGame::new(3);
        assert!(game.click(0));
        assert!(!game.click(0));
        assert_eq!(game.flipped, vec![0]);
        assert_eq!(game.moves, 0);
    }

    #[test]
    fn test_full_clear_reports_win() {
        let mut game = MemoryGame::new(11);
        for skill in Skill::ALL {
            let p = positions(&game, skill);
            game.click(p[0]);
            game.click(p[1]);
        }
        assert!(game.is_won());
        assert_eq!(game.moves, 6);
        // Solved cards ignore clicks
        assert!(!game.click(0));
    }

    #[test]
    fn test_reset_cancels_pending_flip_back() {
        let mut game = MemoryGame::with_symbols(vec![Skill::Code, Skill::Cloud], 5);
        let a = positions(&game, Skill::Code)[0];
        let b = positions(&game, Skill::Cloud)[0];
        game.click(a);
        game.click(b);
        game.reset();

        assert!(game.click(0));
        game.advance(FLIP_BACK_MS * 2);
        // The stale flip-back must not clear the fresh face-up card
        assert_eq!(game.flipped, vec![0]);
        assert_eq!(game.moves, 0);
    }

    proptest! {
        #[test]
        fn prop_deck_has_every_symbol_twice(n in 1usize..=6, seed in any::<u64>()) {
            let symbols = Skill::ALL[..n].to_vec();
            let game = MemoryGame::with_symbols(symbols.clone(), seed);
            prop_assert_eq!(game.cards.len(), 2 * n);
            for s in symbols {
                prop_assert_eq!(game.cards.iter().filter(|c| **c == s).count(), 2);
            }
        }

        #[test]
        fn prop_solved_and_flipped_disjoint(
            clicks in proptest::collection::vec((0usize..12, 0u64..1500), 0..60),
            seed in any::<u64>(),
        ) {
            let mut game = MemoryGame::new(seed);
            for (card, wait) in clicks {
                game.click(card);
                game.advance(wait);
                prop_assert!(game.flipped.len() <= 2);
                prop_assert!(game.flipped.iter().all(|i| !game.solved.contains(i)));
                prop_assert_eq!(game.locked, game.flipped.len() == 2);
            }
        }
    }
}
