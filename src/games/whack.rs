//! Whack-a-Smiley reaction game
//!
//! Two intervals run while playing: a 1 Hz countdown and a 1 Hz spawner. Each
//! spawned target carries its own expiry timer, replaced whenever a new target
//! appears so only one target is ever live.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::timers::{TimerId, Timers};

pub const HOLES: usize = 9;
pub const GAME_SECONDS: u32 = 30;
pub const COUNTDOWN_MS: u64 = 1000;
pub const SPAWN_MS: u64 = 1000;
/// How long a target stays up if nobody hits it
pub const EXPOSURE_MS: u64 = 800;
pub const HIT_POINTS: u32 = 10;
pub const MISS_PENALTY: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WhackTimer {
    Countdown,
    Spawn,
    Expire,
}

#[derive(Debug, Clone)]
pub struct WhackGame {
    pub score: u32,
    pub time_left: u32,
    pub active: Option<usize>,
    pub playing: bool,
    rng: Pcg32,
    timers: Timers<WhackTimer>,
    expiry: Option<TimerId>,
}

impl WhackGame {
    pub fn new(seed: u64) -> Self {
        Self {
            score: 0,
            time_left: GAME_SECONDS,
            active: None,
            playing: false,
            rng: Pcg32::seed_from_u64(seed),
            timers: Timers::new(),
            expiry: None,
        }
    }

    /// Fresh round: score 0, full countdown, timers restarted
    pub fn start(&mut self) {
        self.timers.cancel_all();
        self.expiry = None;
        self.active = None;
        self.score = 0;
        self.time_left = GAME_SECONDS;
        self.playing = true;
        self.timers.every(COUNTDOWN_MS, WhackTimer::Countdown);
        self.timers.every(SPAWN_MS, WhackTimer::Spawn);
        log::info!("Whack round started");
    }

    pub fn advance(&mut self, dt_ms: u64) {
        let until = self.timers.now_ms() + dt_ms;
        while let Some(event) = self.timers.poll(until) {
            match event {
                WhackTimer::Countdown => {
                    self.time_left = self.time_left.saturating_sub(1);
                    if self.time_left == 0 {
                        self.stop();
                    }
                }
                WhackTimer::Spawn => self.spawn(),
                WhackTimer::Expire => {
                    self.active = None;
                    self.expiry = None;
                }
            }
        }
        self.timers.advance_to(until);
    }

    fn spawn(&mut self) {
        if let Some(id) = self.expiry.take() {
            self.timers.cancel(id);
        }
        self.active = Some(self.rng.random_range(0..HOLES));
        self.expiry = Some(self.timers.after(EXPOSURE_MS, WhackTimer::Expire));
    }

    fn stop(&mut self) {
        self.playing = false;
        self.active = None;
        self.expiry = None;
        self.timers.cancel_all();
        log::info!("Whack round over, score {}", self.score);
    }

    /// Back to the idle board with a full clock
    pub fn reset(&mut self) {
        self.timers.cancel_all();
        self.expiry = None;
        self.active = None;
        self.score = 0;
        self.time_left = GAME_SECONDS;
        self.playing = false;
    }

    /// Round finished by the countdown (not merely idle)
    pub fn is_over(&self) -> bool {
        !self.playing && self.time_left == 0
    }

    /// Hit a hole. Ignored unless a round is running.
    pub fn whack(&mut self, hole: usize) -> bool {
        if !self.playing {
            return false;
        }
        if self.active == Some(hole) {
            self.score += HIT_POINTS;
            self.active = None;
            if let Some(id) = self.expiry.take() {
                self.timers.cancel(id);
            }
        } else {
            self.score = self.score.saturating_sub(MISS_PENALTY);
        }
        true
    }
}
