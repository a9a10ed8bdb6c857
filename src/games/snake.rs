//! Snake on a fixed grid
//!
//! The body is stored head-first. Steering only records a pending direction;
//! the turn is applied on the next step so two quick key presses cannot fold
//! the snake back onto itself.

use std::collections::VecDeque;

use glam::IVec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::timers::Timers;

pub const GRID_SIZE: i32 = 15;
pub const STEP_MS: u64 = 150;
pub const START_CELL: IVec2 = IVec2::new(7, 7);
pub const START_FOOD: IVec2 = IVec2::new(5, 5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Grid delta (y grows downward)
    pub fn vector(self) -> IVec2 {
        match self {
            Direction::Up => IVec2::new(0, -1),
            Direction::Down => IVec2::new(0, 1),
            Direction::Left => IVec2::new(-1, 0),
            Direction::Right => IVec2::new(1, 0),
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Map a DOM `KeyboardEvent.key` value
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowUp" => Some(Direction::Up),
            "ArrowDown" => Some(Direction::Down),
            "ArrowLeft" => Some(Direction::Left),
            "ArrowRight" => Some(Direction::Right),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnakePhase {
    /// Fresh board, waiting for start
    Ready,
    Running,
    Paused,
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SnakeTimer {
    Step,
}

#[derive(Debug, Clone)]
pub struct SnakeGame {
    pub body: VecDeque<IVec2>,
    pub food: IVec2,
    pub direction: Direction,
    pending: Option<Direction>,
    pub score: u32,
    pub phase: SnakePhase,
    rng: Pcg32,
    timers: Timers<SnakeTimer>,
}

pub fn in_bounds(cell: IVec2) -> bool {
    (0..GRID_SIZE).contains(&cell.x) && (0..GRID_SIZE).contains(&cell.y)
}

impl SnakeGame {
    pub fn new(seed: u64) -> Self {
        Self {
            body: VecDeque::from([START_CELL]),
            food: START_FOOD,
            direction: Direction::Up,
            pending: None,
            score: 0,
            phase: SnakePhase::Ready,
            rng: Pcg32::seed_from_u64(seed),
            timers: Timers::new(),
        }
    }

    pub fn head(&self) -> IVec2 {
        self.body[0]
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == SnakePhase::GameOver
    }

    pub fn occupies(&self, cell: IVec2) -> bool {
        self.body.contains(&cell)
    }

    /// Begin (or resume) stepping
    pub fn start(&mut self) {
        match self.phase {
            SnakePhase::Ready | SnakePhase::Paused => {
                self.phase = SnakePhase::Running;
                self.timers.cancel_all();
                self.timers.every(STEP_MS, SnakeTimer::Step);
            }
            SnakePhase::Running | SnakePhase::GameOver => {}
        }
    }

    pub fn pause(&mut self) {
        if self.phase == SnakePhase::Running {
            self.phase = SnakePhase::Paused;
            self.timers.cancel_all();
        }
    }

    pub fn toggle_pause(&mut self) {
        match self.phase {
            SnakePhase::Running => self.pause(),
            _ => self.start(),
        }
    }

    /// Queue a turn for the next step. A reversal of the current heading is ignored.
    pub fn steer(&mut self, dir: Direction) -> bool {
        if self.phase == SnakePhase::GameOver || dir == self.direction.opposite() {
            return false;
        }
        self.pending = Some(dir);
        true
    }

    /// Advance the game clock by `dt_ms`, stepping every `STEP_MS` while running
    pub fn advance(&mut self, dt_ms: u64) {
        let until = self.timers.now_ms() + dt_ms;
        while let Some(SnakeTimer::Step) = self.timers.poll(until) {
            self.step();
        }
        self.timers.advance_to(until);
    }

    /// One movement step. No-op unless running.
    pub fn step(&mut self) {
        if self.phase != SnakePhase::Running {
            return;
        }
        if let Some(dir) = self.pending.take() {
            self.direction = dir;
        }

        let next = self.head() + self.direction.vector();
        if !in_bounds(next) || self.occupies(next) {
            self.end();
            return;
        }

        self.body.push_front(next);
        if next == self.food {
            self.score += 1;
            match self.random_empty_cell() {
                Some(cell) => self.food = cell,
                None => {
                    log::info!("Snake filled the board");
                    self.end();
                }
            }
        } else {
            self.body.pop_back();
        }
    }

    fn end(&mut self) {
        self.phase = SnakePhase::GameOver;
        self.timers.cancel_all();
        log::info!("Snake game over, score {}", self.score);
    }

    /// Uniform pick among cells not covered by the snake
    fn random_empty_cell(&mut self) -> Option<IVec2> {
        let free: Vec<IVec2> = (0..GRID_SIZE)
            .flat_map(|y| (0..GRID_SIZE).map(move |x| IVec2::new(x, y)))
            .filter(|c| !self.body.contains(c))
            .collect();
        if free.is_empty() {
            return None;
        }
        Some(free[self.rng.random_range(0..free.len())])
    }

    /// Back to a single segment and start running immediately
    pub fn reset(&mut self) {
        self.timers.cancel_all();
        self.body = VecDeque::from([START_CELL]);
        self.food = START_FOOD;
        self.direction = Direction::Up;
        self.pending = None;
        self.score = 0;
        self.phase = SnakePhase::Paused;
        self.start();
    }
}
