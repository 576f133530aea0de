//! Game state and core simulation types
//!
//! Everything mutable lives in one owned [`Game`] context: snake, food,
//! score, speed, session phase, RNG, and the pending-task table. The
//! renderer reads it immutably each frame.

use std::collections::VecDeque;

use rand::Rng;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use thiserror::Error;

use super::grid::Cell;
use super::sched::{TaskId, TaskTable};
use super::speed::SpeedController;
use crate::tuning::ProfileId;

/// Session phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Tick timer armed, simulation advancing
    Running,
    /// Tick timer cancelled, state frozen until resume
    Paused,
    /// Terminal until an explicit restart
    GameOver,
}

/// A directional key press, before the axis lock has been applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Turn {
    Up,
    Down,
    Left,
    Right,
}

/// Current movement vector. Zero until the first accepted turn.
///
/// Reversal is impossible by construction: a vertical turn is only
/// accepted while the vertical component is at rest, and likewise for
/// horizontal, so the opposite direction is never reachable in one input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Direction(Cell);

impl Direction {
    pub const REST: Direction = Direction(Cell::ZERO);

    #[inline]
    pub fn delta(self) -> Cell {
        self.0
    }

    #[inline]
    pub fn is_rest(self) -> bool {
        self.0 == Cell::ZERO
    }

    /// Apply the axis lock. Returns true if the turn was accepted.
    pub fn steer(&mut self, turn: Turn) -> bool {
        let accepted = match turn {
            Turn::Up if self.0.y == 0 => Some(Cell::new(0, -1)),
            Turn::Down if self.0.y == 0 => Some(Cell::new(0, 1)),
            Turn::Left if self.0.x == 0 => Some(Cell::new(-1, 0)),
            Turn::Right if self.0.x == 0 => Some(Cell::new(1, 0)),
            _ => None,
        };
        if let Some(delta) = accepted {
            self.0 = delta;
        }
        accepted.is_some()
    }
}

/// The player entity: an ordered run of cells, head at the front.
/// Never empty.
#[derive(Debug, Clone)]
pub struct Snake {
    body: VecDeque<Cell>,
}

impl Snake {
    pub fn new(origin: Cell) -> Self {
        let mut body = VecDeque::new();
        body.push_front(origin);
        Self { body }
    }

    #[inline]
    pub fn head(&self) -> Cell {
        *self.body.front().expect("snake body is never empty")
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.body.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn segments(&self) -> impl Iterator<Item = Cell> + '_ {
        self.body.iter().copied()
    }

    pub fn occupies(&self, cell: Cell) -> bool {
        self.body.contains(&cell)
    }

    /// Move by prepending the new head; the tail is kept on consumption
    /// (net growth of one segment) and dropped otherwise (a pure shift).
    pub fn advance(&mut self, new_head: Cell, consumed: bool) {
        self.body.push_front(new_head);
        if !consumed {
            self.body.pop_back();
        }
    }

    /// True when the head overlaps any other segment. The tail is dropped
    /// before this check, so moving into the cell the tail just vacated
    /// is legal.
    pub fn head_hits_body(&self) -> bool {
        let head = self.head();
        self.body.iter().skip(1).any(|&segment| segment == head)
    }
}

/// The grid is saturated: every cell is covered by the snake or reserved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("no free cell available for spawning")]
pub struct NoSpace;

/// Random-probe budget before falling back to a free-cell scan
const SPAWN_PROBE_BUDGET: u32 = 64;

/// Draw a uniformly random free cell, rejecting snake segments and the
/// optional `avoid` cell. Bounded: after the probe budget the remaining
/// free cells are enumerated, and a saturated grid is an explicit error
/// instead of an endless retry.
pub fn spawn_free_cell(
    rng: &mut impl Rng,
    dimension: i32,
    snake: &Snake,
    avoid: Option<Cell>,
) -> Result<Cell, NoSpace> {
    let blocked = |cell: Cell| snake.occupies(cell) || avoid == Some(cell);

    for _ in 0..SPAWN_PROBE_BUDGET {
        let cell = Cell::new(
            rng.random_range(0..dimension),
            rng.random_range(0..dimension),
        );
        if !blocked(cell) {
            return Ok(cell);
        }
    }

    let free: Vec<Cell> = (0..dimension)
        .flat_map(|y| (0..dimension).map(move |x| Cell::new(x, y)))
        .filter(|&cell| !blocked(cell))
        .collect();
    if free.is_empty() {
        return Err(NoSpace);
    }
    Ok(free[rng.random_range(0..free.len())])
}

/// Current and persisted-best score
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoreBoard {
    pub current: u32,
    pub best: u32,
}

impl ScoreBoard {
    /// Add points and fold the result into the best score (monotonic).
    pub fn add(&mut self, points: u32) {
        self.current += points;
        self.best = self.best.max(self.current);
    }

    /// Pay a cost out of the current score. The best score never
    /// decreases.
    pub fn spend(&mut self, cost: u32) {
        self.current -= cost;
    }
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct Game {
    /// Grid dimension in cells, fixed at construction
    pub dimension: i32,
    pub snake: Snake,
    pub direction: Direction,
    pub food: Cell,
    /// High-value time-limited consumable; expiry is driven by the
    /// `BonusExpiry` task
    pub bonus_food: Option<Cell>,
    pub score: ScoreBoard,
    pub speed: SpeedController,
    pub phase: Phase,
    pub tasks: TaskTable,
    pub(super) rng: Pcg32,
}

impl Game {
    /// Create a session in `Running` with the first tick armed.
    ///
    /// `best` seeds the persisted best score, `now_ms` is the host clock
    /// the first tick deadline is measured from.
    pub fn new(dimension: i32, seed: u64, best: u32, now_ms: f64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let snake = Snake::new(Cell::splat(dimension / 2));
        let food = spawn_free_cell(&mut rng, dimension, &snake, None)
            .expect("a fresh board always has free cells");
        let speed = SpeedController::new(ProfileId::default());
        let mut tasks = TaskTable::new();
        tasks.schedule(TaskId::Tick, now_ms + speed.interval_ms() as f64);
        Self {
            dimension,
            snake,
            direction: Direction::REST,
            food,
            bonus_food: None,
            score: ScoreBoard {
                current: 0,
                best,
            },
            speed,
            phase: Phase::Running,
            tasks,
            rng,
        }
    }

    #[inline]
    pub fn boost_active(&self) -> bool {
        self.speed.boost_active()
    }
}
