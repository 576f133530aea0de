//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay pure and
//! deterministic:
//! - Host-clock milliseconds are passed in, never read
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod grid;
pub mod sched;
pub mod speed;
pub mod state;
pub mod tick;

pub use grid::{Cell, on_edge, wrap, wrap_cell};
pub use sched::{TaskId, TaskTable};
pub use speed::SpeedController;
pub use state::{Direction, Game, NoSpace, Phase, ScoreBoard, Snake, Turn, spawn_free_cell};
pub use tick::{Action, advance, apply_action};
