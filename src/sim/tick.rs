//! Session control and the fixed-tick simulation step
//!
//! Two entry points drive everything:
//! - [`apply_action`]: player input (steering, pause, power-up, speed
//!   selection, restart), applied immediately between ticks.
//! - [`advance`]: fires every pending task due at the host clock - the
//!   recurring tick plus the bonus/boost expiry one-shots - in deadline
//!   order.

use rand::Rng;

use crate::consts::{
    BONUS_CHANCE, BONUS_LIFETIME_MS, BONUS_POINTS, BOOST_COST, BOOST_DURATION_MS, FOOD_POINTS,
    MAX_CATCHUP_TICKS,
};
use crate::tuning::ProfileId;

use super::grid::{Cell, wrap_cell};
use super::sched::TaskId;
use super::state::{Direction, Game, Phase, Snake, Turn, spawn_free_cell};

/// A recognized player input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Directional key; subject to the axis lock and only honored while
    /// Running and not Paused
    Steer(Turn),
    /// Pause/resume toggle; ignored after game over
    TogglePause,
    /// Score-gated temporary speed boost
    PowerUp,
    /// Switch speed profiles; only honored while Running and not Paused
    SelectProfile(ProfileId),
    /// Leave GameOver and start a fresh session
    Restart,
}

/// Apply one player input at host time `now_ms`.
pub fn apply_action(game: &mut Game, action: Action, now_ms: f64) {
    match action {
        Action::Steer(turn) => {
            if game.phase == Phase::Running {
                game.direction.steer(turn);
            }
        }
        Action::TogglePause => toggle_pause(game, now_ms),
        Action::PowerUp => activate_power_up(game, now_ms),
        Action::SelectProfile(id) => select_profile(game, id, now_ms),
        Action::Restart => restart(game, now_ms),
    }
}

/// Fire every task due at or before `now_ms`, in deadline order.
///
/// The tick re-arms itself at `due + interval` so cadence does not drift;
/// after a long host stall (hidden tab) at most [`MAX_CATCHUP_TICKS`]
/// ticks are replayed and the next deadline snaps to `now + interval`.
pub fn advance(game: &mut Game, now_ms: f64) {
    let mut ticks_run = 0u32;
    while let Some((task, due)) = game.tasks.pop_due(now_ms) {
        match task {
            TaskId::Tick => {
                step(game, now_ms);
                if game.phase == Phase::Running {
                    ticks_run += 1;
                    let interval = f64::from(game.speed.interval_ms());
                    let next = if ticks_run >= MAX_CATCHUP_TICKS {
                        now_ms + interval
                    } else {
                        due + interval
                    };
                    game.tasks.schedule(TaskId::Tick, next);
                }
            }
            TaskId::BonusExpiry => {
                game.bonus_food = None;
            }
            TaskId::BoostExpiry => {
                if game.speed.deactivate_boost() {
                    log::info!(
                        "boost expired, interval back to {} ms",
                        game.speed.interval_ms()
                    );
                    if game.phase == Phase::Running {
                        restart_tick(game, now_ms);
                    }
                }
            }
        }
    }
}

/// One simulation step: move, wrap, consume, collide.
fn step(game: &mut Game, now_ms: f64) {
    if game.phase != Phase::Running {
        return;
    }

    let new_head = wrap_cell(game.snake.head() + game.direction.delta(), game.dimension);

    // Regular food wins when both consumables share a cell; at most one
    // consumption per tick.
    let ate_food = new_head == game.food;
    let ate_bonus = !ate_food && game.bonus_food == Some(new_head);
    game.snake.advance(new_head, ate_food || ate_bonus);

    if ate_food {
        game.score.add(FOOD_POINTS);
        match spawn_free_cell(&mut game.rng, game.dimension, &game.snake, None) {
            Ok(cell) => game.food = cell,
            Err(err) => {
                log::warn!("{err}; board saturated, ending session");
                game_over(game);
                return;
            }
        }
        maybe_spawn_bonus(game, now_ms);
        game.speed.decay_on_consume();
    } else if ate_bonus {
        game.score.add(BONUS_POINTS);
        game.bonus_food = None;
        game.tasks.cancel(TaskId::BonusExpiry);
        game.speed.decay_on_consume();
    }

    if game.snake.head_hits_body() {
        log::info!("self-collision, final score {}", game.score.current);
        game_over(game);
    }
}

/// Roll the 20% bonus spawn after regular food was eaten. Skipped while a
/// bonus is already on the board; the expiry one-shot replaces any
/// pending deadline.
fn maybe_spawn_bonus(game: &mut Game, now_ms: f64) {
    if game.bonus_food.is_some() || !game.rng.random_bool(BONUS_CHANCE) {
        return;
    }
    match spawn_free_cell(&mut game.rng, game.dimension, &game.snake, Some(game.food)) {
        Ok(cell) => {
            game.bonus_food = Some(cell);
            game.tasks.schedule(TaskId::BonusExpiry, now_ms + BONUS_LIFETIME_MS);
        }
        Err(_) => log::debug!("no free cell for bonus food, skipping spawn"),
    }
}

fn game_over(game: &mut Game) {
    game.phase = Phase::GameOver;
    game.tasks.cancel(TaskId::Tick);
}

fn toggle_pause(game: &mut Game, now_ms: f64) {
    match game.phase {
        Phase::Running => {
            game.phase = Phase::Paused;
            game.tasks.cancel(TaskId::Tick);
        }
        Phase::Paused => {
            game.phase = Phase::Running;
            restart_tick(game, now_ms);
        }
        Phase::GameOver => {}
    }
}

/// Score-gated boost: costs [`BOOST_COST`] points, rejected while one is
/// already running or after game over. Accepted while paused; the
/// reduced interval then takes effect on resume.
fn activate_power_up(game: &mut Game, now_ms: f64) {
    if game.phase == Phase::GameOver
        || game.boost_active()
        || game.score.current < BOOST_COST
    {
        return;
    }
    game.score.spend(BOOST_COST);
    game.speed.activate_boost();
    game.tasks.schedule(TaskId::BoostExpiry, now_ms + BOOST_DURATION_MS);
    if game.phase == Phase::Running {
        restart_tick(game, now_ms);
    }
    log::info!("boost active, interval {} ms", game.speed.interval_ms());
}

fn select_profile(game: &mut Game, id: ProfileId, now_ms: f64) {
    if game.phase != Phase::Running {
        return;
    }
    log::info!("speed profile: {}", id.as_str());
    if game.speed.select_profile(id) {
        restart_tick(game, now_ms);
    }
}

/// GameOver -> Running with a fresh board. The selected profile and the
/// best score survive; both one-shot timers are cancelled so nothing
/// stale fires into the new session.
fn restart(game: &mut Game, now_ms: f64) {
    if game.phase != Phase::GameOver {
        return;
    }
    game.snake = Snake::new(Cell::splat(game.dimension / 2));
    game.direction = Direction::REST;
    game.score.current = 0;
    game.speed.reset();
    game.bonus_food = None;
    game.tasks.cancel(TaskId::BonusExpiry);
    game.tasks.cancel(TaskId::BoostExpiry);
    game.food = spawn_free_cell(&mut game.rng, game.dimension, &game.snake, None)
        .expect("a fresh board always has free cells");
    game.phase = Phase::Running;
    restart_tick(game, now_ms);
    log::info!("session restarted");
}

/// Cancel-then-reschedule the recurring tick at the current interval.
/// Every interval change goes through here so two tick streams can never
/// coexist.
fn restart_tick(game: &mut Game, now_ms: f64) {
    game.tasks.cancel(TaskId::Tick);
    game.tasks
        .schedule(TaskId::Tick, now_ms + f64::from(game.speed.interval_ms()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::grid::Cell;

    const DIM: i32 = 20;

    fn game() -> Game {
        let mut g = Game::new(DIM, 42, 0, 0.0);
        // Park the food away from the movement rows used by the tests.
        g.food = Cell::new(0, 0);
        g
    }

    /// Run exactly one pending tick and return the time it fired at.
    fn run_tick(g: &mut Game) -> f64 {
        let due = g.tasks.deadline(TaskId::Tick).expect("tick armed");
        advance(g, due);
        due
    }

    #[test]
    fn test_rightward_shift_without_food_keeps_length_one() {
        let mut g = game();
        apply_action(&mut g, Action::Steer(Turn::Right), 0.0);
        for _ in 0..3 {
            run_tick(&mut g);
        }
        let body: Vec<Cell> = g.snake.segments().collect();
        assert_eq!(body, vec![Cell::new(13, 10)]);
        assert_eq!(g.score.current, 0);
    }

    #[test]
    fn test_adjacent_food_consumption() {
        let mut g = game();
        g.food = Cell::new(11, 10);
        apply_action(&mut g, Action::Steer(Turn::Right), 0.0);
        run_tick(&mut g);
        assert_eq!(g.score.current, 10);
        assert_eq!(g.score.best, 10);
        assert_eq!(g.snake.len(), 2);
        assert!(!g.snake.occupies(g.food));
    }

    #[test]
    fn test_consumption_tightens_interval() {
        let mut g = game();
        let before = g.speed.interval_ms();
        g.food = Cell::new(11, 10);
        apply_action(&mut g, Action::Steer(Turn::Right), 0.0);
        let fired = run_tick(&mut g);
        assert_eq!(g.speed.interval_ms(), before - 2);
        // The re-armed deadline uses the tightened interval.
        assert_eq!(
            g.tasks.deadline(TaskId::Tick),
            Some(fired + f64::from(g.speed.interval_ms()))
        );
    }

    #[test]
    fn test_bonus_consumption() {
        let mut g = game();
        g.bonus_food = Some(Cell::new(11, 10));
        g.tasks.schedule(TaskId::BonusExpiry, 5000.0);
        apply_action(&mut g, Action::Steer(Turn::Right), 0.0);
        run_tick(&mut g);
        assert_eq!(g.score.current, 25);
        assert_eq!(g.snake.len(), 2);
        assert_eq!(g.bonus_food, None);
        // Expiry one-shot is cancelled with it.
        assert_eq!(g.tasks.deadline(TaskId::BonusExpiry), None);
    }

    #[test]
    fn test_food_wins_when_sharing_a_cell_with_bonus() {
        let mut g = game();
        g.food = Cell::new(11, 10);
        g.bonus_food = Some(Cell::new(11, 10));
        g.tasks.schedule(TaskId::BonusExpiry, 5000.0);
        apply_action(&mut g, Action::Steer(Turn::Right), 0.0);
        run_tick(&mut g);
        assert_eq!(g.score.current, 10);
        assert_eq!(g.bonus_food, Some(Cell::new(11, 10)));
    }

    #[test]
    fn test_bonus_expires_on_deadline() {
        let mut g = game();
        g.bonus_food = Some(Cell::new(3, 3));
        g.tasks.schedule(TaskId::BonusExpiry, 5000.0);
        advance(&mut g, 4999.0);
        assert!(g.bonus_food.is_some());
        advance(&mut g, 5000.0);
        assert_eq!(g.bonus_food, None);
    }

    #[test]
    fn test_head_wraps_at_edges() {
        let mut g = game();
        g.snake = Snake::new(Cell::new(10, 0));
        apply_action(&mut g, Action::Steer(Turn::Up), 0.0);
        run_tick(&mut g);
        assert_eq!(g.snake.head(), Cell::new(10, DIM - 1));

        let mut g = game();
        g.snake = Snake::new(Cell::new(DIM - 1, 10));
        apply_action(&mut g, Action::Steer(Turn::Right), 0.0);
        run_tick(&mut g);
        assert_eq!(g.snake.head(), Cell::new(0, 10));
    }

    #[test]
    fn test_reversal_rejected_at_rest_frame() {
        let mut g = game();
        apply_action(&mut g, Action::Steer(Turn::Up), 0.0);
        apply_action(&mut g, Action::Steer(Turn::Down), 0.0);
        run_tick(&mut g);
        assert_eq!(g.snake.head(), Cell::new(10, 9));
    }

    #[test]
    fn test_steering_ignored_while_paused() {
        let mut g = game();
        apply_action(&mut g, Action::TogglePause, 0.0);
        apply_action(&mut g, Action::Steer(Turn::Right), 0.0);
        apply_action(&mut g, Action::TogglePause, 1.0);
        run_tick(&mut g);
        assert_eq!(g.snake.head(), Cell::new(10, 10));
    }

    /// Grow the snake to length 5 along row 10, then hook back into it.
    fn drive_into_self(g: &mut Game) {
        apply_action(g, Action::Steer(Turn::Right), 0.0);
        for x in 11..=14 {
            g.food = Cell::new(x, 10);
            run_tick(g);
        }
        g.food = Cell::new(0, 0);
        // A 20%-roll bonus may have landed somewhere on the board; clear
        // it so the hook below only ever meets the snake's own body.
        g.bonus_food = None;
        g.tasks.cancel(TaskId::BonusExpiry);
        assert_eq!(g.snake.len(), 5);
        apply_action(g, Action::Steer(Turn::Up), 0.0);
        run_tick(g);
        apply_action(g, Action::Steer(Turn::Left), 0.0);
        run_tick(g);
        apply_action(g, Action::Steer(Turn::Down), 0.0);
        run_tick(g);
    }

    #[test]
    fn test_self_collision_ends_session() {
        let mut g = game();
        drive_into_self(&mut g);
        assert_eq!(g.phase, Phase::GameOver);
        assert_eq!(g.tasks.deadline(TaskId::Tick), None);
        // Frozen: further time does not move or score anything.
        let score = g.score.current;
        let len = g.snake.len();
        advance(&mut g, 1e9);
        assert_eq!(g.score.current, score);
        assert_eq!(g.snake.len(), len);
    }

    #[test]
    fn test_pause_toggle_is_idempotent() {
        let mut g = game();
        apply_action(&mut g, Action::Steer(Turn::Right), 0.0);
        let head = g.snake.head();
        let interval = g.speed.interval_ms();
        apply_action(&mut g, Action::TogglePause, 10.0);
        assert_eq!(g.phase, Phase::Paused);
        assert_eq!(g.tasks.deadline(TaskId::Tick), None);
        apply_action(&mut g, Action::TogglePause, 20.0);
        assert_eq!(g.phase, Phase::Running);
        assert_eq!(g.snake.head(), head);
        assert_eq!(g.speed.interval_ms(), interval);
        assert_eq!(g.tasks.deadline(TaskId::Tick), Some(20.0 + f64::from(interval)));
    }

    #[test]
    fn test_power_up_at_sixty_then_expiry() {
        let mut g = game();
        g.score.add(60);
        let before = g.speed.interval_ms();
        apply_action(&mut g, Action::PowerUp, 100.0);
        assert_eq!(g.score.current, 10);
        assert_eq!(g.score.best, 60);
        // normal: 100 - 2 * 15 = 70
        assert_eq!(g.speed.interval_ms(), before - 30);
        assert!(g.boost_active());
        assert_eq!(g.tasks.deadline(TaskId::BoostExpiry), Some(5100.0));
        advance(&mut g, 5100.0);
        assert!(!g.boost_active());
        assert_eq!(g.speed.interval_ms(), before);
    }

    #[test]
    fn test_power_up_gates() {
        let mut g = game();
        g.score.add(40);
        apply_action(&mut g, Action::PowerUp, 0.0);
        assert!(!g.boost_active());
        assert_eq!(g.score.current, 40);

        g.score.add(60);
        apply_action(&mut g, Action::PowerUp, 0.0);
        assert!(g.boost_active());
        let remaining = g.score.current;
        // Double activation is ignored, score charged once.
        apply_action(&mut g, Action::PowerUp, 0.0);
        assert_eq!(g.score.current, remaining);
    }

    #[test]
    fn test_profile_selection_only_while_running() {
        let mut g = game();
        apply_action(&mut g, Action::SelectProfile(ProfileId::Fast), 5.0);
        assert_eq!(g.speed.interval_ms(), 70);
        assert_eq!(g.tasks.deadline(TaskId::Tick), Some(75.0));

        apply_action(&mut g, Action::TogglePause, 10.0);
        apply_action(&mut g, Action::SelectProfile(ProfileId::Slow), 10.0);
        assert_eq!(g.speed.interval_ms(), 70);
        assert_eq!(g.speed.profile(), ProfileId::Fast);
    }

    #[test]
    fn test_restart_resets_session_keeps_best() {
        let mut g = game();
        g.food = Cell::new(11, 10);
        drive_into_self(&mut g);
        let best = g.score.best;
        assert!(best >= 10);

        apply_action(&mut g, Action::Restart, 1e6);
        assert_eq!(g.phase, Phase::Running);
        let body: Vec<Cell> = g.snake.segments().collect();
        assert_eq!(body, vec![Cell::new(10, 10)]);
        assert!(g.direction.is_rest());
        assert_eq!(g.score.current, 0);
        assert_eq!(g.score.best, best);
        assert_eq!(g.speed.interval_ms(), g.speed.profile().profile().initial_ms);
        assert_eq!(g.bonus_food, None);
        assert_eq!(g.tasks.deadline(TaskId::BonusExpiry), None);
        assert_eq!(g.tasks.deadline(TaskId::BoostExpiry), None);
        assert!(g.tasks.deadline(TaskId::Tick).is_some());
        assert!(!g.snake.occupies(g.food));
    }

    #[test]
    fn test_restart_ignored_unless_game_over() {
        let mut g = game();
        apply_action(&mut g, Action::Steer(Turn::Right), 0.0);
        run_tick(&mut g);
        let head = g.snake.head();
        apply_action(&mut g, Action::Restart, 50.0);
        assert_eq!(g.snake.head(), head);
    }

    #[test]
    fn test_catchup_is_bounded_after_stall() {
        let mut g = game();
        apply_action(&mut g, Action::Steer(Turn::Right), 0.0);
        let interval = f64::from(g.speed.interval_ms());
        // Host stalls for 100 intervals; only MAX_CATCHUP_TICKS replay.
        advance(&mut g, 100.0 * interval);
        assert_eq!(
            g.snake.head(),
            Cell::new(10 + MAX_CATCHUP_TICKS as i32, 10)
        );
        // Next deadline snapped past the stall instead of backlogging.
        assert!(g.tasks.deadline(TaskId::Tick).unwrap() > 100.0 * interval);
    }

    #[test]
    fn test_boost_restores_through_pause() {
        // Expiry deadlines keep running while paused; the restored
        // interval is what resume arms the tick with.
        let mut g = game();
        g.score.add(50);
        apply_action(&mut g, Action::PowerUp, 0.0);
        let boosted = g.speed.interval_ms();
        apply_action(&mut g, Action::TogglePause, 10.0);
        advance(&mut g, 6000.0);
        assert!(!g.boost_active());
        assert_ne!(g.speed.interval_ms(), boosted);
        assert_eq!(g.tasks.deadline(TaskId::Tick), None);
        apply_action(&mut g, Action::TogglePause, 6000.0);
        assert_eq!(
            g.tasks.deadline(TaskId::Tick),
            Some(6000.0 + f64::from(g.speed.interval_ms()))
        );
    }
}
