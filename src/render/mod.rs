//! Procedural scene drawing
//!
//! The simulation never touches a drawing API: each frame the host hands
//! the current state to [`draw_frame`], which talks only to the
//! [`Surface`] capability trait. The wasm canvas implementation lives in
//! [`canvas`]; tests drive the scene with a recording mock.
//!
//! Pulse animation is phased off the wall clock, not the tick counter, so
//! it stays smooth whatever the current tick interval is.

#[cfg(target_arch = "wasm32")]
pub mod canvas;

use crate::sim::{Game, on_edge};

/// Drawing capabilities the scene needs from a host surface.
///
/// Colors are CSS color strings; positions and sizes are in surface
/// pixels.
pub trait Surface {
    /// Fill the whole surface with `color`.
    fn clear(&mut self, color: &str);
    /// Draw the cell lattice. The two boundary lines get `portal_color`,
    /// interior lines get `line_color`.
    fn grid(&mut self, cells: i32, cell_px: f64, line_color: &str, portal_color: &str);
    /// Fill one cell with a radial gradient from `inner` to `outer`.
    fn cell(&mut self, x_px: f64, y_px: f64, size_px: f64, inner: &str, outer: &str);
    /// Fill a circle with a blurred glow halo around it.
    fn glow_circle(&mut self, cx: f64, cy: f64, radius: f64, fill: &str, glow: &str, blur: f64);
    /// Stroke a five-pointed star outline centered at (`cx`, `cy`).
    fn star(&mut self, cx: f64, cy: f64, radius: f64, color: &str);
    /// Cover the scene with a translucent scrim and centered text.
    fn overlay_text(&mut self, text: &str, scrim: &str, color: &str);
}

const BACKDROP: &str = "rgba(0, 0, 0, 0.8)";
const GRID_LINE: &str = "rgba(0, 255, 0, 0.1)";
const FOOD_FILL: &str = "#f55";
const FOOD_GLOW: &str = "#f00";
const BONUS_FILL: &str = "#ffdd00";
const BONUS_GLOW: &str = "#ff0";
const STAR_STROKE: &str = "#ffffff";
const PAUSE_SCRIM: &str = "rgba(0, 0, 0, 0.5)";
const PAUSE_TEXT: &str = "#fff";

/// Radial gradient stops for one snake segment. Head and body read
/// differently, the boost recolors everything toward gold, and segments
/// sitting on a wrap edge get the brighter portal tint.
pub fn segment_gradient(is_head: bool, at_edge: bool, boost: bool) -> (&'static str, &'static str) {
    match (is_head, at_edge, boost) {
        (true, true, false) => ("#7f7", "#383"),
        (true, true, true) => ("#fff", "#aa0"),
        (false, true, false) => ("#5f5", "#282"),
        (false, true, true) => ("#ff4", "#880"),
        (true, false, false) => ("#5f5", "#383"),
        (true, false, true) => ("#ff0", "#aa0"),
        (false, false, false) => ("#3f3", "#282"),
        (false, false, true) => ("#ff4", "#880"),
    }
}

/// Boundary-line color, pulsing on a ~3 s wall-clock cycle.
pub fn portal_color(now_ms: f64) -> String {
    let alpha = 0.3 + (now_ms / 500.0).sin() * 0.2;
    format!("rgba(0, 255, 255, {alpha:.3})")
}

/// Food circle radius, pulsing inside its cell.
pub fn food_radius(now_ms: f64, cell_px: f64) -> f64 {
    (cell_px / 2.0 - 2.0) + (now_ms / 100.0).sin() * 2.0
}

/// Bonus food pulses harder and overflows its cell slightly.
pub fn bonus_radius(now_ms: f64, cell_px: f64) -> f64 {
    cell_px / 2.0 + (now_ms / 100.0).sin() * 3.0
}

#[inline]
fn cell_center(coord: i32, cell_px: f64) -> f64 {
    coord as f64 * cell_px + cell_px / 2.0
}

/// Render the live scene for one frame.
pub fn draw_frame(game: &Game, now_ms: f64, cell_px: f64, surface: &mut impl Surface) {
    surface.clear(BACKDROP);
    surface.grid(game.dimension, cell_px, GRID_LINE, &portal_color(now_ms));

    let boost = game.boost_active();
    for (index, segment) in game.snake.segments().enumerate() {
        let (inner, outer) =
            segment_gradient(index == 0, on_edge(segment, game.dimension), boost);
        surface.cell(
            segment.x as f64 * cell_px,
            segment.y as f64 * cell_px,
            cell_px,
            inner,
            outer,
        );
    }

    surface.glow_circle(
        cell_center(game.food.x, cell_px),
        cell_center(game.food.y, cell_px),
        food_radius(now_ms, cell_px),
        FOOD_FILL,
        FOOD_GLOW,
        10.0,
    );

    if let Some(bonus) = game.bonus_food {
        let cx = cell_center(bonus.x, cell_px);
        let cy = cell_center(bonus.y, cell_px);
        surface.glow_circle(cx, cy, bonus_radius(now_ms, cell_px), BONUS_FILL, BONUS_GLOW, 15.0);
        surface.star(cx, cy, cell_px / 3.0, STAR_STROKE);
    }
}

/// Render the paused scrim. Drawn once on entering pause - the scrim is
/// translucent, so repainting it every frame would pile up to black.
pub fn draw_pause_overlay(surface: &mut impl Surface) {
    surface.overlay_text("PAUSED", PAUSE_SCRIM, PAUSE_TEXT);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Cell, Game};

    #[derive(Debug, PartialEq)]
    enum Op {
        Clear,
        Grid,
        Cell { inner: String, outer: String },
        GlowCircle { fill: String },
        Star,
        OverlayText { text: String },
    }

    #[derive(Default)]
    struct Recorder {
        ops: Vec<Op>,
    }

    impl Surface for Recorder {
        fn clear(&mut self, _color: &str) {
            self.ops.push(Op::Clear);
        }
        fn grid(&mut self, _cells: i32, _cell_px: f64, _line: &str, _portal: &str) {
            self.ops.push(Op::Grid);
        }
        fn cell(&mut self, _x: f64, _y: f64, _size: f64, inner: &str, outer: &str) {
            self.ops.push(Op::Cell {
                inner: inner.into(),
                outer: outer.into(),
            });
        }
        fn glow_circle(&mut self, _cx: f64, _cy: f64, _r: f64, fill: &str, _glow: &str, _b: f64) {
            self.ops.push(Op::GlowCircle { fill: fill.into() });
        }
        fn star(&mut self, _cx: f64, _cy: f64, _r: f64, _color: &str) {
            self.ops.push(Op::Star);
        }
        fn overlay_text(&mut self, text: &str, _scrim: &str, _color: &str) {
            self.ops.push(Op::OverlayText { text: text.into() });
        }
    }

    #[test]
    fn test_frame_draws_backdrop_grid_snake_food() {
        let game = Game::new(20, 1, 0, 0.0);
        let mut rec = Recorder::default();
        draw_frame(&game, 0.0, 20.0, &mut rec);
        assert_eq!(rec.ops[0], Op::Clear);
        assert_eq!(rec.ops[1], Op::Grid);
        // One segment plus the food; no bonus, no star.
        assert!(matches!(rec.ops[2], Op::Cell { .. }));
        assert!(matches!(rec.ops[3], Op::GlowCircle { .. }));
        assert_eq!(rec.ops.len(), 4);
    }

    #[test]
    fn test_bonus_food_adds_glow_and_star() {
        let mut game = Game::new(20, 1, 0, 0.0);
        game.bonus_food = Some(Cell::new(3, 3));
        let mut rec = Recorder::default();
        draw_frame(&game, 0.0, 20.0, &mut rec);
        let glows = rec
            .ops
            .iter()
            .filter(|op| matches!(op, Op::GlowCircle { .. }))
            .count();
        assert_eq!(glows, 2);
        assert_eq!(rec.ops.last(), Some(&Op::Star));
    }

    #[test]
    fn test_boost_recolors_segments() {
        let mut game = Game::new(20, 1, 0, 0.0);
        let head_colors = |game: &Game| {
            let mut rec = Recorder::default();
            draw_frame(game, 0.0, 20.0, &mut rec);
            match rec.ops.into_iter().find(|op| matches!(op, Op::Cell { .. })) {
                Some(Op::Cell { inner, outer }) => (inner, outer),
                _ => unreachable!("head cell is always drawn"),
            }
        };
        let plain = head_colors(&game);
        game.speed.activate_boost();
        let boosted = head_colors(&game);
        assert_ne!(plain, boosted);
    }

    #[test]
    fn test_pause_overlay() {
        let mut rec = Recorder::default();
        draw_pause_overlay(&mut rec);
        assert_eq!(
            rec.ops,
            vec![Op::OverlayText {
                text: "PAUSED".into()
            }]
        );
    }

    #[test]
    fn test_portal_pulse_stays_in_alpha_range() {
        for step in 0..100 {
            let color = portal_color(step as f64 * 37.0);
            assert!(color.starts_with("rgba(0, 255, 255, "));
            let alpha: f64 = color
                .trim_start_matches("rgba(0, 255, 255, ")
                .trim_end_matches(')')
                .parse()
                .unwrap();
            assert!((0.1..=0.5).contains(&alpha), "{color}");
        }
    }
}
