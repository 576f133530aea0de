//! Canvas 2D implementation of the [`Surface`] trait
//!
//! Thin mapping from the scene's capability calls onto a
//! `CanvasRenderingContext2d`. Everything visual is procedural: radial
//! gradients, arcs, shadow-blur glows, stroked paths.

use std::f64::consts::{PI, TAU};

use web_sys::{CanvasGradient, CanvasRenderingContext2d};

use super::Surface;

pub struct CanvasSurface {
    ctx: CanvasRenderingContext2d,
    width: f64,
    height: f64,
}

impl CanvasSurface {
    pub fn new(ctx: CanvasRenderingContext2d, width: f64, height: f64) -> Self {
        Self { ctx, width, height }
    }

    fn radial_gradient(&self, cx: f64, cy: f64, r: f64) -> Option<CanvasGradient> {
        self.ctx.create_radial_gradient(cx, cy, 0.0, cx, cy, r).ok()
    }
}

impl Surface for CanvasSurface {
    fn clear(&mut self, color: &str) {
        self.ctx.set_fill_style_str(color);
        self.ctx.fill_rect(0.0, 0.0, self.width, self.height);
    }

    fn grid(&mut self, cells: i32, cell_px: f64, line_color: &str, portal_color: &str) {
        for i in 0..cells {
            let style = if i == 0 || i == cells - 1 {
                portal_color
            } else {
                line_color
            };
            self.ctx.set_stroke_style_str(style);

            // The final lattice line sits on the surface border and is
            // not drawn; the wrap edge is cued by color, not geometry.
            if i < cells - 1 {
                let offset = f64::from(i) * cell_px;
                self.ctx.begin_path();
                self.ctx.move_to(offset, 0.0);
                self.ctx.line_to(offset, self.height - 1.0);
                self.ctx.stroke();

                self.ctx.begin_path();
                self.ctx.move_to(0.0, offset);
                self.ctx.line_to(self.width - 1.0, offset);
                self.ctx.stroke();
            }
        }
    }

    fn cell(&mut self, x_px: f64, y_px: f64, size_px: f64, inner: &str, outer: &str) {
        let cx = x_px + size_px / 2.0;
        let cy = y_px + size_px / 2.0;
        if let Some(gradient) = self.radial_gradient(cx, cy, size_px / 2.0) {
            let _ = gradient.add_color_stop(0.0, inner);
            let _ = gradient.add_color_stop(1.0, outer);
            self.ctx.set_fill_style_canvas_gradient(&gradient);
            // 2 px gap keeps segments readable as discrete cells.
            self.ctx.fill_rect(x_px, y_px, size_px - 2.0, size_px - 2.0);
        }
    }

    fn glow_circle(&mut self, cx: f64, cy: f64, radius: f64, fill: &str, glow: &str, blur: f64) {
        self.ctx.set_fill_style_str(fill);
        self.ctx.begin_path();
        let _ = self.ctx.arc(cx, cy, radius.max(0.0), 0.0, TAU);
        self.ctx.fill();

        // Second fill with a shadow produces the halo.
        self.ctx.set_shadow_blur(blur);
        self.ctx.set_shadow_color(glow);
        self.ctx.fill();
        self.ctx.set_shadow_blur(0.0);
    }

    fn star(&mut self, cx: f64, cy: f64, radius: f64, color: &str) {
        self.ctx.set_stroke_style_str(color);
        self.ctx.begin_path();
        // Pentagram: stepping 4/5 turns per vertex crosses the center.
        for i in 0..5 {
            let angle = f64::from(i) * 4.0 * PI / 5.0;
            let x = cx + angle.cos() * radius;
            let y = cy + angle.sin() * radius;
            if i == 0 {
                self.ctx.move_to(x, y);
            } else {
                self.ctx.line_to(x, y);
            }
        }
        self.ctx.close_path();
        self.ctx.stroke();
    }

    fn overlay_text(&mut self, text: &str, scrim: &str, color: &str) {
        self.ctx.set_fill_style_str(scrim);
        self.ctx.fill_rect(0.0, 0.0, self.width, self.height);
        self.ctx.set_fill_style_str(color);
        self.ctx.set_font("20px \"Press Start 2P\", monospace");
        self.ctx.set_text_align("center");
        let _ = self.ctx.fill_text(text, self.width / 2.0, self.height / 2.0);
    }
}
