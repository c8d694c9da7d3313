//! Headless canvas that counts draw calls instead of rasterizing.
//!
//! Used by the native binary and by tests to observe what a frame draws:
//! how many gradients and offscreen surfaces were built, how many blits and
//! primitives were issued, and whether save/restore stayed balanced.

use std::cell::Cell;
use std::rc::Rc;

use super::canvas::{Canvas, ColorStop};
use crate::error::RenderError;

/// Running counters of issued canvas operations
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrawStats {
    pub gradients_created: u32,
    pub surfaces_created: u32,
    pub blits: u32,
    pub strip_copies: u32,
    pub fills: u32,
    pub strokes: u32,
    pub rects: u32,
    pub arcs: u32,
    pub texts: u32,
    pub saves: u32,
    pub restores: u32,
}

/// Gradient stand-in: a serial number plus its stop count
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedGradient {
    pub serial: u32,
    pub stops: usize,
}

/// Draw-call recording canvas
#[derive(Debug)]
pub struct RecordingCanvas {
    width: u32,
    height: u32,
    stats: DrawStats,
    depth: i32,
    /// Shared with offscreens created from this canvas
    offscreen_failures: Rc<Cell<bool>>,
    surfaces_built: Rc<Cell<u32>>,
}

impl RecordingCanvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            stats: DrawStats::default(),
            depth: 0,
            offscreen_failures: Rc::new(Cell::new(false)),
            surfaces_built: Rc::new(Cell::new(0)),
        }
    }

    /// Make every following `create_offscreen` call fail
    pub fn fail_offscreens(&self, fail: bool) {
        self.offscreen_failures.set(fail);
    }

    pub fn stats(&self) -> DrawStats {
        DrawStats {
            surfaces_created: self.surfaces_built.get(),
            ..self.stats
        }
    }

    pub fn reset_stats(&mut self) {
        self.stats = DrawStats::default();
        self.surfaces_built.set(0);
    }

    /// Current save/restore nesting depth
    pub fn depth(&self) -> i32 {
        self.depth
    }
}

impl Canvas for RecordingCanvas {
    type Gradient = RecordedGradient;

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn set_size(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    fn create_offscreen(&self, width: u32, height: u32) -> Result<Self, RenderError> {
        if self.offscreen_failures.get() {
            return Err(RenderError::Surface {
                width,
                height,
                reason: "offscreen surfaces disabled".into(),
            });
        }
        self.surfaces_built.set(self.surfaces_built.get() + 1);
        Ok(Self {
            width,
            height,
            stats: DrawStats::default(),
            depth: 0,
            offscreen_failures: Rc::clone(&self.offscreen_failures),
            surfaces_built: Rc::clone(&self.surfaces_built),
        })
    }

    fn create_linear_gradient(
        &mut self,
        _x0: f32,
        _y0: f32,
        _x1: f32,
        _y1: f32,
        stops: &[ColorStop],
    ) -> Result<RecordedGradient, RenderError> {
        self.stats.gradients_created += 1;
        Ok(RecordedGradient {
            serial: self.stats.gradients_created,
            stops: stops.len(),
        })
    }

    fn create_radial_gradient(
        &mut self,
        _x0: f32,
        _y0: f32,
        _r0: f32,
        _x1: f32,
        _y1: f32,
        _r1: f32,
        stops: &[ColorStop],
    ) -> Result<RecordedGradient, RenderError> {
        self.stats.gradients_created += 1;
        Ok(RecordedGradient {
            serial: self.stats.gradients_created,
            stops: stops.len(),
        })
    }

    fn save(&mut self) {
        self.stats.saves += 1;
        self.depth += 1;
    }

    fn restore(&mut self) {
        self.stats.restores += 1;
        self.depth -= 1;
    }

    fn translate(&mut self, _x: f32, _y: f32) {}
    fn rotate(&mut self, _angle: f32) {}
    fn scale(&mut self, _x: f32, _y: f32) {}
    fn set_global_alpha(&mut self, _alpha: f32) {}
    fn set_composite(&mut self, _op: &str) {}
    fn set_fill_color(&mut self, _color: &str) {}
    fn set_fill_gradient(&mut self, _gradient: &RecordedGradient) {}
    fn set_stroke_color(&mut self, _color: &str) {}
    fn set_line_width(&mut self, _width: f32) {}
    fn set_round_lines(&mut self) {}
    fn set_shadow(&mut self, _color: &str, _blur: f32) {}
    fn set_font(&mut self, _font: &str) {}
    fn set_text_align(&mut self, _align: &str) {}

    fn fill_rect(&mut self, _x: f32, _y: f32, _w: f32, _h: f32) {
        self.stats.rects += 1;
    }

    fn stroke_rect(&mut self, _x: f32, _y: f32, _w: f32, _h: f32) {
        self.stats.rects += 1;
    }

    fn begin_path(&mut self) {}
    fn close_path(&mut self) {}
    fn move_to(&mut self, _x: f32, _y: f32) {}
    fn line_to(&mut self, _x: f32, _y: f32) {}
    fn quadratic_curve_to(&mut self, _cpx: f32, _cpy: f32, _x: f32, _y: f32) {}

    fn arc(&mut self, _x: f32, _y: f32, _radius: f32, _start: f32, _end: f32) {
        self.stats.arcs += 1;
    }

    fn ellipse(&mut self, _x: f32, _y: f32, _rx: f32, _ry: f32, _rot: f32, _s: f32, _e: f32) {
        self.stats.arcs += 1;
    }

    fn rect(&mut self, _x: f32, _y: f32, _w: f32, _h: f32) {
        self.stats.rects += 1;
    }

    fn fill(&mut self) {
        self.stats.fills += 1;
    }

    fn stroke(&mut self) {
        self.stats.strokes += 1;
    }

    fn fill_text(&mut self, _text: &str, _x: f32, _y: f32) {
        self.stats.texts += 1;
    }

    fn stroke_text(&mut self, _text: &str, _x: f32, _y: f32) {
        self.stats.texts += 1;
    }

    fn draw_canvas(&mut self, _source: &Self, _x: f32, _y: f32) {
        self.stats.blits += 1;
    }

    fn copy_strip(&mut self, _y: f32, _h: f32, _dx: f32) {
        self.stats.strip_copies += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offscreen_shares_failure_switch() {
        let canvas = RecordingCanvas::new(100, 100);
        let offscreen = canvas.create_offscreen(10, 10).unwrap();
        canvas.fail_offscreens(true);
        assert!(offscreen.create_offscreen(5, 5).is_err());
        assert_eq!(canvas.stats().surfaces_created, 1);
    }

    #[test]
    fn test_gradient_serials_are_unique() {
        let mut canvas = RecordingCanvas::new(10, 10);
        let a = canvas.create_linear_gradient(0.0, 0.0, 0.0, 1.0, &[(0.0, "#000")]).unwrap();
        let b = canvas.create_linear_gradient(0.0, 0.0, 0.0, 1.0, &[(0.0, "#000")]).unwrap();
        assert_ne!(a.serial, b.serial);
    }
}
