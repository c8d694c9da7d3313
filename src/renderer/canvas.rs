//! The drawing surface seam
//!
//! Mirrors the subset of the Canvas 2D API the game draws with. The browser
//! build implements it over `CanvasRenderingContext2d`; tests and the native
//! binary use the recording implementation.

use crate::error::RenderError;

/// Gradient colour stop: offset in `[0, 1]` and a CSS colour
pub type ColorStop = (f32, &'static str);

pub trait Canvas: Sized {
    /// Backend gradient object
    type Gradient;

    /// Surface width in device pixels
    fn width(&self) -> u32;
    /// Surface height in device pixels
    fn height(&self) -> u32;
    /// Resize the backing surface, discarding its contents
    fn set_size(&mut self, width: u32, height: u32);

    /// Create an offscreen surface of the same backend for pre-rendering
    fn create_offscreen(&self, width: u32, height: u32) -> Result<Self, RenderError>;

    #[allow(clippy::too_many_arguments)]
    fn create_linear_gradient(
        &mut self,
        x0: f32,
        y0: f32,
        x1: f32,
        y1: f32,
        stops: &[ColorStop],
    ) -> Result<Self::Gradient, RenderError>;

    #[allow(clippy::too_many_arguments)]
    fn create_radial_gradient(
        &mut self,
        x0: f32,
        y0: f32,
        r0: f32,
        x1: f32,
        y1: f32,
        r1: f32,
        stops: &[ColorStop],
    ) -> Result<Self::Gradient, RenderError>;

    // State
    fn save(&mut self);
    fn restore(&mut self);
    fn translate(&mut self, x: f32, y: f32);
    fn rotate(&mut self, angle: f32);
    fn scale(&mut self, x: f32, y: f32);
    fn set_global_alpha(&mut self, alpha: f32);
    fn set_composite(&mut self, op: &str);

    // Style
    fn set_fill_color(&mut self, color: &str);
    fn set_fill_gradient(&mut self, gradient: &Self::Gradient);
    fn set_stroke_color(&mut self, color: &str);
    fn set_line_width(&mut self, width: f32);
    fn set_round_lines(&mut self);
    fn set_shadow(&mut self, color: &str, blur: f32);
    fn set_font(&mut self, font: &str);
    fn set_text_align(&mut self, align: &str);

    // Shapes
    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32);
    fn stroke_rect(&mut self, x: f32, y: f32, w: f32, h: f32);
    fn begin_path(&mut self);
    fn close_path(&mut self);
    fn move_to(&mut self, x: f32, y: f32);
    fn line_to(&mut self, x: f32, y: f32);
    fn quadratic_curve_to(&mut self, cpx: f32, cpy: f32, x: f32, y: f32);
    fn arc(&mut self, x: f32, y: f32, radius: f32, start: f32, end: f32);
    #[allow(clippy::too_many_arguments)]
    fn ellipse(&mut self, x: f32, y: f32, rx: f32, ry: f32, rotation: f32, start: f32, end: f32);
    fn rect(&mut self, x: f32, y: f32, w: f32, h: f32);
    fn fill(&mut self);
    fn stroke(&mut self);
    fn fill_text(&mut self, text: &str, x: f32, y: f32);
    fn stroke_text(&mut self, text: &str, x: f32, y: f32);

    // Compositing
    /// Blit another surface at `(x, y)`
    fn draw_canvas(&mut self, source: &Self, x: f32, y: f32);
    /// Re-blit the horizontal strip `[y, y + h)` of this surface shifted by `dx`
    fn copy_strip(&mut self, y: f32, h: f32, dx: f32);

    /// Full circle helper
    fn circle(&mut self, x: f32, y: f32, radius: f32) {
        self.arc(x, y, radius, 0.0, std::f32::consts::TAU);
    }

    /// Full ellipse helper
    fn full_ellipse(&mut self, x: f32, y: f32, rx: f32, ry: f32, rotation: f32) {
        self.ellipse(x, y, rx, ry, rotation, 0.0, std::f32::consts::TAU);
    }
}
