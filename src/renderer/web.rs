//! Browser canvas backend over `CanvasRenderingContext2d`

use wasm_bindgen::JsCast;
use web_sys::{CanvasGradient, CanvasRenderingContext2d, HtmlCanvasElement};

use super::canvas::{Canvas, ColorStop};
use crate::error::RenderError;

pub struct WebCanvas {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl WebCanvas {
    /// Wrap an existing `<canvas>` element
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, RenderError> {
        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .and_then(|ctx| ctx.dyn_into::<CanvasRenderingContext2d>().ok())
            .ok_or(RenderError::ContextUnavailable)?;
        Ok(Self { canvas, ctx })
    }

    pub fn element(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    fn add_stops(gradient: &CanvasGradient, key: &str, stops: &[ColorStop]) -> Result<(), RenderError> {
        for &(offset, color) in stops {
            gradient
                .add_color_stop(offset, color)
                .map_err(|e| RenderError::Gradient {
                    key: key.to_string(),
                    reason: format!("{e:?}"),
                })?;
        }
        Ok(())
    }
}

impl Canvas for WebCanvas {
    type Gradient = CanvasGradient;

    fn width(&self) -> u32 {
        self.canvas.width()
    }

    fn height(&self) -> u32 {
        self.canvas.height()
    }

    fn set_size(&mut self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
    }

    fn create_offscreen(&self, width: u32, height: u32) -> Result<Self, RenderError> {
        let surface_err = |reason: String| RenderError::Surface { width, height, reason };
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| surface_err("no document".into()))?;
        let canvas: HtmlCanvasElement = document
            .create_element("canvas")
            .map_err(|e| surface_err(format!("{e:?}")))?
            .dyn_into()
            .map_err(|_| surface_err("element is not a canvas".into()))?;
        canvas.set_width(width);
        canvas.set_height(height);
        Self::new(canvas).map_err(|e| surface_err(e.to_string()))
    }

    fn create_linear_gradient(
        &mut self,
        x0: f32,
        y0: f32,
        x1: f32,
        y1: f32,
        stops: &[ColorStop],
    ) -> Result<CanvasGradient, RenderError> {
        let gradient = self
            .ctx
            .create_linear_gradient(x0 as f64, y0 as f64, x1 as f64, y1 as f64);
        Self::add_stops(&gradient, "linear", stops)?;
        Ok(gradient)
    }

    fn create_radial_gradient(
        &mut self,
        x0: f32,
        y0: f32,
        r0: f32,
        x1: f32,
        y1: f32,
        r1: f32,
        stops: &[ColorStop],
    ) -> Result<CanvasGradient, RenderError> {
        let gradient = self
            .ctx
            .create_radial_gradient(x0 as f64, y0 as f64, r0 as f64, x1 as f64, y1 as f64, r1 as f64)
            .map_err(|e| RenderError::Gradient {
                key: "radial".into(),
                reason: format!("{e:?}"),
            })?;
        Self::add_stops(&gradient, "radial", stops)?;
        Ok(gradient)
    }

    fn save(&mut self) {
        self.ctx.save();
    }

    fn restore(&mut self) {
        self.ctx.restore();
    }

    fn translate(&mut self, x: f32, y: f32) {
        let _ = self.ctx.translate(x as f64, y as f64);
    }

    fn rotate(&mut self, angle: f32) {
        let _ = self.ctx.rotate(angle as f64);
    }

    fn scale(&mut self, x: f32, y: f32) {
        let _ = self.ctx.scale(x as f64, y as f64);
    }

    fn set_global_alpha(&mut self, alpha: f32) {
        self.ctx.set_global_alpha(alpha as f64);
    }

    fn set_composite(&mut self, op: &str) {
        let _ = self.ctx.set_global_composite_operation(op);
    }

    fn set_fill_color(&mut self, color: &str) {
        self.ctx.set_fill_style_str(color);
    }

    fn set_fill_gradient(&mut self, gradient: &CanvasGradient) {
        self.ctx.set_fill_style_canvas_gradient(gradient);
    }

    fn set_stroke_color(&mut self, color: &str) {
        self.ctx.set_stroke_style_str(color);
    }

    fn set_line_width(&mut self, width: f32) {
        self.ctx.set_line_width(width as f64);
    }

    fn set_round_lines(&mut self) {
        self.ctx.set_line_cap("round");
        self.ctx.set_line_join("round");
    }

    fn set_shadow(&mut self, color: &str, blur: f32) {
        self.ctx.set_shadow_color(color);
        self.ctx.set_shadow_blur(blur as f64);
    }

    fn set_font(&mut self, font: &str) {
        self.ctx.set_font(font);
    }

    fn set_text_align(&mut self, align: &str) {
        self.ctx.set_text_align(align);
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        self.ctx.fill_rect(x as f64, y as f64, w as f64, h as f64);
    }

    fn stroke_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        self.ctx.stroke_rect(x as f64, y as f64, w as f64, h as f64);
    }

    fn begin_path(&mut self) {
        self.ctx.begin_path();
    }

    fn close_path(&mut self) {
        self.ctx.close_path();
    }

    fn move_to(&mut self, x: f32, y: f32) {
        self.ctx.move_to(x as f64, y as f64);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.ctx.line_to(x as f64, y as f64);
    }

    fn quadratic_curve_to(&mut self, cpx: f32, cpy: f32, x: f32, y: f32) {
        self.ctx
            .quadratic_curve_to(cpx as f64, cpy as f64, x as f64, y as f64);
    }

    fn arc(&mut self, x: f32, y: f32, radius: f32, start: f32, end: f32) {
        let _ = self
            .ctx
            .arc(x as f64, y as f64, radius.max(0.0) as f64, start as f64, end as f64);
    }

    fn ellipse(&mut self, x: f32, y: f32, rx: f32, ry: f32, rotation: f32, start: f32, end: f32) {
        let _ = self.ctx.ellipse(
            x as f64,
            y as f64,
            rx.max(0.0) as f64,
            ry.max(0.0) as f64,
            rotation as f64,
            start as f64,
            end as f64,
        );
    }

    fn rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        self.ctx.rect(x as f64, y as f64, w as f64, h as f64);
    }

    fn fill(&mut self) {
        self.ctx.fill();
    }

    fn stroke(&mut self) {
        self.ctx.stroke();
    }

    fn fill_text(&mut self, text: &str, x: f32, y: f32) {
        let _ = self.ctx.fill_text(text, x as f64, y as f64);
    }

    fn stroke_text(&mut self, text: &str, x: f32, y: f32) {
        let _ = self.ctx.stroke_text(text, x as f64, y as f64);
    }

    fn draw_canvas(&mut self, source: &Self, x: f32, y: f32) {
        let _ = self
            .ctx
            .draw_image_with_html_canvas_element(&source.canvas, x as f64, y as f64);
    }

    fn copy_strip(&mut self, y: f32, h: f32, dx: f32) {
        let w = self.canvas.width() as f64;
        let _ = self
            .ctx
            .draw_image_with_html_canvas_element_and_sw_and_sh_and_dx_and_dy_and_dw_and_dh(
                &self.canvas,
                0.0,
                y as f64,
                w,
                h as f64,
                dx as f64,
                y as f64,
                w,
                h as f64,
            );
    }
}
