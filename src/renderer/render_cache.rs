//! Pre-rendered overlay bitmaps
//!
//! The halftone dot grid, scanlines and radial action lines cost thousands
//! of primitive calls each. They are painted once per build-parameter set
//! onto offscreen surfaces and then blitted every frame.

use std::f32::consts::TAU;

use super::canvas::Canvas;
use super::palette;
use crate::error::RenderError;
use crate::settings::QualityPreset;

/// Everything a cached bitmap depends on
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CacheParams {
    pub width: u32,
    pub height: u32,
    pub scale: f32,
    pub quality: QualityPreset,
}

pub struct RenderCache<C: Canvas> {
    params: Option<CacheParams>,
    halftone: Option<C>,
    scanlines: Option<C>,
    action_lines: Option<C>,
    rebuilds: u32,
    fallback_warned: bool,
}

impl<C: Canvas> Default for RenderCache<C> {
    fn default() -> Self {
        Self {
            params: None,
            halftone: None,
            scanlines: None,
            action_lines: None,
            rebuilds: 0,
            fallback_warned: false,
        }
    }
}

impl<C: Canvas> RenderCache<C> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn needs_rebuild(&self, params: CacheParams) -> bool {
        self.params != Some(params)
    }

    /// Drop every bitmap if `params` differ from the cached build. Returns
    /// `true` when something was dropped.
    pub fn invalidate(&mut self, params: CacheParams) -> bool {
        if !self.needs_rebuild(params) {
            return false;
        }
        self.params = Some(params);
        self.halftone = None;
        self.scanlines = None;
        self.action_lines = None;
        true
    }

    /// Number of bitmaps built since creation
    pub fn rebuilds(&self) -> u32 {
        self.rebuilds
    }

    pub fn draw_halftone(&mut self, ctx: &mut C, params: CacheParams) {
        self.invalidate(params);
        if self.halftone.is_none() {
            self.halftone = self.build(ctx, params, paint_halftone);
        }
        match &self.halftone {
            Some(bitmap) => ctx.draw_canvas(bitmap, 0.0, 0.0),
            None => paint_halftone(ctx, params),
        }
    }

    pub fn draw_scanlines(&mut self, ctx: &mut C, params: CacheParams) {
        self.invalidate(params);
        if self.scanlines.is_none() {
            self.scanlines = self.build(ctx, params, paint_scanlines);
        }
        match &self.scanlines {
            Some(bitmap) => ctx.draw_canvas(bitmap, 0.0, 0.0),
            None => paint_scanlines(ctx, params),
        }
    }

    pub fn draw_action_lines(&mut self, ctx: &mut C, params: CacheParams) {
        self.invalidate(params);
        if self.action_lines.is_none() {
            self.action_lines = self.build(ctx, params, paint_action_lines);
        }
        match &self.action_lines {
            Some(bitmap) => ctx.draw_canvas(bitmap, 0.0, 0.0),
            None => paint_action_lines(ctx, params),
        }
    }

    fn build(&mut self, ctx: &C, params: CacheParams, paint: fn(&mut C, CacheParams)) -> Option<C> {
        match ctx.create_offscreen(params.width, params.height) {
            Ok(mut surface) => {
                paint(&mut surface, params);
                self.rebuilds += 1;
                log::debug!("Render cache rebuilt at {}x{}", params.width, params.height);
                Some(surface)
            }
            Err(err) => {
                self.warn_fallback(&err);
                None
            }
        }
    }

    fn warn_fallback(&mut self, err: &RenderError) {
        if !self.fallback_warned {
            log::warn!("Overlay cache unavailable, drawing directly: {err}");
            self.fallback_warned = true;
        }
    }
}

/// Ben-Day dots: a magenta grid with an offset cyan grid on top
pub fn paint_halftone<C: Canvas>(ctx: &mut C, params: CacheParams) {
    let (width, height) = (params.width as f32, params.height as f32);
    let dot = 3.0 * params.scale;
    let spacing = (6.0 * params.scale).max(1.0);

    ctx.save();
    ctx.set_global_alpha(0.08);
    ctx.set_fill_color(palette::PINK);
    let mut y = 0.0;
    while y < height {
        let even_row = ((y / spacing).floor() as i64) % 2 == 0;
        let mut x = if even_row { 0.0 } else { spacing / 2.0 };
        while x < width {
            ctx.begin_path();
            ctx.circle(x, y, dot / 2.0);
            ctx.fill();
            x += spacing;
        }
        y += spacing;
    }

    ctx.set_global_alpha(0.05);
    ctx.set_fill_color(palette::CYAN);
    let mut y = spacing / 2.0;
    while y < height {
        let even_row = ((y / spacing).floor() as i64) % 2 == 0;
        let mut x = if even_row { spacing / 4.0 } else { spacing * 0.75 };
        while x < width {
            ctx.begin_path();
            ctx.circle(x, y, dot / 3.0);
            ctx.fill();
            x += spacing;
        }
        y += spacing;
    }
    ctx.restore();
}

/// One dark line every third pixel row
pub fn paint_scanlines<C: Canvas>(ctx: &mut C, params: CacheParams) {
    let width = params.width as f32;
    ctx.save();
    ctx.set_global_alpha(0.03);
    ctx.set_fill_color(palette::BLACK);
    for y in (0..params.height).step_by(3) {
        ctx.fill_rect(0.0, y as f32, width, 1.0);
    }
    ctx.restore();
}

/// Thirty faint rays out of a point left of centre
pub fn paint_action_lines<C: Canvas>(ctx: &mut C, params: CacheParams) {
    const RAYS: usize = 30;
    let (width, height) = (params.width as f32, params.height as f32);
    let (cx, cy) = (width * 0.3, height * 0.5);
    let inner = 100.0 * params.scale;
    let outer = width.max(height);

    ctx.save();
    ctx.set_global_alpha(0.03);
    ctx.set_stroke_color(palette::WHITE);
    ctx.set_line_width(params.scale);
    for i in 0..RAYS {
        let (sin, cos) = (i as f32 / RAYS as f32 * TAU).sin_cos();
        ctx.begin_path();
        ctx.move_to(cx + cos * inner, cy + sin * inner);
        ctx.line_to(cx + cos * outer, cy + sin * outer);
        ctx.stroke();
    }
    ctx.restore();
}
