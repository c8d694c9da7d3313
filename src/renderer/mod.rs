//! Canvas 2D rendering module
//!
//! The [`Renderer`] owns the drawing surface together with the gradient and
//! bitmap caches built for it. Anything that changes what those caches were
//! built for (viewport size, quality tier) goes through the renderer so both
//! are invalidated in the same call.

pub mod canvas;
pub mod gradient_cache;
pub mod headless;
pub mod overlays;
pub mod palette;
pub mod render_cache;
#[cfg(target_arch = "wasm32")]
pub mod web;

use std::rc::Rc;

use rand::Rng;

pub use canvas::{Canvas, ColorStop};
pub use gradient_cache::GradientCache;
pub use headless::{DrawStats, RecordingCanvas};
pub use render_cache::{CacheParams, RenderCache};
#[cfg(target_arch = "wasm32")]
pub use web::WebCanvas;

use crate::consts::{GAME_HEIGHT, GROUND_Y};
use crate::platform::Viewport;
use crate::settings::{QualityPreset, QualityProfile};

const SKY: &[ColorStop] = &[(0.0, palette::BG_DEEP), (0.3, "#0d0d2b"), (1.0, palette::BG_NEAR)];
const STREET_GLOW: &[ColorStop] = &[(0.0, "rgba(255, 20, 147, 0)"), (1.0, "rgba(255, 20, 147, 0.08)")];
const CLOUD_BODY: &[ColorStop] = &[(0.0, "#4a4a6a"), (0.5, "#3a3a5a"), (1.0, palette::BG_SURFACE)];

/// Road dash period and length in logical units
const DASH_PERIOD: f32 = 80.0;
const DASH_LENGTH: f32 = 40.0;

/// Per-frame inputs to the overlay stack
#[derive(Debug, Clone, Copy, Default)]
pub struct OverlayPass {
    pub frame: u64,
    pub playing: bool,
    pub glitch: bool,
}

pub struct Renderer<C: Canvas> {
    ctx: C,
    gradients: GradientCache<C::Gradient>,
    cache: RenderCache<C>,
    viewport: Viewport,
    quality: QualityPreset,
    profile: QualityProfile,
}

impl<C: Canvas> Renderer<C> {
    pub fn new(ctx: C, quality: QualityPreset) -> Self {
        let viewport = Viewport::new(ctx.width(), ctx.height());
        let mut gradients = GradientCache::new();
        gradients.invalidate(viewport.width, viewport.height);
        Self {
            ctx,
            gradients,
            cache: RenderCache::new(),
            viewport,
            quality,
            profile: quality.profile(),
        }
    }

    /// Resize the surface and drop every cached resource built for the old size
    pub fn resize(&mut self, width: u32, height: u32) {
        self.ctx.set_size(width, height);
        self.viewport = Viewport::new(width, height);
        if self.gradients.invalidate(width, height) {
            log::debug!("Gradient cache cleared for {width}x{height}");
        }
        self.cache.invalidate(self.cache_params());
    }

    /// Switch quality tier, invalidating both caches
    pub fn set_quality(&mut self, quality: QualityPreset) {
        if quality == self.quality {
            return;
        }
        log::info!("Quality set to {}", quality.as_str());
        self.quality = quality;
        self.profile = quality.profile();
        self.gradients.clear();
        self.cache.invalidate(self.cache_params());
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn scale(&self) -> f32 {
        self.viewport.scale_ratio
    }

    pub fn quality(&self) -> QualityPreset {
        self.quality
    }

    pub fn profile(&self) -> &QualityProfile {
        &self.profile
    }

    pub fn ctx(&self) -> &C {
        &self.ctx
    }

    pub fn ctx_mut(&mut self) -> &mut C {
        &mut self.ctx
    }

    pub fn gradient_count(&self) -> usize {
        self.gradients.len()
    }

    pub fn cache_params(&self) -> CacheParams {
        CacheParams {
            width: self.viewport.width,
            height: self.viewport.height,
            scale: self.viewport.scale_ratio,
            quality: self.quality,
        }
    }

    /// Full-height sky gradient
    pub fn sky_gradient(&mut self) -> Option<Rc<C::Gradient>> {
        let height = self.viewport.height as f32;
        self.gradients
            .get_linear(&mut self.ctx, "sky", 0.0, 0.0, 0.0, height, SKY)
            .inspect_err(|err| log::debug!("Sky gradient unavailable: {err}"))
            .ok()
    }

    /// Storm cloud body, in the cloud's local unscaled coordinates
    pub fn cloud_gradient(&mut self) -> Option<Rc<C::Gradient>> {
        self.gradients
            .get_radial(&mut self.ctx, "cloud", 50.0, 24.0, 5.0, 50.0, 24.0, 50.0, CLOUD_BODY)
            .ok()
    }

    pub fn draw_sky(&mut self) {
        let (w, h) = (self.viewport.width as f32, self.viewport.height as f32);
        match self.sky_gradient() {
            Some(sky) => self.ctx.set_fill_gradient(&sky),
            None => self.ctx.set_fill_color(palette::BG_MID),
        }
        self.ctx.fill_rect(0.0, 0.0, w, h);
    }

    /// Street, curb and the dashed centre line scrolling with `distance`
    pub fn draw_ground(&mut self, distance: f32) {
        let scale = self.scale();
        let (w, h) = (self.viewport.width as f32, self.viewport.height as f32);
        let ctx = &mut self.ctx;

        ctx.set_fill_color(palette::BG_NEAR);
        ctx.fill_rect(0.0, GROUND_Y * scale, w, h);
        ctx.set_fill_color(palette::BG_SURFACE);
        ctx.fill_rect(0.0, (GROUND_Y - 2.0) * scale, w, 4.0 * scale);

        ctx.set_fill_color(palette::YELLOW);
        let logical_width = self.viewport.logical_width();
        let mut x = -(distance.rem_euclid(DASH_PERIOD));
        while x < logical_width {
            ctx.fill_rect(x * scale, (GAME_HEIGHT - 35.0) * scale, DASH_LENGTH * scale, 3.0 * scale);
            x += DASH_PERIOD;
        }

        if !self.profile.glow_effects {
            return;
        }
        if let Ok(glow) =
            self.gradients
                .get_linear(&mut self.ctx, "street_glow", 0.0, h * 0.7, 0.0, h, STREET_GLOW)
        {
            self.ctx.set_fill_gradient(&glow);
            self.ctx.fill_rect(0.0, h * 0.7, w, h * 0.3);
        }
    }

    /// Composite the post-processing stack, in z-order
    pub fn draw_overlays<R: Rng>(&mut self, pass: OverlayPass, rng: &mut R) {
        let scale = self.scale();
        let params = self.cache_params();
        let profile = self.profile;

        if pass.playing && profile.action_lines {
            self.cache.draw_action_lines(&mut self.ctx, params);
        }
        if profile.halftone {
            self.cache.draw_halftone(&mut self.ctx, params);
        }
        if profile.color_misregistration {
            overlays::draw_color_misregistration(&mut self.ctx, scale);
        }
        if profile.chromatic_aberration {
            overlays::draw_chromatic_aberration(&mut self.ctx, scale, pass.glitch);
        }
        overlays::draw_vignette(&mut self.ctx, &mut self.gradients);
        if profile.scanlines {
            self.cache.draw_scanlines(&mut self.ctx, params);
        }
        overlays::draw_edge_bleed(&mut self.ctx, &mut self.gradients);
        overlays::draw_ink_drips(&mut self.ctx, scale, pass.frame);
        if pass.glitch {
            overlays::draw_glitch_strips(&mut self.ctx, scale, rng);
        }
        overlays::draw_panel_borders(&mut self.ctx, scale);
    }

    pub fn draw_title(&mut self) {
        let scale = self.scale();
        overlays::draw_title(&mut self.ctx, scale);
    }

    pub fn draw_game_over(&mut self, reason: &str, score: u32) {
        let scale = self.scale();
        overlays::draw_game_over(&mut self.ctx, scale, reason, score);
    }

    pub fn draw_hud(&mut self, score: u32, high_score: u32, fps: Option<u32>) {
        let scale = self.scale();
        overlays::draw_hud(&mut self.ctx, scale, score, high_score, fps);
    }
}
