//! Post-processing overlays
//!
//! Full-screen comic-print layers composited over the finished scene in a
//! fixed order. Everything here works in device pixels.

use rand::Rng;

use super::canvas::{Canvas, ColorStop};
use super::gradient_cache::GradientCache;
use super::palette;

const VIGNETTE: &[ColorStop] = &[(0.0, "rgba(0, 0, 0, 0)"), (1.0, "rgba(0, 0, 0, 0.3)")];
const PINK_EDGE: &[ColorStop] = &[(0.0, "rgba(255, 0, 255, 0.25)"), (1.0, "rgba(255, 0, 255, 0)")];
const CYAN_EDGE: &[ColorStop] = &[(0.0, "rgba(0, 255, 255, 0.25)"), (1.0, "rgba(0, 255, 255, 0)")];

/// Offset cyan and magenta plates, like a misaligned print run
pub fn draw_color_misregistration<C: Canvas>(ctx: &mut C, scale: f32) {
    let (w, h) = (ctx.width() as f32, ctx.height() as f32);
    let offset = 2.0 * scale;
    ctx.save();
    ctx.set_composite("multiply");
    ctx.set_global_alpha(0.15);
    ctx.set_fill_color("cyan");
    ctx.fill_rect(-offset, -offset / 2.0, w, h);
    ctx.set_fill_color("magenta");
    ctx.fill_rect(offset, offset / 2.0, w, h);
    ctx.restore();
}

/// Red/cyan fringing, wider while a glitch is running
pub fn draw_chromatic_aberration<C: Canvas>(ctx: &mut C, scale: f32, glitch: bool) {
    let (w, h) = (ctx.width() as f32, ctx.height() as f32);
    let (offset, alpha) = if glitch { (6.0 * scale, 0.2) } else { (2.0 * scale, 0.08) };
    ctx.save();
    ctx.set_composite("screen");
    ctx.set_global_alpha(alpha);
    ctx.set_fill_color("#ff0040");
    ctx.fill_rect(-offset, 0.0, w, h);
    ctx.set_fill_color(palette::CYAN);
    ctx.fill_rect(offset, 0.0, w, h);
    ctx.restore();
}

/// Darkened corners from the cached radial gradient
pub fn draw_vignette<C: Canvas>(ctx: &mut C, gradients: &mut GradientCache<C::Gradient>) {
    let (w, h) = (ctx.width() as f32, ctx.height() as f32);
    let (cx, cy) = (w / 2.0, h / 2.0);
    match gradients.get_radial(ctx, "vignette", cx, cy, h * 0.2, cx, cy, h * 0.9, VIGNETTE) {
        Ok(vignette) => {
            ctx.set_fill_gradient(&vignette);
            ctx.fill_rect(0.0, 0.0, w, h);
        }
        Err(err) => log::debug!("Skipping vignette: {err}"),
    }
}

/// Pink bleed on the left edge, cyan on the right
pub fn draw_edge_bleed<C: Canvas>(ctx: &mut C, gradients: &mut GradientCache<C::Gradient>) {
    let (w, h) = (ctx.width() as f32, ctx.height() as f32);
    if let Ok(pink) = gradients.get_linear(ctx, "pink_edge", 0.0, 0.0, w * 0.15, 0.0, PINK_EDGE) {
        ctx.set_fill_gradient(&pink);
        ctx.fill_rect(0.0, 0.0, w * 0.15, h);
    }
    if let Ok(cyan) = gradients.get_linear(ctx, "cyan_edge", w, 0.0, w * 0.85, 0.0, CYAN_EDGE) {
        ctx.set_fill_gradient(&cyan);
        ctx.fill_rect(w * 0.85, 0.0, w * 0.15, h);
    }
}

/// Five ink drips hanging from the top edge, swaying with `frame`
pub fn draw_ink_drips<C: Canvas>(ctx: &mut C, scale: f32, frame: u64) {
    ctx.save();
    ctx.set_global_alpha(0.1);
    ctx.set_fill_color(palette::BLACK);
    for i in 0..5 {
        let x = (i as f32 * 200.0 + 50.0) * scale;
        let h = (20.0 + (frame as f32 * 0.01 + i as f32).sin() * 10.0) * scale;
        ctx.begin_path();
        ctx.move_to(x, 0.0);
        ctx.quadratic_curve_to(x + 5.0 * scale, h * 0.7, x + 3.0 * scale, h);
        ctx.quadratic_curve_to(x - 5.0 * scale, h * 0.7, x, 0.0);
        ctx.fill();
    }
    ctx.restore();
}

/// Re-blit a few random horizontal strips shifted sideways
pub fn draw_glitch_strips<C: Canvas, R: Rng>(ctx: &mut C, scale: f32, rng: &mut R) {
    const STRIPS: usize = 5;
    let height = ctx.height() as f32;
    for _ in 0..STRIPS {
        let y = rng.random::<f32>() * height;
        let h = 5.0 + rng.random::<f32>() * 20.0;
        let dx = (rng.random::<f32>() - 0.5) * 30.0 * scale;
        ctx.copy_strip(y, h, dx);
    }
}

/// Thick black frame with a white keyline and pink corner accents
pub fn draw_panel_borders<C: Canvas>(ctx: &mut C, scale: f32) {
    let (w, h) = (ctx.width() as f32, ctx.height() as f32);
    let border = 8.0 * scale;
    ctx.save();
    ctx.set_stroke_color(palette::BLACK);
    ctx.set_line_width(border);
    ctx.stroke_rect(border / 2.0, border / 2.0, w - border, h - border);

    let inset = border + 2.0;
    ctx.set_stroke_color(palette::WHITE);
    ctx.set_line_width(2.0 * scale);
    ctx.stroke_rect(inset, inset, w - inset * 2.0 - 4.0 + border, h - inset * 2.0 - 4.0 + border);

    let corner = 20.0 * scale;
    ctx.set_fill_color(palette::PINK);
    for (x, y, across, down) in [
        (0.0, 0.0, 1.0, 1.0),
        (w, 0.0, -1.0, 1.0),
        (0.0, h, 1.0, -1.0),
        (w, h, -1.0, -1.0),
    ] {
        let hx = if across > 0.0 { x } else { x - corner };
        let vy = if down > 0.0 { y } else { y - corner };
        let bx = if across > 0.0 { x } else { x - border };
        let by = if down > 0.0 { y } else { y - border };
        ctx.fill_rect(hx, by, corner, border);
        ctx.fill_rect(bx, vy, border, corner);
    }
    ctx.restore();
}

fn outlined_text<C: Canvas>(ctx: &mut C, text: &str, x: f32, y: f32, fill: &str, outline: f32) {
    ctx.set_stroke_color(palette::BLACK);
    ctx.set_line_width(outline);
    ctx.stroke_text(text, x, y);
    ctx.set_fill_color(fill);
    ctx.fill_text(text, x, y);
}

/// Start screen title block
pub fn draw_title<C: Canvas>(ctx: &mut C, scale: f32) {
    let (w, h) = (ctx.width() as f32, ctx.height() as f32);
    ctx.save();
    ctx.set_text_align("center");
    ctx.set_font(&format!("bold {}px {}", (60.0 * scale).round(), palette::COMIC_FONT));
    outlined_text(ctx, "SYMBIOTE RUSH", w / 2.0, h * 0.25, palette::PINK, 8.0 * scale);
    ctx.set_font(&format!("bold {}px {}", (24.0 * scale).round(), palette::COMIC_FONT));
    outlined_text(ctx, "PRESS SPACE OR TAP TO RUN", w / 2.0, h * 0.32, palette::CYAN, 4.0 * scale);
    ctx.restore();
}

/// Game-over banner with the death reason
pub fn draw_game_over<C: Canvas>(ctx: &mut C, scale: f32, reason: &str, score: u32) {
    let (w, h) = (ctx.width() as f32, ctx.height() as f32);
    ctx.save();
    ctx.set_global_alpha(0.5);
    ctx.set_fill_color(palette::BLACK);
    ctx.fill_rect(0.0, 0.0, w, h);
    ctx.set_global_alpha(1.0);
    ctx.set_text_align("center");
    ctx.set_font(&format!("bold {}px {}", (48.0 * scale).round(), palette::COMIC_FONT));
    outlined_text(ctx, reason, w / 2.0, h * 0.4, palette::YELLOW, 6.0 * scale);
    ctx.set_font(&format!("bold {}px {}", (24.0 * scale).round(), palette::COMIC_FONT));
    outlined_text(ctx, &format!("SCORE: {score:05}"), w / 2.0, h * 0.5, palette::WHITE, 4.0 * scale);
    ctx.restore();
}

/// Score and high score in the top corners, FPS underneath when enabled
pub fn draw_hud<C: Canvas>(ctx: &mut C, scale: f32, score: u32, high_score: u32, fps: Option<u32>) {
    let w = ctx.width() as f32;
    ctx.save();
    ctx.set_font(&format!("{}px {}", (22.0 * scale).round(), palette::COMIC_FONT));
    ctx.set_text_align("right");
    outlined_text(ctx, &format!("{score:05}"), w - 20.0 * scale, 36.0 * scale, palette::WHITE, 3.0 * scale);
    ctx.set_text_align("left");
    outlined_text(ctx, &format!("HI {high_score:05}"), 20.0 * scale, 36.0 * scale, palette::CYAN, 3.0 * scale);
    if let Some(fps) = fps {
        ctx.set_font(&format!("{}px monospace", (12.0 * scale).round()));
        ctx.set_fill_color(palette::SYMBIOTE_GREEN);
        ctx.fill_text(&format!("{fps} FPS"), 20.0 * scale, 56.0 * scale);
    }
    ctx.restore();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::headless::RecordingCanvas;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_overlays_balance_save_restore() {
        let mut ctx = RecordingCanvas::new(800, 400);
        let mut gradients = GradientCache::new();
        let mut rng = Pcg32::seed_from_u64(1);

        draw_color_misregistration(&mut ctx, 1.0);
        draw_chromatic_aberration(&mut ctx, 1.0, true);
        draw_vignette(&mut ctx, &mut gradients);
        draw_edge_bleed(&mut ctx, &mut gradients);
        draw_ink_drips(&mut ctx, 1.0, 42);
        draw_glitch_strips(&mut ctx, 1.0, &mut rng);
        draw_panel_borders(&mut ctx, 1.0);
        draw_hud(&mut ctx, 1.0, 12, 300, Some(60));
        assert_eq!(ctx.depth(), 0);
        assert_eq!(ctx.stats().strip_copies, 5);
    }

    #[test]
    fn test_edge_gradients_are_reused_across_frames() {
        let mut ctx = RecordingCanvas::new(800, 400);
        let mut gradients = GradientCache::new();
        for _ in 0..10 {
            draw_vignette(&mut ctx, &mut gradients);
            draw_edge_bleed(&mut ctx, &mut gradients);
        }
        assert_eq!(ctx.stats().gradients_created, 3);
    }
}
