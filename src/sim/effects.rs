//! Pooled cosmetic effects
//!
//! Every effect is reset in place from its acquire arguments. Effects that
//! need jitter get a seed in those arguments and derive it locally, so the
//! director's rng stream does not depend on how many effects are alive.

use std::f32::consts::TAU;
use std::fmt::Write;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::obstacle::BoltPath;
use super::pool::{Drawable, Pool, Poolable};
use crate::renderer::{Canvas, palette};

const COMIC_TEXT_FONT: &str = "bold 42px Bangers";
const POPUP_FONT: &str = "bold 20px Bangers";
const COMBO_FONT: &str = "bold 28px Bangers";

fn seeded(seed: u64) -> Pcg32 {
    Pcg32::seed_from_u64(seed)
}

#[derive(Debug, Clone, Copy, Default)]
struct InkDrop {
    angle: f32,
    dist: f32,
    size: f32,
}

const MAX_INK_DROPS: usize = 10;
const INK_LIFE: f32 = 40.0;

/// Ink blot that pops up then shrinks away
#[derive(Debug, Clone, Default)]
pub struct InkSplatter {
    pos: Vec2,
    color: &'static str,
    life: f32,
    scale: f32,
    rotation: f32,
    drops: [InkDrop; MAX_INK_DROPS],
    drop_count: usize,
}

impl Poolable for InkSplatter {
    /// `(x, y, color, seed)`
    type Args = (f32, f32, &'static str, u64);

    fn reset(&mut self, (x, y, color, seed): Self::Args) {
        let mut rng = seeded(seed);
        self.pos = Vec2::new(x, y);
        self.color = color;
        self.life = INK_LIFE;
        self.scale = 0.0;
        self.rotation = rng.random::<f32>() * TAU;
        self.drop_count = rng.random_range(5..=MAX_INK_DROPS);
        for drop in &mut self.drops[..self.drop_count] {
            *drop = InkDrop {
                angle: rng.random::<f32>() * TAU,
                dist: 5.0 + rng.random::<f32>() * 15.0,
                size: 2.0 + rng.random::<f32>() * 4.0,
            };
        }
    }

    fn update(&mut self, dt: f32) -> bool {
        self.life -= dt;
        if self.life > 30.0 {
            self.scale = (self.scale + 0.15 * dt).min(1.0);
        } else {
            self.scale *= 0.95f32.powf(dt);
        }
        self.life <= 0.0
    }
}

impl Drawable for InkSplatter {
    fn draw<C: Canvas>(&self, ctx: &mut C, scale: f32) {
        ctx.save();
        ctx.translate(self.pos.x * scale, self.pos.y * scale);
        ctx.rotate(self.rotation);
        ctx.scale(self.scale * scale, self.scale * scale);
        ctx.set_fill_color(self.color);
        ctx.begin_path();
        ctx.circle(0.0, 0.0, 8.0);
        ctx.fill();
        for drop in &self.drops[..self.drop_count] {
            ctx.begin_path();
            ctx.circle(drop.angle.cos() * drop.dist, drop.angle.sin() * drop.dist, drop.size);
            ctx.fill();
        }
        ctx.restore();
    }
}

const SPEED_LINE_LIFE: f32 = 8.0;

/// Horizontal streak trailing the player
#[derive(Debug, Clone, Default)]
pub struct SpeedLine {
    x: f32,
    y: f32,
    length: f32,
    life: f32,
    color: &'static str,
    game_speed: f32,
}

impl Poolable for SpeedLine {
    /// `(y, game_speed, seed)`
    type Args = (f32, f32, u64);

    fn reset(&mut self, (y, game_speed, seed): Self::Args) {
        let mut rng = seeded(seed);
        self.x = 150.0;
        self.y = y;
        self.length = 50.0 + rng.random::<f32>() * 100.0;
        self.life = SPEED_LINE_LIFE;
        self.color = if rng.random_bool(0.5) { palette::CYAN } else { palette::PINK };
        self.game_speed = game_speed;
    }

    fn update(&mut self, dt: f32) -> bool {
        self.life -= dt;
        self.x -= self.game_speed * 2.0 * dt;
        self.life <= 0.0
    }
}

impl Drawable for SpeedLine {
    fn draw<C: Canvas>(&self, ctx: &mut C, scale: f32) {
        ctx.save();
        ctx.set_global_alpha((self.life / SPEED_LINE_LIFE).max(0.0));
        ctx.set_stroke_color(self.color);
        ctx.set_line_width(2.0 * scale);
        ctx.set_round_lines();
        ctx.begin_path();
        ctx.move_to(self.x * scale, self.y * scale);
        ctx.line_to((self.x - self.length) * scale, self.y * scale);
        ctx.stroke();
        ctx.restore();
    }
}

const AFTER_IMAGE_LIFE: f32 = 6.0;

/// Fading silhouette left behind the player
#[derive(Debug, Clone, Default)]
pub struct AfterImage {
    x: f32,
    y: f32,
    w: f32,
    h: f32,
    life: f32,
}

impl Poolable for AfterImage {
    /// Player bounds `(x, y, w, h)`
    type Args = (f32, f32, f32, f32);

    fn reset(&mut self, (x, y, w, h): Self::Args) {
        self.x = x;
        self.y = y;
        self.w = w;
        self.h = h;
        self.life = AFTER_IMAGE_LIFE;
    }

    fn update(&mut self, dt: f32) -> bool {
        self.life -= dt;
        self.life <= 0.0
    }
}

impl Drawable for AfterImage {
    fn draw<C: Canvas>(&self, ctx: &mut C, scale: f32) {
        ctx.save();
        ctx.set_global_alpha((self.life / (AFTER_IMAGE_LIFE * 2.0)).max(0.0));
        ctx.set_fill_color(palette::CYAN);
        ctx.begin_path();
        ctx.full_ellipse(
            (self.x + self.w / 2.0) * scale,
            (self.y + self.h / 2.0) * scale,
            self.w / 2.0 * scale,
            self.h / 2.0 * scale,
            0.0,
        );
        ctx.fill();
        ctx.restore();
    }
}

const COMIC_TEXT_LIFE: f32 = 35.0;

/// Onomatopoeia that pops in, holds, then shrinks while rising
#[derive(Debug, Clone, Default)]
pub struct ComicText {
    text: &'static str,
    pos: Vec2,
    life: f32,
    scale: f32,
    rotation: f32,
    color: &'static str,
}

impl ComicText {
    pub fn text(&self) -> &'static str {
        self.text
    }
}

impl Poolable for ComicText {
    /// `(text, x, y, color, seed)`; no color picks yellow or white
    type Args = (&'static str, f32, f32, Option<&'static str>, u64);

    fn reset(&mut self, (text, x, y, color, seed): Self::Args) {
        let mut rng = seeded(seed);
        self.text = text;
        self.pos = Vec2::new(x, y);
        self.life = COMIC_TEXT_LIFE;
        self.scale = 0.0;
        self.rotation = (rng.random::<f32>() - 0.5) * 0.3;
        self.color = color.unwrap_or(if rng.random_bool(0.5) { palette::YELLOW } else { palette::WHITE });
    }

    fn update(&mut self, dt: f32) -> bool {
        self.life -= dt;
        if self.life > 25.0 {
            self.scale = (self.scale + 0.2 * dt).min(1.2);
        } else if self.life > 15.0 {
            self.scale = 1.0;
        } else {
            self.scale *= 0.88f32.powf(dt);
        }
        self.pos.y -= 1.5 * dt;
        self.life <= 0.0
    }
}

impl Drawable for ComicText {
    fn draw<C: Canvas>(&self, ctx: &mut C, scale: f32) {
        ctx.save();
        ctx.translate(self.pos.x * scale, self.pos.y * scale);
        ctx.rotate(self.rotation);
        let s = self.scale * scale * 0.5;
        ctx.scale(s, s);
        ctx.set_font(COMIC_TEXT_FONT);
        ctx.set_text_align("center");

        ctx.set_shadow(self.color, 10.0);
        ctx.set_stroke_color(palette::BLACK);
        ctx.set_line_width(8.0);
        ctx.stroke_text(self.text, 0.0, 0.0);
        ctx.set_line_width(4.0);
        ctx.set_stroke_color(palette::PINK);
        ctx.stroke_text(self.text, 2.0, 2.0);

        ctx.set_shadow("transparent", 0.0);
        ctx.set_fill_color(self.color);
        ctx.fill_text(self.text, 0.0, 0.0);
        ctx.set_fill_color("rgba(255, 255, 255, 0.3)");
        ctx.fill_text(self.text, -1.0, -1.0);
        ctx.restore();
    }
}

const EXPLOSION_LIFE: f32 = 50.0;
pub const EXPLOSION_PARTICLES: usize = 20;
const PARTICLE_GRAVITY: f32 = 0.15;
const PARTICLE_FRICTION: f32 = 0.96;
const PARTICLE_MIN_SIZE: f32 = 1.0;
const EXPLOSION_COLORS: [&str; 4] = [palette::ORANGE, palette::ORANGE_HOT, palette::YELLOW, palette::SYMBIOTE_GREEN];

/// Ballistic debris from a bomb burst
#[derive(Debug, Clone, Default)]
pub struct ExplosionParticle {
    pos: Vec2,
    vel: Vec2,
    size: f32,
    life: f32,
    color: &'static str,
}

impl ExplosionParticle {
    pub fn size(&self) -> f32 {
        self.size
    }
}

impl Poolable for ExplosionParticle {
    /// `(x, y, seed)`
    type Args = (f32, f32, u64);

    fn reset(&mut self, (x, y, seed): Self::Args) {
        let mut rng = seeded(seed);
        let angle = rng.random::<f32>() * TAU;
        let speed = 2.0 + rng.random::<f32>() * 6.0;
        self.pos = Vec2::new(x, y);
        self.vel = Vec2::from_angle(angle) * speed - Vec2::new(0.0, 2.0);
        self.size = 3.0 + rng.random::<f32>() * 5.0;
        self.life = EXPLOSION_LIFE;
        self.color = EXPLOSION_COLORS[rng.random_range(0..EXPLOSION_COLORS.len())];
    }

    fn update(&mut self, dt: f32) -> bool {
        self.pos += self.vel * dt;
        self.vel *= PARTICLE_FRICTION.powf(dt);
        self.vel.y += PARTICLE_GRAVITY * dt;
        self.size = (self.size * 0.94f32.powf(dt)).max(PARTICLE_MIN_SIZE);
        self.life -= dt;
        self.life <= 0.0
    }
}

impl Drawable for ExplosionParticle {
    fn draw<C: Canvas>(&self, ctx: &mut C, scale: f32) {
        ctx.save();
        ctx.set_global_alpha((self.life / EXPLOSION_LIFE).clamp(0.0, 1.0));
        ctx.set_fill_color(self.color);
        ctx.begin_path();
        ctx.circle(self.pos.x * scale, self.pos.y * scale, self.size * scale);
        ctx.fill();
        ctx.restore();
    }
}

const POPUP_LIFE: f32 = 60.0;

/// Floating "+N" over a scoring event
#[derive(Debug, Clone, Default)]
pub struct ScorePopup {
    pos: Vec2,
    vy: f32,
    life: f32,
    text: String,
}

impl ScorePopup {
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl Poolable for ScorePopup {
    /// `(x, y, points)`
    type Args = (f32, f32, u32);

    fn reset(&mut self, (x, y, points): Self::Args) {
        self.pos = Vec2::new(x, y);
        self.vy = -3.0;
        self.life = POPUP_LIFE;
        // Reuses the buffer's allocation
        self.text.clear();
        let _ = write!(self.text, "+{points}");
    }

    fn update(&mut self, dt: f32) -> bool {
        self.pos.y += self.vy * dt;
        self.vy *= 0.95f32.powf(dt);
        self.life -= dt;
        self.life <= 0.0
    }
}

impl Drawable for ScorePopup {
    fn draw<C: Canvas>(&self, ctx: &mut C, scale: f32) {
        ctx.save();
        ctx.translate(self.pos.x * scale, self.pos.y * scale);
        ctx.scale(scale, scale);
        ctx.set_global_alpha((self.life / POPUP_LIFE).clamp(0.0, 1.0));
        ctx.set_font(POPUP_FONT);
        ctx.set_text_align("center");
        ctx.set_stroke_color(palette::BLACK);
        ctx.set_line_width(4.0);
        ctx.stroke_text(&self.text, 0.0, 0.0);
        ctx.set_fill_color(palette::YELLOW);
        ctx.fill_text(&self.text, 0.0, 0.0);
        ctx.restore();
    }
}

const FLASH_LIFE: f32 = 12.0;
const FLASH_REGEN_CHANCE: f64 = 0.3;

/// Short cosmetic strike flash from a cloud to the street
#[derive(Debug, Clone)]
pub struct LightningBolt {
    x: f32,
    y: f32,
    height: f32,
    life: f32,
    path: BoltPath,
    rng: Pcg32,
}

impl Default for LightningBolt {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            height: 0.0,
            life: 0.0,
            path: BoltPath::default(),
            rng: seeded(0),
        }
    }
}

impl Poolable for LightningBolt {
    /// `(x, y, height, seed)`
    type Args = (f32, f32, f32, u64);

    fn reset(&mut self, (x, y, height, seed): Self::Args) {
        self.x = x;
        self.y = y;
        self.height = height;
        self.life = FLASH_LIFE;
        self.rng = seeded(seed);
        self.path.regenerate(&mut self.rng, 0.0, 30.0, height);
    }

    fn update(&mut self, dt: f32) -> bool {
        self.life -= dt;
        if self.rng.random_bool(FLASH_REGEN_CHANCE) {
            self.path.regenerate(&mut self.rng, 0.0, 30.0, self.height);
        }
        self.life <= 0.0
    }
}

impl Drawable for LightningBolt {
    fn draw<C: Canvas>(&self, ctx: &mut C, scale: f32) {
        ctx.save();
        ctx.translate(self.x * scale, self.y * scale);
        ctx.scale(scale, scale);
        ctx.set_round_lines();
        ctx.set_global_alpha((self.life / FLASH_LIFE).clamp(0.0, 1.0));
        ctx.set_stroke_color(palette::ELECTRIC_BLUE);
        ctx.set_line_width(3.0);
        self.path.trace_main(ctx);
        ctx.set_line_width(1.5);
        self.path.trace_branches(ctx);
        ctx.set_stroke_color(palette::WHITE);
        ctx.set_line_width(1.0);
        self.path.trace_main(ctx);
        ctx.restore();
    }
}

const RING_LIFE: f32 = 20.0;
const RING_COUNT: usize = 3;

/// Expanding rings around a near miss
#[derive(Debug, Clone, Default)]
pub struct NearMissRing {
    pos: Vec2,
    life: f32,
}

impl NearMissRing {
    fn radius(&self) -> f32 {
        10.0 + (RING_LIFE - self.life) * 3.0
    }
}

impl Poolable for NearMissRing {
    type Args = (f32, f32);

    fn reset(&mut self, (x, y): Self::Args) {
        self.pos = Vec2::new(x, y);
        self.life = RING_LIFE;
    }

    fn update(&mut self, dt: f32) -> bool {
        self.life -= dt;
        self.life <= 0.0
    }
}

impl Drawable for NearMissRing {
    fn draw<C: Canvas>(&self, ctx: &mut C, scale: f32) {
        let alpha = (self.life / RING_LIFE).clamp(0.0, 1.0);
        ctx.save();
        ctx.set_stroke_color(palette::CYAN);
        ctx.set_line_width(2.0 * scale);
        for i in 0..RING_COUNT {
            ctx.set_global_alpha(alpha / (i + 1) as f32);
            ctx.begin_path();
            ctx.circle(self.pos.x * scale, self.pos.y * scale, (self.radius() - i as f32 * 6.0).max(1.0) * scale);
            ctx.stroke();
        }
        ctx.restore();
    }
}

const COMBO_LIFE: f32 = 45.0;

/// "xN COMBO!" with a bounce-then-settle scale
#[derive(Debug, Clone, Default)]
pub struct ComboText {
    pos: Vec2,
    life: f32,
    text: String,
}

impl ComboText {
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Overshoots to 1.4, falls back to 1.0 and holds
    pub fn scale(&self) -> f32 {
        let t = 1.0 - self.life / COMBO_LIFE;
        if t < 0.2 {
            t / 0.2 * 1.4
        } else if t < 0.35 {
            1.4 - (t - 0.2) / 0.15 * 0.4
        } else {
            1.0
        }
    }
}

impl Poolable for ComboText {
    /// `(x, y, combo)`
    type Args = (f32, f32, u32);

    fn reset(&mut self, (x, y, combo): Self::Args) {
        self.pos = Vec2::new(x, y);
        self.life = COMBO_LIFE;
        self.text.clear();
        let _ = write!(self.text, "x{combo} COMBO!");
    }

    fn update(&mut self, dt: f32) -> bool {
        self.life -= dt;
        self.pos.y -= 0.5 * dt;
        self.life <= 0.0
    }
}

impl Drawable for ComboText {
    fn draw<C: Canvas>(&self, ctx: &mut C, scale: f32) {
        let s = self.scale() * scale;
        ctx.save();
        ctx.translate(self.pos.x * scale, self.pos.y * scale);
        ctx.scale(s, s);
        ctx.set_global_alpha((self.life / 15.0).clamp(0.0, 1.0));
        ctx.set_font(COMBO_FONT);
        ctx.set_text_align("center");
        ctx.set_stroke_color(palette::BLACK);
        ctx.set_line_width(5.0);
        ctx.stroke_text(&self.text, 0.0, 0.0);
        ctx.set_fill_color(palette::CYAN);
        ctx.fill_text(&self.text, 0.0, 0.0);
        ctx.restore();
    }
}

/// Every effect pool the director drives
pub struct EffectPools {
    pub ink_splatters: Pool<InkSplatter>,
    pub speed_lines: Pool<SpeedLine>,
    pub after_images: Pool<AfterImage>,
    pub comic_texts: Pool<ComicText>,
    pub explosions: Pool<ExplosionParticle>,
    pub score_popups: Pool<ScorePopup>,
    pub lightning_bolts: Pool<LightningBolt>,
    pub near_miss_rings: Pool<NearMissRing>,
    pub combo_texts: Pool<ComboText>,
}

impl EffectPools {
    /// `max_particles` caps the explosion pool
    pub fn new(max_particles: usize) -> Self {
        Self {
            ink_splatters: Pool::with_default(5, 20),
            speed_lines: Pool::with_default(10, 30),
            after_images: Pool::with_default(5, 15),
            comic_texts: Pool::with_default(5, 15),
            explosions: Pool::with_default(EXPLOSION_PARTICLES.min(max_particles), max_particles),
            score_popups: Pool::with_default(3, 10),
            lightning_bolts: Pool::with_default(2, 8),
            near_miss_rings: Pool::with_default(2, 6),
            combo_texts: Pool::with_default(2, 6),
        }
    }

    pub fn set_max_particles(&mut self, max_particles: usize) {
        self.explosions.set_max_size(max_particles);
    }

    pub fn update(&mut self, dt: f32) {
        self.ink_splatters.update(dt);
        self.speed_lines.update(dt);
        self.after_images.update(dt);
        self.comic_texts.update(dt);
        self.explosions.update(dt);
        self.score_popups.update(dt);
        self.lightning_bolts.update(dt);
        self.near_miss_rings.update(dt);
        self.combo_texts.update(dt);
    }

    /// Layers drawn behind the obstacles
    pub fn draw_trails<C: Canvas>(&self, ctx: &mut C, scale: f32) {
        self.after_images.draw(ctx, scale);
        self.speed_lines.draw(ctx, scale);
    }

    /// Layers drawn over the player
    pub fn draw_front<C: Canvas>(&self, ctx: &mut C, scale: f32) {
        self.lightning_bolts.draw(ctx, scale);
        self.explosions.draw(ctx, scale);
        self.ink_splatters.draw(ctx, scale);
        self.near_miss_rings.draw(ctx, scale);
        self.comic_texts.draw(ctx, scale);
        self.score_popups.draw(ctx, scale);
        self.combo_texts.draw(ctx, scale);
    }

    pub fn clear(&mut self) {
        self.ink_splatters.clear();
        self.speed_lines.clear();
        self.after_images.clear();
        self.comic_texts.clear();
        self.explosions.clear();
        self.score_popups.clear();
        self.lightning_bolts.clear();
        self.near_miss_rings.clear();
        self.combo_texts.clear();
    }

    /// Active count per pool, by name
    pub fn active_counts(&self) -> [(&'static str, usize); 9] {
        [
            ("ink_splatters", self.ink_splatters.active_count()),
            ("speed_lines", self.speed_lines.active_count()),
            ("after_images", self.after_images.active_count()),
            ("comic_texts", self.comic_texts.active_count()),
            ("explosions", self.explosions.active_count()),
            ("score_popups", self.score_popups.active_count()),
            ("lightning_bolts", self.lightning_bolts.active_count()),
            ("near_miss_rings", self.near_miss_rings.active_count()),
            ("combo_texts", self.combo_texts.active_count()),
        ]
    }

    pub fn total_active(&self) -> usize {
        self.active_counts().iter().map(|(_, n)| n).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::RecordingCanvas;

    #[test]
    fn test_ink_splatter_grows_then_shrinks() {
        let mut ink = InkSplatter::default();
        ink.reset((10.0, 10.0, palette::PINK, 7));
        assert!((5..=MAX_INK_DROPS).contains(&ink.drop_count));
        for _ in 0..7 {
            ink.update(1.0);
        }
        assert_eq!(ink.scale, 1.0);
        for _ in 0..10 {
            ink.update(1.0);
        }
        assert!(ink.scale < 1.0);
    }

    #[test]
    fn test_reset_clears_stale_state() {
        let mut ink = InkSplatter::default();
        ink.reset((0.0, 0.0, palette::PINK, 1));
        while !ink.update(1.0) {}
        ink.reset((5.0, 5.0, palette::CYAN, 1));
        assert_eq!(ink.life, INK_LIFE);
        assert_eq!(ink.scale, 0.0);
        assert_eq!(ink.color, palette::CYAN);

        let mut popup = ScorePopup::default();
        popup.reset((0.0, 0.0, 100));
        popup.reset((0.0, 0.0, 20));
        assert_eq!(popup.text(), "+20");
    }

    #[test]
    fn test_same_seed_same_jitter() {
        let mut a = ExplosionParticle::default();
        let mut b = ExplosionParticle::default();
        a.reset((0.0, 0.0, 99));
        b.reset((0.0, 0.0, 99));
        assert_eq!(a.vel, b.vel);
        assert_eq!(a.color, b.color);
    }

    #[test]
    fn test_explosion_particle_shrinks_to_floor() {
        let mut p = ExplosionParticle::default();
        p.reset((0.0, 0.0, 3));
        let mut frames = 0;
        while !p.update(1.0) {
            frames += 1;
            assert!(p.size() >= PARTICLE_MIN_SIZE);
        }
        assert_eq!(frames + 1, EXPLOSION_LIFE as usize);
        assert_eq!(p.size(), PARTICLE_MIN_SIZE);
    }

    #[test]
    fn test_score_popup_decelerates() {
        let mut popup = ScorePopup::default();
        popup.reset((0.0, 100.0, 10));
        popup.update(1.0);
        let first = 100.0 - popup.pos.y;
        let y = popup.pos.y;
        popup.update(1.0);
        assert!(y - popup.pos.y < first);
    }

    #[test]
    fn test_combo_scale_bounces_then_settles() {
        let mut combo = ComboText::default();
        combo.reset((0.0, 0.0, 3));
        assert_eq!(combo.text(), "x3 COMBO!");
        let mut peak = 0.0f32;
        for _ in 0..20 {
            combo.update(1.0);
            peak = peak.max(combo.scale());
        }
        assert!(peak > 1.3);
        assert_eq!(combo.scale(), 1.0);
    }

    #[test]
    fn test_comic_text_expires() {
        let mut text = ComicText::default();
        text.reset(("POW!", 0.0, 50.0, None, 2));
        let mut frames = 0;
        while !text.update(1.0) {
            frames += 1;
        }
        assert_eq!(frames + 1, COMIC_TEXT_LIFE as usize);
        assert!(text.pos.y < 0.0);
    }

    #[test]
    fn test_effect_pools_clear_and_draw() {
        let mut pools = EffectPools::new(30);
        pools.ink_splatters.acquire((10.0, 10.0, palette::PINK, 1));
        pools.speed_lines.acquire((100.0, 5.0, 2));
        pools.lightning_bolts.acquire((200.0, 80.0, 270.0, 3));
        pools.combo_texts.acquire((80.0, 200.0, 2));
        assert_eq!(pools.total_active(), 4);

        let mut ctx = RecordingCanvas::new(800, 400);
        pools.draw_trails(&mut ctx, 1.0);
        pools.draw_front(&mut ctx, 1.0);
        assert_eq!(ctx.depth(), 0);
        assert!(ctx.stats().strokes > 0);

        pools.clear();
        assert!(pools.active_counts().iter().all(|(_, n)| *n == 0));
    }

    #[test]
    fn test_particle_cap_follows_quality() {
        let mut pools = EffectPools::new(15);
        for seed in 0..40 {
            pools.explosions.acquire((0.0, 0.0, seed));
        }
        assert_eq!(pools.explosions.active_count(), 15);
        pools.set_max_particles(50);
        assert!(pools.explosions.acquire((0.0, 0.0, 41)).is_some());
    }
}
