//! Glider enemy and its lobbed bombs
//!
//! The enemy flies in from the right, throws one bomb when it gets close to
//! the player and keeps going. Bombs follow a fixed ballistic arc aimed at
//! where the player stood when the throw happened.

use glam::Vec2;

use super::collision::Rect;
use super::pool::{Drawable, Poolable};
use crate::consts::{GAME_HEIGHT, OFFSCREEN_MARGIN};
use crate::renderer::Canvas;

pub const ENEMY_WIDTH: f32 = 70.0;
pub const ENEMY_HEIGHT: f32 = 60.0;
const ENEMY_SPEED_FACTOR: f32 = 0.7;
/// Throw once within this distance ahead of the player
const THROW_RANGE: f32 = 100.0;

const BOMB_AIM: f32 = 0.012;
const BOMB_LAUNCH_VY: f32 = -4.0;
const BOMB_GRAVITY: f32 = 0.2;
const BOMB_SIZE: f32 = 16.0;

/// Result of one enemy update
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EnemyStep {
    /// Bomb launch `(x, y, target_x)` if it threw this frame
    pub thrown: Option<(f32, f32, f32)>,
    pub offscreen: bool,
}

#[derive(Debug, Clone)]
pub struct Enemy {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    speed: f32,
    flame: f32,
    has_thrown: bool,
}

impl Enemy {
    /// Enter from the right at altitude `y`
    pub fn new(logical_width: f32, y: f32, game_speed: f32) -> Self {
        Self {
            x: logical_width + OFFSCREEN_MARGIN,
            y,
            w: ENEMY_WIDTH,
            h: ENEMY_HEIGHT,
            speed: game_speed * ENEMY_SPEED_FACTOR,
            flame: 0.0,
            has_thrown: false,
        }
    }

    pub fn has_thrown(&self) -> bool {
        self.has_thrown
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.w, self.h).inset(10.0, 0.0, 10.0, 0.0)
    }

    pub fn update(&mut self, dt: f32, player_x: f32) -> EnemyStep {
        self.x -= self.speed * dt;
        self.flame += 0.3 * dt;

        let mut step = EnemyStep::default();
        if !self.has_thrown && self.x < player_x + THROW_RANGE {
            self.has_thrown = true;
            step.thrown = Some((self.x + 35.0, self.y + 50.0, player_x));
        }
        step.offscreen = self.x + self.w < -OFFSCREEN_MARGIN;
        step
    }

    pub fn draw<C: Canvas>(&self, ctx: &mut C, scale: f32, glow: bool) {
        ctx.save();
        ctx.translate(self.x * scale, self.y * scale);
        ctx.scale(scale, scale);

        // Glider
        ctx.set_fill_color("#6a0dad");
        ctx.begin_path();
        ctx.move_to(5.0, 52.0);
        ctx.quadratic_curve_to(35.0, 48.0, 65.0, 52.0);
        ctx.quadratic_curve_to(35.0, 58.0, 5.0, 52.0);
        ctx.fill();

        // Thrusters
        let flame = 8.0 + self.flame.sin() * 3.0;
        if glow {
            ctx.set_shadow("#ff6600", 12.0);
        }
        ctx.set_fill_color("#ffaa00");
        for x in [8.0, 62.0] {
            ctx.begin_path();
            ctx.circle(x, 55.0, flame);
            ctx.fill();
        }
        ctx.set_shadow("transparent", 0.0);

        // Body and arms
        ctx.set_fill_color("#32cd32");
        ctx.begin_path();
        ctx.full_ellipse(35.0, 30.0, 18.0, 22.0, 0.0);
        ctx.fill();
        ctx.set_fill_color("#228b22");
        ctx.begin_path();
        ctx.full_ellipse(15.0, 28.0, 6.0, 10.0, -0.3);
        ctx.fill();
        ctx.begin_path();
        ctx.full_ellipse(55.0, 28.0, 6.0, 10.0, 0.3);
        ctx.fill();

        ctx.set_fill_color("#4b0082");
        for x in [12.0, 58.0] {
            ctx.begin_path();
            ctx.circle(x, 36.0, 5.0);
            ctx.fill();
        }

        // Head and horns
        ctx.set_fill_color("#32cd32");
        ctx.begin_path();
        ctx.full_ellipse(35.0, 8.0, 15.0, 14.0, 0.0);
        ctx.fill();
        ctx.set_fill_color("#4b0082");
        for (base, tip, ctrl) in [(22.0, 18.0, 24.0), (48.0, 52.0, 46.0)] {
            ctx.begin_path();
            ctx.move_to(base, 2.0);
            ctx.quadratic_curve_to(tip, -8.0, ctrl, -6.0);
            ctx.quadratic_curve_to(if base < 35.0 { 26.0 } else { 44.0 }, 0.0, base, 2.0);
            ctx.fill();
        }

        // Eyes
        ctx.set_fill_color("#ffd700");
        ctx.begin_path();
        ctx.full_ellipse(28.0, 6.0, 5.0, 4.0, -0.2);
        ctx.fill();
        ctx.begin_path();
        ctx.full_ellipse(42.0, 6.0, 5.0, 4.0, 0.2);
        ctx.fill();
        ctx.set_fill_color("#000000");
        for x in [29.0, 41.0] {
            ctx.begin_path();
            ctx.circle(x, 6.0, 2.0);
            ctx.fill();
        }

        // Grin
        ctx.set_stroke_color("#000000");
        ctx.set_line_width(2.0);
        ctx.begin_path();
        ctx.arc(35.0, 12.0, 8.0, 0.2, std::f32::consts::PI - 0.2);
        ctx.stroke();

        ctx.restore();
    }
}

/// Lobbed pumpkin bomb, pooled
#[derive(Debug, Clone, Default)]
pub struct Projectile {
    pub pos: Vec2,
    pub vel: Vec2,
    rotation: f32,
    glow: f32,
}

impl Projectile {
    pub fn bounds(&self) -> Rect {
        let half = BOMB_SIZE / 2.0;
        Rect::new(self.pos.x - half, self.pos.y - half, BOMB_SIZE, BOMB_SIZE)
    }
}

impl Poolable for Projectile {
    /// Launch point and the target x captured at throw time
    type Args = (f32, f32, f32);

    fn reset(&mut self, (x, y, target_x): Self::Args) {
        self.pos = Vec2::new(x, y);
        self.vel = Vec2::new((target_x - x) * BOMB_AIM, BOMB_LAUNCH_VY);
        self.rotation = 0.0;
        self.glow = 0.0;
    }

    fn update(&mut self, dt: f32) -> bool {
        self.pos += self.vel * dt;
        self.vel.y += BOMB_GRAVITY * dt;
        self.rotation += 0.1 * dt;
        self.glow += 0.2 * dt;
        self.pos.y > GAME_HEIGHT + OFFSCREEN_MARGIN
    }
}

impl Drawable for Projectile {
    fn draw<C: Canvas>(&self, ctx: &mut C, scale: f32) {
        ctx.save();
        ctx.translate(self.pos.x * scale, self.pos.y * scale);
        ctx.rotate(self.rotation);
        ctx.scale(scale, scale);

        let halo = 12.0 + self.glow.sin() * 4.0;
        ctx.set_global_alpha(0.35);
        ctx.set_fill_color("#00ff00");
        ctx.begin_path();
        ctx.circle(0.0, 0.0, halo);
        ctx.fill();
        ctx.set_global_alpha(1.0);

        ctx.set_fill_color("#ff8822");
        ctx.begin_path();
        ctx.circle(0.0, 0.0, 10.0);
        ctx.fill();

        // Face
        ctx.set_fill_color("#00ff00");
        for dir in [-1.0, 1.0] {
            ctx.begin_path();
            ctx.move_to(5.0 * dir, -3.0);
            ctx.line_to(3.0 * dir, -6.0);
            ctx.line_to(1.0 * dir, -3.0);
            ctx.fill();
        }
        ctx.begin_path();
        ctx.arc(0.0, 2.0, 5.0, 0.0, std::f32::consts::PI);
        ctx.fill();

        ctx.set_fill_color("#228b22");
        ctx.fill_rect(-2.0, -13.0, 4.0, 4.0);
        ctx.restore();
    }
}
