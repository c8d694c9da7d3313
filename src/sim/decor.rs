//! Parallax background: storm clouds and city blocks

use std::f32::consts::TAU;

use rand::Rng;

use crate::consts::{GROUND_Y, OFFSCREEN_MARGIN};
use crate::renderer::Canvas;

pub const CLOUD_WIDTH: f32 = 100.0;
pub const CLOUD_HEIGHT: f32 = 60.0;
const CLOUD_PARALLAX: f32 = 0.5;
const BUILDING_PARALLAX: f32 = 0.12;

#[derive(Debug, Clone)]
pub struct Cloud {
    /// Stable id, used to address this cloud from timer events
    pub id: u32,
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    speed: f32,
    pulse: f32,
    cooldown: f32,
    charged: bool,
}

impl Cloud {
    pub fn new<R: Rng>(id: u32, x: f32, game_speed: f32, rng: &mut R) -> Self {
        Self {
            id,
            x,
            y: 20.0 + rng.random::<f32>() * 50.0,
            w: CLOUD_WIDTH,
            h: CLOUD_HEIGHT,
            speed: game_speed * CLOUD_PARALLAX,
            pulse: rng.random::<f32>() * TAU,
            cooldown: 0.0,
            charged: false,
        }
    }

    /// Drift left; `true` once off-screen
    pub fn update(&mut self, dt: f32) -> bool {
        self.x -= self.speed * dt;
        self.pulse += 0.05 * dt;
        self.cooldown = (self.cooldown - dt).max(0.0);
        self.x + self.w < -OFFSCREEN_MARGIN
    }

    pub fn can_strike(&self) -> bool {
        self.cooldown <= 0.0
    }

    /// Start a strike if off cooldown, returning the point under the cloud
    /// the bolt hangs from. The cloud glows until [`discharge`](Self::discharge).
    pub fn strike(&mut self, cooldown: f32) -> Option<(f32, f32)> {
        if !self.can_strike() {
            return None;
        }
        self.charged = true;
        self.cooldown = cooldown;
        Some((self.x + self.w / 2.0, self.y + self.h))
    }

    pub fn discharge(&mut self) {
        self.charged = false;
    }

    pub fn is_charged(&self) -> bool {
        self.charged
    }

    /// `body` is the shared cloud gradient when one could be built
    pub fn draw<C: Canvas>(&self, ctx: &mut C, scale: f32, body: Option<&C::Gradient>, glow: bool) {
        let (w, h) = (self.w, self.h);
        let pulse = 1.0 + self.pulse.sin() * 0.1;

        ctx.save();
        ctx.translate(self.x * scale, self.y * scale);
        ctx.scale(scale, scale);

        ctx.set_fill_color("rgba(0, 0, 0, 0.3)");
        ctx.begin_path();
        ctx.full_ellipse(w * 0.5 + 5.0, h * 0.6 + 5.0, w * 0.45, h * 0.4, 0.0);
        ctx.fill();

        match body {
            Some(gradient) => ctx.set_fill_gradient(gradient),
            None => ctx.set_fill_color("#3a3a5a"),
        }
        for (cx, cy, rx, ry) in [(0.3, 0.5, 0.25, 0.4), (0.5, 0.35, 0.3, 0.45), (0.7, 0.5, 0.25, 0.38)] {
            ctx.begin_path();
            ctx.full_ellipse(w * cx, h * cy, w * rx * pulse, h * ry, 0.0);
            ctx.fill();
        }

        if self.charged {
            if glow {
                ctx.set_shadow("#00bfff", 15.0);
            }
            ctx.set_global_alpha(0.6);
            ctx.set_fill_color("#00bfff");
            ctx.begin_path();
            ctx.full_ellipse(w * 0.5, h * 0.6, 30.0, 20.0, 0.0);
            ctx.fill();
        }

        ctx.set_stroke_color("#555555");
        ctx.set_line_width(1.0);
        ctx.stroke();
        ctx.restore();
    }
}

const WINDOW_W: f32 = 6.0;
const WINDOW_H: f32 = 8.0;
const WINDOW_STEP_X: f32 = 12.0;
const WINDOW_STEP_Y: f32 = 15.0;

#[derive(Debug, Clone)]
pub struct Building {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    speed: f32,
    columns: u32,
    rows: u32,
    /// One bit per window, row-major
    lit: u128,
}

impl Building {
    pub fn new<R: Rng>(x: f32, game_speed: f32, rng: &mut R) -> Self {
        let w = 50.0 + rng.random::<f32>() * 60.0;
        let h = 80.0 + rng.random::<f32>() * 120.0;
        let columns = ((w - 16.0) / WINDOW_STEP_X).ceil().max(0.0) as u32;
        let rows = ((h - 25.0) / WINDOW_STEP_Y).ceil().max(0.0) as u32;

        let mut lit = 0u128;
        for bit in 0..(columns * rows).min(128) {
            if rng.random_bool(0.6) {
                lit |= 1 << bit;
            }
        }
        Self {
            x,
            y: GROUND_Y - h,
            w,
            h,
            speed: game_speed * BUILDING_PARALLAX,
            columns,
            rows,
            lit,
        }
    }

    pub fn update(&mut self, dt: f32) -> bool {
        self.x -= self.speed * dt;
        self.x + self.w < -OFFSCREEN_MARGIN
    }

    pub fn window_count(&self) -> u32 {
        self.columns * self.rows
    }

    pub fn draw<C: Canvas>(&self, ctx: &mut C, scale: f32) {
        ctx.save();
        ctx.translate(self.x * scale, self.y * scale);
        ctx.scale(scale, scale);

        ctx.set_fill_color("#1a1a3a");
        ctx.fill_rect(0.0, 0.0, self.w, self.h);
        // Lit edge
        ctx.set_fill_color("#2a2a4a");
        ctx.fill_rect(0.0, 0.0, self.w * 0.1, self.h);

        for row in 0..self.rows {
            for col in 0..self.columns {
                let bit = row * self.columns + col;
                let lit = bit < 128 && self.lit & (1 << bit) != 0;
                ctx.set_fill_color(if lit { "#ffff66" } else { "#0a0a1a" });
                ctx.fill_rect(
                    8.0 + col as f32 * WINDOW_STEP_X,
                    10.0 + row as f32 * WINDOW_STEP_Y,
                    WINDOW_W,
                    WINDOW_H,
                );
            }
        }
        ctx.restore();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_cloud_strike_cooldown() {
        let mut rng = Pcg32::seed_from_u64(4);
        let mut cloud = Cloud::new(1, 300.0, 5.0, &mut rng);
        let (x, y) = cloud.strike(200.0).unwrap();
        assert_eq!(x, 350.0);
        assert_eq!(y, cloud.y + CLOUD_HEIGHT);
        assert!(cloud.is_charged());
        assert!(cloud.strike(200.0).is_none());

        cloud.discharge();
        for _ in 0..200 {
            cloud.update(1.0);
        }
        assert!(cloud.can_strike());
    }

    #[test]
    fn test_building_windows_fit_mask() {
        let mut rng = Pcg32::seed_from_u64(11);
        for _ in 0..100 {
            let b = Building::new(0.0, 5.0, &mut rng);
            assert!(b.window_count() <= 128);
            assert_eq!(b.y + b.h, GROUND_Y);
            assert!((50.0..=110.0).contains(&b.w));
        }
    }

    #[test]
    fn test_parallax_is_slower_than_game_speed() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut cloud = Cloud::new(0, 100.0, 10.0, &mut rng);
        let mut building = Building::new(100.0, 10.0, &mut rng);
        cloud.update(1.0);
        building.update(1.0);
        assert_eq!(cloud.x, 95.0);
        assert!((building.x - 98.8).abs() < 1e-4);
    }
}
