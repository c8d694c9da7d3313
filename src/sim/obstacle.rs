//! Street obstacles and cloud-to-ground lightning
//!
//! The four obstacle kinds share one struct; everything that differs is
//! looked up from [`ObstacleKind`].

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use crate::consts::{GAME_HEIGHT, GROUND_Y, OFFSCREEN_MARGIN};
use crate::renderer::Canvas;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObstacleKind {
    Taxi,
    Hydrant,
    Dumpster,
    Barrier,
}

impl ObstacleKind {
    pub const ALL: [ObstacleKind; 4] = [
        ObstacleKind::Taxi,
        ObstacleKind::Hydrant,
        ObstacleKind::Dumpster,
        ObstacleKind::Barrier,
    ];

    pub fn size(&self) -> (f32, f32) {
        match self {
            ObstacleKind::Taxi => (60.0, 30.0),
            ObstacleKind::Hydrant => (30.0, 40.0),
            ObstacleKind::Dumpster => (80.0, 50.0),
            ObstacleKind::Barrier => (60.0, 40.0),
        }
    }

    /// Resting y for an obstacle of this kind
    pub fn spawn_y(&self) -> f32 {
        match self {
            ObstacleKind::Taxi => GAME_HEIGHT - 80.0,
            _ => GROUND_Y - self.size().1,
        }
    }

    /// Top inset applied to the collision box
    pub fn top_inset(&self) -> f32 {
        match self {
            ObstacleKind::Taxi => 5.0,
            _ => 0.0,
        }
    }

    pub fn death_message(&self) -> &'static str {
        match self {
            ObstacleKind::Taxi => "Hit by taxi!",
            ObstacleKind::Hydrant => "Tripped on hydrant!",
            ObstacleKind::Dumpster => "Crashed into dumpster!",
            ObstacleKind::Barrier => "Hit barrier!",
        }
    }

    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }
}

#[derive(Debug, Clone)]
pub struct Obstacle {
    pub kind: ObstacleKind,
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    /// Scroll speed captured at spawn
    pub speed: f32,
    wheel_anim: f32,
    /// Set once this obstacle has paid out a near-miss bonus
    pub near_miss_awarded: bool,
}

impl Obstacle {
    /// A new obstacle just past the right edge of a `logical_width` view
    pub fn spawn(kind: ObstacleKind, logical_width: f32, speed: f32) -> Self {
        Self::at(kind, logical_width + OFFSCREEN_MARGIN, kind.spawn_y(), speed)
    }

    pub fn at(kind: ObstacleKind, x: f32, y: f32, speed: f32) -> Self {
        let (w, h) = kind.size();
        Self {
            kind,
            x,
            y,
            w,
            h,
            speed,
            wheel_anim: 0.0,
            near_miss_awarded: false,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.w, self.h).inset(0.0, self.kind.top_inset(), 0.0, 0.0)
    }

    /// Scroll left; `true` once fully off-screen
    pub fn update(&mut self, dt: f32) -> bool {
        self.x -= self.speed * dt;
        self.wheel_anim += self.speed * 0.3 * dt;
        self.x + self.w < -OFFSCREEN_MARGIN
    }

    pub fn draw<C: Canvas>(&self, ctx: &mut C, scale: f32) {
        ctx.save();
        ctx.translate(self.x * scale, self.y * scale);
        ctx.scale(scale, scale);
        ctx.set_stroke_color("#ffffff");
        ctx.set_line_width(2.0);
        match self.kind {
            ObstacleKind::Taxi => self.draw_taxi(ctx),
            ObstacleKind::Hydrant => draw_hydrant(ctx),
            ObstacleKind::Dumpster => draw_dumpster(ctx),
            ObstacleKind::Barrier => draw_barrier(ctx),
        }
        ctx.restore();
    }

    fn draw_taxi<C: Canvas>(&self, ctx: &mut C) {
        ctx.set_fill_color("#ffea00");
        ctx.fill_rect(0.0, 10.0, 60.0, 18.0);
        ctx.set_fill_color("#ffd700");
        ctx.fill_rect(15.0, 2.0, 25.0, 12.0);

        ctx.set_fill_color("#ffffff");
        ctx.fill_rect(22.0, -2.0, 10.0, 5.0);
        ctx.stroke_rect(22.0, -2.0, 10.0, 5.0);

        ctx.set_fill_color("#000000");
        for i in 0..6 {
            let x = 4.0 + i as f32 * 9.0;
            let y = if i % 2 == 0 { 18.0 } else { 22.0 };
            ctx.fill_rect(x, y, 4.0, 4.0);
        }

        // Wheels with a spinning hub mark
        for cx in [12.0, 48.0] {
            ctx.set_fill_color("#000000");
            ctx.begin_path();
            ctx.circle(cx, 28.0, 6.0);
            ctx.fill();
            let (sin, cos) = self.wheel_anim.sin_cos();
            ctx.set_stroke_color("#888888");
            ctx.begin_path();
            ctx.move_to(cx, 28.0);
            ctx.line_to(cx + cos * 5.0, 28.0 + sin * 5.0);
            ctx.stroke();
        }
    }
}

fn draw_hydrant<C: Canvas>(ctx: &mut C) {
    ctx.set_fill_color("#ff3333");
    ctx.begin_path();
    ctx.rect(5.0, 10.0, 20.0, 30.0);
    ctx.fill();
    ctx.stroke();

    ctx.begin_path();
    ctx.arc(15.0, 10.0, 10.0, std::f32::consts::PI, 0.0);
    ctx.fill();
    ctx.stroke();

    ctx.set_fill_color("#cccccc");
    ctx.begin_path();
    ctx.rect(0.0, 15.0, 5.0, 5.0);
    ctx.rect(25.0, 15.0, 5.0, 5.0);
    ctx.fill();
    ctx.stroke_rect(0.0, 15.0, 5.0, 5.0);
    ctx.stroke_rect(25.0, 15.0, 5.0, 5.0);
}

fn draw_dumpster<C: Canvas>(ctx: &mut C) {
    ctx.set_fill_color("#228b22");
    ctx.begin_path();
    ctx.move_to(0.0, 10.0);
    ctx.line_to(80.0, 0.0);
    ctx.line_to(75.0, 50.0);
    ctx.line_to(5.0, 50.0);
    ctx.close_path();
    ctx.fill();
    ctx.stroke();

    ctx.set_fill_color("#1a6b1a");
    ctx.begin_path();
    ctx.move_to(0.0, 10.0);
    ctx.line_to(80.0, 0.0);
    ctx.line_to(80.0, 5.0);
    ctx.line_to(0.0, 15.0);
    ctx.close_path();
    ctx.fill();
    ctx.stroke();

    ctx.set_fill_color("#ff00ff");
    ctx.set_font("10px Arial");
    ctx.fill_text("TRASH", 20.0, 30.0);
}

fn draw_barrier<C: Canvas>(ctx: &mut C) {
    ctx.set_fill_color("#888888");
    for x in [5.0, 50.0] {
        ctx.fill_rect(x, 0.0, 5.0, 40.0);
        ctx.stroke_rect(x, 0.0, 5.0, 40.0);
    }

    ctx.set_fill_color("#ff6600");
    ctx.fill_rect(0.0, 10.0, 60.0, 15.0);
    ctx.stroke_rect(0.0, 10.0, 60.0, 15.0);

    ctx.set_fill_color("#ffffff");
    for x in [10.0, 30.0, 50.0] {
        ctx.begin_path();
        ctx.move_to(x, 10.0);
        ctx.line_to(x + 10.0, 10.0);
        ctx.line_to(x, 25.0);
        ctx.line_to(x - 10.0, 25.0);
        ctx.fill();
    }

    ctx.set_fill_color("#ffff00");
    ctx.begin_path();
    ctx.circle(30.0, 5.0, 4.0);
    ctx.fill();
    ctx.stroke();
}

const MAX_BOLT_POINTS: usize = 32;
const MAX_BRANCHES: usize = 12;
const BRANCH_POINTS: usize = 4;

/// Jagged lightning path in local coordinates, regenerated in place
#[derive(Debug, Clone)]
pub struct BoltPath {
    points: [Vec2; MAX_BOLT_POINTS],
    len: usize,
    branches: [[Vec2; BRANCH_POINTS]; MAX_BRANCHES],
    branch_count: usize,
}

impl Default for BoltPath {
    fn default() -> Self {
        Self {
            points: [Vec2::ZERO; MAX_BOLT_POINTS],
            len: 1,
            branches: [[Vec2::ZERO; BRANCH_POINTS]; MAX_BRANCHES],
            branch_count: 0,
        }
    }
}

impl BoltPath {
    /// Zig-zag down from `(center_x, 0)` to `height`, jittering within `spread`
    pub fn regenerate<R: Rng>(&mut self, rng: &mut R, center_x: f32, spread: f32, height: f32) {
        self.points[0] = Vec2::new(center_x, 0.0);
        self.len = 1;
        let mut y = 0.0;
        while y < height && self.len < MAX_BOLT_POINTS {
            y += 12.0 + rng.random::<f32>() * 10.0;
            let x = center_x - spread / 2.0 + rng.random::<f32>() * spread;
            self.points[self.len] = Vec2::new(x, y.min(height));
            self.len += 1;
        }

        self.branch_count = 0;
        for i in 1..self.len.saturating_sub(1) {
            if self.branch_count == MAX_BRANCHES || !rng.random_bool(0.4) {
                continue;
            }
            let dir = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
            let branch = &mut self.branches[self.branch_count];
            let mut p = self.points[i];
            branch[0] = p;
            for point in branch.iter_mut().skip(1) {
                p.x += dir * (8.0 + rng.random::<f32>() * 8.0);
                p.y += 8.0 + rng.random::<f32>() * 6.0;
                *point = p;
            }
            self.branch_count += 1;
        }
    }

    pub fn points(&self) -> &[Vec2] {
        &self.points[..self.len]
    }

    pub fn branches(&self) -> &[[Vec2; BRANCH_POINTS]] {
        &self.branches[..self.branch_count]
    }

    pub fn last(&self) -> Vec2 {
        self.points[self.len - 1]
    }

    /// Stroke the main channel with the current style
    pub fn trace_main<C: Canvas>(&self, ctx: &mut C) {
        let points = self.points();
        ctx.begin_path();
        ctx.move_to(points[0].x, points[0].y);
        for p in &points[1..] {
            ctx.line_to(p.x, p.y);
        }
        ctx.stroke();
    }

    pub fn trace_branches<C: Canvas>(&self, ctx: &mut C) {
        for branch in self.branches() {
            ctx.begin_path();
            ctx.move_to(branch[0].x, branch[0].y);
            for p in &branch[1..] {
                ctx.line_to(p.x, p.y);
            }
            ctx.stroke();
        }
    }
}

const BOLT_LIFE: f32 = 60.0;
const BOLT_WIDTH: f32 = 40.0;
const BOLT_REGEN_CHANCE: f64 = 0.15;

/// Lethal lightning column dropped by a storm cloud
#[derive(Debug, Clone)]
pub struct ElectricHazard {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    life: f32,
    speed: f32,
    flicker: f32,
    path: BoltPath,
}

impl ElectricHazard {
    /// Strike from a cloud's underside at `(cloud_x, cloud_y)`
    pub fn new<R: Rng>(cloud_x: f32, cloud_y: f32, game_speed: f32, rng: &mut R) -> Self {
        let h = GAME_HEIGHT - cloud_y - 60.0;
        let mut path = BoltPath::default();
        path.regenerate(rng, BOLT_WIDTH / 2.0, 20.0, h);
        Self {
            x: cloud_x - BOLT_WIDTH / 2.0,
            y: cloud_y,
            w: BOLT_WIDTH,
            h,
            life: BOLT_LIFE,
            speed: game_speed * 0.15,
            flicker: 0.0,
            path,
        }
    }

    /// Hit box around the strike point at the bottom of the path
    pub fn bounds(&self) -> Rect {
        let tip = self.path.last();
        Rect::new(self.x + tip.x - 15.0, self.y + tip.y - 20.0, 30.0, 25.0)
    }

    pub fn path(&self) -> &BoltPath {
        &self.path
    }

    /// Drift, flicker and count down; `true` once spent
    pub fn update<R: Rng>(&mut self, dt: f32, rng: &mut R) -> bool {
        self.x -= self.speed * dt;
        self.flicker += 0.5 * dt;
        self.life -= dt;
        if rng.random_bool(BOLT_REGEN_CHANCE) {
            self.path.regenerate(rng, BOLT_WIDTH / 2.0, 20.0, self.h);
        }
        self.life <= 0.0
    }

    pub fn draw<C: Canvas>(&self, ctx: &mut C, scale: f32, glow: bool) {
        let flash = (self.flicker * 8.0).sin() > 0.0;
        let alpha = (self.life / BOLT_LIFE).clamp(0.0, 1.0);

        ctx.save();
        ctx.translate(self.x * scale, self.y * scale);
        ctx.scale(scale, scale);
        ctx.set_round_lines();
        ctx.set_global_alpha(alpha);
        if glow {
            ctx.set_shadow("#00bfff", 20.0);
        }

        ctx.set_stroke_color(if flash { "#ffffff" } else { "#00bfff" });
        ctx.set_line_width(if flash { 5.0 } else { 4.0 });
        self.path.trace_main(ctx);

        ctx.set_global_alpha(alpha * 0.7);
        ctx.set_stroke_color("#00bfff");
        ctx.set_line_width(2.0);
        self.path.trace_branches(ctx);

        ctx.set_shadow("transparent", 0.0);
        ctx.set_global_alpha(alpha);
        ctx.set_stroke_color("#ffffff");
        ctx.set_line_width(2.0);
        self.path.trace_main(ctx);

        if flash && self.life > BOLT_LIFE / 2.0 {
            // Sparks fanned under the strike point, spread by the flicker phase
            let tip = self.path.last();
            ctx.set_fill_color("#00ffff");
            for i in 0..6 {
                let angle = (i as f32 + 0.5) / 6.0 * std::f32::consts::PI;
                let dist = 5.0 + ((self.flicker + i as f32) * 3.7).sin().abs() * 15.0;
                ctx.begin_path();
                ctx.circle(tip.x + angle.cos() * dist, tip.y + angle.sin() * dist * 0.5, 1.5);
                ctx.fill();
            }
        }
        ctx.restore();
    }
}
