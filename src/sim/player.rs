//! The runner
//!
//! Grounded, airborne or ducking. Physics integrates every frame; the run
//! cycle and tendril phase only step on animation frames so the stylized
//! modes can look deliberately choppy.

use std::f32::consts::PI;

use super::collision::Rect;
use super::state::Tuning;
use crate::consts::GROUND_Y;
use crate::ease_factor;
use crate::platform::FrameInput;
use crate::renderer::Canvas;

pub const PLAYER_X: f32 = 80.0;
pub const PLAYER_WIDTH: f32 = 50.0;
pub const STAND_HEIGHT: f32 = 70.0;
pub const DUCK_HEIGHT: f32 = 40.0;
const BOUNDS_INSET: f32 = 5.0;

/// Run-cycle frames advance once this many animation frames accumulate
const RUN_FRAME_PERIOD: f32 = 5.0;
const TONGUE_RATE: f32 = 0.15;

const SQUASH_JUMP: (f32, f32) = (0.8, 1.2);
const SQUASH_LAND: (f32, f32) = (1.25, 0.75);
/// Per-frame fraction toward the squash target
const SQUASH_FOLLOW: f32 = 0.35;
/// Per-frame fraction the target relaxes back to rest
const SQUASH_RELAX: f32 = 0.15;

/// What happened during one player update
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayerEvents {
    pub jumped: bool,
    pub double_jumped: bool,
    pub landed: bool,
}

#[derive(Debug, Clone)]
pub struct Player {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    pub vy: f32,
    jumping: bool,
    can_double_jump: bool,
    ducking: bool,
    run_frame: u8,
    anim_timer: f32,
    tongue_wave: f32,
    squash: (f32, f32),
    squash_target: (f32, f32),
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

impl Player {
    pub fn new() -> Self {
        Self {
            x: PLAYER_X,
            y: GROUND_Y - STAND_HEIGHT,
            w: PLAYER_WIDTH,
            h: STAND_HEIGHT,
            vy: 0.0,
            jumping: false,
            can_double_jump: true,
            ducking: false,
            run_frame: 0,
            anim_timer: 0.0,
            tongue_wave: 0.0,
            squash: (1.0, 1.0),
            squash_target: (1.0, 1.0),
        }
    }

    pub fn is_jumping(&self) -> bool {
        self.jumping
    }

    pub fn is_ducking(&self) -> bool {
        self.ducking
    }

    pub fn can_double_jump(&self) -> bool {
        self.can_double_jump
    }

    /// Visual squash/stretch factors; never part of the bounds
    pub fn squash(&self) -> (f32, f32) {
        self.squash
    }

    pub fn run_frame(&self) -> u8 {
        self.run_frame
    }

    /// Collision box, inset on every side
    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.w, self.h).inset(BOUNDS_INSET, BOUNDS_INSET, BOUNDS_INSET, BOUNDS_INSET)
    }

    /// Advance one frame.
    ///
    /// `animate` is true on frames the animation style lets through;
    /// `frame_skip` is how many frames each such step stands for.
    pub fn update(
        &mut self,
        input: &FrameInput,
        dt: f32,
        animate: bool,
        frame_skip: u64,
        tuning: &Tuning,
    ) -> PlayerEvents {
        let mut events = PlayerEvents::default();
        let grounded = !self.jumping;

        if input.jump_pressed {
            if !self.jumping {
                self.vy = tuning.jump_strength;
                self.jumping = true;
                self.can_double_jump = true;
                self.squash_target = SQUASH_JUMP;
                events.jumped = true;
            } else if self.can_double_jump {
                self.vy = tuning.double_jump_strength;
                self.can_double_jump = false;
                self.squash_target = SQUASH_JUMP;
                events.double_jumped = true;
            }
        }

        // Ducking only makes sense on the ground; in the air it means fast-fall
        self.ducking = input.duck_held && !self.jumping;
        let height = if self.ducking { DUCK_HEIGHT } else { STAND_HEIGHT };
        // Feet stay on the street when the body changes height, even on the
        // frame a jump leaves it
        if grounded && height != self.h {
            self.y = GROUND_Y - height;
        }
        self.h = height;

        if self.jumping && input.duck_held {
            self.vy += tuning.gravity * 2.0 * dt;
        }

        self.y += self.vy * dt;
        self.vy += tuning.gravity * dt;

        if self.y + self.h >= GROUND_Y {
            self.y = GROUND_Y - self.h;
            self.vy = 0.0;
            if self.jumping {
                events.landed = true;
                self.squash_target = SQUASH_LAND;
            }
            self.jumping = false;
            self.can_double_jump = true;
        }

        self.update_squash(dt);
        if animate {
            self.step_animation(dt * frame_skip as f32);
        }
        events
    }

    fn update_squash(&mut self, dt: f32) {
        let follow = ease_factor(SQUASH_FOLLOW, dt);
        let relax = ease_factor(SQUASH_RELAX, dt);
        self.squash.0 += (self.squash_target.0 - self.squash.0) * follow;
        self.squash.1 += (self.squash_target.1 - self.squash.1) * follow;
        self.squash_target.0 += (1.0 - self.squash_target.0) * relax;
        self.squash_target.1 += (1.0 - self.squash_target.1) * relax;
    }

    fn step_animation(&mut self, frames: f32) {
        self.anim_timer += frames;
        if self.anim_timer > RUN_FRAME_PERIOD {
            self.run_frame = (self.run_frame + 1) % 4;
            self.anim_timer = 0.0;
        }
        self.tongue_wave += TONGUE_RATE * frames;
    }

    pub fn draw<C: Canvas>(&self, ctx: &mut C, scale: f32, glow: bool) {
        ctx.save();
        // Squash around the feet so the sprite stays planted
        ctx.translate((self.x + self.w / 2.0) * scale, (self.y + self.h) * scale);
        ctx.scale(scale * self.squash.0, scale * self.squash.1);
        ctx.translate(-self.w / 2.0, -self.h);
        ctx.set_stroke_color("#ffffff");
        ctx.set_line_width(2.0);

        if self.ducking {
            self.draw_ducking(ctx, glow);
        } else {
            self.draw_standing(ctx, glow);
        }
        ctx.restore();
    }

    fn draw_ducking<C: Canvas>(&self, ctx: &mut C, glow: bool) {
        ctx.set_fill_color("#1a1a2e");
        ctx.begin_path();
        ctx.full_ellipse(35.0, 25.0, 40.0, 18.0, 0.0);
        ctx.fill();
        ctx.stroke();

        ctx.set_fill_color("#000000");
        ctx.begin_path();
        ctx.full_ellipse(60.0, 15.0, 18.0, 14.0, 0.3);
        ctx.fill();
        ctx.stroke();

        if glow {
            ctx.set_shadow("#ffffff", 10.0);
        }
        ctx.set_fill_color("#ffffff");
        ctx.begin_path();
        ctx.full_ellipse(58.0, 10.0, 8.0, 5.0, 0.5);
        ctx.fill();
        ctx.begin_path();
        ctx.full_ellipse(68.0, 12.0, 6.0, 4.0, 0.3);
        ctx.fill();
        ctx.set_shadow("transparent", 0.0);
    }

    fn draw_standing<C: Canvas>(&self, ctx: &mut C, glow: bool) {
        let stride = (self.run_frame as f32 * PI / 2.0).sin();
        let leg = if self.jumping { 0.0 } else { stride * 8.0 };
        let arm = if self.jumping { 0.0 } else { stride * 0.3 };
        let tongue = self.tongue_wave.sin() * 5.0;

        // Tendrils
        ctx.set_stroke_color("#2a2a4e");
        ctx.set_line_width(3.0);
        ctx.set_round_lines();
        for i in 0..4 {
            let i = i as f32;
            ctx.begin_path();
            ctx.move_to(25.0, 30.0);
            ctx.quadratic_curve_to(
                -15.0 + (self.tongue_wave + i).sin() * 12.0,
                20.0 + i * 12.0,
                -10.0 + (self.tongue_wave + i * 0.5).sin() * 10.0,
                50.0 + i * 10.0,
            );
            ctx.stroke();
        }

        // Legs
        ctx.set_fill_color("#000000");
        ctx.set_stroke_color("#333333");
        ctx.set_line_width(1.0);
        for (x, swing, tilt) in [(18.0, leg, -0.1), (35.0, -leg, 0.1)] {
            ctx.begin_path();
            ctx.full_ellipse(x, 58.0 + swing, 10.0, 16.0, tilt);
            ctx.fill();
            ctx.stroke();
        }

        // Torso
        ctx.set_fill_color("#1a1a2e");
        ctx.begin_path();
        ctx.move_to(10.0, 20.0);
        ctx.quadratic_curve_to(25.0, 10.0, 40.0, 20.0);
        ctx.line_to(35.0, 50.0);
        ctx.line_to(15.0, 50.0);
        ctx.close_path();
        ctx.fill();
        ctx.set_stroke_color("rgba(255, 255, 255, 0.3)");
        ctx.set_line_width(2.0);
        ctx.stroke();

        // Chest emblem
        ctx.set_fill_color("#ffffff");
        ctx.begin_path();
        ctx.move_to(25.0, 25.0);
        ctx.line_to(20.0, 20.0);
        ctx.line_to(30.0, 20.0);
        ctx.line_to(25.0, 35.0);
        ctx.line_to(18.0, 30.0);
        ctx.line_to(32.0, 30.0);
        ctx.fill();

        // Arms
        ctx.set_fill_color("#000000");
        ctx.begin_path();
        ctx.full_ellipse(5.0, 30.0, 8.0, 14.0, -0.5 - arm);
        ctx.fill();
        ctx.begin_path();
        ctx.full_ellipse(45.0, 30.0, 8.0, 14.0, 0.5 + arm);
        ctx.fill();

        // Head
        ctx.set_fill_color("#0d0d17");
        ctx.begin_path();
        ctx.full_ellipse(30.0, 8.0, 18.0, 16.0, 0.0);
        ctx.fill();

        // Eyes
        if glow {
            ctx.set_shadow("#ffffff", 8.0);
        }
        ctx.set_fill_color("#ffffff");
        ctx.begin_path();
        ctx.move_to(18.0, 2.0);
        ctx.quadratic_curve_to(10.0, 8.0, 18.0, 16.0);
        ctx.quadratic_curve_to(28.0, 12.0, 28.0, 6.0);
        ctx.quadratic_curve_to(24.0, 0.0, 18.0, 2.0);
        ctx.fill();
        ctx.begin_path();
        ctx.move_to(32.0, 2.0);
        ctx.quadratic_curve_to(36.0, 0.0, 42.0, 4.0);
        ctx.quadratic_curve_to(50.0, 10.0, 42.0, 16.0);
        ctx.quadratic_curve_to(32.0, 12.0, 32.0, 2.0);
        ctx.fill();
        ctx.set_shadow("transparent", 0.0);

        // Mouth and teeth
        ctx.set_fill_color("#1a0a0a");
        ctx.begin_path();
        ctx.full_ellipse(38.0, 16.0, 12.0, 8.0, 0.2);
        ctx.fill();
        ctx.set_fill_color("#ffffff");
        for i in 0..6 {
            let x = 28.0 + i as f32 * 3.0;
            ctx.begin_path();
            ctx.move_to(x, 12.0);
            ctx.line_to(x + 1.0, 18.0 + (i % 2) as f32 * 3.0);
            ctx.line_to(x + 2.0, 12.0);
            ctx.fill();
        }

        // Tongue
        ctx.set_stroke_color("#ff00cc");
        ctx.set_line_width(3.0);
        ctx.begin_path();
        ctx.move_to(44.0, 16.0);
        ctx.quadratic_curve_to(55.0, 14.0 + tongue, 70.0, 5.0 + tongue);
        ctx.stroke();

        if (self.tongue_wave * 7.0).sin() > 0.6 {
            ctx.set_fill_color("#00ffff");
            ctx.begin_path();
            ctx.circle(70.0, 5.0 + tongue, 2.0);
            ctx.fill();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn press() -> FrameInput {
        FrameInput {
            jump_pressed: true,
            jump_held: true,
            duck_held: false,
        }
    }

    fn step(player: &mut Player, input: FrameInput) -> PlayerEvents {
        player.update(&input, 1.0, true, 1, &Tuning::default())
    }

    #[test]
    fn test_starts_grounded() {
        let player = Player::new();
        assert_eq!(player.y + player.h, GROUND_Y);
        assert!(!player.is_jumping());
        assert_eq!(player.bounds(), Rect::new(85.0, 285.0, 40.0, 60.0));
    }

    #[test]
    fn test_double_jump_gating() {
        let mut player = Player::new();
        assert!(step(&mut player, press()).jumped);
        step(&mut player, FrameInput::default());

        let second = step(&mut player, press());
        assert!(second.double_jumped);
        assert_eq!(player.vy, -10.0 + 0.6);

        step(&mut player, FrameInput::default());
        let vy_before = player.vy;
        let third = step(&mut player, press());
        assert_eq!(third, PlayerEvents::default());
        assert_eq!(player.vy, vy_before + 0.6);
    }

    #[test]
    fn test_landing_restores_double_jump_and_fires_once() {
        let mut player = Player::new();
        step(&mut player, press());
        step(&mut player, press());
        let mut landings = 0;
        for _ in 0..120 {
            if step(&mut player, FrameInput::default()).landed {
                landings += 1;
            }
        }
        assert_eq!(landings, 1);
        assert!(player.can_double_jump());
        assert_eq!(player.vy, 0.0);
    }

    #[test]
    fn test_duck_only_on_ground_and_fast_falls_in_air() {
        let duck = FrameInput {
            duck_held: true,
            ..FrameInput::default()
        };
        let mut player = Player::new();
        step(&mut player, duck);
        assert!(player.is_ducking());
        assert_eq!(player.h, DUCK_HEIGHT);
        assert_eq!(player.y + player.h, GROUND_Y);

        let mut floaty = Player::new();
        let mut diver = Player::new();
        step(&mut floaty, press());
        step(&mut diver, press());
        step(&mut floaty, FrameInput::default());
        step(&mut diver, duck);
        assert!(!diver.is_ducking());
        assert!(diver.vy > floaty.vy);
    }

    #[test]
    fn test_jump_from_duck_leaves_the_ground() {
        for still_ducking in [true, false] {
            let mut player = Player::new();
            step(
                &mut player,
                FrameInput {
                    duck_held: true,
                    ..FrameInput::default()
                },
            );
            assert!(player.is_ducking());

            let events = step(
                &mut player,
                FrameInput {
                    duck_held: still_ducking,
                    ..press()
                },
            );
            assert!(events.jumped);
            assert!(!events.landed);
            assert!(player.is_jumping());
            assert!(player.vy < 0.0);
            assert_eq!(player.h, STAND_HEIGHT);
            assert!(player.y + player.h < GROUND_Y);
        }
    }

    #[test]
    fn test_squash_never_touches_bounds() {
        let mut player = Player::new();
        let before = player.bounds();
        step(&mut player, press());
        assert_ne!(player.squash(), (1.0, 1.0));
        assert_eq!(player.bounds().w, before.w);
        assert_eq!(player.bounds().h, before.h);
    }

    #[test]
    fn test_animation_gated_by_animate_flag() {
        let tuning = Tuning::default();
        let mut player = Player::new();
        for _ in 0..30 {
            player.update(&FrameInput::default(), 1.0, false, 2, &tuning);
        }
        assert_eq!(player.run_frame(), 0);
        for _ in 0..6 {
            player.update(&FrameInput::default(), 1.0, true, 2, &tuning);
        }
        assert_ne!(player.run_frame(), 0);
    }

    #[derive(Debug, Clone, Copy)]
    struct Step {
        jump: bool,
        duck: bool,
        dt: f32,
    }

    fn steps() -> impl Strategy<Value = Vec<Step>> {
        prop::collection::vec(
            (any::<bool>(), any::<bool>(), 0.0f32..3.0).prop_map(|(jump, duck, dt)| Step { jump, duck, dt }),
            1..300,
        )
    }

    proptest! {
        #[test]
        fn prop_landing_never_penetrates_ground(trajectory in steps()) {
            let tuning = Tuning::default();
            let mut player = Player::new();
            for s in trajectory {
                let input = FrameInput { jump_pressed: s.jump, jump_held: s.jump, duck_held: s.duck };
                player.update(&input, s.dt, true, 1, &tuning);
                prop_assert!(player.y + player.h <= GROUND_Y);
                if !player.is_jumping() {
                    prop_assert_eq!(player.y + player.h, GROUND_Y);
                    prop_assert_eq!(player.vy, 0.0);
                }
            }
        }
    }
}
