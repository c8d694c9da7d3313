//! Session orchestration
//!
//! The [`Director`] owns every entity, pool and collaborator for one game.
//! The host calls [`Director::frame`] once per animation frame; inside it
//! the update phase runs to completion before anything is drawn, and the
//! collision pass runs last against the state that was just rendered.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::clock::DeltaClock;
use super::collision::{Rect, near_miss, overlaps};
use super::decor::{Building, Cloud};
use super::effects::{EXPLOSION_PARTICLES, EffectPools};
use super::enemy::{Enemy, Projectile};
use super::obstacle::{ElectricHazard, Obstacle, ObstacleKind};
use super::phrases;
use super::player::Player;
use super::pool::Pool;
use super::shake::{self, ScreenShake};
use super::state::{GamePhase, Hazard, TimerEvent, Tuning};
use super::timer::TimerManager;
use crate::audio::{AudioSink, SilentAudio, SoundCue};
use crate::consts::GROUND_Y;
use crate::persistence::{NoStorage, Persistence};
use crate::platform::FrameInput;
use crate::renderer::{Canvas, OverlayPass, Renderer, palette};
use crate::settings::Settings;

const INITIAL_BUILDINGS: usize = 5;
const INITIAL_CLOUDS: usize = 3;
/// Clouds this close to either edge never strike
const STRIKE_MARGIN: f32 = 100.0;
/// The lethal bolt hangs this far right of the strike point
const BOLT_OFFSET: f32 = 20.0;

pub struct Director<C: Canvas> {
    renderer: Renderer<C>,
    settings: Settings,
    tuning: Tuning,
    persistence: Box<dyn Persistence>,
    audio: Box<dyn AudioSink>,
    rng: Pcg32,

    phase: GamePhase,
    clock: DeltaClock,
    timers: TimerManager<TimerEvent>,
    fired: Vec<TimerEvent>,
    shake: ScreenShake,

    player: Player,
    obstacles: Vec<Obstacle>,
    electric: Vec<ElectricHazard>,
    enemy: Option<Enemy>,
    projectiles: Pool<Projectile>,
    clouds: Vec<Cloud>,
    buildings: Vec<Building>,
    effects: EffectPools,

    score: f32,
    high_score: u32,
    milestones: u32,
    speed: f32,
    frame: u64,
    /// Road scroll distance in logical units
    distance: f32,
    obstacle_timer: f32,
    enemy_timer: f32,
    lightning_timer: f32,
    glitch_timer: f32,
    glitching: bool,
    combo: u32,
    since_near_miss: f32,
    next_cloud_id: u32,
    death: Option<Hazard>,
}

impl<C: Canvas> Director<C> {
    /// A director in the menu phase with default tuning, no storage and no sound
    pub fn new(renderer: Renderer<C>, seed: u64) -> Self {
        let settings = Settings::from_preset(renderer.quality());
        let tuning = Tuning::default();
        let max_particles = renderer.profile().max_particles;
        let mut director = Self {
            renderer,
            settings,
            speed: tuning.start_speed,
            tuning,
            persistence: Box::new(NoStorage),
            audio: Box::new(SilentAudio),
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Menu,
            clock: DeltaClock::new(),
            timers: TimerManager::default(),
            fired: Vec::new(),
            shake: ScreenShake::new(),
            player: Player::new(),
            obstacles: Vec::new(),
            electric: Vec::new(),
            enemy: None,
            projectiles: Pool::with_default(2, 8),
            clouds: Vec::new(),
            buildings: Vec::new(),
            effects: EffectPools::new(max_particles),
            score: 0.0,
            high_score: 0,
            milestones: 0,
            frame: 0,
            distance: 0.0,
            obstacle_timer: 0.0,
            enemy_timer: 0.0,
            lightning_timer: 0.0,
            glitch_timer: 0.0,
            glitching: false,
            combo: 0,
            since_near_miss: 0.0,
            next_cloud_id: 0,
            death: None,
        };
        // The menu shows a still city behind the title
        director.seed_decor();
        director
    }

    pub fn with_tuning(mut self, tuning: Tuning) -> Self {
        self.speed = tuning.start_speed;
        self.tuning = tuning;
        self
    }

    pub fn with_audio(mut self, audio: Box<dyn AudioSink>) -> Self {
        self.audio = audio;
        self.audio.set_muted(!self.settings.sound_enabled);
        self
    }

    /// Attach storage, pulling the stored high score and settings from it
    pub fn with_persistence(mut self, persistence: Box<dyn Persistence>) -> Self {
        self.persistence = persistence;
        match self.persistence.load_high_score() {
            Ok(score) => self.high_score = score,
            Err(err) => log::debug!("No stored high score: {err}"),
        }
        match self.persistence.load_settings() {
            Ok(Some(settings)) => self.apply_settings(settings),
            Ok(None) => {}
            Err(err) => log::warn!("Ignoring stored settings: {err}"),
        }
        self
    }

    // === Accessors ===

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn is_playing(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Whole points scored this run
    pub fn score(&self) -> u32 {
        self.score as u32
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn frame_count(&self) -> u64 {
        self.frame
    }

    pub fn combo(&self) -> u32 {
        self.combo
    }

    pub fn is_glitching(&self) -> bool {
        self.glitching
    }

    /// Message for whatever ended the last run
    pub fn death_reason(&self) -> Option<&'static str> {
        self.death.map(|hazard| hazard.death_reason())
    }

    pub fn fps(&self) -> u32 {
        self.clock.fps()
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn effects(&self) -> &EffectPools {
        &self.effects
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn renderer(&self) -> &Renderer<C> {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut Renderer<C> {
        &mut self.renderer
    }

    // === Collaborator hooks ===

    /// Viewport changed; caches are invalidated before the next render
    pub fn resize(&mut self, width: u32, height: u32) {
        self.renderer.resize(width, height);
    }

    /// Apply and persist new settings
    pub fn set_settings(&mut self, settings: Settings) {
        self.apply_settings(settings);
        if let Err(err) = self.persistence.save_settings(&self.settings) {
            log::debug!("Settings not saved: {err}");
        }
    }

    fn apply_settings(&mut self, settings: Settings) {
        self.renderer.set_quality(settings.quality);
        self.effects.set_max_particles(self.renderer.profile().max_particles);
        self.audio.set_muted(!settings.sound_enabled);
        if !settings.screen_shake {
            self.shake.reset();
        }
        self.settings = settings;
    }

    // === Session transitions ===

    /// Leave the menu and start the first run
    pub fn start(&mut self) {
        match self.phase {
            GamePhase::Menu => {
                log::info!("Run started");
                self.clock.reset();
                self.phase = GamePhase::Playing;
            }
            GamePhase::GameOver => self.restart(),
            GamePhase::Playing => {}
        }
    }

    /// Drop every transient entity and effect and begin a fresh run
    pub fn restart(&mut self) {
        self.obstacles.clear();
        self.electric.clear();
        self.enemy = None;
        self.projectiles.clear();
        self.clouds.clear();
        self.buildings.clear();
        self.effects.clear();
        self.timers.clear();
        self.fired.clear();
        self.shake.reset();

        self.player = Player::new();
        self.score = 0.0;
        self.milestones = 0;
        self.speed = self.tuning.start_speed;
        self.frame = 0;
        self.distance = 0.0;
        self.obstacle_timer = 0.0;
        self.enemy_timer = 0.0;
        self.lightning_timer = 0.0;
        self.glitch_timer = 0.0;
        self.glitching = false;
        self.combo = 0;
        self.since_near_miss = 0.0;
        self.death = None;

        self.seed_decor();
        self.clock.reset();
        self.phase = GamePhase::Playing;
        log::info!("Run restarted");
    }

    fn seed_decor(&mut self) {
        for i in 0..INITIAL_BUILDINGS {
            let building = Building::new(i as f32 * 120.0, self.speed, &mut self.rng);
            self.buildings.push(building);
        }
        for i in 0..INITIAL_CLOUDS {
            let x = i as f32 * 200.0 + self.rng.random::<f32>() * 100.0;
            self.spawn_cloud(x);
        }
    }

    fn spawn_cloud(&mut self, x: f32) {
        let cloud = Cloud::new(self.next_cloud_id, x, self.speed, &mut self.rng);
        self.next_cloud_id = self.next_cloud_id.wrapping_add(1);
        self.clouds.push(cloud);
    }

    // === Frame ===

    /// Run one animation frame at host timestamp `timestamp_ms`
    pub fn frame(&mut self, timestamp_ms: f64, input: &FrameInput) -> GamePhase {
        if self.phase == GamePhase::Menu && input.jump_pressed {
            self.start();
        }
        if self.phase != GamePhase::Playing {
            self.render();
            return self.phase;
        }

        let dt_ms = self.clock.tick(timestamp_ms);
        let dt = self.clock.multiplier();

        self.update_timers(dt_ms);
        self.update_glitch(dt);

        let frame_skip = self.settings.frame_skip();
        let animate = self.frame % frame_skip == 0;

        self.update_entities(input, dt, animate, frame_skip);
        self.effects.update(dt);
        self.run_spawners(dt);

        self.render();

        if let Some(hazard) = self.check_collisions() {
            self.game_over(hazard);
            return self.phase;
        }
        self.check_near_misses(dt);

        self.score += self.tuning.score_per_frame * dt;
        self.check_milestones();
        if self.speed < self.tuning.max_speed {
            self.speed = (self.speed + self.tuning.speed_ramp * dt).min(self.tuning.max_speed);
        }
        self.distance += self.speed * 2.0 * dt;
        self.frame += 1;
        self.phase
    }

    fn update_timers(&mut self, dt_ms: f32) {
        self.timers.update(dt_ms, &mut self.fired);
        for event in self.fired.drain(..) {
            match event {
                TimerEvent::GlitchEnd => self.glitching = false,
                TimerEvent::CloudDischarged(id) => {
                    if let Some(cloud) = self.clouds.iter_mut().find(|c| c.id == id) {
                        cloud.discharge();
                    }
                }
            }
        }
        self.shake.update(dt_ms, &mut self.rng);
    }

    fn update_glitch(&mut self, dt: f32) {
        self.glitch_timer += dt;
        if self.glitch_timer > self.tuning.glitch_min_interval && self.rng.random_bool(self.tuning.glitch_chance) {
            let duration = self.rng.random_range(self.tuning.glitch_min_ms..=self.tuning.glitch_max_ms);
            self.glitching = true;
            self.glitch_timer = 0.0;
            if self.timers.schedule(duration, TimerEvent::GlitchEnd).is_none() {
                // No timer to end it, so skip the glitch entirely
                self.glitching = false;
            }
        }
    }

    fn update_entities(&mut self, input: &FrameInput, dt: f32, animate: bool, frame_skip: u64) {
        let profile = *self.renderer.profile();
        let logical_width = self.renderer.viewport().logical_width();

        let events = self.player.update(input, dt, animate, frame_skip, &self.tuning);
        let (px, py) = (self.player.x, self.player.y);
        if events.jumped {
            self.audio.play(SoundCue::Jump);
            let line = phrases::pick(&mut self.rng, phrases::PLAYER_LINES);
            self.comic_text(line, px + 60.0, py, None);
        }
        if events.double_jumped {
            self.audio.play(SoundCue::DoubleJump);
            let word = phrases::pick(&mut self.rng, phrases::JUMP);
            self.comic_text(word, px + 40.0, py + 20.0, Some(palette::CYAN));
        }
        if events.landed {
            self.audio.play(SoundCue::Land);
            if self.settings.screen_shake {
                self.shake.shake_preset(shake::SHAKE_LANDING);
            }
            if profile.ink_splatters {
                self.ink(px + 25.0, GROUND_Y, palette::ELECTRIC_BLUE);
            }
            if self.rng.random_bool(0.25) {
                let word = phrases::pick(&mut self.rng, phrases::LAND);
                self.comic_text(word, px + 25.0, GROUND_Y - 10.0, None);
            }
        }

        if profile.speed_lines && self.frame % 3 == 0 {
            let y = py + self.rng.random::<f32>() * self.player.h;
            let seed = self.rng.random();
            self.effects.speed_lines.acquire((y, self.speed, seed));
        }
        if profile.after_images && self.frame % 4 == 0 {
            let p = &self.player;
            self.effects.after_images.acquire((p.x - 10.0, p.y, p.w, p.h));
        }

        self.obstacles.retain_mut(|o| !o.update(dt));
        let rng = &mut self.rng;
        self.electric.retain_mut(|bolt| !bolt.update(dt, rng));
        self.projectiles.update(dt);

        if let Some(enemy) = self.enemy.as_mut() {
            let step = enemy.update(dt, px);
            let (ex, ey) = (enemy.x, enemy.y);
            if step.offscreen {
                self.enemy = None;
            }
            if let Some(launch) = step.thrown {
                self.audio.play(SoundCue::EnemyThrow);
                let line = phrases::pick(&mut self.rng, phrases::ENEMY_LINES);
                self.comic_text(line, ex, ey - 20.0, Some(palette::SYMBIOTE_GREEN));
                self.projectiles.acquire(launch);
            }
        }

        self.clouds.retain_mut(|c| !c.update(dt));
        if self.clouds.len() < self.tuning.max_clouds && self.rng.random_bool(self.tuning.cloud_spawn_chance) {
            self.spawn_cloud(logical_width);
        }
        self.buildings.retain_mut(|b| !b.update(dt));
        if self.buildings.len() < self.tuning.max_buildings && self.rng.random_bool(self.tuning.building_spawn_chance)
        {
            let x = logical_width + self.rng.random::<f32>() * 100.0;
            let building = Building::new(x, self.speed, &mut self.rng);
            self.buildings.push(building);
        }
    }

    fn run_spawners(&mut self, dt: f32) {
        let logical_width = self.renderer.viewport().logical_width();

        self.obstacle_timer += dt;
        if self.obstacle_timer > self.tuning.obstacle_interval_at(self.speed) {
            let kind = ObstacleKind::random(&mut self.rng);
            self.obstacles.push(Obstacle::spawn(kind, logical_width, self.speed));
            self.obstacle_timer = 0.0;
        }

        self.lightning_timer += dt;
        if self.lightning_timer > self.tuning.lightning_interval
            && self.score > self.tuning.lightning_min_score
            && !self.clouds.is_empty()
        {
            self.lightning_timer = 0.0;
            let index = self.rng.random_range(0..self.clouds.len());
            self.try_strike(index, logical_width);
        }

        self.enemy_timer += dt;
        if self.enemy_timer > self.tuning.enemy_interval
            && self.enemy.is_none()
            && self.score > self.tuning.enemy_min_score
        {
            let y = 80.0 + self.rng.random::<f32>() * 60.0;
            self.enemy = Some(Enemy::new(logical_width, y, self.speed));
            self.enemy_timer = 0.0;
            log::debug!("Enemy incoming at frame {}", self.frame);
        }
    }

    fn try_strike(&mut self, index: usize, logical_width: f32) {
        let cloud = &mut self.clouds[index];
        if cloud.x <= STRIKE_MARGIN || cloud.x >= logical_width - STRIKE_MARGIN {
            return;
        }
        let Some((x, y)) = cloud.strike(self.tuning.cloud_cooldown) else {
            return;
        };
        let id = cloud.id;

        self.electric
            .push(ElectricHazard::new(x + BOLT_OFFSET, y, self.speed, &mut self.rng));
        self.audio.play(SoundCue::Electric);
        self.timers.schedule(self.tuning.cloud_glow_ms, TimerEvent::CloudDischarged(id));
        let seed = self.rng.random();
        self.effects.lightning_bolts.acquire((x, y, GROUND_Y - y, seed));
    }

    // === Render ===

    /// Draw the current state; the world layers are shaken, overlays are not
    pub fn render(&mut self) {
        let scale = self.renderer.scale();
        let glow = self.renderer.profile().glow_effects;
        let cloud_body = self.renderer.cloud_gradient();

        self.renderer.draw_sky();
        {
            let ctx = self.renderer.ctx_mut();
            ctx.save();
            if self.settings.screen_shake {
                self.shake.apply(ctx);
            }
            for cloud in &self.clouds {
                cloud.draw(ctx, scale, cloud_body.as_deref(), glow);
            }
            for building in &self.buildings {
                building.draw(ctx, scale);
            }
        }
        self.renderer.draw_ground(self.distance);

        let ctx = self.renderer.ctx_mut();
        if self.phase != GamePhase::Menu {
            self.effects.draw_trails(ctx, scale);
            for obstacle in &self.obstacles {
                obstacle.draw(ctx, scale);
            }
            for bolt in &self.electric {
                bolt.draw(ctx, scale, glow);
            }
            self.projectiles.draw(ctx, scale);
            if let Some(enemy) = &self.enemy {
                enemy.draw(ctx, scale, glow);
            }
        }
        self.player.draw(ctx, scale, glow);
        self.effects.draw_front(ctx, scale);
        ctx.restore();

        let pass = OverlayPass {
            frame: self.frame,
            playing: self.phase == GamePhase::Playing,
            glitch: self.glitching,
        };
        self.renderer.draw_overlays(pass, &mut self.rng);

        match self.phase {
            GamePhase::Menu => self.renderer.draw_title(),
            GamePhase::GameOver => {
                let reason = self.death_reason().unwrap_or("Crashed!");
                self.renderer.draw_game_over(reason, self.score());
            }
            GamePhase::Playing => {}
        }
        let fps = self.settings.show_fps.then(|| self.clock.fps());
        self.renderer.draw_hud(self.score(), self.high_score, fps);
    }

    // === Collisions and scoring ===

    /// First hazard the player overlaps, in fixed order
    fn check_collisions(&mut self) -> Option<Hazard> {
        let player = self.player.bounds();

        let hit = self
            .obstacles
            .iter()
            .find(|o| overlaps(&player, &o.bounds()))
            .map(|o| (o.kind, o.bounds().center()));
        if let Some((kind, (cx, cy))) = hit {
            self.hit_effects(phrases::HIT, self.player.x + 30.0, self.player.y, palette::PINK);
            self.ink(cx, cy, palette::CYAN);
            return Some(Hazard::Obstacle(kind));
        }

        let hit = self
            .electric
            .iter()
            .find(|b| overlaps(&player, &b.bounds()))
            .map(|b| (b.x + b.w / 2.0, b.y + b.h - 30.0));
        if let Some((x, y)) = hit {
            self.hit_effects(phrases::ELECTRIC, x, y, palette::CYAN);
            return Some(Hazard::Electric);
        }

        let hit = self.projectiles.iter().find(|p| overlaps(&player, &p.bounds())).map(|p| p.pos);
        if let Some(pos) = hit {
            self.hit_effects(phrases::BOMB, pos.x, pos.y, palette::PINK);
            self.ink(pos.x, pos.y, palette::ORANGE);
            self.explode(pos.x, pos.y);
            return Some(Hazard::Projectile);
        }

        let hit = self
            .enemy
            .as_ref()
            .filter(|e| overlaps(&player, &e.bounds()))
            .map(|e| (e.x + 35.0, e.y + 30.0));
        if let Some((x, y)) = hit {
            self.comic_text("WHAM!", x, y, None);
            self.ink(x, y, palette::PURPLE);
            return Some(Hazard::Enemy);
        }

        None
    }

    /// Onomatopoeia at `(x, y)` plus an ink blot on the player
    fn hit_effects(&mut self, table: &'static [&'static str], x: f32, y: f32, color: &'static str) {
        let word = phrases::pick(&mut self.rng, table);
        self.comic_text(word, x, y, None);
        self.ink(self.player.x + 25.0, self.player.y + 35.0, color);
    }

    fn explode(&mut self, x: f32, y: f32) {
        self.audio.play(SoundCue::Explosion);
        if self.settings.screen_shake {
            self.shake.shake_preset(shake::SHAKE_EXPLOSION);
        }
        for _ in 0..EXPLOSION_PARTICLES {
            let seed = self.rng.random();
            if self.effects.explosions.acquire((x, y, seed)).is_none() {
                break;
            }
        }
    }

    fn check_near_misses(&mut self, dt: f32) {
        self.since_near_miss += dt;
        if self.since_near_miss > self.tuning.combo_window {
            self.combo = 0;
        }

        let player = self.player.bounds();
        let threshold = self.tuning.near_miss_threshold;
        let mut awarded = 0;
        for obstacle in &mut self.obstacles {
            if !obstacle.near_miss_awarded && near_miss(&player, &obstacle.bounds(), threshold) {
                obstacle.near_miss_awarded = true;
                awarded += 1;
            }
        }
        for _ in 0..awarded {
            self.award_near_miss(player);
        }
    }

    fn award_near_miss(&mut self, player: Rect) {
        self.combo += 1;
        self.since_near_miss = 0.0;
        let bonus = self.tuning.near_miss_bonus * self.combo as f32;
        self.score += bonus;

        self.audio.play(SoundCue::NearMiss);
        if self.settings.screen_shake {
            self.shake.shake_preset(shake::SHAKE_NEAR_MISS);
        }
        let (cx, cy) = player.center();
        self.effects.near_miss_rings.acquire((cx, cy));
        self.effects.score_popups.acquire((cx, player.y - 10.0, bonus as u32));
        let word = phrases::pick(&mut self.rng, phrases::NEAR_MISS);
        self.comic_text(word, cx + 30.0, player.y - 20.0, Some(palette::CYAN));
        if self.combo > 1 {
            self.effects.combo_texts.acquire((cx, player.y - 45.0, self.combo));
        }
        log::debug!("Near miss x{} for {bonus}", self.combo);
    }

    fn check_milestones(&mut self) {
        let step = self.tuning.score_milestone.max(1);
        let reached = self.score() / step;
        if reached <= self.milestones {
            return;
        }
        self.milestones = reached;
        self.audio.play(SoundCue::Score);
        let (x, y) = (self.player.x + 25.0, self.player.y - 10.0);
        self.effects.score_popups.acquire((x, y, reached * step));
        let word = phrases::pick(&mut self.rng, phrases::SCORE);
        self.comic_text(word, x + 40.0, y - 20.0, None);
    }

    fn game_over(&mut self, hazard: Hazard) {
        self.phase = GamePhase::GameOver;
        self.death = Some(hazard);
        self.audio.play(SoundCue::Die);
        if self.settings.screen_shake {
            self.shake.shake_preset(shake::SHAKE_COLLISION);
        }
        log::info!("Game over at {}: {}", self.score(), hazard.death_reason());

        let score = self.score();
        if score > self.high_score {
            self.high_score = score;
            if self.persistence.can_persist() {
                match self.persistence.save_high_score(score) {
                    Ok(()) => log::info!("New high score {score} saved"),
                    Err(err) => log::warn!("High score not saved: {err}"),
                }
            }
        }
    }

    // === Effect helpers ===

    fn comic_text(&mut self, text: &'static str, x: f32, y: f32, color: Option<&'static str>) {
        let seed = self.rng.random();
        self.effects.comic_texts.acquire((text, x, y, color, seed));
    }

    fn ink(&mut self, x: f32, y: f32, color: &'static str) {
        if !self.renderer.profile().ink_splatters {
            return;
        }
        let seed = self.rng.random();
        self.effects.ink_splatters.acquire((x, y, color, seed));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::RecordingAudio;
    use crate::persistence::MemoryStorage;
    use crate::renderer::RecordingCanvas;
    use crate::settings::QualityPreset;

    const FRAME_MS: f64 = 1000.0 / 60.0;

    /// Nothing spawns on its own and score only moves through bonuses
    fn quiet_tuning() -> Tuning {
        Tuning {
            score_per_frame: 0.0,
            obstacle_interval: 1.0e9,
            glitch_chance: 0.0,
            ..Tuning::default()
        }
    }

    fn director(tuning: Tuning) -> Director<RecordingCanvas> {
        let renderer = Renderer::new(RecordingCanvas::new(800, 400), QualityPreset::High);
        Director::new(renderer, 7).with_tuning(tuning)
    }

    struct Run {
        time: f64,
    }

    impl Run {
        fn new() -> Self {
            Self { time: 0.0 }
        }

        fn step(&mut self, d: &mut Director<RecordingCanvas>, input: FrameInput) -> GamePhase {
            self.time += FRAME_MS;
            d.frame(self.time, &input)
        }

        fn steps(&mut self, d: &mut Director<RecordingCanvas>, n: usize) {
            for _ in 0..n {
                self.step(d, FrameInput::default());
            }
        }
    }

    #[test]
    fn test_jump_from_menu_starts_run() {
        let mut d = director(quiet_tuning());
        let mut run = Run::new();
        run.steps(&mut d, 3);
        assert_eq!(d.phase(), GamePhase::Menu);
        assert_eq!(d.frame_count(), 0);

        let jump = FrameInput {
            jump_pressed: true,
            jump_held: true,
            duck_held: false,
        };
        assert_eq!(run.step(&mut d, jump), GamePhase::Playing);
        assert!(!d.clouds.is_empty());
        assert!(!d.buildings.is_empty());
        assert_eq!(d.frame_count(), 1);
    }

    #[test]
    fn test_taxi_collision_ends_run() {
        let audio = RecordingAudio::new();
        let mut d = director(quiet_tuning()).with_audio(Box::new(audio.clone()));
        d.start();
        d.obstacles.push(Obstacle::at(ObstacleKind::Taxi, 90.0, ObstacleKind::Taxi.spawn_y(), 5.0));

        let mut run = Run::new();
        assert_eq!(run.step(&mut d, FrameInput::default()), GamePhase::GameOver);
        assert!(!d.is_playing());
        assert!(d.is_game_over());
        assert_eq!(d.death_reason(), Some("Hit by taxi!"));
        assert_eq!(audio.count(SoundCue::Die), 1);

        // Frozen: further frames neither move nor score
        let x = d.obstacles[0].x;
        run.steps(&mut d, 5);
        assert_eq!(d.obstacles[0].x, x);
        assert_eq!(d.phase(), GamePhase::GameOver);
    }

    #[test]
    fn test_near_miss_awards_bonus_once() {
        let mut d = director(quiet_tuning());
        d.start();
        d.obstacles.push(Obstacle::at(ObstacleKind::Hydrant, 50.0, ObstacleKind::Hydrant.spawn_y(), 5.0));

        let mut run = Run::new();
        run.step(&mut d, FrameInput::default());
        assert_eq!(d.score(), 10);
        assert_eq!(d.combo(), 1);
        assert_eq!(d.effects().near_miss_rings.active_count(), 1);

        // Carry it well past x = -5 and off-screen
        run.steps(&mut d, 30);
        assert!(d.obstacles.is_empty());
        assert_eq!(d.score(), 10);
        assert!(d.is_playing());
    }

    #[test]
    fn test_combo_scales_second_near_miss() {
        let mut d = director(quiet_tuning());
        d.start();
        let y = ObstacleKind::Hydrant.spawn_y();
        d.obstacles.push(Obstacle::at(ObstacleKind::Hydrant, 50.0, y, 5.0));
        d.obstacles.push(Obstacle::at(ObstacleKind::Hydrant, 58.0, y, 5.0));

        // Both clear the player on the same frame: 10 x 1 then 10 x 2
        let mut run = Run::new();
        run.step(&mut d, FrameInput::default());
        assert_eq!(d.score(), 30);
        run.steps(&mut d, 10);
        assert_eq!(d.score(), 30);
        assert_eq!(d.combo(), 2);
        assert_eq!(d.effects().combo_texts.active_count(), 1);
    }

    #[test]
    fn test_restart_clears_everything() {
        let mut d = director(quiet_tuning());
        d.start();
        d.score = 42.0;
        d.projectiles.acquire((200.0, 150.0, 80.0));
        d.obstacles.push(Obstacle::at(ObstacleKind::Dumpster, 90.0, ObstacleKind::Dumpster.spawn_y(), 5.0));

        let mut run = Run::new();
        run.step(&mut d, FrameInput::default());
        assert!(d.is_game_over());
        assert!(d.effects().total_active() > 0);

        d.restart();
        assert_eq!(d.score(), 0);
        assert!(d.is_playing());
        assert!(!d.is_game_over());
        assert_eq!(d.effects().total_active(), 0);
        assert_eq!(d.projectiles.active_count(), 0);
        assert!(d.obstacles.is_empty());
        assert!(d.enemy.is_none());
        assert_eq!(d.death_reason(), None);
        assert_eq!(d.speed(), d.tuning().start_speed);
    }

    #[test]
    fn test_high_score_saved_only_with_consent() {
        for consent in [true, false] {
            let storage = MemoryStorage::with_consent(consent);
            let mut d = director(quiet_tuning()).with_persistence(Box::new(storage));
            d.start();
            d.score = 120.0;
            d.obstacles.push(Obstacle::at(ObstacleKind::Barrier, 90.0, ObstacleKind::Barrier.spawn_y(), 5.0));
            Run::new().step(&mut d, FrameInput::default());

            assert_eq!(d.high_score(), 120);
            let stored = d.persistence.load_high_score().unwrap();
            assert_eq!(stored, if consent { 120 } else { 0 });
        }
    }

    #[test]
    fn test_bomb_hit_explodes() {
        let audio = RecordingAudio::new();
        let mut d = director(quiet_tuning()).with_audio(Box::new(audio.clone()));
        d.start();
        // Dropped straight onto the player
        d.projectiles.acquire((105.0, 300.0, 105.0));
        let mut run = Run::new();
        for _ in 0..10 {
            if run.step(&mut d, FrameInput::default()) == GamePhase::GameOver {
                break;
            }
        }
        assert_eq!(d.death_reason(), Some("Pumpkin bomb!"));
        assert_eq!(audio.count(SoundCue::Explosion), 1);
        assert!(d.effects().explosions.active_count() > 0);
    }

    #[test]
    fn test_glitch_ends_by_timer() {
        let tuning = Tuning {
            glitch_chance: 1.0,
            glitch_min_interval: 2.0,
            ..quiet_tuning()
        };
        let mut d = director(tuning);
        d.start();
        let mut run = Run::new();
        run.steps(&mut d, 3);
        assert!(d.is_glitching());

        // No new glitches; the pending one lasts 150 ms at most
        d.tuning.glitch_chance = 0.0;
        run.steps(&mut d, 12);
        assert!(!d.is_glitching());
        assert_eq!(d.timers.active_count(), 0);
    }

    #[test]
    fn test_milestone_plays_score_cue() {
        let audio = RecordingAudio::new();
        let tuning = Tuning {
            score_per_frame: 10.0,
            ..quiet_tuning()
        };
        let mut d = director(tuning).with_audio(Box::new(audio.clone()));
        d.start();
        Run::new().steps(&mut d, 25);
        assert_eq!(audio.count(SoundCue::Score), 2);
        assert!(d.effects().score_popups.active_count() >= 1);
    }

    #[test]
    fn test_settings_change_invalidates_and_persists() {
        let mut d = director(quiet_tuning()).with_persistence(Box::new(MemoryStorage::with_consent(true)));
        d.start();
        Run::new().steps(&mut d, 1);
        assert!(d.renderer().gradient_count() > 0);

        let settings = Settings {
            quality: QualityPreset::Low,
            ..Settings::default()
        };
        d.set_settings(settings.clone());
        assert_eq!(d.renderer().gradient_count(), 0);
        assert_eq!(d.effects().explosions.max_size(), 15);
        assert_eq!(d.persistence.load_settings().unwrap(), Some(settings));
    }

    #[test]
    fn test_speed_ramps_to_ceiling() {
        let tuning = Tuning {
            speed_ramp: 1.0,
            ..quiet_tuning()
        };
        let mut d = director(tuning);
        d.start();
        Run::new().steps(&mut d, 20);
        assert_eq!(d.speed(), d.tuning().max_speed);
    }

    /// Runs `frames` frames, taking whatever `take` pulls out after each one
    fn count_spawns(
        d: &mut Director<RecordingCanvas>,
        frames: usize,
        mut take: impl FnMut(&mut Director<RecordingCanvas>) -> usize,
    ) -> usize {
        let mut run = Run::new();
        let mut spawned = 0;
        for _ in 0..frames {
            run.step(d, FrameInput::default());
            spawned += take(d);
        }
        spawned
    }

    fn take_enemy(d: &mut Director<RecordingCanvas>) -> usize {
        usize::from(d.enemy.take().is_some())
    }

    fn take_bolts(d: &mut Director<RecordingCanvas>) -> usize {
        let n = d.electric.len();
        d.electric.clear();
        n
    }

    #[test]
    fn test_enemy_needs_min_score_and_cooldown() {
        let tuning = Tuning {
            enemy_interval: 10.0,
            enemy_min_score: 50.0,
            ..quiet_tuning()
        };

        let mut d = director(tuning.clone());
        d.start();
        assert_eq!(count_spawns(&mut d, 60, take_enemy), 0);

        // 11 frames per spawn: frames 11, 22, 33, 44, 55
        let mut d = director(tuning);
        d.start();
        d.score = 60.0;
        assert_eq!(count_spawns(&mut d, 60, take_enemy), 5);
    }

    #[test]
    fn test_lightning_needs_min_score_and_cooldown() {
        let tuning = Tuning {
            lightning_interval: 10.0,
            lightning_min_score: 50.0,
            cloud_cooldown: 0.0,
            cloud_spawn_chance: 0.0,
            ..quiet_tuning()
        };
        let one_cloud = |d: &mut Director<RecordingCanvas>| {
            let cloud = Cloud::new(0, 400.0, d.speed, &mut d.rng);
            d.clouds = vec![cloud];
        };

        let mut d = director(tuning.clone());
        d.start();
        one_cloud(&mut d);
        assert_eq!(count_spawns(&mut d, 60, take_bolts), 0);

        let mut d = director(tuning);
        d.start();
        one_cloud(&mut d);
        d.score = 60.0;
        assert_eq!(count_spawns(&mut d, 60, take_bolts), 5);
    }

    #[test]
    fn test_bolt_hangs_right_of_strike_point() {
        let mut d = director(quiet_tuning());
        d.start();
        let cloud = Cloud::new(0, 300.0, d.speed, &mut d.rng);
        let strike_x = cloud.x + cloud.w / 2.0;
        d.clouds = vec![cloud];

        d.try_strike(0, 800.0);
        assert_eq!(d.electric.len(), 1);
        let bolt = &d.electric[0];
        assert_eq!(bolt.x + bolt.w / 2.0, strike_x + BOLT_OFFSET);
    }

    #[test]
    fn test_obstacles_win_over_projectiles() {
        let audio = RecordingAudio::new();
        let mut d = director(quiet_tuning()).with_audio(Box::new(audio.clone()));
        d.start();
        d.obstacles.push(Obstacle::at(ObstacleKind::Taxi, 90.0, ObstacleKind::Taxi.spawn_y(), 5.0));
        d.projectiles.acquire((105.0, 300.0, 105.0));

        Run::new().step(&mut d, FrameInput::default());
        assert_eq!(d.death_reason(), Some("Hit by taxi!"));
        assert_eq!(audio.count(SoundCue::Explosion), 0);
    }

    #[test]
    fn test_lightning_strike_electrocutes() {
        let mut d = director(quiet_tuning());
        d.start();
        // Tip lands on the street inside the player's column
        let bolt = ElectricHazard::new(105.0, 200.0, 5.0, &mut d.rng);
        d.electric.push(bolt);

        assert_eq!(Run::new().step(&mut d, FrameInput::default()), GamePhase::GameOver);
        assert_eq!(d.death_reason(), Some("Electrocuted!"));
    }

    #[test]
    fn test_enemy_contact_ends_run() {
        let mut d = director(quiet_tuning());
        d.start();
        let mut run = Run::new();

        // Let it spend its one bomb high above the street first
        d.enemy = Some(Enemy::new(100.0, 0.0, 5.0));
        run.step(&mut d, FrameInput::default());
        assert!(d.enemy.as_ref().is_some_and(|e| e.has_thrown()));
        d.projectiles.clear();

        if let Some(enemy) = d.enemy.as_mut() {
            enemy.x = 70.0;
            enemy.y = 290.0;
        }
        assert_eq!(run.step(&mut d, FrameInput::default()), GamePhase::GameOver);
        assert_eq!(d.death_reason(), Some("Hit by Goblin!"));
    }

    #[test]
    fn test_combo_resets_after_window() {
        let mut d = director(quiet_tuning());
        d.start();
        let y = ObstacleKind::Hydrant.spawn_y();
        d.obstacles.push(Obstacle::at(ObstacleKind::Hydrant, 50.0, y, 5.0));

        let mut run = Run::new();
        run.step(&mut d, FrameInput::default());
        assert_eq!(d.combo(), 1);

        let window = d.tuning().combo_window as usize;
        run.steps(&mut d, window + 5);
        assert_eq!(d.combo(), 0);

        // A fresh chain: base bonus again, not 10 x 2
        d.obstacles.push(Obstacle::at(ObstacleKind::Hydrant, 50.0, y, 5.0));
        run.step(&mut d, FrameInput::default());
        assert_eq!(d.combo(), 1);
        assert_eq!(d.score(), 20);
    }

    #[test]
    fn test_faster_runs_spawn_obstacles_closer() {
        let at_speed = |speed: f32| {
            let mut d = director(Tuning {
                obstacle_interval: 80.0,
                start_speed: speed,
                speed_ramp: 0.0,
                ..quiet_tuning()
            });
            d.start();
            count_spawns(&mut d, 240, |d| {
                let n = d.obstacles.len();
                d.obstacles.clear();
                n
            })
        };

        let slow = at_speed(5.0);
        let fast = at_speed(15.0);
        assert_eq!(slow, 2);
        assert!(fast >= 3 * slow, "slow {slow}, fast {fast}");
    }

    #[test]
    fn test_render_balances_canvas_state() {
        let mut d = director(quiet_tuning());
        d.start();
        d.shake.shake_preset(shake::SHAKE_COLLISION);
        Run::new().steps(&mut d, 5);
        assert_eq!(d.renderer().ctx().depth(), 0);
    }
}
