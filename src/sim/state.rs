//! Game state and entity types
//!
//! Everything needed to replay a run deterministically lives here.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use crate::consts::*;

/// Side effects of a tick, drained by the platform layer after each step
/// (audio cues, logging). Never part of the persisted state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// A bullet left the ship
    ShotFired,
    /// A stone ran out of health from bullet hits
    StoneDestroyed,
    /// A stone slipped past the bottom of the screen
    StoneMissed,
    /// A stone rammed the ship
    PlayerHit,
    /// Lives ran out
    GameOver,
}

/// The player's ship. Sits at a fixed height and slides horizontally
/// under tilt input. Never destroyed; `reset` reinitializes in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    /// Horizontal speed scalar (pixels per second per unit of tilt)
    speed: f32,
    /// Pending tilt input, already axis-inverted
    acceleration: f32,
    lives: i32,
    /// Current animation frame, wraps modulo [`PLAYER_FRAME_COUNT`]
    pub frame: usize,
    frame_timer: f32,
    screen_width: f32,
}

impl Player {
    /// Spawn at center-bottom of the screen with full lives.
    pub fn new(screen_width: f32, screen_height: f32) -> Self {
        Self {
            pos: Vec2::new(
                screen_width / 2.0 - PLAYER_WIDTH / 2.0,
                screen_height - PLAYER_HEIGHT - PLAYER_BOTTOM_MARGIN,
            ),
            speed: PLAYER_SPEED,
            acceleration: 0.0,
            lives: PLAYER_START_LIVES,
            frame: 0,
            frame_timer: 0.0,
            screen_width,
        }
    }

    /// Store a tilt reading. The sensor axis points the other way, so the
    /// value is negated here. No bounds check.
    pub fn set_acceleration(&mut self, tilt: f32) {
        self.acceleration = -tilt;
    }

    /// Slide horizontally, clamp to the screen, advance the engine
    /// animation on its fixed timer.
    pub fn update(&mut self, dt: f32) {
        self.pos.x += self.acceleration * self.speed * dt;
        self.pos.x = self.pos.x.clamp(0.0, self.screen_width - PLAYER_WIDTH);

        self.frame_timer += dt;
        while self.frame_timer >= PLAYER_FRAME_TIME {
            self.frame = (self.frame + 1) % PLAYER_FRAME_COUNT;
            self.frame_timer -= PLAYER_FRAME_TIME;
        }
    }

    /// May go below zero; the simulation treats anything <= 0 as game over.
    pub fn decrease_lives(&mut self) {
        self.lives -= 1;
    }

    /// Restores lives only. Position and pending tilt carry over into the
    /// next run.
    pub fn reset(&mut self) {
        self.lives = PLAYER_START_LIVES;
    }

    pub fn lives(&self) -> i32 {
        self.lives
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_pos_size(self.pos, Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT))
    }

    /// Muzzle position: top-center of the ship's bounding box.
    pub fn muzzle(&self) -> Vec2 {
        Vec2::new(self.pos.x + PLAYER_WIDTH / 2.0, self.pos.y)
    }
}

/// A projectile moving straight up from the ship's muzzle.
///
/// Lifecycle is owned by the simulation: the bullet only reports
/// [`Bullet::off_screen`], it never removes itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub pos: Vec2,
    pub frame: usize,
    frame_timer: f32,
}

impl Bullet {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            frame: 0,
            frame_timer: 0.0,
        }
    }

    pub fn update(&mut self, dt: f32) {
        self.pos.y -= BULLET_SPEED * dt;

        self.frame_timer += dt;
        while self.frame_timer >= BULLET_FRAME_TIME {
            self.frame = (self.frame + 1) % BULLET_FRAME_COUNT;
            self.frame_timer -= BULLET_FRAME_TIME;
        }
    }

    /// Past the top edge; removed by the simulation on the same tick.
    pub fn off_screen(&self) -> bool {
        self.pos.y < 0.0
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_pos_size(self.pos, Vec2::new(BULLET_WIDTH, BULLET_HEIGHT))
    }
}

/// Where a stone is in its life: falling and collidable, or playing its
/// explosion, or spent and awaiting removal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum StonePhase {
    /// Moving down the screen, collidable
    Falling,
    /// Immobile and non-collidable, counting through the explosion frames
    Exploding { frame: usize, timer: f32 },
    /// Explosion finished; the simulation sweeps the stone this tick
    Spent,
}

/// Tougher stones fall slower: `10 - health + 5` pixels per frame of the
/// original 60 Hz tuning, converted to pixels per second.
fn speed_for_health(health: i32) -> f32 {
    ((10 - health + 5) * 60) as f32
}

/// A descending obstacle with hit points and an explosion sub-state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stone {
    pub pos: Vec2,
    /// Fixed at spawn from initial health; hits never change it
    speed: f32,
    health: i32,
    /// Descent animation frame, wraps modulo [`STONE_FRAME_COUNT`]
    pub frame: usize,
    frame_timer: f32,
    phase: StonePhase,
}

impl Stone {
    pub fn new(x: f32, y: f32, health: i32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            speed: speed_for_health(health),
            health,
            frame: 0,
            frame_timer: 0.0,
            phase: StonePhase::Falling,
        }
    }

    pub fn update(&mut self, dt: f32) {
        match self.phase {
            StonePhase::Falling => {
                self.pos.y += self.speed * dt;

                self.frame_timer += dt;
                while self.frame_timer >= STONE_FRAME_TIME {
                    self.frame = (self.frame + 1) % STONE_FRAME_COUNT;
                    self.frame_timer -= STONE_FRAME_TIME;
                }
            }
            StonePhase::Exploding { mut frame, mut timer } => {
                timer += dt;
                while timer >= EXPLOSION_FRAME_TIME && frame < EXPLOSION_FRAME_COUNT {
                    frame += 1;
                    timer -= EXPLOSION_FRAME_TIME;
                }
                self.phase = if frame >= EXPLOSION_FRAME_COUNT {
                    StonePhase::Spent
                } else {
                    StonePhase::Exploding { frame, timer }
                };
            }
            StonePhase::Spent => {}
        }
    }

    /// One hit's worth of damage. Reaching zero health starts the
    /// explosion exactly once; calls while already exploding still
    /// decrement the counter but cause no state transition.
    pub fn decrease_health(&mut self) {
        self.health -= 1;
        if self.health <= 0 && matches!(self.phase, StonePhase::Falling) {
            self.phase = StonePhase::Exploding { frame: 0, timer: 0.0 };
        }
    }

    /// Zero the health and start the explosion in one step. Used when a
    /// stone escapes past the bottom of the screen.
    pub fn force_destroy(&mut self) {
        self.health = 0;
        if matches!(self.phase, StonePhase::Falling) {
            self.phase = StonePhase::Exploding { frame: 0, timer: 0.0 };
        }
    }

    pub fn health(&self) -> i32 {
        self.health
    }

    pub fn phase(&self) -> StonePhase {
        self.phase
    }

    /// True from the moment the explosion starts, through completion.
    /// Exploding stones are immobile and never collide.
    pub fn is_exploding(&self) -> bool {
        !matches!(self.phase, StonePhase::Falling)
    }

    /// Explosion animation has run its course; safe to remove.
    pub fn is_spent(&self) -> bool {
        matches!(self.phase, StonePhase::Spent)
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_pos_size(self.pos, Vec2::new(STONE_WIDTH, STONE_HEIGHT))
    }
}

/// Complete simulation state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed; all spawn randomness derives from it
    pub seed: u64,
    pub screen_width: f32,
    pub screen_height: f32,
    pub player: Player,
    pub bullets: Vec<Bullet>,
    pub stones: Vec<Stone>,
    /// Seconds since the last stone spawn
    pub spawn_timer: f32,
    /// Stones spawned so far; feeds the per-spawn RNG stream
    pub spawn_count: u32,
    /// Sticky until restart
    pub game_over: bool,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Tick side effects, drained by the loop after each step
    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

impl GameState {
    pub fn new(screen_width: f32, screen_height: f32, seed: u64) -> Self {
        Self {
            seed,
            screen_width,
            screen_height,
            player: Player::new(screen_width, screen_height),
            bullets: Vec::new(),
            stones: Vec::new(),
            spawn_timer: 0.0,
            spawn_count: 0,
            game_over: false,
            time_ticks: 0,
            events: Vec::new(),
        }
    }

    /// Spawn a bullet at the ship's muzzle and emit the shot event.
    /// Callers gate on `game_over`.
    pub fn fire(&mut self) {
        self.bullets.push(Bullet::new(self.player.muzzle()));
        self.events.push(GameEvent::ShotFired);
    }

    /// Back to a fresh run: no entities, full lives, spawn timer zeroed.
    /// The ship keeps its position and pending tilt.
    pub fn restart(&mut self) {
        self.bullets.clear();
        self.stones.clear();
        self.player.reset();
        self.game_over = false;
        self.spawn_timer = 0.0;
        log::info!("run restarted at tick {}", self.time_ticks);
    }

    /// Hand this tick's events to the caller, leaving the buffer empty.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const W: f32 = 1080.0;
    const H: f32 = 1920.0;

    #[test]
    fn test_player_spawns_center_bottom() {
        let player = Player::new(W, H);
        assert_eq!(player.pos.x, W / 2.0 - PLAYER_WIDTH / 2.0);
        assert_eq!(player.pos.y, H - PLAYER_HEIGHT - PLAYER_BOTTOM_MARGIN);
        assert_eq!(player.lives(), 3);
    }

    #[test]
    fn test_acceleration_axis_is_inverted() {
        let mut player = Player::new(W, H);
        let start_x = player.pos.x;
        // Positive tilt moves the ship left
        player.set_acceleration(2.0);
        player.update(SIM_DT);
        assert!(player.pos.x < start_x);
    }

    #[test]
    fn test_player_clamps_to_screen_bounds() {
        let mut player = Player::new(W, H);
        player.set_acceleration(-100.0);
        for _ in 0..600 {
            player.update(SIM_DT);
        }
        assert_eq!(player.pos.x, W - PLAYER_WIDTH);

        player.set_acceleration(100.0);
        for _ in 0..600 {
            player.update(SIM_DT);
        }
        assert_eq!(player.pos.x, 0.0);
    }

    #[test]
    fn test_player_y_fixed_across_updates() {
        let mut player = Player::new(W, H);
        let y = player.pos.y;
        player.set_acceleration(3.0);
        for _ in 0..120 {
            player.update(SIM_DT);
        }
        assert_eq!(player.pos.y, y);
    }

    #[test]
    fn test_player_animation_wraps() {
        let mut player = Player::new(W, H);
        // Four frame periods elapse -> frame index 4 mod 3 = 1
        player.update(PLAYER_FRAME_TIME * 4.0);
        assert_eq!(player.frame, 1);
    }

    #[test]
    fn test_lives_go_negative() {
        let mut player = Player::new(W, H);
        for _ in 0..4 {
            player.decrease_lives();
        }
        assert_eq!(player.lives(), -1);
    }

    #[test]
    fn test_reset_restores_lives_only() {
        let mut player = Player::new(W, H);
        player.set_acceleration(-5.0);
        player.update(SIM_DT);
        let pos = player.pos;
        player.decrease_lives();
        player.decrease_lives();
        player.decrease_lives();

        player.reset();
        assert_eq!(player.lives(), 3);
        assert_eq!(player.pos, pos);
        // Pending acceleration carries over: the ship keeps drifting
        player.update(SIM_DT);
        assert!(player.pos.x > pos.x);
    }

    #[test]
    fn test_bullet_moves_up_and_leaves_screen() {
        let mut bullet = Bullet::new(Vec2::new(100.0, 30.0));
        assert!(!bullet.off_screen());
        bullet.update(SIM_DT);
        assert!(bullet.pos.y < 30.0);
        bullet.update(SIM_DT);
        assert!(bullet.off_screen());
    }

    #[test]
    fn test_stone_speed_from_health() {
        // 10 - health + 5 pixels per frame at 60 Hz
        let mut weak = Stone::new(0.0, 0.0, 1);
        let mut tough = Stone::new(0.0, 0.0, 3);
        weak.update(1.0);
        tough.update(1.0);
        assert_eq!(weak.pos.y, 14.0 * 60.0);
        assert_eq!(tough.pos.y, 12.0 * 60.0);
    }

    #[test]
    fn test_stone_explodes_exactly_once() {
        let mut stone = Stone::new(0.0, 100.0, 1);
        stone.decrease_health();
        assert!(stone.is_exploding());
        assert_eq!(stone.phase(), StonePhase::Exploding { frame: 0, timer: 0.0 });

        // Re-entrant damage decrements the counter but resets nothing
        stone.update(EXPLOSION_FRAME_TIME);
        stone.decrease_health();
        assert_eq!(stone.health(), -1);
        assert!(matches!(stone.phase(), StonePhase::Exploding { frame: 1, .. }));
    }

    #[test]
    fn test_exploding_stone_never_moves() {
        let mut stone = Stone::new(50.0, 300.0, 2);
        stone.force_destroy();
        let pos = stone.pos;
        for _ in 0..30 {
            stone.update(SIM_DT);
        }
        assert_eq!(stone.pos, pos);
    }

    #[test]
    fn test_explosion_runs_to_spent() {
        let mut stone = Stone::new(0.0, 0.0, 2);
        stone.force_destroy();
        assert!(!stone.is_spent());
        stone.update(EXPLOSION_FRAME_TIME * EXPLOSION_FRAME_COUNT as f32 + 0.01);
        assert!(stone.is_spent());
        // Spent is terminal
        stone.update(1.0);
        assert!(stone.is_spent());
    }

    #[test]
    fn test_force_destroy_does_not_restart_explosion() {
        let mut stone = Stone::new(0.0, 0.0, 3);
        stone.force_destroy();
        stone.update(EXPLOSION_FRAME_TIME);
        let phase = stone.phase();
        stone.force_destroy();
        assert_eq!(stone.phase(), phase);
    }

    #[test]
    fn test_restart_clears_the_field() {
        let mut state = GameState::new(W, H, 1);
        for _ in 0..5 {
            state.stones.push(Stone::new(10.0, 10.0, 2));
        }
        for _ in 0..3 {
            state.fire();
        }
        state.player.decrease_lives();
        state.player.decrease_lives();
        state.player.decrease_lives();
        state.game_over = true;
        state.spawn_timer = 1.5;

        state.restart();
        assert_eq!(state.player.lives(), 3);
        assert!(state.stones.is_empty());
        assert!(state.bullets.is_empty());
        assert!(!state.game_over);
        assert_eq!(state.spawn_timer, 0.0);
    }

    #[test]
    fn test_fire_spawns_at_muzzle() {
        let mut state = GameState::new(W, H, 1);
        state.fire();
        assert_eq!(state.bullets.len(), 1);
        assert_eq!(state.bullets[0].pos, state.player.muzzle());
        assert_eq!(state.drain_events(), vec![GameEvent::ShotFired]);
        assert!(state.events.is_empty());
    }

    #[test]
    fn test_state_serde_roundtrip() {
        let mut state = GameState::new(W, H, 42);
        state.stones.push(Stone::new(100.0, 50.0, 2));
        state.fire();

        let json = serde_json::to_string(&state).unwrap();
        let back: GameState = serde_json::from_str(&json).unwrap();
        assert_eq!(back.seed, 42);
        assert_eq!(back.stones.len(), 1);
        assert_eq!(back.bullets.len(), 1);
        assert_eq!(back.player.lives(), 3);
        // Events are transient and not persisted
        assert!(back.events.is_empty());
    }
}
