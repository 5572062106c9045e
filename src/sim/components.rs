//! Component Definitions for the Fight Simulation
//!
//! This module contains the ECS components, resources, and data structures
//! shared by the simulation systems: the `Fighter` entity state, the fixed
//! tick clock, the seeded RNG, and the bout-level configuration.

use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::constants::*;

// ============================================================================
// Resources
// ============================================================================

/// Fixed-tick simulation clock. Advanced once at the start of every update
/// pass, so every system in the same tick observes the same timestamp.
#[derive(Resource, Default)]
pub struct SimClock {
    pub tick: u64,
}

impl SimClock {
    pub fn advance(&mut self) {
        self.tick += 1;
    }

    /// Milliseconds of simulated time elapsed since tick zero.
    pub fn now_ms(&self) -> u64 {
        self.tick * 1000 / TICK_RATE
    }

    /// Number of ticks covering at least `ms` milliseconds, rounded up so a
    /// window of e.g. 500ms is never undershot.
    pub fn ticks_for_ms(ms: u64) -> u64 {
        (ms * TICK_RATE).div_ceil(1000)
    }
}

/// Seeded random number generator for deterministic bout simulation.
///
/// When a seed is provided (e.g., via headless config), the same seed will
/// always produce the same bout outcome. Without a seed, uses system entropy.
#[derive(Resource)]
pub struct GameRng {
    rng: StdRng,
    /// The seed used to initialize this RNG (if deterministic)
    pub seed: Option<u64>,
}

impl GameRng {
    /// Create a new GameRng with a specific seed for deterministic behavior
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed: Some(seed),
        }
    }

    /// Create a new GameRng with random entropy (non-deterministic)
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
            seed: None,
        }
    }

    /// Generate a random f32 in the range [0.0, 1.0)
    pub fn random_f32(&mut self) -> f32 {
        self.rng.gen()
    }

    /// Pick a uniformly random index in `0..len`.
    pub fn choose_index(&mut self, len: usize) -> usize {
        debug_assert!(len > 0);
        self.rng.gen_range(0..len)
    }
}

impl Default for GameRng {
    fn default() -> Self {
        Self::from_entropy()
    }
}

/// Bout-level configuration, supplied at construction time. Defaults mirror
/// the constants module; the headless config can override the tunable parts.
#[derive(Resource, Clone, Debug, Serialize, Deserialize)]
pub struct BoutConfig {
    pub arena_width: f32,
    pub arena_height: f32,
    pub ground_y: f32,
    pub player_spawn_x: f32,
    pub villain_spawn_x: f32,
    pub max_health: i32,
    pub round_time_ms: u64,
    pub round_pause_ms: u64,
    pub rounds: u32,
    pub collision_cooldown_ms: u64,
    pub ai_attack_range: f32,
    pub ai_decision_period_ms: u64,
}

impl Default for BoutConfig {
    fn default() -> Self {
        Self {
            arena_width: ARENA_WIDTH,
            arena_height: ARENA_HEIGHT,
            ground_y: GROUND_Y,
            player_spawn_x: PLAYER_SPAWN_X,
            villain_spawn_x: VILLAIN_SPAWN_X,
            max_health: MAX_HEALTH,
            round_time_ms: ROUND_TIME_MS,
            round_pause_ms: ROUND_PAUSE_MS,
            rounds: MAX_ROUNDS,
            collision_cooldown_ms: COLLISION_COOLDOWN_MS,
            ai_attack_range: AI_ATTACK_RANGE,
            ai_decision_period_ms: AI_DECISION_PERIOD_MS,
        }
    }
}

impl BoutConfig {
    /// Round wins required to take the match (best-of-N, first past half).
    pub fn wins_needed(&self) -> u32 {
        self.rounds / 2 + 1
    }
}

// ============================================================================
// Enums
// ============================================================================

/// Which side of the bout a fighter is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Player,
    Villain,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::Player => Side::Villain,
            Side::Villain => Side::Player,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Side::Player => "Player",
            Side::Villain => "Villain",
        }
    }
}

/// Sprite-row facing, recomputed from relative position every tick:
/// `Left` when standing to the left of the opponent (the renderer picks the
/// matching sheet row), `Right` otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facing {
    Left,
    Right,
}

/// Which animation frame table a fighter binds to. Fighters are symmetric in
/// structure and differ only in their intent producer and their frame tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FighterKind {
    /// The player-controlled roster entry.
    Ronin,
    /// The AI-controlled roster entry.
    Bruiser,
}

impl FighterKind {
    pub fn name(self) -> &'static str {
        match self {
            FighterKind::Ronin => "Ronin",
            FighterKind::Bruiser => "Bruiser",
        }
    }
}

/// The single mutually-exclusive animated behavior a fighter is performing.
///
/// A sum type rather than per-behavior booleans, so illegal combinations
/// (hit while kicking) are unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Stance,
    Walk,
    Duck,
    GetUp,
    JumpVertical,
    JumpDirectional,
    Punch,
    DoublePunch,
    Kick,
    UnderKick,
    Hit,
    Fall,
}

impl Action {
    pub fn name(self) -> &'static str {
        match self {
            Action::Stance => "stance",
            Action::Walk => "walk",
            Action::Duck => "duck",
            Action::GetUp => "get_up",
            Action::JumpVertical => "jump_vertical",
            Action::JumpDirectional => "jump_directional",
            Action::Punch => "punch",
            Action::DoublePunch => "double_punch",
            Action::Kick => "kick",
            Action::UnderKick => "under_kick",
            Action::Hit => "hit",
            Action::Fall => "fall",
        }
    }

    /// Any attack action.
    pub fn is_attack(self) -> bool {
        matches!(
            self,
            Action::Punch | Action::DoublePunch | Action::Kick | Action::UnderKick
        )
    }

    /// Attacks that knock the defender down.
    pub fn is_kick_class(self) -> bool {
        matches!(self, Action::Kick | Action::UnderKick)
    }

    /// Attacks that stagger the defender.
    pub fn is_punch_class(self) -> bool {
        matches!(self, Action::Punch | Action::DoublePunch)
    }

    /// Forced reaction states (including the get-up that follows a knockdown).
    pub fn is_reaction(self) -> bool {
        matches!(self, Action::Hit | Action::Fall | Action::GetUp)
    }
}

// ============================================================================
// Fighter
// ============================================================================

/// A combatant. Exactly two exist per bout, owned by the simulation; position
/// lives in the entity's `Transform` (x right, y down, ground at
/// `BoutConfig::ground_y`).
#[derive(Component)]
pub struct Fighter {
    pub side: Side,
    pub kind: FighterKind,
    pub health: i32,
    pub velocity_x: f32,
    pub velocity_y: f32,
    pub facing: Facing,
    pub action: Action,
    pub frame_index: usize,
    pub frame_counter: u32,
    /// True while a one-shot action must run to completion; blocks new
    /// directional/attack intents.
    pub movement_lock: bool,
    pub is_blocking: bool,
    pub duck_held: bool,
    pub on_ground: bool,
    /// Whether the current attack activation has already connected.
    pub has_connected: bool,
    pub last_punch_input_ms: u64,
    pub last_duck_press_ms: u64,
    // Per-bout stats, reported in the saved log.
    pub damage_dealt: i32,
    pub damage_taken: i32,
}

impl Fighter {
    pub fn new(side: Side, kind: FighterKind, max_health: i32) -> Self {
        Self {
            side,
            kind,
            health: max_health,
            velocity_x: 0.0,
            velocity_y: 0.0,
            facing: match side {
                Side::Player => Facing::Left,
                Side::Villain => Facing::Right,
            },
            action: Action::Stance,
            frame_index: 0,
            frame_counter: 0,
            movement_lock: false,
            is_blocking: false,
            duck_held: false,
            on_ground: true,
            has_connected: false,
            last_punch_input_ms: 0,
            last_duck_press_ms: 0,
            damage_dealt: 0,
            damage_taken: 0,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    pub fn is_attacking(&self) -> bool {
        self.action.is_attack()
    }

    pub fn in_reaction(&self) -> bool {
        self.action.is_reaction()
    }

    /// Switch to a new action with animation progress reset. This is the only
    /// way actions change, so a fresh `Hit`/`Fall` can never bleed frames from
    /// a prior animation.
    pub fn start_action(&mut self, action: Action) {
        self.action = action;
        self.frame_index = 0;
        self.frame_counter = 0;
        self.has_connected = false;
    }

    /// Start a one-shot action that must run to completion.
    pub fn start_locked_action(&mut self, action: Action) {
        self.start_action(action);
        self.movement_lock = true;
    }

    /// Apply damage, clamped so health stays in `[0, max]` and never rises.
    pub fn apply_damage(&mut self, damage: i32) {
        let damage = damage.max(0);
        self.health = (self.health - damage).max(0);
        self.damage_taken += damage;
    }

    /// Reset round-scoped state to the spawn configuration.
    pub fn reset_for_round(&mut self, max_health: i32) {
        self.health = max_health;
        self.velocity_x = 0.0;
        self.velocity_y = 0.0;
        self.on_ground = true;
        self.movement_lock = false;
        self.is_blocking = false;
        self.duck_held = false;
        self.start_action(Action::Stance);
    }
}

// ============================================================================
// Markers & render surface
// ============================================================================

/// Marker for the human-driven fighter.
#[derive(Component)]
pub struct PlayerControlled;

/// Everything the excluded rendering layer needs to draw one fighter. The
/// renderer maps `(action, frame_index, facing)` to a drawable image and blits
/// it at `(x, y)`; the core never touches pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderView {
    pub action: &'static str,
    pub frame_index: usize,
    pub facing: Facing,
    pub x: f32,
    pub y: f32,
    pub health: i32,
}

impl Fighter {
    pub fn render_view(&self, transform: &Transform) -> RenderView {
        RenderView {
            action: self.action.name(),
            frame_index: self.frame_index,
            facing: self.facing,
            x: transform.translation.x,
            y: transform.translation.y,
            health: self.health,
        }
    }
}

/// Spawn the two fighters at their configured positions. Used by the headless
/// runner's startup system and by tests.
pub fn spawn_fighters(commands: &mut Commands, config: &BoutConfig) {
    commands.spawn((
        Transform::from_xyz(config.player_spawn_x, config.ground_y, 0.0),
        Fighter::new(Side::Player, FighterKind::Ronin, config.max_health),
        PlayerControlled,
    ));
    commands.spawn((
        Transform::from_xyz(config.villain_spawn_x, config.ground_y, 0.0),
        Fighter::new(Side::Villain, FighterKind::Bruiser, config.max_health),
        super::ai::AiDriven::default(),
    ));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_ms_at_sixty_hertz() {
        let mut clock = SimClock::default();
        assert_eq!(clock.now_ms(), 0);
        for _ in 0..60 {
            clock.advance();
        }
        assert_eq!(clock.now_ms(), 1000);
    }

    #[test]
    fn test_ticks_for_ms_rounds_up() {
        assert_eq!(SimClock::ticks_for_ms(1000), 60);
        assert_eq!(SimClock::ticks_for_ms(500), 30);
        // 100ms is exactly 6 ticks at 60Hz
        assert_eq!(SimClock::ticks_for_ms(100), 6);
    }

    #[test]
    fn test_damage_clamps_at_zero() {
        let mut f = Fighter::new(Side::Player, FighterKind::Ronin, 100);
        f.apply_damage(40);
        assert_eq!(f.health, 60);
        f.apply_damage(1000);
        assert_eq!(f.health, 0);
        f.apply_damage(-5);
        assert_eq!(f.health, 0, "damage never heals");
    }

    #[test]
    fn test_start_action_resets_progress() {
        let mut f = Fighter::new(Side::Player, FighterKind::Ronin, 100);
        f.frame_index = 5;
        f.frame_counter = 33;
        f.has_connected = true;
        f.start_action(Action::Hit);
        assert_eq!(f.frame_index, 0);
        assert_eq!(f.frame_counter, 0);
        assert!(!f.has_connected);
    }

    #[test]
    fn test_action_classes() {
        assert!(Action::Kick.is_kick_class());
        assert!(Action::UnderKick.is_kick_class());
        assert!(Action::Punch.is_punch_class());
        assert!(Action::DoublePunch.is_punch_class());
        assert!(!Action::Hit.is_attack());
        assert!(Action::GetUp.is_reaction());
    }

    #[test]
    fn test_render_view_mirrors_fighter_state() {
        let mut f = Fighter::new(Side::Player, FighterKind::Ronin, 100);
        f.start_action(Action::Kick);
        f.frame_index = 2;
        let view = f.render_view(&Transform::from_xyz(250.0, 300.0, 0.0));
        assert_eq!(view.action, "kick");
        assert_eq!(view.frame_index, 2);
        assert_eq!(view.x, 250.0);
        assert_eq!(view.y, 300.0);
        assert_eq!(view.health, 100);
    }

    #[test]
    fn test_seeded_rng_is_deterministic() {
        let mut a = GameRng::from_seed(7);
        let mut b = GameRng::from_seed(7);
        for _ in 0..16 {
            assert_eq!(a.choose_index(3), b.choose_index(3));
        }
    }
}
