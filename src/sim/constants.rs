//! Simulation Constants
//!
//! Centralized location for magic numbers used throughout the simulation.
//! This makes it easier to tune balance and ensures consistency.

// ============================================================================
// Tick Rate
// ============================================================================

/// Simulation ticks per second. The headless runner locks its schedule to
/// this rate, and all millisecond math derives from it.
pub const TICK_RATE: u64 = 60;

// ============================================================================
// Arena
// ============================================================================

/// Arena width in pixels. Fighters are clamped so their current sprite box
/// stays inside `[MIN_X, arena_width - width]`.
pub const ARENA_WIDTH: f32 = 800.0;

/// Arena height in pixels (informational; vertical motion is bounded by the
/// ground line, not the arena top).
pub const ARENA_HEIGHT: f32 = 600.0;

/// Left arena boundary.
pub const MIN_X: f32 = 0.0;

/// Ground line in screen coordinates (y grows downward). A fighter whose y
/// reaches this value is standing.
pub const GROUND_Y: f32 = 300.0;

/// Spawn positions at round start.
pub const PLAYER_SPAWN_X: f32 = 100.0;
pub const VILLAIN_SPAWN_X: f32 = 600.0;

// ============================================================================
// Movement
// ============================================================================

/// Player horizontal walk speed in pixels per tick.
pub const PLAYER_WALK_SPEED: f32 = 5.0;

/// Villain approach speed in pixels per tick.
pub const VILLAIN_WALK_SPEED: f32 = 1.0;

/// Downward acceleration per tick while airborne.
pub const GRAVITY: f32 = 0.5;

/// Initial vertical velocity of a jump (negative = up in screen coordinates).
pub const JUMP_POWER: f32 = -10.0;

// ============================================================================
// Health & Damage
// ============================================================================

pub const MAX_HEALTH: i32 = 100;

/// Damage table.
pub const PUNCH_DAMAGE: i32 = 8;
pub const DOUBLE_PUNCH_DAMAGE: i32 = 15;
pub const KICK_DAMAGE: i32 = 20;
pub const UNDER_KICK_DAMAGE: i32 = 20;

/// Horizontal displacement applied to the defender on a connecting hit,
/// signed away from the attacker.
pub const PUNCH_KNOCKBACK: f32 = 15.0;
pub const KICK_KNOCKBACK: f32 = 30.0;

/// Blocking divides incoming damage by this (integer division).
pub const BLOCK_DAMAGE_DIVISOR: i32 = 3;

// ============================================================================
// Timing Windows
// ============================================================================

/// Minimum gap after a knockdown before a punch-class hit can register.
pub const COLLISION_COOLDOWN_MS: u64 = 500;

/// A second punch input inside this window upgrades to a double punch.
pub const DOUBLE_PUNCH_WINDOW_MS: u64 = 500;

/// A kick input inside this window of a still-held duck becomes an under-kick.
pub const UNDER_KICK_WINDOW_MS: u64 = 400;

// ============================================================================
// AI
// ============================================================================

/// Distance at which the villain considers attacking instead of approaching.
pub const AI_ATTACK_RANGE: f32 = 100.0;

/// Hysteresis band added to the attack range before the villain resumes
/// walking, so it doesn't jitter at the boundary.
pub const AI_APPROACH_HYSTERESIS: f32 = 10.0;

/// How often the villain re-evaluates its behavior.
pub const AI_DECISION_PERIOD_MS: u64 = 1000;

// ============================================================================
// Rounds
// ============================================================================

/// Round duration before a decision on health.
pub const ROUND_TIME_MS: u64 = 90_000;

/// Pause between rounds (and after a void round) before the next one starts.
pub const ROUND_PAUSE_MS: u64 = 3_000;

/// Best-of-N. First to `rounds / 2 + 1` round wins takes the match.
pub const MAX_ROUNDS: u32 = 3;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arena_bounds_are_sane() {
        assert!(ARENA_WIDTH > 0.0);
        assert!(GROUND_Y > 0.0 && GROUND_Y < ARENA_HEIGHT);
        assert!(PLAYER_SPAWN_X >= MIN_X && PLAYER_SPAWN_X < ARENA_WIDTH);
        assert!(VILLAIN_SPAWN_X >= MIN_X && VILLAIN_SPAWN_X < ARENA_WIDTH);
    }

    #[test]
    fn test_damage_table_ordering() {
        // Kicks knock down and out-damage punches; the double punch sits between.
        assert!(PUNCH_DAMAGE < DOUBLE_PUNCH_DAMAGE);
        assert!(DOUBLE_PUNCH_DAMAGE < KICK_DAMAGE);
        assert_eq!(KICK_DAMAGE, UNDER_KICK_DAMAGE);
        assert!(PUNCH_KNOCKBACK < KICK_KNOCKBACK);
    }

    #[test]
    fn test_blocked_punch_damage() {
        assert_eq!(PUNCH_DAMAGE / BLOCK_DAMAGE_DIVISOR, 2);
        assert_eq!(DOUBLE_PUNCH_DAMAGE / BLOCK_DAMAGE_DIVISOR, 5);
    }

    #[test]
    fn test_best_of_three_needs_two_wins() {
        assert_eq!(MAX_ROUNDS / 2 + 1, 2);
    }
}
