//! Position Integration
//!
//! Advances fighter positions from their velocities, applies gravity while
//! airborne, lands fighters back on the ground line, clamps them into the
//! arena, and recomputes sprite-row facing from relative position.
//!
//! Coordinates follow the screen convention: x grows rightward, y grows
//! downward, so gravity is a positive increment and jumps start with a
//! negative vertical velocity.

use bevy::prelude::*;

use super::action_library::ActionLibrary;
use super::components::*;
use super::constants::*;
use super::rounds::RoundController;

/// Advance the simulation clock. Runs first in the tick, unconditionally, so
/// even a paused bout keeps a monotonically advancing timestamp.
pub fn advance_clock(mut clock: ResMut<SimClock>) {
    clock.advance();
}

/// Integrate velocities into positions and keep fighters inside the arena.
pub fn integrate_positions(
    config: Res<BoutConfig>,
    rounds: Res<RoundController>,
    library: Res<ActionLibrary>,
    mut fighters: Query<(&mut Fighter, &mut Transform)>,
) {
    if !rounds.is_active() {
        return;
    }

    for (mut fighter, mut transform) in fighters.iter_mut() {
        transform.translation.x += fighter.velocity_x;

        if !fighter.on_ground {
            transform.translation.y += fighter.velocity_y;
            fighter.velocity_y += GRAVITY;
            if transform.translation.y >= config.ground_y {
                transform.translation.y = config.ground_y;
                fighter.velocity_y = 0.0;
                fighter.on_ground = true;
            }
        }

        // Clamp by the current action's sprite box so a wide attack pose
        // cannot poke through the right wall.
        let width = library.spec(fighter.kind, fighter.action).width;
        let max_x = (config.arena_width - width).max(MIN_X);
        transform.translation.x = transform.translation.x.clamp(MIN_X, max_x);
    }

    // Facing is derived state, never input: left of the opponent means the
    // left-facing sprite row.
    let mut iter = fighters.iter_mut();
    if let (Some((mut a, a_tf)), Some((mut b, b_tf))) = (
        iter.next().map(|(f, t)| (f, t.translation.x)),
        iter.next().map(|(f, t)| (f, t.translation.x)),
    ) {
        a.facing = if a_tf < b_tf {
            Facing::Left
        } else {
            Facing::Right
        };
        b.facing = if b_tf < a_tf {
            Facing::Left
        } else {
            Facing::Right
        };
    }
}
