//! Villain AI
//!
//! The villain runs a simple two-part policy: a periodic attack decision
//! (every second, pick uniformly between doing nothing, a double punch, and a
//! kick while the player is in range) and a continuous approach that walks
//! toward the player with a hysteresis band so it does not jitter at the
//! range boundary.

use bevy::prelude::*;

use super::arbitration::Arbitration;
use super::components::*;
use super::constants::*;
use super::rounds::RoundController;

/// Marker plus per-entity AI state for the villain.
#[derive(Component, Default)]
pub struct AiDriven {
    /// Whether the approach logic currently wants to close distance.
    pub approaching: bool,
}

/// Timer for the periodic attack decision.
#[derive(Resource, Default)]
pub struct AiTimer {
    pub next_decision_ms: u64,
}

impl AiTimer {
    pub fn reset(&mut self) {
        self.next_decision_ms = 0;
    }
}

/// Periodic attack decision. When in range and free to act, the villain picks
/// uniformly from {stand still, double punch, kick}.
pub fn villain_decide(
    clock: Res<SimClock>,
    config: Res<BoutConfig>,
    rounds: Res<RoundController>,
    arbitration: Res<Arbitration>,
    mut timer: ResMut<AiTimer>,
    mut rng: ResMut<GameRng>,
    mut villains: Query<(&mut Fighter, &Transform), With<AiDriven>>,
    players: Query<&Transform, (With<PlayerControlled>, Without<AiDriven>)>,
) {
    if !rounds.is_active() {
        return;
    }
    let now = clock.now_ms();
    if now < timer.next_decision_ms {
        return;
    }
    timer.next_decision_ms = now + config.ai_decision_period_ms;

    let Ok((mut villain, villain_tf)) = villains.get_single_mut() else {
        return;
    };
    let Ok(player_tf) = players.get_single() else {
        return;
    };

    if villain.movement_lock || villain.in_reaction() {
        return;
    }
    if !arbitration.allows_attack(Side::Villain) {
        return;
    }

    let distance = (player_tf.translation.x - villain_tf.translation.x).abs();
    if distance > config.ai_attack_range {
        return;
    }

    match rng.choose_index(3) {
        0 => {} // stand and wait a cycle
        1 => {
            villain.velocity_x = 0.0;
            villain.start_locked_action(Action::DoublePunch);
        }
        _ => {
            villain.velocity_x = 0.0;
            villain.start_locked_action(Action::Kick);
        }
    }
}

/// Continuous approach: walk toward the player while outside the attack range
/// plus a hysteresis margin, stop once inside the range, and hold the current
/// choice in between so the villain does not flicker at the boundary.
pub fn apply_villain_approach(
    config: Res<BoutConfig>,
    rounds: Res<RoundController>,
    mut villains: Query<(&mut Fighter, &mut AiDriven, &Transform)>,
    players: Query<&Transform, (With<PlayerControlled>, Without<AiDriven>)>,
) {
    if !rounds.is_active() {
        return;
    }
    let Ok((mut villain, mut ai, villain_tf)) = villains.get_single_mut() else {
        return;
    };
    let Ok(player_tf) = players.get_single() else {
        return;
    };

    if villain.movement_lock || villain.in_reaction() {
        villain.velocity_x = 0.0;
        ai.approaching = false;
        return;
    }

    let dx = player_tf.translation.x - villain_tf.translation.x;
    let distance = dx.abs();
    if distance > config.ai_attack_range + AI_APPROACH_HYSTERESIS {
        ai.approaching = true;
    } else if distance <= config.ai_attack_range {
        ai.approaching = false;
    }

    villain.velocity_x = if ai.approaching {
        VILLAIN_WALK_SPEED * dx.signum()
    } else {
        0.0
    };
}
