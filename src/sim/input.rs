//! Player Intents
//!
//! The excluded input layer (keyboard, gamepad, a script in headless mode)
//! produces discrete `PlayerIntent` events; this module drains them at the
//! start of each tick and turns them into fighter state changes, applying the
//! double-press upgrades and the movement-lock gate.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::arbitration::Arbitration;
use super::components::*;
use super::constants::*;
use super::rounds::RoundController;

/// Discrete input intents. Timestamps come from the simulation clock at the
/// tick the intent is drained, which is what the double-press windows key on.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerIntent {
    MoveLeft,
    MoveRight,
    StopMove,
    Punch,
    Kick,
    Jump,
    Duck,
    StopDuck,
    Block,
    StopBlock,
    /// Restart the match once it is over.
    Confirm,
}

/// Drain queued player intents and apply them to the player fighter.
///
/// Gating rules:
/// - While the match is over, only `Confirm` is honored (requests a restart).
/// - While a one-shot action is in progress (`movement_lock`), new
///   directional/attack intents are silently ignored — expected steady-state
///   behavior, not an error.
/// - New attacks also defer to the exchange arbitration: the side without
///   initiative cannot start one mid-exchange.
pub fn apply_player_intents(
    clock: Res<SimClock>,
    arbitration: Res<Arbitration>,
    mut rounds: ResMut<RoundController>,
    mut intents: EventReader<PlayerIntent>,
    mut players: Query<&mut Fighter, With<PlayerControlled>>,
) {
    let now = clock.now_ms();
    let Ok(mut fighter) = players.get_single_mut() else {
        return;
    };

    for intent in intents.read() {
        if rounds.game_over {
            if *intent == PlayerIntent::Confirm {
                rounds.restart_requested = true;
            }
            continue;
        }
        if !rounds.is_active() {
            continue;
        }

        match intent {
            PlayerIntent::MoveLeft => {
                if !fighter.movement_lock {
                    fighter.velocity_x = -PLAYER_WALK_SPEED;
                }
            }
            PlayerIntent::MoveRight => {
                if !fighter.movement_lock {
                    fighter.velocity_x = PLAYER_WALK_SPEED;
                }
            }
            PlayerIntent::StopMove => {
                fighter.velocity_x = 0.0;
            }
            PlayerIntent::Punch => {
                if fighter.movement_lock || !arbitration.allows_attack(Side::Player) {
                    continue;
                }
                // A second punch press inside the window upgrades the attack.
                let action = if now.saturating_sub(fighter.last_punch_input_ms)
                    < DOUBLE_PUNCH_WINDOW_MS
                    && fighter.last_punch_input_ms > 0
                {
                    Action::DoublePunch
                } else {
                    Action::Punch
                };
                fighter.last_punch_input_ms = now;
                fighter.start_locked_action(action);
            }
            PlayerIntent::Kick => {
                if fighter.movement_lock || !arbitration.allows_attack(Side::Player) {
                    continue;
                }
                // Kick while ducking (recently pressed, still held) sweeps low.
                let action = if fighter.duck_held
                    && now.saturating_sub(fighter.last_duck_press_ms) < UNDER_KICK_WINDOW_MS
                {
                    Action::UnderKick
                } else {
                    Action::Kick
                };
                fighter.start_locked_action(action);
            }
            PlayerIntent::Jump => {
                if fighter.movement_lock || !fighter.on_ground {
                    continue;
                }
                // Directional vs. vertical is fixed at intent time and not
                // re-evaluated mid-jump.
                let action = if fighter.velocity_x != 0.0 {
                    Action::JumpDirectional
                } else {
                    Action::JumpVertical
                };
                fighter.velocity_y = JUMP_POWER;
                fighter.on_ground = false;
                fighter.start_locked_action(action);
            }
            PlayerIntent::Duck => {
                if fighter.movement_lock || !fighter.on_ground {
                    continue;
                }
                fighter.duck_held = true;
                fighter.last_duck_press_ms = now;
                fighter.velocity_x = 0.0;
                fighter.start_action(Action::Duck);
            }
            PlayerIntent::StopDuck => {
                fighter.duck_held = false;
                if fighter.action == Action::Duck {
                    fighter.start_action(Action::GetUp);
                }
            }
            PlayerIntent::Block => {
                if !fighter.movement_lock && fighter.on_ground {
                    fighter.is_blocking = true;
                }
            }
            PlayerIntent::StopBlock => {
                fighter.is_blocking = false;
            }
            PlayerIntent::Confirm => {}
        }
    }
}
