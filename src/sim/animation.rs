//! Frame Advancement and Terminal Transitions
//!
//! Two responsibilities per tick: keep the looping locomotion animation in
//! sync with horizontal velocity, and advance every fighter's frame counter,
//! firing the terminal transition when a one-shot animation finishes.

use bevy::prelude::*;

use super::action_library::{ActionLibrary, TerminalPolicy};
use super::components::*;
use super::rounds::RoundController;
use crate::combat::events::ActionCompleted;

/// Keep stance/walk in sync with horizontal velocity. Only swaps between the
/// two locomotion loops; one-shot actions and held ducks are left alone.
pub fn sync_locomotion(
    rounds: Res<RoundController>,
    mut fighters: Query<&mut Fighter>,
) {
    if !rounds.is_active() {
        return;
    }
    for mut fighter in fighters.iter_mut() {
        match fighter.action {
            Action::Stance if fighter.velocity_x != 0.0 => {
                fighter.start_action(Action::Walk);
            }
            Action::Walk if fighter.velocity_x == 0.0 => {
                fighter.start_action(Action::Stance);
            }
            _ => {}
        }
    }
}

/// Advance every fighter's animation one tick. The frame counter increments
/// every tick; the frame index advances once per `divisor` ticks. Reaching
/// the last frame applies the action's terminal policy:
/// - `Loop`: wrap to frame zero.
/// - `HoldLast`: clamp on the final frame.
/// - `OnceToIdle`: reset to frame zero and return to stance (a finished
///   knockdown chains into get-up first, keeping the movement lock), then
///   emit `ActionCompleted`.
pub fn advance_animations(
    rounds: Res<RoundController>,
    library: Res<ActionLibrary>,
    mut fighters: Query<&mut Fighter>,
    mut completed: EventWriter<ActionCompleted>,
) {
    if !rounds.is_active() {
        return;
    }
    for mut fighter in fighters.iter_mut() {
        let spec = library.spec(fighter.kind, fighter.action);
        fighter.frame_counter += 1;
        if fighter.frame_counter < spec.divisor {
            continue;
        }
        fighter.frame_counter = 0;

        let next_index = fighter.frame_index + 1;
        if next_index < spec.frames {
            fighter.frame_index = next_index;
            continue;
        }

        match spec.terminal {
            TerminalPolicy::Loop => {
                fighter.frame_index = 0;
            }
            TerminalPolicy::HoldLast => {
                fighter.frame_index = spec.frames - 1;
            }
            TerminalPolicy::OnceToIdle => {
                let finished = fighter.action;
                if finished == Action::Fall {
                    // A knockdown always plays out through the get-up before
                    // the fighter can act again.
                    fighter.start_action(Action::GetUp);
                } else {
                    fighter.start_action(Action::Stance);
                    fighter.movement_lock = false;
                }
                completed.send(ActionCompleted {
                    side: fighter.side,
                    action: finished,
                });
            }
        }
    }
}

/// Clamp a frame index into a spec's valid range. Lookups against a swapped
/// table never index past the end of a shorter sheet.
pub fn clamped_frame(spec_frames: usize, frame_index: usize) -> usize {
    frame_index.min(spec_frames.saturating_sub(1))
}
