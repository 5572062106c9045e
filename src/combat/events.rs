//! Combat events
//!
//! Defines the events that occur during a bout for logging and processing.

use bevy::prelude::*;

use crate::sim::components::{Action, Side};

/// Event fired when an attack connects with the opponent's bounding box and
/// passes the reaction/cooldown gates. Damage and knockback are applied by
/// `apply_hits`; this event is also what claims exchange initiative.
#[derive(Event, Debug, Clone, Copy)]
pub struct HitLanded {
    pub attacker: Side,
    pub defender: Side,
    /// The attack action that connected.
    pub attack: Action,
    /// Damage after block mitigation.
    pub damage: i32,
    /// Horizontal displacement applied to the defender (signed away from the
    /// attacker, zero when blocked).
    pub knockback: f32,
    /// Whether the defender blocked the hit.
    pub blocked: bool,
}

/// Event fired when a one-shot action finishes its terminal reset (frames
/// back to zero, fighter returned to idle or the follow-up action). This is
/// the unambiguous "animation complete" signal; frame index zero alone is
/// also the first frame of a fresh animation.
#[derive(Event, Debug, Clone, Copy)]
pub struct ActionCompleted {
    pub side: Side,
    pub action: Action,
}

/// Event fired when a round ends. `winner` is `None` for a void round (exact
/// health tie at the bell, or a double knockout).
#[derive(Event, Debug, Clone, Copy)]
pub struct RoundEnded {
    pub round: u32,
    pub winner: Option<Side>,
    pub by_knockout: bool,
}

/// Event fired once when a side reaches the required round wins.
#[derive(Event, Debug, Clone, Copy)]
pub struct MatchEnded {
    pub winner: Side,
    pub player_round_wins: u32,
    pub villain_round_wins: u32,
}
