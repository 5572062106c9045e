//! Combat event plumbing
//!
//! Registers the bout's event types, owns the combat log resource, and
//! records log entries from the events the simulation systems emit.

use bevy::prelude::*;

pub mod events;
pub mod log;

use crate::sim::components::{Action, SimClock};
use crate::sim::SimSystemPhase;
use events::*;
use log::{CombatLog, CombatLogEventType};

/// Plugin for the combat event/logging layer
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        app
            // Combat events
            .add_event::<HitLanded>()
            .add_event::<ActionCompleted>()
            .add_event::<RoundEnded>()
            .add_event::<MatchEnded>()
            // Resources
            .init_resource::<CombatLog>()
            // Recording runs after the whole simulation tick has settled
            .add_systems(Update, record_combat_log.after(SimSystemPhase::Rounds));
    }
}

fn hit_verb(attack: Action) -> &'static str {
    match attack {
        Action::Punch => "punches",
        Action::DoublePunch => "double-punches",
        Action::Kick => "kicks",
        Action::UnderKick => "sweeps",
        _ => "strikes",
    }
}

/// Record hit events to the combat log. Round and match entries are written
/// directly by the round controller, which owns their context.
pub fn record_combat_log(
    clock: Res<SimClock>,
    mut combat_log: ResMut<CombatLog>,
    mut hits: EventReader<HitLanded>,
) {
    let now = clock.now_ms();
    for hit in hits.read() {
        let (event_type, message) = if hit.blocked {
            (
                CombatLogEventType::Block,
                format!(
                    "{} blocks {}'s {} ({} damage)",
                    hit.defender.name(),
                    hit.attacker.name(),
                    hit.attack.name(),
                    hit.damage
                ),
            )
        } else if hit.attack.is_kick_class() {
            (
                CombatLogEventType::Knockdown,
                format!(
                    "{} {} {} for {} damage (knockdown)",
                    hit.attacker.name(),
                    hit_verb(hit.attack),
                    hit.defender.name(),
                    hit.damage
                ),
            )
        } else {
            (
                CombatLogEventType::Hit,
                format!(
                    "{} {} {} for {} damage",
                    hit.attacker.name(),
                    hit_verb(hit.attack),
                    hit.defender.name(),
                    hit.damage
                ),
            )
        };
        combat_log.log(now, event_type, message);
    }
}
