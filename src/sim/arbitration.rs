//! Exchange Arbitration
//!
//! A small state machine that grants one side "initiative" for the duration
//! of an exchange: the first hit to land claims it, the other side cannot
//! start a fresh attack until the exchange resolves, and the claim releases
//! once the attacker has recovered and the defender is back on their feet.

use bevy::prelude::*;

use super::components::*;
use super::rounds::RoundController;
use crate::combat::events::HitLanded;

/// Phase of the current exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BattleState {
    /// No exchange in flight; both sides may attack.
    #[default]
    Idle,
    /// The initiative holder's attack animation is still playing.
    AttackExtended,
    /// The defender is staggering or getting up off the floor.
    DefenderReacting,
    /// The attacker recovered first; waiting on the defender to stand.
    AttackerRecovering,
}

/// Who currently holds exchange initiative, and where the exchange stands.
#[derive(Resource, Default)]
pub struct Arbitration {
    pub state: BattleState,
    /// The side whose hit opened the current exchange.
    pub initiative: Option<Side>,
}

impl Arbitration {
    /// Whether `side` may start a new attack right now. Outside an exchange
    /// everyone may; inside one, only the initiative holder.
    pub fn allows_attack(&self, side: Side) -> bool {
        match self.state {
            BattleState::Idle => true,
            _ => self.initiative == Some(side),
        }
    }

    pub fn reset(&mut self) {
        self.state = BattleState::Idle;
        self.initiative = None;
    }
}

/// Claim initiative from landed hits and walk the exchange through its
/// phases. Transitions are polled from fighter state rather than waiting on
/// specific completion events, so a blocked or whiffed follow-up can never
/// wedge the machine: as soon as neither side is attacking or reacting, the
/// exchange is over.
pub fn advance_arbitration(
    rounds: Res<RoundController>,
    mut arbitration: ResMut<Arbitration>,
    mut hits: EventReader<HitLanded>,
    fighters: Query<&Fighter>,
) {
    if !rounds.is_active() {
        hits.clear();
        return;
    }

    // First claim wins; collision resolution orders villain hits first.
    for hit in hits.read() {
        if arbitration.state == BattleState::Idle {
            arbitration.initiative = Some(hit.attacker);
            arbitration.state = if hit.blocked {
                // A blocked opener leaves no reaction to wait on.
                BattleState::AttackExtended
            } else {
                BattleState::DefenderReacting
            };
        }
    }

    let Some(initiative) = arbitration.initiative else {
        return;
    };
    let defender_side = initiative.opponent();
    let mut attacker_busy = false;
    let mut defender_reacting = false;
    for fighter in fighters.iter() {
        if fighter.side == initiative {
            attacker_busy = fighter.is_attacking();
        } else if fighter.side == defender_side {
            defender_reacting = fighter.in_reaction();
        }
    }

    match arbitration.state {
        BattleState::Idle => {}
        BattleState::AttackExtended => {
            if !attacker_busy {
                arbitration.state = if defender_reacting {
                    BattleState::DefenderReacting
                } else {
                    BattleState::AttackerRecovering
                };
            }
        }
        BattleState::DefenderReacting => {
            if !defender_reacting {
                if attacker_busy {
                    // The attacker chained into another swing; the exchange
                    // stays theirs until it lands or whiffs out.
                    arbitration.state = BattleState::AttackExtended;
                } else {
                    arbitration.state = BattleState::AttackerRecovering;
                }
            }
        }
        BattleState::AttackerRecovering => {
            if !attacker_busy && !defender_reacting {
                arbitration.reset();
            }
        }
    }
}
