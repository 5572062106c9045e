//! Round and Match Flow
//!
//! Owns the bout lifecycle: starting rounds from a clean slate, ending them
//! on knockout or on the bell, scoring round wins up to the match, pausing
//! between rounds, and restarting a finished match on request.

use bevy::prelude::*;

use super::ai::AiTimer;
use super::arbitration::Arbitration;
use super::collision::CollisionTimers;
use super::components::*;
use crate::combat::events::{MatchEnded, RoundEnded};
use crate::combat::log::{CombatLog, CombatLogEventType};

/// Lifecycle phase of the current round.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RoundPhase {
    /// Waiting to start (fresh match, or the pause between rounds elapsed).
    NotStarted,
    /// Fighting.
    Active { started_ms: u64 },
    /// Round decided; the between-rounds pause is running.
    Ended { winner: Option<Side>, at_ms: u64 },
}

/// Match-level state: current round, the score, and whether the match is
/// over. Rounds are best-of-N; a void round (tie or double knockout) scores
/// nobody and is replayed under the same round number.
#[derive(Resource)]
pub struct RoundController {
    pub round: u32,
    pub player_wins: u32,
    pub villain_wins: u32,
    pub phase: RoundPhase,
    pub game_over: bool,
    pub winner: Option<Side>,
    pub restart_requested: bool,
}

impl Default for RoundController {
    fn default() -> Self {
        Self {
            round: 1,
            player_wins: 0,
            villain_wins: 0,
            phase: RoundPhase::NotStarted,
            game_over: false,
            winner: None,
            restart_requested: false,
        }
    }
}

impl RoundController {
    /// Whether fighting systems should run this tick.
    pub fn is_active(&self) -> bool {
        matches!(self.phase, RoundPhase::Active { .. })
    }

    pub fn wins_for(&self, side: Side) -> u32 {
        match side {
            Side::Player => self.player_wins,
            Side::Villain => self.villain_wins,
        }
    }
}

/// Reset every per-round structure: fighters back to their spawn corners at
/// full health, timers and the exchange arbitration cleared.
fn reset_round_state(
    config: &BoutConfig,
    arbitration: &mut Arbitration,
    collision_timers: &mut CollisionTimers,
    ai_timer: &mut AiTimer,
    fighters: &mut Query<(&mut Fighter, &mut Transform)>,
) {
    arbitration.reset();
    collision_timers.reset();
    ai_timer.reset();
    for (mut fighter, mut transform) in fighters.iter_mut() {
        fighter.reset_for_round(config.max_health);
        let spawn_x = match fighter.side {
            Side::Player => config.player_spawn_x,
            Side::Villain => config.villain_spawn_x,
        };
        transform.translation.x = spawn_x;
        transform.translation.y = config.ground_y;
    }
}

/// Drive the round lifecycle. Runs every tick, after combat has settled, so
/// knockouts are observed on the tick they happen.
#[allow(clippy::too_many_arguments)]
pub fn update_round_flow(
    clock: Res<SimClock>,
    config: Res<BoutConfig>,
    mut controller: ResMut<RoundController>,
    mut arbitration: ResMut<Arbitration>,
    mut collision_timers: ResMut<CollisionTimers>,
    mut ai_timer: ResMut<AiTimer>,
    mut combat_log: ResMut<CombatLog>,
    mut fighters: Query<(&mut Fighter, &mut Transform)>,
    mut round_ended: EventWriter<RoundEnded>,
    mut match_ended: EventWriter<MatchEnded>,
) {
    let now = clock.now_ms();

    if controller.restart_requested {
        *controller = RoundController::default();
        combat_log.log(now, CombatLogEventType::Match, "Match restarted".to_string());
        info!("Match restarted");
    }

    match controller.phase {
        RoundPhase::NotStarted => {
            if controller.game_over {
                return;
            }
            reset_round_state(
                &config,
                &mut arbitration,
                &mut collision_timers,
                &mut ai_timer,
                &mut fighters,
            );
            combat_log.log(
                now,
                CombatLogEventType::Round,
                format!("Round {} started", controller.round),
            );
            info!("Round {} started", controller.round);
            controller.phase = RoundPhase::Active { started_ms: now };
        }
        RoundPhase::Active { started_ms } => {
            let mut player_health = 0;
            let mut villain_health = 0;
            for (fighter, _) in fighters.iter() {
                match fighter.side {
                    Side::Player => player_health = fighter.health,
                    Side::Villain => villain_health = fighter.health,
                }
            }

            let timed_out = now.saturating_sub(started_ms) >= config.round_time_ms;
            let knockout = player_health <= 0 || villain_health <= 0;
            if !knockout && !timed_out {
                return;
            }

            // Double knockout and an exact tie at the bell both void the
            // round; it is replayed under the same number.
            let winner = if player_health > villain_health {
                Some(Side::Player)
            } else if villain_health > player_health {
                Some(Side::Villain)
            } else {
                None
            };

            match winner {
                Some(side) => {
                    match side {
                        Side::Player => controller.player_wins += 1,
                        Side::Villain => controller.villain_wins += 1,
                    }
                    let how = if knockout { "by knockout" } else { "on points" };
                    combat_log.log(
                        now,
                        CombatLogEventType::Round,
                        format!("Round {} ended: {} wins {}", controller.round, side.name(), how),
                    );
                    info!("Round {} ended: {} wins {}", controller.round, side.name(), how);
                }
                None => {
                    combat_log.log(
                        now,
                        CombatLogEventType::Round,
                        format!("Round {} void: no winner", controller.round),
                    );
                    info!("Round {} void: no winner", controller.round);
                }
            }
            round_ended.send(RoundEnded {
                round: controller.round,
                winner,
                by_knockout: knockout,
            });

            // Freeze the fighters for the pause.
            for (mut fighter, _) in fighters.iter_mut() {
                fighter.velocity_x = 0.0;
            }

            let needed = config.wins_needed();
            if controller.player_wins >= needed || controller.villain_wins >= needed {
                let match_winner = if controller.player_wins >= needed {
                    Side::Player
                } else {
                    Side::Villain
                };
                controller.game_over = true;
                controller.winner = Some(match_winner);
                combat_log.log(
                    now,
                    CombatLogEventType::Match,
                    format!(
                        "Match over: {} wins {}-{}",
                        match_winner.name(),
                        controller.wins_for(match_winner),
                        controller.wins_for(match_winner.opponent())
                    ),
                );
                info!(
                    "Match over: {} wins {}-{}",
                    match_winner.name(),
                    controller.wins_for(match_winner),
                    controller.wins_for(match_winner.opponent())
                );
                match_ended.send(MatchEnded {
                    winner: match_winner,
                    player_round_wins: controller.player_wins,
                    villain_round_wins: controller.villain_wins,
                });
            }

            controller.phase = RoundPhase::Ended { winner, at_ms: now };
        }
        RoundPhase::Ended { winner, at_ms } => {
            if controller.game_over {
                return;
            }
            if now.saturating_sub(at_ms) < config.round_pause_ms {
                return;
            }
            // A decided round advances the number; a void round replays.
            if winner.is_some() {
                controller.round += 1;
            }
            controller.phase = RoundPhase::NotStarted;
        }
    }
}
