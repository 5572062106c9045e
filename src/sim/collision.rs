//! Attack Collision and Damage Resolution
//!
//! Detects attack connections each tick via axis-aligned sprite-box overlap,
//! applies the block/cooldown/reaction gates, and turns connections into
//! `HitLanded` events. A follow-up system consumes those events to mutate
//! health, push the defender back, and force the reaction animation.

use bevy::prelude::*;
use smallvec::SmallVec;

use super::action_library::ActionLibrary;
use super::components::*;
use super::constants::*;
use super::rounds::RoundController;
use crate::combat::events::HitLanded;

/// Axis-aligned sprite box. `(x, y)` is the top-left corner in screen
/// coordinates (y grows downward).
#[derive(Debug, Clone, Copy)]
pub struct HitBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl HitBox {
    pub fn overlaps(&self, other: &HitBox) -> bool {
        self.x < other.x + other.width
            && other.x < self.x + self.width
            && self.y < other.y + other.height
            && other.y < self.y + self.height
    }
}

/// The fighter's collision box for its current action, anchored at its
/// transform. Shorter poses (duck, sweep) keep their feet on the ground
/// line and drop the top edge.
pub fn fighter_box(fighter: &Fighter, transform: &Transform, library: &ActionLibrary) -> HitBox {
    let spec = library.spec(fighter.kind, fighter.action);
    let stance = library.spec(fighter.kind, Action::Stance);
    // Shorter poses drop the top edge, not the feet.
    let y = transform.translation.y + (stance.height - spec.height);
    HitBox {
        x: transform.translation.x,
        y,
        width: spec.width,
        height: spec.height,
    }
}

/// Per-side timestamps of the last knockdown, used to suppress punch spam
/// while a fighter is getting back up.
#[derive(Resource, Default)]
pub struct CollisionTimers {
    player_last_fall_ms: Option<u64>,
    villain_last_fall_ms: Option<u64>,
}

impl CollisionTimers {
    pub fn record_fall(&mut self, side: Side, now_ms: u64) {
        match side {
            Side::Player => self.player_last_fall_ms = Some(now_ms),
            Side::Villain => self.villain_last_fall_ms = Some(now_ms),
        }
    }

    /// True while the post-knockdown punch grace window is still open.
    pub fn in_fall_grace(&self, side: Side, now_ms: u64, cooldown_ms: u64) -> bool {
        let last = match side {
            Side::Player => self.player_last_fall_ms,
            Side::Villain => self.villain_last_fall_ms,
        };
        matches!(last, Some(at) if now_ms.saturating_sub(at) < cooldown_ms)
    }

    pub fn reset(&mut self) {
        self.player_last_fall_ms = None;
        self.villain_last_fall_ms = None;
    }
}

struct PendingHit {
    attacker: Side,
    defender: Side,
    attack: Action,
    damage: i32,
    knockback: f32,
    blocked: bool,
}

fn attack_damage(attack: Action) -> i32 {
    match attack {
        Action::Punch => PUNCH_DAMAGE,
        Action::DoublePunch => DOUBLE_PUNCH_DAMAGE,
        Action::Kick => KICK_DAMAGE,
        Action::UnderKick => UNDER_KICK_DAMAGE,
        _ => 0,
    }
}

fn attack_knockback(attack: Action) -> f32 {
    if attack.is_kick_class() {
        KICK_KNOCKBACK
    } else {
        PUNCH_KNOCKBACK
    }
}

/// Detect connecting attacks and emit `HitLanded` events.
///
/// Gates, in order:
/// - each attack activation connects at most once (`has_connected`);
/// - a defender already knocked down or getting up cannot be hit again;
/// - punches are additionally suppressed during the post-knockdown grace
///   window and against a defender already staggering;
/// - a blocking defender takes reduced damage with no reaction or knockback.
///
/// The villain's attack is checked first, so when both connect on the same
/// tick the villain's claim on the exchange wins.
pub fn resolve_attacks(
    clock: Res<SimClock>,
    config: Res<BoutConfig>,
    rounds: Res<RoundController>,
    library: Res<ActionLibrary>,
    mut timers: ResMut<CollisionTimers>,
    mut fighters: Query<(&mut Fighter, &Transform)>,
    mut hits: EventWriter<HitLanded>,
) {
    if !rounds.is_active() {
        return;
    }
    let now = clock.now_ms();

    let mut pending: SmallVec<[PendingHit; 2]> = SmallVec::new();
    {
        let mut views: SmallVec<[(Side, Action, bool, bool, HitBox); 2]> = SmallVec::new();
        for (fighter, transform) in fighters.iter() {
            views.push((
                fighter.side,
                fighter.action,
                fighter.has_connected,
                fighter.is_blocking,
                fighter_box(fighter, transform, &library),
            ));
        }
        // Villain first: on a simultaneous connect its hit resolves and the
        // player's swing is spent against a falling target.
        views.sort_by_key(|v| match v.0 {
            Side::Villain => 0,
            Side::Player => 1,
        });

        for i in 0..views.len() {
            for j in 0..views.len() {
                if i == j {
                    continue;
                }
                let (atk_side, atk_action, atk_connected, _, atk_box) = views[i];
                let (def_side, def_action, _, def_blocking, def_box) = views[j];

                if !atk_action.is_attack() || atk_connected {
                    continue;
                }
                if !atk_box.overlaps(&def_box) {
                    continue;
                }
                // The reaction gate is per attack class: a kick only respects
                // an existing knockdown and converts a stagger into a fall; a
                // punch cannot re-hit a reacting defender at all.
                if atk_action.is_kick_class() {
                    if matches!(def_action, Action::Fall | Action::GetUp) {
                        continue;
                    }
                } else if def_action.is_reaction()
                    || timers.in_fall_grace(def_side, now, config.collision_cooldown_ms)
                {
                    continue;
                }
                // Only the earlier claim on this defender lands this tick.
                if pending.iter().any(|p| p.defender == def_side) {
                    continue;
                }

                let base = attack_damage(atk_action);
                let (damage, knockback, blocked) = if def_blocking {
                    (base / BLOCK_DAMAGE_DIVISOR, 0.0, true)
                } else {
                    (base, attack_knockback(atk_action), false)
                };
                pending.push(PendingHit {
                    attacker: atk_side,
                    defender: def_side,
                    attack: atk_action,
                    damage,
                    knockback,
                    blocked,
                });
            }
        }
    }

    for hit in pending {
        // Signed push, away from the attacker.
        let mut positions = [0.0f32; 2];
        for (fighter, transform) in fighters.iter() {
            match fighter.side {
                Side::Player => positions[0] = transform.translation.x,
                Side::Villain => positions[1] = transform.translation.x,
            }
        }
        let (atk_x, def_x) = match hit.attacker {
            Side::Player => (positions[0], positions[1]),
            Side::Villain => (positions[1], positions[0]),
        };
        let knockback = if def_x < atk_x {
            -hit.knockback
        } else {
            hit.knockback
        };

        for (mut fighter, _) in fighters.iter_mut() {
            if fighter.side == hit.attacker {
                fighter.has_connected = true;
            }
        }
        if !hit.blocked && hit.attack.is_kick_class() {
            timers.record_fall(hit.defender, now);
        }

        hits.send(HitLanded {
            attacker: hit.attacker,
            defender: hit.defender,
            attack: hit.attack,
            damage: hit.damage,
            knockback,
            blocked: hit.blocked,
        });
    }
}

/// Apply the consequences of each landed hit: damage and stats, the knockback
/// displacement (clamped to the arena), and the forced reaction animation.
pub fn apply_hits(
    config: Res<BoutConfig>,
    library: Res<ActionLibrary>,
    mut fighters: Query<(&mut Fighter, &mut Transform)>,
    mut hits: EventReader<HitLanded>,
) {
    for hit in hits.read() {
        for (mut fighter, mut transform) in fighters.iter_mut() {
            if fighter.side == hit.attacker {
                fighter.damage_dealt += hit.damage;
            } else if fighter.side == hit.defender {
                fighter.apply_damage(hit.damage);
                if !hit.blocked {
                    let width = library.spec(fighter.kind, fighter.action).width;
                    let max_x = (config.arena_width - width).max(MIN_X);
                    transform.translation.x =
                        (transform.translation.x + hit.knockback).clamp(MIN_X, max_x);

                    let reaction = if hit.attack.is_kick_class() {
                        Action::Fall
                    } else {
                        Action::Hit
                    };
                    fighter.velocity_x = 0.0;
                    fighter.duck_held = false;
                    fighter.start_locked_action(reaction);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn boxed(x: f32, y: f32, w: f32, h: f32) -> HitBox {
        HitBox {
            x,
            y,
            width: w,
            height: h,
        }
    }

    #[test]
    fn test_overlap_basics() {
        let a = boxed(0.0, 0.0, 100.0, 100.0);
        assert!(a.overlaps(&boxed(50.0, 50.0, 100.0, 100.0)));
        assert!(!a.overlaps(&boxed(100.0, 0.0, 50.0, 50.0)), "touching edges do not overlap");
        assert!(!a.overlaps(&boxed(200.0, 0.0, 50.0, 50.0)));
    }

    #[test]
    fn test_short_pose_keeps_feet_on_the_ground() {
        // A 200-tall duck box anchored to the same feet as a 290-tall stance
        // starts 90px lower.
        let stance = boxed(0.0, 300.0, 133.0, 290.0);
        let duck_top = 300.0 + (290.0 - 200.0);
        let duck = boxed(0.0, duck_top, 133.0, 200.0);
        assert!(duck.y > stance.y);
    }

    #[test]
    fn test_fall_grace_window() {
        let mut timers = CollisionTimers::default();
        timers.record_fall(Side::Player, 1000);
        assert!(timers.in_fall_grace(Side::Player, 1400, 500));
        assert!(!timers.in_fall_grace(Side::Player, 1500, 500));
        assert!(!timers.in_fall_grace(Side::Villain, 1400, 500));
        timers.reset();
        assert!(!timers.in_fall_grace(Side::Player, 1400, 500));
    }

    #[test]
    fn test_damage_table() {
        assert_eq!(attack_damage(Action::Punch), 8);
        assert_eq!(attack_damage(Action::DoublePunch), 15);
        assert_eq!(attack_damage(Action::Kick), 20);
        assert_eq!(attack_damage(Action::UnderKick), 20);
        assert_eq!(attack_knockback(Action::Punch), 15.0);
        assert_eq!(attack_knockback(Action::Kick), 30.0);
    }
}
